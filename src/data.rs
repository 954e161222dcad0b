//! Employee dataset loading and synthetic dataset generation.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use tracing::{debug, info, warn};

use crate::error::{BurnoutError, BurnoutResult};
use crate::models::EmployeeRecord;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Employee_ID",
    "Department",
    "Sub_Team",
    "Total_Weekly_Hours",
    "Overtime_Hours",
    "Avg_Days_Early",
];

pub const DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "Engineering",
        &["Backend", "Frontend", "DevOps", "QA", "Data Science"],
    ),
    ("HR", &["Recruiting", "Employee Relations", "Payroll"]),
    ("Sales", &["Enterprise", "SMB", "Business Development"]),
    (
        "Marketing",
        &["Content", "SEO", "Social Media", "Product Marketing"],
    ),
    ("Finance", &["Accounting", "FP&A", "Tax"]),
];

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
    "Taylor", "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia",
    "Martinez", "Robinson",
];

const BASE_HOURS: f64 = 40.0;

pub fn load_employees(path: &Path) -> BurnoutResult<Vec<EmployeeRecord>> {
    let file = std::fs::File::open(path)?;
    let employees = load_from_reader(file)?;
    info!(
        rows = employees.len(),
        path = %path.display(),
        "loaded employee dataset"
    );
    Ok(employees)
}

/// Reads and validates every row. Any bad row aborts the whole load.
pub fn load_from_reader<R: Read>(input: R) -> BurnoutResult<Vec<EmployeeRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(BurnoutError::MissingColumn(column.to_string()));
        }
    }

    let mut employees = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, result) in reader.deserialize::<EmployeeRecord>().enumerate() {
        // Header occupies line 1.
        let line = index as u64 + 2;
        let record = result.map_err(|err| BurnoutError::InvalidRow {
            line: err.position().map(|pos| pos.line()).unwrap_or(line),
            message: err.to_string(),
        })?;
        validate_record(&record, line)?;

        if !seen_ids.insert(record.employee_id.clone()) {
            warn!(line, "duplicate Employee_ID in dataset");
        }
        employees.push(record);
    }

    if employees.is_empty() {
        return Err(BurnoutError::EmptyDataset);
    }

    Ok(employees)
}

fn validate_record(record: &EmployeeRecord, line: u64) -> BurnoutResult<()> {
    for (column, value) in [
        ("Employee_ID", &record.employee_id),
        ("Department", &record.department),
        ("Sub_Team", &record.sub_team),
    ] {
        if value.is_empty() {
            return Err(BurnoutError::InvalidValue {
                line,
                column,
                value: String::new(),
            });
        }
    }

    for (column, value, allow_negative) in [
        ("Total_Weekly_Hours", record.total_weekly_hours, false),
        ("Overtime_Hours", record.overtime_hours, false),
        ("Avg_Days_Early", record.avg_days_early, true),
    ] {
        if !value.is_finite() || (!allow_negative && value < 0.0) {
            return Err(BurnoutError::InvalidValue {
                line,
                column,
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

/// Builds a reproducible synthetic dataset: 5 to 15 employees per sub-team,
/// overtime skewed so a minority works far beyond base hours.
pub fn generate_dataset(seed: u64) -> Vec<EmployeeRecord> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut used_ids = HashSet::new();
    let mut employees = Vec::new();

    for (department, teams) in DEPARTMENTS {
        for team in teams.iter() {
            let headcount = rng.gen_range(5..=15);
            debug!(department, team, headcount, "generating sub-team");

            for _ in 0..headcount {
                let employee_id = loop {
                    let candidate = format!("EMP{}", rng.gen_range(1000..=9999));
                    if used_ids.insert(candidate.clone()) {
                        break candidate;
                    }
                };
                let name = format!(
                    "{} {}",
                    FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
                    LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())]
                );

                let overtime = normal(&mut rng, 5.0, 10.0).trunc().max(0.0);
                let projects: u32 = rng.gen_range(1..=10);
                let efficiency = round_tenth(normal(&mut rng, 0.5, 2.0) + overtime * 0.05);
                let value_score =
                    round_tenth(projects as f64 * 10.0 + efficiency * 5.0 + overtime * 2.0);

                employees.push(EmployeeRecord {
                    employee_id,
                    name: Some(name),
                    department: department.to_string(),
                    sub_team: team.to_string(),
                    total_weekly_hours: BASE_HOURS + overtime,
                    overtime_hours: overtime,
                    projects_completed: Some(projects),
                    avg_days_early: efficiency,
                    value_score: Some(value_score),
                });
            }
        }
    }

    employees
}

pub fn write_dataset(path: &Path, employees: &[EmployeeRecord]) -> BurnoutResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for employee in employees {
        writer.serialize(employee)?;
    }
    writer.flush()?;
    info!(rows = employees.len(), path = %path.display(), "wrote synthetic dataset");
    Ok(())
}

// Box-Muller transform.
fn normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
