use std::fmt;

use crate::config::Thresholds;
use crate::models::{DepartmentScore, EmployeeRecord, ScoredEmployee};

pub const HOURS_WEIGHT: f64 = 1.0;
pub const OVERTIME_WEIGHT: f64 = 3.0;
pub const DAYS_EARLY_WEIGHT: f64 = 2.0;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Linear burnout formula: long hours and overtime push the score up,
/// finishing ahead of schedule pulls it down.
pub fn raw_burnout_score(record: &EmployeeRecord) -> f64 {
    record.total_weekly_hours * HOURS_WEIGHT + record.overtime_hours * OVERTIME_WEIGHT
        - record.avg_days_early * DAYS_EARLY_WEIGHT
}

pub fn burnout_score(record: &EmployeeRecord) -> f64 {
    raw_burnout_score(record).clamp(MIN_SCORE, MAX_SCORE)
}

pub fn score_employees(records: &[EmployeeRecord]) -> Vec<ScoredEmployee> {
    records
        .iter()
        .map(|record| ScoredEmployee {
            record: record.clone(),
            raw_score: raw_burnout_score(record),
            score: burnout_score(record),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    AtRisk,
    Critical,
}

impl RiskLevel {
    pub fn for_score(score: f64, thresholds: &Thresholds) -> Option<Self> {
        if score >= thresholds.critical {
            Some(Self::Critical)
        } else if score >= thresholds.at_risk {
            Some(Self::AtRisk)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AtRisk => "At Risk",
            Self::Critical => "Critical",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Self::AtRisk => "🟡",
            Self::Critical => "🔴",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskyDepartment {
    pub department: String,
    pub avg_score: f64,
    pub level: RiskLevel,
    /// Percentage deviation from the company average.
    pub delta_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Healthy,
    AtRisk(Vec<RiskyDepartment>),
}

impl Classification {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Keeps the departments at or above the at-risk bar, preserving the
/// incoming (descending) order.
pub fn classify(
    departments: &[DepartmentScore],
    company_avg: f64,
    thresholds: &Thresholds,
) -> Classification {
    let risky: Vec<RiskyDepartment> = departments
        .iter()
        .filter_map(|dept| {
            let level = RiskLevel::for_score(dept.avg_score, thresholds)?;
            Some(RiskyDepartment {
                department: dept.department.clone(),
                avg_score: dept.avg_score,
                level,
                delta_pct: deviation_pct(dept.avg_score, company_avg),
            })
        })
        .collect();

    if risky.is_empty() {
        Classification::Healthy
    } else {
        Classification::AtRisk(risky)
    }
}

pub fn deviation_pct(score: f64, company_avg: f64) -> f64 {
    (score - company_avg) / company_avg * 100.0
}

#[cfg(test)]
pub(crate) fn employee(
    id: &str,
    department: &str,
    sub_team: &str,
    hours: f64,
    overtime: f64,
    days_early: f64,
) -> EmployeeRecord {
    EmployeeRecord {
        employee_id: id.to_string(),
        name: Some(format!("Person {id}")),
        department: department.to_string(),
        sub_team: sub_team.to_string(),
        total_weekly_hours: hours,
        overtime_hours: overtime,
        projects_completed: Some(4),
        avg_days_early: days_early,
        value_score: Some(50.0),
    }
}
