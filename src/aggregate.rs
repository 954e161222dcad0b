//! Organization, department, and sub-team level means over scored employees.
//!
//! Groups are kept in first-appearance order so that ties in any later sort
//! resolve to input order.

use std::collections::HashMap;

use crate::error::{BurnoutError, BurnoutResult};
use crate::models::{Aggregates, DepartmentScore, ScoredEmployee, SubTeamScore};

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    count: usize,
    score: f64,
    hours: f64,
    overtime: f64,
}

impl Totals {
    fn add(&mut self, employee: &ScoredEmployee) {
        self.count += 1;
        self.score += employee.score;
        self.hours += employee.record.total_weekly_hours;
        self.overtime += employee.record.overtime_hours;
    }

    fn mean(&self, total: f64) -> f64 {
        total / self.count as f64
    }
}

/// Unweighted mean over every employee. Undefined for an empty table.
pub fn company_average(scored: &[ScoredEmployee]) -> BurnoutResult<f64> {
    if scored.is_empty() {
        return Err(BurnoutError::EmptyDataset);
    }
    let total: f64 = scored.iter().map(|employee| employee.score).sum();
    Ok(total / scored.len() as f64)
}

pub fn department_averages(scored: &[ScoredEmployee]) -> Vec<DepartmentScore> {
    let groups = group_by(scored, |employee| employee.record.department.clone());

    let mut departments: Vec<DepartmentScore> = groups
        .into_iter()
        .map(|(department, totals)| DepartmentScore {
            department,
            avg_score: totals.mean(totals.score),
        })
        .collect();

    // sort_by is stable, which keeps equal scores in input order.
    departments.sort_by(|a, b| b.avg_score.total_cmp(&a.avg_score));
    departments
}

pub fn subteam_averages(scored: &[ScoredEmployee]) -> Vec<SubTeamScore> {
    group_by(scored, |employee| {
        (
            employee.record.department.clone(),
            employee.record.sub_team.clone(),
        )
    })
    .into_iter()
    .map(|((department, sub_team), totals)| SubTeamScore {
        department,
        sub_team,
        avg_score: totals.mean(totals.score),
        avg_hours: totals.mean(totals.hours),
        avg_overtime: totals.mean(totals.overtime),
    })
    .collect()
}

pub fn aggregate(scored: &[ScoredEmployee]) -> BurnoutResult<Aggregates> {
    Ok(Aggregates {
        company_avg: company_average(scored)?,
        departments: department_averages(scored),
        sub_teams: subteam_averages(scored),
    })
}

fn group_by<K, F>(scored: &[ScoredEmployee], key_of: F) -> Vec<(K, Totals)>
where
    K: std::hash::Hash + Eq + Clone,
    F: Fn(&ScoredEmployee) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Totals)> = Vec::new();

    for employee in scored {
        let key = key_of(employee);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Totals::default()));
            groups.len() - 1
        });
        groups[slot].1.add(employee);
    }

    groups
}
