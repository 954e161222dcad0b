use std::collections::HashSet;
use std::fmt::Write;

use crate::models::{Aggregates, ScoredEmployee, SubTeamScore};
use crate::risk::{Classification, RiskyDepartment};

/// Individual score at which an employee counts as showing sustained overload.
/// Independent of the department thresholds.
pub const HIGH_SEVERITY_SCORE: f64 = 85.0;

pub const DRIVERS_PER_DEPARTMENT: usize = 2;

pub const REPORT_TITLE: &str = "📊 Weekly Burnout Intelligence Report";
pub const DASHBOARD_LABEL: &str = "📈 View Tableau Evidence";
pub const DASHBOARD_URL: &str = "https://public.tableau.com/app/profile/priyansh.v4388/viz/Burnout_Dasboard/OrganizationDrill-Down?publish=yes";

pub const RECOMMENDATIONS: [&str; 3] = [
    "Declare a meeting-free day this week",
    "Rebalance sprint commitments",
    "Review overtime & on-call rotations",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Sole section of a report where no department crosses the at-risk bar.
    HealthySummary { company_avg: f64 },
    Header { title: &'static str },
    CompanyBaseline { company_avg: f64 },
    RiskyDepartments(Vec<RiskyDepartment>),
    PrimaryDrivers(Vec<SubTeamScore>),
    IndividualImpact { impacted_count: usize },
    Recommendations(&'static [&'static str]),
    CallToAction {
        label: &'static str,
        url: &'static str,
    },
}

/// Finished report. Sections are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.sections.as_slice(), [Section::HealthySummary { .. }])
    }
}

pub fn build_report(
    classification: &Classification,
    aggregates: &Aggregates,
    scored: &[ScoredEmployee],
) -> Report {
    let risky = match classification {
        Classification::Healthy => {
            return Report {
                sections: vec![Section::HealthySummary {
                    company_avg: aggregates.company_avg,
                }],
            };
        }
        Classification::AtRisk(risky) => risky,
    };

    Report {
        sections: vec![
            Section::Header {
                title: REPORT_TITLE,
            },
            Section::CompanyBaseline {
                company_avg: aggregates.company_avg,
            },
            Section::RiskyDepartments(risky.clone()),
            Section::PrimaryDrivers(primary_drivers(risky, &aggregates.sub_teams)),
            Section::IndividualImpact {
                impacted_count: impacted_count(scored),
            },
            Section::Recommendations(&RECOMMENDATIONS),
            Section::CallToAction {
                label: DASHBOARD_LABEL,
                url: DASHBOARD_URL,
            },
        ],
    }
}

/// Top sub-teams by mean score inside each risky department, in department order.
pub fn primary_drivers(
    risky: &[RiskyDepartment],
    sub_teams: &[SubTeamScore],
) -> Vec<SubTeamScore> {
    let mut drivers = Vec::new();

    for dept in risky {
        let mut teams: Vec<&SubTeamScore> = sub_teams
            .iter()
            .filter(|team| team.department == dept.department)
            .collect();
        teams.sort_by(|a, b| b.avg_score.total_cmp(&a.avg_score));
        drivers.extend(teams.into_iter().take(DRIVERS_PER_DEPARTMENT).cloned());
    }

    drivers
}

/// Number of distinct employees at or above [`HIGH_SEVERITY_SCORE`].
pub fn impacted_count(scored: &[ScoredEmployee]) -> usize {
    scored
        .iter()
        .filter(|employee| employee.score >= HIGH_SEVERITY_SCORE)
        .map(|employee| employee.record.employee_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn render_markdown(report: &Report) -> String {
    let mut output = String::new();

    for section in report.sections() {
        match section {
            Section::HealthySummary { company_avg } => {
                let _ = writeln!(
                    output,
                    "🟢 Weekly Burnout Report: All teams healthy (Avg {:.1}%).",
                    company_avg
                );
            }
            Section::Header { title } => {
                let _ = writeln!(output, "# {}", title);
            }
            Section::CompanyBaseline { company_avg } => {
                let _ = writeln!(output);
                let _ = writeln!(output, "Company average burnout: {:.1}%", company_avg);
            }
            Section::RiskyDepartments(risky) => {
                let _ = writeln!(output);
                let _ = writeln!(output, "## High-Risk Departments");
                for dept in risky {
                    let _ = writeln!(
                        output,
                        "- {}: {:.1}% ({:+.1}% vs avg) {} {}",
                        dept.department,
                        dept.avg_score,
                        dept.delta_pct,
                        dept.level.badge(),
                        dept.level
                    );
                }
            }
            Section::PrimaryDrivers(drivers) => {
                let _ = writeln!(output);
                let _ = writeln!(output, "## Primary Drivers");
                for team in drivers {
                    let _ = writeln!(
                        output,
                        "- {} → {}: avg weekly hours {:.1}, overtime {:.1}h",
                        team.department, team.sub_team, team.avg_hours, team.avg_overtime
                    );
                }
            }
            Section::IndividualImpact { impacted_count } => {
                let _ = writeln!(output);
                let _ = writeln!(output, "## Individual Impact");
                let _ = writeln!(
                    output,
                    "- {} contributors showing sustained overload",
                    impacted_count
                );
                let _ = writeln!(output, "- Pattern indicates systemic, not individual, risk");
            }
            Section::Recommendations(items) => {
                let _ = writeln!(output);
                let _ = writeln!(output, "## Recommended Actions");
                for item in items.iter() {
                    let _ = writeln!(output, "- {}", item);
                }
            }
            Section::CallToAction { label, url } => {
                let _ = writeln!(output);
                let _ = writeln!(output, "[{}]({})", label, url);
            }
        }
    }

    output
}
