//! Single-pass run: score, aggregate, classify, build, deliver.

use tracing::{debug, error, info};

use crate::aggregate::aggregate;
use crate::config::Thresholds;
use crate::error::BurnoutResult;
use crate::models::{Aggregates, EmployeeRecord, ScoredEmployee};
use crate::notify::{Notifier, SlackMessage};
use crate::report::{build_report, Report};
use crate::risk::{classify, score_employees, Classification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Scored,
    Aggregated,
    Healthy,
    AtRisk,
    Reported,
    Delivered,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub scored: Vec<ScoredEmployee>,
    pub aggregates: Aggregates,
    pub classification: Classification,
    pub report: Report,
}

impl Analysis {
    pub fn message(&self) -> SlackMessage {
        SlackMessage::from_report(&self.report)
    }
}

pub struct BurnoutAgent {
    thresholds: Thresholds,
}

impl BurnoutAgent {
    pub fn new(thresholds: Thresholds) -> BurnoutResult<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Everything up to, but not including, delivery. Fails before any
    /// aggregation on an empty table.
    pub fn analyze(&self, records: &[EmployeeRecord]) -> BurnoutResult<Analysis> {
        transition(Stage::Start);

        let scored = score_employees(records);
        transition(Stage::Scored);

        let aggregates = aggregate(&scored)?;
        transition(Stage::Aggregated);

        let classification = classify(
            &aggregates.departments,
            aggregates.company_avg,
            &self.thresholds,
        );
        match &classification {
            Classification::Healthy => {
                transition(Stage::Healthy);
                info!(
                    company_avg = aggregates.company_avg,
                    "all departments within bounds"
                );
            }
            Classification::AtRisk(risky) => {
                transition(Stage::AtRisk);
                info!(
                    company_avg = aggregates.company_avg,
                    risky_departments = risky.len(),
                    "departments above at-risk threshold"
                );
            }
        }

        let report = build_report(&classification, &aggregates, &scored);
        transition(Stage::Reported);

        Ok(Analysis {
            scored,
            aggregates,
            classification,
            report,
        })
    }

    /// Analyzes and makes exactly one delivery attempt.
    pub async fn run<N: Notifier>(
        &self,
        records: &[EmployeeRecord],
        notifier: &N,
    ) -> BurnoutResult<Analysis> {
        let analysis = self.analyze(records)?;

        match notifier.deliver(&analysis.message()).await {
            Ok(()) => {
                transition(Stage::Delivered);
                Ok(analysis)
            }
            Err(err) => {
                transition(Stage::Failed);
                error!(error = %err, "report delivery failed");
                Err(err)
            }
        }
    }
}

fn transition(stage: Stage) {
    debug!(?stage, "pipeline stage");
}
