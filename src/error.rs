use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BurnoutError {
    #[error("Required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    #[error("Invalid row at line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error("Invalid value '{value}' for {column} at line {line}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Dataset contains no employee rows")]
    EmptyDataset,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("SLACK_WEBHOOK_URL must be set to deliver the report")]
    MissingWebhook,

    #[error("Webhook rejected the report with status {status}: {body}")]
    DeliveryFailed { status: u16, body: String },

    #[error("Webhook did not respond within {0:?}")]
    DeliveryTimeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BurnoutResult<T> = Result<T, BurnoutError>;
