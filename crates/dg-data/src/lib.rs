//! Data handling for the token dashboard grids
//!
//! Domain rows, API response transforms, column catalogues, row sources and
//! the grid configuration file.

pub mod api;
pub mod catalog;
pub mod config;
pub mod models;
pub mod sources;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use api::{SignalSummaryResponse, TokenSummaryResponse};
pub use config::{GridConfig, GridConfigFile, GridSettings};
pub use models::{available_dates, rows_for_date, KolDetail, KolTokenRow, SignalRow, TokenMetadata, TokenRow};
pub use sources::{load_or_empty, EnvelopeSource, JsonFileSource, RowSource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),

    #[error("API returned error code {code}: {description}")]
    Api { code: i64, description: String },
}
