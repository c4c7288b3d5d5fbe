//! Row sources
//!
//! A source resolves once with the full row set or fails. Failures are the
//! caller's to handle; [`load_or_empty`] logs them and yields no rows so the
//! grid renders its "No results." state.

pub mod envelope_source;
pub mod json_source;

use async_trait::async_trait;
use tracing::{error, info};

pub use envelope_source::{EnvelopeSource, RowEnvelope};
pub use json_source::JsonFileSource;

/// Asynchronous provider of grid rows
#[async_trait]
pub trait RowSource<R>: Send + Sync {
    /// Load every row
    async fn load(&self) -> anyhow::Result<Vec<R>>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}

/// Load rows, logging any failure and falling back to an empty set
pub async fn load_or_empty<R>(source: &dyn RowSource<R>) -> Vec<R> {
    match source.load().await {
        Ok(rows) => {
            info!("Loaded {} rows from {}", rows.len(), source.source_name());
            rows
        }
        Err(e) => {
            error!("Failed to load rows from {}: {:#}", source.source_name(), e);
            Vec::new()
        }
    }
}
