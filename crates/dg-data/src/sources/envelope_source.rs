use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::RowSource;
use crate::api::{SignalSummaryResponse, TokenSummaryResponse};
use crate::models::{SignalRow, TokenRow};
use crate::DataError;

/// Status code of a successful summary response
pub const API_OK: i64 = 200;

/// A summary API payload that flattens into grid rows
pub trait RowEnvelope: DeserializeOwned + Send + 'static {
    type Row: Send + 'static;

    /// Response code and description
    fn status(&self) -> (i64, &str);

    fn into_rows(self) -> Vec<Self::Row>;

    /// Reject a response carrying an error code. A missing code is accepted.
    fn check(&self) -> Result<(), DataError> {
        match self.status() {
            (0 | API_OK, _) => Ok(()),
            (code, description) => Err(DataError::Api {
                code,
                description: description.to_string(),
            }),
        }
    }
}

impl RowEnvelope for TokenSummaryResponse {
    type Row = TokenRow;

    fn status(&self) -> (i64, &str) {
        (self.code, &self.description)
    }

    fn into_rows(self) -> Vec<TokenRow> {
        TokenSummaryResponse::into_rows(self)
    }
}

impl RowEnvelope for SignalSummaryResponse {
    type Row = SignalRow;

    fn status(&self) -> (i64, &str) {
        (self.code, &self.description)
    }

    fn into_rows(self) -> Vec<SignalRow> {
        SignalSummaryResponse::into_rows(self)
    }
}

/// A saved summary API response on disk, flattened into rows on load
pub struct EnvelopeSource<E> {
    path: PathBuf,
    name: String,
    _envelope: PhantomData<fn() -> E>,
}

impl<E> EnvelopeSource<E> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            path,
            name,
            _envelope: PhantomData,
        }
    }
}

impl<E: RowEnvelope> EnvelopeSource<E> {
    pub fn parse(text: &str) -> Result<Vec<E::Row>, DataError> {
        let envelope: E = serde_json::from_str(text)?;
        envelope.check()?;
        Ok(envelope.into_rows())
    }
}

#[async_trait]
impl<E: RowEnvelope> RowSource<E::Row> for EnvelopeSource<E> {
    async fn load(&self) -> anyhow::Result<Vec<E::Row>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(DataError::from)?;
        debug!("Read {} bytes from {}", text.len(), self.name);

        let rows = tokio::task::spawn_blocking(move || Self::parse(&text))
            .await
            .map_err(DataError::from)?
            .map_err(|e| {
                warn!("Rejected response in {}: {}", self.name, e);
                e
            })?;
        Ok(rows)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
