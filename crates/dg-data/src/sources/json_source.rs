use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::RowSource;
use crate::DataError;

/// Keys checked, in order, when the file holds an object instead of an array
const ROW_KEYS: [&str; 2] = ["tokens", "data"];

/// Rows stored as JSON on disk.
///
/// Accepts either a bare array of rows or an object carrying the rows under
/// `tokens` or `data`.
pub struct JsonFileSource<R> {
    path: PathBuf,
    name: String,
    _rows: PhantomData<fn() -> R>,
}

impl<R> JsonFileSource<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            path,
            name,
            _rows: PhantomData,
        }
    }
}

impl<R: DeserializeOwned> JsonFileSource<R> {
    /// Parse rows out of a JSON document
    pub fn parse(text: &str) -> Result<Vec<R>, DataError> {
        let document: Value = serde_json::from_str(text)?;
        let rows = match document {
            Value::Array(_) => document,
            Value::Object(mut map) => ROW_KEYS
                .iter()
                .find_map(|key| map.remove(*key).filter(Value::is_array))
                .ok_or_else(|| DataError::UnexpectedShape("expected a row array, `tokens` or `data`".to_string()))?,
            other => {
                return Err(DataError::UnexpectedShape(format!("expected rows, found {other}")));
            }
        };
        Ok(serde_json::from_value(rows)?)
    }
}

#[async_trait]
impl<R> RowSource<R> for JsonFileSource<R>
where
    R: DeserializeOwned + Send + 'static,
{
    async fn load(&self) -> anyhow::Result<Vec<R>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(DataError::from)?;
        debug!("Read {} bytes from {}", text.len(), self.name);

        let rows = tokio::task::spawn_blocking(move || Self::parse(&text))
            .await
            .map_err(DataError::from)??;
        Ok(rows)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KolTokenRow, TokenRow};
    use std::io::Write;

    #[tokio::test]
    async fn test_load_tokens_envelope() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"success": true, "total_tokens": 2, "tokens": [{{"id": 1, "name": "A"}}, {{"id": 2, "name": "B"}}]}}"#
        )
        .unwrap();

        let source: JsonFileSource<TokenRow> = JsonFileSource::new(file.path());
        let rows = source.load().await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_load_bare_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"token_address": "So1", "chain": "solana", "kols_details": []}}]"#).unwrap();

        let source: JsonFileSource<KolTokenRow> = JsonFileSource::new(file.path());
        assert_eq!(source.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source: JsonFileSource<TokenRow> = JsonFileSource::new(dir.path().join("missing.json"));
        assert!(source.load().await.is_err());
    }

    #[test]
    fn test_unexpected_shapes() {
        assert!(matches!(
            JsonFileSource::<TokenRow>::parse(r#"{"rows": []}"#),
            Err(DataError::UnexpectedShape(_))
        ));
        assert!(matches!(JsonFileSource::<TokenRow>::parse("42"), Err(DataError::UnexpectedShape(_))));
        assert!(matches!(JsonFileSource::<TokenRow>::parse("not json"), Err(DataError::Json(_))));
    }
}
