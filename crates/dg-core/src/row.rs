//! Row model: cell values and row identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key for a row, independent of its position in the grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Create a row id from any string-like key
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build a composite key such as `chain:address`
    pub fn composite(parts: &[&str]) -> Self {
        Self(parts.join(":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RowId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A single value produced by a column accessor
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// The row has no value for this column
    #[default]
    Missing,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Epoch seconds
    Timestamp(i64),
}

impl CellValue {
    /// Numeric view of the value; `NaN` counts as absent
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Timestamp(t) => Some(*t as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the value should be treated as absent
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// String form used for facet membership and text search.
    ///
    /// Booleans become `"true"`/`"false"` and a missing value becomes `""`,
    /// which is what faceted filter values arrive as.
    pub fn facet_key(&self) -> String {
        match self {
            CellValue::Missing => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.is_nan() => String::new(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Timestamp(t) => t.to_string(),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Missing)
    }
}

/// Trait implemented by every row type shown in a grid
pub trait GridRow: Send + Sync + 'static {
    /// Stable identity used for expansion and selection
    fn row_id(&self) -> RowId;
}

/// Detail type for grids whose rows have no nested table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDetail {}

impl GridRow for NoDetail {
    fn row_id(&self) -> RowId {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_key_stringifies_booleans_and_missing() {
        assert_eq!(CellValue::Bool(true).facet_key(), "true");
        assert_eq!(CellValue::Bool(false).facet_key(), "false");
        assert_eq!(CellValue::Missing.facet_key(), "");
        assert_eq!(CellValue::from(None::<String>).facet_key(), "");
    }

    #[test]
    fn test_facet_key_formats_whole_numbers_without_fraction() {
        assert_eq!(CellValue::Number(1500.0).facet_key(), "1500");
        assert_eq!(CellValue::Number(0.25).facet_key(), "0.25");
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let value = CellValue::Number(f64::NAN);
        assert!(value.is_missing());
        assert_eq!(value.as_number(), None);
    }

    #[test]
    fn test_composite_row_id() {
        let id = RowId::composite(&["solana", "So111"]);
        assert_eq!(id.as_str(), "solana:So111");
    }
}
