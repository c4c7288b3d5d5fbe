//! Filter engine
//!
//! A row passes when it matches the global search text AND every active
//! column filter. Within a multi-select facet the selected values are ORed.
//! Empty or malformed filter values never constrain anything.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::column::{ColumnDef, ColumnId, ColumnSet};
use crate::row::CellValue;

/// Predicate family a column filters with
#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    /// Row value must be one of the selected strings
    MultiSelect,
    /// Row boolean, stringified, must be one of the selected values
    Boolean,
    /// Row number must fall in at least one selected bucket
    Buckets(Vec<NumericBucket>),
    /// Case-insensitive substring match on the column's text
    Text,
}

/// Range covered by a numeric bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BucketRange {
    /// `v == value`
    Exactly(f64),
    /// `above < v <= at_most`
    Between { above: f64, at_most: f64 },
    /// `v > value`
    Above(f64),
}

impl BucketRange {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            BucketRange::Exactly(target) => value == target,
            BucketRange::Between { above, at_most } => value > above && value <= at_most,
            BucketRange::Above(bound) => value > bound,
        }
    }
}

/// Named numeric bucket, e.g. `zero` or `0-1000`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericBucket {
    pub name: String,
    pub label: String,
    pub range: BucketRange,
}

impl NumericBucket {
    pub fn new(name: impl Into<String>, label: impl Into<String>, range: BucketRange) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            range,
        }
    }
}

/// Active filter value for a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Selected facet values or bucket names
    Values(Vec<String>),
    /// Free text
    Text(String),
}

impl FilterValue {
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::Values(values.into_iter().map(Into::into).collect())
    }

    /// Interpret a loosely typed value coming from a UI or a saved view.
    ///
    /// Arrays become [`FilterValue::Values`] (booleans and numbers are
    /// stringified), strings become [`FilterValue::Text`]. Anything else is
    /// malformed and yields `None`, i.e. no constraint.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Array(items) => {
                let values = items
                    .iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s.clone()),
                        serde_json::Value::Bool(b) => Some(b.to_string()),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect();
                Some(FilterValue::Values(values))
            }
            serde_json::Value::String(s) => Some(FilterValue::Text(s.clone())),
            _ => None,
        }
    }

    /// An empty value imposes no constraint
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Values(values) => values.is_empty(),
            FilterValue::Text(text) => text.trim().is_empty(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            FilterValue::Values(values) => values.iter().any(|v| v == value),
            FilterValue::Text(text) => text == value,
        }
    }
}

/// Column filters currently applied, in the order they were set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    filters: IndexMap<ColumnId, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's filter; an empty value removes the entry
    pub fn set(&mut self, column: impl Into<ColumnId>, value: FilterValue) {
        let column = column.into();
        if value.is_empty() {
            self.filters.shift_remove(&column);
        } else {
            self.filters.insert(column, value);
        }
    }

    /// Add or remove one facet value, keeping the others selected
    pub fn toggle_value(&mut self, column: &str, value: &str) {
        let mut values = match self.filters.get(column) {
            Some(FilterValue::Values(values)) => values.clone(),
            _ => Vec::new(),
        };

        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }

        self.set(column.to_string(), FilterValue::Values(values));
    }

    pub fn remove(&mut self, column: &str) {
        self.filters.shift_remove(column);
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.filters.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnId, &FilterValue)> {
        self.filters.iter()
    }
}

/// Apply search text and column filters, returning indices of passing rows
/// in their original order.
pub fn apply<R>(rows: &[R], columns: &ColumnSet<R>, filters: &FilterState, search: &str) -> Vec<usize> {
    let needle = search.trim().to_lowercase();

    // Resolve filters to columns once; unknown or non-filterable columns drop out
    let active: Vec<(&ColumnDef<R>, &FilterKind, &FilterValue)> = filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(id, value)| {
            let column = columns.get(id)?;
            let kind = column.filter_kind()?;
            column.has_value().then_some((column, kind, value))
        })
        .collect();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| needle.is_empty() || matches_search(columns, row, &needle))
        .filter(|(_, row)| {
            active
                .iter()
                .all(|(column, kind, value)| matches_filter(kind, value, &column.value(row)))
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Whether any searchable field contains the (lowercased) needle
fn matches_search<R>(columns: &ColumnSet<R>, row: &R, needle: &str) -> bool {
    columns
        .search_fields(row)
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Evaluate one column filter against a cell
pub fn matches_filter(kind: &FilterKind, value: &FilterValue, cell: &CellValue) -> bool {
    if value.is_empty() {
        return true;
    }

    match (kind, value) {
        (FilterKind::MultiSelect, FilterValue::Values(selected)) => {
            let key = cell.facet_key();
            selected.iter().any(|v| *v == key)
        }
        (FilterKind::Boolean, FilterValue::Values(selected)) => match cell.as_bool() {
            Some(b) => {
                let key = if b { "true" } else { "false" };
                selected.iter().any(|v| v == key)
            }
            None => false,
        },
        (FilterKind::Buckets(buckets), FilterValue::Values(selected)) => {
            let chosen: Vec<&NumericBucket> = buckets
                .iter()
                .filter(|bucket| selected.iter().any(|name| *name == bucket.name))
                .collect();

            // Only unknown bucket names selected: nothing meaningful to apply
            if chosen.is_empty() {
                return true;
            }

            match cell.as_number() {
                Some(n) => chosen.iter().any(|bucket| bucket.range.contains(n)),
                None => false,
            }
        }
        (FilterKind::Text, FilterValue::Text(needle)) => {
            let needle = needle.trim().to_lowercase();
            cell.facet_key().to_lowercase().contains(&needle)
        }
        // Value shape doesn't fit the column's predicate
        _ => true,
    }
}
