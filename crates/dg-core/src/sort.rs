//! Sort engine
//!
//! Sorting is stable and works on row indices produced by the filter stage.
//! Missing and `NaN` values always sort last, whatever the direction.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::column::{ColumnDef, ColumnId, ColumnSet};
use crate::format::parse_datetime;
use crate::row::CellValue;

/// Comparator family declared by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    /// Case-folded string compare
    Text,
    /// Numeric compare
    Basic,
    /// Compare on epoch seconds (numbers or RFC 3339 text)
    Datetime,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        matches!(self, SortDirection::Descending)
    }
}

/// A single sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: ColumnId,
    pub direction: SortDirection,
}

/// Active sort keys, primary first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    /// No sorting: rows keep their filter-stage order
    pub fn none() -> Self {
        Self::default()
    }

    pub fn by(column: impl Into<ColumnId>, direction: SortDirection) -> Self {
        Self {
            keys: vec![SortKey {
                column: column.into(),
                direction,
            }],
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn primary(&self) -> Option<&SortKey> {
        self.keys.first()
    }

    /// Direction the given column is currently sorted in, if any
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|key| key.column == column)
            .map(|key| key.direction)
    }

    /// Next state after activating a column header.
    ///
    /// Cycles `none -> ascending -> descending -> none`, or
    /// `none -> descending -> ascending -> none` for columns that start
    /// descending. Activating a different column replaces the prior sort.
    pub fn toggled(&self, column: &str, descending_first: bool) -> Self {
        let (first, second) = if descending_first {
            (SortDirection::Descending, SortDirection::Ascending)
        } else {
            (SortDirection::Ascending, SortDirection::Descending)
        };

        match self.direction_of(column) {
            None => Self::by(column, first),
            Some(direction) if direction == first => Self::by(column, second),
            Some(_) => Self::none(),
        }
    }
}

/// Stable sort of `indices` (positions into `rows`) by the active keys.
///
/// Keys naming unknown or non-sortable columns are ignored.
pub fn apply<R>(rows: &[R], columns: &ColumnSet<R>, sort: &SortState, indices: &mut Vec<usize>) {
    let keys: Vec<(&ColumnDef<R>, SortType, SortDirection)> = sort
        .keys()
        .iter()
        .filter_map(|key| {
            let column = columns.get(&key.column)?;
            let sort_type = column.sort_type()?;
            column.can_sort().then_some((column, sort_type, key.direction))
        })
        .collect();

    if keys.is_empty() || indices.len() < 2 {
        return;
    }

    // Extract sort values once per row rather than once per comparison
    let mut decorated: Vec<(usize, Vec<SortValue>)> = indices
        .iter()
        .map(|&idx| {
            let values = keys
                .iter()
                .map(|(column, sort_type, _)| SortValue::extract(&column.value(&rows[idx]), *sort_type))
                .collect();
            (idx, values)
        })
        .collect();

    decorated.sort_by(|(_, a), (_, b)| {
        keys.iter()
            .enumerate()
            .map(|(k, (_, _, direction))| compare(&a[k], &b[k], *direction))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    indices.clear();
    indices.extend(decorated.into_iter().map(|(idx, _)| idx));
}

/// Comparable projection of a cell under a sort type
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(f64),
    Text { folded: String, raw: String },
    Missing,
}

impl SortValue {
    fn extract(value: &CellValue, sort_type: SortType) -> Self {
        match sort_type {
            SortType::Basic => match value {
                CellValue::Bool(b) => SortValue::Number(if *b { 1.0 } else { 0.0 }),
                other => other.as_number().map(SortValue::Number).unwrap_or(SortValue::Missing),
            },
            SortType::Datetime => parse_datetime(value)
                .map(|dt| SortValue::Number(dt.timestamp() as f64))
                .unwrap_or(SortValue::Missing),
            SortType::Text => {
                if value.is_missing() {
                    SortValue::Missing
                } else {
                    let raw = value.facet_key();
                    SortValue::Text {
                        folded: raw.to_lowercase(),
                        raw,
                    }
                }
            }
        }
    }
}

/// Compare two sort values; missing values go last in either direction
fn compare(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (SortValue::Missing, SortValue::Missing) => return Ordering::Equal,
        (SortValue::Missing, _) => return Ordering::Greater,
        (_, SortValue::Missing) => return Ordering::Less,
        (SortValue::Number(x), SortValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortValue::Text { folded: fa, raw: ra }, SortValue::Text { folded: fb, raw: rb }) => {
            fa.cmp(fb).then_with(|| ra.cmp(rb))
        }
        // Mixed kinds cannot come from a single sort type
        _ => Ordering::Equal,
    };

    if direction.is_descending() {
        ordering.reverse()
    } else {
        ordering
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDef;

    #[derive(Debug, Clone)]
    struct Signal {
        tag: &'static str,
        amount: f64,
        first_signal_time: Option<i64>,
        name: &'static str,
    }

    fn signal(tag: &'static str, amount: f64) -> Signal {
        Signal {
            tag,
            amount,
            first_signal_time: None,
            name: tag,
        }
    }

    fn columns() -> ColumnSet<Signal> {
        ColumnSet::new(vec![
            ColumnDef::new("transaction_amount", "Amount", |s: &Signal| s.amount.into())
                .sortable(SortType::Basic),
            ColumnDef::new("first_signal_time", "First Signal", |s: &Signal| {
                s.first_signal_time.map(CellValue::Timestamp).unwrap_or_default()
            })
            .sortable(SortType::Datetime),
            ColumnDef::new("token_name", "Token", |s: &Signal| CellValue::from(s.name)).sortable(SortType::Text),
            ColumnDef::new("unsortable", "Unsortable", |s: &Signal| s.amount.into()),
        ])
    }

    fn sorted_tags(rows: &[Signal], sort: &SortState) -> Vec<&'static str> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        apply(rows, &columns(), sort, &mut indices);
        indices.into_iter().map(|i| rows[i].tag).collect()
    }

    #[test]
    fn test_descending_keeps_tied_rows_in_order() {
        let rows = vec![signal("a", 5.0), signal("b", 20.0), signal("c", 5.0), signal("d", 1.0)];
        let sort = SortState::by("transaction_amount", SortDirection::Descending);
        assert_eq!(sorted_tags(&rows, &sort), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_ascending_keeps_tied_rows_in_order() {
        let rows = vec![signal("a", 5.0), signal("b", 20.0), signal("c", 5.0), signal("d", 1.0)];
        let sort = SortState::by("transaction_amount", SortDirection::Ascending);
        assert_eq!(sorted_tags(&rows, &sort), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_nan_sorts_last_in_both_directions() {
        let rows = vec![signal("nan", f64::NAN), signal("one", 1.0), signal("two", 2.0)];
        assert_eq!(
            sorted_tags(&rows, &SortState::by("transaction_amount", SortDirection::Ascending)),
            vec!["one", "two", "nan"]
        );
        assert_eq!(
            sorted_tags(&rows, &SortState::by("transaction_amount", SortDirection::Descending)),
            vec!["two", "one", "nan"]
        );
    }

    #[test]
    fn test_datetime_sort_with_missing_times() {
        let mut rows = vec![signal("late", 0.0), signal("none", 0.0), signal("early", 0.0)];
        rows[0].first_signal_time = Some(1_700_000_500);
        rows[2].first_signal_time = Some(1_700_000_000);

        assert_eq!(
            sorted_tags(&rows, &SortState::by("first_signal_time", SortDirection::Ascending)),
            vec!["early", "late", "none"]
        );
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let mut rows = vec![signal("b", 0.0), signal("a", 0.0), signal("c", 0.0)];
        rows[0].name = "beta";
        rows[1].name = "Alpha";
        rows[2].name = "Charlie";
        assert_eq!(
            sorted_tags(&rows, &SortState::by("token_name", SortDirection::Ascending)),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_empty_or_unknown_sort_keeps_order() {
        let rows = vec![signal("x", 3.0), signal("y", 1.0), signal("z", 2.0)];
        assert_eq!(sorted_tags(&rows, &SortState::none()), vec!["x", "y", "z"]);
        assert_eq!(
            sorted_tags(&rows, &SortState::by("unsortable", SortDirection::Ascending)),
            vec!["x", "y", "z"]
        );
        assert_eq!(
            sorted_tags(&rows, &SortState::by("nope", SortDirection::Descending)),
            vec!["x", "y", "z"]
        );
    }

    #[test]
    fn test_toggle_cycles_three_states() {
        let sort = SortState::none();
        let sort = sort.toggled("volume", false);
        assert_eq!(sort.direction_of("volume"), Some(SortDirection::Ascending));
        let sort = sort.toggled("volume", false);
        assert_eq!(sort.direction_of("volume"), Some(SortDirection::Descending));
        let sort = sort.toggled("volume", false);
        assert!(sort.is_empty());
    }

    #[test]
    fn test_toggle_descending_first() {
        let sort = SortState::none().toggled("buy_counts", true);
        assert_eq!(sort.direction_of("buy_counts"), Some(SortDirection::Descending));
        let sort = sort.toggled("buy_counts", true);
        assert_eq!(sort.direction_of("buy_counts"), Some(SortDirection::Ascending));
        assert!(sort.toggled("buy_counts", true).is_empty());
    }

    #[test]
    fn test_new_column_replaces_prior_sort() {
        let sort = SortState::by("volume", SortDirection::Descending).toggled("count", false);
        assert_eq!(sort.keys().len(), 1);
        assert_eq!(sort.direction_of("volume"), None);
        assert_eq!(sort.direction_of("count"), Some(SortDirection::Ascending));
    }
}
