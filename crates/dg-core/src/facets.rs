//! Faceted filter options
//!
//! Options are always derived from the full, unfiltered row set so a user
//! can filter back to values they have hidden. Derivation is memoized per
//! row-set generation.

use std::sync::Arc;

use ahash::AHashMap;
use indexmap::IndexSet;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::column::{ColumnDef, ColumnId};
use crate::filter::{matches_filter, FilterKind, FilterValue};

/// A selectable facet value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetOption {
    pub label: String,
    pub value: String,
}

impl FacetOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label is its value
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Build the option list for a filterable column.
///
/// Static options win; boolean columns get Yes/No; bucket columns list their
/// buckets; anything else lists distinct non-empty values in first-seen
/// order. A configured empty option is appended last.
pub fn derive_facet_options<R>(rows: &[R], column: &ColumnDef<R>) -> Vec<FacetOption> {
    let mut options = if let Some(fixed) = column.static_options() {
        fixed.to_vec()
    } else {
        match column.filter_kind() {
            None | Some(FilterKind::Text) => Vec::new(),
            Some(FilterKind::Boolean) => vec![FacetOption::new("Yes", "true"), FacetOption::new("No", "false")],
            Some(FilterKind::Buckets(buckets)) => buckets
                .iter()
                .map(|bucket| FacetOption::new(bucket.label.clone(), bucket.name.clone()))
                .collect(),
            Some(FilterKind::MultiSelect) => {
                let distinct: IndexSet<String> = rows
                    .iter()
                    .map(|row| column.value(row).facet_key())
                    .filter(|key| !key.is_empty())
                    .collect();
                distinct.into_iter().map(FacetOption::same).collect()
            }
        }
    };

    if let Some(label) = column.empty_option_label() {
        if !options.iter().any(|option| option.value.is_empty()) {
            options.push(FacetOption::new(label, ""));
        }
    }

    options
}

/// Number of unfiltered rows matching each option on its own
pub fn facet_counts<R>(rows: &[R], column: &ColumnDef<R>, options: &[FacetOption]) -> Vec<usize> {
    let Some(kind) = column.filter_kind() else {
        return vec![0; options.len()];
    };

    let cells: Vec<_> = rows.iter().map(|row| column.value(row)).collect();
    options
        .iter()
        .map(|option| {
            let single = FilterValue::Values(vec![option.value.clone()]);
            match kind {
                // An empty selection is "no constraint"; count missing values directly
                FilterKind::MultiSelect if option.value.is_empty() => {
                    cells.iter().filter(|cell| cell.facet_key().is_empty()).count()
                }
                _ => cells
                    .iter()
                    .filter(|cell| matches_filter(kind, &single, cell))
                    .count(),
            }
        })
        .collect()
}

/// Memoized facet options and counts, valid for one row-set generation
#[derive(Debug, Default)]
pub struct FacetCache {
    inner: RwLock<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    generation: u64,
    options: AHashMap<ColumnId, Arc<Vec<FacetOption>>>,
    counts: AHashMap<ColumnId, Arc<Vec<usize>>>,
}

impl CacheInner {
    fn roll_to(&mut self, generation: u64) {
        if self.generation != generation {
            self.options.clear();
            self.counts.clear();
            self.generation = generation;
        }
    }
}

impl FacetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached options for `column`, deriving them when the generation moved
    pub fn get_or_derive<F>(&self, generation: u64, column: &str, derive: F) -> Arc<Vec<FacetOption>>
    where
        F: FnOnce() -> Vec<FacetOption>,
    {
        {
            let inner = self.inner.read();
            if inner.generation == generation {
                if let Some(options) = inner.options.get(column) {
                    return Arc::clone(options);
                }
            }
        }

        let options = Arc::new(derive());
        let mut inner = self.inner.write();
        inner.roll_to(generation);
        inner.options.insert(column.to_string(), Arc::clone(&options));
        options
    }

    /// Cached per-option counts for `column`, counted when the generation moved
    pub fn get_or_count<F>(&self, generation: u64, column: &str, count: F) -> Arc<Vec<usize>>
    where
        F: FnOnce() -> Vec<usize>,
    {
        {
            let inner = self.inner.read();
            if inner.generation == generation {
                if let Some(counts) = inner.counts.get(column) {
                    return Arc::clone(counts);
                }
            }
        }

        let counts = Arc::new(count());
        let mut inner = self.inner.write();
        inner.roll_to(generation);
        inner.counts.insert(column.to_string(), Arc::clone(&counts));
        counts
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.options.clear();
        inner.counts.clear();
    }

    /// Number of columns with cached options
    pub fn len(&self) -> usize {
        self.inner.read().options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{BucketRange, NumericBucket};
    use crate::row::CellValue;

    struct Signal {
        chain: &'static str,
        dog: Option<&'static str>,
        zero: f64,
    }

    fn rows() -> Vec<Signal> {
        vec![
            Signal { chain: "solana", dog: Some("金狗"), zero: 0.0 },
            Signal { chain: "bsc", dog: None, zero: 300.0 },
            Signal { chain: "solana", dog: Some("铜狗"), zero: 5000.0 },
            Signal { chain: "base", dog: None, zero: 0.0 },
        ]
    }

    fn chain_column() -> ColumnDef<Signal> {
        ColumnDef::new("chain", "Chain", |s: &Signal| CellValue::from(s.chain)).filterable(FilterKind::MultiSelect)
    }

    #[test]
    fn test_distinct_values_in_first_seen_order() {
        let options = derive_facet_options(&rows(), &chain_column());
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["solana", "bsc", "base"]);
    }

    #[test]
    fn test_empty_option_counts_missing_values() {
        let column = ColumnDef::new("dog", "Dog", |s: &Signal| CellValue::from(s.dog))
            .filterable(FilterKind::MultiSelect)
            .empty_option("None");

        let rows = rows();
        let options = derive_facet_options(&rows, &column);
        assert_eq!(options.last(), Some(&FacetOption::new("None", "")));
        assert_eq!(facet_counts(&rows, &column, &options), vec![1, 1, 2]);
    }

    #[test]
    fn test_bucket_and_boolean_options() {
        let buckets = vec![
            NumericBucket::new("zero", "Zero", BucketRange::Exactly(0.0)),
            NumericBucket::new(">1000", ">1000s", BucketRange::Above(1000.0)),
        ];
        let column = ColumnDef::new("zero", "Zero", |s: &Signal| s.zero.into()).filterable(FilterKind::Buckets(buckets));
        let rows = rows();
        let options = derive_facet_options(&rows, &column);
        assert_eq!(options[0], FacetOption::new("Zero", "zero"));
        assert_eq!(facet_counts(&rows, &column, &options), vec![2, 1]);

        let column = ColumnDef::new("flag", "Flag", |s: &Signal| (s.zero > 0.0).into()).filterable(FilterKind::Boolean);
        let options = derive_facet_options(&rows, &column);
        assert_eq!(options[0].value, "true");
        assert_eq!(facet_counts(&rows, &column, &options), vec![2, 2]);
    }

    #[test]
    fn test_static_options_win() {
        let column = chain_column().options(vec![FacetOption::same("ethereum")]);
        assert_eq!(derive_facet_options(&rows(), &column), vec![FacetOption::same("ethereum")]);
    }

    #[test]
    fn test_cache_rederives_on_new_generation() {
        let cache = FacetCache::new();
        let first = cache.get_or_derive(1, "chain", || vec![FacetOption::same("solana")]);
        let again = cache.get_or_derive(1, "chain", || vec![FacetOption::same("unused")]);
        assert_eq!(first, again);

        let next = cache.get_or_derive(2, "chain", || vec![FacetOption::same("bsc")]);
        assert_eq!(next.as_slice(), &[FacetOption::same("bsc")]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_counts_cached_per_generation() {
        let cache = FacetCache::new();
        let mut runs = 0;
        let mut count = |n: usize| {
            runs += 1;
            vec![n]
        };

        assert_eq!(*cache.get_or_count(1, "chain", || count(3)), vec![3]);
        assert_eq!(*cache.get_or_count(1, "chain", || count(9)), vec![3]);
        assert_eq!(*cache.get_or_count(2, "chain", || count(4)), vec![4]);
        assert_eq!(runs, 2);

        cache.clear();
        assert_eq!(*cache.get_or_count(2, "chain", || vec![7]), vec![7]);
    }
}
