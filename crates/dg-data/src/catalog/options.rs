//! Fixed facet option lists

use chrono::{Months, NaiveDate};
use dg_core::{BucketRange, FacetOption, NumericBucket};

pub const PLATFORMS: [&str; 5] = ["Binance", "Uniswap", "PancakeSwap", "Kucoin", "Kraken"];

pub const CHAINS: [&str; 5] = ["Ethereum", "BSC", "Polygon", "Solana", "Avalanche"];

/// Number of monthly store dates offered
pub const STORE_TIME_MONTHS: u32 = 12;

pub fn platform_options() -> Vec<FacetOption> {
    PLATFORMS.iter().map(|p| FacetOption::same(*p)).collect()
}

pub fn chain_options() -> Vec<FacetOption> {
    CHAINS.iter().map(|c| FacetOption::same(*c)).collect()
}

/// Signal yes/no, matched against stringified booleans
pub fn alert_options() -> Vec<FacetOption> {
    vec![FacetOption::new("Yes", "true"), FacetOption::new("No", "false")]
}

/// Zero-time buckets: never zeroed, zeroed within 1000s, zeroed later
pub fn zero_time_buckets() -> Vec<NumericBucket> {
    vec![
        NumericBucket::new("zero", "Not zeroed", BucketRange::Exactly(0.0)),
        NumericBucket::new(
            "0-1000",
            "0-1000s",
            BucketRange::Between {
                above: 0.0,
                at_most: 1000.0,
            },
        ),
        NumericBucket::new(">1000", ">1000s", BucketRange::Above(1000.0)),
    ]
}

/// Same day of each of the last twelve months, starting with `today`.
/// Days past the end of a shorter month clamp to its last day.
pub fn store_time_options(today: NaiveDate) -> Vec<FacetOption> {
    (0..STORE_TIME_MONTHS)
        .filter_map(|i| today.checked_sub_months(Months::new(i)))
        .map(|date| FacetOption::same(date.format("%Y-%m-%d").to_string()))
        .collect()
}
