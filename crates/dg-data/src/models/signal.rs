use ahash::AHashSet;
use chrono::NaiveDate;
use dg_core::{GridRow, RowId};
use serde::{Deserialize, Serialize};

/// A token that triggered a trading signal within a time range of a day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalRow {
    pub token_name: String,
    pub chain: String,
    pub symbol: String,
    /// Epoch seconds
    pub first_signal_time: Option<i64>,
    pub dog: Option<String>,
    pub transaction_amount: f64,
    pub transaction_count: u64,
    /// Ratio, `0.25` is 25%
    pub max_increase: f64,
    pub max_price: f64,
    pub to_zero_seconds: f64,
    /// Store date the signal belongs to
    pub date: String,
    pub time_range: String,
}

impl GridRow for SignalRow {
    fn row_id(&self) -> RowId {
        RowId::composite(&[&self.chain, &self.symbol, &self.date, &self.time_range])
    }
}

/// Rows belonging to the selected date, in their original order
pub fn rows_for_date(rows: &[SignalRow], date: &str) -> Vec<SignalRow> {
    rows.iter().filter(|row| row.date == date).cloned().collect()
}

/// Distinct dates present in `rows`, newest first
pub fn available_dates(rows: &[SignalRow]) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut dates: Vec<String> = rows
        .iter()
        .filter(|row| seen.insert(row.date.as_str()))
        .map(|row| row.date.clone())
        .collect();

    dates.sort_by(|a, b| {
        let parsed_a = NaiveDate::parse_from_str(a, "%Y-%m-%d").ok();
        let parsed_b = NaiveDate::parse_from_str(b, "%Y-%m-%d").ok();
        parsed_b.cmp(&parsed_a).then_with(|| b.cmp(a))
    });
    dates
}
