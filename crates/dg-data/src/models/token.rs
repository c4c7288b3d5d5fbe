use dg_core::format::{format_cell, format_number, ColumnKind, EMPTY_DATE};
use dg_core::{CellValue, GridRow, RowId};
use serde::{Deserialize, Serialize};

/// Debot statistics attached to a listed token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenMetadata {
    /// RFC 3339, empty when the token never alerted
    pub first_alert_time: String,
    /// RFC 3339, empty when never traded
    pub first_transaction_time: String,
    pub alert_count: u64,
    pub debot_volume: f64,
    pub debot_transactions: u64,
    pub max_price_increase: f64,
    pub max_price: f64,
    pub dog: Option<String>,
    pub zero_time_seconds: f64,
}

/// A token listed on a trading platform on a given day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenRow {
    pub id: u64,
    /// `YYYY-MM-DD`
    pub store_time: String,
    pub platform: String,
    pub name: String,
    pub address: String,
    pub chain: String,
    pub trading_volume: f64,
    pub trading_count: u64,
    pub alert: bool,
    pub metadata: TokenMetadata,
}

impl GridRow for TokenRow {
    fn row_id(&self) -> RowId {
        RowId::from(self.id)
    }
}

impl TokenRow {
    /// Hover details for the "Details" column
    pub fn detail_lines(&self) -> Vec<(String, String)> {
        let meta = &self.metadata;
        let date = |value: &str| {
            if value.is_empty() {
                EMPTY_DATE.to_string()
            } else {
                format_cell(&ColumnKind::Date, &CellValue::from(value)).text
            }
        };

        vec![
            ("First Alert Time".to_string(), date(&meta.first_alert_time)),
            ("First Transaction Time".to_string(), date(&meta.first_transaction_time)),
            ("Alert Count".to_string(), meta.alert_count.to_string()),
            ("Debot Volume".to_string(), format_number(meta.debot_volume, 2, true)),
            ("Debot Transactions".to_string(), format_number(meta.debot_transactions as f64, 0, true)),
            (
                "Max Price Increase".to_string(),
                format!("{}%", format_number(meta.max_price_increase, 2, true)),
            ),
            ("Max Price".to_string(), format!("${}", format_number(meta.max_price, 2, true))),
            ("Dog".to_string(), meta.dog.clone().unwrap_or_default()),
            ("Zero Time".to_string(), format!("{} seconds", format_number(meta.zero_time_seconds, 0, false))),
        ]
    }
}
