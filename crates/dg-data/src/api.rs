//! Summary API payloads and their flattening into grid rows

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::models::{SignalRow, TokenMetadata, TokenRow};

/// Envelope returned by the token-summary endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenSummaryResponse {
    pub code: i64,
    pub description: String,
    pub data: Vec<TokenSummaryDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenSummaryDay {
    /// Epoch seconds
    pub date: i64,
    pub platforms: Vec<PlatformSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlatformSummary {
    pub platform_name: String,
    pub tokens: Vec<SummaryToken>,
    pub total_volume: f64,
    pub total_trades: u64,
    pub avg_volume: f64,
    pub tokens_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryToken {
    pub token_name: String,
    pub token_address: String,
    pub trade_volume: f64,
    pub trade_count: u64,
    pub is_signaled: bool,
    pub token_debot_info: Option<DebotInfo>,
    pub chain: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebotInfo {
    pub chain: String,
    pub first_signal_time: Option<i64>,
    pub first_trade_time: Option<i64>,
    pub signal_count: u64,
    pub trade_volume: f64,
    pub trade_count: u64,
    pub max_increase: Option<f64>,
    pub max_price: Option<f64>,
    pub dog: Option<String>,
    pub to_zero_seconds: Option<f64>,
}

impl TokenSummaryResponse {
    /// Flatten days and platforms into token rows with ids counting from 1
    pub fn into_rows(self) -> Vec<TokenRow> {
        let mut rows = Vec::new();
        let mut next_id = 1;

        for day in self.data {
            let store_time = epoch_to_day(day.date);
            for platform in day.platforms {
                for token in platform.tokens {
                    rows.push(TokenRow {
                        id: next_id,
                        store_time: store_time.clone(),
                        platform: platform.platform_name.clone(),
                        name: token.token_name,
                        address: token.token_address,
                        chain: token.chain,
                        trading_volume: token.trade_volume,
                        trading_count: token.trade_count,
                        alert: token.is_signaled,
                        metadata: token.token_debot_info.map(DebotInfo::into_metadata).unwrap_or_default(),
                    });
                    next_id += 1;
                }
            }
        }

        rows
    }
}

impl DebotInfo {
    fn into_metadata(self) -> TokenMetadata {
        TokenMetadata {
            first_alert_time: self.first_signal_time.map(epoch_to_rfc3339).unwrap_or_default(),
            first_transaction_time: self.first_trade_time.map(epoch_to_rfc3339).unwrap_or_default(),
            alert_count: self.signal_count,
            debot_volume: self.trade_volume,
            debot_transactions: self.trade_count,
            max_price_increase: self.max_increase.unwrap_or_default(),
            max_price: self.max_price.unwrap_or_default(),
            dog: self.dog.filter(|dog| !dog.is_empty()),
            zero_time_seconds: self.to_zero_seconds.unwrap_or_default(),
        }
    }
}

/// Envelope returned by the signal-summary endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignalSummaryResponse {
    pub code: i64,
    pub description: String,
    pub data: Vec<SignalDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignalDay {
    pub date: i64,
    pub signals: DaySignals,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaySignals {
    /// `YYYY-MM-DD`
    pub store_time: String,
    pub data_by_chain: Vec<ChainSignals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChainSignals {
    pub chain_name: String,
    pub total_signals: Vec<TimeRangeSignals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimeRangeSignals {
    pub time_range: String,
    pub count: u64,
    pub signal_count: u64,
    pub tokens_info: Vec<SignalRow>,
}

impl SignalSummaryResponse {
    /// Every signalled token, tagged with its day and time range
    pub fn into_rows(self) -> Vec<SignalRow> {
        let mut rows = Vec::new();
        for day in self.data {
            let date = day.signals.store_time;
            for chain in day.signals.data_by_chain {
                for range in chain.total_signals {
                    for token in range.tokens_info {
                        rows.push(SignalRow {
                            date: date.clone(),
                            time_range: range.time_range.clone(),
                            ..token
                        });
                    }
                }
            }
        }
        rows
    }
}

/// UTC calendar day of an epoch timestamp, `YYYY-MM-DD`
fn epoch_to_day(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Zero means "never", which renders as an empty string
fn epoch_to_rfc3339(secs: i64) -> String {
    if secs == 0 {
        return String::new();
    }
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_SUMMARY: &str = r#"{
        "code": 200,
        "description": "ok",
        "data": [{
            "date": 1714521600,
            "platforms": [
                {"platform_name": "Binance", "tokens": [
                    {"token_name": "PEPE", "token_address": "0xabc", "trade_volume": 10.5, "trade_count": 3,
                     "is_signaled": true, "chain": "ethereum",
                     "token_debot_info": {"chain": "ethereum", "first_signal_time": 1714525200,
                        "first_trade_time": null, "signal_count": 2, "trade_volume": 5.0, "trade_count": 1,
                        "max_increase": null, "max_price": 0.01, "dog": "", "to_zero_seconds": null}}
                ], "total_volume": 10.5, "total_trades": 3, "avg_volume": 10.5, "tokens_count": 1},
                {"platform_name": "Uniswap", "tokens": [
                    {"token_name": "DOGE", "token_address": "0xdef", "trade_volume": 1.0, "trade_count": 1,
                     "is_signaled": false, "chain": "bsc", "token_debot_info": null}
                ]}
            ]
        }]
    }"#;

    #[test]
    fn test_token_summary_flattens_with_sequential_ids() {
        let response: TokenSummaryResponse = serde_json::from_str(TOKEN_SUMMARY).unwrap();
        let rows = response.into_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[0].store_time, "2024-05-01");
        assert_eq!(rows[0].platform, "Binance");
        assert_eq!(rows[1].platform, "Uniswap");
        assert!(rows[0].alert);
    }

    #[test]
    fn test_debot_info_nulls_become_defaults() {
        let response: TokenSummaryResponse = serde_json::from_str(TOKEN_SUMMARY).unwrap();
        let rows = response.into_rows();

        let meta = &rows[0].metadata;
        assert_eq!(meta.first_alert_time, "2024-05-01T01:00:00.000Z");
        assert_eq!(meta.first_transaction_time, "");
        assert_eq!(meta.alert_count, 2);
        assert_eq!(meta.max_price_increase, 0.0);
        assert_eq!(meta.max_price, 0.01);
        assert_eq!(meta.dog, None);

        assert_eq!(rows[1].metadata, TokenMetadata::default());
    }

    #[test]
    fn test_signal_summary_tags_rows_with_date_and_range() {
        let response: SignalSummaryResponse = serde_json::from_str(
            r#"{"code": 200, "data": [{"date": 1714521600, "signals": {"store_time": "2024-05-01",
                "data_by_chain": [{"chain_name": "solana", "total_signals": [
                    {"time_range": "00:00-04:00", "count": 2, "signal_count": 2, "tokens_info": [
                        {"token_name": "BONK", "chain": "solana", "symbol": "BONK", "first_signal_time": 1714521700,
                         "dog": "金狗", "transaction_amount": 5, "transaction_count": 2, "max_increase": 0.5,
                         "max_price": 0.0001, "to_zero_seconds": 0},
                        {"token_name": "WIF", "chain": "solana", "symbol": "WIF", "dog": null}
                    ]}
                ]}]}}]}"#,
        )
        .unwrap();

        let rows = response.into_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.date == "2024-05-01" && r.time_range == "00:00-04:00"));
        assert_eq!(rows[0].dog.as_deref(), Some("金狗"));
        assert_eq!(rows[1].first_signal_time, None);
    }

    #[test]
    fn test_empty_payload() {
        let response: TokenSummaryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_rows().is_empty());
    }
}
