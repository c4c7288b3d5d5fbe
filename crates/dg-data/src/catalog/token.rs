use chrono::NaiveDate;
use dg_core::{BadgeRule, CellValue, ColumnDef, ColumnKind, ColumnSet, FilterKind, SortType};

use super::options::{alert_options, chain_options, platform_options, store_time_options, zero_time_buckets};
use super::{debot_link, ADDRESS_CHARS};
use crate::models::TokenRow;

/// Columns of the token listing grid; store-time options count back from `today`
pub fn token_columns(today: NaiveDate) -> ColumnSet<TokenRow> {
    ColumnSet::new(vec![
        ColumnDef::new("storeTime", "Store Time", |t: &TokenRow| CellValue::from(&t.store_time))
            .sortable(SortType::Text)
            .filterable(FilterKind::MultiSelect)
            .options(store_time_options(today)),
        ColumnDef::new("platform", "Platform", |t: &TokenRow| CellValue::from(&t.platform))
            .filterable(FilterKind::MultiSelect)
            .options(platform_options()),
        ColumnDef::new("name", "Token Name", |t: &TokenRow| CellValue::from(&t.name)).filterable(FilterKind::Text),
        ColumnDef::new("address", "Address", |t: &TokenRow| CellValue::from(&t.address))
            .kind(ColumnKind::Link {
                max_chars: ADDRESS_CHARS,
            })
            .link(|t: &TokenRow| debot_link(&t.chain, &t.address)),
        ColumnDef::new("chain", "Chain", |t: &TokenRow| CellValue::from(&t.chain))
            .filterable(FilterKind::MultiSelect)
            .options(chain_options()),
        ColumnDef::new("tradingVolume", "Trading Volume", |t: &TokenRow| t.trading_volume.into())
            .kind(ColumnKind::Numeric {
                decimals: 2,
                grouping: true,
            })
            .sortable(SortType::Basic),
        ColumnDef::new("tradingCount", "Trading Count", |t: &TokenRow| t.trading_count.into())
            .kind(ColumnKind::Numeric {
                decimals: 0,
                grouping: true,
            })
            .sortable(SortType::Basic),
        ColumnDef::new("alert", "Signal", |t: &TokenRow| t.alert.into())
            .kind(ColumnKind::Badge(BadgeRule::YesNo))
            .filterable(FilterKind::Boolean)
            .options(alert_options()),
        ColumnDef::new("zeroTimeSeconds", "Zero Time", |t: &TokenRow| t.metadata.zero_time_seconds.into())
            .kind(ColumnKind::Duration)
            .sortable(SortType::Basic)
            .filterable(FilterKind::Buckets(zero_time_buckets())),
        ColumnDef::display("details", "Details").tooltip(TokenRow::detail_lines),
    ])
    .with_search(|t: &TokenRow| vec![t.name.as_str()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{DataGrid, FilterValue, GridAction, NoDetail};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn row(id: u64, chain: &str, zero: f64, alert: bool) -> TokenRow {
        let mut row = TokenRow {
            id,
            name: format!("Token {id}"),
            address: format!("0x{id:040x}"),
            chain: chain.to_string(),
            alert,
            ..Default::default()
        };
        row.metadata.zero_time_seconds = zero;
        row
    }

    #[test]
    fn test_zero_time_filter_through_grid() {
        let rows = vec![
            row(1, "Solana", 0.0, true),
            row(2, "Solana", 500.0, true),
            row(3, "Solana", 1500.0, false),
            row(4, "Solana", 0.0, false),
        ];
        let mut grid: DataGrid<TokenRow, NoDetail> = DataGrid::new("tokens", token_columns(today()), rows);
        grid.dispatch(GridAction::SetFilter {
            column: "zeroTimeSeconds".into(),
            value: FilterValue::values(["zero", "0-1000"]),
        });

        let ids: Vec<u64> = grid.page().rows.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_static_options_and_alert_filter() {
        let rows = vec![row(1, "BSC", 0.0, true), row(2, "BSC", 0.0, false)];
        let mut grid: DataGrid<TokenRow, NoDetail> = DataGrid::new("tokens", token_columns(today()), rows);

        assert_eq!(grid.facet_options("platform").len(), 5);
        assert_eq!(grid.facet_options("storeTime").len(), 12);

        grid.dispatch(GridAction::ToggleFacetValue {
            column: "alert".into(),
            value: "false".into(),
        });
        assert_eq!(grid.page().rows.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_address_cell_links_to_debot() {
        let columns = token_columns(today());
        let token = row(9, "Solana", 0.0, true);
        let cell = columns.get("address").map(|c| c.render(&token));

        assert_eq!(
            cell.as_ref().and_then(|c| c.href.clone()),
            Some(debot_link("Solana", &token.address))
        );
        assert!(cell.is_some_and(|c| c.full_text.is_some()));
    }
}
