use dg_core::{
    BadgeRule, CellValue, ColumnDef, ColumnKind, ColumnSet, DetailBinding, FilterKind, GridState, SortDirection,
    SortState, SortType,
};

use super::options::alert_options;
use super::{debot_link, ADDRESS_CHARS};
use crate::models::{KolDetail, KolTokenRow};

/// Page sizes offered under the KOL token grid
pub const KOL_TOKEN_PAGE_SIZES: [usize; 5] = [5, 10, 20, 50, 100];

/// Page sizes offered under a nested KOL table
pub const KOL_DETAIL_PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

/// Columns of the KOL token grid. The search box matches any KOL's name or
/// username.
pub fn kol_token_columns() -> ColumnSet<KolTokenRow> {
    ColumnSet::new(vec![
        ColumnDef::display("expander", ""),
        ColumnDef::new("symbol", "Symbol", |k: &KolTokenRow| CellValue::from(&k.symbol)).kind(ColumnKind::Image),
        ColumnDef::new("token_name", "Token Name", |k: &KolTokenRow| CellValue::from(&k.token_name))
            .sortable(SortType::Text),
        ColumnDef::new("token_address", "Token Address", |k: &KolTokenRow| {
            CellValue::from(&k.token_address)
        })
        .kind(ColumnKind::Link {
            max_chars: ADDRESS_CHARS,
        })
        .link(|k: &KolTokenRow| debot_link(&k.chain, &k.token_address)),
        ColumnDef::new("chain", "Chain", |k: &KolTokenRow| CellValue::from(&k.chain)).filterable(FilterKind::MultiSelect),
        ColumnDef::new("is_signaled", "Signal", |k: &KolTokenRow| k.is_signaled.into())
            .kind(ColumnKind::Badge(BadgeRule::YesNo))
            .filterable(FilterKind::Boolean)
            .options(alert_options()),
        ColumnDef::new("buy_sum_counts", "Total Buy Counts", |k: &KolTokenRow| k.buy_sum_counts.into())
            .kind(ColumnKind::Numeric {
                decimals: 0,
                grouping: false,
            })
            .sortable(SortType::Basic),
        ColumnDef::new("kols_count", "KOLs Count", |k: &KolTokenRow| k.kols_count().into())
            .kind(ColumnKind::Numeric {
                decimals: 0,
                grouping: false,
            })
            .sortable(SortType::Basic),
    ])
    .with_search(KolTokenRow::kol_search_fields)
}

/// Columns of the nested per-token KOL table
pub fn kol_detail_columns() -> ColumnSet<KolDetail> {
    ColumnSet::new(vec![
        ColumnDef::new("avatar", "Avatar", |k: &KolDetail| CellValue::from(&k.avatar))
            .kind(ColumnKind::Image)
            .hideable(false),
        ColumnDef::new("twitter_name", "Name", |k: &KolDetail| CellValue::from(&k.twitter_name)),
        ColumnDef::new("twitter_username", "Username", |k: &KolDetail| CellValue::from(&k.twitter_username))
            .kind(ColumnKind::Handle),
        ColumnDef::new("chain", "Chain", |k: &KolDetail| CellValue::from(&k.chain)),
        ColumnDef::new("buy_counts", "Buy Counts", |k: &KolDetail| k.buy_counts.into())
            .kind(ColumnKind::Numeric {
                decimals: 0,
                grouping: false,
            })
            .sortable(SortType::Basic)
            .sort_descending_first(),
        ColumnDef::new("store_time", "Date", |k: &KolDetail| CellValue::from(&k.store_time)).sortable(SortType::Text),
    ])
    .with_search(|k: &KolDetail| vec![k.twitter_name.as_str(), k.twitter_username.as_str()])
}

/// Initial state of a nested KOL table: most buys first, `page_size` rows
pub fn kol_detail_state(page_size: usize) -> GridState {
    GridState::default()
        .with_page_size(page_size)
        .with_sort(SortState::by("buy_counts", SortDirection::Descending))
}

/// Nested KOL tables for the KOL token grid
pub fn kol_detail_binding(page_size: usize) -> DetailBinding<KolTokenRow, KolDetail> {
    DetailBinding::new(
        kol_detail_columns(),
        |k: &KolTokenRow| k.kols_details.as_slice(),
        kol_detail_state(page_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{DataGrid, GridAction, RowId};

    fn kol(name: &str, username: &str, buys: u64) -> KolDetail {
        KolDetail {
            address: format!("{username}-addr"),
            twitter_name: name.to_string(),
            twitter_username: username.to_string(),
            buy_counts: buys,
            ..Default::default()
        }
    }

    fn token(address: &str, chain: &str, kols: Vec<KolDetail>) -> KolTokenRow {
        KolTokenRow {
            token_address: address.to_string(),
            token_name: address.to_uppercase(),
            chain: chain.to_string(),
            buy_sum_counts: kols.iter().map(|k| k.buy_counts).sum(),
            kols_details: kols,
            ..Default::default()
        }
    }

    fn grid() -> DataGrid<KolTokenRow, KolDetail> {
        let rows = vec![
            token(
                "pepe",
                "ethereum",
                vec![kol("Crypto Whale", "whale", 2), kol("Degen", "degen", 9), kol("Ape", "ape", 4)],
            ),
            token("bonk", "solana", vec![kol("Sol Max", "solmax", 1)]),
            token("wif", "solana", Vec::new()),
        ];
        DataGrid::new("kol-tokens", kol_token_columns(), rows).with_detail(kol_detail_binding(10))
    }

    #[test]
    fn test_search_matches_any_kol_name_or_username() {
        let mut grid = grid();
        grid.dispatch(GridAction::SetSearch("WHALE".into()));
        let names: Vec<&str> = grid.page().rows.iter().map(|r| r.token_name.as_str()).collect();
        assert_eq!(names, vec!["PEPE"]);

        grid.dispatch(GridAction::SetSearch("solmax".into()));
        assert_eq!(grid.page().rows.len(), 1);
    }

    #[test]
    fn test_nested_table_defaults_to_most_buys_first() {
        let mut grid = grid();
        let row = RowId::from("ethereum:pepe");
        grid.dispatch(GridAction::ToggleExpanded(row.clone()));

        let buys: Option<Vec<u64>> = grid.nested_page(&row).map(|p| p.rows.iter().map(|k| k.buy_counts).collect());
        assert_eq!(buys, Some(vec![9, 4, 2]));
    }

    #[test]
    fn test_nested_header_cycle_starts_descending() {
        let mut grid = grid();
        let row = RowId::from("ethereum:pepe");
        grid.dispatch(GridAction::ToggleExpanded(row.clone()));

        // Sorted descending already, so the next click flips to ascending
        grid.dispatch_nested(&row, GridAction::ToggleSort("buy_counts".into()));
        let buys: Option<Vec<u64>> = grid.nested_page(&row).map(|p| p.rows.iter().map(|k| k.buy_counts).collect());
        assert_eq!(buys, Some(vec![2, 4, 9]));
    }

    #[test]
    fn test_token_without_kols_expands_to_empty_table() {
        let mut grid = grid();
        let row = RowId::from("solana:wif");
        grid.dispatch(GridAction::ToggleExpanded(row.clone()));
        assert_eq!(grid.nested_page(&row).map(|p| p.total_len), Some(0));
    }

    #[test]
    fn test_chain_options_from_rows() {
        let grid = grid();
        let values: Vec<String> = grid.facet_options("chain").iter().map(|o| o.value.clone()).collect();
        assert_eq!(values, vec!["ethereum", "solana"]);
    }
}
