use dg_core::{BadgeRule, CellValue, ColumnDef, ColumnKind, ColumnSet, FilterKind, SortType};

use crate::models::SignalRow;

/// Columns of the signal grid. Chain, time range and dog facets list the
/// values present in the loaded rows; dog also offers "None".
pub fn signal_columns() -> ColumnSet<SignalRow> {
    ColumnSet::new(vec![
        ColumnDef::new("token_name", "Token Name", |s: &SignalRow| CellValue::from(&s.token_name)),
        ColumnDef::new("chain", "Chain", |s: &SignalRow| CellValue::from(&s.chain)).filterable(FilterKind::MultiSelect),
        ColumnDef::new("symbol", "Symbol", |s: &SignalRow| CellValue::from(&s.symbol)),
        ColumnDef::new("first_signal_time", "First Signal Time", |s: &SignalRow| {
            s.first_signal_time.map(CellValue::Timestamp).unwrap_or_default()
        })
        .kind(ColumnKind::Date)
        .sortable(SortType::Datetime),
        ColumnDef::new("dog", "Dog", |s: &SignalRow| CellValue::from(s.dog.as_ref()))
            .kind(ColumnKind::Badge(BadgeRule::DogTier))
            .filterable(FilterKind::MultiSelect)
            .empty_option("None"),
        ColumnDef::new("transaction_amount", "Transaction Amount", |s: &SignalRow| {
            s.transaction_amount.into()
        })
        .kind(ColumnKind::Numeric {
            decimals: 2,
            grouping: true,
        })
        .sortable(SortType::Basic),
        ColumnDef::new("transaction_count", "Transaction Count", |s: &SignalRow| s.transaction_count.into())
            .kind(ColumnKind::Numeric {
                decimals: 0,
                grouping: false,
            })
            .sortable(SortType::Basic),
        ColumnDef::new("max_increase", "Max Increase", |s: &SignalRow| s.max_increase.into())
            .kind(ColumnKind::Percent { decimals: 2 })
            .sortable(SortType::Basic),
        ColumnDef::new("max_price", "Max Price", |s: &SignalRow| s.max_price.into())
            .kind(ColumnKind::Numeric {
                decimals: 6,
                grouping: true,
            })
            .sortable(SortType::Basic),
        ColumnDef::new("to_zero_seconds", "To Zero Seconds", |s: &SignalRow| s.to_zero_seconds.into())
            .kind(ColumnKind::Duration)
            .sortable(SortType::Basic),
        ColumnDef::new("time_range", "Time Range", |s: &SignalRow| CellValue::from(&s.time_range))
            .filterable(FilterKind::MultiSelect),
    ])
    .with_search(|s: &SignalRow| vec![s.token_name.as_str()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{DataGrid, GridAction, NoDetail, SortDirection};

    fn signal(symbol: &str, amount: f64, dog: Option<&str>) -> SignalRow {
        SignalRow {
            token_name: format!("{symbol} token"),
            symbol: symbol.to_string(),
            chain: "solana".to_string(),
            transaction_amount: amount,
            dog: dog.map(str::to_string),
            ..Default::default()
        }
    }

    fn grid(rows: Vec<SignalRow>) -> DataGrid<SignalRow, NoDetail> {
        DataGrid::new("signals", signal_columns(), rows)
    }

    #[test]
    fn test_transaction_amount_descending_keeps_ties() {
        let mut grid = grid(vec![
            signal("A", 5.0, None),
            signal("B", 20.0, None),
            signal("C", 5.0, None),
            signal("D", 1.0, None),
        ]);
        grid.dispatch(GridAction::SetSort(dg_core::SortState::by(
            "transaction_amount",
            SortDirection::Descending,
        )));

        let order: Vec<&str> = grid.page().rows.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_dog_facet_offers_none_option() {
        let mut grid = grid(vec![
            signal("A", 1.0, Some("金狗")),
            signal("B", 1.0, None),
            signal("C", 1.0, Some("银狗")),
        ]);

        let values: Vec<String> = grid.facet_options("dog").iter().map(|o| o.value.clone()).collect();
        assert_eq!(values, vec!["金狗", "银狗", ""]);

        grid.dispatch(GridAction::ToggleFacetValue {
            column: "dog".into(),
            value: String::new(),
        });
        let order: Vec<&str> = grid.page().rows.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(order, vec!["B"]);
    }

    #[test]
    fn test_search_matches_token_name() {
        let mut grid = grid(vec![signal("BONK", 1.0, None), signal("WIF", 1.0, None)]);
        grid.dispatch(GridAction::SetSearch("bonk".into()));
        assert_eq!(grid.page().filtered_len, 1);
    }
}
