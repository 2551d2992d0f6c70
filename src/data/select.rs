use super::model::Table;

/// A column name that is not part of the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column '{0}' not found in table")]
pub struct ColumnNotFoundError(pub String);

/// Project `table` onto `selection`, in selection order.
///
/// An empty selection yields a table with no columns (and no rows to show);
/// that is a valid state, not an error.
pub fn select_columns<S: AsRef<str>>(
    table: &Table,
    selection: &[S],
) -> Result<Table, ColumnNotFoundError> {
    let columns = selection
        .iter()
        .map(|name| {
            table
                .column(name.as_ref())
                .cloned()
                .ok_or_else(|| ColumnNotFoundError(name.as_ref().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let n_rows = if columns.is_empty() { 0 } else { table.n_rows() };
    Ok(Table::from_parts(columns, n_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn claims() -> Table {
        Table::new(vec![
            Column::numeric("claim_nb", [Some(1.0), Some(0.0), Some(2.0)]),
            Column::numeric("claim_amount", [Some(100.0), Some(0.0), Some(300.0)]),
            Column::text("pol_insee_code", [Some("75056"), None, Some("13055")]),
        ])
        .unwrap()
    }

    #[test]
    fn keeps_row_count_and_selection_order() {
        let table = claims();
        let out = select_columns(&table, &["pol_insee_code", "claim_nb"]).unwrap();
        assert_eq!(out.n_cols(), 2);
        assert_eq!(out.n_rows(), 3);
        assert_eq!(
            out.column_names().collect::<Vec<_>>(),
            vec!["pol_insee_code", "claim_nb"]
        );
    }

    #[test]
    fn every_non_empty_subset_has_its_size() {
        let table = claims();
        let names: Vec<String> = table.column_names().map(str::to_string).collect();
        for mask in 1u32..(1 << names.len()) {
            let subset: Vec<&String> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, n)| n)
                .collect();
            let out = select_columns(&table, &subset).unwrap();
            assert_eq!(out.n_cols(), subset.len());
            assert_eq!(out.n_rows(), table.n_rows());
        }
    }

    #[test]
    fn empty_selection_shows_nothing() {
        let out = select_columns::<&str>(&claims(), &[]).unwrap();
        assert_eq!(out.n_cols(), 0);
        assert_eq!(out.n_rows(), 0);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = select_columns(&claims(), &["claim_nb", "LAT"]).unwrap_err();
        assert_eq!(err, ColumnNotFoundError("LAT".into()));
    }
}
