use std::fmt;

use super::model::{Column, Table};
use super::select::ColumnNotFoundError;

// ---------------------------------------------------------------------------
// ValueRange – closed interval [lo, hi]
// ---------------------------------------------------------------------------

/// Inclusive numeric interval. Always `lo <= hi`, never NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    lo: f64,
    hi: f64,
}

impl ValueRange {
    /// Every number.
    pub const ALL: ValueRange = ValueRange {
        lo: f64::NEG_INFINITY,
        hi: f64::INFINITY,
    };

    /// `None` when either bound is NaN or `lo > hi`.
    pub fn new(lo: f64, hi: f64) -> Option<Self> {
        (lo <= hi).then_some(Self { lo, hi })
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// The full observed range of a numeric column, used as the slider bounds
/// and as the default selection.
pub fn observed_range(table: &Table, column: &str) -> Result<Option<ValueRange>, ColumnNotFoundError> {
    let col = numeric_column(table, column)?;
    Ok(col.min_max().and_then(|(lo, hi)| ValueRange::new(lo, hi)))
}

// ---------------------------------------------------------------------------
// Range filter
// ---------------------------------------------------------------------------

/// The chosen column holds a single distinct value (or none), so a range
/// over it cannot select anything meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct DegenerateRangeWarning {
    pub column: String,
    /// The single value, if the column has any.
    pub value: Option<f64>,
}

impl fmt::Display for DegenerateRangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(
                f,
                "column '{}' holds a single value ({v}); filtering is disabled",
                self.column
            ),
            None => write!(f, "column '{}' has no values; filtering is disabled", self.column),
        }
    }
}

/// Result of [`filter_range`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// Rows whose value lies in the range.
    Filtered(Table),
    /// The filter was skipped; `table` is the input, unchanged.
    Degenerate {
        warning: DegenerateRangeWarning,
        table: Table,
    },
}

impl FilterOutcome {
    /// The resulting table, whether or not the filter applied.
    pub fn table(&self) -> &Table {
        match self {
            FilterOutcome::Filtered(t) | FilterOutcome::Degenerate { table: t, .. } => t,
        }
    }

    pub fn warning(&self) -> Option<&DegenerateRangeWarning> {
        match self {
            FilterOutcome::Filtered(_) => None,
            FilterOutcome::Degenerate { warning, .. } => Some(warning),
        }
    }
}

/// Keep the rows of `table` where `range.lo <= table[column] <= range.hi`.
///
/// Rows with a missing value in `column` are dropped. If the column's min
/// equals its max the filter is skipped and the table returned unchanged
/// alongside a [`DegenerateRangeWarning`].
pub fn filter_range(
    table: &Table,
    column: &str,
    range: ValueRange,
) -> Result<FilterOutcome, ColumnNotFoundError> {
    let col = numeric_column(table, column)?;

    match col.min_max() {
        Some((lo, hi)) if lo < hi => {}
        observed => {
            let warning = DegenerateRangeWarning {
                column: column.to_string(),
                value: observed.map(|(lo, _)| lo),
            };
            log::warn!("{warning}");
            return Ok(FilterOutcome::Degenerate {
                warning,
                table: table.clone(),
            });
        }
    }

    let rows: Vec<usize> = col
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.as_f64().is_some_and(|x| range.contains(x)))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "Range filter {column} in {range}: {} of {} rows kept",
        rows.len(),
        table.n_rows()
    );
    Ok(FilterOutcome::Filtered(table.take_rows(&rows)))
}

/// Only numeric columns can be range-filtered; the UI never offers text
/// columns, so one showing up here is reported like an unknown column.
fn numeric_column<'a>(table: &'a Table, column: &str) -> Result<&'a Column, ColumnNotFoundError> {
    table
        .column(column)
        .filter(|c| c.is_numeric())
        .ok_or_else(|| ColumnNotFoundError(column.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn claims() -> Table {
        Table::new(vec![
            Column::numeric("claim_nb", [Some(1.0), Some(0.0), Some(2.0)]),
            Column::numeric("claim_amount", [Some(100.0), Some(0.0), Some(300.0)]),
            Column::numeric("TX", [Some(5.0), Some(5.0), Some(7.0)]),
            Column::numeric("RR", [Some(1.0), Some(1.0), Some(1.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn value_range_rejects_inverted_and_nan_bounds() {
        assert!(ValueRange::new(2.0, 1.0).is_none());
        assert!(ValueRange::new(f64::NAN, 1.0).is_none());
        assert!(ValueRange::new(1.0, 1.0).is_some());
    }

    #[test]
    fn filters_claim_amount_scenario() {
        let table = claims();
        let out = filter_range(&table, "claim_amount", ValueRange::new(100.0, 300.0).unwrap())
            .unwrap();
        let FilterOutcome::Filtered(filtered) = out else {
            panic!("expected a filtered table");
        };
        assert_eq!(filtered.n_rows(), 2);
        assert_eq!(
            filtered.column("claim_nb").unwrap().values,
            vec![Value::Number(1.0), Value::Number(2.0)]
        );
        assert_eq!(
            filtered.column("claim_amount").unwrap().values,
            vec![Value::Number(100.0), Value::Number(300.0)]
        );
        assert_eq!(filtered.n_cols(), 4);
    }

    #[test]
    fn output_rows_are_exactly_the_rows_in_range() {
        let values = [Some(-3.0), None, Some(0.5), Some(2.0), Some(2.0), Some(9.0), None];
        let table = Table::new(vec![
            Column::numeric("x", values),
            Column::numeric("id", (0..values.len()).map(|i| Some(i as f64))),
        ])
        .unwrap();

        for (lo, hi) in [(-5.0, 10.0), (0.0, 2.0), (2.0, 2.0), (3.0, 8.0), (-3.0, -3.0)] {
            let range = ValueRange::new(lo, hi).unwrap();
            let out = filter_range(&table, "x", range).unwrap();
            let kept: Vec<f64> = out.table().column("id").unwrap().numbers().collect();
            let expected: Vec<f64> = values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_some_and(|x| range.contains(x)))
                .map(|(i, _)| i as f64)
                .collect();
            assert_eq!(kept, expected, "range {range}");
        }
    }

    #[test]
    fn degenerate_column_returns_table_unchanged() {
        let table = claims();
        let out = filter_range(&table, "RR", ValueRange::new(0.0, 0.5).unwrap()).unwrap();
        assert_eq!(
            out.warning(),
            Some(&DegenerateRangeWarning {
                column: "RR".into(),
                value: Some(1.0)
            })
        );
        assert_eq!(out.table(), &table);
    }

    #[test]
    fn all_missing_column_is_degenerate() {
        let table = Table::new(vec![Column::numeric("x", [None, None])]).unwrap();
        let out = filter_range(&table, "x", ValueRange::new(0.0, 1.0).unwrap()).unwrap();
        assert_eq!(out.warning().map(|w| w.value), Some(None));
    }

    #[test]
    fn text_or_unknown_columns_are_rejected() {
        let table = Table::new(vec![Column::text("code", [Some("a"), Some("b")])]).unwrap();
        let range = ValueRange::new(0.0, 1.0).unwrap();
        assert!(filter_range(&table, "code", range).is_err());
        assert!(filter_range(&table, "missing", range).is_err());
    }

    #[test]
    fn observed_range_spans_the_column() {
        let range = observed_range(&claims(), "claim_amount").unwrap().unwrap();
        assert_eq!((range.lo(), range.hi()), (0.0, 300.0));
    }
}
