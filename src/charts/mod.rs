//! Chart adapters: pure functions from a table and column choices to a
//! chart specification the UI knows how to draw.
//!
//! Every adapter checks its inputs first. A missing or non-numeric column
//! yields a [`MissingColumnError`], which the view shows as a warning in
//! place of that one chart.

use std::fmt;

use serde::Serialize;

use crate::data::model::{Column, Table};

pub mod boxplot;
pub mod correlation;
pub mod geo;
pub mod histogram;
pub mod pairplot;

pub use boxplot::{BoxPlotSpec, BoxStats, boxplot};
pub use correlation::{CorrelationSpec, correlation};
pub use geo::{GeoPoint, GeoSpec, SIZE_COLUMN, geo_scatter};
pub use histogram::{DEFAULT_BINS, HistogramBin, HistogramSpec, histogram};
pub use pairplot::{PairPanel, PairPlotSpec, pairplot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    BoxPlot,
    Correlation,
    PairPlot,
    Geographic,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartKind::Histogram => "histogram",
            ChartKind::BoxPlot => "boxplot",
            ChartKind::Correlation => "correlation heatmap",
            ChartKind::PairPlot => "pairplot",
            ChartKind::Geographic => "map",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    Absent,
    NotNumeric,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissingReason::Absent => "is missing",
            MissingReason::NotNumeric => "is not numeric",
        })
    }
}

/// A chart could not be built because a column it needs is absent or of
/// the wrong type. Non-fatal: only that chart is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{chart}: column '{column}' {reason}")]
pub struct MissingColumnError {
    pub chart: ChartKind,
    pub column: String,
    pub reason: MissingReason,
}

/// Look up a column the chart requires to be numeric.
pub(crate) fn require_numeric<'a>(
    table: &'a Table,
    column: &str,
    chart: ChartKind,
) -> Result<&'a Column, MissingColumnError> {
    let err = |reason| MissingColumnError {
        chart,
        column: column.to_string(),
        reason,
    };
    let col = table.column(column).ok_or_else(|| err(MissingReason::Absent))?;
    if !col.is_numeric() {
        return Err(err(MissingReason::NotNumeric));
    }
    Ok(col)
}

/// Pairs `(x, y)` over the rows where both columns have a value.
pub(crate) fn complete_pairs(x: &Column, y: &Column) -> Vec<(f64, f64)> {
    x.values
        .iter()
        .zip(&y.values)
        .filter_map(|(a, b)| Some((a.as_f64()?, b.as_f64()?)))
        .collect()
}
