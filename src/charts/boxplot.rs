use serde::Serialize;

use super::{ChartKind, MissingColumnError, require_numeric};
use crate::data::model::Table;
use crate::data::stats::{quantile, sorted_numbers};

/// Five-number summary plus whiskers and outliers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Highest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotSpec {
    pub column: String,
    /// `None` when the column has no values.
    pub stats: Option<BoxStats>,
}

pub fn boxplot(table: &Table, column: &str) -> Result<BoxPlotSpec, MissingColumnError> {
    let col = require_numeric(table, column, ChartKind::BoxPlot)?;
    Ok(BoxPlotSpec {
        column: column.to_string(),
        stats: box_stats(&sorted_numbers(col)),
    })
}

fn box_stats(sorted: &[f64]) -> Option<BoxStats> {
    let q1 = quantile(sorted, 0.25)?;
    let median = quantile(sorted, 0.5)?;
    let q3 = quantile(sorted, 0.75)?;
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside = sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
    let lower_whisker = inside.clone().next().unwrap_or(q1);
    let upper_whisker = inside.last().unwrap_or(q3);

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers: sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect(),
    })
}
