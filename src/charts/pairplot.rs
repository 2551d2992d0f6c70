use serde::Serialize;

use super::histogram::{HistogramBin, bin_values};
use super::{ChartKind, MissingColumnError, complete_pairs, require_numeric};
use crate::data::model::Table;

/// Bins on the diagonal panels.
const DIAGONAL_BINS: usize = 20;

/// One cell of the scatter matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairPanel {
    /// Diagonal: distribution of a single column.
    Histogram { column: String, bins: Vec<HistogramBin> },
    /// Off-diagonal: `x` against `y` over rows where both are present.
    Scatter {
        x: String,
        y: String,
        points: Vec<[f64; 2]>,
    },
}

/// `columns.len()`² panels, row-major: `panels[row * n + col]` plots
/// `columns[col]` on x against `columns[row]` on y.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairPlotSpec {
    pub columns: Vec<String>,
    pub panels: Vec<PairPanel>,
}

impl PairPlotSpec {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn panel(&self, row: usize, col: usize) -> Option<&PairPanel> {
        self.panels.get(row * self.columns.len() + col)
    }
}

/// Scatter matrix over `columns`. No columns gives an empty spec, which
/// draws nothing.
pub fn pairplot<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
) -> Result<PairPlotSpec, MissingColumnError> {
    let cols = columns
        .iter()
        .map(|c| require_numeric(table, c.as_ref(), ChartKind::PairPlot))
        .collect::<Result<Vec<_>, _>>()?;

    let mut panels = Vec::with_capacity(cols.len() * cols.len());
    for (row, y) in cols.iter().enumerate() {
        for (col, x) in cols.iter().enumerate() {
            panels.push(if row == col {
                let values: Vec<f64> = x.numbers().collect();
                PairPanel::Histogram {
                    column: x.name.clone(),
                    bins: bin_values(&values, DIAGONAL_BINS),
                }
            } else {
                PairPanel::Scatter {
                    x: x.name.clone(),
                    y: y.name.clone(),
                    points: complete_pairs(x, y).into_iter().map(|(a, b)| [a, b]).collect(),
                }
            });
        }
    }

    Ok(PairPlotSpec {
        columns: cols.iter().map(|c| c.name.clone()).collect(),
        panels,
    })
}
