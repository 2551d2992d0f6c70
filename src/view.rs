//! One full pass of the dashboard pipeline.
//!
//! [`render`] is re-run from the cached table whenever a widget changes;
//! [`ViewCache`] decides when that is and keeps the correlation matrix of
//! the last explicit request. Fatal problems abort the pass with a [`ViewError`]; chart-level problems
//! stay local to their section as a [`MissingColumnError`].

use crate::charts::{
    self, BoxPlotSpec, CorrelationSpec, GeoSpec, HistogramSpec, MissingColumnError, PairPlotSpec,
};
use crate::data::export::{ExportError, to_csv_bytes};
use crate::data::filter::{
    DegenerateRangeWarning, FilterOutcome, ValueRange, filter_range, observed_range,
};
use crate::data::model::Table;
use crate::data::select::{ColumnNotFoundError, select_columns};
use crate::data::stats::{ColumnSummary, describe};
use crate::state::UiState;

/// A render pass could not complete.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    ColumnNotFound(#[from] ColumnNotFoundError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// The range-filter section.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSection {
    Applied {
        column: String,
        /// Slider bounds: the column's full observed range.
        bounds: ValueRange,
        /// Range actually applied.
        range: ValueRange,
        /// Rows matching the range (before truncating to the preview).
        matched_rows: usize,
        preview: Table,
        /// Download payload: matching rows, restricted to the selection.
        csv: Vec<u8>,
    },
    /// Filtering is disabled for this column.
    Degenerate(DegenerateRangeWarning),
}

/// Everything the window shows for one UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutput {
    pub n_rows: usize,
    pub n_cols: usize,
    /// Selected columns, first rows. No columns when nothing is selected.
    pub preview: Table,
    pub stats: Option<Vec<ColumnSummary>>,
    /// `None` when the table has no numeric column to filter on.
    pub filter: Option<FilterSection>,
    pub geo: Result<GeoSpec, MissingColumnError>,
    pub histogram: Option<Result<HistogramSpec, MissingColumnError>>,
    pub boxplot: Option<Result<BoxPlotSpec, MissingColumnError>>,
    /// Only computed on the pass that follows a request.
    pub correlation: Option<Result<CorrelationSpec, MissingColumnError>>,
    /// `None` when no pairplot columns are chosen.
    pub pairplot: Option<Result<PairPlotSpec, MissingColumnError>>,
}

/// Run the pipeline: select → filter → {export, charts}.
///
/// Charts are drawn over the row-filtered table with all its columns, so
/// the whole page follows the active range.
pub fn render(table: &Table, state: &UiState) -> Result<ViewOutput, ViewError> {
    let selected = select_columns(table, &state.selected_columns)?;
    let stats = state.show_stats.then(|| describe(&selected));

    let (filter, chart_table) = match &state.filter_column {
        Some(column) => {
            let (section, rows) = filter_section(table, column, state)?;
            (Some(section), rows)
        }
        None => (None, None),
    };
    let chart_table = chart_table.as_ref().unwrap_or(table);

    let output = ViewOutput {
        n_rows: table.n_rows(),
        n_cols: table.n_cols(),
        preview: selected.head(state.preview_rows),
        stats,
        filter,
        geo: charts::geo_scatter(chart_table, &state.geo_size_column),
        histogram: state
            .histogram_column
            .as_deref()
            .map(|c| charts::histogram(chart_table, c, Some(state.histogram_bins))),
        boxplot: state
            .boxplot_column
            .as_deref()
            .map(|c| charts::boxplot(chart_table, c)),
        correlation: state
            .correlation_requested
            .then(|| charts::correlation(chart_table)),
        pairplot: (!state.pair_columns.is_empty())
            .then(|| charts::pairplot(chart_table, &state.pair_columns)),
    };

    for err in output.chart_errors() {
        log::warn!("Skipping chart: {err}");
    }
    Ok(output)
}

/// Filter section plus, when the filter applied, the row-filtered table
/// with all columns.
fn filter_section(
    table: &Table,
    column: &str,
    state: &UiState,
) -> Result<(FilterSection, Option<Table>), ViewError> {
    let bounds = observed_range(table, column)?;
    // A column without values has no bounds; the filter reports it as
    // degenerate whatever range it is given.
    let range = state.filter_range.or(bounds).unwrap_or(ValueRange::ALL);

    let rows = match filter_range(table, column, range)? {
        FilterOutcome::Filtered(rows) => rows,
        FilterOutcome::Degenerate { warning, .. } => {
            return Ok((FilterSection::Degenerate(warning), None));
        }
    };

    let matched = if state.selected_columns.is_empty() {
        rows.clone()
    } else {
        select_columns(&rows, &state.selected_columns)?
    };
    let section = FilterSection::Applied {
        column: column.to_string(),
        bounds: bounds.unwrap_or(range),
        range,
        matched_rows: rows.n_rows(),
        preview: matched.head(state.filtered_preview_rows),
        csv: to_csv_bytes(&matched)?,
    };
    Ok((section, Some(rows)))
}

/// Last render and the state it was computed for.
///
/// A correlation request is consumed by the pass that serves it: the flag
/// is cleared and the matrix kept, so range or column changes afterwards
/// show the same matrix until the button is pressed again.
#[derive(Debug, Default)]
pub struct ViewCache {
    seen: Option<UiState>,
    output: Option<Result<ViewOutput, ViewError>>,
    correlation: Option<Result<CorrelationSpec, MissingColumnError>>,
}

impl ViewCache {
    /// Re-render if `state` changed since the last call, then return the
    /// current output.
    pub fn refresh(
        &mut self,
        table: &Table,
        state: &mut UiState,
    ) -> Option<&Result<ViewOutput, ViewError>> {
        if self.seen.as_ref() != Some(&*state) {
            log::debug!("Re-rendering view");
            let mut result = render(table, state);
            match &mut result {
                Ok(output) => {
                    if state.correlation_requested {
                        self.correlation = output.correlation.take();
                        state.correlation_requested = false;
                    }
                    output.correlation = self.correlation.clone();
                }
                Err(e) => log::error!("Render failed: {e}"),
            }
            self.output = Some(result);
            self.seen = Some(state.clone());
        }
        self.output.as_ref()
    }
}

impl ViewOutput {
    /// Chart sections that could not be drawn.
    pub fn chart_errors(&self) -> impl Iterator<Item = &MissingColumnError> {
        [
            self.geo.as_ref().err(),
            self.histogram.as_ref().and_then(|r| r.as_ref().err()),
            self.boxplot.as_ref().and_then(|r| r.as_ref().err()),
            self.correlation.as_ref().and_then(|r| r.as_ref().err()),
            self.pairplot.as_ref().and_then(|r| r.as_ref().err()),
        ]
        .into_iter()
        .flatten()
    }
}
