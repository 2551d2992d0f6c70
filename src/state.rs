use crate::charts::SIZE_COLUMN;
use crate::config::AppConfig;
use crate::data::filter::ValueRange;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// UI state
// ---------------------------------------------------------------------------

/// Every widget value, independent of rendering. The view is a pure
/// function of this and the table, so any change means a full re-render.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Columns shown in the preview (and kept in the download).
    pub selected_columns: Vec<String>,
    /// Numeric column the range filter applies to.
    pub filter_column: Option<String>,
    /// Chosen range; `None` means the column's full observed range.
    pub filter_range: Option<ValueRange>,
    /// Show descriptive statistics of the selected columns.
    pub show_stats: bool,
    pub histogram_column: Option<String>,
    pub histogram_bins: usize,
    pub boxplot_column: Option<String>,
    /// Set by the heatmap button. The next render computes the matrix and
    /// [`ViewCache`](crate::view::ViewCache) clears the flag, so later widget
    /// changes reuse that matrix until the button is pressed again.
    pub correlation_requested: bool,
    /// Columns of the scatter matrix; empty draws nothing.
    pub pair_columns: Vec<String>,
    /// Numeric column encoding marker size on the map.
    pub geo_size_column: String,
    pub preview_rows: usize,
    pub filtered_preview_rows: usize,
}

impl UiState {
    /// Initial widget values for a freshly loaded table.
    pub fn new(table: &Table, config: &AppConfig) -> Self {
        let numeric = table.numeric_column_names();
        let first_numeric = numeric.first().cloned();

        Self {
            selected_columns: config
                .default_columns
                .iter()
                .filter(|c| table.column(c).is_some())
                .cloned()
                .collect(),
            filter_column: first_numeric.clone(),
            filter_range: None,
            show_stats: false,
            histogram_column: first_numeric.clone(),
            histogram_bins: config.histogram_bins,
            boxplot_column: first_numeric,
            correlation_requested: false,
            pair_columns: Vec::new(),
            geo_size_column: SIZE_COLUMN.to_string(),
            preview_rows: config.preview_rows,
            filtered_preview_rows: config.filtered_preview_rows,
        }
    }

    /// Switch the filter column; the range resets to the new column's
    /// full extent.
    pub fn set_filter_column(&mut self, column: String) {
        if self.filter_column.as_deref() != Some(column.as_str()) {
            self.filter_column = Some(column);
            self.filter_range = None;
        }
    }

    /// Ask for the correlation matrix on the next render pass.
    pub fn request_correlation(&mut self) {
        self.correlation_requested = true;
    }

    /// Add or remove a column from a multi-select list.
    pub fn toggle(list: &mut Vec<String>, column: &str) {
        if let Some(pos) = list.iter().position(|c| c == column) {
            list.remove(pos);
        } else {
            list.push(column.to_string());
        }
    }
}
