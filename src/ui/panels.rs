use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use claims_explorer::charts::MissingColumnError;
use claims_explorer::data::export::EXPORT_FILE_NAME;
use claims_explorer::data::filter::{ValueRange, observed_range};
use claims_explorer::data::model::Table;
use claims_explorer::state::UiState;
use claims_explorer::view::{FilterSection, ViewOutput};

use super::{plot, table};

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 40);

fn warning(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(format!("⚠ {}", text.into())).color(WARNING_COLOR));
}

fn chart_warning(ui: &mut Ui, err: &MissingColumnError) {
    warning(ui, format!("Cannot draw the {}: column '{}' {}.", err.chart, err.column, err.reason));
}

// ---------------------------------------------------------------------------
// Left side panel – controls
// ---------------------------------------------------------------------------

/// Single choice among `options`, shown as a combo box.
fn column_combo(ui: &mut Ui, id: &str, label: &str, options: &[String], current: &mut Option<String>) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_deref().unwrap_or("—"))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for col in options {
                if ui
                    .selectable_label(current.as_deref() == Some(col.as_str()), col.as_str())
                    .clicked()
                {
                    *current = Some(col.clone());
                }
            }
        });
}

/// Checkbox per column; toggling adds or removes it from `selected`.
fn column_checklist(ui: &mut Ui, options: &[String], selected: &mut Vec<String>) {
    for col in options {
        let mut checked = selected.contains(col);
        if ui.checkbox(&mut checked, col.as_str()).changed() {
            UiState::toggle(selected, col);
        }
    }
}

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, table: &Table, state: &mut UiState) {
    let all_columns: Vec<String> = table.column_names().map(str::to_string).collect();
    let numeric = table.numeric_column_names();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Column selection ----
            egui::CollapsingHeader::new(RichText::new(format!(
                "Columns  ({}/{})",
                state.selected_columns.len(),
                all_columns.len()
            ))
            .strong())
            .id_salt("columns")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.selected_columns = all_columns.clone();
                    }
                    if ui.small_button("None").clicked() {
                        state.selected_columns.clear();
                    }
                });
                column_checklist(ui, &all_columns, &mut state.selected_columns);
            });
            ui.checkbox(&mut state.show_stats, "Show descriptive statistics");
            ui.separator();

            // ---- Range filter ----
            ui.strong("Filter by a numeric column");
            let mut filter_column = state.filter_column.clone();
            column_combo(ui, "filter_column", "Column", &numeric, &mut filter_column);
            if let Some(col) = filter_column {
                state.set_filter_column(col);
            }
            range_sliders(ui, table, state);
            ui.separator();

            // ---- Charts ----
            ui.strong("Charts");
            column_combo(ui, "histogram_column", "Histogram", &numeric, &mut state.histogram_column);
            ui.add(egui::Slider::new(&mut state.histogram_bins, 1..=100).text("bins"));
            column_combo(ui, "boxplot_column", "Boxplot", &numeric, &mut state.boxplot_column);
            let mut size = Some(state.geo_size_column.clone());
            column_combo(ui, "geo_size_column", "Map marker size", &numeric, &mut size);
            if let Some(size) = size {
                state.geo_size_column = size;
            }
            ui.add_space(4.0);

            if ui.button("Compute correlation heatmap").clicked() {
                state.request_correlation();
            }
            ui.separator();

            egui::CollapsingHeader::new(RichText::new("Pairplot columns").strong())
                .id_salt("pairplot")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    column_checklist(ui, &numeric, &mut state.pair_columns);
                });
        });
}

/// Min/max sliders over the filter column's observed range.
fn range_sliders(ui: &mut Ui, table: &Table, state: &mut UiState) {
    let Some(column) = state.filter_column.clone() else {
        ui.label("No numeric column to filter on.");
        return;
    };
    let bounds = match observed_range(table, &column) {
        Ok(Some(b)) if b.lo() < b.hi() => b,
        _ => return,
    };

    let current = state.filter_range.unwrap_or(bounds);
    let (mut lo, mut hi) = (current.lo(), current.hi());
    let min_changed = ui
        .add(egui::Slider::new(&mut lo, bounds.lo()..=bounds.hi()).text("min"))
        .changed();
    let max_changed = ui
        .add(egui::Slider::new(&mut hi, bounds.lo()..=bounds.hi()).text("max"))
        .changed();

    if min_changed || max_changed {
        // Dragging one handle past the other pushes it along.
        if min_changed {
            hi = hi.max(lo);
        } else {
            lo = lo.min(hi);
        }
        state.filter_range = ValueRange::new(lo, hi);
    }
    if state.filter_range.is_some() && ui.small_button("Reset range").clicked() {
        state.filter_range = None;
    }
}

// ---------------------------------------------------------------------------
// Central panel – view sections
// ---------------------------------------------------------------------------

/// Draw every section of a rendered view.
pub fn view(ui: &mut Ui, output: &ViewOutput, status: &mut Option<String>) {
    ui.heading("Insurance claims & climate explorer");
    ui.label(format!("Rows: {}    Columns: {}", output.n_rows, output.n_cols));
    ui.separator();

    if output.preview.n_cols() > 0 {
        table::data_table(ui, "preview", &output.preview);
    } else {
        ui.label("Select columns in the side panel to preview them.");
    }
    if let Some(stats) = &output.stats {
        ui.add_space(6.0);
        ui.strong("Descriptive statistics");
        table::stats_table(ui, stats);
    }
    ui.separator();

    ui.heading("Range filter");
    match &output.filter {
        Some(FilterSection::Applied {
            column,
            range,
            matched_rows,
            preview,
            csv,
            ..
        }) => {
            ui.label(format!("{column} in {range}: {matched_rows} rows after filtering"));
            table::data_table(ui, "filtered", preview);
            if ui.button("📥 Download filtered data").clicked() {
                *status = save_csv(csv);
            }
        }
        Some(FilterSection::Degenerate(w)) => {
            warning(ui, format!("{w}."));
        }
        None => {
            ui.label("The dataset has no numeric column.");
        }
    }
    ui.separator();

    ui.heading("🗺 Claims by location");
    match &output.geo {
        Ok(spec) => plot::geo_scatter(ui, spec),
        Err(err) => chart_warning(ui, err),
    }
    ui.separator();

    ui.heading("📈 Distributions");
    ui.strong("Histogram");
    match &output.histogram {
        Some(Ok(spec)) => plot::histogram(ui, spec),
        Some(Err(err)) => chart_warning(ui, err),
        None => {}
    }
    ui.strong("Boxplot");
    match &output.boxplot {
        Some(Ok(spec)) => plot::boxplot(ui, spec),
        Some(Err(err)) => chart_warning(ui, err),
        None => {}
    }
    ui.separator();

    ui.heading("Correlation heatmap");
    match &output.correlation {
        Some(Ok(spec)) => plot::correlation_heatmap(ui, spec),
        Some(Err(err)) => chart_warning(ui, err),
        None => {
            ui.label("Use the button in the side panel to compute it.");
        }
    }
    ui.separator();

    ui.heading("Pairplot");
    match &output.pairplot {
        Some(Ok(spec)) => {
            ui.label(
                RichText::new("⚡ The pairplot can be slow with many columns.").italics(),
            );
            plot::pairplot(ui, spec);
        }
        Some(Err(err)) => chart_warning(ui, err),
        None => {
            ui.label("Pick a few numeric columns in the side panel.");
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// What the user asked for from the menu bar.
pub enum TopBarAction {
    None,
    Open(std::path::PathBuf),
}

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, source: &Path, status: &Option<String>) -> TopBarAction {
    let mut action = TopBarAction::None;
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = open_file_dialog() {
                    action = TopBarAction::Open(path);
                }
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(source.display().to_string());

        if let Some(msg) = status {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
    action
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn open_file_dialog() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

/// Ask where to save the filtered rows; returns the status line to show.
fn save_csv(bytes: &[u8]) -> Option<String> {
    let path = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()?;

    let result = std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()));
    match result {
        Ok(()) => {
            log::info!("Saved filtered data to {}", path.display());
            Some(format!("Saved {}", path.display()))
        }
        Err(e) => {
            log::error!("Failed to save filtered data: {e:#}");
            Some(format!("Error: {e:#}"))
        }
    }
}
