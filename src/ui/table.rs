use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use claims_explorer::data::model::Table;
use claims_explorer::data::stats::{ColumnSummary, split_by_kind};

/// Scrollable grid of a table's cells.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table) {
    if table.n_cols() == 0 {
        return;
    }

    TableBuilder::new(ui)
        .id_salt(id)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(64.0), table.n_cols())
        .header(20.0, |mut header| {
            for name in table.column_names() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.n_rows(), |mut row| {
                let index = row.index();
                for value in table.row(index) {
                    row.col(|ui| {
                        ui.label(value.to_string());
                    });
                }
            });
        });
}

fn fmt(v: Option<f64>) -> String {
    v.map_or_else(String::new, |v| format!("{v:.4}"))
}

/// Descriptive statistics, one row per column: numeric columns first,
/// then text columns in a grid of their own.
pub fn stats_table(ui: &mut Ui, summaries: &[ColumnSummary]) {
    let (numeric, text) = split_by_kind(summaries);

    if !numeric.is_empty() {
        egui::Grid::new("describe_numeric")
            .striped(true)
            .num_columns(9)
            .show(ui, |ui| {
                for head in ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
                    ui.strong(head);
                }
                ui.end_row();

                for (column, n) in &numeric {
                    ui.label(*column);
                    ui.label(n.count.to_string());
                    for v in [n.mean, n.std, n.min, n.q25, n.median, n.q75, n.max] {
                        ui.label(fmt(v));
                    }
                    ui.end_row();
                }
            });
    }

    if !text.is_empty() {
        ui.add_space(6.0);
        egui::Grid::new("describe_text")
            .striped(true)
            .num_columns(5)
            .show(ui, |ui| {
                for head in ["column", "count", "unique", "top", "freq"] {
                    ui.strong(head);
                }
                ui.end_row();

                for (column, t) in &text {
                    ui.label(*column);
                    ui.label(t.count.to_string());
                    ui.label(t.unique.to_string());
                    ui.label(t.top.as_deref().unwrap_or("-"));
                    ui.label(t.freq.to_string());
                    ui.end_row();
                }
            });
    }
}
