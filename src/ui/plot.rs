use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Ui, Vec2};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoint, PlotPoints, Points, Text,
};

use claims_explorer::charts::{
    BoxPlotSpec, CorrelationSpec, GeoSpec, HistogramBin, HistogramSpec, PairPanel, PairPlotSpec,
};

use crate::color::{contrasting_text, coolwarm, orange_red};

const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

fn bars(bins: &[HistogramBin]) -> BarChart {
    let bars = bins
        .iter()
        .map(|b| {
            let width = (b.end - b.start).max(f64::EPSILON);
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(width)
                .fill(BAR_COLOR)
        })
        .collect();
    BarChart::new(bars).color(BAR_COLOR)
}

// ---------------------------------------------------------------------------
// Histogram / boxplot
// ---------------------------------------------------------------------------

pub fn histogram(ui: &mut Ui, spec: &HistogramSpec) {
    Plot::new("histogram")
        .height(260.0)
        .x_axis_label(spec.column.as_str())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(bars(&spec.bins).name(&spec.column));
        });
}

pub fn boxplot(ui: &mut Ui, spec: &BoxPlotSpec) {
    let Some(stats) = &spec.stats else {
        ui.label("No values to plot.");
        return;
    };

    let spread = BoxSpread::new(
        stats.lower_whisker,
        stats.q1,
        stats.median,
        stats.q3,
        stats.upper_whisker,
    );
    let outliers: PlotPoints = stats.outliers.iter().map(|&v| [0.0, v]).collect();

    Plot::new("boxplot")
        .height(260.0)
        .y_axis_label(spec.column.as_str())
        .show_x(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(
                BoxPlot::new(vec![BoxElem::new(0.0, spread).box_width(0.4).fill(BAR_COLOR)])
                    .name(&spec.column),
            );
            plot_ui.points(Points::new(outliers).radius(2.5).color(BAR_COLOR));
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated heatmap; undefined coefficients are left grey.
pub fn correlation_heatmap(ui: &mut Ui, spec: &CorrelationSpec) {
    let n = spec.columns.len();
    let cell = 56.0;
    let label_w = 110.0;
    let size = Vec2::new(label_w + cell * n as f32, label_w + cell * n as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + Vec2::splat(label_w);
    let font = FontId::monospace(11.0);
    let text_color = ui.visuals().text_color();

    for (i, name) in spec.columns.iter().enumerate() {
        let offset = cell * i as f32 + cell / 2.0;
        painter.text(
            Pos2::new(origin.x - 6.0, origin.y + offset),
            Align2::RIGHT_CENTER,
            name,
            font.clone(),
            text_color,
        );
        painter.text(
            Pos2::new(origin.x + offset, origin.y - 6.0),
            Align2::CENTER_BOTTOM,
            name,
            font.clone(),
            text_color,
        );
    }

    for (i, row) in spec.matrix.iter().enumerate() {
        for (j, r) in row.iter().enumerate() {
            let rect = Rect::from_min_size(
                origin + Vec2::new(cell * j as f32, cell * i as f32),
                Vec2::splat(cell - 1.0),
            );
            let fill = r.map_or(Color32::DARK_GRAY, coolwarm);
            painter.rect_filled(rect, 0.0, fill);
            if let Some(r) = r {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("{r:.2}"),
                    font.clone(),
                    contrasting_text(fill),
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pairplot
// ---------------------------------------------------------------------------

pub fn pairplot(ui: &mut Ui, spec: &PairPlotSpec) {
    let n = spec.columns.len();
    if n == 0 {
        return;
    }
    let side = ((ui.available_width() - 8.0 * n as f32) / n as f32).clamp(90.0, 220.0);

    egui::Grid::new("pairplot").spacing([4.0, 4.0]).show(ui, |ui| {
        for row in 0..n {
            for col in 0..n {
                let Some(panel) = spec.panel(row, col) else {
                    continue;
                };
                Plot::new(("pair", row, col))
                    .width(side)
                    .height(side)
                    .show_axes([row + 1 == n, col == 0])
                    .x_axis_label(if row + 1 == n { spec.columns[col].as_str() } else { "" })
                    .y_axis_label(if col == 0 { spec.columns[row].as_str() } else { "" })
                    .allow_drag(false)
                    .allow_zoom(false)
                    .allow_scroll(false)
                    .show(ui, |plot_ui| match panel {
                        PairPanel::Histogram { bins, .. } => plot_ui.bar_chart(bars(bins)),
                        PairPanel::Scatter { points, .. } => plot_ui.points(
                            Points::new(PlotPoints::from(points.clone()))
                                .radius(1.5)
                                .color(BAR_COLOR),
                        ),
                    });
            }
            ui.end_row();
        }
    });
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Size/colour buckets on the map; one plot item per bucket.
const GEO_BUCKETS: usize = 8;

/// Claims by location: longitude on x, latitude on y, marker size and
/// colour by the size column. Hovering near a point shows its label.
pub fn geo_scatter(ui: &mut Ui, spec: &GeoSpec) {
    let (lo, hi) = spec.size_range.unwrap_or((0.0, 1.0));
    let bucket_of = |size: f64| {
        if hi > lo {
            (((size - lo) / (hi - lo)) * (GEO_BUCKETS - 1) as f64).round() as usize
        } else {
            GEO_BUCKETS - 1
        }
    };

    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); GEO_BUCKETS];
    for p in &spec.points {
        buckets[bucket_of(p.size).min(GEO_BUCKETS - 1)].push([p.lon, p.lat]);
    }

    Plot::new("geo")
        .height(420.0)
        .data_aspect(1.0)
        .x_axis_label("LON")
        .y_axis_label("LAT")
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (i, coords) in buckets.into_iter().enumerate() {
                if coords.is_empty() {
                    continue;
                }
                let t = i as f64 / (GEO_BUCKETS - 1) as f64;
                let value = lo + (hi - lo) * t;
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .radius(2.0 + 2.0 * i as f32)
                        .color(orange_red(value, lo, hi))
                        .name(format!("{} ≈ {value:.1}", spec.size_column)),
                );
            }

            if let Some(pointer) = plot_ui.pointer_coordinate() {
                let bounds = plot_ui.plot_bounds();
                let reach = bounds.width().max(bounds.height()) / 100.0;
                let nearest = spec
                    .points
                    .iter()
                    .filter(|p| p.label.is_some())
                    .map(|p| (p, (p.lon - pointer.x).hypot(p.lat - pointer.y)))
                    .filter(|(_, d)| *d < reach)
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                if let Some((p, _)) = nearest {
                    let label = format!(
                        "{} ({}: {})",
                        p.label.as_deref().unwrap_or_default(),
                        spec.size_column,
                        p.size
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(p.lon, p.lat + reach), label)
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            }
        });
}
