use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use rusty_play::color::Rgba;
use rusty_play::data::view::ChartSeries;
use rusty_play::state::{ChartKind, DashboardState};

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Share of a label slot taken by the bars of one label.
const GROUP_WIDTH: f64 = 0.8;

fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Render the current series in the central panel.
pub fn chart(ui: &mut Ui, state: &DashboardState) {
    let series = match &state.series {
        Some(s) => s,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset to view charts  (File → Open…)");
            });
            return;
        }
    };

    ui.heading(state.view.title());
    if series.is_empty() {
        ui.label("No apps match the current filters.");
        return;
    }

    let labels = series.labels.clone();
    Plot::new("chart")
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| slot_label(&labels, mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| match state.chart_kind {
            ChartKind::Bar => {
                for chart in bar_charts(series) {
                    plot_ui.bar_chart(chart);
                }
            }
            ChartKind::Line => {
                for ds in &series.datasets {
                    let points: PlotPoints = ds
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| [i as f64, v])
                        .collect();
                    let color = ds.colors.first().copied().map(color32).unwrap_or(Color32::LIGHT_BLUE);
                    plot_ui.line(Line::new(points).name(&ds.label).color(color).width(1.5));
                }
            }
            ChartKind::Scatter => {
                for ds in &series.datasets {
                    let points: PlotPoints = ds
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| [i as f64, v])
                        .collect();
                    let color = ds.colors.first().copied().map(color32).unwrap_or(Color32::LIGHT_BLUE);
                    plot_ui.points(Points::new(points).name(&ds.label).color(color).radius(4.0));
                }
            }
        });
}

/// Label for an x grid mark; only whole slots get one.
fn slot_label(labels: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

/// One bar chart per dataset; datasets sit side by side within each label slot.
fn bar_charts(series: &ChartSeries) -> Vec<BarChart> {
    let n = series.datasets.len().max(1) as f64;
    let width = GROUP_WIDTH / n;

    series
        .datasets
        .iter()
        .enumerate()
        .map(|(d, ds)| {
            let offset = (d as f64 - (n - 1.0) / 2.0) * width;
            let bars = ds
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let label = series.labels.get(i).map(String::as_str).unwrap_or_default();
                    let mut bar = Bar::new(i as f64 + offset, v).name(label).width(width);
                    if let Some(&c) = ds.colors.get(i) {
                        bar = bar.fill(color32(c));
                    }
                    bar
                })
                .collect();
            BarChart::new(bars).name(&ds.label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_slots_show_their_label() {
        let labels = vec!["GAME".to_string(), "TOOLS".to_string()];
        assert_eq!(slot_label(&labels, 0.0), "GAME");
        assert_eq!(slot_label(&labels, 1.0), "TOOLS");
        assert_eq!(slot_label(&labels, 0.5), "");
        assert_eq!(slot_label(&labels, -1.0), "");
        assert_eq!(slot_label(&labels, 2.0), "");
    }
}
