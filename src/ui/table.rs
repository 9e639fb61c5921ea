use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use rusty_play::state::DashboardState;

// ---------------------------------------------------------------------------
// Filtered apps table (bottom panel)
// ---------------------------------------------------------------------------

const HEADERS: [&str; 8] = [
    "App",
    "Category",
    "Rating",
    "Reviews",
    "Installs",
    "Size (MB)",
    "Content Rating",
    "Last Updated",
];

/// Render the records passing the current filters.
pub fn app_table(ui: &mut Ui, state: &DashboardState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let rows = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::initial(220.0).at_least(80.0).clip(true))
        .columns(Column::auto(), HEADERS.len() - 1)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = &dataset.records[rows[row.index()]];
                row.col(|ui| {
                    ui.label(&rec.name);
                });
                row.col(|ui| {
                    ui.label(&rec.category);
                });
                row.col(|ui| {
                    ui.label(rec.rating.map(|r| format!("{r:.1}")).unwrap_or_default());
                });
                row.col(|ui| {
                    ui.label(rec.review_count.to_string());
                });
                row.col(|ui| {
                    ui.label(rec.install_count.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", rec.size_mb));
                });
                row.col(|ui| {
                    ui.label(&rec.content_rating);
                });
                row.col(|ui| {
                    ui.label(rec.last_updated.map(|d| d.to_string()).unwrap_or_default());
                });
            });
        });
}
