use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rusty_play::data::filter::{Selection, SizeBucket, ALL};
use rusty_play::data::view::ViewRequest;
use rusty_play::state::{ChartKind, DashboardState};

// ---------------------------------------------------------------------------
// Left side panel – filter and view widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let categories = dataset.categories.clone();
    let genres = dataset.genres.clone();
    let content_ratings = dataset.content_ratings.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Category");
            if let Some(pick) = value_combo(ui, "category", &state.selection.category, &categories) {
                state.set_category(pick);
            }

            ui.strong("Genre");
            if let Some(pick) = value_combo(ui, "genre", &state.selection.genre, &genres) {
                state.set_genre(pick);
            }

            ui.strong("Size");
            if let Some(pick) = size_combo(ui, &state.selection.size_bucket) {
                state.set_size_bucket(pick);
            }

            ui.strong("Content Rating");
            if let Some(pick) = value_combo(
                ui,
                "content_rating",
                &state.selection.content_rating,
                &content_ratings,
            ) {
                state.set_content_rating(pick);
            }

            if ui.small_button("Clear filters").clicked() {
                state.clear_filters();
            }

            ui.separator();

            // ---- View and chart type ----
            ui.strong("View");
            let current_view = state.view;
            egui::ComboBox::from_id_salt("view")
                .selected_text(current_view.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for view in ViewRequest::ALL {
                        if ui
                            .selectable_label(current_view == view, view.name())
                            .clicked()
                        {
                            state.set_view(view);
                        }
                    }
                });
            if !current_view.uses_selection() {
                ui.label(RichText::new("This view covers the whole dataset.").italics());
            }

            ui.strong("Chart type");
            let current_kind = state.chart_kind;
            ui.horizontal(|ui: &mut Ui| {
                for kind in ChartKind::ALL {
                    if ui.selectable_label(current_kind == kind, kind.label()).clicked() {
                        state.set_chart_kind(kind);
                    }
                }
            });
        });
}

/// Combo box over `All` plus the given values. Returns the new pick, if any.
fn value_combo(
    ui: &mut Ui,
    id: &str,
    current: &Selection<String>,
    values: &[String],
) -> Option<Selection<String>> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_all(), ALL).clicked() {
                picked = Some(Selection::All);
            }
            for value in values {
                let selected = matches!(current, Selection::Only(v) if v == value);
                if ui.selectable_label(selected, value).clicked() {
                    picked = Some(Selection::Only(value.clone()));
                }
            }
        });
    picked.filter(|p| p != current)
}

fn size_combo(ui: &mut Ui, current: &Selection<SizeBucket>) -> Option<Selection<SizeBucket>> {
    let mut picked = None;
    egui::ComboBox::from_id_salt("size_bucket")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_all(), ALL).clicked() {
                picked = Some(Selection::All);
            }
            for bucket in SizeBucket::ALL {
                let selected = *current == Selection::Only(bucket);
                if ui.selectable_label(selected, bucket.label()).clicked() {
                    picked = Some(Selection::Only(bucket));
                }
            }
        });
    picked.filter(|p| p != current)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} apps loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut DashboardState) {
    let file = rfd::FileDialog::new()
        .set_title("Open app dataset")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
