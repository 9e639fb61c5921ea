use eframe::egui;

use rusty_play::state::DashboardState;

use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyPlayApp {
    pub state: DashboardState,
}

impl eframe::App for RustyPlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and view ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: filtered apps ----
        egui::TopBottomPanel::bottom("table_panel")
            .default_height(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                table::app_table(ui, &self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart(ui, &self.state);
        });
    }
}
