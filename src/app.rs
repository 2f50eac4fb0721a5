use std::time::Duration;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CsvWorkbenchApp {
    pub state: AppState,
}

impl eframe::App for CsvWorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + metrics ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: actions ----
        egui::SidePanel::left("actions_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            preview::table_preview(ui, &self.state);
        });

        // Keep the waiting-time metric ticking.
        if self.state.session.table().is_some() {
            ctx.request_repaint_after(Duration::from_secs(1));
        }
    }
}
