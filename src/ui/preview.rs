use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Rows shown in the preview grid.
const PREVIEW_ROWS: usize = 500;

// ---------------------------------------------------------------------------
// Table preview (central panel)
// ---------------------------------------------------------------------------

/// Render the first rows of the loaded table.
pub fn table_preview(ui: &mut Ui, state: &AppState) {
    let Some(table) = state.session.table() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to get started  (File → Open…)");
        });
        return;
    };

    ui.heading(format!("Row Count: {}", table.num_rows()));
    if table.num_rows() > PREVIEW_ROWS {
        ui.label(format!("Showing the first {PREVIEW_ROWS} rows."));
    }
    ui.separator();

    let names = table.column_names();
    let shown = table.num_rows().min(PREVIEW_ROWS);

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(60.0).clip(true), names.len())
            .header(20.0, |mut header| {
                for (idx, name) in names.iter().enumerate() {
                    let kind = table.column_kind(idx);
                    header.col(|ui: &mut Ui| {
                        ui.strong(name.as_str()).on_hover_text(kind.to_string());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, shown, |mut row| {
                    let idx = row.index();
                    for col in 0..names.len() {
                        row.col(|ui: &mut Ui| {
                            ui.label(table.cell_text(col, idx).unwrap_or_default());
                        });
                    }
                });
            });
    });
}
