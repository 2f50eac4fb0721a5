use std::num::NonZeroUsize;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use csv_workbench::data::split::{chunk_count, MIN_ROWS_PER_CHUNK};
use csv_workbench::data::{FilterOp, Table};

use crate::state::{save_table, AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – column selection, filter, split, combine
// ---------------------------------------------------------------------------

/// Render the left action panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("CSV Automation Tool");
    ui.label("Filter, combine and split large CSV files.");
    ui.separator();

    // Clone what we need so we can mutate state inside the sections.
    let columns = state.session.table().map(Table::column_names);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match &columns {
                Some(columns) => {
                    column_section(ui, state, columns);
                    ui.separator();
                    filter_section(ui, state, columns);
                    ui.separator();
                    split_section(ui, state);
                }
                None => {
                    ui.label("No CSV file loaded.");
                }
            }
            ui.separator();
            combine_section(ui, state);
        });
}

fn column_section(ui: &mut Ui, state: &mut AppState, columns: &[String]) {
    egui::CollapsingHeader::new(RichText::new("Select Columns").strong())
        .id_salt("select_columns")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            for col in columns {
                let mut checked = state.selected_columns.contains(col);
                if ui.checkbox(&mut checked, col.as_str()).changed() {
                    state.toggle_column(col);
                }
            }
            if ui.button("Generate Filtered File").clicked() {
                let result = state.column_selection();
                export_result(state, result, "filtered_file.csv", "Selected columns");
            }
        });
}

fn filter_section(ui: &mut Ui, state: &mut AppState, columns: &[String]) {
    egui::CollapsingHeader::new(RichText::new("Advanced Column Filter").strong())
        .id_salt("advanced_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                egui::ComboBox::from_id_salt("filter_column")
                    .selected_text(state.filter_column.clone())
                    .show_ui(ui, |ui: &mut Ui| {
                        for col in columns {
                            ui.selectable_value(&mut state.filter_column, col.clone(), col.as_str());
                        }
                    });

                egui::ComboBox::from_id_salt("filter_op")
                    .selected_text(state.filter_op.symbol())
                    .show_ui(ui, |ui: &mut Ui| {
                        for op in FilterOp::ALL {
                            ui.selectable_value(&mut state.filter_op, op, op.symbol());
                        }
                    });
            });

            let hint = if state.filter_op == FilterOp::In {
                "a, b, c"
            } else {
                "Value"
            };
            ui.add(egui::TextEdit::singleline(&mut state.filter_value).hint_text(hint));

            if ui.button("Apply Advanced Filter").clicked() {
                let result = state.advanced_filter();
                export_result(state, result, "advanced_filtered.csv", "Filtered rows");
            }
        });
}

fn split_section(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Split CSV").strong())
        .id_salt("split_csv")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Rows per split file");
                ui.add(
                    egui::DragValue::new(&mut state.rows_per_chunk)
                        .range(MIN_ROWS_PER_CHUNK..=usize::MAX)
                        .speed(10_000.0),
                );
            });

            let rows = NonZeroUsize::new(state.rows_per_chunk.max(MIN_ROWS_PER_CHUNK));
            if let (Ok(table), Some(rows)) = (state.table(), rows) {
                ui.label(format!("{} files", chunk_count(table.num_rows(), rows)));
            }

            if ui.button("Split CSV…").clicked() {
                let dir = rfd::FileDialog::new()
                    .set_title("Choose a folder for the split files")
                    .pick_folder();
                if let Some(dir) = dir {
                    match state.split_into(&dir) {
                        Ok(paths) => state.set_info(format!("CSV split into {} files", paths.len())),
                        Err(e) => state.set_error(&e),
                    }
                }
            }
        });
}

fn combine_section(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Combine CSV Files").strong())
        .id_salt("combine_csv")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui.button("Choose files and combine…").clicked() {
                let files = rfd::FileDialog::new()
                    .set_title("Choose CSV files to combine")
                    .add_filter("CSV", &["csv"])
                    .pick_files();
                if let Some(paths) = files {
                    let result = state.combine(&paths);
                    export_result(state, result, "combined.csv", "Combined rows");
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, metrics and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reset Application").clicked() {
                state.reset();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = &state.source_name {
            ui.label(name.as_str());
            ui.separator();
        }

        ui.label(format!(
            "Waiting Time (sec): {}",
            state.session.elapsed().as_secs()
        ));
        ui.label(format!("User Count: {}", state.session.user_count()));

        if let Some(summary) = state.load_summary() {
            ui.separator();
            let color = if state.session.skipped_rows() > 0 {
                Color32::YELLOW
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(summary).color(color));
        }

        ui.separator();

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.label(RichText::new(msg).color(Color32::GREEN));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match state.open(&path) {
            Ok(()) => {
                let rows = state.session.table().map_or(0, Table::num_rows);
                state.set_info(format!("CSV file loaded successfully ({rows} rows)"));
            }
            Err(e) => state.set_error(&e),
        }
    }
}

/// Ask where to save a derived table and write it there.
fn export_result(
    state: &mut AppState,
    result: anyhow::Result<Table>,
    file_name: &str,
    what: &str,
) {
    let table = match result {
        Ok(table) => table,
        Err(e) => {
            state.set_error(&e);
            return;
        }
    };

    let target = rfd::FileDialog::new()
        .set_title("Save CSV")
        .set_file_name(file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = target else {
        state.set_info(format!("{what}: {} (not saved)", table.num_rows()));
        return;
    };

    match save_table(&table, &path) {
        Ok(()) => state.set_info(format!(
            "{what}: {}, saved to {}",
            table.num_rows(),
            path.display()
        )),
        Err(e) => state.set_error(&e),
    }
}
