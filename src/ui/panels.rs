use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::CauseSelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the option lists so we can mutate state inside the loops.
    let regions = dataset.regions.clone();
    let months = dataset.months.clone();
    let causes = dataset.causes.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Region (UF) ----
            let header = format!(
                "Region (UF)  ({}/{})",
                state.selection.regions.len(),
                regions.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("filter_regions")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_regions();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_regions();
                        }
                    });

                    for uf in &regions {
                        let mut text = RichText::new(uf);
                        if let Some(colors) = &state.region_colors {
                            text = text.color(colors.color_for(uf));
                        }
                        let mut checked = state.selection.regions.contains(uf);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_region(uf);
                        }
                    }
                });

            // ---- Month ----
            // Months are listed in calendar order, not data order.
            let header = format!(
                "Month  ({}/{})",
                state.selection.months.len(),
                months.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("filter_months")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_months();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_months();
                        }
                    });

                    for month in &months {
                        let mut checked = state.selection.months.contains(month);
                        if ui.checkbox(&mut checked, month.as_str()).changed() {
                            state.toggle_month(month);
                        }
                    }
                });

            ui.separator();

            // ---- Cause ----
            ui.strong("Accident cause");
            let selected_text = match &state.selection.cause {
                CauseSelection::All => "All causes".to_string(),
                CauseSelection::Only(c) => c.clone(),
            };
            egui::ComboBox::from_id_salt("filter_cause")
                .width(ui.available_width())
                .selected_text(selected_text)
                .show_ui(ui, |ui: &mut Ui| {
                    let is_all = state.selection.cause == CauseSelection::All;
                    if ui.selectable_label(is_all, "All causes").clicked() {
                        state.set_cause(CauseSelection::All);
                    }
                    for cause in &causes {
                        let is_current =
                            state.selection.cause == CauseSelection::Only(cause.clone());
                        if ui.selectable_label(is_current, cause).clicked() {
                            state.set_cause(CauseSelection::Only(cause.clone()));
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
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
                "{} accidents loaded, {} visible",
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

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open accident data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} accident records across {} regions",
                    dataset.len(),
                    dataset.regions.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
