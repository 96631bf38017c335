use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RodoviaApp {
    pub state: AppState,
}

impl Default for RodoviaApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for RodoviaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, detail table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.heading("Open a dataset to explore accidents  (File → Open…)");
                });
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Traffic accident analysis");
                ui.add_space(4.0);

                table::metrics_row(ui, &self.state.metrics);
                ui.separator();

                plot::accident_map(ui, &self.state);
                ui.separator();

                ui.columns(2, |cols| {
                    plot::hourly_distribution(&mut cols[0], &self.state);
                    plot::top_causes_chart(&mut cols[1], &self.state);
                });
                ui.separator();

                table::details_table(ui, &self.state);
            });
        });
    }
}
