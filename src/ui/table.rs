use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::metrics::MetricsSummary;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

/// Thousands separators in the Brazilian convention: 1234567 → "1.234.567".
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// The three headline figures above the charts.
pub fn metrics_row(ui: &mut Ui, metrics: &MetricsSummary) {
    ui.columns(3, |cols| {
        metric(
            &mut cols[0],
            "Total accidents",
            &format_count(metrics.total_accidents as u64),
        );
        metric(
            &mut cols[1],
            "Fatalities",
            &format_count(metrics.total_fatalities),
        );
        metric(
            &mut cols[2],
            "Fatality rate",
            &format!("{:.2}%", metrics.fatality_rate),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(22.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Detail table
// ---------------------------------------------------------------------------

/// Virtualised table over the visible records.
pub fn details_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    ui.strong(format!(
        "Details  ({} records)",
        format_count(state.visible_indices.len() as u64)
    ));

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(320.0)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .header(20.0, |mut header| {
            for title in ["UF", "Municipality", "Month", "Hour", "Cause", "Fatalities"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let rec = &dataset.records[state.visible_indices[row.index()]];
                row.col(|ui| {
                    ui.label(rec.uf.as_str());
                });
                row.col(|ui| {
                    ui.label(rec.municipality.as_str());
                });
                row.col(|ui| {
                    ui.label(rec.month.as_str());
                });
                row.col(|ui| {
                    ui.label(format!("{:02}h", rec.hour));
                });
                row.col(|ui| {
                    ui.label(rec.cause.as_str());
                });
                row.col(|ui| {
                    ui.label(rec.fatalities.to_string());
                });
            });
        });
}
