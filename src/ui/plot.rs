use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::generate_palette;
use crate::data::model::AccidentRecord;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Geographic scatter map
// ---------------------------------------------------------------------------

/// Plot the visible records on a lon/lat scatter, one series per region.
/// Records without coordinates are skipped.
pub fn accident_map(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    let mut by_region: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for &idx in &state.visible_indices {
        let rec = &dataset.records[idx];
        if let (Some(lat), Some(lon)) = (rec.latitude, rec.longitude) {
            by_region.entry(rec.uf.as_str()).or_default().push([lon, lat]);
        }
    }

    ui.strong("Accident locations");
    Plot::new("accident_map")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .height(360.0)
        .show(ui, |plot_ui| {
            for (uf, coords) in by_region {
                let color = state
                    .region_colors
                    .as_ref()
                    .map(|c| c.color_for(uf))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points = Points::new(PlotPoints::from(coords))
                    .name(uf)
                    .color(color)
                    .radius(2.0);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Hourly distribution
// ---------------------------------------------------------------------------

/// Count records per hour of day.
pub fn hourly_counts<'a, I>(records: I) -> [u64; 24]
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    let mut counts = [0u64; 24];
    for rec in records {
        counts[rec.hour as usize % 24] += 1;
    }
    counts
}

/// Bar chart of accidents per hour over the visible records.
pub fn hourly_distribution(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let counts = hourly_counts(state.visible_indices.iter().map(|&i| &dataset.records[i]));

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| Bar::new(hour as f64, count as f64).width(0.9))
        .collect();

    ui.strong("Accidents by hour of day");
    Plot::new("hourly_distribution")
        .x_axis_label("Hour")
        .y_axis_label("Accidents")
        .allow_drag(false)
        .allow_scroll(false)
        .height(240.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

// ---------------------------------------------------------------------------
// Top causes ranking
// ---------------------------------------------------------------------------

/// The `limit` most frequent causes among the given records, descending.
/// Ties break on cause name so the ranking is stable.
pub fn top_causes<'a, I>(records: I, limit: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for rec in records {
        *counts.entry(rec.cause.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(cause, count)| (cause.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Horizontal bar ranking of the ten most frequent causes.
pub fn top_causes_chart(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let ranked = top_causes(
        state.visible_indices.iter().map(|&i| &dataset.records[i]),
        10,
    );
    let palette = generate_palette(ranked.len());

    ui.strong("Top accident causes");
    Plot::new("top_causes")
        .legend(Legend::default())
        .x_axis_label("Accidents")
        .show_axes([true, false])
        .allow_drag(false)
        .allow_scroll(false)
        .height(240.0)
        .show(ui, |plot_ui| {
            let n = ranked.len();
            for (rank, (cause, count)) in ranked.iter().enumerate() {
                // Most frequent cause at the top of the chart.
                let y = (n - 1 - rank) as f64;
                let bar = Bar::new(y, *count as f64).width(0.7);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .horizontal()
                        .name(cause)
                        .color(palette[rank]),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hour: u8, cause: &str) -> AccidentRecord {
        AccidentRecord {
            uf: "SP".to_string(),
            municipality: String::new(),
            month: "Janeiro".to_string(),
            hour,
            cause: cause.to_string(),
            fatalities: 0,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn hourly_counts_bins_by_hour() {
        let records = [record(7, "Chuva"), record(7, "Chuva"), record(18, "Chuva")];
        let counts = hourly_counts(records.iter());
        assert_eq!(counts[7], 2);
        assert_eq!(counts[18], 1);
        assert_eq!(counts.iter().sum::<u64>(), 3);
    }

    #[test]
    fn top_causes_ranks_descending_with_stable_ties() {
        let records = [
            record(1, "Chuva"),
            record(2, "Chuva"),
            record(3, "Excesso de velocidade"),
            record(4, "Animais na pista"),
            record(5, "Animais na pista"),
        ];
        let ranked = top_causes(records.iter(), 10);
        assert_eq!(
            ranked,
            vec![
                ("Animais na pista".to_string(), 2),
                ("Chuva".to_string(), 2),
                ("Excesso de velocidade".to_string(), 1),
            ]
        );
    }

    #[test]
    fn top_causes_respects_limit() {
        let records = [
            record(1, "A"),
            record(2, "B"),
            record(3, "C"),
            record(4, "C"),
        ];
        let ranked = top_causes(records.iter(), 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, "C");
    }
}
