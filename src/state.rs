use crate::color::RegionColors;
use crate::data::filter::{filtered_indices, CauseSelection, FilterSelection};
use crate::data::metrics::{summarize, MetricsSummary};
use crate::data::model::AccidentDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is loaded once and then only ever read; `visible_indices`
/// and `metrics` are caches recomputed by [`AppState::refilter`].
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub dataset: Option<AccidentDataset>,

    /// Current region / month / cause constraints.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Summary metrics over the visible records (cached).
    pub metrics: MetricsSummary,

    /// Region colour assignments for the map and filter labels.
    pub region_colors: Option<RegionColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            metrics: MetricsSummary::default(),
            region_colors: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and start with everything selected,
    /// which is equivalent to the unrestricted selection.
    pub fn set_dataset(&mut self, dataset: AccidentDataset) {
        self.selection = FilterSelection {
            regions: dataset.regions.iter().cloned().collect(),
            months: dataset.months.iter().cloned().collect(),
            cause: CauseSelection::All,
        };
        self.region_colors = Some(RegionColors::new(&dataset.regions));
        self.visible_indices = (0..dataset.len()).collect();
        self.metrics = summarize(&dataset.records);

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute the visible set and its metrics after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.selection);
            self.metrics = summarize(self.visible_indices.iter().map(|&i| &ds.records[i]));
            log::info!(
                "filters applied: {} of {} records visible",
                self.visible_indices.len(),
                ds.len()
            );
        }
    }

    /// Toggle one region in the selection.
    pub fn toggle_region(&mut self, uf: &str) {
        if !self.selection.regions.remove(uf) {
            self.selection.regions.insert(uf.to_string());
        }
        self.refilter();
    }

    /// Toggle one month in the selection.
    pub fn toggle_month(&mut self, month: &str) {
        if !self.selection.months.remove(month) {
            self.selection.months.insert(month.to_string());
        }
        self.refilter();
    }

    /// Replace the cause constraint.
    pub fn set_cause(&mut self, cause: CauseSelection) {
        self.selection.cause = cause;
        self.refilter();
    }

    /// Select every region.
    pub fn select_all_regions(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.regions = ds.regions.iter().cloned().collect();
        }
        self.refilter();
    }

    /// Clear the region selection. An empty set means "no restriction",
    /// so this shows all records rather than none.
    pub fn select_no_regions(&mut self) {
        self.selection.regions.clear();
        self.refilter();
    }

    /// Select every month present in the data.
    pub fn select_all_months(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.months = ds.months.iter().cloned().collect();
        }
        self.refilter();
    }

    /// Clear the month selection; like regions, empty means unrestricted.
    pub fn select_no_months(&mut self) {
        self.selection.months.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AccidentRecord;

    fn dataset() -> AccidentDataset {
        let record = |uf: &str, month: &str, cause: &str, fatalities: u64| AccidentRecord {
            uf: uf.to_string(),
            municipality: String::new(),
            month: month.to_string(),
            hour: 8,
            cause: cause.to_string(),
            fatalities,
            latitude: None,
            longitude: None,
        };
        AccidentDataset::from_records(vec![
            record("SP", "Janeiro", "Excesso de velocidade", 1),
            record("RJ", "Fevereiro", "Chuva", 0),
        ])
        .unwrap()
    }

    #[test]
    fn set_dataset_starts_with_everything_visible() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.metrics.total_accidents, 2);
        assert_eq!(state.metrics.fatality_rate, 50.0);
    }

    #[test]
    fn deselecting_every_month_still_shows_all_records() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.select_no_months();

        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn toggling_a_region_refilters_and_updates_metrics() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.toggle_region("RJ");

        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.metrics.total_accidents, 1);
        assert_eq!(state.metrics.total_fatalities, 1);
        assert_eq!(state.metrics.fatality_rate, 100.0);
    }

    #[test]
    fn cause_selection_narrows_to_exact_category() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_cause(CauseSelection::Only("Chuva".to_string()));

        assert_eq!(state.visible_indices, vec![1]);
        assert_eq!(state.metrics.fatality_rate, 0.0);
    }
}
