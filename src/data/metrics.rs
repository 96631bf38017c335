use super::model::AccidentRecord;

// ---------------------------------------------------------------------------
// Summary metrics over a record set
// ---------------------------------------------------------------------------

/// Aggregate figures for the record set currently on screen.
/// Derived on every filter change, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsSummary {
    pub total_accidents: usize,
    pub total_fatalities: u64,
    /// Fatalities per accident as a percentage; 0 for an empty set.
    pub fatality_rate: f64,
}

/// Compute the summary for any record set.
pub fn summarize<'a, I>(records: I) -> MetricsSummary
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    let mut total_accidents = 0usize;
    let mut total_fatalities = 0u64;
    for rec in records {
        total_accidents += 1;
        total_fatalities += rec.fatalities;
    }

    let fatality_rate = if total_accidents > 0 {
        (total_fatalities as f64 / total_accidents as f64) * 100.0
    } else {
        0.0
    };

    MetricsSummary {
        total_accidents,
        total_fatalities,
        fatality_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, CauseSelection, FilterSelection};
    use crate::data::model::{AccidentDataset, AccidentRecord};

    fn record(uf: &str, month: &str, cause: &str, fatalities: u64) -> AccidentRecord {
        AccidentRecord {
            uf: uf.to_string(),
            municipality: String::new(),
            month: month.to_string(),
            hour: 12,
            cause: cause.to_string(),
            fatalities,
            latitude: None,
            longitude: None,
        }
    }

    fn two_record_dataset() -> AccidentDataset {
        AccidentDataset::from_records(vec![
            record("SP", "Janeiro", "Excesso de velocidade", 1),
            record("RJ", "Fevereiro", "Chuva", 0),
        ])
        .unwrap()
    }

    #[test]
    fn empty_set_yields_zero_rate_without_division_error() {
        let records: Vec<AccidentRecord> = Vec::new();
        let summary = summarize(&records);
        assert_eq!(summary.total_accidents, 0);
        assert_eq!(summary.total_fatalities, 0);
        assert_eq!(summary.fatality_rate, 0.0);
        assert!(!summary.fatality_rate.is_nan());
    }

    #[test]
    fn single_fatal_record_has_rate_100() {
        let ds = two_record_dataset();
        let sel = FilterSelection {
            regions: ["SP".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let indices = filtered_indices(&ds, &sel);
        let summary = summarize(indices.iter().map(|&i| &ds.records[i]));

        assert_eq!(summary.total_accidents, 1);
        assert_eq!(summary.total_fatalities, 1);
        assert_eq!(summary.fatality_rate, 100.0);
    }

    #[test]
    fn unrestricted_selection_summarizes_whole_set() {
        let ds = two_record_dataset();
        let summary = summarize(&ds.records);

        assert_eq!(summary.total_accidents, 2);
        assert_eq!(summary.total_fatalities, 1);
        assert_eq!(summary.fatality_rate, 50.0);
    }

    #[test]
    fn no_matching_records_gives_all_zero_metrics() {
        let ds = two_record_dataset();
        let sel = FilterSelection {
            regions: ["SP".to_string(), "RJ".to_string()].into_iter().collect(),
            months: ["Março".to_string()].into_iter().collect(),
            cause: CauseSelection::All,
        };
        let indices = filtered_indices(&ds, &sel);
        let summary = summarize(indices.iter().map(|&i| &ds.records[i]));

        assert_eq!(summary.total_accidents, 0);
        assert_eq!(summary.total_fatalities, 0);
        assert_eq!(summary.fatality_rate, 0.0);
    }

    #[test]
    fn filtering_never_increases_fatality_totals() {
        let ds = AccidentDataset::from_records(vec![
            record("SP", "Janeiro", "Chuva", 2),
            record("RJ", "Fevereiro", "Chuva", 3),
            record("MG", "Março", "Excesso de velocidade", 1),
        ])
        .unwrap();
        let full = summarize(&ds.records);

        let selections = [
            FilterSelection::default(),
            FilterSelection {
                regions: ["RJ".to_string()].into_iter().collect(),
                ..Default::default()
            },
            FilterSelection {
                cause: CauseSelection::Only("Chuva".to_string()),
                ..Default::default()
            },
            FilterSelection {
                months: ["Dezembro".to_string()].into_iter().collect(),
                ..Default::default()
            },
        ];

        for sel in selections {
            let indices = filtered_indices(&ds, &sel);
            let filtered = summarize(indices.iter().map(|&i| &ds.records[i]));
            assert!(filtered.total_fatalities <= full.total_fatalities);
            assert!(filtered.total_accidents <= full.total_accidents);
        }
    }
}
