use std::collections::BTreeSet;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Canonical month ordering
// ---------------------------------------------------------------------------

/// The twelve month names exactly as they appear in the source data,
/// in calendar order. Month lists are sorted against this table, never
/// lexicographically.
pub const MONTH_ORDER: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// A month value that is not one of the twelve canonical names.
/// Data-quality defect upstream of this crate; month-list construction
/// must not silently drop or misorder such a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not one of the twelve canonical month names")]
pub struct UnknownMonth(pub String);

/// Calendar position (0-based) of a canonical month name.
pub fn month_index(name: &str) -> Result<usize, UnknownMonth> {
    MONTH_ORDER
        .iter()
        .position(|m| *m == name)
        .ok_or_else(|| UnknownMonth(name.to_string()))
}

/// Sort month names into calendar order.
pub fn sort_months<I, S>(months: I) -> Result<Vec<String>, UnknownMonth>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut indexed: Vec<(usize, String)> = months
        .into_iter()
        .map(|m| month_index(m.as_ref()).map(|i| (i, m.as_ref().to_string())))
        .collect::<Result<_, _>>()?;
    indexed.sort_by_key(|(i, _)| *i);
    Ok(indexed.into_iter().map(|(_, m)| m).collect())
}

// ---------------------------------------------------------------------------
// AccidentRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single accident observation. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    /// Two-letter region code ("SP", "RJ", ...).
    pub uf: String,
    pub municipality: String,
    /// Canonical month name; validated at dataset construction.
    pub month: String,
    /// Hour of day, 0..=23, normalised from the source time-of-day field.
    pub hour: u8,
    /// Free-form accident cause category.
    pub cause: String,
    pub fatalities: u64,
    /// Geographic position; records without one are skipped by the map.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// AccidentDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed unique-value lists for the
/// filter widgets. Loaded once per session and shared read-only; filtering
/// produces index subsets, never in-place edits.
#[derive(Debug, Clone)]
pub struct AccidentDataset {
    /// All records (rows).
    pub records: Vec<AccidentRecord>,
    /// Sorted unique region codes.
    pub regions: Vec<String>,
    /// Sorted unique cause categories.
    pub causes: Vec<String>,
    /// Months actually present in the data, in calendar order.
    pub months: Vec<String>,
}

impl AccidentDataset {
    /// Build the unique-value indices from loaded records.
    ///
    /// Fails if any record carries a month name outside [`MONTH_ORDER`].
    pub fn from_records(records: Vec<AccidentRecord>) -> Result<Self, UnknownMonth> {
        let mut regions: BTreeSet<String> = BTreeSet::new();
        let mut causes: BTreeSet<String> = BTreeSet::new();
        let mut months: BTreeSet<String> = BTreeSet::new();

        for rec in &records {
            regions.insert(rec.uf.clone());
            causes.insert(rec.cause.clone());
            months.insert(rec.month.clone());
        }

        let months = sort_months(months)?;
        Ok(AccidentDataset {
            records,
            regions: regions.into_iter().collect(),
            causes: causes.into_iter().collect(),
            months,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uf: &str, month: &str, cause: &str) -> AccidentRecord {
        AccidentRecord {
            uf: uf.to_string(),
            municipality: String::new(),
            month: month.to_string(),
            hour: 12,
            cause: cause.to_string(),
            fatalities: 0,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn month_index_follows_calendar_order() {
        assert_eq!(month_index("Janeiro"), Ok(0));
        assert_eq!(month_index("Março"), Ok(2));
        assert_eq!(month_index("Dezembro"), Ok(11));
    }

    #[test]
    fn month_index_rejects_unknown_names() {
        assert_eq!(
            month_index("January"),
            Err(UnknownMonth("January".to_string()))
        );
        // Case matters: the canonical list is the source of truth.
        assert!(month_index("janeiro").is_err());
    }

    #[test]
    fn sort_months_uses_calendar_order_not_lexicographic() {
        // Lexicographic would give Abril < Fevereiro < Janeiro.
        let sorted = sort_months(["Fevereiro", "Abril", "Janeiro"]).unwrap();
        assert_eq!(sorted, vec!["Janeiro", "Fevereiro", "Abril"]);
    }

    #[test]
    fn sort_months_fails_loudly_on_unknown_value() {
        let err = sort_months(["Janeiro", "Frimaire"]).unwrap_err();
        assert_eq!(err, UnknownMonth("Frimaire".to_string()));
    }

    #[test]
    fn from_records_builds_sorted_unique_indices() {
        let ds = AccidentDataset::from_records(vec![
            record("RJ", "Fevereiro", "Chuva"),
            record("SP", "Janeiro", "Excesso de velocidade"),
            record("SP", "Fevereiro", "Chuva"),
        ])
        .unwrap();

        assert_eq!(ds.regions, vec!["RJ", "SP"]);
        assert_eq!(ds.causes, vec!["Chuva", "Excesso de velocidade"]);
        assert_eq!(ds.months, vec!["Janeiro", "Fevereiro"]);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn from_records_propagates_month_error() {
        let err = AccidentDataset::from_records(vec![record("SP", "Smarch", "Chuva")]).unwrap_err();
        assert_eq!(err, UnknownMonth("Smarch".to_string()));
    }
}
