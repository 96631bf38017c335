use std::collections::BTreeSet;

use super::model::{AccidentDataset, AccidentRecord};

// ---------------------------------------------------------------------------
// Filter selection: the user's current constraints
// ---------------------------------------------------------------------------

/// Cause selector: the "all causes" sentinel, or one exact category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CauseSelection {
    /// No restriction by cause.
    #[default]
    All,
    /// Only records whose cause equals this string (case-sensitive).
    Only(String),
}

/// The combined user-chosen constraints.
///
/// An empty region or month set means "no restriction on that dimension",
/// not "match nothing": deselecting every month still shows every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub regions: BTreeSet<String>,
    pub months: BTreeSet<String>,
    pub cause: CauseSelection,
}

impl FilterSelection {
    /// Whether every record passes regardless of its field values.
    pub fn is_unrestricted(&self) -> bool {
        self.regions.is_empty() && self.months.is_empty() && self.cause == CauseSelection::All
    }

    /// Whether a record satisfies all active predicates.
    ///
    /// Each predicate reads the record's original field value, so the three
    /// dimensions commute and re-applying the same selection is a no-op.
    pub fn matches(&self, rec: &AccidentRecord) -> bool {
        if !self.regions.is_empty() && !self.regions.contains(&rec.uf) {
            return false;
        }
        if !self.months.is_empty() && !self.months.contains(&rec.month) {
            return false;
        }
        if let CauseSelection::Only(cause) = &self.cause {
            if rec.cause != *cause {
                return false;
            }
        }
        true
    }
}

/// Return indices of records that pass all active predicates.
pub fn filtered_indices(dataset: &AccidentDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
