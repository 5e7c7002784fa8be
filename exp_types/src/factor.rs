//! Experimental factors: named experimental variables (e.g. "treatment")
//! with per-sample assigned values.

use itertools::Itertools;
use metric::TxHashMap;
use serde::{Deserialize, Serialize};

/// The synthetic factor label that carries no assignment for any sample.
/// Grouping under this label falls back to parent-derived values everywhere.
pub const NONE_LABEL: &str = "None";

/// The value assigned to one sample under one factor label.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct FactorValue {
    /// The assigned value.
    pub value: String,
    /// Optional unit, e.g. "h" for a timepoint.
    pub unit: Option<String>,
}

impl FactorValue {
    /// A unitless factor value.
    pub fn new(value: impl Into<String>) -> Self {
        FactorValue {
            value: value.into(),
            unit: None,
        }
    }

    /// The display form: the value alone, or `value unit`.
    pub fn display(&self) -> String {
        match &self.unit {
            Some(unit) if !unit.is_empty() => format!("{} {unit}", self.value),
            _ => self.value.clone(),
        }
    }
}

/// Lookup of factor values keyed by (factor label, sample code).
#[derive(Clone, Debug, Default)]
pub struct FactorAssignments {
    by_label: TxHashMap<String, TxHashMap<String, FactorValue>>,
}

impl FactorAssignments {
    /// Record the value of one factor for one sample.
    pub fn insert(
        &mut self,
        label: impl Into<String>,
        sample_code: impl Into<String>,
        value: FactorValue,
    ) {
        self.by_label
            .entry(label.into())
            .or_default()
            .insert(sample_code.into(), value);
    }

    /// The value assigned to a sample under a label, if any.
    pub fn get(&self, label: &str, sample_code: &str) -> Option<&FactorValue> {
        self.by_label.get(label)?.get(sample_code)
    }
}

impl<L, C> FromIterator<(L, C, FactorValue)> for FactorAssignments
where
    L: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, C, FactorValue)>>(iter: I) -> Self {
        let mut assignments = FactorAssignments::default();
        for (label, code, value) in iter {
            assignments.insert(label, code, value);
        }
        assignments
    }
}

/// The working label set: the supplied labels in order, de-duplicated, with
/// the "None" label appended when absent.
pub fn label_universe(labels: &[String]) -> Vec<String> {
    let mut universe: Vec<String> = labels.iter().unique().cloned().collect();
    if !universe.iter().any(|l| l == NONE_LABEL) {
        universe.push(NONE_LABEL.to_string());
    }
    universe
}
