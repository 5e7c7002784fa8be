//! Grouping configuration.

use crate::sample::SampleType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

/// Which sample types take part in the traversal, which of them represent
/// terminal measurable entities, and how deep the dataset-coverage search
/// descends below a member sample.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GroupingConfig {
    /// Types visible to the lineage traversal.
    pub participating: BTreeSet<SampleType>,
    /// Types annotated with a dataset-coverage percentage.
    pub leaf_eligible: BTreeSet<SampleType>,
    /// How many parent→child steps the coverage search may take below a
    /// member sample.
    pub coverage_depth: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        GroupingConfig {
            participating: SampleType::iter().collect(),
            leaf_eligible: [SampleType::TestSample, SampleType::LigandExtract]
                .into_iter()
                .collect(),
            coverage_depth: 1,
        }
    }
}

impl GroupingConfig {
    /// Does this type take part in the lineage traversal?
    pub fn participates(&self, sample_type: SampleType) -> bool {
        self.participating.contains(&sample_type)
    }

    /// Is this type eligible for the coverage annotation?
    pub fn is_leaf_eligible(&self, sample_type: SampleType) -> bool {
        self.leaf_eligible.contains(&sample_type)
    }
}
