//! The deduplicated output node of one factor label's grouping graph.

use exp_types::SampleType;
use metric::PercentMetric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity of a summary node within one factor label. Ids are dense,
/// starting at 1 in creation order; a merge reuses the id of the node it
/// folds into.
#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position of this node in its label's creation-ordered node list.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// One bucket of samples sharing the same displayed identity under one
/// factor label.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct SummaryNode {
    /// Node id, unique within the label.
    pub id: NodeId,
    /// The sample type all member samples share.
    pub sample_type: SampleType,
    /// Type-specific origin description (organism, tissue, analyte, MHC class).
    pub source: String,
    /// The full displayed identity; the merge key together with the type and
    /// the parent set.
    pub display_value: String,
    /// The factor value underlying `display_value`, kept verbatim.
    pub raw_factor_value: String,
    /// True when no direct child of the members participates in the lineage.
    pub is_leaf: bool,
    /// Ids of the immediate predecessor nodes within the same label.
    pub parent_ids: BTreeSet<NodeId>,
    /// Ids of the successor nodes, discovered incrementally.
    pub child_ids: BTreeSet<NodeId>,
    /// Codes of the samples folded into this node, in fold order.
    pub member_samples: Vec<String>,
    /// Dataset coverage, present only on leaf-eligible node types.
    pub measured_percent: Option<PercentMetric>,
}

impl SummaryNode {
    /// The merge contract: two nodes of one label collapse exactly when
    /// type, displayed value and immediate parent set coincide.
    pub fn same_group(
        &self,
        sample_type: SampleType,
        display_value: &str,
        parent_ids: &BTreeSet<NodeId>,
    ) -> bool {
        self.sample_type == sample_type
            && self.display_value == display_value
            && &self.parent_ids == parent_ids
    }

    /// Coverage as a whole percentage rounded toward zero, when annotated.
    pub fn coverage_percent(&self) -> Option<u32> {
        self.measured_percent.as_ref()?.floor_percent()
    }
}
