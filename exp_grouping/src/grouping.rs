// Copyright (c) 2024 10X Genomics, Inc. All rights reserved.

//! The per-label grouping engine: one breadth-first traversal of the sample
//! forest per factor label, merging samples with coinciding display identity
//! into shared summary nodes.

use crate::forest::SampleForest;
use crate::identity::{resolve_identity, ParentView};
use crate::node::{NodeId, SummaryNode};
use exp_types::{FactorAssignments, Vocabularies};
use metric::{TxHashMap, TxHashSet};
use std::collections::{BTreeSet, VecDeque};

/// Mutable traversal state of one label. Every label owns its state
/// exclusively; nothing here is shared across labels.
struct GroupingState {
    /// Finished and in-progress nodes, in creation order. The position of a
    /// node is `id - 1`, so ids stay dense without bookkeeping.
    nodes: Vec<SummaryNode>,
    /// For each node, the factor values displayed along any path to it.
    /// Parallel to `nodes`; traversal-internal, not part of the output.
    shown_values: Vec<BTreeSet<String>>,
    /// Summary nodes recorded as incoming parents of a sample not yet
    /// expanded. A sample with several parents, or reachable on several
    /// paths, accumulates several entries.
    incoming: TxHashMap<String, BTreeSet<NodeId>>,
    visited: TxHashSet<String>,
    queue: VecDeque<String>,
}

impl GroupingState {
    fn new(roots: impl IntoIterator<Item = String>) -> Self {
        GroupingState {
            nodes: Vec::new(),
            shown_values: Vec::new(),
            incoming: TxHashMap::default(),
            visited: TxHashSet::default(),
            queue: roots.into_iter().collect(),
        }
    }

    fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32 + 1)
    }
}

/// Group the forest under one factor label. Returns the label's summary
/// nodes in creation order.
pub fn group_label(
    forest: &SampleForest,
    vocabularies: &Vocabularies,
    factors: &FactorAssignments,
    label: &str,
) -> Vec<SummaryNode> {
    let mut state = GroupingState::new(forest.roots().iter().map(|s| s.code.clone()));

    while let Some(code) = state.queue.pop_front() {
        if !state.visited.insert(code.clone()) {
            continue;
        }
        let Some(sample) = forest.get(&code) else {
            continue;
        };
        let Some(sample_type) = forest.participating_type(&code) else {
            continue;
        };

        let parent_ids = state.incoming.get(&code).cloned().unwrap_or_default();
        let parents: Vec<ParentView<'_>> = parent_ids
            .iter()
            .map(|id| ParentView {
                source: &state.nodes[id.index()].source,
                shown_values: &state.shown_values[id.index()],
            })
            .collect();
        let identity =
            resolve_identity(forest, vocabularies, factors, label, sample, sample_type, &parents);

        let node_id = match state
            .nodes
            .iter()
            .position(|n| n.same_group(sample_type, &identity.display_value, &parent_ids))
        {
            Some(position) => {
                let node = &mut state.nodes[position];
                node.member_samples.push(code.clone());
                node.id
            }
            None => {
                let id = state.next_id();
                state.nodes.push(SummaryNode {
                    id,
                    sample_type,
                    source: identity.source,
                    display_value: identity.display_value,
                    raw_factor_value: identity.raw_factor_value,
                    is_leaf: identity.is_leaf,
                    parent_ids: parent_ids.clone(),
                    child_ids: BTreeSet::new(),
                    member_samples: vec![code.clone()],
                    measured_percent: None,
                });
                state.shown_values.push(identity.shown_values);
                id
            }
        };

        for parent_id in &parent_ids {
            state.nodes[parent_id.index()].child_ids.insert(node_id);
        }

        for child in forest.children_of(&code) {
            if forest.participating_type(child).is_some() {
                state.incoming.entry(child.clone()).or_default().insert(node_id);
                state.queue.push_back(child.clone());
            }
        }
    }

    state.nodes
}
