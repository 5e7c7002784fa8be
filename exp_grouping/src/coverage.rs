//! Dataset-coverage annotation for terminal node types.

use crate::forest::SampleForest;
use crate::node::SummaryNode;
use metric::PercentMetric;
use std::collections::BTreeSet;

/// Annotate every leaf-eligible node with the fraction of its expected
/// samples that carry at least one dataset within the configured depth
/// below them. Other node types are left untouched.
pub fn annotate_coverage(forest: &SampleForest, nodes: &mut [SummaryNode]) {
    for node in nodes.iter_mut() {
        if !forest.config().is_leaf_eligible(node.sample_type) {
            continue;
        }
        let mut covered = BTreeSet::new();
        for code in &node.member_samples {
            collect_covered(forest, code, forest.config().coverage_depth, &mut covered);
        }
        let num_data = covered.len();
        // A single member's descendants can hold more dataset-bearing codes
        // than the node has members; raise the expectation so the percentage
        // stays within 100.
        let expected = node.member_samples.len().max(num_data);
        node.measured_percent = Some(PercentMetric::from_parts(num_data as i64, expected as i64));
    }
}

/// Record every dataset-bearing sample code reachable from `code` in at most
/// `depth` parent→child steps. A code missing from the snapshot contributes
/// nothing; coverage is best-effort.
fn collect_covered(forest: &SampleForest, code: &str, depth: usize, covered: &mut BTreeSet<String>) {
    if forest.get(code).is_none() {
        return;
    }
    if !forest.datasets_for_code(code).is_empty() {
        covered.insert(code.to_string());
    }
    if depth == 0 {
        return;
    }
    for child in forest.children_of(code) {
        collect_covered(forest, child, depth - 1, covered);
    }
}
