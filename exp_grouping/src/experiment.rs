//! Assembly of the per-label graphs into the final artifact.

use crate::coverage::annotate_coverage;
use crate::forest::SampleForest;
use crate::grouping::group_label;
use crate::node::SummaryNode;
use anyhow::Result;
use exp_types::{label_universe, Dataset, FactorAssignments, GroupingConfig, Sample, Vocabularies};
use log::debug;
use metric::TxHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One factor label's finished grouping graph, nodes in creation order.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct LabelGraph {
    /// The factor label this graph was grouped under.
    pub label: String,
    /// The label's summary nodes in creation order.
    pub nodes: Vec<SummaryNode>,
}

/// The grouped view of a whole experiment: one graph per factor label, plus
/// the code→sample index a viewer needs to list a node's members on
/// selection.
#[derive(Serialize, Clone, Debug)]
pub struct StructuredExperiment {
    graphs: Vec<LabelGraph>,
    samples: TxHashMap<String, Sample>,
}

impl StructuredExperiment {
    /// The factor labels, in working order ("None" included).
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.graphs.iter().map(|g| g.label.as_str())
    }

    /// All per-label graphs in working order.
    pub fn graphs(&self) -> &[LabelGraph] {
        &self.graphs
    }

    /// The summary nodes grouped under one label.
    pub fn graph(&self, label: &str) -> Option<&[SummaryNode]> {
        self.graphs
            .iter()
            .find(|g| g.label == label)
            .map(|g| g.nodes.as_slice())
    }

    /// Drill-down lookup of an original sample.
    pub fn sample(&self, code: &str) -> Option<&Sample> {
        self.samples.get(code)
    }

    /// Render the artifact for the visualization layer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the structured experiment for one snapshot: group every factor
/// label (plus the "None" view) and annotate coverage.
///
/// Grouping itself never fails; a degraded snapshot (unknown vocabulary
/// codes, malformed dataset identifiers, missing properties) degrades the
/// displayed values instead. The only error path is an inconsistent snapshot
/// rejected while indexing, before any grouping starts.
pub fn build_structured_experiment(
    samples: Vec<Sample>,
    datasets: Vec<Dataset>,
    factor_labels: &[String],
    factors: &FactorAssignments,
    vocabularies: &Vocabularies,
    config: GroupingConfig,
) -> Result<StructuredExperiment> {
    let forest = SampleForest::new(samples, datasets, config)?;
    let labels = label_universe(factor_labels);
    // Labels never read or write each other's state, so they fan out freely.
    let graphs: Vec<LabelGraph> = labels
        .into_par_iter()
        .map(|label| {
            let mut nodes = group_label(&forest, vocabularies, factors, &label);
            annotate_coverage(&forest, &mut nodes);
            debug!("grouped label {label:?} into {} summary nodes", nodes.len());
            LabelGraph { label, nodes }
        })
        .collect();
    Ok(StructuredExperiment {
        graphs,
        samples: forest.into_samples(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;
    use exp_types::{FactorValue, SampleType, NONE_LABEL};

    fn sample(code: &str, type_name: &str, parents: &[&str], properties: &[(&str, &str)]) -> Sample {
        Sample {
            code: code.to_string(),
            type_name: type_name.to_string(),
            parents: parents.iter().map(ToString::to_string).collect(),
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn snapshot() -> (Vec<Sample>, Vec<Dataset>) {
        let samples = vec![
            sample("E1", "ENTITY", &[], &[("ORGANISM", "9606")]),
            sample("X1", "EXTRACT", &["E1"], &[("PRIMARY_TISSUE", "BTO1")]),
            sample(
                "T1",
                "TEST_SAMPLE",
                &["X1"],
                &[("ANALYTE_TYPE", "Peptides")],
            ),
        ];
        let datasets = vec![Dataset {
            code: "DS1".to_string(),
            sample_identifier: "/LAB/T1".to_string(),
        }];
        (samples, datasets)
    }

    fn vocabularies() -> Vocabularies {
        Vocabularies {
            organism: [("9606", "Human")].into_iter().collect(),
            tissue: [("BTO1", "Liver")].into_iter().collect(),
        }
    }

    fn build() -> StructuredExperiment {
        let (samples, datasets) = snapshot();
        let factors: FactorAssignments =
            [("treatment", "E1", FactorValue::new("Control"))].into_iter().collect();
        build_structured_experiment(
            samples,
            datasets,
            &["treatment".to_string()],
            &factors,
            &vocabularies(),
            GroupingConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_labels_include_none_view() {
        let experiment = build();
        assert_eq!(experiment.labels().collect::<Vec<_>>(), ["treatment", "None"]);
    }

    #[test]
    fn test_treatment_graph() {
        let experiment = build();
        let nodes = experiment.graph("treatment").unwrap();
        assert_eq!(nodes.len(), 3);

        assert_eq!(nodes[0].display_value, "Human Control");
        assert_eq!(nodes[1].display_value, "Liver");
        assert_eq!(nodes[2].display_value, "Peptides");
        assert_eq!(nodes[2].parent_ids, [NodeId(2)].into_iter().collect());

        // Only the prepared sample is coverage-annotated, and it is measured.
        assert_eq!(nodes[0].coverage_percent(), None);
        assert_eq!(nodes[2].coverage_percent(), Some(100));
    }

    #[test]
    fn test_none_view_has_no_factor_values() {
        let experiment = build();
        let nodes = experiment.graph(NONE_LABEL).unwrap();
        assert_eq!(nodes[0].display_value, "Human");
        assert_eq!(nodes[0].raw_factor_value, "");
        assert_eq!(nodes[1].raw_factor_value, "Human");
    }

    #[test]
    fn test_drill_down_index() {
        let experiment = build();
        let entity = experiment.sample("E1").unwrap();
        assert_eq!(entity.sample_type(), Some(SampleType::Entity));
        assert!(experiment.sample("UNKNOWN").is_none());
    }

    #[test]
    fn test_duplicate_sample_code_is_rejected() {
        let samples = vec![
            sample("E1", "ENTITY", &[], &[]),
            sample("E1", "ENTITY", &[], &[]),
        ];
        let result = build_structured_experiment(
            samples,
            vec![],
            &[],
            &FactorAssignments::default(),
            &Vocabularies::default(),
            GroupingConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_json_artifact() {
        let experiment = build();
        let json = experiment.to_json().unwrap();
        assert!(json.contains("\"Human Control\""));
        assert!(json.contains("\"treatment\""));
    }
}
