//! Display identity of one sample under one factor label.
//!
//! The rules are type-specific: entities are named by organism, extracts by
//! tissue, prepared samples by analyte type, ligand extracts by MHC class. A
//! factor value is displayed at most once along a lineage path; descendants
//! only re-display when they introduce a different own assignment. Samples
//! without an own assignment fall back to a value synthesized from their
//! parents' sources.

use crate::forest::SampleForest;
use exp_types::vocabulary::{TISSUE_CELL_LINE, TISSUE_OTHER};
use exp_types::{FactorAssignments, Sample, SampleType, Vocabularies};
use itertools::Itertools;
use std::collections::BTreeSet;

/// What the resolver needs to know about one already-grouped parent node.
pub(crate) struct ParentView<'a> {
    /// The parent node's source field.
    pub source: &'a str,
    /// Factor values displayed along any path up to and including the parent.
    pub shown_values: &'a BTreeSet<String>,
}

/// The resolved identity tuple, plus the displayed-value set handed down to
/// children for suppression.
pub(crate) struct ResolvedIdentity {
    pub source: String,
    pub display_value: String,
    pub raw_factor_value: String,
    pub is_leaf: bool,
    pub shown_values: BTreeSet<String>,
}

/// Pure function of (sample, per-label parent context, label); invoked once
/// per visit and safe to re-invoke for merge candidates.
pub(crate) fn resolve_identity(
    forest: &SampleForest,
    vocabularies: &Vocabularies,
    factors: &FactorAssignments,
    label: &str,
    sample: &Sample,
    sample_type: SampleType,
    parents: &[ParentView<'_>],
) -> ResolvedIdentity {
    let inherited: BTreeSet<String> = parents
        .iter()
        .flat_map(|p| p.shown_values.iter().cloned())
        .collect();

    let (raw_factor_value, shown) = match factors.get(label, &sample.code) {
        Some(factor) => {
            let display = factor.display();
            let show = !display.is_empty() && !inherited.contains(&display);
            (factor.value.clone(), show.then_some(display))
        }
        None => {
            // No own assignment: synthesize from the parents' sources. The
            // sorted join keeps the value independent of parent order.
            let joined = parents
                .iter()
                .map(|p| p.source)
                .filter(|source| !source.is_empty())
                .sorted()
                .dedup()
                .join("+");
            (joined, None)
        }
    };

    let source = match sample_type {
        SampleType::Entity => sample
            .organism_code()
            .and_then(|code| vocabularies.organism.label_for(code))
            .unwrap_or_default()
            .to_string(),
        SampleType::Extract => tissue_source(sample, vocabularies),
        SampleType::TestSample => sample.analyte_type().unwrap_or_default().to_string(),
        SampleType::LigandExtract => sample.mhc_class().unwrap_or_default().to_string(),
    };

    let display_value = match sample_type {
        SampleType::Entity | SampleType::TestSample => {
            join_source_and_factor(&source, shown.as_deref())
        }
        SampleType::Extract => match shown.as_deref() {
            // Avoid "Liver Liver" when the factor value repeats the tissue.
            Some(factor) if factor == source => source.clone(),
            other => join_source_and_factor(&source, other),
        },
        SampleType::LigandExtract => source.clone(),
    };

    let is_leaf = !forest
        .children_of(&sample.code)
        .iter()
        .any(|child| forest.participating_type(child).is_some());

    let mut shown_values = inherited;
    if let Some(factor) = shown {
        shown_values.insert(factor);
    }

    ResolvedIdentity {
        source,
        display_value,
        raw_factor_value,
        is_leaf,
        shown_values,
    }
}

/// Tissue name of an extract. The generic "Other" and "Cell Line" labels are
/// replaced by the free-text detailed tissue when one is recorded.
fn tissue_source(sample: &Sample, vocabularies: &Vocabularies) -> String {
    let coded = sample
        .tissue_code()
        .and_then(|code| vocabularies.tissue.label_for(code))
        .unwrap_or_default();
    if coded == TISSUE_OTHER || coded == TISSUE_CELL_LINE {
        if let Some(detailed) = sample.tissue_detailed() {
            if !detailed.is_empty() {
                return detailed.to_string();
            }
        }
    }
    coded.to_string()
}

fn join_source_and_factor(source: &str, factor: Option<&str>) -> String {
    match factor {
        None | Some("") => source.to_string(),
        Some(factor) if source.is_empty() => factor.to_string(),
        Some(factor) => format!("{source} {factor}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp_types::{FactorValue, GroupingConfig};

    fn sample_with(code: &str, type_name: &str, properties: &[(&str, &str)]) -> Sample {
        Sample {
            code: code.to_string(),
            type_name: type_name.to_string(),
            parents: vec![],
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn vocabularies() -> Vocabularies {
        Vocabularies {
            organism: [("9606", "Human"), ("10090", "Mouse")].into_iter().collect(),
            tissue: [("BTO1", "Liver"), ("BTO2", "Other"), ("BTO3", "Cell Line")]
                .into_iter()
                .collect(),
        }
    }

    fn empty_forest() -> SampleForest {
        SampleForest::new(vec![], vec![], GroupingConfig::default()).unwrap()
    }

    fn resolve(
        forest: &SampleForest,
        factors: &FactorAssignments,
        label: &str,
        sample: &Sample,
        parents: &[ParentView<'_>],
    ) -> ResolvedIdentity {
        resolve_identity(
            forest,
            &vocabularies(),
            factors,
            label,
            sample,
            sample.sample_type().unwrap(),
            parents,
        )
    }

    #[test]
    fn test_entity_appends_own_factor() {
        let forest = empty_forest();
        let factors: FactorAssignments =
            [("treatment", "E1", FactorValue::new("Control"))].into_iter().collect();
        let sample = sample_with("E1", "ENTITY", &[("ORGANISM", "9606")]);
        let identity = resolve(&forest, &factors, "treatment", &sample, &[]);
        assert_eq!(identity.source, "Human");
        assert_eq!(identity.display_value, "Human Control");
        assert_eq!(identity.raw_factor_value, "Control");
        assert_eq!(
            identity.shown_values.iter().collect::<Vec<_>>(),
            ["Control"]
        );
    }

    #[test]
    fn test_missing_vocabulary_entry_gives_empty_source() {
        let forest = empty_forest();
        let factors = FactorAssignments::default();
        let sample = sample_with("E1", "ENTITY", &[("ORGANISM", "12345")]);
        let identity = resolve(&forest, &factors, "None", &sample, &[]);
        assert_eq!(identity.source, "");
        assert_eq!(identity.display_value, "");
    }

    #[test]
    fn test_extract_detailed_tissue_override() {
        let forest = empty_forest();
        let factors = FactorAssignments::default();
        let generic = sample_with(
            "X1",
            "EXTRACT",
            &[("PRIMARY_TISSUE", "BTO2"), ("TISSUE_DETAILED", "Hepatocyte culture")],
        );
        let identity = resolve(&forest, &factors, "None", &generic, &[]);
        assert_eq!(identity.source, "Hepatocyte culture");

        // A specific tissue keeps its coded name even when free text exists.
        let specific = sample_with(
            "X2",
            "EXTRACT",
            &[("PRIMARY_TISSUE", "BTO1"), ("TISSUE_DETAILED", "ignored")],
        );
        let identity = resolve(&forest, &factors, "None", &specific, &[]);
        assert_eq!(identity.source, "Liver");

        let cell_line = sample_with(
            "X3",
            "EXTRACT",
            &[("PRIMARY_TISSUE", "BTO3"), ("TISSUE_DETAILED", "HeLa")],
        );
        let identity = resolve(&forest, &factors, "None", &cell_line, &[]);
        assert_eq!(identity.source, "HeLa");
    }

    #[test]
    fn test_extract_value_not_doubled_when_factor_equals_source() {
        let forest = empty_forest();
        let factors: FactorAssignments =
            [("tissue", "X1", FactorValue::new("Liver"))].into_iter().collect();
        let sample = sample_with("X1", "EXTRACT", &[("PRIMARY_TISSUE", "BTO1")]);
        let identity = resolve(&forest, &factors, "tissue", &sample, &[]);
        assert_eq!(identity.display_value, "Liver");
    }

    #[test]
    fn test_ligand_extract_never_appends_factor() {
        let forest = empty_forest();
        let factors: FactorAssignments =
            [("treatment", "L1", FactorValue::new("Control"))].into_iter().collect();
        let sample = sample_with("L1", "LIGAND_EXTRACT", &[("MHC_CLASS", "MHC Class I")]);
        let identity = resolve(&forest, &factors, "treatment", &sample, &[]);
        assert_eq!(identity.display_value, "MHC Class I");
        // The assignment is still carried verbatim.
        assert_eq!(identity.raw_factor_value, "Control");
    }

    #[test]
    fn test_synthesized_fallback_joins_parent_sources() {
        let forest = empty_forest();
        let factors = FactorAssignments::default();
        let sample = sample_with("T1", "TEST_SAMPLE", &[("ANALYTE_TYPE", "Peptides")]);
        let empty = BTreeSet::new();
        let a = ParentView { source: "A", shown_values: &empty };
        let b = ParentView { source: "B", shown_values: &empty };
        let forward = resolve(&forest, &factors, "None", &sample, &[a, b]);
        assert_eq!(forward.raw_factor_value, "A+B");

        let a = ParentView { source: "A", shown_values: &empty };
        let b = ParentView { source: "B", shown_values: &empty };
        let reversed = resolve(&forest, &factors, "None", &sample, &[b, a]);
        assert_eq!(reversed.raw_factor_value, "A+B");

        // The synthesized value never shows up in the display.
        assert_eq!(forward.display_value, "Peptides");
    }

    #[test]
    fn test_own_value_suppressed_under_ancestor_display() {
        let forest = empty_forest();
        let factors: FactorAssignments =
            [("treatment", "T1", FactorValue::new("Control"))].into_iter().collect();
        let sample = sample_with("T1", "TEST_SAMPLE", &[("ANALYTE_TYPE", "Peptides")]);

        let shown: BTreeSet<String> = ["Control".to_string()].into_iter().collect();
        let parent = ParentView { source: "Liver", shown_values: &shown };
        let identity = resolve(&forest, &factors, "treatment", &sample, &[parent]);
        assert_eq!(identity.display_value, "Peptides");
        assert_eq!(identity.raw_factor_value, "Control");
        // The suppressed value still rides along for deeper descendants.
        assert!(identity.shown_values.contains("Control"));
    }

    #[test]
    fn test_different_own_value_shown_under_ancestor_display() {
        let forest = empty_forest();
        let factors: FactorAssignments =
            [("treatment", "T1", FactorValue::new("Infected"))].into_iter().collect();
        let sample = sample_with("T1", "TEST_SAMPLE", &[("ANALYTE_TYPE", "Peptides")]);

        let shown: BTreeSet<String> = ["Control".to_string()].into_iter().collect();
        let parent = ParentView { source: "Liver", shown_values: &shown };
        let identity = resolve(&forest, &factors, "treatment", &sample, &[parent]);
        assert_eq!(identity.display_value, "Peptides Infected");
        assert_eq!(
            identity.shown_values.iter().collect::<Vec<_>>(),
            ["Control", "Infected"]
        );
    }

    #[test]
    fn test_is_leaf_ignores_non_participating_children() {
        let forest = SampleForest::new(
            vec![
                sample_with("E1", "ENTITY", &[("ORGANISM", "9606")]),
                Sample {
                    code: "M1".to_string(),
                    type_name: "MS_INJECTION".to_string(),
                    parents: vec!["E1".to_string()],
                    properties: Default::default(),
                },
            ],
            vec![],
            GroupingConfig::default(),
        )
        .unwrap();
        let factors = FactorAssignments::default();
        let entity = forest.get("E1").unwrap();
        let identity = resolve(&forest, &factors, "None", entity, &[]);
        assert!(identity.is_leaf);
    }
}
