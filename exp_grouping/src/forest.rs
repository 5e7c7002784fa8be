//! Read-only indices over the sample snapshot: code→sample, reverse
//! parent→children links, and the sample-code→dataset index.

use anyhow::{bail, Result};
use exp_types::{Dataset, GroupingConfig, Sample, SampleType};
use metric::TxHashMap;

/// The indexed sample forest. Built once from the snapshot before grouping
/// starts and never mutated afterwards.
pub struct SampleForest {
    config: GroupingConfig,
    samples: TxHashMap<String, Sample>,
    /// Sample codes in snapshot order; keeps root and child enumeration
    /// deterministic.
    order: Vec<String>,
    children: TxHashMap<String, Vec<String>>,
    datasets: TxHashMap<String, Vec<Dataset>>,
}

impl SampleForest {
    /// Index the snapshot. Duplicate sample codes violate the snapshot
    /// contract and fail construction; a dataset with a malformed owning
    /// identifier is excluded from the index and logged.
    pub fn new(
        samples: Vec<Sample>,
        datasets: Vec<Dataset>,
        config: GroupingConfig,
    ) -> Result<SampleForest> {
        let mut order = Vec::with_capacity(samples.len());
        let mut by_code: TxHashMap<String, Sample> = TxHashMap::default();
        for sample in samples {
            if by_code.contains_key(&sample.code) {
                bail!("duplicate sample code {:?} in snapshot", sample.code);
            }
            order.push(sample.code.clone());
            by_code.insert(sample.code.clone(), sample);
        }

        let mut children: TxHashMap<String, Vec<String>> = TxHashMap::default();
        for code in &order {
            for parent in &by_code[code].parents {
                children.entry(parent.clone()).or_default().push(code.clone());
            }
        }

        let mut dataset_index: TxHashMap<String, Vec<Dataset>> = TxHashMap::default();
        for dataset in datasets {
            let owner = match dataset.owner_code() {
                Ok(owner) => owner.to_string(),
                Err(err) => {
                    log::warn!("excluding dataset {}: {err}", dataset.code);
                    continue;
                }
            };
            dataset_index.entry(owner).or_default().push(dataset);
        }

        Ok(SampleForest {
            config,
            samples: by_code,
            order,
            children,
            datasets: dataset_index,
        })
    }

    /// The grouping configuration this forest was indexed under.
    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Look up a sample by code.
    pub fn get(&self, code: &str) -> Option<&Sample> {
        self.samples.get(code)
    }

    /// The sample's type if it is participating, None otherwise.
    pub fn participating_type(&self, code: &str) -> Option<SampleType> {
        self.get(code)?
            .sample_type()
            .filter(|t| self.config.participates(*t))
    }

    /// Codes of the direct children of a sample, in snapshot order.
    pub fn children_of(&self, code: &str) -> &[String] {
        self.children.get(code).map(Vec::as_slice).unwrap_or_default()
    }

    /// Datasets attached to a sample.
    pub fn datasets_for_code(&self, code: &str) -> &[Dataset] {
        self.datasets.get(code).map(Vec::as_slice).unwrap_or_default()
    }

    /// The forest roots: participating samples with no parents, in snapshot
    /// order. The snapshot is a forest, so several roots are expected.
    pub fn roots(&self) -> Vec<&Sample> {
        self.order
            .iter()
            .map(|code| &self.samples[code])
            .filter(|sample| {
                sample.parents.is_empty()
                    && sample
                        .sample_type()
                        .is_some_and(|t| self.config.participates(t))
            })
            .collect()
    }

    /// Number of samples in the snapshot.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the snapshot holds no samples.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Release the code→sample index for drill-down use.
    pub fn into_samples(self) -> TxHashMap<String, Sample> {
        self.samples
    }
}
