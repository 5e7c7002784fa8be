//! The immutable sample and dataset snapshot handed to the grouping engine.
//!
//! Samples arrive as a flat list captured once from the lab repository before
//! grouping starts. Parent/child structure is expressed through parent codes;
//! everything else about a sample lives in a free-form property map.

use metric::TxHashMap;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Property holding the organism code of a biological entity.
pub const ORGANISM_PROPERTY: &str = "ORGANISM";
/// Property holding the tissue code of an extract.
pub const TISSUE_PROPERTY: &str = "PRIMARY_TISSUE";
/// Free-text refinement of the tissue, used when the coded tissue is generic.
pub const TISSUE_DETAILED_PROPERTY: &str = "TISSUE_DETAILED";
/// Property holding the preparation/analyte type of a prepared sample.
pub const ANALYTE_PROPERTY: &str = "ANALYTE_TYPE";
/// Property holding the MHC class of a ligand extract.
pub const MHC_CLASS_PROPERTY: &str = "MHC_CLASS";

/// The sample kinds that take part in the lineage graph. Samples carrying
/// any other type tag are invisible to the traversal.
#[derive(
    EnumString,
    EnumIter,
    Display,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum SampleType {
    /// A biological entity, e.g. a donor or a cell line culture.
    #[strum(to_string = "ENTITY")]
    #[serde(rename = "ENTITY")]
    Entity,
    /// Material extracted from an entity, identified by tissue.
    #[strum(to_string = "EXTRACT")]
    #[serde(rename = "EXTRACT")]
    Extract,
    /// A prepared sample ready for measurement.
    #[strum(to_string = "TEST_SAMPLE")]
    #[serde(rename = "TEST_SAMPLE")]
    TestSample,
    /// An MHC ligand extract.
    #[strum(to_string = "LIGAND_EXTRACT")]
    #[serde(rename = "LIGAND_EXTRACT")]
    LigandExtract,
}

/// One sample of the lineage forest, immutable for the duration of grouping.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Sample {
    /// Unique sample code, the canonical identity of the sample everywhere.
    pub code: String,
    /// Raw type tag as recorded in the repository.
    pub type_name: String,
    /// Codes of the immediate parent samples, in repository order.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Free-form lab metadata.
    #[serde(default)]
    pub properties: TxHashMap<String, String>,
}

impl Sample {
    /// The participating sample type, or None for any other type tag.
    pub fn sample_type(&self) -> Option<SampleType> {
        self.type_name.parse().ok()
    }

    /// Look up a property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Organism code of an entity sample.
    pub fn organism_code(&self) -> Option<&str> {
        self.property(ORGANISM_PROPERTY)
    }

    /// Tissue code of an extract sample.
    pub fn tissue_code(&self) -> Option<&str> {
        self.property(TISSUE_PROPERTY)
    }

    /// Free-text tissue refinement of an extract sample.
    pub fn tissue_detailed(&self) -> Option<&str> {
        self.property(TISSUE_DETAILED_PROPERTY)
    }

    /// Preparation/analyte type of a prepared sample.
    pub fn analyte_type(&self) -> Option<&str> {
        self.property(ANALYTE_PROPERTY)
    }

    /// MHC class of a ligand extract sample.
    pub fn mhc_class(&self) -> Option<&str> {
        self.property(MHC_CLASS_PROPERTY)
    }
}

/// A malformed owning-sample identifier on a dataset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("dataset sample identifier {identifier:?} has fewer than 3 /-separated segments")]
pub struct DatasetIdentifierError {
    /// The identifier that failed to parse.
    pub identifier: String,
}

/// A dataset attached to exactly one sample.
///
/// The owning sample is recorded indirectly as a repository path of the form
/// `/SPACE/SAMPLE_CODE`; the sample code is the third `/`-separated segment.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Dataset {
    /// Unique dataset code.
    pub code: String,
    /// Repository identifier of the owning sample.
    pub sample_identifier: String,
}

impl Dataset {
    /// Extract the owning sample code from the repository identifier.
    pub fn owner_code(&self) -> Result<&str, DatasetIdentifierError> {
        self.sample_identifier
            .split('/')
            .nth(2)
            .ok_or_else(|| DatasetIdentifierError {
                identifier: self.sample_identifier.clone(),
            })
    }
}
