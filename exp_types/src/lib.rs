// Warning groups (as of rust 1.55)
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2018_idioms,
    unused
)]

//! Value types shared by the sample-lineage grouping pipeline: the immutable
//! sample snapshot, datasets, experimental factors, controlled vocabularies
//! and the grouping configuration.

pub mod config;
pub mod factor;
pub mod sample;
pub mod vocabulary;

pub use config::GroupingConfig;
pub use factor::{label_universe, FactorAssignments, FactorValue, NONE_LABEL};
pub use sample::{Dataset, DatasetIdentifierError, Sample, SampleType};
pub use vocabulary::{Vocabularies, Vocabulary};
