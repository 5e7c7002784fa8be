// Copyright (c) 2024 10X Genomics, Inc. All rights reserved.

//! Condense a laboratory sample lineage into per-factor grouping graphs.
//!
//! The input is a forest of samples (entities, extracts, prepared samples,
//! ligand extracts) connected by parent/child links, plus experimental
//! factors assigned to individual samples. For every factor label this crate
//! runs one breadth-first traversal of the forest, computes each sample's
//! displayed identity under that label, and merges samples whose identity
//! coincides into shared summary nodes while keeping the parent→child
//! linkage of the lineage. A post-pass annotates terminal node types with the
//! fraction of their samples that have datasets attached.
//!
//! The produced [`StructuredExperiment`] is a pure value; rendering it and
//! looking up member samples on node selection is the concern of the caller.

pub mod coverage;
pub mod experiment;
pub mod forest;
pub mod grouping;
mod identity;
pub mod node;

pub use coverage::annotate_coverage;
pub use experiment::{build_structured_experiment, LabelGraph, StructuredExperiment};
pub use forest::SampleForest;
pub use grouping::group_label;
pub use node::{NodeId, SummaryNode};
