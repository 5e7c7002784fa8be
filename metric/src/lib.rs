// Copyright (c) 2024 10X Genomics, Inc. All rights reserved.
#![deny(missing_docs)]

//! Deterministic hashed collections and the percent counter used for
//! coverage reporting.
//!
//! Everything downstream of the grouping engine compares run outputs against
//! each other, so the hashed collections used for indexing must behave
//! identically from run to run. `TxHasher` pins the `ahash` seeds to achieve
//! that.

use ahash::AHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

pub mod percent;
pub use crate::percent::PercentMetric;

/// A deterministic and fast hasher.
#[derive(Clone, Copy, Default)]
pub struct TxHasher;

impl TxHasher {
    fn random_state() -> ahash::RandomState {
        ahash::RandomState::with_seeds(0, 0, 0, 0)
    }

    /// Return a new hasher.
    pub fn hasher() -> AHasher {
        Self::random_state().build_hasher()
    }

    /// Calculate the hash of a single value.
    pub fn hash(x: impl Hash) -> u64 {
        Self::random_state().hash_one(x)
    }
}

impl BuildHasher for TxHasher {
    type Hasher = AHasher;

    fn build_hasher(&self) -> Self::Hasher {
        Self::hasher()
    }
}

/// A default HashMap using some faster hashing scheme
pub type TxHashMap<K, V> = HashMap<K, V, TxHasher>;

/// A default HashSet using some faster hashing scheme
pub type TxHashSet<K> = HashSet<K, TxHasher>;
