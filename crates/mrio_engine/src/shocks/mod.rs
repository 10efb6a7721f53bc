//! Elementary shocks and ordered shock sets.
//!
//! A [`Shock`] is one (region, sector, magnitude) perturbation; a
//! [`ShockSet`] is an ordered collection with unique (region, sector) keys,
//! which is exactly what the partitioned solver takes as its exogenous
//! block. Request-level expansion lives in [`builder`].

mod builder;
mod error;

pub use builder::{
    EcosystemServiceResolver, RegionGroupResolver, RegionScope, ShockRequest, ShockSetBuilder,
};
pub use error::ShockError;

use mrio_core::types::SectorKey;
use std::collections::HashMap;

/// One elementary shock: a fractional output reduction applied to a single
/// (region, sector) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Shock {
    /// Region code of the shocked sector.
    pub region: String,
    /// Sector name of the shocked sector.
    pub sector: String,
    /// Output-reduction fraction in [0, 1]. A value of 1.0 drives the
    /// sector's output to zero.
    pub magnitude: f64,
}

impl Shock {
    /// Create a new elementary shock.
    pub fn new(region: impl Into<String>, sector: impl Into<String>, magnitude: f64) -> Self {
        Self {
            region: region.into(),
            sector: sector.into(),
            magnitude,
        }
    }

    /// The (region, sector) key this shock applies to.
    pub fn key(&self) -> SectorKey {
        SectorKey::new(self.region.clone(), self.sector.clone())
    }

    /// Whether the magnitude is a valid finite fraction in [0, 1].
    pub fn is_valid(&self) -> bool {
        self.magnitude.is_finite() && (0.0..=1.0).contains(&self.magnitude)
    }
}

/// Ordered set of elementary shocks with unique (region, sector) keys.
///
/// Insertion order of first occurrence is preserved; inserting a duplicate
/// key overwrites the magnitude in place (last write wins), matching how a
/// scenario builder edits an existing entry.
#[derive(Debug, Clone, Default)]
pub struct ShockSet {
    shocks: Vec<Shock>,
    positions: HashMap<SectorKey, usize>,
}

impl ShockSet {
    /// Create an empty shock set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shock, merging duplicates on (region, sector).
    pub fn insert(&mut self, shock: Shock) {
        let key = shock.key();
        match self.positions.get(&key) {
            Some(&i) => self.shocks[i].magnitude = shock.magnitude,
            None => {
                self.positions.insert(key, self.shocks.len());
                self.shocks.push(shock);
            }
        }
    }

    /// Number of distinct shocked sectors.
    pub fn len(&self) -> usize {
        self.shocks.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.shocks.is_empty()
    }

    /// Iterate shocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Shock> {
        self.shocks.iter()
    }

    /// Shocks in insertion order.
    pub fn shocks(&self) -> &[Shock] {
        &self.shocks
    }

    /// Magnitude applied to a key, if shocked.
    pub fn magnitude_of(&self, key: &SectorKey) -> Option<f64> {
        self.positions.get(key).map(|&i| self.shocks[i].magnitude)
    }

    /// Whether a key is part of the exogenous set.
    pub fn contains(&self, key: &SectorKey) -> bool {
        self.positions.contains_key(key)
    }
}

impl FromIterator<Shock> for ShockSet {
    fn from_iter<I: IntoIterator<Item = Shock>>(iter: I) -> Self {
        let mut set = ShockSet::new();
        for shock in iter {
            set.insert(shock);
        }
        set
    }
}
