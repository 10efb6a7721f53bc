//! Sector identity and the ordered label universe.

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::DataIntegrityError;

/// Identity of one row/column across all MRIO tables: an ordered pair of
/// region code and sector name.
///
/// # Examples
///
/// ```rust
/// use mrio_core::types::SectorKey;
///
/// let key = SectorKey::new("DE", "Cattle farming");
/// assert_eq!(format!("{}", key), "DE - Cattle farming");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectorKey {
    /// Region code (e.g. "DE", "C1").
    pub region: String,
    /// Sector name within the region.
    pub sector: String,
}

impl SectorKey {
    /// Create a new sector key.
    pub fn new(region: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            sector: sector.into(),
        }
    }
}

impl fmt::Display for SectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.region, self.sector)
    }
}

/// The full ordered set of sector keys for one period.
///
/// Row/column `i` of every table in a period refers to `keys[i]`. The
/// universe carries a hash index for O(1) position lookup, so partitioning
/// a shock set against a universe of thousands of sectors stays cheap.
///
/// # Examples
///
/// ```rust
/// use mrio_core::types::{LabelUniverse, SectorKey};
///
/// let universe = LabelUniverse::new(vec![
///     SectorKey::new("C1", "Farming"),
///     SectorKey::new("C2", "Mining"),
/// ]).unwrap();
///
/// assert!(universe.contains(&SectorKey::new("C2", "Mining")));
/// assert_eq!(universe.regions(), vec!["C1", "C2"]);
/// ```
#[derive(Debug, Clone)]
pub struct LabelUniverse {
    keys: Vec<SectorKey>,
    positions: HashMap<SectorKey, usize>,
}

impl LabelUniverse {
    /// Build a universe from an ordered list of keys.
    ///
    /// Fails with [`DataIntegrityError::DuplicateLabel`] if the same
    /// (region, sector) pair appears twice.
    pub fn new(keys: Vec<SectorKey>) -> Result<Self, DataIntegrityError> {
        let mut positions = HashMap::with_capacity(keys.len());
        for (i, key) in keys.iter().enumerate() {
            if positions.insert(key.clone(), i).is_some() {
                return Err(DataIntegrityError::DuplicateLabel(key.clone()));
            }
        }
        Ok(Self { keys, positions })
    }

    /// Number of sectors in the universe.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Position of a key in table order, if present.
    pub fn position(&self, key: &SectorKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Whether a key is part of the universe.
    pub fn contains(&self, key: &SectorKey) -> bool {
        self.positions.contains_key(key)
    }

    /// Key at a given table position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn key(&self, index: usize) -> &SectorKey {
        &self.keys[index]
    }

    /// Iterate keys in table order.
    pub fn iter(&self) -> impl Iterator<Item = &SectorKey> {
        self.keys.iter()
    }

    /// All keys in table order.
    pub fn keys(&self) -> &[SectorKey] {
        &self.keys
    }

    /// Unique region codes in first-seen order.
    pub fn regions(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for key in &self.keys {
            if !seen.contains(&key.region.as_str()) {
                seen.push(key.region.as_str());
            }
        }
        seen
    }

    /// Unique sector names in first-seen order.
    pub fn sectors(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for key in &self.keys {
            if !seen.contains(&key.sector.as_str()) {
                seen.push(key.sector.as_str());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_universe() -> LabelUniverse {
        LabelUniverse::new(vec![
            SectorKey::new("C1", "Farming"),
            SectorKey::new("C1", "Food Processing"),
            SectorKey::new("C2", "Mining"),
            SectorKey::new("C2", "Manufacturing"),
        ])
        .unwrap()
    }

    #[test]
    fn test_sector_key_display() {
        let key = SectorKey::new("C1", "Farming");
        assert_eq!(format!("{}", key), "C1 - Farming");
    }

    #[test]
    fn test_universe_positions() {
        let universe = toy_universe();
        assert_eq!(universe.len(), 4);
        assert_eq!(universe.position(&SectorKey::new("C2", "Mining")), Some(2));
        assert_eq!(universe.position(&SectorKey::new("C3", "Mining")), None);
    }

    #[test]
    fn test_universe_rejects_duplicates() {
        let err = LabelUniverse::new(vec![
            SectorKey::new("C1", "Farming"),
            SectorKey::new("C1", "Farming"),
        ])
        .unwrap_err();
        assert!(matches!(err, DataIntegrityError::DuplicateLabel(_)));
    }

    #[test]
    fn test_universe_regions_and_sectors() {
        let universe = toy_universe();
        assert_eq!(universe.regions(), vec!["C1", "C2"]);
        assert_eq!(
            universe.sectors(),
            vec!["Farming", "Food Processing", "Mining", "Manufacturing"]
        );
    }

    #[test]
    fn test_universe_key_roundtrip() {
        let universe = toy_universe();
        for (i, key) in universe.iter().enumerate() {
            assert_eq!(universe.position(key), Some(i));
            assert_eq!(universe.key(i), key);
        }
    }
}
