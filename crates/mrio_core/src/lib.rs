//! # mrio_core: Foundation Types for MRIO Shock Simulation
//!
//! ## Layer 1 (Foundation) Role
//!
//! mrio_core serves as the bottom layer of the 4-layer architecture, providing:
//! - Sector identity and the label universe (`types::sector`)
//! - Immutable per-period MRIO tables: A, X, Y, L, G (`tables`)
//! - Leontief/Ghosh inverse derivation from raw coefficients (`tables`)
//! - Region-group catalogue and country naming (`regions`)
//! - Error types: `DataIntegrityError`, `SingularSystemError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other mrio_* crates, with minimal external
//! dependencies:
//! - nalgebra: dense matrix and vector storage plus LU inversion
//! - thiserror: structured error types
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use mrio_core::types::{LabelUniverse, SectorKey};
//!
//! let universe = LabelUniverse::new(vec![
//!     SectorKey::new("C1", "Farming"),
//!     SectorKey::new("C1", "Food Processing"),
//! ]).unwrap();
//!
//! assert_eq!(universe.len(), 2);
//! assert_eq!(universe.position(&SectorKey::new("C1", "Farming")), Some(0));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod regions;
pub mod tables;
pub mod types;
