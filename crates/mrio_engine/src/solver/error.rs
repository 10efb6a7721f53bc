//! Error types for the propagation solver.

use mrio_core::types::{DataIntegrityError, SingularSystemError};
use thiserror::Error;

/// Errors from partitioned equilibrium solving.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The exogenous pivot block (L_mm or G_mm) is singular.
    ///
    /// Happens when shocked sectors are perfectly circularly dependent
    /// with magnitudes that zero a pivot; the request fails instead of
    /// producing NaNs.
    #[error(transparent)]
    Singular(#[from] SingularSystemError),

    /// A shocked (region, sector) pair is absent from the label universe.
    #[error("unknown sector in shock set: {region} - {sector}")]
    UnknownSector {
        /// Region code of the missing pair
        region: String,
        /// Sector name of the missing pair
        sector: String,
    },

    /// A shock carries a magnitude outside [0, 1].
    #[error("shock magnitude {value} outside [0, 1]")]
    InvalidMagnitude {
        /// The offending magnitude
        value: f64,
    },

    /// The shock set is empty; there is nothing to solve.
    #[error("shock set is empty")]
    EmptyShockSet,

    /// Tables are structurally inconsistent (fatal upstream data bug).
    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),
}
