//! Error types for shock-set construction.

use thiserror::Error;

/// Errors from building or validating a shock set.
///
/// All variants are recoverable: they describe a malformed request and are
/// surfaced to the caller for correction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShockError {
    /// Magnitude outside the valid output-reduction range [0, 1].
    #[error("shock magnitude {value} outside [0, 1]")]
    MagnitudeOutOfRange {
        /// The offending magnitude
        value: f64,
    },

    /// The expanded request matched nothing in the label universe.
    #[error("shock request expanded to an empty shock set")]
    EmptyShockSet,

    /// The request named a region group the catalogue does not know.
    #[error("unknown region group: {0}")]
    UnknownRegionGroup(String),

    /// The request named an ecosystem service absent from the catalogue.
    #[error("unknown ecosystem service: {0}")]
    UnknownEcosystemService(String),

    /// A (region, sector) pair is not part of the active period's universe.
    #[error("unknown sector: {region} - {sector}")]
    UnknownSector {
        /// Region code of the missing pair
        region: String,
        /// Sector name of the missing pair
        sector: String,
    },

    /// The expanded set exceeds the configured exogenous-block cap.
    ///
    /// Partitioned solving inverts a |M|x|M| pivot per request; the cap
    /// keeps that inversion from becoming the dominant cost.
    #[error("shock set has {count} sectors, exceeding the cap of {cap}")]
    TooManyShocks {
        /// Size of the expanded set
        count: usize,
        /// Configured maximum
        cap: usize,
    },
}
