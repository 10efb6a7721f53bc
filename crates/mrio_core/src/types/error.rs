//! Error types for structured error handling.
//!
//! This module provides:
//! - `DataIntegrityError`: shape/label mismatches in loaded MRIO tables
//! - `SingularSystemError`: matrix inversion failure during derivation or
//!   partitioned solving

use thiserror::Error;

use super::sector::SectorKey;

/// Structural defects in MRIO table data.
///
/// These errors indicate corrupted or inconsistent upstream data and are
/// treated as fatal: a request that hits one must not be retried, since the
/// same dataset will fail again.
///
/// # Variants
/// - `DimensionMismatch`: a matrix does not match the label universe size
/// - `LengthMismatch`: a vector does not match the label universe size
/// - `DuplicateLabel`: the same (region, sector) key appears twice
/// - `NonFinite`: a NaN or infinite entry in a table
/// - `NegativeOutput`: gross output below zero
/// - `ZeroOutputAllocation`: allocation coefficients undefined because a
///   sector with zero output still supplies inputs
///
/// # Examples
/// ```
/// use mrio_core::types::DataIntegrityError;
///
/// let err = DataIntegrityError::LengthMismatch {
///     table: "X",
///     expected: 4,
///     got: 3,
/// };
/// assert!(format!("{}", err).contains("expected 4"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataIntegrityError {
    /// Matrix shape does not match the label universe.
    #[error("table {table} has shape {rows}x{cols}, expected {expected}x{expected}")]
    DimensionMismatch {
        /// Name of the offending table (e.g. "A", "L")
        table: &'static str,
        /// Rows found
        rows: usize,
        /// Columns found
        cols: usize,
        /// Expected square dimension
        expected: usize,
    },

    /// Vector length does not match the label universe.
    #[error("vector {table} has length {got}, expected {expected}")]
    LengthMismatch {
        /// Name of the offending vector (e.g. "X", "Y")
        table: &'static str,
        /// Expected length
        expected: usize,
        /// Length found
        got: usize,
    },

    /// A (region, sector) key appears more than once in the label universe.
    #[error("duplicate label in universe: {0}")]
    DuplicateLabel(SectorKey),

    /// NaN or infinite entry in a table.
    #[error("non-finite entry in table {table} at ({row}, {col})")]
    NonFinite {
        /// Name of the offending table
        table: &'static str,
        /// Row index of the entry
        row: usize,
        /// Column index of the entry
        col: usize,
    },

    /// Gross output below zero.
    #[error("negative gross output at index {index}: {value}")]
    NegativeOutput {
        /// Position in the label universe
        index: usize,
        /// The offending value
        value: f64,
    },

    /// Allocation coefficients are undefined: a sector with zero gross
    /// output still records outgoing intermediate flows.
    #[error("sector at index {index} has zero output but non-zero supply flows")]
    ZeroOutputAllocation {
        /// Position in the label universe
        index: usize,
    },
}

/// A matrix that must be inverted turned out to be singular.
///
/// Raised when (I − A) or (I − B) cannot be inverted during derivation, or
/// when the small exogenous pivot block is singular during partitioned
/// solving. The request fails cleanly instead of leaking NaNs.
///
/// # Examples
/// ```
/// use mrio_core::types::SingularSystemError;
///
/// let err = SingularSystemError::new("L_mm", 3);
/// assert_eq!(format!("{}", err), "singular system: L_mm (3x3) is not invertible");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("singular system: {matrix} ({dimension}x{dimension}) is not invertible")]
pub struct SingularSystemError {
    /// Name of the matrix that failed to invert.
    pub matrix: &'static str,
    /// Dimension of the square matrix.
    pub dimension: usize,
}

impl SingularSystemError {
    /// Create a new singular-system error for the named matrix.
    pub fn new(matrix: &'static str, dimension: usize) -> Self {
        Self { matrix, dimension }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = DataIntegrityError::DimensionMismatch {
            table: "A",
            rows: 3,
            cols: 4,
            expected: 4,
        };
        assert_eq!(format!("{}", err), "table A has shape 3x4, expected 4x4");
    }

    #[test]
    fn test_duplicate_label_display() {
        let err = DataIntegrityError::DuplicateLabel(SectorKey::new("C1", "Farming"));
        assert!(format!("{}", err).contains("C1 - Farming"));
    }

    #[test]
    fn test_singular_display() {
        let err = SingularSystemError::new("G_mm", 2);
        assert!(format!("{}", err).contains("G_mm"));
        assert!(format!("{}", err).contains("2x2"));
    }
}
