//! Immutable per-period MRIO tables and their derivations.
//!
//! One [`MrioTables`] value holds everything the solver needs for a single
//! period: technical coefficients (A), gross output (X), final demand (Y)
//! and the two precomputed global inverses (Leontief L, Ghosh G), all
//! indexed by a shared [`LabelUniverse`].
//!
//! Tables are validated on construction and never mutated afterwards;
//! concurrent simulations share them behind an `Arc`.

use nalgebra::{DMatrix, DVector};

use crate::types::{DataIntegrityError, LabelUniverse, SectorKey, SingularSystemError};

/// Compute the Leontief inverse L = (I − A)⁻¹.
///
/// `L[i, j]` is the total output needed from sector i to satisfy one unit
/// of final demand in sector j (direct plus indirect demand-pull effects).
///
/// # Errors
///
/// [`SingularSystemError`] if (I − A) is not invertible.
pub fn leontief_inverse(a: &DMatrix<f64>) -> Result<DMatrix<f64>, SingularSystemError> {
    let n = a.nrows();
    let i_minus_a = DMatrix::identity(n, n) - a;
    i_minus_a
        .try_inverse()
        .ok_or_else(|| SingularSystemError::new("I - A", n))
}

/// Compute the allocation-coefficients matrix B, where
/// `B[i, j] = A[i, j] · x[j] / x[i]`.
///
/// Rows with zero gross output are only valid if they allocate nothing;
/// otherwise the coefficients are undefined and the data is rejected.
pub fn allocation_coefficients(
    a: &DMatrix<f64>,
    x: &DVector<f64>,
) -> Result<DMatrix<f64>, DataIntegrityError> {
    let n = a.nrows();
    let mut b = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let flow = a[(i, j)] * x[j];
            if x[i] == 0.0 {
                if flow != 0.0 {
                    return Err(DataIntegrityError::ZeroOutputAllocation { index: i });
                }
            } else {
                b[(i, j)] = flow / x[i];
            }
        }
    }
    Ok(b)
}

/// Compute the Ghosh inverse G = (I − B)⁻¹ from allocation coefficients.
///
/// `G[i, j]` is the total output induced in sector j per unit of
/// supply-push change originating in sector i.
///
/// # Errors
///
/// [`SingularSystemError`] if (I − B) is not invertible.
pub fn ghosh_inverse(b: &DMatrix<f64>) -> Result<DMatrix<f64>, SingularSystemError> {
    let n = b.nrows();
    let i_minus_b = DMatrix::identity(n, n) - b;
    i_minus_b
        .try_inverse()
        .ok_or_else(|| SingularSystemError::new("I - B", n))
}

/// The baseline dataset for one period.
///
/// Holds the five tables the propagation solver consumes, all validated
/// against one shared label universe. Treated as immutable: loaded once
/// per period and cached by the store layer.
///
/// # Examples
///
/// ```rust
/// use mrio_core::tables::MrioTables;
/// use mrio_core::types::{LabelUniverse, SectorKey};
/// use nalgebra::{DMatrix, DVector};
///
/// let labels = LabelUniverse::new(vec![
///     SectorKey::new("C1", "Farming"),
///     SectorKey::new("C1", "Food Processing"),
/// ]).unwrap();
///
/// let mut a = DMatrix::zeros(2, 2);
/// a[(0, 1)] = 0.4; // Food Processing consumes Farming output
/// let y = DVector::from_vec(vec![100.0, 150.0]);
///
/// let tables = MrioTables::derive_with_demand(labels, a, y).unwrap();
/// assert_eq!(tables.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MrioTables {
    labels: LabelUniverse,
    a: DMatrix<f64>,
    x: DVector<f64>,
    y: DVector<f64>,
    leontief: DMatrix<f64>,
    ghosh: DMatrix<f64>,
}

impl MrioTables {
    /// Assemble tables from fully precomputed parts.
    ///
    /// Validates every shape against the label universe and rejects
    /// non-finite entries and negative gross output. Integrity failures
    /// are fatal: they indicate an upstream data bug, not a bad request.
    pub fn new(
        labels: LabelUniverse,
        a: DMatrix<f64>,
        x: DVector<f64>,
        y: DVector<f64>,
        leontief: DMatrix<f64>,
        ghosh: DMatrix<f64>,
    ) -> Result<Self, DataIntegrityError> {
        let n = labels.len();
        check_square("A", &a, n)?;
        check_square("L", &leontief, n)?;
        check_square("G", &ghosh, n)?;
        check_vector("X", &x, n)?;
        check_vector("Y", &y, n)?;
        for (i, value) in x.iter().enumerate() {
            if *value < 0.0 {
                return Err(DataIntegrityError::NegativeOutput {
                    index: i,
                    value: *value,
                });
            }
        }
        Ok(Self {
            labels,
            a,
            x,
            y,
            leontief,
            ghosh,
        })
    }

    /// Assemble tables from raw coefficients, deriving both inverses.
    ///
    /// This is the ingestion/fixture path: given A, X and Y, compute
    /// L = (I − A)⁻¹ and G = (I − B)⁻¹ at load time.
    pub fn derive(
        labels: LabelUniverse,
        a: DMatrix<f64>,
        x: DVector<f64>,
        y: DVector<f64>,
    ) -> Result<Self, TableBuildError> {
        let n = labels.len();
        check_square("A", &a, n)?;
        check_vector("X", &x, n)?;
        let leontief = leontief_inverse(&a)?;
        let b = allocation_coefficients(&a, &x)?;
        let ghosh = ghosh_inverse(&b)?;
        Ok(Self::new(labels, a, x, y, leontief, ghosh)?)
    }

    /// Assemble tables from A and final demand only, solving X = L·Y.
    ///
    /// Mirrors how synthetic fixtures are built: gross output is whatever
    /// balances the given demand.
    pub fn derive_with_demand(
        labels: LabelUniverse,
        a: DMatrix<f64>,
        y: DVector<f64>,
    ) -> Result<Self, TableBuildError> {
        let n = labels.len();
        check_square("A", &a, n)?;
        check_vector("Y", &y, n)?;
        let leontief = leontief_inverse(&a)?;
        let x = &leontief * &y;
        let b = allocation_coefficients(&a, &x)?;
        let ghosh = ghosh_inverse(&b)?;
        Ok(Self::new(labels, a, x, y, leontief, ghosh)?)
    }

    /// The shared label universe.
    pub fn labels(&self) -> &LabelUniverse {
        &self.labels
    }

    /// Number of sectors (N).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Technical coefficients matrix A.
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Baseline gross output vector X.
    pub fn x(&self) -> &DVector<f64> {
        &self.x
    }

    /// Baseline final demand vector Y.
    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    /// Precomputed Leontief inverse L.
    pub fn leontief(&self) -> &DMatrix<f64> {
        &self.leontief
    }

    /// Precomputed Ghosh inverse G.
    pub fn ghosh(&self) -> &DMatrix<f64> {
        &self.ghosh
    }

    /// Baseline gross output for one sector, if it exists.
    pub fn output_of(&self, key: &SectorKey) -> Option<f64> {
        self.labels.position(key).map(|i| self.x[i])
    }
}

/// Errors from building tables out of raw coefficients.
///
/// Wraps the two ways derivation can fail: structural defects in the
/// input, or a singular (I − A)/(I − B) system.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableBuildError {
    /// Input tables are structurally inconsistent.
    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),
    /// A global inverse could not be computed.
    #[error(transparent)]
    Singular(#[from] SingularSystemError),
}

fn check_square(
    table: &'static str,
    m: &DMatrix<f64>,
    n: usize,
) -> Result<(), DataIntegrityError> {
    if m.nrows() != n || m.ncols() != n {
        return Err(DataIntegrityError::DimensionMismatch {
            table,
            rows: m.nrows(),
            cols: m.ncols(),
            expected: n,
        });
    }
    for j in 0..m.ncols() {
        for i in 0..m.nrows() {
            if !m[(i, j)].is_finite() {
                return Err(DataIntegrityError::NonFinite {
                    table,
                    row: i,
                    col: j,
                });
            }
        }
    }
    Ok(())
}

fn check_vector(
    table: &'static str,
    v: &DVector<f64>,
    n: usize,
) -> Result<(), DataIntegrityError> {
    if v.len() != n {
        return Err(DataIntegrityError::LengthMismatch {
            table,
            expected: n,
            got: v.len(),
        });
    }
    for (i, value) in v.iter().enumerate() {
        if !value.is_finite() {
            return Err(DataIntegrityError::NonFinite {
                table,
                row: i,
                col: 0,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn toy_labels() -> LabelUniverse {
        LabelUniverse::new(vec![
            SectorKey::new("C1", "Farming"),
            SectorKey::new("C1", "Food Processing"),
            SectorKey::new("C2", "Mining"),
            SectorKey::new("C2", "Manufacturing"),
        ])
        .unwrap()
    }

    fn toy_a() -> DMatrix<f64> {
        let mut a = DMatrix::zeros(4, 4);
        a[(0, 1)] = 0.4; // Food Processing needs Farming
        a[(2, 3)] = 0.5; // Manufacturing needs Mining
        a[(0, 3)] = 0.1; // Manufacturing needs some Farming
        a
    }

    fn toy_y() -> DVector<f64> {
        DVector::from_vec(vec![100.0, 150.0, 80.0, 200.0])
    }

    #[test]
    fn test_leontief_inverse_roundtrip() {
        let a = toy_a();
        let l = leontief_inverse(&a).unwrap();
        let product = (DMatrix::identity(4, 4) - &a) * &l;
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_leontief_inverse_singular() {
        // A with a unit diagonal makes (I - A) singular.
        let mut a = DMatrix::zeros(2, 2);
        a[(0, 0)] = 1.0;
        let err = leontief_inverse(&a).unwrap_err();
        assert_eq!(err.matrix, "I - A");
        assert_eq!(err.dimension, 2);
    }

    #[test]
    fn test_derive_with_demand_balances() {
        let tables = MrioTables::derive_with_demand(toy_labels(), toy_a(), toy_y()).unwrap();
        // X must satisfy X = A·X + Y.
        let reconstructed = tables.a() * tables.x() + tables.y();
        for i in 0..4 {
            assert_relative_eq!(reconstructed[i], tables.x()[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ghosh_rows_scale_with_output() {
        let tables = MrioTables::derive_with_demand(toy_labels(), toy_a(), toy_y()).unwrap();
        // B[i,j] = A[i,j] * x[j] / x[i]; spot-check the Farming -> Food
        // Processing cell through G's defining identity (I - B) G = I.
        let b = allocation_coefficients(tables.a(), tables.x()).unwrap();
        let product = (DMatrix::identity(4, 4) - &b) * tables.ghosh();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_new_rejects_shape_mismatch() {
        let labels = toy_labels();
        let err = MrioTables::new(
            labels,
            DMatrix::zeros(3, 3),
            DVector::zeros(4),
            DVector::zeros(4),
            DMatrix::identity(4, 4),
            DMatrix::identity(4, 4),
        )
        .unwrap_err();
        assert!(matches!(err, DataIntegrityError::DimensionMismatch { table: "A", .. }));
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let labels = toy_labels();
        let mut a = toy_a();
        a[(1, 1)] = f64::NAN;
        let err = MrioTables::new(
            labels,
            a,
            DVector::zeros(4),
            DVector::zeros(4),
            DMatrix::identity(4, 4),
            DMatrix::identity(4, 4),
        )
        .unwrap_err();
        assert!(matches!(err, DataIntegrityError::NonFinite { table: "A", .. }));
    }

    #[test]
    fn test_new_rejects_negative_output() {
        let labels = toy_labels();
        let err = MrioTables::new(
            labels,
            toy_a(),
            DVector::from_vec(vec![1.0, -2.0, 3.0, 4.0]),
            DVector::zeros(4),
            DMatrix::identity(4, 4),
            DMatrix::identity(4, 4),
        )
        .unwrap_err();
        assert!(matches!(err, DataIntegrityError::NegativeOutput { index: 1, .. }));
    }

    #[test]
    fn test_allocation_rejects_zero_output_supplier() {
        let mut a = DMatrix::zeros(2, 2);
        a[(0, 1)] = 0.5;
        let x = DVector::from_vec(vec![0.0, 10.0]);
        let err = allocation_coefficients(&a, &x).unwrap_err();
        assert!(matches!(err, DataIntegrityError::ZeroOutputAllocation { index: 0 }));
    }

    #[test]
    fn test_output_of() {
        let tables = MrioTables::derive_with_demand(toy_labels(), toy_a(), toy_y()).unwrap();
        let farming = tables.output_of(&SectorKey::new("C1", "Farming")).unwrap();
        assert!(farming > 0.0);
        assert!(tables.output_of(&SectorKey::new("C9", "Farming")).is_none());
    }
}
