//! Decomposition of an output change into per-shock contributions.
//!
//! Given a solved Δx, the attribution engine explains the change at a
//! target sector as percentage contributions from each elementary shock,
//! using the same inverse matrix as the closure that produced Δx. Only
//! *external* causes are reported: the target's own shock, if any, is
//! excluded before normalisation.

use mrio_core::tables::MrioTables;
use mrio_core::types::{DataIntegrityError, SectorKey};
use nalgebra::DVector;

use crate::shocks::ShockSet;
use crate::solver::{Closure, SolveError};

/// Output changes smaller than this (in baseline monetary units) are
/// treated as no impact.
pub const IMPACT_TOLERANCE: f64 = 1e-10;

/// Which matrix transmits a shock's contribution to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributionBasis {
    /// Full demand-pull inverse: contribution `L[t, s] · |Δx[s]|`.
    Leontief,
    /// Full supply-push inverse: contribution `G[s, t] · |Δx[s]|`.
    Ghosh,
    /// First-order fallback using raw coefficients: `A[s, t] · |Δx[s]|`.
    ///
    /// For closures without a precomputed inverse; captures direct
    /// linkages only.
    FirstOrder,
}

impl From<Closure> for AttributionBasis {
    fn from(closure: Closure) -> Self {
        match closure {
            Closure::Leontief => AttributionBasis::Leontief,
            Closure::Ghosh => AttributionBasis::Ghosh,
        }
    }
}

/// Normalised attribution of a target's output change.
///
/// `causes` maps each external elementary shock to its percentage share in
/// [0, 100], sorted descending; shares sum to 100 unless the result is the
/// zero-impact sentinel (empty causes, zero `total_impact`).
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    /// Magnitude of the target's total output change, |Δx[t]|.
    pub total_impact: f64,
    causes: Vec<(SectorKey, f64)>,
}

impl Attribution {
    /// The zero-impact sentinel: nothing to attribute.
    pub fn none() -> Self {
        Self {
            total_impact: 0.0,
            causes: Vec::new(),
        }
    }

    /// Whether the target saw a significant output change with at least
    /// one external cause.
    pub fn has_impact(&self) -> bool {
        !self.causes.is_empty()
    }

    /// External causes as (shock label, percentage), descending.
    pub fn causes(&self) -> &[(SectorKey, f64)] {
        &self.causes
    }

    /// Percentage attributed to one shock label, if present.
    pub fn percentage_of(&self, key: &SectorKey) -> Option<f64> {
        self.causes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, pct)| *pct)
    }

    pub(crate) fn from_raw(total_impact: f64, mut raw: Vec<(SectorKey, f64)>) -> Self {
        let total_external: f64 = raw.iter().map(|(_, c)| *c).sum();
        if total_external <= 0.0 {
            return Self::none();
        }
        for (_, contribution) in &mut raw {
            *contribution = *contribution / total_external * 100.0;
        }
        // Stable sort, largest share first.
        raw.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Self {
            total_impact,
            causes: raw,
        }
    }
}

/// Raw (un-normalised) external contributions of each shock to the target
/// at index `target_index`. Self-attribution is dropped here.
pub(crate) fn raw_contributions(
    tables: &MrioTables,
    delta_x: &DVector<f64>,
    shocks: &ShockSet,
    target_index: usize,
    basis: AttributionBasis,
) -> Result<Vec<(SectorKey, f64)>, SolveError> {
    let mut raw = Vec::with_capacity(shocks.len());
    for shock in shocks.iter() {
        let key = shock.key();
        let s = tables
            .labels()
            .position(&key)
            .ok_or_else(|| SolveError::UnknownSector {
                region: shock.region.clone(),
                sector: shock.sector.clone(),
            })?;
        if s == target_index {
            continue;
        }
        let realised = delta_x[s].abs();
        let transmitted = match basis {
            AttributionBasis::Leontief => tables.leontief()[(target_index, s)],
            AttributionBasis::Ghosh => tables.ghosh()[(s, target_index)],
            AttributionBasis::FirstOrder => tables.a()[(s, target_index)],
        };
        raw.push((key, transmitted * realised));
    }
    Ok(raw)
}

/// Attribute the output change at `target` to the shocks that caused it.
///
/// Returns the zero-impact sentinel when |Δx[target]| is below
/// [`IMPACT_TOLERANCE`] or no external shock transmitted anything, rather
/// than dividing by zero.
///
/// # Errors
///
/// - [`SolveError::UnknownSector`] if the target or a shock label is
///   absent from the universe
/// - [`SolveError::Integrity`] if `delta_x` does not match the universe
pub fn attribute(
    tables: &MrioTables,
    delta_x: &DVector<f64>,
    shocks: &ShockSet,
    target: &SectorKey,
    basis: AttributionBasis,
) -> Result<Attribution, SolveError> {
    if delta_x.len() != tables.len() {
        return Err(SolveError::Integrity(DataIntegrityError::LengthMismatch {
            table: "delta_x",
            expected: tables.len(),
            got: delta_x.len(),
        }));
    }
    let t = tables
        .labels()
        .position(target)
        .ok_or_else(|| SolveError::UnknownSector {
            region: target.region.clone(),
            sector: target.sector.clone(),
        })?;

    let total_impact = delta_x[t].abs();
    if total_impact < IMPACT_TOLERANCE {
        return Ok(Attribution::none());
    }

    let raw = raw_contributions(tables, delta_x, shocks, t, basis)?;
    Ok(Attribution::from_raw(total_impact, raw))
}
