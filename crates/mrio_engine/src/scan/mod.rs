//! Parallel impact scan: rank candidate shocks by damage to a target.
//!
//! For each candidate (region, sector) pair a single-shock Leontief solve
//! is run at a fixed magnitude and the absolute output change at the
//! target sector is recorded. Candidates whose solve fails (unknown pair,
//! singular pivot block) are skipped rather than failing the scan.

use mrio_core::tables::MrioTables;
use mrio_core::types::SectorKey;
use rayon::prelude::*;
use tracing::debug;

use crate::shocks::{Shock, ShockSet};
use crate::solver::{solve, Closure, SolveError};

/// One ranked scan result.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanHit {
    /// The candidate shock that was applied.
    pub candidate: SectorKey,
    /// Output change at the target sector under that shock.
    pub delta_x: f64,
}

impl ScanHit {
    /// Absolute impact used for ranking.
    pub fn impact(&self) -> f64 {
        self.delta_x.abs()
    }
}

/// Rank `candidates` by the damage a single shock of `magnitude` does to
/// `target` under the Leontief closure. Returns at most `top` hits,
/// largest absolute impact first; ties break on the candidate key so the
/// ordering is deterministic.
///
/// The target itself is never a candidate: shocking it makes it
/// exogenous, which measures the shock rather than propagation.
pub fn scan(
    tables: &MrioTables,
    target: &SectorKey,
    candidates: &[SectorKey],
    magnitude: f64,
    top: usize,
) -> Result<Vec<ScanHit>, SolveError> {
    let target_index =
        tables
            .labels()
            .position(target)
            .ok_or_else(|| SolveError::UnknownSector {
                region: target.region.clone(),
                sector: target.sector.clone(),
            })?;
    if !magnitude.is_finite() || !(0.0..=1.0).contains(&magnitude) {
        return Err(SolveError::InvalidMagnitude { value: magnitude });
    }

    let mut hits: Vec<ScanHit> = candidates
        .par_iter()
        .filter(|candidate| *candidate != target)
        .filter_map(|candidate| {
            let shocks: ShockSet = std::iter::once(Shock::new(
                candidate.region.clone(),
                candidate.sector.clone(),
                magnitude,
            ))
            .collect();
            match solve(tables, &shocks, Closure::Leontief) {
                Ok(outcome) => Some(ScanHit {
                    candidate: (*candidate).clone(),
                    delta_x: outcome.delta_x[target_index],
                }),
                Err(err) => {
                    debug!(candidate = %candidate, %err, "scan candidate skipped");
                    None
                }
            }
        })
        .collect();

    hits.sort_by(|a, b| {
        b.impact()
            .partial_cmp(&a.impact())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.candidate.cmp(&b.candidate))
    });
    hits.truncate(top);
    Ok(hits)
}
