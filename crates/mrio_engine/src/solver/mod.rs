//! Partitioned propagation solver.
//!
//! One partitioning algorithm serves both closures: the universe is split
//! into the exogenous set M (shocked sectors, held at their new output) and
//! the endogenous set N\M (solved for), and only the |M|x|M| pivot block of
//! the relevant precomputed inverse is inverted at request time. The
//! closure supplies just the propagation step:
//!
//! - [`Closure::Leontief`] — demand-reference mixed model; the input
//!   shortfall from shocked sectors enters as negative final demand and a
//!   `Δy_required` shadow metric is reported.
//! - [`Closure::Ghosh`] — supply-reference; output deltas push forward
//!   through forward linkages. No `Δy_required` is meaningful.

mod error;
mod ghosh;
mod leontief;
mod partition;

pub use error::SolveError;

use mrio_core::tables::MrioTables;
use mrio_core::types::{LabelUniverse, SectorKey};
use nalgebra::DVector;
use tracing::debug;

use crate::shocks::ShockSet;
use partition::Partition;

/// Which closure the mixed model is solved under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Closure {
    /// Demand-reference (Leontief) closure.
    Leontief,
    /// Supply-reference (Ghosh) closure, the default for physical shocks.
    Ghosh,
}

impl Closure {
    /// Lower-case closure name, as used in requests and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Closure::Leontief => "leontief",
            Closure::Ghosh => "ghosh",
        }
    }
}

impl std::fmt::Display for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one equilibrium solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// New equilibrium gross output over the full label order.
    pub x_new: DVector<f64>,
    /// Output change per sector: `x_new − x_old`.
    pub delta_x: DVector<f64>,
    /// Implied final-demand change `(I − A)·Δx`; only meaningful under the
    /// Leontief closure, absent under Ghosh.
    pub delta_y_required: Option<DVector<f64>>,
}

impl SolveOutcome {
    /// Output change at one sector, if it exists in the universe.
    pub fn delta_at(&self, universe: &LabelUniverse, key: &SectorKey) -> Option<f64> {
        universe.position(key).map(|i| self.delta_x[i])
    }

    /// New output at one sector, if it exists in the universe.
    pub fn x_new_at(&self, universe: &LabelUniverse, key: &SectorKey) -> Option<f64> {
        universe.position(key).map(|i| self.x_new[i])
    }

    /// The `k` sectors with the largest absolute output change, descending.
    pub fn top_impacts<'a>(
        &self,
        universe: &'a LabelUniverse,
        k: usize,
    ) -> Vec<(&'a SectorKey, f64)> {
        let mut ranked: Vec<(&SectorKey, f64)> = universe
            .iter()
            .enumerate()
            .map(|(i, key)| (key, self.delta_x[i]))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(k);
        ranked
    }
}

/// Solve the post-shock general equilibrium.
///
/// Pure function of immutable inputs: solving the same (tables, shock set,
/// closure) twice yields bit-identical results.
///
/// # Errors
///
/// - [`SolveError::UnknownSector`] if a shock references a pair outside
///   the universe
/// - [`SolveError::Singular`] if the exogenous pivot block is singular
/// - [`SolveError::InvalidMagnitude`] / [`SolveError::EmptyShockSet`] for
///   malformed shock sets that bypassed the builder
pub fn solve(
    tables: &MrioTables,
    shocks: &ShockSet,
    closure: Closure,
) -> Result<SolveOutcome, SolveError> {
    let part = Partition::new(tables.labels(), shocks)?;
    debug!(
        closure = closure.name(),
        exogenous = part.exogenous.len(),
        endogenous = part.endogenous.len(),
        "solving partitioned system"
    );

    let x_m_old = Partition::gather(tables.x(), &part.exogenous);
    let mut x_m_new = x_m_old.clone();
    for (k, shock) in shocks.iter().enumerate() {
        x_m_new[k] *= 1.0 - shock.magnitude;
    }
    let delta_x_m = &x_m_new - &x_m_old;

    let x_n_new = match closure {
        Closure::Leontief => leontief::endogenous_output(tables, &part, &delta_x_m)?,
        Closure::Ghosh => ghosh::endogenous_output(tables, &part, &delta_x_m)?,
    };

    let x_new = part.assemble(tables.len(), &x_n_new, &x_m_new);
    let delta_x = &x_new - tables.x();

    let delta_y_required = match closure {
        // (I − A)·Δx without materialising the identity matrix.
        Closure::Leontief => Some(&delta_x - tables.a() * &delta_x),
        Closure::Ghosh => None,
    };

    Ok(SolveOutcome {
        x_new,
        delta_x,
        delta_y_required,
    })
}
