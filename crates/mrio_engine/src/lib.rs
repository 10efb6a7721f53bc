//! # mrio_engine: Shock Propagation Kernel
//!
//! The numerical core of mriosim. Given a period's immutable MRIO tables
//! (from `mrio_core`), this crate:
//!
//! - expands user-level shock requests into flat shock sets (`shocks`)
//! - solves the post-shock general equilibrium under a Leontief or Ghosh
//!   closure using the partitioned mixed model (`solver`)
//! - decomposes the output change at a target sector into percentage
//!   contributions per originating shock (`attribution`)
//! - aggregates impact and attribution over weighted portfolios
//!   (`portfolio`)
//! - serialises shock sets and portfolios to the YAML scenario format
//!   (`scenario`)
//! - ranks candidate shocks by impact on a target sector (`scan`)
//!
//! All computation is synchronous, CPU-bound and free of shared mutable
//! state: a solve is a pure function of the cached tables and the request,
//! so repeated runs produce bit-identical results.

pub mod attribution;
pub mod portfolio;
pub mod scan;
pub mod scenario;
pub mod shocks;
pub mod solver;

pub use attribution::{attribute, Attribution, AttributionBasis};
pub use portfolio::{Holding, Portfolio, PortfolioError, PortfolioImpact};
pub use scan::{scan, ScanHit};
pub use scenario::{
    portfolio_from_yaml, portfolio_to_yaml, shock_set_from_yaml, shock_set_to_yaml, ScenarioError,
};
pub use shocks::{
    EcosystemServiceResolver, RegionGroupResolver, RegionScope, Shock, ShockError, ShockRequest,
    ShockSet, ShockSetBuilder,
};
pub use solver::{solve, Closure, SolveError, SolveOutcome};

#[cfg(test)]
pub(crate) mod testkit {
    //! Shared test fixture: a 2-region, 2-sector toy economy.
    //!
    //! C1-Farming feeds C1-Food Processing; C2-Mining feeds
    //! C2-Manufacturing, which also draws some C1-Farming output.

    use mrio_core::tables::MrioTables;
    use mrio_core::types::{LabelUniverse, SectorKey};
    use nalgebra::{DMatrix, DVector};

    pub fn toy_labels() -> LabelUniverse {
        LabelUniverse::new(vec![
            SectorKey::new("C1", "Farming"),
            SectorKey::new("C1", "Food Processing"),
            SectorKey::new("C2", "Mining"),
            SectorKey::new("C2", "Manufacturing"),
        ])
        .expect("toy labels are unique")
    }

    pub fn toy_tables() -> MrioTables {
        let mut a = DMatrix::zeros(4, 4);
        a[(0, 1)] = 0.4; // Food Processing needs Farming
        a[(2, 3)] = 0.5; // Manufacturing needs Mining
        a[(0, 3)] = 0.1; // Manufacturing needs some Farming
        let y = DVector::from_vec(vec![100.0, 150.0, 80.0, 200.0]);
        MrioTables::derive_with_demand(toy_labels(), a, y).expect("toy economy is invertible")
    }
}
