//! Weighted-portfolio aggregation of impact and attribution.
//!
//! A portfolio is a set of (region, sector, weight) holdings whose weights
//! are percentages summing to 100. The aggregator computes weighted
//! before/after output values from a solved Δx and the weight-normalised
//! sum of each holding's attribution vector.

use mrio_core::tables::MrioTables;
use mrio_core::types::{DataIntegrityError, SectorKey};
use nalgebra::DVector;
use thiserror::Error;

use crate::attribution::{raw_contributions, Attribution, AttributionBasis, IMPACT_TOLERANCE};
use crate::shocks::ShockSet;
use crate::solver::SolveError;

/// Tolerance on the portfolio weight sum, in percentage points.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Errors from portfolio construction and aggregation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// Weights do not sum to 100 within [`WEIGHT_SUM_TOLERANCE`].
    #[error("portfolio weights sum to {sum}, expected 100 +/- {tolerance}")]
    WeightSum {
        /// Actual weight sum
        sum: f64,
        /// Allowed deviation
        tolerance: f64,
    },

    /// A holding has a non-finite or negative weight.
    #[error("invalid holding weight {value} for {region} - {sector}")]
    InvalidWeight {
        /// Region code of the holding
        region: String,
        /// Sector name of the holding
        sector: String,
        /// The offending weight
        value: f64,
    },

    /// The portfolio has no holdings.
    #[error("portfolio is empty")]
    Empty,

    /// A holding references a pair absent from the label universe.
    #[error("unknown sector in portfolio: {region} - {sector}")]
    UnknownSector {
        /// Region code of the missing pair
        region: String,
        /// Sector name of the missing pair
        sector: String,
    },

    /// Attribution failed while aggregating.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// One portfolio position.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    /// Region code of the held sector.
    pub region: String,
    /// Sector name of the held sector.
    pub sector: String,
    /// Portfolio weight in percent.
    pub weight: f64,
}

impl Holding {
    /// Create a new holding.
    pub fn new(region: impl Into<String>, sector: impl Into<String>, weight: f64) -> Self {
        Self {
            region: region.into(),
            sector: sector.into(),
            weight,
        }
    }

    /// The (region, sector) key of this holding.
    pub fn key(&self) -> SectorKey {
        SectorKey::new(self.region.clone(), self.sector.clone())
    }
}

/// Weighted before/after portfolio value.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioImpact {
    /// Weighted baseline value, `Σ wᵢ/100 · x_old[i]`.
    pub before: f64,
    /// Weighted post-shock value from the same Δx.
    pub after: f64,
}

impl PortfolioImpact {
    /// Absolute change, `after − before`.
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }

    /// Percentage change relative to the baseline; zero for an empty
    /// baseline.
    pub fn percent_change(&self) -> f64 {
        if self.before.abs() < IMPACT_TOLERANCE {
            0.0
        } else {
            self.delta() / self.before * 100.0
        }
    }
}

/// A validated set of holdings with weights summing to 100.
///
/// Holdings are stored sorted by (region, sector) so aggregation order —
/// and therefore floating-point rounding — does not depend on input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    /// Validate and build a portfolio.
    ///
    /// Duplicate (region, sector) keys are merged by summing weights.
    pub fn new(holdings: Vec<Holding>) -> Result<Self, PortfolioError> {
        if holdings.is_empty() {
            return Err(PortfolioError::Empty);
        }
        for h in &holdings {
            if !h.weight.is_finite() || h.weight < 0.0 {
                return Err(PortfolioError::InvalidWeight {
                    region: h.region.clone(),
                    sector: h.sector.clone(),
                    value: h.weight,
                });
            }
        }
        let sum: f64 = holdings.iter().map(|h| h.weight).sum();
        if (sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PortfolioError::WeightSum {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        let mut merged: Vec<Holding> = Vec::with_capacity(holdings.len());
        for h in holdings {
            match merged.iter_mut().find(|m| m.key() == h.key()) {
                Some(existing) => existing.weight += h.weight,
                None => merged.push(h),
            }
        }
        merged.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(Self { holdings: merged })
    }

    /// Holdings sorted by (region, sector).
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Number of distinct holdings.
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    /// Whether the portfolio is empty (never true after validation).
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Weighted before/after value under a solved Δx.
    pub fn value_impact(
        &self,
        tables: &MrioTables,
        delta_x: &DVector<f64>,
    ) -> Result<PortfolioImpact, PortfolioError> {
        check_delta(tables, delta_x)?;
        let mut before = 0.0;
        let mut after = 0.0;
        for h in &self.holdings {
            let i = self.position_of(tables, h)?;
            let w = h.weight / 100.0;
            before += w * tables.x()[i];
            after += w * (tables.x()[i] + delta_x[i]);
        }
        Ok(PortfolioImpact { before, after })
    }

    /// Portfolio-level attribution: the weight-normalised sum of each
    /// holding's raw attribution vector, re-normalised to 100%.
    ///
    /// Causes that are themselves holdings are excluded, mirroring
    /// self-attribution exclusion at a single target.
    pub fn attribute(
        &self,
        tables: &MrioTables,
        delta_x: &DVector<f64>,
        shocks: &ShockSet,
        basis: AttributionBasis,
    ) -> Result<Attribution, PortfolioError> {
        check_delta(tables, delta_x)?;

        let mut weighted: Vec<(SectorKey, f64)> = Vec::new();
        let mut total_delta = 0.0;
        for h in &self.holdings {
            let i = self.position_of(tables, h)?;
            let w = h.weight / 100.0;
            total_delta += w * delta_x[i];

            let raw = raw_contributions(tables, delta_x, shocks, i, basis)?;
            for (key, contribution) in raw {
                if self.holdings.iter().any(|m| m.key() == key) {
                    continue;
                }
                match weighted.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, acc)) => *acc += w * contribution,
                    None => weighted.push((key, w * contribution)),
                }
            }
        }

        let total_impact = total_delta.abs();
        if total_impact < IMPACT_TOLERANCE {
            return Ok(Attribution::none());
        }
        Ok(Attribution::from_raw(total_impact, weighted))
    }

    fn position_of(&self, tables: &MrioTables, h: &Holding) -> Result<usize, PortfolioError> {
        tables
            .labels()
            .position(&h.key())
            .ok_or_else(|| PortfolioError::UnknownSector {
                region: h.region.clone(),
                sector: h.sector.clone(),
            })
    }
}

fn check_delta(tables: &MrioTables, delta_x: &DVector<f64>) -> Result<(), PortfolioError> {
    if delta_x.len() != tables.len() {
        return Err(PortfolioError::Solve(SolveError::Integrity(
            DataIntegrityError::LengthMismatch {
                table: "delta_x",
                expected: tables.len(),
                got: delta_x.len(),
            },
        )));
    }
    Ok(())
}
