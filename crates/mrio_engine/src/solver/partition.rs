//! Exogenous/endogenous partitioning of the label universe.

use mrio_core::types::LabelUniverse;
use nalgebra::DVector;

use super::SolveError;
use crate::shocks::ShockSet;

/// Index partition of the universe into the exogenous set M (shocked
/// sectors, in shock-set order) and the endogenous set N\M (everything
/// else, in universe order).
///
/// Built once per request; |M| is small relative to N, which is what makes
/// inverting only the |M|x|M| pivot block cheap.
#[derive(Debug, Clone)]
pub(crate) struct Partition {
    pub exogenous: Vec<usize>,
    pub endogenous: Vec<usize>,
}

impl Partition {
    pub fn new(universe: &LabelUniverse, shocks: &ShockSet) -> Result<Self, SolveError> {
        if shocks.is_empty() {
            return Err(SolveError::EmptyShockSet);
        }

        let n = universe.len();
        let mut exogenous = Vec::with_capacity(shocks.len());
        let mut is_exogenous = vec![false; n];
        for shock in shocks.iter() {
            if !shock.is_valid() {
                return Err(SolveError::InvalidMagnitude {
                    value: shock.magnitude,
                });
            }
            let i = universe
                .position(&shock.key())
                .ok_or_else(|| SolveError::UnknownSector {
                    region: shock.region.clone(),
                    sector: shock.sector.clone(),
                })?;
            exogenous.push(i);
            is_exogenous[i] = true;
        }

        let endogenous = (0..n).filter(|&i| !is_exogenous[i]).collect();
        Ok(Self {
            exogenous,
            endogenous,
        })
    }

    /// Gather the entries of `v` at the given indices into a dense vector.
    pub fn gather(v: &DVector<f64>, indices: &[usize]) -> DVector<f64> {
        DVector::from_iterator(indices.len(), indices.iter().map(|&i| v[i]))
    }

    /// Scatter exogenous and endogenous sub-vectors back into full label
    /// order.
    pub fn assemble(
        &self,
        n: usize,
        x_n_new: &DVector<f64>,
        x_m_new: &DVector<f64>,
    ) -> DVector<f64> {
        let mut full = DVector::zeros(n);
        for (k, &i) in self.exogenous.iter().enumerate() {
            full[i] = x_m_new[k];
        }
        for (k, &i) in self.endogenous.iter().enumerate() {
            full[i] = x_n_new[k];
        }
        full
    }
}
