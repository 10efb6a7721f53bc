//! Supply-reference (Ghosh) closure of the mixed model.
//!
//! The default for physical supply shocks: the output change of shocked
//! sectors pushes forward through forward linkages,
//! `Δx_n = Δx_mᵗ · G_mm⁻¹ · G_mn`.

use mrio_core::tables::MrioTables;
use mrio_core::types::SingularSystemError;
use nalgebra::DVector;

use super::partition::Partition;
use super::SolveError;

/// New endogenous output under the Ghosh closure.
pub(crate) fn endogenous_output(
    tables: &MrioTables,
    part: &Partition,
    delta_x_m: &DVector<f64>,
) -> Result<DVector<f64>, SolveError> {
    let exo = &part.exogenous;
    let endo = &part.endogenous;
    let g = tables.ghosh();

    let g_mn = g.select_rows(exo).select_columns(endo);
    let g_mm = g.select_rows(exo).select_columns(exo);

    let g_mm_inv = g_mm
        .try_inverse()
        .ok_or_else(|| SingularSystemError::new("G_mm", exo.len()))?;

    // Row-vector form: output changes push forward through supply linkages.
    let delta_x_n = (delta_x_m.transpose() * g_mm_inv * g_mn).transpose();

    let x_n_old = Partition::gather(tables.x(), endo);
    Ok(x_n_old + delta_x_n)
}
