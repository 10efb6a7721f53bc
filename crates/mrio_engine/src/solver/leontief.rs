//! Demand-reference (Leontief) closure of the mixed model.
//!
//! Supply shocks are propagated through demand-side mechanics by treating
//! the inputs no longer supplied by shocked sectors as a negative
//! final-demand injection into the mixed Miller-Blair model. See DESIGN.md
//! for the caveat on its economic interpretation.

use mrio_core::tables::MrioTables;
use mrio_core::types::SingularSystemError;
use nalgebra::DVector;

use super::partition::Partition;
use super::SolveError;

/// New endogenous output under the Leontief closure.
///
/// The endogenous-only Leontief inverse is derived algebraically from the
/// precomputed full inverse,
/// `L_nn_reduced = L_nn − L_nm · L_mm⁻¹ · L_mn`,
/// so only the |M|x|M| pivot is inverted at request time.
pub(crate) fn endogenous_output(
    tables: &MrioTables,
    part: &Partition,
    delta_x_m: &DVector<f64>,
) -> Result<DVector<f64>, SolveError> {
    let exo = &part.exogenous;
    let endo = &part.endogenous;
    let l = tables.leontief();

    let l_nn = l.select_rows(endo).select_columns(endo);
    let l_nm = l.select_rows(endo).select_columns(exo);
    let l_mn = l.select_rows(exo).select_columns(endo);
    let l_mm = l.select_rows(exo).select_columns(exo);

    let l_mm_inv = l_mm
        .try_inverse()
        .ok_or_else(|| SingularSystemError::new("L_mm", exo.len()))?;
    let reduced = l_nn - &l_nm * &l_mm_inv * &l_mn;

    // Monetary value of inputs no longer supplied by shocked sectors to
    // each endogenous sector, injected as negative final demand.
    let a_mn = tables.a().select_rows(exo).select_columns(endo);
    let unavailable_inputs = a_mn.transpose() * delta_x_m;

    let y_n = Partition::gather(tables.y(), endo);
    Ok(reduced * (y_n + unavailable_inputs))
}
