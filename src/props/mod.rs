//! Rock and fluid property evaluation.
//!
//! The solver treats PVT and saturation functions as a black box behind the
//! [`PropertyEvaluator`] trait. All per-phase matrices are square
//! `np x np` and stored column-major: entry `(i, p)` of `A` lives at
//! `a[i + np * p]` and maps the volume of phase `p` to surface volume of
//! component `i`.
//!
//! [`CompressibleFluid`] is a simple evaluator with diagonal `A`, useful for
//! tests and demonstrations.

mod fluid;
mod rock;

pub use fluid::{CompressibleFluid, PhaseProps};
pub use rock::Rock;

use crate::error::Result;

/// Rock and fluid properties as seen by the pressure solver.
///
/// Every query is a single-cell query. Implementations report
/// non-physical input with [`PressureError::PropertyEvaluation`](crate::PressureError::PropertyEvaluation);
/// the solver propagates such errors unchanged.
pub trait PropertyEvaluator {
    /// Number of phases (and of surface components).
    fn num_phases(&self) -> usize;

    /// Porosity per cell.
    fn porosity(&self) -> &[f64];

    /// Permeability per cell, one row-major `D x D` tensor each.
    fn permeability(&self) -> &[f64];

    /// Composition matrix `A` for `cell` at pressure `p` and surface volumes `z`.
    ///
    /// If `da` is given, it receives the pressure derivative of `A`.
    fn matrix(
        &self,
        cell: usize,
        p: f64,
        z: &[f64],
        a: &mut [f64],
        da: Option<&mut [f64]>,
    ) -> Result<()>;

    /// Phase viscosities for `cell`.
    fn viscosity(&self, cell: usize, p: f64, z: &[f64], mu: &mut [f64]) -> Result<()>;

    /// Phase relative permeabilities for `cell` at saturation `s`.
    fn relperm(&self, cell: usize, s: &[f64], kr: &mut [f64]) -> Result<()>;

    /// Phase densities at reservoir conditions, given a composition matrix.
    fn density(&self, a: &[f64], rho: &mut [f64]) -> Result<()>;
}
