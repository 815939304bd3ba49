//! Newton-Raphson pressure solver.
//!
//! This module provides the numerical engine of the crate.
//!
//! ## Pressure system
//!
//! The unknowns are the cell pressures followed by the well bottom-hole
//! pressures. Each Newton iteration solves `J x = F` and applies `-x`:
//!
//! ```text
//! [ J_cc  J_cw ] [ dp   ]     [ F_cells ]
//! [ J_wc  J_ww ] [ dbhp ] = - [ F_wells ]
//! ```
//!
//! where:
//! - `F_cells` are the per-cell volume balance residuals
//! - `F_wells` are the well control equations
//! - `J_cw` and `J_wc` couple perforated cells to their wells
//!
//! Before each assembly the pressure-dependent quantities are refreshed
//! (see [`DynamicData`]). Well gravity potentials are computed once per
//! solve. The loop stops when both the residual and the last pressure change
//! are within tolerance, and fails once the iteration cap is reached.

mod assemble;
mod dynamic;
mod linear;
mod newton;
mod pressure;
mod system;

pub use assemble::{assemble, compute_results, AssemblyInput};
pub use dynamic::{upwind_cell, DynamicData, FlowContext, VolumeDiscrepancy};
pub use linear::{to_dense, DenseLu, LinearSolver, LuFactors};
pub use newton::{apply_increment, inf_norm, NewtonRaphson, SolveReport};
pub use pressure::{CompressibleTpfa, SolverConfig};
pub use system::ResidualSystem;

/// Default tolerance on the residual inf-norm.
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-8;

/// Default tolerance on the inf-norm of the pressure change.
pub const DEFAULT_CHANGE_TOLERANCE: f64 = 1e-6;

/// Default maximum Newton-Raphson iterations per solve.
pub const DEFAULT_MAX_ITERATIONS: usize = 25;
