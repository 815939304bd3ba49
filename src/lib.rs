//! # Compressible TPFA
//!
//! A Newton-Raphson pressure solver for compressible multiphase flow in
//! porous media.
//!
//! This library provides:
//! - An unstructured finite-volume grid model with a Cartesian builder
//! - Two-point flux approximation (TPFA) transmissibilities and pore volumes
//! - Phase-wise upwinding with gravity, and well coupling for injectors and producers
//! - A pluggable property evaluator and linear solver
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`grid`] - Grid topology, validation and static geometry
//! - [`props`] - Rock and fluid property evaluation
//! - [`wells`] - Well topology and controls
//! - [`boundary`] - Prescribed boundary pressures
//! - [`state`] - Reservoir and well state updated by the solver
//! - [`solver`] - Dynamic data, residual assembly and the Newton driver
//!
//! ## Usage
//!
//! ```no_run
//! use compressible_tpfa::props::{CompressibleFluid, PhaseProps, Rock};
//! use compressible_tpfa::{CompressibleTpfa, DenseLu, Grid, SolverConfig, State, WellState};
//!
//! # fn main() -> compressible_tpfa::Result<()> {
//! let grid = Grid::cartesian([10, 10, 1], [1.0, 1.0, 1.0])?;
//! let water = PhaseProps::new(1000.0, 1e-3).with_compressibility(1e-9, 1e5);
//! let fluid = CompressibleFluid::new(Rock::uniform(&grid, 0.2, 1e-13), vec![water])?;
//!
//! let mut solver = CompressibleTpfa::new(&grid, &fluid, &DenseLu, SolverConfig::new(), None, None)?;
//! let mut state = State::uniform(&grid, 1e5, &[1.0]);
//! state.init_surfacevol(&fluid)?;
//! let report = solver.solve(86400.0, &mut state, &mut WellState::default())?;
//! println!("converged in {} iterations", report.iterations);
//! # Ok(())
//! # }
//! ```
//!
//! ## Discretization
//!
//! For each time step of length `dt`:
//!
//! 1. Compute well gravity potentials from the initial state
//! 2. Refresh composition matrices, mobilities and upwind directions
//! 3. Assemble the residual and Jacobian and solve for the Newton increment
//! 4. Repeat from 2 until the residual and the pressure change are both small
//!
//! Logging goes through the `log` facade; install any logger to see
//! per-iteration diagnostics.

pub mod boundary;
pub mod error;
pub mod grid;
pub mod props;
pub mod solver;
pub mod state;
pub mod wells;

// Re-export main types for convenience
pub use boundary::{BoundaryCondition, BoundaryConditions};
pub use error::{PressureError, Result};
pub use grid::Grid;
pub use props::PropertyEvaluator;
pub use solver::{CompressibleTpfa, DenseLu, LinearSolver, SolveReport, SolverConfig};
pub use state::{State, WellState};
pub use wells::{WellControl, WellType, Wells};
