//! The compressible TPFA pressure solver.

use log::{debug, info, warn};

use crate::boundary::BoundaryConditions;
use crate::error::{PressureError, Result};
use crate::grid::{Grid, StaticGeometry};
use crate::props::PropertyEvaluator;
use crate::state::{State, WellState};
use crate::wells::Wells;

use super::assemble::{assemble, compute_results, AssemblyInput};
use super::newton::{apply_increment, inf_norm, NewtonRaphson, SolveReport};
use super::{
    DynamicData, FlowContext, LinearSolver, ResidualSystem, VolumeDiscrepancy,
    DEFAULT_CHANGE_TOLERANCE, DEFAULT_MAX_ITERATIONS, DEFAULT_RESIDUAL_TOLERANCE,
};

/// Configuration for the pressure solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Residual inf-norm tolerance
    pub residual_tol: f64,
    /// Pressure-change inf-norm tolerance
    pub change_tol: f64,
    /// Maximum Newton-Raphson iterations per solve
    pub max_iterations: usize,
    /// Volume discrepancy used in the accumulation term
    pub volume_discrepancy: VolumeDiscrepancy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            residual_tol: DEFAULT_RESIDUAL_TOLERANCE,
            change_tol: DEFAULT_CHANGE_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            volume_discrepancy: VolumeDiscrepancy::Zero,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the residual tolerance.
    pub fn with_residual_tolerance(mut self, tol: f64) -> Self {
        self.residual_tol = tol;
        self
    }

    /// Set the pressure-change tolerance.
    pub fn with_change_tolerance(mut self, tol: f64) -> Self {
        self.change_tol = tol;
        self
    }

    /// Set the maximum Newton-Raphson iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the per-cell volume discrepancy.
    pub fn with_volume_discrepancy(mut self, voldisc: VolumeDiscrepancy) -> Self {
        self.volume_discrepancy = voldisc;
        self
    }

    /// Reject non-positive tolerances and a zero iteration cap.
    pub fn validate(&self) -> Result<()> {
        if !(self.residual_tol > 0.0) || !(self.change_tol > 0.0) {
            return Err(PressureError::invalid_parameter(format!(
                "tolerances must be positive (residual {}, change {})",
                self.residual_tol, self.change_tol
            )));
        }
        if self.max_iterations == 0 {
            return Err(PressureError::invalid_parameter(
                "max_iterations must be at least 1",
            ));
        }
        Ok(())
    }

    fn newton(&self) -> NewtonRaphson {
        NewtonRaphson::new(self.max_iterations, self.residual_tol, self.change_tol)
    }
}

/// Newton-Raphson pressure solver for compressible multiphase flow.
///
/// The solver borrows the grid, the property evaluator, the linear solver
/// and the well topology for its whole lifetime. It owns the static
/// geometry and all per-iteration scratch data, so a single instance must
/// not run overlapping solves.
///
/// Unknowns are the cell pressures followed by the well bottom-hole
/// pressures.
pub struct CompressibleTpfa<'a> {
    grid: &'a Grid,
    props: &'a dyn PropertyEvaluator,
    linsolver: &'a dyn LinearSolver,
    wells: Option<&'a Wells>,
    /// Vertical gravity component
    gravity: f64,
    config: SolverConfig,
    newton: NewtonRaphson,
    geometry: StaticGeometry,
    boundary_pressure: Vec<Option<f64>>,
    dynamic: DynamicData,
    system: ResidualSystem,
    increment: Vec<f64>,
}

impl<'a> CompressibleTpfa<'a> {
    /// Set up a solver.
    ///
    /// `gravity`, if given, must have one component per grid dimension; the
    /// last component is taken as vertical. Fails if the wells and the
    /// property evaluator disagree on the number of phases.
    pub fn new(
        grid: &'a Grid,
        props: &'a dyn PropertyEvaluator,
        linsolver: &'a dyn LinearSolver,
        config: SolverConfig,
        gravity: Option<&[f64]>,
        wells: Option<&'a Wells>,
    ) -> Result<Self> {
        config.validate()?;
        let np = props.num_phases();
        if let Some(wells) = wells {
            if wells.number_of_phases() != np {
                return Err(PressureError::InconsistentPhases {
                    wells: wells.number_of_phases(),
                    props: np,
                });
            }
            wells.validate(grid.number_of_cells)?;
        }
        let gravity = match gravity {
            Some(g) if g.len() != grid.dimensions => {
                return Err(PressureError::invalid_parameter(format!(
                    "gravity has {} components, grid has dimension {}",
                    g.len(),
                    grid.dimensions
                )));
            }
            Some(g) => g.last().copied().unwrap_or(0.0),
            None => 0.0,
        };

        let geometry = StaticGeometry::compute(grid, props.permeability(), props.porosity())?;
        let system = ResidualSystem::new(grid, wells);
        let increment = vec![0.0; system.num_dofs()];
        debug!(
            "pressure solver: {} cells, {} wells, {} phases, {} Jacobian entries",
            grid.number_of_cells,
            wells.map_or(0, Wells::number_of_wells),
            np,
            system.jacobian.nnz()
        );

        Ok(Self {
            grid,
            props,
            linsolver,
            wells,
            gravity,
            newton: config.newton(),
            config,
            geometry,
            boundary_pressure: vec![None; grid.number_of_faces],
            dynamic: DynamicData::new(np),
            system,
            increment,
        })
    }

    /// Impose boundary conditions. Boundary faces without a condition are closed.
    pub fn with_boundary_conditions(mut self, bc: &BoundaryConditions) -> Result<Self> {
        self.boundary_pressure = bc.pressure_by_face(self.grid)?;
        Ok(self)
    }

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Static geometry computed at construction.
    pub fn geometry(&self) -> &StaticGeometry {
        &self.geometry
    }

    /// Dynamic data of the last evaluated iterate.
    pub fn dynamic(&self) -> &DynamicData {
        &self.dynamic
    }

    /// Residual and Jacobian of the last evaluated iterate.
    pub fn system(&self) -> &ResidualSystem {
        &self.system
    }

    /// Solve for cell and bottom-hole pressures over a step of length `dt`.
    ///
    /// Pressures in `state` and `well_state` are the initial guess and are
    /// updated in place. On convergence the face fluxes and well rates are
    /// filled in as well. Exhausting the iteration budget is an error; the
    /// pressures then hold the last iterate.
    pub fn solve(
        &mut self,
        dt: f64,
        state: &mut State,
        well_state: &mut WellState,
    ) -> Result<SolveReport> {
        self.prepare(dt, state, well_state)?;
        self.evaluate(dt, state, well_state)?;
        debug!(
            "initial residual {:.3e}",
            inf_norm(&self.system.residual)
        );

        let nc = self.grid.number_of_cells;
        let mut iterations = 0;
        loop {
            self.linsolver
                .solve(self.system.jacobian.view(), &self.system.residual, &mut self.increment)?;
            for dx in &mut self.increment {
                *dx = -*dx;
            }
            apply_increment(&self.increment, &mut state.pressure, &mut well_state.bhp);
            iterations += 1;

            let change_norm = inf_norm(&self.increment);
            self.evaluate(dt, state, well_state)?;
            let residual_norm = inf_norm(&self.system.residual);
            debug!(
                "iteration {iterations}: residual {residual_norm:.3e}, change {change_norm:.3e} \
                 (cells {:.3e})",
                inf_norm(&self.increment[..nc])
            );

            if self.newton.converged(residual_norm, change_norm) {
                self.extract_results(dt, state, well_state);
                info!(
                    "pressure solve converged in {iterations} iterations \
                     (residual {residual_norm:.3e}, change {change_norm:.3e})"
                );
                return Ok(SolveReport {
                    iterations,
                    residual_norm,
                    change_norm,
                });
            }
            if self.newton.exhausted(iterations) {
                warn!(
                    "pressure solve did not converge in {iterations} iterations \
                     (residual {residual_norm:.3e}, change {change_norm:.3e})"
                );
                return Err(PressureError::convergence_failure(
                    iterations,
                    residual_norm,
                    change_norm,
                ));
            }
        }
    }

    /// Assemble the residual and Jacobian at the given state without
    /// iterating.
    pub fn evaluate_residual(
        &mut self,
        dt: f64,
        state: &mut State,
        well_state: &WellState,
    ) -> Result<&ResidualSystem> {
        self.prepare(dt, state, well_state)?;
        self.evaluate(dt, state, well_state)?;
        Ok(&self.system)
    }

    fn context(&self) -> FlowContext<'a> {
        FlowContext {
            grid: self.grid,
            props: self.props,
            wells: self.wells,
            gravity: self.gravity,
        }
    }

    /// Check inputs, write boundary pressures and compute well potentials.
    fn prepare(&mut self, dt: f64, state: &mut State, well_state: &WellState) -> Result<()> {
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(PressureError::invalid_parameter(format!(
                "time step must be positive, got {dt}"
            )));
        }
        state.validate(self.grid, self.props.num_phases())?;
        well_state.validate(self.wells)?;

        for (face_pressure, bc) in state.face_pressure.iter_mut().zip(&self.boundary_pressure) {
            if let Some(p) = bc {
                *face_pressure = *p;
            }
        }
        let ctx = self.context();
        self.dynamic.compute_well_potentials(&ctx, state)
    }

    /// Refresh the dynamic data and assemble the system at the current iterate.
    fn evaluate(&mut self, dt: f64, state: &State, well_state: &WellState) -> Result<()> {
        let ctx = self.context();
        self.dynamic
            .compute_per_iteration(&ctx, state, &self.config.volume_discrepancy)?;
        let input = AssemblyInput {
            grid: self.grid,
            wells: self.wells,
            controls: &well_state.controls,
            dt,
            trans: &self.geometry.trans,
            porevol: &self.geometry.porevol,
            dynamic: &self.dynamic,
            surfacevol: &state.surfacevol,
            cell_pressure: &state.pressure,
            face_pressure: &state.face_pressure,
            boundary_pressure: &self.boundary_pressure,
            well_bhp: &well_state.bhp,
        };
        assemble(&mut self.system, &input)
    }

    fn extract_results(&self, dt: f64, state: &mut State, well_state: &mut WellState) {
        let input = AssemblyInput {
            grid: self.grid,
            wells: self.wells,
            controls: &well_state.controls,
            dt,
            trans: &self.geometry.trans,
            porevol: &self.geometry.porevol,
            dynamic: &self.dynamic,
            surfacevol: &state.surfacevol,
            cell_pressure: &state.pressure,
            face_pressure: &state.face_pressure,
            boundary_pressure: &self.boundary_pressure,
            well_bhp: &well_state.bhp,
        };
        compute_results(&input, &mut state.face_flux, &mut well_state.rates);
    }
}
