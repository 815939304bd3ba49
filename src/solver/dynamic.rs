//! Pressure-dependent quantities refreshed during a solve.
//!
//! Well potentials are computed once per solve. Everything else is
//! recomputed in full on every Newton iteration, in three passes that must
//! run in order: cells, then faces (which read cell values), then well
//! perforations (which read cell values).
//!
//! Matrices are `np x np`, column-major, stored contiguously per cell, face
//! or perforation.

use log::trace;

use crate::error::{PressureError, Result};
use crate::grid::{Grid, Side, Sides};
use crate::props::PropertyEvaluator;
use crate::state::State;
use crate::wells::{WellType, Wells};

/// Per-cell volume discrepancy used by the accumulation term.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum VolumeDiscrepancy {
    /// Identically zero
    #[default]
    Zero,
    /// Caller-supplied value per cell
    PerCell(Vec<f64>),
}

/// Read-only inputs shared by all passes.
#[derive(Clone, Copy)]
pub struct FlowContext<'a> {
    pub grid: &'a Grid,
    pub props: &'a dyn PropertyEvaluator,
    pub wells: Option<&'a Wells>,
    /// Vertical component of the gravity vector (zero without gravity)
    pub gravity: f64,
}

/// The upwind cell of a face for one phase.
///
/// With two neighbours, the second cell is upwind only if the first side's
/// potential is strictly lower; ties go to the first cell. With a single
/// neighbour that cell is upwind.
pub fn upwind_cell(cells: Sides<Option<usize>>, pot_first: f64, pot_second: f64) -> Option<usize> {
    match cells.0 {
        [Some(c0), Some(c1)] => Some(if pot_first < pot_second { c1 } else { c0 }),
        [Some(c), None] | [None, Some(c)] => Some(c),
        [None, None] => None,
    }
}

/// Dynamic caches for cells, faces and well perforations.
#[derive(Debug, Clone, Default)]
pub struct DynamicData {
    num_phases: usize,
    /// Composition matrices per cell (`N * np * np`)
    pub cell_a: Vec<f64>,
    /// Pressure derivatives of `cell_a`
    pub cell_da: Vec<f64>,
    /// Phase viscosities per cell (`N * np`)
    pub cell_viscosity: Vec<f64>,
    /// Phase mobilities per cell (`N * np`)
    pub cell_phasemob: Vec<f64>,
    /// Volume discrepancy per cell (`N`)
    pub cell_voldisc: Vec<f64>,
    /// Upwinded composition matrices per face (`F * np * np`)
    pub face_a: Vec<f64>,
    /// Upwinded phase mobilities per face (`F * np`)
    pub face_phasemob: Vec<f64>,
    /// Gravity contribution to the potential difference across each face (`F * np`)
    pub face_gravcap: Vec<f64>,
    /// Upwind cell per face and phase (`F * np`)
    pub face_upwind: Vec<usize>,
    /// Composition matrices per perforation (`P * np * np`)
    pub wellperf_a: Vec<f64>,
    /// Phase mobilities per perforation (`P * np`)
    pub wellperf_phasemob: Vec<f64>,
    /// Gravity potential per perforation and phase (`P * np`), fixed per solve
    pub wellperf_gpot: Vec<f64>,
}

impl DynamicData {
    /// Empty caches for `num_phases` phases.
    pub fn new(num_phases: usize) -> Self {
        Self {
            num_phases,
            ..Self::default()
        }
    }

    /// Number of phases.
    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Composition matrix of cell `c`.
    pub fn cell_matrix(&self, c: usize) -> &[f64] {
        let np2 = self.num_phases * self.num_phases;
        &self.cell_a[c * np2..(c + 1) * np2]
    }

    /// Pressure derivative of the composition matrix of cell `c`.
    pub fn cell_matrix_derivative(&self, c: usize) -> &[f64] {
        let np2 = self.num_phases * self.num_phases;
        &self.cell_da[c * np2..(c + 1) * np2]
    }

    /// Phase mobilities of cell `c`.
    pub fn cell_mobility(&self, c: usize) -> &[f64] {
        let np = self.num_phases;
        &self.cell_phasemob[c * np..(c + 1) * np]
    }

    /// Upwinded composition matrix of face `f`.
    pub fn face_matrix(&self, f: usize) -> &[f64] {
        let np2 = self.num_phases * self.num_phases;
        &self.face_a[f * np2..(f + 1) * np2]
    }

    /// Upwinded phase mobilities of face `f`.
    pub fn face_mobility(&self, f: usize) -> &[f64] {
        let np = self.num_phases;
        &self.face_phasemob[f * np..(f + 1) * np]
    }

    /// Gravity terms of face `f`.
    pub fn face_gravity(&self, f: usize) -> &[f64] {
        let np = self.num_phases;
        &self.face_gravcap[f * np..(f + 1) * np]
    }

    /// Upwind cell of face `f` for each phase.
    pub fn face_upwind_cells(&self, f: usize) -> &[usize] {
        let np = self.num_phases;
        &self.face_upwind[f * np..(f + 1) * np]
    }

    /// Composition matrix of perforation `j`.
    pub fn perforation_matrix(&self, j: usize) -> &[f64] {
        let np2 = self.num_phases * self.num_phases;
        &self.wellperf_a[j * np2..(j + 1) * np2]
    }

    /// Phase mobilities of perforation `j`.
    pub fn perforation_mobility(&self, j: usize) -> &[f64] {
        let np = self.num_phases;
        &self.wellperf_phasemob[j * np..(j + 1) * np]
    }

    /// Gravity potentials of perforation `j`.
    pub fn perforation_potential(&self, j: usize) -> &[f64] {
        let np = self.num_phases;
        &self.wellperf_gpot[j * np..(j + 1) * np]
    }

    /// Compute the gravity potential of every perforation:
    ///
    /// ```text
    /// gpot(perf, phase) = g * (perf_depth - well_ref_depth) * rho(perf cell, phase)
    /// ```
    ///
    /// Without gravity all potentials are zero and no densities are queried.
    pub fn compute_well_potentials(&mut self, ctx: &FlowContext<'_>, state: &State) -> Result<()> {
        let Some(wells) = ctx.wells else {
            self.wellperf_gpot.clear();
            return Ok(());
        };
        let np = self.num_phases;
        self.wellperf_gpot.clear();
        self.wellperf_gpot
            .resize(np * wells.number_of_perforations(), 0.0);
        if ctx.gravity == 0.0 {
            return Ok(());
        }

        let mut a = vec![0.0; np * np];
        let mut rho = vec![0.0; np];
        for (w, well) in wells.iter().enumerate() {
            for j in wells.perforations(w) {
                let c = wells.perforation_cell(j);
                let z = &state.surfacevol[np * c..np * (c + 1)];
                ctx.props.matrix(c, state.pressure[c], z, &mut a, None)?;
                ctx.props.density(&a, &mut rho)?;
                let dz = ctx.grid.cell_depth(c) - well.depth_ref;
                for (gpot, r) in self.wellperf_gpot[np * j..np * (j + 1)].iter_mut().zip(&rho) {
                    *gpot = r * ctx.gravity * dz;
                }
            }
        }
        Ok(())
    }

    /// Recompute every per-iteration quantity: cells, then faces, then wells.
    pub fn compute_per_iteration(
        &mut self,
        ctx: &FlowContext<'_>,
        state: &State,
        voldisc: &VolumeDiscrepancy,
    ) -> Result<()> {
        self.compute_cells(ctx, state, voldisc)?;
        self.compute_faces(ctx, state)?;
        self.compute_wells(ctx);
        Ok(())
    }

    /// Cell pass: composition matrices, derivatives, viscosities, mobilities.
    pub fn compute_cells(
        &mut self,
        ctx: &FlowContext<'_>,
        state: &State,
        voldisc: &VolumeDiscrepancy,
    ) -> Result<()> {
        let nc = ctx.grid.number_of_cells;
        let np = self.num_phases;
        let np2 = np * np;
        self.cell_a.resize(nc * np2, 0.0);
        self.cell_da.resize(nc * np2, 0.0);
        self.cell_viscosity.resize(nc * np, 0.0);
        self.cell_phasemob.resize(nc * np, 0.0);

        for c in 0..nc {
            let p = state.pressure[c];
            let z = &state.surfacevol[np * c..np * (c + 1)];
            let s = &state.saturation[np * c..np * (c + 1)];
            ctx.props.matrix(
                c,
                p,
                z,
                &mut self.cell_a[np2 * c..np2 * (c + 1)],
                Some(&mut self.cell_da[np2 * c..np2 * (c + 1)]),
            )?;
            let mu = &mut self.cell_viscosity[np * c..np * (c + 1)];
            ctx.props.viscosity(c, p, z, mu)?;
            let mob = &mut self.cell_phasemob[np * c..np * (c + 1)];
            ctx.props.relperm(c, s, mob)?;
            for (m, v) in mob.iter_mut().zip(mu.iter()) {
                *m /= v;
            }
        }

        self.cell_voldisc.clear();
        match voldisc {
            VolumeDiscrepancy::Zero => self.cell_voldisc.resize(nc, 0.0),
            VolumeDiscrepancy::PerCell(values) => {
                if values.len() != nc {
                    return Err(PressureError::invalid_parameter(format!(
                        "volume discrepancy has length {}, expected {nc}",
                        values.len()
                    )));
                }
                self.cell_voldisc.extend_from_slice(values);
            }
        }
        trace!("cell pass done for {nc} cells");
        Ok(())
    }

    /// Face pass: gravity terms and phase-wise upwinding.
    ///
    /// For each face the potentials compared are
    /// `pot_first = p_first + gravcap` and `pot_second = p_second`, where
    /// `gravcap = rho_first (z_face - z_first) - rho_second (z_face - z_second)`.
    /// Gravity only switches this term on; its magnitude does not enter.
    /// A missing neighbour contributes the boundary face pressure and no
    /// gravity term. Mobility and row `phase` of `A` are copied from the
    /// phase's upwind cell.
    pub fn compute_faces(&mut self, ctx: &FlowContext<'_>, state: &State) -> Result<()> {
        let grid = ctx.grid;
        let nf = grid.number_of_faces;
        let np = self.num_phases;
        let np2 = np * np;
        self.face_a.resize(nf * np2, 0.0);
        self.face_phasemob.resize(nf * np, 0.0);
        self.face_gravcap.resize(nf * np, 0.0);
        self.face_upwind.resize(nf * np, 0);

        let mut gravcontrib = Sides::new(vec![0.0; np], vec![0.0; np]);
        let mut pot = Sides::new(vec![0.0; np], vec![0.0; np]);

        for f in 0..nf {
            let cells = grid.face_cells[f];
            let face_depth = grid.face_depth(f);
            let mut press = Sides::new(0.0, 0.0);

            for side in Side::BOTH {
                let contrib = &mut gravcontrib[side];
                match cells[side] {
                    Some(c) => {
                        press[side] = state.pressure[c];
                        if ctx.gravity != 0.0 {
                            ctx.props.density(&self.cell_a[np2 * c..np2 * (c + 1)], contrib)?;
                            let scale = face_depth - grid.cell_depth(c);
                            for value in contrib.iter_mut() {
                                *value *= scale;
                            }
                        } else {
                            contrib.fill(0.0);
                        }
                    }
                    None => {
                        press[side] = state.face_pressure[f];
                        contrib.fill(0.0);
                    }
                }
            }

            for phase in 0..np {
                let gravcap = gravcontrib[Side::First][phase] - gravcontrib[Side::Second][phase];
                self.face_gravcap[np * f + phase] = gravcap;
                pot[Side::First][phase] = press[Side::First] + gravcap;
                pot[Side::Second][phase] = press[Side::Second];
            }

            for phase in 0..np {
                let upwind = upwind_cell(cells, pot[Side::First][phase], pot[Side::Second][phase])
                    .ok_or_else(|| {
                        PressureError::invalid_grid(format!("Face {f} has no adjacent cell"))
                    })?;
                self.face_upwind[np * f + phase] = upwind;
                self.face_phasemob[np * f + phase] = self.cell_phasemob[np * upwind + phase];
                for col in 0..np {
                    self.face_a[np2 * f + phase + np * col] =
                        self.cell_a[np2 * upwind + phase + np * col];
                }
            }
        }
        trace!("face pass done for {nf} faces");
        Ok(())
    }

    /// Well pass: perforations take the composition matrix of their cell;
    /// injectors get the total cell mobility in every phase, producers the
    /// cell's phase mobilities.
    pub fn compute_wells(&mut self, ctx: &FlowContext<'_>) {
        let Some(wells) = ctx.wells else {
            self.wellperf_a.clear();
            self.wellperf_phasemob.clear();
            return;
        };
        let np = self.num_phases;
        let np2 = np * np;
        let nperf = wells.number_of_perforations();
        self.wellperf_a.resize(nperf * np2, 0.0);
        self.wellperf_phasemob.resize(nperf * np, 0.0);

        for (w, well) in wells.iter().enumerate() {
            for j in wells.perforations(w) {
                let c = wells.perforation_cell(j);
                self.wellperf_a[np2 * j..np2 * (j + 1)]
                    .copy_from_slice(&self.cell_a[np2 * c..np2 * (c + 1)]);
                let cell_mob = &self.cell_phasemob[np * c..np * (c + 1)];
                let perf_mob = &mut self.wellperf_phasemob[np * j..np * (j + 1)];
                match well.kind {
                    WellType::Injector => perf_mob.fill(cell_mob.iter().sum()),
                    WellType::Producer => perf_mob.copy_from_slice(cell_mob),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{CompressibleFluid, PhaseProps, Rock};
    use crate::wells::WellControl;
    use approx::assert_relative_eq;

    /// Two-phase fluid whose density must never be queried.
    struct NoDensity(CompressibleFluid);

    impl PropertyEvaluator for NoDensity {
        fn num_phases(&self) -> usize {
            self.0.num_phases()
        }
        fn porosity(&self) -> &[f64] {
            self.0.porosity()
        }
        fn permeability(&self) -> &[f64] {
            self.0.permeability()
        }
        fn matrix(
            &self,
            cell: usize,
            p: f64,
            z: &[f64],
            a: &mut [f64],
            da: Option<&mut [f64]>,
        ) -> Result<()> {
            self.0.matrix(cell, p, z, a, da)
        }
        fn viscosity(&self, cell: usize, p: f64, z: &[f64], mu: &mut [f64]) -> Result<()> {
            self.0.viscosity(cell, p, z, mu)
        }
        fn relperm(&self, cell: usize, s: &[f64], kr: &mut [f64]) -> Result<()> {
            self.0.relperm(cell, s, kr)
        }
        fn density(&self, _a: &[f64], _rho: &mut [f64]) -> Result<()> {
            panic!("density queried without gravity");
        }
    }

    fn column_fluid(grid: &Grid) -> CompressibleFluid {
        CompressibleFluid::new(
            Rock::uniform(grid, 0.2, 1.0),
            vec![
                PhaseProps::new(1000.0, 1.0).with_compressibility(1e-3, 0.0),
                PhaseProps::new(700.0, 2.0).with_corey_exponent(2.0),
            ],
        )
        .unwrap()
    }

    fn two_wells() -> Wells {
        let mut wells = Wells::new(2);
        wells
            .add_injector(
                "I",
                0.0,
                &[1.0, 0.0],
                &[0],
                &[1.0],
                WellControl::ReservoirRate(1.0),
            )
            .unwrap();
        wells
            .add_producer("P", 0.0, &[1, 2], &[1.0, 1.0], WellControl::Bhp(50.0))
            .unwrap();
        wells
    }

    #[test]
    fn test_no_gravity_gives_zero_potentials_without_density() {
        let grid = Grid::cartesian([1, 1, 3], [1.0, 1.0, 2.0]).unwrap();
        let props = NoDensity(column_fluid(&grid));
        let wells = two_wells();
        let state = State::uniform(&grid, 100.0, &[0.4, 0.6]);
        let ctx = FlowContext {
            grid: &grid,
            props: &props,
            wells: Some(&wells),
            gravity: 0.0,
        };
        let mut data = DynamicData::new(2);
        data.compute_well_potentials(&ctx, &state).unwrap();
        data.compute_per_iteration(&ctx, &state, &VolumeDiscrepancy::Zero)
            .unwrap();
        assert_eq!(data.wellperf_gpot.len(), 6);
        assert!(data.wellperf_gpot.iter().all(|&g| g == 0.0));
        assert!(data.face_gravcap.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_well_potentials_with_gravity() {
        let grid = Grid::cartesian([1, 1, 3], [1.0, 1.0, 2.0]).unwrap();
        let props = column_fluid(&grid);
        let mut wells = Wells::new(2);
        wells
            .add_producer("P", 2.0, &[2], &[1.0], WellControl::Bhp(50.0))
            .unwrap();
        let state = State::uniform(&grid, 0.0, &[0.5, 0.5]);
        let ctx = FlowContext {
            grid: &grid,
            props: &props,
            wells: Some(&wells),
            gravity: 10.0,
        };
        let mut data = DynamicData::new(2);
        data.compute_well_potentials(&ctx, &state).unwrap();
        // Cell 2 centroid at depth 5, reference at 2; b = 1 at p = 0.
        assert_relative_eq!(data.perforation_potential(0)[0], 1000.0 * 10.0 * 3.0);
        assert_relative_eq!(data.perforation_potential(0)[1], 700.0 * 10.0 * 3.0);
    }

    #[test]
    fn test_cell_mobility_is_relperm_over_viscosity() {
        let grid = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let props = column_fluid(&grid);
        let state = State::uniform(&grid, 10.0, &[0.4, 0.6]);
        let ctx = FlowContext {
            grid: &grid,
            props: &props,
            wells: None,
            gravity: 0.0,
        };
        let mut data = DynamicData::new(2);
        data.compute_per_iteration(&ctx, &state, &VolumeDiscrepancy::Zero)
            .unwrap();
        assert_relative_eq!(data.cell_mobility(1)[0], 0.4);
        assert_relative_eq!(data.cell_mobility(1)[1], 0.36 / 2.0, epsilon = 1e-14);
        assert_relative_eq!(data.cell_matrix(0)[0], (0.01f64).exp());
        assert_relative_eq!(data.cell_matrix_derivative(0)[0], 1e-3 * (0.01f64).exp());
        assert_eq!(data.cell_voldisc, vec![0.0, 0.0]);
        assert!(data.wellperf_a.is_empty());

        let custom = VolumeDiscrepancy::PerCell(vec![0.1, -0.2]);
        data.compute_cells(&ctx, &state, &custom).unwrap();
        assert_eq!(data.cell_voldisc, vec![0.1, -0.2]);
        let wrong = VolumeDiscrepancy::PerCell(vec![0.1]);
        assert!(data.compute_cells(&ctx, &state, &wrong).is_err());
    }

    #[test]
    fn test_upwind_tie_goes_to_first_side() {
        let grid = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let props = column_fluid(&grid);
        let mut state = State::uniform(&grid, 10.0, &[0.4, 0.6]);
        state.saturation = vec![0.2, 0.8, 0.9, 0.1];
        let ctx = FlowContext {
            grid: &grid,
            props: &props,
            wells: None,
            gravity: 0.0,
        };
        let mut data = DynamicData::new(2);
        data.compute_per_iteration(&ctx, &state, &VolumeDiscrepancy::Zero)
            .unwrap();
        // Face 1 joins cells 0 and 1 at equal pressure.
        assert_eq!(data.face_mobility(1), data.cell_mobility(0));
        assert_eq!(data.face_upwind_cells(1), &[0, 0]);
        assert_eq!(upwind_cell(Sides::new(Some(4), Some(9)), 1.0, 1.0), Some(4));
        assert_eq!(upwind_cell(Sides::new(Some(4), Some(9)), 1.0, 1.5), Some(9));
        assert_eq!(upwind_cell(Sides::new(None, Some(9)), 5.0, 1.0), Some(9));
        assert_eq!(upwind_cell(Sides::new(None, None), 5.0, 1.0), None);
    }

    #[test]
    fn test_upwind_follows_pressure_per_phase() {
        let grid = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let props = column_fluid(&grid);
        let mut state = State::uniform(&grid, 10.0, &[0.5, 0.5]);
        state.pressure = vec![10.0, 20.0];
        state.saturation = vec![0.2, 0.8, 0.9, 0.1];
        let ctx = FlowContext {
            grid: &grid,
            props: &props,
            wells: None,
            gravity: 0.0,
        };
        let mut data = DynamicData::new(2);
        data.compute_per_iteration(&ctx, &state, &VolumeDiscrepancy::Zero)
            .unwrap();
        assert_eq!(data.face_mobility(1), data.cell_mobility(1));
        assert_eq!(data.face_matrix(1), data.cell_matrix(1));
        // West boundary face of cell 0: its only cell is upwind.
        assert_eq!(data.face_mobility(0), data.cell_mobility(0));
    }

    #[test]
    fn test_gravity_can_reverse_upwind_direction() {
        // Vertical pair: cell 0 above cell 1, the face between them at depth 1.
        let grid = Grid::cartesian([1, 1, 2], [1.0, 1.0, 1.0]).unwrap();
        let props = column_fluid(&grid);
        let mut state = State::uniform(&grid, 0.0, &[0.5, 0.5]);
        state.saturation = vec![0.2, 0.8, 0.9, 0.1];
        // Higher pressure below, but less than the density head.
        state.pressure = vec![0.0, 100.0];
        let ctx = FlowContext {
            grid: &grid,
            props: &props,
            wells: None,
            gravity: 1000.0,
        };
        let mut data = DynamicData::new(2);
        data.compute_per_iteration(&ctx, &state, &VolumeDiscrepancy::Zero)
            .unwrap();
        let f = grid.faces_of_cell(0)[5];
        assert_eq!(grid.face_cells[f], Sides::new(Some(0), Some(1)));
        // gravcap = rho0 (0.5) - rho1 (-0.5) = (rho0 + rho1) / 2
        let b0 = (1e-3f64 * 0.0).exp();
        let b1 = (1e-3f64 * 100.0).exp();
        assert_relative_eq!(
            data.face_gravity(f)[0],
            1000.0 * (b0 + b1) * 0.5,
            max_relative = 1e-12
        );
        assert_relative_eq!(data.face_gravity(f)[1], 700.0, max_relative = 1e-12);
        // Heavy column above dominates: flow goes down, cell 0 is upwind.
        assert_eq!(data.face_mobility(f), data.cell_mobility(0));
    }

    #[test]
    fn test_face_gravity_term_is_independent_of_gravity_magnitude() {
        let grid = Grid::cartesian([1, 1, 2], [1.0, 1.0, 1.0]).unwrap();
        let props = CompressibleFluid::new(
            Rock::uniform(&grid, 0.2, 1.0),
            vec![PhaseProps::new(1000.0, 1.0)],
        )
        .unwrap();
        let state = State::uniform(&grid, 0.0, &[1.0]);
        let f = grid.faces_of_cell(0)[5];
        for g in [1.0, 9.81, -3.0] {
            let ctx = FlowContext {
                grid: &grid,
                props: &props,
                wells: None,
                gravity: g,
            };
            let mut data = DynamicData::new(1);
            data.compute_per_iteration(&ctx, &state, &VolumeDiscrepancy::Zero)
                .unwrap();
            // 1000 * 0.5 - 1000 * (-0.5)
            assert_relative_eq!(data.face_gravity(f)[0], 1000.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_injector_and_producer_mobilities() {
        let grid = Grid::cartesian([3, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let props = column_fluid(&grid);
        let wells = two_wells();
        let mut state = State::uniform(&grid, 10.0, &[0.5, 0.5]);
        state.saturation = vec![0.2, 0.8, 0.6, 0.4, 0.9, 0.1];
        let ctx = FlowContext {
            grid: &grid,
            props: &props,
            wells: Some(&wells),
            gravity: 0.0,
        };
        let mut data = DynamicData::new(2);
        data.compute_per_iteration(&ctx, &state, &VolumeDiscrepancy::Zero)
            .unwrap();

        let total: f64 = data.cell_mobility(0).iter().sum();
        for &m in data.perforation_mobility(0) {
            assert_relative_eq!(m, total, epsilon = 1e-15);
        }
        assert_eq!(data.perforation_mobility(1), data.cell_mobility(1));
        assert_eq!(data.perforation_mobility(2), data.cell_mobility(2));
        assert_eq!(data.perforation_matrix(2), data.cell_matrix(2));
    }
}
