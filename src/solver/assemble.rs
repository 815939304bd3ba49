//! Residual and Jacobian assembly for the compressible TPFA pressure system.
//!
//! There is one equation per cell and one per well. With
//! `w_c = e^T A_c^{-1}` (the volume each unit of surface component occupies
//! in cell `c`), the cell equation reads
//!
//! ```text
//! F_c = w_c . ( sum_f +-A_f v_f  -  sum_perf A_j q_j )
//!       - pv_c / dt * ( w_c . z_c - 1 - voldisc_c )
//! ```
//!
//! with phase face fluxes `v_f = T_f lambda_f (p_first - p_second + gravcap_f)`
//! (positive from the first to the second side) and perforation phase
//! inflows `q_j = WI_j lambda_j (bhp + gpot_j - p_c)`, scaled by the
//! injection fractions for injectors. Well equations are
//! `bhp - target`, `sum(q) - target` or `distr . sum(A_j q_j) - target`
//! depending on the control.
//!
//! The Jacobian differentiates the weights `w_c` and the upwinded
//! composition matrices through `dA` of the cells they come from. Mobilities
//! and face gravity terms are held fixed within an iteration and refreshed
//! on every Newton iteration.

use crate::error::{PressureError, Result};
use crate::grid::{Grid, Side, Sides};
use crate::wells::{WellControl, WellType, Wells};

use super::linear::LuFactors;
use super::{DynamicData, ResidualSystem};

/// Everything the assembler reads.
///
/// Gravity terms and well potentials are taken from `dynamic`.
#[derive(Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub grid: &'a Grid,
    pub wells: Option<&'a Wells>,
    /// Active well controls (`W`)
    pub controls: &'a [WellControl],
    pub dt: f64,
    /// Face transmissibilities (`F`)
    pub trans: &'a [f64],
    /// Pore volumes (`N`)
    pub porevol: &'a [f64],
    pub dynamic: &'a DynamicData,
    /// Surface volumes at the start of the step (`N * np`)
    pub surfacevol: &'a [f64],
    /// Current cell pressures (`N`)
    pub cell_pressure: &'a [f64],
    /// Face pressures (`F`)
    pub face_pressure: &'a [f64],
    /// Prescribed boundary pressure per face, `None` where the face is closed
    pub boundary_pressure: &'a [Option<f64>],
    /// Current bottom-hole pressures (`W`)
    pub well_bhp: &'a [f64],
}

fn side_sign(side: Side) -> f64 {
    match side {
        Side::First => 1.0,
        Side::Second => -1.0,
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `y = A x` for a column-major `np x np` matrix.
fn matvec(a: &[f64], x: &[f64], y: &mut [f64]) {
    let np = x.len();
    for (i, yi) in y.iter_mut().enumerate() {
        *yi = (0..np).map(|p| a[i + np * p] * x[p]).sum();
    }
}

/// Compute `w = A^{-T} e` and its pressure derivative `dw = -A^{-T} dA^T w`.
fn cell_weights(cell: usize, a: &[f64], da: &[f64], w: &mut [f64], dw: &mut [f64]) -> Result<()> {
    let np = w.len();
    // A column-major buffer read row-major is A^T.
    let lu = LuFactors::factor(a, np)
        .map_err(|_| PressureError::property(cell, "composition matrix is singular"))?;
    lu.solve(&vec![1.0; np], w)?;
    let rhs: Vec<f64> = (0..np)
        .map(|p| -(0..np).map(|i| w[i] * da[i + np * p]).sum::<f64>())
        .collect();
    lu.solve(&rhs, dw)
}

/// Pressures on both sides of face `f`, or `None` if no flow crosses it.
fn face_pressures(input: &AssemblyInput<'_>, f: usize) -> Option<Sides<f64>> {
    let cells = input.grid.face_cells[f];
    if cells.is_boundary() && input.boundary_pressure[f].is_none() {
        return None;
    }
    let press = cells.map(|cell| match cell {
        Some(c) => input.cell_pressure[c],
        None => input.face_pressure[f],
    });
    Some(press)
}

/// Phase fluxes across face `f` (first to second side) and their derivative
/// with respect to the first side's pressure.
fn face_phase_fluxes(
    input: &AssemblyInput<'_>,
    f: usize,
    press: Sides<f64>,
    v: &mut [f64],
    k: &mut [f64],
) {
    let t = input.trans[f];
    let mob = input.dynamic.face_mobility(f);
    let gravcap = input.dynamic.face_gravity(f);
    for p in 0..v.len() {
        k[p] = t * mob[p];
        v[p] = k[p] * (press[Side::First] - press[Side::Second] + gravcap[p]);
    }
}

/// Phase inflows of perforation `j` of well `w` and their derivative with
/// respect to the bottom-hole pressure.
fn perforation_inflows(
    input: &AssemblyInput<'_>,
    wells: &Wells,
    w: usize,
    j: usize,
    q: &mut [f64],
    m: &mut [f64],
) {
    let well = wells.well(w);
    let c = wells.perforation_cell(j);
    let wi = wells.well_index(j);
    let mob = input.dynamic.perforation_mobility(j);
    let gpot = input.dynamic.perforation_potential(j);
    let bhp = input.well_bhp[w];
    for p in 0..q.len() {
        let frac = match well.kind {
            WellType::Injector => well.comp_frac[p],
            WellType::Producer => 1.0,
        };
        m[p] = wi * mob[p] * frac;
        q[p] = m[p] * (bhp + gpot[p] - input.cell_pressure[c]);
    }
}

/// Assemble residual and Jacobian into `system`.
pub fn assemble(system: &mut ResidualSystem, input: &AssemblyInput<'_>) -> Result<()> {
    let grid = input.grid;
    let dynamic = input.dynamic;
    let np = dynamic.num_phases();
    let nc = grid.number_of_cells;

    system.clear();
    system.weights.resize(nc * np, 0.0);
    system.dweights.resize(nc * np, 0.0);

    // Volume weights and accumulation.
    for c in 0..nc {
        let w = &mut system.weights[np * c..np * (c + 1)];
        let dw = &mut system.dweights[np * c..np * (c + 1)];
        cell_weights(c, dynamic.cell_matrix(c), dynamic.cell_matrix_derivative(c), w, dw)?;

        let z = &input.surfacevol[np * c..np * (c + 1)];
        let pv_dt = input.porevol[c] / input.dt;
        let fill = dot(w, z) - 1.0 - dynamic.cell_voldisc[c];
        let dfill = dot(dw, z);
        system.residual[c] -= pv_dt * fill;
        system.add_jacobian(c, c, -pv_dt * dfill);
    }

    // Face fluxes.
    let mut v = vec![0.0; np];
    let mut k = vec![0.0; np];
    let mut flux = vec![0.0; np];
    let mut dflux = vec![0.0; np];
    for f in 0..grid.number_of_faces {
        let Some(press) = face_pressures(input, f) else {
            continue;
        };
        face_phase_fluxes(input, f, press, &mut v, &mut k);
        let a = dynamic.face_matrix(f);
        matvec(a, &v, &mut flux);
        matvec(a, &k, &mut dflux);

        let cells = grid.face_cells[f];

        // Row i of A_f comes from the upwind cell of phase i.
        for (i, &u) in dynamic.face_upwind_cells(f).iter().enumerate() {
            let da = dynamic.cell_matrix_derivative(u);
            let dflux_i: f64 = (0..np).map(|p| da[i + np * p] * v[p]).sum();
            for (side, cell) in cells.iter() {
                let Some(c) = *cell else { continue };
                let wi = system.weights[np * c + i];
                system.add_jacobian(c, u, side_sign(side) * wi * dflux_i);
            }
        }

        for (side, cell) in cells.iter() {
            let Some(c) = *cell else { continue };
            let sign = side_sign(side);
            let w = &system.weights[np * c..np * (c + 1)];
            let dw = &system.dweights[np * c..np * (c + 1)];
            let wk = dot(w, &dflux);
            let wf = dot(w, &flux);
            let dwf = dot(dw, &flux);
            system.residual[c] += sign * wf;
            system.add_jacobian(c, c, sign * dwf);
            for (other_side, other) in cells.iter() {
                if let Some(c2) = *other {
                    system.add_jacobian(c, c2, sign * side_sign(other_side) * wk);
                }
            }
        }
    }

    // Wells.
    if let Some(wells) = input.wells {
        let mut q = vec![0.0; np];
        let mut m = vec![0.0; np];
        let mut inflow = vec![0.0; np];
        let mut dinflow = vec![0.0; np];
        let mut inflow_dp = vec![0.0; np];
        for (w, control) in input.controls.iter().enumerate() {
            let row = nc + w;
            for j in wells.perforations(w) {
                let c = wells.perforation_cell(j);
                perforation_inflows(input, wells, w, j, &mut q, &mut m);
                let a = dynamic.perforation_matrix(j);
                matvec(a, &q, &mut inflow);
                matvec(a, &m, &mut dinflow);
                // A_j is a copy of the perforated cell's matrix.
                matvec(dynamic.cell_matrix_derivative(c), &q, &mut inflow_dp);
                for (dst, dm) in inflow_dp.iter_mut().zip(&dinflow) {
                    *dst -= dm;
                }

                let wc = &system.weights[np * c..np * (c + 1)];
                let dwc = &system.dweights[np * c..np * (c + 1)];
                let wm = dot(wc, &dinflow);
                system.residual[c] -= dot(wc, &inflow);
                let dres_dp = -dot(dwc, &inflow) - dot(wc, &inflow_dp);
                system.add_jacobian(c, c, dres_dp);
                system.add_jacobian(c, row, -wm);

                // Rate and its derivatives with respect to bhp and p_c.
                let (rate, drate, drate_dp) = match control {
                    WellControl::Bhp(_) => continue,
                    WellControl::ReservoirRate(_) => {
                        let total_m = m.iter().sum::<f64>();
                        (q.iter().sum::<f64>(), total_m, -total_m)
                    }
                    WellControl::SurfaceRate { distr, .. } => (
                        dot(distr, &inflow),
                        dot(distr, &dinflow),
                        dot(distr, &inflow_dp),
                    ),
                };
                system.residual[row] += rate;
                system.add_jacobian(row, c, drate_dp);
                system.add_jacobian(row, row, drate);
            }
            match control {
                WellControl::Bhp(target) => {
                    system.residual[row] += input.well_bhp[w] - *target;
                    system.add_jacobian(row, row, 1.0);
                }
                WellControl::ReservoirRate(target) | WellControl::SurfaceRate { target, .. } => {
                    system.residual[row] -= *target;
                }
            }
        }
    }

    Ok(())
}

/// Derived outputs of a converged state.
///
/// `face_flux` receives the total phase flux per face (first to second
/// side, zero on closed faces) and `well_rates` the per-well, per-phase
/// reservoir inflow rates (`W * np`).
pub fn compute_results(input: &AssemblyInput<'_>, face_flux: &mut [f64], well_rates: &mut [f64]) {
    let np = input.dynamic.num_phases();
    let mut v = vec![0.0; np];
    let mut k = vec![0.0; np];
    for (f, total) in face_flux.iter_mut().enumerate() {
        *total = match face_pressures(input, f) {
            Some(press) => {
                face_phase_fluxes(input, f, press, &mut v, &mut k);
                v.iter().sum()
            }
            None => 0.0,
        };
    }

    well_rates.fill(0.0);
    if let Some(wells) = input.wells {
        let mut q = vec![0.0; np];
        let mut m = vec![0.0; np];
        for w in 0..wells.number_of_wells() {
            for j in wells.perforations(w) {
                perforation_inflows(input, wells, w, j, &mut q, &mut m);
                for (rate, qp) in well_rates[np * w..np * (w + 1)].iter_mut().zip(&q) {
                    *rate += qp;
                }
            }
        }
    }
}
