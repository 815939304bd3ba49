//! Reservoir and well state owned by the caller.
//!
//! The solver updates cell pressures and bottom-hole pressures in place and,
//! after convergence, fills the derived face fluxes and well rates.

use crate::error::{PressureError, Result};
use crate::grid::Grid;
use crate::props::PropertyEvaluator;
use crate::wells::{WellControl, Wells};

/// Cell and face state.
#[derive(Debug, Clone)]
pub struct State {
    num_phases: usize,
    /// Cell pressures (`N`)
    pub pressure: Vec<f64>,
    /// Face pressures (`F`), only read on boundary faces
    pub face_pressure: Vec<f64>,
    /// Phase saturations (`N * np`)
    pub saturation: Vec<f64>,
    /// Surface volumes per component (`N * np`)
    pub surfacevol: Vec<f64>,
    /// Total volumetric flux per face from its first to its second side (`F`)
    pub face_flux: Vec<f64>,
}

impl State {
    /// Uniform pressure and saturation on `grid`.
    ///
    /// Surface volumes start at zero; see [`State::init_surfacevol`].
    pub fn uniform(grid: &Grid, pressure: f64, saturation: &[f64]) -> Self {
        let nc = grid.number_of_cells;
        Self {
            num_phases: saturation.len(),
            pressure: vec![pressure; nc],
            face_pressure: vec![pressure; grid.number_of_faces],
            saturation: saturation.repeat(nc),
            surfacevol: vec![0.0; nc * saturation.len()],
            face_flux: vec![0.0; grid.number_of_faces],
        }
    }

    /// Number of phases the state was created with.
    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Set surface volumes consistent with pressure and saturation, `z = A s`.
    pub fn init_surfacevol(&mut self, props: &dyn PropertyEvaluator) -> Result<()> {
        let np = self.num_phases;
        let mut a = vec![0.0; np * np];
        for c in 0..self.pressure.len() {
            let z = &mut self.surfacevol[c * np..(c + 1) * np];
            props.matrix(c, self.pressure[c], z, &mut a, None)?;
            let s = &self.saturation[c * np..(c + 1) * np];
            for (i, zi) in z.iter_mut().enumerate() {
                *zi = (0..np).map(|p| a[i + np * p] * s[p]).sum();
            }
        }
        Ok(())
    }

    /// Check array lengths against a grid and phase count.
    pub fn validate(&self, grid: &Grid, num_phases: usize) -> Result<()> {
        let nc = grid.number_of_cells;
        let nf = grid.number_of_faces;
        let lengths = [
            ("pressure", self.pressure.len(), nc),
            ("face_pressure", self.face_pressure.len(), nf),
            ("saturation", self.saturation.len(), nc * num_phases),
            ("surfacevol", self.surfacevol.len(), nc * num_phases),
            ("face_flux", self.face_flux.len(), nf),
        ];
        for (name, actual, expected) in lengths {
            if actual != expected {
                return Err(PressureError::invalid_state(format!(
                    "{name} has length {actual}, expected {expected}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-well state.
#[derive(Debug, Clone, Default)]
pub struct WellState {
    /// Bottom-hole pressures (`W`)
    pub bhp: Vec<f64>,
    /// Phase rates at reservoir conditions (`W * np`), positive for injection
    pub rates: Vec<f64>,
    /// Active controls (`W`); may be changed between solves
    pub controls: Vec<WellControl>,
}

impl WellState {
    /// State for `wells` with uniform bottom-hole pressure and the wells' initial controls.
    pub fn new(wells: &Wells, bhp: f64) -> Self {
        let nw = wells.number_of_wells();
        Self {
            bhp: vec![bhp; nw],
            rates: vec![0.0; nw * wells.number_of_phases()],
            controls: wells.initial_controls(),
        }
    }

    /// Check array lengths against `wells` (or against no wells).
    pub fn validate(&self, wells: Option<&Wells>) -> Result<()> {
        let (nw, np) = wells.map_or((0, 0), |w| (w.number_of_wells(), w.number_of_phases()));
        if self.bhp.len() != nw || self.controls.len() != nw {
            return Err(PressureError::invalid_state(format!(
                "well state has {} pressures and {} controls, expected {nw}",
                self.bhp.len(),
                self.controls.len()
            )));
        }
        if self.rates.len() != nw * np {
            return Err(PressureError::invalid_state(format!(
                "rates has length {}, expected {}",
                self.rates.len(),
                nw * np
            )));
        }
        for control in &self.controls {
            control.validate(np)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{CompressibleFluid, PhaseProps, Rock};
    use approx::assert_relative_eq;

    #[test]
    fn test_init_surfacevol() {
        let g = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let fluid = CompressibleFluid::new(
            Rock::uniform(&g, 0.2, 1.0),
            vec![
                PhaseProps::new(1000.0, 1.0).with_reference_factor(2.0),
                PhaseProps::new(800.0, 1.0),
            ],
        )
        .unwrap();
        let mut state = State::uniform(&g, 10.0, &[0.25, 0.75]);
        state.init_surfacevol(&fluid).unwrap();
        assert_relative_eq!(state.surfacevol[0], 0.5);
        assert_relative_eq!(state.surfacevol[1], 0.75);
        assert_relative_eq!(state.surfacevol[2], 0.5);
        assert!(state.validate(&g, 2).is_ok());
        assert!(state.validate(&g, 3).is_err());
    }

    #[test]
    fn test_well_state_validation() {
        let mut wells = Wells::new(1);
        wells
            .add_producer("P", 0.0, &[0], &[1.0], WellControl::Bhp(5.0))
            .unwrap();
        let ws = WellState::new(&wells, 7.0);
        assert_eq!(ws.bhp, vec![7.0]);
        assert_eq!(ws.controls, vec![WellControl::Bhp(5.0)]);
        assert!(ws.validate(Some(&wells)).is_ok());
        assert!(ws.validate(None).is_err());
        assert!(WellState::default().validate(None).is_ok());
    }
}
