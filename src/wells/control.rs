//! Well control modes.

use crate::error::{PressureError, Result};

/// How a well is operated during a solve.
#[derive(Debug, Clone, PartialEq)]
pub enum WellControl {
    /// Prescribed bottom-hole pressure
    Bhp(f64),
    /// Prescribed total rate at reservoir conditions
    ReservoirRate(f64),
    /// Prescribed weighted sum of component rates at surface conditions
    SurfaceRate { target: f64, distr: Vec<f64> },
}

impl WellControl {
    /// Target value of the control.
    pub fn target(&self) -> f64 {
        match self {
            WellControl::Bhp(target) | WellControl::ReservoirRate(target) => *target,
            WellControl::SurfaceRate { target, .. } => *target,
        }
    }

    /// Check the control against the number of phases.
    pub fn validate(&self, num_phases: usize) -> Result<()> {
        if !self.target().is_finite() {
            return Err(PressureError::invalid_parameter("well control target is not finite"));
        }
        if let WellControl::SurfaceRate { distr, .. } = self {
            if distr.len() != num_phases {
                return Err(PressureError::invalid_parameter(format!(
                    "surface rate distribution has length {}, expected {}",
                    distr.len(),
                    num_phases
                )));
            }
        }
        Ok(())
    }
}
