//! A compressible fluid with diagonal composition matrix.
//!
//! Each phase is its own surface component with an exponential inverse
//! formation-volume factor:
//!
//! ```text
//! b_p(p)  = b_ref * exp(c_p * (p - p_ref))
//! A       = diag(b_1, ..., b_np)
//! dA/dp   = diag(c_1 * b_1, ..., c_np * b_np)
//! rho_p   = sum_i rho_surf_i * A(i, p)
//! kr_p(s) = s_p ^ n_p   (Corey)
//! ```

use crate::error::{PressureError, Result};

use super::{PropertyEvaluator, Rock};

/// Properties of one phase.
#[derive(Debug, Clone)]
pub struct PhaseProps {
    /// Density at surface conditions
    pub surface_density: f64,
    /// Viscosity (constant)
    pub viscosity: f64,
    /// Inverse formation-volume factor at the reference pressure
    pub b_ref: f64,
    /// Compressibility `c` in `b = b_ref * exp(c * (p - p_ref))`
    pub compressibility: f64,
    /// Reference pressure
    pub reference_pressure: f64,
    /// Corey exponent of the relative permeability
    pub corey_exponent: f64,
}

impl PhaseProps {
    /// An incompressible phase with linear relative permeability.
    pub fn new(surface_density: f64, viscosity: f64) -> Self {
        Self {
            surface_density,
            viscosity,
            b_ref: 1.0,
            compressibility: 0.0,
            reference_pressure: 0.0,
            corey_exponent: 1.0,
        }
    }

    /// Set the compressibility and its reference pressure.
    pub fn with_compressibility(mut self, compressibility: f64, reference_pressure: f64) -> Self {
        self.compressibility = compressibility;
        self.reference_pressure = reference_pressure;
        self
    }

    /// Set the inverse formation-volume factor at the reference pressure.
    pub fn with_reference_factor(mut self, b_ref: f64) -> Self {
        self.b_ref = b_ref;
        self
    }

    /// Set the Corey exponent.
    pub fn with_corey_exponent(mut self, n: f64) -> Self {
        self.corey_exponent = n;
        self
    }

    /// Inverse formation-volume factor at pressure `p`.
    pub fn b(&self, p: f64) -> f64 {
        self.b_ref * (self.compressibility * (p - self.reference_pressure)).exp()
    }
}

/// Rock plus a set of independently compressible phases.
#[derive(Debug, Clone)]
pub struct CompressibleFluid {
    rock: Rock,
    phases: Vec<PhaseProps>,
}

impl CompressibleFluid {
    /// Create a fluid description.
    pub fn new(rock: Rock, phases: Vec<PhaseProps>) -> Result<Self> {
        if phases.is_empty() {
            return Err(PressureError::invalid_parameter("fluid needs at least one phase"));
        }
        if let Some(p) = phases
            .iter()
            .position(|p| !(p.viscosity > 0.0) || !(p.b_ref > 0.0))
        {
            return Err(PressureError::invalid_parameter(format!(
                "phase {p} needs positive viscosity and b_ref"
            )));
        }
        Ok(Self { rock, phases })
    }

    fn check_pressure(cell: usize, p: f64) -> Result<()> {
        if p.is_finite() {
            Ok(())
        } else {
            Err(PressureError::property(cell, format!("non-finite pressure {p}")))
        }
    }
}

impl PropertyEvaluator for CompressibleFluid {
    fn num_phases(&self) -> usize {
        self.phases.len()
    }

    fn porosity(&self) -> &[f64] {
        &self.rock.porosity
    }

    fn permeability(&self) -> &[f64] {
        &self.rock.permeability
    }

    fn matrix(
        &self,
        cell: usize,
        p: f64,
        _z: &[f64],
        a: &mut [f64],
        da: Option<&mut [f64]>,
    ) -> Result<()> {
        Self::check_pressure(cell, p)?;
        let np = self.phases.len();
        a.fill(0.0);
        for (i, phase) in self.phases.iter().enumerate() {
            a[i + np * i] = phase.b(p);
        }
        if let Some(da) = da {
            da.fill(0.0);
            for (i, phase) in self.phases.iter().enumerate() {
                da[i + np * i] = phase.compressibility * a[i + np * i];
            }
        }
        Ok(())
    }

    fn viscosity(&self, cell: usize, p: f64, _z: &[f64], mu: &mut [f64]) -> Result<()> {
        Self::check_pressure(cell, p)?;
        for (dst, phase) in mu.iter_mut().zip(&self.phases) {
            *dst = phase.viscosity;
        }
        Ok(())
    }

    fn relperm(&self, cell: usize, s: &[f64], kr: &mut [f64]) -> Result<()> {
        for ((dst, &sat), phase) in kr.iter_mut().zip(s).zip(&self.phases) {
            if !sat.is_finite() {
                return Err(PressureError::property(cell, format!("non-finite saturation {sat}")));
            }
            *dst = sat.clamp(0.0, 1.0).powf(phase.corey_exponent);
        }
        Ok(())
    }

    fn density(&self, a: &[f64], rho: &mut [f64]) -> Result<()> {
        let np = self.phases.len();
        for (p, dst) in rho.iter_mut().enumerate() {
            *dst = self
                .phases
                .iter()
                .enumerate()
                .map(|(i, comp)| comp.surface_density * a[i + np * p])
                .sum();
        }
        Ok(())
    }
}
