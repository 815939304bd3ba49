//! Newton-Raphson iteration control for the pressure system.

use super::{DEFAULT_CHANGE_TOLERANCE, DEFAULT_MAX_ITERATIONS, DEFAULT_RESIDUAL_TOLERANCE};

/// Convergence criteria for the Newton loop.
///
/// An iterate is accepted only when both the residual and the last
/// pressure change are within tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRaphson {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Residual inf-norm tolerance
    pub residual_tolerance: f64,
    /// Pressure-change inf-norm tolerance
    pub change_tolerance: f64,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
            change_tolerance: DEFAULT_CHANGE_TOLERANCE,
        }
    }
}

impl NewtonRaphson {
    /// Create a new Newton-Raphson controller.
    pub fn new(max_iterations: usize, residual_tolerance: f64, change_tolerance: f64) -> Self {
        Self {
            max_iterations,
            residual_tolerance,
            change_tolerance,
        }
    }

    /// Whether an iterate with these norms is accepted.
    pub fn converged(&self, residual_norm: f64, change_norm: f64) -> bool {
        residual_norm <= self.residual_tolerance && change_norm <= self.change_tolerance
    }

    /// Whether `iterations` has used up the iteration budget.
    pub fn exhausted(&self, iterations: usize) -> bool {
        iterations >= self.max_iterations
    }
}

/// Maximum absolute entry. NaN entries count as infinite so they never pass
/// a tolerance check.
pub fn inf_norm(values: &[f64]) -> f64 {
    values
        .iter()
        .map(|v| if v.is_nan() { f64::INFINITY } else { v.abs() })
        .fold(0.0, f64::max)
}

/// Add a Newton increment to the unknowns.
///
/// The first `pressure.len()` entries belong to cells, the rest to wells.
pub fn apply_increment(increment: &[f64], pressure: &mut [f64], bhp: &mut [f64]) {
    let (cells, wells) = increment.split_at(pressure.len());
    for (p, dp) in pressure.iter_mut().zip(cells) {
        *p += dp;
    }
    for (p, dp) in bhp.iter_mut().zip(wells) {
        *p += dp;
    }
}

/// Outcome of a converged solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Newton iterations performed
    pub iterations: usize,
    /// Residual inf-norm of the accepted iterate
    pub residual_norm: f64,
    /// Inf-norm of the last pressure increment
    pub change_norm: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_convergence_requires_both_criteria() {
        let newton = NewtonRaphson::new(10, 1e-6, 1e-3);
        assert!(newton.converged(1e-7, 1e-4));
        assert!(newton.converged(1e-6, 1e-3));
        assert!(!newton.converged(1e-5, 1e-4));
        assert!(!newton.converged(1e-7, 1e-2));
        assert!(!newton.converged(f64::NAN, 0.0));
    }

    #[test]
    fn test_exhausted() {
        let newton = NewtonRaphson::new(3, 1e-6, 1e-6);
        assert!(!newton.exhausted(2));
        assert!(newton.exhausted(3));
    }

    #[test]
    fn test_inf_norm() {
        assert_relative_eq!(inf_norm(&[1.0, -3.5, 2.0]), 3.5);
        assert_relative_eq!(inf_norm(&[]), 0.0);
        assert!(inf_norm(&[1.0, f64::NAN]).is_infinite());
    }

    #[test]
    fn test_apply_increment_splits_cells_and_wells() {
        let mut pressure = vec![100.0, 200.0, 300.0];
        let mut bhp = vec![50.0, 60.0];
        let increment = [1.0, -2.0, 3.0, -4.0, 5.0];
        apply_increment(&increment, &mut pressure, &mut bhp);
        assert_eq!(pressure, vec![101.0, 198.0, 303.0]);
        assert_eq!(bhp, vec![46.0, 65.0]);
    }
}
