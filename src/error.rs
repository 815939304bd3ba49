//! Error types for the compressible pressure solver.
//!
//! This module provides a unified error type [`PressureError`] that covers
//! configuration mistakes detected at construction, malformed inputs, and
//! failures surfaced while running a Newton solve.

use thiserror::Error;

/// Result type alias using [`PressureError`].
pub type Result<T> = std::result::Result<T, PressureError>;

/// Unified error type for all solver operations.
#[derive(Error, Debug)]
pub enum PressureError {
    // ============ Configuration Errors ============
    /// Wells and fluid properties disagree on the number of phases
    #[error("Inconsistent number of phases specified (wells vs. props): {wells} != {props}")]
    InconsistentPhases { wells: usize, props: usize },

    /// Grid topology or geometry is malformed
    #[error("Invalid grid: {message}")]
    InvalidGrid { message: String },

    /// Solver or well parameter out of range
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Per-solve state arrays do not match the grid, wells or phase count
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    // ============ Collaborator Errors ============
    /// The property evaluator rejected its input
    #[error("Property evaluation failed in cell {cell}: {message}")]
    PropertyEvaluation { cell: usize, message: String },

    /// Matrix is singular and cannot be solved
    #[error("Singular matrix - pressure system is not uniquely solvable")]
    SingularMatrix,

    /// The linear solver failed for a reason other than singularity
    #[error("Linear solve failed: {message}")]
    LinearSolve { message: String },

    // ============ Newton Errors ============
    /// Newton-Raphson iteration did not converge
    #[error(
        "Newton-Raphson did not converge after {iterations} iterations \
         (residual: {residual:.2e}, change: {change:.2e})"
    )]
    ConvergenceFailure {
        iterations: usize,
        residual: f64,
        change: f64,
    },
}

impl PressureError {
    /// Create an invalid grid error
    pub fn invalid_grid(message: impl Into<String>) -> Self {
        Self::InvalidGrid {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a property evaluation error
    pub fn property(cell: usize, message: impl Into<String>) -> Self {
        Self::PropertyEvaluation {
            cell,
            message: message.into(),
        }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, residual: f64, change: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
            change,
        }
    }
}
