//! Boundary conditions on grid faces.
//!
//! Boundary faces without a condition are closed (no flow).

use crate::error::{PressureError, Result};
use crate::grid::Grid;

/// Condition imposed on a boundary face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Prescribed pressure on the face
    Pressure(f64),
}

/// Sparse set of boundary conditions.
#[derive(Debug, Clone, Default)]
pub struct BoundaryConditions {
    conditions: Vec<(usize, BoundaryCondition)>,
}

impl BoundaryConditions {
    /// No conditions; every boundary face is closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prescribe the pressure on `face`.
    pub fn set_pressure(&mut self, face: usize, pressure: f64) -> &mut Self {
        self.conditions.retain(|&(f, _)| f != face);
        self.conditions.push((face, BoundaryCondition::Pressure(pressure)));
        self
    }

    /// Iterate over `(face, condition)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(usize, BoundaryCondition)> {
        self.conditions.iter()
    }

    /// Per-face prescribed pressures for `grid`, checking that every face is a boundary face.
    pub fn pressure_by_face(&self, grid: &Grid) -> Result<Vec<Option<f64>>> {
        let mut by_face = vec![None; grid.number_of_faces];
        for &(face, condition) in self.iter() {
            let is_boundary = grid
                .face_cells
                .get(face)
                .map_or(false, |cells| cells.is_boundary());
            if !is_boundary {
                return Err(PressureError::invalid_parameter(format!(
                    "boundary condition on face {face}, which is not a boundary face"
                )));
            }
            match condition {
                BoundaryCondition::Pressure(p) => by_face[face] = Some(p),
            }
        }
        Ok(by_face)
    }
}
