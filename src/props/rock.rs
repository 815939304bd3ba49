//! Rock properties.

use crate::error::{PressureError, Result};
use crate::grid::Grid;

/// Porosity and permeability fields.
#[derive(Debug, Clone)]
pub struct Rock {
    /// Spatial dimension of the permeability tensors
    pub dimensions: usize,
    /// Porosity per cell
    pub porosity: Vec<f64>,
    /// Row-major `D x D` permeability tensor per cell
    pub permeability: Vec<f64>,
}

impl Rock {
    /// Uniform, isotropic rock on `grid`.
    pub fn uniform(grid: &Grid, porosity: f64, permeability: f64) -> Self {
        let d = grid.dimensions;
        let mut tensor = vec![0.0; d * d];
        for i in 0..d {
            tensor[i * d + i] = permeability;
        }
        Self {
            dimensions: d,
            porosity: vec![porosity; grid.number_of_cells],
            permeability: tensor.repeat(grid.number_of_cells),
        }
    }

    /// Rock from explicit per-cell fields.
    pub fn new(dimensions: usize, porosity: Vec<f64>, permeability: Vec<f64>) -> Result<Self> {
        if permeability.len() != porosity.len() * dimensions * dimensions {
            return Err(PressureError::invalid_parameter(format!(
                "permeability has length {}, expected {} for {} cells in {}D",
                permeability.len(),
                porosity.len() * dimensions * dimensions,
                porosity.len(),
                dimensions
            )));
        }
        if let Some(phi) = porosity.iter().find(|&&phi| !(0.0..=1.0).contains(&phi)) {
            return Err(PressureError::invalid_parameter(format!(
                "porosity {phi} outside [0, 1]"
            )));
        }
        Ok(Self {
            dimensions,
            porosity,
            permeability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_rock() {
        let g = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let rock = Rock::uniform(&g, 0.3, 2.0);
        assert_eq!(rock.porosity, vec![0.3, 0.3]);
        assert_eq!(rock.permeability.len(), 18);
        assert_eq!(rock.permeability[9 + 4], 2.0);
        assert_eq!(rock.permeability[1], 0.0);
    }

    #[test]
    fn test_rock_rejects_bad_porosity() {
        assert!(Rock::new(1, vec![1.5], vec![1.0]).is_err());
        assert!(Rock::new(2, vec![0.2], vec![1.0]).is_err());
    }
}
