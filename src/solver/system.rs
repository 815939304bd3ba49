//! Residual vector and sparse Jacobian of the pressure system.

use sprs::{CsMat, TriMat};

use crate::grid::Grid;
use crate::wells::Wells;

/// Residual vector and Jacobian of the pressure system.
///
/// Rows and columns are ordered cells first (grid order), then wells (well
/// order). The CSR sparsity pattern is built once from the grid and the well
/// topology; assembly only writes into existing entries.
#[derive(Debug, Clone)]
pub struct ResidualSystem {
    /// Jacobian `J`
    pub jacobian: CsMat<f64>,
    /// Residual `F`
    pub residual: Vec<f64>,
    /// Per-cell `e^T A^{-1}` (`N * np`)
    pub(super) weights: Vec<f64>,
    /// Per-cell pressure derivative of `weights` (`N * np`)
    pub(super) dweights: Vec<f64>,
}

impl ResidualSystem {
    /// Allocate the system for `grid` and optional `wells`.
    pub fn new(grid: &Grid, wells: Option<&Wells>) -> Self {
        let nc = grid.number_of_cells;
        let nw = wells.map_or(0, Wells::number_of_wells);
        let n = nc + nw;

        // Explicit zeros fix the pattern; duplicates are merged by `to_csr`.
        let mut pattern = TriMat::new((n, n));
        for i in 0..n {
            pattern.add_triplet(i, i, 0.0);
        }
        for cells in &grid.face_cells {
            if let Some((c0, c1)) = cells.interior() {
                pattern.add_triplet(c0, c1, 0.0);
                pattern.add_triplet(c1, c0, 0.0);
            }
        }
        if let Some(wells) = wells {
            for w in 0..nw {
                for j in wells.perforations(w) {
                    let c = wells.perforation_cell(j);
                    pattern.add_triplet(c, nc + w, 0.0);
                    pattern.add_triplet(nc + w, c, 0.0);
                }
            }
        }

        Self {
            jacobian: pattern.to_csr(),
            residual: vec![0.0; n],
            weights: Vec::new(),
            dweights: Vec::new(),
        }
    }

    /// Number of unknowns, cells plus wells.
    pub fn num_dofs(&self) -> usize {
        self.residual.len()
    }

    /// Zero residual and Jacobian, keeping the pattern.
    pub fn clear(&mut self) {
        self.jacobian.data_mut().fill(0.0);
        self.residual.fill(0.0);
    }

    /// Add to Jacobian entry `(row, col)`, which must be part of the pattern.
    pub(super) fn add_jacobian(&mut self, row: usize, col: usize, value: f64) {
        match self.jacobian.get_mut(row, col) {
            Some(entry) => *entry += value,
            None => debug_assert!(false, "entry ({row}, {col}) outside sparsity pattern"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wells::WellControl;

    fn columns(system: &ResidualSystem, row: usize) -> Vec<usize> {
        system
            .jacobian
            .outer_view(row)
            .map(|v| v.indices().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_system_pattern_couples_wells() {
        let grid = Grid::cartesian([3, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let mut wells = Wells::new(1);
        wells
            .add_producer("P", 0.0, &[0, 2], &[1.0, 1.0], WellControl::Bhp(1.0))
            .unwrap();
        let system = ResidualSystem::new(&grid, Some(&wells));
        assert_eq!(system.num_dofs(), 4);
        assert_eq!(system.jacobian.nnz(), 12);
        assert_eq!(columns(&system, 3), vec![0, 2, 3]);
        assert_eq!(columns(&system, 1), vec![0, 1, 2]);
        assert_eq!(columns(&system, 0), vec![0, 1, 3]);
    }

    #[test]
    fn test_add_accumulates_and_clear_keeps_pattern() {
        let grid = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let mut system = ResidualSystem::new(&grid, None);
        system.add_jacobian(0, 1, 2.0);
        system.add_jacobian(0, 1, 0.5);
        system.residual[1] = 3.0;
        assert_eq!(system.jacobian.get(0, 1), Some(&2.5));
        assert_eq!(system.jacobian.nnz(), 4);

        system.clear();
        assert_eq!(system.jacobian.get(0, 1), Some(&0.0));
        assert_eq!(system.jacobian.nnz(), 4);
        assert_eq!(system.residual, vec![0.0, 0.0]);
    }
}
