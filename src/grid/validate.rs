//! Grid validation.

use crate::error::{PressureError, Result};

use super::Grid;

/// Validate a grid for use by the pressure solver.
///
/// Checks:
/// - Array lengths agree with the cell, face and dimension counts
/// - Every face has at least one adjacent cell, and all indices are in range
/// - The cell-to-face incidence is consistent with the face-to-cell adjacency
/// - Cell volumes are positive
pub fn validate_grid(grid: &Grid) -> Result<()> {
    let nc = grid.number_of_cells;
    let nf = grid.number_of_faces;
    let d = grid.dimensions;

    if d == 0 {
        return Err(PressureError::invalid_grid("Grid has zero dimensions"));
    }

    let lengths = [
        ("face_cells", grid.face_cells.len(), nf),
        ("face_areas", grid.face_areas.len(), nf),
        ("face_normals", grid.face_normals.len(), nf * d),
        ("face_centroids", grid.face_centroids.len(), nf * d),
        ("cell_centroids", grid.cell_centroids.len(), nc * d),
        ("cell_volumes", grid.cell_volumes.len(), nc),
        ("cell_facepos", grid.cell_facepos.len(), nc + 1),
    ];
    for (name, actual, expected) in lengths {
        if actual != expected {
            return Err(PressureError::invalid_grid(format!(
                "{name} has length {actual}, expected {expected}"
            )));
        }
    }

    if grid.cell_facepos[0] != 0 || grid.cell_facepos[nc] != grid.cell_faces.len() {
        return Err(PressureError::invalid_grid(
            "cell_facepos does not span cell_faces",
        ));
    }
    if grid.cell_facepos.windows(2).any(|w| w[0] > w[1]) {
        return Err(PressureError::invalid_grid("cell_facepos is not monotone"));
    }

    for (f, cells) in grid.face_cells.iter().enumerate() {
        if cells.0.iter().all(Option::is_none) {
            return Err(PressureError::invalid_grid(format!(
                "Face {f} has no adjacent cell"
            )));
        }
        if let Some(c) = cells.0.iter().flatten().find(|&&c| c >= nc) {
            return Err(PressureError::invalid_grid(format!(
                "Face {f} refers to cell {c}, grid has {nc} cells"
            )));
        }
    }

    for c in 0..nc {
        if !(grid.cell_volumes[c] > 0.0) {
            return Err(PressureError::invalid_grid(format!(
                "Cell {c} has non-positive volume {}",
                grid.cell_volumes[c]
            )));
        }
        for &f in grid.faces_of_cell(c) {
            if f >= nf {
                return Err(PressureError::invalid_grid(format!(
                    "Cell {c} refers to face {f}, grid has {nf} faces"
                )));
            }
            if grid.face_cells[f].side_of(c).is_none() {
                return Err(PressureError::invalid_grid(format!(
                    "Cell {c} lists face {f}, which is not adjacent to it"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Sides;

    #[test]
    fn test_cartesian_grid_is_valid() {
        let g = Grid::cartesian([3, 2, 2], [1.0, 1.0, 1.0]).unwrap();
        assert!(validate_grid(&g).is_ok());
    }

    #[test]
    fn test_detects_orphan_face() {
        let mut g = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        g.face_cells[0] = Sides::new(None, None);
        assert!(matches!(
            validate_grid(&g),
            Err(PressureError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_detects_inconsistent_incidence() {
        let mut g = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        // Face 0 is the west face of cell 0 only.
        g.cell_faces[6] = 0;
        assert!(validate_grid(&g).is_err());
    }

    #[test]
    fn test_detects_bad_lengths() {
        let mut g = Grid::cartesian([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        g.cell_volumes.pop();
        assert!(validate_grid(&g).is_err());
    }
}
