//! Unstructured grid topology and geometry.

use crate::error::{PressureError, Result};

use super::Sides;

/// An unstructured finite-volume grid.
///
/// Below `N` is the number of cells, `F` the number of faces and `D` the
/// number of spatial dimensions. The last coordinate axis is the vertical
/// one; depth is measured along it.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Spatial dimension `D`
    pub dimensions: usize,
    /// Number of cells `N`
    pub number_of_cells: usize,
    /// Number of faces `F`
    pub number_of_faces: usize,
    /// Adjacent cells per face (`None` on the domain boundary)
    pub face_cells: Vec<Sides<Option<usize>>>,
    /// Face areas (`F`)
    pub face_areas: Vec<f64>,
    /// Area-weighted face normals, oriented from the first to the second side (`F * D`)
    pub face_normals: Vec<f64>,
    /// Face centroids (`F * D`)
    pub face_centroids: Vec<f64>,
    /// Cell centroids (`N * D`)
    pub cell_centroids: Vec<f64>,
    /// Cell volumes (`N`)
    pub cell_volumes: Vec<f64>,
    /// Offsets into `cell_faces` (`N + 1`)
    pub cell_facepos: Vec<usize>,
    /// Flattened cell-to-face incidence
    pub cell_faces: Vec<usize>,
}

impl Grid {
    /// Build a 3D Cartesian box of `nx * ny * nz` cells with sizes `dx, dy, dz`.
    ///
    /// Cells are numbered `i + nx * (j + ny * k)`. Faces are numbered with all
    /// x-faces first, then y-faces, then z-faces. Each cell lists its faces in
    /// the order x-low, x-high, y-low, y-high, z-low, z-high.
    pub fn cartesian(dims: [usize; 3], sizes: [f64; 3]) -> Result<Self> {
        let [nx, ny, nz] = dims;
        let [dx, dy, dz] = sizes;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(PressureError::invalid_grid(format!(
                "Cartesian dimensions must be positive, got {nx}x{ny}x{nz}"
            )));
        }
        if sizes.iter().any(|&h| !(h > 0.0)) {
            return Err(PressureError::invalid_grid(format!(
                "Cartesian cell sizes must be positive, got {dx}x{dy}x{dz}"
            )));
        }

        let number_of_cells = nx * ny * nz;
        let nxf = (nx + 1) * ny * nz;
        let nyf = nx * (ny + 1) * nz;
        let nzf = nx * ny * (nz + 1);
        let number_of_faces = nxf + nyf + nzf;

        let cell = |i: usize, j: usize, k: usize| i + nx * (j + ny * k);
        let xface = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + ny * k);
        let yface = |i: usize, j: usize, k: usize| nxf + i + nx * (j + (ny + 1) * k);
        let zface = |i: usize, j: usize, k: usize| nxf + nyf + i + nx * (j + ny * k);

        let mut face_cells = Vec::with_capacity(number_of_faces);
        let mut face_areas = Vec::with_capacity(number_of_faces);
        let mut face_normals = Vec::with_capacity(3 * number_of_faces);
        let mut face_centroids = Vec::with_capacity(3 * number_of_faces);

        // Neighbours along one axis: `lo` exists unless at the start, `hi`
        // unless at the end.
        let pair = |idx: usize, n: usize, lo: usize, hi: usize| {
            Sides::new((idx > 0).then_some(lo), (idx < n).then_some(hi))
        };

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..=nx {
                    let lo = if i > 0 { cell(i - 1, j, k) } else { 0 };
                    let hi = if i < nx { cell(i, j, k) } else { 0 };
                    face_cells.push(pair(i, nx, lo, hi));
                    face_areas.push(dy * dz);
                    face_normals.extend_from_slice(&[dy * dz, 0.0, 0.0]);
                    face_centroids.extend_from_slice(&[
                        i as f64 * dx,
                        (j as f64 + 0.5) * dy,
                        (k as f64 + 0.5) * dz,
                    ]);
                }
            }
        }
        for k in 0..nz {
            for j in 0..=ny {
                for i in 0..nx {
                    let lo = if j > 0 { cell(i, j - 1, k) } else { 0 };
                    let hi = if j < ny { cell(i, j, k) } else { 0 };
                    face_cells.push(pair(j, ny, lo, hi));
                    face_areas.push(dx * dz);
                    face_normals.extend_from_slice(&[0.0, dx * dz, 0.0]);
                    face_centroids.extend_from_slice(&[
                        (i as f64 + 0.5) * dx,
                        j as f64 * dy,
                        (k as f64 + 0.5) * dz,
                    ]);
                }
            }
        }
        for k in 0..=nz {
            for j in 0..ny {
                for i in 0..nx {
                    let lo = if k > 0 { cell(i, j, k - 1) } else { 0 };
                    let hi = if k < nz { cell(i, j, k) } else { 0 };
                    face_cells.push(pair(k, nz, lo, hi));
                    face_areas.push(dx * dy);
                    face_normals.extend_from_slice(&[0.0, 0.0, dx * dy]);
                    face_centroids.extend_from_slice(&[
                        (i as f64 + 0.5) * dx,
                        (j as f64 + 0.5) * dy,
                        k as f64 * dz,
                    ]);
                }
            }
        }

        let mut cell_centroids = Vec::with_capacity(3 * number_of_cells);
        let mut cell_facepos = Vec::with_capacity(number_of_cells + 1);
        let mut cell_faces = Vec::with_capacity(6 * number_of_cells);
        cell_facepos.push(0);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    cell_centroids.extend_from_slice(&[
                        (i as f64 + 0.5) * dx,
                        (j as f64 + 0.5) * dy,
                        (k as f64 + 0.5) * dz,
                    ]);
                    cell_faces.extend_from_slice(&[
                        xface(i, j, k),
                        xface(i + 1, j, k),
                        yface(i, j, k),
                        yface(i, j + 1, k),
                        zface(i, j, k),
                        zface(i, j, k + 1),
                    ]);
                    cell_facepos.push(cell_faces.len());
                }
            }
        }

        Ok(Self {
            dimensions: 3,
            number_of_cells,
            number_of_faces,
            face_cells,
            face_areas,
            face_normals,
            face_centroids,
            cell_centroids,
            cell_volumes: vec![dx * dy * dz; number_of_cells],
            cell_facepos,
            cell_faces,
        })
    }

    /// Faces of cell `c`.
    pub fn faces_of_cell(&self, c: usize) -> &[usize] {
        &self.cell_faces[self.cell_facepos[c]..self.cell_facepos[c + 1]]
    }

    /// Centroid of cell `c`.
    pub fn cell_centroid(&self, c: usize) -> &[f64] {
        let d = self.dimensions;
        &self.cell_centroids[c * d..(c + 1) * d]
    }

    /// Centroid of face `f`.
    pub fn face_centroid(&self, f: usize) -> &[f64] {
        let d = self.dimensions;
        &self.face_centroids[f * d..(f + 1) * d]
    }

    /// Area-weighted normal of face `f`.
    pub fn face_normal(&self, f: usize) -> &[f64] {
        let d = self.dimensions;
        &self.face_normals[f * d..(f + 1) * d]
    }

    /// Depth of the centroid of cell `c`.
    pub fn cell_depth(&self, c: usize) -> f64 {
        self.cell_centroids[c * self.dimensions + self.dimensions - 1]
    }

    /// Depth of the centroid of face `f`.
    pub fn face_depth(&self, f: usize) -> f64 {
        self.face_centroids[f * self.dimensions + self.dimensions - 1]
    }

    /// Boundary faces, in face order.
    pub fn boundary_faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.face_cells
            .iter()
            .enumerate()
            .filter(|(_, cells)| cells.is_boundary())
            .map(|(f, _)| f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Side;

    #[test]
    fn test_cartesian_counts() {
        let g = Grid::cartesian([3, 2, 1], [1.0, 2.0, 3.0]).unwrap();
        assert_eq!(g.number_of_cells, 6);
        assert_eq!(g.number_of_faces, 4 * 2 + 3 * 3 + 3 * 2 * 2);
        assert_eq!(g.cell_faces.len(), 36);
        assert_eq!(g.cell_volumes[0], 6.0);
        assert_eq!(g.boundary_faces().count(), 2 * 2 + 2 * 3 + 2 * 6);
    }

    #[test]
    fn test_cartesian_adjacency() {
        let g = Grid::cartesian([2, 1, 2], [1.0, 1.0, 1.0]).unwrap();
        // First x-face sits on the west boundary of cell 0.
        assert_eq!(g.face_cells[0], Sides::new(None, Some(0)));
        // Interior x-face between cells 0 and 1.
        assert_eq!(g.face_cells[1], Sides::new(Some(0), Some(1)));
        // Every incidence is consistent with the face's adjacent cells.
        for c in 0..g.number_of_cells {
            for &f in g.faces_of_cell(c) {
                assert!(g.face_cells[f].side_of(c).is_some());
            }
        }
        // Vertical neighbour: the z-high face of cell 0 has cell 2 below it.
        let zhi = g.faces_of_cell(0)[5];
        assert_eq!(g.face_cells[zhi][Side::Second], Some(2));
        assert_eq!(g.cell_depth(2), 1.5);
        assert_eq!(g.face_depth(zhi), 1.0);
    }

    #[test]
    fn test_cartesian_rejects_empty() {
        assert!(Grid::cartesian([0, 1, 1], [1.0, 1.0, 1.0]).is_err());
        assert!(Grid::cartesian([1, 1, 1], [1.0, -1.0, 1.0]).is_err());
    }
}
