//! Static TPFA geometry: transmissibilities and pore volumes.
//!
//! For a cell `c` and one of its faces `f` the half-transmissibility is
//!
//! ```text
//! ht(c, f) = |(x_f - x_c) . K_c n_f| / |x_f - x_c|^2
//! ```
//!
//! with `n_f` the area-weighted face normal and `K_c` the permeability
//! tensor. The face transmissibility is the harmonic combination
//! `T_f = 1 / sum(1 / ht)` over the cells adjacent to `f`.

use log::debug;

use crate::error::{PressureError, Result};

use super::{validate_grid, Grid};

/// Geometry-derived quantities computed once per solver.
#[derive(Debug, Clone)]
pub struct StaticGeometry {
    /// Half-transmissibilities, indexed like `Grid::cell_faces`
    pub htrans: Vec<f64>,
    /// Face transmissibilities (`F`)
    pub trans: Vec<f64>,
    /// Pore volumes (`N`)
    pub porevol: Vec<f64>,
}

impl StaticGeometry {
    /// Validate the grid and compute all static quantities.
    ///
    /// `permeability` holds one row-major `D x D` tensor per cell.
    pub fn compute(grid: &Grid, permeability: &[f64], porosity: &[f64]) -> Result<Self> {
        validate_grid(grid)?;
        let htrans = half_transmissibilities(grid, permeability)?;
        let trans = transmissibilities(grid, &htrans);
        let porevol = pore_volumes(grid, porosity)?;
        debug!(
            "static geometry: {} cells, {} faces, total pore volume {:.6e}",
            grid.number_of_cells,
            grid.number_of_faces,
            porevol.iter().sum::<f64>()
        );
        Ok(Self {
            htrans,
            trans,
            porevol,
        })
    }
}

/// Compute one half-transmissibility per cell-face incidence.
pub fn half_transmissibilities(grid: &Grid, permeability: &[f64]) -> Result<Vec<f64>> {
    let d = grid.dimensions;
    if permeability.len() != grid.number_of_cells * d * d {
        return Err(PressureError::invalid_parameter(format!(
            "permeability has length {}, expected {}",
            permeability.len(),
            grid.number_of_cells * d * d
        )));
    }

    let mut htrans = vec![0.0; grid.cell_faces.len()];
    let mut cf = vec![0.0; d];
    for c in 0..grid.number_of_cells {
        let k = &permeability[c * d * d..(c + 1) * d * d];
        let xc = grid.cell_centroid(c);
        for i in grid.cell_facepos[c]..grid.cell_facepos[c + 1] {
            let f = grid.cell_faces[i];
            let xf = grid.face_centroid(f);
            let n = grid.face_normal(f);

            for (dst, (a, b)) in cf.iter_mut().zip(xf.iter().zip(xc)) {
                *dst = a - b;
            }
            let dist2: f64 = cf.iter().map(|x| x * x).sum();
            if !(dist2 > 0.0) {
                return Err(PressureError::invalid_grid(format!(
                    "Face {f} centroid coincides with centroid of cell {c}"
                )));
            }

            let mut cn = 0.0;
            for row in 0..d {
                let kn: f64 = (0..d).map(|col| k[row * d + col] * n[col]).sum();
                cn += cf[row] * kn;
            }
            htrans[i] = cn.abs() / dist2;
        }
    }
    Ok(htrans)
}

/// Combine half-transmissibilities into face transmissibilities.
///
/// A boundary face keeps the half-transmissibility of its only cell.
pub fn transmissibilities(grid: &Grid, htrans: &[f64]) -> Vec<f64> {
    let mut resistance = vec![0.0; grid.number_of_faces];
    for (&f, &ht) in grid.cell_faces.iter().zip(htrans) {
        resistance[f] += 1.0 / ht;
    }
    resistance
        .into_iter()
        .map(|r| if r > 0.0 { 1.0 / r } else { 0.0 })
        .collect()
}

/// Pore volume per cell, porosity times cell volume.
pub fn pore_volumes(grid: &Grid, porosity: &[f64]) -> Result<Vec<f64>> {
    if porosity.len() != grid.number_of_cells {
        return Err(PressureError::invalid_parameter(format!(
            "porosity has length {}, expected {}",
            porosity.len(),
            grid.number_of_cells
        )));
    }
    Ok(porosity
        .iter()
        .zip(&grid.cell_volumes)
        .map(|(phi, v)| phi * v)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn isotropic(grid: &Grid, k: f64) -> Vec<f64> {
        let d = grid.dimensions;
        let mut perm = vec![0.0; grid.number_of_cells * d * d];
        for c in 0..grid.number_of_cells {
            for i in 0..d {
                perm[c * d * d + i * d + i] = k;
            }
        }
        perm
    }

    #[test]
    fn test_half_transmissibility_cartesian() {
        let g = Grid::cartesian([2, 1, 1], [2.0, 3.0, 4.0]).unwrap();
        let ht = half_transmissibilities(&g, &isotropic(&g, 5.0)).unwrap();
        // x-faces: area 12, half distance 1 => k * A / (dx / 2)
        assert_relative_eq!(ht[0], 5.0 * 12.0 / 1.0);
        assert_relative_eq!(ht[1], 60.0);
        // y-faces: area 8, half distance 1.5
        assert_relative_eq!(ht[2], 5.0 * 8.0 / 1.5);
        // z-faces: area 6, half distance 2
        assert_relative_eq!(ht[4], 5.0 * 6.0 / 2.0);
    }

    #[test]
    fn test_transmissibility_harmonic() {
        let g = Grid::cartesian([2, 1, 1], [2.0, 1.0, 1.0]).unwrap();
        let mut perm = isotropic(&g, 1.0);
        // Second cell twice as permeable.
        for i in 0..3 {
            perm[9 + i * 3 + i] = 2.0;
        }
        let ht = half_transmissibilities(&g, &perm).unwrap();
        let t = transmissibilities(&g, &ht);
        // Interior face 1: ht = 1 and 2 => harmonic 2/3.
        assert_relative_eq!(t[1], 2.0 / 3.0, epsilon = 1e-14);
        // Boundary face 0 keeps the half-transmissibility of cell 0.
        assert_relative_eq!(t[0], 1.0);
        assert_relative_eq!(t[2], 2.0);
    }

    #[test]
    fn test_pore_volume() {
        let g = Grid::cartesian([2, 1, 1], [1.0, 2.0, 3.0]).unwrap();
        let pv = pore_volumes(&g, &[0.25, 0.5]).unwrap();
        assert_relative_eq!(pv[0], 1.5);
        assert_relative_eq!(pv[1], 3.0);
        assert!(pore_volumes(&g, &[0.1]).is_err());
    }

    #[test]
    fn test_static_geometry_validates_grid() {
        let mut g = Grid::cartesian([1, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let perm = isotropic(&g, 1.0);
        g.cell_faces[0] = 99;
        assert!(StaticGeometry::compute(&g, &perm, &[0.2]).is_err());
    }
}
