//! Linear solves for the Newton increment.

use sprs::CsMatView;

use crate::error::{PressureError, Result};

/// Pivots smaller than this, relative to the largest entry of their column,
/// are treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Solver for `J x = F`.
///
/// Implementations report a singular system as [`PressureError::SingularMatrix`]
/// and any other failure as [`PressureError::LinearSolve`]; the pressure solver
/// propagates both without retrying.
pub trait LinearSolver {
    /// Solve `jacobian * solution = rhs`.
    fn solve(
        &self,
        jacobian: CsMatView<'_, f64>,
        rhs: &[f64],
        solution: &mut [f64],
    ) -> Result<()>;
}

/// Direct solver: dense LU decomposition with partial pivoting.
///
/// Suitable for small and moderate systems.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenseLu;

impl LinearSolver for DenseLu {
    fn solve(
        &self,
        jacobian: CsMatView<'_, f64>,
        rhs: &[f64],
        solution: &mut [f64],
    ) -> Result<()> {
        let n = jacobian.rows();
        if jacobian.cols() != n || rhs.len() != n || solution.len() != n {
            return Err(PressureError::LinearSolve {
                message: format!(
                    "{}x{} system with right-hand side {} and solution {}",
                    n,
                    jacobian.cols(),
                    rhs.len(),
                    solution.len()
                ),
            });
        }
        let lu = LuFactors::factor(&to_dense(jacobian), n)?;
        lu.solve(rhs, solution)
    }
}

/// Dense row-major copy of a sparse matrix.
pub fn to_dense(matrix: CsMatView<'_, f64>) -> Vec<f64> {
    let ncols = matrix.cols();
    let mut dense = vec![0.0; matrix.rows() * ncols];
    for (&value, (row, col)) in matrix.iter() {
        dense[row * ncols + col] += value;
    }
    dense
}

/// LU factors of a dense row-major matrix.
#[derive(Debug, Clone)]
pub struct LuFactors {
    size: usize,
    /// Combined unit-lower and upper factors (row-major)
    lu: Vec<f64>,
    /// Row permutation: row `i` of the factors is row `pivots[i]` of the input
    pivots: Vec<usize>,
}

impl LuFactors {
    /// Factor the row-major `size x size` matrix `a`.
    pub fn factor(a: &[f64], size: usize) -> Result<Self> {
        let n = size;
        debug_assert_eq!(a.len(), n * n);
        let mut lu = a.to_vec();
        let mut pivots: Vec<usize> = (0..n).collect();

        let column_scale: Vec<f64> = (0..n)
            .map(|k| {
                a.iter()
                    .skip(k)
                    .step_by(n.max(1))
                    .fold(0.0, |m: f64, v| m.max(v.abs()))
            })
            .collect();

        for k in 0..n {
            let (pivot_row, pivot_abs) = (k..n)
                .map(|i| (i, lu[i * n + k].abs()))
                .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            if !(pivot_abs > PIVOT_TOLERANCE * column_scale[k]) || !pivot_abs.is_finite() {
                return Err(PressureError::SingularMatrix);
            }
            if pivot_row != k {
                pivots.swap(k, pivot_row);
                let (upper, lower) = lu.split_at_mut(pivot_row * n);
                upper[k * n..(k + 1) * n].swap_with_slice(&mut lower[..n]);
            }

            let (done, rest) = lu.split_at_mut((k + 1) * n);
            let pivot = &done[k * n..(k + 1) * n];
            for row in rest.chunks_exact_mut(n) {
                let factor = row[k] / pivot[k];
                row[k] = factor;
                for (x, p) in row[k + 1..].iter_mut().zip(&pivot[k + 1..]) {
                    *x -= factor * p;
                }
            }
        }

        Ok(Self { size, lu, pivots })
    }

    /// Solve `A x = b` using the factors.
    pub fn solve(&self, b: &[f64], x: &mut [f64]) -> Result<()> {
        let n = self.size;
        for (xi, &p) in x.iter_mut().zip(&self.pivots) {
            *xi = b[p];
        }

        // L y = P b
        for i in 0..n {
            let row = &self.lu[i * n..i * n + i];
            let sum: f64 = row.iter().zip(&x[..i]).map(|(l, y)| l * y).sum();
            x[i] -= sum;
        }
        // U x = y
        for i in (0..n).rev() {
            let row = &self.lu[i * n..(i + 1) * n];
            let sum: f64 = row[i + 1..].iter().zip(&x[i + 1..]).map(|(u, y)| u * y).sum();
            if row[i] == 0.0 {
                return Err(PressureError::SingularMatrix);
            }
            x[i] = (x[i] - sum) / row[i];
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(PressureError::LinearSolve {
                message: "solution is not finite".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sprs::TriMat;

    #[test]
    fn test_lu_with_pivoting() {
        // First pivot is zero, forcing a row swap.
        let a = [0.0, 2.0, 1.0, 1.0, 1.0, 0.0, 2.0, 0.0, 3.0];
        let lu = LuFactors::factor(&a, 3).unwrap();
        let mut x = [0.0; 3];
        lu.solve(&[5.0, 3.0, 13.0], &mut x).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_matrix() {
        let a = [1.0, 2.0, 2.0, 4.0];
        assert!(matches!(
            LuFactors::factor(&a, 2),
            Err(PressureError::SingularMatrix)
        ));
    }

    #[test]
    fn test_dense_lu_on_sparse_system() {
        let mut tri = TriMat::new((2, 2));
        tri.add_triplet(0, 0, 4.0);
        tri.add_triplet(0, 1, 1.0);
        tri.add_triplet(1, 0, 1.0);
        tri.add_triplet(1, 1, 3.0);
        let m: sprs::CsMat<f64> = tri.to_csr();
        assert_eq!(to_dense(m.view()), vec![4.0, 1.0, 1.0, 3.0]);

        let mut x = [0.0; 2];
        DenseLu.solve(m.view(), &[1.0, 2.0], &mut x).unwrap();
        assert_relative_eq!(4.0 * x[0] + x[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[0] + 3.0 * x[1], 2.0, epsilon = 1e-12);
        assert!(DenseLu.solve(m.view(), &[1.0], &mut x).is_err());
    }
}
