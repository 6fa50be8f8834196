//! MNA system assembly and solving.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::circuit::{AuxIndex, NodeId};
use crate::components::Element;
use crate::error::{Result, SolverError};

/// How the last Newton step was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    /// LU decomposition with partial pivoting
    Lu,
    /// SVD least-squares fallback for singular systems
    LeastSquares,
}

/// Jacobian/residual system `J·Δx = -f` for one Newton iteration.
#[derive(Debug)]
pub struct MnaSystem {
    /// Jacobian matrix J (row-major)
    pub jacobian: Vec<f64>,
    /// Residual vector f
    pub residual: Vec<f64>,
    /// Newton correction Δx from the last solve
    pub delta: Vec<f64>,
    /// Matrix dimension (node count + aux count)
    pub size: usize,
    /// LU decomposition of J
    lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pivots: Vec<usize>,
}

impl MnaSystem {
    /// Create a zeroed system with `size` unknowns.
    pub fn new(size: usize) -> Self {
        Self {
            jacobian: vec![0.0; size * size],
            residual: vec![0.0; size],
            delta: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
        }
    }

    /// Clear the matrix and residual to zero.
    pub fn clear(&mut self) {
        self.jacobian.fill(0.0);
        self.residual.fill(0.0);
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.jacobian[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.jacobian[row * self.size + col] += value;
    }

    /// Add to residual vector element.
    pub fn add_residual(&mut self, row: usize, value: f64) {
        self.residual[row] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   J[n1,n1] += G
    ///   J[n2,n2] += G
    ///   J[n1,n2] -= G
    ///   J[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: NodeId, n2: NodeId, g: f64) {
        let (i, j) = (n1.index(), n2.index());
        self.add(i, i, g);
        self.add(j, j, g);
        self.add(i, j, -g);
        self.add(j, i, -g);
    }

    /// Stamp a branch current leaving n1 and entering n2 into the KCL residuals.
    pub fn stamp_branch_current(&mut self, n1: NodeId, n2: NodeId, current: f64) {
        self.add_residual(n1.index(), current);
        self.add_residual(n2.index(), -current);
    }

    /// Couple an aux unknown to its terminals:
    /// the aux current leaves n1 and enters n2 (node rows), and the aux row
    /// sees the terminal voltage difference V[n1] - V[n2].
    pub fn stamp_aux_coupling(&mut self, n1: NodeId, n2: NodeId, aux: AuxIndex) {
        let (i, j, m) = (n1.index(), n2.index(), aux.index());
        self.add(i, m, 1.0);
        self.add(j, m, -1.0);
        self.add(m, i, 1.0);
        self.add(m, j, -1.0);
    }

    /// Pin the ground unknown: row 0 becomes `Δx[0] = -x[0]`.
    ///
    /// Overrides whatever elements stamped into row 0. Column 0 is cleared
    /// in every other row as well, since the ground voltage never moves.
    pub fn enforce_ground(&mut self, x_ground: f64) {
        let n = self.size;
        self.jacobian[..n].fill(0.0);
        for row in 1..n {
            self.jacobian[row * n] = 0.0;
        }
        self.jacobian[0] = 1.0;
        self.residual[0] = x_ground;
    }

    /// Index of the first row of J or f holding a NaN or infinity.
    pub fn first_non_finite(&self) -> Option<usize> {
        let n = self.size;
        (0..n).find(|&row| {
            !self.residual[row].is_finite()
                || self.jacobian[row * n..(row + 1) * n]
                    .iter()
                    .any(|v| !v.is_finite())
        })
    }

    /// Solve `J·Δx = -f` into [`MnaSystem::delta`].
    ///
    /// Falls back to a least-squares solution when LU hits a zero pivot.
    /// J and f must be finite, see [`MnaSystem::first_non_finite`].
    pub fn solve_step(&mut self) -> Result<SolveMethod> {
        match self.factor() {
            Ok(()) => {
                self.substitute();
                Ok(SolveMethod::Lu)
            }
            Err(SolverError::SingularMatrix) => {
                debug!(size = self.size, "LU hit a zero pivot, using least squares");
                self.solve_least_squares()?;
                Ok(SolveMethod::LeastSquares)
            }
            Err(e) => Err(e),
        }
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// Only an exactly zero pivot marks the matrix singular; badly scaled
    /// but regular systems are still solved here.
    fn factor(&mut self) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.jacobian);

        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val == 0.0 || !max_val.is_finite() {
                return Err(SolverError::SingularMatrix);
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Forward/back substitution with the factors from [`MnaSystem::factor`].
    fn substitute(&mut self) {
        let n = self.size;

        // Apply pivot permutation to -f
        for i in 0..n {
            self.delta[i] = -self.residual[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.delta[i] -= self.lu[i * n + j] * self.delta[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.delta[i] -= self.lu[i * n + j] * self.delta[j];
            }
            self.delta[i] /= self.lu[i * n + i];
        }
    }

    /// Minimum-norm least-squares solution via SVD.
    fn solve_least_squares(&mut self) -> Result<()> {
        let n = self.size;
        let a = DMatrix::from_row_slice(n, n, &self.jacobian);
        let b = DVector::from_iterator(n, self.residual.iter().map(|r| -r));

        let svd = a.svd(true, true);
        // Relative cutoff on the singular values
        let eps = f64::EPSILON * n as f64 * svd.singular_values.max();
        let solution = svd
            .solve(&b, eps)
            .map_err(|_| SolverError::SingularMatrix)?;

        self.delta.copy_from_slice(solution.as_slice());
        // Row 0 is decoupled from the rest after enforce_ground.
        self.delta[0] = -self.residual[0];
        Ok(())
    }

    /// Euclidean norm of the last Newton correction.
    pub fn delta_norm(&self) -> f64 {
        self.delta.iter().map(|d| d * d).sum::<f64>().sqrt()
    }
}

/// Assemble J and f for the current guess `x`.
///
/// Every element stamps additively, then the ground row is pinned.
pub fn assemble(elements: &[Element], system: &mut MnaSystem, x: &[f64], dt: f64, t: f64) {
    system.clear();
    for element in elements {
        element.stamp(system, x, dt, t);
    }
    system.enforce_ground(x[0]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_conductance_stamp_is_symmetric() {
        let mut sys = MnaSystem::new(3);
        sys.stamp_conductance(NodeId(1), NodeId(2), 0.5);
        assert_eq!(sys.get(1, 1), 0.5);
        assert_eq!(sys.get(2, 2), 0.5);
        assert_eq!(sys.get(1, 2), -0.5);
        assert_eq!(sys.get(2, 1), -0.5);
    }

    #[test]
    fn test_enforce_ground_overrides_row_and_column() {
        let mut sys = MnaSystem::new(2);
        sys.stamp_conductance(NodeId(0), NodeId(1), 2.0);
        sys.add_residual(0, 7.0);
        sys.enforce_ground(0.0);
        assert_eq!(sys.get(0, 0), 1.0);
        assert_eq!(sys.get(0, 1), 0.0);
        assert_eq!(sys.get(1, 0), 0.0);
        assert_eq!(sys.get(1, 1), 2.0);
        assert_eq!(sys.residual[0], 0.0);
    }

    #[test]
    fn test_lu_solve() {
        // [2 1; 1 3] dx = -[-3; -5]  =>  dx = [0.8, 1.4]
        let mut sys = MnaSystem::new(2);
        sys.add(0, 0, 2.0);
        sys.add(0, 1, 1.0);
        sys.add(1, 0, 1.0);
        sys.add(1, 1, 3.0);
        sys.add_residual(0, -3.0);
        sys.add_residual(1, -5.0);

        assert_eq!(sys.solve_step().unwrap(), SolveMethod::Lu);
        assert_abs_diff_eq!(sys.delta[0], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(sys.delta[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_badly_scaled_system_uses_lu() {
        // 2e6 next to 1e-9 is regular, just poorly scaled
        let mut sys = MnaSystem::new(3);
        sys.add(1, 1, 2e6);
        sys.add(2, 2, 2e-9);
        sys.add_residual(1, -2e6);
        sys.add_residual(2, -1e-9);
        sys.enforce_ground(0.0);

        assert_eq!(sys.solve_step().unwrap(), SolveMethod::Lu);
        assert_abs_diff_eq!(sys.delta[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sys.delta[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_first_non_finite_row() {
        let mut sys = MnaSystem::new(3);
        assert_eq!(sys.first_non_finite(), None);
        sys.add(2, 1, f64::INFINITY);
        assert_eq!(sys.first_non_finite(), Some(2));
        sys.add_residual(1, f64::NAN);
        assert_eq!(sys.first_non_finite(), Some(1));
    }

    #[test]
    fn test_singular_system_falls_back_to_least_squares() {
        // Ground pinned, two identical rows for the remaining unknowns.
        let mut sys = MnaSystem::new(3);
        sys.add(1, 1, 1.0);
        sys.add(1, 2, 1.0);
        sys.add(2, 1, 1.0);
        sys.add(2, 2, 1.0);
        sys.add_residual(1, -2.0);
        sys.add_residual(2, -2.0);
        sys.enforce_ground(0.0);

        assert_eq!(sys.solve_step().unwrap(), SolveMethod::LeastSquares);
        // Minimum-norm solution of a + b = 2
        assert_eq!(sys.delta[0], 0.0);
        assert_abs_diff_eq!(sys.delta[1], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sys.delta[2], 1.0, epsilon = 1e-9);
    }
}
