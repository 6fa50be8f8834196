//! Newton-Raphson iteration for a single timestep.

use tracing::{debug, trace};

use super::mna::{assemble, MnaSystem, SolveMethod};
use super::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::components::Element;
use crate::error::{Result, SolverError};

/// How a timestep's Newton loop ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewtonOutcome {
    /// `‖Δx‖₂` fell below the tolerance
    Converged { iterations: usize },
    /// The iteration cap was reached; `x` holds the last iterate
    CapExhausted { iterations: usize, step_norm: f64 },
}

impl NewtonOutcome {
    /// Check if the loop converged.
    pub fn is_converged(&self) -> bool {
        matches!(self, NewtonOutcome::Converged { .. })
    }

    /// Number of iterations performed.
    pub fn iterations(&self) -> usize {
        match *self {
            NewtonOutcome::Converged { iterations }
            | NewtonOutcome::CapExhausted { iterations, .. } => iterations,
        }
    }
}

/// Newton-Raphson solver for one timestep.
#[derive(Debug, Clone)]
pub struct NewtonRaphson {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Convergence tolerance on `‖Δx‖₂`
    pub tolerance: f64,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self::new()
    }
}

impl NewtonRaphson {
    /// Create a new Newton-Raphson solver.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE)
    }

    /// Create a solver with an explicit iteration cap and tolerance.
    pub fn with_config(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Iterate `x` in place until convergence or the iteration cap.
    ///
    /// `x` is the warm start (the previous timestep's solution) and holds
    /// the final iterate on return.
    pub fn solve(
        &self,
        elements: &[Element],
        system: &mut MnaSystem,
        x: &mut [f64],
        dt: f64,
        t: f64,
    ) -> Result<NewtonOutcome> {
        let mut step_norm = f64::INFINITY;

        for iter in 0..self.max_iterations {
            assemble(elements, system, x, dt, t);
            if let Some(index) = system.first_non_finite() {
                return Err(SolverError::NumericalOverflow { time: t, index });
            }

            if system.solve_step()? == SolveMethod::LeastSquares {
                debug!(t, iter, "least-squares Newton step");
            }

            for (i, (xi, di)) in x.iter_mut().zip(&system.delta).enumerate() {
                *xi += di;
                if !xi.is_finite() {
                    return Err(SolverError::NumericalOverflow { time: t, index: i });
                }
            }

            step_norm = system.delta_norm();
            trace!(t, iter, step_norm, "newton iteration");

            if step_norm < self.tolerance {
                return Ok(NewtonOutcome::Converged {
                    iterations: iter + 1,
                });
            }
        }

        Ok(NewtonOutcome::CapExhausted {
            iterations: self.max_iterations,
            step_norm,
        })
    }
}
