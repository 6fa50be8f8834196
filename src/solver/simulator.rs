//! Transient driver.

use tracing::{debug, info, info_span, warn};

use super::mna::MnaSystem;
use super::newton::{NewtonOutcome, NewtonRaphson};
use super::result::TransientResults;
use super::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, MAX_TIME_POINTS};
use crate::circuit::Circuit;
use crate::error::{Result, SolverError};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Maximum Newton-Raphson iterations per timestep.
    pub max_iterations: usize,
    /// Convergence tolerance on the Newton step norm.
    pub tolerance: f64,
    /// Treat iteration cap exhaustion as an error instead of a warning.
    pub strict_convergence: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            strict_convergence: false,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum Newton-Raphson iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance on `‖Δx‖₂`.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Fail the run when a timestep hits the iteration cap.
    pub fn with_strict_convergence(mut self, strict: bool) -> Self {
        self.strict_convergence = strict;
        self
    }
}

/// Uniform grid `0, dt, 2dt, ...` up to and including `t_end`.
///
/// `t_end` is included when it lies on the grid up to rounding error;
/// otherwise the grid stops at the last point before it.
pub fn time_grid(t_end: f64, dt: f64) -> Result<Vec<f64>> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SolverError::invalid_simulation_param(format!(
            "time step must be positive, got {}",
            dt
        )));
    }
    if !t_end.is_finite() || t_end < 0.0 {
        return Err(SolverError::invalid_simulation_param(format!(
            "end time must be non-negative, got {}",
            t_end
        )));
    }

    let ratio = t_end / dt;
    let nearest = ratio.round();
    let steps = if (ratio - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest
    } else {
        ratio.floor()
    };
    if steps >= MAX_TIME_POINTS as f64 {
        return Err(SolverError::invalid_simulation_param(format!(
            "t_end = {} and dt = {} need more than {} time points",
            t_end, dt, MAX_TIME_POINTS
        )));
    }

    Ok((0..=steps as usize).map(|k| k as f64 * dt).collect())
}

/// Transient simulation of one circuit.
pub struct TransientSimulator<'a> {
    /// The circuit being simulated
    circuit: &'a Circuit,
    /// Newton-Raphson solver
    newton: NewtonRaphson,
    /// Convergence policy
    strict_convergence: bool,
}

impl<'a> TransientSimulator<'a> {
    /// Create a new simulator for the given circuit.
    pub fn new(circuit: &'a Circuit, config: SimulatorConfig) -> Self {
        Self {
            circuit,
            newton: NewtonRaphson::with_config(config.max_iterations, config.tolerance),
            strict_convergence: config.strict_convergence,
        }
    }

    /// Run from `t = 0` to `t_end` with step `dt`.
    ///
    /// Reactive state starts from rest and lives only for this run; the
    /// solution vector is warm-started from one timestep to the next.
    pub fn run(&self, t_end: f64, dt: f64) -> Result<TransientResults> {
        let grid = time_grid(t_end, dt)?;
        let size = self.circuit.matrix_size();
        let _span = info_span!("transient", t_end, dt, points = grid.len(), size).entered();

        let mut elements = self.circuit.elements.clone();
        let mut system = MnaSystem::new(size);
        let mut x = vec![0.0; size];
        let mut results = TransientResults::with_capacity(&elements, grid);
        let mut total_iterations = 0usize;

        for k in 0..results.time.len() {
            let t = results.time[k];
            let outcome = self.newton.solve(&elements, &mut system, &mut x, dt, t)?;
            total_iterations += outcome.iterations();

            if let NewtonOutcome::CapExhausted {
                iterations,
                step_norm,
            } = outcome
            {
                if self.strict_convergence {
                    return Err(SolverError::convergence_failure(t, iterations, step_norm));
                }
                warn!(t, iterations, step_norm, "Newton-Raphson hit the iteration cap");
                results.non_converged_steps += 1;
            }

            // Commit reactive state only after this timestep's loop is done
            for element in &mut elements {
                let (v, i) = element.results(&x, dt);
                results.push(element.id(), v, i);
                element.update_state(v, i);
            }
            debug!(t, iterations = outcome.iterations(), "timestep done");
        }

        info!(
            points = results.time.len(),
            total_iterations,
            non_converged = results.non_converged_steps,
            "transient analysis finished"
        );
        Ok(results)
    }
}

impl Circuit {
    /// Run a transient analysis with the default configuration.
    pub fn run_transient(&self, t_end: f64, dt: f64) -> Result<TransientResults> {
        TransientSimulator::new(self, SimulatorConfig::default()).run(t_end, dt)
    }
}
