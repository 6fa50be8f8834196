//! MNA transient solver.
//!
//! This module provides the numerical engine for circuit simulation.
//!
//! ## Modified Nodal Analysis
//!
//! Each Newton iteration assembles a Jacobian J and a residual f over the
//! unknown vector x:
//! ```text
//! [ G   B ] [ v ]        [ f_kcl    ]
//! [ C   D ] [ j ] = J,   [ f_branch ] = f
//! ```
//!
//! where:
//! - v is the vector of node voltages (ground included, pinned to 0)
//! - j is the vector of inductor / voltage source branch currents
//! - G holds resistor and capacitor companion conductances
//! - B, C couple branch currents to their terminals
//! - D holds the inductor companion resistances (0 for ideal sources)
//!
//! and solves `J·Δx = -f` until `‖Δx‖₂` drops below the tolerance.

mod mna;
mod newton;
mod result;
mod simulator;

pub use mna::{assemble, MnaSystem, SolveMethod};
pub use newton::{NewtonOutcome, NewtonRaphson};
pub use result::{ElementSeries, TransientResults};
pub use simulator::{time_grid, SimulatorConfig, TransientSimulator};

/// Default convergence tolerance on the Newton step norm.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default maximum Newton-Raphson iterations per time step.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Upper bound on the number of time points of one run.
pub const MAX_TIME_POINTS: usize = 10_000_000;
