//! # Circuit Solver
//!
//! A transient simulator for lumped RLC circuits.
//!
//! This library provides:
//! - A netlist parser for one-element-per-line circuit descriptions
//! - Modified Nodal Analysis (MNA) based transient simulation
//! - Resistors, capacitors, inductors and ideal voltage sources
//!   (constant or sinusoidal)
//! - Per-element voltage/current series, serializable to JSON
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the netlist format
//! - [`circuit`] - Node registry and circuit construction
//! - [`components`] - Element models and source waveforms
//! - [`solver`] - MNA assembly, Newton-Raphson and the transient driver
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! circuit-solver circuit.net 0.01 > results.json
//! ```
//!
//! ### Library
//!
//! ```
//! use circuit_solver::{CircuitBuilder, ElementKind};
//!
//! let mut builder = CircuitBuilder::new();
//! builder.add_element(ElementKind::VoltageSource, "V1", "in", "0", "SIN(0 1 50)")?;
//! builder.add_element(ElementKind::Resistor, "R1", "in", "out", 1000.0)?;
//! builder.add_element(ElementKind::Capacitor, "C1", "out", "0", "1u")?;
//! let circuit = builder.build();
//!
//! let results = circuit.run_transient(0.02, 2e-5)?;
//! assert_eq!(results.time.len(), 1001);
//! # Ok::<(), circuit_solver::SolverError>(())
//! ```
//!
//! ## Circuit Simulation Method
//!
//! For each time step the simulator runs Newton-Raphson on the MNA
//! equations:
//!
//! 1. Assemble the Jacobian J and residual f from every element
//! 2. Solve J·Δx = -f (least squares if J is singular)
//! 3. Update x and repeat until ‖Δx‖₂ is below the tolerance
//!
//! Reactive elements (C, L) are discretized using the trapezoidal rule and
//! commit their state once per timestep, after the Newton loop.

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Circuit, CircuitBuilder};
pub use components::{ElementKind, ElementValue};
pub use error::{Result, SolverError};
pub use solver::{SimulatorConfig, TransientResults, TransientSimulator};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::simulate;

/// Default end time of a CLI run in seconds
pub const DEFAULT_T_END: f64 = 0.01;

/// Default number of time steps of a CLI run (dt = t_end / steps)
pub const DEFAULT_STEPS: usize = 1000;
