//! Error types for the circuit solver.
//!
//! This module provides a unified error type [`SolverError`] that covers
//! netlist parsing, circuit construction and transient simulation.
//! Numerical imperfections the engine tolerates (least-squares fallback,
//! unparsed waveforms, iteration cap exhaustion) are logged, not raised.

use thiserror::Error;

/// Result type alias using [`SolverError`].
pub type Result<T> = std::result::Result<T, SolverError>;

/// Unified error type for all circuit solver operations.
#[derive(Error, Debug)]
pub enum SolverError {
    // ============ Netlist Parsing Errors ============
    /// Netlist line whose element could not be constructed
    #[error("Parse error at line {line}: {source}")]
    ParseError {
        line: usize,
        #[source]
        source: Box<SolverError>,
    },

    /// Unknown element type letter
    #[error("Unknown component type '{component_type}' at line {line}")]
    UnknownComponentType { component_type: String, line: usize },

    // ============ Circuit Construction Errors ============
    /// Element value that cannot be converted to a number
    #[error("Invalid value '{value}' for component '{component}'")]
    InvalidValue { component: String, value: String },

    /// Numeric value outside the range the element model accepts
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    /// Duplicate element name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    // ============ Simulation Errors ============
    /// Matrix could not be solved, not even in the least-squares sense
    #[error("Singular matrix - circuit may have a short circuit or floating node")]
    SingularMatrix,

    /// Newton-Raphson iteration did not converge (strict mode only)
    #[error(
        "Newton-Raphson did not converge at t = {time:.6e} after {iterations} iterations \
         (step norm: {step_norm:.2e})"
    )]
    ConvergenceFailure {
        time: f64,
        iterations: usize,
        step_norm: f64,
    },

    /// Solution vector became non-finite
    #[error("Numerical overflow detected at t = {time:.6e} in unknown {index}")]
    NumericalOverflow { time: f64, index: usize },

    /// Invalid simulation parameter
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    // ============ I/O Errors ============
    /// Error reading netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error encoding results
    #[error("Failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SolverError {
    /// Attach a netlist line number to a construction error
    pub fn at_line(line: usize, source: SolverError) -> Self {
        Self::ParseError {
            line,
            source: Box::new(source),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(component: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            component: component.into(),
            value: value.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        component: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component: component.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an invalid simulation parameter error
    pub fn invalid_simulation_param(message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            message: message.into(),
        }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(time: f64, iterations: usize, step_norm: f64) -> Self {
        Self::ConvergenceFailure {
            time,
            iterations,
            step_norm,
        }
    }
}
