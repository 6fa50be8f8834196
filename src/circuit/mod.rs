//! Circuit representation.
//!
//! This module provides the internal representation of a circuit before
//! simulation. Elements are added through a [`CircuitBuilder`], which
//! resolves node names as it goes; [`CircuitBuilder::build`] freezes the
//! node registry and lays out aux unknowns, yielding an immutable
//! [`Circuit`].

mod graph;
mod registry;
mod types;

pub use graph::{Circuit, CircuitBuilder};
pub use registry::{NodeRegistry, NodeRegistryBuilder};
pub use types::*;
