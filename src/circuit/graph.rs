//! Circuit construction.

use std::collections::HashSet;

use tracing::debug;

use super::registry::{NodeRegistry, NodeRegistryBuilder};
use super::types::{AuxIndex, ElementId, NodeId};
use crate::components::{
    Capacitor, Element, ElementKind, ElementValue, Inductor, Resistor, VoltageSource, Waveform,
};
use crate::dsl::parse_value;
use crate::error::{Result, SolverError};

/// Element parameters validated at `add_element` time. Aux indices are
/// only known once every node has been seen, so elements are created in
/// [`CircuitBuilder::build`].
#[derive(Debug, Clone)]
enum ElementParams {
    Resistor { resistance: f64 },
    Capacitor { capacitance: f64 },
    Inductor { inductance: f64 },
    VoltageSource { waveform: Waveform },
}

#[derive(Debug, Clone)]
struct PendingElement {
    name: String,
    nodes: [NodeId; 2],
    params: ElementParams,
}

/// Mutable construction phase of a [`Circuit`].
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    nodes: NodeRegistryBuilder,
    pending: Vec<PendingElement>,
    names: HashSet<String>,
}

impl CircuitBuilder {
    /// Create an empty circuit containing only the ground node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element between `node1` and `node2`.
    ///
    /// Resistor, capacitor and inductor values must be numeric; voltage
    /// source values are compiled into a [`Waveform`].
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        name: &str,
        node1: &str,
        node2: &str,
        value: impl Into<ElementValue>,
    ) -> Result<ElementId> {
        let value = value.into();
        if self.names.contains(name) {
            return Err(SolverError::DuplicateComponent {
                name: name.to_string(),
            });
        }

        let params = match kind {
            ElementKind::Resistor => {
                let resistance = numeric_value(name, &value)?;
                if resistance == 0.0 {
                    return Err(SolverError::invalid_parameter(
                        name,
                        "resistance",
                        "must be non-zero",
                    ));
                }
                ElementParams::Resistor { resistance }
            }
            ElementKind::Capacitor => ElementParams::Capacitor {
                capacitance: numeric_value(name, &value)?,
            },
            ElementKind::Inductor => ElementParams::Inductor {
                inductance: numeric_value(name, &value)?,
            },
            ElementKind::VoltageSource => {
                let waveform = Waveform::compile(&value);
                if !waveform.is_finite() {
                    return Err(SolverError::invalid_parameter(name, "value", "must be finite"));
                }
                ElementParams::VoltageSource { waveform }
            }
        };

        let nodes = [self.nodes.resolve(node1), self.nodes.resolve(node2)];
        let id = ElementId(self.pending.len());
        debug!(%name, %kind, %value, n1 = %nodes[0], n2 = %nodes[1], "added element");

        self.names.insert(name.to_string());
        self.pending.push(PendingElement {
            name: name.to_string(),
            nodes,
            params,
        });
        Ok(id)
    }

    /// Freeze the node registry and lay out aux unknowns.
    ///
    /// Aux indices follow the node voltages, one per inductor or voltage
    /// source, in declaration order.
    pub fn build(self) -> Circuit {
        let nodes = self.nodes.freeze();
        let num_nodes = nodes.len();
        let mut next_aux = num_nodes;
        let mut take_aux = || {
            let aux = AuxIndex(next_aux);
            next_aux += 1;
            aux
        };

        let elements: Vec<Element> = self
            .pending
            .into_iter()
            .enumerate()
            .map(|(idx, p)| {
                let id = ElementId(idx);
                match p.params {
                    ElementParams::Resistor { resistance } => {
                        Element::Resistor(Resistor::new(id, p.name, p.nodes, resistance))
                    }
                    ElementParams::Capacitor { capacitance } => {
                        Element::Capacitor(Capacitor::new(id, p.name, p.nodes, capacitance))
                    }
                    ElementParams::Inductor { inductance } => Element::Inductor(Inductor::new(
                        id,
                        p.name,
                        p.nodes,
                        inductance,
                        take_aux(),
                    )),
                    ElementParams::VoltageSource { waveform } => Element::VoltageSource(
                        VoltageSource::new(id, p.name, p.nodes, waveform, take_aux()),
                    ),
                }
            })
            .collect();

        let num_aux = elements.iter().filter(|e| e.aux().is_some()).count();
        debug_assert_eq!(next_aux, num_nodes + num_aux, "aux indexing mismatch");

        Circuit {
            elements,
            nodes,
            num_aux,
        }
    }
}

/// Convert an R/C/L value to a finite number.
fn numeric_value(name: &str, value: &ElementValue) -> Result<f64> {
    let v = match value {
        ElementValue::Number(v) => *v,
        ElementValue::Text(text) => {
            parse_value(text).ok_or_else(|| SolverError::invalid_value(name, text.as_str()))?
        }
    };
    if !v.is_finite() {
        return Err(SolverError::invalid_parameter(name, "value", "must be finite"));
    }
    Ok(v)
}

/// A complete circuit ready for simulation.
///
/// Topology is fixed; transient runs borrow the circuit and work on their
/// own copy of the element state.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// All elements in declaration order
    pub elements: Vec<Element>,

    /// Frozen node registry
    pub nodes: NodeRegistry,

    /// Number of branch current unknowns (inductors, voltage sources)
    pub num_aux: usize,
}

impl Circuit {
    /// Number of nodes, ground included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total size of the MNA solution vector.
    pub fn matrix_size(&self) -> usize {
        self.num_nodes() + self.num_aux
    }

    /// Find a node ID by name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.get(name)
    }

    /// Find an element by name.
    pub fn find_element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }
}
