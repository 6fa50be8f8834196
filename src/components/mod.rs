//! Element models for circuit simulation.
//!
//! This module provides models for all supported circuit elements:
//! - Linear: Resistor, Capacitor, Inductor
//! - Sources: ideal Voltage Source driven by a [`Waveform`]
//!
//! Each element stamps its contribution into the MNA system, reports its
//! `(v, i)` pair for a solved timestep and, for reactive kinds, carries
//! companion-model state from one timestep to the next.

mod linear;
mod sources;
mod waveform;

pub use linear::{Capacitor, Inductor, Resistor};
pub use sources::VoltageSource;
pub use waveform::Waveform;

use std::fmt;

use crate::circuit::{AuxIndex, ElementId, NodeId};
use crate::solver::MnaSystem;

/// Element kinds accepted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Resistor
    Resistor,
    /// Capacitor
    Capacitor,
    /// Inductor
    Inductor,
    /// Ideal voltage source
    VoltageSource,
}

impl ElementKind {
    /// Parse an element kind from its type letter.
    ///
    /// `W` (wire) is accepted as an alias for a resistor.
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag.to_ascii_uppercase() {
            'R' | 'W' => Some(Self::Resistor),
            'C' => Some(Self::Capacitor),
            'L' => Some(Self::Inductor),
            'V' => Some(Self::VoltageSource),
            _ => None,
        }
    }

    /// Canonical type letter.
    pub fn tag(&self) -> char {
        match self {
            Self::Resistor => 'R',
            Self::Capacitor => 'C',
            Self::Inductor => 'L',
            Self::VoltageSource => 'V',
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Value given for an element: a number, or text still to be interpreted
/// (an engineering literal, or a waveform descriptor for sources).
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Number(f64),
    Text(String),
}

impl From<f64> for ElementValue {
    fn from(v: f64) -> Self {
        ElementValue::Number(v)
    }
}

impl From<&str> for ElementValue {
    fn from(s: &str) -> Self {
        ElementValue::Text(s.to_string())
    }
}

impl From<String> for ElementValue {
    fn from(s: String) -> Self {
        ElementValue::Text(s)
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::Number(v) => write!(f, "{}", v),
            ElementValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A circuit element.
#[derive(Debug, Clone)]
pub enum Element {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    VoltageSource(VoltageSource),
}

impl Element {
    /// Get the element ID.
    pub fn id(&self) -> ElementId {
        match self {
            Element::Resistor(r) => r.id,
            Element::Capacitor(c) => c.id,
            Element::Inductor(l) => l.id,
            Element::VoltageSource(v) => v.id,
        }
    }

    /// Get the element name.
    pub fn name(&self) -> &str {
        match self {
            Element::Resistor(r) => &r.name,
            Element::Capacitor(c) => &c.name,
            Element::Inductor(l) => &l.name,
            Element::VoltageSource(v) => &v.name,
        }
    }

    /// Terminal nodes `[terminal1, terminal2]`.
    pub fn nodes(&self) -> [NodeId; 2] {
        match self {
            Element::Resistor(r) => r.nodes,
            Element::Capacitor(c) => c.nodes,
            Element::Inductor(l) => l.nodes,
            Element::VoltageSource(v) => v.nodes,
        }
    }

    /// Aux unknown of inductors and voltage sources.
    pub fn aux(&self) -> Option<AuxIndex> {
        match self {
            Element::Inductor(l) => Some(l.aux),
            Element::VoltageSource(v) => Some(v.aux),
            _ => None,
        }
    }

    /// Add this element's contribution to J and f for the guess `x`.
    pub fn stamp(&self, sys: &mut MnaSystem, x: &[f64], dt: f64, t: f64) {
        match self {
            Element::Resistor(r) => r.stamp(sys, x),
            Element::Capacitor(c) => c.stamp(sys, x, dt),
            Element::Inductor(l) => l.stamp(sys, x, dt),
            Element::VoltageSource(v) => v.stamp(sys, x, t),
        }
    }

    /// Voltage across and current through this element for a solved `x`.
    pub fn results(&self, x: &[f64], dt: f64) -> (f64, f64) {
        match self {
            Element::Resistor(r) => r.results(x),
            Element::Capacitor(c) => c.results(x, dt),
            Element::Inductor(l) => l.results(x),
            Element::VoltageSource(v) => v.results(x),
        }
    }

    /// Commit `(v, i)` as the previous-timestep state. No-op for
    /// non-reactive elements.
    pub fn update_state(&mut self, v: f64, i: f64) {
        match self {
            Element::Capacitor(c) => c.update_state(v, i),
            Element::Inductor(l) => l.update_state(v, i),
            Element::Resistor(_) | Element::VoltageSource(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(ElementKind::from_tag('r'), Some(ElementKind::Resistor));
        assert_eq!(ElementKind::from_tag('W'), Some(ElementKind::Resistor));
        assert_eq!(ElementKind::from_tag('C'), Some(ElementKind::Capacitor));
        assert_eq!(ElementKind::from_tag('L'), Some(ElementKind::Inductor));
        assert_eq!(ElementKind::from_tag('v'), Some(ElementKind::VoltageSource));
        assert_eq!(ElementKind::from_tag('D'), None);
    }

    #[test]
    fn test_update_state_only_touches_reactive() {
        let mut c = Element::Capacitor(Capacitor::new(
            ElementId(0),
            "C1".to_string(),
            [NodeId(1), NodeId(0)],
            1e-6,
        ));
        c.update_state(2.0, 0.5);
        match &c {
            Element::Capacitor(cap) => {
                assert_eq!(cap.v_prev, 2.0);
                assert_eq!(cap.i_prev, 0.5);
            }
            _ => unreachable!(),
        }
        assert_eq!(c.aux(), None);

        let mut r = Element::Resistor(Resistor::new(
            ElementId(1),
            "R1".to_string(),
            [NodeId(1), NodeId(0)],
            10.0,
        ));
        r.update_state(2.0, 0.5);
        match &r {
            Element::Resistor(res) => assert_eq!(res.conductance, 0.1),
            _ => unreachable!(),
        }
    }
}
