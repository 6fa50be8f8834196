//! Result types for transient analysis.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::circuit::ElementId;
use crate::components::Element;
use crate::error::Result;

/// Voltage and current series of one element.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ElementSeries {
    /// Element name (the JSON key, not part of the value)
    #[serde(skip)]
    pub name: String,
    /// Terminal voltage V[n1] - V[n2] at each timepoint (V)
    pub v: Vec<f64>,
    /// Element current at each timepoint (A)
    pub i: Vec<f64>,
}

/// Result of a transient simulation.
///
/// Serializes to `{ "<element>": { "v": [...], "i": [...] }, ..., "time": [...] }`
/// with elements in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientResults {
    /// Timepoints (s).
    pub time: Vec<f64>,
    /// Per-element series, indexed by [`ElementId`].
    pub elements: Vec<ElementSeries>,
    /// Timesteps whose Newton loop hit the iteration cap.
    pub non_converged_steps: usize,
}

impl TransientResults {
    /// Allocate one buffer per element for `time.len()` points.
    pub(crate) fn with_capacity(elements: &[Element], time: Vec<f64>) -> Self {
        let points = time.len();
        Self {
            elements: elements
                .iter()
                .map(|e| ElementSeries {
                    name: e.name().to_string(),
                    v: Vec::with_capacity(points),
                    i: Vec::with_capacity(points),
                })
                .collect(),
            time,
            non_converged_steps: 0,
        }
    }

    /// Append one `(v, i)` sample for an element.
    pub(crate) fn push(&mut self, id: ElementId, v: f64, i: f64) {
        let series = &mut self.elements[id.0];
        series.v.push(v);
        series.i.push(i);
    }

    /// Get the series of an element by ID.
    pub fn series(&self, id: ElementId) -> &ElementSeries {
        &self.elements[id.0]
    }

    /// Get the series of an element by name.
    pub fn get(&self, name: &str) -> Option<&ElementSeries> {
        self.elements.iter().find(|s| s.name == name)
    }

    /// Encode as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

impl Serialize for TransientResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.elements.len() + 1))?;
        for series in &self.elements {
            map.serialize_entry(&series.name, series)?;
        }
        map.serialize_entry("time", &self.time)?;
        map.end()
    }
}
