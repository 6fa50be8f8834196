//! Ideal voltage sources.

use super::linear::terminal_voltage;
use super::Waveform;
use crate::circuit::{AuxIndex, ElementId, NodeId};
use crate::solver::MnaSystem;

/// A voltage source component.
///
/// Voltage sources require an extra row/column in the MNA matrix for the
/// branch current. The source enforces: V+ - V- = v(t)
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub id: ElementId,
    pub name: String,
    pub nodes: [NodeId; 2], // [positive, negative]
    pub waveform: Waveform,
    pub aux: AuxIndex,
}

impl VoltageSource {
    /// Create a new voltage source.
    pub fn new(
        id: ElementId,
        name: String,
        nodes: [NodeId; 2],
        waveform: Waveform,
        aux: AuxIndex,
    ) -> Self {
        Self {
            id,
            name,
            nodes,
            waveform,
            aux,
        }
    }

    /// Get the source voltage at time `t`.
    pub fn voltage(&self, t: f64) -> f64 {
        self.waveform.at(t)
    }

    /// Stamp the aux coupling and the constraint `V[n+] - V[n-] - v(t) = 0`.
    pub fn stamp(&self, sys: &mut MnaSystem, x: &[f64], t: f64) {
        let [n1, n2] = self.nodes;
        let m = self.aux.index();

        sys.stamp_aux_coupling(n1, n2, self.aux);
        sys.stamp_branch_current(n1, n2, x[m]);
        sys.add_residual(m, terminal_voltage(self.nodes, x) - self.voltage(t));
    }

    /// Terminal voltage and the current delivered out of the positive terminal.
    ///
    /// The aux unknown flows into the positive terminal, hence the sign flip.
    pub fn results(&self, x: &[f64]) -> (f64, f64) {
        (terminal_voltage(self.nodes, x), -x[self.aux.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_source_stamp() {
        let v = VoltageSource::new(
            ElementId(0),
            "V1".to_string(),
            [NodeId(1), NodeId(0)],
            Waveform::Constant(10.0),
            AuxIndex(2),
        );
        let mut sys = MnaSystem::new(3);
        v.stamp(&mut sys, &[0.0, 4.0, -0.01], 0.0);

        assert_eq!(sys.get(1, 2), 1.0);
        assert_eq!(sys.get(2, 1), 1.0);
        assert_eq!(sys.get(2, 2), 0.0);
        assert_eq!(sys.residual[1], -0.01);
        assert_eq!(sys.residual[2], -6.0);
    }

    #[test]
    fn test_reported_current_is_negated_aux() {
        let v = VoltageSource::new(
            ElementId(0),
            "V1".to_string(),
            [NodeId(1), NodeId(0)],
            Waveform::Constant(10.0),
            AuxIndex(2),
        );
        let (volts, amps) = v.results(&[0.0, 10.0, -0.005]);
        assert_eq!(volts, 10.0);
        assert_eq!(amps, 0.005);
    }
}
