//! Linear passive components: Resistor, Capacitor, Inductor.

use crate::circuit::{AuxIndex, ElementId, NodeId};
use crate::solver::MnaSystem;

/// Voltage across two terminals for the current guess.
pub(crate) fn terminal_voltage(nodes: [NodeId; 2], x: &[f64]) -> f64 {
    x[nodes[0].index()] - x[nodes[1].index()]
}

/// A resistor component.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub id: ElementId,
    pub name: String,
    pub nodes: [NodeId; 2], // [positive, negative]
    /// Conductance 1/R
    pub conductance: f64,
}

impl Resistor {
    /// Create a new resistor. `resistance` must be non-zero.
    pub fn new(id: ElementId, name: String, nodes: [NodeId; 2], resistance: f64) -> Self {
        Self {
            id,
            name,
            nodes,
            conductance: 1.0 / resistance,
        }
    }

    /// Stamp the conductance and its KCL current.
    pub fn stamp(&self, sys: &mut MnaSystem, x: &[f64]) {
        let [n1, n2] = self.nodes;
        sys.stamp_conductance(n1, n2, self.conductance);
        sys.stamp_branch_current(n1, n2, self.conductance * terminal_voltage(self.nodes, x));
    }

    /// Voltage across and current through the resistor.
    pub fn results(&self, x: &[f64]) -> (f64, f64) {
        let v = terminal_voltage(self.nodes, x);
        (v, v * self.conductance)
    }
}

/// A capacitor component.
///
/// In discrete-time simulation, a capacitor is modeled using a companion model.
/// Using the trapezoidal rule:
///   i(n) + i(n-1) = (2C/dt) * (v(n) - v(n-1))
///
/// which gives an equivalent conductance G_eq = 2C/dt in parallel with a
/// history current I_eq = -G_eq * v(n-1) - i(n-1), so that
///   i(n) = G_eq * v(n) + I_eq
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub id: ElementId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub capacitance: f64,

    // State for discrete-time model
    /// Voltage across capacitor at the last committed timestep
    pub v_prev: f64,
    /// Current through capacitor at the last committed timestep
    pub i_prev: f64,
}

impl Capacitor {
    /// Create a new, uncharged capacitor.
    pub fn new(id: ElementId, name: String, nodes: [NodeId; 2], capacitance: f64) -> Self {
        Self {
            id,
            name,
            nodes,
            capacitance,
            v_prev: 0.0,
            i_prev: 0.0,
        }
    }

    /// Get the equivalent conductance for the trapezoidal companion model.
    pub fn conductance(&self, dt: f64) -> f64 {
        2.0 * self.capacitance / dt
    }

    /// Get the history current of the companion model.
    pub fn current_source(&self, dt: f64) -> f64 {
        -self.conductance(dt) * self.v_prev - self.i_prev
    }

    /// Companion current for a given terminal voltage.
    fn current(&self, v: f64, dt: f64) -> f64 {
        self.conductance(dt) * v + self.current_source(dt)
    }

    /// Stamp the companion conductance and its KCL current.
    pub fn stamp(&self, sys: &mut MnaSystem, x: &[f64], dt: f64) {
        let [n1, n2] = self.nodes;
        sys.stamp_conductance(n1, n2, self.conductance(dt));
        sys.stamp_branch_current(n1, n2, self.current(terminal_voltage(self.nodes, x), dt));
    }

    /// Voltage across and companion current through the capacitor.
    pub fn results(&self, x: &[f64], dt: f64) -> (f64, f64) {
        let v = terminal_voltage(self.nodes, x);
        (v, self.current(v, dt))
    }

    /// Commit the converged values of this timestep.
    pub fn update_state(&mut self, v: f64, i: f64) {
        self.v_prev = v;
        self.i_prev = i;
    }
}

/// An inductor component.
///
/// In discrete-time simulation, an inductor is modeled using a companion model.
/// Using the trapezoidal rule:
///   v(n) + v(n-1) = (2L/dt) * (i(n) - i(n-1))
///
/// so the branch obeys v(n) = R_eq * i(n) + V_eq with R_eq = 2L/dt and
/// V_eq = -R_eq * i(n-1) - v(n-1). The branch current is an aux unknown.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub id: ElementId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub inductance: f64,
    pub aux: AuxIndex,

    // State for discrete-time model
    /// Current through inductor at the last committed timestep
    pub i_prev: f64,
    /// Voltage across inductor at the last committed timestep
    pub v_prev: f64,
}

impl Inductor {
    /// Create a new inductor with no initial current.
    pub fn new(
        id: ElementId,
        name: String,
        nodes: [NodeId; 2],
        inductance: f64,
        aux: AuxIndex,
    ) -> Self {
        Self {
            id,
            name,
            nodes,
            inductance,
            aux,
            i_prev: 0.0,
            v_prev: 0.0,
        }
    }

    /// Get the equivalent resistance for the trapezoidal companion model.
    pub fn resistance(&self, dt: f64) -> f64 {
        2.0 * self.inductance / dt
    }

    /// Get the history voltage of the companion model.
    pub fn voltage_source(&self, dt: f64) -> f64 {
        -self.resistance(dt) * self.i_prev - self.v_prev
    }

    /// Stamp the aux coupling and the branch law
    /// `V[n1] - V[n2] - R_eq * i - V_eq = 0`.
    pub fn stamp(&self, sys: &mut MnaSystem, x: &[f64], dt: f64) {
        let [n1, n2] = self.nodes;
        let m = self.aux.index();
        let r_eq = self.resistance(dt);

        sys.stamp_aux_coupling(n1, n2, self.aux);
        sys.add(m, m, -r_eq);

        sys.stamp_branch_current(n1, n2, x[m]);
        sys.add_residual(
            m,
            terminal_voltage(self.nodes, x) - r_eq * x[m] - self.voltage_source(dt),
        );
    }

    /// Voltage across and current through the inductor (its aux unknown).
    pub fn results(&self, x: &[f64]) -> (f64, f64) {
        (terminal_voltage(self.nodes, x), x[self.aux.index()])
    }

    /// Commit the converged values of this timestep.
    pub fn update_state(&mut self, v: f64, i: f64) {
        self.v_prev = v;
        self.i_prev = i;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_resistor_conductance() {
        let r = Resistor::new(ElementId(0), "R1".to_string(), [NodeId(1), NodeId(0)], 1000.0);
        assert!((r.conductance - 0.001).abs() < 1e-10);

        let x = [0.0, 2.0];
        let (v, i) = r.results(&x);
        assert_eq!(v, 2.0);
        assert_abs_diff_eq!(i, 0.002, epsilon = 1e-15);
    }

    #[test]
    fn test_resistor_stamp_residual() {
        let r = Resistor::new(ElementId(0), "R1".to_string(), [NodeId(1), NodeId(2)], 2.0);
        let mut sys = MnaSystem::new(3);
        r.stamp(&mut sys, &[0.0, 3.0, 1.0]);
        // 1 A leaves node 1 and enters node 2
        assert_abs_diff_eq!(sys.residual[1], 1.0);
        assert_abs_diff_eq!(sys.residual[2], -1.0);
        assert_abs_diff_eq!(sys.get(1, 1), 0.5);
        assert_abs_diff_eq!(sys.get(1, 2), -0.5);
    }

    #[test]
    fn test_capacitor_companion_model() {
        let mut c = Capacitor::new(
            ElementId(0),
            "C1".to_string(),
            [NodeId(1), NodeId(0)],
            1e-6, // 1µF
        );
        let dt = 1e-5;
        let g = c.conductance(dt);

        // G_eq = 2C/dt = 2 * 1e-6 / 1e-5 = 0.2 S
        assert!((g - 0.2).abs() < 1e-12);

        // Initial history current should be 0
        assert!((c.current_source(dt)).abs() < 1e-15);

        // Commit 1V, 0.1A
        c.update_state(1.0, 0.1);
        assert_abs_diff_eq!(c.current_source(dt), -0.3, epsilon = 1e-12);

        // Holding the voltage reverses the previous current
        let (_, i) = c.results(&[0.0, 1.0], dt);
        assert_abs_diff_eq!(i, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_inductor_stamp_pattern() {
        let l = Inductor::new(
            ElementId(0),
            "L1".to_string(),
            [NodeId(1), NodeId(0)],
            1e-3,
            AuxIndex(2),
        );
        let dt = 1e-4;
        let mut sys = MnaSystem::new(3);
        l.stamp(&mut sys, &[0.0, 1.0, 0.5], dt);

        assert_eq!(sys.get(1, 2), 1.0);
        assert_eq!(sys.get(0, 2), -1.0);
        assert_eq!(sys.get(2, 1), 1.0);
        assert_eq!(sys.get(2, 0), -1.0);
        assert_abs_diff_eq!(sys.get(2, 2), -20.0, epsilon = 1e-12);

        assert_abs_diff_eq!(sys.residual[1], 0.5);
        // 1 V - 20 Ω * 0.5 A - 0
        assert_abs_diff_eq!(sys.residual[2], -9.0, epsilon = 1e-12);
    }
}
