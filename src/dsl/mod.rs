//! Netlist parser for circuit descriptions.
//!
//! The netlist is line-oriented, one element per line.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | directive | element | empty
//! comment     = '*' { any_char }
//! directive   = '.' { any_char }                 (ignored)
//! element     = name node node value { value }
//!
//! name        = type identifier
//! type        = 'R' | 'C' | 'L' | 'V' | 'W'      (case-insensitive)
//! node        = identifier | "0"
//! value       = number [unit_suffix] | "SIN(" number number number ")"
//! ```
//!
//! Lines with fewer than four fields are skipped. Value tokens are joined
//! back with single spaces, so `SIN(0 5 60)` reaches the waveform
//! compiler intact.
//!
//! # Element Types
//!
//! | Type | Description | Syntax |
//! |------|-------------|--------|
//! | R | Resistor | `R<name> <n1> <n2> <ohms>` |
//! | W | Wire (resistor alias) | `W<name> <n1> <n2> <ohms>` |
//! | C | Capacitor | `C<name> <n1> <n2> <farads>` |
//! | L | Inductor | `L<name> <n1> <n2> <henries>` |
//! | V | Voltage Source | `V<name> <n+> <n-> <volts or SIN(V0 VP F)>` |
//!
//! # Example
//!
//! ```text
//! * RC low-pass
//! V1 in  0   SIN(0 1 1k)
//! R1 in  out 1k
//! C1 out 0   100n
//! ```

mod ast;
mod parser;
mod value;

pub use ast::*;
pub use parser::Parser;
pub use value::parse_value;

use crate::circuit::{Circuit, CircuitBuilder};
use crate::error::{Result, SolverError};

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<NetlistAst> {
    Parser::new(input).parse()
}

/// Parse a netlist file.
pub fn parse_file(path: &std::path::Path) -> Result<NetlistAst> {
    let content = std::fs::read_to_string(path).map_err(|e| SolverError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

/// Build a circuit from a parsed netlist.
pub fn build_circuit(ast: &NetlistAst) -> Result<Circuit> {
    let mut builder = CircuitBuilder::new();
    for def in &ast.elements {
        builder
            .add_element(
                def.kind,
                &def.name,
                &def.nodes[0],
                &def.nodes[1],
                def.value.as_str(),
            )
            .map_err(|e| SolverError::at_line(def.line, e))?;
    }
    Ok(builder.build())
}

/// Parse and build a circuit from netlist text.
pub fn load(input: &str) -> Result<Circuit> {
    build_circuit(&parse(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Element;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_load_and_simulate_divider() {
        let netlist = "\
* divider
V1 in 0 10
R1 in mid 1k
W1 mid 0 1000
";
        let circuit = load(netlist).unwrap();
        assert_eq!(circuit.elements.len(), 3);

        let results = circuit.run_transient(0.01, 0.01 / 1000.0).unwrap();
        assert_eq!(results.time.len(), 1001);
        for &v in &results.get("W1").unwrap().v {
            assert_abs_diff_eq!(v, 5.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sine_source_from_netlist() {
        let circuit = load("V1 a 0 sin(1 2 50)\nR1 a 0 1k").unwrap();
        match &circuit.elements[0] {
            Element::VoltageSource(v) => {
                assert_abs_diff_eq!(v.voltage(0.005), 3.0, epsilon = 1e-12);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_non_numeric_resistor_is_fatal() {
        let err = load("* header
R1 a 0 big").unwrap_err();
        match &err {
            SolverError::ParseError { line, source } => {
                assert_eq!(*line, 2);
                assert!(matches!(**source, SolverError::InvalidValue { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            err.to_string(),
            "Parse error at line 2: Invalid value 'big' for component 'R1'"
        );
    }

    #[test]
    fn test_duplicate_name_reports_line() {
        let err = load("R1 a 0 1k
C1 a 0 1u
R1 a 0 2k").unwrap_err();
        match err {
            SolverError::ParseError { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(*source, SolverError::DuplicateComponent { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
