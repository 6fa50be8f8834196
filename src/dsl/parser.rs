//! Parser for the netlist line grammar.

use tracing::{debug, warn};

use super::ast::{ElementDef, NetlistAst};
use crate::components::ElementKind;
use crate::error::{Result, SolverError};

/// Line-oriented netlist parser.
pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given netlist text.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parse the entire netlist.
    pub fn parse(&self) -> Result<NetlistAst> {
        let mut ast = NetlistAst::new();

        for (idx, raw) in self.input.lines().enumerate() {
            let line = idx + 1;
            let text = raw.trim();

            // Skip empty lines and comments
            if text.is_empty() || text.starts_with('*') {
                continue;
            }

            if text.starts_with('.') {
                debug!(line, directive = %text, "ignoring directive");
                continue;
            }

            if let Some(def) = self.parse_element(text, line)? {
                ast.elements.push(def);
            }
        }

        Ok(ast)
    }

    fn parse_element(&self, text: &str, line: usize) -> Result<Option<ElementDef>> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < 4 {
            warn!(line, text, "skipping line with fewer than 4 fields");
            return Ok(None);
        }

        let name = tokens[0];
        let kind = name
            .chars()
            .next()
            .and_then(ElementKind::from_tag)
            .ok_or_else(|| SolverError::UnknownComponentType {
                component_type: name.to_string(),
                line,
            })?;

        Ok(Some(ElementDef {
            kind,
            name: name.to_string(),
            nodes: [tokens[1].to_string(), tokens[2].to_string()],
            value: tokens[3..].join(" "),
            line,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resistor() {
        let ast = super::super::parse("R1 in out 10k").unwrap();
        assert_eq!(ast.elements.len(), 1);
        let def = &ast.elements[0];
        assert_eq!(def.kind, ElementKind::Resistor);
        assert_eq!(def.name, "R1");
        assert_eq!(def.nodes, ["in".to_string(), "out".to_string()]);
        assert_eq!(def.value, "10k");
        assert_eq!(def.line, 1);
    }

    #[test]
    fn test_parse_with_comments_and_directives() {
        let input = "* RC low-pass\n\nV1 in 0 5\n.tran 1u 1m\nR1 in out 1k\nC1 out 0 100n\n.end\n";
        let ast = super::super::parse(input).unwrap();
        let names: Vec<&str> = ast.elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["V1", "R1", "C1"]);
        assert_eq!(ast.elements[2].line, 6);
    }

    #[test]
    fn test_sine_value_tokens_are_joined() {
        let ast = super::super::parse("V1 in 0 SIN(0   5 60)").unwrap();
        assert_eq!(ast.elements[0].kind, ElementKind::VoltageSource);
        assert_eq!(ast.elements[0].value, "SIN(0 5 60)");
    }

    #[test]
    fn test_wire_is_resistor_with_original_name() {
        let ast = super::super::parse("W1 a b 1e-3").unwrap();
        assert_eq!(ast.elements[0].kind, ElementKind::Resistor);
        assert_eq!(ast.elements[0].name, "W1");
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let ast = super::super::parse("R1 a b\nR2 a 0 1k").unwrap();
        assert_eq!(ast.elements.len(), 1);
        assert_eq!(ast.elements[0].name, "R2");
    }

    #[test]
    fn test_unknown_component_type() {
        let err = super::super::parse("R1 a 0 1k\nD1 a 0 model").unwrap_err();
        match err {
            SolverError::UnknownComponentType {
                component_type,
                line,
            } => {
                assert_eq!(component_type, "D1");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
