//! Parsed netlist representation.

use crate::components::ElementKind;

/// Complete representation of a parsed netlist.
#[derive(Debug, Clone, Default)]
pub struct NetlistAst {
    /// Element lines in file order
    pub elements: Vec<ElementDef>,
}

impl NetlistAst {
    /// Create a new empty netlist.
    pub fn new() -> Self {
        Self::default()
    }
}

/// One element line: `<Name> <Node1> <Node2> <Value...>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    /// Element kind selected by the first letter of the name
    pub kind: ElementKind,
    /// Name as written (a `W` wire keeps its `W` name)
    pub name: String,
    /// Terminal node names
    pub nodes: [String; 2],
    /// Remaining tokens joined by single spaces
    pub value: String,
    /// Source line number for error reporting
    pub line: usize,
}
