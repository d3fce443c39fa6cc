//! DOT format export for Graphviz visualization.
//!
//! Renders the subgraph induced by a [`SymbolSet`]: its members as nodes and
//! every call between two members as an edge. Calls leaving the set are
//! omitted.

use crate::graph::Symbol;
use crate::set::SymbolSet;
use log::debug;

/// Options for styling DOT export
#[derive(Debug, Clone)]
pub struct DotOptions {
    /// Fill color of external functions (hex color code)
    pub extern_color: String,
    /// Fill color of file-local functions
    pub static_color: String,
    /// Fill color of variables, regardless of linkage
    pub variable_color: String,
    /// Graph layout direction: LR, TB, RL, BT
    pub rankdir: String,
    /// Append `file:line` to node labels
    pub show_location: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        DotOptions {
            extern_color: "#90CAF9".to_string(),
            static_color: "#FFE082".to_string(),
            variable_color: "#CE93D8".to_string(),
            rankdir: "LR".to_string(),
            show_location: false,
        }
    }
}

impl DotOptions {
    /// Set the layout direction
    pub fn with_rankdir(mut self, rankdir: impl Into<String>) -> Self {
        self.rankdir = rankdir.into();
        self
    }

    /// Show `file:line` under each name
    pub fn with_location(mut self, show_location: bool) -> Self {
        self.show_location = show_location;
        self
    }

    fn color_of(&self, symbol: &Symbol) -> &str {
        if symbol.is_variable {
            &self.variable_color
        } else if symbol.is_static {
            &self.static_color
        } else {
            &self.extern_color
        }
    }
}

/// Export the subgraph induced by `set` to Graphviz DOT format
pub fn export_dot(set: &SymbolSet<'_>) -> String {
    export_dot_styled(set, &DotOptions::default())
}

/// Export the subgraph induced by `set` with custom styling
pub fn export_dot_styled(set: &SymbolSet<'_>, options: &DotOptions) -> String {
    let graph = set.graph();
    let mut output = String::new();

    output.push_str("digraph call_graph {\n");
    output.push_str(&format!("    rankdir={};\n", options.rankdir));
    output.push_str("    node [style=filled];\n\n");

    for symbol in set {
        let mut label = escape_dot_label(&symbol.name);
        if options.show_location {
            label.push_str(&format!(
                "\\n{}:{}",
                escape_dot_label(&symbol.file),
                symbol.line
            ));
        }
        let shape = if symbol.is_variable { "ellipse" } else { "box" };
        let style = if symbol.is_declaration {
            ", style=\"filled,dashed\""
        } else {
            ""
        };
        output.push_str(&format!(
            "    n{} [label=\"{label}\", shape={shape}, fillcolor=\"{}\"{style}];\n",
            symbol.id.index(),
            options.color_of(symbol)
        ));
    }

    output.push('\n');

    let mut edges = 0usize;
    for caller in set {
        for callee in graph.callees_of(caller).filter(|callee| set.contains(callee)) {
            output.push_str(&format!(
                "    n{} -> n{};\n",
                caller.id.index(),
                callee.id.index()
            ));
            edges += 1;
        }
    }

    output.push_str("}\n");
    debug!("Exported {} nodes and {edges} edges to DOT", set.len());

    output
}

/// Escape special characters for DOT labels
fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
