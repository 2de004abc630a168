//! Node Data Structures
//!
//! A [`GraphNode`] is the client-side rendering model of one unit in the
//! graph. Its `inputs` and `outputs` sequences are ordered, and that order is
//! load-bearing: the remote authority addresses ports by position, while the
//! rendering layer addresses them by handle string. The port resolver maps
//! between the two, so the sequences must reproduce exactly the order the
//! authority last returned.

use serde::{Deserialize, Serialize};

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One input port on a node.
///
/// An input is *literal* when it has no `var` binding: the user can type a
/// value into it. An input with a `var` is addressable by edges; once an edge
/// targets it, the stored `value` is ignored at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPort {
    /// Variable name, used as the handle id by the rendering layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var: Option<String>,
    /// Literal value, editable while the port is not linked.
    #[serde(default)]
    pub value: String,
}

impl InputPort {
    /// Create a named (linkable) input with an empty value.
    pub fn named(var: impl Into<String>) -> Self {
        Self {
            var: Some(var.into()),
            value: String::new(),
        }
    }

    /// Create a literal input carrying a value.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            var: None,
            value: value.into(),
        }
    }

    /// Handle id as seen by the rendering layer (`var`, defaulting to "").
    pub fn handle(&self) -> &str {
        self.var.as_deref().unwrap_or("")
    }
}

/// One output port on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPort {
    /// Handle id used by the rendering layer.
    pub id: String,
    /// Display label.
    pub label: String,
}

impl OutputPort {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Output identified by a bare name: handle and label are the same string.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            id: name,
        }
    }
}

/// A node as held by the graph model store.
///
/// The `id` is authority-assigned and unique within a project. `inputs` and
/// `outputs` keep the authority's ordering (see module docs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub inputs: Vec<InputPort>,
    pub outputs: Vec<OutputPort>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}
