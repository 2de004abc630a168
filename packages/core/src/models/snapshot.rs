//! Authority Wire Shapes
//!
//! The remote authority returns the full graph as
//! `{graph: {nodes, connections}}`. These types mirror that payload exactly
//! and convert into the local model ([`GraphNode`] / edge endpoints).
//!
//! The `output` entries of a wire node appear in two historical forms: a bare
//! string (the output name doubles as handle id and label) or an object
//! `{id, label}`. Both are accepted; the distinction disappears at the
//! conversion boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::node::{GraphNode, InputPort, OutputPort, Position};

/// One output port as returned by the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireOutput {
    /// Bare output name, e.g. `"sum"`.
    Name(String),
    /// Explicit form with separate handle id and label.
    Detailed {
        id: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl From<WireOutput> for OutputPort {
    fn from(wire: WireOutput) -> Self {
        match wire {
            WireOutput::Name(name) => OutputPort::named(name),
            WireOutput::Detailed { id, label } => {
                let label = label.unwrap_or_else(|| id.clone());
                OutputPort::new(id, label)
            }
        }
    }
}

/// A node as returned by the authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNode {
    pub node_id: String,
    #[serde(default)]
    pub name: String,
    /// Absent for nodes that have never been placed; defaults to the origin.
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub input: Vec<InputPort>,
    #[serde(default)]
    pub output: Vec<WireOutput>,
}

impl From<WireNode> for GraphNode {
    fn from(wire: WireNode) -> Self {
        GraphNode {
            id: wire.node_id,
            name: wire.name,
            position: wire.position.unwrap_or_default(),
            inputs: wire.input,
            outputs: wire.output.into_iter().map(OutputPort::from).collect(),
        }
    }
}

/// A connection as returned by the authority. Ports are positional indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConnection {
    /// Not every authority iteration assigns connection ids; absent ones get
    /// a synthetic id derived from the endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    pub source_node_id: String,
    pub source_port: usize,
    pub target_node_id: String,
    pub target_port: usize,
}

impl WireConnection {
    /// Stable edge id: the authority's own id when present, otherwise a
    /// synthetic one derived from the four-tuple (stable across reloads).
    pub fn edge_id(&self) -> String {
        match &self.connection_id {
            Some(id) => id.clone(),
            None => format!(
                "e-{}.{}-{}.{}",
                self.source_node_id, self.source_port, self.target_node_id, self.target_port
            ),
        }
    }
}

/// The full `{nodes, connections}` set held by the authority.
///
/// Always treated as canonical: reconciliation replaces local state with it
/// wholesale, never merges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<WireNode>,
    #[serde(default)]
    pub connections: Vec<WireConnection>,
}

/// Reply envelope of the snapshot query: graph content plus opaque project
/// metadata the client passes through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub metadata: Value,
    pub graph: GraphSnapshot,
}
