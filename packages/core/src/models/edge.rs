//! Edge Data Structures

use serde::{Deserialize, Serialize};

/// A directed link from one node's output port to another node's input port.
///
/// Edges are keyed by the handle strings the rendering layer uses
/// (`source_handle` is an output id, `target_handle` an input `var`). The
/// positional port indices the authority expects are never cached here: they
/// are re-derived from the current store contents at mutation time, because
/// port order can change between reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Authority-assigned id, or a temporary client id until the next
    /// reconciliation.
    pub id: String,
    /// Id of the node the edge originates from.
    pub source: String,
    /// Output handle on the source node.
    pub source_handle: String,
    /// Id of the node the edge points at.
    pub target: String,
    /// Input handle on the target node.
    pub target_handle: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }
}
