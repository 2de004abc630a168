//! Port Index Resolution
//!
//! The rendering layer addresses ports by handle string (an output's `id`, an
//! input's `var`); the authority addresses them by zero-based position within
//! the node's ordered port sequences. These pure functions map between the
//! two against a node taken from the *current* store contents - resolving
//! against a stale snapshot is wrong, because port order can change between
//! loads.

use std::fmt;

use crate::models::GraphNode;
use crate::services::error::GraphSyncError;

/// Which side of an edge a handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    /// An output handle (edge origin).
    Source,
    /// An input handle (edge destination).
    Target,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Map a handle id to its positional port index on `node`.
///
/// Fails with [`GraphSyncError::PortNotFound`] when no port matches; callers
/// must treat that as fatal for the attempted mutation and never hand the
/// authority an out-of-band index.
pub fn resolve_port(
    node: &GraphNode,
    handle: &str,
    direction: PortDirection,
) -> Result<usize, GraphSyncError> {
    let index = match direction {
        PortDirection::Source => node.outputs.iter().position(|out| out.id == handle),
        PortDirection::Target => node.inputs.iter().position(|inp| inp.handle() == handle),
    };

    index.ok_or_else(|| GraphSyncError::port_not_found(&node.id, handle, direction))
}

/// Reverse mapping: the handle id at a positional port index, or `None` when
/// the index is outside the node's port sequence.
pub fn handle_for_port(node: &GraphNode, index: usize, direction: PortDirection) -> Option<String> {
    match direction {
        PortDirection::Source => node.outputs.get(index).map(|out| out.id.clone()),
        PortDirection::Target => node.inputs.get(index).map(|inp| inp.handle().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InputPort, OutputPort, Position};

    fn add_node() -> GraphNode {
        let mut node = GraphNode::new("node_1", "add_node", Position::default());
        node.inputs = vec![
            InputPort::named("a"),
            InputPort::named("b"),
            InputPort::literal("1"),
        ];
        node.outputs = vec![OutputPort::named("sum"), OutputPort::new("out_2", "Carry")];
        node
    }

    #[test]
    fn resolves_outputs_by_id() {
        let node = add_node();
        assert_eq!(resolve_port(&node, "sum", PortDirection::Source).unwrap(), 0);
        assert_eq!(
            resolve_port(&node, "out_2", PortDirection::Source).unwrap(),
            1
        );
    }

    #[test]
    fn resolves_inputs_by_var() {
        let node = add_node();
        assert_eq!(resolve_port(&node, "a", PortDirection::Target).unwrap(), 0);
        assert_eq!(resolve_port(&node, "b", PortDirection::Target).unwrap(), 1);
        // Literal inputs answer to the empty handle.
        assert_eq!(resolve_port(&node, "", PortDirection::Target).unwrap(), 2);
    }

    #[test]
    fn unknown_handle_is_port_not_found() {
        let node = add_node();
        let err = resolve_port(&node, "sum", PortDirection::Target).unwrap_err();
        match err {
            GraphSyncError::PortNotFound {
                node_id,
                handle,
                direction,
            } => {
                assert_eq!(node_id, "node_1");
                assert_eq!(handle, "sum");
                assert_eq!(direction, PortDirection::Target);
            }
            other => panic!("expected PortNotFound, got {other:?}"),
        }
    }

    #[test]
    fn handle_for_port_round_trips() {
        let node = add_node();
        for (index, _) in node.outputs.iter().enumerate() {
            let handle = handle_for_port(&node, index, PortDirection::Source).unwrap();
            assert_eq!(
                resolve_port(&node, &handle, PortDirection::Source).unwrap(),
                index
            );
        }
        assert_eq!(handle_for_port(&node, 9, PortDirection::Source), None);
        assert_eq!(
            handle_for_port(&node, 2, PortDirection::Target).as_deref(),
            Some("")
        );
    }
}
