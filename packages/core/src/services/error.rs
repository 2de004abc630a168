//! Synchronization Error Types
//!
//! One taxonomy for everything that can go wrong between a user gesture and
//! the authority's reply. A `PortNotFound` is fatal to the single mutation
//! that hit it, never to the session; `RemoteCallFailed` and
//! `MalformedResponse` drive the dispatcher's rollback rules.

use thiserror::Error;

use crate::remote::RemoteError;
use crate::services::port_resolver::PortDirection;

/// Errors produced by the graph synchronization services.
#[derive(Error, Debug)]
pub enum GraphSyncError {
    /// The resolver cannot map a handle id to a positional port index.
    #[error("No {direction} port '{handle}' on node {node_id}")]
    PortNotFound {
        node_id: String,
        handle: String,
        direction: PortDirection,
    },

    /// The authority call failed - transport error or explicit rejection.
    #[error("Remote command '{command}' failed: {message}")]
    RemoteCallFailed { command: String, message: String },

    /// The authority replied but the payload is missing expected fields.
    /// Treated exactly like `RemoteCallFailed` for rollback purposes.
    #[error("Malformed response for '{command}': {context}")]
    MalformedResponse { command: String, context: String },

    /// Referenced node is not in the store.
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Input index is outside the node's port sequence.
    #[error("Input index {index} out of range for node {node_id}")]
    InputOutOfRange { node_id: String, index: usize },

    /// The input port is bound to an edge; its literal value is read-only.
    #[error("Input {index} of node {node_id} is linked and read-only")]
    InputLinked { node_id: String, index: usize },
}

impl GraphSyncError {
    /// Create a port-not-found error.
    pub fn port_not_found(
        node_id: impl Into<String>,
        handle: impl Into<String>,
        direction: PortDirection,
    ) -> Self {
        Self::PortNotFound {
            node_id: node_id.into(),
            handle: handle.into(),
            direction,
        }
    }

    /// Create a node-not-found error.
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Attribute a boundary failure to the command that caused it.
    ///
    /// Authority rejections and transport errors become `RemoteCallFailed`;
    /// structurally broken replies become `MalformedResponse`.
    pub fn remote(command: impl Into<String>, err: RemoteError) -> Self {
        let command = command.into();
        match err {
            RemoteError::Malformed { context, .. } => Self::MalformedResponse { command, context },
            RemoteError::Rejected { message, .. } => Self::RemoteCallFailed { command, message },
            other => Self::RemoteCallFailed {
                command,
                message: other.to_string(),
            },
        }
    }
}
