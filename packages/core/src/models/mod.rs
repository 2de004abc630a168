//! Graph Data Structures
//!
//! This module defines the client-side graph model and the wire shapes the
//! remote authority speaks:
//!
//! - [`GraphNode`], [`InputPort`], [`OutputPort`] - the locally rendered node model
//! - [`Edge`] - a directed link between two ports, keyed by handle strings
//! - [`GraphSnapshot`] - the authoritative `{nodes, connections}` wire payload
//! - [`StartupData`] - node-type library and project index from `/startup`
//! - [`LogEntry`] - execution log records for the logs panel

pub mod edge;
pub mod logs;
pub mod node;
pub mod snapshot;
pub mod startup;

pub use edge::Edge;
pub use logs::LogEntry;
pub use node::{GraphNode, InputPort, OutputPort, Position};
pub use snapshot::{GraphDocument, GraphSnapshot, WireConnection, WireNode, WireOutput};
pub use startup::{NodeTemplate, ProjectEntry, StartupData};
