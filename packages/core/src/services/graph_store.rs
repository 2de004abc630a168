//! Graph Model Store
//!
//! The single local source of UI truth between reconciliations. The store
//! exclusively owns the node and edge collections; every mutation goes
//! through its accessors so all observers (canvas, side panels) see
//! consistent transitions, and `replace` swaps both collections under one
//! write guard - subscribers observe either the old graph or the fully-new
//! one, never a partial mix.
//!
//! Mutations are broadcast as [`GraphEvent`]s; observers that lag simply miss
//! events and re-read the current state, which is all the UI tracks anyway.

use tokio::sync::{broadcast, RwLock};
use tracing::warn;

use crate::models::{Edge, GraphNode, GraphSnapshot, Position};
use crate::services::error::GraphSyncError;
use crate::services::port_resolver::{handle_for_port, PortDirection};

/// Broadcast capacity for graph events. Bursts larger than this (bulk edge
/// deletions) drop oldest-first; observers recover by re-reading the store.
const GRAPH_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Change notifications emitted by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// The whole graph was replaced (reconciliation or project switch).
    Replaced,
    NodeUpserted { id: String },
    NodeRemoved { id: String },
    NodeMoved { id: String },
    InputValueChanged { node_id: String, index: usize },
    EdgeUpserted { id: String },
    EdgeRemoved { id: String },
    /// A temporary edge id was swapped for the authority-assigned one.
    EdgeRenamed { old_id: String, new_id: String },
}

#[derive(Debug, Default)]
struct GraphState {
    nodes: Vec<GraphNode>,
    edges: Vec<Edge>,
}

/// In-memory graph model store.
pub struct GraphStore {
    state: RwLock<GraphState>,
    events: broadcast::Sender<GraphEvent>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(GRAPH_EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(GraphState::default()),
            events,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<GraphEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: GraphEvent) {
        // A send error only means nobody is listening right now.
        let _ = self.events.send(event);
    }

    // --- Read accessors --------------------------------------------------

    pub async fn node(&self, id: &str) -> Option<GraphNode> {
        let state = self.state.read().await;
        state.nodes.iter().find(|n| n.id == id).cloned()
    }

    pub async fn nodes(&self) -> Vec<GraphNode> {
        self.state.read().await.nodes.clone()
    }

    pub async fn edge(&self, id: &str) -> Option<Edge> {
        let state = self.state.read().await;
        state.edges.iter().find(|e| e.id == id).cloned()
    }

    pub async fn edges(&self) -> Vec<Edge> {
        self.state.read().await.edges.clone()
    }

    /// Whether the input at `index` on `node_id` is currently bound to an
    /// edge. Linked inputs are read-only in the editor.
    pub async fn is_input_linked(
        &self,
        node_id: &str,
        index: usize,
    ) -> Result<bool, GraphSyncError> {
        let state = self.state.read().await;
        let node = state
            .nodes
            .iter()
            .find(|n| n.id == node_id)
            .ok_or_else(|| GraphSyncError::node_not_found(node_id))?;
        let input = node
            .inputs
            .get(index)
            .ok_or(GraphSyncError::InputOutOfRange {
                node_id: node_id.to_string(),
                index,
            })?;

        let handle = input.handle();
        Ok(state
            .edges
            .iter()
            .any(|e| e.target == node_id && e.target_handle == handle))
    }

    // --- Wholesale replacement -------------------------------------------

    /// Replace the entire graph. Atomic from the consumers' perspective.
    pub async fn replace(&self, nodes: Vec<GraphNode>, edges: Vec<Edge>) {
        {
            let mut state = self.state.write().await;
            state.nodes = nodes;
            state.edges = edges;
        }
        self.emit(GraphEvent::Replaced);
    }

    /// Convert an authoritative snapshot into the local model and replace the
    /// store with it.
    ///
    /// Positional connection indices are turned back into handle strings
    /// against the nodes of the same snapshot. A connection referencing an
    /// out-of-range port is dropped with a warning - the authority's own
    /// state is inconsistent there and rendering a dangling edge helps
    /// nobody.
    pub async fn load_snapshot(&self, snapshot: GraphSnapshot) {
        let nodes: Vec<GraphNode> = snapshot.nodes.into_iter().map(GraphNode::from).collect();

        let mut edges = Vec::with_capacity(snapshot.connections.len());
        for conn in snapshot.connections {
            let source_handle = nodes
                .iter()
                .find(|n| n.id == conn.source_node_id)
                .and_then(|n| handle_for_port(n, conn.source_port, PortDirection::Source));
            let target_handle = nodes
                .iter()
                .find(|n| n.id == conn.target_node_id)
                .and_then(|n| handle_for_port(n, conn.target_port, PortDirection::Target));

            match (source_handle, target_handle) {
                (Some(source_handle), Some(target_handle)) => edges.push(Edge {
                    id: conn.edge_id(),
                    source: conn.source_node_id,
                    source_handle,
                    target: conn.target_node_id,
                    target_handle,
                }),
                _ => warn!(
                    source = %conn.source_node_id,
                    source_port = conn.source_port,
                    target = %conn.target_node_id,
                    target_port = conn.target_port,
                    "snapshot connection references unknown node or port, dropping"
                ),
            }
        }

        self.replace(nodes, edges).await;
    }

    // --- Node mutations ---------------------------------------------------

    /// Insert a node, or overwrite the one with the same id.
    pub async fn upsert_node(&self, node: GraphNode) {
        let id = node.id.clone();
        {
            let mut state = self.state.write().await;
            match state.nodes.iter_mut().find(|n| n.id == node.id) {
                Some(existing) => *existing = node,
                None => state.nodes.push(node),
            }
        }
        self.emit(GraphEvent::NodeUpserted { id });
    }

    /// Remove a node by id. Removing an absent id is a no-op, not an error.
    ///
    /// Incident edges are left alone: the authority owns edge cleanup and
    /// the next reconciliation reflects its resulting edge set.
    pub async fn remove_node(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            let before = state.nodes.len();
            state.nodes.retain(|n| n.id != id);
            state.nodes.len() != before
        };
        if removed {
            self.emit(GraphEvent::NodeRemoved { id: id.to_string() });
        }
        removed
    }

    /// Update a node's canvas position. Returns false for unknown ids.
    pub async fn set_node_position(&self, id: &str, position: Position) -> bool {
        let moved = {
            let mut state = self.state.write().await;
            match state.nodes.iter_mut().find(|n| n.id == id) {
                Some(node) => {
                    node.position = position;
                    true
                }
                None => false,
            }
        };
        if moved {
            self.emit(GraphEvent::NodeMoved { id: id.to_string() });
        }
        moved
    }

    /// Set the literal value of one input port.
    pub async fn set_input_value(
        &self,
        node_id: &str,
        index: usize,
        value: &str,
    ) -> Result<(), GraphSyncError> {
        {
            let mut state = self.state.write().await;
            let node = state
                .nodes
                .iter_mut()
                .find(|n| n.id == node_id)
                .ok_or_else(|| GraphSyncError::node_not_found(node_id))?;
            let input = node
                .inputs
                .get_mut(index)
                .ok_or(GraphSyncError::InputOutOfRange {
                    node_id: node_id.to_string(),
                    index,
                })?;
            input.value = value.to_string();
        }
        self.emit(GraphEvent::InputValueChanged {
            node_id: node_id.to_string(),
            index,
        });
        Ok(())
    }

    // --- Edge mutations ---------------------------------------------------

    /// Insert an edge, or overwrite the one with the same id.
    pub async fn upsert_edge(&self, edge: Edge) {
        let id = edge.id.clone();
        {
            let mut state = self.state.write().await;
            match state.edges.iter_mut().find(|e| e.id == edge.id) {
                Some(existing) => *existing = edge,
                None => state.edges.push(edge),
            }
        }
        self.emit(GraphEvent::EdgeUpserted { id });
    }

    /// Remove an edge by id. Removing an absent id is a no-op.
    pub async fn remove_edge(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            let before = state.edges.len();
            state.edges.retain(|e| e.id != id);
            state.edges.len() != before
        };
        if removed {
            self.emit(GraphEvent::EdgeRemoved { id: id.to_string() });
        }
        removed
    }

    /// Swap an edge's temporary client id for the authority-assigned one.
    pub async fn rename_edge(&self, old_id: &str, new_id: &str) -> bool {
        let renamed = {
            let mut state = self.state.write().await;
            match state.edges.iter_mut().find(|e| e.id == old_id) {
                Some(edge) => {
                    edge.id = new_id.to_string();
                    true
                }
                None => false,
            }
        };
        if renamed {
            self.emit(GraphEvent::EdgeRenamed {
                old_id: old_id.to_string(),
                new_id: new_id.to_string(),
            });
        }
        renamed
    }
}
