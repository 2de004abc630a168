//! Mutation Dispatcher
//!
//! Translates user gestures into authority commands, one operation per
//! gesture, all following the same optimistic pattern: apply the local effect
//! to the [`GraphStore`] immediately, issue the remote call, then either keep
//! the optimistic state (reconciling authority-assigned ids where they
//! exist) or undo exactly the local effect that was applied.
//!
//! Rollback rules differ per operation:
//!
//! - `add_node` is authority-first: a node of unknown port shape must never
//!   enter the store, so the local insert waits for the authority's node
//!   payload.
//! - `connect` rolls back its temporary edge on any failure.
//! - `move_node`, `delete_node` and `disconnect` are best-effort forward:
//!   the local state stands, the failure is returned and logged, and the next
//!   reconciliation is the tie-breaker of record.
//!
//! All failures come back as explicit [`GraphSyncError`] values - nothing in
//! this module fires a call whose outcome is dropped on the floor.

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{Edge, GraphNode, Position, WireConnection};
use crate::remote::AuthorityClient;
use crate::services::error::GraphSyncError;
use crate::services::graph_store::GraphStore;
use crate::services::port_resolver::{resolve_port, PortDirection};

/// A connect gesture as the rendering layer reports it: node ids plus the
/// symbolic handle ids of the two ports being wired together.
#[derive(Debug, Clone)]
pub struct ConnectGesture {
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
}

/// Issues remote mutations and keeps the store optimistically in sync.
pub struct MutationDispatcher {
    store: Arc<GraphStore>,
    client: AuthorityClient,
}

impl MutationDispatcher {
    pub fn new(store: Arc<GraphStore>, client: AuthorityClient) -> Self {
        Self { store, client }
    }

    /// Drop gesture: create a node of `node_type` at a canvas position.
    ///
    /// The authority resolves the node's port shape from its template; if the
    /// reply is not a well-formed node payload the operation is abandoned and
    /// no local node is added - the resolver could never operate on a node
    /// whose ports are unknown.
    pub async fn add_node(
        &self,
        node_type: &str,
        position: Position,
    ) -> Result<GraphNode, GraphSyncError> {
        let wire = self
            .client
            .node_add(node_type, position.x, position.y)
            .await
            .map_err(|err| {
                error!(node_type, error = %err, "node_add abandoned");
                GraphSyncError::remote("node_add", err)
            })?;

        let mut node = GraphNode::from(wire);
        // Older authority iterations ignore the drop coordinates and place
        // the node themselves; the gesture position wins visually.
        if node.position == Position::default() {
            node.position = position;
        }

        info!(node_id = %node.id, node_type, "node added");
        self.store.upsert_node(node.clone()).await;
        Ok(node)
    }

    /// Drag-stop gesture: persist a node position the UI already shows.
    ///
    /// Fire-and-forget semantics: the local position is kept even when the
    /// remote call fails - re-snapping a node the user just placed would be
    /// jarring, and the next reconciliation corrects any drift.
    pub async fn move_node(
        &self,
        node_id: &str,
        position: Position,
    ) -> Result<(), GraphSyncError> {
        if !self.store.set_node_position(node_id, position).await {
            return Err(GraphSyncError::node_not_found(node_id));
        }

        self.client
            .node_move(node_id, position.x, position.y)
            .await
            .map_err(|err| {
                warn!(node_id, error = %err, "node_move failed, position drifts until next refresh");
                GraphSyncError::remote("node_move", err)
            })
    }

    /// Delete gesture: remove a node locally, then remotely.
    ///
    /// Best-effort forward progress: a failed remote delete does not restore
    /// the node - if the delete truly failed server-side, the next
    /// reconciliation brings it back. Incident edges are the authority's to
    /// clean up.
    pub async fn delete_node(&self, node_id: &str) -> Result<(), GraphSyncError> {
        self.store.remove_node(node_id).await;

        self.client.node_delete(node_id).await.map_err(|err| {
            warn!(node_id, error = %err, "node_delete failed, next refresh decides");
            GraphSyncError::remote("node_delete", err)
        })
    }

    /// Commit a literal input value: store first, then the remote update.
    ///
    /// Store-side failures (unknown node, index out of range) abort before
    /// any remote call. A remote failure leaves the local value in place; the
    /// edit drifts until the next reconciliation.
    pub async fn update_input(
        &self,
        node_id: &str,
        input_index: usize,
        value: &str,
    ) -> Result<(), GraphSyncError> {
        self.store
            .set_input_value(node_id, input_index, value)
            .await?;

        self.client
            .node_update_input(node_id, input_index, value)
            .await
            .map_err(|err| {
                warn!(node_id, input_index, error = %err, "node_update_input failed");
                GraphSyncError::remote("node_update_input", err)
            })
    }

    /// Connect gesture: wire an output handle to an input handle.
    ///
    /// A temporary edge is applied optimistically, then both endpoints are
    /// resolved to positional indices against the current store. Resolution
    /// failure removes the edge without any remote call; remote failure
    /// removes the edge after the fact. On success the temporary id is
    /// swapped for the authority's id when the reply carries one, and
    /// otherwise persists until the next reconciliation.
    pub async fn connect(&self, gesture: ConnectGesture) -> Result<String, GraphSyncError> {
        let temp_id = format!("tmp-{}", Uuid::new_v4());
        self.store
            .upsert_edge(Edge::new(
                &temp_id,
                &gesture.source,
                &gesture.source_handle,
                &gesture.target,
                &gesture.target_handle,
            ))
            .await;

        let connection = match self.resolve_endpoints(&gesture).await {
            Ok(connection) => connection,
            Err(err) => {
                error!(error = %err, "connect gesture unresolvable, rolling back");
                self.store.remove_edge(&temp_id).await;
                return Err(err);
            }
        };

        match self.client.connection_add(&connection).await {
            Ok(Some(authority_id)) => {
                self.store.rename_edge(&temp_id, &authority_id).await;
                Ok(authority_id)
            }
            Ok(None) => Ok(temp_id),
            Err(err) => {
                warn!(error = %err, "connection_add failed, rolling back");
                self.store.remove_edge(&temp_id).await;
                Err(GraphSyncError::remote("connection_add", err))
            }
        }
    }

    /// Edge-removal gesture, explicit or part of a UI-driven batch.
    ///
    /// Endpoint indices are re-resolved from the current store rather than
    /// trusted from the edge, because the node may have been edited
    /// server-side since the last load. The local removal always proceeds -
    /// a broken reference is not worth blocking the UI over - but an
    /// unresolvable edge skips the remote call and reports why.
    pub async fn disconnect(&self, edge_id: &str) -> Result<(), GraphSyncError> {
        let Some(edge) = self.store.edge(edge_id).await else {
            // Already gone; removing an absent edge is a no-op.
            return Ok(());
        };

        let resolved = self
            .resolve_endpoints(&ConnectGesture {
                source: edge.source.clone(),
                source_handle: edge.source_handle.clone(),
                target: edge.target.clone(),
                target_handle: edge.target_handle.clone(),
            })
            .await;

        self.store.remove_edge(edge_id).await;

        let connection = match resolved {
            Ok(connection) => connection,
            Err(err) => {
                error!(edge_id, error = %err, "edge endpoints unresolvable, remote disconnect skipped");
                return Err(err);
            }
        };

        self.client
            .connection_delete(&connection)
            .await
            .map_err(|err| {
                warn!(edge_id, error = %err, "connection_delete failed, next refresh decides");
                GraphSyncError::remote("connection_delete", err)
            })
    }

    /// Resolve a gesture's endpoints to the four-tuple the authority expects,
    /// against the current store contents.
    async fn resolve_endpoints(
        &self,
        gesture: &ConnectGesture,
    ) -> Result<WireConnection, GraphSyncError> {
        let source_node = self
            .store
            .node(&gesture.source)
            .await
            .ok_or_else(|| GraphSyncError::node_not_found(&gesture.source))?;
        let target_node = self
            .store
            .node(&gesture.target)
            .await
            .ok_or_else(|| GraphSyncError::node_not_found(&gesture.target))?;

        let source_port = resolve_port(&source_node, &gesture.source_handle, PortDirection::Source)?;
        let target_port = resolve_port(&target_node, &gesture.target_handle, PortDirection::Target)?;

        Ok(WireConnection {
            connection_id: None,
            source_node_id: gesture.source.clone(),
            source_port,
            target_node_id: gesture.target.clone(),
            target_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InputPort, OutputPort};
    use crate::test_support::{FakeAuthority, Script};
    use serde_json::json;

    fn fixture() -> (Arc<GraphStore>, Arc<FakeAuthority>, MutationDispatcher) {
        let store = Arc::new(GraphStore::new());
        let authority = Arc::new(FakeAuthority::new());
        let dispatcher = MutationDispatcher::new(
            store.clone(),
            AuthorityClient::new(authority.clone() as Arc<dyn crate::remote::GraphAuthority>),
        );
        (store, authority, dispatcher)
    }

    async fn seed_pair(store: &GraphStore) {
        let mut producer = GraphNode::new("n1", "const_node", Position::default());
        producer.outputs = vec![OutputPort::named("sum")];
        store.upsert_node(producer).await;

        let mut consumer = GraphNode::new("n2", "sink_node", Position::default());
        consumer.inputs = vec![InputPort::named("a")];
        store.upsert_node(consumer).await;
    }

    fn gesture() -> ConnectGesture {
        ConnectGesture {
            source: "n1".to_string(),
            source_handle: "sum".to_string(),
            target: "n2".to_string(),
            target_handle: "a".to_string(),
        }
    }

    #[tokio::test]
    async fn connect_sends_resolved_port_indices() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;

        dispatcher.connect(gesture()).await.unwrap();

        let dispatched = authority.dispatched.lock().unwrap();
        assert_eq!(dispatched.len(), 1);
        let (cmd, payload) = &dispatched[0];
        assert_eq!(cmd, "connection_add");
        assert_eq!(payload["sourceNodeId"], "n1");
        assert_eq!(payload["sourcePort"], 0);
        assert_eq!(payload["targetNodeId"], "n2");
        assert_eq!(payload["targetPort"], 0);
    }

    #[tokio::test]
    async fn connect_rollback_removes_only_the_temp_edge() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;
        store
            .upsert_edge(Edge::new("e-keep", "n1", "sum", "n2", "a"))
            .await;

        authority.reject("connection_add", "Connection already exists");
        let err = dispatcher.connect(gesture()).await.unwrap_err();
        assert!(matches!(err, GraphSyncError::RemoteCallFailed { .. }));

        let edges = store.edges().await;
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "e-keep");
    }

    #[tokio::test]
    async fn connect_with_unknown_handle_never_reaches_the_authority() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;

        let mut bad = gesture();
        bad.source_handle = "ghost".to_string();
        let err = dispatcher.connect(bad).await.unwrap_err();
        assert!(matches!(err, GraphSyncError::PortNotFound { .. }));

        assert!(store.edges().await.is_empty());
        assert!(authority.dispatched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn connect_keeps_temp_id_when_authority_returns_none() {
        let (store, _authority, dispatcher) = fixture();
        seed_pair(&store).await;

        let id = dispatcher.connect(gesture()).await.unwrap();
        assert!(id.starts_with("tmp-"));
        assert_eq!(store.edge(&id).await.unwrap().source, "n1");
    }

    #[tokio::test]
    async fn connect_adopts_authority_connection_id() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;

        authority.script(
            "connection_add",
            Script::Reply(json!({
                "status": "ok",
                "connection": {
                    "connectionId": "c-42",
                    "sourceNodeId": "n1", "sourcePort": 0,
                    "targetNodeId": "n2", "targetPort": 0
                }
            })),
        );

        let id = dispatcher.connect(gesture()).await.unwrap();
        assert_eq!(id, "c-42");
        assert!(store.edge("c-42").await.is_some());
    }

    #[tokio::test]
    async fn disconnect_reresolves_against_current_store() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;
        store
            .upsert_edge(Edge::new("e1", "n1", "sum", "n2", "a"))
            .await;

        // The target node gained an input since the edge was created; "a"
        // now sits at index 1.
        let mut consumer = store.node("n2").await.unwrap();
        consumer.inputs.insert(0, InputPort::named("bias"));
        store.upsert_node(consumer).await;

        dispatcher.disconnect("e1").await.unwrap();

        let dispatched = authority.dispatched.lock().unwrap();
        assert_eq!(dispatched[0].0, "connection_delete");
        assert_eq!(dispatched[0].1["targetPort"], 1);
        drop(dispatched);
        assert!(store.edges().await.is_empty());
    }

    #[tokio::test]
    async fn disconnect_with_stale_handle_still_removes_locally() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;
        // Edge refers to an input var the node no longer has.
        store
            .upsert_edge(Edge::new("e1", "n1", "sum", "n2", "renamed_away"))
            .await;

        let err = dispatcher.disconnect("e1").await.unwrap_err();
        assert!(matches!(err, GraphSyncError::PortNotFound { .. }));

        assert!(store.edges().await.is_empty());
        assert!(authority.dispatched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn disconnect_of_absent_edge_is_a_noop() {
        let (_store, authority, dispatcher) = fixture();
        dispatcher.disconnect("ghost").await.unwrap();
        assert!(authority.dispatched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_node_inserts_the_authority_shape() {
        let (store, authority, dispatcher) = fixture();
        authority.script(
            "node_add",
            Script::Reply(json!({
                "status": "ok",
                "node": {
                    "nodeId": "node_7",
                    "name": "add_node",
                    "input": [{"var": "a"}, {"var": "b"}],
                    "output": ["sum"]
                }
            })),
        );

        let node = dispatcher
            .add_node("add", Position::new(64.0, 32.0))
            .await
            .unwrap();
        assert_eq!(node.id, "node_7");
        // Authority sent no position; the drop position wins.
        assert_eq!(node.position, Position::new(64.0, 32.0));
        assert_eq!(store.node("node_7").await.unwrap().inputs.len(), 2);
    }

    #[tokio::test]
    async fn add_node_without_node_payload_adds_nothing() {
        let (store, authority, dispatcher) = fixture();
        authority.script("node_add", Script::Reply(json!({"status": "ok"})));

        let err = dispatcher
            .add_node("add", Position::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphSyncError::MalformedResponse { .. }));
        assert!(store.nodes().await.is_empty());
    }

    #[tokio::test]
    async fn delete_node_is_best_effort_forward() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;

        authority.script("node_delete", Script::Unreachable);
        let err = dispatcher.delete_node("n1").await.unwrap_err();
        assert!(matches!(err, GraphSyncError::RemoteCallFailed { .. }));

        // The node stays deleted locally; reconciliation decides.
        assert!(store.node("n1").await.is_none());
    }

    #[tokio::test]
    async fn move_node_keeps_local_position_on_remote_failure() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;

        authority.script("node_move", Script::Unreachable);
        let moved = Position::new(200.0, 80.0);
        let err = dispatcher.move_node("n1", moved).await.unwrap_err();
        assert!(matches!(err, GraphSyncError::RemoteCallFailed { .. }));

        assert_eq!(store.node("n1").await.unwrap().position, moved);
    }

    #[tokio::test]
    async fn update_input_checks_the_store_before_calling_out() {
        let (store, authority, dispatcher) = fixture();
        seed_pair(&store).await;

        let err = dispatcher.update_input("n2", 7, "x").await.unwrap_err();
        assert!(matches!(err, GraphSyncError::InputOutOfRange { .. }));
        assert!(authority.dispatched.lock().unwrap().is_empty());

        dispatcher.update_input("n2", 0, "3.5").await.unwrap();
        assert_eq!(store.node("n2").await.unwrap().inputs[0].value, "3.5");
        assert_eq!(authority.dispatched_commands(), vec!["node_update_input"]);
    }
}
