//! Editor Session
//!
//! The surface the presentation layer talks to: one object wiring the store,
//! dispatcher, loader, input pipeline, engine and project services over a
//! single authority transport, with per-gesture methods matching the canvas
//! callbacks (`on_connect`, `on_nodes_delete`, `on_edges_delete`,
//! `on_node_drag_stop`, input staging/commit).
//!
//! The session also carries the selection notifier. Continuations of remote
//! calls must check relevance against it before applying anything
//! selection-scoped - a reply arriving after the user moved on is dropped,
//! not crashed on.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use crate::models::Position;
use crate::remote::{AuthorityClient, GraphAuthority};
use crate::services::dispatcher::{ConnectGesture, MutationDispatcher};
use crate::services::engine::EngineController;
use crate::services::error::GraphSyncError;
use crate::services::graph_store::GraphStore;
use crate::services::input_commit::InputCommitPipeline;
use crate::services::loader::ReconciliationLoader;
use crate::services::project::ProjectService;

/// A fully wired editor client for one authority endpoint.
pub struct EditorSession {
    store: Arc<GraphStore>,
    dispatcher: Arc<MutationDispatcher>,
    loader: Arc<ReconciliationLoader>,
    inputs: InputCommitPipeline,
    engine: EngineController,
    projects: ProjectService,
    selection: watch::Sender<Option<String>>,
}

impl EditorSession {
    pub fn new(authority: Arc<dyn GraphAuthority>) -> Self {
        let client = AuthorityClient::new(authority);
        let store = Arc::new(GraphStore::new());
        let dispatcher = Arc::new(MutationDispatcher::new(store.clone(), client.clone()));
        let loader = Arc::new(ReconciliationLoader::new(store.clone(), client.clone()));
        let inputs = InputCommitPipeline::new(store.clone(), dispatcher.clone());
        let engine = EngineController::new(client.clone());
        let projects = ProjectService::new(client, store.clone(), loader.clone());
        let (selection, _) = watch::channel(None);

        Self {
            store,
            dispatcher,
            loader,
            inputs,
            engine,
            projects,
            selection,
        }
    }

    // --- Collaborator access ---------------------------------------------

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    /// Registration hook for the canvas: the current refresh handle.
    pub fn loader(&self) -> &Arc<ReconciliationLoader> {
        &self.loader
    }

    pub fn inputs(&self) -> &InputCommitPipeline {
        &self.inputs
    }

    pub fn engine(&self) -> &EngineController {
        &self.engine
    }

    pub fn projects(&self) -> &ProjectService {
        &self.projects
    }

    // --- Selection --------------------------------------------------------

    /// Update the active element selection (node id, or `None` for the
    /// canvas background).
    pub fn select(&self, node_id: Option<String>) {
        let _ = self.selection.send(node_id);
    }

    /// Observe selection changes. Continuations should compare against the
    /// current value before applying selection-scoped replies.
    pub fn selection_changes(&self) -> watch::Receiver<Option<String>> {
        self.selection.subscribe()
    }

    /// Whether `node_id` is still the active selection.
    pub fn is_selected(&self, node_id: &str) -> bool {
        self.selection.borrow().as_deref() == Some(node_id)
    }

    // --- Gesture callbacks ------------------------------------------------

    /// `onConnect`: wire an output handle to an input handle.
    pub async fn on_connect(&self, gesture: ConnectGesture) -> Result<String, GraphSyncError> {
        self.dispatcher.connect(gesture).await
    }

    /// `onNodeDragStop`: persist a finished drag.
    pub async fn on_node_drag_stop(
        &self,
        node_id: &str,
        position: Position,
    ) -> Result<(), GraphSyncError> {
        self.dispatcher.move_node(node_id, position).await
    }

    /// `onNodesDelete`: remove a batch of nodes. Failures are logged per
    /// node and do not stop the rest of the batch; the authority's state at
    /// the next reconciliation is the tie-breaker.
    pub async fn on_nodes_delete(&self, node_ids: &[String]) {
        for node_id in node_ids {
            if let Err(err) = self.dispatcher.delete_node(node_id).await {
                warn!(node_id, error = %err, "node delete in batch failed");
            }
        }
    }

    /// `onEdgesDelete`: remove a batch of edges, same failure policy as
    /// node batches.
    pub async fn on_edges_delete(&self, edge_ids: &[String]) {
        for edge_id in edge_ids {
            if let Err(err) = self.dispatcher.disconnect(edge_id).await {
                warn!(edge_id, error = %err, "edge delete in batch failed");
            }
        }
    }

    /// Drop gesture from the palette.
    pub async fn on_drop(
        &self,
        node_type: &str,
        position: Position,
    ) -> Result<(), GraphSyncError> {
        self.dispatcher.add_node(node_type, position).await?;
        Ok(())
    }
}
