//! Input Commit Pipeline
//!
//! Literal input values use a two-tier write model. Keystrokes land in a
//! per-port draft buffer (the fast path) and cost no remote call; losing
//! focus or an explicit confirm gesture commits the draft as exactly one
//! `node_update_input` (the commit path). A port currently bound to an edge
//! takes no drafts at all - its literal value is ignored at execution time
//! and editing it would be misleading.
//!
//! Each commit carries the value present at the moment of its trigger: the
//! draft is taken out of the buffer synchronously before the remote call is
//! awaited, so a keystroke arriving during the call belongs to the next
//! commit, never to the in-flight one.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::services::dispatcher::MutationDispatcher;
use crate::services::error::GraphSyncError;
use crate::services::graph_store::GraphStore;

/// Draft buffer and commit trigger for literal input edits.
pub struct InputCommitPipeline {
    store: Arc<GraphStore>,
    dispatcher: Arc<MutationDispatcher>,
    drafts: RwLock<HashMap<(String, usize), String>>,
}

impl InputCommitPipeline {
    pub fn new(store: Arc<GraphStore>, dispatcher: Arc<MutationDispatcher>) -> Self {
        Self {
            store,
            dispatcher,
            drafts: RwLock::new(HashMap::new()),
        }
    }

    /// Fast path: record one keystroke's worth of edit for a port.
    ///
    /// Refused with [`GraphSyncError::InputLinked`] when the port is bound to
    /// an edge, and with the store's own error when the port does not exist.
    /// No remote call is made either way.
    pub async fn stage(
        &self,
        node_id: &str,
        input_index: usize,
        value: &str,
    ) -> Result<(), GraphSyncError> {
        if self.store.is_input_linked(node_id, input_index).await? {
            return Err(GraphSyncError::InputLinked {
                node_id: node_id.to_string(),
                index: input_index,
            });
        }

        self.drafts
            .write()
            .await
            .insert((node_id.to_string(), input_index), value.to_string());
        Ok(())
    }

    /// Current display value for a port: the staged draft when one exists,
    /// the store's committed value otherwise.
    pub async fn display_value(&self, node_id: &str, input_index: usize) -> Option<String> {
        if let Some(draft) = self
            .drafts
            .read()
            .await
            .get(&(node_id.to_string(), input_index))
        {
            return Some(draft.clone());
        }
        self.store
            .node(node_id)
            .await
            .and_then(|n| n.inputs.get(input_index).map(|i| i.value.clone()))
    }

    /// Commit path: send the staged value, if any, as one remote update.
    ///
    /// Returns the committed value, or `None` when nothing was staged (a
    /// blur without edits triggers no remote call). Linkage is re-checked at
    /// the commit trigger: a port that gained an edge since staging drops its
    /// draft without a remote call, matching the read-only rule the fast path
    /// enforces. The draft is consumed even when the remote call fails - the
    /// value is already applied locally and reconciliation owns the drift.
    pub async fn commit(
        &self,
        node_id: &str,
        input_index: usize,
    ) -> Result<Option<String>, GraphSyncError> {
        let value = self
            .drafts
            .write()
            .await
            .remove(&(node_id.to_string(), input_index));

        let Some(value) = value else {
            debug!(node_id, input_index, "commit with no staged edit, skipping");
            return Ok(None);
        };

        if self.store.is_input_linked(node_id, input_index).await? {
            debug!(
                node_id,
                input_index, "port became linked since staging, dropping draft"
            );
            return Ok(None);
        }

        match self
            .dispatcher
            .update_input(node_id, input_index, &value)
            .await
        {
            Ok(()) => Ok(Some(value)),
            Err(err) => {
                warn!(node_id, input_index, error = %err, "input commit failed");
                Err(err)
            }
        }
    }
}
