//! Project Lifecycle
//!
//! Startup data retrieval and project switching. The graph store has defined
//! init and teardown points: selecting a project clears the store and then
//! reconciles against the newly active project's snapshot, so no state from
//! the previous project survives the switch.

use std::sync::Arc;
use tracing::info;

use crate::models::StartupData;
use crate::remote::AuthorityClient;
use crate::services::error::GraphSyncError;
use crate::services::graph_store::GraphStore;
use crate::services::loader::ReconciliationLoader;

/// Startup and project-switch operations.
pub struct ProjectService {
    client: AuthorityClient,
    store: Arc<GraphStore>,
    loader: Arc<ReconciliationLoader>,
}

impl ProjectService {
    pub fn new(
        client: AuthorityClient,
        store: Arc<GraphStore>,
        loader: Arc<ReconciliationLoader>,
    ) -> Self {
        Self {
            client,
            store,
            loader,
        }
    }

    /// Everything the client needs before a canvas can be shown: node-type
    /// library for the palette, project index, current project state.
    pub async fn startup(&self) -> Result<StartupData, GraphSyncError> {
        self.client
            .startup()
            .await
            .map_err(|err| GraphSyncError::remote("startup", err))
    }

    /// Make `project_id` the active project.
    ///
    /// The store is torn down only after the authority accepts the switch,
    /// then repopulated by a full reconciliation. A rejected switch leaves
    /// the current project's graph untouched.
    pub async fn select(&self, project_id: &str) -> Result<(), GraphSyncError> {
        self.client
            .project_load(project_id)
            .await
            .map_err(|err| GraphSyncError::remote("project_load", err))?;

        info!(project_id, "project selected, reloading graph");
        self.store.replace(Vec::new(), Vec::new()).await;
        self.loader.refresh().await
    }
}
