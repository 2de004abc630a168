//! Reconciliation Loader
//!
//! Fetches the authoritative graph snapshot and replaces the store with it
//! wholesale - any optimistic local change the authority never saw is
//! discarded. Two extra behaviors around the plain fetch:
//!
//! - a fixed minimum-visible duration runs concurrently with the fetch, so
//!   the "syncing" affordance never flashes imperceptibly on a fast network
//!   and never extends a slow response beyond its real latency;
//! - refreshes are ticketed so that overlapping calls cannot apply out of
//!   order: an earlier in-flight refresh never overwrites the result of a
//!   later one that started after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};

use crate::remote::AuthorityClient;
use crate::services::error::GraphSyncError;
use crate::services::graph_store::GraphStore;

/// Floor for how long one refresh appears to take. Purely perceptual.
pub const MIN_SYNC_VISIBLE: Duration = Duration::from_millis(600);

/// Replaces the graph store with authoritative snapshots.
pub struct ReconciliationLoader {
    store: Arc<GraphStore>,
    client: AuthorityClient,
    min_visible: Duration,
    /// Ticket of the most recently started refresh.
    started: AtomicU64,
    /// Ticket of the most recently applied snapshot; guards application
    /// order for overlapping refreshes.
    applied: Mutex<u64>,
    syncing: watch::Sender<bool>,
}

impl ReconciliationLoader {
    pub fn new(store: Arc<GraphStore>, client: AuthorityClient) -> Self {
        Self::with_min_visible(store, client, MIN_SYNC_VISIBLE)
    }

    pub fn with_min_visible(
        store: Arc<GraphStore>,
        client: AuthorityClient,
        min_visible: Duration,
    ) -> Self {
        let (syncing, _) = watch::channel(false);
        Self {
            store,
            client,
            min_visible,
            started: AtomicU64::new(0),
            applied: Mutex::new(0),
            syncing,
        }
    }

    /// Observe the syncing affordance. Turns true when a refresh starts and
    /// clears when the most recently started refresh finishes; an older
    /// refresh still in flight at that point has already lost the
    /// last-writer-wins race and no longer drives the affordance.
    pub fn syncing(&self) -> watch::Receiver<bool> {
        self.syncing.subscribe()
    }

    /// Fetch the authoritative snapshot and replace the store with it.
    ///
    /// Awaits both the fetch and the minimum-visible timer before returning.
    /// Safe to call re-entrantly: overlapping refreshes coalesce to
    /// last-started-wins.
    pub async fn refresh(&self) -> Result<(), GraphSyncError> {
        let ticket = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.syncing.send(true);

        let (document, ()) = tokio::join!(
            self.client.load_graph(),
            tokio::time::sleep(self.min_visible)
        );

        let result = match document {
            Ok(document) => {
                let mut applied = self.applied.lock().await;
                if ticket > *applied {
                    let nodes = document.graph.nodes.len();
                    let edges = document.graph.connections.len();
                    self.store.load_snapshot(document.graph).await;
                    *applied = ticket;
                    info!(nodes, edges, "graph reconciled from authority");
                } else {
                    debug!(ticket, applied = *applied, "stale refresh result discarded");
                }
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "graph refresh failed, keeping local state");
                Err(GraphSyncError::remote("load_graph", err))
            }
        };

        // Only the newest refresh clears the affordance; an older one
        // finishing late must not blink it off mid-sync.
        if self.started.load(Ordering::SeqCst) == ticket {
            let _ = self.syncing.send(false);
        }
        result
    }
}
