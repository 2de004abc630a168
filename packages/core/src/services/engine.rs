//! Engine Control
//!
//! Client-side surface of the remote execution engine: start and stop runs,
//! read the simplified engine state, fetch execution logs. The engine's
//! internals (scheduling, log generation) live entirely on the authority.
//!
//! Run failures are user-facing: besides the returned error, an
//! [`EngineAlert`] is broadcast so the UI can show a dismissable
//! notification. Stop failures only warrant a log line.

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::models::LogEntry;
use crate::remote::AuthorityClient;
use crate::services::error::GraphSyncError;

const ALERT_CHANNEL_CAPACITY: usize = 16;

/// Simplified engine state as shown by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
}

impl EngineState {
    /// The authority reports detailed backend states; everything that is not
    /// actively running collapses to idle on the client.
    fn parse(state: &str) -> Self {
        if state == "running" {
            Self::Running
        } else {
            Self::Idle
        }
    }
}

/// A user-facing engine failure, shown until explicitly dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineAlert {
    pub message: String,
}

/// Engine command surface.
pub struct EngineController {
    client: AuthorityClient,
    alerts: broadcast::Sender<EngineAlert>,
}

impl EngineController {
    pub fn new(client: AuthorityClient) -> Self {
        let (alerts, _) = broadcast::channel(ALERT_CHANNEL_CAPACITY);
        Self { client, alerts }
    }

    /// Subscribe to user-facing engine alerts.
    pub fn alerts(&self) -> broadcast::Receiver<EngineAlert> {
        self.alerts.subscribe()
    }

    /// Execute the active project's graph.
    pub async fn run(&self) -> Result<(), GraphSyncError> {
        match self.client.run().await {
            Ok(()) => {
                info!("engine run requested");
                Ok(())
            }
            Err(err) => {
                let err = GraphSyncError::remote("run", err);
                let _ = self.alerts.send(EngineAlert {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Request a graceful stop.
    pub async fn stop(&self) -> Result<(), GraphSyncError> {
        self.client.stop().await.map_err(|err| {
            warn!(error = %err, "engine stop failed");
            GraphSyncError::remote("stop", err)
        })
    }

    /// Kill the running execution.
    pub async fn force_stop(&self) -> Result<(), GraphSyncError> {
        self.client.force_stop().await.map_err(|err| {
            warn!(error = %err, "engine force_stop failed");
            GraphSyncError::remote("force_stop", err)
        })
    }

    /// Current simplified engine state.
    pub async fn state(&self) -> Result<EngineState, GraphSyncError> {
        let state = self
            .client
            .engine_state()
            .await
            .map_err(|err| GraphSyncError::remote("engine_get_state", err))?;
        Ok(EngineState::parse(&state))
    }

    /// Execution logs of a project, oldest first.
    pub async fn logs(&self, project_id: &str) -> Result<Vec<LogEntry>, GraphSyncError> {
        self.client
            .engine_logs(project_id)
            .await
            .map_err(|err| GraphSyncError::remote("engine_logs", err))
    }
}
