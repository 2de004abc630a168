//! Typed Command Wrappers
//!
//! One method per authority command or query the client consumes. Each
//! wrapper serializes the payload the authority expects, runs the reply
//! through [`CommandOutcome`], and deserializes the parts of the reply the
//! client actually uses. Anything missing comes back as
//! [`RemoteError::Malformed`] rather than a partially-understood value.

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::models::{GraphDocument, LogEntry, StartupData, WireConnection, WireNode};
use crate::remote::authority::{GraphAuthority, RemoteError};
use crate::remote::outcome::{reply_field, CommandOutcome};

/// Typed client over a [`GraphAuthority`] transport.
#[derive(Clone)]
pub struct AuthorityClient {
    authority: Arc<dyn GraphAuthority>,
}

impl AuthorityClient {
    pub fn new(authority: Arc<dyn GraphAuthority>) -> Self {
        Self { authority }
    }

    /// Dispatch a command and normalize the reply.
    async fn command(&self, cmd: &str, payload: Value) -> Result<Value, RemoteError> {
        debug!(command = cmd, "dispatching authority command");
        let reply = self.authority.dispatch(cmd, payload).await?;
        CommandOutcome::from_reply(reply).into_result(cmd)
    }

    // --- Graph mutations -------------------------------------------------

    /// Create a node of the given palette type at a canvas position.
    ///
    /// The authority instantiates the node from its template and returns the
    /// full node payload; a reply without one is malformed, because a node of
    /// unknown port shape cannot be added to the local model.
    pub async fn node_add(&self, node_type: &str, x: f64, y: f64) -> Result<WireNode, RemoteError> {
        let reply = self
            .command("node_add", json!({"type": node_type, "x": x, "y": y}))
            .await?;

        let node = reply_field(&reply, "node")
            .cloned()
            .ok_or_else(|| RemoteError::malformed("node_add", "reply carries no node payload"))?;

        serde_json::from_value(node)
            .map_err(|err| RemoteError::malformed("node_add", err.to_string()))
    }

    /// Persist a node's position after a drag.
    pub async fn node_move(&self, node_id: &str, x: f64, y: f64) -> Result<(), RemoteError> {
        self.command(
            "node_move",
            json!({"nodeId": node_id, "updates": {"position": {"x": x, "y": y}}}),
        )
        .await?;
        Ok(())
    }

    /// Delete a node. The authority also drops its incident connections.
    pub async fn node_delete(&self, node_id: &str) -> Result<(), RemoteError> {
        self.command("node_delete", json!({"nodeId": node_id}))
            .await?;
        Ok(())
    }

    /// Set the literal value of one input port, addressed positionally.
    pub async fn node_update_input(
        &self,
        node_id: &str,
        input_index: usize,
        value: &str,
    ) -> Result<(), RemoteError> {
        self.command(
            "node_update_input",
            json!({"nodeId": node_id, "inputIndex": input_index, "value": value}),
        )
        .await?;
        Ok(())
    }

    /// Create a connection. Returns the authority's connection id when the
    /// reply carries one; older authority iterations return only the
    /// four-tuple.
    pub async fn connection_add(
        &self,
        connection: &WireConnection,
    ) -> Result<Option<String>, RemoteError> {
        let payload = serde_json::to_value(connection)
            .map_err(|err| RemoteError::malformed("connection_add", err.to_string()))?;
        let reply = self.command("connection_add", payload).await?;

        let id = reply_field(&reply, "connection")
            .and_then(|c| c.get("connectionId"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(id)
    }

    /// Delete a connection, addressed by the same four-tuple as creation.
    pub async fn connection_delete(&self, connection: &WireConnection) -> Result<(), RemoteError> {
        let payload = serde_json::to_value(connection)
            .map_err(|err| RemoteError::malformed("connection_delete", err.to_string()))?;
        self.command("connection_delete", payload).await?;
        Ok(())
    }

    // --- Queries ---------------------------------------------------------

    /// Fetch the authoritative graph snapshot for the active project.
    pub async fn load_graph(&self) -> Result<GraphDocument, RemoteError> {
        let reply = self.authority.fetch("/graph").await?;
        let reply = CommandOutcome::from_reply(reply).into_result("load_graph")?;
        serde_json::from_value(reply)
            .map_err(|err| RemoteError::malformed("load_graph", err.to_string()))
    }

    /// Fetch startup data: node-type library, project index, current project.
    pub async fn startup(&self) -> Result<StartupData, RemoteError> {
        let reply = self.authority.fetch("/startup").await?;
        serde_json::from_value(reply)
            .map_err(|err| RemoteError::malformed("startup", err.to_string()))
    }

    /// Fetch execution logs for a project. Accepts both the bare-array and
    /// the `{"logs": [...]}` reply shapes.
    pub async fn engine_logs(&self, project_id: &str) -> Result<Vec<LogEntry>, RemoteError> {
        let reply = self.authority.fetch(&format!("/logs/{project_id}")).await?;
        let entries = match &reply {
            Value::Array(_) => reply.clone(),
            _ => reply_field(&reply, "logs").cloned().ok_or_else(|| {
                RemoteError::malformed("engine_logs", "reply carries no log entries")
            })?,
        };
        serde_json::from_value(entries)
            .map_err(|err| RemoteError::malformed("engine_logs", err.to_string()))
    }

    // --- Project & engine control ---------------------------------------

    /// Make a project the active one. The graph snapshot query is scoped to
    /// the active project, so callers refresh after this succeeds.
    pub async fn project_load(&self, project_id: &str) -> Result<(), RemoteError> {
        self.command("project_load", json!({"projectId": project_id}))
            .await?;
        Ok(())
    }

    /// Start executing the active project's graph.
    pub async fn run(&self) -> Result<(), RemoteError> {
        self.command("run", Value::Null).await?;
        Ok(())
    }

    /// Request a graceful stop of the running execution.
    pub async fn stop(&self) -> Result<(), RemoteError> {
        self.command("stop", Value::Null).await?;
        Ok(())
    }

    /// Kill the running execution.
    pub async fn force_stop(&self) -> Result<(), RemoteError> {
        self.command("force_stop", Value::Null).await?;
        Ok(())
    }

    /// Simplified engine state as the UI shows it ("idle" or "running").
    pub async fn engine_state(&self) -> Result<String, RemoteError> {
        let reply = self.command("engine_get_state", Value::Null).await?;
        reply_field(&reply, "state")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RemoteError::malformed("engine_get_state", "reply carries no state"))
    }
}
