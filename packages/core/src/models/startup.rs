//! Startup Payload
//!
//! Shape of the `/startup` query: everything the client needs before a canvas
//! can be shown - the node-type library for the palette, the project index
//! for the project screen, and the currently active project state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the node-type library (the palette of droppable nodes).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplate {
    pub name: String,
    /// "builtin" or "custom".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Declared port shape; the authority instantiates nodes from this, the
    /// client only uses it for palette display.
    #[serde(default)]
    pub dynamic: TemplatePorts,
}

/// Declared input/output names of a node template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatePorts {
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// One entry of the project index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
}

/// Full `/startup` reply.
///
/// `setting` and `current` are opaque to this crate and passed through to the
/// presentation layer as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartupData {
    #[serde(default)]
    pub setting: Value,
    #[serde(default)]
    pub current: Value,
    #[serde(default)]
    pub project_index: Vec<ProjectEntry>,
    #[serde(default)]
    pub node_index: Vec<NodeTemplate>,
}
