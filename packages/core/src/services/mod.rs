//! Synchronization Services
//!
//! The components that keep the local graph model consistent with the remote
//! authority:
//!
//! - [`GraphStore`] - owned in-memory graph state, the single local source of UI truth
//! - port resolver - symbolic handle ids to positional port indices and back
//! - [`MutationDispatcher`] - optimistic gesture-to-command translation with rollback
//! - [`ReconciliationLoader`] - wholesale snapshot replacement with a visible-sync floor
//! - [`InputCommitPipeline`] - draft-buffered literal edits, one remote update per commit
//! - [`EngineController`] / [`ProjectService`] - engine control and project lifecycle

pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod graph_store;
pub mod input_commit;
pub mod loader;
pub mod port_resolver;
pub mod project;
pub mod session;

pub use dispatcher::{ConnectGesture, MutationDispatcher};
pub use engine::{EngineAlert, EngineController, EngineState};
pub use error::GraphSyncError;
pub use graph_store::{GraphEvent, GraphStore};
pub use input_commit::InputCommitPipeline;
pub use loader::ReconciliationLoader;
pub use port_resolver::{handle_for_port, resolve_port, PortDirection};
pub use project::ProjectService;
pub use session::EditorSession;
