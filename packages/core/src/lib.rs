//! Loomflow Client Core
//!
//! This crate is the client-side half of the Loom visual node-graph editor:
//! the optimistic graph synchronization engine that keeps a locally rendered
//! graph responsive while the remote authority stays the single source of
//! truth for topology, node identity and execution.
//!
//! # Architecture
//!
//! - **Optimistic mutations**: gestures apply to the local store immediately,
//!   the matching authority command follows, and failures undo exactly the
//!   local effect they caused
//! - **Wholesale reconciliation**: authoritative snapshots replace local
//!   state, never merge into it
//! - **Handle/index resolution**: symbolic port ids from the rendering layer
//!   map to the positional indices the authority expects, always against the
//!   current store contents
//! - **Normalized boundary**: duck-typed authority reply shapes collapse to
//!   one discriminated type before anything else sees them
//!
//! # Modules
//!
//! - [`models`] - graph model and authority wire shapes
//! - [`remote`] - authority transport, reply normalization, typed commands
//! - [`services`] - store, dispatcher, loader, input pipeline, engine/project control

pub mod models;
pub mod remote;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use models::*;
pub use remote::{AuthorityClient, AuthorityConfig, GraphAuthority, HttpAuthority, RemoteError};
pub use services::*;
