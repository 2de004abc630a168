//! Remote Authority Boundary
//!
//! Everything that talks to the graph authority lives here:
//!
//! - [`GraphAuthority`] - the command/query transport trait
//! - [`HttpAuthority`] - reqwest implementation over the `/dispatch` endpoint
//! - [`CommandOutcome`] - normalization of the authority's duck-typed reply shapes
//! - [`AuthorityClient`] - typed wrappers, one per consumed command/query
//!
//! Reply-shape drift (`status: "ok"` vs `"success"`, payload under `result`
//! vs top level) is absorbed at this boundary; nothing past this module sees
//! a raw authority reply.

pub mod authority;
pub mod commands;
pub mod outcome;

pub use authority::{AuthorityConfig, GraphAuthority, HttpAuthority, RemoteError};
pub use commands::AuthorityClient;
pub use outcome::CommandOutcome;
