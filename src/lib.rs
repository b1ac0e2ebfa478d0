//! A typed client for the Redmine REST API.
//!
//! The crate is organized around a transport core and a thin manager layer:
//!
//! - [`transport`] performs the HTTP exchanges: a composable request pipeline
//!   (auth, error classification, body reading), entity-aware URI building,
//!   JSON envelope codecs and an automatic pagination loop.
//! - [`entity`] declares the per-type descriptors (wire names, path segment)
//!   the transport consults; [`models`] holds the object types.
//! - [`RedmineManager`] and the per-entity managers in [`managers`] are the
//!   public entry point and call only the transport's typed operations.
//!
//! All calls are async and sequential; the client performs no retries and no
//! internal concurrency. Failures surface as [`Error`] variants so callers
//! branch on kinds, not message strings.

pub mod entity;
pub mod error;
pub mod managers;
pub mod models;
pub mod transport;

mod manager;

pub use error::{Error, Result};
pub use manager::RedmineManager;
pub use managers::{AttachmentManager, Include, IssueManager, ProjectManager, UserManager};
pub use transport::{ResultsPage, Transport, UriBuilder};
