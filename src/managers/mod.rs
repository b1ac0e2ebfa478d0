//! Per-entity manager views.
//!
//! Thin plumbing over the transport core: managers build parameters and
//! delegate to the typed CRUD operations, never constructing URIs or touching
//! the entity descriptors directly. Each borrows the transport, so one
//! [`RedmineManager`](crate::RedmineManager) serves any number of them.

mod attachments;
mod issues;
mod projects;
mod users;

pub use attachments::AttachmentManager;
pub use issues::{Include, IssueManager};
pub use projects::ProjectManager;
pub use users::UserManager;
