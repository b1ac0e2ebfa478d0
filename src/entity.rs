//! The entity registry: per-type wire names and REST path segments.
//!
//! Every REST resource kind the transport can touch declares its descriptor
//! by implementing [`Entity`]. The descriptor was a runtime class-to-config
//! map in older Redmine clients; here it is checked at compile time, so an
//! unregistered type cannot reach the transport at all, and calling
//! `add_object`/`update_object` on a read-only type does not build.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Descriptor for a REST resource kind.
///
/// `SINGULAR` keys the single-object JSON envelope (`{"issue": {...}}`),
/// `PLURAL` keys collection envelopes and is `None` for types that cannot be
/// listed, and `PATH` is the URI path segment (e.g. `issues`,
/// `enumerations/issue_priorities`).
pub trait Entity: DeserializeOwned {
    /// Wire name of a single object of this type.
    const SINGULAR: &'static str;
    /// Wire name of a collection of this type; `None` for non-listable types.
    const PLURAL: Option<&'static str>;
    /// REST path segment for this type.
    const PATH: &'static str;
}

/// An entity that can be created or updated on the server.
///
/// Read-only types (trackers, statuses, priorities, saved queries) implement
/// [`Entity`] only.
pub trait WritableEntity: Entity + Serialize {}

/// An entity carrying a server-side numeric identifier.
///
/// Required by update and delete-by-object operations, which must address the
/// object in the target system.
pub trait Identifiable {
    /// The server-side id, if the object has been persisted.
    fn id(&self) -> Option<i32>;
}
