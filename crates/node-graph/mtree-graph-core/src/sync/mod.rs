//! Synchronization of graph state into the configuration record.
//!
//! Propagation is one-way: nodes write into [`TreeConfig`](mtree_config_core::TreeConfig)
//! and never read it back (except when seeding socket defaults on creation).
//!
//! - [`visibility`] derives hidden sockets from each node's own fields.
//! - [`bindings`] is the per-type node → config field mapping.
//! - [`engine`] runs per-node updates and the throttled whole-graph walk.

pub mod bindings;
pub mod engine;
pub mod visibility;

pub use bindings::config_writes;
pub use engine::{HostEvent, NodeSync, SkipReason, SyncEngine, SyncReport, SyncSettings};
pub use visibility::{apply_visibility, visibility_rule, VisibilityOutcome, VisibilityRule};

#[cfg(test)]
mod tests;
