//! mtree-config-core: the configuration record shared between the node graph
//! and the external growth engine.
//!
//! - [`TreeConfig`] is the flat record itself.
//! - [`ConfigField`] / [`ConfigValue`] address and carry single fields.
//! - [`ConfigBatch`] collects typed writes so producers stay decoupled from
//!   the struct layout.

pub mod error;
pub mod record;
pub mod value;
pub mod write_ops;

pub use error::ConfigError;
pub use record::{ConfigField, TreeConfig};
pub use value::{ConfigValue, ValueKind};
pub use write_ops::{ConfigBatch, ConfigWrite};
