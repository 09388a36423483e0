//! mtree-graph-core: the node graph that configures the mtree growth engine.
//!
//! A [`Graph`] holds typed [`Node`]s wired by [`Link`]s. The [`SyncEngine`]
//! walks the graph and mirrors node fields and socket values into a
//! [`TreeConfig`](mtree_config_core::TreeConfig), which the growth engine
//! reads when a build is requested.

pub mod curve;
pub mod doc;
pub mod error;
pub mod graph;
pub mod node;
pub mod socket;
pub mod sync;
pub mod topo;
pub mod types;

pub use curve::{CurveMapping, CurvePoint};
pub use doc::{DocError, GraphDoc, LinkDoc, NodeDoc, SocketDoc};
pub use error::GraphError;
pub use graph::{setup_node_tree, Graph};
pub use node::{Node, NodeCategory, NodeFields, NodeKind, NodeType};
pub use socket::{Socket, SocketKind, SocketRange};
pub use sync::{HostEvent, SkipReason, SyncEngine, SyncReport, SyncSettings};
pub use topo::topo_order;
pub use types::{Link, LinkId, NodeId};
