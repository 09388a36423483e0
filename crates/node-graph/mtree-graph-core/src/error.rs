use thiserror::Error;

use crate::socket::SocketKind;
use crate::types::NodeId;

/// Structural errors raised by graph edits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("{0} does not exist")]
    UnknownNode(NodeId),
    #[error("{node} has no {direction} socket `{socket}`")]
    UnknownSocket {
        node: NodeId,
        socket: String,
        direction: &'static str,
    },
    #[error("cannot link {0} to itself")]
    SelfLink(NodeId),
    #[error("cannot link a {from:?} socket to a {to:?} socket")]
    IncompatibleSockets { from: SocketKind, to: SocketKind },
    #[error("link would create a cycle through {0}")]
    Cycle(NodeId),
    #[error("node name `{0}` is already taken")]
    DuplicateName(String),
}
