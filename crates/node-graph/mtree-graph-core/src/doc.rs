//! Serializable snapshot of a graph, addressed by node name.
//!
//! Runtime ids are not stable across sessions, so links in a document refer
//! to nodes by their (unique) names. Socket visibility is derived state and is
//! not stored; the next sync recomputes it.

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mtree_config_core::TreeConfig;

use crate::error::GraphError;
use crate::graph::Graph;
use crate::node::{layout, Node, NodeKind};
use crate::socket::{Socket, SocketKind, SocketRange};
use crate::types::NodeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocError {
    #[error("graph document is not valid JSON: {0}")]
    Json(String),
    #[error("node name `{0}` appears more than once")]
    DuplicateName(String),
    #[error("link refers to unknown node `{0}`")]
    UnknownNode(String),
    #[error("node `{node}` has no value input `{socket}`")]
    UnknownSocket { node: String, socket: String },
    #[error("node `{node}` already has an input `{socket}`")]
    DuplicateSocket { node: String, socket: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 2],
    pub kind: NodeKind,
    /// Value inputs that differ from the config-seeded defaults. Missing
    /// entries keep the seeded value.
    #[serde(default)]
    pub inputs: IndexMap<String, f32>,
    /// Inputs added beyond the type's fixed layout, in socket order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_inputs: Vec<SocketDoc>,
    /// Fixed-layout inputs the node no longer has.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_inputs: Vec<String>,
}

/// Shape of an input added at runtime. Its value lives in [`NodeDoc::inputs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketDoc {
    pub name: String,
    pub kind: SocketKind,
    /// Falls back to the kind's default range.
    #[serde(default)]
    pub range: Option<SocketRange>,
}

impl SocketDoc {
    fn to_socket(&self) -> Socket {
        let range = self.range.unwrap_or_else(|| self.kind.default_range());
        Socket::with_range(&self.name, self.kind, range, 0.0)
    }
}

impl NodeDoc {
    fn from_node(node: &Node) -> Self {
        let (layout_inputs, _) = layout::sockets_for(node.node_type(), &TreeConfig::default());
        let same_shape = |a: &Socket, b: &Socket| {
            a.name() == b.name() && a.kind() == b.kind() && a.range() == b.range()
        };

        NodeDoc {
            name: node.name().to_string(),
            position: node.position,
            kind: node.kind().clone(),
            inputs: node
                .inputs()
                .iter()
                .filter_map(|s| s.value().map(|v| (s.name().to_string(), v)))
                .collect(),
            extra_inputs: node
                .inputs()
                .iter()
                .filter(|s| !layout_inputs.iter().any(|l| same_shape(l, *s)))
                .map(|s| SocketDoc {
                    name: s.name().to_string(),
                    kind: s.kind(),
                    range: Some(s.range()),
                })
                .collect(),
            removed_inputs: layout_inputs
                .iter()
                .filter(|l| !node.inputs().iter().any(|s| same_shape(*l, s)))
                .map(|s| s.name().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDoc {
    pub from: String,
    pub from_socket: String,
    pub to: String,
    pub to_socket: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDoc {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeDoc>,
    #[serde(default)]
    pub links: Vec<LinkDoc>,
}

impl GraphDoc {
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph.nodes().map(NodeDoc::from_node).collect();

        let name_of = |id: NodeId| {
            graph
                .node(id)
                .map(|n| n.name().to_string())
                .unwrap_or_default()
        };
        let links = graph
            .links()
            .iter()
            .map(|link| LinkDoc {
                from: name_of(link.from_node),
                from_socket: link.from_socket.clone(),
                to: name_of(link.to_node),
                to_socket: link.to_socket.clone(),
            })
            .collect();

        GraphDoc {
            name: graph.name.clone(),
            nodes,
            links,
        }
    }

    /// Rebuild a live graph. Sockets are first seeded from `cfg`, then
    /// overridden by the stored input values.
    pub fn into_graph(&self, cfg: &TreeConfig) -> Result<Graph, DocError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(DocError::DuplicateName(node.name.clone()));
            }
        }

        let mut graph = Graph::new(self.name.clone());
        let mut ids: HashMap<&str, NodeId> = HashMap::new();
        for doc in &self.nodes {
            let id = graph.add_node_kind(doc.kind.clone(), doc.position, cfg);
            graph.rename_node(id, &doc.name)?;
            for socket in &doc.removed_inputs {
                if graph.remove_input(id, socket).is_none() {
                    return Err(DocError::UnknownSocket {
                        node: doc.name.clone(),
                        socket: socket.clone(),
                    });
                }
            }
            for extra in &doc.extra_inputs {
                if !graph.add_input(id, extra.to_socket())? {
                    return Err(DocError::DuplicateSocket {
                        node: doc.name.clone(),
                        socket: extra.name.clone(),
                    });
                }
            }
            let node = graph.node_mut(id).ok_or(GraphError::UnknownNode(id))?;
            for (socket, value) in &doc.inputs {
                if !node.set_input_value(socket, *value) {
                    return Err(DocError::UnknownSocket {
                        node: doc.name.clone(),
                        socket: socket.clone(),
                    });
                }
            }
            ids.insert(doc.name.as_str(), id);
        }

        let lookup = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| DocError::UnknownNode(name.to_string()))
        };
        for link in &self.links {
            let from = lookup(&link.from)?;
            let to = lookup(&link.to)?;
            graph.add_link(from, &link.from_socket, to, &link.to_socket)?;
        }
        Ok(graph)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocError> {
        serde_json::from_str(json).map_err(|e| DocError::Json(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, DocError> {
        serde_json::to_string_pretty(self).map_err(|e| DocError::Json(e.to_string()))
    }
}
