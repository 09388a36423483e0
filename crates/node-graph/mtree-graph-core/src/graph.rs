//! The node + link collection of one named tree.

use hashbrown::HashSet;
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::time::Instant;

use mtree_config_core::TreeConfig;

use crate::error::GraphError;
use crate::node::{Node, NodeKind, NodeType};
use crate::socket::Socket;
use crate::topo;
use crate::types::{IdAllocator, Link, LinkId, NodeId};

/// Horizontal distance between nodes placed by [`setup_node_tree`].
pub const NODE_SPACING: f32 = 260.0;

#[derive(Debug, Clone)]
pub struct Graph {
    pub name: String,
    nodes: IndexMap<NodeId, Node>,
    links: Vec<Link>,
    last_sync: Option<Instant>,
    ids: IdAllocator,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Graph {
            name: name.into(),
            nodes: IndexMap::new(),
            links: Vec::new(),
            last_sync: None,
            ids: IdAllocator::new(),
        }
    }

    /// Add a node of type `ty` with default fields.
    pub fn add_node(&mut self, ty: NodeType, position: [f32; 2], cfg: &TreeConfig) -> NodeId {
        self.add_node_kind(NodeKind::new(ty), position, cfg)
    }

    /// Add a node with explicit fields. The name is derived from the type
    /// label and made unique within the graph.
    pub fn add_node_kind(
        &mut self,
        kind: NodeKind,
        position: [f32; 2],
        cfg: &TreeConfig,
    ) -> NodeId {
        let id = self.ids.alloc_node();
        let name = self.unique_name(kind.node_type().label());
        self.nodes.insert(id, Node::new(id, name, kind, position, cfg));
        id
    }

    /// Remove a node and every link touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&id)?;
        self.links.retain(|link| !link.touches(id));
        Some(node)
    }

    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<(), GraphError> {
        if self.nodes.values().any(|n| n.id() != id && n.name() == name) {
            return Err(GraphError::DuplicateName(name.to_string()));
        }
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        node.set_name(name.to_string());
        Ok(())
    }

    /// Append an extra input socket to `id`. `Ok(false)` if the name is taken.
    pub fn add_input(&mut self, id: NodeId, socket: Socket) -> Result<bool, GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        Ok(node.add_input(socket))
    }

    /// Remove input `name` from `id` along with the link feeding it.
    pub fn remove_input(&mut self, id: NodeId, name: &str) -> Option<Socket> {
        let socket = self.nodes.get_mut(&id)?.remove_input(name)?;
        self.links.retain(|l| !(l.to_node == id && l.to_socket == name));
        Some(socket)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name() == name)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Link `from.from_socket` (an output) to `to.to_socket` (an input).
    ///
    /// An input holds at most one link, so an existing link into `to_socket`
    /// is replaced. The edit is rolled back if it would close a cycle.
    pub fn add_link(
        &mut self,
        from: NodeId,
        from_socket: &str,
        to: NodeId,
        to_socket: &str,
    ) -> Result<LinkId, GraphError> {
        if from == to {
            return Err(GraphError::SelfLink(from));
        }
        let src = self.nodes.get(&from).ok_or(GraphError::UnknownNode(from))?;
        let dst = self.nodes.get(&to).ok_or(GraphError::UnknownNode(to))?;
        let out = src.output(from_socket).ok_or_else(|| GraphError::UnknownSocket {
            node: from,
            socket: from_socket.to_string(),
            direction: "output",
        })?;
        let inp = dst.input(to_socket).ok_or_else(|| GraphError::UnknownSocket {
            node: to,
            socket: to_socket.to_string(),
            direction: "input",
        })?;
        if !out.kind().is_compatible(inp.kind()) {
            return Err(GraphError::IncompatibleSockets {
                from: out.kind(),
                to: inp.kind(),
            });
        }

        let occupied = self
            .links
            .iter()
            .position(|l| l.to_node == to && l.to_socket == to_socket);
        let replaced = occupied.map(|index| (index, self.links.remove(index)));

        let id = self.ids.alloc_link();
        self.links.push(Link {
            id,
            from_node: from,
            from_socket: from_socket.to_string(),
            to_node: to,
            to_socket: to_socket.to_string(),
        });

        if let Err(err) = topo::topo_order(self) {
            self.links.pop();
            if let Some((index, old)) = replaced {
                self.links.insert(index, old);
            }
            return Err(err);
        }
        if let Some((_, old)) = replaced {
            log::debug!("{} replaced {} into {}.{}", id, old.id, to, to_socket);
        }
        Ok(id)
    }

    pub fn remove_link(&mut self, id: LinkId) -> Option<Link> {
        let index = self.links.iter().position(|l| l.id == id)?;
        Some(self.links.remove(index))
    }

    /// The link feeding input `socket` of `node`, if any.
    pub fn link_into(&self, node: NodeId, socket: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.to_node == node && l.to_socket == socket)
    }

    pub fn links_from(&self, node: NodeId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.from_node == node)
    }

    /// Nodes connected, in either direction, to a Root node. Together they
    /// form the tree description; every other node is inert.
    pub fn tree_nodes(&self) -> HashSet<NodeId> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.node_type() == NodeType::Root)
            .map(Node::id)
            .collect();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            for link in self.links.iter().filter(|l| l.touches(id)) {
                let other = if link.from_node == id {
                    link.to_node
                } else {
                    link.from_node
                };
                if !seen.contains(&other) {
                    queue.push_back(other);
                }
            }
        }
        seen
    }

    pub fn is_inert(&self, id: NodeId) -> bool {
        !self.tree_nodes().contains(&id)
    }

    /// When the last full walk ran.
    pub fn last_sync(&self) -> Option<Instant> {
        self.last_sync
    }

    pub(crate) fn mark_synced(&mut self, now: Instant) {
        self.last_sync = Some(now);
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |name: &str| self.nodes.values().any(|n| n.name() == name);
        if !taken(base) {
            return base.to_string();
        }
        (1u32..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

/// Populate `graph` with the canonical Root → Trunk → Branch → Output chain,
/// laid out left to right and linked first output to first input.
pub fn setup_node_tree(graph: &mut Graph, cfg: &TreeConfig) {
    const CHAIN: [NodeType; 4] = [
        NodeType::Root,
        NodeType::Trunk,
        NodeType::Branch,
        NodeType::Output,
    ];

    let mut last: Option<NodeId> = None;
    for (i, ty) in CHAIN.into_iter().enumerate() {
        let id = graph.add_node(ty, [i as f32 * NODE_SPACING, 0.0], cfg);
        if let Some(prev) = last {
            let from_socket = graph
                .node(prev)
                .and_then(|n| n.outputs().first())
                .map(|s| s.name().to_string());
            let to_socket = graph
                .node(id)
                .and_then(|n| n.inputs().first())
                .map(|s| s.name().to_string());
            if let (Some(from_socket), Some(to_socket)) = (from_socket, to_socket) {
                if let Err(err) = graph.add_link(prev, &from_socket, id, &to_socket) {
                    log::warn!("setup_node_tree: could not link {prev} -> {id}: {err}");
                }
            }
        }
        last = Some(id);
    }
}
