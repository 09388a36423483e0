use hashbrown::HashMap;
use std::collections::VecDeque;

use crate::error::GraphError;
use crate::graph::Graph;
use crate::types::{Link, NodeId};

/// Kahn ordering of the graph's nodes along its links.
///
/// Nodes with no incoming links come first, in insertion order. Fails with
/// [`GraphError::Cycle`] if the links are not acyclic.
pub fn topo_order(graph: &Graph) -> Result<Vec<NodeId>, GraphError> {
    order_nodes(graph.node_ids(), graph.links())
}

pub(crate) fn order_nodes(
    nodes: impl IntoIterator<Item = NodeId>,
    links: &[Link],
) -> Result<Vec<NodeId>, GraphError> {
    let nodes: Vec<NodeId> = nodes.into_iter().collect();
    let mut indeg: HashMap<NodeId, usize> = nodes.iter().map(|id| (*id, 0)).collect();
    let mut adj: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

    for link in links {
        if !indeg.contains_key(&link.from_node) || !indeg.contains_key(&link.to_node) {
            continue;
        }
        adj.entry(link.from_node).or_default().push(link.to_node);
        *indeg.entry(link.to_node).or_default() += 1;
    }

    let mut q: VecDeque<NodeId> = nodes
        .iter()
        .filter(|id| indeg.get(*id).copied() == Some(0))
        .copied()
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(u) = q.pop_front() {
        order.push(u);
        if let Some(vs) = adj.get(&u) {
            for v in vs {
                if let Some(d) = indeg.get_mut(v) {
                    *d -= 1;
                    if *d == 0 {
                        q.push_back(*v);
                    }
                }
            }
        }
    }

    if order.len() != nodes.len() {
        let stuck = nodes
            .iter()
            .copied()
            .find(|id| indeg.get(id).copied().unwrap_or(0) > 0)
            .unwrap_or(NodeId(0));
        return Err(GraphError::Cycle(stuck));
    }
    Ok(order)
}
