//! Socket visibility derived from node fields.
//!
//! Every rule reads only the node's own fields, so nodes can be visited in any
//! order.

use crate::node::layout::{
    FORCE_FIELD_INPUTS, OBSTACLE_STRENGTH_INPUT, ROOT_VALUE_INPUTS, TRUNK_SPLIT_INPUTS,
};
use crate::node::{Node, NodeKind, ObstacleMode};

/// Which inputs a rule governs and whether they should currently be hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityRule {
    pub sockets: &'static [&'static str],
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityOutcome {
    /// The node type has no visibility rule.
    NoRule,
    /// The rule ran; `changed` sockets flipped their hidden flag.
    Applied { changed: usize },
    /// A governed socket was missing, so nothing was touched.
    Skipped { missing: &'static str },
}

pub fn visibility_rule(kind: &NodeKind) -> Option<VisibilityRule> {
    match kind {
        NodeKind::Root(f) => Some(VisibilityRule {
            sockets: ROOT_VALUE_INPUTS,
            hidden: f.iterations == 0,
        }),
        NodeKind::Trunk(f) => Some(VisibilityRule {
            sockets: TRUNK_SPLIT_INPUTS,
            hidden: !f.preserve_trunk,
        }),
        NodeKind::Forces(f) => Some(VisibilityRule {
            sockets: FORCE_FIELD_INPUTS,
            hidden: !f.use_force_field,
        }),
        NodeKind::Obstacle(f) => Some(VisibilityRule {
            sockets: &[OBSTACLE_STRENGTH_INPUT],
            hidden: f.mode != ObstacleMode::Avoid,
        }),
        _ => None,
    }
}

/// Evaluate the node's rule and flip only the sockets whose flag differs.
pub fn apply_visibility(node: &mut Node) -> VisibilityOutcome {
    let Some(rule) = visibility_rule(node.kind()) else {
        return VisibilityOutcome::NoRule;
    };

    if let Some(missing) = rule
        .sockets
        .iter()
        .copied()
        .find(|name| node.input(name).is_none())
    {
        return VisibilityOutcome::Skipped { missing };
    }

    let mut changed = 0;
    for name in rule.sockets {
        let flipped = node
            .input_mut(name)
            .map(|socket| socket.set_hidden(rule.hidden))
            .unwrap_or(false);
        if flipped {
            log::trace!("{}: {} hidden={}", node.name(), name, rule.hidden);
            changed += 1;
        }
    }
    VisibilityOutcome::Applied { changed }
}
