//! Fixed socket layouts per node type.
//!
//! Input defaults are seeded from the configuration record so a new node
//! starts out showing the values the growth engine would currently use.

use mtree_config_core::TreeConfig;

use super::NodeType;
use crate::socket::Socket;

/// Link socket chaining tree stages from a modifier or output node.
pub const TREE: &str = "tree";

/// The three value inputs of a Root node, hidden together.
pub const ROOT_VALUE_INPUTS: &[&str] = &["length", "split_proba", "ground_height"];
/// Trunk inputs that only apply while the trunk is preserved.
pub const TRUNK_SPLIT_INPUTS: &[&str] = &["split_proba", "split_angle"];
/// Forces inputs that only apply with a force field.
pub const FORCE_FIELD_INPUTS: &[&str] = &["point_force", "wind", "strength_limit"];
pub const OBSTACLE_STRENGTH_INPUT: &str = "avoidance_strength";

/// Build the (inputs, outputs) sockets for a fresh node of type `ty`.
pub fn sockets_for(ty: NodeType, cfg: &TreeConfig) -> (Vec<Socket>, Vec<Socket>) {
    match ty {
        NodeType::Root => (
            vec![
                Socket::bounded("length", cfg.roots_length),
                Socket::probability("split_proba", cfg.roots_split_proba),
                Socket::free("ground_height", cfg.roots_ground_height),
            ],
            vec![Socket::link("trunk")],
        ),
        NodeType::Trunk => (
            vec![
                Socket::link("trunk"),
                Socket::bounded("trunk_length", cfg.trunk_space),
                Socket::probability("split_proba", cfg.trunk_split_proba),
                Socket::bounded("split_angle", cfg.trunk_split_angle),
                Socket::free("randomness", cfg.trunk_variation),
                Socket::bounded("radius_decrease", cfg.trunk_radius_dec),
            ],
            vec![Socket::link("branches")],
        ),
        NodeType::Branch => (
            vec![
                Socket::link("branches"),
                Socket::bounded("length", cfg.branch_length),
                Socket::free("variations", cfg.randomangle),
                Socket::probability("split_proba", cfg.split_proba),
                Socket::bounded("split_angle", cfg.split_angle),
                Socket::probability("break_chance", cfg.break_chance),
                Socket::bounded("radius_decrease", cfg.radius_dec),
                Socket::bounded("min_radius", cfg.branch_min_radius),
                Socket::angle("branches_rotation_angle", cfg.branch_rotate),
                Socket::angle("branches_random_rotation_angle", cfg.branch_random_rotate),
            ],
            vec![Socket::link(TREE)],
        ),
        NodeType::Output => (vec![Socket::link(TREE)], Vec::new()),
        NodeType::Twig => (Vec::new(), Vec::new()),
        NodeType::Forces => (
            vec![
                Socket::link(TREE),
                Socket::free("gravity_strength", cfg.gravity_strength),
                Socket::free("point_force", cfg.fields_point_strength),
                Socket::free("wind", cfg.fields_wind_strength),
                Socket::free("strength_limit", cfg.fields_strength_limit),
            ],
            vec![Socket::link(TREE)],
        ),
        NodeType::Obstacle => (
            vec![
                Socket::link(TREE),
                Socket::bounded(OBSTACLE_STRENGTH_INPUT, cfg.obstacle_strength),
            ],
            vec![Socket::link(TREE)],
        ),
        NodeType::Pruning => (
            vec![
                Socket::link(TREE),
                Socket::free("intensity", cfg.pruning_intensity),
            ],
            vec![Socket::link(TREE)],
        ),
        NodeType::Vertex | NodeType::Particle | NodeType::Armature => {
            (vec![Socket::link(TREE)], vec![Socket::link(TREE)])
        }
        NodeType::Curve => (Vec::new(), vec![Socket::free("value", 0.0)]),
    }
}
