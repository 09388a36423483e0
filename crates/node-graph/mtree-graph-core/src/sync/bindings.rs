//! Per-type mapping from node fields and socket values to config fields.
//!
//! The mapping is emitted as a [`ConfigBatch`] rather than written in place,
//! so callers can inspect exactly which fields a node owns.

use mtree_config_core::{ConfigBatch, ConfigField};

use crate::node::{Node, NodeKind, RootFields};

/// Socket name → config field for value inputs.
type SocketBinding = (&'static str, ConfigField);

const ROOT_SOCKETS: &[SocketBinding] = &[
    ("length", ConfigField::RootsLength),
    ("split_proba", ConfigField::RootsSplitProba),
    ("ground_height", ConfigField::RootsGroundHeight),
];

const TRUNK_SOCKETS: &[SocketBinding] = &[
    ("trunk_length", ConfigField::TrunkSpace),
    ("split_proba", ConfigField::TrunkSplitProba),
    ("split_angle", ConfigField::TrunkSplitAngle),
    ("randomness", ConfigField::TrunkVariation),
    ("radius_decrease", ConfigField::TrunkRadiusDec),
];

const BRANCH_SOCKETS: &[SocketBinding] = &[
    ("length", ConfigField::BranchLength),
    ("variations", ConfigField::Randomangle),
    ("split_proba", ConfigField::SplitProba),
    ("split_angle", ConfigField::SplitAngle),
    ("break_chance", ConfigField::BreakChance),
    ("radius_decrease", ConfigField::RadiusDec),
    ("min_radius", ConfigField::BranchMinRadius),
    ("branches_rotation_angle", ConfigField::BranchRotate),
    ("branches_random_rotation_angle", ConfigField::BranchRandomRotate),
];

const FORCES_SOCKETS: &[SocketBinding] = &[
    ("gravity_strength", ConfigField::GravityStrength),
    ("point_force", ConfigField::FieldsPointStrength),
    ("wind", ConfigField::FieldsWindStrength),
    ("strength_limit", ConfigField::FieldsStrengthLimit),
];

const OBSTACLE_SOCKETS: &[SocketBinding] = &[("avoidance_strength", ConfigField::ObstacleStrength)];

const PRUNING_SOCKETS: &[SocketBinding] = &[("intensity", ConfigField::PruningIntensity)];

/// Config writes owned by `node`.
///
/// Socket values are read best-effort: a socket missing from the node simply
/// contributes no write, and the field keeps its previous value.
pub fn config_writes(node: &Node) -> ConfigBatch {
    let mut batch = ConfigBatch::new();
    match node.kind() {
        NodeKind::Root(f) => {
            batch.write(ConfigField::RootsIteration, int(f.iterations));
            batch.write(ConfigField::RootsStayUnderGround, f.stay_under_ground);
            batch.write(ConfigField::RootsRadius, f.radius.max(RootFields::MIN_RADIUS));
            pull_sockets(&mut batch, node, ROOT_SOCKETS);
        }
        NodeKind::Trunk(f) => {
            batch.write(ConfigField::PreserveTrunk, f.preserve_trunk);
            batch.write(ConfigField::FinishTrunk, f.finish_trunk);
            batch.write(ConfigField::UseGreasePencil, f.use_grease_pencil);
            batch.write(ConfigField::TrunkLength, int(f.trunk_iterations));
            batch.write(ConfigField::PreserveEnd, int(f.trunk_end));
            batch.write(ConfigField::Radius, f.radius);
            pull_sockets(&mut batch, node, TRUNK_SOCKETS);
        }
        NodeKind::Branch(f) => {
            batch.write(ConfigField::Iteration, int(f.iterations));
            pull_sockets(&mut batch, node, BRANCH_SOCKETS);
        }
        NodeKind::Output(f) => {
            batch.write(ConfigField::Uv, f.uv);
            batch.write(ConfigField::Seed, f.seed);
            batch.write(ConfigField::CreateMaterial, f.create_material);
            batch.write(ConfigField::BarkMaterial, f.material.as_str());
        }
        NodeKind::Twig(f) => {
            batch.write(ConfigField::TwigSeed, f.seed);
            batch.write(ConfigField::LeafSize, f.leaf_size);
            batch.write(ConfigField::LeafObject, f.leaf_object.as_str());
            batch.write(ConfigField::LeafWeight, f.leaf_weight);
            batch.write(ConfigField::LeafChance, f.leaf_proba);
            batch.write(ConfigField::TwigIteration, int(f.iterations));
            batch.write(ConfigField::TwigBarkMaterial, f.material.as_str());
        }
        NodeKind::Forces(f) => {
            batch.write(ConfigField::UseForceField, f.use_force_field);
            pull_sockets(&mut batch, node, FORCES_SOCKETS);
        }
        NodeKind::Vertex(f) => {
            batch.write(ConfigField::CreateLeafVertexGroup, f.create_leaf_vertex_group);
            batch.write(ConfigField::CreateVertexPaint, f.create_radius_vertex_paint);
            batch.write(ConfigField::LeafsIterationLength, int(f.group_expansion));
        }
        NodeKind::Obstacle(f) => {
            batch.write(ConfigField::Obstacle, f.obstacle.as_str());
            batch.write(ConfigField::ObstacleMode, f.mode.as_str());
            batch.write(ConfigField::ObstacleFlipNormals, f.flip_normals);
            pull_sockets(&mut batch, node, OBSTACLE_SOCKETS);
        }
        NodeKind::Particle(f) => {
            batch.write(ConfigField::Particle, f.emitter);
            batch.write(ConfigField::Number, int(f.number));
            batch.write(ConfigField::Display, int(f.viewport_number));
            batch.write(ConfigField::TwigParticle, f.leaf_object.as_str());
            batch.write(ConfigField::ParticleSize, f.leaf_size);
        }
        NodeKind::Pruning(f) => {
            // A pruning node in the graph switches pruning on.
            batch.write(ConfigField::Pruning, true);
            batch.write(ConfigField::PruningVoxelSize, int(f.voxel_size));
            pull_sockets(&mut batch, node, PRUNING_SOCKETS);
        }
        NodeKind::Armature(f) => {
            batch.write(ConfigField::CreateArmature, true);
            batch.write(ConfigField::BonesIterations, int(f.max_bones_iteration));
        }
        NodeKind::Curve(_) => {}
    }
    batch
}

fn pull_sockets(batch: &mut ConfigBatch, node: &Node, bindings: &[SocketBinding]) {
    for (socket, field) in bindings {
        match node.input_value(socket) {
            Some(value) => batch.write(*field, value),
            None => log::debug!(
                "{}: no value input `{}`, {} left as is",
                node.name(),
                socket,
                field
            ),
        }
    }
}

fn int(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeType, ObstacleFields, ObstacleMode};
    use crate::types::NodeId;
    use mtree_config_core::{ConfigValue, TreeConfig};

    fn node(ty: NodeType) -> Node {
        let cfg = TreeConfig::default();
        Node::new(NodeId(0), ty.label(), NodeKind::new(ty), [0.0, 0.0], &cfg)
    }

    fn value_of(batch: &ConfigBatch, field: ConfigField) -> Option<&ConfigValue> {
        batch.iter().rev().find(|op| op.field == field).map(|op| &op.value)
    }

    #[test]
    fn root_maps_iterations_to_roots_iteration() {
        let mut n = node(NodeType::Root);
        n.fields_mut::<RootFields>().unwrap().iterations = 4;
        let batch = config_writes(&n);
        assert_eq!(value_of(&batch, ConfigField::RootsIteration), Some(&ConfigValue::Int(4)));
    }

    #[test]
    fn root_radius_respects_floor() {
        let mut n = node(NodeType::Root);
        n.fields_mut::<RootFields>().unwrap().radius = -1.0;
        let batch = config_writes(&n);
        assert_eq!(
            value_of(&batch, ConfigField::RootsRadius),
            Some(&ConfigValue::Float(RootFields::MIN_RADIUS))
        );
    }

    #[test]
    fn obstacle_mode_written_as_text() {
        let mut n = node(NodeType::Obstacle);
        let f = n.fields_mut::<ObstacleFields>().unwrap();
        f.mode = ObstacleMode::Cut;
        f.obstacle = "Wall".into();
        let batch = config_writes(&n);
        assert_eq!(value_of(&batch, ConfigField::ObstacleMode), Some(&ConfigValue::from("CUT")));
        assert_eq!(value_of(&batch, ConfigField::Obstacle), Some(&ConfigValue::from("Wall")));
    }

    #[test]
    fn missing_socket_contributes_no_write() {
        let mut n = node(NodeType::Branch);
        n.remove_input("break_chance");
        let batch = config_writes(&n);
        assert!(value_of(&batch, ConfigField::BreakChance).is_none());
        assert!(value_of(&batch, ConfigField::SplitAngle).is_some());
    }

    #[test]
    fn curve_owns_no_fields() {
        assert!(config_writes(&node(NodeType::Curve)).is_empty());
    }

    #[test]
    fn writes_match_field_kinds() {
        for ty in NodeType::ALL {
            for op in config_writes(&node(*ty)).iter() {
                assert_eq!(op.value.kind(), op.field.kind(), "{ty:?} {}", op.field);
            }
        }
    }

    #[test]
    fn no_two_types_share_a_field() {
        let mut owner: Vec<(ConfigField, NodeType)> = Vec::new();
        for ty in NodeType::ALL {
            for field in config_writes(&node(*ty)).fields() {
                if let Some((_, other)) = owner.iter().find(|(f, _)| *f == field) {
                    panic!("{field} written by both {other:?} and {ty:?}");
                }
                owner.push((field, *ty));
            }
        }
    }
}
