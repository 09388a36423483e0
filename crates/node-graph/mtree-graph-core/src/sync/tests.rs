//! Behavioural coverage for graph → config synchronization.

use std::time::{Duration, Instant};

use mtree_config_core::{ConfigField, ConfigValue, TreeConfig};

use super::*;
use crate::graph::{setup_node_tree, Graph};
use crate::node::{
    BranchFields, ForcesFields, Node, NodeKind, NodeType, ObstacleFields, ObstacleMode,
    OutputFields, RootFields, TrunkFields,
};
use crate::types::NodeId;

fn node(ty: NodeType, cfg: &TreeConfig) -> Node {
    Node::new(NodeId(0), ty.label(), NodeKind::new(ty), [0.0, 0.0], cfg)
}

fn hidden_inputs(node: &Node) -> Vec<String> {
    node.inputs()
        .iter()
        .filter(|s| s.is_hidden())
        .map(|s| s.name().to_string())
        .collect()
}

/// Move every value input away from its seeded default so a stale record
/// cannot pass for a synchronized one.
fn perturb_inputs(node: &mut Node) {
    let names: Vec<String> = node
        .inputs()
        .iter()
        .filter(|s| s.kind().carries_value())
        .map(|s| s.name().to_string())
        .collect();
    for (i, name) in names.iter().enumerate() {
        node.set_input_value(name, 0.3 + i as f32 * 0.05);
    }
}

fn expected_fields(ty: NodeType) -> &'static [ConfigField] {
    use ConfigField as F;
    match ty {
        NodeType::Root => &[
            F::RootsIteration,
            F::RootsStayUnderGround,
            F::RootsRadius,
            F::RootsLength,
            F::RootsSplitProba,
            F::RootsGroundHeight,
        ],
        NodeType::Trunk => &[
            F::PreserveTrunk,
            F::FinishTrunk,
            F::UseGreasePencil,
            F::TrunkLength,
            F::PreserveEnd,
            F::Radius,
            F::TrunkSpace,
            F::TrunkSplitProba,
            F::TrunkSplitAngle,
            F::TrunkVariation,
            F::TrunkRadiusDec,
        ],
        NodeType::Branch => &[
            F::Iteration,
            F::BranchLength,
            F::Randomangle,
            F::SplitProba,
            F::SplitAngle,
            F::BreakChance,
            F::RadiusDec,
            F::BranchMinRadius,
            F::BranchRotate,
            F::BranchRandomRotate,
        ],
        NodeType::Output => &[F::Uv, F::Seed, F::CreateMaterial, F::BarkMaterial],
        NodeType::Twig => &[
            F::TwigSeed,
            F::LeafSize,
            F::LeafObject,
            F::LeafWeight,
            F::LeafChance,
            F::TwigIteration,
            F::TwigBarkMaterial,
        ],
        NodeType::Forces => &[
            F::UseForceField,
            F::GravityStrength,
            F::FieldsPointStrength,
            F::FieldsWindStrength,
            F::FieldsStrengthLimit,
        ],
        NodeType::Vertex => &[
            F::CreateLeafVertexGroup,
            F::CreateVertexPaint,
            F::LeafsIterationLength,
        ],
        NodeType::Obstacle => &[
            F::Obstacle,
            F::ObstacleMode,
            F::ObstacleFlipNormals,
            F::ObstacleStrength,
        ],
        NodeType::Particle => &[
            F::Particle,
            F::Number,
            F::Display,
            F::TwigParticle,
            F::ParticleSize,
        ],
        NodeType::Pruning => &[F::Pruning, F::PruningVoxelSize, F::PruningIntensity],
        NodeType::Armature => &[F::CreateArmature, F::BonesIterations],
        NodeType::Curve => &[],
    }
}

// --- Mapping ---------------------------------------------------------------

#[test]
fn every_type_writes_its_whole_mapping() {
    let engine = SyncEngine::default();
    for ty in NodeType::ALL {
        let mut cfg = TreeConfig::default();
        let mut n = node(*ty, &cfg);
        perturb_inputs(&mut n);
        engine.update(&mut n, &mut cfg);

        let batch = config_writes(&n);
        assert_eq!(batch.fields(), expected_fields(*ty), "{ty:?}");
        for op in batch.iter() {
            assert_eq!(cfg.get(op.field), op.value, "{ty:?} {}", op.field);
        }
    }
}

#[test]
fn root_iterations_land_in_roots_iteration() {
    let engine = SyncEngine::default();
    let mut cfg = TreeConfig::default();
    let mut n = node(NodeType::Root, &cfg);
    n.fields_mut::<RootFields>().unwrap().iterations = 7;
    n.set_input_value("length", 2.5);
    engine.update(&mut n, &mut cfg);
    assert_eq!(cfg.roots_iteration, 7);
    assert_eq!(cfg.roots_length, 2.5);
}

#[test]
fn update_never_reads_back_from_the_record() {
    let engine = SyncEngine::default();
    let mut cfg = TreeConfig::default();
    let mut n = node(NodeType::Output, &cfg);
    n.fields_mut::<OutputFields>().unwrap().seed = 5;
    cfg.seed = 99;
    cfg.bark_material = "Stale".into();
    engine.update(&mut n, &mut cfg);
    assert_eq!(cfg.seed, 5);
    assert_eq!(cfg.bark_material, "");
    assert_eq!(n.fields::<OutputFields>().unwrap().seed, 5);
}

#[test]
fn stale_resource_names_pass_through() {
    let engine = SyncEngine::default();
    let mut cfg = TreeConfig::default();
    let mut n = node(NodeType::Obstacle, &cfg);
    n.fields_mut::<ObstacleFields>().unwrap().obstacle = "DeletedCube".into();
    engine.update(&mut n, &mut cfg);
    assert_eq!(cfg.obstacle, "DeletedCube");
}

// --- Idempotence -----------------------------------------------------------

#[test]
fn second_update_changes_nothing() {
    let engine = SyncEngine::default();
    for ty in NodeType::ALL {
        let mut cfg = TreeConfig::default();
        let mut n = node(*ty, &cfg);
        perturb_inputs(&mut n);

        engine.update(&mut n, &mut cfg);
        let cfg_after_first = cfg.clone();
        let hidden_after_first = hidden_inputs(&n);

        let second = engine.update(&mut n, &mut cfg);
        assert_eq!(cfg, cfg_after_first, "{ty:?}");
        assert_eq!(hidden_inputs(&n), hidden_after_first, "{ty:?}");
        assert!(
            !matches!(second.visibility, VisibilityOutcome::Applied { changed } if changed > 0),
            "{ty:?} flipped sockets on a repeat update"
        );
    }
}

// --- Clamping --------------------------------------------------------------

#[test]
fn out_of_range_socket_writes_are_clamped_before_sync() {
    let engine = SyncEngine::default();
    let mut cfg = TreeConfig::default();
    let mut n = node(NodeType::Branch, &cfg);
    n.set_input_value("branches_rotation_angle", 725.0);
    n.set_input_value("branches_random_rotation_angle", -10.0);
    n.set_input_value("length", -3.0);
    n.set_input_value("break_chance", 4.0);
    engine.update(&mut n, &mut cfg);
    assert_eq!(cfg.branch_rotate, 360.0);
    assert_eq!(cfg.branch_random_rotate, 0.0);
    assert_eq!(cfg.branch_length, 0.0);
    assert_eq!(cfg.break_chance, 1.0);
}

// --- Visibility ------------------------------------------------------------

#[test]
fn root_inputs_follow_iterations() {
    let engine = SyncEngine::default();
    let mut cfg = TreeConfig::default();
    let mut n = Node::new(
        NodeId(0),
        "Roots",
        NodeKind::Root(RootFields {
            iterations: 0,
            ..Default::default()
        }),
        [0.0, 0.0],
        &cfg,
    );

    engine.update(&mut n, &mut cfg);
    assert_eq!(n.inputs().len(), 3);
    assert!(n.inputs().iter().all(|s| s.is_hidden()));

    n.fields_mut::<RootFields>().unwrap().iterations = 3;
    let sync = engine.update(&mut n, &mut cfg);
    assert!(n.inputs().iter().all(|s| !s.is_hidden()));
    assert_eq!(sync.visibility, VisibilityOutcome::Applied { changed: 3 });
}

#[test]
fn obstacle_strength_shown_only_in_avoid_mode() {
    let engine = SyncEngine::default();
    let mut cfg = TreeConfig::default();
    let mut n = node(NodeType::Obstacle, &cfg);
    n.fields_mut::<ObstacleFields>().unwrap().mode = ObstacleMode::Cut;
    engine.update(&mut n, &mut cfg);
    assert_eq!(hidden_inputs(&n), vec!["avoidance_strength"]);
    assert_eq!(cfg.obstacle_mode, "CUT");

    n.fields_mut::<ObstacleFields>().unwrap().mode = ObstacleMode::Avoid;
    engine.update(&mut n, &mut cfg);
    assert!(hidden_inputs(&n).is_empty());
    assert_eq!(cfg.obstacle_mode, "AVOID");
}

#[test]
fn trunk_and_forces_rules() {
    let engine = SyncEngine::default();
    let mut cfg = TreeConfig::default();

    let mut trunk = node(NodeType::Trunk, &cfg);
    engine.update(&mut trunk, &mut cfg);
    assert!(hidden_inputs(&trunk).is_empty());
    trunk.fields_mut::<TrunkFields>().unwrap().preserve_trunk = false;
    engine.update(&mut trunk, &mut cfg);
    assert_eq!(hidden_inputs(&trunk), vec!["split_proba", "split_angle"]);
    assert!(!cfg.preserve_trunk);

    let mut forces = node(NodeType::Forces, &cfg);
    forces.fields_mut::<ForcesFields>().unwrap().use_force_field = true;
    engine.update(&mut forces, &mut cfg);
    assert!(hidden_inputs(&forces).is_empty());
}

#[test]
fn missing_socket_skips_visibility_but_still_writes() {
    let engine = SyncEngine::default();
    let mut cfg = TreeConfig::default();
    let mut n = node(NodeType::Trunk, &cfg);
    n.remove_input("split_angle");
    let trunk = n.fields_mut::<TrunkFields>().unwrap();
    trunk.preserve_trunk = false;
    trunk.trunk_iterations = 11;
    n.set_input_value("split_proba", 0.9);

    let sync = engine.update(&mut n, &mut cfg);
    assert_eq!(
        sync.visibility,
        VisibilityOutcome::Skipped {
            missing: "split_angle"
        }
    );
    assert!(hidden_inputs(&n).is_empty());
    assert_eq!(cfg.trunk_length, 11);
    assert_eq!(cfg.trunk_split_proba, 0.9);
    assert_eq!(cfg.trunk_split_angle, TreeConfig::default().trunk_split_angle);
}

// --- Graph walks -----------------------------------------------------------

fn canonical() -> (Graph, TreeConfig) {
    let cfg = TreeConfig::default();
    let mut graph = Graph::new(cfg.node_tree.clone());
    setup_node_tree(&mut graph, &cfg);
    (graph, cfg)
}

#[test]
fn update_all_walks_every_node() {
    let engine = SyncEngine::default();
    let (mut graph, mut cfg) = canonical();
    let branch = graph.node_ids()[2];
    graph
        .node_mut(branch)
        .and_then(|n| n.fields_mut::<BranchFields>())
        .unwrap()
        .iterations = 40;

    let report = engine.update_all(&mut graph, &mut cfg);
    assert!(report.walked());
    assert_eq!(report.nodes_updated, 4);
    assert_eq!(cfg.iteration, 40);
    assert!(graph.last_sync().is_some());
}

#[test]
fn walks_are_throttled_per_graph() {
    let engine = SyncEngine::default();
    let (mut graph, mut cfg) = canonical();
    let t0 = Instant::now();

    let first = engine.update_all_at(&mut graph, &mut cfg, t0);
    let second = engine.update_all_at(&mut graph, &mut cfg, t0 + Duration::from_millis(400));
    let at_interval = engine.update_all_at(&mut graph, &mut cfg, t0 + Duration::from_secs(1));
    let third = engine.update_all_at(&mut graph, &mut cfg, t0 + Duration::from_millis(1500));

    assert!(first.walked());
    assert_eq!(second.skipped, Some(SkipReason::Throttled));
    assert_eq!(at_interval.skipped, Some(SkipReason::Throttled));
    assert!(third.walked());
    assert_eq!(graph.last_sync(), Some(t0 + Duration::from_millis(1500)));
}

#[test]
fn structural_syncs_stamp_the_callers_clock() {
    let engine = SyncEngine::default();
    let (mut graph, mut cfg) = canonical();
    let t0 = Instant::now() + Duration::from_secs(60);

    let edited = engine.handle(HostEvent::GraphEdited(t0), &mut graph, &mut cfg);
    assert!(edited.walked());
    assert_eq!(graph.last_sync(), Some(t0));

    let tick = t0 + Duration::from_millis(500);
    let throttled = engine.handle(HostEvent::SceneUpdated(tick), &mut graph, &mut cfg);
    assert_eq!(throttled.skipped, Some(SkipReason::Throttled));

    let later = engine.update_all_at(&mut graph, &mut cfg, t0 + Duration::from_millis(1500));
    assert!(later.walked());

    let resync = engine.sync_at(&mut graph, &mut cfg, t0 + Duration::from_millis(1600));
    assert!(resync.walked());
    assert_eq!(graph.last_sync(), Some(t0 + Duration::from_millis(1600)));
}

#[test]
fn throttle_interval_is_configurable() {
    let engine = SyncEngine::new(SyncSettings {
        min_interval: Duration::from_millis(100),
        ..Default::default()
    });
    let (mut graph, mut cfg) = canonical();
    let t0 = Instant::now();
    assert!(engine.update_all_at(&mut graph, &mut cfg, t0).walked());
    assert!(engine
        .update_all_at(&mut graph, &mut cfg, t0 + Duration::from_millis(150))
        .walked());
}

#[test]
fn disabled_workflow_is_a_no_op() {
    let engine = SyncEngine::default();
    let (mut graph, mut cfg) = canonical();
    cfg.use_node_workflow = false;
    let root = graph.node_ids()[0];
    graph
        .node_mut(root)
        .and_then(|n| n.fields_mut::<RootFields>())
        .unwrap()
        .iterations = 9;
    let before = cfg.clone();

    assert_eq!(
        engine.update_all(&mut graph, &mut cfg).skipped,
        Some(SkipReason::Disabled)
    );
    assert_eq!(
        engine.handle(HostEvent::GraphEdited(Instant::now()), &mut graph, &mut cfg).skipped,
        Some(SkipReason::Disabled)
    );
    assert_eq!(cfg, before);
    assert!(graph.last_sync().is_none());
}

#[test]
fn inert_nodes_can_be_skipped() {
    let (mut graph, mut cfg) = canonical();
    let loose = graph.add_node(NodeType::Output, [0.0, 400.0], &cfg);
    graph
        .node_mut(loose)
        .and_then(|n| n.fields_mut::<OutputFields>())
        .unwrap()
        .seed = 1234;

    let engine = SyncEngine::new(SyncSettings {
        skip_inert_nodes: true,
        ..Default::default()
    });
    let report = engine.sync_now(&mut graph, &mut cfg);
    assert_eq!(report.nodes_updated, 4);
    assert_eq!(cfg.seed, 42);

    let report = SyncEngine::default().sync_now(&mut graph, &mut cfg);
    assert_eq!(report.nodes_updated, 5);
    assert_eq!(cfg.seed, 1234);
}

#[test]
fn curve_nodes_are_not_walked() {
    let engine = SyncEngine::default();
    let (mut graph, mut cfg) = canonical();
    graph.add_node(NodeType::Curve, [0.0, 300.0], &cfg);
    let report = engine.sync_now(&mut graph, &mut cfg);
    assert_eq!(report.nodes_updated, 4);
}

// --- Host events -----------------------------------------------------------

#[test]
fn node_edit_updates_only_that_node() {
    let engine = SyncEngine::default();
    let (mut graph, mut cfg) = canonical();
    let ids = graph.node_ids();
    graph
        .node_mut(ids[0])
        .and_then(|n| n.fields_mut::<RootFields>())
        .unwrap()
        .iterations = 0;
    graph
        .node_mut(ids[2])
        .and_then(|n| n.fields_mut::<BranchFields>())
        .unwrap()
        .iterations = 3;

    let report = engine.handle(HostEvent::NodeEdited(ids[0]), &mut graph, &mut cfg);
    assert_eq!(report.nodes_updated, 1);
    assert_eq!(report.sockets_changed, 3);
    assert_eq!(cfg.roots_iteration, 0);
    assert_eq!(cfg.iteration, TreeConfig::default().iteration);
    assert!(graph.last_sync().is_none());
}

#[test]
fn edit_for_deleted_node_is_skipped() {
    let engine = SyncEngine::default();
    let (mut graph, mut cfg) = canonical();
    let report = engine.handle(HostEvent::NodeEdited(NodeId(99)), &mut graph, &mut cfg);
    assert_eq!(report.skipped, Some(SkipReason::UnknownNode(NodeId(99))));
}

#[test]
fn scene_update_only_drives_the_active_graph() {
    let engine = SyncEngine::default();
    let cfg_seed = TreeConfig::default();
    let mut active = Graph::new(cfg_seed.node_tree.clone());
    let mut other = Graph::new("Scratch");
    setup_node_tree(&mut active, &cfg_seed);
    setup_node_tree(&mut other, &cfg_seed);
    let mut cfg = cfg_seed;

    let now = Instant::now();
    let reports = engine.scene_update([&mut active, &mut other], &mut cfg, now);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].walked());
    assert!(active.last_sync().is_some());
    assert!(other.last_sync().is_none());

    let event = HostEvent::SceneUpdated(now + Duration::from_millis(10));
    let report = engine.handle(event, &mut active, &mut cfg);
    assert_eq!(report.skipped, Some(SkipReason::Throttled));
}

#[test]
fn rejected_writes_are_counted_not_fatal() {
    // Every mapped write has the right kind, so a clean walk rejects nothing.
    let engine = SyncEngine::default();
    let (mut graph, mut cfg) = canonical();
    let report = engine.sync_now(&mut graph, &mut cfg);
    assert_eq!(report.rejected_writes, 0);
    assert!(report.writes > 0);
    assert_eq!(cfg.get(ConfigField::RootsIteration), ConfigValue::Int(1));
}
