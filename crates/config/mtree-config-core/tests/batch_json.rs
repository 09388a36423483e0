use mtree_config_core::{ConfigBatch, ConfigError, ConfigField, ConfigValue, TreeConfig};
use serde_json::{json, Value as JsonValue};

#[test]
fn batch_serializes_as_tagged_writes() {
    let mut batch = ConfigBatch::new();
    batch.write(ConfigField::RootsIteration, 3);
    batch.write(ConfigField::ObstacleMode, "CUT");
    batch.write(ConfigField::Uv, false);

    let value: JsonValue = serde_json::to_value(&batch).expect("serialize batch");
    assert_eq!(
        value,
        json!([
            { "field": "roots_iteration", "value": { "type": "int", "data": 3 } },
            { "field": "obstacle_mode", "value": { "type": "text", "data": "CUT" } },
            { "field": "uv", "value": { "type": "bool", "data": false } }
        ])
    );
}

#[test]
fn host_supplied_batch_applies_in_order() {
    let batch: ConfigBatch = serde_json::from_value(json!([
        { "field": "seed", "value": { "type": "int", "data": 1 } },
        { "field": "seed", "value": { "type": "int", "data": 9 } },
        { "field": "branch_length", "value": { "type": "float", "data": 1.5 } }
    ]))
    .expect("parse batch");

    let mut cfg = TreeConfig::default();
    assert!(cfg.apply_batch(&batch).is_empty());
    assert_eq!(cfg.seed, 9);
    assert_eq!(cfg.branch_length, 1.5);
    assert_eq!(batch.fields(), vec![ConfigField::Seed, ConfigField::BranchLength]);
}

#[test]
fn mistyped_writes_are_reported_and_skipped() {
    let mut batch = ConfigBatch::new();
    batch.write(ConfigField::Seed, "forty-two");
    batch.write(ConfigField::Iteration, 12);

    let mut cfg = TreeConfig::default();
    let rejected = cfg.apply_batch(&batch);
    assert_eq!(rejected.len(), 1);
    assert!(matches!(
        rejected[0],
        ConfigError::TypeMismatch { field: "seed", .. }
    ));
    assert_eq!(cfg.seed, 42);
    assert_eq!(cfg.iteration, 12);
}

#[test]
fn unknown_field_names_fail_to_parse() {
    let err = serde_json::from_value::<ConfigBatch>(json!([
        { "field": "no_such_field", "value": { "type": "int", "data": 1 } }
    ]));
    assert!(err.is_err());
    assert_eq!(
        "no_such_field".parse::<ConfigField>(),
        Err(ConfigError::UnknownField("no_such_field".into()))
    );
}

#[test]
fn config_fixtures_fill_missing_fields_with_defaults() {
    for name in mtree_test_fixtures::configs::keys() {
        let json = mtree_test_fixtures::configs::json(&name).expect("config fixture");
        let cfg = TreeConfig::from_json_str(&json).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(cfg.roots_length, TreeConfig::default().roots_length, "{name}");
    }

    let scratch: TreeConfig = mtree_test_fixtures::configs::load("scratch-tree").expect("load");
    assert_eq!(scratch.node_tree, "Scratch");
    assert_eq!(scratch.seed, 5);
    assert!(scratch.use_node_workflow);

    let disabled: TreeConfig = mtree_test_fixtures::configs::load("disabled").expect("load");
    assert!(!disabled.use_node_workflow);
}

#[test]
fn record_round_trips_every_field() {
    let mut cfg = TreeConfig::default();
    cfg.bark_material = "Oak".into();
    cfg.gravity_strength = -0.5;
    let text = cfg.to_json_string().expect("serialize");
    let back = TreeConfig::from_json_str(&text).expect("parse");
    for field in ConfigField::ALL {
        assert_eq!(back.get(*field), cfg.get(*field), "{field}");
    }
    assert_eq!(back.get(ConfigField::BarkMaterial), ConfigValue::from("Oak"));
}
