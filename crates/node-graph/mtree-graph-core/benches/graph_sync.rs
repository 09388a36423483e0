//! Cost of a full graph walk as the number of modifier nodes grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mtree_config_core::TreeConfig;
use mtree_graph_core::{setup_node_tree, Graph, GraphDoc, NodeType, SyncEngine};

/// Canonical chain plus `extra` detached modifier nodes.
fn build_graph(extra: usize, cfg: &TreeConfig) -> Graph {
    const MODIFIERS: [NodeType; 4] = [
        NodeType::Forces,
        NodeType::Obstacle,
        NodeType::Pruning,
        NodeType::Twig,
    ];
    let mut graph = Graph::new(cfg.node_tree.clone());
    setup_node_tree(&mut graph, cfg);
    for i in 0..extra {
        let ty = MODIFIERS[i % MODIFIERS.len()];
        graph.add_node(ty, [i as f32 * 260.0, 300.0], cfg);
    }
    graph
}

fn bench_sync_now(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_now");
    for extra in [0usize, 16, 128] {
        let mut cfg = TreeConfig::default();
        let mut graph = build_graph(extra, &cfg);
        let engine = SyncEngine::default();
        group.bench_with_input(BenchmarkId::from_parameter(extra), &extra, |b, _| {
            b.iter(|| black_box(engine.sync_now(&mut graph, &mut cfg)));
        });
    }
    group.finish();
}

fn bench_document_round_trip(c: &mut Criterion) {
    let cfg = TreeConfig::default();
    let graph = build_graph(32, &cfg);
    let json = GraphDoc::from_graph(&graph)
        .to_json_string()
        .expect("serialize doc");
    c.bench_function("doc_round_trip_32", |b| {
        b.iter(|| {
            let doc = GraphDoc::from_json_str(black_box(&json)).expect("parse doc");
            black_box(doc.into_graph(&cfg).expect("rebuild graph"))
        });
    });
}

criterion_group!(benches, bench_sync_now, bench_document_round_trip);
criterion_main!(benches);
