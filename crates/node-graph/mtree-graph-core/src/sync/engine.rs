//! Graph → config propagation and the throttled graph walk.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use mtree_config_core::{ConfigError, TreeConfig};

use super::bindings::config_writes;
use super::visibility::{apply_visibility, VisibilityOutcome};
use crate::graph::Graph;
use crate::node::Node;
use crate::types::NodeId;

/// Engine tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Minimum time between two throttled walks of the same graph.
    pub min_interval: Duration,
    /// Skip nodes that are not connected to a Root node.
    pub skip_inert_nodes: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(1),
            skip_inert_nodes: false,
        }
    }
}

/// Notifications delivered by the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A single node's fields or sockets were edited.
    NodeEdited(NodeId),
    /// The graph structure changed (nodes or links added/removed).
    GraphEdited(Instant),
    /// Global scene-update notification; drives the throttled walk.
    SceneUpdated(Instant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Graph-driven editing is switched off.
    Disabled,
    /// The previous walk is too recent.
    Throttled,
    /// The edited node no longer exists.
    UnknownNode(NodeId),
}

/// Result of synchronizing one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSync {
    pub visibility: VisibilityOutcome,
    pub writes: usize,
    pub rejected: Vec<ConfigError>,
}

/// Summary of one `update_all`-style call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub skipped: Option<SkipReason>,
    pub nodes_updated: usize,
    pub sockets_changed: usize,
    pub visibility_skipped: usize,
    pub writes: usize,
    pub rejected_writes: usize,
}

impl SyncReport {
    fn skipped(reason: SkipReason) -> Self {
        SyncReport {
            skipped: Some(reason),
            ..Default::default()
        }
    }

    /// Whether any node was visited.
    pub fn walked(&self) -> bool {
        self.skipped.is_none()
    }

    fn record(&mut self, sync: &NodeSync) {
        self.nodes_updated += 1;
        self.writes += sync.writes;
        self.rejected_writes += sync.rejected.len();
        match sync.visibility {
            VisibilityOutcome::Applied { changed } => self.sockets_changed += changed,
            VisibilityOutcome::Skipped { .. } => self.visibility_skipped += 1,
            VisibilityOutcome::NoRule => {}
        }
    }
}

/// Pushes node state into the configuration record.
///
/// The engine never fails: structural problems are skipped, logged and
/// counted in the returned reports so the host's edit loop keeps running.
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    pub settings: SyncSettings,
}

impl SyncEngine {
    pub fn new(settings: SyncSettings) -> Self {
        Self { settings }
    }

    /// Refresh `node`'s socket visibility, then write its mapped fields into
    /// `config`. Calling it twice without edits in between changes nothing.
    pub fn update(&self, node: &mut Node, config: &mut TreeConfig) -> NodeSync {
        let visibility = apply_visibility(node);
        if let VisibilityOutcome::Skipped { missing } = visibility {
            log::warn!(
                "{}: socket `{}` missing, visibility left unchanged",
                node.name(),
                missing
            );
        }

        let batch = config_writes(node);
        let rejected = config.apply_batch(&batch);
        for err in &rejected {
            log::warn!("{}: {}", node.name(), err);
        }
        NodeSync {
            visibility,
            writes: batch.len(),
            rejected,
        }
    }

    /// Throttled walk using the current time. See [`SyncEngine::update_all_at`].
    pub fn update_all(&self, graph: &mut Graph, config: &mut TreeConfig) -> SyncReport {
        self.update_all_at(graph, config, Instant::now())
    }

    /// Walk every node of `graph` unless graph-driven editing is off or the
    /// last walk happened no more than `min_interval` before `now`.
    pub fn update_all_at(
        &self,
        graph: &mut Graph,
        config: &mut TreeConfig,
        now: Instant,
    ) -> SyncReport {
        if !config.use_node_workflow {
            return SyncReport::skipped(SkipReason::Disabled);
        }
        if let Some(last) = graph.last_sync() {
            if now.saturating_duration_since(last) <= self.settings.min_interval {
                log::trace!("{}: walk throttled", graph.name);
                return SyncReport::skipped(SkipReason::Throttled);
            }
        }
        self.walk(graph, config, now)
    }

    /// Unthrottled walk using the current time. See [`SyncEngine::sync_at`].
    pub fn sync_now(&self, graph: &mut Graph, config: &mut TreeConfig) -> SyncReport {
        self.sync_at(graph, config, Instant::now())
    }

    /// Unthrottled walk for structural edits, stamped with `now` so later
    /// throttled ticks measure against the same clock. Still a no-op when
    /// graph-driven editing is off.
    pub fn sync_at(
        &self,
        graph: &mut Graph,
        config: &mut TreeConfig,
        now: Instant,
    ) -> SyncReport {
        if !config.use_node_workflow {
            return SyncReport::skipped(SkipReason::Disabled);
        }
        self.walk(graph, config, now)
    }

    /// Route a host notification to the matching entry point.
    pub fn handle(
        &self,
        event: HostEvent,
        graph: &mut Graph,
        config: &mut TreeConfig,
    ) -> SyncReport {
        match event {
            HostEvent::NodeEdited(id) => {
                if !config.use_node_workflow {
                    return SyncReport::skipped(SkipReason::Disabled);
                }
                let Some(node) = graph.node_mut(id) else {
                    log::debug!("{}: edit for missing {}", graph.name, id);
                    return SyncReport::skipped(SkipReason::UnknownNode(id));
                };
                let mut report = SyncReport::default();
                if node.node_type().declares_update() {
                    let sync = self.update(node, config);
                    report.record(&sync);
                }
                report
            }
            HostEvent::GraphEdited(now) => self.sync_at(graph, config, now),
            HostEvent::SceneUpdated(now) => self.update_all_at(graph, config, now),
        }
    }

    /// Global scene-update notification: only the graph named by
    /// `config.node_tree` drives the record.
    pub fn scene_update<'a>(
        &self,
        graphs: impl IntoIterator<Item = &'a mut Graph>,
        config: &mut TreeConfig,
        now: Instant,
    ) -> Vec<SyncReport> {
        let mut reports = Vec::new();
        for graph in graphs {
            if graph.name == config.node_tree {
                reports.push(self.update_all_at(graph, config, now));
            }
        }
        reports
    }

    fn walk(&self, graph: &mut Graph, config: &mut TreeConfig, now: Instant) -> SyncReport {
        let live = self.settings.skip_inert_nodes.then(|| graph.tree_nodes());
        let mut report = SyncReport::default();
        for node in graph.nodes_mut() {
            if !node.node_type().declares_update() {
                continue;
            }
            if let Some(live) = &live {
                if !live.contains(&node.id()) {
                    continue;
                }
            }
            let sync = self.update(node, config);
            report.record(&sync);
        }
        graph.mark_synced(now);
        log::debug!(
            "{}: synced {} nodes ({} writes, {} sockets toggled)",
            graph.name,
            report.nodes_updated,
            report.writes,
            report.sockets_changed
        );
        report
    }
}
