//! Radialization: collapse each connected component into a spanning tree.
//!
//! Distribution feeders are operated radially, but survey data regularly
//! contains accidental loops (double-entered spans, ring closures left in
//! the export). This stage walks each component breadth-first from its
//! lowest-sorting node id and removes every edge that would close a
//! cycle, leaving `edge count == node count - 1` per component.
//!
//! Determinism: the outer scan visits node ids in sorted order, incident
//! edges are processed in a fixed id order, and when several edges would
//! close the same cycle the lowest conductor id is the one dropped.
//! Running the fixer on its own output removes nothing.
//!
//! Multiple components are a valid, reported outcome. Real sites contain
//! independent feeders; stitching them together is explicitly not this
//! stage's job.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use tracing::debug;

use radial_core::Network;

/// Per-component outcome of the radialization pass.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentInfo {
    /// Component id by first-discovery order
    pub id: usize,
    /// BFS root: lowest-sorting node id in the component
    pub root: String,
    pub node_count: usize,
    /// Member node ids, sorted
    pub members: Vec<String>,
    /// Conductor ids removed to break cycles
    pub removed_edges: Vec<String>,
}

/// Audit report for the whole pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopologyReport {
    pub components: Vec<ComponentInfo>,
    pub edges_removed_total: usize,
}

/// Rewrites a cleaned network so every component is a spanning tree.
pub struct TopologyFixer;

impl TopologyFixer {
    pub fn fix(network: &mut Network) -> TopologyReport {
        let mut report = TopologyReport::default();
        let mut visited = HashSet::new();
        let node_ids: Vec<String> = network.node_ids().cloned().collect();

        for root_id in node_ids {
            let root_idx = match network.node_index(&root_id) {
                Some(idx) if !visited.contains(&idx) => idx,
                _ => continue,
            };

            let component_id = report.components.len();
            let mut members = Vec::new();
            let mut tree_edges = HashSet::new();
            let mut cycle_edges = Vec::new();
            let mut queue = VecDeque::new();

            visited.insert(root_idx);
            queue.push_back(root_idx);

            while let Some(node_idx) = queue.pop_front() {
                members.push(network.graph[node_idx].id.clone());
                // Descending id order: when a parallel pair closes a cycle
                // the higher id becomes the tree edge and the lower id is
                // the one removed.
                for (edge_idx, neighbor) in network.sorted_edges(node_idx).into_iter().rev() {
                    if tree_edges.contains(&edge_idx) {
                        continue;
                    }
                    if visited.insert(neighbor) {
                        tree_edges.insert(edge_idx);
                        queue.push_back(neighbor);
                    } else if !cycle_edges.contains(&edge_idx) {
                        cycle_edges.push(edge_idx);
                    }
                }
            }

            let mut removed_edges: Vec<String> = cycle_edges
                .iter()
                .map(|e| network.graph[*e].id.clone())
                .collect();
            removed_edges.sort();
            for edge_idx in cycle_edges {
                debug!(conductor = %network.graph[edge_idx].id, component = component_id,
                       "removing cycle-closing conductor");
                network.graph.remove_edge(edge_idx);
            }

            members.sort();
            report.edges_removed_total += removed_edges.len();
            report.components.push(ComponentInfo {
                id: component_id,
                root: root_id,
                node_count: members.len(),
                members,
                removed_edges,
            });
        }

        report
    }
}
