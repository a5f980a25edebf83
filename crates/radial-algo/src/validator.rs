//! Standalone structural audit of raw records and built networks.
//!
//! The validator shares no state with the repair pipeline and never
//! mutates anything; it reports what it sees and leaves acting on the
//! findings to the caller. Running it before and after a repair pass
//! shows exactly what the pipeline changed.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use petgraph::stable_graph::NodeIndex;

use radial_core::{Diagnostics, Network, NodeKind};

use crate::builder::{RawConductor, RawNode};

/// Read-only structural checks.
pub struct Validator;

impl Validator {
    /// Audit raw records before any graph is built: duplicate ids and
    /// dangling endpoint references.
    pub fn validate_records(nodes: &[RawNode], conductors: &[RawConductor]) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        // Duplicate ids within a kind are data errors; a pole sharing an
        // id with a connection is the survey format's known duplication
        // and only worth a warning.
        let mut by_kind: BTreeMap<(&str, NodeKind), usize> = BTreeMap::new();
        for node in nodes {
            *by_kind.entry((node.id.as_str(), node.kind)).or_insert(0) += 1;
        }
        for ((id, kind), count) in &by_kind {
            if *count > 1 {
                diagnostics.add_error_with_ids(
                    "duplicate-node",
                    &format!("node id appears {count} times as {kind:?}"),
                    &[id],
                );
            }
        }
        let pole_ids: HashSet<&str> = nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Pole)
            .map(|n| n.id.as_str())
            .collect();
        for node in nodes {
            if node.kind == NodeKind::Connection && pole_ids.contains(node.id.as_str()) {
                diagnostics.add_warning_with_ids(
                    "pole-connection-overlap",
                    "id listed as both pole and connection; connection record takes precedence",
                    &[node.id.as_str()],
                );
            }
        }

        let mut conductor_ids: BTreeMap<&str, usize> = BTreeMap::new();
        for conductor in conductors {
            *conductor_ids.entry(conductor.id.as_str()).or_insert(0) += 1;
        }
        for (id, count) in &conductor_ids {
            if *count > 1 {
                diagnostics.add_error_with_ids(
                    "duplicate-conductor",
                    &format!("conductor id appears {count} times"),
                    &[id],
                );
            }
        }

        let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        for conductor in conductors {
            let mut dangling = Vec::new();
            if !node_ids.contains(conductor.from_node.as_str()) {
                dangling.push(conductor.from_node.as_str());
            }
            if !node_ids.contains(conductor.to_node.as_str()) {
                dangling.push(conductor.to_node.as_str());
            }
            if !dangling.is_empty() {
                dangling.insert(0, conductor.id.as_str());
                diagnostics.add_error_with_ids(
                    "dangling-reference",
                    "conductor references node ids not present in the record set",
                    &dangling,
                );
            }
            if conductor.from_node == conductor.to_node {
                diagnostics.add_warning_with_ids(
                    "self-loop",
                    "conductor connects a node to itself",
                    &[conductor.id.as_str()],
                );
            }
        }

        diagnostics
    }

    /// Audit a built network: unresolved conductors, orphan nodes,
    /// component count and residual cycles.
    pub fn validate_network(network: &Network) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        for unresolved in &network.unresolved {
            let mut ids = vec![unresolved.conductor.id.as_str()];
            ids.extend(unresolved.missing.iter().map(String::as_str));
            diagnostics.add_error_with_ids(
                "unresolved-conductor",
                "conductor endpoint missing from the graph",
                &ids,
            );
        }

        let orphans: Vec<&String> = network
            .node_ids()
            .filter(|id| network.degree_of(id) == 0)
            .collect();
        if !orphans.is_empty() {
            diagnostics.add_warning_with_ids(
                "orphan-node",
                &format!("{} node(s) have no incident conductor", orphans.len()),
                &orphans,
            );
        }

        let components = Self::components(network);
        diagnostics.add_info(
            "components",
            &format!("network has {} connected component(s)", components.len()),
        );
        // Cycles are what the topology fixer exists for, so before repair
        // they are expected; informational, not an error.
        for (root, node_count, edge_count) in &components {
            if *edge_count + 1 > *node_count {
                diagnostics.add_info_with_ids(
                    "cycle",
                    &format!(
                        "component has {} conductors for {} nodes; contains at least one cycle",
                        edge_count, node_count
                    ),
                    &[root.as_str()],
                );
            }
        }

        diagnostics
    }

    /// Per-component (root id, node count, edge count), discovered by BFS
    /// over node ids in sorted order.
    fn components(network: &Network) -> Vec<(String, usize, usize)> {
        let mut membership: HashMap<NodeIndex, usize> = HashMap::new();
        let mut out: Vec<(String, usize, usize)> = Vec::new();

        let node_ids: Vec<String> = network.node_ids().cloned().collect();
        for root_id in node_ids {
            let root_idx = match network.node_index(&root_id) {
                Some(idx) if !membership.contains_key(&idx) => idx,
                _ => continue,
            };
            let component = out.len();
            let mut node_count = 0usize;
            let mut queue = VecDeque::new();
            membership.insert(root_idx, component);
            queue.push_back(root_idx);
            while let Some(node_idx) = queue.pop_front() {
                node_count += 1;
                for (_, neighbor) in network.sorted_edges(node_idx) {
                    if !membership.contains_key(&neighbor) {
                        membership.insert(neighbor, component);
                        queue.push_back(neighbor);
                    }
                }
            }
            out.push((root_id, node_count, 0));
        }

        for edge_idx in network.graph.edge_indices() {
            if let Some((from, _)) = network.graph.edge_endpoints(edge_idx) {
                out[membership[&from]].2 += 1;
            }
        }
        out
    }
}
