//! Per-node voltage and percentage drop over a rooted tree component.
//!
//! Two passes over the tree, re-rooted at the detected source:
//!
//! - **post-order**: accumulate downstream load, leaves to root. A
//!   Connection contributes the configured constant load, everything
//!   else contributes zero.
//! - **pre-order**: propagate voltage, root to leaves. The current into
//!   a subtree is approximated as `downstream_kw * 1000 / nominal_v`
//!   (constant-current simplification, adequate for radial LV/MV
//!   feeders) and the drop across an edge is `I * R/km * km`.
//!
//! The calculator is purely functional over its inputs apart from
//! writing the computed `downstream_load_kw` back onto the nodes of the
//! request-scoped network. Identical graph and parameters always yield
//! identical output.
//!
//! A member the root traversal cannot reach would mean the radialization
//! contract was broken; such nodes get an explicit unreachable sentinel
//! instead of a fabricated voltage, and do not block the rest of the
//! component.

use std::collections::{BTreeMap, HashMap, VecDeque};

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::Serialize;
use tracing::warn;

use radial_core::{ConductorCatalog, EngineConfig, Network, NodeKind};

use crate::source::{SourceChoice, SourceStrategy};

/// Computed electrical state of one node.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NodeVoltage {
    pub voltage_v: f64,
    pub drop_percent: f64,
}

/// A node whose drop exceeds the configured threshold.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub node_id: String,
    pub voltage_v: f64,
    pub drop_percent: f64,
}

/// Voltage analysis for one component.
#[derive(Debug, Clone, Serialize)]
pub struct VoltageResult {
    pub component_id: usize,
    pub source_node_id: String,
    pub strategy_used: SourceStrategy,
    pub voltages: BTreeMap<String, NodeVoltage>,
    pub violations: Vec<Violation>,
    /// Members the rooted traversal could not reach (internal invariant
    /// violation, reported per node rather than failing the component)
    pub unreachable: Vec<String>,
    pub max_drop_percent: f64,
    /// Ampacity overloads and similar non-fatal observations
    pub warnings: Vec<String>,
}

/// Two-pass voltage drop calculator.
pub struct VoltageDropCalculator;

impl VoltageDropCalculator {
    pub fn calculate(
        network: &mut Network,
        members: &[String],
        source: &SourceChoice,
        component_id: usize,
        catalog: &ConductorCatalog,
        config: &EngineConfig,
    ) -> VoltageResult {
        let nominal = config.nominal_voltage_v;
        let mut result = VoltageResult {
            component_id,
            source_node_id: source.node_id.clone(),
            strategy_used: source.strategy,
            voltages: BTreeMap::new(),
            violations: Vec::new(),
            unreachable: Vec::new(),
            max_drop_percent: 0.0,
            warnings: Vec::new(),
        };

        let source_idx = match network.node_index(&source.node_id) {
            Some(idx) => idx,
            None => {
                result.unreachable = members.to_vec();
                return result;
            }
        };

        // Re-root: pure BFS re-traversal of the already-acyclic tree.
        let (order, parent, parent_edge) = Self::rooted_order(network, source_idx);

        for id in members {
            let reachable = network
                .node_index(id)
                .map(|idx| parent.contains_key(&idx) || idx == source_idx)
                .unwrap_or(false);
            if !reachable {
                warn!(node = %id, component = component_id,
                      "node unreachable from source; radial contract broken");
                result.unreachable.push(id.clone());
            }
        }

        // Pass 1, post-order: downstream load accumulation.
        let mut downstream: HashMap<NodeIndex, f64> = HashMap::new();
        for &idx in order.iter().rev() {
            let own = match network.graph[idx].kind {
                NodeKind::Connection => config.load_per_connection_kw,
                _ => 0.0,
            };
            let accumulated = own + downstream.get(&idx).copied().unwrap_or(0.0);
            downstream.insert(idx, accumulated);
            if let Some(&p) = parent.get(&idx) {
                *downstream.entry(p).or_insert(0.0) += accumulated;
            }
            network.graph[idx].downstream_load_kw = accumulated;
        }

        // Pass 2, pre-order: voltage propagation from the source.
        let mut voltage: HashMap<NodeIndex, f64> = HashMap::new();
        voltage.insert(source_idx, nominal);
        for &idx in &order {
            if idx == source_idx {
                continue;
            }
            let p = parent[&idx];
            let edge_idx = parent_edge[&idx];
            let edge = &network.graph[edge_idx];
            let spec = catalog.resolve(&edge.spec);
            let length_km = edge.length_m.unwrap_or(0.0) / 1000.0;
            let current_amps = downstream[&idx] * 1000.0 / nominal;
            let drop_v = current_amps * spec.resistance_ohm_per_km * length_km;
            voltage.insert(idx, voltage[&p] - drop_v);

            if current_amps > spec.ampacity_amps {
                result.warnings.push(format!(
                    "conductor {} overloaded: {:.1} A > {:.0} A rating",
                    edge.id, current_amps, spec.ampacity_amps
                ));
            }
        }

        for &idx in &order {
            let v = voltage[&idx];
            let drop_percent = (nominal - v) / nominal * 100.0;
            result.max_drop_percent = result.max_drop_percent.max(drop_percent);
            result.voltages.insert(
                network.graph[idx].id.clone(),
                NodeVoltage {
                    voltage_v: v,
                    drop_percent,
                },
            );
        }

        // Violations in sorted node-id order for reproducible reports.
        for (id, nv) in &result.voltages {
            if nv.drop_percent > config.violation_threshold_percent {
                result.violations.push(Violation {
                    node_id: id.clone(),
                    voltage_v: nv.voltage_v,
                    drop_percent: nv.drop_percent,
                });
            }
        }

        result
    }

    /// BFS from the source over the tree, returning visit order plus
    /// parent node/edge maps. Incident edges are walked in conductor-id
    /// order so the visit order is deterministic.
    #[allow(clippy::type_complexity)]
    fn rooted_order(
        network: &Network,
        source_idx: NodeIndex,
    ) -> (
        Vec<NodeIndex>,
        HashMap<NodeIndex, NodeIndex>,
        HashMap<NodeIndex, EdgeIndex>,
    ) {
        let mut order = Vec::new();
        let mut parent = HashMap::new();
        let mut parent_edge = HashMap::new();
        let mut queue = VecDeque::new();

        queue.push_back(source_idx);
        order.push(source_idx);
        while let Some(node_idx) = queue.pop_front() {
            for (edge_idx, neighbor) in network.sorted_edges(node_idx) {
                if neighbor == source_idx || parent.contains_key(&neighbor) {
                    continue;
                }
                parent.insert(neighbor, node_idx);
                parent_edge.insert(neighbor, edge_idx);
                order.push(neighbor);
                queue.push_back(neighbor);
            }
        }
        (order, parent, parent_edge)
    }
}
