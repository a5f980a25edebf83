//! # radial-core: Distribution Network Modeling Core
//!
//! Data structures for low/medium-voltage distribution networks built from
//! field survey data: poles, customer connections, an optional generation
//! point, and the conductors strung between them.
//!
//! ## Design Philosophy
//!
//! Networks are modeled as **undirected graphs** where:
//! - **Nodes**: poles, customer connections, generation/source points
//! - **Edges**: conductors (MV lines, LV lines, service drops)
//!
//! The graph is held in a petgraph `StableUnGraph` so that cycle-breaking
//! edge removal never invalidates indices, with a sorted id index on the
//! side for deterministic traversal. A [`Network`] is built fresh per
//! calculation request and owned by that request; nothing in this crate
//! holds cross-request state.
//!
//! Survey data is messy: conductors may reference nodes that were never
//! surveyed. Such edges cannot live in the graph, so they are retained in
//! [`Network::unresolved`] where the cleaning stage can count and drop them
//! instead of losing them silently.
//!
//! ## Modules
//!
//! - [`catalog`] - conductor specifications (resistance, ampacity)
//! - [`config`] - calculation parameters
//! - [`diagnostics`] - finding collection for validation and repair reports
//! - [`error`] - unified error type
//!
//! ## Quick Start
//!
//! ```rust
//! use radial_core::*;
//!
//! let mut network = Network::new();
//! network.add_node(Node::pole("P1", 0.0, 0.0));
//! network.add_node(Node::connection("C1", 0.0, 0.001));
//! let added = network.add_edge(Conductor::new("L1", "P1", "C1"));
//! assert!(added.is_some());
//! assert_eq!(network.stats().conductors, 1);
//! ```

use std::collections::BTreeMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;

pub use catalog::{ConductorCatalog, ConductorSpec, DEFAULT_SPEC};
pub use config::EngineConfig;
pub use diagnostics::{Diagnostics, Finding, Severity};
pub use error::{RadialError, RadialResult};

/// What a node physically is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Pole,
    Connection,
    Generation,
}

/// Electrical classification of a node. Source data uses free-form
/// strings; anything unrecognized lands on `Unknown` rather than being
/// guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeClass {
    Mv,
    Lv,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Electrical classification of a conductor. Unrecognized input
/// strings land on the LV default, the common case in this data.
/// `Lv` sits last because serde requires the catch-all variant there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgeClass {
    Mv,
    Drop,
    #[default]
    #[serde(other)]
    Lv,
}

/// WGS84 position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Approximate ground distance in metres. Equirectangular projection,
    /// adequate at feeder scale (spans of a few kilometres).
    pub fn distance_m(&self, other: &Position) -> f64 {
        let dx = (other.lon - self.lon) * 111_000.0 * self.lat.to_radians().cos();
        let dy = (other.lat - self.lat) * 111_000.0;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A pole, customer connection, or generation point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
    pub class: NodeClass,
    /// Opaque status codes passed through from the source data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_codes: Vec<String>,
    /// Total load served at or downstream of this node, in kW.
    /// Computed by the voltage calculator, zero until then.
    #[serde(default)]
    pub downstream_load_kw: f64,
}

impl Node {
    pub fn new(id: &str, kind: NodeKind, lat: f64, lon: f64) -> Self {
        Self {
            id: id.to_string(),
            kind,
            position: Position::new(lat, lon),
            class: NodeClass::Unknown,
            status_codes: Vec::new(),
            downstream_load_kw: 0.0,
        }
    }

    pub fn pole(id: &str, lat: f64, lon: f64) -> Self {
        Self::new(id, NodeKind::Pole, lat, lon)
    }

    pub fn connection(id: &str, lat: f64, lon: f64) -> Self {
        Self::new(id, NodeKind::Connection, lat, lon)
    }

    pub fn generation(id: &str, lat: f64, lon: f64) -> Self {
        Self::new(id, NodeKind::Generation, lat, lon)
    }

    pub fn with_class(mut self, class: NodeClass) -> Self {
        self.class = class;
        self
    }
}

/// A conductor between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conductor {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    /// Catalog key; empty until the cleaner assigns a default
    #[serde(default)]
    pub spec: String,
    /// Length in metres; derived from endpoint positions when absent
    #[serde(default)]
    pub length_m: Option<f64>,
    #[serde(default)]
    pub class: EdgeClass,
    /// Construction-status code, passed through
    #[serde(default)]
    pub status: String,
}

impl Conductor {
    pub fn new(id: &str, from_node: &str, to_node: &str) -> Self {
        Self {
            id: id.to_string(),
            from_node: from_node.to_string(),
            to_node: to_node.to_string(),
            spec: String::new(),
            length_m: None,
            class: EdgeClass::default(),
            status: String::new(),
        }
    }

    pub fn with_spec(mut self, spec: &str) -> Self {
        self.spec = spec.to_string();
        self
    }

    pub fn with_length_m(mut self, length: f64) -> Self {
        self.length_m = Some(length);
        self
    }

    pub fn with_class(mut self, class: EdgeClass) -> Self {
        self.class = class;
        self
    }
}

/// A conductor whose endpoints did not all resolve to known nodes.
/// Kept out of the graph but not dropped, so the cleaning stage can
/// count it and report the missing ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedConductor {
    pub conductor: Conductor,
    /// Endpoint ids absent from the node index
    pub missing: Vec<String>,
}

/// The core distribution network graph.
///
/// Node and edge payloads live in the petgraph graph; `index` maps node
/// ids to graph indices and, being a BTreeMap, gives every traversal a
/// deterministic starting order.
#[derive(Debug, Default)]
pub struct Network {
    pub graph: StableUnGraph<Node, Conductor>,
    index: BTreeMap<String, NodeIndex>,
    pub unresolved: Vec<UnresolvedConductor>,
}

impl Network {
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            index: BTreeMap::new(),
            unresolved: Vec::new(),
        }
    }

    /// Add a node. Returns `None` without inserting if the id is already
    /// present; duplicate handling is the builder's decision, not ours.
    pub fn add_node(&mut self, node: Node) -> Option<NodeIndex> {
        if self.index.contains_key(&node.id) {
            return None;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Some(idx)
    }

    /// Add a conductor between two known nodes. Returns `None` when an
    /// endpoint is not in the node index (caller decides whether that
    /// means "unresolved" or "error").
    pub fn add_edge(&mut self, conductor: Conductor) -> Option<EdgeIndex> {
        let from = *self.index.get(&conductor.from_node)?;
        let to = *self.index.get(&conductor.to_node)?;
        Some(self.graph.add_edge(from, to, conductor))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).and_then(|idx| self.graph.node_weight(*idx))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = *self.index.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    /// Node ids in sorted order.
    pub fn node_ids(&self) -> impl Iterator<Item = &String> {
        self.index.keys()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn degree_of(&self, id: &str) -> usize {
        match self.index.get(id) {
            Some(idx) => self.graph.edges(*idx).count(),
            None => 0,
        }
    }

    /// Degree of every node, keyed by id. Captured before topology repair
    /// so source detection can reason about the original wiring.
    pub fn degree_map(&self) -> BTreeMap<String, usize> {
        self.index
            .iter()
            .map(|(id, idx)| (id.clone(), self.graph.edges(*idx).count()))
            .collect()
    }

    /// Incident conductors of a node, sorted by conductor id for
    /// deterministic traversal.
    pub fn sorted_edges(&self, idx: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        let mut edges: Vec<(EdgeIndex, NodeIndex, &str)> = self
            .graph
            .edges(idx)
            .map(|e| (e.id(), e.target(), e.weight().id.as_str()))
            .collect();
        edges.sort_by(|a, b| a.2.cmp(b.2));
        edges.into_iter().map(|(e, n, _)| (e, n)).collect()
    }

    /// Compute summary statistics.
    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats::default();
        for node in self.graph.node_weights() {
            match node.kind {
                NodeKind::Pole => stats.poles += 1,
                NodeKind::Connection => stats.connections += 1,
                NodeKind::Generation => stats.generation_points += 1,
            }
        }
        for edge in self.graph.edge_weights() {
            stats.conductors += 1;
            if let Some(length) = edge.length_m {
                stats.total_length_km += length / 1000.0;
            }
        }
        stats.unresolved_conductors = self.unresolved.len();
        stats
    }
}

/// Statistics about a network's size.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkStats {
    pub poles: usize,
    pub connections: usize,
    pub generation_points: usize,
    pub conductors: usize,
    pub unresolved_conductors: usize,
    pub total_length_km: f64,
}

impl std::fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} poles, {} connections, {} generation, {} conductors ({:.2} km)",
            self.poles,
            self.connections,
            self.generation_points,
            self.conductors,
            self.total_length_km
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_creation() {
        let mut network = Network::new();
        let p1 = network.add_node(Node::pole("P1", -13.95, 33.70)).unwrap();
        network.add_node(Node::connection("C1", -13.951, 33.701)).unwrap();

        let edge = network.add_edge(
            Conductor::new("L1", "P1", "C1")
                .with_spec("AAC_35")
                .with_length_m(120.0),
        );
        assert!(edge.is_some());

        assert_eq!(network.node_count(), 2);
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.graph[p1].id, "P1");
        assert_eq!(network.degree_of("P1"), 1);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut network = Network::new();
        assert!(network.add_node(Node::pole("P1", 0.0, 0.0)).is_some());
        assert!(network.add_node(Node::connection("P1", 0.0, 0.0)).is_none());
        assert_eq!(network.node_count(), 1);
    }

    #[test]
    fn test_edge_with_missing_endpoint() {
        let mut network = Network::new();
        network.add_node(Node::pole("P1", 0.0, 0.0));
        assert!(network.add_edge(Conductor::new("L1", "P1", "GHOST")).is_none());
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn test_stats() {
        let mut network = Network::new();
        network.add_node(Node::pole("P1", 0.0, 0.0));
        network.add_node(Node::pole("P2", 0.0, 0.01));
        network.add_node(Node::connection("C1", 0.0, 0.011));
        network.add_node(Node::generation("G1", 0.0, -0.001));
        network.add_edge(Conductor::new("L1", "P1", "P2").with_length_m(500.0));
        network.add_edge(Conductor::new("L2", "P2", "C1").with_length_m(250.0));

        let stats = network.stats();
        assert_eq!(stats.poles, 2);
        assert_eq!(stats.connections, 1);
        assert_eq!(stats.generation_points, 1);
        assert_eq!(stats.conductors, 2);
        assert!((stats.total_length_km - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_edges_deterministic() {
        let mut network = Network::new();
        let hub = network.add_node(Node::pole("HUB", 0.0, 0.0)).unwrap();
        network.add_node(Node::pole("A", 0.0, 0.001));
        network.add_node(Node::pole("B", 0.001, 0.0));
        network.add_node(Node::pole("C", -0.001, 0.0));
        // Insert out of id order on purpose
        network.add_edge(Conductor::new("L3", "HUB", "C"));
        network.add_edge(Conductor::new("L1", "HUB", "A"));
        network.add_edge(Conductor::new("L2", "HUB", "B"));

        let ids: Vec<String> = network
            .sorted_edges(hub)
            .iter()
            .map(|(e, _)| network.graph[*e].id.clone())
            .collect();
        assert_eq!(ids, vec!["L1", "L2", "L3"]);
    }

    #[test]
    fn test_distance_m() {
        // One degree of latitude is ~111 km
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.01, 0.0);
        let d = a.distance_m(&b);
        assert!((d - 1110.0).abs() < 1.0);
    }

    #[test]
    fn test_unknown_class_deserializes() {
        let class: NodeClass = serde_json::from_str("\"substation?\"").unwrap();
        assert_eq!(class, NodeClass::Unknown);
        let mv: NodeClass = serde_json::from_str("\"mv\"").unwrap();
        assert_eq!(mv, NodeClass::Mv);
    }

    #[test]
    fn test_edge_class_serde() {
        // Known names round-trip under the lowercase rename.
        assert_eq!(serde_json::to_string(&EdgeClass::Mv).unwrap(), "\"mv\"");
        assert_eq!(serde_json::to_string(&EdgeClass::Drop).unwrap(), "\"drop\"");
        assert_eq!(serde_json::to_string(&EdgeClass::Lv).unwrap(), "\"lv\"");
        let lv: EdgeClass = serde_json::from_str("\"lv\"").unwrap();
        assert_eq!(lv, EdgeClass::Lv);
        // Free-form input lands on the LV default.
        let unknown: EdgeClass = serde_json::from_str("\"service?\"").unwrap();
        assert_eq!(unknown, EdgeClass::Lv);
    }
}
