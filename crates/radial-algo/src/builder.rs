//! Graph construction from raw survey records.
//!
//! Turns the importer's node/conductor records into a typed, de-duplicated
//! [`Network`]. Only structurally impossible input fails the build (empty
//! identifiers); anything merely suspicious is kept visible for the later
//! stages to count and act on.
//!
//! The survey format systematically lists customer connections a second
//! time in the pole sheet. When an id appears in both sets, the Connection
//! record wins and the Pole record is dropped with a counter, see
//! [`BuildStats::poles_superseded`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use radial_core::{
    Conductor, EdgeClass, Network, Node, NodeClass, NodeKind, Position, RadialError, RadialResult,
    UnresolvedConductor,
};

/// A node record as supplied by the import collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub kind: NodeKind,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub class: NodeClass,
    #[serde(default)]
    pub status_codes: Vec<String>,
}

/// A conductor record as supplied by the import collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConductor {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    #[serde(default)]
    pub spec: Option<String>,
    #[serde(default)]
    pub length_m: Option<f64>,
    #[serde(default)]
    pub class: EdgeClass,
    #[serde(default)]
    pub status: Option<String>,
}

/// Counters describing what the builder did with the raw input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildStats {
    pub nodes_added: usize,
    /// Pole records dropped because a Connection claimed the same id
    pub poles_superseded: usize,
    /// Records dropped because an identical id was already present
    pub duplicates_dropped: usize,
    pub edges_added: usize,
    /// Conductors retained but not yet placed in the graph because an
    /// endpoint id is unknown
    pub edges_unresolved: usize,
}

/// Builds a [`Network`] from raw records.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Construct the graph. Fails only on empty identifiers; unresolved
    /// conductors are retained on the network for the cleaner.
    pub fn build(nodes: &[RawNode], conductors: &[RawConductor]) -> RadialResult<(Network, BuildStats)> {
        let mut network = Network::new();
        let mut stats = BuildStats::default();

        for raw in nodes {
            if raw.id.trim().is_empty() {
                return Err(RadialError::Build("node record with empty id".into()));
            }
        }
        for raw in conductors {
            if raw.id.trim().is_empty() {
                return Err(RadialError::Build("conductor record with empty id".into()));
            }
            if raw.from_node.trim().is_empty() || raw.to_node.trim().is_empty() {
                return Err(RadialError::Build(format!(
                    "conductor '{}' has an empty endpoint id",
                    raw.id
                )));
            }
        }

        // Connection ids first: they take precedence over pole records
        // sharing the same id.
        let connection_ids: BTreeSet<&str> = nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Connection)
            .map(|n| n.id.as_str())
            .collect();

        for raw in nodes {
            if raw.kind == NodeKind::Pole && connection_ids.contains(raw.id.as_str()) {
                stats.poles_superseded += 1;
                continue;
            }
            let node = Node {
                id: raw.id.clone(),
                kind: raw.kind,
                position: Position::new(raw.lat, raw.lon),
                class: raw.class,
                status_codes: raw.status_codes.clone(),
                downstream_load_kw: 0.0,
            };
            if network.add_node(node).is_none() {
                stats.duplicates_dropped += 1;
            } else {
                stats.nodes_added += 1;
            }
        }

        for raw in conductors {
            let conductor = Conductor {
                id: raw.id.clone(),
                from_node: raw.from_node.clone(),
                to_node: raw.to_node.clone(),
                spec: raw.spec.clone().unwrap_or_default(),
                length_m: raw.length_m,
                class: raw.class,
                status: raw.status.clone().unwrap_or_default(),
            };
            let mut missing = Vec::new();
            if !network.contains(&conductor.from_node) {
                missing.push(conductor.from_node.clone());
            }
            if !network.contains(&conductor.to_node) {
                missing.push(conductor.to_node.clone());
            }
            if missing.is_empty() {
                network.add_edge(conductor);
                stats.edges_added += 1;
            } else {
                network.unresolved.push(UnresolvedConductor { conductor, missing });
                stats.edges_unresolved += 1;
            }
        }

        Ok((network, stats))
    }
}
