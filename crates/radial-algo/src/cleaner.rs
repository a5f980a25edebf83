//! Attribute repair and removal of unreferenceable conductors.
//!
//! Best-effort by contract: this stage never fails. It defaults missing
//! conductor specs, derives missing lengths from endpoint positions,
//! drops conductors whose endpoints never resolved, and flags nodes left
//! without any incident conductor. Orphan nodes are reported, not
//! deleted; whether to prune them is the caller's decision.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use radial_core::{ConductorCatalog, Network, DEFAULT_SPEC};

/// What the cleaner changed, for audit display.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    /// Conductors whose spec was missing or unrecognized and got the
    /// catalog default
    pub specs_defaulted: usize,
    /// Conductors whose length was derived from endpoint positions
    pub lengths_derived: usize,
    /// Unreferenceable conductors removed
    pub edges_removed: usize,
    /// Node ids referenced by removed conductors but absent from the graph
    pub missing_refs: Vec<String>,
    /// Nodes with zero incident conductors after cleaning
    pub orphan_nodes: Vec<String>,
}

/// Repairs a built network in place.
pub struct DataCleaner;

impl DataCleaner {
    pub fn clean(network: &mut Network, catalog: &ConductorCatalog) -> CleaningReport {
        let mut report = CleaningReport::default();

        // Missing or unrecognized specs get the catalog default so every
        // edge has a resistance to propagate over.
        for edge_idx in network.graph.edge_indices().collect::<Vec<_>>() {
            let (from, to) = match network.graph.edge_endpoints(edge_idx) {
                Some(endpoints) => endpoints,
                None => continue,
            };
            let derived_length = {
                let edge = &network.graph[edge_idx];
                match edge.length_m {
                    Some(l) if l > 0.0 => None,
                    _ => {
                        let a = network.graph[from].position;
                        let b = network.graph[to].position;
                        Some(a.distance_m(&b))
                    }
                }
            };
            let edge = &mut network.graph[edge_idx];
            if edge.spec.is_empty() || !catalog.contains(&edge.spec) {
                debug!(conductor = %edge.id, old_spec = %edge.spec, "defaulting conductor spec");
                edge.spec = DEFAULT_SPEC.to_string();
                report.specs_defaulted += 1;
            }
            if let Some(length) = derived_length {
                edge.length_m = Some(length);
                report.lengths_derived += 1;
            }
        }

        // Unresolved conductors reference nodes that do not exist; the
        // edge goes, the surviving endpoint stays.
        let mut missing: BTreeSet<String> = BTreeSet::new();
        for unresolved in network.unresolved.drain(..) {
            report.edges_removed += 1;
            missing.extend(unresolved.missing);
        }
        report.missing_refs = missing.into_iter().collect();

        report.orphan_nodes = network
            .node_ids()
            .filter(|id| network.degree_of(id) == 0)
            .cloned()
            .collect();

        report
    }
}
