//! Fixed-order analysis pipeline for one site.
//!
//! Build, clean, radialize, then per component detect the source and
//! propagate voltage. The degree map feeding source detection is
//! captured after cleaning but before radialization, so a substation's
//! true fan-out survives the cycle breaker. A final validation pass over
//! the repaired network is attached to the report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use radial_core::{ConductorCatalog, Diagnostics, EngineConfig, RadialResult};

use crate::builder::{BuildStats, GraphBuilder, RawConductor, RawNode};
use crate::cleaner::{CleaningReport, DataCleaner};
use crate::source::SourceDetector;
use crate::topology::{TopologyFixer, TopologyReport};
use crate::validator::Validator;
use crate::voltage::{VoltageDropCalculator, VoltageResult};

/// Full analysis report for one site.
#[derive(Debug, Clone, Serialize)]
pub struct SiteAnalysis {
    pub generated_at: DateTime<Utc>,
    pub build: BuildStats,
    pub cleaning: CleaningReport,
    pub topology: TopologyReport,
    /// One entry per component, in component-id order
    pub results: Vec<VoltageResult>,
    pub validation: Diagnostics,
}

impl SiteAnalysis {
    pub fn total_violations(&self) -> usize {
        self.results.iter().map(|r| r.violations.len()).sum()
    }

    pub fn worst_drop_percent(&self) -> f64 {
        self.results
            .iter()
            .map(|r| r.max_drop_percent)
            .fold(0.0, f64::max)
    }
}

/// Run the full pipeline over raw records.
#[instrument(skip_all, fields(nodes = nodes.len(), conductors = conductors.len()))]
pub fn analyze_site(
    nodes: &[RawNode],
    conductors: &[RawConductor],
    catalog: &ConductorCatalog,
    config: &EngineConfig,
) -> RadialResult<SiteAnalysis> {
    config.validate()?;
    let backbone = config.backbone_regex()?;

    let (mut network, build) = GraphBuilder::build(nodes, conductors)?;
    info!(
        nodes = build.nodes_added,
        edges = build.edges_added,
        unresolved = build.edges_unresolved,
        "graph built"
    );

    let cleaning = DataCleaner::clean(&mut network, catalog);
    // Degrees before radialization; the cycle breaker must not hide a
    // substation's fan-out from source detection.
    let pre_fix_degrees = network.degree_map();

    let topology = TopologyFixer::fix(&mut network);
    info!(
        components = topology.components.len(),
        removed = topology.edges_removed_total,
        "network radialized"
    );

    let mut results = Vec::with_capacity(topology.components.len());
    for component in &topology.components {
        let source = match SourceDetector::detect(
            &network,
            &component.members,
            &pre_fix_degrees,
            backbone.as_ref(),
        ) {
            Some(choice) => choice,
            None => continue,
        };
        info!(
            component = component.id,
            source = %source.node_id,
            strategy = ?source.strategy,
            "source detected"
        );
        results.push(VoltageDropCalculator::calculate(
            &mut network,
            &component.members,
            &source,
            component.id,
            catalog,
            config,
        ));
    }

    let validation = Validator::validate_network(&network);

    Ok(SiteAnalysis {
        generated_at: Utc::now(),
        build,
        cleaning,
        topology,
        results,
        validation,
    })
}
