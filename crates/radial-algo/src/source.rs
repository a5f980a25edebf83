//! Source detection: which node feeds a component.
//!
//! Survey data rarely marks the point of supply explicitly, so the
//! detector runs an ordered chain of strategies and reports which one
//! fired. Each strategy is independently testable and new ones can be
//! added without touching voltage propagation:
//!
//! 1. [`SourceStrategy::ExplicitGeneration`] - exactly one Generation node
//! 2. [`SourceStrategy::MvDegree`] - busiest MV node in the pre-repair graph
//! 3. [`SourceStrategy::BackbonePattern`] - configured naming convention
//! 4. [`SourceStrategy::MaxDegree`] - busiest node overall, ties by id
//!
//! Degrees are taken from the graph as it stood *before* radialization;
//! a substation aggregates many medium-voltage branches and the cycle
//! breaker must not be allowed to hide that.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use radial_core::{Network, NodeClass, NodeKind};

/// Which heuristic picked the source, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStrategy {
    ExplicitGeneration,
    MvDegree,
    BackbonePattern,
    MaxDegree,
}

/// The chosen source node and the strategy that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct SourceChoice {
    pub node_id: String,
    pub strategy: SourceStrategy,
}

/// Applies the strategy chain to one tree component.
pub struct SourceDetector;

impl SourceDetector {
    /// Pick the source for a component. `members` must be the sorted
    /// member ids of one component; `pre_fix_degrees` the degree map
    /// captured before topology repair. Returns `None` only for an empty
    /// member list.
    pub fn detect(
        network: &Network,
        members: &[String],
        pre_fix_degrees: &BTreeMap<String, usize>,
        backbone: Option<&Regex>,
    ) -> Option<SourceChoice> {
        if members.is_empty() {
            return None;
        }

        if let Some(choice) = Self::explicit_generation(network, members) {
            return Some(choice);
        }
        if let Some(choice) = Self::mv_degree(network, members, pre_fix_degrees) {
            return Some(choice);
        }
        if let Some(choice) = Self::backbone_pattern(members, backbone) {
            return Some(choice);
        }
        Self::max_degree(members, pre_fix_degrees)
    }

    /// Strategy 1: a single Generation-tagged node is authoritative.
    /// Zero or several such nodes defer to the heuristics.
    fn explicit_generation(network: &Network, members: &[String]) -> Option<SourceChoice> {
        let mut generation = members
            .iter()
            .filter(|id| matches!(network.node(id), Some(n) if n.kind == NodeKind::Generation));
        match (generation.next(), generation.next()) {
            (Some(id), None) => Some(SourceChoice {
                node_id: id.clone(),
                strategy: SourceStrategy::ExplicitGeneration,
            }),
            _ => None,
        }
    }

    /// Strategy 2: the MV node that aggregated the most branches in the
    /// original wiring is the best proxy for the point of interconnection.
    fn mv_degree(
        network: &Network,
        members: &[String],
        pre_fix_degrees: &BTreeMap<String, usize>,
    ) -> Option<SourceChoice> {
        members
            .iter()
            .filter(|id| matches!(network.node(id), Some(n) if n.class == NodeClass::Mv))
            .max_by(|a, b| {
                let da = pre_fix_degrees.get(*a).copied().unwrap_or(0);
                let db = pre_fix_degrees.get(*b).copied().unwrap_or(0);
                // members is sorted ascending, so on equal degree max_by
                // keeps the earlier (lowest) id only if we invert the id
                // comparison here.
                da.cmp(&db).then_with(|| b.cmp(a))
            })
            .map(|id| SourceChoice {
                node_id: id.clone(),
                strategy: SourceStrategy::MvDegree,
            })
    }

    /// Strategy 3: externally supplied naming convention, lowest-sorting
    /// match wins.
    fn backbone_pattern(members: &[String], backbone: Option<&Regex>) -> Option<SourceChoice> {
        let pattern = backbone?;
        members
            .iter()
            .find(|id| pattern.is_match(id))
            .map(|id| SourceChoice {
                node_id: id.clone(),
                strategy: SourceStrategy::BackbonePattern,
            })
    }

    /// Strategy 4: last resort, highest pre-repair degree, ties broken by
    /// lowest node id.
    fn max_degree(
        members: &[String],
        pre_fix_degrees: &BTreeMap<String, usize>,
    ) -> Option<SourceChoice> {
        members
            .iter()
            .max_by(|a, b| {
                let da = pre_fix_degrees.get(*a).copied().unwrap_or(0);
                let db = pre_fix_degrees.get(*b).copied().unwrap_or(0);
                da.cmp(&db).then_with(|| b.cmp(a))
            })
            .map(|id| SourceChoice {
                node_id: id.clone(),
                strategy: SourceStrategy::MaxDegree,
            })
    }
}
