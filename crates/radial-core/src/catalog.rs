//! Conductor specification catalog.
//!
//! Maps catalog keys (e.g. `AAC_35`) to electrical properties: resistance
//! and reactance per kilometre plus the current-carrying capacity. The
//! built-in table covers the AAC/ABC/ACSR conductors common in rural
//! distribution builds; deployments replace or extend it via JSON, the
//! catalog is configuration rather than code.
//!
//! Edges with a missing or unrecognized spec resolve to [`DEFAULT_SPEC`]
//! so voltage propagation always has a resistance to work with.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::RadialResult;

/// Catalog key assigned when an edge has no usable spec.
pub const DEFAULT_SPEC: &str = "AAC_35";

/// Electrical properties of one conductor type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorSpec {
    /// Display name, e.g. "AAC 35mm²"
    pub name: String,
    /// Series resistance in ohms per kilometre
    pub resistance_ohm_per_km: f64,
    /// Series reactance in ohms per kilometre
    pub reactance_ohm_per_km: f64,
    /// Current-carrying capacity in amperes
    pub ampacity_amps: f64,
}

impl ConductorSpec {
    pub fn new(name: &str, resistance: f64, reactance: f64, ampacity: f64) -> Self {
        Self {
            name: name.to_string(),
            resistance_ohm_per_km: resistance,
            reactance_ohm_per_km: reactance,
            ampacity_amps: ampacity,
        }
    }
}

static BUILTIN: Lazy<BTreeMap<String, ConductorSpec>> = Lazy::new(|| {
    let specs = [
        // All Aluminium Conductor (AAC)
        ("AAC_50", ConductorSpec::new("AAC 50mm²", 0.641, 0.38, 184.0)),
        ("AAC_35", ConductorSpec::new("AAC 35mm²", 0.917, 0.39, 148.0)),
        ("AAC_25", ConductorSpec::new("AAC 25mm²", 1.283, 0.40, 122.0)),
        ("AAC_16", ConductorSpec::new("AAC 16mm²", 2.004, 0.41, 96.0)),
        // Aerial Bundled Cable (ABC)
        ("ABC_50", ConductorSpec::new("ABC 50mm²", 0.641, 0.08, 150.0)),
        ("ABC_35", ConductorSpec::new("ABC 35mm²", 0.917, 0.09, 120.0)),
        ("ABC_25", ConductorSpec::new("ABC 25mm²", 1.283, 0.09, 95.0)),
        ("ABC_16", ConductorSpec::new("ABC 16mm²", 2.004, 0.10, 75.0)),
        // ACSR for longer spans
        ("ACSR_50", ConductorSpec::new("ACSR 50/8", 0.592, 0.37, 198.0)),
        ("ACSR_35", ConductorSpec::new("ACSR 35/6", 0.849, 0.38, 159.0)),
    ];
    specs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
});

/// Catalog of conductor specifications, keyed by catalog id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConductorCatalog {
    specs: BTreeMap<String, ConductorSpec>,
}

impl Default for ConductorCatalog {
    fn default() -> Self {
        Self {
            specs: BUILTIN.clone(),
        }
    }
}

impl ConductorCatalog {
    pub fn get(&self, key: &str) -> Option<&ConductorSpec> {
        self.specs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.specs.contains_key(key)
    }

    /// Resolve a key, falling back to the default spec for missing or
    /// unrecognized keys. Panics only if the catalog itself lacks the
    /// default entry, which `Default` and `from_json` both guarantee
    /// against.
    pub fn resolve(&self, key: &str) -> &ConductorSpec {
        self.specs
            .get(key)
            .or_else(|| self.specs.get(DEFAULT_SPEC))
            .unwrap_or_else(|| panic!("catalog has no '{DEFAULT_SPEC}' fallback entry"))
    }

    /// Add or replace a spec.
    pub fn insert(&mut self, key: &str, spec: ConductorSpec) {
        self.specs.insert(key.to_string(), spec);
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.specs.keys()
    }

    /// Load a catalog from JSON, ensuring the default fallback entry is
    /// present (merged from the built-in table when the file omits it).
    pub fn from_json(json: &str) -> RadialResult<Self> {
        let mut specs: BTreeMap<String, ConductorSpec> = serde_json::from_str(json)?;
        if !specs.contains_key(DEFAULT_SPEC) {
            specs.insert(DEFAULT_SPEC.to_string(), BUILTIN[DEFAULT_SPEC].clone());
        }
        Ok(Self { specs })
    }

    pub fn to_json(&self) -> RadialResult<String> {
        Ok(serde_json::to_string_pretty(&self.specs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_fallback() {
        let catalog = ConductorCatalog::default();
        assert!(catalog.contains(DEFAULT_SPEC));
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let catalog = ConductorCatalog::default();
        let spec = catalog.resolve("NO_SUCH_CABLE");
        assert_eq!(spec.name, "AAC 35mm²");
        assert!((spec.resistance_ohm_per_km - 0.917).abs() < 1e-9);
    }

    #[test]
    fn test_insert_and_get() {
        let mut catalog = ConductorCatalog::default();
        catalog.insert("TEST_1", ConductorSpec::new("Test", 1.0, 0.1, 50.0));
        assert_eq!(catalog.get("TEST_1").unwrap().ampacity_amps, 50.0);
    }

    #[test]
    fn test_json_round_trip() {
        let catalog = ConductorCatalog::default();
        let json = catalog.to_json().unwrap();
        let loaded = ConductorCatalog::from_json(&json).unwrap();
        assert_eq!(loaded.len(), catalog.len());
        assert_eq!(loaded.get("ABC_16"), catalog.get("ABC_16"));
    }

    #[test]
    fn test_from_json_injects_fallback() {
        let json = r#"{"CUSTOM": {"name": "Custom", "resistance_ohm_per_km": 2.0,
                        "reactance_ohm_per_km": 0.2, "ampacity_amps": 40.0}}"#;
        let catalog = ConductorCatalog::from_json(json).unwrap();
        assert!(catalog.contains("CUSTOM"));
        assert!(catalog.contains(DEFAULT_SPEC));
    }
}
