//! Calculation configuration supplied by the calling service layer.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RadialError, RadialResult};

/// Tunable parameters for source detection and voltage propagation.
///
/// Every field has a default matching the upstream planning assumptions:
/// an 11 kV feeder, a 2 kW constant load per customer connection, and a
/// 7% drop limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nominal source voltage in volts
    pub nominal_voltage_v: f64,
    /// Assumed constant load per Connection node, in kilowatts
    pub load_per_connection_kw: f64,
    /// Percentage drop above which a node is flagged as violating
    pub violation_threshold_percent: f64,
    /// Optional regex matched against node ids to recognize backbone
    /// nodes when no MV classification is available
    pub backbone_pattern: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nominal_voltage_v: 11_000.0,
            load_per_connection_kw: 2.0,
            violation_threshold_percent: 7.0,
            backbone_pattern: None,
        }
    }
}

impl EngineConfig {
    /// Compile the backbone naming pattern, if configured.
    pub fn backbone_regex(&self) -> RadialResult<Option<Regex>> {
        match &self.backbone_pattern {
            Some(pattern) => Ok(Some(Regex::new(pattern)?)),
            None => Ok(None),
        }
    }

    /// Reject configurations the calculator cannot work with.
    pub fn validate(&self) -> RadialResult<()> {
        if !self.nominal_voltage_v.is_finite() || self.nominal_voltage_v <= 0.0 {
            return Err(RadialError::Config(format!(
                "nominal voltage must be positive, got {}",
                self.nominal_voltage_v
            )));
        }
        if !self.load_per_connection_kw.is_finite() || self.load_per_connection_kw < 0.0 {
            return Err(RadialError::Config(format!(
                "per-connection load must be non-negative, got {}",
                self.load_per_connection_kw
            )));
        }
        if !self.violation_threshold_percent.is_finite() || self.violation_threshold_percent < 0.0 {
            return Err(RadialError::Config(format!(
                "violation threshold must be non-negative, got {}",
                self.violation_threshold_percent
            )));
        }
        self.backbone_regex()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.nominal_voltage_v, 11_000.0);
        assert_eq!(config.load_per_connection_kw, 2.0);
        assert_eq!(config.violation_threshold_percent, 7.0);
        assert!(config.backbone_pattern.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_voltage_rejected() {
        let config = EngineConfig {
            nominal_voltage_v: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RadialError::Config(_))
        ));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let config = EngineConfig {
            backbone_pattern: Some("[".to_string()),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pattern_compiles() {
        let config = EngineConfig {
            backbone_pattern: Some("^BB_".to_string()),
            ..EngineConfig::default()
        };
        let re = config.backbone_regex().unwrap().unwrap();
        assert!(re.is_match("BB_07"));
        assert!(!re.is_match("P_BB_07"));
    }

    #[test]
    fn test_partial_toml_like_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"violation_threshold_percent": 5.0}"#).unwrap();
        assert_eq!(config.violation_threshold_percent, 5.0);
        assert_eq!(config.nominal_voltage_v, 11_000.0);
    }
}
