//! Diagnostics infrastructure for tracking issues found during operations.
//!
//! Validation and the repair stages never throw for data problems; they
//! collect findings here instead. A [`Finding`] carries:
//!
//! - a severity (Info, Warning, Error)
//! - a category for grouping ("duplicate-id", "reference", "orphan", ...)
//! - a human-readable message
//! - the ids of the nodes/conductors involved, for the review UI
//!
//! # Example
//!
//! ```
//! use radial_core::diagnostics::{Diagnostics, Severity};
//!
//! let mut diag = Diagnostics::new();
//! diag.add_warning("orphan", "Node has no incident conductors");
//! diag.add_error_with_ids("reference", "Conductor references missing node", &["C17", "P9"]);
//!
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.error_count(), 1);
//! ```

use serde::Serialize;

/// Severity level for diagnostic findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Not necessarily a problem (e.g. multiple independent feeders)
    Info,
    /// Unusual but handled (e.g. defaulted spec, orphan node)
    Warning,
    /// Data that cannot participate in the electrical model
    Error,
}

/// A single finding produced by validation or a repair stage.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Category for grouping (e.g. "duplicate-id", "reference", "cycle")
    pub category: String,
    /// Human-readable description
    pub message: String,
    /// Ids of nodes/conductors involved
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_ids: Vec<String>,
}

impl Finding {
    pub fn new(severity: Severity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            related_ids: Vec::new(),
        }
    }

    /// Attach the ids of the entities involved.
    pub fn with_ids<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        self.related_ids = ids.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;
        if !self.related_ids.is_empty() {
            write!(f, " ({})", self.related_ids.join(", "))?;
        }
        Ok(())
    }
}

/// Collection of findings for one operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<Finding>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw finding directly.
    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn add_info(&mut self, category: &str, message: &str) {
        self.findings
            .push(Finding::new(Severity::Info, category, message));
    }

    pub fn add_info_with_ids<S: AsRef<str>>(&mut self, category: &str, message: &str, ids: &[S]) {
        self.findings
            .push(Finding::new(Severity::Info, category, message).with_ids(ids));
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.findings
            .push(Finding::new(Severity::Warning, category, message));
    }

    pub fn add_warning_with_ids<S: AsRef<str>>(&mut self, category: &str, message: &str, ids: &[S]) {
        self.findings
            .push(Finding::new(Severity::Warning, category, message).with_ids(ids));
    }

    pub fn add_error(&mut self, category: &str, message: &str) {
        self.findings
            .push(Finding::new(Severity::Error, category, message));
    }

    pub fn add_error_with_ids<S: AsRef<str>>(&mut self, category: &str, message: &str, ids: &[S]) {
        self.findings
            .push(Finding::new(Severity::Error, category, message).with_ids(ids));
    }

    pub fn info_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Findings filtered by category.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Merge another diagnostics into this one.
    pub fn merge(&mut self, other: Diagnostics) {
        self.findings.extend(other.findings);
    }

    pub fn summary(&self) -> String {
        let errors = self.error_count();
        let warnings = self.warning_count();
        let infos = self.info_count();
        if errors == 0 && warnings == 0 && infos == 0 {
            return "No findings".to_string();
        }
        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(format!("{} error{}", errors, if errors == 1 { "" } else { "s" }));
        }
        if warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                warnings,
                if warnings == 1 { "" } else { "s" }
            ));
        }
        if infos > 0 {
            parts.push(format!("{} info", infos));
        }
        parts.join(", ")
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Diagnostics: {}", self.summary())?;
        for finding in &self.findings {
            writeln!(f, "  {}", finding)?;
        }
        Ok(())
    }
}
