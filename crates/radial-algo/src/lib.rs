//! Repair and analysis algorithms for radial distribution networks.
//!
//! The stages run in a fixed order over a [`radial_core::Network`]:
//!
//! 1. [`builder::GraphBuilder`] turns raw records into a typed graph
//! 2. [`cleaner::DataCleaner`] repairs attributes and drops unresolvable
//!    conductors
//! 3. [`topology::TopologyFixer`] breaks cycles, one spanning tree per
//!    component
//! 4. [`source::SourceDetector`] picks the feed point of each component
//! 5. [`voltage::VoltageDropCalculator`] propagates load and voltage
//!
//! [`pipeline::analyze_site`] wires them together; [`validator::Validator`]
//! audits raw records or a built network independently of the pipeline.

pub mod builder;
pub mod cleaner;
pub mod pipeline;
pub mod source;
pub mod topology;
pub mod validator;
pub mod voltage;

pub use builder::{BuildStats, GraphBuilder, RawConductor, RawNode};
pub use cleaner::{CleaningReport, DataCleaner};
pub use pipeline::{analyze_site, SiteAnalysis};
pub use source::{SourceChoice, SourceDetector, SourceStrategy};
pub use topology::{ComponentInfo, TopologyFixer, TopologyReport};
pub use validator::Validator;
pub use voltage::{NodeVoltage, Violation, VoltageDropCalculator, VoltageResult};
