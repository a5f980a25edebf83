use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use radial_algo::{analyze_site, GraphBuilder, RawConductor, RawNode, Validator};
use radial_core::{ConductorCatalog, Diagnostics, EngineConfig, Severity};

mod cli;
use cli::{Cli, Commands};

/// On-disk site format: two arrays as exported by the survey tooling.
#[derive(Debug, Deserialize)]
struct SiteFile {
    nodes: Vec<RawNode>,
    conductors: Vec<RawConductor>,
}

fn load_site(path: &Path) -> anyhow::Result<SiteFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading site file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing site file {}", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<ConductorCatalog> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            Ok(ConductorCatalog::from_json(&text)?)
        }
        None => Ok(ConductorCatalog::default()),
    }
}

fn print_findings(diagnostics: &Diagnostics, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(diagnostics)?);
        return Ok(());
    }
    for finding in &diagnostics.findings {
        let tag = match finding.severity {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        };
        if finding.related_ids.is_empty() {
            println!("{tag:5} [{}] {}", finding.category, finding.message);
        } else {
            println!(
                "{tag:5} [{}] {} ({})",
                finding.category,
                finding.message,
                finding.related_ids.join(", ")
            );
        }
    }
    println!("{}", diagnostics.summary());
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Analyze {
            input,
            config,
            catalog,
            out,
            compact,
        } => {
            let site = load_site(&input)?;
            let config = load_config(config.as_deref())?;
            let catalog = load_catalog(catalog.as_deref())?;

            let analysis = analyze_site(&site.nodes, &site.conductors, &catalog, &config)?;
            info!(
                components = analysis.topology.components.len(),
                violations = analysis.total_violations(),
                worst_drop = format!("{:.2}%", analysis.worst_drop_percent()),
                "analysis complete"
            );

            let report = if compact {
                serde_json::to_string(&analysis)?
            } else {
                serde_json::to_string_pretty(&analysis)?
            };
            match out {
                Some(path) => {
                    fs::write(&path, report)
                        .with_context(|| format!("writing report {}", path.display()))?;
                    info!("report written to {}", path.display());
                }
                None => println!("{report}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { input, json } => {
            let site = load_site(&input)?;
            let mut diagnostics = Validator::validate_records(&site.nodes, &site.conductors);
            // Structural checks on the graph as-built, before any repair.
            // A build failure is itself a finding, not something to skip.
            match GraphBuilder::build(&site.nodes, &site.conductors) {
                Ok((network, _)) => diagnostics.merge(Validator::validate_network(&network)),
                Err(err) => diagnostics.add_error("build", &err.to_string()),
            }
            print_findings(&diagnostics, json)?;
            if diagnostics.has_errors() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Commands::Catalog { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            println!("{}", catalog.to_json()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    run(cli)
}
