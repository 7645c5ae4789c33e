//! packr CLI - asset pack compiler
//!
//! Usage: packr <COMMAND>
//!
//! Commands:
//!   plan  Scan the source tree and print the pack plan as YAML
//!   pack  Run the full pipeline: plan, pack, prune, write the manifest

mod cli;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use packr::config::{Config, ConfigWarning};
use packr::manifest::{plan_from_yaml, plan_to_yaml};
use packr::pipeline::PackPipeline;
use packr::planner::PlanWarning;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            source,
            output,
            default_type,
            config,
        } => cmd_plan(source, output, default_type, config.as_deref()),
        Commands::Pack {
            source,
            dest,
            plan,
            default_type,
            keep_virtual,
            config,
        } => cmd_pack(
            source,
            dest,
            plan,
            default_type,
            keep_virtual,
            config.as_deref(),
            cli.verbose,
        ),
    }
}

fn cmd_plan(
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    default_type: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(source) = source {
        config.source = source;
    }
    if let Some(kind) = default_type {
        config.default_kind = kind;
    }

    let pipeline = PackPipeline::new(&config);
    let (graph, warnings) = pipeline.plan()?;
    print_plan_warnings(&warnings);

    let yaml = plan_to_yaml(&graph)?;
    match output {
        Some(path) => fs::write(&path, yaml)
            .with_context(|| format!("failed to write plan to {}", path.display()))?,
        None => print!("{yaml}"),
    }
    Ok(())
}

fn cmd_pack(
    source: Option<PathBuf>,
    dest: Option<PathBuf>,
    plan: Option<PathBuf>,
    default_type: Option<String>,
    keep_virtual: bool,
    config_path: Option<&Path>,
    verbose: u8,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(source) = source {
        config.source = source;
    }
    if let Some(dest) = dest {
        config.dest = dest;
    }
    if let Some(kind) = default_type {
        config.default_kind = kind;
    }

    let prior_plan = match plan {
        Some(path) => {
            let yaml = fs::read_to_string(&path)
                .with_context(|| format!("failed to read plan from {}", path.display()))?;
            Some(plan_from_yaml(&yaml)?)
        }
        None => None,
    };

    let pipeline = PackPipeline::new(&config).with_keep_virtual(keep_virtual);
    let report = pipeline.run(prior_plan)?;
    print_plan_warnings(&report.warnings);

    if verbose > 0 {
        for (id, pack) in &report.manifest.packs {
            eprintln!("packed {} ({}, {} files)", id, pack.kind, pack.files.len());
        }
        for path in &report.deleted {
            eprintln!("pruned {}", path.display());
        }
    }

    println!(
        "Packed {} pack(s) into {} ({} file(s), {} pruned)",
        report.manifest.packs.len(),
        config.dest.display(),
        report.manifest.files.len(),
        report.deleted.len()
    );
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => {
            let (config, warnings) = Config::load_with_warnings(path)?;
            print_config_warnings(&warnings);
            Ok(config.with_env_overrides())
        }
        None => Ok(Config::load_or_default(Path::new("."))),
    }
}

fn print_plan_warnings(warnings: &[PlanWarning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

fn print_config_warnings(warnings: &[ConfigWarning]) {
    for warning in warnings {
        match warning.line {
            Some(line) => eprintln!(
                "warning: unknown config key '{}' in {}:{}",
                warning.key,
                warning.file.display(),
                line
            ),
            None => eprintln!(
                "warning: unknown config key '{}' in {}",
                warning.key,
                warning.file.display()
            ),
        }
    }
}
