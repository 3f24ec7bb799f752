mod cli;
mod config;
mod error;
mod estimator;
mod order;
mod report;
mod rules;

use clap::Parser;
use cli::{Cli, Commands, RulesCommand};
use estimator::Estimator;
use rules::RuleBase;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load_or_default(&cli.config)?;

    // init tracing
    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let rules_path = cli
        .rules
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.rules_path));

    match cli.command {
        Commands::Estimate {
            order,
            export,
            json,
        } => run_estimate(&order, &rules_path, export.as_deref(), json, &cfg),
        Commands::Classify {
            description,
            measurement,
        } => run_classify(&description, measurement.as_deref(), &rules_path),
        Commands::Rules { command } => match command {
            RulesCommand::Show => show_rules(&rules_path),
            RulesCommand::Export { path } => {
                let base = rules::load_or_seed(&rules_path)?;
                rules::save(&path, &base)?;
                Ok(())
            }
            RulesCommand::SetDensity { path, density } => {
                rules::set_density(&path, density)?;
                Ok(())
            }
        },
    }
}

/// Read an order, evaluate it and print (and optionally export) the results.
fn run_estimate(
    order_path: &Path,
    rules_path: &Path,
    export: Option<&Path>,
    json: bool,
    cfg: &config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = rules::load_or_seed(rules_path)?;
    let lines = order::read_order(order_path)?;
    info!(order = %order_path.display(), lines = lines.len(), "Estimating order");

    let results = estimator::evaluate(&lines, &base)?;

    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
    } else {
        report::write_table(&mut out, &results, cfg.report.decimals)?;
    }

    if let Some(path) = export {
        report::export_json(path, &results)?;
    }

    Ok(())
}

/// Trace one description through the classifier and the weight estimator.
fn run_classify(
    description: &str,
    measurement: Option<&str>,
    rules_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = rules::load_or_seed(rules_path)?;
    base.validate()?;
    let engine = Estimator::new(&base);

    let detected = estimator::classify(description, &base.type_mapping);
    let estimate = engine.estimate(&detected, description, measurement);

    println!("description : {description}");
    println!("measurement : {}", measurement.unwrap_or("-"));
    println!(
        "parsed mm   : {}",
        estimator::parse_measurement_mm(measurement)
    );
    println!("type        : {detected}");
    println!("method      : {}", estimate.method);
    println!("unit weight : {} kg", estimate.unit_weight);
    Ok(())
}

fn show_rules(rules_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let base: RuleBase = rules::load_or_seed(rules_path)?;

    println!("density: {}", base.parameters.density);
    println!("\n--- Type mapping ({}) ---", base.type_mapping.len());
    for (i, rule) in base.type_mapping.iter().enumerate() {
        println!("{:>3}. {:<50} -> {}", i + 1, rule.text_fragment, rule.type_label);
    }
    println!("\n--- Linear weight ({}) ---", base.linear_weight.len());
    for entry in &base.linear_weight {
        println!("     {:<12} {} kg/m", entry.section, entry.weight_per_meter);
    }
    println!("\n--- Assembly weight ({}) ---", base.assembly_weight.len());
    for entry in &base.assembly_weight {
        println!("     {:<50} {} kg", entry.assembly_name, entry.unit_weight);
    }
    Ok(())
}
