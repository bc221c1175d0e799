mod analyzer;
mod args;
mod error;
mod flow_record;
mod lookup;
mod output;
mod protocol;
mod reader;
mod tests;

use std::time::Instant;

use analyzer::analyze_file;
use anyhow::Context;
use args::{Cli, ConfigFile, RunConfig};
use clap::Parser;
use log::{debug, error, warn};
use lookup::LookupTable;
use output::ReportWriter;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // If a config file is provided, load it and let the CLI arguments override it
    let config_file = match &cli.config_file {
        Some(config_path) => Some(
            confy::load_path::<ConfigFile>(config_path).with_context(|| {
                format!(
                    "Error loading configuration file '{}'",
                    config_path.display()
                )
            })?,
        ),
        None => None,
    };
    let config = RunConfig::resolve(cli, config_file)?;
    debug!("Running with {:?}", config);

    let lookup_table = LookupTable::load(&config.lookup_file).with_context(|| {
        format!(
            "Invalid lookup table '{}'",
            config.lookup_file.display()
        )
    })?;
    if lookup_table.is_empty() {
        warn!("Lookup table has no rows, every flow will be untagged");
    }

    let start = Instant::now();
    let analysis = analyze_file(&config.flow_log, &lookup_table).with_context(|| {
        format!(
            "Failed to analyze flow logs '{}'",
            config.flow_log.display()
        )
    })?;
    debug!(
        "Duration: {:?} milliseconds",
        start.elapsed().as_millis()
    );

    // Reports are only written once the whole flow log has been aggregated
    ReportWriter::new(config.output, config.output_dir)
        .write(&analysis)
        .context("Failed to write reports")?;

    Ok(())
}
