use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// Log file containing flow logs in ascii format
    #[clap(short, long)]
    pub flow_log: Option<PathBuf>,

    /// Lookup table in csv format
    #[clap(short, long)]
    pub lookup_file: Option<PathBuf>,

    /// Output dir where the mappings will be written (used if output is Csv)
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output method
    #[clap(long, value_enum)]
    pub output: Option<ExportMethodType>,

    /// Configuration file providing any of the options above
    #[clap(short, long)]
    pub config_file: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMethodType {
    /// The reports will be printed to the console
    Print,

    /// The reports will be written as CSV files to the output dir
    #[default]
    Csv,
}

/// Contents of the file passed with `--config-file`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub flow_log: Option<PathBuf>,
    pub lookup_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub output: Option<ExportMethodType>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub flow_log: PathBuf,
    pub lookup_file: PathBuf,
    pub output: ExportMethodType,
    pub output_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Merges command line options over the config file. Empty paths count
    /// as missing.
    pub fn resolve(cli: Cli, file: Option<ConfigFile>) -> anyhow::Result<Self> {
        let file = file.unwrap_or_default();
        let pick = |cli_value: Option<PathBuf>, file_value: Option<PathBuf>| {
            cli_value
                .or(file_value)
                .filter(|path| !path.as_os_str().is_empty())
        };

        let Some(flow_log) = pick(cli.flow_log, file.flow_log) else {
            bail!("a flow log file is required (--flow-log)");
        };
        let Some(lookup_file) = pick(cli.lookup_file, file.lookup_file) else {
            bail!("a lookup file is required (--lookup-file)");
        };
        let output = cli.output.or(file.output).unwrap_or_default();
        let output_dir = pick(cli.output_dir, file.output_dir);

        if output == ExportMethodType::Csv && output_dir.is_none() {
            bail!("an output dir is required for csv output (--output-dir)");
        }

        Ok(RunConfig {
            flow_log,
            lookup_file,
            output,
            output_dir,
        })
    }
}
