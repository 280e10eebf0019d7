mod loader;
mod logging;
mod render;

use std::collections::HashMap;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::Parser;
use kd_core::{KdAnalyzer, KdConfig};
use log::info;
use serde_json::Value;

use loader::{collect_inputs, read_csv_file};
use render::{write_results, OutputFormat};

/// Compute the KD stochastic oscillator for daily price CSV files
#[derive(Debug, Parser)]
#[command(name = "kd_cli", version, about)]
struct Args {
    /// CSV files, or directories whose *.csv files are all processed
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Window size N used for the high/low extrema
    #[arg(short = 'n', long)]
    window: Option<usize>,

    /// Flat-window handling: propagate, midpoint, hold or reject
    #[arg(short, long)]
    policy: Option<String>,

    /// JSON object of KD settings; flags above take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Output file, or directory when several inputs are given
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip price sanity checks
    #[arg(long)]
    no_check: bool,

    /// Repair bars whose high/low do not cover open and close
    #[arg(long)]
    autofix: bool,

    #[arg(long, env = "KD_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn build_config(&self) -> Result<KdConfig, Box<dyn Error>> {
        let mut conf: HashMap<String, Value> = match &self.config {
            Some(path) => serde_json::from_reader(File::open(path)?)?,
            None => HashMap::new(),
        };

        if let Some(window) = self.window {
            conf.insert("kd_cycle".to_string(), Value::from(window));
        }
        if let Some(policy) = &self.policy {
            conf.insert("degenerate_policy".to_string(), Value::from(policy.as_str()));
        }
        if self.no_check {
            conf.insert("kl_data_check".to_string(), Value::from(false));
        }
        if self.autofix {
            conf.insert("autofix".to_string(), Value::from(true));
        }

        Ok(KdConfig::new(Some(conf))?)
    }
}

fn output_path(output: &Path, input: &Path, format: OutputFormat, many: bool) -> PathBuf {
    if !many && !output.is_dir() {
        return output.to_path_buf();
    }
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output.join(format!("{}.kd.{}", stem, format.extension()))
}

fn process_csv_file(
    analyzer: &KdAnalyzer,
    path: &Path,
    args: &Args,
    many: bool,
) -> Result<(), Box<dyn Error>> {
    info!("Processing file: {:?}", path);
    let mut records = read_csv_file(path)?;
    let results = analyzer
        .calculate(&mut records)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    match &args.output {
        Some(output) => {
            let target = output_path(output, path, args.format, many);
            let file = File::create(&target)?;
            write_results(&results, args.format, BufWriter::new(file))?;
            info!("Wrote {} rows to {:?}", results.len(), target);
        }
        None => write_results(&results, args.format, io::stdout().lock())?,
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init_logging(&args.log_level);

    let config = args.build_config()?;
    let analyzer = KdAnalyzer::new(config);
    info!(
        "kd window={} policy={}",
        analyzer.config().kd_cycle,
        analyzer.config().degenerate_policy
    );

    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        return Err("no csv input found".into());
    }

    let many = inputs.len() > 1;
    if many {
        if let Some(output) = &args.output {
            fs::create_dir_all(output)?;
        }
    }

    for path in &inputs {
        process_csv_file(&analyzer, path, &args, many)?;
    }

    Ok(())
}
