//! CAN/J1939 Capture Labeler - Main Entry Point
//!
//! Pipeline: candump capture -> decoded record store -> rule engine -> CSV.

mod constants;
mod logic;

use std::path::PathBuf;

use clap::Parser;

use logic::capture::{apply_pgn_labels, load_pgn_labels, parse_capture};
use logic::dataset::write_csv;
use logic::rules::{apply_rules, load_rules};

#[derive(Parser, Debug)]
#[command(author, version, about = "Label CAN/J1939 captures using a declarative rule engine")]
struct Args {
    /// Input candump log file
    #[arg(short, long)]
    input: PathBuf,

    /// Rule file (YAML)
    #[arg(short, long)]
    rules: PathBuf,

    /// Optional PGN -> display label table (JSON)
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long)]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn run(args: &Args) -> Result<(), String> {
    let mut records = parse_capture(&args.input)
        .map_err(|e| format!("cannot open capture {}: {}", args.input.display(), e))?;
    log::info!("Parsed {} messages from log", records.len());

    if let Some(path) = &args.labels {
        let table = load_pgn_labels(path)?;
        apply_pgn_labels(&mut records, &table);
        log::info!("Applied {} PGN labels", table.len());
    }

    let rules = load_rules(&args.rules).map_err(|e| e.to_string())?;
    log::info!("Loaded {} rules", rules.len());

    apply_rules(&mut records, &rules);

    let written = write_csv(&records, &args.output)
        .map_err(|e| format!("cannot write output {}: {}", args.output.display(), e))?;
    log::info!("Labeled file written to {} ({} rows)", args.output.display(), written);

    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    log::info!("Starting canlabel v{}", constants::APP_VERSION);

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
