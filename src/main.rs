//! Cellflow - apply cell edits and print the recalculated grid

mod config;
mod edits;
mod error;
mod logger;

use anyhow::Context;
use cellflow_core::Document;
use std::env;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: cellflow [OPTIONS] [EDIT...]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [EDIT...]                 Cell edits as CELL=VALUE, e.g. A3==SUM(A1:A2)");
    eprintln!("                            Read from stdin, one per line, when omitted");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>       Load settings from TOML file");
    eprintln!("  -v, --verbose             More log output (can be repeated)");
    eprintln!("  -q, --quiet               Only log errors");
    eprintln!("  -h, --help                Print help");
}

/// Returns whether every edit was accepted.
fn run(
    config_file: Option<PathBuf>,
    verbose: usize,
    quiet: bool,
    edit_args: Vec<String>,
) -> anyhow::Result<bool> {
    let (config, mut warnings) = config::load_config(config_file.as_ref());
    let (level, level_warning) = config.level_filter();
    warnings.extend(level_warning);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    logger::init(logger::adjust_level(level, verbose, quiet))
        .context("failed to install logger")?;

    let lines = if edit_args.is_empty() {
        edits::read_edit_lines(io::stdin().lock()).context("failed to read edits from stdin")?
    } else {
        edit_args
            .into_iter()
            .enumerate()
            .map(|(idx, arg)| (idx + 1, arg))
            .collect()
    };

    let mut doc = Document::with_config(config.engine);
    let errors = edits::apply_lines(&mut doc, &lines);
    for err in &errors {
        eprintln!("Error: {}", err);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    edits::write_grid(&doc, &mut out)?;
    out.flush()?;

    Ok(errors.is_empty())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config_file: Option<PathBuf> = None;
    let mut verbose = 0;
    let mut quiet = false;
    let mut edit_args: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "-v" | "--verbose" => verbose += 1,
            "-q" | "--quiet" => quiet = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => edit_args.push(args[i].to_string()),
        }
        i += 1;
    }

    match run(config_file, verbose, quiet, edit_args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
