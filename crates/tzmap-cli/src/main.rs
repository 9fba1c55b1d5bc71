//! `tzmap` binary: converts one page export into an OTM document.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use tzmap::TzmapError;
use tzmap_cli::{Args, error_adapter::ErrorAdapter};

fn init_logging(requested: &str) {
    let level = LevelFilter::from_str(requested).ok();
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level.unwrap_or(LevelFilter::Warn))
        .init();
    if level.is_none() {
        warn!(requested; "Unknown log level, logging warnings only");
    }
}

/// Renders `err` as a miette report, or as plain text if rendering fails.
fn render(err: &TzmapError) -> String {
    let mut report = String::new();
    match miette::GraphicalReportHandler::new().render_report(&mut report, &ErrorAdapter(err)) {
        Ok(()) => report,
        Err(_) => err.to_string(),
    }
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match tzmap_cli::run(&args) {
        Ok(()) => info!(output = args.output.as_str(); "Threat model written"),
        Err(err) => {
            error!("{}", render(&err));
            process::exit(1);
        }
    }
}
