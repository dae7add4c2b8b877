//! Billing engine command line.
//!
//! Usage: `billing-engine [CONFIG]` where `CONFIG` defaults to
//! `config/billing.yaml`. Log verbosity follows `RUST_LOG`.

use std::process::ExitCode;

use chrono::Local;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billing_engine::config::ConfigLoader;
use billing_engine::error::EngineResult;
use billing_engine::runner::{run, RunReport};

const DEFAULT_CONFIG: &str = "config/billing.yaml";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billing_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    match execute(&config_path) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(config = %config_path, error = %err, "Billing run failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn execute(config_path: &str) -> EngineResult<RunReport> {
    let loader = ConfigLoader::load(config_path)?;
    run(&loader, Local::now().date_naive())
}

fn print_report(report: &RunReport) {
    println!("Billing {} ({})", report.billing_month, report.mode);
    println!("  Processed: {}", report.processed);
    println!("  Billed:    {}", report.billed);
    println!("  Errors:    {}", report.errored);
    if report.skipped > 0 {
        println!("  Skipped:   {} (no charge defined)", report.skipped);
    }
    println!("  Groups:    {}", report.groups);
    println!("Output written to {}", report.output_dir.display());
    if let Some(error_report) = &report.error_report {
        println!("Error report: {}", error_report.display());
    }
}
