//! Merge every daily CSV log into one report
//!
//! Usage: generate_report [YYYY-MM-DD]

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use nutriflow::config::Config;
use nutriflow::store::merge_logs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriflow=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let date = match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date {:?}: {}", arg, e))?,
        None => chrono::Local::now().date_naive(),
    };

    let config = Config::load()?;
    println!("Log directory: {}", config.log_dir.display());

    let summary = merge_logs(&config.log_dir, &config.report_dir, date)?;
    println!("Report written: {}", summary.path.display());
    println!("  Logs merged: {}", summary.logs_merged);
    for path in &summary.skipped {
        println!("  Skipped (unreadable): {}", path.display());
    }

    Ok(())
}
