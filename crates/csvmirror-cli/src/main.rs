//! csvmirror CLI - mirror a directory's CSV files into SQL tables
//!
//! This is the entry point for users. It wires the configuration surface
//! (watched directory, store connection string, output format) into the
//! core: one store connection, one synchronizer, one watcher.

use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod run;

/// Supported store backends.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Sqlite,
}

#[derive(Parser)]
#[command(name = "csvmirror")]
#[command(author = "csvmirror Contributors")]
#[command(version)]
#[command(about = "Monitor a directory's CSV files and mirror them into SQL tables", long_about = None)]
#[command(
    after_help = "Example: csvmirror --directory ./test-dir --connstring ./test.db --output-format sqlite"
)]
struct Cli {
    /// Input directory to monitor
    #[arg(short, long)]
    directory: PathBuf,

    /// Output DB connstring. If empty, an in-memory DB will be used.
    #[arg(short, long, default_value = ":memory:")]
    connstring: String,

    /// Output format. SQLite DB is supported.
    #[arg(short = 'f', long, value_enum, default_value = "sqlite")]
    output_format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = run::run(&cli.directory, &cli.connstring, cli.output_format).await;

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
