//! The watch-and-mirror run loop.

use crate::OutputFormat;
use colored::Colorize;
use csvmirror_store::SqliteStore;
use csvmirror_watcher::{classify, FileWatcher, Synchronizer, DEFAULT_EXTENSION};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Mirrors `directory` into the store at `connstring` until Ctrl-C.
pub async fn run(directory: &Path, connstring: &str, format: OutputFormat) -> Result<()> {
    // The store connection is acquired once and lives for the process.
    let store = match format {
        OutputFormat::Sqlite => SqliteStore::open(connstring)?,
    };
    let synchronizer = Synchronizer::new(store);
    let watcher = FileWatcher::new(directory)?;

    println!(
        "{} Mirroring {} into {}",
        "✓".green(),
        directory.display().to_string().cyan(),
        connstring.cyan()
    );
    println!("  Press {} to stop", "Ctrl-C".cyan());

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutting down");
                stop.store(true, Ordering::SeqCst);
            }
        });
    }

    // Events arrive on the watcher's backend thread; classification and
    // store writes happen here. The synchronizer itself tolerates
    // multi-threaded delivery, so this stays a plain loop by choice,
    // not by requirement.
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::SeqCst) {
            if let Some(event) = watcher.recv_timeout(Duration::from_millis(250)) {
                if let Some(op) = classify(&event, DEFAULT_EXTENSION) {
                    synchronizer.apply(op);
                }
            }
        }
    })
    .await?;

    Ok(())
}
