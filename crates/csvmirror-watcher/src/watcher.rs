//! Filesystem watcher plumbing.
//!
//! Adapts the notify crate's backend-specific events into [`RawEvent`]s
//! delivered over a channel. No filtering happens here; every path under
//! the watched root is reported and [`crate::classify`] decides scope.

use crate::filter::{RawEvent, RawEventKind};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("watch setup failed: {0}")]
    Notify(#[from] notify::Error),
}

/// Watches a directory tree and produces raw events.
pub struct FileWatcher {
    #[allow(dead_code)]
    watcher: notify::RecommendedWatcher,
    receiver: Receiver<RawEvent>,
}

impl FileWatcher {
    /// Starts a recursive watch on `root`.
    pub fn new(root: &Path) -> Result<Self, WatchError> {
        let (tx, rx) = channel();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for raw in convert(event) {
                        if tx.send(raw).is_err() {
                            warn!("raw event receiver dropped");
                        }
                    }
                }
                Err(e) => warn!("watch error: {}", e),
            })?;

        watcher.watch(root, RecursiveMode::Recursive)?;

        info!("watching {} for changes", root.display());

        Ok(Self {
            watcher,
            receiver: rx,
        })
    }

    /// Polls for raw events. Returns immediately with whatever is pending.
    pub fn poll(&self) -> Vec<RawEvent> {
        self.receiver.try_iter().collect()
    }

    /// Waits for the next raw event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RawEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

/// Flattens one notify event into raw events.
///
/// A rename reported as a single event with both endpoints becomes one
/// Moved record; backends that report the endpoints separately surface
/// as a Deleted followed by a Created, which the synchronizer handles
/// identically.
fn convert(event: Event) -> Vec<RawEvent> {
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
            let mut paths = event.paths;
            let to = paths.pop().unwrap_or_default();
            let from = paths.pop().unwrap_or_default();
            vec![RawEvent {
                is_directory: to.is_dir(),
                ..RawEvent::moved(from, to)
            }]
        }
        kind => {
            let raw_kind = match kind {
                EventKind::Create(_) => Some(RawEventKind::Created),
                EventKind::Remove(_) => Some(RawEventKind::Deleted),
                EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                    Some(RawEventKind::Deleted)
                }
                EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(RawEventKind::Created),
                EventKind::Modify(_) => Some(RawEventKind::Modified),
                _ => None,
            };
            let Some(raw_kind) = raw_kind else {
                return Vec::new();
            };
            event
                .paths
                .into_iter()
                .map(|path| RawEvent {
                    is_directory: path.is_dir(),
                    ..RawEvent::file(raw_kind, path)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        let watcher = FileWatcher::new(dir.path());
        assert!(watcher.is_ok());
    }

    #[test]
    fn test_watcher_detects_change() {
        let dir = tempdir().unwrap();
        let watcher = FileWatcher::new(dir.path()).unwrap();

        let file_path = dir.path().join("test.csv");
        fs::write(&file_path, "a,b\n1,2\n").unwrap();

        // Backends deliver asynchronously; wait for the event with a
        // bounded deadline rather than a fixed sleep.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        let found = loop {
            if std::time::Instant::now() >= deadline {
                break false;
            }
            if let Some(event) = watcher.recv_timeout(Duration::from_millis(100)) {
                let matches =
                    event.path.file_name().and_then(|n| n.to_str()) == Some("test.csv");
                seen.push(event);
                if matches {
                    break true;
                }
            }
        };

        assert!(found, "expected an event for test.csv, got {seen:?}");
    }

    #[test]
    fn test_convert_rename_both() {
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path("/w/a.csv".into())
            .add_path("/w/b.csv".into());

        let raw = convert(event);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].kind, RawEventKind::Moved);
        assert_eq!(raw[0].path, Path::new("/w/a.csv"));
        assert_eq!(raw[0].dest_path.as_deref(), Some(Path::new("/w/b.csv")));
    }

    #[test]
    fn test_convert_other_kinds() {
        let event = Event::new(EventKind::Create(notify::event::CreateKind::File))
            .add_path("/w/a.csv".into());
        assert_eq!(convert(event)[0].kind, RawEventKind::Created);

        let event = Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path("/w/a.csv".into());
        assert_eq!(convert(event)[0].kind, RawEventKind::Deleted);

        let event = Event::new(EventKind::Modify(ModifyKind::Data(
            notify::event::DataChange::Content,
        )))
        .add_path("/w/a.csv".into());
        assert_eq!(convert(event)[0].kind, RawEventKind::Modified);
    }
}
