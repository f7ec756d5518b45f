//! Notification filtering.
//!
//! One pure function turns a raw filesystem event into the operation the
//! synchronizer should apply, or nothing at all. Directories and files
//! with the wrong extension are out of scope; a move is decomposed per
//! endpoint, so a file moved across the scope boundary degenerates into
//! the matching half of the operation.

use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension watched by default.
pub const DEFAULT_EXTENSION: &str = "csv";

/// What happened, as reported by the notification source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    Created,
    Modified,
    Deleted,
    Moved,
}

/// A raw filesystem event, normalized from whatever the notification
/// backend produced.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: RawEventKind,
    pub is_directory: bool,
    /// Present only for [`RawEventKind::Moved`].
    pub dest_path: Option<PathBuf>,
}

impl RawEvent {
    /// A non-move event for a regular file.
    pub fn file(kind: RawEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind,
            is_directory: false,
            dest_path: None,
        }
    }

    /// A rename/move event for a regular file.
    pub fn moved(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            path: from.into(),
            kind: RawEventKind::Moved,
            is_directory: false,
            dest_path: Some(to.into()),
        }
    }
}

/// The operation the synchronizer applies for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create or fully replace the table for `path` from its contents.
    Upsert(PathBuf),
    /// Forget `path` and drop its table.
    Remove(PathBuf),
    /// `Upsert(to)` then `Remove(from)`, strictly in that order.
    Move { from: PathBuf, to: PathBuf },
}

/// Decides whether an event is in scope and what to do about it.
///
/// Extension matching is a case-sensitive exact match, so `data.CSV`
/// does not match the default `csv` extension.
pub fn classify(event: &RawEvent, extension: &str) -> Option<Operation> {
    if event.is_directory {
        debug!("ignoring directory event for '{}'", event.path.display());
        return None;
    }

    let src_in_scope = matches_extension(&event.path, extension);

    let op = match event.kind {
        RawEventKind::Created | RawEventKind::Modified => {
            src_in_scope.then(|| Operation::Upsert(event.path.clone()))
        }
        RawEventKind::Deleted => src_in_scope.then(|| Operation::Remove(event.path.clone())),
        RawEventKind::Moved => {
            let dest = event.dest_path.as_ref()?;
            match (src_in_scope, matches_extension(dest, extension)) {
                (true, true) => Some(Operation::Move {
                    from: event.path.clone(),
                    to: dest.clone(),
                }),
                // Moved out of scope: the old table goes away.
                (true, false) => Some(Operation::Remove(event.path.clone())),
                // Moved into scope: only the new name matters.
                (false, true) => Some(Operation::Upsert(dest.clone())),
                (false, false) => None,
            }
        }
    };

    if op.is_none() {
        debug!("ignoring '{}'", event.path.display());
    }
    op
}

fn matches_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_csv(event: &RawEvent) -> Option<Operation> {
        classify(event, DEFAULT_EXTENSION)
    }

    #[test]
    fn test_created_and_modified_upsert() {
        for kind in [RawEventKind::Created, RawEventKind::Modified] {
            let op = classify_csv(&RawEvent::file(kind, "/w/a.csv"));
            assert_eq!(op, Some(Operation::Upsert(PathBuf::from("/w/a.csv"))));
        }
    }

    #[test]
    fn test_deleted_removes() {
        let op = classify_csv(&RawEvent::file(RawEventKind::Deleted, "/w/a.csv"));
        assert_eq!(op, Some(Operation::Remove(PathBuf::from("/w/a.csv"))));
    }

    #[test]
    fn test_directories_are_ignored() {
        let mut event = RawEvent::file(RawEventKind::Created, "/w/a.csv");
        event.is_directory = true;
        assert_eq!(classify_csv(&event), None);
    }

    #[test]
    fn test_extension_must_match_exactly() {
        for path in ["/w/a.txt", "/w/a.CSV", "/w/a.csv.bak", "/w/csv"] {
            let event = RawEvent::file(RawEventKind::Modified, path);
            assert_eq!(classify_csv(&event), None, "{path} should be ignored");
        }
    }

    #[test]
    fn test_move_within_scope() {
        let op = classify_csv(&RawEvent::moved("/w/a.csv", "/w/b.csv"));
        assert_eq!(
            op,
            Some(Operation::Move {
                from: PathBuf::from("/w/a.csv"),
                to: PathBuf::from("/w/b.csv"),
            })
        );
    }

    #[test]
    fn test_move_out_of_scope_degenerates_to_remove() {
        let op = classify_csv(&RawEvent::moved("/w/a.csv", "/w/a.bak"));
        assert_eq!(op, Some(Operation::Remove(PathBuf::from("/w/a.csv"))));
    }

    #[test]
    fn test_move_into_scope_degenerates_to_upsert() {
        let op = classify_csv(&RawEvent::moved("/w/a.tmp", "/w/a.csv"));
        assert_eq!(op, Some(Operation::Upsert(PathBuf::from("/w/a.csv"))));
    }

    #[test]
    fn test_move_fully_out_of_scope_is_ignored() {
        assert_eq!(classify_csv(&RawEvent::moved("/w/a.tmp", "/w/b.tmp")), None);
    }

    #[test]
    fn test_custom_extension() {
        let event = RawEvent::file(RawEventKind::Created, "/w/a.tsv");
        assert_eq!(classify(&event, "csv"), None);
        assert_eq!(
            classify(&event, "tsv"),
            Some(Operation::Upsert(PathBuf::from("/w/a.tsv")))
        );
    }
}
