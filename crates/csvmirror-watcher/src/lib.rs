//! csvmirror Watcher - filesystem events in, store mutations out
//!
//! This crate handles the event side of the mirror:
//! - Adapting raw `notify` events into a uniform event record
//! - Classifying events into upsert/remove/move operations
//! - Applying those operations against the table store
//!
//! The synchronizer is the one component with real invariants: table
//! existence and content must track file existence and content, with no
//! partial or stale state observable between operations.

mod filter;
mod synchronizer;
mod watcher;

pub use filter::{classify, Operation, RawEvent, RawEventKind, DEFAULT_EXTENSION};
pub use synchronizer::Synchronizer;
pub use watcher::{FileWatcher, WatchError};
