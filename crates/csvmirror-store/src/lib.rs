//! csvmirror Store - the relational side of the mirror
//!
//! This crate defines the [`TableStore`] contract the synchronizer writes
//! through (full-table replace and drop, nothing finer-grained) and the
//! SQLite implementation behind it. The connection is opened once at
//! startup and held for the process lifetime.

mod sqlite;
mod store;

pub use sqlite::SqliteStore;
pub use store::{StoreError, TableStore};
