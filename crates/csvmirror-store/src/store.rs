//! The store contract used by the synchronizer.

use csvmirror_core::Table;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Dropping or reading a table that isn't there. The mirror treats
    /// this as a warning and self-heals on the next upsert.
    #[error("no such table: {0}")]
    NoSuchTable(String),
}

/// Write-side primitives the synchronizer needs from a store.
///
/// The mirror only ever replaces a table wholesale or drops it; there is
/// no row-level mutation. Implementations must make `replace_table`
/// atomic so readers never observe a partially-written table.
pub trait TableStore: Send + Sync {
    /// Creates or fully replaces `name` with the parsed rows: one
    /// implicit integer index column starting at 0, then one TEXT
    /// column per header entry. A header entry literally named `index`
    /// collides with the implicit column and fails the replace.
    fn replace_table(&self, name: &str, table: &Table) -> Result<(), StoreError>;

    /// Drops `name`. Fails with [`StoreError::NoSuchTable`] if it does
    /// not exist.
    fn drop_table(&self, name: &str) -> Result<(), StoreError>;
}
