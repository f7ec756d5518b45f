//! The state synchronizer.
//!
//! Owns the path → last-parsed-table mapping and applies classified
//! operations against the store. The mirror invariant: a table exists in
//! the store if and only if its file is currently tracked, and its rows
//! equal the file's last successfully parsed content.
//!
//! Concurrency: the notification source may deliver from several
//! threads. The mapping is a mutex-guarded map of per-path slots; the
//! map lock is held only long enough to fetch or create a slot, then the
//! file read and store mutation run under that slot's own lock. This
//! keeps one path's operations in arrival order while distinct paths
//! proceed concurrently. Slots are never removed, so a slot's lock stays
//! valid for the process lifetime.
//!
//! Known limitation: two watched paths with the same file stem derive
//! the same table name; the most recent upsert wins and a remove of
//! either path drops the shared table. Collisions are not detected.

use crate::filter::Operation;
use csvmirror_core::{derive_table_name, Table};
use csvmirror_store::TableStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

#[derive(Default)]
struct Slot {
    /// Last successfully parsed content; `None` once removed.
    table: Option<Table>,
}

/// Applies upsert/remove/move operations, keeping the store a lagging
/// but eventually-consistent mirror of the watched files.
///
/// One instance is constructed at startup and shared by reference with
/// whatever dispatches filesystem events.
pub struct Synchronizer<S: TableStore> {
    store: S,
    slots: Mutex<HashMap<PathBuf, Arc<Mutex<Slot>>>>,
}

impl<S: TableStore> Synchronizer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store, for read-side inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies one classified operation. Never fails: transient file
    /// races are swallowed and store failures are logged as warnings,
    /// so one bad event cannot take the mirror down.
    pub fn apply(&self, op: Operation) {
        match op {
            Operation::Upsert(path) => self.upsert(&path),
            Operation::Remove(path) => self.remove(&path),
            // Upsert before remove: a rapid move-back must never be
            // observable as a drop of the freshly created table.
            Operation::Move { from, to } => {
                self.upsert(&to);
                self.remove(&from);
            }
        }
    }

    fn upsert(&self, path: &Path) {
        let slot = self.slot(path);
        let mut slot = slot.lock().unwrap();

        let table = match Table::from_path(path) {
            Ok(table) => table,
            Err(err) if err.is_transient() => {
                // Vanished or not yet written; the next notification
                // for this path retries naturally.
                debug!("skipping '{}': {}", path.display(), err);
                return;
            }
            Err(err) => {
                warn!("cannot parse '{}': {}", path.display(), err);
                return;
            }
        };

        if let Err(err) = self.store.replace_table(&table.name, &table) {
            warn!("table replace failed for '{}': {}", path.display(), err);
        }
        // The mapping records the intended state even when the store
        // write failed, so later operations stay consistent.
        slot.table = Some(table);
    }

    fn remove(&self, path: &Path) {
        let Some(slot) = self.existing_slot(path) else {
            debug!("remove for untracked path '{}'", path.display());
            return;
        };
        let mut slot = slot.lock().unwrap();

        if slot.table.take().is_none() {
            debug!("remove for untracked path '{}'", path.display());
            return;
        }

        let name = derive_table_name(path);
        if let Err(err) = self.store.drop_table(&name) {
            warn!("table drop failed for '{}': {}", name, err);
        }
    }

    fn slot(&self, path: &Path) -> Arc<Mutex<Slot>> {
        let mut slots = self.slots.lock().unwrap();
        Arc::clone(slots.entry(path.to_path_buf()).or_default())
    }

    fn existing_slot(&self, path: &Path) -> Option<Arc<Mutex<Slot>>> {
        let slots = self.slots.lock().unwrap();
        slots.get(path).map(Arc::clone)
    }
}
