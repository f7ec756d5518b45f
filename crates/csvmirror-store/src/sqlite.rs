//! SQLite implementation of the table store.
//!
//! One connection, opened once and shared behind a mutex. Table
//! replacement runs in a single transaction: drop the old table, create
//! the new schema, insert every row. A reader on another connection sees
//! either the previous table or the new one, never an intermediate state.

use crate::store::{StoreError, TableStore};
use csvmirror_core::Table;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::sync::Mutex;
use tracing::debug;

/// A table store backed by a single SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `target`. `:memory:` yields an
    /// in-memory database, matching SQLite's own convention.
    pub fn open(target: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(target)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Reads a table back in index order, every value rendered as text.
    /// Used for inspection and tests; the mirror itself never reads.
    pub fn select_all(&self, name: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let conn = self.conn.lock().unwrap();
        if !table_exists(&conn, name)? {
            return Err(StoreError::NoSuchTable(name.to_string()));
        }

        let sql = format!(
            "SELECT * FROM {} ORDER BY \"index\"",
            quote_ident(name)
        );
        let mut stmt = conn.prepare(&sql)?;
        let ncols = stmt.column_count();
        let mut rows = Vec::new();
        let mut query = stmt.query([])?;
        while let Some(row) = query.next()? {
            let mut fields = Vec::with_capacity(ncols);
            for i in 0..ncols {
                fields.push(render_value(row.get_ref(i)?));
            }
            rows.push(fields);
        }
        Ok(rows)
    }
}

impl TableStore for SqliteStore {
    fn replace_table(&self, name: &str, table: &Table) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(name)), [])?;

        let mut create = format!("CREATE TABLE {} (\"index\" INTEGER", quote_ident(name));
        for column in &table.columns {
            create.push_str(", ");
            create.push_str(&quote_ident(column));
            create.push_str(" TEXT");
        }
        create.push(')');
        tx.execute(&create, [])?;

        let placeholders = (1..=table.columns.len() + 1)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let insert = format!("INSERT INTO {} VALUES ({placeholders})", quote_ident(name));
        {
            let mut stmt = tx.prepare(&insert)?;
            for (index, row) in table.rows.iter().enumerate() {
                let mut values = Vec::with_capacity(row.len() + 1);
                values.push(Value::Integer(index as i64));
                values.extend(row.iter().map(|field| Value::Text(field.clone())));
                stmt.execute(params_from_iter(values))?;
            }
        }

        tx.commit()?;
        debug!("replaced table '{}' ({} rows)", name, table.rows.len());
        Ok(())
    }

    fn drop_table(&self, name: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        if !table_exists(&conn, name)? {
            return Err(StoreError::NoSuchTable(name.to_string()));
        }
        conn.execute(&format!("DROP TABLE {}", quote_ident(name)), [])?;
        debug!("dropped table '{}'", name);
        Ok(())
    }
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Double-quote escaping for identifiers. Values go through bound
/// parameters; only table and column names are interpolated.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}
