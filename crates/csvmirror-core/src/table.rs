//! Parsed-table representation and table-name derivation.
//!
//! A [`Table`] is the canonical in-memory form of one watched file:
//! the header row names the columns, every following record is a row.
//! The reader mirrors the lenient defaults of the original tooling this
//! replaces: duplicate header names get a `.N` suffix, records shorter
//! than the header are padded with empty fields, records wider than the
//! header are an error.

use crate::error::{ParseError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The parsed content of one delimited-text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Store table name, derived from the file name.
    pub name: String,

    /// Column names from the header row, deduplicated.
    pub columns: Vec<String>,

    /// Data rows, each exactly `columns.len()` fields wide.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Reads and parses the file at `path`.
    ///
    /// This is the main entry point for the synchronizer. The returned
    /// errors split into transient ones (file vanished, file empty) that
    /// callers swallow, and real parse failures worth a warning.
    pub fn from_path(path: &Path) -> Result<Table> {
        let source = fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
        Table::from_source(&source, path)
    }

    /// Parses delimited text directly. `path` is used for the derived
    /// table name and for error context only.
    pub fn from_source(source: &str, path: &Path) -> Result<Table> {
        if source.trim().is_empty() {
            return Err(ParseError::Empty(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(source.as_bytes());

        let headers = reader.headers().map_err(|e| ParseError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let columns = dedup_columns(headers.iter());
        let width = columns.len();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| ParseError::Malformed {
                path: path.to_path_buf(),
                source: e,
            })?;
            if record.len() > width {
                return Err(ParseError::Ragged {
                    path: path.to_path_buf(),
                    row: i + 1,
                    expected: width,
                    found: record.len(),
                });
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Table {
            name: derive_table_name(path),
            columns,
            rows,
        })
    }
}

/// Derives the store table name for a watched file: the final path
/// segment with the trailing extension stripped.
pub fn derive_table_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Disambiguates duplicate header names by suffixing `.1`, `.2`, ...
/// so the store never sees two identical column names.
fn dedup_columns<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::new();

    for name in names {
        let mut candidate = name.to_string();
        if let Some(count) = seen.get(name).copied() {
            let mut n = count;
            // The suffixed name could itself collide with a real header.
            loop {
                candidate = format!("{name}.{n}");
                if !seen.contains_key(&candidate) {
                    break;
                }
                n += 1;
            }
            seen.insert(name.to_string(), n + 1);
        }
        seen.entry(candidate.clone()).or_insert(1);
        columns.push(candidate);
    }

    columns
}
