//! csvmirror Core - delimited-text parsing and the table model
//!
//! This crate turns a CSV file on disk into a [`Table`]: an ordered
//! header plus ordered rows, ready to be written to a relational store.
//! It also owns table-name derivation, since the store table a file maps
//! to is a property of the file's name alone.
//!
//! # Example
//!
//! ```no_run
//! use csvmirror_core::Table;
//! use std::path::Path;
//!
//! let table = Table::from_path(Path::new("data/users.csv")).unwrap();
//! println!("{}: {} rows", table.name, table.rows.len());
//! ```

pub mod error;
pub mod table;

pub use error::{ParseError, Result};
pub use table::{derive_table_name, Table};
