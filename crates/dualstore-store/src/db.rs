//! Database connection management
//!
//! Opens SQLite connections and applies the record table schema

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Single table holding every model's records, attributes as JSON text
const RECORDS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    model_name TEXT NOT NULL,
    id TEXT NOT NULL,
    attributes TEXT NOT NULL,
    PRIMARY KEY (model_name, id)
);
";

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection and make sure the schema exists
pub fn configure(conn: &Connection) -> Result<()> {
    // journal_mode returns a row, so go through execute_batch
    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .map_err(from_rusqlite)?;
    conn.execute_batch(RECORDS_SCHEMA).map_err(from_rusqlite)?;
    Ok(())
}
