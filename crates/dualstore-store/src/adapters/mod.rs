//! Local adapters

mod memory;
mod sqlite;

pub use memory::MemoryAdapter;
pub use sqlite::SqliteAdapter;

use dualstore_core::model::Record;

/// Id for a record that arrives without one
pub(crate) fn assign_id(record: &Record) -> String {
    record
        .id()
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string())
}
