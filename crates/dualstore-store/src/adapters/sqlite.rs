//! SQLite-backed adapter
//!
//! Every model shares the `records` table. Attributes are stored as JSON
//! text; queries load the model's rows and filter them in process.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use dualstore_core::contract::{Adapter, RepoFuture};
use dualstore_core::errors::{DualStoreError, Result};
use dualstore_core::model::{Attributes, Options, Record};
use futures::future::{ready, FutureExt};
use rusqlite::{Connection, OptionalExtension};

use super::assign_id;
use crate::db;
use crate::errors::{corrupt_attributes, encode_attributes, from_rusqlite, lock_poisoned};

pub struct SqliteAdapter {
    conn: Mutex<Connection>,
}

impl SqliteAdapter {
    /// Open (or create) a database file
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the file cannot be opened or the
    /// schema cannot be applied.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if SQLite fails to initialize.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Wrap an existing connection, creating the schema if needed
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the schema cannot be applied.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned("sqlite_adapter"))
    }

    fn fetch_one(&self, model_name: &str, id: &str) -> Result<Option<Record>> {
        let conn = self.lock()?;
        let attributes: Option<String> = conn
            .query_row(
                "SELECT attributes FROM records WHERE model_name = ?1 AND id = ?2",
                rusqlite::params![model_name, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;

        attributes
            .map(|text| decode(model_name, id, &text))
            .transpose()
    }

    fn fetch_all(&self, model_name: &str) -> Result<Vec<Record>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, attributes FROM records WHERE model_name = ?1 ORDER BY id")
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([model_name], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(from_rusqlite)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, text) = row.map_err(from_rusqlite)?;
            records.push(decode(model_name, &id, &text)?);
        }
        Ok(records)
    }

    fn select(&self, model_name: &str, query: &Options) -> Result<Vec<Record>> {
        Ok(self
            .fetch_all(model_name)?
            .into_iter()
            .filter(|record| record.matches(query))
            .collect())
    }

    fn insert(&self, record: &Record) -> Result<Record> {
        let id = assign_id(record);
        let text = serde_json::to_string(&record.attributes)
            .map_err(|e| encode_attributes(&record.model_name, e))?;

        let conn = self.lock()?;
        let inserted = conn
            .execute(
                "INSERT INTO records (model_name, id, attributes) VALUES (?1, ?2, ?3)
                 ON CONFLICT(model_name, id) DO NOTHING",
                rusqlite::params![record.model_name, id, text],
            )
            .map_err(from_rusqlite)?;
        if inserted == 0 {
            return Err(DualStoreError::DuplicateRecord {
                model_name: record.model_name.clone(),
                id,
            }
            .into());
        }

        Ok(Record::loaded(record.model_name.clone(), id, record.attributes.clone()))
    }

    fn upsert(&self, record: &Record) -> Result<Record> {
        let id = record.require_id()?;
        let text = serde_json::to_string(&record.attributes)
            .map_err(|e| encode_attributes(&record.model_name, e))?;

        self.lock()?
            .execute(
                "INSERT INTO records (model_name, id, attributes) VALUES (?1, ?2, ?3)
                 ON CONFLICT(model_name, id) DO UPDATE SET attributes = excluded.attributes",
                rusqlite::params![record.model_name, id, text],
            )
            .map_err(from_rusqlite)?;

        Ok(Record::loaded(record.model_name.clone(), id, record.attributes.clone()))
    }

    fn remove(&self, record: &Record) -> Result<()> {
        let id = record.require_id()?;
        self.lock()?
            .execute(
                "DELETE FROM records WHERE model_name = ?1 AND id = ?2",
                rusqlite::params![record.model_name, id],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }
}

fn decode(model_name: &str, id: &str, text: &str) -> Result<Record> {
    let attributes: Attributes =
        serde_json::from_str(text).map_err(|e| corrupt_attributes(model_name, id, e))?;
    Ok(Record::loaded(model_name, id, attributes))
}

impl Adapter for SqliteAdapter {
    fn find_record<'a>(&'a self, model_name: &'a str, id: &'a str) -> RepoFuture<'a, Option<Record>> {
        ready(self.fetch_one(model_name, id)).boxed()
    }

    fn find_all<'a>(&'a self, model_name: &'a str) -> RepoFuture<'a, Vec<Record>> {
        ready(self.fetch_all(model_name)).boxed()
    }

    fn query<'a>(&'a self, model_name: &'a str, query: &'a Options) -> RepoFuture<'a, Vec<Record>> {
        ready(self.select(model_name, query)).boxed()
    }

    fn query_record<'a>(
        &'a self,
        model_name: &'a str,
        query: &'a Options,
    ) -> RepoFuture<'a, Option<Record>> {
        let first = self
            .select(model_name, query)
            .map(|records| records.into_iter().next());
        ready(first).boxed()
    }

    fn create_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        ready(self.insert(record)).boxed()
    }

    fn update_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        ready(self.upsert(record)).boxed()
    }

    fn delete_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, ()> {
        ready(self.remove(record)).boxed()
    }
}
