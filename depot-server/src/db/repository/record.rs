//! Generic record store
//!
//! The mutation engine persists business records through this single
//! (table, id) → content interface: `select` / `create` / `update` /
//! `delete`, each atomic for one row, with no multi-row transaction.
//! That restriction is why the engine carries its own compensation logic.

use super::{BaseRepository, RepoError, RepoResult};
use serde_json::Value;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct RecordStore {
    base: BaseRepository,
}

impl RecordStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Allocate a fresh record id for `table`
    pub fn new_id(table: &str) -> RecordId {
        RecordId::from_table_key(table, shared::util::snowflake_id())
    }

    /// Fetch the current content of a record, `None` if it does not exist
    pub async fn select(&self, id: &RecordId) -> RepoResult<Option<Value>> {
        let value: Option<Value> = self.base.db().select(id.clone()).await?;
        Ok(value)
    }

    /// Insert a new record with the given content
    pub async fn create(&self, id: &RecordId, content: Value) -> RepoResult<()> {
        let created: Option<Value> = self
            .base
            .db()
            .create(id.clone())
            .content(content)
            .await?;
        created
            .map(|_| ())
            .ok_or_else(|| RepoError::Database(format!("Failed to create {id}")))
    }

    /// Write the declared fields of an existing record
    ///
    /// Merge, not replace: a draft carries only the declared fields of its
    /// entity, and counters maintained elsewhere (stock_quantity) must
    /// survive a record update.
    pub async fn update(&self, id: &RecordId, content: Value) -> RepoResult<()> {
        let updated: Option<Value> = self
            .base
            .db()
            .update(id.clone())
            .merge(content)
            .await?;
        updated
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("{id} not found")))
    }

    /// Delete a record
    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        let _: Option<Value> = self.base.db().delete(id.clone()).await?;
        Ok(())
    }
}
