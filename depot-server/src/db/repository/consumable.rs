//! Consumable Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::Consumable;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CONSUMABLE_TABLE: &str = "consumable";

#[derive(Clone)]
pub struct ConsumableRepository {
    base: BaseRepository,
}

impl ConsumableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all consumables
    pub async fn find_all(&self) -> RepoResult<Vec<Consumable>> {
        let consumables: Vec<Consumable> = self
            .base
            .db()
            .query("SELECT * FROM consumable ORDER BY name")
            .await?
            .take(0)?;
        Ok(consumables)
    }

    /// Find consumable by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Consumable>> {
        let rid = parse_record_id(CONSUMABLE_TABLE, id)?;
        let consumable: Option<Consumable> = self.base.db().select(rid).await?;
        Ok(consumable)
    }

    /// Consumables at or below their warn threshold, negative stock first
    ///
    /// Negative stock means over-issuance; the ledger never rejects it, it
    /// is surfaced here for reporting.
    pub async fn find_low_stock(&self) -> RepoResult<Vec<Consumable>> {
        let consumables: Vec<Consumable> = self
            .base
            .db()
            .query(
                "SELECT * FROM consumable WHERE stock_quantity <= warn_threshold \
                 ORDER BY stock_quantity",
            )
            .await?
            .take(0)?;
        Ok(consumables)
    }
}
