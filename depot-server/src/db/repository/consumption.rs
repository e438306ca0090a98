//! Consumption Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::Consumption;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CONSUMPTION_TABLE: &str = "consumption";

#[derive(Clone)]
pub struct ConsumptionRepository {
    base: BaseRepository,
}

impl ConsumptionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all consumption slips, most recent first
    pub async fn find_all(&self) -> RepoResult<Vec<Consumption>> {
        let slips: Vec<Consumption> = self
            .base
            .db()
            .query("SELECT * FROM consumption ORDER BY issued_at DESC")
            .await?
            .take(0)?;
        Ok(slips)
    }

    /// Find consumption slip by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Consumption>> {
        let rid = parse_record_id(CONSUMPTION_TABLE, id)?;
        let slip: Option<Consumption> = self.base.db().select(rid).await?;
        Ok(slip)
    }
}
