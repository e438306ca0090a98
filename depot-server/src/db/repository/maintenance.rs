//! Maintenance Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::Maintenance;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MAINTENANCE_TABLE: &str = "maintenance";

#[derive(Clone)]
pub struct MaintenanceRepository {
    base: BaseRepository,
}

impl MaintenanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all maintenance tickets, open ones first
    pub async fn find_all(&self) -> RepoResult<Vec<Maintenance>> {
        let tickets: Vec<Maintenance> = self
            .base
            .db()
            .query("SELECT * FROM maintenance ORDER BY status, completed_at DESC")
            .await?
            .take(0)?;
        Ok(tickets)
    }

    /// Find maintenance ticket by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Maintenance>> {
        let rid = parse_record_id(MAINTENANCE_TABLE, id)?;
        let ticket: Option<Maintenance> = self.base.db().select(rid).await?;
        Ok(ticket)
    }
}
