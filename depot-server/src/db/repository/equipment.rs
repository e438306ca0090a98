//! Equipment Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::Equipment;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const EQUIPMENT_TABLE: &str = "equipment";

#[derive(Clone)]
pub struct EquipmentRepository {
    base: BaseRepository,
}

impl EquipmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all equipment ordered by asset tag
    pub async fn find_all(&self) -> RepoResult<Vec<Equipment>> {
        let equipment: Vec<Equipment> = self
            .base
            .db()
            .query("SELECT * FROM equipment ORDER BY asset_tag")
            .await?
            .take(0)?;
        Ok(equipment)
    }

    /// Find equipment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Equipment>> {
        let rid = parse_record_id(EQUIPMENT_TABLE, id)?;
        let equipment: Option<Equipment> = self.base.db().select(rid).await?;
        Ok(equipment)
    }

    /// Find equipment by asset tag
    pub async fn find_by_asset_tag(&self, asset_tag: &str) -> RepoResult<Option<Equipment>> {
        let tag = asset_tag.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM equipment WHERE asset_tag = $tag LIMIT 1")
            .bind(("tag", tag))
            .await?;
        let equipment: Vec<Equipment> = result.take(0)?;
        Ok(equipment.into_iter().next())
    }
}
