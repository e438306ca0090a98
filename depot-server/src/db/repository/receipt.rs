//! Receipt Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::Receipt;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const RECEIPT_TABLE: &str = "receipt";

#[derive(Clone)]
pub struct ReceiptRepository {
    base: BaseRepository,
}

impl ReceiptRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all receipts, most recent first
    pub async fn find_all(&self) -> RepoResult<Vec<Receipt>> {
        let receipts: Vec<Receipt> = self
            .base
            .db()
            .query("SELECT * FROM receipt ORDER BY received_at DESC")
            .await?
            .take(0)?;
        Ok(receipts)
    }

    /// Find receipt by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Receipt>> {
        let rid = parse_record_id(RECEIPT_TABLE, id)?;
        let receipt: Option<Receipt> = self.base.db().select(rid).await?;
        Ok(receipt)
    }
}
