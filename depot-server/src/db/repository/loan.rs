//! Loan Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::Loan;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const LOAN_TABLE: &str = "loan";

#[derive(Clone)]
pub struct LoanRepository {
    base: BaseRepository,
}

impl LoanRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all loans, outstanding ones first
    pub async fn find_all(&self) -> RepoResult<Vec<Loan>> {
        let loans: Vec<Loan> = self
            .base
            .db()
            .query("SELECT * FROM loan ORDER BY status DESC, borrowed_at DESC")
            .await?
            .take(0)?;
        Ok(loans)
    }

    /// Find loan by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Loan>> {
        let rid = parse_record_id(LOAN_TABLE, id)?;
        let loan: Option<Loan> = self.base.db().select(rid).await?;
        Ok(loan)
    }

    /// Outstanding loans for one equipment unit
    pub async fn find_outstanding_for_equipment(&self, equipment: &str) -> RepoResult<Vec<Loan>> {
        let equipment = equipment.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM loan WHERE equipment = $equipment AND status = 'out'")
            .bind(("equipment", equipment))
            .await?;
        let loans: Vec<Loan> = result.take(0)?;
        Ok(loans)
    }
}
