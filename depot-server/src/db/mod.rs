//! Database Module
//!
//! Embedded SurrealDB storage. The server runs on the RocksDB engine under
//! the configured work directory; tests use the in-memory engine through
//! the same code path.

pub mod models;
pub mod repository;
pub mod schema;

use crate::utils::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "depot";
const DATABASE: &str = "main";

/// Open the on-disk database and apply schema definitions
pub async fn open(data_dir: &Path) -> Result<Surreal<Db>, AppError> {
    let path = data_dir.join("depot.db");
    let db: Surreal<Db> = Surreal::new::<RocksDb>(path.as_path())
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    schema::apply(&db).await?;
    tracing::info!("Database opened at {}", path.display());
    Ok(db)
}

/// Open an in-memory database (tests and tooling)
pub async fn open_memory() -> Result<Surreal<Db>, AppError> {
    let db: Surreal<Db> = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    schema::apply(&db).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    async fn opens_on_disk_database_with_schema_in_force() {
        let tmp = tempfile::tempdir().unwrap();
        let db = super::open(tmp.path()).await.unwrap();

        // Reopening definitions must be idempotent
        super::schema::apply(&db).await.unwrap();

        // The unique username index from the bootstrap is active
        db.query(
            "CREATE account SET username = 'dup', display_name = 'One', \
             hash_pass = 'h', role = 'staff', is_system = false, is_active = true",
        )
        .await
        .unwrap()
        .check()
        .unwrap();

        let second = db
            .query(
                "CREATE account SET username = 'dup', display_name = 'Two', \
                 hash_pass = 'h', role = 'staff', is_system = false, is_active = true",
            )
            .await
            .unwrap()
            .check();
        assert!(second.is_err());
    }
}
