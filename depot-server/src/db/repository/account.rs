//! Account Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Account, AccountCreate, AccountUpdate};
use std::collections::HashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ACCOUNT_TABLE: &str = "account";

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active accounts
    pub async fn find_all(&self) -> RepoResult<Vec<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account WHERE is_active = true ORDER BY username")
            .await?
            .take(0)?;
        Ok(accounts)
    }

    /// Find all accounts including inactive
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account ORDER BY username")
            .await?
            .take(0)?;
        Ok(accounts)
    }

    /// Find account by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        let rid = parse_record_id(ACCOUNT_TABLE, id)?;
        let account: Option<Account> = self.base.db().select(rid).await?;
        Ok(account)
    }

    /// Find account by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM account WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let accounts: Vec<Account> = result.take(0)?;
        Ok(accounts.into_iter().next())
    }

    /// Resolve a set of account ids to display names
    ///
    /// Unknown ids are simply absent from the returned map; callers fall
    /// back to the raw identifier.
    pub async fn display_names(&self, ids: &[String]) -> RepoResult<HashMap<String, String>> {
        let mut names = HashMap::new();
        if ids.is_empty() {
            return Ok(names);
        }

        let things: Vec<surrealdb::RecordId> = ids
            .iter()
            .filter_map(|id| parse_record_id(ACCOUNT_TABLE, id).ok())
            .collect();
        let mut result = self
            .base
            .db()
            .query("SELECT <string>id AS id, display_name FROM account WHERE id IN $ids")
            .bind(("ids", things))
            .await?;

        #[derive(serde::Deserialize)]
        struct Row {
            id: String,
            display_name: String,
        }

        let rows: Vec<Row> = result.take(0)?;
        for row in rows {
            names.insert(row.id, row.display_name);
        }
        Ok(names)
    }

    /// Create a new account
    pub async fn create(&self, data: AccountCreate) -> RepoResult<Account> {
        // Check duplicate username
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        // Hash password
        let hash_pass = Account::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        let display_name = data.display_name.unwrap_or_else(|| data.username.clone());

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE account SET
                    username = $username,
                    display_name = $display_name,
                    hash_pass = $hash_pass,
                    role = $role,
                    is_system = false,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("display_name", display_name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .await?;

        let created: Option<Account> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create account".to_string()))
    }

    /// Seed the system administrator on first startup
    pub async fn ensure_system_admin(&self, password: &str) -> RepoResult<()> {
        if self.find_by_username("admin").await?.is_some() {
            return Ok(());
        }

        let hash_pass = Account::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        self.base
            .db()
            .query(
                r#"CREATE account SET
                    username = 'admin',
                    display_name = 'Administrator',
                    hash_pass = $hash_pass,
                    role = 'admin',
                    is_system = true,
                    is_active = true"#,
            )
            .bind(("hash_pass", hash_pass))
            .await?;

        tracing::info!("System administrator account created");
        Ok(())
    }

    /// Update an account
    pub async fn update(&self, id: &str, data: AccountUpdate) -> RepoResult<Account> {
        let rid = parse_record_id(ACCOUNT_TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Account {id} not found")))?;

        // System accounts can only change password
        if existing.is_system
            && (data.username.is_some()
                || data.role.is_some()
                || data.is_active.is_some()
                || data.display_name.is_some())
        {
            return Err(RepoError::Validation(
                "System account can only change password".to_string(),
            ));
        }

        // Check duplicate username if changing
        if let Some(ref new_username) = data.username
            && new_username != &existing.username
            && self.find_by_username(new_username).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Username '{new_username}' already exists"
            )));
        }

        let hash_pass = match data.password {
            Some(ref password) => Some(
                Account::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?,
            ),
            None => None,
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    username = $username OR username,
                    display_name = $display_name OR display_name,
                    hash_pass = $hash_pass OR hash_pass,
                    role = IF $has_role THEN $role ELSE role END,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END
                RETURN AFTER"#,
            )
            .bind(("thing", rid))
            .bind(("username", data.username))
            .bind(("display_name", data.display_name))
            .bind(("hash_pass", hash_pass))
            .bind(("has_role", data.role.is_some()))
            .bind(("role", data.role))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .await?;

        result
            .take::<Option<Account>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Account {id} not found")))
    }

    /// Hard delete an account
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(ACCOUNT_TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Account {id} not found")))?;

        // Prevent deleting system accounts
        if existing.is_system {
            return Err(RepoError::Validation(
                "Cannot delete system account".to_string(),
            ));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?;
        Ok(true)
    }
}
