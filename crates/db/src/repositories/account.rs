//! Account repository.
//!
//! Read-only resolution against the account directory. Account
//! administration lives outside the workflow engine.

use std::sync::Arc;

use crate::entities::{Account, account};
use campuswatch_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Account repository for database operations.
#[derive(Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<account::Model>> {
        Account::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an account by ID, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<account::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {id} not found")))
    }

    /// List accounts with a given role.
    pub async fn list_by_role(&self, role: account::AccountRole) -> AppResult<Vec<account::Model>> {
        Account::find()
            .filter(account::Column::Role.eq(role))
            .order_by_asc(account::Column::Username)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
