//! Assignment repository.

use std::sync::Arc;

use crate::entities::{Assignment, assignment};
use campuswatch_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Assignment repository for database operations.
#[derive(Clone)]
pub struct AssignmentRepository {
    db: Arc<DatabaseConnection>,
}

impl AssignmentRepository {
    /// Create a new assignment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new assignment on the given connection.
    ///
    /// Takes the connection so the caller can bundle the insert with the
    /// first-assignment status bump in one transaction.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: assignment::ActiveModel,
    ) -> AppResult<assignment::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an assignment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<assignment::Model>> {
        Assignment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an assignment by ID, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<assignment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment {id} not found")))
    }

    /// Update an assignment's progress fields.
    pub async fn update(&self, model: assignment::ActiveModel) -> AppResult<assignment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an assignment (administrative override only).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Assignment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Assignment {id} not found")));
        }
        Ok(())
    }

    /// List a report's assignments, oldest first (merged-view order).
    pub async fn list_by_report(&self, report_id: &str) -> AppResult<Vec<assignment::Model>> {
        Assignment::find()
            .filter(assignment::Column::ReportId.eq(report_id))
            .order_by_asc(assignment::Column::AssignedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a report's assignments, newest first.
    pub async fn list_recent_by_report(
        &self,
        report_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<assignment::Model>> {
        Assignment::find()
            .filter(assignment::Column::ReportId.eq(report_id))
            .order_by_desc(assignment::Column::AssignedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a staff member's assignments, newest first.
    pub async fn list_by_account(
        &self,
        account_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<assignment::Model>> {
        Assignment::find()
            .filter(assignment::Column::AccountId.eq(account_id))
            .order_by_desc(assignment::Column::AssignedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count assignments for a report on the given connection.
    ///
    /// Runs on the caller's transaction so the "first assignment" decision
    /// sees the row inserted moments before.
    pub async fn count_for_report<C: ConnectionTrait>(
        &self,
        conn: &C,
        report_id: &str,
    ) -> AppResult<u64> {
        Assignment::find()
            .filter(assignment::Column::ReportId.eq(report_id))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
