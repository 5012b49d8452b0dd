//! Resolution repository.

use std::sync::Arc;

use crate::entities::{Resolution, resolution};
use campuswatch_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    SqlErr,
};

/// Resolution repository for database operations.
#[derive(Clone)]
pub struct ResolutionRepository {
    db: Arc<DatabaseConnection>,
}

impl ResolutionRepository {
    /// Create a new resolution repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a resolution on the given connection.
    ///
    /// The unique index on `report_id` is what guarantees at-most-one
    /// resolution per report under concurrency; a violation surfaces as
    /// [`AppError::Conflict`].
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: resolution::ActiveModel,
    ) -> AppResult<resolution::Model> {
        model.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Report already has a resolution".to_string())
            }
            _ => AppError::Database(e.to_string()),
        })
    }

    /// Find the resolution for a report.
    pub async fn find_by_report(&self, report_id: &str) -> AppResult<Option<resolution::Model>> {
        Resolution::find()
            .filter(resolution::Column::ReportId.eq(report_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the resolution for a report, failing if there is none.
    pub async fn get_by_report(&self, report_id: &str) -> AppResult<resolution::Model> {
        self.find_by_report(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {report_id} has no resolution")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::resolution::ResolutionType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_resolution(id: &str, report_id: &str) -> resolution::Model {
        resolution::Model {
            id: id.to_string(),
            report_id: report_id.to_string(),
            resolved_by: "staff1".to_string(),
            resolution_type: ResolutionType::Resolved,
            resolution_summary: "Fixed".to_string(),
            evidence_path: None,
            resolved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_find_by_report_returns_resolution() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_resolution("res1", "r1")]])
                .into_connection(),
        );

        let repo = ResolutionRepository::new(db);
        let resolution = repo.find_by_report("r1").await.unwrap();

        assert!(resolution.is_some());
        assert_eq!(resolution.unwrap().report_id, "r1");
    }

    #[tokio::test]
    async fn test_get_by_report_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<resolution::Model>::new()])
                .into_connection(),
        );

        let repo = ResolutionRepository::new(db);
        let err = repo.get_by_report("r1").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
