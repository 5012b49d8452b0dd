//! Report repository.
//!
//! Persists the polymorphic report entity: the base row plus exactly one
//! type-specific extension row, created and deleted together.

use std::sync::Arc;

use crate::entities::{
    CrimeReport, FacilityReport, Report, crime_report, facility_report,
    report::{self, ReportStatus, ReportType},
};
use campuswatch_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::Expr,
};

/// The type-specific extension row of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportExtension {
    /// Crime extension.
    Crime(crime_report::Model),
    /// Facility extension.
    Facility(facility_report::Model),
}

impl ReportExtension {
    /// The report type this extension belongs to.
    #[must_use]
    pub const fn report_type(&self) -> ReportType {
        match self {
            Self::Crime(_) => ReportType::Crime,
            Self::Facility(_) => ReportType::Facility,
        }
    }
}

/// Active model for the extension row, discriminated like the entity.
#[derive(Debug, Clone)]
pub enum ExtensionActiveModel {
    /// Crime extension.
    Crime(crime_report::ActiveModel),
    /// Facility extension.
    Facility(facility_report::ActiveModel),
}

/// Filter for report queries. All fields are optional and AND-combined.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Match this status.
    pub status: Option<ReportStatus>,
    /// Match this report type.
    pub report_type: Option<ReportType>,
    /// Match this submitter.
    pub submitted_by: Option<String>,
    /// Substring match over title, description and location.
    pub text: Option<String>,
    /// Submitted at or after this instant.
    pub submitted_after: Option<DateTime<Utc>>,
    /// Submitted at or before this instant.
    pub submitted_before: Option<DateTime<Utc>>,
}

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert the base report and its extension atomically.
    ///
    /// Both rows commit or neither does; partial creation is never
    /// observable.
    pub async fn create(
        &self,
        report: report::ActiveModel,
        extension: ExtensionActiveModel,
    ) -> AppResult<report::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = report
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match extension {
            ExtensionActiveModel::Crime(ext) => {
                ext.insert(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            ExtensionActiveModel::Facility(ext) => {
                ext.insert(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
    }

    /// Load the extension row matching the report's type.
    ///
    /// A missing extension means the exclusivity invariant is broken, which
    /// is a server error, not a caller mistake.
    pub async fn get_extension(&self, report: &report::Model) -> AppResult<ReportExtension> {
        match report.report_type {
            ReportType::Crime => CrimeReport::find_by_id(&report.id)
                .one(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(ReportExtension::Crime)
                .ok_or_else(|| {
                    AppError::Database(format!("Report {} is missing its crime extension", report.id))
                }),
            ReportType::Facility => FacilityReport::find_by_id(&report.id)
                .one(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(ReportExtension::Facility)
                .ok_or_else(|| {
                    AppError::Database(format!(
                        "Report {} is missing its facility extension",
                        report.id
                    ))
                }),
        }
    }

    /// Update a report's editable fields.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Conditionally move a report's status.
    ///
    /// The `UPDATE ... WHERE id = ? AND status = ?` clause is the optimistic
    /// guard: when two transitions race from the same observed status, only
    /// one matches the row. Returns whether this caller won.
    pub async fn update_status_checked<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        from: ReportStatus,
        to: ReportStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = Report::update_many()
            .col_expr(report::Column::Status, Expr::value(to))
            .col_expr(report::Column::UpdatedAt, Expr::value(now))
            .filter(report::Column::Id.eq(id))
            .filter(report::Column::Status.eq(from))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }

    /// Delete a report.
    ///
    /// Extension, assignments and resolution go with it through the
    /// `ON DELETE CASCADE` foreign keys, so a single statement is atomic.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Report::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Report {id} not found")));
        }
        Ok(())
    }

    /// Search reports matching a filter, newest first.
    pub async fn search(
        &self,
        filter: &ReportFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        Self::apply_filter(Report::find(), filter)
            .order_by_desc(report::Column::SubmittedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reports matching a filter.
    pub async fn count(&self, filter: &ReportFilter) -> AppResult<u64> {
        Self::apply_filter(Report::find(), filter)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn apply_filter(
        mut query: sea_orm::Select<Report>,
        filter: &ReportFilter,
    ) -> sea_orm::Select<Report> {
        if let Some(status) = filter.status {
            query = query.filter(report::Column::Status.eq(status));
        }
        if let Some(report_type) = filter.report_type {
            query = query.filter(report::Column::ReportType.eq(report_type));
        }
        if let Some(submitter) = &filter.submitted_by {
            query = query.filter(report::Column::SubmittedBy.eq(submitter));
        }
        if let Some(text) = &filter.text {
            query = query.filter(
                Condition::any()
                    .add(report::Column::Title.contains(text))
                    .add(report::Column::Description.contains(text))
                    .add(report::Column::Location.contains(text)),
            );
        }
        if let Some(after) = filter.submitted_after {
            query = query.filter(report::Column::SubmittedAt.gte(after));
        }
        if let Some(before) = filter.submitted_before {
            query = query.filter(report::Column::SubmittedAt.lte(before));
        }
        query
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_report(id: &str, status: ReportStatus) -> report::Model {
        report::Model {
            id: id.to_string(),
            submitted_by: "acc1".to_string(),
            title: "Broken pipe".to_string(),
            description: "Water everywhere".to_string(),
            location: "Dorm B".to_string(),
            status,
            report_type: ReportType::Facility,
            attachments: serde_json::json!([]),
            submitted_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_returns_report() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report("r1", ReportStatus::Pending)]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let report = repo.get_by_id("r1").await.unwrap();

        assert_eq!(report.id, "r1");
        assert_eq!(report.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let err = repo.get_by_id("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_status_checked_reports_win() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db.clone());
        let won = repo
            .update_status_checked(
                db.as_ref(),
                "r1",
                ReportStatus::Pending,
                ReportStatus::UnderReview,
                Utc::now(),
            )
            .await
            .unwrap();

        assert!(won);
    }

    #[tokio::test]
    async fn test_update_status_checked_reports_loss() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db.clone());
        let won = repo
            .update_status_checked(
                db.as_ref(),
                "r1",
                ReportStatus::Pending,
                ReportStatus::UnderReview,
                Utc::now(),
            )
            .await
            .unwrap();

        assert!(!won);
    }

    #[tokio::test]
    async fn test_delete_missing_report_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let err = repo.delete("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_with_status_filter() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    test_report("r1", ReportStatus::Pending),
                    test_report("r2", ReportStatus::Pending),
                ]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let filter = ReportFilter {
            status: Some(ReportStatus::Pending),
            ..ReportFilter::default()
        };
        let results = repo.search(&filter, 10, 0).await.unwrap();

        assert_eq!(results.len(), 2);
    }
}
