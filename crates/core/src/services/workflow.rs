//! Workflow facade.
//!
//! Single entry point for the report lifecycle. Operations that touch a
//! single component delegate straight through; operations that span
//! components (assignment with the first-assignment status bump, resolution
//! with the move to `Resolved`) run inside one transaction owned here.

use std::sync::Arc;

use campuswatch_common::{AppError, AppResult};
use campuswatch_db::entities::{
    assignment,
    report::{self, ReportStatus},
    resolution,
};
use campuswatch_db::repositories::{
    AccountRepository, AssignmentRepository, ReportExtension, ReportFilter, ReportRepository,
    ResolutionRepository,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::info;

use crate::lifecycle;
use crate::services::{
    AssignmentService, BulkProgressUpdate, BulkUpdateOutcome, ReportService, ResolutionService,
    ResolveReportInput, SubmitReportInput, UpdateReportFields,
};

/// Full snapshot of a report: base row, extension, assignment history in
/// chronological order, and the resolution once one exists.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    /// The base report row.
    pub report: report::Model,
    /// The type-specific extension.
    pub extension: ReportExtension,
    /// Assignments, oldest first.
    pub assignments: Vec<assignment::Model>,
    /// The resolution, if the report has been resolved.
    pub resolution: Option<resolution::Model>,
}

/// An assignment together with the owning report's current status.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    /// The assignment row.
    pub assignment: assignment::Model,
    /// Status of the owning report after the operation.
    pub report_status: ReportStatus,
}

/// Facade over the report, assignment and resolution services.
#[derive(Clone)]
pub struct WorkflowService {
    db: Arc<DatabaseConnection>,
    reports: ReportService,
    assignments: AssignmentService,
    resolutions: ResolutionService,
    account_repo: AccountRepository,
}

impl WorkflowService {
    /// Create a new workflow service over a database connection.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let report_repo = ReportRepository::new(db.clone());
        let account_repo = AccountRepository::new(db.clone());
        let assignment_repo = AssignmentRepository::new(db.clone());
        let resolution_repo = ResolutionRepository::new(db.clone());

        Self {
            reports: ReportService::new(db.clone(), report_repo.clone(), account_repo.clone()),
            assignments: AssignmentService::new(assignment_repo, report_repo),
            resolutions: ResolutionService::new(resolution_repo),
            account_repo,
            db,
        }
    }

    /// Submit a new report and return its full view.
    pub async fn submit_report(&self, input: SubmitReportInput) -> AppResult<ReportView> {
        let report = self.reports.submit(input).await?;
        self.view(&report.id).await
    }

    /// Get the full view of a report.
    pub async fn get_report(&self, report_id: &str) -> AppResult<ReportView> {
        self.view(report_id).await
    }

    /// Update a report's editable fields (pending reports only).
    pub async fn update_report(
        &self,
        report_id: &str,
        fields: UpdateReportFields,
    ) -> AppResult<ReportView> {
        self.reports.update_fields(report_id, fields).await?;
        self.view(report_id).await
    }

    /// Move a report to a new status through the state machine.
    pub async fn change_status(
        &self,
        report_id: &str,
        target: ReportStatus,
    ) -> AppResult<ReportView> {
        self.reports.transition_status(report_id, target).await?;
        self.view(report_id).await
    }

    /// Delete a report (pending or rejected only).
    pub async fn delete_report(&self, report_id: &str) -> AppResult<()> {
        self.reports.delete(report_id).await
    }

    /// Search reports matching a filter, newest first.
    pub async fn search_reports(
        &self,
        filter: &ReportFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.reports.search(filter, limit, offset).await
    }

    /// Count reports matching a filter.
    pub async fn count_reports(&self, filter: &ReportFilter) -> AppResult<u64> {
        self.reports.count(filter).await
    }

    /// Assign a staff account to a report.
    ///
    /// The first assignment pulls the report to `InProgress`; the insert and
    /// the status bump commit in the same transaction so no observer ever
    /// sees an assigned report still waiting for triage.
    pub async fn assign_staff(
        &self,
        report_id: &str,
        account_id: &str,
    ) -> AppResult<AssignmentView> {
        let report = self.reports.get_model(report_id).await?;
        if report.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Report {report_id} is {:?} and cannot accept assignments",
                report.status
            )));
        }

        let account = self.account_repo.get_by_id(account_id).await?;
        if !account.role.is_staff() {
            return Err(AppError::Validation(format!(
                "Account {account_id} is not a staff account"
            )));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let (created, first) = self
            .assignments
            .create_in(&txn, report_id, account_id)
            .await?;

        let report_status = if first {
            self.reports.force_in_progress_in(&txn, &report).await?;
            ReportStatus::InProgress
        } else {
            report.status
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            report_id = %report_id,
            account_id = %account_id,
            first_assignment = first,
            "Staff assigned to report"
        );
        Ok(AssignmentView {
            assignment: created,
            report_status,
        })
    }

    /// Record an assignee's progress on an assignment.
    pub async fn post_progress(
        &self,
        assignment_id: &str,
        action_taken: String,
        additional_feedback: String,
    ) -> AppResult<AssignmentView> {
        let updated = self
            .assignments
            .record_progress(assignment_id, action_taken, additional_feedback)
            .await?;
        let report = self.reports.get_model(&updated.report_id).await?;

        Ok(AssignmentView {
            assignment: updated,
            report_status: report.status,
        })
    }

    /// Apply progress updates to several assignments, best effort.
    pub async fn bulk_progress(&self, updates: Vec<BulkProgressUpdate>) -> BulkUpdateOutcome {
        self.assignments.bulk_update(updates).await
    }

    /// List a report's assignments, newest first.
    pub async fn list_report_assignments(
        &self,
        report_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<assignment::Model>> {
        self.assignments.list_by_report(report_id, limit, offset).await
    }

    /// List a staff member's assignments, newest first.
    pub async fn list_account_assignments(
        &self,
        account_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<assignment::Model>> {
        self.assignments
            .list_by_account(account_id, limit, offset)
            .await
    }

    /// Remove an assignment from a terminal report.
    pub async fn remove_assignment(&self, assignment_id: &str) -> AppResult<()> {
        self.assignments.remove(assignment_id).await
    }

    /// Resolve a report.
    ///
    /// The resolution row and the status move to `Resolved` commit together.
    /// A report can only ever hold one resolution: the early lookup catches
    /// the common case, and the unique index on `resolution.report_id`
    /// catches the race.
    pub async fn resolve_report(&self, input: ResolveReportInput) -> AppResult<ReportView> {
        let report = self.reports.get_model(&input.report_id).await?;

        let account = self.account_repo.get_by_id(&input.resolved_by).await?;
        if !account.role.is_staff() {
            return Err(AppError::Validation(format!(
                "Account {} is not a staff account",
                input.resolved_by
            )));
        }

        if self
            .resolutions
            .find_by_report(&input.report_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Report {} already has a resolution",
                input.report_id
            )));
        }

        // Fail before writing anything when the report is not resolvable.
        lifecycle::transition(report.status, ReportStatus::Resolved)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let resolution = self.resolutions.create_in(&txn, input).await?;
        self.reports
            .transition_in(&txn, &report, ReportStatus::Resolved)
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            report_id = %report.id,
            resolution_id = %resolution.id,
            resolution_type = ?resolution.resolution_type,
            "Report resolved"
        );
        self.view(&report.id).await
    }

    /// Get the resolution of a report, failing if there is none.
    pub async fn get_resolution(&self, report_id: &str) -> AppResult<resolution::Model> {
        self.resolutions.get_by_report(report_id).await
    }

    async fn view(&self, report_id: &str) -> AppResult<ReportView> {
        let (report, extension) = self.reports.get_with_extension(report_id).await?;
        let assignments = self.assignments.list_chronological(report_id).await?;
        let resolution = self.resolutions.find_by_report(report_id).await?;

        Ok(ReportView {
            report,
            extension,
            assignments,
            resolution,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campuswatch_db::entities::{
        account::{self, AccountRole},
        facility_report::{self, FacilityType, UrgencyLevel},
        report::ReportType,
        resolution::ResolutionType,
    };
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn test_report(status: ReportStatus) -> report::Model {
        report::Model {
            id: "r1".to_string(),
            submitted_by: "acc1".to_string(),
            title: "Leaking pipe".to_string(),
            description: "Water on the floor".to_string(),
            location: "Dorm B".to_string(),
            status,
            report_type: ReportType::Facility,
            attachments: serde_json::json!([]),
            submitted_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_extension() -> facility_report::Model {
        facility_report::Model {
            report_id: "r1".to_string(),
            facility_type: FacilityType::Plumbing,
            asset_tag: None,
            estimated_cost: Some(120.0),
            urgency_level: Some(UrgencyLevel::High),
            maintenance_required: true,
            maintenance_notes: None,
        }
    }

    fn test_account(id: &str, role: AccountRole) -> account::Model {
        account::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            display_name: "Test".to_string(),
            email: None,
            role,
            created_at: Utc::now(),
        }
    }

    fn test_assignment(id: &str) -> assignment::Model {
        assignment::Model {
            id: id.to_string(),
            report_id: "r1".to_string(),
            account_id: "staff1".to_string(),
            action_taken: String::new(),
            additional_feedback: String::new(),
            assigned_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_resolution() -> resolution::Model {
        resolution::Model {
            id: "res1".to_string(),
            report_id: "r1".to_string(),
            resolved_by: "staff1".to_string(),
            resolution_type: ResolutionType::Resolved,
            resolution_summary: "Pipe replaced".to_string(),
            evidence_path: None,
            resolved_at: Utc::now(),
        }
    }

    fn count_row(count: i64) -> std::collections::BTreeMap<&'static str, Value> {
        btreemap! { "num_items" => Value::BigInt(Some(count)) }
    }

    fn resolve_input() -> ResolveReportInput {
        ResolveReportInput {
            report_id: "r1".to_string(),
            resolved_by: "staff1".to_string(),
            resolution_type: ResolutionType::Resolved,
            summary: "Pipe replaced".to_string(),
            evidence_path: None,
        }
    }

    #[tokio::test]
    async fn test_assign_staff_first_assignment_moves_report_in_progress() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report(ReportStatus::Pending)]])
                .append_query_results([[test_account("staff1", AccountRole::Staff)]])
                .append_query_results([[count_row(0)]])
                .append_query_results([[test_assignment("a1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let view = workflow.assign_staff("r1", "staff1").await.unwrap();

        assert_eq!(view.assignment.id, "a1");
        assert_eq!(view.report_status, ReportStatus::InProgress);
    }

    #[tokio::test]
    async fn test_assign_staff_subsequent_assignment_keeps_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report(ReportStatus::InProgress)]])
                .append_query_results([[test_account("staff2", AccountRole::Admin)]])
                .append_query_results([[count_row(1)]])
                .append_query_results([[test_assignment("a2")]])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let view = workflow.assign_staff("r1", "staff2").await.unwrap();

        assert_eq!(view.assignment.id, "a2");
        assert_eq!(view.report_status, ReportStatus::InProgress);
    }

    #[tokio::test]
    async fn test_assign_staff_rejects_first_assignment_on_resolved_report() {
        // A resolved report with no assignments must not be pulled back to
        // in-progress; the whole transaction rolls back.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report(ReportStatus::Resolved)]])
                .append_query_results([[test_account("staff1", AccountRole::Staff)]])
                .append_query_results([[count_row(0)]])
                .append_query_results([[test_assignment("a1")]])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let err = workflow.assign_staff("r1", "staff1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_assign_staff_rejects_terminal_report() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report(ReportStatus::Closed)]])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let err = workflow.assign_staff("r1", "staff1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_assign_staff_rejects_non_staff_account() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report(ReportStatus::Pending)]])
                .append_query_results([[test_account("stud1", AccountRole::Student)]])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let err = workflow.assign_staff("r1", "stud1").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resolve_report_rejects_second_resolution() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report(ReportStatus::InProgress)]])
                .append_query_results([[test_account("staff1", AccountRole::Staff)]])
                .append_query_results([[test_resolution()]])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let err = workflow.resolve_report(resolve_input()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_resolve_report_rejects_unstarted_report() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report(ReportStatus::Pending)]])
                .append_query_results([[test_account("staff1", AccountRole::Staff)]])
                .append_query_results([Vec::<resolution::Model>::new()])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let err = workflow.resolve_report(resolve_input()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_resolve_report_returns_resolved_view() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Pre-checks.
                .append_query_results([[test_report(ReportStatus::InProgress)]])
                .append_query_results([[test_account("staff1", AccountRole::Staff)]])
                .append_query_results([Vec::<resolution::Model>::new()])
                // Transaction: resolution insert, then the status move.
                .append_query_results([[test_resolution()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // Final view.
                .append_query_results([[test_report(ReportStatus::Resolved)]])
                .append_query_results([[test_extension()]])
                .append_query_results([[test_assignment("a1")]])
                .append_query_results([[test_resolution()]])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let view = workflow.resolve_report(resolve_input()).await.unwrap();

        assert_eq!(view.report.status, ReportStatus::Resolved);
        assert_eq!(view.assignments.len(), 1);
        let resolution = view.resolution.unwrap();
        assert_eq!(resolution.resolution_summary, "Pipe replaced");
    }

    #[tokio::test]
    async fn test_post_progress_returns_owning_report_status() {
        let updated = assignment::Model {
            action_taken: "Valve replaced".to_string(),
            ..test_assignment("a1")
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_assignment("a1")]])
                .append_query_results([[updated]])
                .append_query_results([[test_report(ReportStatus::InProgress)]])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let view = workflow
            .post_progress("a1", "Valve replaced".to_string(), String::new())
            .await
            .unwrap();

        assert_eq!(view.assignment.action_taken, "Valve replaced");
        assert_eq!(view.report_status, ReportStatus::InProgress);
    }

    #[tokio::test]
    async fn test_get_report_assembles_full_view() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report(ReportStatus::InProgress)]])
                .append_query_results([[test_extension()]])
                .append_query_results([[test_assignment("a1"), test_assignment("a2")]])
                .append_query_results([Vec::<resolution::Model>::new()])
                .into_connection(),
        );
        let workflow = WorkflowService::new(db);

        let view = workflow.get_report("r1").await.unwrap();

        assert_eq!(view.report.id, "r1");
        assert!(matches!(view.extension, ReportExtension::Facility(_)));
        assert_eq!(view.assignments.len(), 2);
        assert!(view.resolution.is_none());
    }
}
