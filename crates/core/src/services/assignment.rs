//! Assignment tracker service.
//!
//! Tracks which staff members are tied to a report and their progress
//! notes. Status changes triggered by assignment live in the workflow
//! facade, not here.

use campuswatch_common::{AppError, AppResult, IdGenerator};
use campuswatch_db::entities::assignment;
use campuswatch_db::repositories::{AssignmentRepository, ReportRepository};
use chrono::Utc;
use sea_orm::{ConnectionTrait, Set};
use tracing::{info, warn};

/// One item of a bulk progress update.
#[derive(Debug, Clone)]
pub struct BulkProgressUpdate {
    /// Assignment to update.
    pub assignment_id: String,
    /// New action-taken text.
    pub action_taken: String,
    /// New feedback text.
    pub additional_feedback: String,
}

/// A failed item of a bulk progress update.
#[derive(Debug)]
pub struct BulkUpdateFailure {
    /// Assignment that failed to update.
    pub assignment_id: String,
    /// Why it failed.
    pub error: AppError,
}

/// Outcome of a bulk progress update: best effort, per-item results.
#[derive(Debug, Default)]
pub struct BulkUpdateOutcome {
    /// How many assignments were updated.
    pub updated: usize,
    /// The items that failed, in input order.
    pub failures: Vec<BulkUpdateFailure>,
}

/// Service for the assignment tracker.
#[derive(Clone)]
pub struct AssignmentService {
    assignment_repo: AssignmentRepository,
    report_repo: ReportRepository,
    id_gen: IdGenerator,
}

impl AssignmentService {
    /// Create a new assignment service.
    #[must_use]
    pub const fn new(
        assignment_repo: AssignmentRepository,
        report_repo: ReportRepository,
    ) -> Self {
        Self {
            assignment_repo,
            report_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an assignment on the given connection.
    ///
    /// Returns the new assignment and whether it is the first one for the
    /// report; the existence check runs on the same connection so the
    /// first-assignment decision and the insert commit together.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        report_id: &str,
        account_id: &str,
    ) -> AppResult<(assignment::Model, bool)> {
        let first = self
            .assignment_repo
            .count_for_report(conn, report_id)
            .await?
            == 0;

        let now = Utc::now();
        let model = assignment::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report_id.to_string()),
            account_id: Set(account_id.to_string()),
            action_taken: Set(String::new()),
            additional_feedback: Set(String::new()),
            assigned_at: Set(now),
            updated_at: Set(now),
        };

        let created = self.assignment_repo.insert(conn, model).await?;
        Ok((created, first))
    }

    /// Get an assignment by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<assignment::Model> {
        self.assignment_repo.get_by_id(id).await
    }

    /// Record an assignee's progress.
    ///
    /// Overwrites both texts and always bumps `updated_at`, even when the
    /// content is unchanged, so repeated submissions stay harmless while
    /// still registering activity.
    pub async fn record_progress(
        &self,
        assignment_id: &str,
        action_taken: String,
        additional_feedback: String,
    ) -> AppResult<assignment::Model> {
        let assignment = self.assignment_repo.get_by_id(assignment_id).await?;

        let mut model: assignment::ActiveModel = assignment.into();
        model.action_taken = Set(action_taken);
        model.additional_feedback = Set(additional_feedback);
        model.updated_at = Set(Utc::now());

        let updated = self.assignment_repo.update(model).await?;
        info!(assignment_id = %assignment_id, "Assignment progress recorded");
        Ok(updated)
    }

    /// Apply progress updates to several assignments, best effort.
    ///
    /// Items are processed sequentially and independently; one failing item
    /// never aborts the rest, and there is deliberately no transaction
    /// spanning the batch.
    pub async fn bulk_update(&self, updates: Vec<BulkProgressUpdate>) -> BulkUpdateOutcome {
        let mut outcome = BulkUpdateOutcome::default();

        for update in updates {
            match self
                .record_progress(
                    &update.assignment_id,
                    update.action_taken,
                    update.additional_feedback,
                )
                .await
            {
                Ok(_) => outcome.updated += 1,
                Err(error) => {
                    warn!(
                        assignment_id = %update.assignment_id,
                        error = %error,
                        "Bulk progress update item failed"
                    );
                    outcome.failures.push(BulkUpdateFailure {
                        assignment_id: update.assignment_id,
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// List a report's assignments, oldest first (merged-view order).
    pub async fn list_chronological(&self, report_id: &str) -> AppResult<Vec<assignment::Model>> {
        self.assignment_repo.list_by_report(report_id).await
    }

    /// List a report's assignments, newest first.
    pub async fn list_by_report(
        &self,
        report_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<assignment::Model>> {
        self.assignment_repo
            .list_recent_by_report(report_id, limit, offset)
            .await
    }

    /// List a staff member's assignments, newest first.
    pub async fn list_by_account(
        &self,
        account_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<assignment::Model>> {
        self.assignment_repo
            .list_by_account(account_id, limit, offset)
            .await
    }

    /// Remove an assignment (administrative override).
    ///
    /// Assignments are part of the audit trail of an active report, so
    /// removal is only allowed once the owning report is terminal.
    pub async fn remove(&self, assignment_id: &str) -> AppResult<()> {
        let assignment = self.assignment_repo.get_by_id(assignment_id).await?;
        let report = self.report_repo.get_by_id(&assignment.report_id).await?;

        if !report.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Report {} is {:?}; assignments can only be removed from terminal reports",
                report.id, report.status
            )));
        }

        self.assignment_repo.delete(assignment_id).await?;
        info!(assignment_id = %assignment_id, "Assignment removed");
        Ok(())
    }
}
