//! Resolution finalizer service.
//!
//! Records the terminal outcome of a report. The status move to `Resolved`
//! is driven by the workflow facade so the state machine stays the single
//! source of truth.

use campuswatch_common::{AppError, AppResult, IdGenerator};
use campuswatch_db::entities::resolution::{self, ResolutionType};
use campuswatch_db::repositories::ResolutionRepository;
use chrono::Utc;
use sea_orm::{ConnectionTrait, Set};

/// Input for resolving a report.
#[derive(Debug, Clone)]
pub struct ResolveReportInput {
    /// Report being resolved.
    pub report_id: String,
    /// Staff account resolving it.
    pub resolved_by: String,
    /// Outcome classification; metadata only, the report status always
    /// moves to `Resolved`.
    pub resolution_type: ResolutionType,
    /// Required narrative describing the outcome.
    pub summary: String,
    /// Opaque path to supporting evidence, if any.
    pub evidence_path: Option<String>,
}

/// Service for the resolution finalizer.
#[derive(Clone)]
pub struct ResolutionService {
    resolution_repo: ResolutionRepository,
    id_gen: IdGenerator,
}

impl ResolutionService {
    /// Create a new resolution service.
    #[must_use]
    pub const fn new(resolution_repo: ResolutionRepository) -> Self {
        Self {
            resolution_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Insert the resolution row on the given connection.
    ///
    /// The unique index on `report_id` makes a second resolution fail with
    /// [`AppError::Conflict`] even when two resolves race.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: ResolveReportInput,
    ) -> AppResult<resolution::Model> {
        let summary = input.summary.trim();
        if summary.is_empty() {
            return Err(AppError::Validation(
                "Resolution summary must not be blank".to_string(),
            ));
        }

        let model = resolution::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(input.report_id),
            resolved_by: Set(input.resolved_by),
            resolution_type: Set(input.resolution_type),
            resolution_summary: Set(summary.to_string()),
            evidence_path: Set(input.evidence_path),
            resolved_at: Set(Utc::now()),
        };

        self.resolution_repo.insert(conn, model).await
    }

    /// Find the resolution for a report, if any.
    pub async fn find_by_report(&self, report_id: &str) -> AppResult<Option<resolution::Model>> {
        self.resolution_repo.find_by_report(report_id).await
    }

    /// Get the resolution for a report, failing if there is none.
    pub async fn get_by_report(&self, report_id: &str) -> AppResult<resolution::Model> {
        self.resolution_repo.get_by_report(report_id).await
    }
}
