//! Report store service.
//!
//! Owns the polymorphic report entity: creation with its type-specific
//! extension, the PENDING-only mutation window, status transitions through
//! the lifecycle state machine, the deletion guard, and read projections.

use std::sync::Arc;

use campuswatch_common::{AppError, AppResult, IdGenerator};
use campuswatch_db::entities::{
    crime_report::{self, CrimeCategory},
    facility_report::{self, FacilityType, UrgencyLevel},
    report::{self, ReportStatus, ReportType},
};
use campuswatch_db::repositories::{
    AccountRepository, ExtensionActiveModel, ReportExtension, ReportFilter, ReportRepository,
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set};
use tracing::info;
use validator::Validate;

use crate::lifecycle;

/// Type-specific details supplied at submission.
///
/// The tagged enum makes the exclusivity invariant structural: a report can
/// only ever be created with exactly one extension, and the required
/// category/type field cannot be absent.
#[derive(Debug, Clone)]
pub enum ExtensionInput {
    /// A crime report.
    Crime(CrimeDetails),
    /// A facility-maintenance report.
    Facility(FacilityDetails),
}

impl ExtensionInput {
    /// The report type this input produces.
    #[must_use]
    pub const fn report_type(&self) -> ReportType {
        match self {
            Self::Crime(_) => ReportType::Crime,
            Self::Facility(_) => ReportType::Facility,
        }
    }
}

/// Crime-specific submission details.
#[derive(Debug, Clone)]
pub struct CrimeDetails {
    /// Category of the crime (required).
    pub crime_category: CrimeCategory,
    /// Description of the suspect, if any.
    pub suspect_description: Option<String>,
    /// Whether a victim was involved.
    pub victim_involved: bool,
    /// Notes about the victim.
    pub victim_notes: Option<String>,
    /// Severity of any injuries.
    pub injury_level: Option<String>,
    /// Whether a weapon was involved.
    pub weapon_involved: bool,
    /// Notes about the weapon.
    pub weapon_notes: Option<String>,
    /// Details about available evidence.
    pub evidence_details: Option<String>,
}

/// Facility-specific submission details.
#[derive(Debug, Clone, Validate)]
pub struct FacilityDetails {
    /// Kind of facility affected (required).
    pub facility_type: FacilityType,
    /// Asset tag of the affected equipment.
    pub asset_tag: Option<String>,
    /// Estimated repair cost, non-negative.
    #[validate(range(min = 0.0, message = "estimated cost must be non-negative"))]
    pub estimated_cost: Option<f64>,
    /// Urgency of the issue.
    pub urgency_level: Option<UrgencyLevel>,
    /// Whether maintenance work is required.
    pub maintenance_required: bool,
    /// Notes for the maintenance crew.
    pub maintenance_notes: Option<String>,
}

/// Input for submitting a new report.
#[derive(Debug, Clone, Validate)]
pub struct SubmitReportInput {
    /// Account submitting the report.
    pub submitted_by: String,
    /// Short title.
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    /// Full description of the incident.
    #[validate(length(min = 1, max = 10_000))]
    pub description: String,
    /// Where the incident happened.
    #[validate(length(min = 1, max = 256))]
    pub location: String,
    /// Ordered opaque attachment paths.
    pub attachments: Vec<String>,
    /// Type-specific details.
    pub extension: ExtensionInput,
}

/// Partial update of a report's editable fields.
///
/// Only title/description/location/attachments; status and type are never
/// touched through this path.
#[derive(Debug, Clone, Default)]
pub struct UpdateReportFields {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// Replacement attachment list.
    pub attachments: Option<Vec<String>>,
}

impl UpdateReportFields {
    /// Whether the update carries no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.attachments.is_none()
    }
}

/// Service for the report store.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
    report_repo: ReportRepository,
    account_repo: AccountRepository,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        report_repo: ReportRepository,
        account_repo: AccountRepository,
    ) -> Self {
        Self {
            db,
            report_repo,
            account_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new report.
    ///
    /// The base row and the extension row are inserted in one transaction;
    /// the report starts in `Pending`.
    pub async fn submit(&self, input: SubmitReportInput) -> AppResult<report::Model> {
        input.validate()?;
        require_non_blank("title", &input.title)?;
        require_non_blank("description", &input.description)?;
        require_non_blank("location", &input.location)?;

        // Submitter must resolve in the account directory.
        self.account_repo.get_by_id(&input.submitted_by).await?;

        let id = self.id_gen.generate();
        let now = Utc::now();
        let report_type = input.extension.report_type();

        let attachments = serde_json::to_value(&input.attachments)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let report = report::ActiveModel {
            id: Set(id.clone()),
            submitted_by: Set(input.submitted_by),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            location: Set(input.location.trim().to_string()),
            status: Set(ReportStatus::Pending),
            report_type: Set(report_type),
            attachments: Set(attachments),
            submitted_at: Set(now),
            updated_at: Set(now),
        };

        let extension = match input.extension {
            ExtensionInput::Crime(details) => ExtensionActiveModel::Crime(crime_report::ActiveModel {
                report_id: Set(id.clone()),
                crime_category: Set(details.crime_category),
                suspect_description: Set(details.suspect_description),
                victim_involved: Set(details.victim_involved),
                victim_notes: Set(details.victim_notes),
                injury_level: Set(details.injury_level),
                weapon_involved: Set(details.weapon_involved),
                weapon_notes: Set(details.weapon_notes),
                evidence_details: Set(details.evidence_details),
            }),
            ExtensionInput::Facility(details) => {
                details.validate()?;
                ExtensionActiveModel::Facility(facility_report::ActiveModel {
                    report_id: Set(id.clone()),
                    facility_type: Set(details.facility_type),
                    asset_tag: Set(details.asset_tag),
                    estimated_cost: Set(details.estimated_cost),
                    urgency_level: Set(details.urgency_level),
                    maintenance_required: Set(details.maintenance_required),
                    maintenance_notes: Set(details.maintenance_notes),
                })
            }
        };

        let created = self.report_repo.create(report, extension).await?;
        info!(report_id = %created.id, report_type = ?report_type, "Report submitted");
        Ok(created)
    }

    /// Get a report by ID.
    pub async fn get_model(&self, id: &str) -> AppResult<report::Model> {
        self.report_repo.get_by_id(id).await
    }

    /// Get a report together with its extension.
    pub async fn get_with_extension(
        &self,
        id: &str,
    ) -> AppResult<(report::Model, ReportExtension)> {
        let report = self.report_repo.get_by_id(id).await?;
        let extension = self.report_repo.get_extension(&report).await?;
        Ok((report, extension))
    }

    /// Update a report's editable fields.
    ///
    /// The mutation window closes once triage begins: only `Pending`
    /// reports can be edited.
    pub async fn update_fields(
        &self,
        id: &str,
        fields: UpdateReportFields,
    ) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(id).await?;

        if report.status != ReportStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Report {id} is {:?}; only pending reports can be edited",
                report.status
            )));
        }

        if fields.is_empty() {
            return Ok(report);
        }

        let mut model: report::ActiveModel = report.into();
        if let Some(title) = fields.title {
            require_non_blank("title", &title)?;
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = fields.description {
            require_non_blank("description", &description)?;
            model.description = Set(description.trim().to_string());
        }
        if let Some(location) = fields.location {
            require_non_blank("location", &location)?;
            model.location = Set(location.trim().to_string());
        }
        if let Some(attachments) = fields.attachments {
            let value = serde_json::to_value(&attachments)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            model.attachments = Set(value);
        }
        model.updated_at = Set(Utc::now());

        self.report_repo.update(model).await
    }

    /// Move a report to a new status through the state machine.
    pub async fn transition_status(
        &self,
        id: &str,
        target: ReportStatus,
    ) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(id).await?;
        self.transition_in(self.db.as_ref(), &report, target)
            .await?;
        info!(report_id = %id, from = ?report.status, to = ?target, "Report status changed");
        self.report_repo.get_by_id(id).await
    }

    /// Move a report to a new status on the given connection.
    ///
    /// `report` carries the observed status; the conditional update fails
    /// with [`AppError::Conflict`] when another request moved the report
    /// first.
    pub async fn transition_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        report: &report::Model,
        target: ReportStatus,
    ) -> AppResult<()> {
        lifecycle::transition(report.status, target)?;

        let won = self
            .report_repo
            .update_status_checked(conn, &report.id, report.status, target, Utc::now())
            .await?;

        if won {
            Ok(())
        } else {
            Err(AppError::Conflict(format!(
                "Report {} was moved concurrently; observed status {:?} is stale",
                report.id, report.status
            )))
        }
    }

    /// Force a report to `InProgress` on first assignment.
    ///
    /// The first-assignment rule deliberately skips the intermediate
    /// `UnderReview` step: assigning staff to a `Pending` or `UnderReview`
    /// report takes it straight to `InProgress`. No other status may be
    /// pulled into progress this way; in particular a `Resolved` report can
    /// only ever move to `Closed`.
    pub async fn force_in_progress_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        report: &report::Model,
    ) -> AppResult<()> {
        match report.status {
            ReportStatus::InProgress => return Ok(()),
            ReportStatus::Pending | ReportStatus::UnderReview => {}
            ReportStatus::Resolved | ReportStatus::Rejected | ReportStatus::Closed => {
                return Err(AppError::InvalidState(format!(
                    "Report {} is {:?} and cannot be pulled into progress",
                    report.id, report.status
                )));
            }
        }

        let won = self
            .report_repo
            .update_status_checked(
                conn,
                &report.id,
                report.status,
                ReportStatus::InProgress,
                Utc::now(),
            )
            .await?;

        if won {
            Ok(())
        } else {
            Err(AppError::Conflict(format!(
                "Report {} was moved concurrently; observed status {:?} is stale",
                report.id, report.status
            )))
        }
    }

    /// Delete a report.
    ///
    /// Permitted only before triage begins (`Pending`) or after outright
    /// rejection (`Rejected`); everything a report owns goes with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let report = self.report_repo.get_by_id(id).await?;

        if !matches!(
            report.status,
            ReportStatus::Pending | ReportStatus::Rejected
        ) {
            return Err(AppError::InvalidState(format!(
                "Report {id} is {:?}; only pending or rejected reports can be deleted",
                report.status
            )));
        }

        self.report_repo.delete(id).await?;
        info!(report_id = %id, "Report deleted");
        Ok(())
    }

    /// Search reports matching a filter, newest first.
    pub async fn search(
        &self,
        filter: &ReportFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo.search(filter, limit, offset).await
    }

    /// Count reports matching a filter.
    pub async fn count(&self, filter: &ReportFilter) -> AppResult<u64> {
        self.report_repo.count(filter).await
    }
}

fn require_non_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}
