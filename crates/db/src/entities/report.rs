//! Report entity.
//!
//! The polymorphic base record for both crime and facility reports. The
//! `report_type` discriminator determines which 1:1 extension row exists
//! ([`super::crime_report`] or [`super::facility_report`]); exactly one of
//! the two is created with the report and cascade-deleted with it.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a report.
///
/// Legal transitions are defined by the state machine in the core crate;
/// nothing in the db layer enforces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Discriminator for the type-specific extension, immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ReportType {
    #[sea_orm(string_value = "crime")]
    Crime,
    #[sea_orm(string_value = "facility")]
    Facility,
}

/// Report model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    /// Unique report ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Account that submitted the report.
    pub submitted_by: String,

    /// Short title.
    pub title: String,

    /// Full description of the incident.
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Where the incident happened.
    pub location: String,

    /// Current lifecycle status.
    pub status: ReportStatus,

    /// Which extension record exists for this report.
    pub report_type: ReportType,

    /// Ordered list of opaque attachment paths (JSON array of strings).
    #[sea_orm(column_type = "JsonBinary")]
    pub attachments: Json,

    /// When the report was submitted.
    pub submitted_at: DateTime<Utc>,

    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::SubmittedBy",
        to = "super::account::Column::Id"
    )]
    Submitter,
    #[sea_orm(has_one = "super::crime_report::Entity")]
    CrimeReport,
    #[sea_orm(has_one = "super::facility_report::Entity")]
    FacilityReport,
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,
    #[sea_orm(has_one = "super::resolution::Entity")]
    Resolution,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submitter.def()
    }
}

impl Related<super::crime_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrimeReport.def()
    }
}

impl Related<super::facility_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FacilityReport.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::resolution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resolution.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ReportStatus {
    /// Whether the report has reached a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Closed)
    }
}
