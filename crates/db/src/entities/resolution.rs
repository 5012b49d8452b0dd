//! Resolution entity.
//!
//! The terminal outcome record closing out a report's active handling.
//! `report_id` carries a unique index: at most one resolution per report,
//! enforced by the database rather than application-level locking.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome classification of a resolution.
///
/// Metadata on the outcome only; the owning report's status always moves to
/// `resolved` regardless of the value here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ResolutionType {
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "escalated")]
    Escalated,
    #[sea_orm(string_value = "dismissed")]
    Dismissed,
    #[sea_orm(string_value = "transferred")]
    Transferred,
}

/// Resolution model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resolution")]
pub struct Model {
    /// Unique resolution ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning report, unique.
    #[sea_orm(unique)]
    pub report_id: String,

    /// Staff account that resolved the report.
    pub resolved_by: String,

    /// Outcome classification.
    pub resolution_type: ResolutionType,

    /// Required narrative describing the outcome.
    #[sea_orm(column_type = "Text")]
    pub resolution_summary: String,

    /// Opaque path to supporting evidence, if any.
    #[sea_orm(nullable)]
    pub evidence_path: Option<String>,

    /// When the report was resolved. Immutable.
    pub resolved_at: DateTime<Utc>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ReportId",
        to = "super::report::Column::Id"
    )]
    Report,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::ResolvedBy",
        to = "super::account::Column::Id"
    )]
    Resolver,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resolver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
