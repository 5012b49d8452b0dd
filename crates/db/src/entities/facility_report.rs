//! Facility report extension entity.
//!
//! 1:1 with a [`super::report`] row where `report_type = facility`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of facility affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum FacilityType {
    #[sea_orm(string_value = "electrical")]
    Electrical,
    #[sea_orm(string_value = "plumbing")]
    Plumbing,
    #[sea_orm(string_value = "hvac")]
    Hvac,
    #[sea_orm(string_value = "structural")]
    Structural,
    #[sea_orm(string_value = "furniture")]
    Furniture,
    #[sea_orm(string_value = "infrastructure")]
    Infrastructure,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Urgency of the maintenance issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum UrgencyLevel {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "critical")]
    Critical,
}

/// Facility report extension model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facility_report")]
pub struct Model {
    /// Owning report ID (primary key, 1:1).
    #[sea_orm(primary_key, auto_increment = false)]
    pub report_id: String,

    /// Kind of facility affected (required).
    pub facility_type: FacilityType,

    /// Asset tag of the affected equipment.
    #[sea_orm(nullable)]
    pub asset_tag: Option<String>,

    /// Estimated repair cost, non-negative.
    #[sea_orm(nullable)]
    pub estimated_cost: Option<f64>,

    /// Urgency of the issue.
    #[sea_orm(nullable)]
    pub urgency_level: Option<UrgencyLevel>,

    /// Whether maintenance work is required.
    pub maintenance_required: bool,

    /// Notes for the maintenance crew.
    #[sea_orm(column_type = "Text", nullable)]
    pub maintenance_notes: Option<String>,
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
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
