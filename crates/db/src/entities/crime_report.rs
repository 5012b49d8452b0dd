//! Crime report extension entity.
//!
//! 1:1 with a [`super::report`] row where `report_type = crime`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category of the reported crime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum CrimeCategory {
    #[sea_orm(string_value = "theft")]
    Theft,
    #[sea_orm(string_value = "assault")]
    Assault,
    #[sea_orm(string_value = "vandalism")]
    Vandalism,
    #[sea_orm(string_value = "harassment")]
    Harassment,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Crime report extension model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "crime_report")]
pub struct Model {
    /// Owning report ID (primary key, 1:1).
    #[sea_orm(primary_key, auto_increment = false)]
    pub report_id: String,

    /// Category of the crime (required).
    pub crime_category: CrimeCategory,

    /// Description of the suspect, if any.
    #[sea_orm(column_type = "Text", nullable)]
    pub suspect_description: Option<String>,

    /// Whether a victim was involved.
    pub victim_involved: bool,

    /// Notes about the victim.
    #[sea_orm(column_type = "Text", nullable)]
    pub victim_notes: Option<String>,

    /// Severity of any injuries.
    #[sea_orm(nullable)]
    pub injury_level: Option<String>,

    /// Whether a weapon was involved.
    pub weapon_involved: bool,

    /// Notes about the weapon.
    #[sea_orm(column_type = "Text", nullable)]
    pub weapon_notes: Option<String>,

    /// Details about available evidence.
    #[sea_orm(column_type = "Text", nullable)]
    pub evidence_details: Option<String>,
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
