//! Assignment entity.
//!
//! A staff member's association with a report, carrying their progress notes.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assignment model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignment")]
pub struct Model {
    /// Unique assignment ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning report.
    pub report_id: String,

    /// Assigned staff account.
    pub account_id: String,

    /// What the assignee has done so far. Empty at creation.
    #[sea_orm(column_type = "Text")]
    pub action_taken: String,

    /// Additional free-form notes. Empty at creation.
    #[sea_orm(column_type = "Text")]
    pub additional_feedback: String,

    /// When the staff member was assigned.
    pub assigned_at: DateTime<Utc>,

    /// Bumped whenever action/feedback change.
    pub updated_at: DateTime<Utc>,
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
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Assignee,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
