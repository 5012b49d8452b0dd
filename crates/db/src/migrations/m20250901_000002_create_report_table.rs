//! Create report table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Report::SubmittedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Report::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Report::Description).text().not_null())
                    .col(ColumnDef::new(Report::Location).string_len(256).not_null())
                    .col(ColumnDef::new(Report::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Report::ReportType).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Report::Attachments)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Report::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Report::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_submitter")
                            .from(Report::Table, Report::SubmittedBy)
                            .to(Account::Table, Account::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (triage queues filter on it)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_status")
                    .table(Report::Table)
                    .col(Report::Status)
                    .to_owned(),
            )
            .await?;

        // Index: report_type
        manager
            .create_index(
                Index::create()
                    .name("idx_report_type")
                    .table(Report::Table)
                    .col(Report::ReportType)
                    .to_owned(),
            )
            .await?;

        // Index: submitted_by (for "my reports" listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_submitted_by")
                    .table(Report::Table)
                    .col(Report::SubmittedBy)
                    .to_owned(),
            )
            .await?;

        // Index: submitted_at (for date-range queries and pagination)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_submitted_at")
                    .table(Report::Table)
                    .col(Report::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
    SubmittedBy,
    Title,
    Description,
    Location,
    Status,
    ReportType,
    Attachments,
    SubmittedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}
