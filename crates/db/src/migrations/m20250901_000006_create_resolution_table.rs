//! Create resolution table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resolution::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resolution::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Resolution::ReportId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Resolution::ResolvedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Resolution::ResolutionType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Resolution::ResolutionSummary)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Resolution::EvidencePath).string_len(1024))
                    .col(
                        ColumnDef::new(Resolution::ResolvedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resolution_report")
                            .from(Resolution::Table, Resolution::ReportId)
                            .to(Report::Table, Report::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resolution_resolver")
                            .from(Resolution::Table, Resolution::ResolvedBy)
                            .to(Account::Table, Account::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: report_id - at most one resolution per report.
        // Two concurrent resolves race on this index; exactly one wins.
        manager
            .create_index(
                Index::create()
                    .name("idx_resolution_report_id")
                    .table(Resolution::Table)
                    .col(Resolution::ReportId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Resolution::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Resolution {
    Table,
    Id,
    ReportId,
    ResolvedBy,
    ResolutionType,
    ResolutionSummary,
    EvidencePath,
    ResolvedAt,
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}
