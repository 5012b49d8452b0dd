//! Create facility report extension table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FacilityReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FacilityReport::ReportId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FacilityReport::FacilityType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FacilityReport::AssetTag).string_len(128))
                    .col(ColumnDef::new(FacilityReport::EstimatedCost).double())
                    .col(ColumnDef::new(FacilityReport::UrgencyLevel).string_len(32))
                    .col(
                        ColumnDef::new(FacilityReport::MaintenanceRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(FacilityReport::MaintenanceNotes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_facility_report_report")
                            .from(FacilityReport::Table, FacilityReport::ReportId)
                            .to(Report::Table, Report::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FacilityReport::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FacilityReport {
    Table,
    ReportId,
    FacilityType,
    AssetTag,
    EstimatedCost,
    UrgencyLevel,
    MaintenanceRequired,
    MaintenanceNotes,
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
}
