//! Create crime report extension table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CrimeReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CrimeReport::ReportId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CrimeReport::CrimeCategory)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CrimeReport::SuspectDescription).text())
                    .col(
                        ColumnDef::new(CrimeReport::VictimInvolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CrimeReport::VictimNotes).text())
                    .col(ColumnDef::new(CrimeReport::InjuryLevel).string_len(64))
                    .col(
                        ColumnDef::new(CrimeReport::WeaponInvolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CrimeReport::WeaponNotes).text())
                    .col(ColumnDef::new(CrimeReport::EvidenceDetails).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crime_report_report")
                            .from(CrimeReport::Table, CrimeReport::ReportId)
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
            .drop_table(Table::drop().table(CrimeReport::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CrimeReport {
    Table,
    ReportId,
    CrimeCategory,
    SuspectDescription,
    VictimInvolved,
    VictimNotes,
    InjuryLevel,
    WeaponInvolved,
    WeaponNotes,
    EvidenceDetails,
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
}
