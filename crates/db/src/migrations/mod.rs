//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250901_000001_create_account_table;
mod m20250901_000002_create_report_table;
mod m20250901_000003_create_crime_report_table;
mod m20250901_000004_create_facility_report_table;
mod m20250901_000005_create_assignment_table;
mod m20250901_000006_create_resolution_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_account_table::Migration),
            Box::new(m20250901_000002_create_report_table::Migration),
            Box::new(m20250901_000003_create_crime_report_table::Migration),
            Box::new(m20250901_000004_create_facility_report_table::Migration),
            Box::new(m20250901_000005_create_assignment_table::Migration),
            Box::new(m20250901_000006_create_resolution_table::Migration),
        ]
    }
}
