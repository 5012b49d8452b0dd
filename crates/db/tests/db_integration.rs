//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Setup test database:
//!   docker-compose -f docker-compose.test.yml up -d test-db
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `campuswatch_test`)
//!   `TEST_DB_PASSWORD` (default: `campuswatch_test`)
//!   `TEST_DB_NAME` (default: `campuswatch_test`)

#![allow(clippy::unwrap_used)]

use campuswatch_db::entities::{
    account::{self, AccountRole},
    facility_report::{self, FacilityType},
    report::{self, ReportStatus, ReportType},
    resolution::{self, ResolutionType},
};
use campuswatch_db::repositories::{ExtensionActiveModel, ReportRepository, ResolutionRepository};
use campuswatch_db::test_utils::{TestDatabase, TestDbConfig};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use sea_orm_migration::MigratorTrait;

async fn seed_account(db: &TestDatabase, id: &str) {
    account::ActiveModel {
        id: Set(id.to_string()),
        username: Set(format!("user-{id}")),
        display_name: Set("Integration".to_string()),
        email: Set(None),
        role: Set(AccountRole::Staff),
        created_at: Set(Utc::now()),
    }
    .insert(db.connection())
    .await
    .unwrap();
}

fn facility_report_models(
    id: &str,
    submitter: &str,
) -> (report::ActiveModel, ExtensionActiveModel) {
    let now = Utc::now();
    let base = report::ActiveModel {
        id: Set(id.to_string()),
        submitted_by: Set(submitter.to_string()),
        title: Set("Leaking pipe".to_string()),
        description: Set("Water on the floor".to_string()),
        location: Set("Dorm B".to_string()),
        status: Set(ReportStatus::Pending),
        report_type: Set(ReportType::Facility),
        attachments: Set(serde_json::json!([])),
        submitted_at: Set(now),
        updated_at: Set(now),
    };
    let extension = ExtensionActiveModel::Facility(facility_report::ActiveModel {
        report_id: Set(id.to_string()),
        facility_type: Set(FacilityType::Plumbing),
        asset_tag: Set(None),
        estimated_cost: Set(Some(120.0)),
        urgency_level: Set(None),
        maintenance_required: Set(true),
        maintenance_notes: Set(None),
    });
    (base, extension)
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply_cleanly() {
    let db = TestDatabase::create_unique().await.unwrap();
    let result = campuswatch_db::migrations::Migrator::up(db.connection(), None).await;
    assert!(result.is_ok(), "Migrations failed: {:?}", result.err());
    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_report_create_and_cascade_delete() {
    let db = TestDatabase::create_unique().await.unwrap();
    campuswatch_db::migrations::Migrator::up(db.connection(), None)
        .await
        .unwrap();
    seed_account(&db, "acc1").await;

    let conn = db.shared_connection();
    let repo = ReportRepository::new(conn);

    let (base, extension) = facility_report_models("r1", "acc1");
    let created = repo.create(base, extension).await.unwrap();
    assert_eq!(created.status, ReportStatus::Pending);

    let loaded = repo.get_by_id("r1").await.unwrap();
    let loaded_extension = repo.get_extension(&loaded).await.unwrap();
    assert_eq!(loaded_extension.report_type(), ReportType::Facility);

    // Deleting the base row takes the extension with it.
    repo.delete("r1").await.unwrap();
    assert!(repo.find_by_id("r1").await.unwrap().is_none());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_resolution_unique_index_rejects_second_row() {
    let db = TestDatabase::create_unique().await.unwrap();
    campuswatch_db::migrations::Migrator::up(db.connection(), None)
        .await
        .unwrap();
    seed_account(&db, "staff1").await;

    let conn = db.shared_connection();
    let reports = ReportRepository::new(conn.clone());
    let resolutions = ResolutionRepository::new(conn.clone());

    let (base, extension) = facility_report_models("r1", "staff1");
    reports.create(base, extension).await.unwrap();

    let resolution = |id: &str| resolution::ActiveModel {
        id: Set(id.to_string()),
        report_id: Set("r1".to_string()),
        resolved_by: Set("staff1".to_string()),
        resolution_type: Set(ResolutionType::Resolved),
        resolution_summary: Set("Fixed".to_string()),
        evidence_path: Set(None),
        resolved_at: Set(Utc::now()),
    };

    resolutions
        .insert(conn.as_ref(), resolution("res1"))
        .await
        .unwrap();
    let err = resolutions
        .insert(conn.as_ref(), resolution("res2"))
        .await
        .unwrap_err();
    assert!(matches!(err, campuswatch_common::AppError::Conflict(_)));

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
