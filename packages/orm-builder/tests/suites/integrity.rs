use std::collections::BTreeMap;

use builder_test_support::mock_client::{handle_with, version_db};
use orm_builder::BuilderError;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Statement, Transaction, Value};

#[tokio::test]
async fn version_below_minimum_is_rejected() {
    let handle = handle_with(
        r#"{"client": "postgres", "version": "5.0.0"}"#,
        version_db(DatabaseBackend::Postgres, "4.9.0"),
    )
    .await;

    let err = handle.inspect_integrity().await.unwrap_err();
    match err {
        BuilderError::VersionTooLow {
            dialect,
            required,
            current,
        } => {
            assert_eq!(dialect, "postgresql");
            assert_eq!(required, "5.0.0");
            assert_eq!(current, "4.9.0");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn version_at_minimum_passes() {
    let handle = handle_with(
        r#"{"client": "postgres", "version": "5.0.0"}"#,
        version_db(DatabaseBackend::Postgres, "5.0.0"),
    )
    .await;

    assert!(handle.inspect_integrity().await.unwrap());
}

#[tokio::test]
async fn version_above_minimum_passes_with_vendor_suffix() {
    let handle = handle_with(
        r#"{"client": "mysql", "version": "5.0.0"}"#,
        version_db(DatabaseBackend::MySql, "8.0.33-0ubuntu0.22.04.2"),
    )
    .await;

    assert!(handle.inspect_integrity().await.unwrap());
}

#[tokio::test]
async fn postgres_issues_show_server_version() {
    let handle = handle_with(
        r#"{"client": "pg", "version": "9.6.0"}"#,
        version_db(DatabaseBackend::Postgres, "16.2 (Debian 16.2-1.pgdg120+2)"),
    )
    .await;

    assert!(handle.inspect_integrity().await.unwrap());
    assert_eq!(
        handle.into_connection().into_transaction_log(),
        vec![Transaction::one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SHOW server_version;"
        ))]
    );
}

#[tokio::test]
async fn mariadb_issues_select_version() {
    let handle = handle_with(
        r#"{"dialect": "mariadb", "version": "10.3.0"}"#,
        version_db(DatabaseBackend::MySql, "10.11.2-MariaDB-1:10.11.2+maria~ubu2204"),
    )
    .await;

    assert!(handle.inspect_integrity().await.unwrap());
    assert_eq!(
        handle.into_connection().into_transaction_log(),
        vec![Transaction::one(Statement::from_string(
            DatabaseBackend::MySql,
            "SELECT VERSION() as server_version;"
        ))]
    );
}

#[tokio::test]
async fn unsupported_dialect_fails_without_querying() {
    let handle = handle_with(
        r#"{"client": "sqlite3", "version": "3.0.0"}"#,
        MockDatabase::new(DatabaseBackend::Sqlite).into_connection(),
    )
    .await;

    let err = handle.inspect_integrity().await.unwrap_err();
    assert!(matches!(
        err,
        BuilderError::UnsupportedDialect { ref dialect } if dialect == "sqlite3"
    ));
    assert!(handle.into_connection().into_transaction_log().is_empty());
}

#[tokio::test]
async fn missing_minimum_skips_comparison() {
    let handle = handle_with(
        r#"{"client": "postgres"}"#,
        version_db(DatabaseBackend::Postgres, "not-a-version"),
    )
    .await;

    assert!(handle.inspect_integrity().await.unwrap());
}

#[tokio::test]
async fn invalid_minimum_skips_comparison() {
    let handle = handle_with(
        r#"{"client": "postgres", "version": "latest"}"#,
        version_db(DatabaseBackend::Postgres, "1.0.0"),
    )
    .await;

    assert!(handle.inspect_integrity().await.unwrap());
}

#[tokio::test]
async fn missing_version_field_is_reported() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![BTreeMap::from([(
            "version",
            Value::from("15.4".to_string()),
        )])]])
        .into_connection();
    let handle = handle_with(r#"{"client": "postgres", "version": "9.6.0"}"#, conn).await;

    let err = handle.inspect_integrity().await.unwrap_err();
    assert!(matches!(err, BuilderError::ServerVersion { .. }));
}

#[tokio::test]
async fn connection_failures_pass_through() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection timed out".to_string())])
        .into_connection();
    let handle = handle_with(r#"{"client": "postgres", "version": "9.6.0"}"#, conn).await;

    let err = handle.inspect_integrity().await.unwrap_err();
    match err {
        BuilderError::Db(e) => assert!(e.to_string().contains("connection timed out")),
        other => panic!("unexpected error: {other:?}"),
    }
}
