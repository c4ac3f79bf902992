use std::env;

use orm_builder::config::{reconcile, BuilderEnv, RawOptions, SQL_DEBUG_VAR};
use orm_builder::{build, BuilderError, Dialect};
use serial_test::serial;

fn debug_for(value: Option<&str>) -> bool {
    match value {
        Some(v) => env::set_var(SQL_DEBUG_VAR, v),
        None => env::remove_var(SQL_DEBUG_VAR),
    }
    let env = BuilderEnv::from_process();
    env::remove_var(SQL_DEBUG_VAR);

    reconcile(RawOptions::default(), env.debug_default())
        .expect("reconcile")
        .debug
}

#[test]
#[serial]
fn sql_debug_truthy_values_enable_debug() {
    assert!(debug_for(Some("1")));
    assert!(debug_for(Some("true")));
}

#[test]
#[serial]
fn sql_debug_falsy_values_disable_debug() {
    assert!(!debug_for(Some("0")));
    assert!(!debug_for(Some("false")));
}

#[test]
#[serial]
fn sql_debug_garbage_or_unset_disables_debug() {
    assert!(!debug_for(Some("banana")));
    assert!(!debug_for(Some("")));
    assert!(!debug_for(None));
}

#[test]
#[serial]
fn environment_is_read_per_invocation() {
    env::set_var(SQL_DEBUG_VAR, "true");
    assert!(BuilderEnv::from_process().debug_default());

    env::set_var(SQL_DEBUG_VAR, "false");
    assert!(!BuilderEnv::from_process().debug_default());

    env::remove_var(SQL_DEBUG_VAR);
}

#[test]
fn distinct_database_spellings_conflict() {
    let raw = RawOptions::from_json_str(
        r#"{"connection": {"database": "orders", "db": "billing"}, "client": "pg"}"#,
    )
    .unwrap();

    let err = reconcile(raw, false).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Both 'connection.database' option and 'connection.db' alias can NOT be set."
    );
}

#[test]
fn alias_keys_never_reach_canonical_tree() {
    let raw = RawOptions::from_json_str(
        r#"{"connection": {"db": "orders", "username": "svc"}, "dialect": "mysql"}"#,
    )
    .unwrap();

    let canonical = serde_json::to_value(reconcile(raw, false).unwrap()).unwrap();
    let connection = canonical["connection"].as_object().unwrap();
    assert_eq!(connection["database"], "orders");
    assert_eq!(connection["user"], "svc");
    assert!(!connection.contains_key("db"));
    assert!(!connection.contains_key("username"));
    assert_eq!(canonical["client"], "mysql");
    assert!(canonical.get("dialect").is_none());
}

#[tokio::test]
async fn build_uses_injected_environment() {
    let raw = RawOptions::from_json_str(r#"{"client": "sqlite3", "pool": {"max": 1}}"#).unwrap();

    let handle = build(raw, &BuilderEnv::with_sql_debug("1")).await.unwrap();
    assert!(handle.options().debug);
    assert_eq!(handle.dialect(), Dialect::Sqlite);
}

#[tokio::test]
async fn build_surfaces_conflicts_before_construction() {
    let raw = RawOptions::from_json_str(r#"{"client": "pg", "dialect": "mysql"}"#).unwrap();

    let err = build(raw, &BuilderEnv::default()).await.unwrap_err();
    assert!(matches!(err, BuilderError::Conflict { .. }));
}
