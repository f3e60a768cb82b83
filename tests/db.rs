use std::time::{Duration, Instant};

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use portfolio_admin::clients::local_storage::LocalStorage;
use portfolio_admin::db::establish_connection_pool;
use portfolio_admin::repository::errors::RepositoryError;
use portfolio_admin::repository::fallback::{CategoryFallback, DEFAULT_CATEGORIES};
use portfolio_admin::repository::{CategoryReader, DieselRepository};
use portfolio_admin::services::ServiceError;
use portfolio_admin::services::categories::show_categories;

mod common;

const LOCK_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(QueryableByName)]
struct Count {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[test]
fn migrations_create_empty_tables() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("connection");

    for table in ["categories", "projects", "project_media", "messages", "reviews"] {
        let row: Count = diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {table}"))
            .get_result(&mut conn)
            .expect("table should exist");
        assert_eq!(row.count, 0, "{table} should start empty");
    }
}

#[test]
fn migrations_are_idempotent() {
    let test_db = common::TestDb::new();
    assert!(portfolio_admin::db::run_migrations(&test_db.pool()).is_ok());
}

#[test]
fn zero_timeout_is_rejected() {
    let result = establish_connection_pool(":memory:", Duration::ZERO);
    assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
}

#[test]
fn locked_store_is_unavailable_after_the_timeout() {
    let test_db = common::TestDb::with_timeout(LOCK_TIMEOUT);
    let mut holder = test_db.pool().get().expect("connection");
    holder.batch_execute("BEGIN EXCLUSIVE").expect("lock");

    let repo = DieselRepository::new(test_db.pool());
    let started = Instant::now();
    let result = repo.list_categories();
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
    assert!(elapsed >= LOCK_TIMEOUT / 2, "gave up after {elapsed:?}");
    assert!(elapsed < LOCK_TIMEOUT * 4, "waited {elapsed:?}");

    assert!(matches!(
        show_categories(&repo),
        Err(ServiceError::StoreUnavailable(_))
    ));

    holder.batch_execute("ROLLBACK").expect("unlock");
}

#[test]
fn locked_store_falls_back_to_local_categories() {
    let test_db = common::TestDb::with_timeout(LOCK_TIMEOUT);
    let dir = tempfile::tempdir().unwrap();
    let local = LocalStorage::open(dir.path().join("local.json")).unwrap();
    let repo = CategoryFallback::new(DieselRepository::new(test_db.pool()), local);

    let mut holder = test_db.pool().get().expect("connection");
    holder.batch_execute("BEGIN EXCLUSIVE").expect("lock");

    let categories = repo.list_categories().expect("local categories");
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, DEFAULT_CATEGORIES.to_vec());

    holder.batch_execute("ROLLBACK").expect("unlock");

    assert!(repo.inner().list_categories().unwrap().is_empty());
}
