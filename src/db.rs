//! SQLite connection pool shared by the relational repository.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::repository::errors::{RepositoryError, RepositoryResult};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies per-connection pragmas when a connection is handed out.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds a pool whose checkout and lock waits are both bounded by `timeout`.
///
/// A store that stays busy past the timeout surfaces as
/// [`RepositoryError::Unavailable`] instead of hanging the caller: pool
/// checkouts fail with a pool timeout and locked queries fail with
/// `SQLITE_BUSY`, which the error conversion maps the same way.
pub fn establish_connection_pool(database_url: &str, timeout: Duration) -> RepositoryResult<DbPool> {
    if timeout.is_zero() {
        return Err(RepositoryError::ValidationError(
            "store timeout must be positive".to_string(),
        ));
    }
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_timeout(timeout)
        .connection_customizer(Box::new(SqlitePragmas {
            busy_timeout: timeout,
        }))
        .build(manager)
        .map_err(|e| RepositoryError::Unavailable(e.to_string()))
}

/// Runs embedded migrations that have not been applied yet.
pub fn run_migrations(pool: &DbPool) -> RepositoryResult<()> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
    Ok(())
}
