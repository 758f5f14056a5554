//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling and connection configuration for the SQLite
//! telemetry database.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;

use crate::error::{Error, Result};

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Milliseconds a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(5)
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Switch the database to WAL journaling so readers do not block the
/// concurrent writers of the sink.
///
/// # Errors
/// Returns an error if a connection cannot be checked out or the pragma fails.
pub fn enable_wal(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    diesel::sql_query("PRAGMA journal_mode=WAL")
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

/// Configure SQLite connection pragmas used for telemetry writes.
///
/// # Errors
/// Returns an error if a pragma fails to apply.
pub fn configure_sqlite_connection(conn: &mut SqliteConnection) -> Result<()> {
    diesel::sql_query(format!("PRAGMA busy_timeout={BUSY_TIMEOUT_MS}"))
        .execute(conn)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pool_with_memory_db() {
        let pool = create_pool(":memory:");
        assert!(pool.is_ok());
    }

    #[test]
    fn create_pool_allows_multiple_connections() {
        let pool = create_pool(":memory:").unwrap();

        let conn1 = pool.get();
        assert!(conn1.is_ok());

        // Connection should be returned to pool when dropped
        drop(conn1);

        let conn2 = pool.get();
        assert!(conn2.is_ok());
    }

    #[test]
    fn configure_sqlite_connection_sets_pragmas() {
        let pool = create_pool(":memory:").unwrap();
        let mut conn = pool.get().unwrap();

        let result = configure_sqlite_connection(&mut conn);
        assert!(result.is_ok());
    }

    #[test]
    fn enable_wal_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wal.db");
        let pool = create_pool(&path.display().to_string()).unwrap();

        assert!(enable_wal(&pool).is_ok());
    }
}
