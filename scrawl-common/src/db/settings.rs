//! Settings database operations
//!
//! Provides get/set accessors for the settings table following the
//! key-value pattern. The legacy import records its "already performed"
//! flag here; nothing else in the import engine writes settings.

use crate::{Error, Result};
use sqlx::{Pool, Sqlite};

/// Settings key recording that the legacy import has completed successfully
pub const HAS_PERFORMED_IMPORT_KEY: &str = "has_performed_import";

/// Check whether the legacy import has already completed successfully
///
/// **Returns:** false if the flag was never written
pub async fn has_performed_import(db: &Pool<Sqlite>) -> Result<bool> {
    get_setting::<bool>(db, HAS_PERFORMED_IMPORT_KEY)
        .await
        .map(|opt| opt.unwrap_or(false))
}

/// Record that the legacy import completed successfully
///
/// Written only after a fully successful run; a failed run leaves the flag
/// unset so the user may retry on next launch.
pub async fn set_performed_import(db: &Pool<Sqlite>, performed: bool) -> Result<()> {
    set_setting(db, HAS_PERFORMED_IMPORT_KEY, performed).await
}

/// Serialized report of the most recent import run, for later display
pub async fn get_last_import_report(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, "last_import_report").await
}

/// Store the serialized report of an import run
pub async fn set_last_import_report(db: &Pool<Sqlite>, report: String) -> Result<()> {
    set_setting(db, "last_import_report", report).await
}

/// Generic setting getter (internal)
async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting failed: {}", e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (internal)
async fn set_setting<T>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    /// Setup in-memory test database with settings table
    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::db::init::create_tables(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn flag_defaults_to_false() {
        let pool = setup_test_db().await;
        assert!(!has_performed_import(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn flag_round_trips() {
        let pool = setup_test_db().await;

        set_performed_import(&pool, true).await.unwrap();
        assert!(has_performed_import(&pool).await.unwrap());

        // UPSERT keeps a single row
        set_performed_import(&pool, true).await.unwrap();
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM settings WHERE key = 'has_performed_import'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn report_round_trips() {
        let pool = setup_test_db().await;
        assert!(get_last_import_report(&pool).await.unwrap().is_none());

        set_last_import_report(&pool, "3 projects imported".into())
            .await
            .unwrap();
        assert_eq!(
            get_last_import_report(&pool).await.unwrap().as_deref(),
            Some("3 projects imported")
        );
    }
}
