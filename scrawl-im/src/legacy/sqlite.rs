//! SQLite reader for the Scrawl Classic store
//!
//! Opens the legacy library read-only and copies rows into flattened
//! snapshots. Version bodies are stored as RTF blobs in the legacy schema;
//! plain UTF-8 blobs (written by very old Classic builds) are accepted as
//! unformatted documents, and anything undecodable is reported as a
//! missing body so the mapper substitutes its placeholder.

use super::LegacyStore;
use crate::error::LegacyStoreError;
use crate::models::{
    LegacyCharacter, LegacyCollection, LegacyLocation, LegacyProject, LegacyScene, LegacyText,
    LegacyVersion,
};
use crate::transcode::{rtf, RichText};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use std::path::PathBuf;

/// Tables every readable Classic store carries
const REQUIRED_TABLES: [&str; 3] = ["projects", "texts", "versions"];

/// Tables only present in later Classic builds; absent ones read as empty
const OPTIONAL_TABLES: [&str; 4] = ["collections", "scenes", "characters", "locations"];

pub struct SqliteLegacyStore {
    path: PathBuf,
    pool: Option<SqlitePool>,
    optional_tables: HashSet<String>,
}

impl SqliteLegacyStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            pool: None,
            optional_tables: HashSet::new(),
        }
    }

    fn connected(&self) -> Result<&SqlitePool, LegacyStoreError> {
        self.pool
            .as_ref()
            .ok_or_else(|| LegacyStoreError::ConnectionFailed("store is not connected".into()))
    }

    fn has_optional(&self, table: &str) -> bool {
        self.optional_tables.contains(table)
    }
}

#[async_trait]
impl LegacyStore for SqliteLegacyStore {
    async fn connect(&mut self) -> Result<(), LegacyStoreError> {
        if !self.path.exists() {
            return Err(LegacyStoreError::NotFound(self.path.display().to_string()));
        }

        let url = format!("sqlite://{}?mode=ro", self.path.display());
        let pool = SqlitePool::connect(&url)
            .await
            .map_err(|e| LegacyStoreError::ConnectionFailed(e.to_string()))?;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table'",
        )
        .fetch_all(&pool)
        .await
        .map_err(|e| LegacyStoreError::ConnectionFailed(e.to_string()))?;
        let tables: HashSet<String> = tables.into_iter().collect();

        let missing: Vec<&str> = REQUIRED_TABLES
            .iter()
            .copied()
            .filter(|t| !tables.contains(*t))
            .collect();
        if !missing.is_empty() {
            return Err(LegacyStoreError::ModelMissing(format!(
                "missing tables: {}",
                missing.join(", ")
            )));
        }

        self.optional_tables = OPTIONAL_TABLES
            .iter()
            .copied()
            .filter(|t| tables.contains(*t))
            .map(String::from)
            .collect();

        tracing::info!(
            path = %self.path.display(),
            optional_tables = self.optional_tables.len(),
            "Connected to legacy store"
        );

        self.pool = Some(pool);
        Ok(())
    }

    async fn fetch_projects(&self) -> Result<Vec<LegacyProject>, LegacyStoreError> {
        let pool = self.connected()?;
        let rows = sqlx::query(
            "SELECT id, name, project_type, created_on FROM projects ORDER BY created_on, id",
        )
        .fetch_all(pool)
        .await
        .map_err(fetch_err)?;

        Ok(rows
            .iter()
            .map(|row| LegacyProject {
                id: row.get("id"),
                name: row.get("name"),
                project_type: row.get("project_type"),
                created_on: parse_date(row.get("created_on")),
            })
            .collect())
    }

    async fn fetch_texts(&self, project_id: &str) -> Result<Vec<LegacyText>, LegacyStoreError> {
        let pool = self.connected()?;
        let rows = sqlx::query(
            "SELECT id, name, group_name, created_on FROM texts
             WHERE project_id = ? ORDER BY created_on, id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
        .map_err(fetch_err)?;

        Ok(rows
            .iter()
            .map(|row| LegacyText {
                id: row.get("id"),
                name: row.get("name"),
                group_name: row.get("group_name"),
                created_on: parse_date(row.get("created_on")),
            })
            .collect())
    }

    async fn fetch_versions(&self, text_id: &str) -> Result<Vec<LegacyVersion>, LegacyStoreError> {
        let pool = self.connected()?;
        let rows = sqlx::query(
            "SELECT id, date, version_number, comment, body IS NOT NULL AS has_body
             FROM versions WHERE text_id = ? ORDER BY date, id",
        )
        .bind(text_id)
        .fetch_all(pool)
        .await
        .map_err(fetch_err)?;

        Ok(rows
            .iter()
            .map(|row| LegacyVersion {
                id: row.get("id"),
                date: parse_date(row.get("date")),
                version_number: row.get("version_number"),
                has_body: row.get("has_body"),
                comment: row.get("comment"),
            })
            .collect())
    }

    async fn fetch_body(&self, version_id: &str) -> Result<Option<RichText>, LegacyStoreError> {
        let pool = self.connected()?;
        let blob: Option<Vec<u8>> = sqlx::query_scalar("SELECT body FROM versions WHERE id = ?")
            .bind(version_id)
            .fetch_optional(pool)
            .await
            .map_err(fetch_err)?
            .flatten();

        let Some(bytes) = blob else {
            return Ok(None);
        };

        if bytes.starts_with(b"{\\rtf") {
            match rtf::decode(&bytes) {
                Ok(doc) => return Ok(Some(doc)),
                Err(e) => {
                    tracing::warn!(
                        version_id = version_id,
                        error = %e,
                        "Legacy body blob is not decodable RTF"
                    );
                    return Ok(None);
                }
            }
        }

        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(RichText::plain(text))),
            Err(_) => Ok(None),
        }
    }

    async fn fetch_collections(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyCollection>, LegacyStoreError> {
        if !self.has_optional("collections") {
            return Ok(Vec::new());
        }
        let pool = self.connected()?;
        let rows = sqlx::query(
            "SELECT id, name, collection_type, created_on FROM collections
             WHERE project_id = ? ORDER BY created_on, id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
        .map_err(fetch_err)?;

        Ok(rows
            .iter()
            .map(|row| LegacyCollection {
                id: row.get("id"),
                name: row.get("name"),
                collection_type: row.get("collection_type"),
                created_on: parse_date(row.get("created_on")),
            })
            .collect())
    }

    async fn fetch_scenes(&self, project_id: &str) -> Result<Vec<LegacyScene>, LegacyStoreError> {
        if !self.has_optional("scenes") {
            return Ok(Vec::new());
        }
        let pool = self.connected()?;
        let rows = sqlx::query(
            "SELECT id, name, created_on FROM scenes WHERE project_id = ? ORDER BY created_on, id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
        .map_err(fetch_err)?;

        Ok(rows
            .iter()
            .map(|row| LegacyScene {
                id: row.get("id"),
                name: row.get("name"),
                created_on: parse_date(row.get("created_on")),
            })
            .collect())
    }

    async fn fetch_characters(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyCharacter>, LegacyStoreError> {
        if !self.has_optional("characters") {
            return Ok(Vec::new());
        }
        let pool = self.connected()?;
        let rows = sqlx::query(
            "SELECT id, name, description, created_on FROM characters
             WHERE project_id = ? ORDER BY created_on, id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
        .map_err(fetch_err)?;

        Ok(rows
            .iter()
            .map(|row| LegacyCharacter {
                id: row.get("id"),
                name: row.get("name"),
                description: row.get("description"),
                created_on: parse_date(row.get("created_on")),
            })
            .collect())
    }

    async fn fetch_locations(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyLocation>, LegacyStoreError> {
        if !self.has_optional("locations") {
            return Ok(Vec::new());
        }
        let pool = self.connected()?;
        let rows = sqlx::query(
            "SELECT id, name, description, created_on FROM locations
             WHERE project_id = ? ORDER BY created_on, id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
        .map_err(fetch_err)?;

        Ok(rows
            .iter()
            .map(|row| LegacyLocation {
                id: row.get("id"),
                name: row.get("name"),
                description: row.get("description"),
                created_on: parse_date(row.get("created_on")),
            })
            .collect())
    }
}

fn fetch_err(e: sqlx::Error) -> LegacyStoreError {
    LegacyStoreError::FetchFailed(e.to_string())
}

/// Parse a legacy timestamp; Classic wrote RFC 3339, the oldest builds
/// wrote `YYYY-MM-DD HH:MM:SS`. Unparseable values fall back to the epoch.
fn parse_date(raw: String) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    tracing::warn!(value = %raw, "Unparseable legacy timestamp, using epoch");
    DateTime::<Utc>::UNIX_EPOCH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::{FormatRun, RunAttrs};

    async fn seed_store(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("library.db");
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&url).await.unwrap();

        for sql in [
            "CREATE TABLE projects (id TEXT PRIMARY KEY, name TEXT, project_type TEXT, created_on TEXT)",
            "CREATE TABLE texts (id TEXT PRIMARY KEY, project_id TEXT, name TEXT, group_name TEXT, created_on TEXT)",
            "CREATE TABLE versions (id TEXT PRIMARY KEY, text_id TEXT, date TEXT, version_number INTEGER, comment TEXT, body BLOB)",
            "CREATE TABLE collections (id TEXT PRIMARY KEY, project_id TEXT, name TEXT, collection_type TEXT, created_on TEXT)",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }

        sqlx::query(
            "INSERT INTO projects VALUES ('p1', 'Novel One<>2019-01-01', 'novel', '2019-01-01T09:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO texts VALUES ('t1', 'p1', 'Chapter 1', 'draft', '2019-01-02T09:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let rich = RichText {
            text: "styled".into(),
            runs: vec![FormatRun {
                start: 0,
                len: 6,
                attrs: RunAttrs {
                    bold: true,
                    ..Default::default()
                },
            }],
            paragraphs: Vec::new(),
        };
        let rtf_body = rtf::encode(&rich).unwrap();

        sqlx::query("INSERT INTO versions VALUES ('v1', 't1', '2019-01-03T09:00:00Z', 1, NULL, ?)")
            .bind(rtf_body)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO versions VALUES ('v2', 't1', '2019-01-04 10:30:00', 2, 'rework', X'00FF00FF')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO versions VALUES ('v3', 't1', '2019-01-05T09:00:00Z', 3, NULL, NULL)")
            .execute(&pool)
            .await
            .unwrap();

        pool.close().await;
        path
    }

    #[tokio::test]
    async fn connect_rejects_missing_file() {
        let mut store = SqliteLegacyStore::new(PathBuf::from("/nonexistent/library.db"));
        assert!(matches!(
            store.connect().await,
            Err(LegacyStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn connect_rejects_foreign_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&url).await.unwrap();
        sqlx::query("CREATE TABLE notes (id TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let mut store = SqliteLegacyStore::new(path);
        assert!(matches!(
            store.connect().await,
            Err(LegacyStoreError::ModelMissing(_))
        ));
    }

    #[tokio::test]
    async fn fetches_snapshots_and_bodies() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed_store(&dir).await;
        let mut store = SqliteLegacyStore::new(path);
        store.connect().await.unwrap();

        let projects = store.fetch_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Novel One<>2019-01-01");

        let texts = store.fetch_texts("p1").await.unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].group_name.as_deref(), Some("draft"));

        let versions = store.fetch_versions("t1").await.unwrap();
        assert_eq!(versions.len(), 3);
        assert!(versions[0].has_body);
        assert!(versions[1].has_body);
        assert!(!versions[2].has_body);
        // Old-format timestamp parsed, not epoch-defaulted
        assert_eq!(versions[1].date.format("%Y-%m-%d").to_string(), "2019-01-04");

        // RTF blob decodes with its formatting
        let body = store.fetch_body("v1").await.unwrap().expect("rich body");
        assert_eq!(body.text, "styled");
        assert!(body.runs[0].attrs.bold);

        // Garbage blob reads as missing
        assert!(store.fetch_body("v2").await.unwrap().is_none());
        assert!(store.fetch_body("v3").await.unwrap().is_none());

        // Optional tables absent from this store read as empty
        assert!(store.fetch_scenes("p1").await.unwrap().is_empty());
        let collections = store.fetch_collections("p1").await.unwrap();
        assert!(collections.is_empty());
    }
}
