//! SQLite-backed target context
//!
//! Inserts are staged in memory and flushed inside a single transaction at
//! `save`, in dependency order so foreign keys resolve. The pool points at
//! the Scrawl store opened via `scrawl_common::db::init_database`.

use super::{Staged, TargetContext};
use crate::error::StoreError;
use async_trait::async_trait;
use scrawl_common::models::{Folder, Project, Submission, TextFile, Version};
use sqlx::SqlitePool;

#[derive(Debug)]
pub struct SqliteTarget {
    pool: SqlitePool,
    staged: Staged,
}

impl SqliteTarget {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            staged: Staged::default(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TargetContext for SqliteTarget {
    async fn project_exists(&self, name: &str) -> Result<bool, StoreError> {
        if self.staged.projects.iter().any(|p| p.name == name) {
            return Ok(true);
        }
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(count > 0)
    }

    fn insert_project(&mut self, project: Project) {
        self.staged.projects.push(project);
    }

    fn insert_folder(&mut self, folder: Folder) {
        self.staged.folders.push(folder);
    }

    fn insert_text_file(&mut self, file: TextFile) {
        self.staged.text_files.push(file);
    }

    fn insert_version(&mut self, version: Version) {
        self.staged.versions.push(version);
    }

    fn insert_submission(&mut self, submission: Submission) {
        self.staged.submissions.push(submission);
    }

    async fn save(&mut self) -> Result<(), StoreError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;

        for p in &self.staged.projects {
            sqlx::query(
                "INSERT INTO projects (id, name, project_type, status, created_at, modified_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(p.id.to_string())
            .bind(&p.name)
            .bind(p.project_type.as_str())
            .bind(p.status.as_str())
            .bind(p.created_at.to_rfc3339())
            .bind(p.modified_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        }

        for f in &self.staged.folders {
            sqlx::query(
                "INSERT INTO folders (id, name, project_id, parent_folder_id)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(f.id.to_string())
            .bind(&f.name)
            .bind(f.project_id.to_string())
            .bind(f.parent_folder_id.map(|id| id.to_string()))
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        }

        for t in &self.staged.text_files {
            sqlx::query(
                "INSERT INTO text_files (id, name, folder_id, created_at, modified_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(t.id.to_string())
            .bind(&t.name)
            .bind(t.folder_id.to_string())
            .bind(t.created_at.to_rfc3339())
            .bind(t.modified_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        }

        for v in &self.staged.versions {
            sqlx::query(
                "INSERT INTO versions
                 (id, text_file_id, version_number, created_at, comment, content, formatted_content)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(v.id.to_string())
            .bind(v.text_file_id.to_string())
            .bind(v.version_number)
            .bind(v.created_at.to_rfc3339())
            .bind(&v.comment)
            .bind(&v.content)
            .bind(&v.formatted_content)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        }

        for s in &self.staged.submissions {
            sqlx::query(
                "INSERT INTO submissions
                 (id, name, project_id, submitted_at, notes, publication, is_collection)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(s.id.to_string())
            .bind(&s.name)
            .bind(s.project_id.to_string())
            .bind(s.submitted_at.to_rfc3339())
            .bind(&s.notes)
            .bind(&s.publication)
            .bind(s.is_collection)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;

        tracing::debug!(
            projects = self.staged.projects.len(),
            folders = self.staged.folders.len(),
            text_files = self.staged.text_files.len(),
            versions = self.staged.versions.len(),
            submissions = self.staged.submissions.len(),
            "Committed staged entities"
        );

        self.staged.clear();
        Ok(())
    }

    fn rollback(&mut self) {
        tracing::debug!(
            projects = self.staged.projects.len(),
            "Discarding staged entities"
        );
        self.staged.clear();
    }
}
