//! Target persistence context
//!
//! Mapped entities are staged into the context immediately and become
//! durable only at the next successful `save`. `rollback` discards
//! staged-but-unsaved work; it never undoes earlier successful saves.

pub mod memory;
pub mod sqlite;

use crate::error::StoreError;
use async_trait::async_trait;
use scrawl_common::models::{Folder, Project, Submission, TextFile, Version};

pub use memory::MemoryTarget;
pub use sqlite::SqliteTarget;

/// The persistence context the import orchestrator writes into
#[async_trait]
pub trait TargetContext: Send {
    /// Whether a project of this name exists, committed or staged; the
    /// idempotency gate for re-runs
    async fn project_exists(&self, name: &str) -> Result<bool, StoreError>;

    fn insert_project(&mut self, project: Project);
    fn insert_folder(&mut self, folder: Folder);
    fn insert_text_file(&mut self, file: TextFile);
    fn insert_version(&mut self, version: Version);
    fn insert_submission(&mut self, submission: Submission);

    /// Commit all staged work; on success the stage is empty
    async fn save(&mut self) -> Result<(), StoreError>;

    /// Discard staged-but-unsaved work
    fn rollback(&mut self);
}

/// Entities staged since the last successful save
#[derive(Debug, Default)]
pub(crate) struct Staged {
    pub projects: Vec<Project>,
    pub folders: Vec<Folder>,
    pub text_files: Vec<TextFile>,
    pub versions: Vec<Version>,
    pub submissions: Vec<Submission>,
}

impl Staged {
    pub fn clear(&mut self) {
        self.projects.clear();
        self.folders.clear();
        self.text_files.clear();
        self.versions.clear();
        self.submissions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
            && self.folders.is_empty()
            && self.text_files.is_empty()
            && self.versions.is_empty()
            && self.submissions.is_empty()
    }
}
