//! In-memory target context
//!
//! Backs the unit and integration suites: same staging/commit semantics as
//! the SQLite context, plus save-call counting and scriptable save
//! failures.

use super::{Staged, TargetContext};
use crate::error::StoreError;
use async_trait::async_trait;
use scrawl_common::models::{Folder, Project, Submission, TextFile, Version};

#[derive(Debug, Default)]
pub struct MemoryTarget {
    staged: Staged,
    committed: Staged,
    save_calls: usize,
    rollback_calls: usize,
    /// 1-based save call that should fail, if any
    fail_on_save_call: Option<usize>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the nth (1-based) save call fail with `SaveFailed`
    pub fn fail_on_save_call(mut self, call: usize) -> Self {
        self.fail_on_save_call = Some(call);
        self
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls
    }

    pub fn rollback_calls(&self) -> usize {
        self.rollback_calls
    }

    pub fn staged_is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn committed_projects(&self) -> &[Project] {
        &self.committed.projects
    }

    pub fn committed_folders(&self) -> &[Folder] {
        &self.committed.folders
    }

    pub fn committed_text_files(&self) -> &[TextFile] {
        &self.committed.text_files
    }

    pub fn committed_versions(&self) -> &[Version] {
        &self.committed.versions
    }

    pub fn committed_submissions(&self) -> &[Submission] {
        &self.committed.submissions
    }
}

#[async_trait]
impl TargetContext for MemoryTarget {
    async fn project_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.staged.projects.iter().any(|p| p.name == name)
            || self.committed.projects.iter().any(|p| p.name == name))
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
        self.save_calls += 1;
        if self.fail_on_save_call == Some(self.save_calls) {
            return Err(StoreError::SaveFailed("scripted save failure".into()));
        }
        self.committed.projects.append(&mut self.staged.projects);
        self.committed.folders.append(&mut self.staged.folders);
        self.committed.text_files.append(&mut self.staged.text_files);
        self.committed.versions.append(&mut self.staged.versions);
        self.committed
            .submissions
            .append(&mut self.staged.submissions);
        Ok(())
    }

    fn rollback(&mut self) {
        self.rollback_calls += 1;
        self.staged.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scrawl_common::models::{ProjectStatus, ProjectType};
    use uuid::Uuid;

    fn project(name: &str) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: name.into(),
            project_type: ProjectType::Blank,
            status: ProjectStatus::PendingReview,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn scripted_failure_hits_the_requested_call() {
        let mut target = MemoryTarget::new().fail_on_save_call(2);
        target.insert_project(project("a"));
        target.save().await.unwrap();

        target.insert_project(project("b"));
        assert!(target.save().await.is_err());
        // Failed save leaves the stage intact for rollback
        assert!(!target.staged_is_empty());

        target.rollback();
        assert!(target.staged_is_empty());
        assert_eq!(target.committed_projects().len(), 1);
        assert_eq!(target.rollback_calls(), 1);
    }
}
