//! End-to-end import orchestration
//!
//! Drives connect → enumerate → per-project map/insert → periodic batch
//! commit → final commit, as one sequential async task. At most one import
//! runs per target store; there is no internal parallelism, which keeps
//! commit ordering and identity-cache validity auditable.
//!
//! Failure handling: connection and enumeration failures abort before any
//! work; everything inside the project loop is absorbed into diagnostics at
//! item or project granularity; only a failed final commit escapes, after
//! rolling back uncommitted work. Work committed by earlier batches is not
//! undone — the run is committed-so-far, not atomic end to end.

use crate::error::{ImportError, LegacyStoreError, MapError};
use crate::import::caches::IdentityCache;
use crate::import::diagnostics::{DiagnosticsCollector, ImportReport};
use crate::import::progress::{ImportPhase, ProgressTracker};
use crate::legacy::LegacyStore;
use crate::mapper;
use crate::models::{LegacyProject, LegacyText};
use crate::store::TargetContext;
use scrawl_common::models::StandardFolder;
use std::sync::Arc;
use uuid::Uuid;

/// Projects per batch commit. Bounds memory across arbitrarily large
/// legacy libraries; the identity caches are cleared at every boundary.
pub const PROJECT_BATCH_SIZE: usize = 5;

/// What one run produced
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub projects_total: usize,
    pub projects_imported: usize,
    pub projects_skipped: usize,
    pub report: ImportReport,
}

enum ProjectResult {
    Imported,
    Skipped,
    Failed,
}

enum ItemError {
    Map(MapError),
    Fetch(LegacyStoreError),
}

pub struct ImportOrchestrator<L: LegacyStore, C: TargetContext> {
    legacy: L,
    target: C,
    diagnostics: DiagnosticsCollector,
    progress: Arc<ProgressTracker>,
    cache: IdentityCache,
}

impl<L: LegacyStore, C: TargetContext> ImportOrchestrator<L, C> {
    pub fn new(legacy: L, target: C, progress: Arc<ProgressTracker>) -> Self {
        Self {
            legacy,
            target,
            diagnostics: DiagnosticsCollector::new(),
            progress,
            cache: IdentityCache::new(),
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    pub fn target(&self) -> &C {
        &self.target
    }

    /// Run the import to completion.
    ///
    /// Returns the outcome even when diagnostics recorded errors; only
    /// connection, enumeration, and final-commit failures are returned as
    /// `Err`.
    pub async fn run(&mut self) -> Result<ImportOutcome, ImportError> {
        self.diagnostics.reset();
        self.cache.clear();
        self.progress.start();
        self.progress.set_phase(ImportPhase::Connecting);
        tracing::info!("Starting legacy store import");

        if let Err(e) = self.legacy.connect().await {
            self.progress.fail();
            return Err(ImportError::Connect(e));
        }

        self.progress.set_phase(ImportPhase::FetchingProjects);
        let projects = match self.legacy.fetch_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                self.progress.fail();
                return Err(ImportError::Enumerate(e));
            }
        };
        self.progress.set_total(projects.len());
        tracing::info!(projects = projects.len(), "Enumerated legacy projects");

        self.progress.set_phase(ImportPhase::ImportingProjects);
        let mut imported = 0usize;
        let mut skipped = 0usize;

        for (idx, legacy_project) in projects.iter().enumerate() {
            let name = mapper::clean_project_name(&legacy_project.name).to_string();
            tracing::debug!(
                project = %name,
                progress = format!("{}/{}", idx + 1, projects.len()),
                "Importing project"
            );

            match self.import_project(legacy_project, &name).await {
                ProjectResult::Imported => imported += 1,
                ProjectResult::Skipped => {
                    skipped += 1;
                    tracing::debug!(project = %name, "Project already present, skipping");
                }
                ProjectResult::Failed => {}
            }
            self.progress.advance(&name);

            if (idx + 1) % PROJECT_BATCH_SIZE == 0 {
                self.commit_batch(idx + 1).await;
            }
        }

        self.progress.set_phase(ImportPhase::FinalCommit);
        if let Err(e) = self.target.save().await {
            self.diagnostics.rollback_uncommitted(&mut self.target, &e);
            self.progress.fail();
            return Err(ImportError::Commit(e));
        }

        let report = self.diagnostics.report(projects.len(), projects.len());
        self.progress.complete();
        tracing::info!(
            imported,
            skipped,
            warnings = report.warning_count,
            errors = report.error_count,
            "Legacy import finished"
        );

        Ok(ImportOutcome {
            projects_total: projects.len(),
            projects_imported: imported,
            projects_skipped: skipped,
            report,
        })
    }

    /// Commit accumulated work and clear the per-run identity caches.
    ///
    /// A failed batch commit is recorded as an error and the run continues;
    /// the staged work stays in the context and gets another chance at the
    /// next commit point.
    async fn commit_batch(&mut self, processed: usize) {
        if let Err(e) = self.target.save().await {
            self.diagnostics
                .error("batch commit", "BATCH_COMMIT_FAILED", e.to_string());
        }
        self.cache.clear();
        tracing::debug!(processed, "Batch boundary: committed and cleared identity caches");
    }

    async fn import_project(&mut self, legacy: &LegacyProject, name: &str) -> ProjectResult {
        // Idempotency gate: a project of the same name was imported by an
        // earlier run (or created by the user)
        match self.target.project_exists(name).await {
            Ok(true) => return ProjectResult::Skipped,
            Ok(false) => {}
            Err(e) => {
                self.diagnostics
                    .error(name, "TARGET_QUERY_FAILED", e.to_string());
                return ProjectResult::Failed;
            }
        }

        let project = mapper::map_project(legacy, &mut self.diagnostics);
        let project_id = project.id;
        self.target.insert_project(project);

        for (kind, folder) in mapper::standard_folders(project_id) {
            self.cache.record_folder(project_id, kind, folder.id);
            self.target.insert_folder(folder);
        }

        if let Err(e) = self.import_project_contents(legacy, project_id, name).await {
            self.diagnostics.error(name, "FETCH_FAILED", e.to_string());
            return ProjectResult::Failed;
        }

        ProjectResult::Imported
    }

    /// Import everything under one project. A returned error is a legacy
    /// fetch failure, fatal to this project only.
    async fn import_project_contents(
        &mut self,
        legacy: &LegacyProject,
        project_id: Uuid,
        project_name: &str,
    ) -> Result<(), LegacyStoreError> {
        let texts = self.legacy.fetch_texts(&legacy.id).await?;
        for text in &texts {
            match self.import_text(text, project_id, project_name).await {
                Ok(()) => {}
                Err(ItemError::Map(e)) => {
                    self.diagnostics
                        .warn(&text.name, "TEXT_SKIPPED", e.to_string());
                }
                Err(ItemError::Fetch(e)) => return Err(e),
            }
        }

        let scenes = self.legacy.fetch_scenes(&legacy.id).await?;
        for scene in &scenes {
            match self
                .cache
                .require_folder(project_id, project_name, StandardFolder::Draft)
            {
                Ok(folder_id) => {
                    let (file, version) = mapper::map_scene(scene, folder_id, &mut self.diagnostics);
                    self.target.insert_text_file(file);
                    self.target.insert_version(version);
                }
                Err(e) => self
                    .diagnostics
                    .warn(&scene.name, "SCENE_SKIPPED", e.to_string()),
            }
        }

        let characters = self.legacy.fetch_characters(&legacy.id).await?;
        for character in &characters {
            match self
                .cache
                .require_folder(project_id, project_name, StandardFolder::Research)
            {
                Ok(folder_id) => {
                    let (file, version) =
                        mapper::map_character(character, folder_id, &mut self.diagnostics);
                    self.target.insert_text_file(file);
                    self.target.insert_version(version);
                }
                Err(e) => self
                    .diagnostics
                    .warn(&character.name, "SHEET_SKIPPED", e.to_string()),
            }
        }

        let locations = self.legacy.fetch_locations(&legacy.id).await?;
        for location in &locations {
            match self
                .cache
                .require_folder(project_id, project_name, StandardFolder::Research)
            {
                Ok(folder_id) => {
                    let (file, version) =
                        mapper::map_location(location, folder_id, &mut self.diagnostics);
                    self.target.insert_text_file(file);
                    self.target.insert_version(version);
                }
                Err(e) => self
                    .diagnostics
                    .warn(&location.name, "SHEET_SKIPPED", e.to_string()),
            }
        }

        let collections = self.legacy.fetch_collections(&legacy.id).await?;
        for collection in &collections {
            let submission = mapper::map_collection(collection, project_id, &mut self.diagnostics);
            self.target.insert_submission(submission);
        }

        Ok(())
    }

    /// Import one text and its full version history
    async fn import_text(
        &mut self,
        text: &LegacyText,
        project_id: Uuid,
        project_name: &str,
    ) -> Result<(), ItemError> {
        let group = text.group_name.as_deref().unwrap_or("");
        if !group.trim().is_empty() && mapper::lookup_folder_name(group).is_none() {
            self.diagnostics.warn(
                &text.name,
                "UNKNOWN_GROUP",
                format!("unknown legacy group '{}', filing under Draft", group),
            );
        }
        let kind = mapper::map_folder_name(group);
        let folder_id = self
            .cache
            .require_folder(project_id, project_name, kind)
            .map_err(ItemError::Map)?;

        let file = mapper::map_text_file(text, folder_id, &mut self.diagnostics);
        let file_id = file.id;
        self.cache.record_text(&text.id, file_id);
        self.target.insert_text_file(file);

        let mut versions = self
            .legacy
            .fetch_versions(&text.id)
            .await
            .map_err(ItemError::Fetch)?;
        versions.sort_by(|a, b| a.date.cmp(&b.date));

        for (i, legacy_version) in versions.iter().enumerate() {
            let body = if legacy_version.has_body {
                self.legacy
                    .fetch_body(&legacy_version.id)
                    .await
                    .map_err(ItemError::Fetch)?
            } else {
                None
            };
            let version = mapper::map_version(
                legacy_version,
                body.as_ref(),
                file_id,
                (i + 1) as i64,
                &mut self.diagnostics,
            );
            self.target.insert_version(version);
        }

        Ok(())
    }
}
