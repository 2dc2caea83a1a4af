//! Caller-facing import service
//!
//! Non-throwing boundary used at application startup: decide whether an
//! import should run, run it, and expose the outcome. The
//! `has_performed_import` settings flag is written only after a fully
//! successful run; any failure leaves it unset so the user may retry on
//! next launch, and re-runs skip already-present projects through the
//! orchestrator's idempotency gate.

use crate::import::{ImportOrchestrator, ImportReport, ProgressTracker};
use crate::legacy::{LegacyStore, SqliteLegacyStore};
use crate::store::{SqliteTarget, TargetContext};
use scrawl_common::db::settings;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct ImportService {
    db: SqlitePool,
    legacy_store_path: PathBuf,
    progress: Arc<ProgressTracker>,
    last_error: RwLock<Option<String>>,
}

impl ImportService {
    pub fn new(db: SqlitePool, legacy_store_path: PathBuf) -> Self {
        Self {
            db,
            legacy_store_path,
            progress: Arc::new(ProgressTracker::new()),
            last_error: RwLock::new(None),
        }
    }

    /// Progress state for UI binding while an import runs
    pub fn progress(&self) -> Arc<ProgressTracker> {
        self.progress.clone()
    }

    /// True iff no import was performed yet and a legacy store is present
    /// at the configured path
    pub async fn should_import(&self) -> bool {
        match settings::has_performed_import(&self.db).await {
            Ok(true) => false,
            Ok(false) => self.legacy_store_path.exists(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read import flag, not importing");
                false
            }
        }
    }

    /// Run the import against the configured legacy store. Never throws;
    /// failures are captured and exposed via [`Self::error_report`].
    pub async fn execute_import(&self) -> bool {
        let legacy = SqliteLegacyStore::new(self.legacy_store_path.clone());
        let target = SqliteTarget::new(self.db.clone());
        self.execute_import_with(legacy, target).await
    }

    /// Run the import with explicit collaborators
    pub async fn execute_import_with<L, C>(&self, legacy: L, target: C) -> bool
    where
        L: LegacyStore,
        C: TargetContext,
    {
        let mut orchestrator = ImportOrchestrator::new(legacy, target, self.progress.clone());

        match orchestrator.run().await {
            Ok(outcome) => {
                self.store_report(&outcome.report).await;

                if outcome.report.fatal {
                    *self.last_error.write().await = Some(outcome.report.render());
                    return false;
                }

                if let Err(e) = settings::set_performed_import(&self.db, true).await {
                    tracing::warn!(error = %e, "Import succeeded but flag write failed");
                }
                *self.last_error.write().await = None;
                true
            }
            Err(e) => {
                let report = orchestrator
                    .diagnostics()
                    .report(self.progress.total(), self.progress.processed());
                self.store_report(&report).await;
                *self.last_error.write().await = Some(format!("{}\n{}", e, report.render()));
                false
            }
        }
    }

    /// The failure report of the most recent run, if it failed
    pub async fn error_report(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Persist the report (JSON) so the application can show it later
    async fn store_report(&self, report: &ImportReport) {
        let serialized = match serde_json::to_string(report) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize import report");
                return;
            }
        };
        if let Err(e) = settings::set_last_import_report(&self.db, serialized).await {
            tracing::warn!(error = %e, "Could not persist import report");
        }
    }
}
