//! Error types for the legacy import engine
//!
//! Layered taxonomy:
//! - [`LegacyStoreError`] — failures talking to the Scrawl Classic store
//! - [`MapError`] — a required relationship could not be resolved while
//!   mapping (content-level anomalies are warnings, not errors)
//! - [`StoreError`] — target persistence context failures
//! - [`ImportError`] — the only errors that escape an import run: a failed
//!   connect, a failed project enumeration, or a failed final commit

use thiserror::Error;

/// Failures raised by the legacy store reader
#[derive(Debug, Error)]
pub enum LegacyStoreError {
    /// No legacy store file exists at the given path
    #[error("Legacy store not found: {0}")]
    NotFound(String),

    /// The file exists but does not carry the expected schema
    #[error("Legacy store model missing: {0}")]
    ModelMissing(String),

    /// The store could not be opened
    #[error("Legacy store connection failed: {0}")]
    ConnectionFailed(String),

    /// A query against an open store failed
    #[error("Legacy fetch failed: {0}")]
    FetchFailed(String),
}

/// A required relationship could not be resolved during mapping
#[derive(Debug, Error)]
pub enum MapError {
    /// The destination folder taxonomy is incomplete for this project
    #[error("No '{folder}' folder exists under project {project}")]
    MissingFolder { folder: &'static str, project: String },
}

/// Target persistence context failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Commit of staged work failed; staged entities remain uncommitted
    #[error("Save failed: {0}")]
    SaveFailed(String),

    /// A read against the target store failed
    #[error("Target query failed: {0}")]
    QueryFailed(String),
}

/// Fatal import failures surfaced to the caller
///
/// Everything else is absorbed into the diagnostics collector; see the
/// orchestrator. A `Commit` error is raised only after uncommitted work has
/// been rolled back — work committed by earlier batches stays committed.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Could not connect to the legacy store; no work was performed
    #[error("Import aborted: {0}")]
    Connect(#[source] LegacyStoreError),

    /// Could not enumerate legacy projects; no work was performed
    #[error("Import aborted enumerating projects: {0}")]
    Enumerate(#[source] LegacyStoreError),

    /// The final commit failed after rollback of uncommitted work
    #[error("Import failed during final commit: {0}")]
    Commit(#[source] StoreError),
}
