//! Legacy import pipeline
//!
//! The orchestrator drives the end-to-end sequence; the progress tracker,
//! diagnostics collector, and identity caches are its supporting state.

pub mod caches;
pub mod diagnostics;
pub mod orchestrator;
pub mod progress;

pub use caches::IdentityCache;
pub use diagnostics::{Diagnostic, DiagnosticsCollector, ImportReport};
pub use orchestrator::{ImportOrchestrator, ImportOutcome, PROJECT_BATCH_SIZE};
pub use progress::{ImportPhase, ProgressSnapshot, ProgressTracker};
