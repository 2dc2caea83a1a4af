//! Observable progress state for an import run
//!
//! Mutable counters the UI binds to while the import task runs. Every field
//! is stored atomically (atomic integers/flags, lock-guarded strings) so a
//! concurrently-reading observer never sees a torn value for any single
//! field. The tracker performs no I/O and holds no business logic.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Instant;

/// Phases of the import state machine, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImportPhase {
    NotStarted,
    Connecting,
    FetchingProjects,
    ImportingProjects,
    FinalCommit,
    Completed,
    Failed,
}

/// Point-in-time copy of the tracker for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub phase: ImportPhase,
    pub total_items: usize,
    pub processed_items: usize,
    pub current_item: String,
    pub percentage: f64,
    pub elapsed_seconds: u64,
    pub items_per_second: f64,
    /// Zero until at least one item has processed
    pub estimated_remaining_seconds: u64,
    pub completed: bool,
    pub failed: bool,
}

/// Shared, observable import progress
#[derive(Debug)]
pub struct ProgressTracker {
    total_items: AtomicUsize,
    processed_items: AtomicUsize,
    completed: AtomicBool,
    failed: AtomicBool,
    phase: RwLock<ImportPhase>,
    current_item: RwLock<String>,
    started_at: RwLock<Option<Instant>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            total_items: AtomicUsize::new(0),
            processed_items: AtomicUsize::new(0),
            completed: AtomicBool::new(false),
            failed: AtomicBool::new(false),
            phase: RwLock::new(ImportPhase::NotStarted),
            current_item: RwLock::new(String::new()),
            started_at: RwLock::new(None),
        }
    }

    /// Reset all fields and start the clock
    pub fn start(&self) {
        self.total_items.store(0, Ordering::SeqCst);
        self.processed_items.store(0, Ordering::SeqCst);
        self.completed.store(false, Ordering::SeqCst);
        self.failed.store(false, Ordering::SeqCst);
        *self.phase.write().unwrap() = ImportPhase::NotStarted;
        self.current_item.write().unwrap().clear();
        *self.started_at.write().unwrap() = Some(Instant::now());
    }

    pub fn set_phase(&self, phase: ImportPhase) {
        *self.phase.write().unwrap() = phase;
    }

    pub fn phase(&self) -> ImportPhase {
        *self.phase.read().unwrap()
    }

    pub fn set_total(&self, total: usize) {
        self.total_items.store(total, Ordering::SeqCst);
    }

    pub fn total(&self) -> usize {
        self.total_items.load(Ordering::SeqCst)
    }

    pub fn processed(&self) -> usize {
        self.processed_items.load(Ordering::SeqCst)
    }

    /// Record one finished unit of work
    pub fn advance(&self, item: &str) {
        *self.current_item.write().unwrap() = item.to_string();
        self.processed_items.fetch_add(1, Ordering::SeqCst);
    }

    pub fn complete(&self) {
        self.completed.store(true, Ordering::SeqCst);
        self.set_phase(ImportPhase::Completed);
    }

    pub fn fail(&self) {
        self.failed.store(true, Ordering::SeqCst);
        self.set_phase(ImportPhase::Failed);
    }

    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.processed() as f64 / total as f64) * 100.0
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at
            .read()
            .unwrap()
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0)
    }

    pub fn items_per_second(&self) -> f64 {
        let elapsed = self.elapsed_seconds();
        if elapsed == 0 {
            0.0
        } else {
            self.processed() as f64 / elapsed as f64
        }
    }

    /// Estimated remaining seconds: `(elapsed / processed) * remaining`.
    /// Undefined (reported as zero) until at least one item has processed.
    pub fn estimated_remaining_seconds(&self) -> u64 {
        let processed = self.processed();
        if processed == 0 {
            return 0;
        }
        let total = self.total();
        let remaining = total.saturating_sub(processed);
        let per_item = self.elapsed_seconds() as f64 / processed as f64;
        (per_item * remaining as f64) as u64
    }

    /// Copy all fields for display
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            phase: self.phase(),
            total_items: self.total(),
            processed_items: self.processed(),
            current_item: self.current_item.read().unwrap().clone(),
            percentage: self.percentage(),
            elapsed_seconds: self.elapsed_seconds(),
            items_per_second: self.items_per_second(),
            estimated_remaining_seconds: self.estimated_remaining_seconds(),
            completed: self.completed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_is_zero_before_first_item() {
        let tracker = ProgressTracker::new();
        tracker.start();
        tracker.set_total(10);
        assert_eq!(tracker.estimated_remaining_seconds(), 0);
        assert_eq!(tracker.percentage(), 0.0);
    }

    #[test]
    fn advance_moves_counters_and_current_item() {
        let tracker = ProgressTracker::new();
        tracker.start();
        tracker.set_total(4);
        tracker.advance("First Novel");
        tracker.advance("Second Novel");

        let snap = tracker.snapshot();
        assert_eq!(snap.processed_items, 2);
        assert_eq!(snap.current_item, "Second Novel");
        assert!((snap.percentage - 50.0).abs() < f64::EPSILON);
        assert!(!snap.completed);
    }

    #[test]
    fn zero_total_reports_zero_percent() {
        let tracker = ProgressTracker::new();
        tracker.start();
        assert_eq!(tracker.percentage(), 0.0);
    }

    #[test]
    fn terminal_flags_follow_phase() {
        let tracker = ProgressTracker::new();
        tracker.start();
        tracker.set_phase(ImportPhase::FinalCommit);
        tracker.complete();
        let snap = tracker.snapshot();
        assert!(snap.completed);
        assert_eq!(snap.phase, ImportPhase::Completed);

        tracker.start();
        tracker.fail();
        assert!(tracker.snapshot().failed);
        assert_eq!(tracker.phase(), ImportPhase::Failed);
    }
}
