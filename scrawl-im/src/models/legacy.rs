//! Flattened snapshots of Scrawl Classic records
//!
//! Each fetch call copies legacy rows into these immutable value types; the
//! orchestrator never holds a live legacy-store handle past the fetch that
//! produced it. Legacy identifiers are free-form strings (the old store
//! used URI-shaped record IDs) and are carried over only when they parse as
//! UUIDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level legacy project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyProject {
    pub id: String,
    /// Raw legacy name, possibly carrying a `<>`-delimited creation
    /// timestamp suffix
    pub name: String,
    pub project_type: String,
    pub created_on: DateTime<Utc>,
}

/// A text document inside a legacy project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyText {
    pub id: String,
    pub name: String,
    /// Free-text group label ("draft", "set aside", ...) used to pick the
    /// destination folder
    pub group_name: Option<String>,
    pub created_on: DateTime<Utc>,
}

/// One history entry of a legacy text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyVersion {
    pub id: String,
    pub date: DateTime<Utc>,
    pub version_number: i64,
    /// Whether the legacy record references a body blob at all
    pub has_body: bool,
    pub comment: Option<String>,
}

/// A legacy collection or submission grouping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyCollection {
    pub id: String,
    pub name: String,
    pub collection_type: String,
    pub created_on: DateTime<Utc>,
}

/// A legacy scene record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyScene {
    pub id: String,
    pub name: String,
    pub created_on: DateTime<Utc>,
}

/// A legacy character sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyCharacter {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_on: DateTime<Utc>,
}

/// A legacy location sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyLocation {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_on: DateTime<Utc>,
}
