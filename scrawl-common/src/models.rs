//! Destination data model for the Scrawl store
//!
//! These are the entities the legacy import produces and the rest of the
//! application consumes. Stored relationally: child records reference their
//! parent by UUID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project kind, mapped from the legacy type token during import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectType {
    Novel,
    Poetry,
    Script,
    ShortStory,
    Blank,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Novel => "novel",
            ProjectType::Poetry => "poetry",
            ProjectType::Script => "script",
            ProjectType::ShortStory => "shortStory",
            ProjectType::Blank => "blank",
        }
    }

    /// Parse a stored type token. Unknown tokens fall back to `Blank`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "novel" => ProjectType::Novel,
            "poetry" => ProjectType::Poetry,
            "script" => ProjectType::Script,
            "shortStory" => ProjectType::ShortStory,
            _ => ProjectType::Blank,
        }
    }
}

/// Project lifecycle status
///
/// Imported projects carry `PendingReview` until the user has looked them
/// over, distinguishing them from normally-created `Active` projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectStatus {
    Active,
    PendingReview,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::PendingReview => "pendingReview",
        }
    }

    pub fn from_token(token: &str) -> Self {
        match token {
            "pendingReview" => ProjectStatus::PendingReview,
            _ => ProjectStatus::Active,
        }
    }
}

/// Root aggregate: one writing project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// The fixed folder taxonomy pre-created under every project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardFolder {
    Draft,
    Ready,
    SetAside,
    Published,
    Research,
    Collections,
    Submissions,
    Trash,
}

impl StandardFolder {
    /// All standard folders, in display order
    pub const ALL: [StandardFolder; 8] = [
        StandardFolder::Draft,
        StandardFolder::Ready,
        StandardFolder::SetAside,
        StandardFolder::Published,
        StandardFolder::Research,
        StandardFolder::Collections,
        StandardFolder::Submissions,
        StandardFolder::Trash,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StandardFolder::Draft => "Draft",
            StandardFolder::Ready => "Ready",
            StandardFolder::SetAside => "Set Aside",
            StandardFolder::Published => "Published",
            StandardFolder::Research => "Research",
            StandardFolder::Collections => "Collections",
            StandardFolder::Submissions => "Submissions",
            StandardFolder::Trash => "Trash",
        }
    }
}

/// Folder tree node; `parent_folder_id` is None for top-level folders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub project_id: Uuid,
    pub parent_folder_id: Option<Uuid>,
}

/// A text document, owned by exactly one folder at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFile {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Append-only history entry for a text file
///
/// `version_number` is a 1-based sequence assigned at creation time.
/// `content` is the plain-text projection; `formatted_content` is the
/// portable rich-text serialization when the source carried formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: Uuid,
    pub text_file_id: Uuid,
    pub version_number: i64,
    pub created_at: DateTime<Utc>,
    pub comment: Option<String>,
    pub content: String,
    pub formatted_content: Option<Vec<u8>>,
}

/// A submission record: either a personal collection or a submission to a
/// publication. `publication == None` denotes a personal collection, and
/// `is_collection` always mirrors that (enforced by the constructors).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub project_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub publication: Option<String>,
    pub is_collection: bool,
}

impl Submission {
    /// A personal collection (no target publication)
    pub fn collection(
        id: Uuid,
        name: String,
        project_id: Uuid,
        submitted_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            project_id,
            submitted_at,
            notes,
            publication: None,
            is_collection: true,
        }
    }

    /// A submission to a named publication
    pub fn to_publication(
        id: Uuid,
        name: String,
        project_id: Uuid,
        submitted_at: DateTime<Utc>,
        notes: Option<String>,
        publication: String,
    ) -> Self {
        Self {
            id,
            name,
            project_id,
            submitted_at,
            notes,
            publication: Some(publication),
            is_collection: false,
        }
    }
}
