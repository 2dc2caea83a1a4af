//! Scrawl Classic store reader
//!
//! The orchestrator consumes the legacy store only through this trait:
//! connect once, then fetch flattened snapshots per parent. Implementations
//! own every platform- and schema-specific detail.

pub mod sqlite;

use crate::error::LegacyStoreError;
use crate::models::{
    LegacyCharacter, LegacyCollection, LegacyLocation, LegacyProject, LegacyScene, LegacyText,
    LegacyVersion,
};
use crate::transcode::RichText;
use async_trait::async_trait;
use std::path::PathBuf;

pub use sqlite::SqliteLegacyStore;

/// Read access to a Scrawl Classic store
#[async_trait]
pub trait LegacyStore: Send {
    /// Open the store and validate its schema; must be called before any
    /// fetch
    async fn connect(&mut self) -> Result<(), LegacyStoreError>;

    /// Enumerate all top-level projects
    async fn fetch_projects(&self) -> Result<Vec<LegacyProject>, LegacyStoreError>;

    /// Texts under one project
    async fn fetch_texts(&self, project_id: &str) -> Result<Vec<LegacyText>, LegacyStoreError>;

    /// Versions of one text, sorted ascending by date
    async fn fetch_versions(&self, text_id: &str) -> Result<Vec<LegacyVersion>, LegacyStoreError>;

    /// The rich body of one version; None when the store holds no readable
    /// body for it
    async fn fetch_body(&self, version_id: &str) -> Result<Option<RichText>, LegacyStoreError>;

    /// Collections under one project
    async fn fetch_collections(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyCollection>, LegacyStoreError>;

    /// Scenes under one project
    async fn fetch_scenes(&self, project_id: &str) -> Result<Vec<LegacyScene>, LegacyStoreError>;

    /// Character sheets under one project
    async fn fetch_characters(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyCharacter>, LegacyStoreError>;

    /// Location sheets under one project
    async fn fetch_locations(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyLocation>, LegacyStoreError>;
}

/// Conventional location of the Scrawl Classic store for this user
pub fn default_store_path() -> PathBuf {
    let base = if cfg!(target_os = "macos") {
        dirs::data_dir()
    } else {
        dirs::data_local_dir()
    };
    base.map(|d| d.join("ScrawlClassic").join("library.db"))
        .unwrap_or_else(|| PathBuf::from("./ScrawlClassic/library.db"))
}
