//! Per-run identity caches
//!
//! Map legacy record identities to the new entities created for them, so
//! relationships can be stitched together without re-querying the target
//! store. The caches are scoped to one orchestrator invocation and cleared
//! at every batch-commit boundary to bound memory; an entry must never be
//! read across a commit boundary after its batch was cleared.

use crate::error::MapError;
use scrawl_common::models::StandardFolder;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct IdentityCache {
    /// Standard folder IDs per project
    folders: HashMap<(Uuid, StandardFolder), Uuid>,
    /// Legacy text ID → new TextFile ID
    texts: HashMap<String, Uuid>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_folder(&mut self, project_id: Uuid, kind: StandardFolder, folder_id: Uuid) {
        self.folders.insert((project_id, kind), folder_id);
    }

    /// Resolve a standard folder for a project; failing this is a
    /// structural mapping error (the taxonomy should have been created
    /// when the project was mapped)
    pub fn require_folder(
        &self,
        project_id: Uuid,
        project_name: &str,
        kind: StandardFolder,
    ) -> Result<Uuid, MapError> {
        self.folders
            .get(&(project_id, kind))
            .copied()
            .ok_or(MapError::MissingFolder {
                folder: kind.name(),
                project: project_name.to_string(),
            })
    }

    pub fn record_text(&mut self, legacy_id: &str, text_file_id: Uuid) {
        self.texts.insert(legacy_id.to_string(), text_file_id);
    }

    pub fn lookup_text(&self, legacy_id: &str) -> Option<Uuid> {
        self.texts.get(legacy_id).copied()
    }

    /// Drop every entry; called at each batch-commit boundary
    pub fn clear(&mut self) {
        self.folders.clear();
        self.texts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_folder_fails_when_taxonomy_missing() {
        let cache = IdentityCache::new();
        let err = cache
            .require_folder(Uuid::new_v4(), "Ghost Project", StandardFolder::Draft)
            .unwrap_err();
        assert!(matches!(err, MapError::MissingFolder { folder: "Draft", .. }));
    }

    #[test]
    fn clear_empties_both_maps() {
        let mut cache = IdentityCache::new();
        let project = Uuid::new_v4();
        cache.record_folder(project, StandardFolder::Draft, Uuid::new_v4());
        cache.record_text("legacy-1", Uuid::new_v4());
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.lookup_text("legacy-1").is_none());
    }
}
