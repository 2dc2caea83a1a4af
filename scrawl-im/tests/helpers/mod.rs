//! Shared test fixtures: a scripted in-memory legacy store

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use scrawl_im::error::LegacyStoreError;
use scrawl_im::legacy::LegacyStore;
use scrawl_im::models::{
    LegacyCharacter, LegacyCollection, LegacyLocation, LegacyProject, LegacyScene, LegacyText,
    LegacyVersion,
};
use scrawl_im::transcode::RichText;
use std::collections::HashMap;
use uuid::Uuid;

/// Deterministic timestamps: day `n` of the fixture calendar
pub fn at_day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 1, 1, 9, 0, 0).unwrap() + Duration::days(n)
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Scripted legacy store; fetches clone from the scripted maps
#[derive(Debug, Default, Clone)]
pub struct ScriptedLegacyStore {
    pub projects: Vec<LegacyProject>,
    pub texts: HashMap<String, Vec<LegacyText>>,
    pub versions: HashMap<String, Vec<LegacyVersion>>,
    /// Version ID → body; a version with `has_body` but no entry here
    /// reads as unreadable
    pub bodies: HashMap<String, RichText>,
    pub collections: HashMap<String, Vec<LegacyCollection>>,
    pub scenes: HashMap<String, Vec<LegacyScene>>,
    pub characters: HashMap<String, Vec<LegacyCharacter>>,
    pub locations: HashMap<String, Vec<LegacyLocation>>,
    pub fail_connect: bool,
}

impl ScriptedLegacyStore {
    pub fn add_project(&mut self, name: &str) -> String {
        let id = new_id();
        self.projects.push(LegacyProject {
            id: id.clone(),
            name: name.to_string(),
            project_type: "novel".into(),
            created_on: at_day(self.projects.len() as i64),
        });
        id
    }

    pub fn add_text(&mut self, project_id: &str, name: &str, group: Option<&str>) -> String {
        let id = new_id();
        self.texts
            .entry(project_id.to_string())
            .or_default()
            .push(LegacyText {
                id: id.clone(),
                name: name.to_string(),
                group_name: group.map(String::from),
                created_on: at_day(0),
            });
        id
    }

    pub fn add_version(&mut self, text_id: &str, date: DateTime<Utc>, body: Option<RichText>) -> String {
        let id = new_id();
        let entries = self.versions.entry(text_id.to_string()).or_default();
        entries.push(LegacyVersion {
            id: id.clone(),
            date,
            version_number: entries.len() as i64 + 1,
            has_body: true,
            comment: None,
        });
        if let Some(body) = body {
            self.bodies.insert(id.clone(), body);
        }
        id
    }
}

#[async_trait]
impl LegacyStore for ScriptedLegacyStore {
    async fn connect(&mut self) -> Result<(), LegacyStoreError> {
        if self.fail_connect {
            return Err(LegacyStoreError::ConnectionFailed("scripted failure".into()));
        }
        Ok(())
    }

    async fn fetch_projects(&self) -> Result<Vec<LegacyProject>, LegacyStoreError> {
        Ok(self.projects.clone())
    }

    async fn fetch_texts(&self, project_id: &str) -> Result<Vec<LegacyText>, LegacyStoreError> {
        Ok(self.texts.get(project_id).cloned().unwrap_or_default())
    }

    async fn fetch_versions(&self, text_id: &str) -> Result<Vec<LegacyVersion>, LegacyStoreError> {
        Ok(self.versions.get(text_id).cloned().unwrap_or_default())
    }

    async fn fetch_body(&self, version_id: &str) -> Result<Option<RichText>, LegacyStoreError> {
        Ok(self.bodies.get(version_id).cloned())
    }

    async fn fetch_collections(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyCollection>, LegacyStoreError> {
        Ok(self.collections.get(project_id).cloned().unwrap_or_default())
    }

    async fn fetch_scenes(&self, project_id: &str) -> Result<Vec<LegacyScene>, LegacyStoreError> {
        Ok(self.scenes.get(project_id).cloned().unwrap_or_default())
    }

    async fn fetch_characters(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyCharacter>, LegacyStoreError> {
        Ok(self.characters.get(project_id).cloned().unwrap_or_default())
    }

    async fn fetch_locations(
        &self,
        project_id: &str,
    ) -> Result<Vec<LegacyLocation>, LegacyStoreError> {
        Ok(self.locations.get(project_id).cloned().unwrap_or_default())
    }
}
