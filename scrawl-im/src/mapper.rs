//! Legacy record → new-model mapping
//!
//! Pure transformation functions, one per legacy entity kind. Content-level
//! anomalies (unparseable identifier, missing body, unknown type or group
//! token) are absorbed into a warning plus a best-effort default; a mapping
//! only fails with a typed error when a required relationship cannot be
//! resolved, which callers handle at item or project granularity.

use crate::import::DiagnosticsCollector;
use crate::models::{
    LegacyCharacter, LegacyCollection, LegacyLocation, LegacyProject, LegacyScene, LegacyText,
    LegacyVersion,
};
use crate::transcode::{self, RichText};
use once_cell::sync::Lazy;
use scrawl_common::models::{
    Folder, Project, ProjectStatus, ProjectType, StandardFolder, Submission, TextFile, Version,
};
use scrawl_common::uuid_utils;
use std::collections::HashMap;
use uuid::Uuid;

/// Fallback content stored when a version's body cannot be read, keeping
/// the version history structurally intact
pub const UNREADABLE_BODY_PLACEHOLDER: &str = "[content could not be recovered]";

/// Delimiter between a legacy project name and its creation-timestamp
/// suffix
const NAME_SUFFIX_DELIMITER: &str = "<>";

/// Legacy free-text group labels → destination folder
static FOLDER_NAME_TABLE: Lazy<HashMap<&'static str, StandardFolder>> = Lazy::new(|| {
    HashMap::from([
        ("draft", StandardFolder::Draft),
        ("ready", StandardFolder::Ready),
        ("set aside", StandardFolder::SetAside),
        ("accepted", StandardFolder::Published),
        ("published", StandardFolder::Published),
        ("collection", StandardFolder::Collections),
        ("collections", StandardFolder::Collections),
        ("submissions", StandardFolder::Submissions),
        ("submitted", StandardFolder::Submissions),
        ("research", StandardFolder::Research),
        ("trash", StandardFolder::Trash),
    ])
});

/// Strip the `<>`-delimited creation-timestamp suffix from a legacy
/// project name
pub fn clean_project_name(raw: &str) -> &str {
    match raw.split_once(NAME_SUFFIX_DELIMITER) {
        Some((name, _)) => name,
        None => raw,
    }
}

/// Map a legacy project to a new-model project.
///
/// Never fails: an unknown type token maps to `Blank` and a bad identifier
/// is replaced with a minted one (both warned). The project lands in
/// `PendingReview` so the UI can flag it as imported but unverified.
pub fn map_project(legacy: &LegacyProject, diag: &mut DiagnosticsCollector) -> Project {
    let name = clean_project_name(&legacy.name).to_string();
    let (id, minted) = uuid_utils::carry_over(&legacy.id);
    if minted {
        diag.warn(
            name.clone(),
            "BAD_IDENTIFIER",
            format!("legacy project id '{}' is not a UUID, minted a new one", legacy.id),
        );
    }

    let project_type = ProjectType::from_token(&legacy.project_type);
    if project_type == ProjectType::Blank && legacy.project_type != "blank" {
        diag.warn(
            name.clone(),
            "UNKNOWN_PROJECT_TYPE",
            format!("unknown legacy project type '{}', using blank", legacy.project_type),
        );
    }

    Project {
        id,
        name,
        project_type,
        status: ProjectStatus::PendingReview,
        created_at: legacy.created_on,
        modified_at: legacy.created_on,
    }
}

/// Map a legacy text to a text file owned by the given folder
pub fn map_text_file(
    legacy: &LegacyText,
    folder_id: Uuid,
    diag: &mut DiagnosticsCollector,
) -> TextFile {
    let (id, minted) = uuid_utils::carry_over(&legacy.id);
    if minted {
        diag.warn(
            legacy.name.clone(),
            "BAD_IDENTIFIER",
            format!("legacy text id '{}' is not a UUID, minted a new one", legacy.id),
        );
    }

    TextFile {
        id,
        name: legacy.name.clone(),
        folder_id,
        created_at: legacy.created_on,
        modified_at: legacy.created_on,
    }
}

/// Map one legacy version.
///
/// `body` is the fetched rich document, or None when the store had no
/// readable body. A referenced-but-unreadable body is replaced with the
/// sentinel placeholder and warned; a version that never had a body gets
/// empty content silently. Serializer fallback to plain text is warned
/// here, not in the transcoder.
pub fn map_version(
    legacy: &LegacyVersion,
    body: Option<&RichText>,
    text_file_id: Uuid,
    version_number: i64,
    diag: &mut DiagnosticsCollector,
) -> Version {
    let (id, minted) = uuid_utils::carry_over(&legacy.id);
    if minted {
        diag.warn(
            format!("version {}", legacy.id),
            "BAD_IDENTIFIER",
            format!("legacy version id '{}' is not a UUID, minted a new one", legacy.id),
        );
    }

    let (content, formatted_content) = match body {
        Some(doc) => {
            let result = transcode::convert(doc, true);
            if result.degraded {
                diag.warn(
                    format!("version {}", legacy.id),
                    "FORMATTING_DROPPED",
                    "rich text could not be serialized, stored plain text only",
                );
            }
            (result.plain_text, result.formatted)
        }
        None => {
            if legacy.has_body {
                diag.warn(
                    format!("version {}", legacy.id),
                    "MISSING_BODY",
                    "version references a body that could not be read, stored placeholder",
                );
                (UNREADABLE_BODY_PLACEHOLDER.to_string(), None)
            } else {
                (String::new(), None)
            }
        }
    };

    Version {
        id,
        text_file_id,
        version_number,
        created_at: legacy.date,
        comment: legacy.comment.clone(),
        content,
        formatted_content,
    }
}

/// Look up a legacy group label, case-insensitively; None when the label
/// is not in the fixed table
pub fn lookup_folder_name(raw: &str) -> Option<StandardFolder> {
    let key = raw.trim().to_lowercase();
    FOLDER_NAME_TABLE.get(key.as_str()).copied()
}

/// Map a legacy free-text group label to a standard folder.
///
/// Case-insensitive; unrecognized or empty input defaults to `Draft` — it
/// is safer to mis-file an item into Draft than to drop it.
pub fn map_folder_name(raw: &str) -> StandardFolder {
    lookup_folder_name(raw).unwrap_or(StandardFolder::Draft)
}

/// Build the standard folder taxonomy for a project
pub fn standard_folders(project_id: Uuid) -> Vec<(StandardFolder, Folder)> {
    StandardFolder::ALL
        .iter()
        .map(|kind| {
            (
                *kind,
                Folder {
                    id: uuid_utils::generate(),
                    name: kind.name().to_string(),
                    project_id,
                    parent_folder_id: None,
                },
            )
        })
        .collect()
}

/// Map a legacy collection to a personal-collection submission.
///
/// Legacy collection/submission linkage is not carried over; when the
/// legacy record was submission-typed this is recorded as a warning.
pub fn map_collection(
    legacy: &LegacyCollection,
    project_id: Uuid,
    diag: &mut DiagnosticsCollector,
) -> Submission {
    let (id, minted) = uuid_utils::carry_over(&legacy.id);
    if minted {
        diag.warn(
            legacy.name.clone(),
            "BAD_IDENTIFIER",
            format!("legacy collection id '{}' is not a UUID, minted a new one", legacy.id),
        );
    }

    if legacy.collection_type.eq_ignore_ascii_case("submission") {
        diag.warn(
            legacy.name.clone(),
            "SUBMISSION_LINK_SKIPPED",
            "legacy submission linkage is not mapped, imported as a personal collection",
        );
    }

    Submission::collection(id, legacy.name.clone(), project_id, legacy.created_on, None)
}

/// Map a legacy scene to a text file with one empty initial version
pub fn map_scene(
    legacy: &LegacyScene,
    folder_id: Uuid,
    diag: &mut DiagnosticsCollector,
) -> (TextFile, Version) {
    let (id, minted) = uuid_utils::carry_over(&legacy.id);
    if minted {
        diag.warn(
            legacy.name.clone(),
            "BAD_IDENTIFIER",
            format!("legacy scene id '{}' is not a UUID, minted a new one", legacy.id),
        );
    }
    let file = TextFile {
        id,
        name: legacy.name.clone(),
        folder_id,
        created_at: legacy.created_on,
        modified_at: legacy.created_on,
    };
    let version = initial_version(&file, None);
    (file, version)
}

/// Map a legacy character sheet; the description becomes the initial
/// version's content
pub fn map_character(
    legacy: &LegacyCharacter,
    folder_id: Uuid,
    diag: &mut DiagnosticsCollector,
) -> (TextFile, Version) {
    map_sheet(
        &legacy.id,
        &legacy.name,
        legacy.description.as_deref(),
        legacy.created_on,
        folder_id,
        diag,
    )
}

/// Map a legacy location sheet; the description becomes the initial
/// version's content
pub fn map_location(
    legacy: &LegacyLocation,
    folder_id: Uuid,
    diag: &mut DiagnosticsCollector,
) -> (TextFile, Version) {
    map_sheet(
        &legacy.id,
        &legacy.name,
        legacy.description.as_deref(),
        legacy.created_on,
        folder_id,
        diag,
    )
}

fn map_sheet(
    legacy_id: &str,
    name: &str,
    description: Option<&str>,
    created_on: chrono::DateTime<chrono::Utc>,
    folder_id: Uuid,
    diag: &mut DiagnosticsCollector,
) -> (TextFile, Version) {
    let (id, minted) = uuid_utils::carry_over(legacy_id);
    if minted {
        diag.warn(
            name.to_string(),
            "BAD_IDENTIFIER",
            format!("legacy id '{}' is not a UUID, minted a new one", legacy_id),
        );
    }
    let file = TextFile {
        id,
        name: name.to_string(),
        folder_id,
        created_at: created_on,
        modified_at: created_on,
    };
    let version = initial_version(&file, description);
    (file, version)
}

/// Synthesize the single initial version every mapped text artifact
/// carries, so a non-null current version always exists
fn initial_version(file: &TextFile, content: Option<&str>) -> Version {
    Version {
        id: uuid_utils::generate(),
        text_file_id: file.id,
        version_number: 1,
        created_at: file.created_at,
        comment: None,
        content: content.map(transcode::scrub_text).unwrap_or_default(),
        formatted_content: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn diag() -> DiagnosticsCollector {
        DiagnosticsCollector::new()
    }

    #[test]
    fn project_name_suffix_is_stripped_on_first_delimiter() {
        assert_eq!(clean_project_name("My Novel<>2019-03-01T10:00:00Z"), "My Novel");
        assert_eq!(clean_project_name("a<>b<>c"), "a");
        assert_eq!(clean_project_name("No Suffix"), "No Suffix");
    }

    #[test]
    fn unknown_project_type_defaults_to_blank_with_warning() {
        let mut d = diag();
        let legacy = LegacyProject {
            id: Uuid::new_v4().to_string(),
            name: "P".into(),
            project_type: "screenplay".into(),
            created_on: Utc::now(),
        };
        let project = map_project(&legacy, &mut d);
        assert_eq!(project.project_type, ProjectType::Blank);
        assert_eq!(project.status, ProjectStatus::PendingReview);
        assert_eq!(d.warning_count(), 1);
    }

    #[test]
    fn bad_identifier_mints_and_warns_but_keeps_entity() {
        let mut d = diag();
        let legacy = LegacyProject {
            id: "x-legacy://Project/7".into(),
            name: "Kept".into(),
            project_type: "novel".into(),
            created_on: Utc::now(),
        };
        let project = map_project(&legacy, &mut d);
        assert_eq!(project.name, "Kept");
        assert_eq!(d.warning_count(), 1);
        assert_eq!(d.error_count(), 0);
    }

    #[test]
    fn folder_name_lookup_is_case_insensitive_with_draft_default() {
        assert_eq!(map_folder_name("Draft"), StandardFolder::Draft);
        assert_eq!(map_folder_name("SET ASIDE"), StandardFolder::SetAside);
        assert_eq!(map_folder_name("accepted"), StandardFolder::Published);
        assert_eq!(map_folder_name("Submitted"), StandardFolder::Submissions);
        assert_eq!(map_folder_name(""), StandardFolder::Draft);
        assert_eq!(map_folder_name("attic"), StandardFolder::Draft);
    }

    #[test]
    fn missing_referenced_body_gets_sentinel_and_warning() {
        let mut d = diag();
        let legacy = LegacyVersion {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            version_number: 1,
            has_body: true,
            comment: None,
        };
        let version = map_version(&legacy, None, Uuid::new_v4(), 1, &mut d);
        assert_eq!(version.content, UNREADABLE_BODY_PLACEHOLDER);
        assert!(version.formatted_content.is_none());
        assert_eq!(d.warning_count(), 1);
    }

    #[test]
    fn bodyless_version_is_empty_without_warning() {
        let mut d = diag();
        let legacy = LegacyVersion {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            version_number: 1,
            has_body: false,
            comment: None,
        };
        let version = map_version(&legacy, None, Uuid::new_v4(), 1, &mut d);
        assert_eq!(version.content, "");
        assert_eq!(d.warning_count(), 0);
    }

    #[test]
    fn formatted_body_is_transcoded() {
        use crate::transcode::{FormatRun, RunAttrs};
        let mut d = diag();
        let doc = RichText {
            text: "bold text".into(),
            runs: vec![FormatRun {
                start: 0,
                len: 4,
                attrs: RunAttrs {
                    bold: true,
                    ..Default::default()
                },
            }],
            paragraphs: Vec::new(),
        };
        let legacy = LegacyVersion {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            version_number: 1,
            has_body: true,
            comment: Some("draft two".into()),
        };
        let version = map_version(&legacy, Some(&doc), Uuid::new_v4(), 2, &mut d);
        assert_eq!(version.content, "bold text");
        assert_eq!(version.version_number, 2);
        assert_eq!(version.comment.as_deref(), Some("draft two"));
        assert!(version.formatted_content.is_some());
        assert_eq!(d.warning_count(), 0);
    }

    #[test]
    fn character_description_becomes_initial_version() {
        let mut d = diag();
        let legacy = LegacyCharacter {
            id: Uuid::new_v4().to_string(),
            name: "Mira".into(),
            description: Some("Retired cartographer.".into()),
            created_on: Utc::now(),
        };
        let (file, version) = map_character(&legacy, Uuid::new_v4(), &mut d);
        assert_eq!(file.name, "Mira");
        assert_eq!(version.version_number, 1);
        assert_eq!(version.content, "Retired cartographer.");
        assert_eq!(version.text_file_id, file.id);
    }

    #[test]
    fn scene_gets_empty_initial_version() {
        let mut d = diag();
        let legacy = LegacyScene {
            id: Uuid::new_v4().to_string(),
            name: "Opening".into(),
            created_on: Utc::now(),
        };
        let (_, version) = map_scene(&legacy, Uuid::new_v4(), &mut d);
        assert_eq!(version.content, "");
        assert_eq!(version.version_number, 1);
    }

    #[test]
    fn submission_typed_collection_warns_about_linkage() {
        let mut d = diag();
        let legacy = LegacyCollection {
            id: Uuid::new_v4().to_string(),
            name: "Spring round".into(),
            collection_type: "submission".into(),
            created_on: Utc::now(),
        };
        let submission = map_collection(&legacy, Uuid::new_v4(), &mut d);
        assert!(submission.is_collection);
        assert!(submission.publication.is_none());
        assert_eq!(d.warning_count(), 1);
    }

    #[test]
    fn standard_folders_cover_the_whole_taxonomy() {
        let project = Uuid::new_v4();
        let folders = standard_folders(project);
        assert_eq!(folders.len(), StandardFolder::ALL.len());
        assert!(folders.iter().all(|(_, f)| f.project_id == project));
    }
}
