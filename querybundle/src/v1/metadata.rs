//! Metadata file handling for 1.0.0 bundles.
//!
//! The metadata file is how a versioned export identifies itself. Its
//! absence, or a version field naming another format, routes the bundle
//! past this importer; everything else wrong with it is a validation
//! failure that ends the dispatch.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::bundle::ImportBundle;
use crate::error::ValidationError;
use crate::v1::assets::validate_against_schema;

/// File that identifies a versioned export bundle.
pub const METADATA_FILE_NAME: &str = "metadata.yaml";

/// The export format version this importer understands.
pub const IMPORT_VERSION: &str = "1.0.0";

/// The entity type a saved-query bundle declares.
pub const BUNDLE_TYPE: &str = "SavedQuery";

/// Parsed contents of `metadata.yaml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    /// Export format version.
    pub version: String,
    /// Declared entity type, when present.
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    /// Export timestamp, when present (RFC 3339).
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// How metadata inspection turned out.
#[derive(Debug)]
pub(crate) enum MetadataOutcome {
    /// Metadata found and valid for this format version.
    Ok {
        /// Bundle path the metadata was read from.
        path: String,
        metadata: Metadata,
    },
    /// No metadata file, or a version field naming another format —
    /// an unversioned or foreign export that is not ours to judge.
    VersionMismatch,
    /// Metadata claims this version but its content is broken.
    Invalid(Vec<ValidationError>),
}

fn metadata_schema() -> Value {
    json!({
        "type": "object",
        "required": ["version"],
        "properties": {
            "version": { "type": "string" },
            "type": { "type": "string" },
            "timestamp": { "type": "string" },
        },
    })
}

/// Locate and check the bundle metadata.
///
/// The shallowest `metadata.yaml` in the bundle wins; export tools may
/// place it at the root or under a single top-level directory.
pub(crate) fn load_metadata(bundle: &ImportBundle) -> MetadataOutcome {
    let candidates = bundle.find_by_file_name(METADATA_FILE_NAME);
    let Some(path) = candidates.first().copied() else {
        // A bundle with no metadata predates versioned exports.
        return MetadataOutcome::VersionMismatch;
    };
    let Some(content) = bundle.get(path) else {
        return MetadataOutcome::VersionMismatch;
    };

    let value: Value = match serde_saphyr::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            return MetadataOutcome::Invalid(vec![ValidationError::file_level(
                path,
                format!("not a valid YAML file: {e}"),
            )]);
        }
    };

    let Some(mapping) = value.as_object() else {
        return MetadataOutcome::Invalid(vec![ValidationError::file_level(
            path,
            "metadata is not a YAML mapping",
        )]);
    };

    // A missing or foreign version means the bundle belongs to some other
    // format; only a matching version puts the rest of the file on trial.
    match mapping.get("version").and_then(Value::as_str) {
        Some(IMPORT_VERSION) => {}
        _ => return MetadataOutcome::VersionMismatch,
    }

    let mut errors = validate_against_schema(path, &metadata_schema(), &value);

    let metadata: Metadata = match serde_json::from_value(value) {
        Ok(metadata) => metadata,
        Err(e) => {
            errors.push(ValidationError::file_level(path, e.to_string()));
            return MetadataOutcome::Invalid(errors);
        }
    };

    if let Some(entity_type) = &metadata.entity_type
        && entity_type != BUNDLE_TYPE
    {
        errors.push(ValidationError::in_field(
            path,
            "type",
            format!("must be equal to {BUNDLE_TYPE}"),
        ));
    }

    if let Some(timestamp) = &metadata.timestamp
        && DateTime::parse_from_rfc3339(timestamp).is_err()
    {
        errors.push(ValidationError::in_field(
            path,
            "timestamp",
            "not a valid RFC 3339 timestamp",
        ));
    }

    if errors.is_empty() {
        MetadataOutcome::Ok {
            path: path.to_owned(),
            metadata,
        }
    } else {
        MetadataOutcome::Invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle_with_metadata(content: &str) -> ImportBundle {
        let mut bundle = ImportBundle::new();
        bundle.insert(METADATA_FILE_NAME, content);
        bundle
    }

    #[test]
    fn test_matching_version_is_ok() {
        let bundle = bundle_with_metadata(
            "version: 1.0.0\ntype: SavedQuery\ntimestamp: '2021-03-30T20:37:54+00:00'\n",
        );
        let outcome = load_metadata(&bundle);
        let MetadataOutcome::Ok { path, metadata } = outcome else {
            panic!("expected Ok, got {outcome:?}");
        };
        assert_eq!(path, METADATA_FILE_NAME);
        assert_eq!(metadata.version, IMPORT_VERSION);
        assert_eq!(metadata.entity_type.as_deref(), Some(BUNDLE_TYPE));
    }

    #[test]
    fn test_version_only_metadata_is_ok() {
        // type and timestamp are optional
        let outcome = load_metadata(&bundle_with_metadata("version: 1.0.0"));
        assert!(matches!(outcome, MetadataOutcome::Ok { .. }), "got {outcome:?}");
    }

    #[test]
    fn test_missing_file_is_version_mismatch() {
        let outcome = load_metadata(&ImportBundle::new());
        assert!(matches!(outcome, MetadataOutcome::VersionMismatch));
    }

    #[test]
    fn test_missing_version_field_is_version_mismatch() {
        let outcome = load_metadata(&bundle_with_metadata("type: SavedQuery\n"));
        assert!(matches!(outcome, MetadataOutcome::VersionMismatch));
    }

    #[test]
    fn test_foreign_version_is_version_mismatch() {
        let outcome = load_metadata(&bundle_with_metadata("version: 2.0.0\n"));
        assert!(matches!(outcome, MetadataOutcome::VersionMismatch));
    }

    #[test]
    fn test_unparseable_yaml_is_invalid() {
        let outcome = load_metadata(&bundle_with_metadata(": : :\n  - [unclosed\n"));
        let MetadataOutcome::Invalid(errors) = outcome else {
            panic!("expected Invalid, got {outcome:?}");
        };
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("not a valid YAML file"));
    }

    #[test]
    fn test_non_mapping_metadata_is_invalid() {
        let outcome = load_metadata(&bundle_with_metadata("- just\n- a\n- list\n"));
        let MetadataOutcome::Invalid(errors) = outcome else {
            panic!("expected Invalid, got {outcome:?}");
        };
        assert!(errors[0].message.contains("not a YAML mapping"));
    }

    #[test]
    fn test_bad_timestamp_is_invalid() {
        let outcome =
            load_metadata(&bundle_with_metadata("version: 1.0.0\ntimestamp: yesterday\n"));
        let MetadataOutcome::Invalid(errors) = outcome else {
            panic!("expected Invalid, got {outcome:?}");
        };
        assert!(errors.iter().any(|e| e.field == "timestamp"), "got: {errors:?}");
    }

    #[test]
    fn test_nested_metadata_is_found() {
        let mut bundle = ImportBundle::new();
        bundle.insert("saved_query_export/metadata.yaml", "version: 1.0.0\n");
        let outcome = load_metadata(&bundle);
        let MetadataOutcome::Ok { path, .. } = outcome else {
            panic!("expected Ok, got {outcome:?}");
        };
        assert_eq!(path, "saved_query_export/metadata.yaml");
    }
}
