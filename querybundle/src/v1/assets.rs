//! Database and saved-query asset files for 1.0.0 bundles.
//!
//! Each asset file is checked in two passes: an embedded JSON Schema over
//! the raw YAML document (reported per field), then a typed load that also
//! enforces UUID syntax. Findings from every file are accumulated so a
//! single import attempt reports everything that is wrong.

use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ValidationError;

/// Directory holding database definitions, relative to the metadata file.
pub(crate) const DATABASES_PREFIX: &str = "databases/";

/// Directory holding saved queries, relative to the metadata file.
pub(crate) const QUERIES_PREFIX: &str = "queries/";

/// A database connection shipped with the bundle.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Display name of the database.
    pub database_name: String,
    /// Stable identity used by queries to reference this database.
    pub uuid: Uuid,
    /// Connection string, when exported.
    #[serde(default)]
    pub sqlalchemy_uri: Option<String>,
    /// Asset format version, when exported.
    #[serde(default)]
    pub version: Option<String>,
}

/// A saved query shipped with the bundle.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SavedQueryConfig {
    /// Display label of the query.
    pub label: String,
    /// The SQL text itself.
    pub sql: String,
    /// Stable identity of the query.
    pub uuid: Uuid,
    /// Free-form description, when present.
    #[serde(default)]
    pub description: Option<String>,
    /// Database schema the query runs against.
    #[serde(default)]
    pub schema: Option<String>,
    /// Reference to a database shipped in the same bundle.
    #[serde(default)]
    pub database_uuid: Option<Uuid>,
    /// Asset format version, when exported.
    #[serde(default)]
    pub version: Option<String>,
}

fn database_schema() -> Value {
    json!({
        "type": "object",
        "required": ["database_name", "uuid"],
        "properties": {
            "database_name": { "type": "string", "minLength": 1 },
            "uuid": { "type": "string" },
            "sqlalchemy_uri": { "type": "string" },
            "version": { "type": "string" },
        },
    })
}

fn saved_query_schema() -> Value {
    json!({
        "type": "object",
        "required": ["label", "sql", "uuid"],
        "properties": {
            "label": { "type": "string", "minLength": 1 },
            "sql": { "type": "string" },
            "uuid": { "type": "string" },
            "description": { "type": "string" },
            "schema": { "type": "string" },
            "database_uuid": { "type": "string" },
            "version": { "type": "string" },
        },
    })
}

/// Validate `instance` against `schema`, one finding per violation.
///
/// The validator is built per call; a schema that fails to compile is
/// reported as a file-level finding rather than a panic, since embedded
/// schemas and user content flow through the same path.
pub(crate) fn validate_against_schema(
    file: &str,
    schema: &Value,
    instance: &Value,
) -> Vec<ValidationError> {
    match jsonschema::validator_for(schema) {
        Ok(validator) => validator
            .iter_errors(instance)
            .map(|error| ValidationError {
                file: file.to_owned(),
                field: error.instance_path().to_string(),
                message: error.to_string(),
            })
            .collect(),
        Err(e) => vec![ValidationError::file_level(
            file,
            format!("failed to compile schema: {e}"),
        )],
    }
}

fn parse_yaml(path: &str, content: &str, errors: &mut Vec<ValidationError>) -> Option<Value> {
    match serde_saphyr::from_str(content) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(ValidationError::file_level(
                path,
                format!("not a valid YAML file: {e}"),
            ));
            None
        }
    }
}

fn load_asset<T: for<'de> Deserialize<'de>>(
    path: &str,
    content: &str,
    schema: &Value,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    let value = parse_yaml(path, content, errors)?;

    let schema_errors = validate_against_schema(path, schema, &value);
    if !schema_errors.is_empty() {
        errors.extend(schema_errors);
        return None;
    }

    match serde_json::from_value(value) {
        Ok(config) => Some(config),
        Err(e) => {
            // Shape already passed the schema; this catches value-level
            // problems such as a malformed UUID.
            errors.push(ValidationError::file_level(path, e.to_string()));
            None
        }
    }
}

/// Load a database definition, pushing findings on failure.
pub(crate) fn load_database(
    path: &str,
    content: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<DatabaseConfig> {
    load_asset(path, content, &database_schema(), errors)
}

/// Load a saved query, pushing findings on failure.
pub(crate) fn load_saved_query(
    path: &str,
    content: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<SavedQueryConfig> {
    load_asset(path, content, &saved_query_schema(), errors)
}
