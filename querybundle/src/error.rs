//! Error types for bundle import.

use serde::Serialize;
use thiserror::Error;

/// A single validation finding tied to a file in the bundle.
///
/// These describe content a handler has claimed and rejected. A bundle a
/// handler does not recognize at all never produces findings — it produces
/// a format mismatch, which stays internal to the dispatcher.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ValidationError {
    /// Logical bundle path the finding refers to.
    pub file: String,
    /// Locator within the file (a field name or JSON-pointer-like path);
    /// empty for file-level findings such as a parse failure.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl ValidationError {
    /// A finding about the file as a whole.
    #[must_use]
    pub fn file_level(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            field: String::new(),
            message: message.into(),
        }
    }

    /// A finding about a specific field within the file.
    #[must_use]
    pub fn in_field(
        file: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Format the finding for human-readable output.
    ///
    /// With a field locator: `{file}: {message} (at {field})`
    /// Without one: `{file}: {message}`
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        if self.field.is_empty() {
            format!("{}: {}", self.file, self.message)
        } else {
            format!("{}: {} (at {})", self.file, self.message, self.field)
        }
    }
}

/// Terminal import failures surfaced to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    /// Every handler reported a format mismatch, or no handlers were
    /// configured at all.
    #[error("could not find a valid handler to import bundle")]
    NoHandlerFound,

    /// A handler claimed the format but the content failed validation.
    /// Findings are propagated verbatim from the claiming handler; no
    /// later handler is consulted.
    #[error("error importing bundle as version {version}: {} validation error(s)", .errors.len())]
    Invalid {
        /// Version label of the handler that claimed the bundle.
        version: String,
        /// All findings the handler collected.
        errors: Vec<ValidationError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_finding() {
        let err = ValidationError::in_field("metadata.yaml", "type", "must be equal to SavedQuery");
        let formatted = err.format_human_readable();
        assert_eq!(
            formatted,
            "metadata.yaml: must be equal to SavedQuery (at type)"
        );
    }

    #[test]
    fn test_format_file_level_finding() {
        let err = ValidationError::file_level("queries/q.yaml", "not a valid YAML file");
        let formatted = err.format_human_readable();
        assert_eq!(formatted, "queries/q.yaml: not a valid YAML file");
        assert!(!formatted.contains("(at"));
    }

    #[test]
    fn test_invalid_error_message_counts_findings() {
        let err = ImportError::Invalid {
            version: "1.0.0".to_owned(),
            errors: vec![
                ValidationError::file_level("a.yaml", "bad"),
                ValidationError::file_level("b.yaml", "worse"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("1.0.0"), "got: {msg}");
        assert!(msg.contains("2 validation error(s)"), "got: {msg}");
    }
}
