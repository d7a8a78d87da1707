//! Shared output formatting for import results.
//!
//! Provides JSON and plain-text formatters for [`ImportReport`] and
//! [`ImportError`]. Color/terminal formatting is intentionally excluded
//! from this module — that concern belongs to the CLI layer.

use std::io::Write;

use crate::error::ImportError;
use crate::report::{AssetKind, ImportReport};

/// Format an [`ImportReport`] as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ImportReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format an [`ImportReport`] as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ImportReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  SAVED QUERY BUNDLE IMPORT")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Format version:  {}", report.version)?;
    writeln!(writer, "  Databases:       {}", report.database_count())?;
    writeln!(writer, "  Saved queries:   {}", report.query_count())?;
    writeln!(writer, "  Overwrite:       {}", report.overwrite)?;
    writeln!(writer)?;

    if !report.assets.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  IMPORTED ASSETS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for asset in &report.assets {
            let kind = match asset.kind {
                AssetKind::Database => "database",
                AssetKind::SavedQuery => "query",
            };
            writeln!(writer, "  [{kind}] {} ({})", asset.name, asset.path)?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(
        writer,
        "\u{2713} Imported {} asset(s) as format {}",
        report.assets.len(),
        report.version
    )?;
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}

/// Format an [`ImportError`] as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_error_human(error: &ImportError, writer: &mut dyn Write) -> anyhow::Result<()> {
    match error {
        ImportError::NoHandlerFound => {
            writeln!(writer, "\u{2717} {error}")?;
            writeln!(
                writer,
                "  The bundle does not look like a versioned saved-query export."
            )?;
            writeln!(
                writer,
                "  Check that it contains a metadata.yaml with a known version field."
            )?;
        }
        ImportError::Invalid { version, errors } => {
            writeln!(writer, "\u{2717} {error}")?;
            writeln!(writer, "{}", "-".repeat(80))?;
            writeln!(writer, "  VALIDATION ERRORS (format {version})")?;
            writeln!(writer, "{}", "-".repeat(80))?;
            for finding in errors {
                writeln!(writer, "  {}", finding.format_human_readable())?;
            }
        }
    }

    Ok(())
}
