//! Import result types.

use serde::Serialize;

/// What kind of entity a bundle file produced.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AssetKind {
    /// A database connection definition.
    Database,
    /// A saved query.
    SavedQuery,
}

/// A single asset accepted from the bundle.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImportedAsset {
    /// Logical bundle path the asset was read from.
    pub path: String,
    /// The kind of entity the file described.
    pub kind: AssetKind,
    /// Display name (database name or query label).
    pub name: String,
}

/// Result of a successful import.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImportReport {
    /// Version label of the handler that applied the bundle.
    pub version: String,
    /// Whether the import was allowed to replace existing entities.
    pub overwrite: bool,
    /// Assets accepted from the bundle.
    pub assets: Vec<ImportedAsset>,
}

impl ImportReport {
    /// Number of database definitions in the report.
    #[must_use]
    pub fn database_count(&self) -> usize {
        self.assets
            .iter()
            .filter(|a| a.kind == AssetKind::Database)
            .count()
    }

    /// Number of saved queries in the report.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.assets
            .iter()
            .filter(|a| a.kind == AssetKind::SavedQuery)
            .count()
    }
}
