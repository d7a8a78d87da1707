//! Version 1.0.0 saved-query bundle importer.
//!
//! Recognition and validation are separate concerns here: a bundle without
//! a `metadata.yaml`, or whose version field names another format, is
//! simply not ours and dispatch moves on; a bundle that declares 1.0.0 and
//! then fails schema checks ends the dispatch with its findings.

mod assets;
mod metadata;

pub use assets::{DatabaseConfig, SavedQueryConfig};
pub use metadata::{IMPORT_VERSION, METADATA_FILE_NAME, Metadata};

use std::collections::BTreeSet;

use tracing::info;
use uuid::Uuid;

use crate::bundle::ImportBundle;
use crate::config::ImportOptions;
use crate::error::ValidationError;
use crate::handler::{HandlerOutcome, ImportHandler};
use crate::report::{AssetKind, ImportReport, ImportedAsset};

fn is_yaml(path: &str) -> bool {
    path.ends_with(".yaml") || path.ends_with(".yml")
}

/// Imports saved-query bundles exported in format 1.0.0.
///
/// A 1.0.0 bundle carries a `metadata.yaml` declaring the format version,
/// database definitions under `databases/`, and saved queries under
/// `queries/`, all siblings of the metadata file. Validation findings are
/// accumulated across every asset file before the bundle is rejected, so
/// one pass reports everything that is wrong.
#[derive(Debug, Clone, Copy)]
pub struct SavedQueryImporter {
    options: ImportOptions,
}

impl SavedQueryImporter {
    /// A v1 importer with the given passthrough options.
    #[must_use]
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }
}

impl ImportHandler for SavedQueryImporter {
    fn version(&self) -> &'static str {
        IMPORT_VERSION
    }

    fn run(&self, bundle: &ImportBundle) -> HandlerOutcome {
        let (meta_path, _metadata) = match metadata::load_metadata(bundle) {
            metadata::MetadataOutcome::VersionMismatch => return HandlerOutcome::Mismatch,
            metadata::MetadataOutcome::Invalid(errors) => return HandlerOutcome::Invalid(errors),
            metadata::MetadataOutcome::Ok { path, metadata } => (path, metadata),
        };

        // Assets live next to the metadata file; export tools usually wrap
        // the whole bundle in a top-level directory.
        let base = meta_path.rfind('/').map_or("", |idx| &meta_path[..=idx]);

        let mut errors: Vec<ValidationError> = Vec::new();
        let mut databases: Vec<(String, DatabaseConfig)> = Vec::new();
        let mut queries: Vec<(String, SavedQueryConfig)> = Vec::new();

        for (path, content) in bundle.iter() {
            if path == meta_path || !is_yaml(path) {
                continue;
            }
            let Some(rel) = path.strip_prefix(base) else {
                continue;
            };
            if rel.starts_with(assets::DATABASES_PREFIX) {
                if let Some(config) = assets::load_database(path, content, &mut errors) {
                    databases.push((path.to_owned(), config));
                }
            } else if rel.starts_with(assets::QUERIES_PREFIX) {
                if let Some(config) = assets::load_saved_query(path, content, &mut errors) {
                    queries.push((path.to_owned(), config));
                }
            }
            // Anything outside databases/ and queries/ is not part of a
            // saved-query export and is left alone.
        }

        // Every query referencing a database must find it in the bundle.
        let known: BTreeSet<Uuid> = databases.iter().map(|(_, db)| db.uuid).collect();
        for (path, query) in &queries {
            if let Some(database_uuid) = query.database_uuid
                && !known.contains(&database_uuid)
            {
                errors.push(ValidationError::in_field(
                    path.clone(),
                    "database_uuid",
                    format!("database {database_uuid} is not part of the bundle"),
                ));
            }
        }

        if !errors.is_empty() {
            return HandlerOutcome::Invalid(errors);
        }

        let mut imported: Vec<ImportedAsset> = Vec::with_capacity(databases.len() + queries.len());
        for (path, database) in databases {
            imported.push(ImportedAsset {
                path,
                kind: AssetKind::Database,
                name: database.database_name,
            });
        }
        for (path, query) in queries {
            imported.push(ImportedAsset {
                path,
                kind: AssetKind::SavedQuery,
                name: query.label,
            });
        }

        info!(
            version = IMPORT_VERSION,
            assets = imported.len(),
            overwrite = self.options.overwrite,
            "saved-query bundle applied"
        );

        HandlerOutcome::Applied(ImportReport {
            version: IMPORT_VERSION.to_owned(),
            overwrite: self.options.overwrite,
            assets: imported,
        })
    }
}
