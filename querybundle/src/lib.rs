//! # querybundle
//!
//! Version-tolerant import for saved-query export bundles.
//!
//! An export bundle is an opaque mapping from logical file paths to file
//! contents. Import is dispatched across an ordered list of versioned
//! handlers: each handler either recognizes the bundle and settles the
//! import (success or validation failure), or reports a mismatch and the
//! next handler gets a look. Handlers are tried most-recent-version-first.
//!
//! ## Quick Start
//!
//! ```rust
//! use querybundle::{ImportBundle, ImportDispatcher, ImportOptions};
//!
//! let bundle: ImportBundle = [(
//!     "queries/metadata.yaml".to_owned(),
//!     "version: 1.0.0\ntype: SavedQuery\n".to_owned(),
//! )]
//! .into_iter()
//! .collect();
//!
//! let dispatcher = ImportDispatcher::with_default_handlers(ImportOptions::default());
//! let report = dispatcher.run(&bundle).unwrap();
//! assert_eq!(report.version, "1.0.0");
//! ```

mod bundle;
mod config;
mod dispatcher;
mod error;
mod handler;
pub mod output;
mod report;
mod source;
pub mod v1;

pub use bundle::ImportBundle;
pub use config::{FsBundleConfig, ImportOptions};
pub use dispatcher::ImportDispatcher;
pub use error::{ImportError, ValidationError};
pub use handler::{HandlerOutcome, ImportHandler};
pub use report::{AssetKind, ImportReport, ImportedAsset};
pub use source::fs::{LoadError, load_dir};
