//! The seam between the dispatcher and version-specific importers.

use crate::bundle::ImportBundle;
use crate::error::ValidationError;
use crate::report::ImportReport;

/// The verdict a handler reaches about a bundle.
///
/// "Not my format" and "my format but broken" are distinct outcomes, not
/// error types: the dispatcher's branching is a plain match over this enum,
/// with no failure-kind hierarchy to inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The bundle is not in this handler's format; the dispatcher moves on
    /// to the next handler.
    Mismatch,
    /// The bundle is in this handler's format but its content fails
    /// validation. The dispatcher stops here — once a handler claims a
    /// format, no later handler gets a look.
    Invalid(Vec<ValidationError>),
    /// The bundle was imported.
    Applied(ImportReport),
}

/// A version-specific importer.
///
/// Implementations are constructed by the caller with whatever extra
/// configuration they need (see [`crate::ImportOptions`]); the dispatcher
/// only ever hands them the bundle. A handler must be cheap to run on a
/// bundle it does not recognize — recognition is how dispatch probes the
/// handler list.
pub trait ImportHandler {
    /// Version label used in logs and reports (e.g. `"1.0.0"`).
    fn version(&self) -> &'static str;

    /// Inspect the bundle and either claim it or report a mismatch.
    fn run(&self, bundle: &ImportBundle) -> HandlerOutcome;
}
