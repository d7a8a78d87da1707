//! Dispatches an import across versioned handlers.

use tracing::{debug, error};

use crate::bundle::ImportBundle;
use crate::config::ImportOptions;
use crate::error::ImportError;
use crate::handler::{HandlerOutcome, ImportHandler};
use crate::report::ImportReport;
use crate::v1::SavedQueryImporter;

/// Tries versioned import handlers in order until one claims the bundle.
///
/// The handler list is fixed at construction and list order is
/// authoritative: the first handler that recognizes the format is the
/// terminal answer, whether its validation passes or not. There is no
/// scoring or best-match heuristic, which keeps the outcome deterministic
/// when two handlers could structurally parse the same bytes.
///
/// The dispatcher holds no mutable state; a single instance can serve
/// concurrent imports as long as its handlers can.
pub struct ImportDispatcher {
    handlers: Vec<Box<dyn ImportHandler>>,
}

impl ImportDispatcher {
    /// Build a dispatcher over an explicit, ordered handler list.
    #[must_use]
    pub fn new(handlers: Vec<Box<dyn ImportHandler>>) -> Self {
        Self { handlers }
    }

    /// Build a dispatcher over the production handler list.
    ///
    /// Handlers are ordered most-recent-version-first: most bundles come
    /// from the current export format, so the newest handler gets the
    /// first look. `options` are forwarded unchanged to every handler.
    #[must_use]
    pub fn with_default_handlers(options: ImportOptions) -> Self {
        Self::new(vec![Box::new(SavedQueryImporter::new(options))])
    }

    /// Import a bundle.
    ///
    /// Walks the handler list in order. A handler that reports
    /// [`HandlerOutcome::Mismatch`] is skipped with a debug log entry; the
    /// first handler that recognizes the format settles the import, either
    /// by applying it or by failing validation. The dispatcher validates
    /// nothing itself — every content decision belongs to a handler.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Invalid`] when the claiming handler rejects
    /// the bundle content (logged at error level with the full findings),
    /// and [`ImportError::NoHandlerFound`] when every handler — or an empty
    /// handler list — reports a mismatch.
    pub fn run(&self, bundle: &ImportBundle) -> Result<ImportReport, ImportError> {
        for handler in &self.handlers {
            match handler.run(bundle) {
                HandlerOutcome::Mismatch => {
                    debug!(
                        version = handler.version(),
                        "bundle not handled by this version, skipping"
                    );
                }
                HandlerOutcome::Invalid(errors) => {
                    let findings: Vec<String> = errors
                        .iter()
                        .map(crate::error::ValidationError::format_human_readable)
                        .collect();
                    error!(
                        version = handler.version(),
                        findings = %findings.join("; "),
                        "error running import; bundle recognized but invalid"
                    );
                    return Err(ImportError::Invalid {
                        version: handler.version().to_owned(),
                        errors,
                    });
                }
                HandlerOutcome::Applied(report) => return Ok(report),
            }
        }

        Err(ImportError::NoHandlerFound)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ValidationError;

    /// A handler scripted to always return one outcome, counting its calls.
    struct ScriptedHandler {
        version: &'static str,
        outcome: HandlerOutcome,
        calls: Rc<Cell<usize>>,
    }

    impl ScriptedHandler {
        fn boxed(version: &'static str, outcome: HandlerOutcome) -> (Box<Self>, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            let handler = Box::new(Self {
                version,
                outcome,
                calls: Rc::clone(&calls),
            });
            (handler, calls)
        }
    }

    impl ImportHandler for ScriptedHandler {
        fn version(&self) -> &'static str {
            self.version
        }

        fn run(&self, _bundle: &ImportBundle) -> HandlerOutcome {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn applied(version: &str) -> HandlerOutcome {
        HandlerOutcome::Applied(ImportReport {
            version: version.to_owned(),
            overwrite: false,
            assets: vec![],
        })
    }

    fn invalid() -> HandlerOutcome {
        HandlerOutcome::Invalid(vec![ValidationError::file_level(
            "metadata.yaml",
            "broken",
        )])
    }

    #[test]
    fn test_empty_handler_list_is_no_handler_found() {
        let dispatcher = ImportDispatcher::new(vec![]);
        let result = dispatcher.run(&ImportBundle::new());
        assert!(matches!(result, Err(ImportError::NoHandlerFound)));
    }

    #[test]
    fn test_single_recognizer_succeeds_regardless_of_position() {
        let (first, first_calls) = ScriptedHandler::boxed("3.0.0", HandlerOutcome::Mismatch);
        let (second, second_calls) = ScriptedHandler::boxed("2.0.0", applied("2.0.0"));
        let (third, third_calls) = ScriptedHandler::boxed("1.0.0", HandlerOutcome::Mismatch);

        let dispatcher = ImportDispatcher::new(vec![first, second, third]);
        let report = dispatcher.run(&ImportBundle::new()).unwrap();

        assert_eq!(report.version, "2.0.0");
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 1);
        assert_eq!(third_calls.get(), 0, "dispatch must stop at the first claim");
    }

    #[test]
    fn test_invalid_claim_stops_dispatch() {
        let (first, _) = ScriptedHandler::boxed("2.0.0", HandlerOutcome::Mismatch);
        let (second, _) = ScriptedHandler::boxed("1.0.0", invalid());
        let (third, third_calls) = ScriptedHandler::boxed("0.9.0", applied("0.9.0"));

        let dispatcher = ImportDispatcher::new(vec![first, second, third]);
        let result = dispatcher.run(&ImportBundle::new());

        match result {
            Err(ImportError::Invalid { version, errors }) => {
                assert_eq!(version, "1.0.0");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].file, "metadata.yaml");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(
            third_calls.get(),
            0,
            "a handler past the claiming one must never be invoked"
        );
    }

    #[test]
    fn test_all_mismatch_invokes_every_handler_once() {
        let (first, first_calls) = ScriptedHandler::boxed("2.0.0", HandlerOutcome::Mismatch);
        let (second, second_calls) = ScriptedHandler::boxed("1.0.0", HandlerOutcome::Mismatch);

        let dispatcher = ImportDispatcher::new(vec![first, second]);
        let result = dispatcher.run(&ImportBundle::new());

        assert!(matches!(result, Err(ImportError::NoHandlerFound)));
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 1);
    }

    #[test]
    fn test_earlier_structural_match_wins() {
        // Two handlers that would both accept the bundle: list order decides.
        let (first, first_calls) = ScriptedHandler::boxed("2.0.0", applied("2.0.0"));
        let (second, second_calls) = ScriptedHandler::boxed("1.0.0", applied("1.0.0"));

        let dispatcher = ImportDispatcher::new(vec![first, second]);
        let report = dispatcher.run(&ImportBundle::new()).unwrap();

        assert_eq!(report.version, "2.0.0");
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 0);
    }

    #[test]
    fn test_dispatcher_is_reusable_across_calls() {
        let (handler, calls) = ScriptedHandler::boxed("1.0.0", applied("1.0.0"));
        let dispatcher = ImportDispatcher::new(vec![handler]);

        let bundle = ImportBundle::new();
        assert!(dispatcher.run(&bundle).is_ok());
        assert!(dispatcher.run(&bundle).is_ok());
        assert_eq!(calls.get(), 2, "each invocation is independent");
    }
}
