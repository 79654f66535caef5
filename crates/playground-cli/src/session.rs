//! Re-runnable playground sessions.

use playground_parser::{parse_with_options, ComponentRegistry, Document, ParseError, ParseOptions};

/// One snippet's playground state.
///
/// A failed run records the error but keeps the render tree of the last
/// successful run, so the preview does not go blank while the user is
/// half-way through an edit.
pub struct Session<R: ComponentRegistry> {
    registry: R,
    options: ParseOptions,
    last_output: Option<Document<R::Component>>,
    last_error: Option<ParseError>,
    runs: usize,
}

impl<R: ComponentRegistry> Session<R> {
    pub fn new(registry: R, options: ParseOptions) -> Self {
        Self {
            registry,
            options,
            last_output: None,
            last_error: None,
            runs: 0,
        }
    }

    /// Parses `source` and updates the retained state.
    pub fn run(&mut self, source: &str) -> Result<&Document<R::Component>, &ParseError> {
        self.runs += 1;
        match parse_with_options(source, &self.registry, self.options) {
            Ok(doc) => {
                self.last_error = None;
                Ok(&*self.last_output.insert(doc))
            }
            Err(err) => Err(&*self.last_error.insert(err)),
        }
    }

    /// Render tree of the most recent successful run.
    pub fn last_output(&self) -> Option<&Document<R::Component>> {
        self.last_output.as_ref()
    }

    /// Error of the most recent run, if it failed.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    /// True when the latest run failed and an older tree is still shown.
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some() && self.last_output.is_some()
    }

    pub fn runs(&self) -> usize {
        self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_parser::StaticRegistry;
    use pretty_assertions::assert_eq;

    fn session() -> Session<StaticRegistry> {
        Session::new(StaticRegistry::indo_ui(), ParseOptions::default())
    }

    #[test]
    fn test_success_replaces_output() {
        let mut session = session();
        assert!(session.run("<Button />").is_ok());
        assert!(session.run("<Card>x</Card>").is_ok());

        let doc = session.last_output().unwrap();
        assert_eq!(doc.root().unwrap().tag_name.as_str(), "Card");
        assert!(session.last_error().is_none());
        assert_eq!(session.runs(), 2);
    }

    #[test]
    fn test_failure_keeps_last_output() {
        let mut session = session();
        session.run("<Alert>saved</Alert>").unwrap();

        let err = session.run("<Alert>saved").unwrap_err();
        assert_eq!(err.kind.code(), "unclosed-tag");

        assert!(session.is_stale());
        let kept = session.last_output().unwrap();
        assert_eq!(kept.to_string(), "<Alert>saved</Alert>");
    }

    #[test]
    fn test_recovery_clears_error() {
        let mut session = session();
        session.run("<Alert>").unwrap_err();
        assert!(!session.is_stale());
        assert!(session.last_output().is_none());

        session.run("<Alert />").unwrap();
        assert!(session.last_error().is_none());
    }
}
