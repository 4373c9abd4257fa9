//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Errors in the
//! input graph carry the source text so the offending TOML is shown inline.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use orthogram::OrthogramError;

use crate::error::{CliError, ConfigError};

/// Adapter presenting a [`CliError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io(_) => "orthogram::io",
            CliError::Config(_) => "orthogram::config",
            CliError::Input { .. } => "orthogram::input",
            CliError::Output(_) => "orthogram::output",
            CliError::Orthogram(err) => match err {
                OrthogramError::Graph(_) => "orthogram::graph",
                OrthogramError::Frame(_) => "orthogram::frame",
                OrthogramError::Chain(_) => "orthogram::chain",
                OrthogramError::MissingElement(_)
                | OrthogramError::MissingRelationship(_)
                | OrthogramError::MissingSegment(_) => "orthogram::lookup",
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Config(ConfigError::MissingFile(_)) => {
                "check the --config path or omit it to use the defaults"
            }
            CliError::Config(ConfigError::Parse(_)) => {
                "configuration keys live under [layout] and [canvas]"
            }
            CliError::Input { .. } => {
                "a state graph lists [[states]] with `id` and optional [[states.transition]] tables"
            }
            CliError::Orthogram(OrthogramError::Graph(_)) => {
                "state and final ids must be unique across the whole graph"
            }
            CliError::Orthogram(OrthogramError::Frame(_)) => {
                "state and final sizes in [layout] must be positive"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::Input { src, span: Some(_), .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self.0 {
            CliError::Input {
                message,
                span: Some(span),
                ..
            } => {
                let span = SourceSpan::new(span.start.into(), span.end - span.start);
                let label = LabeledSpan::new_primary_with_span(Some(message.clone()), span);
                Some(Box::new(std::iter::once(label)))
            }
            _ => None,
        }
    }
}

/// Convert a [`CliError`] into a list of reportable errors.
///
/// Every error currently maps to exactly one diagnostic.
pub fn to_reportables(err: &CliError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_error(src: &str) -> CliError {
        let err = toml::from_str::<orthogram::layout::StateGraph>(src).unwrap_err();
        CliError::input("graph.toml", src.to_string(), &err)
    }

    #[test]
    fn test_input_error_carries_source_and_label() {
        let err = input_error("[[states]]\nid = 42\n");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let adapter = &reportables[0];
        assert_eq!(adapter.code().unwrap().to_string(), "orthogram::input");
        assert!(adapter.source_code().is_some());
        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_library_error_has_code_without_labels() {
        let err = CliError::from(OrthogramError::Graph("duplicate node id `a`".to_string()));

        let reportables = to_reportables(&err);
        let adapter = &reportables[0];

        assert_eq!(adapter.to_string(), "Graph error: duplicate node id `a`");
        assert_eq!(adapter.code().unwrap().to_string(), "orthogram::graph");
        assert!(adapter.help().is_some());
        assert!(adapter.labels().is_none());
        assert!(adapter.source_code().is_none());
    }

    #[test]
    fn test_lookup_errors_share_a_code() {
        let err = CliError::from(OrthogramError::MissingSegment(
            orthogram::identifier::SegmentId::new(),
        ));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "orthogram::lookup");
        assert!(adapter.help().is_none());
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = CliError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "orthogram::io");
        assert!(adapter.help().is_none());
    }
}
