//! YAML error types with source-span diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors from reading a YAML document
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error("Failed to read file: {0}")]
    #[diagnostic(code(jqt::yaml::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),
}

/// A YAML syntax or shape error pointing at the offending location
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {filename}: {message}")]
#[diagnostic(
    code(jqt::yaml::syntax),
    help("Check indentation and field types near the highlighted line")
)]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,
    pub line: Option<usize>,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let location = err.location();
        // Highlight from the error offset to the end of that line
        let span = location.as_ref().and_then(|loc| {
            let offset = loc.index().min(content.len());
            let rest = content.get(offset..)?;
            let len = rest.find('\n').unwrap_or(rest.len());
            Some(SourceSpan::from((offset, len)))
        });

        Self {
            filename: filename.to_string(),
            message: err.to_string(),
            line: location.as_ref().map(|loc| loc.line()),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}
