//! Error and diagnostic types
//!
//! [`IdlError`] is the only fatal error: the source could not be loaded at all.
//! Everything found while parsing is a [`Diagnostic`], collected so that one run
//! reports every defect instead of stopping at the first.

use super::ast::SourceLocation;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdlError {
    #[error("failed to open \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("\"{}\" is empty", path.display())]
    EmptySource { path: PathBuf },
}

/// Category of a non-fatal defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Character the lexer does not recognise
    Lexical,
    /// Grammar violation
    Syntax,
    /// Type name never declared
    Resolution,
    /// Whole-module checks run after parsing
    Integrity,
    /// Well-formed but meaningless, e.g. a oneway method with a return value
    Semantic,
    /// Same name declared twice
    Redeclaration,
}

impl DiagnosticKind {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Lexical => "lexical error",
            DiagnosticKind::Syntax => "syntax error",
            DiagnosticKind::Resolution => "resolution error",
            DiagnosticKind::Integrity => "integrity error",
            DiagnosticKind::Semantic => "semantic error",
            DiagnosticKind::Redeclaration => "redeclaration",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// File name without directories
    pub file: String,
    /// Text of the offending token
    pub token: String,
    pub location: SourceLocation,
    pub message: String,
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[line {}, column {}] {}",
            self.file, self.location.line, self.location.column, self.message
        )
    }
}

/// Strip directories from a path for display in diagnostics.
pub(crate) fn display_file_name(path: &str) -> String {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic {
            kind: DiagnosticKind::Syntax,
            file: "foo.idl".to_string(),
            token: "{".to_string(),
            location: SourceLocation::new(3, 11),
            message: "Expected interface name, found '{'".to_string(),
        };
        assert_eq!(
            diag.to_string(),
            "foo.idl[line 3, column 11] Expected interface name, found '{'"
        );
    }

    #[test]
    fn test_display_file_name() {
        assert_eq!(display_file_name("a/b/foo.idl"), "foo.idl");
        assert_eq!(display_file_name("c:\\x\\foo.idl"), "foo.idl");
        assert_eq!(display_file_name("foo.idl"), "foo.idl");
    }
}
