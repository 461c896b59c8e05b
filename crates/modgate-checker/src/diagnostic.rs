//! Diagnostic infrastructure for error reporting
//!
//! Turns [`ProgramError`]s into renderable diagnostics with source labels,
//! and provides terminal and JSON output.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::Files;
use codespan_reporting::term;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use termcolor::WriteColor;

pub use codespan_reporting::files::SimpleFiles;

use crate::error::{describe_module, BindError, ProgramError, RegistryError, VisibilityError};
use crate::span::Location;

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    /// Code as text
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add a primary label
    pub fn with_primary_label(mut self, location: Location, message: impl Into<String>) -> Self {
        let span = location.span;
        self.inner
            .labels
            .push(Label::primary(location.file.0, span.start..span.end).with_message(message));
        self
    }

    /// Add a secondary label
    pub fn with_secondary_label(mut self, location: Location, message: impl Into<String>) -> Self {
        let span = location.span;
        self.inner
            .labels
            .push(Label::secondary(location.file.0, span.start..span.end).with_message(message));
        self
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create a diagnostic from any program error
    pub fn from_error(error: &ProgramError) -> Self {
        match error {
            ProgramError::Registry(err) => Self::from_registry_error(err),
            ProgramError::Bind(err) => Self::from_bind_error(err),
            ProgramError::Visibility(err) => Self::from_visibility_error(err),
        }
    }

    /// Create a diagnostic from a RegistryError
    pub fn from_registry_error(error: &RegistryError) -> Self {
        match error {
            RegistryError::DuplicateModule { name, first, second } => {
                Diagnostic::error(format!("Module '{}' is declared more than once", name))
                    .with_code(registry_code(error))
                    .with_primary_label(*second, "duplicate declaration")
                    .with_secondary_label(*first, "first declaration here")
            }
        }
    }

    /// Create a diagnostic from a BindError
    pub fn from_bind_error(error: &BindError) -> Self {
        match error {
            BindError::UnknownModule {
                attempted_name,
                location,
            } => Diagnostic::error(format!("Cannot find module '{}'", attempted_name))
                .with_code(bind_code(error))
                .with_primary_label(*location, "no module with this exact name is declared")
                .with_note("Module names are case-sensitive")
                .with_note("Declarations in this unit are treated as belonging to no module"),
        }
    }

    /// Create a diagnostic from a VisibilityError
    pub fn from_visibility_error(error: &VisibilityError) -> Self {
        match error {
            VisibilityError::InternalSymbolInaccessible {
                symbol,
                kind,
                owning_module,
                accessing_unit,
                accessing_module,
                location,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "Cannot access internal {} '{}' from {}",
                    kind.describe(),
                    symbol,
                    describe_module(accessing_module)
                ))
                .with_code(visibility_code(error))
                .with_primary_label(*location, "internal symbol used here");

                diag = match owning_module {
                    Some(owner) => diag.with_note(format!(
                        "'{}' is internal to module '{}'; '{}' is in {}",
                        symbol,
                        owner,
                        accessing_unit,
                        describe_module(accessing_module)
                    )),
                    None => diag.with_note(format!(
                        "'{}' is internal but belongs to no module, so it is not accessible anywhere",
                        symbol
                    )),
                };
                diag
            }

            VisibilityError::InternalInPublicSignature {
                member,
                symbol,
                kind,
                module,
                location,
            } => Diagnostic::error(format!(
                "Public '{}' exposes internal {} '{}' in its signature",
                member,
                kind.describe(),
                symbol
            ))
            .with_code(visibility_code(error))
            .with_primary_label(*location, "public declaration")
            .with_note(format!("'{}' is internal to {}", symbol, describe_module(module)))
            .with_help(format!("Mark '{}' internal, or make '{}' public", member, symbol)),
        }
    }

    /// Emit the diagnostic to a terminal stream
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Get the error code
    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    /// Convert to JSON representation for IDE integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files))
    }
}

/// JSON representation of a diagnostic for IDE integration
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "E4003")
    pub code: Option<String>,
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Source locations with labels
    pub labels: Vec<JsonLabel>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// File path
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Label message
    pub message: Option<String>,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Get the error code for a program error
pub fn error_code(error: &ProgramError) -> ErrorCode {
    match error {
        ProgramError::Registry(err) => registry_code(err),
        ProgramError::Bind(err) => bind_code(err),
        ProgramError::Visibility(err) => visibility_code(err),
    }
}

fn registry_code(error: &RegistryError) -> ErrorCode {
    match error {
        RegistryError::DuplicateModule { .. } => ErrorCode("E4001"),
    }
}

fn bind_code(error: &BindError) -> ErrorCode {
    match error {
        BindError::UnknownModule { .. } => ErrorCode("E4002"),
    }
}

fn visibility_code(error: &VisibilityError) -> ErrorCode {
    match error {
        VisibilityError::InternalSymbolInaccessible { .. } => ErrorCode("E4003"),
        VisibilityError::InternalInPublicSignature { .. } => ErrorCode("E4004"),
    }
}

/// Helper to create a SimpleFiles instance holding one source file
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}
