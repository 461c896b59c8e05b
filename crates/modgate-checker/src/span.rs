//! Source locations
//!
//! Every declaration, module attribute and use-site carries a [`Location`]:
//! the file it lives in plus a byte span with a 1-based line and column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a source file within one checking run.
///
/// The value is the file id handed to the diagnostics renderer, so files must
/// be registered with the renderer in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// Byte range in a source file, with the line and column of its start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// 1-based line of `start`
    pub line: u32,
    /// 1-based column of `start`
    pub column: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A span inside a specific file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    /// File the span points into
    pub file: FileId,
    /// Position inside the file
    pub span: Span,
}

impl Location {
    /// Create a new location
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}:{}:{}", self.file.0, self.span.line, self.span.column)
    }
}
