//! Lyric-format linting for synced (`.lrc`) and plain (`.txt`) bodies.

mod parse;
mod plain;
mod synced;

pub use parse::{parse_line, ParsedLine};
pub use plain::lint_plain;
pub use synced::lint_synced;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One lint finding, anchored to a 1-based line number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintProblem {
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl LintProblem {
    pub(crate) fn error(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Error,
            message: message.into(),
        }
    }
}
