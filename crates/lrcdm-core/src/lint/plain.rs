//! Lint rules for plain (`.txt`) lyrics.

use super::LintProblem;
use crate::lyrics::INSTRUMENTAL_MARKER;

/// Check a plain lyrics body. Returns problems in line order.
pub fn lint_plain(source: &str) -> Vec<LintProblem> {
    let lines: Vec<&str> = source.split('\n').map(str::trim).collect();
    let mut problems = Vec::new();

    // A lone instrumental marker is a valid body.
    if lines.len() == 1 && lines[0] == INSTRUMENTAL_MARKER {
        return problems;
    }

    for (index, content) in lines.iter().enumerate() {
        if !content.is_empty() {
            if content.starts_with('[') {
                problems.push(LintProblem::error(
                    index + 1,
                    "Line cannot start with an opening square bracket",
                ));
            }
        } else if (index == 0 && lines.len() > 1)
            || (index != 0 && lines[index - 1].is_empty())
        {
            problems.push(LintProblem::error(index + 1, "Unnecessary empty line"));
        }
    }

    problems
}
