//! Lint rules for synced (`.lrc`) lyrics.

use super::parse::{parse_line, ParsedLine};
use super::LintProblem;

/// Check a synced lyrics body. Returns problems in line order.
pub fn lint_synced(source: &str) -> Vec<LintProblem> {
    let lines: Vec<&str> = source.split('\n').map(str::trim).collect();
    let mut problems = Vec::new();
    let mut last_non_empty: Option<(usize, &str)> = None;

    for (index, content) in lines.iter().enumerate() {
        if !content.is_empty() {
            match parse_line(content) {
                ParsedLine::Invalid => {
                    problems.push(LintProblem::error(
                        index + 1,
                        "Line is not synchronized or invalid tag syntax",
                    ));
                }
                ParsedLine::Time {
                    content: text,
                    space_after_tags,
                } => {
                    if (text.ends_with('.') && !text.ends_with("...")) || text.ends_with(',') {
                        problems.push(LintProblem::error(
                            index + 1,
                            "Line should not end with a punctuation such as comma and dot",
                        ));
                    }
                    if !text.is_empty() && !space_after_tags {
                        problems.push(LintProblem::error(
                            index + 1,
                            "Expect a space between the time tag and the content",
                        ));
                    }
                }
                ParsedLine::Tag => {}
            }
            last_non_empty = Some((index, content));
        } else if index < lines.len() - 1 && lines[index + 1].is_empty() {
            problems.push(LintProblem::error(index + 1, "Unnecessary empty line"));
        }
    }

    // Lyrics should close with a synchronized empty line so players know
    // when the last line ends.
    if lines.len() > 1 {
        if let Some((index, content)) = last_non_empty {
            let terminated = matches!(
                parse_line(content),
                ParsedLine::Time { content, .. } if content.is_empty()
            );
            if !terminated {
                problems.push(LintProblem::error(
                    index + 1,
                    "Expect a synchronized empty line to mark the end of lyrics",
                ));
            }
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = "\
[ar: Artist]
[ti: Title]

[00:12.00] First line
[00:15.30] Second line...
[00:21.10]
";

    #[test]
    fn clean_lyrics_pass() {
        assert!(lint_synced(CLEAN).is_empty());
    }

    #[test]
    fn unsynchronized_line_flagged() {
        let problems = lint_synced("[00:01.00] ok\njust words\n[00:05.00]\n");
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].line, 2);
        assert!(problems[0].message.contains("not synchronized"));
    }

    #[test]
    fn trailing_punctuation_flagged_but_ellipsis_allowed() {
        let problems = lint_synced("[00:01.00] ends with dot.\n[00:02.00] fine...\n[00:03.00] comma,\n[00:05.00]\n");
        let lines: Vec<usize> = problems.iter().map(|p| p.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn missing_space_after_tag_flagged() {
        let problems = lint_synced("[00:01.00]glued\n[00:05.00]\n");
        assert_eq!(problems.len(), 1);
        assert!(problems[0].message.contains("space between the time tag"));
    }

    #[test]
    fn duplicate_empty_lines_flagged() {
        let problems = lint_synced("[00:01.00] a\n\n\n[00:02.00] b\n[00:05.00]\n");
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].line, 2);
        assert!(problems[0].message.contains("Unnecessary empty line"));
    }

    #[test]
    fn must_end_with_synchronized_empty_line() {
        let problems = lint_synced("[00:01.00] a\n[00:02.00] b");
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].line, 2);
        assert!(problems[0].message.contains("synchronized empty line"));
    }
}
