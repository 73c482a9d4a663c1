//! Minimal LRC line classification.
//!
//! Recognizes timed lyric lines (`[mm:ss.xx] text`, possibly with several
//! time tags), metadata tags (`[ar: Artist]`), and everything else.

/// Classification of one trimmed, non-empty LRC line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// One or more leading time tags.
    Time {
        /// Lyric text after the tags, trimmed.
        content: String,
        /// True when a whitespace separates the tags from non-empty content.
        space_after_tags: bool,
    },
    /// A metadata tag line such as `[ar: Artist]` or `[offset: +10]`.
    Tag,
    /// Not synchronized, or broken tag syntax.
    Invalid,
}

/// Length in bytes of a leading `[mm:ss]` / `[mm:ss.xx]` / `[mm:ss:xx]`
/// time tag, or None.
fn time_tag_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let mut i = 1;
    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i > start
    };

    if !digits(&mut i) {
        return None;
    }
    if bytes.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    if !digits(&mut i) {
        return None;
    }
    if let Some(sep) = bytes.get(i) {
        if *sep == b'.' || *sep == b':' {
            i += 1;
            if !digits(&mut i) {
                return None;
            }
        }
    }
    if bytes.get(i) != Some(&b']') {
        return None;
    }
    Some(i + 1)
}

/// True if the whole line is a metadata tag: `[ident: anything]`.
fn is_metadata_tag(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('[') else {
        return false;
    };
    let Some(inner) = rest.strip_suffix(']') else {
        return false;
    };
    let Some((key, _value)) = inner.split_once(':') else {
        return false;
    };
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '#')
        && key.chars().any(|c| c.is_ascii_alphabetic())
}

/// Classify one trimmed, non-empty line.
pub fn parse_line(line: &str) -> ParsedLine {
    let mut rest = line;
    let mut tags = 0;
    while let Some(len) = time_tag_len(rest) {
        rest = &rest[len..];
        tags += 1;
    }
    if tags > 0 {
        let space_after_tags = rest.starts_with(char::is_whitespace);
        return ParsedLine::Time {
            content: rest.trim().to_string(),
            space_after_tags,
        };
    }
    if is_metadata_tag(line) {
        return ParsedLine::Tag;
    }
    ParsedLine::Invalid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_lines() {
        assert_eq!(
            parse_line("[00:12.00] Some words"),
            ParsedLine::Time {
                content: "Some words".to_string(),
                space_after_tags: true
            }
        );
        assert_eq!(
            parse_line("[01:02:50] old separator"),
            ParsedLine::Time {
                content: "old separator".to_string(),
                space_after_tags: true
            }
        );
        // Repeated-tag lines are still timed.
        assert_eq!(
            parse_line("[00:12.00][00:50.10] chorus"),
            ParsedLine::Time {
                content: "chorus".to_string(),
                space_after_tags: true
            }
        );
        // Synchronized empty line (end-of-lyrics marker).
        assert_eq!(
            parse_line("[03:10.22]"),
            ParsedLine::Time {
                content: String::new(),
                space_after_tags: false
            }
        );
    }

    #[test]
    fn metadata_tags() {
        assert_eq!(parse_line("[ar: Artist]"), ParsedLine::Tag);
        assert_eq!(parse_line("[offset: +250]"), ParsedLine::Tag);
        assert_eq!(parse_line("[au: instrumental]"), ParsedLine::Tag);
    }

    #[test]
    fn invalid_lines() {
        assert_eq!(parse_line("no tag at all"), ParsedLine::Invalid);
        assert_eq!(parse_line("[00:xx.00] broken"), ParsedLine::Invalid);
        assert_eq!(parse_line("[12] nope"), ParsedLine::Invalid);
    }

    #[test]
    fn missing_space_detected() {
        assert_eq!(
            parse_line("[00:12.00]glued"),
            ParsedLine::Time {
                content: "glued".to_string(),
                space_after_tags: false
            }
        );
    }
}
