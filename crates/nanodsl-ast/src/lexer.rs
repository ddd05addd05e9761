//! Line lexer for NanoDSL sources.
//!
//! NanoDSL is line oriented: every logical construct lives on a single line
//! and nesting is expressed purely through indentation. The lexer therefore
//! does not produce character-level tokens; it tags each source line with its
//! 1-based line number and its indentation width.

/// A single source line with its indentation measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source.
    pub number: usize,
    /// Count of leading spaces and tabs. Tabs count as one column.
    pub indent: usize,
    /// Count of leading spaces only (used for indentation style checks).
    pub leading_spaces: usize,
    /// Line content with surrounding whitespace removed.
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split a source string into indentation-tagged lines.
///
/// Both `\n` and `\r\n` line endings are accepted. The result always has at
/// least one element, mirroring `str::lines` on an empty string plus one.
pub fn tokenize(source: &str) -> Vec<Line<'_>> {
    let mut lines: Vec<Line<'_>> = source
        .split('\n')
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            Line {
                number: index + 1,
                indent: indent_width(raw),
                leading_spaces: raw.bytes().take_while(|b| *b == b' ').count(),
                text: raw.trim(),
            }
        })
        .collect();

    // A trailing newline does not open a new line of content.
    if lines.len() > 1 && source.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// Indentation width of a raw line: leading spaces and tabs, one column each.
pub fn indent_width(raw: &str) -> usize {
    raw.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

/// Index of the first non-blank line at or after `start`.
pub fn first_non_blank(lines: &[Line<'_>], start: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, line)| !line.is_blank())
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_counts_spaces_and_tabs() {
        assert_eq!(indent_width("    Text"), 4);
        assert_eq!(indent_width("\t\tText"), 2);
        assert_eq!(indent_width(" \t Text"), 3);
        assert_eq!(indent_width("Text"), 0);
    }

    #[test]
    fn test_tokenize_tags_lines() {
        let lines = tokenize("component A:\n    Text(\"x\")\n\n  \n");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].indent, 0);
        assert_eq!(lines[1].indent, 4);
        assert_eq!(lines[1].text, "Text(\"x\")");
        assert!(lines[2].is_blank());
        assert!(lines[3].is_blank());
    }

    #[test]
    fn test_tokenize_crlf() {
        let lines = tokenize("component A:\r\n    Divider\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "Divider");
        assert_eq!(lines[1].indent, 4);
    }

    #[test]
    fn test_empty_source_has_one_blank_line() {
        let lines = tokenize("");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_blank());
        assert_eq!(first_non_blank(&lines, 0), None);
    }

    #[test]
    fn test_leading_spaces_ignore_tabs() {
        let lines = tokenize("\t  Text");
        assert_eq!(lines[0].indent, 3);
        assert_eq!(lines[0].leading_spaces, 0);
    }
}
