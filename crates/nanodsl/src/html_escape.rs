//! Escaping for the three places user text lands in HTML output.

/// Append `input` to `out`, escaping & < > " '
pub fn push_escaped(out: &mut String, input: &str) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Escape text content and attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    push_escaped(&mut out, input);
    out
}

/// Class-name suffix: anything outside `[A-Za-z0-9_-]` becomes `-`.
///
/// `16/9` becomes `16-9`, which is also how aspect ratios are spelled in
/// the stylesheet.
pub fn class_suffix(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Text safe inside `<!-- ... -->`: escaped, and never containing `--`.
pub fn comment(input: &str) -> String {
    let mut out = escape(input);
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_specials() {
        assert_eq!(
            escape("<script>alert('x' && \"y\")</script>"),
            "&lt;script&gt;alert(&#39;x&#39; &amp;&amp; &quot;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("Hello, world!"), "Hello, world!");
    }

    #[test]
    fn test_push_escaped_appends() {
        let mut out = String::from("<p>");
        push_escaped(&mut out, "a < b");
        assert_eq!(out, "<p>a &lt; b");
    }

    #[test]
    fn test_class_suffix() {
        assert_eq!(class_suffix("16/9"), "16-9");
        assert_eq!(class_suffix("md"), "md");
        assert_eq!(class_suffix("x\" onclick=\"y"), "x--onclick--y");
    }

    #[test]
    fn test_comment_has_no_double_dash() {
        assert_eq!(comment("a -- b"), "a - - b");
        assert_eq!(comment("--->"), "- - -&gt;");
        assert!(!comment("----").contains("--"));
    }
}
