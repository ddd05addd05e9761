//! Argument scanner for component invocations.
//!
//! Handles the text between the parentheses of `Name(...)`:
//!
//! ```text
//! Text("Hello", style="h2")
//! Input(value := state.email, placeholder: "Email")
//! Text(content << state.count)
//! ```

use crate::ast::Binding;

/// A named argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// `key = value` or `key: value`. Surrounding quotes are removed.
    Literal(String),
    /// `key := expr`
    TwoWay(String),
    /// `key << expr`
    Subscribe(String),
}

impl ArgValue {
    pub fn to_binding(&self) -> Binding {
        match self {
            ArgValue::Literal(value) => Binding::Static(value.clone()),
            ArgValue::TwoWay(expr) => Binding::TwoWay(expr.clone()),
            ArgValue::Subscribe(expr) => Binding::Subscribe(expr.clone()),
        }
    }
}

/// Parsed call-site arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    primary: Option<String>,
    named: Vec<(String, ArgValue)>,
}

impl CallArgs {
    /// Scan an argument list. Never fails; unreadable items are ignored.
    pub fn parse(text: &str) -> Self {
        let mut args = CallArgs::default();
        if text.trim().is_empty() {
            return args;
        }

        for item in split_top_level(text, ',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }

            if item.starts_with('"') {
                // Only a quoted string ahead of every named pair is primary.
                if args.primary.is_none() && args.named.is_empty() {
                    args.primary = Some(unquote(item));
                }
                continue;
            }

            if let Some((key, value)) = parse_named(item) {
                args.named.push((key.to_string(), value));
            }
        }

        args
    }

    /// The leading positional string, e.g. `"Hello"` in `Text("Hello")`.
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    /// First value bound to `key`.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.named.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Literal value bound to `key`. Binding forms are not literals.
    pub fn literal(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(ArgValue::Literal(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn binding(&self, key: &str) -> Option<Binding> {
        self.get(key).map(ArgValue::to_binding)
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.named.is_empty()
    }
}

fn parse_named(item: &str) -> Option<(&str, ArgValue)> {
    let (key, rest) = leading_word(item)?;
    let rest = rest.trim_start();

    let value = if let Some(expr) = rest.strip_prefix(":=") {
        ArgValue::TwoWay(expr.trim().to_string())
    } else if let Some(expr) = rest.strip_prefix("<<") {
        ArgValue::Subscribe(expr.trim().to_string())
    } else if let Some(value) = rest.strip_prefix('=').or_else(|| rest.strip_prefix(':')) {
        ArgValue::Literal(unquote(value.trim()))
    } else {
        return None;
    };

    Some((key, value))
}

/// Split on `sep` outside of quotes and bracket pairs.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (index, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if ch == sep && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Remove one pair of surrounding double quotes and unescape `\"` and `\\`.
pub fn unquote(text: &str) -> String {
    let inner = match text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) if text.len() >= 2 => inner,
        _ => return text.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Split a leading `\w+` word off `text`.
pub fn leading_word(text: &str) -> Option<(&str, &str)> {
    let end = text
        .char_indices()
        .find(|(_, ch)| !is_word_char(*ch))
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    Some((&text[..end], &text[end..]))
}

pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub fn is_word(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_word_char)
}

/// `\w+` segments joined by dots, e.g. `state.user.name`.
pub fn is_dotted_path(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_word)
}
