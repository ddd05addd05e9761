//! Action sub-grammar for `on_click:` values.
//!
//! This grammar is deliberately separate from the structural parser and,
//! unlike it, cannot fail: any text it does not understand becomes
//! `StateMutation { path: "unknown", op: Set, value: text }`.

use std::collections::BTreeMap;
use std::fmt;

use crate::args::{is_dotted_path, is_word_char, split_top_level, unquote};

/// Path used for action text that matches no known pattern.
pub const UNKNOWN_ACTION_PATH: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NanoAction {
    Navigate {
        to: String,
        params: Option<BTreeMap<String, String>>,
        query: Option<BTreeMap<String, String>>,
        replace: bool,
    },
    ShowToast {
        message: String,
    },
    StateMutation {
        path: String,
        op: MutationOp,
        value: String,
    },
    Sequence(Vec<NanoAction>),
    Fetch(FetchAction),
    /// Host-defined action. Never produced by the parser.
    Custom {
        name: String,
        payload: BTreeMap<String, String>,
    },
}

impl NanoAction {
    fn unknown(text: &str) -> Self {
        NanoAction::StateMutation {
            path: UNKNOWN_ACTION_PATH.to_string(),
            op: MutationOp::Set,
            value: text.to_string(),
        }
    }

    /// Whether this is the fallback produced for unrecognized text.
    pub fn is_unknown(&self) -> bool {
        matches!(self, NanoAction::StateMutation { path, .. } if path == UNKNOWN_ACTION_PATH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationOp {
    #[default]
    Set,
    Add,
    Subtract,
}

impl MutationOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationOp::Set => "SET",
            MutationOp::Add => "ADD",
            MutationOp::Subtract => "SUBTRACT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SET" => Some(MutationOp::Set),
            "ADD" => Some(MutationOp::Add),
            "SUBTRACT" => Some(MutationOp::Subtract),
            _ => None,
        }
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Case-insensitive lookup. Unknown names fall back to GET.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A request body field: a literal string or a state reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyField {
    Literal(String),
    /// State path without the `state.` prefix.
    State(String),
}

impl BodyField {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2 {
            return Some(BodyField::Literal(unquote(raw)));
        }
        let path = raw.strip_prefix("state.")?;
        is_dotted_path(path).then(|| BodyField::State(path.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchAction {
    pub url: String,
    pub method: HttpMethod,
    pub body: Option<BTreeMap<String, BodyField>>,
    pub headers: Option<BTreeMap<String, String>>,
    pub on_success: Option<Box<NanoAction>>,
    pub on_error: Option<Box<NanoAction>>,
    /// State path toggled while the request is in flight.
    pub loading_state: Option<String>,
}

// ============================================================================
// Single-line actions
// ============================================================================

/// Parse one action expression. Never fails.
pub fn parse_action(text: &str) -> NanoAction {
    let text = text.trim();

    if text.starts_with("Navigate(") {
        return parse_navigate(text);
    }

    if let Some(message) = parse_show_toast(text) {
        return NanoAction::ShowToast { message };
    }

    if text.starts_with("Fetch(") {
        return NanoAction::Fetch(parse_fetch(text));
    }

    if let Some(mutation) = parse_state_mutation(text) {
        return mutation;
    }

    NanoAction::unknown(text)
}

fn call_body<'a>(text: &'a str, prefix: &str) -> &'a str {
    let body = text.strip_prefix(prefix).unwrap_or(text);
    body.strip_suffix(')').unwrap_or(body)
}

fn parse_navigate(text: &str) -> NanoAction {
    let body = call_body(text, "Navigate(");
    NanoAction::Navigate {
        to: keyed_string(body, "to").unwrap_or_else(|| "/".to_string()),
        params: keyed_map(body, "params"),
        query: keyed_map(body, "query"),
        replace: keyed_bool(body, "replace").unwrap_or(false),
    }
}

/// `ShowToast("message")`
fn parse_show_toast(text: &str) -> Option<String> {
    let rest = text.strip_prefix("ShowToast(\"")?;
    let end = rest.find("\")")?;
    (end > 0).then(|| rest[..end].to_string())
}

fn parse_fetch(text: &str) -> FetchAction {
    let body = call_body(text, "Fetch(");
    FetchAction {
        url: keyed_string(body, "url").unwrap_or_else(|| "/api/unknown".to_string()),
        method: keyed_string(body, "method")
            .map(|m| HttpMethod::from_name(&m))
            .unwrap_or_default(),
        body: keyed_braces(body, "body").and_then(parse_body_fields),
        headers: keyed_braces(body, "headers").and_then(parse_string_map),
        ..FetchAction::default()
    }
}

/// `state.<path> (+=|-=|=) <expr>`
fn parse_state_mutation(text: &str) -> Option<NanoAction> {
    let rest = text.strip_prefix("state.")?;
    let path_end = rest
        .char_indices()
        .find(|(_, ch)| !(is_word_char(*ch) || *ch == '.'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let path = &rest[..path_end];
    if !is_dotted_path(path) {
        return None;
    }

    let rest = rest[path_end..].trim_start();
    let (op, value) = if let Some(v) = rest.strip_prefix("+=") {
        (MutationOp::Add, v)
    } else if let Some(v) = rest.strip_prefix("-=") {
        (MutationOp::Subtract, v)
    } else if let Some(v) = rest.strip_prefix('=') {
        if v.starts_with('=') {
            return None;
        }
        (MutationOp::Set, v)
    } else {
        return None;
    };

    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    Some(NanoAction::StateMutation {
        path: path.to_string(),
        op,
        value: value.to_string(),
    })
}

// ============================================================================
// Multi-line action blocks
// ============================================================================

/// Parse the indented lines under an `on_click:` opener.
///
/// Each line is one action, except that `Fetch(` without a closing paren
/// opens a multi-line fetch terminated by a line holding only `)`.
pub fn parse_action_block(lines: &[&str]) -> NanoAction {
    let mut actions = Vec::new();
    let mut pending: Option<FetchAction> = None;

    for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if let Some(fetch) = pending.as_mut() {
            if line == ")" {
                actions.push(NanoAction::Fetch(std::mem::take(fetch)));
                pending = None;
            } else {
                apply_fetch_line(fetch, line);
            }
            continue;
        }

        if line.starts_with("Fetch(") && !line.ends_with(')') {
            let mut fetch = FetchAction::default();
            let opener = line.trim_start_matches("Fetch(");
            if let Some(url) = keyed_string(opener, "url") {
                fetch.url = url;
            }
            if let Some(method) = keyed_string(opener, "method") {
                fetch.method = HttpMethod::from_name(&method);
            }
            pending = Some(fetch);
            continue;
        }

        actions.push(parse_action(line));
    }

    if let Some(fetch) = pending {
        log::debug!("unterminated multi-line Fetch in action block, closing it");
        actions.push(NanoAction::Fetch(fetch));
    }

    match actions.len() {
        0 => NanoAction::unknown(""),
        1 => actions.remove(0),
        _ => NanoAction::Sequence(actions),
    }
}

fn apply_fetch_line(fetch: &mut FetchAction, line: &str) {
    let line = line.trim().trim_end_matches(',').trim_end();

    if let Some(action) = line.strip_prefix("on_success:") {
        let action = action.trim();
        if !action.is_empty() {
            fetch.on_success = Some(Box::new(parse_action(action)));
        }
        return;
    }
    if let Some(action) = line.strip_prefix("on_error:") {
        let action = action.trim();
        if !action.is_empty() {
            fetch.on_error = Some(Box::new(parse_action(action)));
        }
        return;
    }

    if let Some(url) = keyed_string(line, "url") {
        fetch.url = url;
    }
    if let Some(method) = keyed_string(line, "method") {
        fetch.method = HttpMethod::from_name(&method);
    }
    if let Some(fields) = keyed_braces(line, "body").and_then(parse_body_fields) {
        fetch.body = Some(fields);
    }
    if let Some(headers) = keyed_braces(line, "headers").and_then(parse_string_map) {
        fetch.headers = Some(headers);
    }
    if let Some(rest) = keyed_value(line, "loading_state") {
        let path = unquote(rest.trim());
        let path = path.strip_prefix("state.").unwrap_or(&path);
        if is_dotted_path(path) {
            fetch.loading_state = Some(path.to_string());
        }
    }
}

// ============================================================================
// Keyed argument helpers
// ============================================================================

/// Text following `key =` where `key` starts at a word boundary.
fn keyed_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find(key) {
        let start = search_from + offset;
        let end = start + key.len();
        search_from = end;

        let boundary_before = text[..start]
            .chars()
            .next_back()
            .map_or(true, |ch| !is_word_char(ch));
        if !boundary_before {
            continue;
        }
        if let Some(rest) = text[end..].trim_start().strip_prefix('=') {
            if !rest.starts_with('=') {
                return Some(rest.trim_start());
            }
        }
    }
    None
}

/// `key="value"` with a non-empty value.
fn keyed_string(text: &str, key: &str) -> Option<String> {
    let rest = keyed_value(text, key)?.strip_prefix('"')?;
    let end = rest.find('"')?;
    (end > 0).then(|| rest[..end].to_string())
}

/// `key=true` / `key=false`
fn keyed_bool(text: &str, key: &str) -> Option<bool> {
    let rest = keyed_value(text, key)?;
    if rest.starts_with("true") {
        Some(true)
    } else if rest.starts_with("false") {
        Some(false)
    } else {
        None
    }
}

/// Inner text of `key={...}` (no nested braces).
fn keyed_braces<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let rest = keyed_value(text, key)?.strip_prefix('{')?;
    let end = rest.find('}')?;
    Some(&rest[..end])
}

/// Map value of `key={"k": "v" | state.path}`. Literal quotes are removed,
/// state references are kept as written.
fn keyed_map(text: &str, key: &str) -> Option<BTreeMap<String, String>> {
    let entries: BTreeMap<String, String> = map_entries(keyed_braces(text, key)?)
        .filter_map(|(k, v)| match BodyField::parse(v)? {
            BodyField::Literal(literal) => Some((k, literal)),
            BodyField::State(_) => Some((k, v.trim().to_string())),
        })
        .collect();
    (!entries.is_empty()).then_some(entries)
}

fn parse_body_fields(content: &str) -> Option<BTreeMap<String, BodyField>> {
    let fields: BTreeMap<String, BodyField> = map_entries(content)
        .filter_map(|(k, v)| BodyField::parse(v).map(|field| (k, field)))
        .collect();
    (!fields.is_empty()).then_some(fields)
}

fn parse_string_map(content: &str) -> Option<BTreeMap<String, String>> {
    let map: BTreeMap<String, String> = map_entries(content)
        .filter_map(|(k, v)| match BodyField::parse(v)? {
            BodyField::Literal(literal) => Some((k, literal)),
            BodyField::State(_) => None,
        })
        .collect();
    (!map.is_empty()).then_some(map)
}

/// `"key": value` pairs of a brace body, keys unquoted.
fn map_entries(content: &str) -> impl Iterator<Item = (String, &str)> {
    split_top_level(content, ',').into_iter().filter_map(|entry| {
        let rest = entry.trim().strip_prefix('"')?;
        let close = rest.find('"')?;
        let key = &rest[..close];
        let value = rest[close + 1..].trim_start().strip_prefix(':')?;
        (!key.is_empty()).then(|| (key.to_string(), value.trim()))
    })
}
