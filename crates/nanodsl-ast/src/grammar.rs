//! Grammar rules: single-line classifiers.
//!
//! Every NanoDSL construct occupies one logical line. A rule inspects one
//! trimmed line and either recognizes it or declines. Rules are grouped into
//! ordered tables and the first rule that recognizes a line wins; there is no
//! backtracking.

use crate::args::{is_word, leading_word};

/// What a single trimmed line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `component Name(params):`
    ComponentHeader { name: &'a str, params: &'a str },
    /// `state:`
    StateOpener,
    /// `name: Type = default`
    StateVariable {
        name: &'a str,
        var_type: &'a str,
        default_value: &'a str,
    },
    /// `if <expr>:`
    If { condition: &'a str },
    /// `for <var> in <expr>:`
    For { variable: &'a str, iterable: &'a str },
    /// `Divider`
    Divider,
    /// `Name(args):` or `Name:`
    BlockCall { name: &'a str, args: &'a str },
    /// `Name(args)` or bare `Name`
    InlineCall { name: &'a str, args: &'a str },
    /// `on_click:` with the actions on the following indented lines.
    OnClickBlock,
    /// `on_click: <action>`
    OnClick { action: &'a str },
    /// `content:` with children on the following indented lines.
    ContentBlock,
    /// `key: value`
    Property { key: &'a str, value: &'a str },
    /// Matched by no rule.
    Unknown,
}

impl<'a> LineKind<'a> {
    /// Whether the line produces (or may produce) a node.
    pub fn is_node(&self) -> bool {
        matches!(
            self,
            LineKind::If { .. }
                | LineKind::For { .. }
                | LineKind::Divider
                | LineKind::BlockCall { .. }
                | LineKind::InlineCall { .. }
        )
    }

    /// Whether the line opens an indented block.
    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            LineKind::ComponentHeader { .. }
                | LineKind::StateOpener
                | LineKind::If { .. }
                | LineKind::For { .. }
                | LineKind::BlockCall { .. }
                | LineKind::OnClickBlock
                | LineKind::ContentBlock
        )
    }
}

/// A grammar rule: recognize one trimmed line or decline.
pub type Rule = for<'a> fn(&'a str) -> Option<LineKind<'a>>;

/// Rules for a line in node position (component, `if`, `for` and
/// `content:` blocks), in priority order.
pub const NODE_RULES: &[(&str, Rule)] = &[
    ("state", state_opener),
    ("if", conditional),
    ("for", for_loop),
    ("divider", divider),
    ("block_call", block_call),
    ("inline_call", inline_call),
];

/// Rules for a line inside a `Name(args):` body, in priority order.
///
/// `on_click:` and `content:` must precede `block_call`, which would
/// otherwise read them as invocations of components named `on_click` and
/// `content`. Node rules precede `property` so that `VStack:` is not read
/// as an empty property.
pub const BODY_RULES: &[(&str, Rule)] = &[
    ("on_click", on_click),
    ("content", content_block),
    ("if", conditional),
    ("for", for_loop),
    ("divider", divider),
    ("block_call", block_call),
    ("inline_call", inline_call),
    ("property", property),
];

/// Rules for a line inside a `state:` block.
pub const STATE_RULES: &[(&str, Rule)] = &[("state_variable", state_variable)];

/// Apply `rules` in order; the first match wins.
pub fn classify<'a>(rules: &[(&str, Rule)], text: &'a str) -> LineKind<'a> {
    rules
        .iter()
        .find_map(|(_, rule)| rule(text))
        .unwrap_or(LineKind::Unknown)
}

/// Name of the first rule in `rules` that recognizes `text`.
pub fn matching_rule(rules: &[(&'static str, Rule)], text: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|(_, rule)| rule(text).is_some())
        .map(|(name, _)| *name)
}

// ============================================================================
// Rules
// ============================================================================

/// `component Name(params):`
pub fn component_header(text: &str) -> Option<LineKind<'_>> {
    let rest = text.strip_prefix("component")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (name, params) = call_with_colon(rest.trim_start())?;
    Some(LineKind::ComponentHeader { name, params })
}

pub fn state_opener(text: &str) -> Option<LineKind<'_>> {
    let rest = text.strip_prefix("state")?.trim_start().strip_prefix(':')?;
    rest.trim().is_empty().then_some(LineKind::StateOpener)
}

/// `name: Type = default`
pub fn state_variable(text: &str) -> Option<LineKind<'_>> {
    let (name, rest) = leading_word(text)?;
    let rest = rest.strip_prefix(':')?.trim_start();
    let (var_type, rest) = leading_word(rest)?;
    let default_value = rest.trim_start().strip_prefix('=')?.trim();
    if default_value.is_empty() {
        return None;
    }
    Some(LineKind::StateVariable {
        name,
        var_type,
        default_value,
    })
}

/// `if <expr>:`
pub fn conditional(text: &str) -> Option<LineKind<'_>> {
    let rest = keyword(text, "if")?;
    let condition = rest.trim_end().strip_suffix(':')?.trim();
    (!condition.is_empty()).then_some(LineKind::If { condition })
}

/// `for <var> in <expr>:`
pub fn for_loop(text: &str) -> Option<LineKind<'_>> {
    let rest = keyword(text, "for")?;
    let (variable, rest) = leading_word(rest)?;
    let rest = keyword(rest.trim_start(), "in")?;
    let iterable = rest.trim_end().strip_suffix(':')?.trim();
    (!iterable.is_empty()).then_some(LineKind::For { variable, iterable })
}

pub fn divider(text: &str) -> Option<LineKind<'_>> {
    (text == "Divider").then_some(LineKind::Divider)
}

/// `Name(args):` or `Name:`
pub fn block_call(text: &str) -> Option<LineKind<'_>> {
    let (name, args) = call_with_colon(text)?;
    Some(LineKind::BlockCall { name, args })
}

/// `Name(args)` or `Name`
pub fn inline_call(text: &str) -> Option<LineKind<'_>> {
    let (name, rest) = leading_word(text)?;
    if rest.is_empty() {
        return Some(LineKind::InlineCall { name, args: "" });
    }
    let args = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(LineKind::InlineCall { name, args })
}

/// `on_click:` or `on_click: <action>`
pub fn on_click(text: &str) -> Option<LineKind<'_>> {
    let action = text.strip_prefix("on_click:")?.trim();
    if action.is_empty() {
        Some(LineKind::OnClickBlock)
    } else {
        Some(LineKind::OnClick { action })
    }
}

/// `content:` with nothing after the colon.
pub fn content_block(text: &str) -> Option<LineKind<'_>> {
    let rest = text.strip_prefix("content:")?;
    rest.trim().is_empty().then_some(LineKind::ContentBlock)
}

/// `key: value`
pub fn property(text: &str) -> Option<LineKind<'_>> {
    let (key, rest) = leading_word(text)?;
    let value = rest.strip_prefix(':')?.trim();
    Some(LineKind::Property { key, value })
}

// ============================================================================
// Helpers
// ============================================================================

/// `Name` or `Name(args)` followed by a colon and nothing else.
fn call_with_colon(text: &str) -> Option<(&str, &str)> {
    let (name, rest) = leading_word(text)?;
    let rest = rest.trim_end().strip_suffix(':')?;
    if rest.is_empty() {
        return Some((name, ""));
    }
    let args = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some((name, args))
}

/// Strip a keyword that must be followed by whitespace.
fn keyword<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

/// Split a header's parameter list: `id: string, count` .
pub fn split_params(params: &str) -> Vec<(&str, Option<&str>)> {
    params
        .split(',')
        .filter_map(|param| {
            let param = param.trim();
            match param.split_once(':') {
                Some((name, ty)) => {
                    let name = name.trim();
                    let ty = ty.trim();
                    is_word(name).then(|| (name, (!ty.is_empty()).then_some(ty)))
                }
                None => is_word(param).then_some((param, None)),
            }
        })
        .collect()
}
