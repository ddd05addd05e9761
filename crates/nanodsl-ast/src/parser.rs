//! Indentation-driven structural parser.
//!
//! Walks the tagged lines once, top to bottom. A block is every following
//! non-blank line whose indentation is strictly greater than its opener's;
//! the first line at or below the opener's indentation ends it. Lines are
//! classified with the ordered tables in [`crate::grammar`] and the first
//! matching rule decides what the line becomes.

use std::collections::BTreeMap;

use crate::action::{parse_action, parse_action_block, NanoAction};
use crate::args::{unquote, CallArgs};
use crate::ast::{
    Badge, Binding, Button, Card, Checkbox, Component, ComponentParam, Conditional, ForLoop, Form,
    HStack, Image, Input, NanoNode, Select, StateBlock, StateVariable, Text, TextArea, VStack,
};
use crate::grammar::{self, LineKind, BODY_RULES, NODE_RULES};
use crate::lexer::{first_non_blank, tokenize, Line};
use crate::{ParseError, ParseResult};

/// Parse a complete source into a component.
pub fn parse(source: &str) -> ParseResult {
    let lines = tokenize(source);

    let Some(first) = first_non_blank(&lines, 0) else {
        return ParseResult::Failure(vec![ParseError::new("Empty source", 0)]);
    };

    let header = lines[first];
    let Some(LineKind::ComponentHeader { name, params }) = grammar::component_header(header.text)
    else {
        return ParseResult::Failure(vec![ParseError::new(
            format!("Invalid component definition: {}", header.text),
            header.number,
        )]);
    };

    let params = grammar::split_params(params)
        .into_iter()
        .map(|(name, ty)| ComponentParam {
            name: name.to_string(),
            param_type: ty.map(str::to_string),
        })
        .collect();

    let mut parser = Parser::new(lines, first + 1);
    let children = parser.parse_nodes(header.indent, true);

    if let Some(trailing) = parser.current() {
        log::debug!(
            "line {}: ignoring content after component '{}'",
            trailing.number,
            name
        );
    }

    ParseResult::Success(Component {
        name: name.to_string(),
        params,
        state: parser.state,
        children,
    })
}

struct Parser<'s> {
    lines: Vec<Line<'s>>,
    pos: usize,
    state: Option<StateBlock>,
}

impl<'s> Parser<'s> {
    fn new(lines: Vec<Line<'s>>, pos: usize) -> Self {
        Self {
            lines,
            pos,
            state: None,
        }
    }

    /// The next non-blank line, blank lines consumed.
    fn current(&mut self) -> Option<Line<'s>> {
        while let Some(line) = self.lines.get(self.pos) {
            if !line.is_blank() {
                return Some(*line);
            }
            self.pos += 1;
        }
        None
    }

    /// Consume the next line of the block opened at `base`, if any.
    fn next_in_block(&mut self, base: usize) -> Option<Line<'s>> {
        let line = self.current()?;
        if line.indent <= base {
            return None;
        }
        self.pos += 1;
        Some(line)
    }

    // ========================================================================
    // Node position
    // ========================================================================

    /// Parse the nodes of a block. Only the component's own block may
    /// declare state.
    fn parse_nodes(&mut self, base: usize, root: bool) -> Vec<NanoNode> {
        let mut nodes = Vec::new();
        while let Some(line) = self.next_in_block(base) {
            let kind = grammar::classify(NODE_RULES, line.text);
            log::trace!("line {}: {:?}", line.number, kind);

            match kind {
                LineKind::StateOpener => {
                    let block = self.parse_state_block(line.indent);
                    if root {
                        self.merge_state(block);
                    } else {
                        log::debug!("line {}: nested state block ignored", line.number);
                    }
                }
                _ => {
                    if let Some(node) = self.parse_node(line, kind) {
                        nodes.push(node);
                    }
                }
            }
        }
        nodes
    }

    fn parse_node(&mut self, line: Line<'s>, kind: LineKind<'s>) -> Option<NanoNode> {
        match kind {
            LineKind::If { condition } => Some(NanoNode::Conditional(Conditional {
                condition: condition.to_string(),
                then_branch: self.parse_nodes(line.indent, false),
            })),
            LineKind::For { variable, iterable } => Some(NanoNode::ForLoop(ForLoop {
                variable: variable.to_string(),
                iterable: iterable.to_string(),
                body: self.parse_nodes(line.indent, false),
            })),
            LineKind::Divider => Some(NanoNode::Divider),
            LineKind::BlockCall { name, args } => {
                let body = self.parse_call_body(line.indent);
                create_node(name, &CallArgs::parse(args), body, line.number)
            }
            LineKind::InlineCall { name, args } => create_node(
                name,
                &CallArgs::parse(args),
                CallBody::default(),
                line.number,
            ),
            _ => {
                log::debug!("line {}: skipping unrecognized line {:?}", line.number, line.text);
                None
            }
        }
    }

    // ========================================================================
    // State
    // ========================================================================

    fn parse_state_block(&mut self, base: usize) -> StateBlock {
        let mut block = StateBlock::default();
        while let Some(line) = self.next_in_block(base) {
            match grammar::state_variable(line.text) {
                Some(LineKind::StateVariable {
                    name,
                    var_type,
                    default_value,
                }) => {
                    if block.get(name).is_some() {
                        log::debug!(
                            "line {}: duplicate state variable '{}' dropped",
                            line.number,
                            name
                        );
                        continue;
                    }
                    block.variables.push(StateVariable {
                        name: name.to_string(),
                        var_type: var_type.to_string(),
                        default_value: default_value.to_string(),
                    });
                }
                _ => log::debug!("line {}: skipping non-variable state line", line.number),
            }
        }
        block
    }

    fn merge_state(&mut self, block: StateBlock) {
        let state = self.state.get_or_insert_with(StateBlock::default);
        for variable in block.variables {
            if state.get(&variable.name).is_none() {
                state.variables.push(variable);
            }
        }
    }

    // ========================================================================
    // Invocation bodies
    // ========================================================================

    fn parse_call_body(&mut self, base: usize) -> CallBody {
        let mut body = CallBody::default();
        while let Some(line) = self.next_in_block(base) {
            let kind = grammar::classify(BODY_RULES, line.text);
            log::trace!("line {}: {:?}", line.number, kind);

            match kind {
                LineKind::OnClickBlock => {
                    let lines = self.block_text(line.indent);
                    body.on_click = Some(parse_action_block(&lines));
                }
                LineKind::OnClick { action } => body.on_click = Some(parse_action(action)),
                LineKind::ContentBlock => {
                    let children = self.parse_nodes(line.indent, false);
                    body.children.extend(children);
                }
                LineKind::Property { key, value } => {
                    if !value.is_empty() {
                        body.props.insert(key.to_string(), unquote(value));
                    }
                }
                kind if kind.is_node() => {
                    if let Some(node) = self.parse_node(line, kind) {
                        body.children.push(node);
                    }
                }
                // BODY_RULES already holds every node rule a body line can
                // match, so nothing is left to retry.
                _ => log::debug!("line {}: skipping unrecognized line {:?}", line.number, line.text),
            }
        }
        body
    }

    /// Raw text of every line in the block opened at `base`.
    fn block_text(&mut self, base: usize) -> Vec<&'s str> {
        let mut text = Vec::new();
        while let Some(line) = self.next_in_block(base) {
            text.push(line.text);
        }
        text
    }
}

/// Everything gathered from the indented body of `Name(args):`.
#[derive(Debug, Default)]
struct CallBody {
    props: BTreeMap<String, String>,
    children: Vec<NanoNode>,
    on_click: Option<NanoAction>,
}

/// Attribute lookup: a call-site argument beats a property line.
struct Attrs<'a> {
    args: &'a CallArgs,
    props: &'a BTreeMap<String, String>,
}

impl<'a> Attrs<'a> {
    fn get(&self, key: &str) -> Option<String> {
        self.args
            .literal(key)
            .or_else(|| self.props.get(key).map(String::as_str))
            .map(str::to_string)
    }

    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// The primary positional string, else the named attribute.
    fn primary_or(&self, key: &str) -> Option<String> {
        self.args
            .primary()
            .map(str::to_string)
            .or_else(|| self.get(key))
    }

    fn binding(&self, key: &str) -> Option<Binding> {
        self.args
            .binding(key)
            .or_else(|| self.props.get(key).map(|value| Binding::parse(value)))
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.get(key)?.trim().parse().ok()
    }
}

/// Build the node for `name`. Unknown names produce nothing.
fn create_node(name: &str, args: &CallArgs, body: CallBody, line: usize) -> Option<NanoNode> {
    let attrs = Attrs {
        args,
        props: &body.props,
    };

    let node = match name {
        "VStack" => NanoNode::VStack(VStack {
            spacing: attrs.get("spacing"),
            align: attrs.get("align"),
            children: body.children,
        }),
        "HStack" => NanoNode::HStack(HStack {
            spacing: attrs.get("spacing"),
            align: attrs.get("align"),
            justify: attrs.get("justify"),
            children: body.children,
        }),
        "Card" => NanoNode::Card(Card {
            padding: attrs.get("padding"),
            shadow: attrs.get("shadow"),
            children: body.children,
        }),
        "Form" => NanoNode::Form(Form {
            on_submit: attrs.first_of(&["onSubmit", "on_submit"]),
            children: body.children,
        }),
        "Text" => {
            let binding = attrs.binding("content").filter(|b| !b.is_static());
            let content = if binding.is_some() {
                String::new()
            } else {
                attrs.primary_or("content").unwrap_or_default()
            };
            NanoNode::Text(Text {
                content,
                style: attrs.get("style"),
                binding,
            })
        }
        "Button" => NanoNode::Button(Button {
            label: attrs.primary_or("label").unwrap_or_default(),
            intent: attrs.get("intent"),
            icon: attrs.get("icon"),
            on_click: body.on_click,
        }),
        "Image" => NanoNode::Image(Image {
            src: attrs.primary_or("src").unwrap_or_default(),
            aspect: attrs.get("aspect"),
            radius: attrs.get("radius"),
            alt: attrs.get("alt"),
            width: attrs.int("width"),
        }),
        "Badge" => NanoNode::Badge(Badge {
            text: attrs.primary_or("text").unwrap_or_default(),
            color: attrs.get("color"),
        }),
        "Divider" => NanoNode::Divider,
        "Input" => NanoNode::Input(Input {
            value: attrs.binding("value"),
            placeholder: attrs.get("placeholder"),
            input_type: attrs.get("type"),
        }),
        "Checkbox" => NanoNode::Checkbox(Checkbox {
            checked: attrs.binding("checked"),
            label: attrs.primary_or("label"),
        }),
        "TextArea" => NanoNode::TextArea(TextArea {
            value: attrs.binding("value"),
            placeholder: attrs.get("placeholder"),
            rows: attrs.int("rows"),
        }),
        "Select" => NanoNode::Select(Select {
            value: attrs.binding("value"),
            options: attrs.get("options"),
            placeholder: attrs.get("placeholder"),
        }),
        _ => {
            log::debug!("line {}: unknown component '{}' dropped", line, name);
            return None;
        }
    };
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::MutationOp;
    use pretty_assertions::assert_eq;

    fn parse_ok(source: &str) -> Component {
        match parse(source) {
            ParseResult::Success(component) => component,
            ParseResult::Failure(errors) => panic!("expected success, got {:?}", errors),
        }
    }

    #[test]
    fn test_header_with_params() {
        let component = parse_ok("component Item(id: string, count):\n    Divider");
        assert_eq!(component.name, "Item");
        assert_eq!(
            component.params,
            vec![
                ComponentParam {
                    name: "id".to_string(),
                    param_type: Some("string".to_string()),
                },
                ComponentParam {
                    name: "count".to_string(),
                    param_type: None,
                },
            ]
        );
    }

    #[test]
    fn test_empty_source() {
        match parse("   \n\n") {
            ParseResult::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].line, 0);
            }
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn test_header_failure_cites_line() {
        match parse("\n\nCard:\n    Text(\"x\")") {
            ParseResult::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].line, 3);
                assert!(errors[0].message.contains("Card:"));
            }
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn test_argument_beats_property() {
        let source = "component A:\n    Card(padding=\"lg\"):\n        padding: \"sm\"\n        shadow: \"md\"\n        Text(\"x\")";
        let component = parse_ok(source);
        match &component.children[0] {
            NanoNode::Card(card) => {
                assert_eq!(card.padding.as_deref(), Some("lg"));
                assert_eq!(card.shadow.as_deref(), Some("md"));
                assert_eq!(card.children.len(), 1);
            }
            other => panic!("expected card, got {:?}", other),
        }
    }

    #[test]
    fn test_content_block_children() {
        let source = "component A:\n    Card:\n        padding: \"lg\"\n        content:\n            Text(\"one\")\n            Text(\"two\")";
        let component = parse_ok(source);
        let card = &component.children[0];
        assert_eq!(card.children().len(), 2);
        assert_eq!(card.children()[1].kind(), "Text");
    }

    #[test]
    fn test_state_block() {
        let source = "component Counter:\n    state:\n        count: int = 0\n        count: int = 5\n        garbage here\n        name: str = \"x\"\n    Text(content << state.count)";
        let component = parse_ok(source);
        let state = component.state.expect("state block");
        assert_eq!(state.variables.len(), 2);
        assert_eq!(state.variables[0].default_value, "0");
        assert_eq!(state.variables[1].default_value, "\"x\"");

        match &component.children[0] {
            NanoNode::Text(text) => {
                assert_eq!(text.content, "");
                assert_eq!(
                    text.binding,
                    Some(Binding::Subscribe("state.count".to_string()))
                );
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_on_click_forms() {
        let source = "component A:\n    Button(\"Add\"):\n        on_click: state.count += 1\n    Button(\"Go\"):\n        on_click:\n            state.loading = true\n            Navigate(to=\"/next\")";
        let component = parse_ok(source);

        match &component.children[0] {
            NanoNode::Button(button) => assert_eq!(
                button.on_click,
                Some(NanoAction::StateMutation {
                    path: "count".to_string(),
                    op: MutationOp::Add,
                    value: "1".to_string(),
                })
            ),
            other => panic!("expected button, got {:?}", other),
        }
        match &component.children[1] {
            NanoNode::Button(Button {
                on_click: Some(NanoAction::Sequence(actions)),
                ..
            }) => assert_eq!(actions.len(), 2),
            other => panic!("expected sequence button, got {:?}", other),
        }
    }

    #[test]
    fn test_control_flow() {
        let source = "component A:\n    for item in items:\n        Text(item.name)\n        if item.is_new:\n            Badge(\"New\")\n    Divider";
        let component = parse_ok(source);
        assert_eq!(component.children.len(), 2);
        match &component.children[0] {
            NanoNode::ForLoop(for_loop) => {
                assert_eq!(for_loop.variable, "item");
                assert_eq!(for_loop.iterable, "items");
                assert_eq!(for_loop.body.len(), 2);
                assert_eq!(for_loop.body[1].kind(), "Conditional");
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_component_dropped() {
        let source = "component A:\n    Foo(x=1)\n    Widget:\n        Text(\"inside\")\n    Text(\"kept\")";
        let component = parse_ok(source);
        assert_eq!(component.children.len(), 1);
        assert_eq!(component.children[0].kind(), "Text");
    }

    #[test]
    fn test_input_bindings_and_ints() {
        let source = "component A:\n    Input(value := state.email, placeholder=\"Email\", type=\"email\")\n    TextArea(rows=6)\n    Image(src=\"/a.png\", width=\"120\")";
        let component = parse_ok(source);
        match &component.children[0] {
            NanoNode::Input(input) => {
                assert_eq!(input.value, Some(Binding::TwoWay("state.email".to_string())));
                assert_eq!(input.input_type.as_deref(), Some("email"));
            }
            other => panic!("expected input, got {:?}", other),
        }
        match &component.children[1] {
            NanoNode::TextArea(area) => assert_eq!(area.rows, Some(6)),
            other => panic!("expected textarea, got {:?}", other),
        }
        match &component.children[2] {
            NanoNode::Image(image) => assert_eq!(image.width, Some(120)),
            other => panic!("expected image, got {:?}", other),
        }
    }
}
