//! Typed AST for NanoDSL.
//!
//! The tree is immutable once built: the parser constructs it bottom-up and
//! nothing in the pipeline mutates it afterwards.

use crate::action::NanoAction;

// ============================================================================
// Root
// ============================================================================

/// Root of a parsed unit: `component Name(params):`.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub params: Vec<ComponentParam>,
    pub state: Option<StateBlock>,
    pub children: Vec<NanoNode>,
}

impl Component {
    /// Number of nodes in the tree, the component itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NanoNode::node_count).sum::<usize>()
    }
}

/// A component parameter, `name` or `name: type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentParam {
    pub name: String,
    pub param_type: Option<String>,
}

/// `state:` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateBlock {
    pub variables: Vec<StateVariable>,
}

impl StateBlock {
    pub fn get(&self, name: &str) -> Option<&StateVariable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// `name: Type = default` inside a state block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVariable {
    pub name: String,
    pub var_type: String,
    /// Default expression exactly as written, quotes included.
    pub default_value: String,
}

// ============================================================================
// Nodes
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum NanoNode {
    VStack(VStack),
    HStack(HStack),
    Card(Card),
    Form(Form),
    Text(Text),
    Button(Button),
    Image(Image),
    Badge(Badge),
    Divider,
    Input(Input),
    Checkbox(Checkbox),
    TextArea(TextArea),
    Select(Select),
    Conditional(Conditional),
    ForLoop(ForLoop),
}

impl NanoNode {
    /// The node's kind name as written in source.
    pub fn kind(&self) -> &'static str {
        match self {
            NanoNode::VStack(_) => "VStack",
            NanoNode::HStack(_) => "HStack",
            NanoNode::Card(_) => "Card",
            NanoNode::Form(_) => "Form",
            NanoNode::Text(_) => "Text",
            NanoNode::Button(_) => "Button",
            NanoNode::Image(_) => "Image",
            NanoNode::Badge(_) => "Badge",
            NanoNode::Divider => "Divider",
            NanoNode::Input(_) => "Input",
            NanoNode::Checkbox(_) => "Checkbox",
            NanoNode::TextArea(_) => "TextArea",
            NanoNode::Select(_) => "Select",
            NanoNode::Conditional(_) => "Conditional",
            NanoNode::ForLoop(_) => "ForLoop",
        }
    }

    /// Nested nodes, in document order. Leaves have none.
    pub fn children(&self) -> &[NanoNode] {
        match self {
            NanoNode::VStack(n) => &n.children,
            NanoNode::HStack(n) => &n.children,
            NanoNode::Card(n) => &n.children,
            NanoNode::Form(n) => &n.children,
            NanoNode::Conditional(n) => &n.then_branch,
            NanoNode::ForLoop(n) => &n.body,
            NanoNode::Text(_)
            | NanoNode::Button(_)
            | NanoNode::Image(_)
            | NanoNode::Badge(_)
            | NanoNode::Divider
            | NanoNode::Input(_)
            | NanoNode::Checkbox(_)
            | NanoNode::TextArea(_)
            | NanoNode::Select(_) => &[],
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(NanoNode::node_count).sum::<usize>()
    }
}

/// Vertical stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VStack {
    pub spacing: Option<String>,
    pub align: Option<String>,
    pub children: Vec<NanoNode>,
}

/// Horizontal stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HStack {
    pub spacing: Option<String>,
    pub align: Option<String>,
    pub justify: Option<String>,
    pub children: Vec<NanoNode>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Card {
    pub padding: Option<String>,
    pub shadow: Option<String>,
    pub children: Vec<NanoNode>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    /// Raw submit expression, e.g. `request.submit`.
    pub on_submit: Option<String>,
    pub children: Vec<NanoNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub content: String,
    pub style: Option<String>,
    /// Set when the content comes from state (`content << state.x`).
    pub binding: Option<Binding>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Button {
    pub label: String,
    pub intent: Option<String>,
    pub icon: Option<String>,
    pub on_click: Option<NanoAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub aspect: Option<String>,
    pub radius: Option<String>,
    pub alt: Option<String>,
    pub width: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    pub value: Option<Binding>,
    pub placeholder: Option<String>,
    pub input_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkbox {
    pub checked: Option<Binding>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextArea {
    pub value: Option<Binding>,
    pub placeholder: Option<String>,
    pub rows: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    pub value: Option<Binding>,
    /// Raw options expression, e.g. `countries`.
    pub options: Option<String>,
    pub placeholder: Option<String>,
}

/// `if <expr>:`. There is no else branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: String,
    pub then_branch: Vec<NanoNode>,
}

/// `for <variable> in <iterable>:`
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub variable: String,
    pub iterable: String,
    pub body: Vec<NanoNode>,
}

// ============================================================================
// Bindings
// ============================================================================

/// How an attribute value is connected to component state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Plain value, no state connection.
    Static(String),
    /// One-way: `key << state.path`.
    Subscribe(String),
    /// Two-way: `key := state.path`.
    TwoWay(String),
}

impl Binding {
    /// Classify a raw argument value, honoring `<<` and `:=` prefixes.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(expr) = raw.strip_prefix("<<") {
            Binding::Subscribe(expr.trim().to_string())
        } else if let Some(expr) = raw.strip_prefix(":=") {
            Binding::TwoWay(expr.trim().to_string())
        } else {
            Binding::Static(raw.to_string())
        }
    }

    /// The expression or static text.
    pub fn expression(&self) -> &str {
        match self {
            Binding::Static(s) | Binding::Subscribe(s) | Binding::TwoWay(s) => s,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Binding::Static(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_parse() {
        assert_eq!(
            Binding::parse("<< state.count"),
            Binding::Subscribe("state.count".to_string())
        );
        assert_eq!(
            Binding::parse(":= state.name"),
            Binding::TwoWay("state.name".to_string())
        );
        assert_eq!(Binding::parse("hello"), Binding::Static("hello".to_string()));
        assert!(Binding::parse("x").is_static());
    }

    #[test]
    fn test_node_count() {
        let component = Component {
            name: "A".to_string(),
            params: vec![],
            state: None,
            children: vec![NanoNode::Card(Card {
                children: vec![NanoNode::Divider, NanoNode::Text(Text::default())],
                ..Card::default()
            })],
        };
        assert_eq!(component.node_count(), 4);
        assert_eq!(component.children[0].kind(), "Card");
    }
}
