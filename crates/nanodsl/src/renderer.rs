//! Renderer abstraction over NanoIR.
//!
//! A renderer produces some `T` from an IR tree. Dispatch happens once, in
//! [`NanoRenderer::render_node`], on the closed [`NodeType`] vocabulary;
//! anything outside it goes to [`NanoRenderer::render_unknown`].

use crate::context::RenderContext;
use crate::ir::NanoIR;

/// The closed set of IR node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Component,
    VStack,
    HStack,
    Card,
    Form,
    Text,
    Image,
    Badge,
    Divider,
    Button,
    Input,
    Checkbox,
    TextArea,
    Select,
    Conditional,
    ForLoop,
}

impl NodeType {
    pub const ALL: [NodeType; 16] = [
        NodeType::Component,
        NodeType::VStack,
        NodeType::HStack,
        NodeType::Card,
        NodeType::Form,
        NodeType::Text,
        NodeType::Image,
        NodeType::Badge,
        NodeType::Divider,
        NodeType::Button,
        NodeType::Input,
        NodeType::Checkbox,
        NodeType::TextArea,
        NodeType::Select,
        NodeType::Conditional,
        NodeType::ForLoop,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Component => "Component",
            NodeType::VStack => "VStack",
            NodeType::HStack => "HStack",
            NodeType::Card => "Card",
            NodeType::Form => "Form",
            NodeType::Text => "Text",
            NodeType::Image => "Image",
            NodeType::Badge => "Badge",
            NodeType::Divider => "Divider",
            NodeType::Button => "Button",
            NodeType::Input => "Input",
            NodeType::Checkbox => "Checkbox",
            NodeType::TextArea => "TextArea",
            NodeType::Select => "Select",
            NodeType::Conditional => "Conditional",
            NodeType::ForLoop => "ForLoop",
        }
    }
}

/// Turns a NanoIR tree into `T`.
///
/// Implementors supply one method per node type plus [`render`] and
/// [`render_unknown`]; [`render_node`] dispatches. Children must be rendered
/// in order, and `render_unknown` must produce an inert placeholder rather
/// than fail.
///
/// [`render`]: NanoRenderer::render
/// [`render_unknown`]: NanoRenderer::render_unknown
/// [`render_node`]: NanoRenderer::render_node
pub trait NanoRenderer<T> {
    /// Render a complete tree, usually a `Component`.
    fn render(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;

    fn render_node(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T {
        let Some(node_type) = NodeType::from_tag(&ir.node_type) else {
            log::warn!("no renderer for node type '{}'", ir.node_type);
            return self.render_unknown(ir, ctx);
        };
        match node_type {
            NodeType::Component => self.render_component(ir, ctx),
            NodeType::VStack => self.render_vstack(ir, ctx),
            NodeType::HStack => self.render_hstack(ir, ctx),
            NodeType::Card => self.render_card(ir, ctx),
            NodeType::Form => self.render_form(ir, ctx),
            NodeType::Text => self.render_text(ir, ctx),
            NodeType::Image => self.render_image(ir, ctx),
            NodeType::Badge => self.render_badge(ir, ctx),
            NodeType::Divider => self.render_divider(ir, ctx),
            NodeType::Button => self.render_button(ir, ctx),
            NodeType::Input => self.render_input(ir, ctx),
            NodeType::Checkbox => self.render_checkbox(ir, ctx),
            NodeType::TextArea => self.render_textarea(ir, ctx),
            NodeType::Select => self.render_select(ir, ctx),
            NodeType::Conditional => self.render_conditional(ir, ctx),
            NodeType::ForLoop => self.render_for_loop(ir, ctx),
        }
    }

    fn supports(&self, node_type: &str) -> bool {
        NodeType::from_tag(node_type).is_some()
    }

    fn render_component(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_vstack(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_hstack(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_card(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_form(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_text(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_image(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_badge(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_divider(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_button(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_input(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_checkbox(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_textarea(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_select(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_conditional(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
    fn render_for_loop(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;

    /// Placeholder for a node type outside the vocabulary. Must not panic.
    fn render_unknown(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> T;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_round_trips_every_type() {
        for ty in NodeType::ALL {
            assert_eq!(NodeType::from_tag(ty.as_str()), Some(ty));
        }
        assert_eq!(NodeType::from_tag("Chart"), None);
        assert_eq!(NodeType::from_tag("vstack"), None);
    }
}
