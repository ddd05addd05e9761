//! Outline renderer: one line per node, children indented two spaces.
//!
//! ```text
//! Component name="Greeting"
//!   Card padding="md"
//!     Text content="Hello!" style="h2"
//! ```
//!
//! Useful in tests and logs: the number of lines equals the number of nodes,
//! in document order.

use crate::context::RenderContext;
use crate::ir::NanoIR;
use crate::renderer::NanoRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct DebugRenderer;

impl DebugRenderer {
    fn outline(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let mut line = ir.node_type.clone();
        for (key, value) in &ir.props {
            line.push_str(&format!(" {}={}", key, value));
        }
        if let Some(condition) = &ir.condition {
            line.push_str(&format!(" if={:?}", condition));
        }
        if let Some(l) = &ir.loop_info {
            line.push_str(&format!(" for={:?} in={:?}", l.variable, l.iterable));
        }
        for (prop, binding) in ir.bindings.iter().flatten() {
            line.push_str(&format!(" {}<-{}", prop, binding.expression));
        }
        for (event, action) in ir.actions.iter().flatten() {
            line.push_str(&format!(" {}->{}", event, action.action_type));
        }
        line.push('\n');

        for child in ir.children() {
            for child_line in self.render_node(child, ctx).lines() {
                line.push_str("  ");
                line.push_str(child_line);
                line.push('\n');
            }
        }
        line
    }
}

impl NanoRenderer<String> for DebugRenderer {
    fn render(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.render_node(ir, ctx)
    }

    fn render_component(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_vstack(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_hstack(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_card(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_form(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_text(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_image(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_badge(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_divider(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_button(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_input(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_checkbox(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_textarea(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_select(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_conditional(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }
    fn render_for_loop(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.outline(ir, ctx)
    }

    fn render_unknown(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        format!("?{}", self.outline(ir, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DefaultActionHandler, NanoState};
    use crate::theme::NanoTheme;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outline() {
        let ir = NanoIR::container(
            "Card",
            vec![
                NanoIR::new("Text").with_prop("content", Some("Hi")),
                NanoIR::new("Sparkline"),
            ],
        )
        .with_prop("padding", Some("md"));

        let state = NanoState::new();
        let theme = NanoTheme::default();
        let ctx = RenderContext::new(&state, &DefaultActionHandler, &theme);

        assert_eq!(
            DebugRenderer.render(&ir, &ctx),
            "Card padding=\"md\"\n  Text content=\"Hi\"\n  ?Sparkline\n"
        );
    }
}
