//! Static HTML renderer.
//!
//! Produces a standalone document whose stylesheet is generated from the
//! context's theme. Control flow is not evaluated: `if` and `for` bodies are
//! emitted once between comment markers so a client-side runtime can take
//! over. Bound values are filled in from the state snapshot when it holds
//! them.

use serde_json::Value;

use crate::context::RenderContext;
use crate::html_escape::{class_suffix, comment, escape};
use crate::ir::NanoIR;
use crate::renderer::NanoRenderer;
use crate::theme::NanoTheme;

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a tree without the document wrapper.
    pub fn render_fragment(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        self.render_node(ir, ctx)
    }

    fn render_children(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        ir.children()
            .iter()
            .map(|child| self.render_node(child, ctx))
            .collect()
    }

    /// `<div class="...">children</div>`
    fn container(&self, class: &str, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        format!(
            "<div class=\"{}\">\n{}</div>\n",
            class,
            self.render_children(ir, ctx)
        )
    }
}

impl NanoRenderer<String> for HtmlRenderer {
    fn render(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("<style>\n");
        html.push_str(&stylesheet(ctx.theme));
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(&self.render_node(ir, ctx));
        html.push_str("</body>\n</html>");
        html
    }

    // ========================================================================
    // Layout
    // ========================================================================

    fn render_vstack(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let class = format!(
            "nano-vstack spacing-{} align-{}",
            class_prop(ir, "spacing", "md"),
            class_prop(ir, "align", "stretch")
        );
        self.container(&class, ir, ctx)
    }

    fn render_hstack(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let class = format!(
            "nano-hstack spacing-{} align-{} justify-{}",
            class_prop(ir, "spacing", "md"),
            class_prop(ir, "align", "center"),
            class_prop(ir, "justify", "start")
        );
        self.container(&class, ir, ctx)
    }

    // ========================================================================
    // Containers
    // ========================================================================

    fn render_card(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let class = format!(
            "nano-card padding-{} shadow-{}",
            class_prop(ir, "padding", "md"),
            class_prop(ir, "shadow", "sm")
        );
        self.container(&class, ir, ctx)
    }

    fn render_form(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let mut html = String::from("<form class=\"nano-form\"");
        if let Some(on_submit) = prop_text(ir, "onSubmit") {
            html.push_str(&format!(" data-action=\"{}\"", escape(&on_submit)));
        }
        html.push_str(">\n");
        html.push_str(&self.render_children(ir, ctx));
        html.push_str("</form>\n");
        html
    }

    fn render_component(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let name = prop_text(ir, "name").unwrap_or_else(|| "Component".to_string());
        format!(
            "<div class=\"nano-component\" data-name=\"{}\">\n{}</div>\n",
            escape(&name),
            self.render_children(ir, ctx)
        )
    }

    // ========================================================================
    // Content
    // ========================================================================

    fn render_text(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let content = bound_text(ir, "content", ctx).unwrap_or_default();
        let style = prop_text(ir, "style").unwrap_or_else(|| "body".to_string());
        let tag = match style.as_str() {
            "h1" => "h1",
            "h2" => "h2",
            "h3" => "h3",
            "h4" => "h4",
            "caption" => "small",
            _ => "p",
        };
        format!(
            "<{tag} class=\"nano-text style-{}\">{}</{tag}>\n",
            class_suffix(&style),
            escape(&content),
            tag = tag
        )
    }

    fn render_image(&self, ir: &NanoIR, _ctx: &RenderContext<'_>) -> String {
        let src = prop_text(ir, "src").unwrap_or_default();
        let alt = prop_text(ir, "alt").unwrap_or_else(|| "Image".to_string());
        let mut html = format!(
            "<img src=\"{}\" class=\"nano-image aspect-{} radius-{}\" alt=\"{}\"",
            escape(&src),
            class_prop(ir, "aspect", "auto"),
            class_prop(ir, "radius", "none"),
            escape(&alt)
        );
        if let Some(width) = prop_text(ir, "width") {
            html.push_str(&format!(" width=\"{}\"", escape(&width)));
        }
        html.push_str(">\n");
        html
    }

    fn render_badge(&self, ir: &NanoIR, _ctx: &RenderContext<'_>) -> String {
        format!(
            "<span class=\"nano-badge color-{}\">{}</span>\n",
            class_prop(ir, "color", "default"),
            escape(&prop_text(ir, "text").unwrap_or_default())
        )
    }

    fn render_divider(&self, _ir: &NanoIR, _ctx: &RenderContext<'_>) -> String {
        "<hr class=\"nano-divider\">\n".to_string()
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    fn render_button(&self, ir: &NanoIR, _ctx: &RenderContext<'_>) -> String {
        let mut html = format!(
            "<button class=\"nano-button intent-{}\"",
            class_prop(ir, "intent", "default")
        );
        if let Some(action) = ir.action("onClick") {
            html.push_str(&format!(
                " data-action=\"{}\"",
                escape(&action.action_type)
            ));
        }
        html.push('>');
        if let Some(icon) = prop_text(ir, "icon") {
            html.push_str(&format!("<span class=\"icon\">{}</span> ", escape(&icon)));
        }
        html.push_str(&escape(&prop_text(ir, "label").unwrap_or_default()));
        html.push_str("</button>\n");
        html
    }

    fn render_input(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let input_type = prop_text(ir, "type").unwrap_or_else(|| "text".to_string());
        let placeholder = prop_text(ir, "placeholder").unwrap_or_default();
        let mut html = format!(
            "<input type=\"{}\" class=\"nano-input\" placeholder=\"{}\"",
            escape(&input_type),
            escape(&placeholder)
        );
        if let Some(value) = bound_text(ir, "value", ctx) {
            html.push_str(&format!(" value=\"{}\"", escape(&value)));
        }
        html.push_str(">\n");
        html
    }

    fn render_checkbox(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let checked = match bound_value(ir, "checked", ctx) {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => s == "true" || s == "True",
            _ => false,
        };
        let input = format!(
            "<input type=\"checkbox\" class=\"nano-checkbox\"{}>",
            if checked { " checked" } else { "" }
        );
        match prop_text(ir, "label") {
            Some(label) => format!(
                "<label class=\"nano-checkbox-wrapper\">{}<span>{}</span></label>\n",
                input,
                escape(&label)
            ),
            None => format!("{}\n", input),
        }
    }

    fn render_textarea(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        format!(
            "<textarea class=\"nano-textarea\" placeholder=\"{}\" rows=\"{}\">{}</textarea>\n",
            escape(&prop_text(ir, "placeholder").unwrap_or_default()),
            escape(&prop_text(ir, "rows").unwrap_or_else(|| "4".to_string())),
            escape(&bound_text(ir, "value", ctx).unwrap_or_default())
        )
    }

    fn render_select(&self, ir: &NanoIR, _ctx: &RenderContext<'_>) -> String {
        let mut html = String::from("<select class=\"nano-select\">\n");
        if let Some(placeholder) = prop_text(ir, "placeholder") {
            html.push_str(&format!(
                "  <option value=\"\" disabled selected>{}</option>\n",
                escape(&placeholder)
            ));
        }
        if let Some(options) = prop_text(ir, "options") {
            html.push_str(&format!("  <!-- options: {} -->\n", comment(&options)));
        }
        html.push_str("</select>\n");
        html
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn render_conditional(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        format!(
            "<!-- if: {} -->\n{}<!-- endif -->\n",
            comment(ir.condition.as_deref().unwrap_or_default()),
            self.render_children(ir, ctx)
        )
    }

    fn render_for_loop(&self, ir: &NanoIR, ctx: &RenderContext<'_>) -> String {
        let (variable, iterable) = ir
            .loop_info
            .as_ref()
            .map(|l| (l.variable.as_str(), l.iterable.as_str()))
            .unwrap_or_default();
        format!(
            "<!-- for {} in {} -->\n{}<!-- endfor -->\n",
            comment(variable),
            comment(iterable),
            self.render_children(ir, ctx)
        )
    }

    fn render_unknown(&self, ir: &NanoIR, _ctx: &RenderContext<'_>) -> String {
        format!("<!-- Unknown component: {} -->\n", comment(&ir.node_type))
    }
}

// ============================================================================
// Prop access
// ============================================================================

/// A prop as display text. Numbers and booleans are formatted.
fn prop_text(ir: &NanoIR, key: &str) -> Option<String> {
    ir.prop(key).and_then(value_text)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A prop as a sanitized class suffix, with a default.
fn class_prop(ir: &NanoIR, key: &str, default: &str) -> String {
    class_suffix(&prop_text(ir, key).unwrap_or_else(|| default.to_string()))
}

/// The bound state value for `prop`, else the static prop.
fn bound_value(ir: &NanoIR, prop: &str, ctx: &RenderContext<'_>) -> Option<Value> {
    ir.binding(prop)
        .and_then(|binding| ctx.state.get(&binding.expression))
        .or_else(|| ir.prop(prop))
        .cloned()
}

fn bound_text(ir: &NanoIR, prop: &str, ctx: &RenderContext<'_>) -> Option<String> {
    bound_value(ir, prop, ctx).as_ref().and_then(value_text)
}

// ============================================================================
// Stylesheet
// ============================================================================

/// CSS for every class the renderer emits, sized by `theme`.
pub fn stylesheet(theme: &NanoTheme) -> String {
    let mut css = String::new();
    css.push_str("* { box-sizing: border-box; margin: 0; padding: 0; }\n");
    css.push_str(&format!("body {{ font-family: {}; }}\n", theme.font_family));
    css.push_str(".nano-component { width: 100%; }\n");
    css.push_str(".nano-vstack { display: flex; flex-direction: column; }\n");
    css.push_str(".nano-hstack { display: flex; flex-direction: row; align-items: center; }\n");

    for (name, px) in &theme.spacing {
        css.push_str(&format!(".spacing-{} {{ gap: {}px; }}\n", class_suffix(name), px));
    }
    for (name, value) in [
        ("start", "flex-start"),
        ("center", "center"),
        ("end", "flex-end"),
        ("stretch", "stretch"),
    ] {
        css.push_str(&format!(".align-{} {{ align-items: {}; }}\n", name, value));
    }
    for (name, value) in [
        ("start", "flex-start"),
        ("center", "center"),
        ("end", "flex-end"),
        ("between", "space-between"),
    ] {
        css.push_str(&format!(".justify-{} {{ justify-content: {}; }}\n", name, value));
    }

    css.push_str(&format!(
        ".nano-card {{ background: {}; border-radius: 8px; overflow: hidden; }}\n",
        theme.surface_color
    ));
    for (name, px) in &theme.padding {
        css.push_str(&format!(".padding-{} {{ padding: {}px; }}\n", class_suffix(name), px));
    }
    for (name, shadow) in &theme.shadows {
        css.push_str(&format!(".shadow-{} {{ box-shadow: {}; }}\n", class_suffix(name), shadow));
    }

    css.push_str(".nano-text { margin: 0; }\n");
    for (style, size) in [("h1", "2rem"), ("h2", "1.5rem"), ("h3", "1.25rem"), ("h4", "1rem")] {
        css.push_str(&format!(
            ".style-{} {{ font-size: {}; font-weight: bold; }}\n",
            style, size
        ));
    }
    css.push_str(".style-body { font-size: 1rem; }\n");
    css.push_str(&format!(
        ".style-caption {{ font-size: 0.875rem; color: {}; }}\n",
        theme.muted_color
    ));

    css.push_str(".nano-button { padding: 8px 16px; border: none; border-radius: 4px; cursor: pointer; font-size: 1rem; }\n");
    for (name, colors) in &theme.intents {
        css.push_str(&format!(
            ".intent-{} {{ background: {}; color: {}; }}\n",
            class_suffix(name),
            colors.background,
            colors.foreground
        ));
    }

    css.push_str(".nano-image { max-width: 100%; height: auto; display: block; }\n");
    for (name, px) in &theme.radius {
        css.push_str(&format!(".radius-{} {{ border-radius: {}px; }}\n", class_suffix(name), px));
    }

    css.push_str(".nano-badge { display: inline-block; padding: 2px 8px; border-radius: 12px; font-size: 0.75rem; font-weight: 500; }\n");
    for (name, colors) in &theme.badge_colors {
        css.push_str(&format!(
            ".color-{} {{ background: {}; color: {}; }}\n",
            class_suffix(name),
            colors.background,
            colors.foreground
        ));
    }

    let field = format!(
        "padding: 8px 12px; border: 1px solid {}; border-radius: 4px; font-size: 1rem; width: 100%;",
        theme.border_color
    );
    css.push_str(&format!(".nano-input {{ {} }}\n", field));
    css.push_str(&format!(
        ".nano-textarea {{ {} resize: vertical; font-family: inherit; }}\n",
        field
    ));
    css.push_str(&format!(
        ".nano-select {{ {} background: {}; }}\n",
        field, theme.surface_color
    ));
    css.push_str(&format!(
        ".nano-form {{ display: flex; flex-direction: column; gap: {}px; }}\n",
        theme.spacing_px("md").unwrap_or(16)
    ));
    css.push_str(".nano-checkbox-wrapper { display: inline-flex; align-items: center; gap: 8px; cursor: pointer; }\n");
    css.push_str(&format!(
        ".nano-checkbox {{ width: 16px; height: 16px; accent-color: {}; cursor: pointer; }}\n",
        theme.accent_color
    ));
    css.push_str(&format!(
        ".nano-divider {{ border: none; border-top: 1px solid {}; margin: 16px 0; }}\n",
        theme.border_color
    ));
    css
}
