//! NanoDSL - an indentation-sensitive UI language
//!
//! The pipeline is parse, lower, render:
//! - [`nanodsl_ast::parse`] builds a typed AST from source,
//! - [`lower_component`] turns it into the uniform [`NanoIR`] tree,
//! - a [`NanoRenderer`] (e.g. [`HtmlRenderer`]) turns the IR into output
//!   against a [`RenderContext`] holding state, action handler and theme.
//!
//! # Example
//!
//! ```rust
//! let html = nanodsl::render_html(
//!     "component Greeting:\n    Text(\"Hello!\", style=\"h2\")",
//! ).unwrap();
//!
//! assert!(html.contains("<h2 class=\"nano-text style-h2\">Hello!</h2>"));
//! ```

// Public modules
pub mod context;
pub mod debug;
pub mod error;
pub mod html;
pub mod html_escape;
pub mod ir;
pub mod lower;
pub mod registry;
pub mod renderer;
pub mod theme;

pub use context::{
    ActionEffect, DefaultActionHandler, NanoActionHandler, NanoState, RenderContext,
};
pub use debug::DebugRenderer;
pub use error::{NanoError, Result};
pub use html::HtmlRenderer;
pub use ir::{ActionIR, BindingIR, BindingMode, LoopInfo, NanoIR, StateVariableIR};
pub use lower::{lower, lower_action, lower_component};
pub use nanodsl_ast::{
    parse, validate, Component, NanoAction, NanoNode, ParseError, ParseResult, ParseWarning,
    ValidationResult,
};
pub use registry::{
    IndentParser, NanoParser, ParserRegistry, RendererRegistry, SPEC_VERSION_V1,
};
pub use renderer::{NanoRenderer, NodeType};
pub use theme::NanoTheme;

/// A parsed and lowered component, ready to render many times
pub struct NanoDsl {
    component: Component,
    ir: NanoIR,
}

impl NanoDsl {
    /// Parse and lower a source
    ///
    /// # Example
    ///
    /// ```rust
    /// use nanodsl::{DefaultActionHandler, NanoDsl, NanoTheme, RenderContext};
    ///
    /// let dsl = NanoDsl::parse("component Hello:\n    Badge(\"New\")").unwrap();
    /// let state = dsl.initial_state();
    /// let theme = NanoTheme::default();
    /// let ctx = RenderContext::new(&state, &DefaultActionHandler, &theme);
    ///
    /// assert!(dsl.render_html(&ctx).contains("nano-badge"));
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let component = nanodsl_ast::parse(source).into_result()?;
        let ir = lower_component(&component);
        log::debug!(
            "parsed component '{}' ({} nodes)",
            component.name,
            ir.node_count()
        );
        Ok(Self { component, ir })
    }

    /// Get a reference to the parsed component
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Get a reference to the lowered IR
    pub fn ir(&self) -> &NanoIR {
        &self.ir
    }

    /// The IR as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.ir)?)
    }

    /// Fresh state holding every declared variable at its default
    pub fn initial_state(&self) -> NanoState {
        NanoState::from_ir(&self.ir)
    }

    /// Render a standalone HTML document
    pub fn render_html(&self, ctx: &RenderContext<'_>) -> String {
        HtmlRenderer.render(&self.ir, ctx)
    }
}

/// Convenience function: parse and lower in one call
pub fn to_ir(source: &str) -> Result<NanoIR> {
    Ok(NanoDsl::parse(source)?.ir)
}

/// Convenience function: parse, lower and serialize in one call
pub fn to_json(source: &str) -> Result<String> {
    NanoDsl::parse(source)?.to_json()
}

/// Convenience function: render with initial state and the default theme
///
/// # Example
///
/// ```rust
/// let err = nanodsl::render_html("").unwrap_err();
/// assert!(matches!(err, nanodsl::NanoError::Parse { .. }));
/// ```
pub fn render_html(source: &str) -> Result<String> {
    let dsl = NanoDsl::parse(source)?;
    let state = dsl.initial_state();
    let theme = NanoTheme::default();
    let ctx = RenderContext::new(&state, &DefaultActionHandler, &theme);
    Ok(dsl.render_html(&ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_reuse() {
        let dsl = NanoDsl::parse(
            "component Counter:\n    state:\n        count: int = 0\n    Text(content << state.count)",
        )
        .unwrap();
        let theme = NanoTheme::default();

        let mut state = dsl.initial_state();
        let before = {
            let ctx = RenderContext::new(&state, &DefaultActionHandler, &theme);
            HtmlRenderer.render_fragment(dsl.ir(), &ctx)
        };
        assert!(before.contains(">0</p>"));

        state.set("count", json!(5));
        let ctx = RenderContext::new(&state, &DefaultActionHandler, &theme);
        assert!(HtmlRenderer.render_fragment(dsl.ir(), &ctx).contains(">5</p>"));
    }

    #[test]
    fn test_to_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&to_json("component A:\n    Divider").unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "Component",
                "props": {"name": "A"},
                "children": [{"type": "Divider", "props": {}}]
            })
        );
    }

    #[test]
    fn test_parse_failure_maps_to_error() {
        match to_ir("not a component") {
            Err(NanoError::Parse { errors }) => assert_eq!(errors[0].line, 1),
            other => panic!("expected parse error, got {:?}", other.map(|ir| ir.node_type)),
        }
    }
}
