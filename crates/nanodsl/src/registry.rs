//! Version-keyed parser and renderer registries.
//!
//! Registries are plain values owned by the caller. Each entry maps a spec
//! version (and, for renderers, a name) to a factory function, so lookups
//! hand out fresh instances.

use std::collections::BTreeMap;

use nanodsl_ast::{ParseResult, ValidationResult};

use crate::debug::DebugRenderer;
use crate::error::{NanoError, Result};
use crate::html::HtmlRenderer;
use crate::renderer::NanoRenderer;

/// The only spec version so far.
pub const SPEC_VERSION_V1: &str = "1.0";

/// A NanoDSL front end.
pub trait NanoParser: Send + Sync {
    fn spec_version(&self) -> &str;
    fn parse(&self, source: &str) -> ParseResult;
    fn validate(&self, source: &str) -> ValidationResult;
}

/// The indentation-based parser of spec version 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentParser;

impl NanoParser for IndentParser {
    fn spec_version(&self) -> &str {
        SPEC_VERSION_V1
    }

    fn parse(&self, source: &str) -> ParseResult {
        nanodsl_ast::parse(source)
    }

    fn validate(&self, source: &str) -> ValidationResult {
        nanodsl_ast::validate(source)
    }
}

pub type ParserFactory = fn() -> Box<dyn NanoParser>;
pub type RendererFactory = fn() -> Box<dyn NanoRenderer<String> + Send + Sync>;

fn indent_parser() -> Box<dyn NanoParser> {
    Box::new(IndentParser)
}

fn html_renderer() -> Box<dyn NanoRenderer<String> + Send + Sync> {
    Box::new(HtmlRenderer)
}

fn debug_renderer() -> Box<dyn NanoRenderer<String> + Send + Sync> {
    Box::new(DebugRenderer)
}

#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    factories: BTreeMap<String, ParserFactory>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in parser for every known version.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SPEC_VERSION_V1, indent_parser);
        registry
    }

    /// Register `factory` for `version`, replacing any previous entry.
    pub fn register(&mut self, version: &str, factory: ParserFactory) {
        self.factories.insert(version.to_string(), factory);
    }

    pub fn get(&self, version: &str) -> Result<Box<dyn NanoParser>> {
        self.factories
            .get(version)
            .map(|factory| factory())
            .ok_or_else(|| NanoError::UnknownSpecVersion {
                version: version.to_string(),
            })
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RendererRegistry {
    factories: BTreeMap<String, BTreeMap<String, RendererFactory>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `html` and `debug` for version 1.0.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SPEC_VERSION_V1, "html", html_renderer);
        registry.register(SPEC_VERSION_V1, "debug", debug_renderer);
        registry
    }

    pub fn register(&mut self, version: &str, name: &str, factory: RendererFactory) {
        self.factories
            .entry(version.to_string())
            .or_default()
            .insert(name.to_string(), factory);
    }

    pub fn get(
        &self,
        version: &str,
        name: &str,
    ) -> Result<Box<dyn NanoRenderer<String> + Send + Sync>> {
        let renderers = self
            .factories
            .get(version)
            .ok_or_else(|| NanoError::UnknownSpecVersion {
                version: version.to_string(),
            })?;
        renderers
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| NanoError::UnknownRenderer {
                name: name.to_string(),
                version: version.to_string(),
            })
    }

    /// Renderer names registered for `version`.
    pub fn names(&self, version: &str) -> Vec<&str> {
        self.factories
            .get(version)
            .map(|renderers| renderers.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DefaultActionHandler, NanoState, RenderContext};
    use crate::ir::NanoIR;
    use crate::theme::NanoTheme;

    #[test]
    fn test_default_parser() {
        let registry = ParserRegistry::with_defaults();
        let parser = registry.get("1.0").unwrap();
        assert_eq!(parser.spec_version(), "1.0");
        assert!(parser.parse("component A:\n    Divider").is_success());
        assert_eq!(registry.versions().collect::<Vec<_>>(), vec!["1.0"]);
    }

    #[test]
    fn test_unknown_version() {
        let registry = ParserRegistry::with_defaults();
        assert!(matches!(
            registry.get("2.0"),
            Err(NanoError::UnknownSpecVersion { version }) if version == "2.0"
        ));
    }

    #[test]
    fn test_default_renderers() {
        let registry = RendererRegistry::with_defaults();
        assert_eq!(registry.names("1.0"), vec!["debug", "html"]);

        let state = NanoState::new();
        let theme = NanoTheme::default();
        let ctx = RenderContext::new(&state, &DefaultActionHandler, &theme);
        let debug = registry.get("1.0", "debug").unwrap();
        assert_eq!(debug.render(&NanoIR::new("Divider"), &ctx), "Divider\n");

        assert!(matches!(
            registry.get("1.0", "swing"),
            Err(NanoError::UnknownRenderer { .. })
        ));
        assert!(matches!(
            registry.get("0.9", "html"),
            Err(NanoError::UnknownSpecVersion { .. })
        ));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = RendererRegistry::new();
        registry.register("1.0", "html", debug_renderer);
        assert_eq!(registry.names("1.0"), vec!["html"]);
        assert!(registry.names("3.0").is_empty());
    }
}
