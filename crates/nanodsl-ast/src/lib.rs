//! Parser and AST for NanoDSL, an indentation-sensitive UI language.
//!
//! ```text
//! component Greeting:
//!     Card:
//!         padding: "md"
//!         content:
//!             Text("Hello!", style="h2")
//! ```
//!
//! [`parse`] turns a source into a typed [`Component`] tree or a list of
//! fatal [`ParseError`]s. [`validate`] reports the same fatal errors plus
//! non-fatal [`ParseWarning`]s for lines the parser would silently skip.

pub mod action;
pub mod args;
pub mod ast;
pub mod grammar;
pub mod lexer;
mod parser;
mod validator;

use thiserror::Error;

pub use action::{
    parse_action, parse_action_block, BodyField, FetchAction, HttpMethod, MutationOp, NanoAction,
};
pub use ast::{
    Badge, Binding, Button, Card, Checkbox, Component, ComponentParam, Conditional, ForLoop, Form,
    HStack, Image, Input, NanoNode, Select, StateBlock, StateVariable, Text, TextArea, VStack,
};

// ============================================================================
// Diagnostics
// ============================================================================

/// A fatal parse error. Line 0 means "no line", e.g. an empty source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

/// A non-fatal finding reported by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseWarning {
    pub message: String,
    pub line: usize,
    pub suggestion: Option<String>,
}

impl ParseWarning {
    pub fn new(message: impl Into<String>, line: usize, suggestion: Option<String>) -> Self {
        Self {
            message: message.into(),
            line,
            suggestion,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of [`parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    Success(Component),
    Failure(Vec<ParseError>),
}

impl ParseResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success(_))
    }

    pub fn into_result(self) -> Result<Component, Vec<ParseError>> {
        match self {
            ParseResult::Success(component) => Ok(component),
            ParseResult::Failure(errors) => Err(errors),
        }
    }
}

/// Outcome of [`validate`]. Valid exactly when there are no errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

impl ValidationResult {
    pub fn new(errors: Vec<ParseError>, warnings: Vec<ParseWarning>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse a NanoDSL source into its root component.
///
/// Never panics. Unrecognized lines and unknown component names are skipped
/// (logged at debug level); only an empty source or a bad first line fail.
pub fn parse(source: &str) -> ParseResult {
    parser::parse(source)
}

/// Check a source and report errors and warnings without building a tree.
pub fn validate(source: &str) -> ValidationResult {
    validator::validate(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::new("Empty source", 0);
        assert_eq!(error.to_string(), "line 0: Empty source");
    }

    #[test]
    fn test_into_result() {
        let ok = parse("component A:\n    Divider").into_result();
        assert_eq!(ok.map(|c| c.name), Ok("A".to_string()));

        let err = parse("").into_result();
        assert!(err.is_err());
    }

    #[test]
    fn test_validation_result_validity() {
        let result = ValidationResult::new(vec![], vec![ParseWarning::new("w", 1, None)]);
        assert!(result.is_valid);
        let result = ValidationResult::new(vec![ParseError::new("e", 1)], vec![]);
        assert!(!result.is_valid);
    }
}
