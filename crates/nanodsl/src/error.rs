//! Error types for the NanoDSL engine.

use thiserror::Error;

pub use nanodsl_ast::ParseError;

/// All errors that can occur outside of parsing proper.
#[derive(Error, Debug)]
pub enum NanoError {
    #[error("Parse failed: {}", format_errors(errors))]
    Parse { errors: Vec<ParseError> },

    #[error("Unknown state variable '{name}'")]
    UnknownStateVariable { name: String },

    #[error("State type error for '{name}': {message}")]
    StateType { name: String, message: String },

    #[error("Unsupported action: {action}")]
    UnsupportedAction { action: String },

    #[error("Unknown spec version '{version}'")]
    UnknownSpecVersion { version: String },

    #[error("Unknown renderer '{name}' for spec version '{version}'")]
    UnknownRenderer { name: String, version: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Vec<ParseError>> for NanoError {
    fn from(errors: Vec<ParseError>) -> Self {
        NanoError::Parse { errors }
    }
}

fn format_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for NanoDSL operations
pub type Result<T> = std::result::Result<T, NanoError>;
