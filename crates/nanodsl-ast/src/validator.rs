//! Source validation without building a tree.
//!
//! `validate` walks the same block structure the parser does but, instead of
//! silently skipping what it cannot use, reports it as a warning.

use std::collections::HashSet;

use crate::grammar::{self, LineKind, BODY_RULES, NODE_RULES};
use crate::lexer::{first_non_blank, tokenize, Line};
use crate::{ParseError, ParseWarning, ValidationResult};

const INDENT_UNIT: usize = 4;

/// Which sub-grammar the lines of a block are read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Nodes,
    Body,
    State,
    Actions,
}

pub fn validate(source: &str) -> ValidationResult {
    let lines = tokenize(source);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let Some(first) = first_non_blank(&lines, 0) else {
        errors.push(ParseError::new("Empty source", 0));
        return ValidationResult::new(errors, warnings);
    };

    let header = lines[first];
    let root = if grammar::component_header(header.text).is_some() {
        Context::Nodes
    } else if let Some(LineKind::BlockCall { name, .. }) = grammar::block_call(header.text) {
        warnings.push(ParseWarning::new(
            "Missing 'component' keyword",
            header.number,
            Some(format!("Start with 'component {}:'", name)),
        ));
        Context::Body
    } else {
        errors.push(ParseError::new(
            format!("Invalid component definition: {}", header.text),
            header.number,
        ));
        Context::Nodes
    };

    for line in lines.iter().filter(|line| !line.is_blank()) {
        if line.leading_spaces % INDENT_UNIT != 0 {
            warnings.push(ParseWarning::new(
                format!("Inconsistent indentation: {} spaces", line.leading_spaces),
                line.number,
                Some(format!("Indent with multiples of {} spaces", INDENT_UNIT)),
            ));
        }
    }

    let mut walker = Walker {
        stack: vec![(header.indent, root)],
        state_names: HashSet::new(),
        warnings,
    };
    for line in lines[first + 1..].iter().filter(|line| !line.is_blank()) {
        walker.check(line);
    }

    ValidationResult::new(errors, walker.warnings)
}

struct Walker {
    /// Open blocks: opener indentation and the context of their lines.
    stack: Vec<(usize, Context)>,
    state_names: HashSet<String>,
    warnings: Vec<ParseWarning>,
}

impl Walker {
    fn check(&mut self, line: &Line<'_>) {
        while matches!(self.stack.last(), Some((indent, _)) if *indent >= line.indent) {
            self.stack.pop();
        }
        let Some(&(_, context)) = self.stack.last() else {
            self.warn(line, "Line outside component body", None);
            return;
        };

        match context {
            Context::Nodes => {
                let kind = grammar::classify(NODE_RULES, line.text);
                self.enter(line, kind);
            }
            Context::Body => {
                let kind = grammar::classify(BODY_RULES, line.text);
                self.enter(line, kind);
            }
            Context::State => self.check_state_variable(line),
            Context::Actions => {}
        }
    }

    fn enter(&mut self, line: &Line<'_>, kind: LineKind<'_>) {
        let context = match kind {
            LineKind::StateOpener => Context::State,
            LineKind::If { .. } | LineKind::For { .. } | LineKind::ContentBlock => Context::Nodes,
            LineKind::BlockCall { .. } => Context::Body,
            LineKind::OnClickBlock => Context::Actions,
            LineKind::Unknown => {
                self.warn(line, &format!("Unrecognized line: {}", line.text), None);
                return;
            }
            _ => return,
        };
        self.stack.push((line.indent, context));
    }

    fn check_state_variable(&mut self, line: &Line<'_>) {
        match grammar::state_variable(line.text) {
            Some(LineKind::StateVariable { name, .. }) => {
                if !self.state_names.insert(name.to_string()) {
                    self.warn(
                        line,
                        &format!("Duplicate state variable '{}'", name),
                        Some("The first declaration is used".to_string()),
                    );
                }
            }
            _ => self.warn(
                line,
                &format!("Invalid state variable: {}", line.text),
                Some("Use 'name: type = default'".to_string()),
            ),
        }
    }

    fn warn(&mut self, line: &Line<'_>, message: &str, suggestion: Option<String>) {
        self.warnings
            .push(ParseWarning::new(message, line.number, suggestion));
    }
}
