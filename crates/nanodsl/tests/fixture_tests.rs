//! Fixture-based integration tests
//!
//! These tests run the shared cases under the workspace `tests/` directory:
//! `render.json` holds expected HTML fragments, `ir.json` expected IR trees.

use nanodsl::{DefaultActionHandler, HtmlRenderer, NanoDsl, NanoTheme, RenderContext};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct TestFile {
    #[allow(dead_code)]
    description: String,
    tests: Vec<TestCase>,
}

#[derive(Debug, Deserialize)]
struct TestCase {
    name: String,
    source: String,
    html: Option<String>,
    ir: Option<Value>,
    error: Option<String>,
}

fn get_tests_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
}

fn load_test_file(filename: &str) -> TestFile {
    let path = get_tests_dir().join(filename);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", filename, e))
}

fn render_fragment(source: &str) -> nanodsl::Result<String> {
    let dsl = NanoDsl::parse(source)?;
    let state = dsl.initial_state();
    let theme = NanoTheme::default();
    let ctx = RenderContext::new(&state, &DefaultActionHandler, &theme);
    Ok(HtmlRenderer.render_fragment(dsl.ir(), &ctx))
}

fn check_error<T: std::fmt::Debug>(
    filename: &str,
    test: &TestCase,
    result: nanodsl::Result<T>,
    error_type: &str,
) {
    match result {
        Err(e) => {
            let debug = format!("{:?}", e);
            assert!(
                debug.starts_with(error_type),
                "\n[{}] Test '{}' expected {} error, got {}",
                filename,
                test.name,
                error_type,
                debug
            );
        }
        Ok(output) => panic!(
            "\n[{}] Test '{}' should have failed with {} but succeeded:\n  Source: {}\n  Output: {:?}",
            filename, test.name, error_type, test.source, output
        ),
    }
}

#[test]
fn test_render_fixtures() {
    let filename = "render.json";
    let file = load_test_file(filename);
    assert!(!file.tests.is_empty());

    for test in &file.tests {
        let result = render_fragment(&test.source);
        match (&test.html, &test.error) {
            (Some(expected), None) => {
                let output = result.unwrap_or_else(|e| {
                    panic!(
                        "\n[{}] Test '{}' failed with unexpected error:\n  Source: {}\n  Error: {}",
                        filename, test.name, test.source, e
                    )
                });
                assert_eq!(
                    &output, expected,
                    "\n[{}] Test '{}' failed:\n  Source: {}",
                    filename, test.name, test.source
                );
            }
            (None, Some(error_type)) => check_error(filename, test, result, error_type),
            _ => panic!(
                "[{}] Invalid test case '{}': must have exactly one of 'html' or 'error'",
                filename, test.name
            ),
        }
    }
}

#[test]
fn test_ir_fixtures() {
    let filename = "ir.json";
    let file = load_test_file(filename);
    assert!(!file.tests.is_empty());

    for test in &file.tests {
        let result = nanodsl::to_ir(&test.source);
        match (&test.ir, &test.error) {
            (Some(expected), None) => {
                let ir = result.unwrap_or_else(|e| {
                    panic!(
                        "\n[{}] Test '{}' failed with unexpected error: {}",
                        filename, test.name, e
                    )
                });
                let actual = serde_json::to_value(&ir).unwrap();
                assert_eq!(
                    &actual, expected,
                    "\n[{}] Test '{}' failed:\n  Source: {}",
                    filename, test.name, test.source
                );
            }
            (None, Some(error_type)) => check_error(filename, test, result, error_type),
            _ => panic!(
                "[{}] Invalid test case '{}': must have exactly one of 'ir' or 'error'",
                filename, test.name
            ),
        }
    }
}
