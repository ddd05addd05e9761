//! Render context: state snapshot, action dispatch, theme.
//!
//! [`NanoState`] is the only mutable piece of the pipeline. Renderers see it
//! through a shared borrow for one pass; actions mutate it through an
//! exclusive borrow between passes.

use std::collections::BTreeMap;

use nanodsl_ast::action::UNKNOWN_ACTION_PATH;
use nanodsl_ast::args::unquote;
use nanodsl_ast::MutationOp;
use serde_json::{Map, Number, Value};

use crate::error::{NanoError, Result};
use crate::ir::{ActionIR, NanoIR};
use crate::theme::NanoTheme;

/// Everything a renderer may consult during one pass.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub state: &'a NanoState,
    pub action_handler: &'a dyn NanoActionHandler,
    pub theme: &'a NanoTheme,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        state: &'a NanoState,
        action_handler: &'a dyn NanoActionHandler,
        theme: &'a NanoTheme,
    ) -> Self {
        Self {
            state,
            action_handler,
            theme,
        }
    }
}

// ============================================================================
// State
// ============================================================================

/// Component state: variable name to JSON value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NanoState {
    values: BTreeMap<String, Value>,
}

impl NanoState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state from a lowered component's state definitions.
    pub fn from_ir(ir: &NanoIR) -> Self {
        let values = ir
            .state
            .iter()
            .flatten()
            .map(|variable| (variable.name.clone(), variable.default_value.clone()))
            .collect();
        Self { values }
    }

    /// Look up `name`, `name.field` or `state.name.field`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = strip_state_prefix(path).split('.');
        let mut value = self.values.get(segments.next()?)?;
        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }
        Some(value)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Set a top-level variable, declaring it if needed.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Apply a mutation to an existing variable.
    ///
    /// `raw` is the right-hand side as written: a literal, a quoted string or
    /// a `state.` reference. `SET` converts the operand to the variable's
    /// current type; `ADD` and `SUBTRACT` need numbers (`ADD` also appends
    /// to strings).
    pub fn mutate(&mut self, path: &str, op: MutationOp, raw: &str) -> Result<()> {
        let operand = self.operand(raw)?;
        let current = self
            .get(path)
            .ok_or_else(|| NanoError::UnknownStateVariable {
                name: path.to_string(),
            })?;

        let updated = match op {
            MutationOp::Set => coerce_like(current, operand),
            MutationOp::Add => add(current, &operand),
            MutationOp::Subtract => subtract(current, &operand),
        }
        .ok_or_else(|| NanoError::StateType {
            name: path.to_string(),
            message: format!("cannot {} {} with {}", op, type_name(current), raw.trim()),
        })?;

        log::debug!("state {} {} {} -> {}", path, op, raw.trim(), updated);
        if let Some(slot) = self.get_mut(path) {
            *slot = updated;
        }
        Ok(())
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        let mut segments = strip_state_prefix(path).split('.');
        let mut value = self.values.get_mut(segments.next()?)?;
        for segment in segments {
            value = value.as_object_mut()?.get_mut(segment)?;
        }
        Some(value)
    }

    /// Evaluate the right-hand side of a mutation.
    fn operand(&self, raw: &str) -> Result<Value> {
        let raw = raw.trim();
        if raw.starts_with("state.") {
            return self
                .get(raw)
                .cloned()
                .ok_or_else(|| NanoError::UnknownStateVariable {
                    name: raw.to_string(),
                });
        }
        Ok(literal(raw))
    }
}

fn strip_state_prefix(path: &str) -> &str {
    let path = path.trim();
    path.strip_prefix("state.").unwrap_or(path)
}

/// A literal operand: quoted string, boolean, number, else the bare text.
fn literal(raw: &str) -> Value {
    if raw.starts_with('"') {
        return Value::String(unquote(raw));
    }
    match raw {
        "True" | "true" => return Value::Bool(true),
        "False" | "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}

fn coerce_like(current: &Value, operand: Value) -> Option<Value> {
    match current {
        Value::Number(n) if n.is_i64() || n.is_u64() => match &operand {
            Value::Number(o) if o.is_i64() || o.is_u64() => Some(operand),
            Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
            _ => None,
        },
        Value::Number(_) => match &operand {
            Value::Number(o) => o.as_f64().and_then(Number::from_f64).map(Value::Number),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            _ => None,
        },
        Value::Bool(_) => match &operand {
            Value::Bool(_) => Some(operand),
            _ => None,
        },
        Value::String(_) => Some(match operand {
            Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }),
        Value::Null | Value::Array(_) | Value::Object(_) => Some(operand),
    }
}

fn add(current: &Value, operand: &Value) -> Option<Value> {
    match (current, operand) {
        (Value::Number(a), Value::Number(b)) => arithmetic(a, b, i64::checked_add, |x, y| x + y),
        (Value::String(a), Value::String(b)) => Some(Value::String(format!("{}{}", a, b))),
        (Value::String(a), other) => Some(Value::String(format!("{}{}", a, other))),
        _ => None,
    }
}

fn subtract(current: &Value, operand: &Value) -> Option<Value> {
    match (current, operand) {
        (Value::Number(a), Value::Number(b)) => arithmetic(a, b, i64::checked_sub, |x, y| x - y),
        _ => None,
    }
}

/// Integer arithmetic when both sides are integers, float otherwise.
fn arithmetic(
    a: &Number,
    b: &Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Option<Value> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return int_op(x, y).map(Value::from);
    }
    let result = float_op(a.as_f64()?, b.as_f64()?);
    Number::from_f64(result).map(Value::Number)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Actions
// ============================================================================

/// A side effect the host must carry out; the engine never does I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEffect {
    Navigate {
        to: String,
        params: BTreeMap<String, String>,
        query: BTreeMap<String, String>,
        replace: bool,
    },
    Toast {
        message: String,
    },
    /// A request to issue. Body state references are already resolved.
    Fetch {
        url: String,
        method: String,
        body: Map<String, Value>,
        headers: BTreeMap<String, String>,
        on_success: Option<ActionIR>,
        on_error: Option<ActionIR>,
    },
    Custom {
        name: String,
        payload: Value,
    },
}

/// Executes lowered actions against state.
pub trait NanoActionHandler {
    /// Apply `action`, mutating `state` as needed, and return the effects
    /// left for the host in the order they were produced.
    fn handle(&self, action: &ActionIR, state: &mut NanoState) -> Result<Vec<ActionEffect>>;
}

/// Applies state mutations and sequences; everything else becomes an
/// [`ActionEffect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultActionHandler;

impl NanoActionHandler for DefaultActionHandler {
    fn handle(&self, action: &ActionIR, state: &mut NanoState) -> Result<Vec<ActionEffect>> {
        let mut effects = Vec::new();
        dispatch(action, state, &mut effects)?;
        Ok(effects)
    }
}

fn dispatch(action: &ActionIR, state: &mut NanoState, effects: &mut Vec<ActionEffect>) -> Result<()> {
    let payload = &action.payload;
    match action.action_type.as_str() {
        "stateMutation" => {
            let path = str_field(payload, "path");
            if path == UNKNOWN_ACTION_PATH {
                log::debug!("ignoring unrecognized action {:?}", str_field(payload, "value"));
                return Ok(());
            }
            let op = MutationOp::from_name(str_field(payload, "operation")).unwrap_or_default();
            state.mutate(path, op, str_field(payload, "value"))?;
        }
        "sequence" => {
            let actions: Vec<ActionIR> = match payload.get("actions") {
                Some(actions) => serde_json::from_value(actions.clone())?,
                None => Vec::new(),
            };
            for action in &actions {
                dispatch(action, state, effects)?;
            }
        }
        "navigate" => effects.push(ActionEffect::Navigate {
            to: str_field(payload, "to").to_string(),
            params: resolve_strings(payload.get("params"), state),
            query: resolve_strings(payload.get("query"), state),
            replace: payload.get("replace").and_then(Value::as_bool).unwrap_or(false),
        }),
        "showToast" => effects.push(ActionEffect::Toast {
            message: str_field(payload, "message").to_string(),
        }),
        "fetch" => {
            if let Some(path) = payload.get("loadingState").and_then(Value::as_str) {
                if state.contains(path) {
                    state.mutate(path, MutationOp::Set, "true")?;
                }
            }
            effects.push(ActionEffect::Fetch {
                url: str_field(payload, "url").to_string(),
                method: str_field(payload, "method").to_string(),
                body: resolve_body(payload.get("body"), state),
                headers: resolve_strings(payload.get("headers"), state),
                on_success: callback(payload, "onSuccess")?,
                on_error: callback(payload, "onError")?,
            });
        }
        "custom" => effects.push(ActionEffect::Custom {
            name: str_field(payload, "name").to_string(),
            payload: payload.get("payload").cloned().unwrap_or(Value::Null),
        }),
        other => {
            return Err(NanoError::UnsupportedAction {
                action: other.to_string(),
            })
        }
    }
    Ok(())
}

fn str_field<'v>(payload: &'v Value, key: &str) -> &'v str {
    payload.get(key).and_then(Value::as_str).unwrap_or("")
}

fn callback(payload: &Value, key: &str) -> Result<Option<ActionIR>> {
    payload
        .get(key)
        .map(|value| serde_json::from_value(value.clone()))
        .transpose()
        .map_err(NanoError::from)
}

/// String map whose `state.` values are replaced by the current state.
fn resolve_strings(map: Option<&Value>, state: &NanoState) -> BTreeMap<String, String> {
    let Some(Value::Object(map)) = map else {
        return BTreeMap::new();
    };
    map.iter()
        .map(|(key, value)| {
            let text = value.as_str().unwrap_or_default();
            let resolved = match state.get(text).filter(|_| text.starts_with("state.")) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => text.to_string(),
            };
            (key.clone(), resolved)
        })
        .collect()
}

/// Request body with `{"state": path}` entries replaced by their values.
fn resolve_body(body: Option<&Value>, state: &NanoState) -> Map<String, Value> {
    let Some(Value::Object(body)) = body else {
        return Map::new();
    };
    body.iter()
        .map(|(key, value)| {
            let resolved = match value.get("state").and_then(Value::as_str) {
                Some(path) => state.get(path).cloned().unwrap_or(Value::Null),
                None => value.clone(),
            };
            (key.clone(), resolved)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state(values: Value) -> NanoState {
        let mut state = NanoState::new();
        if let Value::Object(map) = values {
            for (k, v) in map {
                state.set(k, v);
            }
        }
        state
    }

    fn action(value: Value) -> ActionIR {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_get_paths() {
        let state = state(json!({"user": {"name": "Ann"}, "count": 1}));
        assert_eq!(state.get("count"), Some(&json!(1)));
        assert_eq!(state.get("state.user.name"), Some(&json!("Ann")));
        assert_eq!(state.get("user.age"), None);
        assert_eq!(state.get("count.x"), None);
    }

    #[test]
    fn test_set_coerces_to_current_type() {
        let mut state = state(json!({"n": 1, "f": 0.5, "b": false, "s": "x"}));
        state.mutate("n", MutationOp::Set, "7").unwrap();
        state.mutate("f", MutationOp::Set, "2").unwrap();
        state.mutate("b", MutationOp::Set, "True").unwrap();
        state.mutate("s", MutationOp::Set, "42").unwrap();
        assert_eq!(
            state.to_json(),
            json!({"n": 7, "f": 2.0, "b": true, "s": "42"})
        );

        let err = state.mutate("b", MutationOp::Set, "maybe").unwrap_err();
        assert!(matches!(err, NanoError::StateType { .. }));
    }

    #[test]
    fn test_add_and_subtract() {
        let mut state = state(json!({"n": 1, "f": 1.5, "s": "a", "b": true}));
        state.mutate("n", MutationOp::Add, "2").unwrap();
        state.mutate("f", MutationOp::Subtract, "0.5").unwrap();
        state.mutate("s", MutationOp::Add, "\"b\"").unwrap();
        assert_eq!(state.get("n"), Some(&json!(3)));
        assert_eq!(state.get("f"), Some(&json!(1.0)));
        assert_eq!(state.get("s"), Some(&json!("ab")));
        assert!(state.mutate("b", MutationOp::Add, "1").is_err());
    }

    #[test]
    fn test_operand_from_state() {
        let mut state = state(json!({"a": 2, "b": 5}));
        state.mutate("a", MutationOp::Add, "state.b").unwrap();
        assert_eq!(state.get("a"), Some(&json!(7)));
        assert!(matches!(
            state.mutate("a", MutationOp::Set, "state.zzz"),
            Err(NanoError::UnknownStateVariable { .. })
        ));
    }

    #[test]
    fn test_unknown_variable() {
        let mut state = NanoState::new();
        let err = state.mutate("missing", MutationOp::Set, "1").unwrap_err();
        assert!(matches!(err, NanoError::UnknownStateVariable { name } if name == "missing"));
    }

    #[test]
    fn test_handler_sequence_and_effects() {
        let mut state = state(json!({"loading": false, "email": "a@b.c", "id": 9}));
        let sequence = action(json!({
            "type": "sequence",
            "payload": {"actions": [
                {"type": "stateMutation", "payload": {"path": "loading", "operation": "SET", "value": "true"}},
                {"type": "navigate", "payload": {"to": "/user", "params": {"id": "state.id"}, "replace": false}},
                {"type": "fetch", "payload": {
                    "url": "/api", "method": "POST",
                    "body": {"email": {"state": "email"}, "kind": "x"},
                    "onSuccess": {"type": "showToast", "payload": {"message": "ok"}}
                }}
            ]}
        }));

        let effects = DefaultActionHandler.handle(&sequence, &mut state).unwrap();
        assert_eq!(state.get("loading"), Some(&json!(true)));
        assert_eq!(effects.len(), 2);
        match &effects[0] {
            ActionEffect::Navigate { to, params, .. } => {
                assert_eq!(to, "/user");
                assert_eq!(params.get("id").map(String::as_str), Some("9"));
            }
            other => panic!("expected navigate, got {:?}", other),
        }
        match &effects[1] {
            ActionEffect::Fetch {
                body, on_success, ..
            } => {
                assert_eq!(body.get("email"), Some(&json!("a@b.c")));
                assert_eq!(body.get("kind"), Some(&json!("x")));
                assert_eq!(on_success.as_ref().map(|a| a.action_type.as_str()), Some("showToast"));
            }
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_handler_ignores_unknown_mutation() {
        let mut state = NanoState::new();
        let unknown = action(json!({
            "type": "stateMutation",
            "payload": {"path": "unknown", "operation": "SET", "value": "doSomething()"}
        }));
        assert_eq!(DefaultActionHandler.handle(&unknown, &mut state).unwrap(), vec![]);
    }

    #[test]
    fn test_handler_rejects_unknown_type() {
        let mut state = NanoState::new();
        let err = DefaultActionHandler
            .handle(&action(json!({"type": "teleport"})), &mut state)
            .unwrap_err();
        assert!(matches!(err, NanoError::UnsupportedAction { action } if action == "teleport"));
    }
}
