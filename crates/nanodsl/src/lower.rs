//! Lowering from the typed AST to NanoIR.
//!
//! Pure and total: every well-formed AST lowers, nothing is resolved.
//! Style shorthands such as `"md"` pass through untouched for the renderer.

use std::collections::BTreeMap;

use nanodsl_ast::args::unquote;
use nanodsl_ast::{
    Binding, BodyField, Component, FetchAction, NanoAction, NanoNode, StateVariable,
};
use serde_json::{json, Map, Number, Value};

use crate::ir::{ActionIR, BindingIR, BindingMode, LoopInfo, NanoIR, StateVariableIR};

/// Lower a whole component, including its state definitions.
pub fn lower_component(component: &Component) -> NanoIR {
    let mut ir = NanoIR::container("Component", lower_all(&component.children))
        .with_prop("name", Some(component.name.as_str()));

    if !component.params.is_empty() {
        let params: Vec<Value> = component
            .params
            .iter()
            .map(|param| {
                let mut entry = Map::new();
                entry.insert("name".to_string(), json!(param.name));
                if let Some(ty) = &param.param_type {
                    entry.insert("type".to_string(), json!(ty));
                }
                Value::Object(entry)
            })
            .collect();
        ir.props.insert("params".to_string(), Value::Array(params));
    }

    if let Some(block) = &component.state {
        ir.state = Some(block.variables.iter().map(lower_state_variable).collect());
    }

    ir
}

/// Lower a single node and its subtree.
pub fn lower(node: &NanoNode) -> NanoIR {
    match node {
        NanoNode::VStack(n) => NanoIR::container("VStack", lower_all(&n.children))
            .with_prop("spacing", n.spacing.as_deref())
            .with_prop("align", n.align.as_deref()),
        NanoNode::HStack(n) => NanoIR::container("HStack", lower_all(&n.children))
            .with_prop("spacing", n.spacing.as_deref())
            .with_prop("align", n.align.as_deref())
            .with_prop("justify", n.justify.as_deref()),
        NanoNode::Card(n) => NanoIR::container("Card", lower_all(&n.children))
            .with_prop("padding", n.padding.as_deref())
            .with_prop("shadow", n.shadow.as_deref()),
        NanoNode::Form(n) => NanoIR::container("Form", lower_all(&n.children))
            .with_prop("onSubmit", n.on_submit.as_deref()),
        NanoNode::Text(n) => {
            let mut ir = NanoIR::new("Text")
                .with_prop("content", Some(n.content.as_str()))
                .with_prop("style", n.style.as_deref());
            bind(&mut ir, "content", n.binding.as_ref());
            ir
        }
        NanoNode::Button(n) => {
            let mut ir = NanoIR::new("Button")
                .with_prop("label", Some(n.label.as_str()))
                .with_prop("intent", n.intent.as_deref())
                .with_prop("icon", n.icon.as_deref());
            if let Some(action) = &n.on_click {
                let mut actions = BTreeMap::new();
                actions.insert("onClick".to_string(), lower_action(action));
                ir.actions = Some(actions);
            }
            ir
        }
        NanoNode::Image(n) => NanoIR::new("Image")
            .with_prop("src", Some(n.src.as_str()))
            .with_prop("aspect", n.aspect.as_deref())
            .with_prop("radius", n.radius.as_deref())
            .with_prop("alt", n.alt.as_deref())
            .with_prop("width", n.width),
        NanoNode::Badge(n) => NanoIR::new("Badge")
            .with_prop("text", Some(n.text.as_str()))
            .with_prop("color", n.color.as_deref()),
        NanoNode::Divider => NanoIR::new("Divider"),
        NanoNode::Input(n) => {
            let mut ir = NanoIR::new("Input")
                .with_prop("placeholder", n.placeholder.as_deref())
                .with_prop("type", n.input_type.as_deref());
            bind(&mut ir, "value", n.value.as_ref());
            ir
        }
        NanoNode::Checkbox(n) => {
            let mut ir = NanoIR::new("Checkbox").with_prop("label", n.label.as_deref());
            bind(&mut ir, "checked", n.checked.as_ref());
            ir
        }
        NanoNode::TextArea(n) => {
            let mut ir = NanoIR::new("TextArea")
                .with_prop("placeholder", n.placeholder.as_deref())
                .with_prop("rows", n.rows);
            bind(&mut ir, "value", n.value.as_ref());
            ir
        }
        NanoNode::Select(n) => {
            let mut ir = NanoIR::new("Select")
                .with_prop("options", n.options.as_deref())
                .with_prop("placeholder", n.placeholder.as_deref());
            bind(&mut ir, "value", n.value.as_ref());
            ir
        }
        NanoNode::Conditional(n) => {
            let mut ir = NanoIR::container("Conditional", lower_all(&n.then_branch));
            ir.condition = Some(n.condition.clone());
            ir
        }
        NanoNode::ForLoop(n) => {
            let mut ir = NanoIR::container("ForLoop", lower_all(&n.body));
            ir.loop_info = Some(LoopInfo {
                variable: n.variable.clone(),
                iterable: n.iterable.clone(),
            });
            ir
        }
    }
}

fn lower_all(nodes: &[NanoNode]) -> Vec<NanoIR> {
    nodes.iter().map(lower).collect()
}

/// Static bindings become plain props; the others are recorded in `bindings`.
fn bind(ir: &mut NanoIR, prop: &str, binding: Option<&Binding>) {
    let (mode, expression) = match binding {
        None => return,
        Some(Binding::Static(value)) => {
            ir.props.insert(prop.to_string(), json!(value));
            return;
        }
        Some(Binding::Subscribe(expr)) => (BindingMode::Subscribe, expr),
        Some(Binding::TwoWay(expr)) => (BindingMode::TwoWay, expr),
    };
    ir.bindings.get_or_insert_with(BTreeMap::new).insert(
        prop.to_string(),
        BindingIR {
            mode,
            expression: expression.clone(),
        },
    );
}

// ============================================================================
// State
// ============================================================================

fn lower_state_variable(variable: &StateVariable) -> StateVariableIR {
    StateVariableIR {
        name: variable.name.clone(),
        var_type: variable.var_type.clone(),
        default_value: typed_default(&variable.var_type, &variable.default_value),
    }
}

/// Convert a raw default by its declared type. Unconvertible text stays a
/// string.
pub fn typed_default(var_type: &str, raw: &str) -> Value {
    let raw = raw.trim();
    let converted = match var_type {
        "int" => raw.parse::<i64>().ok().map(Value::from),
        "float" => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        "bool" => match raw {
            "True" | "true" => Some(Value::Bool(true)),
            "False" | "false" => Some(Value::Bool(false)),
            _ => None,
        },
        "str" => Some(Value::String(unquote(raw))),
        _ => None,
    };
    converted.unwrap_or_else(|| Value::String(raw.to_string()))
}

// ============================================================================
// Actions
// ============================================================================

pub fn lower_action(action: &NanoAction) -> ActionIR {
    let (action_type, payload) = match action {
        NanoAction::Navigate {
            to,
            params,
            query,
            replace,
        } => {
            let mut payload = Map::new();
            payload.insert("to".to_string(), json!(to));
            if let Some(params) = params {
                payload.insert("params".to_string(), json!(params));
            }
            if let Some(query) = query {
                payload.insert("query".to_string(), json!(query));
            }
            payload.insert("replace".to_string(), json!(replace));
            ("navigate", Value::Object(payload))
        }
        NanoAction::ShowToast { message } => ("showToast", json!({ "message": message })),
        NanoAction::StateMutation { path, op, value } => (
            "stateMutation",
            json!({ "path": path, "operation": op.as_str(), "value": value }),
        ),
        NanoAction::Sequence(actions) => {
            let actions: Vec<ActionIR> = actions.iter().map(lower_action).collect();
            ("sequence", json!({ "actions": actions }))
        }
        NanoAction::Fetch(fetch) => ("fetch", lower_fetch(fetch)),
        NanoAction::Custom { name, payload } => {
            ("custom", json!({ "name": name, "payload": payload }))
        }
    };

    ActionIR {
        action_type: action_type.to_string(),
        payload,
    }
}

fn lower_fetch(fetch: &FetchAction) -> Value {
    let mut payload = Map::new();
    payload.insert("url".to_string(), json!(fetch.url));
    payload.insert("method".to_string(), json!(fetch.method.as_str()));

    if let Some(body) = &fetch.body {
        let body: Map<String, Value> = body
            .iter()
            .map(|(key, field)| {
                let value = match field {
                    BodyField::Literal(text) => json!(text),
                    BodyField::State(path) => json!({ "state": path }),
                };
                (key.clone(), value)
            })
            .collect();
        payload.insert("body".to_string(), Value::Object(body));
    }
    if let Some(headers) = &fetch.headers {
        payload.insert("headers".to_string(), json!(headers));
    }
    if let Some(action) = &fetch.on_success {
        payload.insert("onSuccess".to_string(), json!(lower_action(action)));
    }
    if let Some(action) = &fetch.on_error {
        payload.insert("onError".to_string(), json!(lower_action(action)));
    }
    if let Some(path) = &fetch.loading_state {
        payload.insert("loadingState".to_string(), json!(path));
    }

    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanodsl_ast::{parse, parse_action, ParseResult};
    use pretty_assertions::assert_eq;

    fn lower_source(source: &str) -> NanoIR {
        match parse(source) {
            ParseResult::Success(component) => lower_component(&component),
            ParseResult::Failure(errors) => panic!("parse failed: {:?}", errors),
        }
    }

    #[test]
    fn test_component_props_and_state() {
        let ir = lower_source(
            "component Counter(start: int):\n    state:\n        count: int = 0\n        ratio: float = 0.5\n        done: bool = False\n        name: str = \"Ann\"\n        tags: list = []\n    Divider",
        );

        assert_eq!(ir.node_type, "Component");
        assert_eq!(ir.prop_str("name"), Some("Counter"));
        assert_eq!(
            ir.prop("params"),
            Some(&json!([{"name": "start", "type": "int"}]))
        );

        let defaults: Vec<Value> = ir
            .state
            .unwrap()
            .into_iter()
            .map(|v| v.default_value)
            .collect();
        assert_eq!(
            defaults,
            vec![json!(0), json!(0.5), json!(false), json!("Ann"), json!("[]")]
        );
    }

    #[test]
    fn test_absent_attributes_are_omitted() {
        let ir = lower_source("component A:\n    VStack:\n        Badge(\"New\")");
        let vstack = &ir.children()[0];
        assert!(vstack.props.is_empty());
        assert_eq!(vstack.children().len(), 1);

        let badge = &vstack.children()[0];
        assert_eq!(badge.props.len(), 1);
        assert_eq!(badge.children, None);
    }

    #[test]
    fn test_integers_lower_to_numbers() {
        let ir = lower_source("component A:\n    TextArea(rows=3)\n    Image(src=\"/a.png\", width=64)");
        assert_eq!(ir.children()[0].prop("rows"), Some(&json!(3)));
        assert_eq!(ir.children()[1].prop("width"), Some(&json!(64)));
    }

    #[test]
    fn test_bindings() {
        let ir = lower_source(
            "component A:\n    Input(value := state.email, type=\"email\")\n    Text(content << state.count)\n    Checkbox(checked=\"yes\")",
        );
        let input = &ir.children()[0];
        assert_eq!(input.prop_str("type"), Some("email"));
        assert_eq!(
            input.binding("value"),
            Some(&BindingIR {
                mode: BindingMode::TwoWay,
                expression: "state.email".to_string(),
            })
        );
        assert_eq!(
            ir.children()[1].binding("content").map(|b| b.mode),
            Some(BindingMode::Subscribe)
        );
        let checkbox = &ir.children()[2];
        assert_eq!(checkbox.bindings, None);
        assert_eq!(checkbox.prop_str("checked"), Some("yes"));
    }

    #[test]
    fn test_control_flow_shapes() {
        let ir = lower_source("component A:\n    if state.ok:\n        Divider\n    for x in items:\n        Divider");
        let conditional = &ir.children()[0];
        assert_eq!(conditional.condition.as_deref(), Some("state.ok"));
        assert_eq!(conditional.children().len(), 1);
        let for_loop = &ir.children()[1];
        assert_eq!(
            for_loop.loop_info,
            Some(LoopInfo {
                variable: "x".to_string(),
                iterable: "items".to_string(),
            })
        );
    }

    #[test]
    fn test_action_payloads() {
        let navigate = lower_action(&parse_action(
            r#"Navigate(to="/user", query={"tab": "posts"}, replace=true)"#,
        ));
        assert_eq!(navigate.action_type, "navigate");
        assert_eq!(
            navigate.payload,
            json!({"to": "/user", "query": {"tab": "posts"}, "replace": true})
        );

        let mutation = lower_action(&parse_action("state.count -= 2"));
        assert_eq!(
            mutation.payload,
            json!({"path": "count", "operation": "SUBTRACT", "value": "2"})
        );

        let fetch = lower_action(&parse_action(
            r#"Fetch(url="/api", method="POST", body={"email": state.email, "kind": "x"})"#,
        ));
        assert_eq!(
            fetch.payload,
            json!({
                "url": "/api",
                "method": "POST",
                "body": {"email": {"state": "email"}, "kind": "x"}
            })
        );
    }

    #[test]
    fn test_button_on_click_action() {
        let ir = lower_source(
            "component A:\n    Button(\"Go\"):\n        on_click:\n            ShowToast(\"hi\")\n            state.n += 1",
        );
        let action = ir.children()[0].action("onClick").unwrap();
        assert_eq!(action.action_type, "sequence");
        assert_eq!(
            action.payload["actions"][0],
            json!({"type": "showToast", "payload": {"message": "hi"}})
        );
    }
}
