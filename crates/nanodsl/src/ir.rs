//! NanoIR: the uniform, serializable tree every renderer consumes.
//!
//! Every node has the same shape regardless of its type. Type-specific data
//! lives in `props` as JSON values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NanoIR {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub props: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NanoIR>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_info: Option<LoopInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Vec<StateVariableIR>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeMap<String, ActionIR>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<BTreeMap<String, BindingIR>>,
}

/// `for <variable> in <iterable>` header of a `ForLoop` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopInfo {
    pub variable: String,
    pub iterable: String,
}

/// A state variable definition with its default already typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateVariableIR {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
    pub default_value: Value,
}

/// `{type, payload}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionIR {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingIR {
    pub mode: BindingMode,
    pub expression: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingMode {
    Subscribe,
    TwoWay,
}

impl NanoIR {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            props: BTreeMap::new(),
            children: None,
            condition: None,
            loop_info: None,
            state: None,
            actions: None,
            bindings: None,
        }
    }

    /// A node that always carries a (possibly empty) child list.
    pub fn container(node_type: impl Into<String>, children: Vec<NanoIR>) -> Self {
        Self {
            children: Some(children),
            ..Self::new(node_type)
        }
    }

    /// Set a prop unless the value is absent.
    pub fn with_prop(mut self, key: &str, value: Option<impl Into<Value>>) -> Self {
        if let Some(value) = value {
            self.props.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn children(&self) -> &[NanoIR] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn action(&self, event: &str) -> Option<&ActionIR> {
        self.actions.as_ref()?.get(event)
    }

    pub fn binding(&self, prop: &str) -> Option<&BindingIR> {
        self.bindings.as_ref()?.get(prop)
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(NanoIR::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serializes_camel_case_and_omits_absent() {
        let mut node = NanoIR::container("ForLoop", vec![NanoIR::new("Divider")]);
        node.loop_info = Some(LoopInfo {
            variable: "item".to_string(),
            iterable: "items".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "ForLoop",
                "props": {},
                "children": [{"type": "Divider", "props": {}}],
                "loop": {"variable": "item", "iterable": "items"}
            })
        );
    }

    #[test]
    fn test_deserializes_without_props() {
        let node: NanoIR = serde_json::from_str(r#"{"type": "Text"}"#).unwrap();
        assert_eq!(node.node_type, "Text");
        assert!(node.props.is_empty());
        assert_eq!(node.node_count(), 1);
    }

    #[test]
    fn test_binding_mode_names() {
        let binding = BindingIR {
            mode: BindingMode::TwoWay,
            expression: "state.name".to_string(),
        };
        assert_eq!(
            serde_json::to_value(binding).unwrap(),
            json!({"mode": "twoWay", "expression": "state.name"})
        );
    }

    #[test]
    fn test_with_prop_skips_none() {
        let node = NanoIR::new("Badge")
            .with_prop("text", Some("New"))
            .with_prop("color", None::<String>);
        assert_eq!(node.prop_str("text"), Some("New"));
        assert_eq!(node.prop("color"), None);
    }
}
