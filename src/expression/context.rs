use std::collections::BTreeMap;

use crate::expression::value::Value;

/// Evaluation context for style expressions of one feature collection.
///
/// `attributes` back `[name]` references; `variables` back bare identifiers. The identifier
/// `zoom` resolves to [`FeatureExpressionContext::zoom`] unless shadowed by a variable.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FeatureExpressionContext {
    /// Current view zoom level.
    pub zoom: f32,
    /// Feature attributes shared by the collection being built.
    pub attributes: BTreeMap<String, Value>,
    /// Caller-defined variables.
    pub variables: BTreeMap<String, Value>,
}

impl FeatureExpressionContext {
    /// Context at `zoom` with no attributes.
    pub fn new(zoom: f32) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style variable insertion.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Attribute value, or [`Value::Null`] when missing.
    pub fn attribute(&self, name: &str) -> Value {
        self.attributes.get(name).cloned().unwrap_or_default()
    }

    /// Variable value, or [`Value::Null`] when missing.
    pub fn variable(&self, name: &str) -> Value {
        if let Some(v) = self.variables.get(name) {
            return v.clone();
        }
        if name == "zoom" {
            return Value::Double(f64::from(self.zoom));
        }
        Value::Null
    }
}
