use std::fmt;

/// Dynamically typed result of evaluating a style expression.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing attribute or explicit `null`.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Long(i64),
    /// Floating point number.
    Double(f64),
    /// Text.
    String(String),
}

impl Value {
    /// Numeric view: numbers as-is, booleans as 0/1, numeric strings parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Long(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::String(s) => s.trim().parse().ok(),
        }
    }

    /// Boolean view: booleans as-is, numbers compared against zero, `"true"`/`"false"`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(*b),
            Value::Long(v) => Some(*v != 0),
            Value::Double(v) => Some(*v != 0.0),
            Value::String(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                other => other.parse::<f64>().ok().map(|v| v != 0.0),
            },
        }
    }

    /// Truthiness used by logical operators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::String(s) => !s.is_empty(),
            other => other.as_bool().unwrap_or(false),
        }
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
