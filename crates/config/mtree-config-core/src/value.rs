//! Scalar values carried between graph nodes and the configuration record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single configuration value.
///
/// Serializes as `{ "type": "float", "data": 0.5 }` so batches stay readable
/// when dumped for debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ConfigValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    Text(String),
}

/// Discriminant of [`ConfigValue`], used to describe field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Text,
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::Float(_) => ValueKind::Float,
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            ConfigValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Text => "text",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Int(v) => write!(f, "{v}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Bool(v) => write!(f, "{v}"),
            ConfigValue::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<f32> for ConfigValue {
    fn from(v: f32) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Text(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_tagged_form() {
        let json = serde_json::to_string(&ConfigValue::Float(0.5)).unwrap();
        assert_eq!(json, r#"{"type":"float","data":0.5}"#);
        let back: ConfigValue = serde_json::from_str(r#"{"type":"text","data":"Bark"}"#).unwrap();
        assert_eq!(back, ConfigValue::Text("Bark".into()));
    }

    #[test]
    fn accessors_match_kind() {
        assert_eq!(ConfigValue::Int(3).as_int(), Some(3));
        assert_eq!(ConfigValue::Int(3).as_float(), None);
        assert_eq!(ConfigValue::from(true).kind(), ValueKind::Bool);
        assert_eq!(ConfigValue::from("leaf").as_text(), Some("leaf"));
    }
}
