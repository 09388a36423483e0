//! Typed writes into the configuration record.
//!
//! The graph synchronizer never touches [`TreeConfig`](crate::TreeConfig)
//! fields directly; each node emits a [`ConfigBatch`] which is then applied in
//! one step. A batch serializes as a JSON array of
//! `{ "field": "roots_iteration", "value": { "type": "int", "data": 3 } }`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::ConfigField;
use crate::value::ConfigValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigWrite {
    pub field: ConfigField,
    pub value: ConfigValue,
}

impl ConfigWrite {
    pub fn new(field: ConfigField, value: impl Into<ConfigValue>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

impl fmt::Display for ConfigWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

/// An ordered batch of config writes. Later writes to the same field win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigBatch(pub Vec<ConfigWrite>);

impl ConfigBatch {
    pub fn new() -> Self {
        ConfigBatch(Vec::new())
    }

    pub fn push(&mut self, op: ConfigWrite) {
        self.0.push(op);
    }

    /// Shorthand for `push(ConfigWrite::new(field, value))`.
    pub fn write(&mut self, field: ConfigField, value: impl Into<ConfigValue>) {
        self.push(ConfigWrite::new(field, value));
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = ConfigWrite>) {
        self.0.extend(other);
    }

    pub fn append(&mut self, mut other: ConfigBatch) {
        self.0.append(&mut other.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigWrite> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ConfigWrite> {
        self.0
    }

    /// Fields touched by this batch, in first-write order.
    pub fn fields(&self) -> Vec<ConfigField> {
        let mut out: Vec<ConfigField> = Vec::with_capacity(self.0.len());
        for op in &self.0 {
            if !out.contains(&op.field) {
                out.push(op.field);
            }
        }
        out
    }
}

impl FromIterator<ConfigWrite> for ConfigBatch {
    fn from_iter<I: IntoIterator<Item = ConfigWrite>>(iter: I) -> Self {
        ConfigBatch(iter.into_iter().collect())
    }
}
