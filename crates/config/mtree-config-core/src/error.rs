use thiserror::Error;

use crate::value::ValueKind;

/// Errors produced while reading or writing the configuration record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config field `{field}` expects {expected}, got {found}")]
    TypeMismatch {
        field: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("unknown config field `{0}`")]
    UnknownField(String),
    #[error("config json error: {0}")]
    Json(String),
}
