//! Typed node sockets.
//!
//! A socket either carries a scalar default value (the float kinds) or is an
//! opaque link terminal used only to chain nodes. Values are clamped into the
//! socket's declared range on every write; out-of-range input is never an
//! error.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketKind {
    /// Float with a hard floor (and sometimes a ceiling).
    Bounded,
    /// Float with no bound.
    Free,
    /// Degrees in `[0, 360]`.
    Angle,
    /// Carries no value; chains tree stages together.
    Link,
}

impl SocketKind {
    pub fn carries_value(self) -> bool {
        !matches!(self, SocketKind::Link)
    }

    /// Links only connect to links; the float kinds all interconnect.
    pub fn is_compatible(self, other: SocketKind) -> bool {
        self.carries_value() == other.carries_value()
    }

    pub fn default_range(self) -> SocketRange {
        match self {
            SocketKind::Bounded => SocketRange::at_least(0.0),
            SocketKind::Angle => SocketRange::between(0.0, 360.0),
            SocketKind::Free | SocketKind::Link => SocketRange::UNBOUNDED,
        }
    }
}

/// Inclusive value range. `None` on either side means no bound.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SocketRange {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl SocketRange {
    pub const UNBOUNDED: SocketRange = SocketRange {
        min: None,
        max: None,
    };

    pub const fn at_least(min: f32) -> Self {
        SocketRange {
            min: Some(min),
            max: None,
        }
    }

    pub const fn between(min: f32, max: f32) -> Self {
        SocketRange {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        let mut v = value;
        if let Some(min) = self.min {
            v = v.max(min);
        }
        if let Some(max) = self.max {
            v = v.min(max);
        }
        v
    }

    pub fn contains(&self, value: f32) -> bool {
        self.clamp(value) == value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Socket {
    name: String,
    kind: SocketKind,
    range: SocketRange,
    value: f32,
    hidden: bool,
}

impl Socket {
    /// A socket with an explicit range. The value is clamped into it.
    pub fn with_range(name: &str, kind: SocketKind, range: SocketRange, value: f32) -> Self {
        let mut socket = Socket {
            name: name.to_string(),
            kind,
            range,
            value: 0.0,
            hidden: false,
        };
        socket.set_value(value);
        socket
    }

    pub fn bounded(name: &str, value: f32) -> Self {
        Self::with_range(name, SocketKind::Bounded, SocketKind::Bounded.default_range(), value)
    }

    /// A bounded socket restricted to `[0, 1]`.
    pub fn probability(name: &str, value: f32) -> Self {
        Self::with_range(name, SocketKind::Bounded, SocketRange::between(0.0, 1.0), value)
    }

    pub fn free(name: &str, value: f32) -> Self {
        Self::with_range(name, SocketKind::Free, SocketRange::UNBOUNDED, value)
    }

    pub fn angle(name: &str, value: f32) -> Self {
        Self::with_range(name, SocketKind::Angle, SocketKind::Angle.default_range(), value)
    }

    pub fn link(name: &str) -> Self {
        Socket {
            name: name.to_string(),
            kind: SocketKind::Link,
            range: SocketRange::UNBOUNDED,
            value: 0.0,
            hidden: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SocketKind {
        self.kind
    }

    pub fn range(&self) -> SocketRange {
        self.range
    }

    /// Current default value; `None` for link sockets.
    pub fn value(&self) -> Option<f32> {
        self.kind.carries_value().then_some(self.value)
    }

    /// Store `value` clamped into the socket range.
    ///
    /// Link sockets and non-finite input are ignored.
    pub fn set_value(&mut self, value: f32) {
        if !self.kind.carries_value() {
            log::trace!("ignoring value write on link socket `{}`", self.name);
            return;
        }
        if !value.is_finite() {
            log::trace!("ignoring non-finite value for socket `{}`", self.name);
            return;
        }
        self.value = self.range.clamp(value);
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns `true` when the flag actually changed.
    pub fn set_hidden(&mut self, hidden: bool) -> bool {
        if self.hidden == hidden {
            return false;
        }
        self.hidden = hidden;
        true
    }
}
