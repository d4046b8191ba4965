use std::fmt;

use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SlError, SlResult};

/// An insertion-ordered property bag. Order carries no meaning but is kept
/// so that documents survive a load/save cycle unchanged.
pub type Properties = IndexMap<String, PropertyValue>;

/// A dynamically typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// An absent value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer value.
    Int(i64),
    /// An unsigned integer too large for [`PropertyValue::Int`].
    UInt(u64),
    /// A 64-bit floating-point value.
    Float(f64),
    /// A text value.
    String(String),
    /// An ordered list of values.
    List(Vec<PropertyValue>),
    /// A nested property bag.
    Map(Properties),
}

impl PropertyValue {
    /// Returns the value as `f32` if it is numeric.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Int(n) => Some(*n as f32),
            Self::UInt(n) => Some(*n as f32),
            Self::Float(n) => Some(*n as f32),
            _ => None,
        }
    }

    /// Returns the value as `bool` if it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested map if this value is one.
    pub fn as_map(&self) -> Option<&Properties> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the list if this value is one.
    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` for [`PropertyValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The value as it is written to a document: empty strings become null.
    pub fn to_persisted(&self) -> PropertyValue {
        match self {
            Self::String(s) if s.is_empty() => Self::Null,
            other => other.clone(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(_) => write!(f, "{{...}}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u64> for PropertyValue {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Self::UInt(n), Self::Int)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<f32> for PropertyValue {
    fn from(n: f32) -> Self {
        Self::Float(f64::from(n))
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Properties> for PropertyValue {
    fn from(m: Properties) -> Self {
        Self::Map(m)
    }
}

/// Copy every key of `defaults` that `target` does not have yet.
///
/// Existing keys are never overwritten.
pub fn add_missing_properties(defaults: &Properties, target: &mut Properties) {
    for (key, value) in defaults {
        if !target.contains_key(key) {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Build an `{"X", "Y", "Z"}` record, multiplying every component by `scale`.
pub fn vector_record(v: Vec3, scale: f32) -> PropertyValue {
    let mut map = Properties::new();
    map.insert("X".to_string(), PropertyValue::from(v.x * scale));
    map.insert("Y".to_string(), PropertyValue::from(v.y * scale));
    map.insert("Z".to_string(), PropertyValue::from(v.z * scale));
    PropertyValue::Map(map)
}

/// Parse an `{"X", "Y", "Z"}` record, dividing every component by `scale`.
pub fn parse_vector_record(value: &PropertyValue, scale: f32, context: &str) -> SlResult<Vec3> {
    let map = value
        .as_map()
        .ok_or_else(|| SlError::malformed(context, "expected an {X, Y, Z} record"))?;

    let component = |axis: &str| -> SlResult<f32> {
        map.get(axis)
            .and_then(PropertyValue::as_f32)
            .map(|n| n / scale)
            .ok_or_else(|| SlError::malformed(context, format!("missing numeric \"{axis}\"")))
    };

    Ok(Vec3::new(component("X")?, component("Y")?, component("Z")?))
}
