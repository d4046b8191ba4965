use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SlResult;
use crate::value::Properties;

/// Source of per-class default properties.
pub trait ParameterDatabase {
    /// Default properties for points of rails with class `class_name`.
    fn point_defaults(&self, class_name: &str) -> Option<&Properties>;
}

/// A database that knows no classes. Every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaults;

impl ParameterDatabase for NoDefaults {
    fn point_defaults(&self, _class_name: &str) -> Option<&Properties> {
        None
    }
}

/// Rail point defaults held in memory, keyed by rail class name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RailParameters {
    point_properties: HashMap<String, Properties>,
}

impl RailParameters {
    /// An empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping class names to default point properties.
    pub fn from_json(json: &str) -> SlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Register the default point properties for a rail class.
    pub fn insert(&mut self, class_name: impl Into<String>, defaults: Properties) {
        self.point_properties.insert(class_name.into(), defaults);
    }

    /// Builder form of [`RailParameters::insert`].
    pub fn with_class(mut self, class_name: impl Into<String>, defaults: Properties) -> Self {
        self.insert(class_name, defaults);
        self
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.point_properties.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ParameterDatabase for RailParameters {
    fn point_defaults(&self, class_name: &str) -> Option<&Properties> {
        self.point_properties.get(class_name)
    }
}
