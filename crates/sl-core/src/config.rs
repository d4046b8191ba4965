use serde::{Deserialize, Serialize};

use crate::error::{SlError, SlResult};

/// Caller-selected rules for rewriting links during duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicationPolicy {
    /// Let a copy keep links to targets that were not duplicated with it.
    /// When false those link occurrences are dropped from the copy.
    pub allow_link_copy_to_original: bool,
}

impl DuplicationPolicy {
    /// Set whether copies may keep links to un-duplicated originals.
    pub fn with_links_to_originals(mut self, allow: bool) -> Self {
        self.allow_link_copy_to_original = allow;
        self
    }
}

/// Editor-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Factor between persisted positions and editor units. Must be finite
    /// and positive.
    pub unit_scale: f32,
    /// Link rewriting rules for duplicate and paste.
    pub duplication: DuplicationPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            unit_scale: 100.0,
            duplication: DuplicationPolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON; missing keys fall back to defaults.
    pub fn from_json(json: &str) -> SlResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> SlResult<()> {
        if !self.unit_scale.is_finite() || self.unit_scale <= 0.0 {
            return Err(SlError::InvalidConfig(format!(
                "unit_scale must be a positive number, got {}",
                self.unit_scale
            )));
        }
        Ok(())
    }

    /// Set the persisted-to-editor unit factor.
    pub fn with_unit_scale(mut self, scale: f32) -> Self {
        self.unit_scale = scale;
        self
    }

    /// Set the duplication policy.
    pub fn with_duplication(mut self, policy: DuplicationPolicy) -> Self {
        self.duplication = policy;
        self
    }
}
