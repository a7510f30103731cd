//! Tunables shared by the CLI and the bindings.

use serde::{Deserialize, Serialize};

use crate::conflict::NewConflictPolicy;
use crate::error::Result;
use crate::routine::DEFAULT_OCCURRENCE_CAP;

/// Colour used for calendar marks when an event has none.
pub const DEFAULT_MARK_COLOR: &str = "#89b27f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Occurrence cap applied to routine templates that do not set one.
    pub occurrence_cap: usize,
    pub default_color: String,
    pub conflict_policy: NewConflictPolicy,
    /// Free gaps shorter than this are not reported.
    pub min_free_gap_minutes: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            occurrence_cap: DEFAULT_OCCURRENCE_CAP,
            default_color: DEFAULT_MARK_COLOR.to_string(),
            conflict_policy: NewConflictPolicy::default(),
            min_free_gap_minutes: 0,
        }
    }
}

impl PlannerConfig {
    /// Parse a JSON config document. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
