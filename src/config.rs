//! Per-canvas configuration for the link gesture engine.

use serde::{Deserialize, Serialize};

/// Settings of one diagram canvas, handed to the dispatcher at construction.
///
/// Every field has a default, so a partial settings file deserializes:
///
/// ```ignore
/// let config: LinkDragConfig = serde_json::from_str(r#"{ "read_only": true }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDragConfig {
    /// Reject new link gestures. Existing ones are unaffected.
    pub read_only: bool,
    /// Minimum horizontal control-point offset of the preview curve, in
    /// logical units (scaled by zoom when rendered).
    pub preview_min_offset: f32,
    /// Below this logical distance the preview is drawn as a straight line.
    pub preview_straight_threshold: f32,
}

impl Default for LinkDragConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            preview_min_offset: 50.0,
            preview_straight_threshold: 10.0,
        }
    }
}

impl LinkDragConfig {
    pub fn read_only() -> Self {
        Self { read_only: true, ..Self::default() }
    }
}
