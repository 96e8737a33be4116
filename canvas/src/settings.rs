//! Engine tuning: connector geometry and the rotate step.
//!
//! Hosts usually deserialize a `Settings` block from their catalog file and
//! hand it to [`crate::engine::EngineCore::with_settings`]. Every field has a
//! default, so an empty JSON object is a valid configuration.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ROTATE_STEP_DEG, SIDE_BOX_HEIGHT_RATIO, SIDE_BOX_PADDING, SIDE_BOX_WIDTH};

/// Errors produced by [`Settings::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// The connector box thickness is negative or not a finite number.
    #[error("side_box_width must be finite and >= 0, got {0}")]
    SideBoxWidth(f64),
    /// The connector length ratio is outside `(0, 1]`.
    #[error("side_box_height_ratio must be in (0, 1], got {0}")]
    SideBoxHeightRatio(f64),
    /// The snap padding is negative or not a finite number.
    #[error("side_box_padding must be finite and >= 0, got {0}")]
    SideBoxPadding(f64),
    /// Rotation must move between the four axis-aligned orientations.
    #[error("rotate_step must be a non-zero multiple of 90, got {0}")]
    RotateStep(i32),
}

/// Tunable engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Connector box thickness.
    pub side_box_width: f64,
    /// Connector box length relative to the edge it sits on.
    pub side_box_height_ratio: f64,
    /// Clearance added to the connector width when snapping.
    pub side_box_padding: f64,
    /// Degrees applied per rotate-icon click.
    pub rotate_step: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            side_box_width: SIDE_BOX_WIDTH,
            side_box_height_ratio: SIDE_BOX_HEIGHT_RATIO,
            side_box_padding: SIDE_BOX_PADDING,
            rotate_step: ROTATE_STEP_DEG,
        }
    }
}

impl Settings {
    /// Check every field, returning the first violation.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] naming the offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.side_box_width.is_finite() || self.side_box_width < 0.0 {
            return Err(SettingsError::SideBoxWidth(self.side_box_width));
        }
        let ratio = self.side_box_height_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(SettingsError::SideBoxHeightRatio(ratio));
        }
        if !self.side_box_padding.is_finite() || self.side_box_padding < 0.0 {
            return Err(SettingsError::SideBoxPadding(self.side_box_padding));
        }
        if self.rotate_step == 0 || self.rotate_step % 90 != 0 {
            return Err(SettingsError::RotateStep(self.rotate_step));
        }
        Ok(())
    }

    /// Distance between facing edges after a snap-merge.
    #[must_use]
    pub fn snap_gap(&self) -> f64 {
        self.side_box_width + self.side_box_padding
    }
}
