use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::path::FillRule;
use crate::selection::MoveMode;
use crate::shape::{LineFixedLength, ShapeDefaults, StyleKey};

/// Settings every tool reads while building and moving shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    pub snap_to_grid: bool,
    pub snap_x: f64,
    pub snap_y: f64,
    /// Reuse an existing point under the cursor instead of creating a new one.
    pub try_to_connect: bool,
    pub hit_threshold: f64,
    pub move_mode: MoveMode,
    pub default_is_stroked: bool,
    pub default_is_filled: bool,
    pub default_is_closed: bool,
    pub default_is_smooth_join: bool,
    pub default_fill_rule: FillRule,
    pub default_text: String,
    pub default_style: Option<StyleKey>,
    pub line_fixed_length: Option<LineFixedLength>,
    pub history_limit: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            snap_to_grid: true,
            snap_x: 15.0,
            snap_y: 15.0,
            try_to_connect: false,
            hit_threshold: 7.0,
            move_mode: MoveMode::Point,
            default_is_stroked: true,
            default_is_filled: false,
            default_is_closed: false,
            default_is_smooth_join: true,
            default_fill_rule: FillRule::EvenOdd,
            default_text: "Text".to_string(),
            default_style: None,
            line_fixed_length: None,
            history_limit: crate::command::DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EditorOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).map_err(|err| EditorError::Options(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.snap_x > 0.0 && self.snap_y > 0.0) {
            return Err(EditorError::Options(format!(
                "snap spacing must be positive, got {}x{}",
                self.snap_x, self.snap_y
            )));
        }
        if !(self.hit_threshold >= 0.0) {
            return Err(EditorError::Options(format!(
                "hit threshold must not be negative, got {}",
                self.hit_threshold
            )));
        }
        if let Some(fixed) = self.line_fixed_length {
            if !(fixed.length > 0.0) {
                return Err(EditorError::Options(format!(
                    "fixed line length must be positive, got {}",
                    fixed.length
                )));
            }
        }
        if self.history_limit == 0 {
            return Err(EditorError::Options("history limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Grid-snaps a coordinate pair when snapping is enabled.
    pub fn snap(&self, x: f64, y: f64) -> (f64, f64) {
        if self.snap_to_grid {
            ((x / self.snap_x).round() * self.snap_x, (y / self.snap_y).round() * self.snap_y)
        } else {
            (x, y)
        }
    }

    pub fn shape_defaults(&self) -> ShapeDefaults {
        ShapeDefaults {
            style: self.default_style.clone(),
            is_stroked: self.default_is_stroked,
            is_filled: self.default_is_filled,
        }
    }
}
