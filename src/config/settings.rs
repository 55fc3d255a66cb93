use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::model::{Colormap, DEFAULT_SEGMENTATION_OPACITY, DEFAULT_WINDOW, Window};
use crate::viewport::ZoomLimits;

pub const DEFAULT_NUM_CLASSES: usize = 19;
pub const DEFAULT_LOGITS_OPACITY: f32 = 0.5;

/// Startup settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Readout rows shown before any logits file is loaded.
    pub num_classes: usize,
    pub window: Window,
    pub zoom: ZoomLimits,
    pub segmentation_opacity: f32,
    pub logits_opacity: f32,
    pub colormap: Colormap,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            num_classes: DEFAULT_NUM_CLASSES,
            window: DEFAULT_WINDOW,
            zoom: ZoomLimits::default(),
            segmentation_opacity: DEFAULT_SEGMENTATION_OPACITY,
            logits_opacity: DEFAULT_LOGITS_OPACITY,
            colormap: Colormap::default(),
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_classes == 0 {
            return Err(ConfigError::Invalid(
                "num_classes must be at least 1".to_string(),
            ));
        }
        if self.window.min >= self.window.max {
            return Err(ConfigError::Invalid(format!(
                "window min {} must be below max {}",
                self.window.min, self.window.max
            )));
        }
        let zoom = self.zoom;
        if !(zoom.min > 0.0 && zoom.min <= zoom.initial && zoom.initial <= zoom.max) {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < min <= initial <= max, found {} / {} / {}",
                zoom.min, zoom.initial, zoom.max
            )));
        }
        if !(zoom.step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom step must be positive, found {}",
                zoom.step
            )));
        }
        for (name, value) in [
            ("segmentation_opacity", self.segmentation_opacity),
            ("logits_opacity", self.logits_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must lie in [0, 1], found {value}"
                )));
            }
        }
        Ok(())
    }
}
