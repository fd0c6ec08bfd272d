use serde::{Deserialize, Serialize};
use sizeview_protocol::PlotArea;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Chart geometry and interaction tuning for one viewer.
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub plot: PlotArea,
    /// Ticks per axis, including both ends.
    pub tick_count: usize,
    /// Factor applied by the "zoom in" button.
    pub zoom_in_factor: f64,
    /// Factor applied by the "zoom out" button.
    pub zoom_out_factor: f64,
    /// Factor applied per wheel notch towards the user.
    pub wheel_zoom_in: f64,
    /// Factor applied per wheel notch away from the user.
    pub wheel_zoom_out: f64,
    pub time_label: String,
    pub size_label: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            plot: PlotArea::default(),
            tick_count: 6,
            zoom_in_factor: 0.8,
            zoom_out_factor: 1.25,
            wheel_zoom_in: 0.9,
            wheel_zoom_out: 1.1,
            time_label: "Time (units)".to_string(),
            size_label: "Size (units)".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parse a (possibly partial) JSON config over the defaults and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let inner_w = self.plot.inner_width();
        let inner_h = self.plot.inner_height();
        if !(inner_w.is_finite() && inner_w > 0.0 && inner_h.is_finite() && inner_h > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "plot leaves no drawing area ({inner_w}x{inner_h} inside margins)"
            )));
        }
        if self.tick_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "tick_count must be at least 2, got {}",
                self.tick_count
            )));
        }
        let factors = [
            ("zoom_in_factor", self.zoom_in_factor),
            ("zoom_out_factor", self.zoom_out_factor),
            ("wheel_zoom_in", self.wheel_zoom_in),
            ("wheel_zoom_out", self.wheel_zoom_out),
        ];
        for (name, value) in factors {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Width of the inner plot in pixels; pan deltas are measured against it.
    pub fn inner_width(&self) -> f64 {
        self.plot.inner_width()
    }
}
