//! Data-space ⇄ pixel-space conversion and axis ticks.

use serde::{Deserialize, Serialize};
use sizeview_protocol::PlotArea;

use crate::domain::Domain;
use crate::viewport::ViewportState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Time.
    X,
    /// Size.
    Y,
}

/// Linear map of `value` from `domain` onto the pixel range `start..end`.
///
/// `end < start` is allowed and flips direction. The domain must have a
/// non-zero span.
pub fn to_pixel(value: f64, domain: Domain, start: f64, end: f64) -> f64 {
    start + (value - domain.min) / domain.span() * (end - start)
}

/// Inverse of [`to_pixel`] for the same domain and range.
pub fn to_value(pixel: f64, domain: Domain, start: f64, end: f64) -> f64 {
    domain.min + (pixel - start) / (end - start) * domain.span()
}

fn axis_frame(axis: Axis, state: &ViewportState, area: &PlotArea) -> (Domain, (f64, f64)) {
    match axis {
        Axis::X => (state.x, area.x_range()),
        Axis::Y => (state.y, area.y_range()),
    }
}

/// Pixel position of a data value on `axis` under the current viewport.
pub fn axis_to_pixel(value: f64, axis: Axis, state: &ViewportState, area: &PlotArea) -> f64 {
    let (domain, (start, end)) = axis_frame(axis, state, area);
    to_pixel(value, domain, start, end)
}

/// Data value under a pixel position on `axis` under the current viewport.
pub fn axis_to_value(pixel: f64, axis: Axis, state: &ViewportState, area: &PlotArea) -> f64 {
    let (domain, (start, end)) = axis_frame(axis, state, area);
    to_value(pixel, domain, start, end)
}

/// `count` evenly spaced values from `domain.min` to `domain.max` inclusive.
pub fn make_ticks(domain: Domain, count: usize) -> Vec<f64> {
    if !domain.min.is_finite() || !domain.max.is_finite() || count == 0 {
        return Vec::new();
    }
    if domain.min == domain.max || count == 1 {
        return vec![domain.min];
    }
    let step = domain.span() / (count - 1) as f64;
    (0..count)
        .map(|i| domain.min + step * i as f64)
        .collect()
}

/// Tick label text: whole numbers from 100 up, two decimals below.
pub fn format_tick(value: f64) -> String {
    if !value.is_finite() {
        String::new()
    } else if value.abs() >= 100.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
