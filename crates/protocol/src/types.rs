use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Space reserved around the inner plot for axes and labels, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 28.0,
            bottom: 44.0,
            left: 58.0,
        }
    }
}

/// Fixed-size drawing surface for one chart.
///
/// `width`/`height` cover the whole surface; the inner plot is what remains
/// after subtracting the margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for PlotArea {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 380.0,
            margin: Margin::default(),
        }
    }
}

impl PlotArea {
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Inner plot rectangle in surface coordinates.
    pub fn inner_rect(&self) -> Rect {
        Rect::new(
            self.margin.left,
            self.margin.top,
            self.inner_width(),
            self.inner_height(),
        )
    }

    /// Pixel range for the horizontal axis, left to right.
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin.left, self.margin.left + self.inner_width())
    }

    /// Pixel range for the vertical axis. Starts at the bottom edge so that
    /// larger data values land higher on screen.
    pub fn y_range(&self) -> (f64, f64) {
        (self.margin.top + self.inner_height(), self.margin.top)
    }
}
