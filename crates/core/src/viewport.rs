use serde::{Deserialize, Serialize};

use crate::domain::{Dimension, Domain, compute_domain};
use crate::model::TrajectoryPoint;

/// Absolute lower bound for the width of the X window.
pub const MIN_SPAN_EPSILON: f64 = 1e-9;

/// Relative floor used when a series has no two distinct sample times.
const DEGENERATE_SPAN_FRACTION: f64 = 1e-6;

/// The X window, its outer bound, and the Y range derived from what is visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Full time extent of the selected series (padded).
    pub base_x: Domain,
    /// Currently visible time window.
    pub x: Domain,
    /// Size range of the points inside `x`.
    pub y: Domain,
}

/// Which side of the X window a drag handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
}

/// Zoom/pan state over one selected series.
///
/// Created fresh for every series selection. `pan`, `set_window` and
/// `drag_edge` keep `x` inside `base_x`; `zoom` does not clamp, so zooming
/// out can widen `x` past the base extent. After every mutation `y` is
/// recomputed from the points visible in `x`.
#[derive(Debug, Clone)]
pub struct Viewport {
    points: Vec<TrajectoryPoint>,
    state: ViewportState,
    min_span: f64,
}

impl Viewport {
    /// Start viewing `points` with the base extent taken from their times.
    pub fn select(points: Vec<TrajectoryPoint>) -> Self {
        let base_x = compute_domain(&points, Dimension::Time);
        Self::with_base(points, base_x)
    }

    /// Start viewing `points` inside an explicit base extent.
    pub fn with_base(points: Vec<TrajectoryPoint>, base_x: Domain) -> Self {
        let min_span = min_span_for(&points, base_x);
        let mut viewport = Self {
            points,
            state: ViewportState {
                base_x,
                x: base_x,
                y: Domain::UNIT,
            },
            min_span,
        };
        viewport.reset();
        viewport
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    /// Narrowest X window that zoom and handle drags will produce.
    pub fn min_span(&self) -> f64 {
        self.min_span
    }

    /// Points whose time lies inside the current X window.
    pub fn visible_points(&self) -> impl Iterator<Item = &TrajectoryPoint> + '_ {
        let x = self.state.x;
        self.points.iter().filter(move |p| x.contains(p.time))
    }

    pub fn reset(&mut self) {
        self.state.x = self.state.base_x;
        self.refresh_y();
    }

    /// Scale the X window around its centre. `factor < 1` zooms in.
    ///
    /// Returns `false` and leaves the state untouched when the factor is not a
    /// positive finite number or the window would become narrower than
    /// [`min_span`](Self::min_span).
    pub fn zoom(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("ignoring zoom with invalid factor {factor}");
            return false;
        }
        let x = self.state.x;
        let center = x.center();
        let half = x.span() * factor / 2.0;
        let next = Domain::new(center - half, center + half);
        if !next.min.is_finite() || !next.max.is_finite() {
            log::debug!("ignoring zoom that overflows the time axis");
            return false;
        }
        if next.span() < self.min_span {
            log::debug!(
                "ignoring zoom below minimum span ({} < {})",
                next.span(),
                self.min_span
            );
            return false;
        }
        self.state.x = next;
        self.refresh_y();
        true
    }

    /// Shift the X window by a pixel delta measured on a plot that is
    /// `inner_width_px` wide, clamped so the window stays inside `base_x`.
    pub fn pan(&mut self, delta_px: f64, inner_width_px: f64) -> bool {
        let base = self.state.base_x;
        let usable_width = inner_width_px.is_finite() && inner_width_px > 0.0;
        if !usable_width || base.span() <= 0.0 || !delta_px.is_finite() {
            return false;
        }
        let span = self.state.x.span();
        let shift = delta_px / inner_width_px * span;
        let mut min = self.state.x.min + shift;
        let mut max = self.state.x.max + shift;
        if min < base.min {
            min = base.min;
            max = min + span;
        }
        if max > base.max {
            max = base.max;
            min = max - span;
        }
        self.state.x = Domain::new(min, max);
        self.refresh_y();
        true
    }

    /// Replace the X window, e.g. from a range slider. The pair may come in
    /// either order; both ends are clamped into `base_x` and the result is
    /// widened to at least the minimum span.
    pub fn set_window(&mut self, a: f64, b: f64) -> bool {
        if !a.is_finite() || !b.is_finite() {
            return false;
        }
        let base = self.state.base_x;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut lo = lo.clamp(base.min, base.max);
        let mut hi = hi.clamp(base.min, base.max);
        if hi - lo < self.min_span {
            let need = self.min_span.min(base.span());
            hi = (lo + need).min(base.max);
            lo = hi - need;
        }
        self.state.x = Domain::new(lo, hi);
        self.refresh_y();
        true
    }

    /// Move one edge of the X window to `value` (a drag handle). The edge
    /// stays inside `base_x` and at least the minimum span from the other.
    pub fn drag_edge(&mut self, edge: Edge, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let base = self.state.base_x;
        let x = self.state.x;
        match edge {
            Edge::Left => {
                self.state.x.min = value.min(x.max - self.min_span).max(base.min);
            }
            Edge::Right => {
                self.state.x.max = value.max(x.min + self.min_span).min(base.max);
            }
        }
        self.refresh_y();
        true
    }

    /// Share of the base extent currently in view (can exceed 1 after a
    /// zoom-out).
    pub fn visible_fraction(&self) -> f64 {
        let base = self.state.base_x.span();
        if base > 0.0 {
            self.state.x.span() / base
        } else {
            1.0
        }
    }

    /// Human-readable summary of the current window.
    pub fn zoom_info(&self) -> String {
        format!(
            "Showing {:.1}% of time range ({:.2} - {:.2})",
            self.visible_fraction() * 100.0,
            self.state.x.min,
            self.state.x.max
        )
    }

    fn refresh_y(&mut self) {
        let x = self.state.x;
        let any_visible = self.points.iter().any(|p| x.contains(p.time));
        self.state.y = if any_visible {
            compute_domain(self.visible_points(), Dimension::Size)
        } else {
            compute_domain(&self.points, Dimension::Size)
        };
    }
}

/// Smallest positive gap between sorted sample times, with fallbacks for
/// series that have no such gap.
fn min_span_for(points: &[TrajectoryPoint], base: Domain) -> f64 {
    let mut times: Vec<f64> = points
        .iter()
        .map(|p| p.time)
        .filter(|t| t.is_finite())
        .collect();
    times.sort_by(f64::total_cmp);
    let gap = times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|g| *g > 0.0)
        .fold(f64::INFINITY, f64::min);
    let floor = if gap.is_finite() {
        gap
    } else {
        base.span() * DEGENERATE_SPAN_FRACTION
    };
    floor.max(MIN_SPAN_EPSILON)
}
