use serde::{Deserialize, Serialize};

use crate::model::TrajectoryPoint;

/// Fraction of the raw span added on each side of a computed domain.
pub const DOMAIN_PADDING: f64 = 0.05;

/// Closed interval `[min, max]` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const UNIT: Domain = Domain { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Padded extent of the finite values in `values`.
    ///
    /// No finite values gives `[0, 1]`. A single distinct value `v` gives
    /// `[v - 1, v + 1]`, or a few ulps either side of `v` where `±1` is lost
    /// to rounding. Otherwise both ends move outward by 5% of the span.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if !lo.is_finite() || !hi.is_finite() {
            return Self::UNIT;
        }
        if lo == hi {
            return Self::around(lo);
        }
        let pad = (hi - lo) * DOMAIN_PADDING;
        Self::new(lo - pad, hi + pad)
    }

    /// Non-empty interval around a single finite value.
    fn around(v: f64) -> Self {
        let (min, max) = (v - 1.0, v + 1.0);
        if max > min {
            return Self::new(min, max);
        }
        let half = v.abs() * f64::EPSILON * 4.0;
        Self::new((v - half).max(f64::MIN), (v + half).min(f64::MAX))
    }
}

/// Which numeric field of a point a domain is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Time,
    Size,
}

impl Dimension {
    pub fn of(self, point: &TrajectoryPoint) -> f64 {
        match self {
            Self::Time => point.time,
            Self::Size => point.size,
        }
    }
}

pub fn compute_domain<'a, I>(points: I, dimension: Dimension) -> Domain
where
    I: IntoIterator<Item = &'a TrajectoryPoint>,
{
    Domain::from_values(points.into_iter().map(|p| dimension.of(p)))
}
