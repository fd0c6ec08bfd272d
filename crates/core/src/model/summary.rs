use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-cell reduction of one time-sorted trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSummary {
    pub cell: String,
    pub lineage: String,
    /// Generation time: last time minus first time.
    pub tau: f64,
    /// Log-size change between the last and first point.
    pub phi: f64,
    /// Growth rate `phi / tau`; `None` when `tau <= 0` or the quotient is not
    /// finite.
    pub lambda: Option<f64>,
    /// Log of the first point's size.
    pub initial_size: f64,
    /// Log of the last point's size.
    pub final_size: f64,
}

impl CellSummary {
    /// The quantity selected by `axis`, or `None` if it is not a finite number.
    pub fn value(&self, axis: StatAxis) -> Option<f64> {
        let v = match axis {
            StatAxis::Tau => Some(self.tau),
            StatAxis::Phi => Some(self.phi),
            StatAxis::Lambda => self.lambda,
        };
        v.filter(|v| v.is_finite())
    }
}

/// Which summary quantity a scatter axis shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatAxis {
    Tau,
    Phi,
    Lambda,
}

impl StatAxis {
    pub fn label(self) -> &'static str {
        match self {
            Self::Tau => "τ (Generation time)",
            Self::Phi => "φ (Log size change)",
            Self::Lambda => "λ (Growth rate)",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown statistic {0:?} (expected tau, phi or lambda)")]
pub struct UnknownStatAxis(pub String);

impl FromStr for StatAxis {
    type Err = UnknownStatAxis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tau" => Ok(Self::Tau),
            "phi" => Ok(Self::Phi),
            "lambda" => Ok(Self::Lambda),
            _ => Err(UnknownStatAxis(s.to_string())),
        }
    }
}
