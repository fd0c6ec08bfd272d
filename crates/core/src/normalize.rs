//! Typed trajectory points from loosely-typed rows.
//!
//! Datasets in the wild name their columns differently (`time_units`,
//! `minutes`, `cell_size`, ...). Each logical field has an ordered alias
//! list; the first alias whose column is present and non-empty wins.

use thiserror::Error;

use crate::model::{RawRecord, TrajectoryPoint};

pub const TIME_ALIASES: &[&str] = &["time_units", "time", "Time", "minutes"];
pub const SIZE_ALIASES: &[&str] = &["size", "Size", "cell_size", "volume"];
pub const CELL_ALIASES: &[&str] = &["cell", "Cell", "cell_id"];
pub const LINEAGE_ALIASES: &[&str] = &["lineage", "Lineage", "lineage_id"];
pub const EXPERIMENT_ALIASES: &[&str] = &["experiment", "Experiment"];

pub const DEFAULT_CELL: &str = "1";
pub const DEFAULT_LINEAGE: &str = "1";
pub const DEFAULT_EXPERIMENT: &str = "default";

/// File extensions stripped from the end of experiment names.
const DATASET_EXTENSIONS: &[&str] = &[".csv", ".tsv"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("no rows with valid time and size values ({rejected} rejected)")]
    EmptyDataset { rejected: usize },
}

/// Points that survived normalization, plus how many rows were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeReport {
    pub points: Vec<TrajectoryPoint>,
    pub rejected: usize,
}

/// Normalize every record, dropping rows whose time or size is not a finite
/// number. Fails only when nothing survives.
pub fn normalize_records<'a, I>(records: I) -> Result<NormalizeReport, NormalizeError>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut points = Vec::new();
    let mut rejected = 0;
    for record in records {
        match normalize_record(record) {
            Some(point) => points.push(point),
            None => rejected += 1,
        }
    }
    if points.is_empty() {
        return Err(NormalizeError::EmptyDataset { rejected });
    }
    Ok(NormalizeReport { points, rejected })
}

/// Normalize one record, or `None` if it must be rejected.
pub fn normalize_record(record: &RawRecord) -> Option<TrajectoryPoint> {
    let time = coerce_number(resolve(record, TIME_ALIASES));
    let size = coerce_number(resolve(record, SIZE_ALIASES));
    if !time.is_finite() || !size.is_finite() {
        return None;
    }

    let cell = resolve(record, CELL_ALIASES).unwrap_or(DEFAULT_CELL);
    let lineage = resolve(record, LINEAGE_ALIASES).unwrap_or(DEFAULT_LINEAGE);
    let experiment = resolve(record, EXPERIMENT_ALIASES)
        .map(strip_dataset_extension)
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_EXPERIMENT);

    Some(TrajectoryPoint::new(experiment, lineage, cell, time, size))
}

/// First alias whose column exists with non-empty (trimmed) text.
fn resolve<'r>(record: &'r RawRecord, aliases: &[&str]) -> Option<&'r str> {
    aliases
        .iter()
        .filter_map(|alias| record.get(alias))
        .map(str::trim)
        .find(|v| !v.is_empty())
}

/// Parse as `f64`; absence and garbage both become `NaN`.
fn coerce_number(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Remove every trailing dataset extension (`a.csv.csv` -> `a`), ASCII
/// case-insensitively.
pub fn strip_dataset_extension(name: &str) -> &str {
    let mut name = name.trim();
    'outer: loop {
        for ext in DATASET_EXTENSIONS {
            if name.len() >= ext.len() {
                let split = name.len() - ext.len();
                if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(ext) {
                    name = name[..split].trim_end();
                    continue 'outer;
                }
            }
        }
        return name;
    }
}
