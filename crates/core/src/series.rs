use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{SeriesKey, TrajectoryPoint};

/// One selectable `(experiment, lineage)` combination with first-seen metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub key: SeriesKey,
    /// Index of the first point carrying this key in the normalized input.
    pub first_index: usize,
    pub point_count: usize,
    pub cell_count: usize,
}

/// One cell's points within a series, sorted by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellTrack {
    pub cell: String,
    pub points: Vec<TrajectoryPoint>,
}

/// Distinct series keys, sorted for display.
///
/// Order: experiment lexicographically, then lineage numerically ascending.
/// Lineages that do not parse as numbers come after all numeric ones.
/// Remaining ties keep first-seen order.
pub fn group_series(points: &[TrajectoryPoint]) -> Vec<SeriesEntry> {
    let mut index: HashMap<SeriesKey, usize> = HashMap::new();
    let mut entries: Vec<SeriesEntry> = Vec::new();
    let mut cells: Vec<Vec<&str>> = Vec::new();

    for (i, point) in points.iter().enumerate() {
        let key = point.key();
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = entries.len();
                index.insert(key.clone(), slot);
                entries.push(SeriesEntry {
                    key,
                    first_index: i,
                    point_count: 0,
                    cell_count: 0,
                });
                cells.push(Vec::new());
                slot
            }
        };
        entries[slot].point_count += 1;
        if !cells[slot].contains(&point.cell.as_str()) {
            cells[slot].push(point.cell.as_str());
        }
    }

    for (entry, seen) in entries.iter_mut().zip(&cells) {
        entry.cell_count = seen.len();
    }

    entries.sort_by(compare_entries);
    entries
}

fn compare_entries(a: &SeriesEntry, b: &SeriesEntry) -> Ordering {
    a.key
        .experiment
        .cmp(&b.key.experiment)
        .then_with(|| compare_lineage(&a.key.lineage, &b.key.lineage))
        .then_with(|| a.first_index.cmp(&b.first_index))
}

/// Numeric lineages ascending, non-numeric ones after; `Equal` for ties.
pub fn compare_lineage(a: &str, b: &str) -> Ordering {
    match (lineage_number(a), lineage_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn lineage_number(lineage: &str) -> Option<f64> {
    lineage
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Points of one series, in input order.
pub fn series_points(points: &[TrajectoryPoint], key: &SeriesKey) -> Vec<TrajectoryPoint> {
    points
        .iter()
        .filter(|p| p.belongs_to(key))
        .cloned()
        .collect()
}

/// Split points into per-cell tracks.
///
/// Cells appear in first-seen order. Each track is stable-sorted by time,
/// so samples sharing a timestamp keep their input order.
pub fn group_cells(points: &[TrajectoryPoint]) -> Vec<CellTrack> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tracks: Vec<CellTrack> = Vec::new();

    for point in points {
        let slot = *index.entry(point.cell.as_str()).or_insert_with(|| {
            tracks.push(CellTrack {
                cell: point.cell.clone(),
                points: Vec::new(),
            });
            tracks.len() - 1
        });
        tracks[slot].points.push(point.clone());
    }

    for track in &mut tracks {
        // `sort_by` is stable.
        track.points.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
    tracks
}

/// Distinct experiment names, sorted.
pub fn experiments(points: &[TrajectoryPoint]) -> Vec<String> {
    let mut names: Vec<String> = points.iter().map(|p| p.experiment.clone()).collect();
    names.sort();
    names.dedup();
    names
}
