use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::model::{CellSummary, StatAxis, TrajectoryPoint};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub summaries: Vec<CellSummary>,
    /// Cells with fewer than two points.
    pub skipped: usize,
}

/// Reduce every cell in `points` to its generation time, log-size change and
/// growth rate.
///
/// Cells are keyed by `(lineage, cell)` so identical cell ids in different
/// lineages stay separate. Output follows first-seen order.
pub fn derive_cell_summaries(points: &[TrajectoryPoint]) -> StatsReport {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<Vec<&TrajectoryPoint>> = Vec::new();

    for point in points {
        let slot = *index
            .entry((point.lineage.as_str(), point.cell.as_str()))
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push(point);
    }

    let mut report = StatsReport::default();
    for mut group in groups {
        group.sort_by(|a, b| a.time.total_cmp(&b.time));
        match summarize(&group) {
            Some(summary) => report.summaries.push(summary),
            None => report.skipped += 1,
        }
    }
    report
}

fn summarize(sorted: &[&TrajectoryPoint]) -> Option<CellSummary> {
    let (first, last) = match sorted {
        [first, .., last] => (*first, *last),
        _ => return None,
    };
    let tau = last.time - first.time;
    let phi = last.log_size - first.log_size;
    let lambda = if tau > 0.0 {
        Some(phi / tau).filter(|l| l.is_finite())
    } else {
        None
    };
    Some(CellSummary {
        cell: first.cell.clone(),
        lineage: first.lineage.clone(),
        tau,
        phi,
        lambda,
        initial_size: first.log_size,
        final_size: last.log_size,
    })
}

/// Padded extent of one summary quantity, skipping cells where it is invalid.
pub fn summary_domain(summaries: &[CellSummary], axis: StatAxis) -> Domain {
    Domain::from_values(summaries.iter().filter_map(|s| s.value(axis)))
}
