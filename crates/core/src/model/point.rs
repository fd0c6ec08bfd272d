use serde::{Deserialize, Serialize};

/// One input row as untyped `(column, value)` text pairs, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.push((column.into(), value.into()));
    }

    /// Value of the first column named exactly `column`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A single size measurement of one cell at one instant.
///
/// `time` and `size` are always finite. `log_size` is `ln(size)` for
/// positive sizes and `NaN` otherwise; only the statistics deriver reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub experiment: String,
    pub lineage: String,
    pub cell: String,
    pub time: f64,
    pub size: f64,
    pub log_size: f64,
}

impl TrajectoryPoint {
    pub fn new(
        experiment: impl Into<String>,
        lineage: impl Into<String>,
        cell: impl Into<String>,
        time: f64,
        size: f64,
    ) -> Self {
        let log_size = if size > 0.0 { size.ln() } else { f64::NAN };
        Self {
            experiment: experiment.into(),
            lineage: lineage.into(),
            cell: cell.into(),
            time,
            size,
            log_size,
        }
    }

    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.experiment.clone(), self.lineage.clone())
    }

    pub fn belongs_to(&self, key: &SeriesKey) -> bool {
        self.experiment == key.experiment && self.lineage == key.lineage
    }

    /// Canonical record using the primary column names.
    pub fn to_record(&self) -> RawRecord {
        RawRecord::new()
            .with("experiment", self.experiment.as_str())
            .with("lineage", self.lineage.as_str())
            .with("cell", self.cell.as_str())
            .with("time_units", self.time.to_string())
            .with("size", self.size.to_string())
    }
}

/// Identifies one selectable set of trajectories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub experiment: String,
    pub lineage: String,
}

impl SeriesKey {
    pub fn new(experiment: impl Into<String>, lineage: impl Into<String>) -> Self {
        Self {
            experiment: experiment.into(),
            lineage: lineage.into(),
        }
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | lineage {}", self.experiment, self.lineage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lookup_is_exact_and_first_wins() {
        let record = RawRecord::new()
            .with("size", "1")
            .with("Size", "2")
            .with("size", "3");
        assert_eq!(record.get("size"), Some("1"));
        assert_eq!(record.get("Size"), Some("2"));
        assert_eq!(record.get("SIZE"), None);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn log_size_only_for_positive_sizes() {
        let p = TrajectoryPoint::new("A", "1", "1", 0.0, std::f64::consts::E);
        assert!((p.log_size - 1.0).abs() < 1e-12);
        let zero = TrajectoryPoint::new("A", "1", "1", 0.0, 0.0);
        assert!(zero.log_size.is_nan());
    }

    #[test]
    fn series_key_display() {
        assert_eq!(SeriesKey::new("exp", "3").to_string(), "exp | lineage 3");
    }
}
