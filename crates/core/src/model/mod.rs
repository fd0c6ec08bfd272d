pub mod point;
pub mod summary;

pub use point::{RawRecord, SeriesKey, TrajectoryPoint};
pub use summary::{CellSummary, StatAxis, UnknownStatAxis};
