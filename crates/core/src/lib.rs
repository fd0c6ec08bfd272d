//! Size-trajectory viewer engine: dataset ingestion, series selection,
//! a zoomable time viewport, per-cell statistics and render commands.

pub mod config;
pub mod domain;
pub mod loader;
pub mod mapper;
pub mod model;
pub mod normalize;
pub mod parsers;
pub mod series;
pub mod session;
pub mod stats;
pub mod viewport;
pub mod views;

pub use config::{ConfigError, ViewerConfig};
pub use loader::{DatasetLoader, FetchError, FsLoader};
pub use session::{LoadSummary, LoadTicket, Session, SessionError, VisibleSeries};
