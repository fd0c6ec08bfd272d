use serde::{Deserialize, Serialize};
use sizeview_protocol::RenderCommand;
use thiserror::Error;

use crate::config::ViewerConfig;
use crate::loader::{DatasetLoader, FetchError};
use crate::mapper::{self, Axis, format_tick};
use crate::model::{SeriesKey, TrajectoryPoint};
use crate::normalize::{NormalizeError, normalize_records};
use crate::parsers::csv_table::{CsvParseError, parse_csv};
use crate::series::{self, CellTrack, SeriesEntry, group_cells, group_series, series_points};
use crate::stats::{StatsReport, derive_cell_summaries};
use crate::viewport::{Edge, Viewport, ViewportState};
use crate::views::trajectory::render_trajectories;

const IDLE_STATUS: &str = "Select a dataset to begin visualization";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to parse dataset: {0}")]
    Csv(#[from] CsvParseError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("load {ticket} was superseded by load {current}")]
    StaleLoad { ticket: u64, current: u64 },
    #[error("no series at index {index} ({count} available)")]
    NoSuchSeries { index: usize, count: usize },
    #[error("no series selected")]
    NoSelection,
}

/// Handle for one in-flight dataset load. Only the most recently issued
/// ticket can complete; results for older tickets are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTicket {
    pub token: u64,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub path: String,
    pub points: usize,
    /// Rows dropped for missing or invalid time/size, plus unreadable rows.
    pub rejected: usize,
    pub series: usize,
}

/// What the renderer needs to draw the selected series right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleSeries {
    pub key: SeriesKey,
    pub state: ViewportState,
    /// Points in the whole series, visible or not.
    pub total_points: usize,
    /// Cells with at least one point inside the X window, each reduced to
    /// its visible points in time order.
    pub cells: Vec<CellTrack>,
}

#[derive(Debug, Clone)]
struct Dataset {
    path: String,
    points: Vec<TrajectoryPoint>,
    series: Vec<SeriesEntry>,
}

/// All mutable state of one viewer, from the loaded dataset down to the
/// status line.
///
/// Every load or selection replaces the relevant state in one assignment, so
/// a renderer never observes a half-updated session. Failed operations leave
/// the previous state in place and only update the status message.
#[derive(Debug, Clone)]
pub struct Session {
    config: ViewerConfig,
    dataset: Option<Dataset>,
    selected: Option<usize>,
    viewport: Option<Viewport>,
    status: String,
    last_token: u64,
    pending: Option<(u64, String)>,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            dataset: None,
            selected: None,
            viewport: None,
            status: IDLE_STATUS.to_string(),
            last_token: 0,
            pending: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    // --- Loading ---

    /// Fetch, parse and install a dataset in one step.
    pub fn load_series(
        &mut self,
        loader: &impl DatasetLoader,
        path: &str,
    ) -> Result<LoadSummary, SessionError> {
        let ticket = self.begin_load(path);
        let result = loader.load(path);
        self.finish_load(ticket, result)
    }

    /// Start an asynchronous load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self, path: &str) -> LoadTicket {
        self.last_token += 1;
        let token = self.last_token;
        if let Some((old, old_path)) = self.pending.replace((token, path.to_string())) {
            log::debug!("load {old} of {old_path} superseded by load {token}");
        }
        log::debug!("load {token}: fetching {path}");
        self.status = format!("Loading {path}...");
        LoadTicket { token }
    }

    /// Complete a load started with [`begin_load`](Self::begin_load).
    ///
    /// On success the whole dataset is replaced and the first series is
    /// selected. On failure the previous dataset stays active.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, FetchError>,
    ) -> Result<LoadSummary, SessionError> {
        let path = match self.pending.take() {
            Some((token, path)) if token == ticket.token => path,
            other => {
                let current = other.as_ref().map_or(self.last_token, |(token, _)| *token);
                self.pending = other;
                log::debug!("discarding stale load {} (current {current})", ticket.token);
                return Err(SessionError::StaleLoad {
                    ticket: ticket.token,
                    current,
                });
            }
        };

        let outcome = result
            .map_err(SessionError::from)
            .and_then(|text| self.install(&path, &text));
        if let Err(err) = &outcome {
            log::error!("loading {path} failed: {err}");
            self.status = format!("Failed to load dataset: {err}");
        }
        outcome
    }

    fn install(&mut self, path: &str, text: &str) -> Result<LoadSummary, SessionError> {
        let table = parse_csv(text)?;
        let report = normalize_records(&table.records)?;
        let rejected = report.rejected + table.unreadable;
        let series = group_series(&report.points);
        let viewport = series
            .first()
            .map(|entry| Viewport::select(series_points(&report.points, &entry.key)));
        let summary = LoadSummary {
            path: path.to_string(),
            points: report.points.len(),
            rejected,
            series: series.len(),
        };

        self.selected = viewport.as_ref().map(|_| 0);
        self.viewport = viewport;
        self.dataset = Some(Dataset {
            path: path.to_string(),
            points: report.points,
            series,
        });

        if rejected > 0 {
            log::warn!("{path}: dropped {rejected} rows without a valid time and size");
        }
        log::info!(
            "{path}: loaded {} points in {} series",
            summary.points,
            summary.series
        );
        self.status = format!(
            "Loaded {} data points ({} invalid rows filtered out)",
            summary.points, summary.rejected
        );
        Ok(summary)
    }

    /// Path of the currently installed dataset.
    pub fn dataset_path(&self) -> Option<&str> {
        self.dataset.as_ref().map(|d| d.path.as_str())
    }

    /// All normalized points of the current dataset.
    pub fn points(&self) -> &[TrajectoryPoint] {
        self.dataset.as_ref().map_or(&[], |d| d.points.as_slice())
    }

    // --- Selection ---

    /// Selectable series in display order.
    pub fn series(&self) -> &[SeriesEntry] {
        self.dataset.as_ref().map_or(&[], |d| d.series.as_slice())
    }

    /// Distinct experiment names of the current dataset, sorted.
    pub fn experiments(&self) -> Vec<String> {
        series::experiments(self.points())
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_key(&self) -> Option<&SeriesKey> {
        self.selected
            .and_then(|i| self.series().get(i))
            .map(|entry| &entry.key)
    }

    /// Select the `index`-th series and start a fresh viewport over it.
    pub fn select_series(&mut self, index: usize) -> Result<(), SessionError> {
        let Some(entry) = self.series().get(index) else {
            let err = SessionError::NoSuchSeries {
                index,
                count: self.series().len(),
            };
            self.status = err.to_string();
            return Err(err);
        };
        let key = entry.key.clone();
        let points = series_points(self.points(), &key);
        let count = points.len();

        self.viewport = Some(Viewport::select(points));
        self.selected = Some(index);
        self.status = format!("{key} | {count} points");
        Ok(())
    }

    // --- Viewport ---

    pub fn viewport_state(&self) -> Option<ViewportState> {
        self.viewport.as_ref().map(Viewport::state)
    }

    /// Scale the time window around its centre; `false` if nothing is
    /// selected or the zoom was rejected. A zoom-in stopped by the minimum
    /// window width is reported in the status message.
    pub fn zoom(&mut self, factor: f64) -> bool {
        let Some(vp) = self.viewport.as_mut() else {
            return false;
        };
        if vp.zoom(factor) {
            return true;
        }
        if factor.is_finite() && factor > 0.0 && factor < 1.0 {
            self.status = format!(
                "Zoom limit reached: the time window cannot be narrower than {}",
                format_tick(vp.min_span())
            );
        }
        false
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom(self.config.zoom_in_factor)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom(self.config.zoom_out_factor)
    }

    /// Shift the time window by a pixel delta on the configured plot.
    pub fn pan(&mut self, delta_px: f64) -> bool {
        let width = self.config.inner_width();
        self.viewport
            .as_mut()
            .is_some_and(|vp| vp.pan(delta_px, width))
    }

    /// Wheel gesture. Mostly-horizontal scrolls, or any scroll with shift
    /// held, pan; vertical scrolls zoom.
    pub fn scroll(&mut self, delta_x: f64, delta_y: f64, shift: bool) -> bool {
        let horizontal = delta_x.abs() > delta_y.abs();
        if horizontal || shift {
            return self.pan(if horizontal { delta_x } else { delta_y });
        }
        let factor = if delta_y < 0.0 {
            self.config.wheel_zoom_in
        } else {
            self.config.wheel_zoom_out
        };
        self.zoom(factor)
    }

    pub fn reset_zoom(&mut self) -> bool {
        match self.viewport.as_mut() {
            Some(vp) => {
                vp.reset();
                true
            }
            None => false,
        }
    }

    /// Set the time window directly (slider or brush).
    pub fn set_viewport(&mut self, min: f64, max: f64) -> bool {
        self.viewport
            .as_mut()
            .is_some_and(|vp| vp.set_window(min, max))
    }

    /// Move one window edge to the time under pixel `x_px`.
    pub fn drag_edge(&mut self, edge: Edge, x_px: f64) -> bool {
        let Some(value) = self.to_value(x_px, Axis::X) else {
            return false;
        };
        self.viewport
            .as_mut()
            .is_some_and(|vp| vp.drag_edge(edge, value))
    }

    pub fn zoom_info(&self) -> Option<String> {
        self.viewport.as_ref().map(Viewport::zoom_info)
    }

    // --- Coordinates ---

    pub fn ticks(&self, axis: Axis) -> Vec<f64> {
        let Some(state) = self.viewport_state() else {
            return Vec::new();
        };
        let domain = match axis {
            Axis::X => state.x,
            Axis::Y => state.y,
        };
        mapper::make_ticks(domain, self.config.tick_count)
    }

    pub fn to_pixel(&self, value: f64, axis: Axis) -> Option<f64> {
        let state = self.viewport_state()?;
        Some(mapper::axis_to_pixel(value, axis, &state, &self.config.plot))
    }

    pub fn to_value(&self, pixel: f64, axis: Axis) -> Option<f64> {
        let state = self.viewport_state()?;
        Some(mapper::axis_to_value(pixel, axis, &state, &self.config.plot))
    }

    // --- Derived views ---

    pub fn visible_series(&self) -> Option<VisibleSeries> {
        let viewport = self.viewport.as_ref()?;
        let key = self.selected_key()?.clone();
        let state = viewport.state();
        let cells = group_cells(viewport.points())
            .into_iter()
            .filter_map(|mut track| {
                track.points.retain(|p| state.x.contains(p.time));
                (!track.points.is_empty()).then_some(track)
            })
            .collect();
        Some(VisibleSeries {
            key,
            state,
            total_points: viewport.points().len(),
            cells,
        })
    }

    /// Per-cell statistics over every lineage of the selected experiment.
    pub fn cell_summaries(&self) -> Result<StatsReport, SessionError> {
        let key = self.selected_key().ok_or(SessionError::NoSelection)?;
        let points: Vec<TrajectoryPoint> = self
            .points()
            .iter()
            .filter(|p| p.experiment == key.experiment)
            .cloned()
            .collect();
        let report = derive_cell_summaries(&points);
        if report.skipped > 0 {
            log::warn!(
                "{}: skipped {} cells with fewer than two points",
                key.experiment,
                report.skipped
            );
        }
        Ok(report)
    }

    /// Render commands for the selected series; empty when nothing is selected.
    pub fn render(&self) -> Vec<RenderCommand> {
        match self.visible_series() {
            Some(visible) => render_trajectories(&visible, &self.config),
            None => Vec::new(),
        }
    }

    pub fn status_message(&self) -> &str {
        &self.status
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LINEAGES: &str = "experiment,lineage,cell,time,size\n\
        A,2,1,0,1\nA,2,1,1,2\nA,1,1,0,3\nA,1,1,1,4\nA,1,2,0,5\nA,1,2,1,6\n";

    fn loaded(text: &str) -> Session {
        let mut session = Session::default();
        let ticket = session.begin_load("data.csv");
        session
            .finish_load(ticket, Ok(text.to_string()))
            .unwrap();
        session
    }

    #[test]
    fn starts_idle() {
        let session = Session::default();
        assert_eq!(session.status_message(), IDLE_STATUS);
        assert!(session.series().is_empty());
        assert!(session.ticks(Axis::X).is_empty());
        assert_eq!(session.to_pixel(1.0, Axis::X), None);
        assert!(session.visible_series().is_none());
        assert!(session.render().is_empty());
    }

    #[test]
    fn load_selects_first_series() {
        let session = loaded(TWO_LINEAGES);
        assert_eq!(session.series().len(), 2);
        assert_eq!(session.selected(), Some(0));
        assert_eq!(session.selected_key(), Some(&SeriesKey::new("A", "1")));
        assert_eq!(
            session.status_message(),
            "Loaded 6 data points (0 invalid rows filtered out)"
        );
    }

    #[test]
    fn select_series_rebuilds_viewport() {
        let mut session = loaded(TWO_LINEAGES);
        assert!(session.zoom(2.0));
        session.select_series(1).unwrap();
        let state = session.viewport_state().unwrap();
        assert_eq!(state.x, state.base_x);
        assert_eq!(session.status_message(), "A | lineage 2 | 2 points");
    }

    #[test]
    fn unknown_series_keeps_selection() {
        let mut session = loaded(TWO_LINEAGES);
        let err = session.select_series(7).unwrap_err();
        assert!(matches!(err, SessionError::NoSuchSeries { index: 7, count: 2 }));
        assert_eq!(session.selected(), Some(0));
        assert!(session.viewport_state().is_some());
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut session = Session::default();
        let first = session.begin_load("slow.csv");
        let second = session.begin_load("fast.csv");
        session
            .finish_load(second, Ok("time,size\n0,1\n1,2\n".to_string()))
            .unwrap();
        let err = session
            .finish_load(first, Ok(TWO_LINEAGES.to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::StaleLoad { ticket: 1, current: 2 }));
        assert_eq!(session.dataset_path(), Some("fast.csv"));
        assert_eq!(session.points().len(), 2);
    }

    #[test]
    fn ticket_cannot_complete_twice() {
        let mut session = Session::default();
        let ticket = session.begin_load("a.csv");
        session
            .finish_load(ticket, Ok("time,size\n0,1\n".to_string()))
            .unwrap();
        assert!(matches!(
            session.finish_load(ticket, Ok(String::new())),
            Err(SessionError::StaleLoad { .. })
        ));
    }

    #[test]
    fn fetch_failure_keeps_previous_dataset() {
        let mut session = loaded(TWO_LINEAGES);
        let before = session.viewport_state();
        let ticket = session.begin_load("missing.csv");
        let err = session
            .finish_load(ticket, Err(FetchError::from_status(404)))
            .unwrap_err();
        assert!(matches!(err, SessionError::Fetch(_)));
        assert_eq!(session.dataset_path(), Some("data.csv"));
        assert_eq!(session.viewport_state(), before);
        assert_eq!(
            session.status_message(),
            "Failed to load dataset: dataset not found (HTTP 404)"
        );
    }

    #[test]
    fn empty_dataset_is_reported() {
        let mut session = Session::default();
        let ticket = session.begin_load("bad.csv");
        let err = session
            .finish_load(ticket, Ok("time,size\nx,1\n".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Normalize(NormalizeError::EmptyDataset { rejected: 1 })
        ));
        assert!(session.series().is_empty());
        assert!(session.status_message().starts_with("Failed to load dataset"));
    }

    #[test]
    fn load_series_uses_loader() {
        let mut session = Session::default();
        let loader = |path: &str| -> Result<String, FetchError> {
            assert_eq!(path, "x.csv");
            Ok("time,size\n0,1\n2,3\nbad,1\n".to_string())
        };
        let summary = session.load_series(&loader, "x.csv").unwrap();
        assert_eq!(summary.points, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.series, 1);
    }

    #[test]
    fn scroll_pans_or_zooms() {
        let mut session = loaded(
            "time,size\n0,1\n1,1\n2,1\n3,1\n4,1\n5,1\n6,1\n7,1\n8,1\n9,1\n10,1\n",
        );
        let base = session.viewport_state().unwrap().base_x;
        assert!(session.scroll(0.0, -1.0, false));
        let zoomed = session.viewport_state().unwrap().x;
        assert!((zoomed.span() - base.span() * 0.9).abs() < 1e-9);
        assert!(session.scroll(0.0, 10.0, true));
        let panned = session.viewport_state().unwrap().x;
        assert!(panned.min > zoomed.min);
        assert!(session.reset_zoom());
        assert_eq!(session.viewport_state().unwrap().x, base);
    }

    #[test]
    fn zoom_limit_is_reported() {
        let mut session = loaded("time,size\n0,10\n5,20\n");
        let before = session.viewport_state();
        assert!(!session.zoom_in());
        assert_eq!(session.viewport_state(), before);
        assert_eq!(
            session.status_message(),
            "Zoom limit reached: the time window cannot be narrower than 5.00"
        );
    }

    #[test]
    fn experiments_are_listed() {
        let session = loaded("experiment,time,size\nb.csv,0,1\na,0,1\nb,1,1\n");
        assert_eq!(session.experiments(), vec!["a", "b"]);
    }

    #[test]
    fn drag_edge_uses_inverse_mapping() {
        let mut session = loaded(
            "time,size\n0,1\n1,1\n2,1\n3,1\n4,1\n5,1\n6,1\n7,1\n8,1\n9,1\n10,1\n",
        );
        let px = session.to_pixel(4.0, Axis::X).unwrap();
        assert!(session.drag_edge(Edge::Left, px));
        let x = session.viewport_state().unwrap().x;
        assert!((x.min - 4.0).abs() < 1e-9);
    }

    #[test]
    fn visible_series_filters_to_window() {
        let mut session = loaded(
            "time,size,cell\n0,1,a\n1,1,a\n2,1,a\n8,1,b\n9,1,b\n10,1,b\n",
        );
        assert!(session.set_viewport(0.0, 3.0));
        let visible = session.visible_series().unwrap();
        assert_eq!(visible.total_points, 6);
        assert_eq!(visible.cells.len(), 1);
        assert_eq!(visible.cells[0].cell, "a");
        assert_eq!(visible.cells[0].points.len(), 3);
    }

    #[test]
    fn cell_summaries_cover_all_lineages_of_experiment() {
        let session = loaded(TWO_LINEAGES);
        let report = session.cell_summaries().unwrap();
        assert_eq!(report.summaries.len(), 3);
        assert_eq!(report.skipped, 0);
        assert!(matches!(
            Session::default().cell_summaries(),
            Err(SessionError::NoSelection)
        ));
    }
}
