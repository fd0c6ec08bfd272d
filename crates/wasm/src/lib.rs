use std::fmt::Display;

use serde::Serialize;
use sizeview_core::loader::FetchError;
use sizeview_core::mapper::Axis;
use sizeview_core::model::StatAxis;
use sizeview_core::stats::summary_domain;
use sizeview_core::viewport::Edge;
use sizeview_core::{LoadSummary, LoadTicket, Session, SessionError, ViewerConfig};
use wasm_bindgen::prelude::*;

fn js_error(err: impl Display) -> JsError {
    JsError::new(&err.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(js_error)
}

/// Result of a load as seen by the page. Fetch, parse and empty-dataset
/// failures are reported here rather than thrown; the session keeps its
/// previous dataset and `status` says what went wrong.
#[derive(Debug, Serialize)]
struct LoadOutcome<'a> {
    ok: bool,
    status: &'a str,
    summary: Option<LoadSummary>,
}

fn parse_axis(axis: &str) -> Result<Axis, JsError> {
    match axis {
        "x" | "time" => Ok(Axis::X),
        "y" | "size" => Ok(Axis::Y),
        _ => Err(JsError::new(&format!("unknown axis: {axis}"))),
    }
}

fn parse_edge(edge: &str) -> Result<Edge, JsError> {
    match edge {
        "left" => Ok(Edge::Left),
        "right" => Ok(Edge::Right),
        _ => Err(JsError::new(&format!("unknown edge: {edge}"))),
    }
}

/// One viewer instance. The page fetches dataset text itself and hands it
/// over with `begin_load`/`finish_load`; everything else is synchronous.
#[wasm_bindgen]
pub struct ViewerHandle {
    session: Session,
}

#[wasm_bindgen]
impl ViewerHandle {
    /// Create a viewer, optionally overriding defaults with a JSON config.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ViewerHandle, JsError> {
        let config = match config_json.as_deref() {
            Some(text) => ViewerConfig::from_json(text).map_err(js_error)?,
            None => ViewerConfig::default(),
        };
        Ok(Self {
            session: Session::new(config),
        })
    }

    /// Load already-fetched text in one step. Returns a JSON object with
    /// `ok`, `status` and, on success, `summary`.
    pub fn load_text(&mut self, path: &str, text: &str) -> Result<String, JsError> {
        let ticket = self.session.begin_load(path);
        let result = self.session.finish_load(ticket, Ok(text.to_string()));
        self.load_outcome(result)
    }

    /// Start a load and return its token. Only the newest token can finish.
    pub fn begin_load(&mut self, path: &str) -> u64 {
        self.session.begin_load(path).token
    }

    /// Complete a load with the fetched text. Throws only for a stale token.
    pub fn finish_load(&mut self, token: u64, text: &str) -> Result<String, JsError> {
        let result = self
            .session
            .finish_load(LoadTicket { token }, Ok(text.to_string()));
        self.load_outcome(result)
    }

    /// Report a failed fetch. `status` is the HTTP status, or 0 for a
    /// network-level failure described by `message`. Throws only for a
    /// stale token.
    pub fn fail_load(
        &mut self,
        token: u64,
        status: u16,
        message: &str,
    ) -> Result<String, JsError> {
        let err = if status == 0 {
            FetchError::Network(message.to_string())
        } else {
            FetchError::from_status(status)
        };
        let result = self.session.finish_load(LoadTicket { token }, Err(err));
        self.load_outcome(result)
    }

    /// Distinct experiment names, sorted, as a JSON array.
    pub fn experiments_json(&self) -> Result<String, JsError> {
        to_json(&self.session.experiments())
    }

    pub fn select_series(&mut self, index: usize) -> Result<(), JsError> {
        self.session.select_series(index).map_err(js_error)
    }

    pub fn zoom(&mut self, factor: f64) -> bool {
        self.session.zoom(factor)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.session.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.session.zoom_out()
    }

    pub fn scroll(&mut self, delta_x: f64, delta_y: f64, shift: bool) -> bool {
        self.session.scroll(delta_x, delta_y, shift)
    }

    pub fn pan(&mut self, delta_px: f64) -> bool {
        self.session.pan(delta_px)
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.session.reset_zoom()
    }

    pub fn set_viewport(&mut self, min: f64, max: f64) -> bool {
        self.session.set_viewport(min, max)
    }

    /// Drag the `"left"` or `"right"` window edge to pixel `x_px`.
    pub fn drag_edge(&mut self, edge: &str, x_px: f64) -> Result<bool, JsError> {
        Ok(self.session.drag_edge(parse_edge(edge)?, x_px))
    }

    pub fn ticks(&self, axis: &str) -> Result<Vec<f64>, JsError> {
        Ok(self.session.ticks(parse_axis(axis)?))
    }

    pub fn to_pixel(&self, value: f64, axis: &str) -> Result<Option<f64>, JsError> {
        Ok(self.session.to_pixel(value, parse_axis(axis)?))
    }

    pub fn to_value(&self, pixel: f64, axis: &str) -> Result<Option<f64>, JsError> {
        Ok(self.session.to_value(pixel, parse_axis(axis)?))
    }

    pub fn series_json(&self) -> Result<String, JsError> {
        to_json(self.session.series())
    }

    pub fn selected(&self) -> Option<usize> {
        self.session.selected()
    }

    pub fn viewport_json(&self) -> Result<String, JsError> {
        to_json(&self.session.viewport_state())
    }

    pub fn visible_series_json(&self) -> Result<String, JsError> {
        to_json(&self.session.visible_series())
    }

    pub fn cell_summaries_json(&self) -> Result<String, JsError> {
        let report = self.session.cell_summaries().map_err(js_error)?;
        to_json(&report)
    }

    /// Padded extent of `"tau"`, `"phi"` or `"lambda"` over the selected
    /// experiment's cells.
    pub fn summary_domain_json(&self, axis: &str) -> Result<String, JsError> {
        let axis: StatAxis = axis.parse().map_err(js_error)?;
        let report = self.session.cell_summaries().map_err(js_error)?;
        to_json(&summary_domain(&report.summaries, axis))
    }

    /// Axis title for `"tau"`, `"phi"` or `"lambda"`.
    pub fn stat_label(&self, axis: &str) -> Result<String, JsError> {
        let axis: StatAxis = axis.parse().map_err(js_error)?;
        Ok(axis.label().to_string())
    }

    pub fn render_json(&self) -> Result<String, JsError> {
        to_json(&self.session.render())
    }

    pub fn status_message(&self) -> String {
        self.session.status_message().to_string()
    }

    pub fn zoom_info(&self) -> Option<String> {
        self.session.zoom_info()
    }

    pub fn config_json(&self) -> Result<String, JsError> {
        to_json(self.session.config())
    }
}

impl ViewerHandle {
    fn load_outcome(
        &self,
        result: Result<LoadSummary, SessionError>,
    ) -> Result<String, JsError> {
        let summary = match result {
            Ok(summary) => Some(summary),
            Err(SessionError::Fetch(_) | SessionError::Csv(_) | SessionError::Normalize(_)) => {
                None
            }
            Err(err) => return Err(js_error(err)),
        };
        to_json(&LoadOutcome {
            ok: summary.is_some(),
            status: self.session.status_message(),
            summary,
        })
    }
}
