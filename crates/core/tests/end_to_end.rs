//! Load fixture datasets through a `Session` and check selection, viewport
//! behaviour, statistics and rendering together.

use sizeview_core::mapper::Axis;
use sizeview_core::model::SeriesKey;
use sizeview_core::viewport::Edge;
use sizeview_core::{FetchError, Session, SessionError, ViewerConfig};
use sizeview_protocol::RenderCommand;

const TWO_LINEAGES: &str = include_str!("fixtures/two_lineages.csv");
const CRLF_ALIASES: &str = include_str!("fixtures/crlf_aliases.csv");

fn load(text: &str, path: &str) -> Session {
    let mut session = Session::new(ViewerConfig::default());
    let ticket = session.begin_load(path);
    session.finish_load(ticket, Ok(text.to_string())).unwrap();
    session
}

#[test]
fn minimal_dataset_round_trip() {
    let csv = "experiment,lineage,cell,time_units,size\nA,1,1,0,10\nA,1,1,5,20\n";
    let mut session = load(csv, "minimal.csv");

    assert_eq!(session.points().len(), 2);
    assert_eq!(session.series().len(), 1);
    assert_eq!(session.series()[0].key, SeriesKey::new("A", "1"));
    assert_eq!(session.series()[0].cell_count, 1);

    let state = session.viewport_state().unwrap();
    assert!((state.base_x.min + 0.25).abs() < 1e-12);
    assert!((state.base_x.max - 5.25).abs() < 1e-12);

    assert!(session.zoom_out());
    assert!(session.reset_zoom());
    assert_eq!(session.viewport_state().unwrap().x, state.base_x);

    let report = session.cell_summaries().unwrap();
    assert_eq!(report.summaries.len(), 1);
    let s = &report.summaries[0];
    assert!((s.tau - 5.0).abs() < 1e-12);
    assert!((s.phi - 0.693_147).abs() < 1e-6);
    assert!((s.lambda.unwrap() - 0.138_629).abs() < 1e-6);
}

#[test]
fn fixture_series_are_ordered_and_filtered() {
    let session = load(TWO_LINEAGES, "two_lineages.csv");

    // one blank line skipped, two rows without a usable size rejected
    assert_eq!(session.points().len(), 11);
    assert_eq!(
        session.status_message(),
        "Loaded 11 data points (2 invalid rows filtered out)"
    );

    let keys: Vec<String> = session.series().iter().map(|e| e.key.to_string()).collect();
    assert_eq!(
        keys,
        vec![
            "acetate | lineage 1",
            "glucose | lineage 2",
            "glucose | lineage 10",
        ]
    );
}

#[test]
fn statistics_span_all_lineages_of_experiment() {
    let mut session = load(TWO_LINEAGES, "two_lineages.csv");
    session.select_series(1).unwrap();
    let report = session.cell_summaries().unwrap();
    let cells: Vec<(&str, &str)> = report
        .summaries
        .iter()
        .map(|s| (s.lineage.as_str(), s.cell.as_str()))
        .collect();
    assert_eq!(cells, vec![("10", "1"), ("2", "1"), ("2", "2")]);
    assert_eq!(report.skipped, 0);
}

#[test]
fn header_aliases_and_crlf() {
    let session = load(CRLF_ALIASES, "crlf.csv");
    assert_eq!(session.points().len(), 6);
    assert_eq!(session.series()[0].key, SeriesKey::new("B", "1"));
    assert_eq!(session.series()[0].cell_count, 3);

    let report = session.cell_summaries().unwrap();
    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.skipped, 1);
}

#[test]
fn window_controls_stay_inside_base_extent() {
    let mut session = load(TWO_LINEAGES, "two_lineages.csv");
    session.select_series(1).unwrap();
    let base = session.viewport_state().unwrap().base_x;

    assert!(session.set_viewport(-100.0, 20.0));
    let x = session.viewport_state().unwrap().x;
    assert_eq!(x.min, base.min);
    assert!((x.max - 20.0).abs() < 1e-9);

    let right_px = session.to_pixel(base.max + 50.0, Axis::X).unwrap();
    assert!(session.drag_edge(Edge::Right, right_px));
    assert_eq!(session.viewport_state().unwrap().x.max, base.max);

    assert!(session.zoom(0.5));
    for _ in 0..20 {
        session.pan(-400.0);
    }
    let x = session.viewport_state().unwrap().x;
    assert_eq!(x.min, base.min);
    assert!((x.span() - base.span() * 0.5).abs() < 1e-9);
}

#[test]
fn zoomed_render_only_draws_cells_in_window() {
    let mut session = load(TWO_LINEAGES, "two_lineages.csv");
    session.select_series(1).unwrap();
    assert!(session.set_viewport(0.0, 30.0));

    let visible = session.visible_series().unwrap();
    let cells: Vec<&str> = visible.cells.iter().map(|c| c.cell.as_str()).collect();
    assert_eq!(cells, vec!["1", "2"]);
    assert_eq!(visible.cells[1].points.len(), 1);

    let polylines = session
        .render()
        .into_iter()
        .filter(|c| matches!(c, RenderCommand::DrawPolyline { .. }))
        .count();
    assert_eq!(polylines, 1);
}

#[test]
fn failed_and_stale_loads_keep_current_dataset() {
    let mut session = load(TWO_LINEAGES, "two_lineages.csv");
    session.select_series(2).unwrap();
    let before = session.viewport_state();

    let stale = session.begin_load("slow.csv");
    let current = session.begin_load("missing.csv");
    let err = session
        .finish_load(current, Err(FetchError::from_status(503)))
        .unwrap_err();
    assert!(matches!(err, SessionError::Fetch(_)));

    let err = session
        .finish_load(stale, Ok(CRLF_ALIASES.to_string()))
        .unwrap_err();
    assert!(matches!(err, SessionError::StaleLoad { .. }));

    assert_eq!(session.dataset_path(), Some("two_lineages.csv"));
    assert_eq!(session.selected(), Some(2));
    assert_eq!(session.viewport_state(), before);
}

#[test]
fn empty_dataset_keeps_current_dataset() {
    let mut session = load(TWO_LINEAGES, "two_lineages.csv");
    session.select_series(1).unwrap();
    assert!(session.set_viewport(0.0, 30.0));
    let before = session.viewport_state();

    let ticket = session.begin_load("empty.csv");
    let err = session
        .finish_load(ticket, Ok("time,size\nx,1\n".to_string()))
        .unwrap_err();
    assert!(matches!(err, SessionError::Normalize(_)));

    assert_eq!(session.dataset_path(), Some("two_lineages.csv"));
    assert_eq!(session.selected(), Some(1));
    assert_eq!(session.viewport_state(), before);
    assert_eq!(session.points().len(), 11);
    assert!(session.status_message().starts_with("Failed to load dataset"));
}

#[test]
fn large_identical_times_still_map_to_pixels() {
    let session = load("time,size\n1e17,1\n1e17,2\n", "flat.csv");
    let state = session.viewport_state().unwrap();
    assert!(state.base_x.span() > 0.0);
    let px = session.to_pixel(1e17, Axis::X).unwrap();
    assert!(px.is_finite());
    let (left, right) = session.config().plot.x_range();
    assert!(px > left && px < right);
}
