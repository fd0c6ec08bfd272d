use sizeview_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::config::ViewerConfig;
use crate::mapper::{Axis, axis_to_pixel, format_tick, make_ticks};
use crate::session::VisibleSeries;

const TICK_LENGTH: f64 = 5.0;
const TICK_FONT_SIZE: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const TITLE_FONT_SIZE: f64 = 11.0;
const LINE_WIDTH: f64 = 1.5;

/// Render the size-over-time chart for the visible part of one series.
///
/// Output order: plot background, series title, axes with ticks and labels,
/// then one clipped polyline per cell that has at least two visible points. Cell
/// colours cycle through the series palette in cell order.
pub fn render_trajectories(
    visible: &VisibleSeries,
    config: &ViewerConfig,
) -> Vec<RenderCommand> {
    let area = &config.plot;
    let inner = area.inner_rect();
    let state = &visible.state;
    let mut commands = Vec::with_capacity(visible.cells.len() * 3 + 4 * config.tick_count + 8);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, area.width, area.height),
        color: ThemeToken::Background,
        border_color: None,
    });
    commands.push(RenderCommand::DrawRect {
        rect: inner,
        color: ThemeToken::PlotBackground,
        border_color: Some(ThemeToken::Border),
    });

    let bottom = inner.y + inner.h;
    let left = inner.x;

    commands.push(RenderCommand::DrawText {
        position: Point::new(left, (inner.y - 6.0).max(TITLE_FONT_SIZE)),
        text: visible.key.to_string(),
        color: ThemeToken::TextPrimary,
        font_size: TITLE_FONT_SIZE,
        align: TextAlign::Left,
        rotation: 0.0,
    });

    // Axes
    commands.push(RenderCommand::DrawLine {
        from: Point::new(left, bottom),
        to: Point::new(left + inner.w, bottom),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });
    commands.push(RenderCommand::DrawLine {
        from: Point::new(left, inner.y),
        to: Point::new(left, bottom),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });

    for t in make_ticks(state.x, config.tick_count) {
        let x = axis_to_pixel(t, Axis::X, state, area);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, bottom),
            to: Point::new(x, bottom + TICK_LENGTH),
            color: ThemeToken::TickMark,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, bottom + TICK_LENGTH + TICK_FONT_SIZE + 2.0),
            text: format_tick(t),
            color: ThemeToken::TickLabel,
            font_size: TICK_FONT_SIZE,
            align: TextAlign::Center,
            rotation: 0.0,
        });
    }

    for v in make_ticks(state.y, config.tick_count) {
        let y = axis_to_pixel(v, Axis::Y, state, area);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(left - TICK_LENGTH, y),
            to: Point::new(left, y),
            color: ThemeToken::TickMark,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(left - TICK_LENGTH - 3.0, y + TICK_FONT_SIZE / 3.0),
            text: format_tick(v),
            color: ThemeToken::TickLabel,
            font_size: TICK_FONT_SIZE,
            align: TextAlign::Right,
            rotation: 0.0,
        });
    }

    commands.push(RenderCommand::DrawText {
        position: Point::new(left + inner.w / 2.0, area.height - 6.0),
        text: config.time_label.clone(),
        color: ThemeToken::AxisLabel,
        font_size: LABEL_FONT_SIZE,
        align: TextAlign::Center,
        rotation: 0.0,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(LABEL_FONT_SIZE + 2.0, inner.y + inner.h / 2.0),
        text: config.size_label.clone(),
        color: ThemeToken::AxisLabel,
        font_size: LABEL_FONT_SIZE,
        align: TextAlign::Center,
        rotation: -90.0,
    });

    commands.push(RenderCommand::SetClip { rect: inner });
    for (i, track) in visible.cells.iter().enumerate() {
        if track.points.len() < 2 {
            continue;
        }
        let points = track
            .points
            .iter()
            .map(|p| {
                Point::new(
                    axis_to_pixel(p.time, Axis::X, state, area),
                    axis_to_pixel(p.size, Axis::Y, state, area),
                )
            })
            .collect();
        commands.push(RenderCommand::BeginGroup {
            id: format!("cell-{}", track.cell),
            label: Some(format!("Cell {}", track.cell)),
        });
        commands.push(RenderCommand::DrawPolyline {
            points,
            color: ThemeToken::series_palette(i),
            width: LINE_WIDTH,
        });
        commands.push(RenderCommand::EndGroup);
    }
    commands.push(RenderCommand::ClearClip);

    commands
}
