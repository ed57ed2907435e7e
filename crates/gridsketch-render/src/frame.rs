//! Projection of editor state into screen-space draw commands.

use crate::renderer::RenderContext;
use gridsketch_core::snap::{FINE_SUBDIVISIONS, GRID_SIZE, GridMode};
use gridsketch_core::{Camera, DragSession, EditorState, SnapKind};
use kurbo::{Point, Vec2};

/// Minor grid lines closer than this on screen are not drawn.
const MIN_MINOR_SPACING_PX: f64 = 4.0;
/// Offset of a label below a near-horizontal segment.
const LABEL_OFFSET_BELOW: f64 = 15.0;
/// Offset of a label beside a near-vertical segment.
const LABEL_OFFSET_SIDE: f64 = 10.0;
pub const SNAP_INDICATOR_RADIUS: f64 = 5.0;
pub const ENDPOINT_MARKER_RADIUS: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Default,
    Selected,
    Hovered,
}

/// Where a label sits relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAnchor {
    Below,
    Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapStyle {
    /// Drawing, snapped to the grid.
    Grid,
    /// Drawing, snapped to an endpoint.
    Endpoint,
    /// Update mode, nothing under the pointer.
    Update,
    /// Update mode over a line, or dragging.
    Hover,
}

/// One primitive for the render sink. All coordinates are screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    GridLine { from: Point, to: Point, major: bool },
    Segment { from: Point, to: Point, role: SegmentRole },
    Label { position: Point, text: String, anchor: LabelAnchor },
    Preview { from: Point, to: Point },
    SnapIndicator { center: Point, radius: f64, style: SnapStyle },
    /// The endpoint armed for relocation.
    EndpointMarker { center: Point, radius: f64 },
}

/// Build the frame for `ctx`. Pure: the same context always yields the same
/// commands.
pub fn build_frame(ctx: &RenderContext) -> Vec<DrawCommand> {
    let state = ctx.state;
    let camera = &state.view.camera;
    let interaction = &state.interaction;
    let mut commands = vec![DrawCommand::Clear];

    if state.view.show_grid {
        push_grid(&mut commands, camera, ctx.viewport_size.width, ctx.viewport_size.height, state.view.grid_mode);
    }

    for (index, line) in state.lines.iter().enumerate() {
        let role = if interaction.selected_line == Some(index) {
            SegmentRole::Selected
        } else if interaction.hovered_line == Some(line.id) {
            SegmentRole::Hovered
        } else {
            SegmentRole::Default
        };
        commands.push(DrawCommand::Segment {
            from: camera.world_to_screen(line.start),
            to: camera.world_to_screen(line.end),
            role,
        });
    }

    if state.view.show_labels {
        for line in state.lines.iter() {
            commands.push(length_label(camera, line.start, line.end, line.length_mm()));
        }
    }

    if let Some((from, to)) = preview_segment(state) {
        commands.push(DrawCommand::Preview {
            from: camera.world_to_screen(from),
            to: camera.world_to_screen(to),
        });
        if state.view.show_labels {
            let length = interaction.live_length_mm.unwrap_or(0);
            commands.push(length_label(camera, from, to, length));
        }
    }

    if let Some(center) = interaction
        .relocate
        .and_then(|target| state.lines.endpoint(target))
    {
        commands.push(DrawCommand::EndpointMarker {
            center: camera.world_to_screen(center),
            radius: ENDPOINT_MARKER_RADIUS,
        });
    }

    if let Some(snap) = interaction.snap {
        commands.push(DrawCommand::SnapIndicator {
            center: camera.world_to_screen(snap.point),
            radius: SNAP_INDICATOR_RADIUS,
            style: snap_style(state, snap.kind),
        });
    }

    commands
}

/// The segment from the pending start to the cursor while drawing.
fn preview_segment(state: &EditorState) -> Option<(Point, Point)> {
    if state.interaction.update_mode {
        return None;
    }
    let start = state.interaction.pending_start?;
    let end = state.interaction.snap?.point;
    Some((start, end))
}

fn snap_style(state: &EditorState, kind: SnapKind) -> SnapStyle {
    let interaction = &state.interaction;
    if interaction.update_mode {
        let busy = interaction.hovered_line.is_some()
            || interaction.drag != DragSession::Idle;
        if busy { SnapStyle::Hover } else { SnapStyle::Update }
    } else if kind == SnapKind::Endpoint {
        SnapStyle::Endpoint
    } else {
        SnapStyle::Grid
    }
}

fn length_label(camera: &Camera, start: Point, end: Point, length_mm: i64) -> DrawCommand {
    let from = camera.world_to_screen(start);
    let to = camera.world_to_screen(end);
    let mid = from.midpoint(to);
    let d = to - from;
    let (anchor, offset) = if d.x.abs() >= d.y.abs() {
        (LabelAnchor::Below, Vec2::new(0.0, LABEL_OFFSET_BELOW))
    } else {
        (LabelAnchor::Side, Vec2::new(LABEL_OFFSET_SIDE, 0.0))
    };
    DrawCommand::Label {
        position: mid + offset,
        text: format!("{} mm", length_mm),
        anchor,
    }
}

fn push_grid(commands: &mut Vec<DrawCommand>, camera: &Camera, width: f64, height: f64, mode: GridMode) {
    let top_left = camera.screen_to_world(Point::ZERO);
    let bottom_right = camera.screen_to_world(Point::new(width, height));

    let fine = mode == GridMode::Fine && GridMode::Fine.size() * camera.zoom >= MIN_MINOR_SPACING_PX;
    let (step, per_major) = if fine {
        (GridMode::Fine.size(), FINE_SUBDIVISIONS as i64)
    } else {
        (GRID_SIZE, 1)
    };

    let first_x = (top_left.x / step).floor() as i64;
    let last_x = (bottom_right.x / step).ceil() as i64;
    let first_y = (top_left.y / step).floor() as i64;
    let last_y = (bottom_right.y / step).ceil() as i64;

    for k in first_x..=last_x {
        let x = camera.world_to_screen(Point::new(k as f64 * step, 0.0)).x;
        commands.push(DrawCommand::GridLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
            major: k.rem_euclid(per_major) == 0,
        });
    }
    for k in first_y..=last_y {
        let y = camera.world_to_screen(Point::new(0.0, k as f64 * step)).y;
        commands.push(DrawCommand::GridLine {
            from: Point::new(0.0, y),
            to: Point::new(width, y),
            major: k.rem_euclid(per_major) == 0,
        });
    }
}
