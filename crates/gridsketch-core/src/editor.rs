//! Interaction state machine.
//!
//! [`EditorState::apply`] is a reducer: it consumes the current state and one
//! [`EditorEvent`] and returns the next state plus the [`Effects`] the shell
//! must carry out (persist, repaint). Nothing here touches a window, a file
//! or a clock beyond line id allocation.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::document::LineSet;
use crate::geometry::{length_in_millimeters, point_from_length_and_direction};
use crate::input::{EditorEvent, EditorKey};
use crate::line::{EndpointRef, Line, LineId};
use crate::query::{Exclude, find_endpoint_at, find_line_at_point};
use crate::snap::{GridMode, SnapResult, snap_point, snap_to_grid};
use kurbo::{Point, Vec2};

/// View settings. They change how the drawing is shown and how finely
/// points snap, never the lines themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub camera: Camera,
    pub show_grid: bool,
    pub grid_mode: GridMode,
    pub show_labels: bool,
    /// Physical pixels per logical pixel of the window.
    pub scale_factor: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl ViewState {
    /// Initial view from the configured start-up toggles.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            camera: Camera::default(),
            show_grid: config.show_grid,
            grid_mode: if config.fine_grid {
                GridMode::Fine
            } else {
                GridMode::Coarse
            },
            show_labels: config.show_labels,
            scale_factor: 1.0,
        }
    }
}

/// Drag session in progress. Endpoint and whole-line drags exclude each
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    /// Moving one endpoint.
    Endpoint { target: EndpointRef },
    /// Moving the line at `index`; `anchor` is the last snapped pointer
    /// position.
    Line { index: usize, anchor: Point },
}

/// Transient selection and drawing state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interaction {
    /// Update mode is engaged.
    pub update_mode: bool,
    /// The update modifier key is physically down.
    pub modifier_held: bool,
    /// First endpoint of a line under construction.
    pub pending_start: Option<Point>,
    /// Last computed snap target.
    pub snap: Option<SnapResult>,
    /// Endpoint armed by the secondary action, relocated by the next
    /// primary click.
    pub relocate: Option<EndpointRef>,
    /// Index of the selected line.
    pub selected_line: Option<usize>,
    /// Displayed length of the selected line.
    pub selected_length_mm: Option<i64>,
    /// Line under the pointer in update mode (highlight only).
    pub hovered_line: Option<LineId>,
    /// Length of the preview segment while drawing.
    pub live_length_mm: Option<i64>,
    pub drag: DragSession,
    /// The current press began in update mode; its click must not draw.
    pub press_in_update_mode: bool,
}

/// Coarse description of what the editor is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Drawing(Point),
    UpdateMode,
    DraggingEndpoint(EndpointRef),
    DraggingLine { index: usize, anchor: Point },
}

impl Phase {
    /// Short label for status display.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Draw",
            Phase::Drawing(_) => "Drawing",
            Phase::UpdateMode => "Update",
            Phase::DraggingEndpoint(_) => "Moving endpoint",
            Phase::DraggingLine { .. } => "Moving line",
        }
    }
}

/// What the shell has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effects {
    /// The line set changed and should be persisted.
    pub lines_changed: bool,
    /// The frame should be repainted.
    pub redraw: bool,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            lines_changed: false,
            redraw: true,
        }
    }

    pub fn changed(lines_changed: bool) -> Self {
        Self {
            lines_changed,
            redraw: true,
        }
    }
}

/// Complete editor state: the drawing, the interaction and the view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorState {
    pub lines: LineSet,
    pub interaction: Interaction,
    pub view: ViewState,
}

impl EditorState {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_lines(LineSet::new(), config)
    }

    /// Start from previously persisted lines.
    pub fn with_lines(lines: LineSet, config: &EditorConfig) -> Self {
        Self {
            lines,
            interaction: Interaction::default(),
            view: ViewState::from_config(config),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.interaction.drag {
            DragSession::Endpoint { target } => Phase::DraggingEndpoint(target),
            DragSession::Line { index, anchor } => Phase::DraggingLine { index, anchor },
            DragSession::Idle if self.interaction.update_mode => Phase::UpdateMode,
            DragSession::Idle => match self.interaction.pending_start {
                Some(start) => Phase::Drawing(start),
                None => Phase::Idle,
            },
        }
    }

    /// The selected line, if any.
    pub fn selected(&self) -> Option<&Line> {
        self.interaction
            .selected_line
            .and_then(|index| self.lines.get(index))
    }

    /// Apply one event.
    pub fn apply(mut self, event: &EditorEvent, config: &EditorConfig) -> (Self, Effects) {
        let effects = match event {
            EditorEvent::PointerDown { position } => self.on_pointer_down(*position, config),
            EditorEvent::PointerMove { position } => self.on_pointer_move(*position, config),
            EditorEvent::PointerUp { .. } => self.on_pointer_up(),
            EditorEvent::PrimaryClick { position } => self.on_primary_click(*position, config),
            EditorEvent::SecondaryClick { position } => self.on_secondary_click(*position, config),
            EditorEvent::Wheel { position, steps } => {
                let zoomed = self.view.camera.step_zoom_at(*position, *steps);
                if zoomed {
                    log::debug!("Zoom {:.1}", self.view.camera.zoom);
                }
                Effects::redraw().only_if(zoomed)
            }
            EditorEvent::Pan { delta } => {
                self.view.camera.pan(*delta);
                Effects::redraw()
            }
            EditorEvent::KeyDown(key) => self.on_key_down(*key),
            EditorEvent::KeyUp(key) => self.on_key_up(*key),
            EditorEvent::LengthEntered(text) => self.on_length_entered(text),
            EditorEvent::ToggleGrid => {
                self.view.show_grid = !self.view.show_grid;
                Effects::redraw()
            }
            EditorEvent::ToggleFineGrid => {
                self.view.grid_mode = self.view.grid_mode.toggled();
                Effects::redraw()
            }
            EditorEvent::ToggleLabels => {
                self.view.show_labels = !self.view.show_labels;
                Effects::redraw()
            }
            EditorEvent::ScaleFactorChanged(scale_factor)
                if scale_factor.is_finite() && *scale_factor > 0.0 =>
            {
                self.view.scale_factor = *scale_factor;
                Effects::redraw()
            }
            EditorEvent::ScaleFactorChanged(_) => Effects::none(),
            EditorEvent::ResetView => {
                self.view.camera.reset();
                Effects::redraw()
            }
            EditorEvent::Clear => {
                log::info!("Cleared {} lines", self.lines.len());
                self.lines.clear();
                self.reset_interaction();
                Effects::changed(true)
            }
            EditorEvent::ReplaceLines(lines) => {
                log::info!("Replacing drawing with {} lines", lines.len());
                self.lines.replace_all(lines.clone());
                self.reset_interaction();
                Effects::changed(true)
            }
        };
        (self, effects)
    }

    /// Snap and pick radius in world units. The configured radius is in
    /// logical pixels; pointer positions arrive in physical pixels.
    fn threshold(&self, config: &EditorConfig) -> f64 {
        self.view
            .camera
            .screen_to_world_len(config.snap_threshold_px * self.view.scale_factor)
    }

    fn snap_at(&self, world: Point, threshold: f64, exclude: Exclude) -> SnapResult {
        snap_point(
            world,
            &self.lines,
            self.interaction.pending_start,
            threshold,
            exclude,
            self.view.grid_mode,
        )
    }

    fn on_pointer_down(&mut self, position: Point, config: &EditorConfig) -> Effects {
        self.interaction.press_in_update_mode = self.interaction.update_mode;
        if !self.interaction.update_mode {
            return Effects::none();
        }
        let world = self.view.camera.screen_to_world(position);
        let threshold = self.threshold(config);

        if let Some(target) = find_endpoint_at(world, &self.lines, threshold, Exclude::Nothing) {
            log::debug!("Dragging {:?} of line {}", target.which, target.line_id);
            self.interaction.drag = DragSession::Endpoint { target };
            self.interaction.hovered_line = None;
            return Effects::redraw();
        }

        if let Some(hit) = find_line_at_point(world, &self.lines, threshold) {
            let anchor = self.snap_at(world, threshold, Exclude::Line(hit.id)).point;
            log::debug!("Selected line {} at index {}", hit.id, hit.index);
            self.interaction.selected_line = Some(hit.index);
            self.interaction.selected_length_mm = self.lines.get(hit.index).map(Line::length_mm);
            self.interaction.drag = DragSession::Line {
                index: hit.index,
                anchor,
            };
            return Effects::redraw();
        }

        // Empty canvas deselects
        let before = self.interaction;
        self.clear_selection();
        self.settle_mode();
        Effects::redraw().only_if(self.interaction != before)
    }

    fn on_pointer_move(&mut self, position: Point, config: &EditorConfig) -> Effects {
        let world = self.view.camera.screen_to_world(position);
        let threshold = self.threshold(config);

        let exclude = match self.interaction.drag {
            DragSession::Idle => Exclude::Nothing,
            DragSession::Endpoint { target } => Exclude::Endpoint(target),
            DragSession::Line { index, .. } => self
                .lines
                .get(index)
                .map(|line| Exclude::Line(line.id))
                .unwrap_or_default(),
        };
        let snap = self.snap_at(world, threshold, exclude);
        self.interaction.snap = Some(snap);

        let mut lines_changed = false;
        match self.interaction.drag {
            DragSession::Idle => {
                self.interaction.hovered_line = if self.interaction.update_mode {
                    find_line_at_point(world, &self.lines, threshold).map(|hit| hit.id)
                } else {
                    None
                };
                if !self.interaction.update_mode && self.interaction.pending_start.is_some() {
                    self.interaction.live_length_mm = Some(length_in_millimeters(
                        self.interaction.pending_start,
                        Some(snap.point),
                    ));
                }
            }
            DragSession::Endpoint { target } => {
                lines_changed = self.lines.set_endpoint(target, snap.point);
                let selected_id = self.selected().map(|line| line.id);
                if selected_id == Some(target.line_id) {
                    self.refresh_selected_length();
                }
            }
            DragSession::Line { index, anchor } => {
                let delta = snap.point - anchor;
                if delta != Vec2::ZERO {
                    if let Some(line) = self.lines.get(index).copied() {
                        let grid = self.view.grid_mode.size();
                        let shifted = line.translated(delta);
                        let moved = Line::new(
                            line.id,
                            snap_to_grid(shifted.start, grid),
                            snap_to_grid(shifted.end, grid),
                        );
                        lines_changed = moved != line && self.lines.replace(index, moved);
                    }
                    self.interaction.drag = DragSession::Line {
                        index,
                        anchor: snap.point,
                    };
                }
                self.refresh_selected_length();
            }
        }

        Effects::changed(lines_changed)
    }

    fn on_pointer_up(&mut self) -> Effects {
        self.interaction.drag = DragSession::Idle;

        let removed = self.lines.prune_zero_length();
        if removed > 0 {
            log::debug!("Pruned {} zero-length line(s)", removed);
            self.interaction.selected_line = None;
            self.interaction.selected_length_mm = None;
            self.interaction.hovered_line = None;
            if let Some(target) = self.interaction.relocate {
                if self.lines.get_by_id(target.line_id).is_none() {
                    self.interaction.relocate = None;
                }
            }
        }
        self.settle_mode();
        Effects::changed(removed > 0)
    }

    fn on_primary_click(&mut self, position: Point, config: &EditorConfig) -> Effects {
        let world = self.view.camera.screen_to_world(position);
        let threshold = self.threshold(config);
        let pressed_in_update = std::mem::take(&mut self.interaction.press_in_update_mode);

        if self.interaction.update_mode || pressed_in_update {
            let on_endpoint =
                find_endpoint_at(world, &self.lines, threshold, Exclude::Nothing).is_some();
            let on_line = find_line_at_point(world, &self.lines, threshold).is_some();
            if !on_endpoint && !on_line {
                self.clear_selection();
                self.settle_mode();
            }
            return Effects::redraw();
        }

        if let Some(target) = self.interaction.relocate.take() {
            let snap = self.snap_at(world, threshold, Exclude::Endpoint(target));
            let moved = self.lines.set_endpoint(target, snap.point);
            log::debug!("Relocated {:?} of line {}", target.which, target.line_id);
            self.interaction.pending_start = None;
            self.interaction.live_length_mm = None;
            return Effects::changed(moved);
        }

        let snap = self.snap_at(world, threshold, Exclude::Nothing);
        match self.interaction.pending_start {
            None => {
                self.interaction.pending_start = Some(snap.point);
                self.interaction.live_length_mm = Some(0);
                Effects::redraw()
            }
            Some(start) => {
                let id = self.lines.push_segment(start, snap.point);
                log::debug!("Added line {}", id);
                self.interaction.pending_start = None;
                self.interaction.live_length_mm = None;
                Effects::changed(true)
            }
        }
    }

    fn on_secondary_click(&mut self, position: Point, config: &EditorConfig) -> Effects {
        let world = self.view.camera.screen_to_world(position);
        match find_endpoint_at(world, &self.lines, self.threshold(config), Exclude::Nothing) {
            Some(target) => {
                log::debug!("Armed {:?} of line {} for relocation", target.which, target.line_id);
                self.interaction.relocate = Some(target);
                Effects::redraw()
            }
            None => Effects::none(),
        }
    }

    fn on_key_down(&mut self, key: EditorKey) -> Effects {
        match key {
            EditorKey::UpdateModifier => {
                self.interaction.modifier_held = true;
                if self.interaction.update_mode {
                    return Effects::none();
                }
                self.interaction.update_mode = true;
                Effects::redraw()
            }
            EditorKey::Cancel => {
                self.reset_interaction();
                Effects::redraw()
            }
            EditorKey::Delete => {
                if !self.interaction.update_mode {
                    return Effects::none();
                }
                let Some(index) = self.interaction.selected_line else {
                    return Effects::none();
                };
                let removed = self.lines.remove(index);
                if let Some(line) = removed {
                    log::debug!("Deleted line {}", line.id);
                }
                self.clear_selection();
                self.interaction.drag = DragSession::Idle;
                self.interaction.hovered_line = None;
                self.settle_mode();
                Effects::changed(removed.is_some())
            }
        }
    }

    fn on_key_up(&mut self, key: EditorKey) -> Effects {
        if key != EditorKey::UpdateModifier {
            return Effects::none();
        }
        self.interaction.modifier_held = false;
        let was_update = self.interaction.update_mode;
        self.settle_mode();
        Effects::redraw().only_if(was_update != self.interaction.update_mode)
    }

    fn on_length_entered(&mut self, text: &str) -> Effects {
        let Some(index) = self.interaction.selected_line else {
            return Effects::none();
        };
        let length_mm = match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            _ => return Effects::none(),
        };
        let Some(line) = self.lines.get(index).copied() else {
            return Effects::none();
        };

        let end = point_from_length_and_direction(line.start, length_mm, line.direction());
        let changed = end != line.end && self.lines.replace(index, Line { end, ..line });
        self.refresh_selected_length();
        Effects::changed(changed)
    }

    fn refresh_selected_length(&mut self) {
        self.interaction.selected_length_mm = self.selected().map(Line::length_mm);
    }

    fn clear_selection(&mut self) {
        self.interaction.selected_line = None;
        self.interaction.selected_length_mm = None;
        self.interaction.relocate = None;
    }

    /// Drop every transient state except the modifier and the snap cursor.
    fn reset_interaction(&mut self) {
        self.interaction = Interaction {
            update_mode: self.interaction.update_mode,
            modifier_held: self.interaction.modifier_held,
            snap: self.interaction.snap,
            ..Interaction::default()
        };
        self.settle_mode();
    }

    /// Leave update mode once the modifier is up, nothing is selected and no
    /// drag is running.
    fn settle_mode(&mut self) {
        let interaction = &mut self.interaction;
        if interaction.update_mode
            && !interaction.modifier_held
            && interaction.selected_line.is_none()
            && interaction.drag == DragSession::Idle
        {
            interaction.update_mode = false;
            interaction.hovered_line = None;
        }
    }
}

impl Effects {
    fn only_if(self, condition: bool) -> Self {
        if condition { self } else { Self::none() }
    }
}
