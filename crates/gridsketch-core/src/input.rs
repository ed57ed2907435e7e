//! Platform-neutral input events consumed by the editor.

use crate::line::Line;
use kurbo::{Point, Vec2};

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKey {
    /// Held to enter update mode (Control on desktop).
    UpdateModifier,
    /// Abort whatever is in progress (Escape).
    Cancel,
    /// Delete the selected line (Delete / Backspace).
    Delete,
}

/// Input event delivered to [`EditorState::apply`](crate::editor::EditorState::apply).
///
/// Pointer positions are in screen pixels; the editor converts them through
/// its camera.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    PointerDown { position: Point },
    PointerMove { position: Point },
    PointerUp { position: Point },
    /// A completed primary-button click (delivered after `PointerUp`).
    PrimaryClick { position: Point },
    /// Context-menu equivalent; arms an endpoint for relocation.
    SecondaryClick { position: Point },
    /// Wheel zoom. Positive steps zoom in.
    Wheel { position: Point, steps: i32 },
    /// Pan by a screen-space delta.
    Pan { delta: Vec2 },
    KeyDown(EditorKey),
    KeyUp(EditorKey),
    /// Raw text typed into the length field, in millimetres.
    LengthEntered(String),
    ToggleGrid,
    ToggleFineGrid,
    ToggleLabels,
    ResetView,
    /// The window moved to a display with a different pixel density.
    ScaleFactorChanged(f64),
    /// Remove every line.
    Clear,
    /// Replace every line (import).
    ReplaceLines(Vec<Line>),
}
