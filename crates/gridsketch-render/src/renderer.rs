//! Renderer trait abstraction.

use gridsketch_core::EditorState;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

use crate::frame::{SegmentRole, SnapStyle};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Colours used to draw a frame.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub grid_major: Color,
    pub grid_minor: Color,
    pub line: Color,
    pub line_selected: Color,
    pub line_hovered: Color,
    pub preview: Color,
    pub label: Color,
    pub snap_grid: Color,
    pub snap_endpoint: Color,
    pub snap_update: Color,
    pub snap_hover: Color,
    pub relocate_marker: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(250, 250, 250, 255),
            grid_major: Color::from_rgba8(200, 200, 200, 160),
            grid_minor: Color::from_rgba8(220, 220, 220, 90),
            line: Color::from_rgba8(30, 30, 30, 255),
            line_selected: Color::from_rgba8(59, 130, 246, 255),
            line_hovered: Color::from_rgba8(245, 158, 11, 255),
            preview: Color::from_rgba8(120, 120, 120, 200),
            label: Color::from_rgba8(60, 60, 60, 255),
            snap_grid: Color::from_rgba8(236, 72, 153, 200),
            snap_endpoint: Color::from_rgba8(16, 185, 129, 220),
            snap_update: Color::from_rgba8(59, 130, 246, 160),
            snap_hover: Color::from_rgba8(245, 158, 11, 220),
            relocate_marker: Color::from_rgba8(220, 38, 38, 230),
        }
    }
}

impl Palette {
    pub fn segment(&self, role: SegmentRole) -> Color {
        match role {
            SegmentRole::Default => self.line,
            SegmentRole::Selected => self.line_selected,
            SegmentRole::Hovered => self.line_hovered,
        }
    }

    pub fn snap(&self, style: SnapStyle) -> Color {
        match style {
            SnapStyle::Grid => self.snap_grid,
            SnapStyle::Endpoint => self.snap_endpoint,
            SnapStyle::Update => self.snap_update,
            SnapStyle::Hover => self.snap_hover,
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor state to draw.
    pub state: &'a EditorState,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI stroke widths and text).
    pub scale_factor: f64,
    pub palette: Palette,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(state: &'a EditorState, viewport_size: Size) -> Self {
        Self {
            state,
            viewport_size,
            scale_factor: 1.0,
            palette: Palette::default(),
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.palette.background = color;
        self
    }
}

/// Trait for rendering backends.
///
/// A backend consumes the frame produced by [`crate::build_frame`]; it never
/// looks at the editor state beyond what the context exposes.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.palette.background
    }
}
