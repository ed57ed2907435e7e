//! GridSketch Render Library
//!
//! Turns editor state into screen-space draw commands and renders them.
//! The default backend uses Vello for GPU-accelerated rendering.

mod frame;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use frame::{
    DrawCommand, ENDPOINT_MARKER_RADIUS, LabelAnchor, SNAP_INDICATOR_RADIUS, SegmentRole, SnapStyle,
    build_frame,
};
pub use renderer::{Palette, RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
