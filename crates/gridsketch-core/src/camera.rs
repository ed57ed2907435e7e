//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;

/// Camera manages the view transform for the canvas.
///
/// `screen = world * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = one world unit per pixel).
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// World to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Convert a screen-space length to world units.
    pub fn screen_to_world_len(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by whole steps of [`ZOOM_STEP`] keeping the world point under
    /// `cursor` fixed on screen.
    ///
    /// The zoom is rounded to one decimal so repeated steps do not drift.
    /// Returns false when the zoom is already at its bound.
    pub fn step_zoom_at(&mut self, cursor: Point, steps: i32) -> bool {
        let target = self.zoom + ZOOM_STEP * f64::from(steps);
        let new_zoom = ((target * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let cursor = cursor.to_vec2();
        self.offset = cursor - (cursor - self.offset) * (new_zoom / self.zoom);
        self.zoom = new_zoom;
        true
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
