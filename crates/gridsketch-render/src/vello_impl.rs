//! Vello-based renderer implementation.

use crate::frame::{DrawCommand, LabelAnchor, build_frame};
use crate::renderer::{Palette, RenderContext, Renderer};
use kurbo::{Affine, BezPath, Circle, Point, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::Scene;

const LABEL_FONT_SIZE: f32 = 12.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for label text (system fonts).
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn stroke_segment(&mut self, from: Point, to: Point, width: f64, color: Color) {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        self.scene
            .stroke(&Stroke::new(width), Affine::IDENTITY, color, None, &path);
    }

    fn render_label(&mut self, text: &str, position: Point, anchor: LabelAnchor, color: Color, scale: f64) {
        let brush = Brush::Solid(color);
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(LABEL_FONT_SIZE * scale as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let width = layout.width() as f64;
        let height = layout.height() as f64;
        // Below: centred under the point. Side: left edge at the point.
        let origin = match anchor {
            LabelAnchor::Below => Point::new(position.x - width / 2.0, position.y),
            LabelAnchor::Side => Point::new(position.x, position.y - height / 2.0),
        };
        let transform = Affine::translate(origin.to_vec2());

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                if glyphs.is_empty() {
                    continue;
                }
                self.scene
                    .draw_glyphs(run.font())
                    .brush(&brush)
                    .hint(true)
                    .transform(transform)
                    .font_size(run.font_size())
                    .normalized_coords(run.normalized_coords())
                    .draw(Fill::NonZero, glyphs.into_iter());
            }
        }
    }

    fn render_command(&mut self, command: &DrawCommand, palette: &Palette, scale: f64) {
        match command {
            // The background is the render base colour
            DrawCommand::Clear => {}
            DrawCommand::GridLine { from, to, major } => {
                let (width, color) = if *major {
                    (0.75, palette.grid_major)
                } else {
                    (0.5, palette.grid_minor)
                };
                self.stroke_segment(*from, *to, width * scale, color);
            }
            DrawCommand::Segment { from, to, role } => {
                self.stroke_segment(*from, *to, 2.0 * scale, palette.segment(*role));
            }
            DrawCommand::Label { position, text, anchor } => {
                self.render_label(text, *position, *anchor, palette.label, scale);
            }
            DrawCommand::Preview { from, to } => {
                let stroke = Stroke::new(1.5 * scale).with_dashes(0.0, [6.0 * scale, 4.0 * scale]);
                let mut path = BezPath::new();
                path.move_to(*from);
                path.line_to(*to);
                self.scene
                    .stroke(&stroke, Affine::IDENTITY, palette.preview, None, &path);
            }
            DrawCommand::SnapIndicator { center, radius, style } => {
                let circle = Circle::new(*center, radius * scale);
                self.scene.stroke(
                    &Stroke::new(1.5 * scale),
                    Affine::IDENTITY,
                    palette.snap(*style),
                    None,
                    &circle,
                );
            }
            DrawCommand::EndpointMarker { center, radius } => {
                let circle = Circle::new(*center, radius * scale);
                self.scene.fill(
                    Fill::NonZero,
                    Affine::IDENTITY,
                    palette.relocate_marker.with_alpha(0.35),
                    None,
                    &circle,
                );
                self.scene.stroke(
                    &Stroke::new(1.5 * scale),
                    Affine::IDENTITY,
                    palette.relocate_marker,
                    None,
                    &circle,
                );
            }
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let palette = ctx.palette;
        for command in build_frame(ctx) {
            self.render_command(&command, &palette, ctx.scale_factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsketch_core::{EditorConfig, EditorState, Line, LineId, LineSet};
    use kurbo::Size;

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_lines() {
        let mut lines = LineSet::new();
        lines.add(Line::new(LineId(1), Point::new(100.0, 100.0), Point::new(200.0, 100.0)));
        let state = EditorState::with_lines(lines, &EditorConfig::default());

        let mut renderer = VelloRenderer::new();
        let ctx = RenderContext::new(&state, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());

        let scene = renderer.take_scene();
        assert!(!scene.encoding().is_empty());
        assert!(renderer.scene().encoding().is_empty());
    }
}
