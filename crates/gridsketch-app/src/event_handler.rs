//! Translation of winit input into editor events.

use gridsketch_core::{EditorEvent, EditorKey};
use kurbo::Point;
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{Key, NamedKey};

/// Pixel deltas smaller than this do not count as a wheel notch.
const PIXEL_SCROLL_THRESHOLD: f64 = 1.0;

/// Tracks pointer and modifier state between winit events.
#[derive(Debug, Default)]
pub struct EventHandler {
    /// Last known cursor position in physical pixels.
    cursor: Point,
    /// Middle button held: pointer motion pans instead of editing.
    panning: bool,
    /// Control as last reported to the editor.
    modifier_down: bool,
    /// The left button went down on the canvas, not on the UI panel.
    press_on_canvas: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor motion. Pans while the middle button is held.
    pub fn cursor_moved(&mut self, position: Point) -> EditorEvent {
        let delta = position - self.cursor;
        self.cursor = position;
        if self.panning {
            EditorEvent::Pan { delta }
        } else {
            EditorEvent::PointerMove { position }
        }
    }

    /// Button press or release. A primary release completes a click only
    /// when both the press and the release happened on the canvas.
    pub fn mouse_input(&mut self, button: MouseButton, pressed: bool, over_ui: bool) -> Vec<EditorEvent> {
        let position = self.cursor;
        match (button, pressed) {
            (MouseButton::Left, true) => {
                self.press_on_canvas = !over_ui;
                if over_ui {
                    Vec::new()
                } else {
                    vec![EditorEvent::PointerDown { position }]
                }
            }
            (MouseButton::Left, false) => {
                let started_on_canvas = std::mem::take(&mut self.press_on_canvas);
                if started_on_canvas && !over_ui {
                    vec![
                        EditorEvent::PointerUp { position },
                        EditorEvent::PrimaryClick { position },
                    ]
                } else {
                    vec![EditorEvent::PointerUp { position }]
                }
            }
            (MouseButton::Right, true) if !over_ui => vec![EditorEvent::SecondaryClick { position }],
            (MouseButton::Middle, true) if !over_ui => {
                self.panning = true;
                Vec::new()
            }
            (MouseButton::Middle, false) => {
                self.panning = false;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// One zoom step per wheel notch, in the direction of the scroll.
    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> Option<EditorEvent> {
        let dy = match delta {
            MouseScrollDelta::LineDelta(_, y) => f64::from(y),
            MouseScrollDelta::PixelDelta(pos) => {
                if pos.y.abs() < PIXEL_SCROLL_THRESHOLD {
                    return None;
                }
                pos.y
            }
        };
        if dy == 0.0 {
            return None;
        }
        Some(EditorEvent::Wheel {
            position: self.cursor,
            steps: if dy > 0.0 { 1 } else { -1 },
        })
    }

    /// Control state from `ModifiersChanged`. Only transitions produce events.
    pub fn modifiers_changed(&mut self, control: bool) -> Option<EditorEvent> {
        if control == self.modifier_down {
            return None;
        }
        self.modifier_down = control;
        Some(if control {
            EditorEvent::KeyDown(EditorKey::UpdateModifier)
        } else {
            EditorEvent::KeyUp(EditorKey::UpdateModifier)
        })
    }

    /// Losing focus releases the modifier; the key-up would never arrive.
    pub fn focus_lost(&mut self) -> Option<EditorEvent> {
        self.panning = false;
        self.press_on_canvas = false;
        self.modifiers_changed(false)
    }

    /// Non-modifier keys. Fires on press only, ignoring auto-repeat.
    pub fn key_input(&self, key: &Key, pressed: bool, repeat: bool) -> Option<EditorEvent> {
        if !pressed || repeat {
            return None;
        }
        match key {
            Key::Named(NamedKey::Escape) => Some(EditorEvent::KeyDown(EditorKey::Cancel)),
            Key::Named(NamedKey::Delete | NamedKey::Backspace) => {
                Some(EditorEvent::KeyDown(EditorKey::Delete))
            }
            // Ctrl+letter belongs to the modifier gesture, not the toggles
            Key::Character(_) if self.modifier_down => None,
            Key::Character(c) => match c.to_lowercase().as_str() {
                "g" => Some(EditorEvent::ToggleGrid),
                "f" => Some(EditorEvent::ToggleFineGrid),
                "l" => Some(EditorEvent::ToggleLabels),
                "0" => Some(EditorEvent::ResetView),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use winit::dpi::PhysicalPosition;
    use winit::keyboard::SmolStr;

    fn char_key(c: &str) -> Key {
        Key::Character(SmolStr::new(c))
    }

    #[test]
    fn test_primary_release_completes_click() {
        let mut handler = EventHandler::new();
        handler.cursor_moved(Point::new(100.0, 50.0));
        let position = Point::new(100.0, 50.0);

        assert_eq!(
            handler.mouse_input(MouseButton::Left, true, false),
            vec![EditorEvent::PointerDown { position }]
        );
        assert_eq!(
            handler.mouse_input(MouseButton::Left, false, false),
            vec![
                EditorEvent::PointerUp { position },
                EditorEvent::PrimaryClick { position }
            ]
        );
    }

    #[test]
    fn test_release_over_ui_only_ends_drag() {
        let mut handler = EventHandler::new();
        assert!(handler.mouse_input(MouseButton::Left, true, true).is_empty());
        assert_eq!(
            handler.mouse_input(MouseButton::Left, false, true),
            vec![EditorEvent::PointerUp { position: Point::ZERO }]
        );
    }

    #[test]
    fn test_press_over_ui_never_clicks_canvas() {
        let mut handler = EventHandler::new();
        handler.cursor_moved(Point::new(20.0, 20.0));
        assert!(handler.mouse_input(MouseButton::Left, true, true).is_empty());

        // Dragged off the panel and released on the canvas
        handler.cursor_moved(Point::new(300.0, 200.0));
        assert_eq!(
            handler.mouse_input(MouseButton::Left, false, false),
            vec![EditorEvent::PointerUp { position: Point::new(300.0, 200.0) }]
        );

        // The next canvas press clicks normally
        handler.mouse_input(MouseButton::Left, true, false);
        assert_eq!(handler.mouse_input(MouseButton::Left, false, false).len(), 2);
    }

    #[test]
    fn test_right_click_is_secondary() {
        let mut handler = EventHandler::new();
        handler.cursor_moved(Point::new(10.0, 20.0));
        assert_eq!(
            handler.mouse_input(MouseButton::Right, true, false),
            vec![EditorEvent::SecondaryClick { position: Point::new(10.0, 20.0) }]
        );
        assert!(handler.mouse_input(MouseButton::Right, false, false).is_empty());
    }

    #[test]
    fn test_middle_drag_pans() {
        let mut handler = EventHandler::new();
        handler.cursor_moved(Point::new(100.0, 100.0));
        handler.mouse_input(MouseButton::Middle, true, false);
        assert_eq!(
            handler.cursor_moved(Point::new(110.0, 95.0)),
            EditorEvent::Pan { delta: Vec2::new(10.0, -5.0) }
        );
        handler.mouse_input(MouseButton::Middle, false, false);
        assert_eq!(
            handler.cursor_moved(Point::new(120.0, 95.0)),
            EditorEvent::PointerMove { position: Point::new(120.0, 95.0) }
        );
    }

    #[test]
    fn test_wheel_steps() {
        let mut handler = EventHandler::new();
        handler.cursor_moved(Point::new(300.0, 300.0));
        assert_eq!(
            handler.mouse_wheel(MouseScrollDelta::LineDelta(0.0, 3.0)),
            Some(EditorEvent::Wheel { position: Point::new(300.0, 300.0), steps: 1 })
        );
        assert_eq!(
            handler.mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -12.0))),
            Some(EditorEvent::Wheel { position: Point::new(300.0, 300.0), steps: -1 })
        );
        assert_eq!(handler.mouse_wheel(MouseScrollDelta::LineDelta(1.0, 0.0)), None);
        assert_eq!(
            handler.mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 0.5))),
            None
        );
    }

    #[test]
    fn test_modifier_transitions_only() {
        let mut handler = EventHandler::new();
        assert_eq!(
            handler.modifiers_changed(true),
            Some(EditorEvent::KeyDown(EditorKey::UpdateModifier))
        );
        assert_eq!(handler.modifiers_changed(true), None);
        assert_eq!(
            handler.focus_lost(),
            Some(EditorEvent::KeyUp(EditorKey::UpdateModifier))
        );
        assert_eq!(handler.modifiers_changed(false), None);
    }

    #[test]
    fn test_key_mapping() {
        let handler = EventHandler::new();
        assert_eq!(
            handler.key_input(&Key::Named(NamedKey::Escape), true, false),
            Some(EditorEvent::KeyDown(EditorKey::Cancel))
        );
        assert_eq!(
            handler.key_input(&Key::Named(NamedKey::Backspace), true, false),
            Some(EditorEvent::KeyDown(EditorKey::Delete))
        );
        assert_eq!(handler.key_input(&char_key("G"), true, false), Some(EditorEvent::ToggleGrid));
        assert_eq!(handler.key_input(&char_key("f"), true, false), Some(EditorEvent::ToggleFineGrid));
        assert_eq!(handler.key_input(&char_key("l"), true, false), Some(EditorEvent::ToggleLabels));
        assert_eq!(handler.key_input(&char_key("0"), true, false), Some(EditorEvent::ResetView));
        assert_eq!(handler.key_input(&char_key("x"), true, false), None);
        // Releases and repeats are ignored
        assert_eq!(handler.key_input(&char_key("g"), false, false), None);
        assert_eq!(handler.key_input(&char_key("g"), true, true), None);
    }

    #[test]
    fn test_toggles_suppressed_while_modifier_held() {
        let mut handler = EventHandler::new();
        handler.modifiers_changed(true);
        assert_eq!(handler.key_input(&char_key("g"), true, false), None);
        assert_eq!(
            handler.key_input(&Key::Named(NamedKey::Delete), true, false),
            Some(EditorEvent::KeyDown(EditorKey::Delete))
        );
    }
}
