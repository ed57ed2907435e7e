//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Hold", true, false, "Update mode: select, drag and delete lines"),
            Shortcut::new("Click", false, false, "Place a point / finish a line"),
            Shortcut::new("Right click", false, false, "Pick an endpoint to relocate"),
            Shortcut::new("Middle drag", false, false, "Pan the view"),
            Shortcut::new("Wheel", false, false, "Zoom at the cursor"),
            Shortcut::new("Delete", false, false, "Delete the selected line"),
            Shortcut::new("Backspace", false, false, "Delete the selected line"),
            Shortcut::new("Escape", false, false, "Cancel current action"),
            Shortcut::new("G", false, false, "Toggle grid"),
            Shortcut::new("F", false, false, "Toggle fine grid"),
            Shortcut::new("L", false, false, "Toggle length labels"),
            Shortcut::new("0", false, false, "Reset view"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Hold", true, false, "").format(), "Ctrl+Hold");
        assert_eq!(Shortcut::new("G", false, false, "").format(), "G");
        assert_eq!(Shortcut::new("S", true, true, "").format(), "Ctrl+Shift+S");
    }

    #[test]
    fn test_registry_has_descriptions() {
        let all = ShortcutRegistry::all();
        assert!(!all.is_empty());
        assert!(all.iter().all(|s| !s.description.is_empty()));
    }
}
