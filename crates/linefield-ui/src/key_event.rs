//! Keyboard input event types.
//!
//! Platform-independent key events routed to the focused entry. The entry
//! only cares about navigation/editing keys, the shortcut letters, and the
//! text a keystroke produces under the active layout; everything else maps
//! to [`KeyCode::Unknown`].

/// Modifier keys state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift key is pressed.
    pub shift: bool,
    /// Control key is pressed.
    pub ctrl: bool,
    /// Alt key is pressed (Option on macOS).
    pub alt: bool,
    /// Meta/Super key is pressed (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift only.
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Returns true if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// Returns true if Ctrl (or Cmd on macOS) is pressed.
    pub fn command_or_ctrl(&self) -> bool {
        #[cfg(target_os = "macos")]
        {
            self.meta
        }
        #[cfg(not(target_os = "macos"))]
        {
            self.ctrl
        }
    }
}

/// Physical keys the entry reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Navigation
    ArrowLeft,
    ArrowRight,
    Home,
    End,

    // Editing
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    // Shortcut letters (select-all, clipboard)
    A,
    C,
    V,
    X,

    /// Key not recognized or not mapped. Character input still arrives
    /// through [`KeyEvent::text`].
    Unknown,
}

/// A keyboard input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The physical key that was pressed.
    pub key_code: KeyCode,
    /// The text produced by this key press (empty for non-character keys).
    /// Accounts for keyboard layout and modifiers.
    pub text: String,
    /// Current state of modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a new key event.
    pub fn new(key_code: KeyCode, text: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            text: text.into(),
            modifiers,
        }
    }

    /// A bare key press with no text and no modifiers.
    pub fn key(key_code: KeyCode) -> Self {
        Self::new(key_code, "", Modifiers::NONE)
    }

    /// A key press with modifiers and no text.
    pub fn key_with_modifiers(key_code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(key_code, "", modifiers)
    }

    /// A printable character keystroke.
    pub fn character(text: impl Into<String>) -> Self {
        Self::new(KeyCode::Unknown, text, Modifiers::NONE)
    }

    /// Returns true if this key produces printable text.
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_event_carries_text() {
        let event = KeyEvent::character("a");
        assert!(event.has_text());
        assert_eq!(event.text, "a");
    }

    #[test]
    fn backspace_has_no_text() {
        let event = KeyEvent::key(KeyCode::Backspace);
        assert!(!event.has_text());
    }

    #[test]
    fn modifiers_any() {
        assert!(!Modifiers::NONE.any());
        assert!(Modifiers::SHIFT.any());
    }
}
