//! Clipboard seam for copy, cut, and paste.
//!
//! The entry widget talks to the platform clipboard through this trait.
//! Reads that fail — no clipboard, non-text content, empty content —
//! come back as `None` and the paste degrades to a silent no-op; the
//! widget never surfaces clipboard trouble to the user.

/// Plain-text clipboard access.
pub trait Clipboard {
    /// Returns the clipboard text, or `None` when unavailable, non-text,
    /// or empty.
    fn get_text(&self) -> Option<String>;

    /// Stores text on the clipboard. Failures are swallowed.
    fn set_text(&self, text: &str);
}

/// Clipboard for hosts without one: reads nothing, stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClipboard;

impl Clipboard for NullClipboard {
    fn get_text(&self) -> Option<String> {
        None
    }

    fn set_text(&self, _text: &str) {}
}

/// System clipboard backend (desktop platforms).
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: std::cell::RefCell<Option<arboard::Clipboard>>,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// Connects to the system clipboard. Hosts where none is available
    /// (headless sessions) still construct fine and behave like
    /// [`NullClipboard`].
    pub fn new() -> Self {
        Self {
            inner: std::cell::RefCell::new(arboard::Clipboard::new().ok()),
        }
    }
}

#[cfg(feature = "system-clipboard")]
impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn get_text(&self) -> Option<String> {
        self.inner
            .borrow_mut()
            .as_mut()
            .and_then(|clipboard| clipboard.get_text().ok())
            .filter(|text| !text.is_empty())
    }

    fn set_text(&self, text: &str) {
        if let Some(clipboard) = self.inner.borrow_mut().as_mut() {
            let _ = clipboard.set_text(text.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_clipboard_reads_nothing() {
        let clipboard = NullClipboard;
        clipboard.set_text("lost");
        assert_eq!(clipboard.get_text(), None);
    }
}
