//! Horizontal scroll window for a single-line entry.
//!
//! The entry never scrolls more than it has to: text that fits the
//! viewport stays flush left, and a caret already inside the visible
//! window leaves the offset untouched, so edits near the caret do not make
//! the text jump.

use log::trace;

/// Horizontal text offset state.
///
/// `offset` is the number of pixels the text is shifted left relative to
/// the field's left padding; it is always `<= 0`, with 0 meaning the text
/// starts flush at the padding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    offset: f32,
}

impl ScrollState {
    /// Returns the current text offset (`<= 0`).
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Resets to the unscrolled position.
    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Shifts the offset by `delta` and clamps it into the legal window
    /// for the given text and viewport widths.
    pub fn shift(&mut self, delta: f32, text_width: f32, viewport_width: f32) {
        self.offset += delta;
        self.offset = clamp_offset(self.offset, text_width, viewport_width);
    }

    /// Recomputes the offset so the caret stays inside the viewport.
    ///
    /// `caret_x` is the caret's pixel position within the unscrolled text,
    /// `caret_width` the width of its visual bar. When the whole text fits
    /// the viewport the offset snaps to 0; otherwise the window shifts only
    /// as far as needed to bring the caret (including its bar) back inside
    /// `[0, viewport_width)`, and is finally clamped so no blank space opens
    /// up on either side.
    pub fn follow_caret(
        &mut self,
        caret_x: f32,
        caret_width: f32,
        text_width: f32,
        viewport_width: f32,
    ) {
        if text_width <= viewport_width {
            self.offset = 0.0;
            return;
        }

        let caret_left = caret_x + self.offset;
        let caret_right = caret_left + caret_width;
        if caret_left < 0.0 {
            self.offset = -caret_x;
        } else if caret_right > viewport_width {
            self.offset = -(caret_x + caret_width - viewport_width);
        }

        self.offset = clamp_offset(self.offset, text_width, viewport_width);
        trace!("scroll offset now {}", self.offset);
    }
}

/// Clamps an offset into `[min(0, viewport - text), 0]`.
fn clamp_offset(offset: f32, text_width: f32, viewport_width: f32) -> f32 {
    let min = (viewport_width - text_width).min(0.0);
    offset.clamp(min, 0.0)
}
