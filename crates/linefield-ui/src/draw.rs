//! Draw primitives handed to the rendering collaborator.
//!
//! The entry widget does not paint; it emits a z-ordered list of
//! primitives per frame (background, selection below the text, text,
//! caret above it) and the host's renderer turns them into canvas calls.

/// RGBA color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    /// Builds an opaque color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        )
    }
}

/// Axis-aligned rectangle in widget-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One canvas drawing operation. Listed in paint order: earlier primitives
/// lie below later ones.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    /// Rounded rectangle, used for the field background and border.
    RoundedRect {
        rect: Rect,
        radius: f32,
        /// Fill color, or `None` for outline-only.
        fill: Option<Color>,
        /// Outline color, or `None` for fill-only.
        outline: Option<Color>,
    },
    /// Solid rectangle (selection highlight, caret bar).
    Rect { rect: Rect, color: Color },
    /// A run of text anchored at its top-left corner.
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Color,
    },
}
