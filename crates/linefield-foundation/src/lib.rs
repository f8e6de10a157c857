//! Foundation types for Linefield entry widgets.
//!
//! This crate holds the pure editing model for a single-line text entry:
//! text content, caret position, selection state, and maximum-length
//! enforcement. Nothing here knows about pixels, fonts, focus, or timers —
//! those live in `linefield-ui` on top of this model.
//!
//! # Core Types
//!
//! - [`Selection`](text::Selection) - Optional anchor paired with the caret
//! - [`EntryBuffer`](text::EntryBuffer) - Mutable single-line text buffer
//! - [`InvalidMaxLength`](text::InvalidMaxLength) - Constructor error for a
//!   non-positive length limit

pub mod text;

pub use text::{EntryBuffer, InvalidMaxLength, Selection};
