//! Single-line text editing model.
//!
//! # Core Types
//!
//! - [`Selection`] - Anchor/caret pair with normalization
//! - [`EntryBuffer`] - Mutable text content with caret, selection, and an
//!   optional character limit
//!
//! # Example
//!
//! ```
//! use linefield_foundation::text::EntryBuffer;
//!
//! let mut buffer = EntryBuffer::new(None).unwrap();
//! buffer.insert(0, "Hello");
//! buffer.insert(buffer.len(), ", World!");
//! assert_eq!(buffer.get(), "Hello, World!");
//! ```

mod buffer;
mod selection;

pub use buffer::{EntryBuffer, InvalidMaxLength};
pub use selection::Selection;
