//! Mutable text buffer for a single-line entry.
//!
//! The buffer owns the text content, the caret, the selection anchor, and
//! the optional character limit. Every mutation keeps three things true:
//! the caret is always on a `char` boundary inside `[0, len]`, the anchor
//! never points past the end of the content, and the content never exceeds
//! the limit.
//!
//! Out-of-range indices are clamped, never rejected; text that does not fit
//! the remaining capacity is truncated, never rejected. The only hard error
//! in this module is constructing a buffer with a zero length limit.

use log::debug;
use thiserror::Error;

use super::Selection;

/// Error for a length limit that can never hold any text.
///
/// A limit below 1 is a configuration mistake, not a runtime condition, so
/// it fails construction instead of being silently corrected. Pass `None`
/// for an unbounded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("max_length must be at least 1 (got {0}); use None for no limit")]
pub struct InvalidMaxLength(pub usize);

/// Mutable single-line text buffer with caret, selection, and an optional
/// character limit.
///
/// Offsets in the public API are UTF-8 byte offsets; arguments that land
/// inside a multi-byte character are snapped back to the previous boundary.
/// The limit counts *characters*, so capacity does not depend on how wide
/// the characters are in UTF-8.
///
/// # Example
///
/// ```
/// use linefield_foundation::text::EntryBuffer;
///
/// let mut buffer = EntryBuffer::new(Some(5)).unwrap();
/// buffer.insert(0, "hello world");
/// assert_eq!(buffer.get(), "hello");
/// assert_eq!(buffer.caret(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct EntryBuffer {
    text: String,
    caret: usize,
    selection: Selection,
    max_length: Option<usize>,
}

impl EntryBuffer {
    /// Creates an empty buffer.
    ///
    /// `max_length` is the character limit, or `None` for no limit.
    pub fn new(max_length: Option<usize>) -> Result<Self, InvalidMaxLength> {
        if let Some(limit) = max_length {
            if limit < 1 {
                return Err(InvalidMaxLength(limit));
            }
        }
        Ok(Self {
            text: String::new(),
            caret: 0,
            selection: Selection::NONE,
            max_length,
        })
    }

    /// Returns the content.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Returns the content length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the content length in characters (what the limit counts).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns the configured character limit, if any.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Returns true if the buffer is full.
    pub fn at_capacity(&self) -> bool {
        self.max_length
            .is_some_and(|limit| self.char_count() >= limit)
    }

    /// Returns the caret byte offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Places the caret, clamping into range and snapping to a `char`
    /// boundary. The selection anchor is untouched; callers that want a
    /// collapsed caret clear the selection themselves.
    pub fn set_caret(&mut self, index: usize) {
        self.caret = self.snap(index);
    }

    // ========== Selection ==========

    /// Returns the selection anchor state.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Returns the ordered selected range, or `None` when nothing is
    /// selected.
    pub fn selected_range(&self) -> Option<(usize, usize)> {
        self.selection.normalized(self.caret)
    }

    /// Returns the selected text, or `""` when nothing is selected.
    pub fn selected_text(&self) -> &str {
        match self.selected_range() {
            Some((start, end)) => &self.text[start..end],
            None => "",
        }
    }

    /// Returns true if a non-empty selection exists.
    pub fn has_selection(&self) -> bool {
        self.selection.is_active(self.caret)
    }

    /// Anchors a selection at the current caret unless one is already
    /// active.
    pub fn begin_selection(&mut self) {
        self.selection.begin(self.caret);
    }

    /// Drops the selection anchor.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selects the given byte range (anchor at `start`, caret at `end`).
    pub fn select(&mut self, start: usize, end: usize) {
        self.selection.clear();
        self.caret = self.snap(start);
        self.selection.begin(self.caret);
        self.caret = self.snap(end);
    }

    /// Selects the entire content.
    pub fn select_all(&mut self) {
        self.select(0, self.text.len());
    }

    /// Deletes the selected range, if any. Returns true when text was
    /// removed. The caret collapses to the selection start.
    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selected_range() else {
            return false;
        };
        self.text.replace_range(start..end, "");
        self.caret = start;
        self.selection.clear();
        true
    }

    // ========== Mutation ==========

    /// Inserts `text` at `index`.
    ///
    /// The index is clamped into `[0, len]`; the text is truncated (on a
    /// character boundary) to the remaining capacity, and the whole call is
    /// a no-op when the buffer is already full. The caret lands after the
    /// inserted text and any active selection anchor is dropped.
    pub fn insert(&mut self, index: usize, text: &str) {
        let index = self.snap(index);
        let Some(fitted) = self.fit_to_capacity(text) else {
            return;
        };
        let fitted = fitted.to_owned();
        self.text.insert_str(index, &fitted);
        self.caret = index + fitted.len();
        self.selection.clear();
    }

    /// Deletes a range of text.
    ///
    /// An active selection takes priority: it is deleted instead of the
    /// explicit range. Otherwise both indices are clamped, swapped if
    /// inverted, and the range is removed; `last = None` deletes the single
    /// character after `first`. The caret lands on the start of the removed
    /// range.
    pub fn delete(&mut self, first: usize, last: Option<usize>) {
        if self.delete_selection() {
            return;
        }
        let first = self.snap(first);
        let last = match last {
            Some(last) => self.snap(last),
            None => self.next_boundary(first),
        };
        let (start, end) = if first <= last { (first, last) } else { (last, first) };
        self.text.replace_range(start..end, "");
        self.caret = start;
        self.selection.clear();
    }

    /// Deletes the character before the caret (backspace). With a selection
    /// active the selection is deleted instead.
    pub fn delete_before_caret(&mut self) {
        if self.delete_selection() {
            return;
        }
        self.selection.clear();
        if self.caret > 0 {
            let start = self.prev_boundary(self.caret);
            let end = self.caret;
            self.text.replace_range(start..end, "");
            self.caret = start;
        }
    }

    /// Deletes the character after the caret (delete key). With a selection
    /// active the selection is deleted instead.
    pub fn delete_after_caret(&mut self) {
        if self.delete_selection() {
            return;
        }
        self.selection.clear();
        if self.caret < self.text.len() {
            let end = self.next_boundary(self.caret);
            let start = self.caret;
            self.text.replace_range(start..end, "");
        }
    }

    /// Replaces the content wholesale, truncated to capacity. The caret
    /// moves to the end and the selection is dropped. Callers owning a
    /// scroll offset reset it alongside.
    pub fn set(&mut self, text: &str) {
        let limit = self.max_length.unwrap_or(usize::MAX);
        let fitted = truncate_chars(text, limit);
        if fitted.len() < text.len() {
            debug!(
                "entry content truncated to {} chars by length limit",
                limit
            );
        }
        self.text = fitted.to_owned();
        self.caret = self.text.len();
        self.selection.clear();
    }

    // ========== Caret motion ==========

    /// Moves the caret one character left. With `extend` the move grows the
    /// selection from the current anchor (anchoring first if needed);
    /// without it the selection is dropped.
    pub fn caret_left(&mut self, extend: bool) {
        self.pre_move(extend);
        self.caret = self.prev_boundary(self.caret);
    }

    /// Moves the caret one character right; `extend` as in
    /// [`caret_left`](Self::caret_left).
    pub fn caret_right(&mut self, extend: bool) {
        self.pre_move(extend);
        self.caret = self.next_boundary(self.caret);
    }

    /// Moves the caret to the start of the content.
    pub fn caret_home(&mut self, extend: bool) {
        self.pre_move(extend);
        self.caret = 0;
    }

    /// Moves the caret to the end of the content.
    pub fn caret_end(&mut self, extend: bool) {
        self.pre_move(extend);
        self.caret = self.text.len();
    }

    // ========== Helpers ==========

    fn pre_move(&mut self, extend: bool) {
        if extend {
            // Anchor at the pre-move caret; repeated shift-moves keep the
            // original anchor.
            self.selection.begin(self.caret);
        } else {
            self.selection.clear();
        }
    }

    /// Clamps a byte offset into range and snaps it back onto a `char`
    /// boundary.
    fn snap(&self, index: usize) -> usize {
        let mut index = index.min(self.text.len());
        while index > 0 && !self.text.is_char_boundary(index) {
            index -= 1;
        }
        index
    }

    fn prev_boundary(&self, from: usize) -> usize {
        let mut pos = from.saturating_sub(1);
        while pos > 0 && !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    fn next_boundary(&self, from: usize) -> usize {
        let mut pos = (from + 1).min(self.text.len());
        while pos < self.text.len() && !self.text.is_char_boundary(pos) {
            pos += 1;
        }
        pos
    }

    /// Truncates `text` to the capacity left under the limit. Returns
    /// `None` when the buffer is already full.
    fn fit_to_capacity<'t>(&self, text: &'t str) -> Option<&'t str> {
        let Some(limit) = self.max_length else {
            return Some(text);
        };
        let remaining = limit.saturating_sub(self.char_count());
        if remaining == 0 {
            return None;
        }
        let fitted = truncate_chars(text, remaining);
        if fitted.len() < text.len() {
            debug!(
                "entry insert truncated from {} to {} chars by length limit",
                text.chars().count(),
                remaining
            );
        }
        Some(fitted)
    }
}

/// Returns the longest prefix of `text` holding at most `count` characters.
fn truncate_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_splices_at_index() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "Helo");
        buffer.insert(2, "l");
        assert_eq!(buffer.get(), "Hello");
        assert_eq!(buffer.caret(), 3);
    }

    #[test]
    fn insert_clamps_index() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "ab");
        buffer.insert(99, "c");
        assert_eq!(buffer.get(), "abc");
    }

    #[test]
    fn insert_truncates_to_capacity() {
        let mut buffer = EntryBuffer::new(Some(5)).unwrap();
        buffer.insert(0, "hello world");
        assert_eq!(buffer.get(), "hello");
        assert_eq!(buffer.caret(), 5);
        assert!(buffer.at_capacity());
    }

    #[test]
    fn insert_at_capacity_is_noop() {
        let mut buffer = EntryBuffer::new(Some(3)).unwrap();
        buffer.insert(0, "abc");
        buffer.insert(1, "x");
        assert_eq!(buffer.get(), "abc");
    }

    #[test]
    fn capacity_counts_chars_not_bytes() {
        let mut buffer = EntryBuffer::new(Some(3)).unwrap();
        buffer.insert(0, "日本語です");
        assert_eq!(buffer.get(), "日本語");
        assert_eq!(buffer.char_count(), 3);
    }

    #[test]
    fn zero_max_length_is_rejected() {
        assert_eq!(EntryBuffer::new(Some(0)).unwrap_err(), InvalidMaxLength(0));
        assert!(EntryBuffer::new(Some(1)).is_ok());
        assert!(EntryBuffer::new(None).is_ok());
    }

    #[test]
    fn delete_range() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello world");
        buffer.delete(5, Some(11));
        assert_eq!(buffer.get(), "hello");
        assert_eq!(buffer.caret(), 5);
    }

    #[test]
    fn delete_swaps_inverted_range() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello");
        buffer.delete(4, Some(1));
        assert_eq!(buffer.get(), "ho");
        assert_eq!(buffer.caret(), 1);
    }

    #[test]
    fn delete_single_char_when_last_omitted() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello");
        buffer.delete(1, None);
        assert_eq!(buffer.get(), "hllo");
    }

    #[test]
    fn delete_prefers_selection_over_range() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello");
        buffer.select_all();
        buffer.delete(1, Some(2));
        assert_eq!(buffer.get(), "");
        assert_eq!(buffer.caret(), 0);
        assert!(!buffer.has_selection());
    }

    #[test]
    fn delete_then_insert_restores_content() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello world");
        buffer.delete(3, Some(8));
        let removed = "lo wo";
        buffer.insert(3, removed);
        assert_eq!(buffer.get(), "hello world");
    }

    #[test]
    fn set_replaces_and_moves_caret_to_end() {
        let mut buffer = EntryBuffer::new(Some(6)).unwrap();
        buffer.insert(0, "abc");
        buffer.select_all();
        buffer.set("replaced");
        assert_eq!(buffer.get(), "replac");
        assert_eq!(buffer.caret(), 6);
        assert!(!buffer.has_selection());
    }

    #[test]
    fn backspace_removes_char_before_caret() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "Hello 🌍");
        buffer.delete_before_caret();
        assert_eq!(buffer.get(), "Hello ");
    }

    #[test]
    fn delete_key_removes_char_after_caret() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "abc");
        buffer.set_caret(0);
        buffer.delete_after_caret();
        assert_eq!(buffer.get(), "bc");
        assert_eq!(buffer.caret(), 0);
    }

    #[test]
    fn shift_moves_extend_one_anchor() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello");
        buffer.caret_left(true);
        buffer.caret_left(true);
        // Both moves extend from the original anchor at 5.
        assert_eq!(buffer.selected_range(), Some((3, 5)));
        assert_eq!(buffer.selected_text(), "lo");
    }

    #[test]
    fn plain_move_clears_selection() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello");
        buffer.select_all();
        buffer.caret_left(false);
        assert!(!buffer.has_selection());
    }

    #[test]
    fn shift_home_selects_to_start() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello");
        buffer.caret_home(true);
        assert_eq!(buffer.selected_range(), Some((0, 5)));
        buffer.caret_end(true);
        assert_eq!(buffer.selected_range(), None);
    }

    #[test]
    fn select_all_then_delete_selection() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "hello");
        buffer.select_all();
        assert!(buffer.delete_selection());
        assert_eq!(buffer.get(), "");
        assert_eq!(buffer.caret(), 0);
        assert_eq!(buffer.selection().anchor(), None);
    }

    #[test]
    fn caret_motion_steps_char_boundaries() {
        let mut buffer = EntryBuffer::new(None).unwrap();
        buffer.insert(0, "aé日");
        buffer.caret_left(false);
        assert_eq!(buffer.caret(), 3); // before 日
        buffer.caret_left(false);
        assert_eq!(buffer.caret(), 1); // before é
        buffer.caret_right(false);
        assert_eq!(buffer.caret(), 3);
    }

    #[test]
    fn max_length_invariant_holds_after_any_mutation() {
        let mut buffer = EntryBuffer::new(Some(4)).unwrap();
        buffer.insert(0, "abcdefgh");
        assert!(buffer.char_count() <= 4);
        buffer.set("0123456789");
        assert!(buffer.char_count() <= 4);
        buffer.delete(0, Some(2));
        buffer.insert(0, "zzzzzz");
        assert!(buffer.char_count() <= 4);
    }
}
