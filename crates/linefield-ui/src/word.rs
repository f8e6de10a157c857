//! Word boundary detection for ctrl+arrow navigation and double-click
//! selection.
//!
//! A word is a run of alphanumeric characters or underscores
//! (Unicode-aware via `char::is_alphanumeric`).

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns the start of the word left of `pos` (ctrl+left target).
///
/// Skips separators leftwards first, then the word run itself.
pub fn prev_word_start(text: &str, pos: usize) -> usize {
    let mut boundary = 0;
    let mut in_word = false;
    for (i, c) in text[..pos.min(text.len())].char_indices() {
        if is_word_char(c) {
            if !in_word {
                boundary = i;
                in_word = true;
            }
        } else {
            in_word = false;
        }
    }
    boundary
}

/// Returns the end of the word right of `pos` (ctrl+right target).
///
/// Skips separators rightwards first, then the word run itself.
pub fn next_word_end(text: &str, pos: usize) -> usize {
    let pos = pos.min(text.len());
    let mut seen_word = false;
    for (i, c) in text[pos..].char_indices() {
        if is_word_char(c) {
            seen_word = true;
        } else if seen_word {
            return pos + i;
        }
    }
    text.len()
}

/// Returns the `(start, end)` byte range of the word at `pos`
/// (double-click target). On a separator, the word just left of `pos` is
/// used; with none there either, the empty range `(pos, pos)` comes back.
pub fn word_at(text: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(text.len());
    let on_word = text[pos..].chars().next().is_some_and(is_word_char);
    let before_word = text[..pos].chars().next_back().is_some_and(is_word_char);
    if !on_word && !before_word {
        return (pos, pos);
    }

    let start = text[..pos]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_word_char(c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(pos);
    let end = text[pos..]
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len());
    (start, end)
}
