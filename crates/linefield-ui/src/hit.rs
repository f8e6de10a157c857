//! Click-to-caret mapping.
//!
//! Maps a horizontal pixel coordinate (relative to the unscrolled text
//! origin) to the nearest character boundary, by binary-searching the
//! cumulative prefix widths reported by [`GlyphMetrics`]. Glyph advances
//! are assumed positive, so prefix widths grow strictly with each
//! character and the nearest boundary is always one of the two straddling
//! the click.

use crate::metrics::GlyphMetrics;

/// Returns the byte offset of the character boundary nearest to `x`.
///
/// Binary-searches for the first boundary whose prefix width exceeds `x`,
/// then picks between it and the boundary before it by absolute distance;
/// a tie goes to the earlier boundary. Equivalent to linearly scanning all
/// boundaries for the minimum `|x - width(prefix)|`.
///
/// Empty text and negative `x` resolve to 0; `x` past the full text width
/// resolves to `text.len()`.
pub fn caret_index_for_x(metrics: &dyn GlyphMetrics, text: &str, x: f32) -> usize {
    if text.is_empty() {
        return 0;
    }

    // Byte offsets of every caret stop: before each char, plus the end.
    let stops: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    // First stop whose prefix width lies strictly right of the click.
    let mut lo = 0;
    let mut hi = stops.len();
    while lo < hi {
        let mid = (lo + hi) / 2;
        if metrics.text_width(&text[..stops[mid]]) <= x {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    if lo == 0 {
        return 0;
    }
    if lo == stops.len() {
        return text.len();
    }

    let before = metrics.text_width(&text[..stops[lo - 1]]);
    let after = metrics.text_width(&text[..stops[lo]]);
    if (x - before).abs() <= (after - x).abs() {
        stops[lo - 1]
    } else {
        stops[lo]
    }
}
