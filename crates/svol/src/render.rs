//! Notification body text.

use std::iter;

/// Text shown instead of the bar while muted.
pub const MUTED_TEXT: &str = "[[[MUTED]]]";

/// Number of fill characters for `percent` in a bar `width` cells wide.
///
/// `round(percent * width / 100)`, rounding halves up, clamped to `width`.
/// Splitting `width` into hundreds and a remainder keeps every intermediate
/// value at or below `width`, so no width can overflow.
pub fn fill_len(percent: u8, width: usize) -> usize {
    let percent = usize::from(percent.min(100));
    let (hundreds, rest) = (width / 100, width % 100);
    let scaled = percent * hundreds + (percent * rest * 2 + 100) / 200;
    scaled.min(width)
}

/// Render the body for a volume level.
///
/// Muted: [`MUTED_TEXT`] centered in `width` columns. Otherwise a bar of
/// `width` cells enclosed in brackets, filled from the left with `fill`.
pub fn body(percent: u8, muted: bool, width: usize, fill: char) -> String {
    if muted {
        return format!("{MUTED_TEXT:^width$}");
    }
    let filled: String = iter::repeat_n(fill, fill_len(percent, width)).collect();
    format!("[{filled:<width$}]")
}
