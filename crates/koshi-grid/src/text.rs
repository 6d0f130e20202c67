//! Text fitting helpers: single-line truncation and word wrapping.

use std::borrow::Cow;

use crate::surface::{FontSpec, TextMeasure};

pub const ELLIPSIS: &str = "…";

/// Truncate `text` with an ellipsis so it fits in `max_width`.
///
/// Returns the text unchanged when it already fits. When even the ellipsis
/// doesn't fit, returns an empty string.
pub fn truncate_to_width<'a, M: TextMeasure + ?Sized>(
    metrics: &M,
    text: &'a str,
    font: &FontSpec,
    max_width: f64,
) -> Cow<'a, str> {
    if metrics.measure_text(text, font).width <= max_width {
        return Cow::Borrowed(text);
    }
    let ellipsis = metrics.measure_text(ELLIPSIS, font).width;
    if ellipsis > max_width {
        return Cow::Borrowed("");
    }

    // Binary search over char boundaries for the longest fitting prefix.
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let (mut lo, mut hi) = (0usize, boundaries.len());
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        let prefix = &text[..boundaries.get(mid).copied().unwrap_or(text.len())];
        if metrics.measure_text(prefix, font).width + ellipsis <= max_width {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    let cut = boundaries.get(lo).copied().unwrap_or(text.len());
    Cow::Owned(format!("{}{}", text[..cut].trim_end(), ELLIPSIS))
}

/// Word-wrap `text` into lines no wider than `max_width`.
///
/// Explicit newlines always break. Words wider than a line are split at
/// char boundaries. Always returns at least one line.
pub fn wrap_lines<M: TextMeasure + ?Sized>(
    metrics: &M,
    text: &str,
    font: &FontSpec,
    max_width: f64,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if metrics.measure_text(&candidate, font).width <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // Word alone may still be too wide: hard-break it.
            for ch in word.chars() {
                current.push(ch);
                if metrics.measure_text(&current, font).width > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
