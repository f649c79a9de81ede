//! Opinion span bounding around an aspect keyword.

use savor_core::AspectEntry;

use crate::sentiment::chars_before;

/// Characters kept on each side of the anchoring keyword.
pub const SPAN_RADIUS: usize = 12;

/// Short excerpt of `sentence` around the aspect's anchoring keyword.
///
/// The anchor is the first keyword in catalog order that occurs in the
/// sentence, not the leftmost one. The span runs from 12 characters before
/// its first occurrence to 12 characters after its end, clipped to the
/// sentence and trimmed. Falls back to the whole trimmed sentence when the
/// aspect has no keyword in it.
pub fn opinion_span(sentence: &str, aspect: &AspectEntry) -> String {
    let Some(keyword) = aspect.first_keyword_in(sentence) else {
        return sentence.trim().to_string();
    };
    let Some(idx) = sentence.find(keyword) else {
        return sentence.trim().to_string();
    };

    let head = chars_before(sentence, idx, SPAN_RADIUS);
    let start = idx - head.len();

    let kw_end = idx + keyword.len();
    let tail = &sentence[kw_end..];
    let end = kw_end
        + tail
            .char_indices()
            .nth(SPAN_RADIUS)
            .map(|(i, _)| i)
            .unwrap_or(tail.len());

    sentence[start..end].trim().to_string()
}
