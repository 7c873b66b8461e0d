use crate::error::{MaskError, Result};
use crate::span::ReplacementSpan;
use std::iter;

/// Byte offset of every character boundary, including the end of the text.
fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(iter::once(text.len()))
        .collect()
}

/// Splice placeholders into `original`, right-most span first.
///
/// `spans` must be sorted descending by (start, end) and must not overlap.
/// Working back-to-front keeps every not-yet-applied offset valid while the
/// text changes length. The whole list is checked before anything is written,
/// so an error never leaves a half-rewritten string.
pub fn apply_spans(original: &str, spans: &[ReplacementSpan]) -> Result<String> {
    let boundaries = char_boundaries(original);
    let char_len = boundaries.len() - 1;

    let mut floor: Option<&ReplacementSpan> = None;
    for span in spans {
        if span.start > span.end || span.end > char_len {
            return Err(MaskError::InvalidSpan {
                start: span.start,
                end: span.end,
                len: char_len,
            });
        }
        if let Some(right) = floor {
            if span.key() >= right.key() {
                return Err(MaskError::Unordered {
                    start: span.start,
                    end: span.end,
                });
            }
            if span.end > right.start {
                return Err(MaskError::overlap(span.key(), right.key()));
            }
        }
        floor = Some(span);
    }

    let mut text = original.to_string();
    for span in spans {
        let range = boundaries[span.start]..boundaries[span.end];
        text.replace_range(range, &span.label);
    }
    Ok(text)
}
