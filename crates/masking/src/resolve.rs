use crate::error::{MaskError, Result};
use crate::span::{DropReason, DroppedSpan, OverlapPolicy, ReplacementSpan};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Outcome of span resolution for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Pairwise non-overlapping, sorted descending by (start, end)
    pub spans: Vec<ReplacementSpan>,
    pub dropped: Vec<DroppedSpan>,
}

/// Rewrite order: descending by start, then by end.
pub fn descending(a: &ReplacementSpan, b: &ReplacementSpan) -> Ordering {
    b.key().cmp(&a.key())
}

/// Validate, deduplicate and de-overlap `candidates` against a text of
/// `char_len` characters.
///
/// Candidates are processed in category order (stable within a category), so
/// for an exact `(start, end)` duplicate the last one processed wins.
pub fn resolve_spans(
    char_len: usize,
    candidates: Vec<ReplacementSpan>,
    policy: OverlapPolicy,
) -> Result<Resolution> {
    let mut dropped = Vec::new();

    let mut valid: Vec<ReplacementSpan> = Vec::with_capacity(candidates.len());
    for span in candidates {
        if span.start >= span.end || span.end > char_len {
            log::warn!(
                "Dropping malformed span {}..{} ({}) for text of {} characters",
                span.start,
                span.end,
                span.label,
                char_len
            );
            dropped.push(DroppedSpan {
                span,
                reason: DropReason::Malformed,
            });
        } else {
            valid.push(span);
        }
    }

    valid.sort_by_key(|span| span.category.rank());

    let mut by_range: BTreeMap<(usize, usize), ReplacementSpan> = BTreeMap::new();
    for span in valid {
        if let Some(previous) = by_range.insert(span.key(), span) {
            dropped.push(DroppedSpan {
                span: previous,
                reason: DropReason::Superseded,
            });
        }
    }

    let mut spans = match policy {
        OverlapPolicy::Reject => reject_overlaps(by_range)?,
        OverlapPolicy::CategoryPriority => keep_by_priority(by_range, &mut dropped),
    };

    spans.sort_by(descending);
    Ok(Resolution { spans, dropped })
}

fn reject_overlaps(
    by_range: BTreeMap<(usize, usize), ReplacementSpan>,
) -> Result<Vec<ReplacementSpan>> {
    let spans: Vec<ReplacementSpan> = by_range.into_values().collect();
    // Ascending by (start, end): any overlap shows up between a span and the
    // furthest-reaching span before it.
    let mut reach: Option<&ReplacementSpan> = None;
    for span in &spans {
        if let Some(prev) = reach {
            if prev.end > span.start {
                return Err(MaskError::overlap(prev.key(), span.key()));
            }
        }
        if reach.map_or(true, |prev| span.end > prev.end) {
            reach = Some(span);
        }
    }
    Ok(spans)
}

fn keep_by_priority(
    by_range: BTreeMap<(usize, usize), ReplacementSpan>,
    dropped: &mut Vec<DroppedSpan>,
) -> Vec<ReplacementSpan> {
    let mut ranked: Vec<ReplacementSpan> = by_range.into_values().collect();
    ranked.sort_by(|a, b| {
        b.category
            .rank()
            .cmp(&a.category.rank())
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.key().cmp(&b.key()))
    });

    // Accepted spans keyed by start; they never overlap each other.
    let mut accepted: BTreeMap<usize, ReplacementSpan> = BTreeMap::new();
    for span in ranked {
        let clashes_before = accepted
            .range(..span.start)
            .next_back()
            .is_some_and(|(_, prev)| prev.end > span.start);
        let clashes_after = accepted
            .range(span.start..)
            .next()
            .is_some_and(|(&next_start, _)| next_start < span.end);

        if clashes_before || clashes_after {
            log::warn!(
                "Dropping span {}..{} ({}) overlapping a higher-priority span",
                span.start,
                span.end,
                span.label
            );
            dropped.push(DroppedSpan {
                span,
                reason: DropReason::Overlap,
            });
        } else {
            accepted.insert(span.start, span);
        }
    }

    accepted.into_values().collect()
}
