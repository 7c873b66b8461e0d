use deid_protocol::{Category, LabeledMention};
use serde::{Deserialize, Serialize};

/// How to treat two distinct spans that share characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Fail the whole text; nothing is rewritten
    Reject,

    /// Keep the span whose category is processed later; within a category keep
    /// the longer span, then the earlier one
    #[default]
    CategoryPriority,
}

/// Resolved replacement: half-open character range plus placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementSpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub category: Category,
}

impl ReplacementSpan {
    pub fn new(start: usize, end: usize, label: impl Into<String>, category: Category) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            category,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn key(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Half-open ranges overlap when each starts before the other ends
    pub fn overlaps(&self, other: &ReplacementSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<&LabeledMention> for ReplacementSpan {
    fn from(mention: &LabeledMention) -> Self {
        Self::new(
            mention.mention.start,
            mention.mention.end,
            mention.label.clone(),
            mention.category(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Out of bounds, inverted or zero-width
    Malformed,
    /// Lost an overlap to a higher-priority span
    Overlap,
    /// Same range claimed again later in processing order
    Superseded,
}

/// A span left out of the rewrite, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedSpan {
    pub span: ReplacementSpan,
    pub reason: DropReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> ReplacementSpan {
        ReplacementSpan::new(start, end, "X1", Category::Geo)
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        assert!(!span(0, 4).overlaps(&span(4, 8)));
        assert!(!span(4, 8).overlaps(&span(0, 4)));
    }

    #[test]
    fn shared_characters_overlap() {
        assert!(span(0, 5).overlaps(&span(4, 8)));
        assert!(span(2, 3).overlaps(&span(0, 8)));
    }
}
