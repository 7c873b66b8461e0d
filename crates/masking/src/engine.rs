use crate::error::Result;
use crate::resolve::{resolve_spans, Resolution};
use crate::rewrite::apply_spans;
use crate::span::{DropReason, DroppedSpan, OverlapPolicy, ReplacementSpan};
use deid_protocol::LabeledMention;

/// Rewritten text plus what was and was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOutcome {
    pub text: String,
    /// Applied spans in rewrite order (descending)
    pub applied: Vec<ReplacementSpan>,
    pub dropped: Vec<DroppedSpan>,
}

impl MaskOutcome {
    /// Mentions rejected as malformed or overlapping; superseded exact
    /// duplicates are not counted since their range is still masked.
    pub fn dropped_count(&self) -> usize {
        self.dropped
            .iter()
            .filter(|d| d.reason != DropReason::Superseded)
            .count()
    }
}

/// Replaces labeled mentions in a text with their placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskingEngine {
    policy: OverlapPolicy,
}

impl MaskingEngine {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self { policy }
    }

    /// Resolve mentions into the ordered, non-overlapping rewrite list.
    pub fn resolve(&self, original: &str, mentions: &[LabeledMention]) -> Result<Resolution> {
        let candidates = mentions.iter().map(ReplacementSpan::from).collect();
        resolve_spans(original.chars().count(), candidates, self.policy)
    }

    pub fn mask(&self, original: &str, mentions: &[LabeledMention]) -> Result<MaskOutcome> {
        if mentions.is_empty() {
            return Ok(MaskOutcome {
                text: original.to_string(),
                applied: Vec::new(),
                dropped: Vec::new(),
            });
        }

        let Resolution { spans, dropped } = self.resolve(original, mentions)?;
        let text = apply_spans(original, &spans)?;
        Ok(MaskOutcome {
            text,
            applied: spans,
            dropped,
        })
    }
}

/// Convenience wrapper using the default overlap policy.
pub fn mask_text(original: &str, mentions: &[LabeledMention]) -> Result<String> {
    MaskingEngine::default()
        .mask(original, mentions)
        .map(|outcome| outcome.text)
}
