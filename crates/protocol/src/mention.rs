use crate::Category;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One entity as reported by a classifier, before category mapping.
///
/// Field aliases accept the output of token-classification pipelines
/// (`entity_group`, `word`) without a translation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawEntity {
    /// Raw classifier label (e.g. `PATIENT`, `PHONE`)
    #[serde(alias = "entity_group", alias = "entity")]
    pub category: String,

    /// Surface string
    #[serde(alias = "word")]
    pub text: String,

    /// Half-open character range into the classified text
    pub start: usize,
    pub end: usize,

    /// Classifier confidence in [0, 1]
    #[serde(alias = "confidence")]
    pub score: f64,
}

impl RawEntity {
    pub fn new(
        category: impl Into<String>,
        text: impl Into<String>,
        start: usize,
        end: usize,
        score: f64,
    ) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
            start,
            end,
            score,
        }
    }
}

/// Detected entity occurrence in a consolidated category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Mention {
    pub text: String,
    pub category: Category,

    /// Half-open character offsets (Unicode scalar values, not bytes)
    pub start: usize,
    pub end: usize,

    pub confidence: f64,
}

impl Mention {
    pub fn new(
        text: impl Into<String>,
        category: Category,
        start: usize,
        end: usize,
        confidence: f64,
    ) -> Self {
        Self {
            text: text.into(),
            category,
            start,
            end,
            confidence,
        }
    }

    /// Attach a canonical label, consuming the mention.
    pub fn with_label(self, label: impl Into<String>) -> LabeledMention {
        LabeledMention {
            mention: self,
            label: label.into(),
        }
    }
}

/// Mention together with the canonical placeholder assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabeledMention {
    #[serde(flatten)]
    pub mention: Mention,

    /// Canonical placeholder, e.g. `PersonName2`
    pub label: String,
}

impl LabeledMention {
    pub fn category(&self) -> Category {
        self.mention.category
    }
}
