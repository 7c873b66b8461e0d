//! Regex classifier for entities recognisable by their format alone:
//! e-mail addresses, URLs, SSN-shaped numbers, dates, phone numbers and long
//! digit runs. Names and places need a trained model.

use crate::classifier::Classifier;
use crate::error::ClassifierError;
use deid_protocol::RawEntity;
use regex::Regex;

const PATTERN_CONFIDENCE: f64 = 0.9;

/// Raw labels and patterns in precedence order: an earlier pattern claims its
/// characters before later ones are tried.
const PATTERNS: &[(&str, &str)] = &[
    ("EMAIL", r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b"),
    ("WEB", r#"(?i)\b(?:https?://|www\.)[^\s<>"']*[^\s<>"'.,;:!?)]"#),
    ("SSN", r"\b\d{3}-\d{2}-\d{4}\b"),
    ("DATE", r"\b\d{4}-\d{2}-\d{2}\b"),
    ("DATE", r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"),
    (
        "DATE",
        r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+\d{1,2}(?:,\s*\d{4})?\b",
    ),
    (
        "PHONE",
        r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)\s?|\b\d{3}[-.\s])?\b\d{3}[-.]\d{4}\b",
    ),
    ("ID", r"\b\d{7,}\b"),
];

/// Pattern-based classifier.
///
/// Construction compiles every pattern once; keep one instance for the whole
/// batch rather than building one per record.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    patterns: Vec<(&'static str, Regex)>,
}

impl PatternClassifier {
    pub fn new() -> Result<Self, ClassifierError> {
        let patterns = PATTERNS
            .iter()
            .map(|&(label, source)| {
                Regex::new(source)
                    .map(|regex| (label, regex))
                    .map_err(|e| ClassifierError::new("pattern", e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

fn overlaps(taken: &[(usize, usize)], start: usize, end: usize) -> bool {
    taken.iter().any(|&(s, e)| start < e && s < end)
}

impl Classifier for PatternClassifier {
    fn classify(&self, text: &str) -> Result<Vec<RawEntity>, ClassifierError> {
        let mut taken: Vec<(usize, usize)> = Vec::new();
        let mut found: Vec<(usize, usize, &'static str)> = Vec::new();

        for (label, regex) in &self.patterns {
            for m in regex.find_iter(text) {
                if m.start() < m.end() && !overlaps(&taken, m.start(), m.end()) {
                    taken.push((m.start(), m.end()));
                    found.push((m.start(), m.end(), label));
                }
            }
        }
        found.sort_unstable();

        // Byte offsets from the regex engine -> character offsets
        let entities = found
            .into_iter()
            .map(|(start, end, label)| {
                let char_start = text[..start].chars().count();
                let char_len = text[start..end].chars().count();
                RawEntity::new(
                    label,
                    &text[start..end],
                    char_start,
                    char_start + char_len,
                    PATTERN_CONFIDENCE,
                )
            })
            .collect();
        Ok(entities)
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}
