use crate::error::ClassifierError;
use deid_protocol::{RawEntity, Record};

/// Entity detector consumed by the orchestrator.
///
/// Implementations are constructed once, handed to the orchestrator by value
/// and called once per non-blank record. Offsets in the returned entities are
/// half-open character offsets into `text`.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<RawEntity>, ClassifierError>;

    /// Entry point used by the orchestrator. Detectors that only look at the
    /// text keep the default; detectors that carry per-record state override it.
    fn classify_record(&self, record: &Record) -> Result<Vec<RawEntity>, ClassifierError> {
        self.classify(&record.text)
    }

    fn name(&self) -> &'static str {
        "unknown"
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&self, text: &str) -> Result<Vec<RawEntity>, ClassifierError> {
        (**self).classify(text)
    }

    fn classify_record(&self, record: &Record) -> Result<Vec<RawEntity>, ClassifierError> {
        (**self).classify_record(record)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Replays the classifier output attached to each input record.
///
/// Output belongs to the record it was attached to, so two records with the
/// same text keep their own entities. A record with no attached output is an
/// error rather than "no entities": missing upstream results surface as
/// failed records instead of unmasked text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecomputedClassifier;

impl PrecomputedClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for PrecomputedClassifier {
    /// Bare text carries no attached output.
    fn classify(&self, _text: &str) -> Result<Vec<RawEntity>, ClassifierError> {
        Err(ClassifierError::new(
            self.name(),
            "precomputed entities are read from records, not from text",
        ))
    }

    fn classify_record(&self, record: &Record) -> Result<Vec<RawEntity>, ClassifierError> {
        record
            .entities
            .clone()
            .ok_or_else(|| ClassifierError::new(self.name(), "record has no attached entities"))
    }

    fn name(&self) -> &'static str {
        "precomputed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn precomputed_replays_attached_entities() {
        let record = Record::new(1, "Andy called")
            .with_entities(vec![RawEntity::new("PATIENT", "Andy", 0, 4, 0.99)]);
        let entities = PrecomputedClassifier.classify_record(&record).unwrap();
        assert_eq!(entities, vec![RawEntity::new("PATIENT", "Andy", 0, 4, 0.99)]);

        let err = PrecomputedClassifier
            .classify_record(&Record::new(2, "no output attached"))
            .unwrap_err();
        assert_eq!(err.classifier, "precomputed");
    }

    #[test]
    fn precomputed_keeps_output_per_record_for_identical_text() {
        let first = Record::new(1, "hi Andy")
            .with_entities(vec![RawEntity::new("PATIENT", "Andy", 3, 7, 0.9)]);
        let second = Record::new(2, "hi Andy").with_entities(Vec::new());
        assert_eq!(PrecomputedClassifier.classify_record(&first).unwrap().len(), 1);
        assert!(PrecomputedClassifier.classify_record(&second).unwrap().is_empty());
    }

    #[test]
    fn precomputed_rejects_bare_text() {
        assert!(PrecomputedClassifier.classify("Andy called").is_err());
    }

    #[test]
    fn boxed_classifier_delegates() {
        let boxed: Box<dyn Classifier> = Box::new(PrecomputedClassifier::new());
        assert_eq!(boxed.name(), "precomputed");
        let record = Record::new(1, "x").with_entities(Vec::new());
        assert!(boxed.classify_record(&record).unwrap().is_empty());
    }
}
