use crate::classifier::Classifier;
use crate::config::{ConsolidationMode, PipelineConfig};
use crate::error::{ClassifierError, Result};
use deid_graph::{CanonicalIds, Consolidator};
use deid_masking::MaskingEngine;
use deid_protocol::{Category, LabeledMention, MaskedRecord, Mention, RawEntity, Record};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Counters for one processed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub records: usize,
    pub masked: usize,
    pub failed: usize,
    pub mentions: usize,
    pub dropped_mentions: usize,
}

/// Mentions kept for one record, plus those rejected for out-of-range offsets
/// before they could take part in consolidation.
#[derive(Debug, Default)]
struct Extraction {
    mentions: Vec<Mention>,
    rejected: usize,
}

type Extracted = std::result::Result<Extraction, ClassifierError>;

/// Drives classification, consolidation and masking over a batch of records.
pub struct Orchestrator<C> {
    classifier: C,
    config: PipelineConfig,
    consolidator: Consolidator,
    engine: MaskingEngine,
}

impl<C: Classifier> Orchestrator<C> {
    /// Fails eagerly on an invalid configuration.
    pub fn new(classifier: C, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let consolidator = Consolidator::new(config.match_threshold()?);
        let engine = MaskingEngine::new(config.overlap_policy);
        Ok(Self {
            classifier,
            config,
            consolidator,
            engine,
        })
    }

    /// One output per input record, in input order.
    pub fn process(&self, records: &[Record]) -> Vec<MaskedRecord> {
        self.process_with_summary(records).0
    }

    pub fn process_with_summary(&self, records: &[Record]) -> (Vec<MaskedRecord>, BatchSummary) {
        let extracted: Vec<Extracted> =
            records.iter().map(|record| self.extract(record)).collect();

        let labeled = match self.config.consolidation {
            ConsolidationMode::Fuzzy => self.label_fuzzy(&extracted),
            ConsolidationMode::Exact => self.label_exact(&extracted),
        };

        let mut summary = BatchSummary {
            records: records.len(),
            ..Default::default()
        };

        let output: Vec<MaskedRecord> = records
            .iter()
            .zip(extracted)
            .zip(labeled)
            .map(|((record, extraction), mentions)| {
                let out = match extraction {
                    Ok(extraction) => self.mask_record(record, mentions, extraction.rejected),
                    Err(err) => {
                        log::warn!("Record {}: {}", record.id, err);
                        MaskedRecord::failed(record, Vec::new(), err.to_string())
                    }
                };
                if out.is_failed() {
                    summary.failed += 1;
                } else {
                    summary.masked += 1;
                }
                summary.mentions += out.mentions.len();
                summary.dropped_mentions += out.dropped_mentions;
                out
            })
            .collect();

        log::info!(
            "Processed {} records: {} masked, {} failed, {} mentions, {} dropped",
            summary.records,
            summary.masked,
            summary.failed,
            summary.mentions,
            summary.dropped_mentions
        );

        (output, summary)
    }

    /// Classify one record and keep the mentions the configuration recognises,
    /// in text order. Mentions whose span does not fit the text are rejected
    /// here so they never receive a canonical id.
    fn extract(&self, record: &Record) -> Extracted {
        if record.text.trim().is_empty() {
            return Ok(Extraction::default());
        }
        let raw = self.classifier.classify_record(record)?;
        let char_len = record.text.chars().count();

        let (mut mentions, rejected): (Vec<Mention>, Vec<Mention>) = self
            .to_mentions(raw)
            .into_iter()
            .partition(|m| m.start < m.end && m.end <= char_len);
        for mention in &rejected {
            log::warn!(
                "Record {}: dropping {} mention with span {}..{} for text of {} characters",
                record.id,
                mention.category,
                mention.start,
                mention.end,
                char_len
            );
        }

        mentions.sort_by_key(|m| (m.start, m.end, m.category));
        Ok(Extraction {
            mentions,
            rejected: rejected.len(),
        })
    }

    fn to_mentions(&self, raw: Vec<RawEntity>) -> Vec<Mention> {
        raw.into_iter()
            .filter(|entity| entity.score >= self.config.confidence_threshold)
            .filter_map(|entity| {
                let category = self.config.category_map.resolve(&entity.category)?;
                Some(Mention::new(
                    entity.text,
                    category,
                    entity.start,
                    entity.end,
                    entity.score,
                ))
            })
            .collect()
    }

    /// Consolidate each category once over the whole batch.
    fn label_fuzzy(&self, extracted: &[Extracted]) -> Vec<Vec<LabeledMention>> {
        let mut strings: BTreeMap<Category, BTreeSet<&str>> = BTreeMap::new();
        for mention in extracted.iter().flatten().flat_map(|e| &e.mentions) {
            strings
                .entry(mention.category)
                .or_default()
                .insert(mention.text.as_str());
        }

        let ids: HashMap<Category, CanonicalIds> = strings
            .into_iter()
            .map(|(category, values)| {
                let ids = self.consolidator.run(values);
                log::debug!(
                    "{}: {} distinct strings -> {} canonical ids",
                    category,
                    ids.len(),
                    ids.component_count()
                );
                (category, ids)
            })
            .collect();

        extracted
            .iter()
            .map(|extraction| {
                let Ok(extraction) = extraction else {
                    return Vec::new();
                };
                extraction
                    .mentions
                    .iter()
                    .filter_map(|mention| {
                        let id = ids.get(&mention.category)?.get(&mention.text)?;
                        Some(mention.clone().with_label(mention.category.label(id)))
                    })
                    .collect()
            })
            .collect()
    }

    /// Identical strings share an ordinal, numbered per record and category in
    /// order of first appearance.
    fn label_exact(&self, extracted: &[Extracted]) -> Vec<Vec<LabeledMention>> {
        extracted
            .iter()
            .map(|extraction| {
                let Ok(extraction) = extraction else {
                    return Vec::new();
                };
                let mut ordinals: HashMap<(Category, &str), usize> = HashMap::new();
                let mut next: HashMap<Category, usize> = HashMap::new();
                extraction
                    .mentions
                    .iter()
                    .map(|mention| {
                        let id = *ordinals
                            .entry((mention.category, mention.text.as_str()))
                            .or_insert_with(|| {
                                let counter = next.entry(mention.category).or_insert(0);
                                *counter += 1;
                                *counter
                            });
                        mention.clone().with_label(mention.category.label(id))
                    })
                    .collect()
            })
            .collect()
    }

    fn mask_record(
        &self,
        record: &Record,
        mentions: Vec<LabeledMention>,
        rejected: usize,
    ) -> MaskedRecord {
        let to_mask: Vec<LabeledMention> = mentions
            .iter()
            .filter(|m| self.config.masks(m.category()))
            .cloned()
            .collect();

        match self.engine.mask(&record.text, &to_mask) {
            Ok(outcome) => {
                let dropped = outcome.dropped_count() + rejected;
                MaskedRecord::masked(record, outcome.text, mentions, dropped)
            }
            Err(err) => {
                log::warn!("Record {}: masking failed: {}", record.id, err);
                MaskedRecord::failed(record, mentions, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::PrecomputedClassifier;
    use crate::error::PipelineError;
    use deid_masking::OverlapPolicy;
    use deid_protocol::RecordStatus;
    use pretty_assertions::assert_eq;

    /// Finds fixed needles by substring search; fails on texts containing "boom".
    struct StubClassifier {
        needles: Vec<(&'static str, &'static str, f64)>,
    }

    impl StubClassifier {
        fn new(needles: &[(&'static str, &'static str)]) -> Self {
            Self {
                needles: needles.iter().map(|&(n, l)| (n, l, 0.95)).collect(),
            }
        }

        fn with_score(mut self, needle: &'static str, label: &'static str, score: f64) -> Self {
            self.needles.push((needle, label, score));
            self
        }
    }

    impl Classifier for StubClassifier {
        fn classify(&self, text: &str) -> std::result::Result<Vec<RawEntity>, ClassifierError> {
            if text.contains("boom") {
                return Err(ClassifierError::new("stub", "model crashed"));
            }
            let mut out = Vec::new();
            for &(needle, label, score) in &self.needles {
                for (start, found) in text.match_indices(needle) {
                    out.push(RawEntity::new(label, found, start, start + found.len(), score));
                }
            }
            Ok(out)
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn names() -> StubClassifier {
        StubClassifier::new(&[
            ("Andy Wheeler", "PATIENT"),
            ("andy wheeler", "PATIENT"),
            ("Scott Jacques", "HCW"),
            ("Joe Schmo", "PATIENT"),
            ("555-1234", "PHONE"),
            ("Kansas", "GEO"),
        ])
    }

    fn orchestrator(config: PipelineConfig) -> Orchestrator<StubClassifier> {
        Orchestrator::new(names(), config).unwrap()
    }

    #[test]
    fn masks_single_record() {
        let records = vec![Record::new(1, "Andy Wheeler called 555-1234")];
        let out = orchestrator(PipelineConfig::default()).process(&records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "PersonName1 called Contact1");
        assert_eq!(out[0].status, RecordStatus::Masked);
        assert_eq!(out[0].mentions.len(), 2);
    }

    #[test]
    fn variants_share_label_across_records() {
        let records = vec![
            Record::new(1, "Andy Wheeler is a birder in Kansas"),
            Record::new(2, "Scott Jacques met andy wheeler"),
        ];
        let out = orchestrator(PipelineConfig::default()).process(&records);
        assert_eq!(out[0].text, "PersonName1 is a birder in Geo1");
        assert_eq!(out[1].text, "PersonName2 met PersonName1");
    }

    #[test]
    fn exact_mode_numbers_per_record() {
        let records = vec![
            Record::new(1, "Joe Schmo and Andy Wheeler and andy wheeler"),
            Record::new(2, "Andy Wheeler again"),
        ];
        let out = orchestrator(PipelineConfig::exact()).process(&records);
        assert_eq!(out[0].text, "PersonName1 and PersonName2 and PersonName3");
        assert_eq!(out[1].text, "PersonName1 again");
    }

    #[test]
    fn classifier_failure_is_isolated() {
        let records = vec![
            Record::new(1, "boom goes Andy Wheeler"),
            Record::new(2, "Andy Wheeler is fine"),
        ];
        let (out, summary) =
            orchestrator(PipelineConfig::default()).process_with_summary(&records);
        assert_eq!(out[0].status, RecordStatus::Failed);
        assert_eq!(out[0].text, "boom goes Andy Wheeler");
        assert!(out[0].mentions.is_empty());
        assert!(out[0].error.as_deref().unwrap().contains("model crashed"));
        assert_eq!(out[1].text, "PersonName1 is fine");
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.masked, 1);
    }

    #[test]
    fn low_confidence_and_unknown_labels_are_ignored() {
        let classifier = StubClassifier::new(&[("Andy Wheeler", "PATIENT")])
            .with_score("Kansas", "GEO", 0.3)
            .with_score("birder", "HOBBY", 0.99);
        let orchestrator = Orchestrator::new(classifier, PipelineConfig::default()).unwrap();
        let out = orchestrator.process(&[Record::new(1, "Andy Wheeler is a birder in Kansas")]);
        assert_eq!(out[0].text, "PersonName1 is a birder in Kansas");
        assert_eq!(out[0].mentions.len(), 1);
    }

    #[test]
    fn unmasked_categories_are_still_reported() {
        let classifier = StubClassifier::new(&[("Andy", "PATIENT"), ("2023-04-01", "DATE")]);
        let orchestrator = Orchestrator::new(classifier, PipelineConfig::default()).unwrap();
        let out = orchestrator.process(&[Record::new(1, "Andy on 2023-04-01")]);
        assert_eq!(out[0].text, "PersonName1 on 2023-04-01");
        assert_eq!(out[0].mentions_in(Category::Date).count(), 1);
        assert_eq!(out[0].mentions_in(Category::Date).next().unwrap().label, "Date1");
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        let (out, summary) = orchestrator(PipelineConfig::default()).process_with_summary(&[]);
        assert!(out.is_empty());
        assert_eq!(summary, BatchSummary::default());
    }

    #[test]
    fn blank_text_passes_through() {
        let records = vec![Record::new(1, "   "), Record::new(2, "")];
        let out = orchestrator(PipelineConfig::default()).process(&records);
        assert_eq!(out[0].text, "   ");
        assert_eq!(out[1].text, "");
        assert!(out.iter().all(|r| r.mentions.is_empty() && !r.is_failed()));
    }

    #[test]
    fn output_preserves_order_and_extra_fields() {
        let records = vec![
            Record::new("b", "Kansas").with_extra("channel", "sms"),
            Record::new("a", "nothing"),
        ];
        let out = orchestrator(PipelineConfig::default()).process(&records);
        assert_eq!(out[0].id, serde_json::json!("b"));
        assert_eq!(out[0].extra.get("channel"), Some(&serde_json::json!("sms")));
        assert_eq!(out[1].id, serde_json::json!("a"));
    }

    #[test]
    fn overlap_under_reject_policy_fails_record() {
        let classifier = StubClassifier::new(&[("Andy Wheeler", "PATIENT"), ("Wheeler St", "GEO")]);
        let config = PipelineConfig {
            overlap_policy: OverlapPolicy::Reject,
            ..Default::default()
        };
        let orchestrator = Orchestrator::new(classifier, config).unwrap();
        let out = orchestrator.process(&[Record::new(1, "Andy Wheeler St")]);
        assert!(out[0].is_failed());
        assert_eq!(out[0].text, "Andy Wheeler St");
        assert_eq!(out[0].mentions.len(), 2);
    }

    #[test]
    fn overlap_under_priority_policy_keeps_name() {
        let classifier = StubClassifier::new(&[("Andy Wheeler", "PATIENT"), ("Wheeler St", "GEO")]);
        let orchestrator = Orchestrator::new(classifier, PipelineConfig::default()).unwrap();
        let out = orchestrator.process(&[Record::new(1, "Andy Wheeler St")]);
        assert_eq!(out[0].text, "PersonName1 St");
        assert_eq!(out[0].dropped_mentions, 1);
    }

    /// Returns fixed entities whatever the text.
    struct Fixed(Vec<RawEntity>);

    impl Classifier for Fixed {
        fn classify(&self, _text: &str) -> std::result::Result<Vec<RawEntity>, ClassifierError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn malformed_spans_are_counted() {
        let classifier = Fixed(vec![
            RawEntity::new("PATIENT", "Andy", 0, 4, 0.9),
            RawEntity::new("GEO", "Kansas", 20, 99, 0.9),
            RawEntity::new("GEO", "home", 10, 10, 0.9),
        ]);
        let orchestrator = Orchestrator::new(classifier, PipelineConfig::default()).unwrap();
        let (out, summary) = orchestrator.process_with_summary(&[Record::new(1, "Andy went home")]);
        assert_eq!(out[0].text, "PersonName1 went home");
        assert_eq!(out[0].dropped_mentions, 2);
        assert_eq!(out[0].mentions.len(), 1);
        assert_eq!(out[0].mentions_in(Category::Geo).count(), 0);
        assert_eq!(summary.dropped_mentions, 2);
        assert_eq!(summary.mentions, 1);
    }

    #[test]
    fn out_of_range_mentions_do_not_take_canonical_ids() {
        let classifier = Fixed(vec![
            RawEntity::new("PATIENT", "Andy", 50, 54, 0.9),
            RawEntity::new("PATIENT", "Scott Jacques", 0, 13, 0.9),
        ]);
        let orchestrator = Orchestrator::new(classifier, PipelineConfig::default()).unwrap();
        let out = orchestrator.process(&[Record::new(1, "Scott Jacques left")]);
        assert_eq!(out[0].text, "PersonName1 left");
        assert_eq!(out[0].dropped_mentions, 1);
        let labels: Vec<_> = out[0]
            .mentions
            .iter()
            .map(|m| (m.mention.text.as_str(), m.label.as_str()))
            .collect();
        assert_eq!(labels, vec![("Scott Jacques", "PersonName1")]);
    }

    #[test]
    fn precomputed_output_stays_with_its_record() {
        let records = vec![
            Record::new(1, "hi Andy")
                .with_entities(vec![RawEntity::new("PATIENT", "Andy", 3, 7, 0.9)]),
            Record::new(2, "hi Andy").with_entities(Vec::new()),
        ];
        let orchestrator =
            Orchestrator::new(PrecomputedClassifier::new(), PipelineConfig::default()).unwrap();
        let out = orchestrator.process(&records);
        assert_eq!(out[0].text, "hi PersonName1");
        assert_eq!(out[0].mentions.len(), 1);
        assert_eq!(out[1].text, "hi Andy");
        assert!(out[1].mentions.is_empty());
        assert!(out.iter().all(|r| !r.is_failed()));
    }

    #[test]
    fn invalid_threshold_is_rejected_at_construction() {
        let config = PipelineConfig {
            match_threshold: 1.5,
            ..Default::default()
        };
        let err = Orchestrator::new(names(), config).err().unwrap();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
