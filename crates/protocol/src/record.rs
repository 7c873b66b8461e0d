use crate::{Category, LabeledMention, RawEntity};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Input unit: an identified piece of free text plus passthrough columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Value,

    /// Missing or `null` text reads as an empty string
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,

    /// Classifier output already attached to the record, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<RawEntity>>,

    /// Every other column, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<Value>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            entities: None,
            extra: Map::new(),
        }
    }

    pub fn with_entities(mut self, entities: Vec<RawEntity>) -> Self {
        self.entities = Some(entities);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Text rewritten (possibly with zero replacements)
    Masked,
    /// Classification or masking failed; text is the original
    Failed,
}

/// Output keys that a passthrough column may not shadow
const OUTPUT_FIELDS: [&str; 6] = ["id", "text", "status", "error", "mentions", "dropped_mentions"];

fn passthrough(record: &Record) -> Map<String, Value> {
    record
        .extra
        .iter()
        .filter(|(key, _)| !OUTPUT_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Output unit: rewritten text plus the labeled mentions kept for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MaskedRecord {
    pub id: Value,
    pub text: String,
    pub status: RecordStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub mentions: Vec<LabeledMention>,

    /// Mentions rejected as malformed or losing an overlap
    #[serde(default)]
    pub dropped_mentions: usize,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MaskedRecord {
    pub fn masked(
        record: &Record,
        text: String,
        mentions: Vec<LabeledMention>,
        dropped_mentions: usize,
    ) -> Self {
        Self {
            id: record.id.clone(),
            text,
            status: RecordStatus::Masked,
            error: None,
            mentions,
            dropped_mentions,
            extra: passthrough(record),
        }
    }

    /// Original text passed through with an error flag.
    pub fn failed(
        record: &Record,
        mentions: Vec<LabeledMention>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            status: RecordStatus::Failed,
            error: Some(error.into()),
            mentions,
            dropped_mentions: 0,
            extra: passthrough(record),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == RecordStatus::Failed
    }

    pub fn mentions_in(&self, category: Category) -> impl Iterator<Item = &LabeledMention> {
        self.mentions
            .iter()
            .filter(move |m| m.category() == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mention;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn record_keeps_extra_columns() {
        let record: Record =
            serde_json::from_value(json!({"id": 7, "text": "hi", "channel": "sms"})).unwrap();
        assert_eq!(record.id, json!(7));
        assert_eq!(record.extra.get("channel"), Some(&json!("sms")));
        assert!(record.entities.is_none());
    }

    #[test]
    fn null_text_reads_as_empty() {
        let record: Record = serde_json::from_value(json!({"id": "a", "text": null})).unwrap();
        assert_eq!(record.text, "");
        let record: Record = serde_json::from_value(json!({"id": "b"})).unwrap();
        assert_eq!(record.text, "");
    }

    #[test]
    fn failed_record_passes_original_text() {
        let record = Record::new(1, "Andy called").with_extra("channel", "chat");
        let out = MaskedRecord::failed(&record, Vec::new(), "classifier offline");
        assert!(out.is_failed());
        assert_eq!(out.text, "Andy called");
        assert_eq!(out.extra.get("channel"), Some(&json!("chat")));

        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "classifier offline");
        assert_eq!(value["channel"], "chat");
    }

    #[test]
    fn passthrough_columns_never_shadow_output_fields() {
        let record: Record = serde_json::from_value(json!({
            "id": 1,
            "text": "hi",
            "status": "new",
            "mentions": 3,
            "channel": "sms",
        }))
        .unwrap();
        let out = MaskedRecord::masked(&record, "hi".into(), Vec::new(), 0);
        assert_eq!(out.extra.len(), 1);

        let line = serde_json::to_string(&out).unwrap();
        assert_eq!(line.matches("\"status\"").count(), 1);
        assert_eq!(line.matches("\"mentions\"").count(), 1);
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["status"], "masked");
        assert_eq!(value["channel"], "sms");
    }

    #[test]
    fn mentions_in_filters_by_category() {
        let record = Record::new(1, "x");
        let mentions = vec![
            Mention::new("Andy", Category::PersonName, 0, 4, 0.9).with_label("PersonName1"),
            Mention::new("555-1234", Category::Contact, 5, 13, 0.9).with_label("Contact1"),
        ];
        let out = MaskedRecord::masked(&record, "x".into(), mentions, 0);
        let names: Vec<_> = out
            .mentions_in(Category::PersonName)
            .map(|m| m.label.as_str())
            .collect();
        assert_eq!(names, vec!["PersonName1"]);
    }
}
