//! # Deid Protocol
//!
//! Data model shared by every stage of the de-identification pipeline:
//! classifier output ([`RawEntity`]), consolidated [`Mention`]s and their
//! canonical labels, and the record envelopes read and written in batches.

use anyhow::Result;
use serde::Serialize;

mod category;
mod category_map;
mod mention;
mod record;

pub use category::{Category, UnknownCategory};
pub use category_map::CategoryMap;
pub use mention::{LabeledMention, Mention, RawEntity};
pub use record::{MaskedRecord, Record, RecordStatus};

/// JSON schema describing one output line.
pub fn masked_record_schema() -> Result<serde_json::Value> {
    let schema = schemars::schema_for!(MaskedRecord);
    serde_json::to_value(schema).map_err(Into::into)
}

pub fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let raw = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_output_fields() {
        let schema = masked_record_schema().unwrap();
        let properties = &schema["properties"];
        for field in ["id", "text", "status", "mentions", "dropped_mentions"] {
            assert!(properties.get(field).is_some(), "missing {field}");
        }
    }
}
