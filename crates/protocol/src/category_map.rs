use crate::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static mapping from raw classifier labels to consolidated categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap {
    labels: BTreeMap<String, Category>,
}

impl CategoryMap {
    pub fn empty() -> Self {
        Self {
            labels: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, raw: impl Into<String>, category: Category) -> &mut Self {
        self.labels.insert(raw.into(), category);
        self
    }

    /// Resolve a raw label. Tries the exact key, then the upper-cased key with
    /// any `B-`/`I-` tagging prefix removed, then a category name.
    pub fn resolve(&self, raw: &str) -> Option<Category> {
        if let Some(category) = self.labels.get(raw) {
            return Some(*category);
        }
        let bare = raw
            .strip_prefix("B-")
            .or_else(|| raw.strip_prefix("I-"))
            .unwrap_or(raw);
        self.labels
            .get(&bare.to_ascii_uppercase())
            .copied()
            .or_else(|| bare.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for CategoryMap {
    /// Labels produced by clinical de-identification taggers.
    fn default() -> Self {
        let mut map = Self::empty();
        map.insert("PATIENT", Category::PersonName)
            .insert("HCW", Category::PersonName)
            .insert("ID", Category::IdentNumber)
            .insert("SSN", Category::IdentNumber)
            .insert("PHONE", Category::Contact)
            .insert("FAX", Category::Contact)
            .insert("EMAIL", Category::Contact)
            .insert("DATE", Category::Date)
            .insert("GEO", Category::Geo)
            .insert("HOSPITAL", Category::Geo)
            .insert("WEB", Category::Web);
        map
    }
}
