use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Consolidated entity category.
///
/// Variants are declared in processing order: when two mentions compete for
/// the same text, the one whose category comes later wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Category {
    Date,
    Web,
    Contact,
    Geo,
    IdentNumber,
    PersonName,
}

impl Category {
    /// All categories in processing order.
    pub const ALL: [Category; 6] = [
        Category::Date,
        Category::Web,
        Category::Contact,
        Category::Geo,
        Category::IdentNumber,
        Category::PersonName,
    ];

    /// Categories rewritten in the output text unless configured otherwise.
    pub const DEFAULT_MASKED: [Category; 4] = [
        Category::Contact,
        Category::Geo,
        Category::IdentNumber,
        Category::PersonName,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Date => "Date",
            Category::Web => "Web",
            Category::Contact => "Contact",
            Category::Geo => "Geo",
            Category::IdentNumber => "IdentNumber",
            Category::PersonName => "PersonName",
        }
    }

    /// Position in the processing order (0 = processed first, lowest precedence).
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Placeholder token for the given canonical id, e.g. `PersonName3`.
    pub fn label(self, id: usize) -> String {
        format!("{}{}", self.as_str(), id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
