use crate::error::{PipelineError, Result};
use deid_graph::MatchThreshold;
use deid_masking::OverlapPolicy;
use deid_protocol::{Category, CategoryMap};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How surface strings of one category are grouped under a canonical id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationMode {
    /// Approximate matching over the whole batch (similarity graph)
    #[default]
    Fuzzy,

    /// Identical strings only, numbered per record in order of appearance
    Exact,
}

/// Configuration for a masking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum normalized distance for two strings to be merged
    pub match_threshold: f64,

    /// Classifier scores below this are discarded
    pub confidence_threshold: f64,

    pub consolidation: ConsolidationMode,

    pub overlap_policy: OverlapPolicy,

    /// Categories rewritten in the output text; other categories are still
    /// reported in the mention list
    pub mask_categories: Vec<Category>,

    /// Raw classifier label -> category
    pub category_map: CategoryMap,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            match_threshold: MatchThreshold::DEFAULT,
            confidence_threshold: 0.6,
            consolidation: ConsolidationMode::Fuzzy,
            overlap_policy: OverlapPolicy::CategoryPriority,
            mask_categories: Category::DEFAULT_MASKED.to_vec(),
            category_map: CategoryMap::default(),
        }
    }
}

impl PipelineConfig {
    /// Exact-match labeling, no fuzzy consolidation
    pub fn exact() -> Self {
        Self {
            consolidation: ConsolidationMode::Exact,
            ..Default::default()
        }
    }

    /// Mask every category, including dates and web addresses
    pub fn mask_all() -> Self {
        Self {
            mask_categories: Category::ALL.to_vec(),
            ..Default::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn match_threshold(&self) -> Result<MatchThreshold> {
        MatchThreshold::new(self.match_threshold).map_err(|e| PipelineError::config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.match_threshold()?;

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(PipelineError::config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }

        if self.category_map.is_empty() {
            log::debug!("Empty category_map: only category names will be recognised");
        }

        Ok(())
    }

    pub fn masks(&self, category: Category) -> bool {
        self.mask_categories.contains(&category)
    }
}
