//! Generation configuration with authored defaults

use serde::{Deserialize, Serialize};
use shared::Category;

use crate::error::{GeneratorError, GeneratorResult};

/// Percentage tables used to sample the identity fields that are not
/// provided by metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityTables {
    /// Cumulative sampling order matters; weights must sum to 100
    pub category_weights: Vec<(Category, u32)>,
    pub male_percentage: u32,
    pub female_hair_percentage: u32,
    pub male_hair_percentage: u32,
}

impl Default for IdentityTables {
    fn default() -> Self {
        Self {
            category_weights: vec![
                (Category::Cool, 50),
                (Category::Spooky, 20),
                (Category::Goofy, 10),
                (Category::Cute, 20),
            ],
            male_percentage: 82,
            female_hair_percentage: 100,
            male_hair_percentage: 50,
        }
    }
}

/// Batch-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Parallel item workers
    pub max_workers: usize,
    /// Resolution attempts per item before it is exhausted
    pub max_attempts: u32,
    /// Upper bound on the batch size
    pub max_items: u32,
    pub identity: IdentityTables,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_workers: 15,
            max_attempts: 10,
            max_items: 7573,
            identity: IdentityTables::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Reject values the scheduler or sampler cannot work with
    pub fn validate(&self) -> GeneratorResult<()> {
        if self.max_workers == 0 {
            return Err(GeneratorError::config("max_workers must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(GeneratorError::config("max_attempts must be at least 1"));
        }

        let tables = &self.identity;
        let category_total: u32 = tables.category_weights.iter().map(|(_, weight)| weight).sum();
        if category_total != 100 {
            return Err(GeneratorError::config(format!(
                "category weights must sum to 100, got {category_total}"
            )));
        }
        if tables
            .category_weights
            .iter()
            .any(|(category, _)| *category == Category::NotApplicable)
        {
            return Err(GeneratorError::config("category weights cannot assign NA"));
        }
        for (field, value) in [
            ("male_percentage", tables.male_percentage),
            ("female_hair_percentage", tables.female_hair_percentage),
            ("male_hair_percentage", tables.male_hair_percentage),
        ] {
            if value > 100 {
                return Err(GeneratorError::config(format!("{field} must be at most 100, got {value}")));
            }
        }

        Ok(())
    }
}
