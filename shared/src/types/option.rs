//! Option model: a single selectable value for a slot and its pool

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use super::identity::{Category, Gender, Species, SpeciesLock};
use crate::errors::SharedError;

/// Authored target weight of an option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Distribution {
    /// Explicit percentage, e.g. "12.5%"
    Percent(f64),
    /// "ALREADY REVEALED", counts as 100%
    Revealed,
    /// Blank cell, shares whatever the explicit weights leave over
    #[default]
    Unspecified,
}

impl Distribution {
    pub const REVEALED: &'static str = "ALREADY REVEALED";

    /// Explicit weight in percent, `None` when the cell was blank
    pub fn explicit_percentage(&self) -> Option<f64> {
        match self {
            Distribution::Percent(value) => Some(*value),
            Distribution::Revealed => Some(100.0),
            Distribution::Unspecified => None,
        }
    }

    /// Weight used for opt-out draws; blank means never opt out
    pub fn percentage(&self) -> f64 {
        self.explicit_percentage().unwrap_or(0.0)
    }
}

impl FromStr for Distribution {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Distribution::Unspecified);
        }
        if s == Self::REVEALED {
            return Ok(Distribution::Revealed);
        }
        if !s.contains('%') {
            return Err(SharedError::InvalidDistribution { value: s.to_string() });
        }

        let number = s.replacen('%', "", 1);
        let number = number.trim();
        if number.is_empty() {
            return Ok(Distribution::Percent(0.0));
        }

        match number.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(Distribution::Percent(value)),
            _ => Err(SharedError::InvalidDistribution { value: s.to_string() }),
        }
    }
}

/// Immutable candidate for one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitOption {
    /// Stable asset key
    pub file: String,
    /// Display value, also the unit of the combination signature
    pub value: String,
    pub categories: Vec<Category>,
    /// `None` places no gender restriction
    pub gender: Option<Gender>,
    /// Selecting this option triggers a companion lookup
    pub combined: bool,
    pub must_not_include: Vec<String>,
    pub species_locked: Vec<SpeciesLock>,
    pub distribution: Distribution,
    pub must_include: Vec<String>,
    pub rarity_locked: bool,
    /// Can pair with a stackable accessory
    pub stackable: bool,
    /// Only pairs with the halo and horn accessories
    pub halo_and_horns_only: bool,
}

impl TraitOption {
    pub fn new(file: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            value: value.into(),
            categories: Vec::new(),
            gender: None,
            combined: false,
            must_not_include: Vec::new(),
            species_locked: Vec::new(),
            distribution: Distribution::Unspecified,
            must_include: Vec::new(),
            rarity_locked: false,
            stackable: false,
            halo_and_horns_only: false,
        }
    }

    pub fn with_categories(mut self, categories: &[Category]) -> Self {
        self.categories = categories.to_vec();
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_locks(mut self, locks: &[SpeciesLock]) -> Self {
        self.species_locked = locks.to_vec();
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn weighted(self, percent: f64) -> Self {
        self.with_distribution(Distribution::Percent(percent))
    }

    pub fn forbidding(mut self, tag: &str) -> Self {
        self.must_not_include.push(tag.to_string());
        self
    }

    pub fn requiring(mut self, tag: &str) -> Self {
        self.must_include.push(tag.to_string());
        self
    }

    pub fn as_combined(mut self) -> Self {
        self.combined = true;
        self
    }

    pub fn as_rarity_locked(mut self) -> Self {
        self.rarity_locked = true;
        self
    }

    pub fn as_stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    pub fn as_halo_and_horns_only(mut self) -> Self {
        self.halo_and_horns_only = true;
        self
    }

    /// Whether the must-not-include tags name `tag`
    pub fn forbids(&self, tag: &str) -> bool {
        self.must_not_include.iter().any(|t| t == tag)
    }

    /// Whether the must-include tags name `tag`
    pub fn requires(&self, tag: &str) -> bool {
        self.must_include.iter().any(|t| t == tag)
    }

    pub fn has_lock(&self, lock: SpeciesLock) -> bool {
        self.species_locked.contains(&lock)
    }

    pub fn locked_to(&self, species: Species) -> bool {
        self.has_lock(SpeciesLock::Only(species))
    }

    pub fn in_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Ordered options of one slot side plus its opt-out option
#[derive(Debug, Clone, Default)]
pub struct OptionPool {
    options: Vec<Arc<TraitOption>>,
    na: Option<Arc<TraitOption>>,
}

impl OptionPool {
    pub const fn empty() -> Self {
        Self {
            options: Vec::new(),
            na: None,
        }
    }

    pub fn new(options: Vec<TraitOption>) -> Self {
        Self {
            options: options.into_iter().map(Arc::new).collect(),
            na: None,
        }
    }

    pub fn with_na(mut self, na: TraitOption) -> Self {
        self.na = Some(Arc::new(na));
        self
    }

    pub fn push(&mut self, option: TraitOption) {
        self.options.push(Arc::new(option));
    }

    pub fn set_na(&mut self, na: TraitOption) {
        self.na = Some(Arc::new(na));
    }

    pub fn options(&self) -> &[Arc<TraitOption>] {
        &self.options
    }

    pub fn na(&self) -> Option<&TraitOption> {
        self.na.as_deref()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// First option whose display value equals `value`
    pub fn find_by_value(&self, value: &str) -> Option<Arc<TraitOption>> {
        self.options.iter().find(|option| option.value == value).cloned()
    }

    /// First option whose display value contains `fragment`
    pub fn find_containing(&self, fragment: &str) -> Option<Arc<TraitOption>> {
        self.options
            .iter()
            .find(|option| option.value.contains(fragment))
            .cloned()
    }
}
