//! Item identity: the fixed facts every slot is filtered against

use serde::{Deserialize, Serialize};
use shared::{Category, Gender, Rarity, Species};

use super::sampler::Sampler;
use crate::config::IdentityTables;

/// Authored facts about one item as provided by the identity source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemHint {
    pub rarity: Rarity,
    /// `None` when the metadata record has no species attribute
    pub species: Option<Species>,
    /// `None` when the record carries no stable seed
    pub seed: Option<String>,
}

impl ItemHint {
    pub fn new(rarity: Rarity, species: Species) -> Self {
        Self {
            rarity,
            species: Some(species),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub index: u32,
    pub species: Species,
    pub gender: Gender,
    pub category: Category,
    pub rarity: Rarity,
    /// Whether the species/gender combination draws a hair-bearing variant
    pub has_hair: bool,
    pub seed: String,
}

impl Identity {
    /// Sample category, gender and hair presence, in that order
    pub fn derive(index: u32, rarity: Rarity, species: Species, tables: &IdentityTables, sampler: &mut Sampler) -> Self {
        let category = sample_category(tables, sampler);
        let gender = if sampler.chance(tables.male_percentage) {
            Gender::Male
        } else {
            Gender::Female
        };
        let has_hair = match (species, gender) {
            (Species::Monkey, _) => false,
            (_, Gender::Female) => sampler.chance(tables.female_hair_percentage),
            _ => sampler.chance(tables.male_hair_percentage),
        };

        Self {
            index,
            species,
            gender,
            category,
            rarity,
            has_hair,
            seed: sampler.seed().to_string(),
        }
    }
}

fn sample_category(tables: &IdentityTables, sampler: &mut Sampler) -> Category {
    let draw = sampler.next_int(100);
    let mut bound = 0;
    for (category, weight) in &tables.category_weights {
        bound += u64::from(*weight);
        if draw <= bound {
            return *category;
        }
    }
    // Unreachable with a validated table; fall back to the last entry
    tables
        .category_weights
        .last()
        .map(|(category, _)| *category)
        .unwrap_or(Category::Cool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let tables = IdentityTables::default();
        let a = Identity::derive(7, Rarity::Common, Species::Elven, &tables, &mut Sampler::new("abc"));
        let b = Identity::derive(7, Rarity::Common, Species::Elven, &tables, &mut Sampler::new("abc"));
        assert_eq!(a, b);
        assert_eq!(a.seed, "abc");
        assert!(Category::ASSIGNABLE.contains(&a.category));
    }

    #[test]
    fn test_monkeys_never_have_hair() {
        let tables = IdentityTables::default();
        for n in 0..200 {
            let mut sampler = Sampler::new(format!("monkey-{n}"));
            let identity = Identity::derive(n, Rarity::Common, Species::Monkey, &tables, &mut sampler);
            assert!(!identity.has_hair);
        }
    }

    #[test]
    fn test_females_always_have_hair_with_default_tables() {
        let tables = IdentityTables {
            male_percentage: 0,
            ..IdentityTables::default()
        };
        for n in 0..200 {
            let mut sampler = Sampler::new(format!("female-{n}"));
            let identity = Identity::derive(n, Rarity::Common, Species::Being, &tables, &mut sampler);
            assert_eq!(identity.gender, Gender::Female);
            assert!(identity.has_hair);
        }
    }

    #[test]
    fn test_category_frequencies_follow_table() {
        let tables = IdentityTables::default();
        let mut sampler = Sampler::new("categories");
        let draws = 20_000;
        let cool = (0..draws)
            .filter(|_| sample_category(&tables, &mut sampler) == Category::Cool)
            .count();
        let observed = cool as f64 / draws as f64;
        assert!((observed - 0.5).abs() < 0.03, "observed {observed}");
    }
}
