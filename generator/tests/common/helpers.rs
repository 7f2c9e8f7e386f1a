//! Test helpers to reduce boilerplate across suites

use generator::core::{Attribute, Identity, ItemHint};
use generator::services::{CollectingSink, JsonIdentitySource, TokenRecord};
use generator::{BatchRunner, GeneratedItem, GeneratorConfig};
use shared::{Category, Gender, Rarity, Species};
use std::collections::HashSet;

use super::fixtures::TestFixtures;

pub struct TestHelpers;

impl TestHelpers {
    pub fn identity(species: Species, gender: Gender, category: Category, rarity: Rarity, seed: &str) -> Identity {
        Identity {
            index: 1,
            species,
            gender,
            category,
            rarity,
            has_hair: true,
            seed: seed.to_string(),
        }
    }

    pub fn hint(species: Species, rarity: Rarity, seed: &str) -> ItemHint {
        ItemHint::new(rarity, species).with_seed(seed)
    }

    /// Token record as published in the metadata feed
    pub fn record(token_id: u32, rarity: Rarity, species: Species) -> TokenRecord {
        TokenRecord {
            token_id,
            seed: Some(format!("seed-{token_id}")),
            attributes: vec![
                Attribute {
                    trait_type: "Rarity".to_string(),
                    value: rarity.as_str().to_string(),
                },
                Attribute {
                    trait_type: "Species".to_string(),
                    value: species.as_str().to_string(),
                },
            ],
        }
    }

    /// Records `1..=count` cycling through every species on Common rarity
    pub fn records(count: u32) -> Vec<TokenRecord> {
        (1..=count)
            .map(|token_id| {
                let species = Species::ALL[(token_id as usize) % Species::ALL.len()];
                Self::record(token_id, Rarity::Common, species)
            })
            .collect()
    }

    pub fn runner(
        records: Vec<TokenRecord>,
        config: GeneratorConfig,
    ) -> BatchRunner<JsonIdentitySource, CollectingSink> {
        BatchRunner::new(
            TestFixtures::catalog(),
            JsonIdentitySource::from_records(records),
            CollectingSink::new(),
            config,
        )
        .unwrap()
    }

    /// Assert that no two items share a combination signature
    pub fn assert_unique(items: &[GeneratedItem]) {
        let mut seen = HashSet::new();
        for item in items {
            assert!(
                seen.insert(item.signature.clone()),
                "duplicate signature {} on item {}",
                item.signature,
                item.index()
            );
        }
    }
}
