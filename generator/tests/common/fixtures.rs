//! Test fixtures: a small catalog that still exercises every pool

use generator::{Catalog, PoolId};
use shared::{Category, Gender, OptionPool, Species, SpeciesLock, TraitOption};
use std::collections::HashMap;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const SEED: &'static str = "abc";

    /// Option wearable by every category and gender, "no species" locked
    pub fn open(file: &str, value: &str) -> TraitOption {
        TraitOption::new(file, value)
            .with_categories(&Category::ASSIGNABLE)
            .with_gender(Gender::Unisex)
            .with_locks(&[SpeciesLock::NoSpecies])
    }

    /// Option wearable only by `species`
    pub fn locked(file: &str, value: &str, species: Species) -> TraitOption {
        Self::open(file, value).with_locks(&[SpeciesLock::Only(species)])
    }

    fn opt_out(percent: f64) -> TraitOption {
        TraitOption::new("NA", "NA").weighted(percent)
    }

    fn pool(options: Vec<TraitOption>) -> OptionPool {
        OptionPool::new(options)
    }

    fn pool_with_na(options: Vec<TraitOption>, percent: f64) -> OptionPool {
        OptionPool::new(options).with_na(Self::opt_out(percent))
    }

    pub fn droplet_values() -> Vec<&'static str> {
        vec!["Common", "Rare Purple", "Mythic Lavender", "Mythic Teal"]
    }

    pub fn pools() -> HashMap<PoolId, OptionPool> {
        let droplets: Vec<TraitOption> = Self::droplet_values()
            .into_iter()
            .enumerate()
            .map(|(n, value)| TraitOption::new(format!("{}D", n + 1), value))
            .collect();
        let droplets_back: Vec<TraitOption> = Self::droplet_values()
            .into_iter()
            .enumerate()
            .map(|(n, value)| TraitOption::new(format!("{}DB", n + 1), value))
            .collect();

        let mut pools = HashMap::new();
        pools.insert(PoolId::Droplets, Self::pool(droplets));
        pools.insert(PoolId::DropletsBack, Self::pool(droplets_back));
        pools.insert(
            PoolId::Backgrounds,
            Self::pool_with_na(
                vec![
                    Self::open("1BG", "Sunset"),
                    Self::open("2BG", "Forest").forbidding("SOUL"),
                    Self::open("3BG", "Nebula"),
                ],
                10.0,
            ),
        );
        pools.insert(
            PoolId::BackgroundAccents,
            Self::pool_with_na(vec![Self::open("1BGA", "Stars"), Self::open("2BGA", "Clouds")], 50.0),
        );
        pools.insert(
            PoolId::Auras,
            Self::pool_with_na(
                vec![Self::open("1A", "Flames").as_combined(), Self::open("2A", "Mist")],
                60.0,
            ),
        );
        pools.insert(PoolId::AurasFront, Self::pool(vec![TraitOption::new("1AF", "Flames")]));
        pools.insert(PoolId::Wings, Self::pool_with_na(vec![Self::open("1WG", "Feathered")], 70.0));
        pools.insert(
            PoolId::Weapons,
            Self::pool_with_na(vec![Self::open("1W", "Sword").as_combined(), Self::open("2W", "Wand")], 50.0),
        );
        pools.insert(PoolId::WeaponsBack, Self::pool(vec![TraitOption::new("1WB", "Sword")]));
        pools.insert(
            PoolId::Bodies,
            Self::pool(vec![
                Self::locked("1B", "Light Elven", Species::Elven),
                Self::locked("2B", "Dark Elven", Species::Elven),
                Self::locked("3B", "Light Being", Species::Being),
                Self::locked("9B", "Dark", Species::Being),
                Self::locked("10B", "Gray Cyborg", Species::Cyborg),
                Self::locked("11B", "Orange Feline", Species::Feline).as_combined(),
                Self::locked("12B", "Brown Monkey", Species::Monkey),
                Self::locked("13B", "Pale Soul", Species::Soul),
                Self::locked("14B", "Origin Lavender", Species::Origin),
                Self::locked("15B", "Origin Teal", Species::Origin),
                Self::locked("16B", "Origin Purple", Species::Origin),
            ]),
        );
        pools.insert(
            PoolId::ElvenEars,
            Self::pool(vec![
                TraitOption::new("1EE", "Light Elven"),
                TraitOption::new("2EE", "Dark Elven"),
            ]),
        );
        pools.insert(PoolId::Tails, Self::pool(vec![TraitOption::new("1T", "Orange Feline")]));
        pools.insert(
            PoolId::Hats,
            Self::pool_with_na(
                vec![
                    Self::open("1H", "Cap").as_stackable(),
                    Self::open("2H", "Dark Ski Mask"),
                    Self::open("3H", "Hood").forbidding("NOSE"),
                    Self::locked("4H", "Cat Beanie", Species::Feline),
                ],
                20.0,
            ),
        );
        pools.insert(
            PoolId::EarlessHats,
            Self::pool(vec![Self::open("1EH", "Bucket").as_stackable(), Self::open("2EH", "Beret")]),
        );
        pools.insert(PoolId::Facegears, Self::pool_with_na(vec![Self::open("1F", "Bandage")], 50.0));
        pools.insert(
            PoolId::Eyes,
            Self::pool_with_na(vec![Self::open("1E", "Wide"), Self::open("2E", "Sleepy")], 5.0),
        );
        pools.insert(PoolId::Glasses, Self::pool(vec![Self::open("1G", "Round").requiring("EYES")]));
        pools.insert(PoolId::Noses, Self::pool_with_na(vec![Self::open("1N", "Button")], 30.0));
        pools.insert(
            PoolId::Hairs,
            Self::pool_with_na(
                vec![
                    Self::open("1HR", "Spiky").as_stackable().as_combined(),
                    Self::open("2HR", "Braids").as_stackable().as_halo_and_horns_only(),
                    Self::open("3HR", "Bob"),
                    Self::locked("4HR", "Whiskers Tuft", Species::Feline),
                ],
                10.0,
            ),
        );
        pools.insert(PoolId::HairsBack, Self::pool(vec![TraitOption::new("1HRB", "Spiky")]));
        pools.insert(
            PoolId::Clothes,
            Self::pool_with_na(
                vec![
                    Self::open("1C", "Hoodie"),
                    Self::open("2C", "Robe"),
                    Self::open("3C", "Vest"),
                ],
                5.0,
            ),
        );
        pools.insert(
            PoolId::Hands,
            Self::pool(vec![
                TraitOption::new("1HD", "Light Elven Hands"),
                TraitOption::new("2HD", "Dark Elven Hands"),
                TraitOption::new("3HD", "Light Being Hands"),
                TraitOption::new("4HD", "Gray Cyborg Hands"),
            ]),
        );
        pools.insert(
            PoolId::Mouths,
            Self::pool_with_na(
                vec![Self::open("1M", "Grin"), Self::open("2M", "Tongue Out"), Self::open("3M", "Smirk")],
                10.0,
            ),
        );
        pools.insert(PoolId::Earrings, Self::pool(vec![Self::open("1ER", "Gold Hoop")]));
        pools.insert(
            PoolId::Stackables,
            Self::pool_with_na(
                vec![
                    Self::open("2HATSS", "Halo").as_combined(),
                    Self::open("9HATSS", "Horns"),
                    Self::open("1HATSS", "Propeller"),
                ],
                40.0,
            ),
        );
        pools.insert(PoolId::StackablesBack, Self::pool(vec![TraitOption::new("2HATSSB", "Halo")]));
        pools
    }

    pub fn catalog() -> Catalog {
        Catalog::from_pools(Self::pools()).unwrap()
    }
}
