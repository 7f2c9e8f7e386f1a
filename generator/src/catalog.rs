//! In-memory option catalog: every slot pool, loaded once per run

use serde::{Deserialize, Serialize};
use shared::OptionPool;
use std::collections::HashMap;
use std::fmt;

use crate::error::{GeneratorError, GeneratorResult};

/// Identifier of one pool in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolId {
    Droplets,
    DropletsBack,
    DropletsBackTransparent,
    Backgrounds,
    BackgroundAccents,
    Auras,
    AurasFront,
    Wings,
    Weapons,
    WeaponsBack,
    Bodies,
    ElvenEars,
    Tails,
    Hats,
    EarlessHats,
    Facegears,
    Eyes,
    Glasses,
    Noses,
    Hairs,
    HairsBack,
    Clothes,
    Hands,
    Mouths,
    Earrings,
    Stackables,
    StackablesBack,
}

impl PoolId {
    /// Pools without which no item can be resolved
    pub const MANDATORY: [PoolId; 2] = [PoolId::Droplets, PoolId::Bodies];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolId::Droplets => "droplets",
            PoolId::DropletsBack => "droplets_back",
            PoolId::DropletsBackTransparent => "droplets_back_transparent",
            PoolId::Backgrounds => "backgrounds",
            PoolId::BackgroundAccents => "background_accents",
            PoolId::Auras => "auras",
            PoolId::AurasFront => "auras_front",
            PoolId::Wings => "wings",
            PoolId::Weapons => "weapons",
            PoolId::WeaponsBack => "weapons_back",
            PoolId::Bodies => "bodies",
            PoolId::ElvenEars => "elven_ears",
            PoolId::Tails => "tails",
            PoolId::Hats => "hats",
            PoolId::EarlessHats => "earless_hats",
            PoolId::Facegears => "facegears",
            PoolId::Eyes => "eyes",
            PoolId::Glasses => "glasses",
            PoolId::Noses => "noses",
            PoolId::Hairs => "hairs",
            PoolId::HairsBack => "hairs_back",
            PoolId::Clothes => "clothes",
            PoolId::Hands => "hands",
            PoolId::Mouths => "mouths",
            PoolId::Earrings => "earrings",
            PoolId::Stackables => "stackables",
            PoolId::StackablesBack => "stackables_back",
        }
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static EMPTY_POOL: OptionPool = OptionPool::empty();

/// Read-only pools shared by every worker
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pools: HashMap<PoolId, OptionPool>,
}

impl Catalog {
    /// Build a catalog, requiring the mandatory pools to be present
    pub fn from_pools(pools: HashMap<PoolId, OptionPool>) -> GeneratorResult<Self> {
        if let Some(missing) = PoolId::MANDATORY.iter().find(|id| !pools.contains_key(id)) {
            return Err(GeneratorError::MissingPool {
                pool: missing.to_string(),
            });
        }
        Ok(Self { pools })
    }

    /// Pool for `id`; absent optional pools read as empty
    pub fn pool(&self, id: PoolId) -> &OptionPool {
        self.pools.get(&id).unwrap_or(&EMPTY_POOL)
    }

    pub fn insert(&mut self, id: PoolId, pool: OptionPool) {
        self.pools.insert(id, pool);
    }

    pub fn option_count(&self) -> usize {
        self.pools.values().map(OptionPool::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TraitOption;

    #[test]
    fn test_mandatory_pools_are_required() {
        let mut pools = HashMap::new();
        pools.insert(PoolId::Droplets, OptionPool::new(vec![TraitOption::new("1D", "Common")]));

        let err = Catalog::from_pools(pools.clone()).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingPool { ref pool } if pool == "bodies"));

        pools.insert(PoolId::Bodies, OptionPool::default());
        let catalog = Catalog::from_pools(pools).unwrap();
        assert_eq!(catalog.option_count(), 1);
        assert!(catalog.pool(PoolId::Hats).is_empty());
    }

    #[test]
    fn test_pool_ids_use_snake_case() {
        let id: PoolId = serde_json::from_str("\"droplets_back_transparent\"").unwrap();
        assert_eq!(id, PoolId::DropletsBackTransparent);
        assert_eq!(serde_json::to_string(&PoolId::EarlessHats).unwrap(), "\"earless_hats\"");
    }
}
