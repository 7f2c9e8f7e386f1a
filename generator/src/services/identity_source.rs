//! JSON identity source backed by token metadata records

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{Rarity, SharedError, Species};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

use crate::core::{Attribute, ItemHint};
use crate::error::{GeneratorError, GeneratorResult};
use crate::traits::IdentitySource;

/// Token metadata record as published for each item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl TokenRecord {
    fn attribute(&self, trait_type: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.trait_type == trait_type)
            .map(|attribute| attribute.value.as_str())
    }

    /// Convert to a hint; species is matched case-insensitively
    pub fn to_hint(&self) -> Result<ItemHint, SharedError> {
        let rarity = self
            .attribute("Rarity")
            .ok_or_else(|| SharedError::invalid("rarity", ""))?
            .parse::<Rarity>()?;
        let species = self
            .attribute("Species")
            .map(|value| value.to_uppercase().parse::<Species>())
            .transpose()?;

        Ok(ItemHint {
            rarity,
            species,
            seed: self.seed.clone().filter(|seed| !seed.is_empty()),
        })
    }
}

pub struct JsonIdentitySource {
    records: HashMap<u32, TokenRecord>,
}

impl JsonIdentitySource {
    pub fn from_records(records: impl IntoIterator<Item = TokenRecord>) -> Self {
        Self {
            records: records.into_iter().map(|record| (record.token_id, record)).collect(),
        }
    }

    /// Read a JSON array of token records
    pub async fn open(path: impl AsRef<Path>) -> GeneratorResult<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        let records: Vec<TokenRecord> = serde_json::from_str(&content)?;
        tracing::info!(
            path = %path.as_ref().display(),
            records = records.len(),
            "🪪 Loaded identity metadata"
        );
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl IdentitySource for JsonIdentitySource {
    async fn hint(&self, index: u32) -> GeneratorResult<Option<ItemHint>> {
        let Some(record) = self.records.get(&index) else {
            return Ok(None);
        };
        record
            .to_hint()
            .map(Some)
            .map_err(|source| GeneratorError::InvalidHint { index, source })
    }
}
