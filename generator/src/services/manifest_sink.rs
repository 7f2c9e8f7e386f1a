//! File-backed render sink
//!
//! Writes one render manifest and one metadata document per accepted item,
//! plus the usage table once the batch is done.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::{Attribute, UsageTable};
use crate::error::GeneratorResult;
use crate::orchestrator::GeneratedItem;
use crate::traits::RenderSink;
use shared::item_debug;

/// Ordered layer images for the compositor
#[derive(Debug, Serialize)]
struct RenderManifest<'a> {
    token_id: u32,
    signature: &'a str,
    layers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ItemMetadata<'a> {
    token_id: u32,
    seed: &'a str,
    species: &'static str,
    gender: &'static str,
    category: &'static str,
    rarity: &'static str,
    attributes: Vec<Attribute>,
    generated_at: String,
}

pub struct ManifestSink {
    base_dir: PathBuf,
}

impl ManifestSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn manifest_path(&self, index: u32) -> PathBuf {
        self.base_dir.join("manifests").join(format!("{index}.json"))
    }

    pub fn metadata_path(&self, index: u32) -> PathBuf {
        self.base_dir.join("metadata").join(format!("{index}.json"))
    }

    pub fn usage_path(&self) -> PathBuf {
        self.base_dir.join("rarity.json")
    }

    async fn write_json<T: Serialize>(path: &Path, value: &T) -> GeneratorResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl RenderSink for ManifestSink {
    async fn submit(&self, item: &GeneratedItem) -> GeneratorResult<()> {
        let index = item.index();
        let identity = &item.identity;

        let manifest = RenderManifest {
            token_id: index,
            signature: item.signature.as_str(),
            layers: item.layer_paths().iter().map(|path| path.relative_path()).collect(),
        };
        Self::write_json(&self.manifest_path(index), &manifest).await?;

        let metadata = ItemMetadata {
            token_id: index,
            seed: &identity.seed,
            species: identity.species.as_str(),
            gender: identity.gender.as_str(),
            category: identity.category.as_str(),
            rarity: identity.rarity.as_str(),
            attributes: item.attributes(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        };
        Self::write_json(&self.metadata_path(index), &metadata).await?;

        item_debug!(index, "💾 Wrote manifest and metadata");
        Ok(())
    }

    async fn finish(&self, usage: &UsageTable) -> GeneratorResult<()> {
        Self::write_json(&self.usage_path(), usage).await?;
        tracing::info!(path = %self.usage_path().display(), "📊 Wrote usage table");
        Ok(())
    }
}
