//! Collaborator seams with mockall annotations for testing
//!
//! The core never touches files or metadata directly. Everything it consumes
//! or hands off goes through one of these traits so batches can be driven
//! by mocks in tests.

use crate::catalog::Catalog;
use crate::core::assignment::Signature;
use crate::core::identity::ItemHint;
use crate::core::usage::UsageTable;
use crate::error::GeneratorResult;
use crate::orchestrator::GeneratedItem;

/// Source of the option catalog, loaded once before any item runs
#[mockall::automock]
#[async_trait::async_trait]
pub trait CatalogLoader: Send + Sync {
    /// Load and validate every pool
    ///
    /// # Returns
    /// The catalog, or every authoring issue found across all rows
    async fn load(&self) -> GeneratorResult<Catalog>;
}

/// Per-item authored metadata
#[mockall::automock]
#[async_trait::async_trait]
pub trait IdentitySource: Send + Sync {
    /// Rarity, species and seed of item `index`, `None` when unknown
    async fn hint(&self, index: u32) -> GeneratorResult<Option<ItemHint>>;
}

/// Downstream consumer of accepted items
#[mockall::automock]
#[async_trait::async_trait]
pub trait RenderSink: Send + Sync {
    /// Hand off one accepted item
    async fn submit(&self, item: &GeneratedItem) -> GeneratorResult<()>;

    /// Called once after every item has been submitted
    async fn finish(&self, usage: &UsageTable) -> GeneratorResult<()>;
}

/// Atomic check-and-insert over accepted signatures
#[mockall::automock]
pub trait SignatureRegistry: Send + Sync {
    /// Insert `signature`, returning `false` if it was already taken
    fn try_insert(&self, signature: &Signature) -> bool;
}
