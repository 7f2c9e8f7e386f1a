//! In-memory render sink for dry runs and tests

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::UsageTable;
use crate::error::GeneratorResult;
use crate::orchestrator::GeneratedItem;
use crate::traits::RenderSink;

#[derive(Default)]
pub struct CollectingSink {
    items: Mutex<Vec<GeneratedItem>>,
    usage: Mutex<Option<UsageTable>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submitted items ordered by index
    pub async fn items(&self) -> Vec<GeneratedItem> {
        let mut items = self.items.lock().await.clone();
        items.sort_by_key(GeneratedItem::index);
        items
    }

    /// Usage table passed to `finish`, if it was called
    pub async fn usage(&self) -> Option<UsageTable> {
        self.usage.lock().await.clone()
    }
}

#[async_trait]
impl RenderSink for CollectingSink {
    async fn submit(&self, item: &GeneratedItem) -> GeneratorResult<()> {
        self.items.lock().await.push(item.clone());
        Ok(())
    }

    async fn finish(&self, usage: &UsageTable) -> GeneratorResult<()> {
        *self.usage.lock().await = Some(usage.clone());
        Ok(())
    }
}
