//! Asynchronous per-option usage counting
//!
//! Accepted items publish one event per filled layer onto an unbounded
//! channel. A background task folds the events into a table guarded by its
//! own lock, so counting never contends with signature acceptance.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use super::assignment::Assignment;
use crate::error::GeneratorResult;

/// Folder -> display value -> number of accepted items using it
pub type UsageTable = BTreeMap<String, BTreeMap<String, u64>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEvent {
    pub folder: String,
    pub value: String,
}

/// Cloneable handle workers publish usage through
#[derive(Debug, Clone)]
pub struct UsageRecorder {
    sender: mpsc::UnboundedSender<UsageEvent>,
}

impl UsageRecorder {
    pub fn record(&self, assignment: &Assignment) {
        for (layer, option) in assignment.iter() {
            let event = UsageEvent {
                folder: layer.folder().to_string(),
                value: option.value.clone(),
            };
            if self.sender.send(event).is_err() {
                tracing::debug!("Usage aggregator already stopped, dropping event");
                return;
            }
        }
    }
}

/// Background consumer of usage events
pub struct UsageAggregator {
    sender: mpsc::UnboundedSender<UsageEvent>,
    table: Arc<Mutex<UsageTable>>,
    task: JoinHandle<()>,
}

impl UsageAggregator {
    /// Start the consumer task on the current runtime
    pub fn spawn() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<UsageEvent>();
        let table = Arc::new(Mutex::new(UsageTable::new()));

        let task_table = Arc::clone(&table);
        let task = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                let mut table = task_table.lock().await;
                *table
                    .entry(event.folder)
                    .or_default()
                    .entry(event.value)
                    .or_default() += 1;
            }
        });

        Self { sender, table, task }
    }

    pub fn recorder(&self) -> UsageRecorder {
        UsageRecorder {
            sender: self.sender.clone(),
        }
    }

    /// Counts folded so far; events still queued are not included
    pub async fn snapshot(&self) -> UsageTable {
        self.table.lock().await.clone()
    }

    /// Drain the queue and return the final table
    ///
    /// Every recorder handed out must be dropped first, otherwise the
    /// consumer keeps waiting for more events.
    pub async fn finish(self) -> GeneratorResult<UsageTable> {
        let UsageAggregator { sender, table, task } = self;
        drop(sender);
        task.await?;
        let table = table.lock().await;
        Ok(table.clone())
    }
}
