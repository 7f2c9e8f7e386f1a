//! Batch scheduler
//!
//! Items run on a bounded pool of workers. Each worker fetches the item's
//! metadata, runs the synchronous orchestrator on the blocking pool and hands
//! accepted items to the sink. Usage counting happens off the critical path.

use serde::{Deserialize, Serialize};
use shared::logging;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::catalog::Catalog;
use crate::config::GeneratorConfig;
use crate::core::{FinalizeFlag, UniquenessRegistry, UsageAggregator, UsageTable};
use crate::error::GeneratorResult;
use crate::orchestrator::{ExhaustReason, ItemOrchestrator, ItemOutcome};
use crate::traits::{IdentitySource, RenderSink};

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Indices of accepted items, ascending
    pub accepted: Vec<u32>,
    /// Indices of exhausted items with their reason, ascending
    pub exhausted: Vec<(u32, ExhaustReason)>,
    pub usage: UsageTable,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.exhausted.len()
    }
}

pub struct BatchRunner<I, S>
where
    I: IdentitySource + 'static,
    S: RenderSink + 'static,
{
    catalog: Arc<Catalog>,
    identities: Arc<I>,
    sink: Arc<S>,
    registry: Arc<UniquenessRegistry>,
    config: Arc<GeneratorConfig>,
    finalize: FinalizeFlag,
}

impl<I, S> BatchRunner<I, S>
where
    I: IdentitySource + 'static,
    S: RenderSink + 'static,
{
    pub fn new(catalog: Catalog, identities: I, sink: S, config: GeneratorConfig) -> GeneratorResult<Self> {
        config.validate()?;
        Ok(Self {
            catalog: Arc::new(catalog),
            identities: Arc::new(identities),
            sink: Arc::new(sink),
            registry: Arc::new(UniquenessRegistry::new()),
            config: Arc::new(config),
            finalize: FinalizeFlag::new(),
        })
    }

    /// Share an existing registry, e.g. one seeded with earlier signatures
    pub fn with_registry(mut self, registry: Arc<UniquenessRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn finalize_flag(&self) -> FinalizeFlag {
        self.finalize.clone()
    }

    pub fn registry(&self) -> &UniquenessRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run items `1..=count`, clamped to the configured maximum
    pub async fn run(&self, count: u32) -> GeneratorResult<BatchReport> {
        let count = count.min(self.config.max_items);
        logging::log_startup(&format!(
            "batch of {} items with {} workers",
            count, self.config.max_workers
        ));
        self.run_indices((1..=count).collect()).await
    }

    /// Run exactly one item through the batch path
    pub async fn run_single(&self, index: u32) -> GeneratorResult<BatchReport> {
        self.run_indices(vec![index]).await
    }

    pub async fn run_indices(&self, indices: Vec<u32>) -> GeneratorResult<BatchReport> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));
        let aggregator = UsageAggregator::spawn();
        let mut workers = JoinSet::new();
        let mut report = BatchReport::default();

        for index in indices {
            let permit = Arc::clone(&semaphore).acquire_owned().await?;

            let catalog = Arc::clone(&self.catalog);
            let identities = Arc::clone(&self.identities);
            let sink = Arc::clone(&self.sink);
            let registry = Arc::clone(&self.registry);
            let config = Arc::clone(&self.config);
            let finalize = self.finalize.clone();
            let recorder = aggregator.recorder();

            workers.spawn(async move {
                let _permit = permit;
                let hint = identities.hint(index).await?;
                let outcome = tokio::task::spawn_blocking(move || {
                    ItemOrchestrator::new(&catalog, registry.as_ref(), &config, finalize).run(index, hint)
                })
                .await??;

                if let ItemOutcome::Accepted(item) = &outcome {
                    recorder.record(&item.assignment);
                    sink.submit(item).await?;
                }
                GeneratorResult::Ok(outcome)
            });

            // Surface failures early instead of after the whole batch is queued
            while let Some(joined) = workers.try_join_next() {
                Self::collect(&mut report, joined??);
            }
        }

        while let Some(joined) = workers.join_next().await {
            Self::collect(&mut report, joined??);
        }

        let usage = aggregator.finish().await?;
        self.sink.finish(&usage).await?;

        report.accepted.sort_unstable();
        report.exhausted.sort_by_key(|(index, _)| *index);
        report.usage = usage;

        logging::log_success(&format!(
            "Batch complete: {} accepted, {} exhausted",
            report.accepted.len(),
            report.exhausted.len()
        ));
        Ok(report)
    }

    fn collect(report: &mut BatchReport, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Accepted(item) => report.accepted.push(item.index()),
            ItemOutcome::Exhausted { index, reason } => report.exhausted.push((index, reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PoolId;
    use crate::core::ItemHint;
    use crate::traits::{MockIdentitySource, MockRenderSink};
    use shared::{Category, OptionPool, Rarity, Species, SpeciesLock, TraitOption};
    use std::collections::HashMap;

    fn catalog() -> Catalog {
        let body = |file: &str, value: &str| {
            TraitOption::new(file, value)
                .with_categories(&Category::ASSIGNABLE)
                .with_locks(&[SpeciesLock::NoSpecies])
        };
        let mut pools = HashMap::new();
        pools.insert(PoolId::Droplets, OptionPool::new(vec![TraitOption::new("5D", "Common")]));
        pools.insert(PoolId::Bodies, OptionPool::new(vec![body("1B", "Light Cyborg")]));
        Catalog::from_pools(pools).unwrap()
    }

    #[tokio::test]
    async fn test_single_option_catalog_accepts_one_item() {
        let mut identities = MockIdentitySource::new();
        identities
            .expect_hint()
            .returning(|index| Ok(Some(ItemHint::new(Rarity::Common, Species::Cyborg).with_seed(format!("seed-{index}")))));

        let mut sink = MockRenderSink::new();
        sink.expect_submit().times(1).returning(|_| Ok(()));
        sink.expect_finish()
            .withf(|usage| usage["BODIES"]["Light Cyborg"] == 1)
            .times(1)
            .returning(|_| Ok(()));

        let config = GeneratorConfig::default().with_workers(2).with_max_attempts(3);
        let runner = BatchRunner::new(catalog(), identities, sink, config).unwrap();
        let report = runner.run(3).await.unwrap();

        // Only one distinct signature exists, the other two items exhaust
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.exhausted.len(), 2);
        for (_, reason) in &report.exhausted {
            assert_eq!(reason, &ExhaustReason::RetryBudget { attempts: 3 });
        }
    }

    #[tokio::test]
    async fn test_identity_source_failure_is_surfaced() {
        let mut identities = MockIdentitySource::new();
        identities
            .expect_hint()
            .returning(|_| Err(crate::error::GeneratorError::config("metadata unavailable")));
        let mut sink = MockRenderSink::new();
        sink.expect_submit().never();
        sink.expect_finish().never();

        let runner = BatchRunner::new(catalog(), identities, sink, GeneratorConfig::default()).unwrap();
        let err = runner.run_single(1).await.unwrap_err();
        assert!(err.to_string().contains("metadata unavailable"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = GeneratorConfig::default().with_workers(0);
        let result = BatchRunner::new(catalog(), MockIdentitySource::new(), MockRenderSink::new(), config);
        assert!(result.is_err());
    }
}
