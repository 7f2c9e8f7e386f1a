//! Item orchestrator: the per-item state machine
//!
//! `Init` derives the identity, `Attempting` runs the slot pipeline and
//! offers the resulting signature to the registry, and the item ends either
//! `Accepted` or `Exhausted`. Duplicates loop back into `Attempting` with the
//! same sampler, so every retry draws fresh values from the same seed.

use serde::{Deserialize, Serialize};
use shared::{item_debug, item_info, item_warn};
use std::fmt;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::GeneratorConfig;
use crate::core::{resolve, Assignment, Attribute, FinalizeFlag, Identity, ItemHint, LayerPath, Sampler, Signature};
use crate::error::GeneratorResult;
use crate::traits::SignatureRegistry;

/// Why an item ended without an accepted assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExhaustReason {
    /// Reserved or placeholder rarity tier, never resolved
    ReservedTier,
    /// No metadata record or no species for the item
    MissingIdentity,
    /// Every attempt produced a signature that was already taken
    RetryBudget { attempts: u32 },
    /// The batch was winding down when a duplicate came up
    Finalized { attempts: u32 },
}

impl fmt::Display for ExhaustReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustReason::ReservedTier => write!(f, "reserved rarity tier"),
            ExhaustReason::MissingIdentity => write!(f, "missing identity metadata"),
            ExhaustReason::RetryBudget { attempts } => write!(f, "no unique combination after {attempts} attempts"),
            ExhaustReason::Finalized { attempts } => write!(f, "finalized after {attempts} attempts"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    Init,
    Attempting { attempt: u32 },
    Accepted,
    Exhausted(ExhaustReason),
}

impl ItemState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemState::Accepted | ItemState::Exhausted(_))
    }
}

/// Accepted item, ready for rendering and metadata
#[derive(Debug, Clone)]
pub struct GeneratedItem {
    pub identity: Identity,
    pub assignment: Assignment,
    pub signature: Signature,
    /// Attempt that produced the accepted signature, starting at 1
    pub attempts: u32,
}

impl GeneratedItem {
    pub fn index(&self) -> u32 {
        self.identity.index
    }

    pub fn layer_paths(&self) -> Vec<LayerPath> {
        self.assignment.layer_paths()
    }

    /// Layer attributes plus species and rarity
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attributes = self.assignment.attributes();
        attributes.push(Attribute {
            trait_type: "Species".to_string(),
            value: self.identity.species.as_str().to_string(),
        });
        attributes.push(Attribute {
            trait_type: "Rarity".to_string(),
            value: self.identity.rarity.as_str().to_string(),
        });
        attributes.sort();
        attributes.dedup();
        attributes
    }
}

#[derive(Debug, Clone)]
pub enum ItemOutcome {
    Accepted(GeneratedItem),
    Exhausted { index: u32, reason: ExhaustReason },
}

pub struct ItemOrchestrator<'a, R: SignatureRegistry + ?Sized> {
    catalog: &'a Catalog,
    registry: &'a R,
    config: &'a GeneratorConfig,
    finalize: FinalizeFlag,
    state: ItemState,
}

impl<'a, R: SignatureRegistry + ?Sized> ItemOrchestrator<'a, R> {
    pub fn new(catalog: &'a Catalog, registry: &'a R, config: &'a GeneratorConfig, finalize: FinalizeFlag) -> Self {
        Self {
            catalog,
            registry,
            config,
            finalize,
            state: ItemState::Init,
        }
    }

    pub fn state(&self) -> &ItemState {
        &self.state
    }

    fn exhaust(&mut self, index: u32, reason: ExhaustReason) -> ItemOutcome {
        self.state = ItemState::Exhausted(reason.clone());
        ItemOutcome::Exhausted { index, reason }
    }

    /// Drive item `index` to a terminal state
    ///
    /// Authoring errors (no droplet or body) abort with an error instead of
    /// exhausting the item.
    pub fn run(&mut self, index: u32, hint: Option<ItemHint>) -> GeneratorResult<ItemOutcome> {
        self.state = ItemState::Init;

        let Some(hint) = hint else {
            item_warn!(index, "🔍 No metadata record, skipping");
            return Ok(self.exhaust(index, ExhaustReason::MissingIdentity));
        };
        if hint.rarity.is_unassignable() {
            item_info!(index, "⏭️ Reserved tier {}, no traits assigned", hint.rarity);
            return Ok(self.exhaust(index, ExhaustReason::ReservedTier));
        }
        let Some(species) = hint.species else {
            item_warn!(index, "🔍 Metadata record has no species, skipping");
            return Ok(self.exhaust(index, ExhaustReason::MissingIdentity));
        };

        let seed = hint.seed.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut sampler = Sampler::with_finalize(seed, self.finalize.clone());
        let identity = Identity::derive(index, hint.rarity, species, &self.config.identity, &mut sampler);
        item_debug!(
            index,
            "🧬 Identity {} {} {} {} hair={}",
            identity.species.as_str(),
            identity.gender.as_str(),
            identity.category.as_str(),
            identity.rarity,
            identity.has_hair
        );

        for attempt in 1..=self.config.max_attempts {
            self.state = ItemState::Attempting { attempt };

            let assignment = resolve(self.catalog, &identity, &mut sampler)?;
            let signature = assignment.signature();

            if self.registry.try_insert(&signature) {
                self.state = ItemState::Accepted;
                item_debug!(index, "✅ Accepted on attempt {}", attempt);
                return Ok(ItemOutcome::Accepted(GeneratedItem {
                    identity,
                    assignment,
                    signature,
                    attempts: attempt,
                }));
            }

            item_debug!(index, "♻️ Duplicate signature on attempt {}", attempt);
            if self.finalize.is_raised() {
                item_warn!(index, "🛑 Finalizing, giving up after {} attempts", attempt);
                return Ok(self.exhaust(index, ExhaustReason::Finalized { attempts: attempt }));
            }
        }

        let attempts = self.config.max_attempts;
        item_warn!(index, "❌ Failed to generate a unique item after {} attempts", attempts);
        Ok(self.exhaust(index, ExhaustReason::RetryBudget { attempts }))
    }
}
