//! Uniqueness tracking for combination signatures
//!
//! The registry is the single source of truth for which signatures have been
//! accepted. Workers share it behind an `Arc` and only ever hold its lock for
//! one check-and-insert.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use super::assignment::Signature;
use crate::traits::SignatureRegistry;

/// Statistics about registry traffic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniquenessStats {
    pub total_checks: u64,
    pub accepted: u64,
    pub duplicates: u64,
}

#[derive(Debug, Default)]
struct RegistryState {
    signatures: HashSet<Signature>,
    stats: UniquenessStats,
}

/// Set of all accepted signatures of a batch
#[derive(Debug, Default)]
pub struct UniquenessRegistry {
    state: Mutex<RegistryState>,
}

impl UniquenessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with already taken signatures
    pub fn with_signatures(signatures: impl IntoIterator<Item = Signature>) -> Self {
        let registry = Self::new();
        registry.lock().signatures.extend(signatures);
        registry
    }

    // A worker that panicked mid-insert leaves a consistent set behind
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.lock().signatures.contains(signature)
    }

    pub fn len(&self) -> usize {
        self.lock().signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> UniquenessStats {
        self.lock().stats.clone()
    }
}

impl SignatureRegistry for UniquenessRegistry {
    fn try_insert(&self, signature: &Signature) -> bool {
        let mut state = self.lock();
        state.stats.total_checks += 1;
        if state.signatures.insert(signature.clone()) {
            state.stats.accepted += 1;
            true
        } else {
            state.stats.duplicates += 1;
            false
        }
    }
}
