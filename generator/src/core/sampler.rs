//! Deterministic weighted sampler
//!
//! Every random decision of an item is drawn from one `Sampler`. A draw
//! hashes `seed + counter` with SHA-256 and reduces the leading eight bytes,
//! so the same seed always yields the same sequence of draws.

use sha2::{Digest, Sha256};
use shared::TraitOption;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 100% expressed with three decimal places
pub const FULL_SCALE: u64 = 100_000;

/// Redraws allowed when a draw lands past the last cumulative bound
pub const MAX_DRAW_RETRIES: usize = 10;

/// Batch-wide wind-down signal shared by every sampler and orchestrator
#[derive(Debug, Clone, Default)]
pub struct FinalizeFlag(Arc<AtomicBool>);

impl FinalizeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Effective percentage of each option, summing to 100 for a non-empty pool
///
/// Blank distributions share whatever the explicit weights leave over. A pool
/// whose weights sum to zero is treated as uniform.
pub fn effective_percentages(options: &[Arc<TraitOption>]) -> Vec<f64> {
    if options.is_empty() {
        return Vec::new();
    }

    let explicit: f64 = options
        .iter()
        .filter_map(|option| option.distribution.explicit_percentage())
        .sum();
    let blanks = options
        .iter()
        .filter(|option| option.distribution.explicit_percentage().is_none())
        .count();
    let blank_share = if blanks > 0 {
        (100.0 - explicit).max(0.0) / blanks as f64
    } else {
        0.0
    };

    let raw: Vec<f64> = options
        .iter()
        .map(|option| option.distribution.explicit_percentage().unwrap_or(blank_share))
        .collect();
    let total: f64 = raw.iter().sum();

    if total <= 0.0 {
        let uniform = 100.0 / options.len() as f64;
        return vec![uniform; options.len()];
    }

    raw.into_iter().map(|weight| weight / total * 100.0).collect()
}

/// Per-item source of randomness
#[derive(Debug, Clone)]
pub struct Sampler {
    seed: String,
    counter: u64,
    finalize: FinalizeFlag,
}

impl Sampler {
    pub fn new(seed: impl Into<String>) -> Self {
        Self::with_finalize(seed, FinalizeFlag::new())
    }

    pub fn with_finalize(seed: impl Into<String>, finalize: FinalizeFlag) -> Self {
        Self {
            seed: seed.into(),
            counter: 0,
            finalize,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> u64 {
        self.counter
    }

    /// Uniform-ish value in `[0, max]`
    pub fn next_int(&mut self, max: u64) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(self.counter.to_string().as_bytes());
        self.counter += 1;

        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let raw = u64::from_be_bytes(head);

        match max.checked_add(1) {
            Some(modulus) => raw % modulus,
            None => raw,
        }
    }

    /// Value in `[0, bound)`, zero when `bound` is zero
    pub fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_int(bound - 1)
    }

    /// True with probability `percent` / 100
    pub fn chance(&mut self, percent: u32) -> bool {
        self.next_below(100) < u64::from(percent)
    }

    /// Pick one option by authored weight, `None` for "no selection"
    ///
    /// The opt-out option is drawn first; a hit selects nothing regardless of
    /// the remaining weights.
    pub fn pick_weighted(
        &mut self,
        options: &[Arc<TraitOption>],
        na: Option<&TraitOption>,
    ) -> Option<Arc<TraitOption>> {
        if options.is_empty() {
            return None;
        }

        if let Some(na) = na {
            let threshold = (na.distribution.percentage() * 1000.0).round() as u64;
            if threshold > 0 && self.next_below(FULL_SCALE) < threshold {
                return None;
            }
        }

        let percentages = effective_percentages(options);
        let mut bounds = Vec::with_capacity(percentages.len());
        let mut running = 0.0;
        for percent in &percentages {
            running += percent * 1000.0;
            bounds.push(running);
        }

        for _ in 0..MAX_DRAW_RETRIES {
            let draw = self.next_int(FULL_SCALE) as f64;
            let hit = bounds
                .iter()
                .zip(&percentages)
                .position(|(bound, percent)| *percent > 0.0 && draw <= *bound);
            if let Some(index) = hit {
                return Some(Arc::clone(&options[index]));
            }
            if self.finalize.is_raised() {
                break;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Distribution;

    fn pool(weights: &[(&str, Distribution)]) -> Vec<Arc<TraitOption>> {
        weights
            .iter()
            .map(|(value, distribution)| {
                Arc::new(TraitOption::new(*value, *value).with_distribution(*distribution))
            })
            .collect()
    }

    #[test]
    fn test_draws_are_reproducible() {
        let mut first = Sampler::new("abc");
        let mut second = Sampler::new("abc");
        let a: Vec<u64> = (0..32).map(|_| first.next_int(1000)).collect();
        let b: Vec<u64> = (0..32).map(|_| second.next_int(1000)).collect();
        assert_eq!(a, b);
        assert_eq!(first.draws(), 32);

        let mut other = Sampler::new("abd");
        let c: Vec<u64> = (0..32).map(|_| other.next_int(1000)).collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_next_int_is_inclusive_of_max() {
        let mut sampler = Sampler::new("range");
        let mut seen_max = false;
        for _ in 0..2000 {
            let value = sampler.next_int(3);
            assert!(value <= 3);
            seen_max |= value == 3;
        }
        assert!(seen_max);
        assert_eq!(sampler.next_below(0), 0);
        assert_eq!(sampler.next_int(0), 0);
    }

    #[test]
    fn test_weighted_convergence() {
        let options = pool(&[
            ("A", Distribution::Percent(70.0)),
            ("B", Distribution::Percent(30.0)),
        ]);
        let mut sampler = Sampler::new("convergence");
        let draws = 100_000;
        let mut a_count = 0;
        for _ in 0..draws {
            let pick = sampler.pick_weighted(&options, None).unwrap();
            if pick.value == "A" {
                a_count += 1;
            }
        }
        let observed = a_count as f64 / draws as f64;
        assert!((observed - 0.70).abs() < 0.02, "observed {observed}");
    }

    #[test]
    fn test_full_opt_out_always_selects_nothing() {
        let options = pool(&[("A", Distribution::Revealed), ("B", Distribution::Percent(50.0))]);
        let na = TraitOption::new("NA", "NA").weighted(100.0);
        let mut sampler = Sampler::new("opt-out");
        for _ in 0..1000 {
            assert!(sampler.pick_weighted(&options, Some(&na)).is_none());
        }
    }

    #[test]
    fn test_zero_opt_out_never_draws() {
        let options = pool(&[("A", Distribution::Unspecified)]);
        let na = TraitOption::new("NA", "NA");
        let mut sampler = Sampler::new("no-opt-out");
        assert_eq!(sampler.pick_weighted(&options, Some(&na)).unwrap().value, "A");
        assert_eq!(sampler.draws(), 1);
    }

    #[test]
    fn test_empty_pool_selects_nothing_without_drawing() {
        let mut sampler = Sampler::new("empty");
        assert!(sampler.pick_weighted(&[], None).is_none());
        assert_eq!(sampler.draws(), 0);
    }

    #[test]
    fn test_blank_weights_share_remainder() {
        let options = pool(&[
            ("A", Distribution::Percent(50.0)),
            ("B", Distribution::Unspecified),
            ("C", Distribution::Unspecified),
        ]);
        let percentages = effective_percentages(&options);
        assert_eq!(percentages, vec![50.0, 25.0, 25.0]);
    }

    #[test]
    fn test_zero_weights_become_uniform() {
        let options = pool(&[
            ("A", Distribution::Percent(0.0)),
            ("B", Distribution::Percent(0.0)),
            ("C", Distribution::Percent(0.0)),
            ("D", Distribution::Percent(0.0)),
        ]);
        assert_eq!(effective_percentages(&options), vec![25.0; 4]);

        let mut sampler = Sampler::new("uniform");
        assert!(sampler.pick_weighted(&options, None).is_some());
    }

    #[test]
    fn test_weights_are_rescaled_to_one_hundred() {
        let options = pool(&[
            ("A", Distribution::Revealed),
            ("B", Distribution::Percent(100.0)),
            ("C", Distribution::Unspecified),
        ]);
        let percentages = effective_percentages(&options);
        assert_eq!(percentages, vec![50.0, 50.0, 0.0]);

        // A zero-share option is never returned
        let mut sampler = Sampler::new("rescaled");
        for _ in 0..500 {
            let pick = sampler.pick_weighted(&options, None).unwrap();
            assert_ne!(pick.value, "C");
        }
    }

    #[test]
    fn test_finalize_flag_is_shared() {
        let flag = FinalizeFlag::new();
        let sampler = Sampler::with_finalize("seed", flag.clone());
        assert!(!sampler.finalize.is_raised());
        flag.raise();
        assert!(sampler.finalize.is_raised());
    }
}
