//! Core generation logic
//!
//! Everything here is free of I/O. Given the same catalog, identity and seed
//! the pipeline resolves the same assignment every time.

pub mod assignment;
pub mod eligibility;
pub mod identity;
pub mod pipeline;
pub mod rules;
pub mod sampler;
pub mod uniqueness;
pub mod usage;

pub use assignment::{Assignment, Attribute, Layer, LayerPath, Signature};
pub use eligibility::{filter_for_identity, species_allowed, FilterAxes, SpeciesPolicy};
pub use identity::{Identity, ItemHint};
pub use pipeline::{resolve, SlotPipeline};
pub use sampler::{FinalizeFlag, Sampler};
pub use uniqueness::{UniquenessRegistry, UniquenessStats};
pub use usage::{UsageAggregator, UsageEvent, UsageRecorder, UsageTable};
