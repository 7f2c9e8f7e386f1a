//! Constrained trait-combination generator
//!
//! Resolves, for every item of a batch, one option per composited layer
//! under identity-based eligibility rules and weighted sampling, and
//! guarantees that no two accepted items share a combination signature.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use batch::{BatchReport, BatchRunner};
pub use catalog::{Catalog, PoolId};
pub use config::{GeneratorConfig, IdentityTables};
pub use error::{GeneratorError, GeneratorResult};
pub use orchestrator::{ExhaustReason, GeneratedItem, ItemOrchestrator, ItemOutcome, ItemState};
pub use traits::{CatalogLoader, IdentitySource, RenderSink, SignatureRegistry};
