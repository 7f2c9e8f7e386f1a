//! Concrete collaborator implementations
//!
//! File-backed loaders and sinks used by the binary, plus an in-memory sink
//! for dry runs.

pub mod catalog_loader;
pub mod collecting_sink;
pub mod identity_source;
pub mod manifest_sink;

pub use catalog_loader::{parse_catalog, JsonCatalogLoader, RawCatalog, RawRow};
pub use collecting_sink::CollectingSink;
pub use identity_source::{JsonIdentitySource, TokenRecord};
pub use manifest_sink::ManifestSink;
