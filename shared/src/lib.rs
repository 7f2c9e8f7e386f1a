//! Shared vocabulary for the trait generator
//!
//! Identity enums, the option model and catalog validation errors used by
//! every layer of the generator, plus the common logging setup.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
