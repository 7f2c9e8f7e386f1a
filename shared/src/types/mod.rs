//! Core types used throughout the generator

pub mod identity;
pub mod option;

pub use identity::{Category, Gender, Rarity, Species, SpeciesLock};
pub use option::{Distribution, OptionPool, TraitOption};
