//! Identity vocabulary: species, gender, category and rarity tiers
//!
//! Every enum parses from the exact spelling used in catalog cells and token
//! metadata. Parsing is fallible and never panics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SharedError;

/// Species of an item, always derived from external metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Species {
    Being,
    Cyborg,
    Elven,
    Feline,
    Monkey,
    Origin,
    Soul,
}

impl Species {
    pub const ALL: [Species; 7] = [
        Species::Being,
        Species::Cyborg,
        Species::Elven,
        Species::Feline,
        Species::Monkey,
        Species::Origin,
        Species::Soul,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Being => "BEING",
            Species::Cyborg => "CYBORG",
            Species::Elven => "ELVEN",
            Species::Feline => "FELINE",
            Species::Monkey => "MONKEY",
            Species::Origin => "ORIGIN",
            Species::Soul => "SOUL",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.as_str() == s)
            .ok_or_else(|| SharedError::invalid("species", s))
    }
}

/// One entry of an option's species-lock list
///
/// An empty cell entry is the "no species" sentinel, `NA` marks an entry the
/// authors explicitly left unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeciesLock {
    NoSpecies,
    NotApplicable,
    Only(Species),
}

impl FromStr for SpeciesLock {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(SpeciesLock::NoSpecies),
            "NA" => Ok(SpeciesLock::NotApplicable),
            other => other
                .parse::<Species>()
                .map(SpeciesLock::Only)
                .map_err(|_| SharedError::invalid("species lock", s)),
        }
    }
}

/// Gender of an item or gender tag of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "U")]
    Unisex,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unisex => "U",
            Gender::NotApplicable => "NA",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "U" => Ok(Gender::Unisex),
            "NA" => Ok(Gender::NotApplicable),
            _ => Err(SharedError::invalid("gender", s)),
        }
    }
}

/// Style category of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Cool,
    Spooky,
    Goofy,
    Cute,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Category {
    /// Categories an identity can be assigned, in sampling order
    pub const ASSIGNABLE: [Category; 4] = [Category::Cool, Category::Spooky, Category::Goofy, Category::Cute];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cool => "COOL",
            Category::Spooky => "SPOOKY",
            Category::Goofy => "GOOFY",
            Category::Cute => "CUTE",
            Category::NotApplicable => "NA",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COOL" => Ok(Category::Cool),
            "SPOOKY" => Ok(Category::Spooky),
            "GOOFY" => Ok(Category::Goofy),
            "CUTE" => Ok(Category::Cute),
            "NA" => Ok(Category::NotApplicable),
            _ => Err(SharedError::invalid("category", s)),
        }
    }
}

/// Rarity tier assigned to an item by external metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    OneOfOne,
    UnknownColor1,
    UnknownColor2,
    UnknownColor3,
    Common,
    RarePurple,
    RareOrange,
    RareYellow,
    UltraBlue,
    UltraGreen,
    UltraPink,
    LegendarySilver,
    LegendaryViolet,
    LegendaryBlue,
    MythicLavender,
    MythicTeal,
}

impl Rarity {
    pub const ALL: [Rarity; 16] = [
        Rarity::OneOfOne,
        Rarity::UnknownColor1,
        Rarity::UnknownColor2,
        Rarity::UnknownColor3,
        Rarity::Common,
        Rarity::RarePurple,
        Rarity::RareOrange,
        Rarity::RareYellow,
        Rarity::UltraBlue,
        Rarity::UltraGreen,
        Rarity::UltraPink,
        Rarity::LegendarySilver,
        Rarity::LegendaryViolet,
        Rarity::LegendaryBlue,
        Rarity::MythicLavender,
        Rarity::MythicTeal,
    ];

    /// Display spelling, identical to the droplet option values
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::OneOfOne => "1 Of 1",
            Rarity::UnknownColor1 => "?1",
            Rarity::UnknownColor2 => "?2",
            Rarity::UnknownColor3 => "?3",
            Rarity::Common => "Common",
            Rarity::RarePurple => "Rare Purple",
            Rarity::RareOrange => "Rare Orange",
            Rarity::RareYellow => "Rare Yellow",
            Rarity::UltraBlue => "Ultra Blue",
            Rarity::UltraGreen => "Ultra Green",
            Rarity::UltraPink => "Ultra Pink",
            Rarity::LegendarySilver => "Legendary Silver",
            Rarity::LegendaryViolet => "Legendary Violet",
            Rarity::LegendaryBlue => "Legendary Blue",
            Rarity::MythicLavender => "Mythic Lavender",
            Rarity::MythicTeal => "Mythic Teal",
        }
    }

    /// Reserved and placeholder tiers that never receive generated traits
    pub fn is_unassignable(&self) -> bool {
        matches!(
            self,
            Rarity::OneOfOne | Rarity::UnknownColor1 | Rarity::UnknownColor2 | Rarity::UnknownColor3
        )
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::ALL
            .into_iter()
            .find(|rarity| rarity.as_str() == s)
            .ok_or_else(|| SharedError::invalid("rarity", s))
    }
}
