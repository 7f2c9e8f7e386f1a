//! Per-item assignment, layer order and combination signature
//!
//! An assignment maps every filled layer to the option chosen for it. Layers
//! are declared in render order (back to front) so iterating the map yields
//! exactly the order used for both the signature and the render hand-off.

use serde::{Deserialize, Serialize};
use shared::TraitOption;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One composited layer; declaration order is render order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Background,
    BackgroundAccent,
    DropletBack,
    AuraBack,
    Tail,
    Wings,
    WeaponBack,
    DropletBackTransparent,
    StackableBack,
    HairBack,
    Body,
    Facegear,
    Clothes,
    Hands,
    WeaponFront,
    Eyes,
    Mouth,
    Nose,
    Hair,
    Hat,
    EarlessHat,
    StackableFront,
    ElvenEars,
    Earrings,
    Glasses,
    DropletFront,
    AuraFront,
}

impl Layer {
    pub const RENDER_ORDER: [Layer; 27] = [
        Layer::Background,
        Layer::BackgroundAccent,
        Layer::DropletBack,
        Layer::AuraBack,
        Layer::Tail,
        Layer::Wings,
        Layer::WeaponBack,
        Layer::DropletBackTransparent,
        Layer::StackableBack,
        Layer::HairBack,
        Layer::Body,
        Layer::Facegear,
        Layer::Clothes,
        Layer::Hands,
        Layer::WeaponFront,
        Layer::Eyes,
        Layer::Mouth,
        Layer::Nose,
        Layer::Hair,
        Layer::Hat,
        Layer::EarlessHat,
        Layer::StackableFront,
        Layer::ElvenEars,
        Layer::Earrings,
        Layer::Glasses,
        Layer::DropletFront,
        Layer::AuraFront,
    ];

    /// Asset folder holding this layer's images
    pub fn folder(&self) -> &'static str {
        match self {
            Layer::Background => "BACKGROUND",
            Layer::BackgroundAccent => "BACKGROUND ACCENT",
            Layer::DropletBack => "DROPLETS (BACK)",
            Layer::AuraBack => "AURA (BACK)",
            Layer::Tail => "TAILS",
            Layer::Wings => "WINGS",
            Layer::WeaponBack => "WEAPONS (BACK)",
            Layer::DropletBackTransparent => "DROPLET (BACK TRANSPARENT)",
            Layer::StackableBack | Layer::StackableFront => "HATS (STACKABLE)",
            Layer::HairBack => "HAIR (BACK)",
            Layer::Body => "BODIES",
            Layer::Facegear => "FACE GEAR",
            Layer::Clothes => "CLOTHES",
            Layer::Hands => "HANDS",
            Layer::WeaponFront => "WEAPONS (FRONT)",
            Layer::Eyes => "EYES",
            Layer::Mouth => "MOUTH",
            Layer::Nose => "NOSE",
            Layer::Hair => "HAIR",
            Layer::Hat | Layer::EarlessHat => "HATS",
            Layer::ElvenEars => "ELVEN EARS",
            Layer::Earrings => "EARRINGS",
            Layer::Glasses => "GLASSES",
            Layer::DropletFront => "DROPLETS",
            Layer::AuraFront => "AURA (FRONT)",
        }
    }

    /// Metadata trait type, `None` for layers that are not reported
    pub fn trait_type(&self) -> Option<&'static str> {
        match self {
            Layer::Background | Layer::BackgroundAccent | Layer::AuraBack | Layer::AuraFront => Some("Background"),
            Layer::DropletBack | Layer::DropletBackTransparent | Layer::DropletFront => Some("Rarity"),
            Layer::Wings => Some("Wings"),
            Layer::WeaponBack => Some("Weapon"),
            Layer::WeaponFront => Some("Weapons"),
            Layer::StackableBack | Layer::StackableFront | Layer::Hat | Layer::EarlessHat => Some("Hat"),
            Layer::HairBack | Layer::Hair => Some("Hair"),
            Layer::Body => Some("Body"),
            Layer::Facegear => Some("Face"),
            Layer::Clothes => Some("Clothes"),
            Layer::Eyes => Some("Eyes"),
            Layer::Mouth => Some("Mouth"),
            Layer::Glasses => Some("Glasses"),
            Layer::Tail | Layer::Hands | Layer::Nose | Layer::ElvenEars | Layer::Earrings => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Concatenated display values of every filled layer in render order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Signature {
    fn from(value: &str) -> Self {
        Signature(value.to_string())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata attribute emitted for an accepted item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Asset reference handed to the render sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerPath {
    pub layer: Layer,
    pub folder: String,
    pub file: String,
}

impl LayerPath {
    /// Relative image path, `<folder>/<file>.png`
    pub fn relative_path(&self) -> String {
        format!("{}/{}.png", self.folder, self.file)
    }
}

/// Options selected for one attempt, keyed by layer
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    picks: BTreeMap<Layer, Arc<TraitOption>>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, layer: Layer, option: Arc<TraitOption>) {
        self.picks.insert(layer, option);
    }

    /// Fill `layer` when a pick exists, leave it empty otherwise
    pub fn set_opt(&mut self, layer: Layer, option: Option<Arc<TraitOption>>) {
        match option {
            Some(option) => self.set(layer, option),
            None => self.clear(layer),
        }
    }

    pub fn clear(&mut self, layer: Layer) {
        self.picks.remove(&layer);
    }

    pub fn get(&self, layer: Layer) -> Option<&TraitOption> {
        self.picks.get(&layer).map(Arc::as_ref)
    }

    pub fn has(&self, layer: Layer) -> bool {
        self.picks.contains_key(&layer)
    }

    /// Display value of the option in `layer`
    pub fn value(&self, layer: Layer) -> Option<&str> {
        self.get(layer).map(|option| option.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Filled layers in render order
    pub fn iter(&self) -> impl Iterator<Item = (Layer, &TraitOption)> {
        self.picks.iter().map(|(layer, option)| (*layer, option.as_ref()))
    }

    pub fn signature(&self) -> Signature {
        Signature(self.iter().map(|(_, option)| option.value.as_str()).collect())
    }

    pub fn layer_paths(&self) -> Vec<LayerPath> {
        self.iter()
            .map(|(layer, option)| LayerPath {
                layer,
                folder: layer.folder().to_string(),
                file: option.file.clone(),
            })
            .collect()
    }

    /// Reported attributes, deduplicated by trait type and value
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attributes: Vec<Attribute> = self
            .iter()
            .filter_map(|(layer, option)| {
                layer.trait_type().map(|trait_type| Attribute {
                    trait_type: trait_type.to_string(),
                    value: option.value.clone(),
                })
            })
            .collect();
        attributes.sort();
        attributes.dedup();
        attributes
    }
}
