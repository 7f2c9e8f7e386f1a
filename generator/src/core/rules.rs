//! Rule tables consumed by the slot pipeline
//!
//! Cross-slot exclusions are expressed as data so they can be checked on
//! their own, independent of the order the pipeline runs its steps in.

use shared::{Species, TraitOption};

/// Tags that appear in must-include / must-not-include cells
pub mod tags {
    pub const FACEGEAR: &str = "FACEGEAR";
    pub const EYES: &str = "EYES";
    pub const NOSE: &str = "NOSE";
    pub const MOUTH: &str = "MOUTH";
    pub const EARRINGS: &str = "EARRINGS";
    pub const EARLESS_HAT: &str = "EARLESS HAT";
    pub const FELINE: &str = "FELINE";
    pub const ELVEN: &str = "ELVEN";
}

/// Optional steps that earlier picks can switch off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Facegear,
    Eyes,
    Nose,
    Hair,
    Mouth,
    Earrings,
}

/// A hat forbidding `tag` disables `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagGate {
    pub step: Step,
    pub tag: &'static str,
}

/// Hats whose value contains `value_fragment` switch off every step in `excludes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskingRule {
    pub value_fragment: &'static str,
    pub excludes: &'static [Step],
}

// The mouth step reads the hat's NOSE tag, as authored.
pub const HAT_TAG_GATES: &[TagGate] = &[
    TagGate { step: Step::Facegear, tag: tags::FACEGEAR },
    TagGate { step: Step::Eyes, tag: tags::EYES },
    TagGate { step: Step::Nose, tag: tags::NOSE },
    TagGate { step: Step::Mouth, tag: tags::NOSE },
    TagGate { step: Step::Earrings, tag: tags::EARRINGS },
];

pub const MASKING_HATS: &[MaskingRule] = &[MaskingRule {
    value_fragment: "Dark Ski Mask",
    excludes: &[Step::Mouth, Step::Nose, Step::Earrings, Step::Facegear, Step::Hair],
}];

/// Mouth values that clash with an earless hat
pub const EARLESS_MOUTH_DENYLIST: &[&str] = &[
    "Tongue Out",
    "Middy",
    "Shmoke",
    "Dark Bandana",
    "Light Bandana",
    "Country Road",
];

/// Body file keys that cannot wear an earless hat
pub const EARLESS_BODY_DENYLIST: &[&str] = &["4B", "5B", "6B", "7B", "8B"];

/// Slots an earless hat must not conflict with
pub const EARLESS_CONFLICT_TAGS: &[&str] = &[tags::NOSE, tags::FACEGEAR, tags::MOUTH];

pub const HALO_KEYS: &[&str] = &[
    "2HATSS", "2HATSSB", "3HATSS", "3HATSSB", "14HATSS", "14HATSSB", "15HATSS", "15HATSSB",
];

pub const HORN_KEYS: &[&str] = &["9HATSS", "10HATSS", "13HATSS", "18HATSS", "19HATSS", "20HATSS"];

pub const NO_FACEGEAR_SPECIES: &[Species] = &[Species::Monkey, Species::Cyborg];

/// Droplet tones that restrict Origin eligibility
pub const ORIGIN_RESTRICTED_TONES: &[&str] = &["Lavender", "Teal"];

/// Whether the selected hat leaves `step` enabled
pub fn hat_allows(hat: Option<&TraitOption>, step: Step) -> bool {
    let Some(hat) = hat else {
        return true;
    };
    !HAT_TAG_GATES
        .iter()
        .any(|gate| gate.step == step && hat.forbids(gate.tag))
}

/// Steps switched off by a masking hat
pub fn masked_steps(hat: &TraitOption) -> impl Iterator<Item = Step> + '_ {
    MASKING_HATS
        .iter()
        .filter(move |rule| hat.value.contains(rule.value_fragment))
        .flat_map(|rule| rule.excludes.iter().copied())
}

/// Tone a droplet value carries, its second word
pub fn droplet_tone(droplet_value: &str) -> Option<&str> {
    droplet_value.split_whitespace().nth(1)
}

/// Tone that restricts Origin eligibility, if the droplet carries one
pub fn restricted_tone(droplet_value: &str) -> Option<&'static str> {
    let tone = droplet_tone(droplet_value)?;
    ORIGIN_RESTRICTED_TONES
        .iter()
        .copied()
        .find(|restricted| restricted.eq_ignore_ascii_case(tone))
}

/// Whether a stackable accessory keyed `accessory_file` may sit on `hair`
pub fn stackable_allowed(hair: Option<&TraitOption>, accessory_file: &str) -> bool {
    let Some(hair) = hair else {
        return true;
    };
    let halo = HALO_KEYS.contains(&accessory_file);
    let horn = HORN_KEYS.contains(&accessory_file);
    if hair.halo_and_horns_only && (halo || !horn) {
        return false;
    }
    halo || horn
}

/// Earrings eligibility, kept exactly as authored
///
/// FIXME: the Elven branch requires the species to be Elven and neither
/// Feline nor Elven at once, so no option is ever admitted. Needs a decision
/// from the catalog authors on which species were meant to wear earrings.
#[allow(clippy::nonminimal_bool)]
pub fn earrings_admit(option: &TraitOption, species: Species) -> bool {
    let elven_branch =
        species != Species::Feline && species != Species::Elven && species == Species::Elven;
    elven_branch && !option.forbids(tags::ELVEN)
}
