//! Eligibility filter: narrows a pool to the options an identity may wear

use shared::{Gender, Rarity, Species, SpeciesLock, TraitOption};
use std::sync::Arc;

use super::assignment::{Assignment, Layer};
use super::identity::Identity;
use super::rules;

/// Identity fields a filter checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterAxes {
    pub gender: bool,
    pub category: bool,
    pub species: bool,
}

impl FilterAxes {
    pub const ALL: FilterAxes = FilterAxes {
        gender: true,
        category: true,
        species: true,
    };

    pub const GENDER_AND_CATEGORY: FilterAxes = FilterAxes {
        gender: true,
        category: true,
        species: false,
    };
}

/// Which species the "no species" sentinel and the rarity lock exempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesPolicy {
    pub sentinel_exempt: &'static [Species],
    pub rarity_lock_exempt: &'static [Species],
}

impl SpeciesPolicy {
    pub const DEFAULT: SpeciesPolicy = SpeciesPolicy {
        sentinel_exempt: &[Species::Soul],
        rarity_lock_exempt: &[Species::Origin, Species::Soul],
    };

    /// Used for hats, eyes, clothes and mouths
    pub const STRICT: SpeciesPolicy = SpeciesPolicy {
        sentinel_exempt: &[Species::Soul, Species::Origin],
        rarity_lock_exempt: &[Species::Origin, Species::Soul],
    };
}

pub fn gender_allowed(option: &TraitOption, gender: Gender) -> bool {
    match option.gender {
        None | Some(Gender::Unisex) => true,
        Some(Gender::NotApplicable) => false,
        Some(tag) => tag == gender,
    }
}

/// Species locking is additive: any of the three clauses admits the option
pub fn species_allowed(option: &TraitOption, species: Species, policy: SpeciesPolicy) -> bool {
    option.locked_to(species)
        || (option.has_lock(SpeciesLock::NoSpecies) && !policy.sentinel_exempt.contains(&species))
        || (option.rarity_locked && !policy.rarity_lock_exempt.contains(&species))
}

/// Tone Origin eligibility is restricted to, once the droplet is resolved
pub fn origin_tone(identity: &Identity, assignment: &Assignment) -> Option<&'static str> {
    if identity.species != Species::Origin || identity.rarity == Rarity::Common {
        return None;
    }
    assignment
        .value(Layer::DropletFront)
        .and_then(rules::restricted_tone)
}

/// Options of `pool` the identity may wear along the requested axes
pub fn filter_for_identity(
    pool: &[Arc<TraitOption>],
    identity: &Identity,
    assignment: &Assignment,
    axes: FilterAxes,
) -> Vec<Arc<TraitOption>> {
    let tone = origin_tone(identity, assignment).map(str::to_lowercase);

    pool.iter()
        .filter(|option| !axes.gender || gender_allowed(option, identity.gender))
        .filter(|option| !axes.category || option.in_category(identity.category))
        .filter(|option| !axes.species || species_allowed(option, identity.species, SpeciesPolicy::DEFAULT))
        .filter(|option| match &tone {
            Some(tone) => option.value.to_lowercase().contains(tone),
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Category;

    fn identity(species: Species, gender: Gender, category: Category) -> Identity {
        Identity {
            index: 1,
            species,
            gender,
            category,
            rarity: Rarity::Common,
            has_hair: true,
            seed: "seed".to_string(),
        }
    }

    fn arc(option: TraitOption) -> Arc<TraitOption> {
        Arc::new(option)
    }

    #[test]
    fn test_feline_lock_excludes_every_other_species() {
        let pool = vec![arc(TraitOption::new("1H", "Cat Ears")
            .with_categories(&Category::ASSIGNABLE)
            .with_locks(&[SpeciesLock::Only(Species::Feline)]))];
        let assignment = Assignment::new();

        for species in Species::ALL {
            for gender in [Gender::Male, Gender::Female] {
                for category in Category::ASSIGNABLE {
                    let kept = filter_for_identity(&pool, &identity(species, gender, category), &assignment, FilterAxes::ALL);
                    assert_eq!(kept.len(), usize::from(species == Species::Feline), "{species:?} {gender:?} {category:?}");
                }
            }
        }
    }

    #[test]
    fn test_gender_tags() {
        let male = TraitOption::new("1", "Beard").with_gender(Gender::Male);
        let unisex = TraitOption::new("2", "Cap").with_gender(Gender::Unisex);
        let untagged = TraitOption::new("3", "Scarf");
        let na = TraitOption::new("4", "Nothing").with_gender(Gender::NotApplicable);

        assert!(gender_allowed(&male, Gender::Male));
        assert!(!gender_allowed(&male, Gender::Female));
        assert!(gender_allowed(&unisex, Gender::Female));
        assert!(gender_allowed(&untagged, Gender::Female));
        assert!(!gender_allowed(&na, Gender::Male));
    }

    #[test]
    fn test_species_clauses() {
        let sentinel = TraitOption::new("1", "Plain").with_locks(&[SpeciesLock::NoSpecies]);
        assert!(species_allowed(&sentinel, Species::Being, SpeciesPolicy::DEFAULT));
        assert!(!species_allowed(&sentinel, Species::Soul, SpeciesPolicy::DEFAULT));
        assert!(species_allowed(&sentinel, Species::Origin, SpeciesPolicy::DEFAULT));
        assert!(!species_allowed(&sentinel, Species::Origin, SpeciesPolicy::STRICT));

        let rare = TraitOption::new("2", "Gilded").as_rarity_locked();
        assert!(species_allowed(&rare, Species::Cyborg, SpeciesPolicy::DEFAULT));
        assert!(!species_allowed(&rare, Species::Origin, SpeciesPolicy::DEFAULT));
        assert!(!species_allowed(&rare, Species::Soul, SpeciesPolicy::DEFAULT));

        let unlocked = TraitOption::new("3", "Orphan");
        assert!(!species_allowed(&unlocked, Species::Being, SpeciesPolicy::DEFAULT));
    }

    #[test]
    fn test_axes_subset_skips_species() {
        let pool = vec![arc(TraitOption::new("1", "Unlocked").with_categories(&[Category::Cute]))];
        let who = identity(Species::Being, Gender::Male, Category::Cute);
        let assignment = Assignment::new();

        assert!(filter_for_identity(&pool, &who, &assignment, FilterAxes::ALL).is_empty());
        assert_eq!(filter_for_identity(&pool, &who, &assignment, FilterAxes::GENDER_AND_CATEGORY).len(), 1);
    }

    #[test]
    fn test_origin_tone_restricts_values() {
        let base = |file: &str, value: &str| {
            arc(TraitOption::new(file, value)
                .with_categories(&[Category::Cool])
                .with_locks(&[SpeciesLock::Only(Species::Origin)]))
        };
        let pool = vec![base("1B", "Origin Lavender"), base("2B", "Origin Teal"), base("3B", "Origin Plain")];

        let mut who = identity(Species::Origin, Gender::Male, Category::Cool);
        who.rarity = Rarity::MythicLavender;
        let mut assignment = Assignment::new();
        assignment.set(Layer::DropletFront, arc(TraitOption::new("15D", "Mythic Lavender")));

        let kept = filter_for_identity(&pool, &who, &assignment, FilterAxes::ALL);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].value, "Origin Lavender");

        // Tones outside the table leave the pool unrestricted
        who.rarity = Rarity::UltraBlue;
        assignment.set(Layer::DropletFront, arc(TraitOption::new("9D", "Ultra Blue")));
        assert_eq!(filter_for_identity(&pool, &who, &assignment, FilterAxes::ALL).len(), 3);
    }
}
