//! Slot resolution pipeline
//!
//! Runs the fixed slot sequence once per attempt. Later steps read the
//! exclusion and forcing flags left behind by earlier ones, so the order of
//! calls in [`SlotPipeline::run`] is part of the contract.

use shared::{item_debug, Species, SpeciesLock, TraitOption};
use std::collections::HashSet;
use std::sync::Arc;

use super::assignment::{Assignment, Layer};
use super::eligibility::{filter_for_identity, species_allowed, FilterAxes, SpeciesPolicy};
use super::identity::Identity;
use super::rules::{self, tags, Step};
use super::sampler::Sampler;
use crate::catalog::{Catalog, PoolId};
use crate::error::{GeneratorError, GeneratorResult};

/// Resolve one full assignment for `identity`
pub fn resolve(catalog: &Catalog, identity: &Identity, sampler: &mut Sampler) -> GeneratorResult<Assignment> {
    SlotPipeline::new(catalog, identity, sampler).run()
}

pub struct SlotPipeline<'a> {
    catalog: &'a Catalog,
    identity: &'a Identity,
    sampler: &'a mut Sampler,
    assignment: Assignment,
    excluded: HashSet<Step>,
    force_stackable: bool,
    force_glasses: bool,
    stackable_opt_out: bool,
    eyes_candidates: Vec<Arc<TraitOption>>,
}

impl<'a> SlotPipeline<'a> {
    pub fn new(catalog: &'a Catalog, identity: &'a Identity, sampler: &'a mut Sampler) -> Self {
        Self {
            catalog,
            identity,
            sampler,
            assignment: Assignment::new(),
            excluded: HashSet::new(),
            force_stackable: false,
            force_glasses: false,
            stackable_opt_out: true,
            eyes_candidates: Vec::new(),
        }
    }

    pub fn run(mut self) -> GeneratorResult<Assignment> {
        self.droplet()?;
        self.background();
        self.background_accent();
        self.aura();
        self.wings();
        self.weapon();
        self.body()?;
        self.elven_parts();
        self.hat();
        self.facegear();
        self.earless_hat();
        self.eyes();
        self.glasses();
        self.nose();
        self.hair();
        self.stackable_gate();
        self.clothes();
        self.hands();
        self.mouth();
        self.earrings();
        self.stackable();
        Ok(self.assignment)
    }

    fn species(&self) -> Species {
        self.identity.species
    }

    fn is_excluded(&self, step: Step) -> bool {
        self.excluded.contains(&step)
    }

    fn worn_hat(&self) -> Option<&TraitOption> {
        self.assignment.get(Layer::Hat)
    }

    /// Default filter over a pool
    fn eligible(&self, pool: PoolId) -> Vec<Arc<TraitOption>> {
        filter_for_identity(
            self.catalog.pool(pool).options(),
            self.identity,
            &self.assignment,
            FilterAxes::ALL,
        )
    }

    /// Default filter plus the strict species policy
    fn eligible_strict(&self, pool: PoolId) -> Vec<Arc<TraitOption>> {
        let species = self.species();
        let mut candidates = self.eligible(pool);
        candidates.retain(|option| species_allowed(option, species, SpeciesPolicy::STRICT));
        candidates
    }

    fn pick(&mut self, pool: PoolId, candidates: &[Arc<TraitOption>], with_opt_out: bool) -> Option<Arc<TraitOption>> {
        let catalog = self.catalog;
        let na = if with_opt_out { catalog.pool(pool).na() } else { None };
        let picked = self.sampler.pick_weighted(candidates, na);
        if picked.is_none() {
            item_debug!(self.identity.index, "🕳️ No {} selection from {} candidates", pool, candidates.len());
        }
        picked
    }

    /// Exact value lookup in a companion pool
    fn companion(&self, pool: PoolId, value: &str) -> Option<Arc<TraitOption>> {
        self.catalog.pool(pool).find_by_value(value)
    }

    fn droplet(&mut self) -> GeneratorResult<()> {
        let rarity = self.identity.rarity.as_str();
        let front = self
            .companion(PoolId::Droplets, rarity)
            .ok_or(GeneratorError::MissingMandatory {
                index: self.identity.index,
                layer: Layer::DropletFront,
            })?;

        let back = self.companion(PoolId::DropletsBack, &front.value);
        let back_transparent = self.companion(PoolId::DropletsBackTransparent, &front.value);
        self.assignment.set(Layer::DropletFront, front);
        self.assignment.set_opt(Layer::DropletBack, back);
        self.assignment.set_opt(Layer::DropletBackTransparent, back_transparent);
        Ok(())
    }

    fn background(&mut self) {
        let species = self.species().as_str();
        let candidates: Vec<_> = self
            .catalog
            .pool(PoolId::Backgrounds)
            .options()
            .iter()
            .filter(|option| !option.forbids(species))
            .cloned()
            .collect();
        let picked = self.pick(PoolId::Backgrounds, &candidates, true);
        self.assignment.set_opt(Layer::Background, picked);
    }

    fn background_accent(&mut self) {
        let candidates = filter_for_identity(
            self.catalog.pool(PoolId::BackgroundAccents).options(),
            self.identity,
            &self.assignment,
            FilterAxes::GENDER_AND_CATEGORY,
        );
        let picked = self.pick(PoolId::BackgroundAccents, &candidates, true);
        self.assignment.set_opt(Layer::BackgroundAccent, picked);
    }

    fn aura(&mut self) {
        let candidates = self.eligible(PoolId::Auras);
        let Some(picked) = self.pick(PoolId::Auras, &candidates, true) else {
            return;
        };
        if picked.combined {
            let front = self.companion(PoolId::AurasFront, &picked.value);
            self.assignment.set_opt(Layer::AuraFront, front);
        }
        self.assignment.set(Layer::AuraBack, picked);
    }

    fn wings(&mut self) {
        let candidates = self.eligible(PoolId::Wings);
        let picked = self.pick(PoolId::Wings, &candidates, true);
        self.assignment.set_opt(Layer::Wings, picked);
    }

    fn weapon(&mut self) {
        let candidates = self.eligible(PoolId::Weapons);
        let Some(picked) = self.pick(PoolId::Weapons, &candidates, true) else {
            return;
        };
        if picked.combined {
            let back = self.companion(PoolId::WeaponsBack, &picked.value);
            self.assignment.set_opt(Layer::WeaponBack, back);
        }
        self.assignment.set(Layer::WeaponFront, picked);
    }

    fn body(&mut self) -> GeneratorResult<()> {
        let candidates = self.eligible(PoolId::Bodies);

        let picked = if self.species() == Species::Origin {
            // Origin bodies are fixed by the droplet colour, never sampled
            let tone = self
                .assignment
                .value(Layer::DropletFront)
                .and_then(rules::droplet_tone)
                .map(str::to_string);
            match tone {
                Some(tone) if self.identity.rarity != shared::Rarity::Common => candidates
                    .iter()
                    .find(|body| body.value.contains(tone.as_str()))
                    .cloned(),
                _ => candidates.first().cloned(),
            }
        } else {
            self.pick(PoolId::Bodies, &candidates, true)
        };

        let body = picked.ok_or(GeneratorError::MissingMandatory {
            index: self.identity.index,
            layer: Layer::Body,
        })?;
        self.assignment.set(Layer::Body, body);
        Ok(())
    }

    fn elven_parts(&mut self) {
        let Some(body) = self.assignment.get(Layer::Body) else {
            return;
        };
        let body_value = body.value.clone();
        let combined = body.combined;

        if self.species() == Species::Elven {
            let ears = self.companion(PoolId::ElvenEars, &body_value);
            self.assignment.set_opt(Layer::ElvenEars, ears);
        }
        if combined {
            let tail = self.companion(PoolId::Tails, &body_value);
            self.assignment.set_opt(Layer::Tail, tail);
        }
    }

    fn body_mentions_being(&self) -> bool {
        self.assignment
            .value(Layer::Body)
            .is_some_and(|value| value.to_lowercase().contains("being"))
    }

    fn hat(&mut self) {
        let species = self.species();
        if self.identity.has_hair || (species == Species::Being && !self.body_mentions_being()) {
            return;
        }

        let mut candidates = self.eligible_strict(PoolId::Hats);
        if species == Species::Feline {
            candidates.retain(|hat| hat.locked_to(Species::Feline));
        }

        match self.pick(PoolId::Hats, &candidates, true) {
            Some(hat) => {
                self.excluded.extend(rules::masked_steps(&hat));
                self.assignment.set(Layer::Hat, hat);
            }
            None => self.force_stackable = true,
        }
    }

    fn facegear(&mut self) {
        let species = self.species();
        if self.is_excluded(Step::Facegear)
            || rules::NO_FACEGEAR_SPECIES.contains(&species)
            || !rules::hat_allows(self.worn_hat(), Step::Facegear)
        {
            return;
        }

        let mut candidates = self.eligible(PoolId::Facegears);
        if species == Species::Feline {
            candidates.retain(|gear| !gear.forbids(tags::FELINE));
        }
        let picked = self.pick(PoolId::Facegears, &candidates, true);
        self.assignment.set_opt(Layer::Facegear, picked);
    }

    fn earless_hat(&mut self) {
        if self.species() != Species::Being {
            return;
        }

        if !self.assignment.has(Layer::Hat) && !self.body_mentions_being() {
            let body_file = self
                .assignment
                .get(Layer::Body)
                .map(|body| body.file.clone())
                .unwrap_or_default();
            if rules::EARLESS_BODY_DENYLIST.contains(&body_file.as_str()) {
                item_debug!(self.identity.index, "🎩 Body {} cannot wear an earless hat", body_file);
            } else {
                let conflicts = |tag: &str| match tag {
                    tags::NOSE => self.assignment.has(Layer::Nose),
                    tags::FACEGEAR => self.assignment.has(Layer::Facegear),
                    tags::MOUTH => self.assignment.has(Layer::Mouth),
                    _ => false,
                };
                let mut candidates = self.eligible(PoolId::EarlessHats);
                candidates.retain(|hat| {
                    !rules::EARLESS_CONFLICT_TAGS
                        .iter()
                        .any(|tag| hat.forbids(tag) && conflicts(tag))
                });
                let picked = self.pick(PoolId::EarlessHats, &candidates, false);
                self.assignment.set_opt(Layer::EarlessHat, picked);
            }
        }

        if self.assignment.has(Layer::EarlessHat) {
            self.excluded.insert(Step::Hair);
        }
    }

    fn eyes(&mut self) {
        if !rules::hat_allows(self.worn_hat(), Step::Eyes) {
            return;
        }

        let candidates = self.eligible_strict(PoolId::Eyes);
        let with_opt_out = self.species() != Species::Origin;
        let picked = self.pick(PoolId::Eyes, &candidates, with_opt_out);
        self.eyes_candidates = candidates;

        let Some(eyes) = picked else {
            self.force_glasses = true;
            return;
        };

        let clashes_with_earless = eyes.forbids(tags::EARLESS_HAT);
        if clashes_with_earless && self.assignment.has(Layer::EarlessHat) {
            return;
        }
        if eyes.forbids(tags::NOSE) {
            self.excluded.insert(Step::Nose);
        }
        if clashes_with_earless {
            self.assignment.clear(Layer::EarlessHat);
            self.excluded.remove(&Step::Hair);
        }
        self.assignment.set(Layer::Eyes, eyes);
    }

    fn glasses(&mut self) {
        if !self.force_glasses {
            return;
        }

        let candidates = self.eligible(PoolId::Glasses);
        let Some(glasses) = self.pick(PoolId::Glasses, &candidates, true) else {
            return;
        };
        self.excluded.insert(Step::Nose);
        if glasses.requires(tags::EYES) {
            let eyes_candidates = std::mem::take(&mut self.eyes_candidates);
            let eyes = self.pick(PoolId::Eyes, &eyes_candidates, false);
            self.assignment.set_opt(Layer::Eyes, eyes);
        }
        self.assignment.set(Layer::Glasses, glasses);
    }

    fn nose(&mut self) {
        if self.is_excluded(Step::Nose) || !rules::hat_allows(self.worn_hat(), Step::Nose) {
            return;
        }
        let candidates = self.eligible(PoolId::Noses);
        let picked = self.pick(PoolId::Noses, &candidates, true);
        self.assignment.set_opt(Layer::Nose, picked);
    }

    fn hair(&mut self) {
        let species = self.species();
        if self.is_excluded(Step::Hair) || !self.identity.has_hair || species == Species::Origin {
            return;
        }

        let mut candidates = self.eligible(PoolId::Hairs);
        match species {
            Species::Feline => candidates.retain(|hair| hair.locked_to(Species::Feline)),
            Species::Elven => {
                let wears_glasses = self.assignment.has(Layer::Glasses);
                candidates.retain(|hair| {
                    !wears_glasses
                        && !hair.forbids(tags::ELVEN)
                        && !hair.has_lock(SpeciesLock::Only(Species::Feline))
                        && !hair.has_lock(SpeciesLock::Only(Species::Soul))
                });
            }
            _ => {}
        }

        let Some(hair) = self.pick(PoolId::Hairs, &candidates, true) else {
            self.force_stackable = true;
            return;
        };
        if hair.combined {
            let back = self.companion(PoolId::HairsBack, &hair.value);
            self.assignment.set_opt(Layer::HairBack, back);
        }
        self.assignment.set(Layer::Hair, hair);
    }

    /// A bare head always gets a stackable accessory
    fn stackable_gate(&mut self) {
        if !self.assignment.has(Layer::Hair) && !self.assignment.has(Layer::Hat) {
            self.force_stackable = true;
            self.stackable_opt_out = false;
        }
    }

    fn clothes(&mut self) {
        let candidates = self.eligible_strict(PoolId::Clothes);
        let picked = self.pick(PoolId::Clothes, &candidates, true);
        self.assignment.set_opt(Layer::Clothes, picked);
    }

    fn hands(&mut self) {
        if !self.assignment.has(Layer::WeaponFront) {
            return;
        }
        let Some(body_value) = self.assignment.value(Layer::Body).map(str::to_string) else {
            return;
        };
        let hands = self.catalog.pool(PoolId::Hands).find_containing(&body_value);
        self.assignment.set_opt(Layer::Hands, hands);
    }

    fn mouth(&mut self) {
        if self.is_excluded(Step::Mouth) || !rules::hat_allows(self.worn_hat(), Step::Mouth) {
            return;
        }

        let earless = self.assignment.has(Layer::EarlessHat);
        let mut candidates = self.eligible_strict(PoolId::Mouths);
        if earless {
            candidates.retain(|mouth| {
                !rules::EARLESS_MOUTH_DENYLIST.contains(&mouth.value.as_str()) && !mouth.forbids(tags::EARLESS_HAT)
            });
        }
        let picked = self.pick(PoolId::Mouths, &candidates, true);
        self.assignment.set_opt(Layer::Mouth, picked);
    }

    fn earrings(&mut self) {
        let species = self.species();
        let hair_forbids = self
            .assignment
            .get(Layer::Hair)
            .is_some_and(|hair| hair.forbids(tags::EARRINGS));
        if self.is_excluded(Step::Earrings)
            || self.assignment.has(Layer::EarlessHat)
            || species == Species::Feline
            || !rules::hat_allows(self.worn_hat(), Step::Earrings)
            || hair_forbids
        {
            return;
        }

        let mut candidates = self.eligible(PoolId::Earrings);
        candidates.retain(|earring| rules::earrings_admit(earring, species));
        let picked = self.pick(PoolId::Earrings, &candidates, true);
        self.assignment.set_opt(Layer::Earrings, picked);
    }

    fn stackable(&mut self) {
        let hair_stackable = self.assignment.get(Layer::Hair).is_some_and(|hair| hair.stackable);
        let hat_stackable = self.assignment.get(Layer::Hat).is_some_and(|hat| hat.stackable);
        if !(hair_stackable || hat_stackable || self.force_stackable) || self.species() == Species::Feline {
            return;
        }

        let candidates = self.eligible(PoolId::Stackables);
        let with_opt_out = self.stackable_opt_out;
        let Some(front) = self.pick(PoolId::Stackables, &candidates, with_opt_out) else {
            return;
        };

        let earless_allows = self
            .assignment
            .get(Layer::EarlessHat)
            .map_or(true, |earless| earless.stackable);
        if !earless_allows || !rules::stackable_allowed(self.assignment.get(Layer::Hair), &front.file) {
            item_debug!(self.identity.index, "🧢 Stackable {} dropped", front.value);
            return;
        }

        if front.combined {
            let back = self.companion(PoolId::StackablesBack, &front.value);
            self.assignment.set_opt(Layer::StackableBack, back);
        }
        self.assignment.set(Layer::StackableFront, front);
    }
}
