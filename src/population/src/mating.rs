use genome::{AlleleFrequencies, ChromosomeLayout, DominanceRules, Genome, MutationRates, SimRng};
use located_error::prelude::*;
use log::trace;

use crate::{
    config::{EngineConfig, LitterSize},
    mouse::{IdAllocator, Mouse, MouseId, Parents},
    quantitative::QuantitativeModel,
};

/// Everything needed to turn genomes into mice: chromosome layout, mutation rates, dominance
/// rules, quantitative trait model and default litter size.
#[derive(Debug, Clone)]
pub struct Breeder {
    layout  : ChromosomeLayout,
    mutation: MutationRates,
    rules   : DominanceRules,
    model   : QuantitativeModel,
    litter  : LitterSize,
}

impl Breeder {
    #[must_use]
    pub fn new(layout: ChromosomeLayout, mutation: MutationRates, rules: DominanceRules, model: QuantitativeModel, litter: LitterSize) -> Self {
        Self { layout, mutation, rules, model, litter }
    }

    /// Build a breeder from a validated configuration. Additive effects are drawn from `rng`, and
    /// the residual variance is calibrated on the founder allele frequencies `freqs`.
    pub fn from_config(config: &EngineConfig, freqs: &AlleleFrequencies, rng: &mut SimRng) -> Result<Self> {
        let model = QuantitativeModel::new(freqs, config.effect_sd, config.heritability, config.trait_intercept, rng)?;
        Ok(Self::new(config.layout()?, config.mutation_rates()?, DominanceRules::default(), model, config.litter))
    }

    #[must_use]
    pub fn with_rules(mut self, rules: DominanceRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_mutation(mut self, mutation: MutationRates) -> Self {
        self.mutation = mutation;
        self
    }

    #[must_use]
    pub fn layout(&self) -> &ChromosomeLayout {
        &self.layout
    }

    #[must_use]
    pub fn mutation(&self) -> &MutationRates {
        &self.mutation
    }

    #[must_use]
    pub fn rules(&self) -> &DominanceRules {
        &self.rules
    }

    #[must_use]
    pub fn model(&self) -> &QuantitativeModel {
        &self.model
    }

    #[must_use]
    pub fn litter(&self) -> LitterSize {
        self.litter
    }

    /// Wrap a founder genome into a generation 0 mouse.
    pub fn founder(&self, id: MouseId, genome: Genome, strain: Option<String>, rng: &mut SimRng) -> Result<Mouse> {
        self.check_layout(&genome)?;
        let phenotype   = genome.phenotype(&self.rules);
        let trait_value = self.model.trait_value(&genome, rng);
        Ok(Mouse::new(id, genome, phenotype, None, 0, trait_value).with_strain(strain))
    }

    /// A single offspring: one fresh gamete from each parent, fertilization, mutation, then
    /// phenotype and trait value.
    pub fn offspring(&self, first: &Mouse, second: &Mouse, id: MouseId, rng: &mut SimRng) -> Result<Mouse> {
        let ctx = || format!("While mating {} with {}", first.id(), second.id());
        let paternal = first.genome().form_gamete(&self.layout, rng).with_loc(ctx)?;
        let maternal = second.genome().form_gamete(&self.layout, rng).with_loc(ctx)?;
        let mut genome = paternal.fertilize(&maternal).with_loc(ctx)?;

        let mutations = genome.mutate(&self.mutation, rng);
        if mutations.markers + mutations.visible > 0 {
            trace!("{id}: {} marker and {} visible mutation(s)", mutations.markers, mutations.visible);
        }

        let phenotype   = genome.phenotype(&self.rules);
        let trait_value = self.model.trait_value(&genome, rng);
        let generation  = first.generation().max(second.generation()) + 1;
        Ok(Mouse::new(id, genome, phenotype, Some(Parents::new(first.id(), second.id())), generation, trait_value))
    }

    /// Produce a litter. `litter` overrides the default litter size of this breeder.
    /// Mating a mouse with itself or with a relative is allowed.
    pub fn mate(&self, first: &Mouse, second: &Mouse, ids: &mut IdAllocator, litter: Option<LitterSize>, rng: &mut SimRng) -> Result<Vec<Mouse>> {
        let litter = litter.unwrap_or(self.litter);
        litter.validate().loc("While mating")?;
        let n = litter.draw(rng);
        trace!("Mating {} x {}: litter of {n}", first.id(), second.id());
        (0..n).map(|_| self.offspring(first, second, ids.next_id(), rng)).collect()
    }

    fn check_layout(&self, genome: &Genome) -> Result<()> {
        if genome.n_markers() != self.layout.n_markers() {
            bail!("Genome carries {} markers while the chromosome layout expects {}", genome.n_markers(), self.layout.n_markers())
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use genome::{Trait, VisibleTraits};

    /// Breeder over `n_markers` markers with mutation disabled and a `h2 = 0.5` trait model.
    pub(crate) fn breeder(n_markers: usize) -> Result<Breeder> {
        let config = EngineConfig{n_markers, marker_mutation_rate: 0.0, trait_mutation_rate: 0.0, ..EngineConfig::default()};
        let freqs  = AlleleFrequencies::uniform(n_markers, 0.5)?;
        Breeder::from_config(&config, &freqs, &mut SimRng::with_seed(0))
    }

    pub(crate) fn founder(breeder: &Breeder, id: u64, allele: u8, coat: &str, rng: &mut SimRng) -> Result<Mouse> {
        let n = breeder.layout().n_markers();
        let traits = VisibleTraits::default().with(Trait::CoatColor, coat)?;
        let genome = Genome::new(vec![allele; n], vec![allele; n], traits)?;
        breeder.founder(MouseId(id), genome, None, rng)
    }

    #[test]
    fn litter_pedigree_and_generation() -> Result<()> {
        let breeder = breeder(50)?;
        let mut rng = SimRng::with_seed(42);
        let a = founder(&breeder, 1, 0, "BB", &mut rng)?;
        let b = founder(&breeder, 2, 1, "bb", &mut rng)?;
        let mut ids = IdAllocator::starting_at(3);
        let litter = breeder.mate(&a, &b, &mut ids, None, &mut rng)?;
        assert!((4..=6).contains(&litter.len()));
        for (i, pup) in litter.iter().enumerate() {
            assert_eq!(pup.id(), MouseId(3 + i as u64));
            assert_eq!(pup.generation(), 1);
            assert_eq!(pup.parents().map(|p| **p), Some([MouseId(1), MouseId(2)]));
            assert!(pup.genome().genotypes().iter().all(|g| *g == 1));
            assert_eq!(pup.phenotype().label(Trait::CoatColor), Some("black"));
        }
        Ok(())
    }

    #[test]
    fn exact_litter_is_honored() -> Result<()> {
        let breeder = breeder(10)?;
        let mut rng = SimRng::with_seed(1);
        let a = founder(&breeder, 1, 0, "Bb", &mut rng)?;
        let mut ids = IdAllocator::starting_at(2);
        // Selfing is permitted.
        let litter = breeder.mate(&a, &a, &mut ids, Some(LitterSize::Exact(9)), &mut rng)?;
        assert_eq!(litter.len(), 9);
        assert!(breeder.mate(&a, &a, &mut ids, Some(LitterSize::Exact(0)), &mut rng).is_err());
        Ok(())
    }

    #[test]
    fn generation_follows_oldest_parent() -> Result<()> {
        let breeder = breeder(10)?;
        let mut rng = SimRng::with_seed(5);
        let mut ids = IdAllocator::starting_at(3);
        let a = founder(&breeder, 1, 0, "BB", &mut rng)?;
        let b = founder(&breeder, 2, 1, "BB", &mut rng)?;
        let child = breeder.offspring(&a, &b, ids.next_id(), &mut rng)?;
        let grandchild = breeder.offspring(&child, &a, ids.next_id(), &mut rng)?;
        assert_eq!(grandchild.generation(), 2);
        Ok(())
    }

    #[test]
    fn founder_layout_mismatch() -> Result<()> {
        let breeder = breeder(10)?;
        let genome = Genome::new(vec![0; 5], vec![0; 5], VisibleTraits::default())?;
        assert!(breeder.founder(MouseId(1), genome, None, &mut SimRng::with_seed(0)).is_err());
        Ok(())
    }
}
