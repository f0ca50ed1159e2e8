use std::{collections::{BTreeMap, BTreeSet}, sync::Arc};

use ahash::AHashSet;
use genome::{AlleleFrequencies, SimRng, Trait, TraitAllele};
use located_error::prelude::*;
use log::{debug, info};

use crate::{
    config::{ConfigError, EngineConfig, LitterSize},
    error::PopulationError,
    founders::FounderSource,
    grm::Grm,
    heritability::SelectionEvent,
    kinship::KinshipCache,
    mating::Breeder,
    mouse::{IdAllocator, Mouse, MouseId},
    pedigree::{self, PedigreeTree},
    registry::Registry,
    selection::{self, BreedingGoal, GenerationPlan, Strategy},
    stats,
};

mod report;
pub use report::{GenerationReport, PopulationSummary};

/// A breeding colony: the current generation, plus the registry of every mouse it ever held.
/// 
/// Owns its random stream, identifier allocator and kinship memo table: two populations built from
/// the same configuration and seed evolve identically.
#[derive(Debug)]
pub struct Population {
    breeder   : Breeder,
    goal      : BreedingGoal,
    base_freqs: AlleleFrequencies,
    current   : Vec<Arc<Mouse>>,
    registry  : Registry,
    kinship   : KinshipCache,
    ids       : IdAllocator,
    generation: u32,
    rng       : SimRng,
    history   : Vec<GenerationReport>,
}

impl Population {
    /// Found a generation 0 population of `size` mice.
    /// 
    /// Founder marker frequencies are drawn uniformly within the configured range. In strain mode,
    /// the quantitative trait model and the reference frequencies are calibrated on the genotypes
    /// actually observed in the founders.
    /// 
    /// # Errors
    /// - Any invalid configuration (`ConfigError`)
    /// - A degenerate founder generation (no additive variance)
    pub fn founders(config: &EngineConfig, source: &FounderSource, size: usize, goal: BreedingGoal, seed: u64) -> Result<Self> {
        let ctx = "While founding a population";
        config.validate().loc(ctx)?;
        if size == 0 {
            return Err(ConfigError::EmptyPopulationSize).loc(ctx)
        }
        info!("Founding a population of {size} mice (seed: {seed}, goal: {goal})");

        let mut rng = SimRng::with_seed(seed);
        let [lo, hi] = config.marker_frequency_range;
        let sampled = AlleleFrequencies::sample_between(config.n_markers, lo, hi, &mut rng).loc(ctx)?;
        let genomes = source.genomes(size, &sampled, &config.trait_frequencies()?, &mut rng).loc(ctx)?;

        let base_freqs = if source.is_simulated() {
            sampled
        } else {
            let rows: Vec<Vec<u8>> = genomes.iter().map(|(g, _)| g.genotypes()).collect();
            AlleleFrequencies::from_genotypes(rows.iter().map(Vec::as_slice)).loc(ctx)?
        };
        let breeder = Breeder::from_config(config, &base_freqs, &mut rng).loc(ctx)?;

        let mut ids = IdAllocator::new();
        let mut registry = Registry::new();
        let mut current = Vec::with_capacity(size);
        for (genome, strain) in genomes {
            let mouse = Arc::new(breeder.founder(ids.next_id(), genome, strain, &mut rng).loc(ctx)?);
            registry.insert(Arc::clone(&mouse)).loc(ctx)?;
            current.push(mouse);
        }

        Ok(Self {
            breeder, goal, base_freqs, current, registry,
            kinship   : KinshipCache::new(),
            ids,
            generation: 0,
            rng,
            history   : Vec::new(),
        })
    }

    /// Score, cull, pair and mate the current generation, then replace it with the offspring.
    /// 
    /// # Errors
    /// - `ConfigError` for an invalid plan.
    /// - `PopulationError::InsufficientSurvivors` if fewer than two mice survive culling.
    pub fn next_generation(&mut self, plan: &GenerationPlan) -> Result<GenerationReport> {
        let generation = self.generation;
        let ctx = move || format!("While advancing generation {generation}");
        plan.validate().with_loc(ctx)?;
        if self.current.is_empty() {
            return Err(PopulationError::EmptyPopulation).with_loc(ctx)
        }

        // 1. score, then cull the lowest fraction.
        let scored: Vec<(Arc<Mouse>, f64)> = self.current.iter()
            .map(|m| (Arc::clone(m), self.score(m, plan.strategy)))
            .collect();
        let n_before = scored.len();
        let survivors: Vec<Arc<Mouse>> = selection::cull(scored, plan.cull_rate).with_loc(ctx)?
            .into_iter()
            .map(|(m, _)| m)
            .collect();
        let culled = n_before - survivors.len();

        // 2. pair.
        let pairs = self.select_pairs(&survivors, plan).with_loc(ctx)?;
        debug!("Generation {}: {} survivor(s), {} pair(s) ({})", self.generation, survivors.len(), pairs.len(), plan.strategy);

        // 3. mate.
        let mut selection = SelectionEvent {
            pre_selection: self.current.iter().map(|m| m.trait_value()).collect(),
            ..SelectionEvent::default()
        };
        let mut selected = AHashSet::new();
        let mut brood = Vec::new();
        for (a, b) in &pairs {
            for parent in [a, b] {
                if selected.insert(parent.id()) {
                    selection.selected.push(parent.trait_value());
                }
            }
            let midparent = 0.5 * (a.trait_value() + b.trait_value());
            for pup in self.breeder.mate(a, b, &mut self.ids, plan.litter, &mut self.rng).with_loc(ctx)? {
                selection.offspring.push(pup.trait_value());
                selection.midparents.push((midparent, pup.trait_value()));
                brood.push(Arc::new(pup));
            }
        }
        for pup in &brood {
            self.registry.insert(Arc::clone(pup)).with_loc(ctx)?;
        }
        let brood_size = brood.len();

        // 4. enforce capacity.
        if let Some(capacity) = plan.capacity {
            if brood.len() > capacity {
                self.rng.shuffle(&mut brood);
                brood.truncate(capacity);
                brood.sort_by_key(|m| m.id());
            }
        }

        self.current = brood;
        self.generation += 1;

        let values: Vec<f64> = self.current.iter().map(|m| m.trait_value()).collect();
        let fitness: Vec<f64> = self.current.iter().map(|m| m.fitness(&self.goal)).collect();
        let report = GenerationReport {
            generation  : self.generation,
            strategy    : plan.strategy,
            size        : self.current.len(),
            culled,
            pairs       : pairs.len(),
            brood       : brood_size,
            trait_mean  : stats::mean(&values).with_loc(ctx)?,
            trait_var   : stats::variance(&values).with_loc(ctx)?,
            mean_fitness: stats::mean(&fitness).with_loc(ctx)?,
            selection,
        };
        info!("{report}");
        self.history.push(report.clone());
        Ok(report)
    }

    fn score(&self, mouse: &Mouse, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::TraitValue => mouse.trait_value(),
            _                    => mouse.fitness(&self.goal),
        }
    }

    fn select_pairs(&mut self, survivors: &[Arc<Mouse>], plan: &GenerationPlan) -> Result<Vec<(Arc<Mouse>, Arc<Mouse>)>> {
        let registry = &self.registry;
        let kinship  = &mut self.kinship;
        match plan.strategy {
            Strategy::Random => Ok(selection::pair_random(survivors, &mut self.rng)),
            Strategy::Fitness | Strategy::TraitValue => {
                let top = selection::top_count(survivors.len(), plan.top_fraction);
                Ok(selection::pair_sequential(&survivors[..top]))
            },
            Strategy::Diverse | Strategy::Assortative => {
                let lowest = plan.strategy == Strategy::Diverse;
                selection::pair_by_relatedness(survivors, lowest, |a, b| kinship.relatedness(registry, a.id(), b.id()))
            },
        }
    }

    /// Mate two registered mice outside of the generational cycle. Offspring are registered but do
    /// not join the current generation.
    pub fn breed(&mut self, a: MouseId, b: MouseId, litter: Option<LitterSize>) -> Result<Vec<Arc<Mouse>>> {
        let ctx = || format!("While breeding {a} with {b}");
        let first  = Arc::clone(self.registry.get(a).with_loc(ctx)?);
        let second = Arc::clone(self.registry.get(b).with_loc(ctx)?);
        let litter = self.breeder.mate(&first, &second, &mut self.ids, litter, &mut self.rng).with_loc(ctx)?;
        litter.into_iter().map(|pup| {
            let pup = Arc::new(pup);
            self.registry.insert(Arc::clone(&pup)).with_loc(ctx)?;
            Ok(pup)
        }).collect()
    }

    /// VanRaden GRM of the current generation, with sample allele frequencies.
    pub fn grm(&self) -> Result<Grm> {
        Grm::compute(&self.current)
    }

    /// VanRaden GRM of arbitrary registered mice, against the founder allele frequencies.
    pub fn grm_with_base_frequencies(&self, ids: &[MouseId]) -> Result<Grm> {
        let mice = ids.iter()
            .map(|id| self.registry.get(*id).cloned().loc("While computing a GRM against founder frequencies"))
            .collect::<Result<Vec<_>>>()?;
        Grm::compute_with_frequencies(&mice, &self.base_freqs)
    }

    pub fn pedigree_inbreeding(&mut self, id: MouseId) -> Result<f64> {
        self.kinship.inbreeding(&self.registry, id)
    }

    pub fn kinship(&mut self, a: MouseId, b: MouseId) -> Result<f64> {
        self.kinship.kinship(&self.registry, a, b)
    }

    pub fn relatedness(&mut self, a: MouseId, b: MouseId) -> Result<f64> {
        self.kinship.relatedness(&self.registry, a, b)
    }

    /// Every registered ancestor of `id`, up to `max_depth` generations back.
    pub fn ancestors(&self, id: MouseId, max_depth: usize) -> Result<BTreeSet<MouseId>> {
        pedigree::ancestors(&self.registry, id, max_depth)
    }

    /// Pedigree tree of `id`, `depth` generations back.
    pub fn pedigree(&self, id: MouseId, depth: usize) -> Result<PedigreeTree> {
        PedigreeTree::build(&self.registry, id, depth)
    }

    /// `diag(GRM) - 1` for every mouse of the current generation.
    pub fn genomic_inbreeding(&self) -> Result<Vec<(MouseId, f64)>> {
        let grm = self.grm()?;
        Ok(grm.ids().iter().copied().zip(grm.genomic_inbreeding()).collect())
    }

    /// Percentage of the current generation expressing each category of each trait.
    #[must_use]
    pub fn trait_frequencies(&self) -> BTreeMap<Trait, BTreeMap<String, f64>> {
        let n = self.current.len() as f64;
        let mut frequencies: BTreeMap<Trait, BTreeMap<String, f64>> = BTreeMap::new();
        for mouse in &self.current {
            for (t, label) in mouse.phenotype().iter() {
                *frequencies.entry(*t).or_default().entry(label.clone()).or_default() += 100.0 / n;
            }
        }
        frequencies
    }

    /// Visible trait allelic diversity: `Σ_t (1 - Σ_a f_a²)`, over its maximum (`0.5` per trait), as a
    /// percentage.
    #[must_use]
    pub fn diversity(&self) -> f64 {
        if self.current.is_empty() {
            return 0.0
        }
        let n_alleles = 2.0 * self.current.len() as f64;
        let heterozygosity: f64 = Trait::ALL.iter().map(|t| {
            let first = self.current.iter()
                .map(|m| f64::from(m.genome().traits().copies_of(*t, TraitAllele::FIRST)))
                .sum::<f64>() / n_alleles;
            1.0 - first.powi(2) - (1.0 - first).powi(2)
        }).sum();
        heterozygosity / (Trait::COUNT as f64 * 0.5) * 100.0
    }

    /// Mean expected heterozygosity of the markers of the current generation: `mean(1 - p² - q²)`
    pub fn marker_heterozygosity(&self) -> Result<f64> {
        let rows: Vec<Vec<u8>> = self.current.iter().map(|m| m.genome().genotypes()).collect();
        let freqs = AlleleFrequencies::from_genotypes(rows.iter().map(Vec::as_slice))
            .loc("While computing marker heterozygosity")?;
        Ok(freqs.total_heterozygosity() / freqs.len() as f64)
    }

    /// Whether the breeding goal is reached: for an empty goal, `diversity >= threshold`; otherwise
    /// at least `threshold` percent of the current generation expresses every goal trait.
    #[must_use]
    pub fn goal_reached(&self, threshold: f64) -> bool {
        if self.current.is_empty() {
            return false
        }
        if self.goal.is_empty() {
            return self.diversity() >= threshold
        }
        let matching = self.current.iter().filter(|m| m.matches(&self.goal)).count();
        matching as f64 / self.current.len() as f64 * 100.0 >= threshold
    }

    /// Snapshot statistics of the current generation.
    pub fn summary(&mut self) -> Result<PopulationSummary> {
        let ctx = "While summarizing the population";
        if self.current.is_empty() {
            return Err(PopulationError::EmptyPopulation).loc(ctx)
        }
        let fitness: Vec<f64> = self.current.iter().map(|m| m.fitness(&self.goal)).collect();
        let values : Vec<f64> = self.current.iter().map(|m| m.trait_value()).collect();
        let ids    : Vec<MouseId> = self.current.iter().map(|m| m.id()).collect();
        let pedigree_f = ids.iter().map(|id| self.pedigree_inbreeding(*id)).collect::<Result<Vec<f64>>>()?;

        let grm = unless_degenerate(self.grm()).loc(ctx)?;
        if grm.is_none() {
            debug!("GRM is undefined for generation {}", self.generation);
        }
        let genomic_f = grm.as_ref().map(Grm::genomic_inbreeding);
        let inbreeding_corr = genomic_f.as_ref().and_then(|gf| stats::pearson(&pedigree_f, gf).ok());

        Ok(PopulationSummary {
            generation           : self.generation,
            size                 : self.current.len(),
            registered           : self.registry.len(),
            goal                 : self.goal.to_string(),
            mean_fitness         : stats::mean(&fitness).loc(ctx)?,
            min_fitness          : fitness.iter().copied().fold(f64::INFINITY, f64::min),
            max_fitness          : fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            trait_frequencies    : self.trait_frequencies(),
            diversity            : self.diversity(),
            mean_pedigree_f      : stats::mean(&pedigree_f).loc(ctx)?,
            mean_genomic_f       : genomic_f.as_deref().and_then(|gf| stats::mean(gf).ok()),
            inbreeding_corr,
            mean_grm_diagonal    : grm.as_ref().map(Grm::mean_diagonal),
            mean_grm_off_diagonal: grm.as_ref().and_then(Grm::mean_off_diagonal),
            heterozygosity       : self.marker_heterozygosity()?,
            trait_mean           : stats::mean(&values).loc(ctx)?,
            trait_sd             : stats::sd(&values).loc(ctx)?,
        })
    }

    #[must_use]
    pub fn current(&self) -> &[Arc<Mouse>] {
        &self.current
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn get(&self, id: MouseId) -> Result<&Arc<Mouse>> {
        Ok(self.registry.get(id)?)
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn goal(&self) -> &BreedingGoal {
        &self.goal
    }

    #[must_use]
    pub fn breeder(&self) -> &Breeder {
        &self.breeder
    }

    /// Founder allele frequencies the quantitative model was calibrated on.
    #[must_use]
    pub fn base_frequencies(&self) -> &AlleleFrequencies {
        &self.base_freqs
    }

    #[must_use]
    pub fn history(&self) -> &[GenerationReport] {
        &self.history
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

/// `None` when the statistic is undefined for the data. Any other error is passed through.
fn unless_degenerate<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e.root_cause().downcast_ref::<PopulationError>(), Some(PopulationError::DegenerateStatistic(_))) => Ok(None),
        Err(e) => Err(e),
    }
}
