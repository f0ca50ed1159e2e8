use std::fmt::{self, Display, Formatter};

use genome::{Genome, Phenotype};

mod id;
pub use id::{IdAllocator, MouseId};

mod parents;
pub use parents::Parents;

use crate::selection::BreedingGoal;

/// A single individual. Immutable once constructed: the phenotype and the quantitative trait
/// value are computed a single time, when the mouse is born.
/// # Fields:
/// - `id`         : process-unique identifier.
/// - `genome`     : marker haplotypes and visible trait alleles.
/// - `phenotype`  : expressed category of every visible trait.
/// - `parents`    : `None` for founders.
/// - `generation` : 0 for founders, `max(parents) + 1` otherwise.
/// - `trait_value`: additive quantitative trait value, residual included.
/// - `strain`     : name of the inbred strain a founder was derived from (real-data mode only).
#[derive(Debug, Clone)]
pub struct Mouse {
    id         : MouseId,
    genome     : Genome,
    phenotype  : Phenotype,
    parents    : Option<Parents>,
    generation : u32,
    trait_value: f64,
    strain     : Option<String>,
}

impl Mouse {
    pub(crate) fn new(id: MouseId, genome: Genome, phenotype: Phenotype, parents: Option<Parents>, generation: u32, trait_value: f64) -> Self {
        Self { id, genome, phenotype, parents, generation, trait_value, strain: None }
    }

    pub(crate) fn with_strain(mut self, strain: Option<String>) -> Self {
        self.strain = strain;
        self
    }

    #[must_use]
    pub fn id(&self) -> MouseId {
        self.id
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    #[must_use]
    pub fn phenotype(&self) -> &Phenotype {
        &self.phenotype
    }

    #[must_use]
    pub fn parents(&self) -> Option<&Parents> {
        self.parents.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn trait_value(&self) -> f64 {
        self.trait_value
    }

    #[must_use]
    pub fn strain(&self) -> Option<&str> {
        self.strain.as_deref()
    }

    #[must_use]
    pub fn is_founder(&self) -> bool {
        self.parents.is_none()
    }

    /// Percentage of the goal's traits this mouse expresses (100 for an empty goal).
    #[must_use]
    pub fn fitness(&self, goal: &BreedingGoal) -> f64 {
        goal.score(&self.phenotype)
    }

    /// Whether the mouse expresses every trait category of the goal.
    #[must_use]
    pub fn matches(&self, goal: &BreedingGoal) -> bool {
        goal.matched(&self.phenotype) == goal.len()
    }
}

impl Display for Mouse {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let pedigree = self.parents.map_or_else(|| String::from("founder"), |p| p.to_string());
        write!(f, "{} [gen {}] ({pedigree}) {} | {} | trait={:.3}",
            self.id, self.generation, self.genome.traits(), self.phenotype, self.trait_value
        )
    }
}
