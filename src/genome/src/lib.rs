mod rng;
pub use rng::SimRng;

pub mod chromosome;
pub use chromosome::ChromosomeLayout;

pub mod visible;
pub use visible::{DominanceRule, DominanceRules, Phenotype, Trait, TraitAllele, VisibleTraits};

pub mod frequencies;
pub use frequencies::{AlleleFrequencies, TraitFrequencies};

mod meiosis;

pub mod mutation;
pub use mutation::{MutationCount, MutationRates};

mod genome;
pub use crate::genome::{Genome, GenomeError};

mod gamete;
pub use gamete::Gamete;
