mod error;
pub use error::PopulationError;

pub mod config;
pub use config::{ConfigError, EngineConfig, LitterSize};

pub mod mouse;
pub use mouse::{IdAllocator, Mouse, MouseId, Parents};

mod registry;
pub use registry::Registry;

pub mod quantitative;
pub use quantitative::QuantitativeModel;

pub mod mating;
pub use mating::Breeder;

pub mod kinship;
pub use kinship::KinshipCache;

pub mod pedigree;
pub use pedigree::PedigreeTree;

pub mod grm;
pub use grm::Grm;

pub mod heritability;
pub use heritability::{midparent_regression, realized_heritability, HeritabilityEstimate, SelectionEvent};

pub mod stats;

pub mod selection;
pub use selection::{BreedingGoal, GenerationPlan, Strategy};

pub mod founders;
pub use founders::{FounderSource, StrainMapping};

mod population;
pub use population::{GenerationReport, Population, PopulationSummary};
