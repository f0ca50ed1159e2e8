use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use genome::Trait;
use located_error::prelude::*;
use serde::Serialize;

use crate::{heritability::{realized_heritability, HeritabilityEstimate, SelectionEvent}, selection::Strategy};

/// Outcome of a single generational advance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub generation  : u32,
    pub strategy    : Strategy,
    pub size        : usize,
    pub culled      : usize,
    pub pairs       : usize,
    pub brood       : usize,
    pub trait_mean  : f64,
    pub trait_var   : f64,
    pub mean_fitness: f64,
    pub selection   : SelectionEvent,
}

impl GenerationReport {
    /// Realized heritability of the selection event that produced this generation.
    pub fn realized_heritability(&self) -> Result<HeritabilityEstimate> {
        realized_heritability(&self.selection)
    }
}

impl Display for GenerationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "generation {:>3} | {:<11} | size {:>4} (brood {:>4}, {} pairs, {} culled) | trait {:>8.3} ± {:<6.3} | fitness {:>5.1}%",
            self.generation, self.strategy, self.size, self.brood, self.pairs, self.culled,
            self.trait_mean, self.trait_var.sqrt(), self.mean_fitness
        )
    }
}

/// Snapshot statistics of the current generation.
/// 
/// Genomic fields are `None` whenever the underlying statistic is undefined for the current
/// generation (e.g. every marker fixed, a single individual, or constant inbreeding coefficients).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationSummary {
    pub generation           : u32,
    pub size                 : usize,
    pub registered           : usize,
    pub goal                 : String,
    pub mean_fitness         : f64,
    pub min_fitness          : f64,
    pub max_fitness          : f64,
    /// Percentage of mice expressing each category, per trait.
    pub trait_frequencies    : BTreeMap<Trait, BTreeMap<String, f64>>,
    /// Visible trait allelic diversity, scaled to 0-100.
    pub diversity            : f64,
    pub mean_pedigree_f      : f64,
    pub mean_genomic_f       : Option<f64>,
    pub inbreeding_corr      : Option<f64>,
    pub mean_grm_diagonal    : Option<f64>,
    pub mean_grm_off_diagonal: Option<f64>,
    pub heterozygosity       : f64,
    pub trait_mean           : f64,
    pub trait_sd             : f64,
}

impl Display for PopulationSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let opt = |value: Option<f64>| value.map_or_else(|| String::from("NA"), |v| format!("{v:.4}"));
        writeln!(f, "Generation {} | {} mice ({} registered) | goal: {}", self.generation, self.size, self.registered, self.goal)?;
        writeln!(f, "  fitness       : mean {:.1}% [{:.1}, {:.1}]", self.mean_fitness, self.min_fitness, self.max_fitness)?;
        for (t, categories) in &self.trait_frequencies {
            let fields: Vec<String> = categories.iter().map(|(label, pct)| format!("{label} {pct:.1}%")).collect();
            writeln!(f, "  {:<14}: {}", t.to_string(), fields.join(", "))?;
        }
        writeln!(f, "  diversity     : {:.1}", self.diversity)?;
        writeln!(f, "  inbreeding    : F_ped {:.4} | F_grm {} | r {}", self.mean_pedigree_f, opt(self.mean_genomic_f), opt(self.inbreeding_corr))?;
        writeln!(f, "  GRM           : diag {} | off-diag {}", opt(self.mean_grm_diagonal), opt(self.mean_grm_off_diagonal))?;
        writeln!(f, "  heterozygosity: {:.4}", self.heterozygosity)?;
        write!(f, "  trait         : {:.3} ± {:.3}", self.trait_mean, self.trait_sd)
    }
}
