use std::collections::BTreeMap;

use genome::{AlleleFrequencies, Genome, SimRng, Trait, TraitAllele, TraitFrequencies, VisibleTraits};
use located_error::prelude::*;
use log::{debug, warn};
use strain_io::{DatasetError, Locus, StrainDataset};

use crate::config::ConfigError;

/// Links engine loci to dataset loci.
/// - `markers`: marker index -> dataset locus.
/// - `traits` : visible trait -> dataset locus. The dataset's `0/1/2` count is read as the number
///              of copies of the trait's second alphabet symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrainMapping {
    markers: BTreeMap<usize, Locus>,
    traits : BTreeMap<Trait, Locus>,
}

impl StrainMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_marker(mut self, index: usize, locus: Locus) -> Self {
        self.markers.insert(index, locus);
        self
    }

    #[must_use]
    pub fn with_trait(mut self, trait_: Trait, locus: Locus) -> Self {
        self.traits.insert(trait_, locus);
        self
    }

    /// Coat colour read from the albino locus (`Tyr`, where `c/c` gives a white coat), and the
    /// first three markers set to the `Tyr`, `Tyrp1` and `Myo5a` genotypes.
    #[must_use]
    pub fn classic() -> Self {
        Self::new()
            .with_trait(Trait::CoatColor, Locus::new("Tyr"))
            .with_marker(0, Locus::new("Tyr"))
            .with_marker(1, Locus::new("Tyrp1"))
            .with_marker(2, Locus::new("Myo5a"))
    }

    /// # Errors
    /// `ConfigError::MarkerOutOfRange` if a mapped marker lies outside the genome.
    pub fn validate(&self, n_markers: usize) -> Result<(), ConfigError> {
        match self.markers.keys().find(|index| **index >= n_markers) {
            Some(index) => Err(ConfigError::MarkerOutOfRange{index: *index, n_markers}),
            None        => Ok(()),
        }
    }
}

/// Origin of founder genomes.
/// - `Simulated`: markers and visible traits are drawn from the founder frequency tables.
/// - `Strains`  : founders cycle through `strains`. Mapped loci take the strain's documented
///                genotype. Unmapped or missing loci fall back to frequency sampling.
pub enum FounderSource<'a> {
    Simulated,
    Strains{dataset: &'a dyn StrainDataset, strains: Vec<String>, mapping: StrainMapping},
}

impl FounderSource<'_> {
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated)
    }

    /// Draw `size` founder genomes, along with the name of their strain of origin.
    pub fn genomes(&self, size: usize, freqs: &AlleleFrequencies, trait_freqs: &TraitFrequencies, rng: &mut SimRng) -> Result<Vec<(Genome, Option<String>)>> {
        match self {
            Self::Simulated => Ok((0..size).map(|_| (Genome::founder(freqs, trait_freqs, rng), None)).collect()),
            Self::Strains{dataset, strains, mapping} => {
                let ctx = "While deriving founders from strain data";
                if strains.is_empty() {
                    return Err(ConfigError::NoStrains).loc(ctx)
                }
                mapping.validate(freqs.len()).loc(ctx)?;
                if let Some(unknown) = strains.iter().find(|s| !dataset.contains_strain(s)) {
                    return Err(DatasetError::UnknownStrain(unknown.clone())).loc(ctx)
                }
                (0..size).map(|i| {
                    let strain = &strains[i % strains.len()];
                    let genome = strain_genome(*dataset, strain, mapping, freqs, trait_freqs, i < strains.len(), rng).loc(ctx)?;
                    Ok((genome, Some(strain.clone())))
                }).collect()
            }
        }
    }
}

fn strain_genome(
    dataset    : &dyn StrainDataset,
    strain     : &str,
    mapping    : &StrainMapping,
    freqs      : &AlleleFrequencies,
    trait_freqs: &TraitFrequencies,
    report     : bool,
    rng        : &mut SimRng
) -> Result<Genome> {
    let mut missing = Vec::new();
    let genotypes: Vec<u8> = freqs.iter().enumerate().map(|(j, p)| {
        let observed = mapping.markers.get(&j).and_then(|locus| {
            let genotype = dataset.genotype_for(strain, locus);
            if genotype.is_none() {
                missing.push(locus.to_string());
            }
            genotype
        });
        observed.unwrap_or_else(|| u8::from(rng.chance(*p)) + u8::from(rng.chance(*p)))
    }).collect();

    let mut traits = VisibleTraits::default();
    for t in Trait::ALL {
        let observed = mapping.traits.get(&t).and_then(|locus| {
            let genotype = dataset.genotype_for(strain, locus);
            if genotype.is_none() {
                missing.push(locus.to_string());
            }
            genotype
        });
        let pair = match observed {
            Some(0) => [TraitAllele::FIRST, TraitAllele::FIRST],
            Some(1) => [TraitAllele::FIRST, TraitAllele::SECOND],
            Some(_) => [TraitAllele::SECOND, TraitAllele::SECOND],
            None    => {
                let p = trait_freqs.first_symbol(t);
                let mut draw = || if rng.chance(p) { TraitAllele::FIRST } else { TraitAllele::SECOND };
                [draw(), draw()]
            }
        };
        traits.set(t, pair);
    }

    if report && !missing.is_empty() {
        warn!("No genotype recorded for strain '{strain}' at {}: sampling from founder frequencies instead.", missing.join(", "));
    }
    debug!("Founder of strain '{strain}': {traits}");
    Ok(Genome::from_genotypes(&genotypes, traits, rng)?)
}
