use thiserror::Error;

use crate::Trait;

#[derive(Error, Debug, PartialEq)]
pub enum FrequencyError {
    #[error("Allele frequency table is empty")]
    Empty,

    #[error("Allele frequency at locus {locus} does not lie within [0, 1] (got {value})")]
    OutOfBounds{locus: usize, value: f64},

    #[error("Invalid allele frequency bounds [{lo}, {hi}]")]
    InvalidBounds{lo: f64, hi: f64},

    #[error("Invalid allele frequency for {trait_}: {value} does not lie within [0, 1]")]
    InvalidTraitFrequency{trait_: Trait, value: f64},

    #[error("Genotype count at locus {locus} lies outside {{0, 1, 2}} (got {value})")]
    InvalidGenotype{locus: usize, value: u8},

    #[error("Genotype rows do not hold the same number of loci ({expected} vs {got})")]
    RaggedGenotypes{expected: usize, got: usize},
}
