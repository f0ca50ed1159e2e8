use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GenomeError {
    #[error("Haplotypes do not carry the same number of markers ({0} vs {1})")]
    HaplotypeLength(usize, usize),

    #[error("Marker allele at locus {locus} must be 0 or 1 (got {value})")]
    InvalidAllele{locus: usize, value: u8},

    #[error("Marker genotype at locus {locus} must lie within {{0, 1, 2}} (got {value})")]
    InvalidGenotype{locus: usize, value: u8},

    #[error("Genome carries {got} markers, while the chromosome layout expects {expected}")]
    LayoutMismatch{expected: usize, got: usize},

    #[error("Cannot fertilize gametes of unequal length ({0} vs {1})")]
    GameteMismatch(usize, usize),
}
