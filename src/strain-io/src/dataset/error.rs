use thiserror::Error;

use super::Locus;

#[derive(Error, Debug, PartialEq)]
pub enum DatasetError {
    #[error("Genotype of strain '{strain}' at {locus} must lie within {{0, 1, 2}} (got {value})")]
    InvalidGenotype{strain: String, locus: Locus, value: i64},

    #[error("Unknown strain '{0}'")]
    UnknownStrain(String),

    #[error("No genotype recorded for strain '{strain}' at {locus}")]
    MissingGenotype{strain: String, locus: Locus},
}
