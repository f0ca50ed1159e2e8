use thiserror::Error;

use super::Trait;

#[derive(Error, Debug, PartialEq)]
pub enum TraitError {
    #[error("'{symbol}' is not a valid {trait_} allele. Expected one of {alphabet:?}")]
    InvalidSymbol{trait_: Trait, symbol: char, alphabet: [char; 2]},

    #[error("Unknown visible trait '{0}'")]
    UnknownTrait(String),

    #[error("Invalid {trait_} genotype '{genotype}': expected exactly two allele symbols")]
    InvalidGenotype{trait_: Trait, genotype: String},
}
