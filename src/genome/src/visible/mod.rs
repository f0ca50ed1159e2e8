use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

mod error;
pub use error::TraitError;

mod dominance;
pub use dominance::{DominanceRule, DominanceRules, Phenotype};

/// Named, single-locus visible traits. Each one is biallelic, with a fixed two-symbol alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    CoatColor,
    Size,
    EarShape,
    Temperament,
}

impl Trait {
    pub const COUNT: usize = 4;
    pub const ALL: [Trait; Self::COUNT] = [Self::CoatColor, Self::Size, Self::EarShape, Self::Temperament];

    /// Allele alphabet of this trait. Index `0` is the first symbol, index `1` the second.
    #[must_use]
    pub fn alphabet(self) -> [char; 2] {
        match self {
            Self::CoatColor   => ['B', 'b'],
            Self::Size        => ['L', 's'],
            Self::EarShape    => ['N', 'D'],
            Self::Temperament => ['F', 'A'],
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CoatColor   => "coat_color",
            Self::Size        => "size",
            Self::EarShape    => "ear_shape",
            Self::Temperament => "temperament",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Display for Trait {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Trait {
    type Err = TraitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| TraitError::UnknownTrait(s.to_string()))
    }
}

/// One allele at a visible trait locus, stored as an index into that trait's alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TraitAllele(u8);

impl TraitAllele {
    pub const FIRST : Self = Self(0);
    pub const SECOND: Self = Self(1);

    /// # Errors
    /// `TraitError::InvalidSymbol` if `symbol` does not belong to the alphabet of `trait_`
    pub fn from_symbol(trait_: Trait, symbol: char) -> Result<Self, TraitError> {
        let alphabet = trait_.alphabet();
        alphabet.iter()
            .position(|s| *s == symbol)
            .map(|idx| Self(idx as u8))
            .ok_or(TraitError::InvalidSymbol{trait_, symbol, alphabet})
    }

    #[must_use]
    pub fn symbol(self, trait_: Trait) -> char {
        trait_.alphabet()[usize::from(self.0)]
    }

    /// The other symbol of the alphabet.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self(1 - self.0)
    }

    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Diploid allele pairs for every visible trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibleTraits([[TraitAllele; 2]; Trait::COUNT]);

impl Default for VisibleTraits {
    /// Homozygous for the first symbol of every alphabet (`BB LL NN FF`)
    fn default() -> Self {
        Self([[TraitAllele::FIRST; 2]; Trait::COUNT])
    }
}

impl VisibleTraits {
    #[must_use]
    pub fn get(&self, trait_: Trait) -> [TraitAllele; 2] {
        self.0[trait_.index()]
    }

    pub fn set(&mut self, trait_: Trait, pair: [TraitAllele; 2]) {
        self.0[trait_.index()] = pair;
    }

    /// Builder-style setter, parsing a genotype string such as `"Bb"`.
    /// 
    /// # Errors
    /// - `TraitError::InvalidGenotype` if `genotype` does not hold exactly two symbols.
    /// - `TraitError::InvalidSymbol` if any symbol lies outside the trait's alphabet.
    pub fn with(mut self, trait_: Trait, genotype: &str) -> Result<Self, TraitError> {
        let pair = Self::parse_genotype(trait_, genotype)?;
        self.set(trait_, pair);
        Ok(self)
    }

    pub fn parse_genotype(trait_: Trait, genotype: &str) -> Result<[TraitAllele; 2], TraitError> {
        let symbols: Vec<char> = genotype.trim().chars().collect();
        let [first, second] = symbols[..] else {
            return Err(TraitError::InvalidGenotype{trait_, genotype: genotype.to_string()})
        };
        Ok([TraitAllele::from_symbol(trait_, first)?, TraitAllele::from_symbol(trait_, second)?])
    }

    /// Number of copies of `allele` carried at `trait_` (0, 1 or 2)
    #[must_use]
    pub fn copies_of(&self, trait_: Trait, allele: TraitAllele) -> u8 {
        self.get(trait_).iter().filter(|a| **a == allele).count() as u8
    }

    #[must_use]
    pub fn is_heterozygous(&self, trait_: Trait) -> bool {
        let [a, b] = self.get(trait_);
        a != b
    }

    /// Genotype string of `trait_`, e.g. `"Bb"`.
    #[must_use]
    pub fn genotype(&self, trait_: Trait) -> String {
        self.get(trait_).iter().map(|a| a.symbol(trait_)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Trait, [TraitAllele; 2])> + '_ {
        Trait::ALL.into_iter().map(|t| (t, self.get(t)))
    }

    pub(crate) fn pairs_mut(&mut self) -> impl Iterator<Item = &mut [TraitAllele; 2]> {
        self.0.iter_mut()
    }
}

impl Display for VisibleTraits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let genotypes: Vec<String> = Trait::ALL.iter().map(|t| self.genotype(*t)).collect();
        write!(f, "{}", genotypes.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_names_roundtrip() -> Result<(), TraitError> {
        for t in Trait::ALL {
            assert_eq!(t.name().parse::<Trait>()?, t);
        }
        assert_eq!("Ear-Shape".parse::<Trait>()?, Trait::EarShape);
        assert!("tail_length".parse::<Trait>().is_err());
        Ok(())
    }

    #[test]
    fn alphabet_is_enforced() {
        assert_eq!(TraitAllele::from_symbol(Trait::CoatColor, 'b'), Ok(TraitAllele::SECOND));
        assert_eq!(
            TraitAllele::from_symbol(Trait::CoatColor, 'L'),
            Err(TraitError::InvalidSymbol{trait_: Trait::CoatColor, symbol: 'L', alphabet: ['B', 'b']})
        );
    }

    #[test]
    fn parse_and_display() -> Result<(), TraitError> {
        let traits = VisibleTraits::default()
            .with(Trait::CoatColor, "Bb")?
            .with(Trait::Size, "ss")?
            .with(Trait::EarShape, "DN")?;
        assert_eq!(traits.to_string(), "Bb ss DN FF");
        assert_eq!(traits.copies_of(Trait::Size, TraitAllele::SECOND), 2);
        assert!(traits.is_heterozygous(Trait::EarShape));
        assert!(!traits.is_heterozygous(Trait::Temperament));
        Ok(())
    }

    #[test]
    fn malformed_genotypes() {
        assert!(VisibleTraits::default().with(Trait::CoatColor, "B").is_err());
        assert!(VisibleTraits::default().with(Trait::CoatColor, "BBb").is_err());
        assert!(VisibleTraits::default().with(Trait::Temperament, "Fx").is_err());
    }

    #[test]
    fn flip_toggles_symbol() {
        assert_eq!(TraitAllele::FIRST.flipped(), TraitAllele::SECOND);
        assert_eq!(TraitAllele::SECOND.flipped().symbol(Trait::Size), 'L');
    }
}
