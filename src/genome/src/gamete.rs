use crate::{
    genome::{Genome, GenomeError},
    visible::{Trait, TraitAllele, VisibleTraits},
};

/// Haploid product of a meiosis: one allele per marker locus and per visible trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gamete {
    markers: Vec<u8>,
    traits : [TraitAllele; Trait::COUNT],
}

impl Gamete {
    pub(crate) fn new(markers: Vec<u8>, traits: [TraitAllele; Trait::COUNT]) -> Self {
        Self { markers, traits }
    }

    #[must_use]
    pub fn markers(&self) -> &[u8] {
        &self.markers
    }

    #[must_use]
    pub fn trait_allele(&self, trait_: Trait) -> TraitAllele {
        self.traits[trait_.index()]
    }

    /// Combine two gametes into a diploid genome. `self` provides the paternal haplotype,
    /// `other` the maternal one.
    /// 
    /// # Errors
    /// `GenomeError::GameteMismatch` if both gametes do not carry the same number of markers.
    pub fn fertilize(&self, other: &Self) -> Result<Genome, GenomeError> {
        if self.markers.len() != other.markers.len() {
            return Err(GenomeError::GameteMismatch(self.markers.len(), other.markers.len()))
        }
        let mut traits = VisibleTraits::default();
        for t in Trait::ALL {
            traits.set(t, [self.trait_allele(t), other.trait_allele(t)]);
        }
        Genome::new(self.markers.clone(), other.markers.clone(), traits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fertilize_pairs_alleles_positionally() -> Result<(), GenomeError> {
        let sperm = Gamete::new(vec![0, 1, 1], [TraitAllele::FIRST; Trait::COUNT]);
        let egg   = Gamete::new(vec![1, 1, 0], [TraitAllele::SECOND; Trait::COUNT]);
        let zygote = sperm.fertilize(&egg)?;
        assert_eq!(zygote.haplotype(0), &[0, 1, 1]);
        assert_eq!(zygote.haplotype(1), &[1, 1, 0]);
        assert_eq!(zygote.genotypes(), vec![1, 2, 1]);
        assert_eq!(zygote.traits().to_string(), "Bb Ls ND FA");
        Ok(())
    }

    #[test]
    fn mismatched_gametes() {
        let sperm = Gamete::new(vec![0, 1], [TraitAllele::FIRST; Trait::COUNT]);
        let egg   = Gamete::new(vec![1], [TraitAllele::FIRST; Trait::COUNT]);
        assert_eq!(sperm.fertilize(&egg), Err(GenomeError::GameteMismatch(2, 1)));
    }
}
