use located_error::prelude::*;

use crate::{
    gamete::Gamete,
    meiosis,
    mutation::{MutationCount, MutationRates},
    visible::{DominanceRules, Phenotype, Trait, TraitAllele, VisibleTraits},
    AlleleFrequencies, ChromosomeLayout, SimRng, TraitFrequencies,
};

mod error;
pub use error::GenomeError;

/// Diploid genome of a single individual.
/// # Fields:
/// - `haplotypes`: paternal (`[0]`) and maternal (`[1]`) marker alleles. Each allele is `0` or `1`.
/// - `traits`    : allele pairs of every visible trait locus.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    haplotypes: [Vec<u8>; 2],
    traits    : VisibleTraits,
}

impl Genome {
    /// # Errors
    /// - `GenomeError::HaplotypeLength` if `paternal` and `maternal` differ in length.
    /// - `GenomeError::InvalidAllele` if any allele is neither `0` nor `1`.
    pub fn new(paternal: Vec<u8>, maternal: Vec<u8>, traits: VisibleTraits) -> Result<Self, GenomeError> {
        if paternal.len() != maternal.len() {
            return Err(GenomeError::HaplotypeLength(paternal.len(), maternal.len()))
        }
        for haplotype in [&paternal, &maternal] {
            if let Some((locus, value)) = haplotype.iter().enumerate().find(|(_, a)| **a > 1) {
                return Err(GenomeError::InvalidAllele{locus, value: *value})
            }
        }
        Ok(Self { haplotypes: [paternal, maternal], traits })
    }

    /// Draw a founder genome: every allele independently carries the `1` state with the frequency of
    /// its locus, and every visible-trait allele is the first symbol of its alphabet with the
    /// trait's frequency.
    pub fn founder(freqs: &AlleleFrequencies, trait_freqs: &TraitFrequencies, rng: &mut SimRng) -> Self {
        let mut haplotype = || freqs.iter().map(|p| u8::from(rng.chance(*p))).collect::<Vec<u8>>();
        let haplotypes = [haplotype(), haplotype()];

        let mut traits = VisibleTraits::default();
        for t in Trait::ALL {
            let p = trait_freqs.first_symbol(t);
            let mut draw = || if rng.chance(p) { TraitAllele::FIRST } else { TraitAllele::SECOND };
            let pair = [draw(), draw()];
            traits.set(t, pair);
        }
        Self { haplotypes, traits }
    }

    /// Build a genome from unphased genotype counts. Heterozygous loci are phased at random.
    /// 
    /// # Errors
    /// `GenomeError::InvalidGenotype` if any count lies outside `{0, 1, 2}`
    pub fn from_genotypes(genotypes: &[u8], traits: VisibleTraits, rng: &mut SimRng) -> Result<Self, GenomeError> {
        let mut paternal = Vec::with_capacity(genotypes.len());
        let mut maternal = Vec::with_capacity(genotypes.len());
        for (locus, g) in genotypes.iter().enumerate() {
            let (p, m) = match g {
                0 => (0, 0),
                1 => if rng.bool() { (0, 1) } else { (1, 0) },
                2 => (1, 1),
                _ => return Err(GenomeError::InvalidGenotype{locus, value: *g})
            };
            paternal.push(p);
            maternal.push(m);
        }
        Ok(Self { haplotypes: [paternal, maternal], traits })
    }

    #[must_use]
    pub fn n_markers(&self) -> usize {
        self.haplotypes[0].len()
    }

    #[must_use]
    pub fn haplotype(&self, strand: usize) -> &[u8] {
        &self.haplotypes[strand % 2]
    }

    /// Count of `1` alleles at `locus` (0, 1 or 2)
    #[must_use]
    pub fn genotype(&self, locus: usize) -> u8 {
        self.haplotypes[0][locus] + self.haplotypes[1][locus]
    }

    #[must_use]
    pub fn genotypes(&self) -> Vec<u8> {
        self.haplotypes[0].iter().zip(&self.haplotypes[1]).map(|(p, m)| p + m).collect()
    }

    /// Fraction of heterozygous marker loci.
    #[must_use]
    pub fn heterozygosity(&self) -> f64 {
        let hets = self.haplotypes[0].iter().zip(&self.haplotypes[1]).filter(|(p, m)| p != m).count();
        hets as f64 / self.n_markers().max(1) as f64
    }

    #[must_use]
    pub fn traits(&self) -> &VisibleTraits {
        &self.traits
    }

    #[must_use]
    pub fn phenotype(&self, rules: &DominanceRules) -> Phenotype {
        rules.express(&self.traits)
    }

    /// Simulate one meiotic product of this genome.
    /// 
    /// Every call draws fresh crossovers and strand choices: two gametes of the same parent are
    /// independent.
    /// 
    /// # Errors
    /// `GenomeError::LayoutMismatch` if `layout` does not describe this genome's marker count.
    pub fn form_gamete(&self, layout: &ChromosomeLayout, rng: &mut SimRng) -> Result<Gamete> {
        if layout.n_markers() != self.n_markers() {
            return Err(GenomeError::LayoutMismatch{expected: layout.n_markers(), got: self.n_markers()})
                .loc("While forming a gamete")
        }

        // ---- Markers: one recombined chromatid per chromosome.
        let homologs = [self.haplotypes[0].as_slice(), self.haplotypes[1].as_slice()];
        let mut markers = Vec::with_capacity(self.n_markers());
        for (chr, range) in layout.ranges().iter().enumerate() {
            let breakpoints = meiosis::sample_crossovers(range.len(), layout.expected_crossovers(chr), rng);
            meiosis::recombine(homologs, range.clone(), &breakpoints, rng, &mut markers);
        }

        // ---- Visible traits: each locus transmits one of its two alleles.
        let mut traits = [TraitAllele::FIRST; Trait::COUNT];
        for (allele, (_, pair)) in traits.iter_mut().zip(self.traits.iter()) {
            *allele = pair[rng.usize(0..2)];
        }

        Ok(Gamete::new(markers, traits))
    }

    /// Apply point mutations in place. Only ever called on a freshly fertilized offspring genome.
    pub fn mutate(&mut self, rates: &MutationRates, rng: &mut SimRng) -> MutationCount {
        let mut count = MutationCount::default();
        if rates.marker() > 0.0 {
            for allele in self.haplotypes.iter_mut().flat_map(|h| h.iter_mut()) {
                if rng.chance(rates.marker()) {
                    *allele ^= 1;
                    count.markers += 1;
                }
            }
        }
        if rates.visible() > 0.0 {
            for allele in self.traits.pairs_mut().flat_map(|pair| pair.iter_mut()) {
                if rng.chance(rates.visible()) {
                    *allele = allele.flipped();
                    count.visible += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ChromosomeLayout {
        ChromosomeLayout::new(200, 2, 0.01).expect("valid layout")
    }

    #[test]
    fn founder_frequencies() -> Result<()> {
        let mut rng = SimRng::with_seed(42);
        let freqs = AlleleFrequencies::uniform(200, 0.0)?;
        let genome = Genome::founder(&freqs, &TraitFrequencies::uniform(1.0)?, &mut rng);
        assert!(genome.genotypes().iter().all(|g| *g == 0));
        assert_eq!(genome.traits(), &VisibleTraits::default());

        let freqs = AlleleFrequencies::uniform(200, 1.0)?;
        let genome = Genome::founder(&freqs, &TraitFrequencies::uniform(0.0)?, &mut rng);
        assert!(genome.genotypes().iter().all(|g| *g == 2));
        assert_eq!(genome.traits().genotype(Trait::CoatColor), "bb");
        Ok(())
    }

    #[test]
    fn invalid_haplotypes() {
        let traits = VisibleTraits::default();
        assert_eq!(Genome::new(vec![0, 1], vec![0], traits), Err(GenomeError::HaplotypeLength(2, 1)));
        assert_eq!(Genome::new(vec![0, 2], vec![0, 1], traits), Err(GenomeError::InvalidAllele{locus: 1, value: 2}));
    }

    #[test]
    fn genotypes_from_counts() -> Result<()> {
        let mut rng = SimRng::with_seed(1);
        let genome = Genome::from_genotypes(&[0, 1, 2, 1], VisibleTraits::default(), &mut rng)?;
        assert_eq!(genome.genotypes(), vec![0, 1, 2, 1]);
        assert!((genome.heterozygosity() - 0.5).abs() < 1e-12);
        assert!(Genome::from_genotypes(&[3], VisibleTraits::default(), &mut rng).is_err());
        Ok(())
    }

    #[test]
    fn gamete_alleles_come_from_parent() -> Result<()> {
        let mut rng = SimRng::with_seed(3);
        let freqs = AlleleFrequencies::uniform(200, 0.5)?;
        let parent = Genome::founder(&freqs, &TraitFrequencies::default(), &mut rng);
        for _ in 0..50 {
            let gamete = parent.form_gamete(&layout(), &mut rng)?;
            assert_eq!(gamete.markers().len(), 200);
            for (locus, allele) in gamete.markers().iter().enumerate() {
                assert!(*allele == parent.haplotype(0)[locus] || *allele == parent.haplotype(1)[locus]);
            }
            for (t, pair) in parent.traits().iter() {
                assert!(pair.contains(&gamete.trait_allele(t)));
            }
        }
        Ok(())
    }

    #[test]
    fn sibling_gametes_differ() -> Result<()> {
        let mut rng = SimRng::with_seed(8);
        let freqs = AlleleFrequencies::uniform(200, 0.5)?;
        let parent = Genome::founder(&freqs, &TraitFrequencies::default(), &mut rng);
        let gametes = (0..10).map(|_| parent.form_gamete(&layout(), &mut rng)).collect::<Result<Vec<_>>>()?;
        assert!(gametes.windows(2).any(|w| w[0] != w[1]));
        Ok(())
    }

    #[test]
    fn layout_must_match() -> Result<()> {
        let mut rng = SimRng::with_seed(3);
        let genome = Genome::founder(&AlleleFrequencies::uniform(10, 0.5)?, &TraitFrequencies::default(), &mut rng);
        assert!(genome.form_gamete(&layout(), &mut rng).is_err());
        Ok(())
    }

    #[test]
    fn mutation_rates_drive_flips() -> Result<()> {
        let mut rng = SimRng::with_seed(4);
        let mut genome = Genome::founder(&AlleleFrequencies::uniform(200, 0.0)?, &TraitFrequencies::uniform(1.0)?, &mut rng);
        let untouched = genome.clone();

        assert_eq!(genome.mutate(&MutationRates::none(), &mut rng), MutationCount::default());
        assert_eq!(genome, untouched);

        let count = genome.mutate(&MutationRates::new(1.0, 1.0)?, &mut rng);
        assert_eq!(count, MutationCount{markers: 400, visible: 2 * Trait::COUNT});
        assert!(genome.genotypes().iter().all(|g| *g == 2));
        assert_eq!(genome.traits().to_string(), "bb ss DD AA");
        Ok(())
    }
}
