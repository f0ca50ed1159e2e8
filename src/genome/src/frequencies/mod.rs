use std::ops::Deref;

use crate::{SimRng, Trait};

mod error;
pub use error::FrequencyError;

/// Population-level frequency of the `1` allele at every marker locus.
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleFrequencies(Vec<f64>);

impl Deref for AlleleFrequencies {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AlleleFrequencies {
    /// # Errors
    /// - `FrequencyError::Empty` if `frequencies` is empty.
    /// - `FrequencyError::OutOfBounds` if any value lies outside `[0, 1]` (NaN included).
    pub fn new(frequencies: Vec<f64>) -> Result<Self, FrequencyError> {
        if frequencies.is_empty() {
            return Err(FrequencyError::Empty)
        }
        if let Some((locus, value)) = frequencies.iter().enumerate().find(|(_, p)| !(0.0..=1.0).contains(*p)) {
            return Err(FrequencyError::OutOfBounds{locus, value: *value})
        }
        Ok(Self(frequencies))
    }

    /// Same frequency `p` at each of the `n` loci.
    pub fn uniform(n: usize, p: f64) -> Result<Self, FrequencyError> {
        Self::new(vec![p; n])
    }

    /// Draw each locus frequency uniformly within `[lo, hi]`.
    pub fn sample_between(n: usize, lo: f64, hi: f64, rng: &mut SimRng) -> Result<Self, FrequencyError> {
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(FrequencyError::InvalidBounds{lo, hi})
        }
        Self::new((0..n).map(|_| lo + (hi - lo) * rng.f64()).collect())
    }

    /// Observed frequencies of a set of genotype rows (one row of `{0, 1, 2}` counts per individual)
    pub fn from_genotypes<'a, I>(rows: I) -> Result<Self, FrequencyError>
    where
        I: IntoIterator<Item = &'a [u8]>
    {
        let mut sums: Vec<f64> = Vec::new();
        let mut n_rows = 0usize;
        for row in rows {
            if n_rows == 0 {
                sums = vec![0.0; row.len()];
            } else if row.len() != sums.len() {
                return Err(FrequencyError::RaggedGenotypes{expected: sums.len(), got: row.len()})
            }
            for (locus, (sum, g)) in sums.iter_mut().zip(row).enumerate() {
                if *g > 2 {
                    return Err(FrequencyError::InvalidGenotype{locus, value: *g})
                }
                *sum += f64::from(*g);
            }
            n_rows += 1;
        }
        if n_rows == 0 {
            return Err(FrequencyError::Empty)
        }
        let denom = 2.0 * n_rows as f64;
        Self::new(sums.into_iter().map(|s| s / denom).collect())
    }

    /// Expected heterozygosity `2p(1-p)` summed over every locus.
    #[must_use]
    pub fn total_heterozygosity(&self) -> f64 {
        self.0.iter().map(|p| 2.0 * p * (1.0 - p)).sum()
    }
}

/// Per-trait probability of drawing the first symbol of the trait's alphabet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitFrequencies([f64; Trait::COUNT]);

impl Default for TraitFrequencies {
    fn default() -> Self {
        Self([0.5; Trait::COUNT])
    }
}

impl TraitFrequencies {
    pub fn uniform(p: f64) -> Result<Self, FrequencyError> {
        Trait::ALL.into_iter().try_fold(Self::default(), |freqs, t| freqs.with(t, p))
    }

    pub fn with(mut self, trait_: Trait, p: f64) -> Result<Self, FrequencyError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(FrequencyError::InvalidTraitFrequency{trait_, value: p})
        }
        self.0[trait_.index()] = p;
        Ok(self)
    }

    #[must_use]
    pub fn first_symbol(&self, trait_: Trait) -> f64 {
        self.0[trait_.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn rejects_invalid_tables() {
        assert_eq!(AlleleFrequencies::new(vec![]), Err(FrequencyError::Empty));
        assert_eq!(
            AlleleFrequencies::new(vec![0.1, 1.2]),
            Err(FrequencyError::OutOfBounds{locus: 1, value: 1.2})
        );
        assert!(AlleleFrequencies::new(vec![f64::NAN]).is_err());
        assert!(TraitFrequencies::uniform(-0.1).is_err());
    }

    #[test]
    fn sampled_frequencies_respect_bounds() -> Result<(), FrequencyError> {
        let mut rng = SimRng::with_seed(11);
        let freqs = AlleleFrequencies::sample_between(500, 0.05, 0.5, &mut rng)?;
        assert_eq!(freqs.len(), 500);
        assert!(freqs.iter().all(|p| (0.05..=0.5).contains(p)));
        assert!(AlleleFrequencies::sample_between(5, 0.6, 0.5, &mut rng).is_err());
        Ok(())
    }

    #[test]
    fn observed_frequencies() -> Result<(), FrequencyError> {
        let rows: [&[u8]; 2] = [&[0, 1, 2], &[2, 1, 2]];
        let freqs = AlleleFrequencies::from_genotypes(rows)?;
        assert!(approx_eq!(f64, freqs[0], 0.5));
        assert!(approx_eq!(f64, freqs[1], 0.5));
        assert!(approx_eq!(f64, freqs[2], 1.0));
        assert!(approx_eq!(f64, freqs.total_heterozygosity(), 1.0));

        let ragged: [&[u8]; 2] = [&[0, 1], &[2]];
        assert!(AlleleFrequencies::from_genotypes(ragged).is_err());
        let invalid: [&[u8]; 1] = [&[3]];
        assert!(AlleleFrequencies::from_genotypes(invalid).is_err());
        Ok(())
    }
}
