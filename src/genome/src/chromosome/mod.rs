use std::ops::Range;

mod error;
pub use error::ChromosomeError;

/// Physical arrangement of marker loci across chromosomes.
/// 
/// Markers are split into contiguous blocks of equal length, the remainder being assigned
/// to the last chromosome.
/// # Fields:
/// - `n_markers`        : total number of biallelic marker loci (`M`)
/// - `morgans_per_locus`: genetic length of a single locus interval. The expected number of
///                        crossovers on a chromosome is `loci * morgans_per_locus`.
/// - `ranges`           : locus range spanned by each chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeLayout {
    n_markers        : usize,
    morgans_per_locus: f64,
    ranges           : Vec<Range<usize>>,
}

impl ChromosomeLayout {
    /// # Errors
    /// - `ChromosomeError::NoMarkers` / `NoChromosomes` on empty dimensions.
    /// - `ChromosomeError::TooManyChromosomes` if some chromosome would end up empty.
    /// - `ChromosomeError::InvalidRecombinationRate` if `morgans_per_locus` is negative or not finite.
    pub fn new(n_markers: usize, n_chromosomes: usize, morgans_per_locus: f64) -> Result<Self, ChromosomeError> {
        use ChromosomeError::{NoMarkers, NoChromosomes, TooManyChromosomes, InvalidRecombinationRate};
        if n_markers == 0 {
            return Err(NoMarkers)
        }
        if n_chromosomes == 0 {
            return Err(NoChromosomes)
        }
        if n_chromosomes > n_markers {
            return Err(TooManyChromosomes{markers: n_markers, chromosomes: n_chromosomes})
        }
        if !morgans_per_locus.is_finite() || morgans_per_locus < 0.0 {
            return Err(InvalidRecombinationRate(morgans_per_locus))
        }

        let block = n_markers / n_chromosomes;
        let ranges = (0..n_chromosomes).map(|chr| {
            let start = chr * block;
            let end   = if chr + 1 == n_chromosomes { n_markers } else { start + block };
            start..end
        }).collect();

        Ok(Self { n_markers, morgans_per_locus, ranges })
    }

    #[must_use]
    pub fn n_markers(&self) -> usize {
        self.n_markers
    }

    #[must_use]
    pub fn n_chromosomes(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn morgans_per_locus(&self) -> f64 {
        self.morgans_per_locus
    }

    #[must_use]
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Mean number of crossovers per meiosis on chromosome `chr` (Poisson rate).
    #[must_use]
    pub fn expected_crossovers(&self, chr: usize) -> f64 {
        self.ranges.get(chr).map_or(0.0, |range| range.len() as f64 * self.morgans_per_locus)
    }

    /// Index of the chromosome carrying `locus`, if any.
    #[must_use]
    pub fn chromosome_of(&self, locus: usize) -> Option<usize> {
        self.ranges.iter().position(|range| range.contains(&locus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split() -> Result<(), ChromosomeError> {
        let layout = ChromosomeLayout::new(200, 2, 0.01)?;
        assert_eq!(layout.ranges(), &[0..100, 100..200]);
        assert_eq!(layout.chromosome_of(99), Some(0));
        assert_eq!(layout.chromosome_of(100), Some(1));
        assert_eq!(layout.chromosome_of(200), None);
        assert!((layout.expected_crossovers(0) - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn remainder_goes_to_last_chromosome() -> Result<(), ChromosomeError> {
        let layout = ChromosomeLayout::new(10, 3, 0.0)?;
        assert_eq!(layout.ranges(), &[0..3, 3..6, 6..10]);
        assert_eq!(layout.n_chromosomes(), 3);
        Ok(())
    }

    #[test]
    fn invalid_layouts() {
        assert_eq!(ChromosomeLayout::new(0, 1, 0.01), Err(ChromosomeError::NoMarkers));
        assert_eq!(ChromosomeLayout::new(10, 0, 0.01), Err(ChromosomeError::NoChromosomes));
        assert_eq!(
            ChromosomeLayout::new(2, 3, 0.01),
            Err(ChromosomeError::TooManyChromosomes{markers: 2, chromosomes: 3})
        );
        assert!(ChromosomeLayout::new(10, 1, -0.1).is_err());
        assert!(ChromosomeLayout::new(10, 1, f64::NAN).is_err());
    }
}
