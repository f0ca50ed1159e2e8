use std::ops::Range;

use log::trace;
use rand_distr::{Distribution, Poisson};

use crate::SimRng;

/// Sorted crossover breakpoints within a chromosome of `n_loci` loci.
/// 
/// The number of events follows `Poisson(rate)`; each breakpoint is drawn uniformly among the
/// `n_loci - 1` inter-locus intervals, and is expressed as the offset of the first locus that
/// lies after it (i.e. within `1..n_loci`). Single-locus chromosomes never recombine.
pub(crate) fn sample_crossovers(n_loci: usize, rate: f64, rng: &mut SimRng) -> Vec<usize> {
    if n_loci < 2 {
        return Vec::new()
    }
    // Poisson::new() rejects non-positive rates: zero recombination simply yields no events.
    let n_events = match Poisson::new(rate) {
        Ok(poisson) => poisson.sample(rng) as usize,
        Err(_)      => 0,
    };
    let mut breakpoints: Vec<usize> = (0..n_events).map(|_| rng.usize(1..n_loci)).collect();
    breakpoints.sort_unstable();
    breakpoints
}

/// Copy one recombined chromatid of the given homolog pair over `range` into `out`.
/// 
/// Segments between breakpoints alternate between homologs, starting from a uniformly random strand.
/// Coincident breakpoints cancel out.
pub(crate) fn recombine(
    homologs   : [&[u8]; 2],
    range      : Range<usize>,
    breakpoints: &[usize],
    rng        : &mut SimRng,
    out        : &mut Vec<u8>
) {
    let mut strand = rng.usize(0..2);
    let mut pending = breakpoints.iter().peekable();
    for (offset, locus) in range.enumerate() {
        while pending.next_if(|b| **b == offset).is_some() {
            strand ^= 1;
        }
        out.push(homologs[strand][locus]);
    }
    trace!("Recombined chromatid with {} crossover(s) at {breakpoints:?}", breakpoints.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_lie_within_chromosome() {
        let mut rng = SimRng::with_seed(5);
        for _ in 0..1000 {
            let breakpoints = sample_crossovers(100, 2.0, &mut rng);
            assert!(breakpoints.windows(2).all(|w| w[0] <= w[1]));
            assert!(breakpoints.iter().all(|b| (1..100).contains(b)));
        }
    }

    #[test]
    fn degenerate_chromosomes_never_recombine() {
        let mut rng = SimRng::with_seed(5);
        assert!(sample_crossovers(1, 10.0, &mut rng).is_empty());
        assert!(sample_crossovers(100, 0.0, &mut rng).is_empty());
    }

    #[test]
    fn mean_crossover_count_matches_rate() {
        let mut rng = SimRng::with_seed(9);
        let trials = 20_000;
        let total: usize = (0..trials).map(|_| sample_crossovers(100, 1.0, &mut rng).len()).sum();
        let mean = total as f64 / f64::from(trials);
        assert!((mean - 1.0).abs() < 0.05, "mean crossover count: {mean}");
    }

    #[test]
    fn segments_alternate_between_homologs() {
        let paternal = [0u8; 10];
        let maternal = [1u8; 10];
        let mut rng = SimRng::with_seed(2);
        let mut out = Vec::new();
        recombine([&paternal, &maternal], 0..10, &[3, 7], &mut rng, &mut out);

        let first = out[0];
        assert!(out[..3].iter().all(|a| *a == first));
        assert!(out[3..7].iter().all(|a| *a == 1 - first));
        assert!(out[7..].iter().all(|a| *a == first));
    }

    #[test]
    fn coincident_breakpoints_cancel() {
        let paternal = [0u8; 6];
        let maternal = [1u8; 6];
        let mut rng = SimRng::with_seed(2);
        let mut out = Vec::new();
        recombine([&paternal, &maternal], 0..6, &[2, 2], &mut rng, &mut out);
        assert!(out.iter().all(|a| *a == out[0]));
    }
}
