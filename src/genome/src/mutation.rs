use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MutationError {
    #[error("{kind} mutation rate must lie within [0, 1] (got {value})")]
    InvalidRate{kind: &'static str, value: f64},
}

/// Per-allele mutation probabilities applied to freshly combined offspring genomes.
/// # Fields:
/// - `marker` : probability that a marker allele flips `0 <-> 1`.
/// - `visible`: probability that a visible-trait allele flips to the other symbol of its alphabet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationRates {
    marker : f64,
    visible: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self { marker: 0.001, visible: 0.01 }
    }
}

impl MutationRates {
    /// # Errors
    /// `MutationError::InvalidRate` if either rate lies outside `[0, 1]`. Rates are never clamped.
    pub fn new(marker: f64, visible: f64) -> Result<Self, MutationError> {
        for (kind, value) in [("Marker", marker), ("Visible trait", visible)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MutationError::InvalidRate{kind, value})
            }
        }
        Ok(Self { marker, visible })
    }

    /// Mutation-free inheritance.
    #[must_use]
    pub fn none() -> Self {
        Self { marker: 0.0, visible: 0.0 }
    }

    #[must_use]
    pub fn marker(&self) -> f64 {
        self.marker
    }

    #[must_use]
    pub fn visible(&self) -> f64 {
        self.visible
    }
}

/// Number of alleles flipped by a call to `Genome::mutate()`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MutationCount {
    pub markers: usize,
    pub visible: usize,
}
