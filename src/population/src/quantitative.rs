use genome::{AlleleFrequencies, Genome, SimRng};
use located_error::prelude::*;
use log::debug;
use rand_distr::{Distribution, Normal};

use crate::error::PopulationError;

/// Additive model of the quantitative trait:
/// `value = intercept + Σ_j g_j β_j + ε`, with `ε ~ N(0, Ve)`.
/// 
/// Effects are drawn once, from `N(0, effect_sd)`, and shared by every mouse of a population, so
/// that genetic values remain comparable across generations. The residual variance is derived from
/// the additive variance of the founder generation under Hardy-Weinberg equilibrium
/// (`Va = Σ 2 p_j (1 - p_j) β_j²`) so that `Va / (Va + Ve)` equals the target heritability.
#[derive(Debug, Clone)]
pub struct QuantitativeModel {
    effects     : Vec<f64>,
    intercept   : f64,
    heritability: f64,
    additive_var: f64,
    residual_var: f64,
    residual    : Normal<f64>,
}

impl QuantitativeModel {
    /// # Errors
    /// - if `effect_sd` is invalid.
    /// - `PopulationError::DegenerateStatistic` if the founder additive variance is zero
    ///   (every locus fixed, or null effects): no residual variance can honor the target heritability.
    pub fn new(freqs: &AlleleFrequencies, effect_sd: f64, heritability: f64, intercept: f64, rng: &mut SimRng) -> Result<Self> {
        let effect_dist = Normal::new(0.0, effect_sd).loc("While drawing additive marker effects")?;
        let effects: Vec<f64> = (0..freqs.len()).map(|_| effect_dist.sample(rng)).collect();
        Self::with_effects(effects, freqs, heritability, intercept)
    }

    /// Build a model from a fixed set of additive effects.
    pub fn with_effects(effects: Vec<f64>, freqs: &AlleleFrequencies, heritability: f64, intercept: f64) -> Result<Self> {
        if effects.len() != freqs.len() {
            return Err(PopulationError::LengthMismatch(effects.len(), freqs.len())).loc("While building the quantitative trait model")
        }
        let additive_var: f64 = freqs.iter().zip(&effects)
            .map(|(p, beta)| 2.0 * p * (1.0 - p) * beta * beta)
            .sum();
        if additive_var <= 0.0 {
            return Err(PopulationError::DegenerateStatistic("founder additive variance is zero"))
                .loc("While building the quantitative trait model")
        }
        let residual_var = additive_var * (1.0 - heritability) / heritability;
        let residual = Normal::new(0.0, residual_var.sqrt()).loc("While building the quantitative trait model")?;
        debug!("Quantitative trait model: Va={additive_var:.5} Ve={residual_var:.5} (h2={heritability})");
        Ok(Self { effects, intercept, heritability, additive_var, residual_var, residual })
    }

    /// Additive genetic value: `intercept + Σ g_j β_j`.
    #[must_use]
    pub fn breeding_value(&self, genome: &Genome) -> f64 {
        self.intercept + self.effects.iter().enumerate()
            .map(|(j, beta)| f64::from(genome.genotype(j)) * beta)
            .sum::<f64>()
    }

    /// Breeding value plus one environmental residual draw.
    pub fn trait_value(&self, genome: &Genome, rng: &mut SimRng) -> f64 {
        self.breeding_value(genome) + self.residual.sample(rng)
    }

    #[must_use]
    pub fn effects(&self) -> &[f64] {
        &self.effects
    }

    #[must_use]
    pub fn heritability(&self) -> f64 {
        self.heritability
    }

    #[must_use]
    pub fn additive_variance(&self) -> f64 {
        self.additive_var
    }

    #[must_use]
    pub fn residual_variance(&self) -> f64 {
        self.residual_var
    }
}
