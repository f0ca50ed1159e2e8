use located_error::prelude::*;
use log::{debug, info};
use population::{midparent_regression, BreedingGoal, EngineConfig, FounderSource, GenerationPlan, Population, Strategy};

use crate::{
    error::ValidationError,
    outcome::{Evidence, Method, ValidationOutcome},
};

/// Parameters of the realized heritability experiment.
/// # Fields:
/// - `size`        : number of founders.
/// - `heritability`: target narrow-sense heritability of the quantitative trait.
/// - `top_fraction`: fraction of the founders selected on trait value.
/// - `tolerance`   : accepted absolute deviation between estimate and target.
#[derive(Debug, Clone)]
pub struct HeritabilityParams {
    pub size        : usize,
    pub heritability: f64,
    pub top_fraction: f64,
    pub tolerance   : f64,
    pub seed        : u64,
}

impl Default for HeritabilityParams {
    fn default() -> Self {
        Self { size: 1000, heritability: 0.5, top_fraction: 0.2, tolerance: 0.15, seed: 42 }
    }
}

/// Select the top fraction of a founder generation on trait value, breed them, and estimate
/// heritability with the breeder's equation (`h² = R / S`). The mid-parent regression slope is
/// reported alongside.
pub fn heritability(params: &HeritabilityParams) -> Result<ValidationOutcome> {
    let ctx = "While running the heritability test";
    if params.size < 2 {
        return Err(ValidationError::InvalidParameter(format!("the heritability test requires at least two mice (got {})", params.size))).loc(ctx)
    }
    info!("Heritability: {} mice, target h2 = {}, top {}% selected (seed {})", params.size, params.heritability, params.top_fraction * 100.0, params.seed);

    let config = EngineConfig{heritability: params.heritability, ..EngineConfig::default()};
    let mut pop = Population::founders(&config, &FounderSource::Simulated, params.size, BreedingGoal::default(), params.seed).loc(ctx)?;
    let plan = GenerationPlan::new(Strategy::TraitValue).top_fraction(params.top_fraction);
    let report = pop.next_generation(&plan).loc(ctx)?;

    let (estimate, note) = match report.realized_heritability() {
        Ok(estimate) => (Some(estimate), None),
        Err(e)       => (None, Some(e.root_cause().to_string())),
    };
    let midparent_slope = midparent_regression(&report.selection.midparents).ok();
    debug!("Heritability: {estimate:?}, mid-parent slope {midparent_slope:?}");

    let passed = estimate.is_some_and(|e| (e.h2 - params.heritability).abs() <= params.tolerance);
    let evidence = Evidence::Heritability{estimate, midparent_slope, target: params.heritability, tolerance: params.tolerance};
    let outcome = ValidationOutcome::new(Method::Heritability, passed, evidence);
    Ok(match note {
        Some(note) => outcome.with_note(note),
        None       => outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realized_heritability_recovers_target() -> Result<()> {
        let mut passed = 0;
        for seed in 0..5 {
            let outcome = heritability(&HeritabilityParams{seed, ..HeritabilityParams::default()})?;
            if let Evidence::Heritability{estimate: Some(estimate), ..} = outcome.evidence {
                assert!(estimate.selection_differential > 0.0);
                assert!((0.0..1.0).contains(&estimate.h2), "{outcome}");
            }
            passed += usize::from(outcome.passed);
        }
        assert!(passed >= 4, "{passed}/5");
        Ok(())
    }

    #[test]
    fn invalid_heritability_target() {
        assert!(heritability(&HeritabilityParams{heritability: 0.0, ..HeritabilityParams::default()}).is_err());
        assert!(heritability(&HeritabilityParams{size: 1, ..HeritabilityParams::default()}).is_err());
    }
}
