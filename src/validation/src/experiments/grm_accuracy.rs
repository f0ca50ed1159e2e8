use located_error::prelude::*;
use log::{debug, info};
use population::{stats, BreedingGoal, EngineConfig, FounderSource, LitterSize, MouseId, Population, PopulationError};

use crate::{
    error::ValidationError,
    outcome::{Evidence, Method, ValidationOutcome},
};

/// Parameters of the GRM accuracy experiment.
/// # Fields:
/// - `founders` : number of unrelated founders (at least two).
/// - `sibs`     : number of full siblings born to the first two founders.
/// - `n_markers`: number of markers of the simulated genomes.
/// - `tolerance`: maximum mean absolute error between observed and expected relationships.
#[derive(Debug, Clone)]
pub struct GrmParams {
    pub founders : usize,
    pub sibs     : usize,
    pub n_markers: usize,
    pub tolerance: f64,
    pub seed     : u64,
}

impl Default for GrmParams {
    fn default() -> Self {
        Self { founders: 10, sibs: 6, n_markers: 1000, tolerance: 0.15, seed: 42 }
    }
}

/// Expected additive relationship between two distinct members of the experiment.
fn expected_relationship(a: MouseId, b: MouseId, parents: [MouseId; 2], sibs: &[MouseId]) -> f64 {
    let is_sib = |id| sibs.contains(&id);
    let is_parent = |id| parents.contains(&id);
    match (is_sib(a), is_sib(b)) {
        (true, true)                                   => 0.5, // full siblings
        (true, false) if is_parent(b)                  => 0.5, // parent-offspring
        (false, true) if is_parent(a)                  => 0.5,
        _                                              => 0.0, // unrelated
    }
}

/// Build unrelated founders, a full-sib family born to the first two founders, then compare
/// every off-diagonal GRM entry (against founder allele frequencies) with its expected value:
/// 0.5 for parent-offspring and full-sib pairs, 0 otherwise.
pub fn grm_accuracy(params: &GrmParams) -> Result<ValidationOutcome> {
    let ctx = "While running the GRM accuracy test";
    if params.founders < 2 || params.sibs == 0 {
        return Err(ValidationError::InvalidParameter(format!(
            "the GRM accuracy test requires at least two founders and one sibling (got {} and {})", params.founders, params.sibs
        ))).loc(ctx)
    }
    info!("GRM accuracy: {} founders, {} full siblings, {} markers (seed {})", params.founders, params.sibs, params.n_markers, params.seed);

    let config = EngineConfig{n_markers: params.n_markers, ..EngineConfig::default()};
    let mut pop = Population::founders(&config, &FounderSource::Simulated, params.founders, BreedingGoal::default(), params.seed).loc(ctx)?;
    let founders: Vec<MouseId> = pop.current().iter().map(|m| m.id()).collect();
    let parents = [founders[0], founders[1]];
    let sibs: Vec<MouseId> = pop.breed(parents[0], parents[1], Some(LitterSize::Exact(params.sibs))).loc(ctx)?
        .iter()
        .map(|m| m.id())
        .collect();

    let members: Vec<MouseId> = founders.iter().chain(&sibs).copied().collect();
    let grm = match pop.grm_with_base_frequencies(&members) {
        Ok(grm) => grm,
        Err(e) if is_degenerate(&e) => {
            let evidence = Evidence::GrmAccuracy{mean_absolute_error: f64::NAN, tolerance: params.tolerance, pairs: 0};
            return Ok(ValidationOutcome::new(Method::GrmAccuracy, false, evidence).with_note(e.root_cause().to_string()))
        },
        Err(e) => return Err(e),
    };

    let (mut observed, mut expected) = (Vec::new(), Vec::new());
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            observed.push(grm.get_by_id(*a, *b)?);
            expected.push(expected_relationship(*a, *b, parents, &sibs));
        }
    }
    let mae = stats::mean_absolute_error(&observed, &expected).loc(ctx)?;
    debug!("GRM accuracy: MAE = {mae:.4} over {} pairs", observed.len());

    let evidence = Evidence::GrmAccuracy{mean_absolute_error: mae, tolerance: params.tolerance, pairs: observed.len()};
    Ok(ValidationOutcome::new(Method::GrmAccuracy, mae < params.tolerance, evidence))
}

pub(crate) fn is_degenerate(e: &anyhow::Error) -> bool {
    matches!(e.root_cause().downcast_ref::<PopulationError>(), Some(PopulationError::DegenerateStatistic(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_relationships() {
        let (p1, p2, other) = (MouseId(1), MouseId(2), MouseId(3));
        let sibs = [MouseId(4), MouseId(5)];
        assert!((expected_relationship(sibs[0], sibs[1], [p1, p2], &sibs) - 0.5).abs() < 1e-12);
        assert!((expected_relationship(p2, sibs[1], [p1, p2], &sibs) - 0.5).abs() < 1e-12);
        assert!(expected_relationship(other, sibs[0], [p1, p2], &sibs).abs() < 1e-12);
        assert!(expected_relationship(p1, p2, [p1, p2], &sibs).abs() < 1e-12);
    }

    #[test]
    fn default_experiment_passes() -> Result<()> {
        let outcome = grm_accuracy(&GrmParams::default())?;
        assert!(outcome.passed, "{outcome}");
        if let Evidence::GrmAccuracy{pairs, ..} = outcome.evidence {
            assert_eq!(pairs, 16 * 15 / 2);
        }
        Ok(())
    }

    #[test]
    fn invalid_parameters() {
        assert!(grm_accuracy(&GrmParams{founders: 1, ..GrmParams::default()}).is_err());
        assert!(grm_accuracy(&GrmParams{sibs: 0, ..GrmParams::default()}).is_err());
    }
}
