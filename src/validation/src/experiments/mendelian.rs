use genome::{AlleleFrequencies, Genome, MutationRates, SimRng, Trait, TraitAllele, VisibleTraits};
use located_error::prelude::*;
use log::{debug, info};
use logger::Logger;
use population::{Breeder, EngineConfig, IdAllocator, LitterSize, MouseId};
use rayon::prelude::*;

use crate::{
    chi_square::{chi_square, critical_value, expected_counts},
    error::ValidationError,
    outcome::{Evidence, Method, ValidationOutcome},
};

/// Parameters of the Mendelian segregation experiment.
/// # Fields:
/// - `trials` : number of independent single-offspring matings.
/// - `trait_` : visible trait for which both parents are heterozygous.
/// - `seed`   : seed of the experiment. Every trial derives its own seed from it.
#[derive(Debug, Clone)]
pub struct MendelianParams {
    pub trials: usize,
    pub trait_: Trait,
    pub seed  : u64,
}

impl Default for MendelianParams {
    fn default() -> Self {
        Self { trials: 1000, trait_: Trait::CoatColor, seed: 42 }
    }
}

/// Mate two heterozygous parents `trials` times and test the offspring genotype counts against
/// the 1:2:1 ratio (df = 2). The 3:1 phenotypic ratio (df = 1) is reported alongside.
/// 
/// Mutation is disabled: the experiment isolates segregation.
pub fn mendelian(params: &MendelianParams) -> Result<ValidationOutcome> {
    if params.trials == 0 {
        return Err(ValidationError::InvalidParameter(String::from("at least one Mendelian trial is required")))
            .loc("While running the Mendelian segregation test")
    }
    info!("Mendelian segregation: {} trials at {} (seed {})", params.trials, params.trait_, params.seed);

    let config  = EngineConfig::default();
    let mut rng = SimRng::with_seed(params.seed);
    let freqs   = AlleleFrequencies::uniform(config.n_markers, 0.5)?;
    let breeder = Breeder::from_config(&config, &freqs, &mut rng)?.with_mutation(MutationRates::none());

    // Both parents are heterozygous at the trait and at every marker.
    let [first, second] = params.trait_.alphabet();
    let het = VisibleTraits::default().with(params.trait_, &format!("{first}{second}"))?;
    let parent = |id| -> Result<_> {
        let genome = Genome::new(vec![0; config.n_markers], vec![1; config.n_markers], het)?;
        breeder.founder(MouseId(id), genome, None, &mut SimRng::with_seed(id))
    };
    let (sire, dam) = (parent(1)?, parent(2)?);

    let pb = Logger::progress_bar(params.trials as u64, "mendelian");
    let outcomes: Vec<u8> = rng.derive_seeds(params.trials)
        .into_par_iter()
        .map(|seed| {
            let mut rng = SimRng::with_seed(seed);
            let mut ids = IdAllocator::starting_at(3);
            let litter = breeder.mate(&sire, &dam, &mut ids, Some(LitterSize::Exact(1)), &mut rng)?;
            pb.inc(1);
            let pup = litter.first().loc("Empty litter")?;
            Ok(pup.genome().traits().copies_of(params.trait_, TraitAllele::SECOND))
        })
        .collect::<Result<Vec<u8>>>()?;
    pb.finish_and_clear();

    let mut counts = [0usize; 3];
    for copies in outcomes {
        counts[usize::from(copies)] += 1;
    }
    let observed: Vec<f64> = counts.iter().map(|c| *c as f64).collect();
    let genotype_chi2 = chi_square(&observed, &expected_counts(params.trials, &[1.0, 2.0, 1.0]))?;
    let phenotype_chi2 = chi_square(
        &[(counts[0] + counts[1]) as f64, counts[2] as f64],
        &expected_counts(params.trials, &[3.0, 1.0])
    )?;
    let critical = critical_value(2)?;
    debug!("Mendelian counts: {counts:?}, chi2 = {genotype_chi2:.4}");

    let evidence = Evidence::Mendelian{counts, chi_square: genotype_chi2, critical, phenotype_chi_square: phenotype_chi2};
    Ok(ValidationOutcome::new(Method::Mendelian, genotype_chi2 < critical, evidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segregation_is_mendelian_across_seeds() -> Result<()> {
        // Under the null, chi2 < 5.991 with probability 0.95.
        let seeds = 0..40u64;
        let mut passed = 0;
        for seed in seeds.clone() {
            let outcome = mendelian(&MendelianParams{trials: 1000, trait_: Trait::CoatColor, seed})?;
            if let Evidence::Mendelian{counts, ..} = outcome.evidence {
                assert_eq!(counts.iter().sum::<usize>(), 1000);
            }
            passed += usize::from(outcome.passed);
        }
        let n_seeds = seeds.count();
        assert!(passed * 100 >= 95 * n_seeds, "{passed}/{n_seeds}");
        Ok(())
    }

    #[test]
    fn reproducible() -> Result<()> {
        let params = MendelianParams{trials: 200, ..MendelianParams::default()};
        assert_eq!(mendelian(&params)?, mendelian(&params)?);
        Ok(())
    }

    #[test]
    fn no_trials() {
        assert!(mendelian(&MendelianParams{trials: 0, ..MendelianParams::default()}).is_err());
    }
}
