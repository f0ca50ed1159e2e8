use located_error::prelude::*;
use log::{debug, info};
use logger::Logger;
use population::{stats, BreedingGoal, EngineConfig, FounderSource, GenerationPlan, MouseId, Population, Strategy};

use crate::{
    error::ValidationError,
    experiments::grm_accuracy::is_degenerate,
    outcome::{Evidence, Method, ValidationOutcome},
};

/// Parameters of the inbreeding correlation experiment.
/// # Fields:
/// - `size`       : population size, kept constant across generations.
/// - `generations`: number of generations of breeding.
/// - `strategy`   : mating strategy. Assortative mating on relatedness drives inbreeding up.
/// - `n_markers`  : number of markers of the simulated genomes.
/// - `threshold`  : minimum Pearson correlation between pedigree and genomic inbreeding.
#[derive(Debug, Clone)]
pub struct InbreedingParams {
    pub size       : usize,
    pub generations: usize,
    pub strategy   : Strategy,
    pub n_markers  : usize,
    pub threshold  : f64,
    pub seed       : u64,
}

impl Default for InbreedingParams {
    fn default() -> Self {
        Self { size: 30, generations: 8, strategy: Strategy::Assortative, n_markers: 1000, threshold: 0.7, seed: 42 }
    }
}

/// Breed a population for several generations, then correlate the pedigree inbreeding coefficient
/// with the genomic one (`diag(GRM) - 1`, against founder frequencies) over every mouse ever born.
pub fn inbreeding_correlation(params: &InbreedingParams) -> Result<ValidationOutcome> {
    let ctx = "While running the inbreeding correlation test";
    if params.size < 2 || params.generations == 0 {
        return Err(ValidationError::InvalidParameter(format!(
            "the inbreeding test requires at least two mice and one generation (got {} and {})", params.size, params.generations
        ))).loc(ctx)
    }
    info!("Inbreeding correlation: {} mice, {} generations of {} mating (seed {})", params.size, params.generations, params.strategy, params.seed);

    let config = EngineConfig{n_markers: params.n_markers, ..EngineConfig::default()};
    let mut pop = Population::founders(&config, &FounderSource::Simulated, params.size, BreedingGoal::default(), params.seed).loc(ctx)?;
    let plan = GenerationPlan::new(params.strategy).capacity(params.size);

    let pb = Logger::progress_bar(params.generations as u64, "inbreeding");
    for _ in 0..params.generations {
        pop.next_generation(&plan).loc(ctx)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let ids: Vec<MouseId> = pop.registry().mice().iter().map(|m| m.id()).collect();
    let pedigree_f = ids.iter().map(|id| pop.pedigree_inbreeding(*id)).collect::<Result<Vec<f64>>>()?;
    let genomic_f = match pop.grm_with_base_frequencies(&ids) {
        Ok(grm) => grm.genomic_inbreeding(),
        Err(e) if is_degenerate(&e) => {
            let evidence = Evidence::InbreedingCorrelation{r: None, threshold: params.threshold, mean_f_ped: f64::NAN, mean_f_grm: f64::NAN, n: ids.len()};
            return Ok(ValidationOutcome::new(Method::InbreedingCorrelation, false, evidence).with_note(e.root_cause().to_string()))
        },
        Err(e) => return Err(e),
    };

    let mean_f_ped = stats::mean(&pedigree_f).loc(ctx)?;
    let mean_f_grm = stats::mean(&genomic_f).loc(ctx)?;
    let (r, note) = match stats::pearson(&pedigree_f, &genomic_f) {
        Ok(r)  => (Some(r), None),
        Err(e) => (None, Some(e.to_string())),
    };
    debug!("Inbreeding correlation over {} mice: r = {r:?}", ids.len());

    let passed = r.is_some_and(|r| r >= params.threshold);
    let evidence = Evidence::InbreedingCorrelation{r, threshold: params.threshold, mean_f_ped, mean_f_grm, n: ids.len()};
    let outcome = ValidationOutcome::new(Method::InbreedingCorrelation, passed, evidence);
    Ok(match note {
        Some(note) => outcome.with_note(note),
        None       => outcome,
    })
}
