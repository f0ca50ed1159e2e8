mod common;
use common::{breeder, inbred};

use genome::{SimRng, Trait};
use located_error::prelude::*;
use population::{
    BreedingGoal, ConfigError, EngineConfig, FounderSource, GenerationPlan, IdAllocator, LitterSize, MouseId, Population,
    PopulationError, Strategy,
};
use float_cmp::approx_eq;
#[cfg(test)] use pretty_assertions::assert_eq;

#[test]
fn monohybrid_cross_is_uniform() -> Result<()> {
    let breeder = breeder(100)?;
    let mut rng = SimRng::with_seed(42);
    let black = inbred(&breeder, 1, 0, "BB", &mut rng)?;
    let white = inbred(&breeder, 2, 1, "bb", &mut rng)?;

    let mut ids = IdAllocator::starting_at(3);
    let mut f1 = Vec::new();
    while f1.len() < 100 {
        f1.extend(breeder.mate(&black, &white, &mut ids, Some(LitterSize::Exact(10)), &mut rng)?);
    }

    for pup in &f1 {
        assert!(pup.genome().traits().is_heterozygous(Trait::CoatColor));
        assert_eq!(pup.phenotype().label(Trait::CoatColor), Some("black"));
        assert!(pup.genome().genotypes().iter().all(|g| *g == 1));
    }
    Ok(())
}

#[test]
fn offspring_only_carry_parental_alleles() -> Result<()> {
    let config = EngineConfig{n_markers: 300, marker_mutation_rate: 0.0, trait_mutation_rate: 0.0, ..EngineConfig::default()};
    let mut pop = Population::founders(&config, &FounderSource::Simulated, 2, BreedingGoal::default(), 7)?;
    let (sire, dam) = (pop.current()[0].clone(), pop.current()[1].clone());
    let litter = pop.breed(sire.id(), dam.id(), Some(LitterSize::Exact(8)))?;

    for pup in &litter {
        for locus in 0..config.n_markers {
            let possible: Vec<u8> = (0..2).flat_map(|i| (0..2).map(move |j| (i, j)))
                .map(|(i, j)| sire.genome().haplotype(i)[locus] + dam.genome().haplotype(j)[locus])
                .collect();
            assert!(possible.contains(&pup.genome().genotype(locus)), "locus {locus}");
        }
    }
    Ok(())
}

#[test]
fn phenotype_expression_is_idempotent() -> Result<()> {
    let mut pop = Population::founders(&EngineConfig::default(), &FounderSource::Simulated, 10, BreedingGoal::default(), 3)?;
    pop.next_generation(&GenerationPlan::new(Strategy::Random))?;
    let rules = pop.breeder().rules().clone();
    for mouse in pop.current() {
        let once  = mouse.genome().phenotype(&rules);
        let twice = mouse.genome().phenotype(&rules);
        assert_eq!(once, twice);
        assert_eq!(&once, mouse.phenotype());
    }
    Ok(())
}

#[test]
fn founders_are_not_inbred() -> Result<()> {
    let mut pop = Population::founders(&EngineConfig::default(), &FounderSource::Simulated, 12, BreedingGoal::default(), 11)?;
    let ids: Vec<MouseId> = pop.current().iter().map(|m| m.id()).collect();
    for id in &ids {
        assert!(pop.pedigree_inbreeding(*id)?.abs() < f64::EPSILON);
    }
    assert!(pop.kinship(ids[0], ids[1])?.abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn full_sibs_kinship() -> Result<()> {
    let mut pop = Population::founders(&EngineConfig::default(), &FounderSource::Simulated, 2, BreedingGoal::default(), 5)?;
    let (a, b) = (pop.current()[0].id(), pop.current()[1].id());
    let litter = pop.breed(a, b, Some(LitterSize::Exact(2)))?;
    let (x, y) = (litter[0].id(), litter[1].id());

    assert!(approx_eq!(f64, pop.kinship(x, y)?, 0.25));
    assert!(approx_eq!(f64, pop.relatedness(x, y)?, 0.5));
    assert!(approx_eq!(f64, pop.kinship(x, a)?, 0.25));

    let inbred_pup = pop.breed(x, y, Some(LitterSize::Exact(1)))?;
    assert!(approx_eq!(f64, pop.pedigree_inbreeding(inbred_pup[0].id())?, 0.25));
    Ok(())
}

#[test]
fn seeded_runs_are_reproducible() -> Result<()> {
    let plan = GenerationPlan::new(Strategy::Fitness).cull_rate(0.2).capacity(30);
    let goal = BreedingGoal::preset("large_friendly").expect("Unknown preset");
    let run = || -> Result<Vec<String>> {
        let mut pop = Population::founders(&EngineConfig::default(), &FounderSource::Simulated, 16, goal.clone(), 42)?;
        (0..4).map(|_| pop.next_generation(&plan).map(|report| report.to_string())).collect()
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn error_categories_are_distinguishable() -> Result<()> {
    let mut pop = Population::founders(&EngineConfig::default(), &FounderSource::Simulated, 4, BreedingGoal::default(), 1)?;

    let err = pop.pedigree_inbreeding(MouseId(404)).unwrap_err();
    assert!(matches!(err.root_cause().downcast_ref::<PopulationError>(), Some(PopulationError::UnknownMouse(MouseId(404)))));

    let err = Population::founders(&EngineConfig::default(), &FounderSource::Simulated, 0, BreedingGoal::default(), 1).unwrap_err();
    assert!(matches!(err.root_cause().downcast_ref::<ConfigError>(), Some(ConfigError::EmptyPopulationSize)));

    let err = population::stats::pearson(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).unwrap_err();
    assert!(matches!(err, PopulationError::DegenerateStatistic(_)));
    Ok(())
}

#[test]
fn documented_chi_square() -> Result<()> {
    let expected = validation::chi_square::expected_counts(1000, &[1.0, 2.0, 1.0]);
    let chi2 = validation::chi_square(&[260.0, 480.0, 260.0], &expected)?;
    assert!(approx_eq!(f64, chi2, 1.6, epsilon = 1e-9));
    assert!(chi2 < validation::critical_value(2)?);
    Ok(())
}
