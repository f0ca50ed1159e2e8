extern crate parser;
extern crate logger;

use parser::{Cli, Commands, Common, ValidationMethod};
use population::{
    BreedingGoal, EngineConfig, FounderSource, GenerationPlan, LitterSize, Population, StrainMapping, Strategy,
};
use strain_io::{
    detect_variable_loci, gene_name_from_path, predict_cross, reference, CrossPrediction, CsvDataset, GeneModel,
    GeneModels, InMemoryDataset, Locus, StrainDataset,
};
use validation::{Method, SuiteParams, SuiteReport, ValidationSuite};

use located_error::prelude::*;

#[macro_use]
extern crate log;

/// Unpack the parsed command line and run the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.commands {
        Commands::Simulate{common, sim} => {
            simulate(&common, &sim)?;
        },

        Commands::Validate{common, validation} => {
            let report = validate(&common, &validation)?;
            if ! report.all_passed() {
                warn!("{} validation(s) failed", report.outcomes.len() - report.passed());
            }
        },

        Commands::Predict{predict: args} => {
            predict(&args)?;
        },

        Commands::FromYaml{yaml} => {
            info!("Replaying arguments from {}", yaml.display());
            let cli = Cli::deserialize(&yaml)?;
            self::run(cli)?;
        },
    };
    Ok(())
}

/// Build the generation plan described by the command line.
fn generation_plan(sim: &parser::Simulate) -> Result<GenerationPlan> {
    let strategy: Strategy = sim.strategy.to_string().parse().loc("While parsing --strategy")?;
    let mut plan = GenerationPlan::new(strategy)
        .cull_rate(sim.cull_rate)
        .top_fraction(sim.top_fraction);
    if let Some(litter) = &sim.litter {
        let litter: LitterSize = litter.parse().loc("While parsing --litter")?;
        plan = plan.litter(litter);
    }
    if let Some(capacity) = sim.capacity {
        plan = plan.capacity(capacity);
    }
    plan.validate().loc("While validating the generation plan")?;
    Ok(plan)
}

/// Found a population, then breed it for the requested number of generations. One report line is
/// printed per generation, followed by a summary of the last one.
pub fn simulate(common: &Common, sim: &parser::Simulate) -> Result<Population> {
    let config = match &sim.config {
        Some(path) => EngineConfig::from_yaml(path)?,
        None       => EngineConfig::default(),
    };
    let goal: BreedingGoal = sim.goal.parse().loc("While parsing --goal")?;
    let plan = generation_plan(sim)?;

    // ----------------------------- Strain datasets must outlive the founder source.
    let panel: InMemoryDataset;
    let csv: CsvDataset;
    let source = if sim.strains.is_empty() {
        FounderSource::Simulated
    } else {
        let dataset: &dyn StrainDataset = match &sim.genotypes {
            Some(path) => {
                csv = CsvDataset::from_paths(path, None)?;
                &csv
            },
            None => {
                panel = reference::classic_panel().loc("While loading the classic strain panel")?;
                &panel
            },
        };
        FounderSource::Strains{dataset, strains: sim.strains.clone(), mapping: StrainMapping::classic()}
    };

    let mut population = Population::founders(&config, &source, sim.size, goal, common.seed)?;

    let progress = logger::Logger::progress_bar(u64::from(sim.generations), "Breeding");
    for _ in 0..sim.generations {
        let report = population.next_generation(&plan)?;
        progress.suspend(|| println!("{report}"));
        progress.inc(1);

        if let Some(threshold) = sim.stop_at_goal {
            if population.goal_reached(threshold) {
                info!("Breeding goal reached at generation {}", population.generation());
                break
            }
        }
    }
    progress.finish_and_clear();

    let summary = population.summary()?;
    println!("{summary}");
    Ok(population)
}

/// Run the requested validation experiment(s) and print their outcome.
pub fn validate(common: &Common, args: &parser::Validate) -> Result<SuiteReport> {
    let mut params = SuiteParams::seeded(common.seed);
    if let Some(trials) = args.trials {
        params.mendelian.trials = trials;
    }
    if let Some(size) = args.size {
        params.inbreeding.size = size;
        params.heritability.size = size;
    }
    if let Some(generations) = args.generations {
        params.inbreeding.generations = generations;
    }

    let report = match args.method {
        ValidationMethod::All => ValidationSuite::run_all(&params)?,
        method => {
            let method: Method = method.to_string().parse().loc("While parsing the validation method")?;
            ValidationSuite::run_methods(&[method], &params)?
        },
    };
    println!("{report}");
    Ok(report)
}

/// Gene model of `gene`, or a plain dominant model when `models` has none.
fn model_for(models: &GeneModels, gene: &str) -> GeneModel {
    models.get(gene).cloned().unwrap_or_else(|| {
        warn!("No gene model found for {gene}. Assuming the reference allele is dominant.");
        GeneModel::dominant(gene, "dominant", "recessive")
    })
}

/// Predict the F1 distribution of `strain_a x strain_b`, either at a single locus, or at every
/// locus at which both strains differ.
pub fn predict(args: &parser::Predict) -> Result<Vec<CrossPrediction>> {
    let dataset = CsvDataset::from_paths(&args.genotypes, args.phenotypes.as_deref())?;
    let models = match &args.models {
        Some(path) => GeneModels::from_path(path)?,
        None       => reference::classic_models(),
    };
    let gene = args.gene.clone().or_else(|| gene_name_from_path(&args.genotypes));

    let loci = match &args.locus {
        Some(locus) => vec![Locus::new(locus)],
        None        => detect_variable_loci(&dataset, &args.strain_a, &args.strain_b, args.max_loci)?,
    };
    if loci.is_empty() {
        warn!("{} and {} share the same genotype at every locus", args.strain_a, args.strain_b);
    }

    loci.iter().map(|locus| {
        let model = model_for(&models, gene.as_deref().unwrap_or(locus.as_str()));
        let prediction = predict_cross(&dataset, &args.strain_a, &args.strain_b, locus, &model)?;
        println!("{prediction}");
        Ok(prediction)
    }).collect()
}
