#![allow(dead_code)]

mod fixture;
pub use fixture::Fixture;

use genome::{AlleleFrequencies, Genome, MutationRates, SimRng, Trait, VisibleTraits};
use located_error::prelude::*;
use parser::Cli;
use population::{Breeder, EngineConfig, Mouse, MouseId};

/// Parse a whitespace separated command line.
pub fn cli(args: &str) -> Cli {
    <Cli as clap::Parser>::try_parse_from(args.split_whitespace())
        .unwrap_or_else(|e| panic!("Failed to parse '{args}': {e}"))
}

/// Breeder over `n_markers` markers, with mutation disabled.
pub fn breeder(n_markers: usize) -> Result<Breeder> {
    let config = EngineConfig{n_markers, ..EngineConfig::default()};
    let freqs  = AlleleFrequencies::uniform(n_markers, 0.5)?;
    Ok(Breeder::from_config(&config, &freqs, &mut SimRng::with_seed(0))?.with_mutation(MutationRates::none()))
}

/// Fully inbred founder: `allele` at every marker, and the provided coat colour genotype.
pub fn inbred(breeder: &Breeder, id: u64, allele: u8, coat: &str, rng: &mut SimRng) -> Result<Mouse> {
    let n = breeder.layout().n_markers();
    let traits = VisibleTraits::default().with(Trait::CoatColor, coat)?;
    breeder.founder(MouseId(id), Genome::new(vec![allele; n], vec![allele; n], traits)?, None, rng)
}

/// `strain,chr,pos,genotype_012` table of the classic coat colour loci.
pub const CLASSIC_GENOTYPES: &str = "\
strain,chr,pos,genotype_012
C57BL/6J,7,87493043,0
C57BL/6J,4,80958124,0
C57BL/6J,9,75078234,0
BALB/cJ,7,87493043,2
BALB/cJ,4,80958124,2
BALB/cJ,9,75078234,0
DBA/2J,7,87493043,0
DBA/2J,4,80958124,2
DBA/2J,9,75078234,2
";

pub const CLASSIC_PHENOTYPES: &str = "\
strain,coat_color
C57BL/6J,black
BALB/cJ,albino
DBA/2J,dilute brown
";
