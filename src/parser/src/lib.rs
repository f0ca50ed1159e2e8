use std::{
    ffi::OsStr,
    fmt::{self, Display, Formatter},
    fs::File,
    path::{Path, PathBuf},
};

use located_error::prelude::*;

use clap::{ArgEnum, Args, Parser, Subcommand};
use log::debug;
use serde::{Deserialize, Serialize};

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[clap(name="mousegen", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// mousegen: forward simulation of mouse breeding experiments
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emitted and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli {
    /// Serialize command line arguments within a `.yaml` file.
    ///
    /// # Behavior
    /// - File naming follows the convention '{current time}-{command}.yaml'. current time follows the format
    ///   `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the user-provided `--output-dir` folder. Nothing is written
    ///   when the command has no `--output-dir`.
    ///
    /// Returns the path of the written file, if any.
    pub fn serialize(&self) -> Result<Option<PathBuf>> {
        let serialized = serde_yaml::to_string(&self).loc(ParserError::Serialize)?;
        debug!("\n---- Command line args ----\n{serialized}\n---");

        let (output_dir, command) = match &self.commands {
            Commands::Simulate{common, ..} => (&common.output_dir, "simulate"),
            Commands::Validate{common, ..} => (&common.output_dir, "validate"),
            Commands::Predict{..} | Commands::FromYaml{..} => return Ok(None),
        };
        let Some(output_dir) = output_dir else {
            return Ok(None)
        };

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let output_file = output_dir.join(format!("{current_time}-{command}.yaml"));
        std::fs::write(&output_file, serialized)
            .with_loc(|| ParserError::WriteArgs(output_file.display().to_string()))?;
        Ok(Some(output_file))
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    ///
    /// # Errors
    /// - if the provided `.yaml` does not exist or does not carry read permissions.
    /// - if `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: &Path) -> Result<Self> {
        let ctx = || ParserError::Deserialize(yaml.display().to_string());
        let file = File::open(yaml).with_loc(ctx)?;
        serde_yaml::from_reader(file).with_loc(ctx)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Commands {
    /// Simulate a multi-generational breeding program.
    ///
    /// Founders are either drawn from the engine's allele frequency tables, or built from the
    /// documented genotypes of inbred strains (--strains). A summary line is printed for every generation.
    Simulate {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        sim: Simulate,
    },

    /// Run the statistical validation suite of the engine.
    Validate {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        validation: Validate,
    },

    /// Predict the offspring genotype and phenotype distribution of a cross between two inbred strains.
    Predict {
        #[clap(flatten)]
        predict: Predict,
    },

    /// Run mousegen using a previously generated .yaml configuration file.
    ///
    /// This allows users to easily re-apply a mousegen command using the exact same parameters
    /// and arguments (including the random seed).
    FromYaml {
        yaml: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Common {
    /// Provide the RNG with a set seed.
    ///
    /// A random seed is drawn when unspecified. The seed is archived along with every other argument
    /// when using --output-dir, so that any run can be replayed with `mousegen from-yaml`.
    #[clap(long, required(false), default_value_t=fastrand::u64(u64::MIN..=u64::MAX))]
    pub seed: u64,

    /// Output directory where the command line arguments are archived.
    ///
    /// Note that mousegen will create the specified leaf directory if it is not present, but does not
    /// allow itself from creating parent directories.
    #[clap(short, long, parse(try_from_os_str=valid_output_dir))]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulate {
    /// Number of founder mice.
    #[clap(short='n', long, default_value("20"))]
    pub size: usize,

    /// Number of generations to breed.
    #[clap(short, long, default_value("10"))]
    pub generations: u32,

    /// Pair selection strategy.
    #[clap(short, long, arg_enum, default_value("fitness"))]
    pub strategy: SelectionStrategy,

    /// Fraction of the lowest scoring mice removed before pairing.
    ///
    /// Accepts either a ratio ('0.2') or a percentage ('20%'). Must lie within [0, 1).
    #[clap(short, long, default_value("0"), parse(try_from_str=parse_fraction))]
    pub cull_rate: f64,

    /// Fraction of the survivors paired by the 'fitness' and 'trait-value' strategies.
    ///
    /// At least two mice are always paired.
    #[clap(short, long, default_value("0.5"), parse(try_from_str=parse_fraction))]
    pub top_fraction: f64,

    /// Breeding goal.
    ///
    /// Either a preset (all_white, large_friendly, dumbo_ears, maximize_diversity) or a comma-separated
    /// list of 'trait=phenotype' pairs, e.g. 'coat_color=white,temperament=friendly'
    #[clap(long, default_value("maximize_diversity"))]
    pub goal: String,

    /// Stop early once the breeding goal is reached.
    ///
    /// Threshold is the percentage of mice expressing every goal trait, or the diversity score when
    /// maximizing diversity.
    #[clap(long)]
    pub stop_at_goal: Option<f64>,

    /// Maximum number of mice kept in each new generation.
    #[clap(long)]
    pub capacity: Option<usize>,

    /// Litter size override: an exact count ('5') or an inclusive range ('4-6').
    #[clap(short, long)]
    pub litter: Option<String>,

    /// Engine configuration file (.yaml).
    ///
    /// Unspecified fields keep their default value.
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub config: Option<PathBuf>,

    /// Found the population from documented inbred strains, cycling through the provided names.
    ///
    /// Strains are looked up within --genotypes, or within the built-in classic panel
    /// (C57BL/6J, BALB/cJ, A/J, DBA/2J) when no file is provided.
    #[clap(long, multiple_values(true))]
    pub strains: Vec<String>,

    /// Strain genotype table (.csv) used by --strains.
    #[clap(long, requires("strains"), parse(try_from_os_str=valid_input_file))]
    pub genotypes: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validate {
    /// Validation method to run.
    #[clap(arg_enum, default_value("all"))]
    pub method: ValidationMethod,

    /// Number of crosses of the Mendelian experiment.
    #[clap(long)]
    pub trials: Option<usize>,

    /// Population size of the inbreeding and heritability experiments.
    #[clap(short='n', long)]
    pub size: Option<usize>,

    /// Number of generations of the inbreeding experiment.
    #[clap(short, long)]
    pub generations: Option<usize>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predict {
    /// Strain genotype table (.csv)
    ///
    /// Expected columns: 'strain,chr,pos,genotype_012', where genotype_012 is the alternative allele
    /// count (0, 1, 2). Loci are then referred to as 'chr:pos'.
    #[clap(short='G', long, parse(try_from_os_str=valid_input_file))]
    pub genotypes: PathBuf,

    /// Strain phenotype table (.csv)
    #[clap(short='P', long, parse(try_from_os_str=valid_input_file))]
    pub phenotypes: Option<PathBuf>,

    /// Gene models (.json), mapping genotypes to phenotypes.
    ///
    /// Defaults to the built-in classic coat colour models.
    #[clap(short, long, parse(try_from_os_str=valid_input_file))]
    pub models: Option<PathBuf>,

    /// First parental strain.
    #[clap(short='a', long)]
    pub strain_a: String,

    /// Second parental strain.
    #[clap(short='b', long)]
    pub strain_b: String,

    /// Locus to predict.
    ///
    /// When unspecified, every locus at which both strains differ is predicted (up to --max-loci).
    #[clap(short='L', long)]
    pub locus: Option<String>,

    /// Gene symbol of the predicted locus, used to pick a gene model.
    ///
    /// Inferred from the genotype file name ('snp_<Gene>.csv') when unspecified.
    #[clap(long)]
    pub gene: Option<String>,

    /// Maximum number of variable loci predicted when --locus is unspecified.
    #[clap(long, default_value("10"))]
    pub max_loci: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ArgEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {Random, Fitness, TraitValue, Diverse, Assortative}

impl Display for SelectionStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Random      => "random",
            Self::Fitness     => "fitness",
            Self::TraitValue  => "trait-value",
            Self::Diverse     => "diverse",
            Self::Assortative => "assortative",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ArgEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMethod {All, Mendelian, Grm, Inbreeding, Heritability, RealMode}

impl Display for ValidationMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All          => "all",
            Self::Mendelian    => "mendelian",
            Self::Grm          => "grm",
            Self::Inbreeding   => "inbreeding",
            Self::Heritability => "heritability",
            Self::RealMode     => "real-mode",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(self, path: &Path) -> Result<(), ParserError> {
        use ParserError::{InvalidFileEntity, MissingFileEntity};
        if ! path.exists() {
            return Err(MissingFileEntity(self, path.display().to_string()))
        }
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };
        match valid {
            true  => Ok(()),
            false => Err(InvalidFileEntity(self, path.display().to_string())),
        }
    }
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    let path = PathBuf::from(s);
    FileEntity::File.validate(&path).loc("While checking for file validity")?;
    Ok(path)
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    let path = PathBuf::from(s);
    if ! path.exists() {
        std::fs::create_dir(&path).with_loc(|| format!("While creating {}", path.display()))?;
    }
    FileEntity::Directory.validate(&path).loc("While checking for directory validity")?;
    Ok(path)
}

/// Parse a ratio within `[0, 1]`, given either as a decimal (`"0.2"`) or as a percentage (`"20%"`).
pub fn parse_fraction(s: &str) -> Result<f64> {
    use ParserError::ParseRatio;
    const MIN: f64 = 0.0;
    const MAX: f64 = 1.0;

    let ctx = || format!("While parsing {s}");
    let ratio = match s.trim().strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().with_loc(ctx)? / 100.0,
        None          => s.trim().parse::<f64>().with_loc(ctx)?,
    };

    match (MIN..=MAX).contains(&ratio) {
        true  => Ok(ratio),
        false => Err(ParseRatio(MIN, MAX)).with_loc(ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mousegen").chain(args.iter().copied()))
            .expect("Failed to parse arguments")
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simulate_defaults() {
        let cli = parse(&["simulate", "--seed", "42"]);
        let Commands::Simulate{common, sim} = cli.commands else { panic!("Expected a simulate command") };
        assert_eq!(common.seed, 42);
        assert_eq!(common.output_dir, None);
        assert_eq!(sim.size, 20);
        assert_eq!(sim.generations, 10);
        assert_eq!(sim.strategy, SelectionStrategy::Fitness);
        assert!(sim.cull_rate.abs() < f64::EPSILON);
        assert!((sim.top_fraction - 0.5).abs() < f64::EPSILON);
        assert_eq!(sim.goal, "maximize_diversity");
        assert!(sim.strains.is_empty());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn simulate_arguments() {
        let cli = parse(&[
            "-vv", "simulate", "-n", "50", "-g", "3", "--strategy", "trait-value", "--cull-rate", "20%",
            "--goal", "coat_color=white", "--capacity", "40", "--litter", "4-6", "--strains", "C57BL6J", "BALBCJ",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Simulate{sim, ..} = cli.commands else { panic!("Expected a simulate command") };
        assert_eq!(sim.size, 50);
        assert_eq!(sim.generations, 3);
        assert_eq!(sim.strategy, SelectionStrategy::TraitValue);
        assert!((sim.cull_rate - 0.2).abs() < 1e-12);
        assert_eq!(sim.capacity, Some(40));
        assert_eq!(sim.litter.as_deref(), Some("4-6"));
        assert_eq!(sim.strains, vec!["C57BL6J", "BALBCJ"]);
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        let args = |a: &[&str]| Cli::try_parse_from(std::iter::once("mousegen").chain(a.iter().copied()));
        assert!(args(&["simulate", "--strategy", "inbred"]).is_err());
        assert!(args(&["simulate", "--cull-rate", "1.5"]).is_err());
        assert!(args(&["simulate", "--config", "/no/such/engine.yaml"]).is_err());
        assert!(args(&["validate", "everything"]).is_err());
        assert!(args(&["predict", "--strain-a", "AJ"]).is_err());
    }

    #[test]
    fn validate_method() {
        let cli = parse(&["validate"]);
        let Commands::Validate{validation, ..} = cli.commands else { panic!("Expected a validate command") };
        assert_eq!(validation.method, ValidationMethod::All);
        assert_eq!(validation.trials, None);

        let cli = parse(&["validate", "real-mode", "--trials", "200", "--seed", "7"]);
        let Commands::Validate{common, validation} = cli.commands else { panic!("Expected a validate command") };
        assert_eq!(validation.method, ValidationMethod::RealMode);
        assert_eq!(validation.trials, Some(200));
        assert_eq!(common.seed, 7);
    }

    #[test]
    fn fractions() -> Result<()> {
        assert!((parse_fraction("0.25")? - 0.25).abs() < 1e-12);
        assert!((parse_fraction("25%")? - 0.25).abs() < 1e-12);
        assert!((parse_fraction("100%")? - 1.0).abs() < 1e-12);
        assert!(parse_fraction("-0.1").is_err());
        assert!(parse_fraction("120%").is_err());
        assert!(parse_fraction("a lot").is_err());
        Ok(())
    }

    #[test]
    fn display_matches_possible_values() {
        for strategy in SelectionStrategy::value_variants() {
            assert_eq!(SelectionStrategy::from_str(&strategy.to_string(), false), Ok(*strategy));
        }
        for method in ValidationMethod::value_variants() {
            assert_eq!(ValidationMethod::from_str(&method.to_string(), false), Ok(*method));
        }
    }

    #[test]
    fn yaml_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let dir_arg = dir.path().join("runs");
        let cli = parse(&["simulate", "--seed", "42", "-o", dir_arg.to_str().expect("non UTF-8 path"), "--strategy", "diverse"]);

        let written = cli.serialize()?.expect("--output-dir was provided");
        assert!(written.starts_with(&dir_arg));
        assert!(written.to_string_lossy().ends_with("-simulate.yaml"));
        assert_eq!(Cli::deserialize(&written)?, cli);
        Ok(())
    }

    #[test]
    fn nothing_to_serialize_without_output_dir() -> Result<()> {
        assert_eq!(parse(&["validate", "mendelian"]).serialize()?, None);
        assert!(Cli::deserialize(Path::new("/no/such/args.yaml")).is_err());
        Ok(())
    }
}
