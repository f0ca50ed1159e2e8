use std::{
    fmt::{self, Display, Formatter},
    fs::File,
    path::Path,
    str::FromStr,
};

use genome::{ChromosomeLayout, MutationRates, SimRng, TraitFrequencies};
use located_error::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};

mod error;
pub use error::ConfigError;

/// Number of offspring produced by a single mating.
/// - `Random{min, max}`: drawn uniformly within `[min, max]` at every mating.
/// - `Exact(n)`        : exactly `n` offspring, each one from freshly formed gametes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LitterSize {
    Random{min: usize, max: usize},
    Exact(usize),
}

impl Default for LitterSize {
    fn default() -> Self {
        Self::Random{min: 4, max: 6}
    }
}

impl LitterSize {
    /// # Errors
    /// `ConfigError::InvalidLitter` on empty or inverted litter sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Exact(0) | Self::Random{min: 0, ..} => Err(ConfigError::InvalidLitter(format!("{self}: a litter holds at least one offspring"))),
            Self::Random{min, max} if min > max      => Err(ConfigError::InvalidLitter(format!("{self}: inverted range"))),
            _ => Ok(())
        }
    }

    pub fn draw(&self, rng: &mut SimRng) -> usize {
        match *self {
            Self::Random{min, max} => rng.usize(min..=max),
            Self::Exact(n)         => n,
        }
    }
}

impl Display for LitterSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random{min, max} => write!(f, "{min}-{max}"),
            Self::Exact(n)         => write!(f, "{n}"),
        }
    }
}

impl FromStr for LitterSize {
    type Err = ConfigError;

    /// Parse either an exact count (`"5"`) or an inclusive range (`"4-6"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidLitter(s.to_string());
        let litter = match s.split_once('-') {
            Some((min, max)) => Self::Random{
                min: min.trim().parse().map_err(|_| invalid())?,
                max: max.trim().parse().map_err(|_| invalid())?
            },
            None => Self::Exact(s.trim().parse().map_err(|_| invalid())?),
        };
        litter.validate()?;
        Ok(litter)
    }
}

/// Every tunable parameter of the simulation engine.
/// # Fields:
/// - `n_markers`             : number of biallelic marker loci (`M`).
/// - `n_chromosomes`         : number of chromosomes the markers are split across (`C`).
/// - `morgans_per_locus`     : genetic length of one marker interval (0.01 = 1 Morgan per 100 loci).
/// - `marker_mutation_rate`  : per-allele marker flip probability.
/// - `trait_mutation_rate`   : per-allele visible trait flip probability.
/// - `heritability`          : target narrow-sense heritability of the quantitative trait.
/// - `effect_sd`             : standard deviation of additive marker effects.
/// - `trait_intercept`       : baseline value of the quantitative trait.
/// - `litter`                : default litter size policy.
/// - `marker_frequency_range`: founder marker frequencies are drawn uniformly within this range.
/// - `trait_frequency`       : founder frequency of the first symbol of every visible trait alphabet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub n_markers             : usize,
    pub n_chromosomes         : usize,
    pub morgans_per_locus     : f64,
    pub marker_mutation_rate  : f64,
    pub trait_mutation_rate   : f64,
    pub heritability          : f64,
    pub effect_sd             : f64,
    pub trait_intercept       : f64,
    pub litter                : LitterSize,
    pub marker_frequency_range: [f64; 2],
    pub trait_frequency       : f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_markers             : 200,
            n_chromosomes         : 2,
            morgans_per_locus     : 0.01,
            marker_mutation_rate  : 0.001,
            trait_mutation_rate   : 0.01,
            heritability          : 0.4,
            effect_sd             : 0.1,
            trait_intercept       : 100.0,
            litter                : LitterSize::default(),
            marker_frequency_range: [0.05, 0.5],
            trait_frequency       : 0.5,
        }
    }
}

impl EngineConfig {
    /// Deserialize and validate a configuration from a `.yaml` file. Missing fields take their default value.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let file = File::open(path).with_loc(|| format!("Failed to open engine configuration {}", path.display()))?;
        let config: Self = serde_yaml::from_reader(file)
            .with_loc(|| format!("Failed to deserialize engine configuration {}", path.display()))?;
        config.validate()?;
        debug!("Loaded engine configuration: {config:?}");
        Ok(config)
    }

    /// Reject any invalid parameter. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        use ConfigError::{InvalidFrequencyRange, InvalidHeritability, InvalidMagnitude, NotAProbability};
        let ctx = "While validating engine configuration";
        self.layout().loc(ctx)?;
        self.mutation_rates().loc(ctx)?;
        if !(self.heritability > 0.0 && self.heritability <= 1.0) {
            return Err(InvalidHeritability(self.heritability)).loc(ctx)
        }
        if !self.effect_sd.is_finite() || self.effect_sd < 0.0 {
            return Err(InvalidMagnitude{name: "effect_sd", value: self.effect_sd}).loc(ctx)
        }
        if !self.trait_intercept.is_finite() {
            return Err(InvalidMagnitude{name: "trait_intercept", value: self.trait_intercept}).loc(ctx)
        }
        self.litter.validate().loc(ctx)?;
        let [lo, hi] = self.marker_frequency_range;
        if !((0.0..=1.0).contains(&lo) && (0.0..=1.0).contains(&hi) && lo <= hi) {
            return Err(InvalidFrequencyRange(lo, hi)).loc(ctx)
        }
        if !(0.0..=1.0).contains(&self.trait_frequency) {
            return Err(NotAProbability{name: "trait_frequency", value: self.trait_frequency}).loc(ctx)
        }
        Ok(())
    }

    pub fn layout(&self) -> Result<ChromosomeLayout> {
        Ok(ChromosomeLayout::new(self.n_markers, self.n_chromosomes, self.morgans_per_locus)?)
    }

    pub fn mutation_rates(&self) -> Result<MutationRates> {
        Ok(MutationRates::new(self.marker_mutation_rate, self.trait_mutation_rate)?)
    }

    pub fn trait_frequencies(&self) -> Result<TraitFrequencies> {
        Ok(TraitFrequencies::uniform(self.trait_frequency)?)
    }
}
