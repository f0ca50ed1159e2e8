use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Population size must be positive")]
    EmptyPopulationSize,

    #[error("{name} must lie within [0, 1] (got {value})")]
    NotAProbability{name: &'static str, value: f64},

    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidMagnitude{name: &'static str, value: f64},

    #[error("Target heritability must lie within (0, 1] (got {0})")]
    InvalidHeritability(f64),

    #[error("Invalid litter size: {0}")]
    InvalidLitter(String),

    #[error("Invalid founder allele frequency range [{0}, {1}]")]
    InvalidFrequencyRange(f64, f64),

    #[error("Cull rate must lie within [0, 1) (got {0})")]
    InvalidCullRate(f64),

    #[error("Top fraction must lie within (0, 1] (got {0})")]
    InvalidTopFraction(f64),

    #[error("Population capacity must allow at least two individuals (got {0})")]
    InvalidCapacity(usize),

    #[error("At least one founder strain is required")]
    NoStrains,

    #[error("Marker index {index} lies outside the genome ({n_markers} markers)")]
    MarkerOutOfRange{index: usize, n_markers: usize},

    #[error("Invalid breeding goal '{0}': expected a preset name or 'trait=label' pairs")]
    InvalidGoal(String),

    #[error("Unknown selection strategy '{0}'")]
    InvalidStrategy(String),
}
