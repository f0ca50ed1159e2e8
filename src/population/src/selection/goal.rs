use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use genome::{Phenotype, Trait};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Target phenotype of a breeding program: `trait -> expressed category`.
/// 
/// An empty goal means "maximize diversity": every mouse is then equally fit, and the goal is
/// reached once the visible-trait diversity score crosses the requested threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingGoal(BTreeMap<Trait, String>);

impl BreedingGoal {
    pub const PRESETS: [&'static str; 4] = ["all_white", "large_friendly", "dumbo_ears", "maximize_diversity"];

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, trait_: Trait, label: &str) -> Self {
        self.0.insert(trait_, label.to_lowercase());
        self
    }

    /// Named presets. Returns `None` for an unknown name.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        use Trait::{CoatColor, EarShape, Size, Temperament};
        let goal = match name.to_lowercase().replace('-', "_").as_str() {
            "all_white" => Self::new()
                .with(CoatColor, "white")
                .with(Size, "large")
                .with(EarShape, "normal")
                .with(Temperament, "friendly"),
            "large_friendly"     => Self::new().with(Size, "large").with(Temperament, "friendly"),
            "dumbo_ears"         => Self::new().with(EarShape, "dumbo").with(Temperament, "friendly"),
            "maximize_diversity" => Self::new(),
            _ => return None,
        };
        Some(goal)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Trait, &String)> {
        self.0.iter()
    }

    /// Number of goal traits expressed by `phenotype`.
    #[must_use]
    pub fn matched(&self, phenotype: &Phenotype) -> usize {
        self.0.iter().filter(|(t, label)| phenotype.label(**t) == Some(label.as_str())).count()
    }

    /// Percentage (0-100) of goal traits expressed by `phenotype`. An empty goal scores 100.
    #[must_use]
    pub fn score(&self, phenotype: &Phenotype) -> f64 {
        if self.0.is_empty() {
            return 100.0
        }
        self.matched(phenotype) as f64 / self.0.len() as f64 * 100.0
    }
}

impl Display for BreedingGoal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "maximize_diversity")
        }
        let fields: Vec<String> = self.0.iter().map(|(t, label)| format!("{t}={label}")).collect();
        write!(f, "{}", fields.join(","))
    }
}

impl FromStr for BreedingGoal {
    type Err = ConfigError;

    /// Parse either a preset name (`large_friendly`) or a list of `trait=label` pairs
    /// (`coat_color=white,size=small`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(preset) = Self::preset(s.trim()) {
            return Ok(preset)
        }
        let invalid = || ConfigError::InvalidGoal(s.to_string());
        let mut goal = Self::new();
        for field in s.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let (name, label) = field.split_once('=').ok_or_else(invalid)?;
            let trait_ = name.trim().parse::<Trait>().map_err(|_| invalid())?;
            if label.trim().is_empty() {
                return Err(invalid())
            }
            goal = goal.with(trait_, label.trim());
        }
        if goal.is_empty() {
            return Err(invalid())
        }
        Ok(goal)
    }
}
