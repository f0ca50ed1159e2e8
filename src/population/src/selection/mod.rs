use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use genome::SimRng;
use located_error::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{config::{ConfigError, LitterSize}, error::PopulationError};

mod goal;
pub use goal::BreedingGoal;

/// How breeding pairs are formed from the survivors of culling.
/// - `Random`     : shuffle, then pair neighbours.
/// - `Fitness`    : rank by goal fitness, pair the top fraction sequentially.
/// - `TraitValue` : rank by quantitative trait value, pair the top fraction sequentially.
/// - `Diverse`    : greedily pair every mouse with its least related remaining candidate.
/// - `Assortative`: greedily pair every mouse with its most related remaining candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Random,
    #[default]
    Fitness,
    TraitValue,
    Diverse,
    Assortative,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [Self::Random, Self::Fitness, Self::TraitValue, Self::Diverse, Self::Assortative];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Random      => "random",
            Self::Fitness     => "fitness",
            Self::TraitValue  => "trait_value",
            Self::Diverse     => "diverse",
            Self::Assortative => "assortative",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter()
            .find(|strategy| strategy.name() == normalized)
            .ok_or_else(|| ConfigError::InvalidStrategy(s.to_string()))
    }
}

/// Parameters of a single generational advance.
/// # Fields:
/// - `strategy`    : pair selection strategy.
/// - `cull_rate`   : fraction of the lowest scoring mice removed before pairing, within `[0, 1)`.
/// - `top_fraction`: fraction of the survivors entering `Fitness` and `TraitValue` pairing
///                   (at least two mice always do).
/// - `litter`      : litter size override. `None` uses the engine configuration.
/// - `capacity`    : maximum size of the new generation. `None` keeps every offspring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationPlan {
    pub strategy    : Strategy,
    pub cull_rate   : f64,
    pub top_fraction: f64,
    pub litter      : Option<LitterSize>,
    pub capacity    : Option<usize>,
}

impl Default for GenerationPlan {
    fn default() -> Self {
        Self { strategy: Strategy::default(), cull_rate: 0.0, top_fraction: 0.5, litter: None, capacity: None }
    }
}

impl GenerationPlan {
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy, ..Self::default() }
    }

    #[must_use]
    pub fn cull_rate(mut self, rate: f64) -> Self {
        self.cull_rate = rate;
        self
    }

    #[must_use]
    pub fn top_fraction(mut self, fraction: f64) -> Self {
        self.top_fraction = fraction;
        self
    }

    #[must_use]
    pub fn litter(mut self, litter: LitterSize) -> Self {
        self.litter = Some(litter);
        self
    }

    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// # Errors
    /// Any `ConfigError` describing an out of range parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.cull_rate) {
            return Err(ConfigError::InvalidCullRate(self.cull_rate))
        }
        if !(self.top_fraction > 0.0 && self.top_fraction <= 1.0) {
            return Err(ConfigError::InvalidTopFraction(self.top_fraction))
        }
        if let Some(litter) = &self.litter {
            litter.validate()?;
        }
        match self.capacity {
            Some(capacity) if capacity < 2 => Err(ConfigError::InvalidCapacity(capacity)),
            _ => Ok(())
        }
    }
}

/// Remove the `floor(n * cull_rate)` lowest scoring candidates. Survivors are returned sorted by
/// decreasing score; ties keep their original order.
/// 
/// # Errors
/// `PopulationError::InsufficientSurvivors` if fewer than two candidates remain.
pub fn cull<T>(mut scored: Vec<(T, f64)>, cull_rate: f64) -> Result<Vec<(T, f64)>> {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    let n_culled = (scored.len() as f64 * cull_rate).floor() as usize;
    scored.truncate(scored.len() - n_culled.min(scored.len()));
    if scored.len() < 2 {
        return Err(PopulationError::InsufficientSurvivors{survivors: scored.len()})
            .with_loc(|| format!("While culling {n_culled} individual(s) at rate {cull_rate}"))
    }
    Ok(scored)
}

/// Pair neighbours: `(0, 1), (2, 3), ...`. An odd candidate out is left unpaired.
#[must_use]
pub fn pair_sequential<T: Clone>(candidates: &[T]) -> Vec<(T, T)> {
    candidates.chunks_exact(2).map(|pair| (pair[0].clone(), pair[1].clone())).collect()
}

/// Shuffle the candidates, then pair neighbours.
pub fn pair_random<T: Clone>(candidates: &[T], rng: &mut SimRng) -> Vec<(T, T)> {
    let mut shuffled = candidates.to_vec();
    rng.shuffle(&mut shuffled);
    pair_sequential(&shuffled)
}

/// Greedy pairing on a relatedness measure: take the first remaining candidate and pair it with
/// the remaining candidate minimizing (`lowest == true`) or maximizing `relatedness`. Ties go to
/// the earliest candidate.
pub fn pair_by_relatedness<T, F>(candidates: &[T], lowest: bool, mut relatedness: F) -> Result<Vec<(T, T)>>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<f64>,
{
    let mut available: Vec<T> = candidates.to_vec();
    let mut pairs = Vec::with_capacity(available.len() / 2);
    while available.len() >= 2 {
        let first = available.remove(0);
        let mut best: Option<(usize, f64)> = None;
        for (i, other) in available.iter().enumerate() {
            let r = relatedness(&first, other)?;
            let better = match best {
                None => true,
                Some((_, current)) => if lowest { r < current } else { r > current },
            };
            if better {
                best = Some((i, r));
            }
        }
        if let Some((i, _)) = best {
            pairs.push((first, available.remove(i)));
        }
    }
    Ok(pairs)
}

/// Number of mice entering top-ranked pairing: `max(2, floor(n * top_fraction))`, capped to `n`.
#[must_use]
pub fn top_count(n: usize, top_fraction: f64) -> usize {
    ((n as f64 * top_fraction).floor() as usize).max(2).min(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip() -> Result<(), ConfigError> {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>()?, strategy);
        }
        assert_eq!("Trait-Value".parse::<Strategy>()?, Strategy::TraitValue);
        assert!("roulette".parse::<Strategy>().is_err());
        Ok(())
    }

    #[test]
    fn plan_validation() {
        assert!(GenerationPlan::default().validate().is_ok());
        assert_eq!(GenerationPlan::default().cull_rate(1.0).validate(), Err(ConfigError::InvalidCullRate(1.0)));
        assert_eq!(GenerationPlan::default().top_fraction(0.0).validate(), Err(ConfigError::InvalidTopFraction(0.0)));
        assert_eq!(GenerationPlan::default().capacity(1).validate(), Err(ConfigError::InvalidCapacity(1)));
        assert!(GenerationPlan::default().litter(LitterSize::Exact(0)).validate().is_err());
    }

    #[test]
    fn cull_keeps_highest_scores() -> Result<()> {
        let scored = vec![("a", 10.0), ("b", 50.0), ("c", 30.0), ("d", 20.0), ("e", 40.0)];
        let survivors = cull(scored, 0.5)?; // floor(2.5) = 2 culled
        assert_eq!(survivors.iter().map(|s| s.0).collect::<Vec<_>>(), vec!["b", "e", "c"]);
        Ok(())
    }

    #[test]
    fn cull_requires_two_survivors() {
        let err = cull(vec![(1, 1.0), (2, 2.0), (3, 3.0)], 0.9).unwrap_err();
        assert_eq!(
            err.root_cause().downcast_ref::<PopulationError>(),
            Some(&PopulationError::InsufficientSurvivors{survivors: 1})
        );
    }

    #[test]
    fn sequential_pairs_drop_odd_candidate() {
        assert_eq!(pair_sequential(&[1, 2, 3, 4, 5]), vec![(1, 2), (3, 4)]);
        assert_eq!(top_count(10, 0.2), 2);
        assert_eq!(top_count(3, 0.1), 2);
        assert_eq!(top_count(100, 0.5), 50);
    }

    #[test]
    fn random_pairs_use_every_candidate_once() {
        let pairs = pair_random(&[1, 2, 3, 4, 5, 6], &mut SimRng::with_seed(7));
        let mut used: Vec<i32> = pairs.iter().flat_map(|(a, b)| [*a, *b]).collect();
        used.sort_unstable();
        assert_eq!(used, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn greedy_relatedness_pairing() -> Result<()> {
        // Relatedness = 1 within the same family (same tens digit), 0 otherwise.
        let family = |a: &i32, b: &i32| Ok(if a / 10 == b / 10 { 1.0 } else { 0.0 });
        let candidates = [11, 12, 21, 22];
        assert_eq!(pair_by_relatedness(&candidates, true, family)?, vec![(11, 21), (12, 22)]);
        assert_eq!(pair_by_relatedness(&candidates, false, family)?, vec![(11, 12), (21, 22)]);
        Ok(())
    }
}
