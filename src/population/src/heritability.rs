use located_error::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{error::PopulationError, stats};

/// Trait values recorded around a single round of selection and mating.
/// # Fields:
/// - `pre_selection`: every mouse of the parental generation, before culling.
/// - `selected`     : mice that entered a breeding pair (once each).
/// - `offspring`    : every offspring produced, before any capacity truncation.
/// - `midparents`   : `(mid-parent value, offspring value)` for every offspring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub pre_selection: Vec<f64>,
    pub selected     : Vec<f64>,
    pub offspring    : Vec<f64>,
    pub midparents   : Vec<(f64, f64)>,
}

/// Breeder's equation estimate: `h² = R / S`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeritabilityEstimate {
    pub selection_differential: f64,
    pub response              : f64,
    pub h2                    : f64,
}

/// Realized heritability of a selection event.
/// - `S = mean(selected) - mean(pre_selection)`
/// - `R = mean(offspring) - mean(pre_selection)`
/// 
/// # Errors
/// - `EmptyPopulation` if any series is empty.
/// - `DegenerateStatistic` if the selection differential is zero.
pub fn realized_heritability(event: &SelectionEvent) -> Result<HeritabilityEstimate> {
    let ctx = "While computing realized heritability";
    let base = stats::mean(&event.pre_selection).loc(ctx)?;
    let selection_differential = stats::mean(&event.selected).loc(ctx)? - base;
    let response = stats::mean(&event.offspring).loc(ctx)? - base;
    if selection_differential.abs() < f64::EPSILON {
        return Err(PopulationError::DegenerateStatistic("selection differential is zero")).loc(ctx)
    }
    Ok(HeritabilityEstimate{selection_differential, response, h2: response / selection_differential})
}

/// Slope of offspring values regressed on mid-parent values: estimates `h²` under an additive model.
/// 
/// # Errors
/// `DegenerateStatistic` if every mid-parent value is identical.
pub fn midparent_regression(pairs: &[(f64, f64)]) -> Result<f64> {
    let (midparent, offspring): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
    Ok(stats::regression_slope(&midparent, &offspring).loc("While regressing offspring on mid-parent values")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn breeders_equation() -> Result<()> {
        let event = SelectionEvent {
            pre_selection: vec![8.0, 10.0, 12.0],
            selected     : vec![12.0, 12.0],
            offspring    : vec![11.0, 11.0],
            midparents   : vec![],
        };
        let estimate = realized_heritability(&event)?;
        assert!(approx_eq!(f64, estimate.selection_differential, 2.0));
        assert!(approx_eq!(f64, estimate.response, 1.0));
        assert!(approx_eq!(f64, estimate.h2, 0.5));
        Ok(())
    }

    #[test]
    fn no_selection_is_degenerate() {
        let event = SelectionEvent{pre_selection: vec![1.0, 3.0], selected: vec![1.0, 3.0], offspring: vec![2.0], midparents: vec![]};
        let err = realized_heritability(&event).unwrap_err();
        assert!(matches!(err.root_cause().downcast_ref::<PopulationError>(), Some(PopulationError::DegenerateStatistic(_))));
        assert!(realized_heritability(&SelectionEvent::default()).is_err());
    }

    #[test]
    fn midparent_slope() -> Result<()> {
        let pairs = [(1.0, 1.4), (2.0, 1.9), (3.0, 2.4)];
        assert!(approx_eq!(f64, midparent_regression(&pairs)?, 0.5, epsilon = 1e-12));
        assert!(midparent_regression(&[(1.0, 2.0), (1.0, 3.0)]).is_err());
        Ok(())
    }
}
