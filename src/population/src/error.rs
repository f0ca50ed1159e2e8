use thiserror::Error;

use crate::MouseId;

/// Failures of population-level operations.
/// 
/// Variants distinguish missing data (`EmptyPopulation`, `InsufficientSurvivors`), bad input
/// (`UnknownMouse`, `LengthMismatch`, ...), and statistics that are undefined for the
/// given data (`DegenerateStatistic`).
#[derive(Error, Debug, PartialEq)]
pub enum PopulationError {
    #[error("Operation requires a non-empty population")]
    EmptyPopulation,

    #[error("Only {survivors} individual(s) survived culling: at least two are required to form a breeding pair")]
    InsufficientSurvivors{survivors: usize},

    #[error("Unknown mouse identifier: {0}")]
    UnknownMouse(MouseId),

    #[error("Mouse identifier {0} is already registered")]
    DuplicateMouse(MouseId),

    #[error("Degenerate statistic: {0}")]
    DegenerateStatistic(&'static str),

    #[error("Series of unequal length ({0} vs {1})")]
    LengthMismatch(usize, usize),

    #[error("Mouse {id} carries {got} markers, expected {expected}")]
    MarkerCountMismatch{id: MouseId, expected: usize, got: usize},
}
