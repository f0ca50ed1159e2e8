use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Observed and expected counts differ in length ({0} vs {1})")]
    LengthMismatch(usize, usize),

    #[error("Expected counts must be strictly positive (got {0} at category {1})")]
    NonPositiveExpectation(f64, usize),

    #[error("No tabulated chi-square critical value for {0} degree(s) of freedom")]
    UnsupportedDegreesOfFreedom(usize),

    #[error("Invalid validation parameter: {0}")]
    InvalidParameter(String),
}
