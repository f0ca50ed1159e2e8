use crate::error::ValidationError;

/// Chi-square critical values at α = 0.05, for 1 to 10 degrees of freedom.
const CRITICAL_05: [f64; 10] = [3.841, 5.991, 7.815, 9.488, 11.070, 12.592, 14.067, 15.507, 16.919, 18.307];

/// Pearson goodness-of-fit statistic: `Σ (O - E)² / E`
/// 
/// # Errors
/// - `LengthMismatch` if both slices differ in length
/// - `NonPositiveExpectation` if any expected count is `<= 0`
pub fn chi_square(observed: &[f64], expected: &[f64]) -> Result<f64, ValidationError> {
    if observed.len() != expected.len() {
        return Err(ValidationError::LengthMismatch(observed.len(), expected.len()))
    }
    observed.iter().zip(expected).enumerate().try_fold(0.0, |acc, (i, (o, e))| {
        if *e <= 0.0 {
            return Err(ValidationError::NonPositiveExpectation(*e, i))
        }
        Ok(acc + (o - e).powi(2) / e)
    })
}

/// Critical value of the chi-square distribution at α = 0.05.
pub fn critical_value(df: usize) -> Result<f64, ValidationError> {
    df.checked_sub(1)
        .and_then(|i| CRITICAL_05.get(i))
        .copied()
        .ok_or(ValidationError::UnsupportedDegreesOfFreedom(df))
}

/// Expected counts of `n` draws distributed along `ratio` (e.g. `[1, 2, 1]`).
#[must_use]
pub fn expected_counts(n: usize, ratio: &[f64]) -> Vec<f64> {
    let total: f64 = ratio.iter().sum();
    ratio.iter().map(|r| n as f64 * r / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn documented_example() -> Result<(), ValidationError> {
        let chi2 = chi_square(&[260.0, 480.0, 260.0], &expected_counts(1000, &[1.0, 2.0, 1.0]))?;
        assert!(approx_eq!(f64, chi2, 1.6, epsilon = 1e-9));
        assert!(chi2 < critical_value(2)?);
        Ok(())
    }

    #[test]
    fn critical_values() -> Result<(), ValidationError> {
        assert!(approx_eq!(f64, critical_value(1)?, 3.841));
        assert!(approx_eq!(f64, critical_value(2)?, 5.991));
        assert!(approx_eq!(f64, critical_value(10)?, 18.307));
        assert_eq!(critical_value(0), Err(ValidationError::UnsupportedDegreesOfFreedom(0)));
        assert_eq!(critical_value(11), Err(ValidationError::UnsupportedDegreesOfFreedom(11)));
        Ok(())
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(chi_square(&[1.0], &[1.0, 2.0]), Err(ValidationError::LengthMismatch(1, 2)));
        assert_eq!(chi_square(&[1.0, 1.0], &[1.0, 0.0]), Err(ValidationError::NonPositiveExpectation(0.0, 1)));
    }
}
