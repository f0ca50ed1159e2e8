use crate::error::PopulationError;

pub fn mean(values: &[f64]) -> Result<f64, PopulationError> {
    if values.is_empty() {
        return Err(PopulationError::EmptyPopulation)
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (denominator `n`).
pub fn variance(values: &[f64]) -> Result<f64, PopulationError> {
    let mu = mean(values)?;
    Ok(values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64)
}

pub fn sd(values: &[f64]) -> Result<f64, PopulationError> {
    Ok(variance(values)?.sqrt())
}

/// Pearson correlation coefficient.
/// 
/// # Errors
/// - `LengthMismatch` if the two series differ in length.
/// - `EmptyPopulation` on empty series.
/// - `DegenerateStatistic` if either series is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, PopulationError> {
    if x.len() != y.len() {
        return Err(PopulationError::LengthMismatch(x.len(), y.len()))
    }
    let (mx, my) = (mean(x)?, mean(y)?);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let (dx, dy) = (xi - mx, yi - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= f64::EPSILON || syy <= f64::EPSILON {
        return Err(PopulationError::DegenerateStatistic("correlation of a constant series"))
    }
    Ok(sxy / (sxx * syy).sqrt())
}

/// Least-squares slope of `y` on `x`.
pub fn regression_slope(x: &[f64], y: &[f64]) -> Result<f64, PopulationError> {
    if x.len() != y.len() {
        return Err(PopulationError::LengthMismatch(x.len(), y.len()))
    }
    let (mx, my) = (mean(x)?, mean(y)?);
    let sxx: f64 = x.iter().map(|xi| (xi - mx).powi(2)).sum();
    if sxx <= f64::EPSILON {
        return Err(PopulationError::DegenerateStatistic("regression on a constant predictor"))
    }
    let sxy: f64 = x.iter().zip(y).map(|(xi, yi)| (xi - mx) * (yi - my)).sum();
    Ok(sxy / sxx)
}

pub fn mean_absolute_error(observed: &[f64], expected: &[f64]) -> Result<f64, PopulationError> {
    if observed.len() != expected.len() {
        return Err(PopulationError::LengthMismatch(observed.len(), expected.len()))
    }
    let errors: Vec<f64> = observed.iter().zip(expected).map(|(o, e)| (o - e).abs()).collect();
    mean(&errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn moments() -> Result<(), PopulationError> {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx_eq!(f64, mean(&values)?, 5.0));
        assert!(approx_eq!(f64, variance(&values)?, 4.0));
        assert!(approx_eq!(f64, sd(&values)?, 2.0));
        assert_eq!(mean(&[]), Err(PopulationError::EmptyPopulation));
        Ok(())
    }

    #[test]
    fn correlation() -> Result<(), PopulationError> {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!(approx_eq!(f64, pearson(&x, &[2.0, 4.0, 6.0, 8.0])?, 1.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, pearson(&x, &[8.0, 6.0, 4.0, 2.0])?, -1.0, epsilon = 1e-12));
        assert!(matches!(pearson(&x, &[1.0; 4]), Err(PopulationError::DegenerateStatistic(_))));
        assert_eq!(pearson(&x, &[1.0]), Err(PopulationError::LengthMismatch(4, 1)));
        Ok(())
    }

    #[test]
    fn slope_and_error() -> Result<(), PopulationError> {
        assert!(approx_eq!(f64, regression_slope(&[0.0, 1.0, 2.0], &[1.0, 1.5, 2.0])?, 0.5, epsilon = 1e-12));
        assert!(regression_slope(&[1.0, 1.0], &[0.0, 2.0]).is_err());
        assert!(approx_eq!(f64, mean_absolute_error(&[0.1, 0.4], &[0.0, 0.5])?, 0.1, epsilon = 1e-12));
        Ok(())
    }
}
