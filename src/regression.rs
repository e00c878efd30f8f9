use crate::error::{ChartError, Result};

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionFit {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares fit over `(x, y)` points.
pub fn fit_linear(points: &[(f64, f64)]) -> Result<RegressionFit> {
    if points.len() < 2 {
        return Err(ChartError::DegenerateInput {
            reason: format!("need at least 2 points, got {}", points.len()),
        });
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|&(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|&(_, y)| y).sum();
    let sum_xx: f64 = points.iter().map(|&(x, _)| x * x).sum();
    let sum_xy: f64 = points.iter().map(|&(x, y)| x * y).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(ChartError::DegenerateInput {
            reason: "all x values are identical".to_string(),
        });
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(ChartError::DegenerateInput {
            reason: "fit is not finite".to_string(),
        });
    }

    Ok(RegressionFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_exact_line() {
        let fit = fit_linear(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!(fit.intercept.abs() < 1e-9);
        assert!((fit.predict(10.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_noisy_points() {
        let fit = fit_linear(&[(0.0, 1.5), (1.0, 1.5), (2.0, 3.5), (3.0, 3.5)]).unwrap();
        assert!((fit.slope - 0.8).abs() < 1e-9);
        assert!((fit.intercept - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_fit_vertical_data() {
        let err = fit_linear(&[(5.0, 1.0), (5.0, 2.0), (5.0, 3.0)]).unwrap_err();
        assert!(matches!(err, ChartError::DegenerateInput { .. }));
    }

    #[test]
    fn test_fit_too_few_points() {
        assert!(matches!(fit_linear(&[]), Err(ChartError::DegenerateInput { .. })));
        assert!(matches!(fit_linear(&[(1.0, 1.0)]), Err(ChartError::DegenerateInput { .. })));
    }

    #[test]
    fn test_fit_overflow_is_reported() {
        let err = fit_linear(&[(0.0, f64::MAX), (1.0, -f64::MAX)]).unwrap_err();
        assert!(matches!(err, ChartError::DegenerateInput { .. }));
    }
}
