use crate::error::{ChartError, Result};

/// Density estimates in evaluation-point order.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub points: Vec<(f64, f64)>,
}

impl DensityCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest density value, 0.0 for an empty curve.
    pub fn max_density(&self) -> f64 {
        self.points.iter().fold(0.0f64, |a, &(_, d)| a.max(d))
    }
}

/// Epanechnikov kernel, zero outside `[-1, 1]`.
pub fn epanechnikov(u: f64) -> f64 {
    if u.abs() <= 1.0 {
        0.75 * (1.0 - u * u)
    } else {
        0.0
    }
}

/// Kernel density estimate of `sample` at each of `eval_points`.
///
/// `density(t) = (1/n) * sum(k((t - x_i) / bandwidth))` with the Epanechnikov
/// kernel. The bandwidth is fixed by the caller.
pub fn kernel_density(sample: &[f64], eval_points: &[f64], bandwidth: f64) -> Result<DensityCurve> {
    if sample.is_empty() {
        return Err(ChartError::EmptyInput { what: "kernel density estimate" });
    }
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return Err(ChartError::InvalidParameter { name: "bandwidth", value: bandwidth });
    }

    let n = sample.len() as f64;
    let points = eval_points
        .iter()
        .map(|&t| {
            let d = sample
                .iter()
                .map(|&xi| epanechnikov((t - xi) / bandwidth))
                .sum::<f64>();
            (t, d / n)
        })
        .collect();

    Ok(DensityCurve { points })
}
