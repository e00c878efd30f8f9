use crate::data::Dataset;
use crate::error::Result;
use crate::graph::LineStyle;
use crate::ir::{ChartGeometry, ChartKind, Mark};
use crate::regression::fit_linear;
use crate::Layout;

use super::scatter::{population_frame, with_points};

/// Scatter of population against forest cover with the least-squares line
/// drawn across the observed population range.
pub fn regression_chart(data: &Dataset, layout: &Layout) -> Result<ChartGeometry> {
    let (geometry, x, y) = population_frame(ChartKind::Regression, data, layout)?;
    let mut geometry = with_points(geometry, data, &x, &y);

    let points: Vec<(f64, f64)> = data.iter().map(|r| (r.population, r.forest_cover)).collect();
    let fit = fit_linear(&points)?;

    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(p, _)| (lo.min(p), hi.max(p)));
    geometry.marks.push(Mark::Path {
        points: vec![(x.map(lo), y.map(fit.predict(lo))), (x.map(hi), y.map(fit.predict(hi)))],
        closed: false,
        fill: None,
        stroke: Some(LineStyle::new("red", 2.0)),
    });
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::test_support::{dataset, sample};
    use crate::error::ChartError;

    #[test]
    fn test_regression_line_spans_population() {
        let data = dataset(&[(2000, 100.0, 10.0, 1), (2001, 200.0, 20.0, 1), (2002, 300.0, 30.0, 2)]);
        let g = regression_chart(&data, &Layout::default()).unwrap();
        assert_eq!(g.circles().count(), 3);

        // Exact fit y = x / 10 on x domain [0, 300] -> [50, 380], y domain [0, 30] -> [260, 20]
        let line = g.paths().next().unwrap();
        assert_eq!(line.len(), 2);
        assert!((line[0].0 - 160.0).abs() < 1e-9);
        assert!((line[0].1 - 180.0).abs() < 1e-9);
        assert!((line[1].0 - 380.0).abs() < 1e-9);
        assert!((line[1].1 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_regression_line_is_last_mark() {
        let g = regression_chart(&sample(), &Layout::default()).unwrap();
        assert!(matches!(g.marks.last(), Some(Mark::Path { closed: false, .. })));
    }

    #[test]
    fn test_regression_constant_population_is_degenerate() {
        let data = dataset(&[(2000, 100.0, 10.0, 1), (2001, 100.0, 20.0, 2)]);
        assert!(matches!(
            regression_chart(&data, &Layout::default()),
            Err(ChartError::DegenerateInput { .. })
        ));
    }
}
