use crate::data::Dataset;
use crate::error::Result;
use crate::graph::FillStyle;
use crate::ir::{ChartGeometry, ChartKind, Mark};
use crate::scale::LinearScale;
use crate::Layout;

use super::{forest_cover_y, linear_x_axis, with_y_axis, zero_based_x};

const POINT_RADIUS: f64 = 5.0;

/// Population against forest cover, one point per record.
pub fn scatter_chart(data: &Dataset, layout: &Layout) -> Result<ChartGeometry> {
    let (geometry, x, y) = population_frame(ChartKind::Scatter, data, layout)?;
    Ok(with_points(geometry, data, &x, &y))
}

/// Axes shared by the population/forest-cover charts.
pub(super) fn population_frame(
    kind: ChartKind,
    data: &Dataset,
    layout: &Layout,
) -> Result<(ChartGeometry, LinearScale, LinearScale)> {
    let x = zero_based_x(data, layout, "population scale", |r| r.population)?;
    let y = forest_cover_y(data, layout)?;

    let mut geometry = with_y_axis(kind, layout, &y);
    geometry.x_axis = Some(linear_x_axis(layout, &x));
    Ok((geometry, x, y))
}

pub(super) fn with_points(mut geometry: ChartGeometry, data: &Dataset, x: &LinearScale, y: &LinearScale) -> ChartGeometry {
    geometry.marks.extend(data.iter().map(|r| Mark::Circle {
        cx: x.map(r.population),
        cy: y.map(r.forest_cover),
        r: POINT_RADIUS,
        style: FillStyle::solid("blue"),
    }));
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::test_support::{dataset, sample};
    use crate::error::ChartError;

    #[test]
    fn test_scatter_one_point_per_record() {
        // x domain [0, 300] -> [50, 380]; y domain [0, 40] -> [260, 20]
        let g = scatter_chart(&sample(), &Layout::default()).unwrap();
        let circles: Vec<_> = g.circles().collect();
        assert_eq!(circles.len(), 5);

        let (cx, cy, r) = circles[0];
        assert!((cx - 160.0).abs() < 1e-9);
        assert!((cy - 200.0).abs() < 1e-9);
        assert_eq!(r, 5.0);
        assert!(g.x_axis.is_some() && g.y_axis.is_some());
    }

    #[test]
    fn test_scatter_zero_population_is_degenerate() {
        let data = dataset(&[(2000, 0.0, 10.0, 1)]);
        assert!(matches!(
            scatter_chart(&data, &Layout::default()),
            Err(ChartError::DegenerateDomain { .. })
        ));
    }
}
