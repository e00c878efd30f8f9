// Chart drivers: dataset + shared statistics -> ChartGeometry

pub mod bar;
pub mod boxplot;
pub mod jitter;
pub mod pie;
pub mod regression;
pub mod scatter;
pub mod violin;

pub use bar::bar_chart;
pub use boxplot::box_chart;
pub use jitter::jitter_chart;
pub use pie::pie_chart;
pub use regression::regression_chart;
pub use scatter::scatter_chart;
pub use violin::violin_chart;

use rand::Rng;

use crate::data::{Dataset, Record};
use crate::error::{ChartError, Result};
use crate::ir::{Axis, AxisOrient, ChartGeometry, ChartKind};
use crate::scale::{linear_scale, BandScale, LinearScale};
use crate::{ChartConfig, Layout};

const AXIS_TICKS: usize = 10;

/// Build the geometry for one chart kind.
pub fn build_chart<R: Rng + ?Sized>(
    kind: ChartKind,
    data: &Dataset,
    config: &ChartConfig,
    rng: &mut R,
) -> Result<ChartGeometry> {
    let layout = &config.layout;
    match kind {
        ChartKind::Bar => bar_chart(data, layout),
        ChartKind::Pie => pie_chart(data, layout),
        ChartKind::Scatter => scatter_chart(data, layout),
        ChartKind::Box => box_chart(data, layout),
        ChartKind::Violin => violin_chart(data, layout, &config.violin),
        ChartKind::Regression => regression_chart(data, layout),
        ChartKind::Jitter => jitter_chart(data, layout, &config.jitter, rng),
    }
}

/// Vertical scale from zero to the largest value of `value_fn`.
fn zero_based_y<F>(data: &Dataset, layout: &Layout, what: &'static str, value_fn: F) -> Result<LinearScale>
where
    F: Fn(&Record) -> f64,
{
    let max = data.max_of(value_fn).ok_or(ChartError::EmptyInput { what })?;
    let (lo, hi) = layout.y_range();
    linear_scale(0.0, max, lo, hi)
}

/// Horizontal scale from zero to the largest value of `value_fn`.
fn zero_based_x<F>(data: &Dataset, layout: &Layout, what: &'static str, value_fn: F) -> Result<LinearScale>
where
    F: Fn(&Record) -> f64,
{
    let max = data.max_of(value_fn).ok_or(ChartError::EmptyInput { what })?;
    let (lo, hi) = layout.x_range();
    linear_scale(0.0, max, lo, hi)
}

fn forest_cover_y(data: &Dataset, layout: &Layout) -> Result<LinearScale> {
    zero_based_y(data, layout, "forest cover scale", |r| r.forest_cover)
}

/// Empty chart with a left axis for `y`.
fn with_y_axis(kind: ChartKind, layout: &Layout, y: &LinearScale) -> ChartGeometry {
    let mut geometry = ChartGeometry::new(kind, layout.width, layout.height);
    geometry.y_axis = Some(Axis::linear(AxisOrient::Left, layout.margin.left, y, AXIS_TICKS));
    geometry
}

fn linear_x_axis(layout: &Layout, x: &LinearScale) -> Axis {
    Axis::linear(AxisOrient::Bottom, layout.height - layout.margin.bottom, x, AXIS_TICKS)
}

fn band_x_axis<K>(layout: &Layout, x: &BandScale<K>) -> Axis
where
    K: Copy + PartialEq + std::fmt::Display,
{
    Axis::band(AxisOrient::Bottom, layout.height - layout.margin.bottom, x, layout.x_range())
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_build_every_kind() {
        let data = test_support::sample();
        let config = ChartConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        for kind in ChartKind::ALL {
            let g = build_chart(kind, &data, &config, &mut rng).unwrap();
            assert_eq!(g.kind, kind);
            assert!(!g.marks.is_empty(), "{} chart has no marks", kind);
        }
    }

    #[test]
    fn test_every_kind_rejects_empty_dataset() {
        let config = ChartConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        for kind in ChartKind::ALL {
            assert!(build_chart(kind, &Dataset::default(), &config, &mut rng).is_err());
        }
    }
}
