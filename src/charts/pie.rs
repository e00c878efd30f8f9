use std::f64::consts::TAU;

use crate::aggregate::{aggregate, group_by, AggOp};
use crate::data::Dataset;
use crate::error::{ChartError, Result};
use crate::graph::FillStyle;
use crate::ir::{ArcSector, ChartGeometry, ChartKind, Mark};
use crate::palette::ColorPalette;
use crate::Layout;

/// Total forest cover by region as pie slices.
///
/// Slices are laid out largest first, clockwise from 12 o'clock, but are
/// emitted in region order so colours stay attached to regions. Non-positive
/// totals get zero-width slices.
pub fn pie_chart(data: &Dataset, layout: &Layout) -> Result<ChartGeometry> {
    let sums = group_by(data, |r| r.region)
        .map_values(|group| aggregate(group, |r| r.forest_cover, AggOp::Sum))?;
    if sums.is_empty() {
        return Err(ChartError::EmptyInput { what: "pie chart" });
    }

    let total: f64 = sums.iter().map(|&(_, v)| v).filter(|&v| v > 0.0).sum();
    let k = if total > 0.0 { TAU / total } else { 0.0 };

    let mut order: Vec<usize> = (0..sums.len()).collect();
    order.sort_by(|&a, &b| sums[b].1.total_cmp(&sums[a].1));

    let mut angles = vec![(0.0, 0.0); sums.len()];
    let mut a0 = 0.0;
    for &i in &order {
        let v = sums[i].1;
        let a1 = a0 + if v > 0.0 { v * k } else { 0.0 };
        angles[i] = (a0, a1);
        a0 = a1;
    }

    let radius = layout.width.min(layout.height) / 2.0;
    let center = (layout.width / 2.0, layout.height / 2.0);
    let palette = ColorPalette::category10();

    let mut geometry = ChartGeometry::new(ChartKind::Pie, layout.width, layout.height);
    for (i, (&(region, value), &(start, end))) in sums.iter().zip(&angles).enumerate() {
        geometry.marks.push(Mark::Arc(ArcSector {
            label: region.to_string(),
            value,
            center,
            inner_radius: 0.0,
            outer_radius: radius,
            start_angle: start,
            end_angle: end,
            style: FillStyle::solid(palette.color(i)),
        }));
    }
    Ok(geometry)
}
