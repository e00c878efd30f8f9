use crate::aggregate::group_by;
use crate::data::Dataset;
use crate::density::{kernel_density, DensityCurve};
use crate::error::{ChartError, Result};
use crate::graph::{FillStyle, LineStyle};
use crate::ir::{ChartGeometry, ChartKind, Mark};
use crate::scale::band_scale;
use crate::{Layout, ViolinOptions};

use super::{band_x_axis, forest_cover_y, with_y_axis};

const PADDING: f64 = 0.2;

/// Forest cover density for each year, mirrored around the band centre.
///
/// Densities are evaluated at the y axis ticks and scaled so the widest point
/// across all years fills the band.
pub fn violin_chart(data: &Dataset, layout: &Layout, opts: &ViolinOptions) -> Result<ChartGeometry> {
    let grouped = group_by(data, |r| r.year);
    let (x0, x1) = layout.x_range();
    let x = band_scale(&grouped.keys(), x0, x1, PADDING)?;
    let y = forest_cover_y(data, layout)?;
    if opts.resolution == 0 {
        return Err(ChartError::InvalidParameter { name: "violin resolution", value: 0.0 });
    }
    let eval_points = y.ticks(opts.resolution);

    let mut curves: Vec<(i32, DensityCurve)> = Vec::with_capacity(grouped.len());
    for (year, group) in grouped.iter() {
        let sample: Vec<f64> = group.iter().map(|r| r.forest_cover).collect();
        curves.push((year, kernel_density(&sample, &eval_points, opts.bandwidth)?));
    }

    let max_density = curves.iter().fold(0.0f64, |m, (_, c)| m.max(c.max_density()));
    let half = x.bandwidth() / 2.0;
    let width_of = |d: f64| if max_density > 0.0 { d / max_density * half } else { 0.0 };

    let mut geometry = with_y_axis(ChartKind::Violin, layout, &y);
    geometry.x_axis = Some(band_x_axis(layout, &x));

    for (year, curve) in &curves {
        let Some(center) = x.center(*year) else { continue };
        let right = curve.points.iter().map(|&(v, d)| (center + width_of(d), y.map(v)));
        let left = curve.points.iter().rev().map(|&(v, d)| (center - width_of(d), y.map(v)));
        geometry.marks.push(Mark::Path {
            points: right.chain(left).collect(),
            closed: true,
            fill: Some(FillStyle::solid("lightgreen")),
            stroke: Some(LineStyle::new("green", 1.0)),
        });
    }
    Ok(geometry)
}
