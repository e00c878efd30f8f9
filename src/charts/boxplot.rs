use crate::aggregate::{group_by, summarize};
use crate::data::Dataset;
use crate::error::{ChartError, Result};
use crate::graph::{FillStyle, LineStyle};
use crate::ir::{ChartGeometry, ChartKind, Mark};
use crate::scale::band_scale;
use crate::Layout;

use super::{band_x_axis, forest_cover_y, with_y_axis};

const PADDING: f64 = 0.2;

/// Five-number summary of forest cover for each region.
///
/// Per region: a box from q1 to q3, a median line, a vertical whisker from
/// min to max and horizontal caps at both whisker ends spanning the middle
/// half of the band.
pub fn box_chart(data: &Dataset, layout: &Layout) -> Result<ChartGeometry> {
    let grouped = group_by(data, |r| r.region);
    let (x0, x1) = layout.x_range();
    let x = band_scale(&grouped.keys(), x0, x1, PADDING)?;
    let y = forest_cover_y(data, layout)?;

    let mut geometry = with_y_axis(ChartKind::Box, layout, &y);
    geometry.x_axis = Some(band_x_axis(layout, &x));

    let bw = x.bandwidth();
    let stroke = LineStyle::new("black", 1.0);

    for (region, group) in grouped.iter() {
        let Some(left) = x.position(region) else { continue };
        let values: Vec<f64> = group.iter().map(|r| r.forest_cover).collect();
        let stats = summarize(&values)?;
        let (Some(min), Some(q1), Some(median), Some(q3), Some(max)) =
            (stats.min, stats.q1, stats.median, stats.q3, stats.max)
        else {
            return Err(ChartError::EmptyGroup { op: "box summary" });
        };

        let center = left + bw / 2.0;
        let (cap_lo, cap_hi) = (left + bw / 4.0, left + bw * 3.0 / 4.0);

        geometry.marks.push(Mark::Rect {
            x: left,
            y: y.map(q3),
            width: bw,
            height: y.map(q1) - y.map(q3),
            style: FillStyle::solid("lightblue"),
        });
        geometry.marks.push(Mark::Line {
            from: (left, y.map(median)),
            to: (left + bw, y.map(median)),
            style: stroke.clone(),
        });
        geometry.marks.push(Mark::Line {
            from: (center, y.map(min)),
            to: (center, y.map(max)),
            style: stroke.clone(),
        });
        geometry.marks.push(Mark::Line {
            from: (cap_lo, y.map(min)),
            to: (cap_hi, y.map(min)),
            style: stroke.clone(),
        });
        geometry.marks.push(Mark::Line {
            from: (cap_lo, y.map(max)),
            to: (cap_hi, y.map(max)),
            style: stroke.clone(),
        });
    }
    Ok(geometry)
}
