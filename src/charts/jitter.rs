use rand::Rng;

use crate::data::Dataset;
use crate::error::{ChartError, Result};
use crate::graph::FillStyle;
use crate::ir::{ChartGeometry, ChartKind, Mark};
use crate::scale::band_scale;
use crate::{JitterOptions, Layout};

use super::{band_x_axis, forest_cover_y, with_y_axis};

const PADDING: f64 = 0.5;
const POINT_RADIUS: f64 = 4.0;

/// Forest cover by year with points scattered horizontally inside each band.
/// Points are centred on the middle of their year's band, not its start.
///
/// Offsets are `(u - 0.5) * bandwidth * spread` around the band centre with
/// `u` drawn from `rng`, so a seeded generator gives repeatable output.
pub fn jitter_chart<R: Rng + ?Sized>(
    data: &Dataset,
    layout: &Layout,
    opts: &JitterOptions,
    rng: &mut R,
) -> Result<ChartGeometry> {
    if !(opts.spread.is_finite() && opts.spread >= 0.0) {
        return Err(ChartError::InvalidParameter { name: "jitter spread", value: opts.spread });
    }

    let years: Vec<i32> = data.iter().map(|r| r.year).collect();
    let (x0, x1) = layout.x_range();
    let x = band_scale(&years, x0, x1, PADDING)?;
    let y = forest_cover_y(data, layout)?;

    let mut geometry = with_y_axis(ChartKind::Jitter, layout, &y);
    geometry.x_axis = Some(band_x_axis(layout, &x));

    let spread = x.bandwidth() * opts.spread;
    for record in data {
        let Some(center) = x.center(record.year) else { continue };
        let u: f64 = rng.random();
        geometry.marks.push(Mark::Circle {
            cx: center + (u - 0.5) * spread,
            cy: y.map(record.forest_cover),
            r: POINT_RADIUS,
            style: FillStyle::with_alpha("purple", 0.7),
        });
    }
    Ok(geometry)
}
