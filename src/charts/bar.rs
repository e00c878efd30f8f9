use crate::aggregate::{aggregate, group_by, AggOp};
use crate::data::Dataset;
use crate::error::Result;
use crate::graph::FillStyle;
use crate::ir::{ChartGeometry, ChartKind, Mark};
use crate::scale::{band_scale, linear_scale};
use crate::Layout;

use super::{band_x_axis, with_y_axis};

const PADDING: f64 = 0.1;

/// Average forest cover by region, one bar per region in first-seen order.
pub fn bar_chart(data: &Dataset, layout: &Layout) -> Result<ChartGeometry> {
    let means = group_by(data, |r| r.region)
        .map_values(|group| aggregate(group, |r| r.forest_cover, AggOp::Mean))?;

    let regions: Vec<i64> = means.iter().map(|&(region, _)| region).collect();
    let (x0, x1) = layout.x_range();
    let x = band_scale(&regions, x0, x1, PADDING)?;

    let max_mean = means.iter().fold(f64::NEG_INFINITY, |m, &(_, v)| m.max(v));
    let (y0, y1) = layout.y_range();
    let y = linear_scale(0.0, max_mean, y0, y1)?;

    let mut geometry = with_y_axis(ChartKind::Bar, layout, &y);
    geometry.x_axis = Some(band_x_axis(layout, &x));

    let base = y.map(0.0);
    for &(region, mean) in &means {
        let Some(left) = x.position(region) else { continue };
        let top = y.map(mean);
        geometry.marks.push(Mark::Rect {
            x: left,
            y: top.min(base),
            width: x.bandwidth(),
            height: (base - top).abs(),
            style: FillStyle::solid("forestgreen"),
        });
    }
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::test_support::{dataset, sample};
    use crate::error::ChartError;

    #[test]
    fn test_bar_heights_follow_means() {
        // Means: region 1 -> 15, region 2 -> 35, region 3 -> 35; y domain [0, 35] -> [260, 20]
        let g = bar_chart(&sample(), &Layout::default()).unwrap();
        let rects: Vec<_> = g.rects().collect();
        assert_eq!(rects.len(), 3);

        let (_, y1, w1, h1) = rects[0];
        assert!((h1 - 15.0 / 35.0 * 240.0).abs() < 1e-9);
        assert!((y1 + h1 - 260.0).abs() < 1e-9);
        assert!(w1 > 0.0);
        assert!((rects[1].3 - 240.0).abs() < 1e-9);
        assert!(rects[0].0 < rects[1].0 && rects[1].0 < rects[2].0);
    }

    #[test]
    fn test_bar_axis_labels_regions() {
        let g = bar_chart(&sample(), &Layout::default()).unwrap();
        let labels: Vec<String> = g.x_axis.unwrap().ticks.into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_bar_all_zero_cover_is_degenerate() {
        let data = dataset(&[(2000, 1.0, 0.0, 1), (2001, 1.0, 0.0, 2)]);
        assert!(matches!(
            bar_chart(&data, &Layout::default()),
            Err(ChartError::DegenerateDomain { .. })
        ));
    }
}
