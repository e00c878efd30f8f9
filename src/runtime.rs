// Runtime executor: build each requested chart and encode it

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::charts::build_chart;
use crate::data::Dataset;
use crate::error::ChartError;
use crate::graph;
use crate::ir::{ChartGeometry, ChartKind};
use crate::{ChartConfig, OutputFormat};

/// Result of building one chart. Failures are kept per chart.
#[derive(Debug)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub result: std::result::Result<ChartGeometry, ChartError>,
}

impl ChartOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Seeded generator when a seed is given, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Build every chart in `kinds`. A failing chart is logged and does not stop the rest.
pub fn build_charts<R: Rng + ?Sized>(
    data: &Dataset,
    config: &ChartConfig,
    kinds: &[ChartKind],
    rng: &mut R,
) -> Vec<ChartOutcome> {
    kinds
        .iter()
        .map(|&kind| {
            let result = build_chart(kind, data, config, rng);
            if let Err(e) = &result {
                error!("{} chart failed: {}", kind, e);
            }
            ChartOutcome { kind, result }
        })
        .collect()
}

/// Encode one chart in the requested format.
pub fn render_chart(geometry: &ChartGeometry, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Svg => graph::render_svg(geometry).map(String::into_bytes),
        OutputFormat::Png => graph::render_png(geometry),
    }
}

/// Render `geometry` into `<out_dir>/<kind>.<ext>` and return the written path.
pub fn write_chart(out_dir: &Path, geometry: &ChartGeometry, format: OutputFormat) -> Result<PathBuf> {
    let bytes = render_chart(geometry, format)?;
    let path = out_dir.join(format!("{}.{}", geometry.kind, format.extension()));
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{normalize, RawRow};

    fn make_data() -> Dataset {
        normalize(&[
            RawRow::new("2000", "100", "10", "1"),
            RawRow::new("2001", "200", "20", "2"),
        ])
    }

    #[test]
    fn test_build_charts_keeps_order() {
        let kinds = [ChartKind::Pie, ChartKind::Bar];
        let outcomes = build_charts(&make_data(), &ChartConfig::default(), &kinds, &mut make_rng(Some(3)));
        let built: Vec<ChartKind> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(built, kinds);
        assert!(outcomes.iter().all(ChartOutcome::is_ok));
    }

    #[test]
    fn test_failing_chart_does_not_block_others() {
        // One distinct population: regression has nothing to fit
        let data = normalize(&[
            RawRow::new("2000", "100", "10", "1"),
            RawRow::new("2001", "100", "20", "2"),
        ]);
        let outcomes = build_charts(&data, &ChartConfig::default(), &ChartKind::ALL, &mut make_rng(Some(1)));
        assert_eq!(outcomes.len(), ChartKind::ALL.len());
        for outcome in &outcomes {
            match outcome.kind {
                ChartKind::Regression => {
                    assert!(matches!(outcome.result, Err(ChartError::DegenerateInput { .. })))
                }
                _ => assert!(outcome.is_ok(), "{} failed", outcome.kind),
            }
        }
    }

    #[test]
    fn test_render_chart_formats() {
        let outcomes = build_charts(&make_data(), &ChartConfig::default(), &[ChartKind::Bar], &mut make_rng(None));
        let geometry = outcomes[0].result.as_ref().unwrap();

        let svg = render_chart(geometry, OutputFormat::Svg).unwrap();
        assert!(String::from_utf8(svg).unwrap().contains("<svg"));

        let png = render_chart(geometry, OutputFormat::Png).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_write_chart_names_file_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let outcomes = build_charts(&make_data(), &ChartConfig::default(), &[ChartKind::Scatter], &mut make_rng(Some(9)));
        let geometry = outcomes[0].result.as_ref().unwrap();
        let path = write_chart(dir.path(), geometry, OutputFormat::Svg).unwrap();
        assert_eq!(path, dir.path().join("scatter.svg"));
        assert!(path.exists());
    }
}
