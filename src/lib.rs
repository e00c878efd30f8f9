// Library exports for forestcharts

pub mod aggregate;
pub mod charts;
pub mod data;
pub mod density;
pub mod error;
pub mod graph;
pub mod ir;
pub mod palette;
pub mod regression;
pub mod runtime;
pub mod scale;

pub use data::{Dataset, RawRow, Record};
pub use error::ChartError;
pub use ir::{ChartGeometry, ChartKind};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    Png,
    #[serde(rename = "svg")]
    #[default]
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Space reserved around the plotting area for axes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Margin {
    #[serde(default = "default_margin_top")]
    pub top: f64,
    #[serde(default = "default_margin_right")]
    pub right: f64,
    #[serde(default = "default_margin_bottom")]
    pub bottom: f64,
    #[serde(default = "default_margin_left")]
    pub left: f64,
}

fn default_margin_top() -> f64 { 20.0 }
fn default_margin_right() -> f64 { 20.0 }
fn default_margin_bottom() -> f64 { 40.0 }
fn default_margin_left() -> f64 { 50.0 }

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: default_margin_top(),
            right: default_margin_right(),
            bottom: default_margin_bottom(),
            left: default_margin_left(),
        }
    }
}

/// Canvas size and margins shared by every chart.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Layout {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
}

fn default_width() -> f64 { 400.0 }
fn default_height() -> f64 { 300.0 }

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
        }
    }
}

impl Layout {
    /// Horizontal pixel range of the plotting area, left to right.
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin.left, self.width - self.margin.right)
    }

    /// Vertical pixel range of the plotting area, bottom to top.
    pub fn y_range(&self) -> (f64, f64) {
        (self.height - self.margin.bottom, self.margin.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViolinOptions {
    /// Kernel half-width in forest-cover units.
    #[serde(default = "default_violin_bandwidth")]
    pub bandwidth: f64,
    /// Approximate number of y ticks used as density evaluation points.
    #[serde(default = "default_violin_resolution")]
    pub resolution: usize,
}

fn default_violin_bandwidth() -> f64 { 7.0 }
fn default_violin_resolution() -> usize { 40 }

impl Default for ViolinOptions {
    fn default() -> Self {
        Self {
            bandwidth: default_violin_bandwidth(),
            resolution: default_violin_resolution(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct JitterOptions {
    /// Fraction of the band width that jittered points may spread over.
    #[serde(default = "default_jitter_spread")]
    pub spread: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_jitter_spread() -> f64 { 0.8 }

impl Default for JitterOptions {
    fn default() -> Self {
        Self {
            spread: default_jitter_spread(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    #[serde(default)]
    pub violin: ViolinOptions,
    #[serde(default)]
    pub jitter: JitterOptions,
}

impl ChartConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid chart configuration")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = Layout::default();
        assert_eq!(layout.x_range(), (50.0, 380.0));
        assert_eq!(layout.y_range(), (260.0, 20.0));
    }

    #[test]
    fn test_config_partial_json() {
        let config = ChartConfig::from_json_str(
            r#"{"layout": {"width": 800, "margin": {"left": 60}}, "type": "png", "jitter": {"seed": 7}}"#,
        )
        .unwrap();
        assert_eq!(config.layout.width, 800.0);
        assert_eq!(config.layout.height, 300.0);
        assert_eq!(config.layout.margin.left, 60.0);
        assert_eq!(config.layout.margin.top, 20.0);
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.jitter.seed, Some(7));
        assert_eq!(config.jitter.spread, 0.8);
        assert_eq!(config.violin, ViolinOptions::default());
    }

    #[test]
    fn test_config_empty_json_is_default() {
        assert_eq!(ChartConfig::from_json_str("{}").unwrap(), ChartConfig::default());
        assert!(ChartConfig::from_json_str(r#"{"type": "gif"}"#).is_err());
    }
}
