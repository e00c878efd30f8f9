use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::ir::{ArcSector, Axis, AxisOrient, ChartGeometry, Mark};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const ARC_SEGMENT: f64 = std::f64::consts::PI / 90.0;
const MAX_PNG_PIXELS: usize = 64_000_000;

/// Stroke configuration for lines and outlines
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub alpha: f64,
}

impl LineStyle {
    pub fn new(color: &str, width: f64) -> Self {
        Self { color: color.to_string(), width, alpha: 1.0 }
    }
}

/// Fill configuration for rectangles, circles, sectors and areas
#[derive(Debug, Clone, PartialEq)]
pub struct FillStyle {
    pub color: String,
    pub alpha: f64,
}

impl FillStyle {
    pub fn solid(color: &str) -> Self {
        Self { color: color.to_string(), alpha: 1.0 }
    }

    pub fn with_alpha(color: &str, alpha: f64) -> Self {
        Self { color: color.to_string(), alpha }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopCenter,
    MiddleRight,
}

/// A target that can draw each kind of mark a chart produces.
pub trait DrawingSurface {
    fn rect(&mut self, tl: (f64, f64), br: (f64, f64), style: &FillStyle) -> Result<()>;
    fn circle(&mut self, center: (f64, f64), radius: f64, style: &FillStyle) -> Result<()>;
    fn line(&mut self, from: (f64, f64), to: (f64, f64), style: &LineStyle) -> Result<()>;
    fn arc(&mut self, sector: &ArcSector) -> Result<()>;
    fn path(
        &mut self,
        points: &[(f64, f64)],
        closed: bool,
        fill: Option<&FillStyle>,
        stroke: Option<&LineStyle>,
    ) -> Result<()>;
    fn text(&mut self, text: &str, pos: (f64, f64), anchor: TextAnchor) -> Result<()>;
}

/// Draw a chart's marks, then its axes, onto `surface`.
pub fn paint<S: DrawingSurface + ?Sized>(geometry: &ChartGeometry, surface: &mut S) -> Result<()> {
    for mark in &geometry.marks {
        match mark {
            Mark::Rect { x, y, width, height, style } => {
                surface.rect((*x, *y), (x + width, y + height), style)?
            }
            Mark::Circle { cx, cy, r, style } => surface.circle((*cx, *cy), *r, style)?,
            Mark::Line { from, to, style } => surface.line(*from, *to, style)?,
            Mark::Arc(sector) => surface.arc(sector)?,
            Mark::Path { points, closed, fill, stroke } => {
                surface.path(points, *closed, fill.as_ref(), stroke.as_ref())?
            }
        }
    }

    for axis in geometry.x_axis.iter().chain(geometry.y_axis.iter()) {
        paint_axis(axis, surface)?;
    }
    Ok(())
}

fn paint_axis<S: DrawingSurface + ?Sized>(axis: &Axis, surface: &mut S) -> Result<()> {
    let domain = LineStyle::new("black", 1.0);
    let (r0, r1) = axis.range;
    let off = axis.offset;

    match axis.orient {
        AxisOrient::Bottom => {
            surface.line((r0, off), (r1, off), &domain)?;
            for tick in &axis.ticks {
                surface.line((tick.position, off), (tick.position, off + TICK_SIZE), &domain)?;
                surface.text(
                    &tick.label,
                    (tick.position, off + TICK_SIZE + TICK_PADDING),
                    TextAnchor::TopCenter,
                )?;
            }
        }
        AxisOrient::Left => {
            surface.line((off, r0), (off, r1), &domain)?;
            for tick in &axis.ticks {
                surface.line((off - TICK_SIZE, tick.position), (off, tick.position), &domain)?;
                surface.text(
                    &tick.label,
                    (off - TICK_SIZE - TICK_PADDING, tick.position),
                    TextAnchor::MiddleRight,
                )?;
            }
        }
    }
    Ok(())
}

// =============================================================================
// Plotters Surface
// =============================================================================

/// [`DrawingSurface`] over a plotters drawing area in pixel coordinates.
pub struct PlottersSurface<'a, DB: DrawingBackend> {
    area: &'a DrawingArea<DB, Shift>,
}

impl<'a, DB: DrawingBackend> PlottersSurface<'a, DB> {
    pub fn new(area: &'a DrawingArea<DB, Shift>) -> Self {
        Self { area }
    }
}

fn px(p: (f64, f64)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn fill_style(style: &FillStyle) -> ShapeStyle {
    ShapeStyle {
        color: parse_color(&style.color).mix(style.alpha),
        filled: true,
        stroke_width: 0,
    }
}

fn stroke_style(style: &LineStyle) -> ShapeStyle {
    ShapeStyle {
        color: parse_color(&style.color).mix(style.alpha),
        filled: false,
        stroke_width: style.width.round().max(1.0) as u32,
    }
}

impl<DB: DrawingBackend> DrawingSurface for PlottersSurface<'_, DB> {
    fn rect(&mut self, tl: (f64, f64), br: (f64, f64), style: &FillStyle) -> Result<()> {
        self.area
            .draw(&Rectangle::new([px(tl), px(br)], fill_style(style)))
            .map_err(|e| anyhow!("Failed to draw rectangle: {}", e))
    }

    fn circle(&mut self, center: (f64, f64), radius: f64, style: &FillStyle) -> Result<()> {
        let r = radius.round() as i32;
        self.area
            .draw(&Circle::new(px(center), r, fill_style(style)))
            .map_err(|e| anyhow!("Failed to draw circle: {}", e))
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), style: &LineStyle) -> Result<()> {
        self.area
            .draw(&PathElement::new(vec![px(from), px(to)], stroke_style(style)))
            .map_err(|e| anyhow!("Failed to draw line: {}", e))
    }

    fn arc(&mut self, sector: &ArcSector) -> Result<()> {
        let outline: Vec<(i32, i32)> = sector.outline(ARC_SEGMENT).into_iter().map(px).collect();
        self.area
            .draw(&Polygon::new(outline, fill_style(&sector.style)))
            .map_err(|e| anyhow!("Failed to draw arc '{}': {}", sector.label, e))
    }

    fn path(
        &mut self,
        points: &[(f64, f64)],
        closed: bool,
        fill: Option<&FillStyle>,
        stroke: Option<&LineStyle>,
    ) -> Result<()> {
        let mut pixels: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
        if let Some(fill) = fill {
            self.area
                .draw(&Polygon::new(pixels.clone(), fill_style(fill)))
                .map_err(|e| anyhow!("Failed to fill path: {}", e))?;
        }
        if let Some(stroke) = stroke {
            if closed {
                if let Some(&first) = pixels.first() {
                    pixels.push(first);
                }
            }
            self.area
                .draw(&PathElement::new(pixels, stroke_style(stroke)))
                .map_err(|e| anyhow!("Failed to stroke path: {}", e))?;
        }
        Ok(())
    }

    fn text(&mut self, text: &str, pos: (f64, f64), anchor: TextAnchor) -> Result<()> {
        let pos_anchor = match anchor {
            TextAnchor::TopCenter => Pos::new(HPos::Center, VPos::Top),
            TextAnchor::MiddleRight => Pos::new(HPos::Right, VPos::Center),
        };
        let style = TextStyle::from(("sans-serif", 10).into_font())
            .color(&BLACK)
            .pos(pos_anchor);
        self.area
            .draw(&Text::new(text.to_string(), px(pos), style))
            .map_err(|e| anyhow!("Failed to draw label '{}': {}", text, e))
    }
}

// =============================================================================
// Canvas
// =============================================================================

fn canvas_size(geometry: &ChartGeometry) -> Result<(u32, u32)> {
    let (w, h) = (geometry.width.round(), geometry.height.round());
    if !(w >= 1.0 && h >= 1.0 && w <= u32::MAX as f64 && h <= u32::MAX as f64) {
        anyhow::bail!("Invalid canvas size {}x{}", geometry.width, geometry.height);
    }
    Ok((w as u32, h as u32))
}

/// Render a chart to an SVG document.
pub fn render_svg(geometry: &ChartGeometry) -> Result<String> {
    let size = canvas_size(geometry)?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;
        paint(geometry, &mut PlottersSurface::new(&root))
            .with_context(|| format!("Failed to paint {} chart", geometry.kind))?;
        root.present().context("Failed to present drawing")?;
    }
    debug!("rendered {} chart to {} bytes of SVG", geometry.kind, svg.len());
    Ok(svg)
}

/// Render a chart and encode it as PNG.
pub fn render_png(geometry: &ChartGeometry) -> Result<Vec<u8>> {
    let (width, height) = canvas_size(geometry)?;
    let len = (width as usize)
        .checked_mul(height as usize)
        .filter(|&pixels| pixels <= MAX_PNG_PIXELS)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| anyhow!("Canvas {}x{} is too large for PNG output", width, height))?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;
        paint(geometry, &mut PlottersSurface::new(&root))
            .with_context(|| format!("Failed to paint {} chart", geometry.kind))?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Parse a colour name or `#rrggbb` string to RGBColor
pub fn parse_color(color: &str) -> RGBColor {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
                return RGBColor(r, g, b);
            }
        }
    }
    match color {
        "red" => RED,
        "green" => RGBColor(0, 128, 0),
        "blue" => BLUE,
        "black" => BLACK,
        "white" => WHITE,
        "purple" => RGBColor(128, 0, 128),
        "forestgreen" => RGBColor(34, 139, 34),
        "lightblue" => RGBColor(173, 216, 230),
        "lightgreen" => RGBColor(144, 238, 144),
        _ => BLUE, // default
    }
}
