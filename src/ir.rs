use std::f64::consts::TAU;
use std::fmt;

use serde::Deserialize;

use crate::graph::{FillStyle, LineStyle};
use crate::scale::{BandScale, LinearScale};

// =============================================================================
// Chart Kinds
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Scatter,
    Box,
    Violin,
    Regression,
    Jitter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Box,
        ChartKind::Violin,
        ChartKind::Regression,
        ChartKind::Jitter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Box => "box",
            ChartKind::Violin => "violin",
            ChartKind::Regression => "regression",
            ChartKind::Jitter => "jitter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Everything a drawing surface needs to draw one chart, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub kind: ChartKind,
    pub width: f64,
    pub height: f64,
    pub x_axis: Option<Axis>,
    pub y_axis: Option<Axis>,
    pub marks: Vec<Mark>,
}

impl ChartGeometry {
    pub fn new(kind: ChartKind, width: f64, height: f64) -> Self {
        Self {
            kind,
            width,
            height,
            x_axis: None,
            y_axis: None,
            marks: Vec::new(),
        }
    }

    pub fn rects(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.marks.iter().filter_map(|m| match m {
            Mark::Rect { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.marks.iter().filter_map(|m| match m {
            Mark::Circle { cx, cy, r, .. } => Some((*cx, *cy, *r)),
            _ => None,
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = &ArcSector> + '_ {
        self.marks.iter().filter_map(|m| match m {
            Mark::Arc(sector) => Some(sector),
            _ => None,
        })
    }

    pub fn paths(&self) -> impl Iterator<Item = &[(f64, f64)]> + '_ {
        self.marks.iter().filter_map(|m| match m {
            Mark::Path { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }
}

/// A primitive shape. Rectangles are given by their top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: FillStyle,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        style: FillStyle,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        style: LineStyle,
    },
    Arc(ArcSector),
    Path {
        points: Vec<(f64, f64)>,
        closed: bool,
        fill: Option<FillStyle>,
        stroke: Option<LineStyle>,
    },
}

/// A pie slice. Angles are radians clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSector {
    pub label: String,
    pub value: f64,
    pub center: (f64, f64),
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub style: FillStyle,
}

impl ArcSector {
    pub fn point_at(&self, angle: f64, radius: f64) -> (f64, f64) {
        (
            self.center.0 + radius * angle.sin(),
            self.center.1 - radius * angle.cos(),
        )
    }

    /// Closed outline approximating the sector with straight segments.
    pub fn outline(&self, max_segment_angle: f64) -> Vec<(f64, f64)> {
        let sweep = self.end_angle - self.start_angle;
        let segments = ((sweep.abs() / max_segment_angle).ceil() as usize).max(1);
        let step = sweep / segments as f64;

        let mut points = Vec::with_capacity(2 * segments + 2);
        for i in 0..=segments {
            points.push(self.point_at(self.start_angle + step * i as f64, self.outer_radius));
        }
        if self.inner_radius > 0.0 {
            for i in (0..=segments).rev() {
                points.push(self.point_at(self.start_angle + step * i as f64, self.inner_radius));
            }
        } else {
            points.push(self.center);
        }
        points
    }

    pub fn is_full_circle(&self) -> bool {
        (self.end_angle - self.start_angle).abs() >= TAU
    }
}

// =============================================================================
// Axes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// An axis line at `offset` (y for bottom axes, x for left axes) spanning `range`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orient: AxisOrient,
    pub offset: f64,
    pub range: (f64, f64),
    pub ticks: Vec<Tick>,
}

impl Axis {
    pub fn linear(orient: AxisOrient, offset: f64, scale: &LinearScale, count: usize) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|v| Tick { position: scale.map(v), label: format_tick(v) })
            .collect();
        Self { orient, offset, range: scale.range(), ticks }
    }

    pub fn band<K>(orient: AxisOrient, offset: f64, scale: &BandScale<K>, range: (f64, f64)) -> Self
    where
        K: Copy + PartialEq + fmt::Display,
    {
        let ticks = scale
            .keys()
            .iter()
            .filter_map(|&k| scale.center(k).map(|position| Tick { position, label: k.to_string() }))
            .collect();
        Self { orient, offset, range, ticks }
    }
}

fn format_tick(v: f64) -> String {
    // Avoid printing "-0"
    if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}
