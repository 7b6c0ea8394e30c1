use serde::Serialize;

use crate::config::{Labels, Margin};
use crate::error::ChartWarning;
use crate::scale::{BandScale, LinearScale, OrdinalScale};

// =============================================================================
// Styles
// =============================================================================

/// Stroke for segments, outlines and curves
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

impl LineStyle {
    pub fn new(color: &str, width: f64) -> Self {
        Self { color: color.to_string(), width }
    }
}

/// Fill and optional outline for rectangles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectStyle {
    pub fill: String,
    pub stroke: Option<LineStyle>,
}

/// Box-plot component styles
#[derive(Debug, Clone, PartialEq)]
pub struct BoxplotStyle {
    pub whisker: LineStyle,
    pub r#box: RectStyle,
    pub median: LineStyle,
}

impl Default for BoxplotStyle {
    fn default() -> Self {
        Self {
            whisker: LineStyle::new("black", 1.0),
            r#box: RectStyle {
                fill: "cadetblue".to_string(),
                stroke: Some(LineStyle::new("black", 1.0)),
            },
            median: LineStyle::new("red", 2.0),
        }
    }
}

// =============================================================================
// Primitives
// =============================================================================

/// One step of a path in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: (f64, f64) },
    LineTo { to: (f64, f64) },
    /// Cubic Bézier from the current point
    CurveTo {
        c1: (f64, f64),
        c2: (f64, f64),
        to: (f64, f64),
    },
}

/// A drawable instruction with resolved pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Segment {
        from: (f64, f64),
        to: (f64, f64),
        style: LineStyle,
    },
    /// Axis-aligned rectangle; `(x, y)` is the top-left corner
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: RectStyle,
    },
    /// Open stroked path, never filled
    Path {
        commands: Vec<PathCommand>,
        style: LineStyle,
    },
}

// =============================================================================
// Scene Graph
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Boxplot,
    GroupedBar,
    Line,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Boxplot => "boxplot",
            ChartKind::GroupedBar => "bar",
            ChartKind::Line => "line",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The scales a chart was built with, kept so a renderer can draw axes
/// and legends in the same coordinate system as the primitives
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartScales {
    Boxplot {
        x: BandScale,
        y: LinearScale,
    },
    GroupedBar {
        x0: BandScale,
        x1: BandScale,
        y: LinearScale,
        color: OrdinalScale,
    },
    Line {
        x: BandScale,
        y: LinearScale,
    },
}

impl ChartScales {
    /// Category axis along the bottom
    pub fn x(&self) -> &BandScale {
        match self {
            ChartScales::Boxplot { x, .. } | ChartScales::Line { x, .. } => x,
            ChartScales::GroupedBar { x0, .. } => x0,
        }
    }

    /// Value axis along the left
    pub fn y(&self) -> &LinearScale {
        match self {
            ChartScales::Boxplot { y, .. }
            | ChartScales::GroupedBar { y, .. }
            | ChartScales::Line { y, .. } => y,
        }
    }

    pub fn color(&self) -> Option<&OrdinalScale> {
        match self {
            ChartScales::GroupedBar { color, .. } => Some(color),
            _ => None,
        }
    }
}

/// Everything one chart hands to a renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneGraph {
    pub kind: ChartKind,
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub background: String,
    pub labels: Labels,
    pub scales: ChartScales,
    pub primitives: Vec<Primitive>,
    pub warnings: Vec<ChartWarning>,
}
