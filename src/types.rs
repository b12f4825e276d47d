//! Shared boundary types for the step player.
//!
//! This module defines the two key data contracts:
//! - Catalog → Surface: `Shape`s drawn with a `Seed`
//! - Surface → Player: a grid of `Cell`s, repainted in full or as `CellChange`s

use serde::{Deserialize, Serialize};

/// Parameter of the stochastic stroke style. Step `i` always draws with
/// `base_seed + i` (wrapping).
pub type Seed = u64;

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dim: bool,
}

impl Style {
    pub fn is_default(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold && !self.dim
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in surface units. On the cell canvas one unit is one terminal cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned region, used to bound a clear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the unit cell at `(col, row)` overlaps this region.
    pub fn touches_cell(&self, col: usize, row: usize) -> bool {
        let (cx, cy) = (col as f64, row as f64);
        cx + 1.0 > self.x
            && cx < self.x + self.width
            && cy + 1.0 > self.y
            && cy < self.y + self.height
    }
}

// ---------------------------------------------------------------------------
// Catalog → Surface boundary
// ---------------------------------------------------------------------------

/// Options for the hand-drawn stroke style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoughOptions {
    /// Endpoint and radius jitter. `0` draws exact geometry.
    pub roughness: f64,
    /// How far a line bows away from the straight path.
    pub bowing: f64,
    /// Stroke glyph; `None` picks one from the segment direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<char>,
    /// Hachure glyph for closed shapes; `None` leaves them unfilled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<char>,
    /// Spacing of the diagonal hachure lines, in cells.
    pub hachure_gap: u16,
    #[serde(skip_serializing_if = "Style::is_default")]
    pub style: Style,
}

impl Default for RoughOptions {
    fn default() -> Self {
        RoughOptions {
            roughness: 1.0,
            bowing: 1.0,
            stroke: None,
            fill: None,
            hachure_gap: 3,
            style: Style::default(),
        }
    }
}

impl RoughOptions {
    pub fn with_roughness(roughness: f64) -> Self {
        RoughOptions {
            roughness,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// One primitive drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Line {
        from: Point,
        to: Point,
        #[serde(default)]
        options: RoughOptions,
    },
    Rectangle {
        origin: Point,
        width: f64,
        height: f64,
        #[serde(default)]
        options: RoughOptions,
    },
    Ellipse {
        center: Point,
        width: f64,
        height: f64,
        #[serde(default)]
        options: RoughOptions,
    },
    /// Closed outline through `points`.
    Polygon {
        points: Vec<Point>,
        #[serde(default)]
        options: RoughOptions,
    },
    /// Open stroke through `points`.
    LinearPath {
        points: Vec<Point>,
        #[serde(default)]
        options: RoughOptions,
    },
    /// Text anchored at `at`, rotated by `rotation` radians.
    Text {
        text: String,
        at: Point,
        #[serde(default)]
        rotation: f64,
        #[serde(default)]
        align: TextAlign,
        #[serde(default, skip_serializing_if = "Style::is_default")]
        style: Style,
    },
}

impl Shape {
    pub fn line(from: Point, to: Point, options: RoughOptions) -> Self {
        Shape::Line { from, to, options }
    }

    pub fn text(text: impl Into<String>, at: Point, rotation: f64) -> Self {
        Shape::Text {
            text: text.into(),
            at,
            rotation,
            align: TextAlign::Center,
            style: Style::default(),
        }
    }

    /// Stroke options, for every shape except text.
    pub fn rough_options(&self) -> Option<&RoughOptions> {
        match self {
            Shape::Line { options, .. }
            | Shape::Rectangle { options, .. }
            | Shape::Ellipse { options, .. }
            | Shape::Polygon { options, .. }
            | Shape::LinearPath { options, .. } => Some(options),
            Shape::Text { .. } => None,
        }
    }

    /// Number of points an outline needs, for shapes that carry a point list.
    pub fn point_count(&self) -> Option<usize> {
        match self {
            Shape::Polygon { points, .. } | Shape::LinearPath { points, .. } => Some(points.len()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Surface → Player boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    #[serde(default, skip_serializing_if = "Style::is_default")]
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}
