//! Canvas — the cell-grid raster surface.
//!
//! Rasterizes sketched strokes, hachure fills and text onto a fixed-size grid
//! of terminal cells. The grid persists between draws until it is cleared,
//! so steps accumulate exactly as they would on a bitmap canvas.

mod raster;

use anyhow::Result;

use crate::rough::{Sketcher, fill_outline};
use crate::surface::Surface;
use crate::types::{Cell, CellChange, Point, Region, RoughOptions, Seed, Shape, Style, TextAlign};

pub struct CellCanvas {
    width: u16,
    height: u16,
    grid: Vec<Vec<Cell>>,
}

impl CellCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            grid: vec![vec![Cell::default(); width as usize]; height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.grid.get(y as usize)?.get(x as usize)
    }

    pub fn is_blank(&self) -> bool {
        self.grid.iter().flatten().all(|cell| *cell == Cell::default())
    }

    /// Plain-text dump of the grid, trailing blanks trimmed per row.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.grid {
            let line: String = row.iter().map(|cell| cell.ch).collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    /// Compute a cell-level diff from `previous` to the current grid.
    pub fn diff(&self, previous: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in previous.iter().zip(self.grid.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }

    fn plot(&mut self, x: i64, y: i64, ch: char, style: &Style) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.grid[y as usize][x as usize] = Cell {
            ch,
            style: style.clone(),
        };
    }

    fn stroke(&mut self, stroke: &[Point], options: &RoughOptions) {
        for pair in stroke.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let ch = options
                .stroke
                .unwrap_or_else(|| raster::stroke_glyph(b.x - a.x, b.y - a.y));
            let Some((a, b)) = raster::clip_segment(a, b, self.width, self.height) else {
                continue;
            };
            for (x, y) in raster::segment_cells(a, b) {
                self.plot(x, y, ch, &options.style);
            }
        }
    }

    fn hachure(&mut self, outline: &[Point], fill: char, options: &RoughOptions) {
        let gap = options.hachure_gap.max(1) as i64;
        let top = outline.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor() as i64;
        let bottom = outline.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil() as i64;
        for y in top.max(0)..bottom.min(self.height as i64) {
            for (first, last) in raster::scanline_spans(outline, y) {
                for x in first.max(0)..=last.min(self.width as i64 - 1) {
                    if (x + y).rem_euclid(gap) == 0 {
                        self.plot(x, y, fill, &options.style);
                    }
                }
            }
        }
    }

    fn text(&mut self, text: &str, at: Point, rotation: f64, align: TextAlign, style: &Style) {
        let len = text.chars().count() as f64;
        let start = match align {
            TextAlign::Left => at.x,
            TextAlign::Center => at.x - len / 2.0,
            TextAlign::Right => at.x - len,
        };
        let slope = rotation.tan();
        for (i, ch) in text.chars().enumerate() {
            let x = start + i as f64;
            // Rotate about the anchor: glyphs drift vertically with distance.
            let y = at.y + (x + 0.5 - at.x) * slope;
            self.plot(x.round() as i64, y.round() as i64, ch, style);
        }
    }
}

impl Surface for CellCanvas {
    fn draw(&mut self, shape: &Shape, seed: Seed) -> Result<()> {
        if let Shape::Text {
            text,
            at,
            rotation,
            align,
            style,
        } = shape
        {
            self.text(text, *at, *rotation, *align, style);
            return Ok(());
        }

        let Some(options) = shape.rough_options() else {
            return Ok(());
        };

        // Fill first so the outline stays on top.
        if let (Some(fill), Some(outline)) = (options.fill, fill_outline(shape)) {
            self.hachure(&outline, fill, options);
        }
        for stroke in Sketcher::new(seed).strokes(shape) {
            self.stroke(&stroke, options);
        }
        Ok(())
    }

    fn clear(&mut self, region: Region) -> Result<()> {
        for (y, row) in self.grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if region.touches_cell(x, y) {
                    *cell = Cell::default();
                }
            }
        }
        Ok(())
    }
}
