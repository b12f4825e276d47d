use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::types::{Region, Seed, Shape};

use super::Surface;

/// One call made against a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SurfaceCall {
    Draw { shape: Shape, seed: Seed },
    Clear { region: Region },
}

/// A surface that remembers every call instead of rasterizing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recording {
    calls: Vec<SurfaceCall>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Calls made since the most recent clear, i.e. what is currently visible.
    pub fn visible(&self) -> &[SurfaceCall] {
        let start = self
            .calls
            .iter()
            .rposition(|call| matches!(call, SurfaceCall::Clear { .. }))
            .map_or(0, |i| i + 1);
        &self.calls[start..]
    }

    pub fn clear_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Clear { .. }))
            .count()
    }

    pub fn draw_count(&self) -> usize {
        self.calls.len() - self.clear_count()
    }

    /// Seeds of the visible draws, in order.
    pub fn visible_seeds(&self) -> Vec<Seed> {
        self.visible()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Draw { seed, .. } => Some(*seed),
                SurfaceCall::Clear { .. } => None,
            })
            .collect()
    }
}

impl Surface for Recording {
    fn draw(&mut self, shape: &Shape, seed: Seed) -> Result<()> {
        self.calls.push(SurfaceCall::Draw {
            shape: shape.clone(),
            seed,
        });
        Ok(())
    }

    fn clear(&mut self, region: Region) -> Result<()> {
        self.calls.push(SurfaceCall::Clear { region });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, RoughOptions};

    fn dot(x: f64) -> Shape {
        Shape::line(Point::new(x, 0.0), Point::new(x, 1.0), RoughOptions::default())
    }

    #[test]
    fn visible_starts_after_last_clear() {
        let mut rec = Recording::new();
        rec.draw(&dot(1.0), 7).unwrap();
        rec.clear(Region::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        rec.draw(&dot(2.0), 8).unwrap();

        assert_eq!(rec.calls().len(), 3);
        assert_eq!(rec.visible().len(), 1);
        assert_eq!(rec.visible_seeds(), vec![8]);
        assert_eq!(rec.clear_count(), 1);
        assert_eq!(rec.draw_count(), 2);
    }

    #[test]
    fn trace_json_is_tagged_by_call() {
        let mut rec = Recording::new();
        rec.draw(&dot(1.0), 3).unwrap();
        let json = serde_json::to_value(rec.calls()).unwrap();
        assert_eq!(json[0]["call"], "draw");
        assert_eq!(json[0]["shape"]["type"], "line");
        assert_eq!(json[0]["seed"], 3);
    }
}
