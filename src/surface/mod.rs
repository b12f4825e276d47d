//! Surface — the drawing target steps paint onto.
//!
//! A surface accumulates everything drawn on it until it is explicitly
//! cleared. Implementations must be deterministic: drawing the same `Shape`
//! with the same `Seed` always produces the same output.

mod recording;

pub use recording::{Recording, SurfaceCall};

use anyhow::Result;

use crate::types::{Region, Seed, Shape};

pub trait Surface {
    /// Draw one primitive in the hand-drawn style parameterized by `seed`.
    fn draw(&mut self, shape: &Shape, seed: Seed) -> Result<()>;

    /// Erase everything inside `region`.
    fn clear(&mut self, region: Region) -> Result<()>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn draw(&mut self, shape: &Shape, seed: Seed) -> Result<()> {
        (**self).draw(shape, seed)
    }

    fn clear(&mut self, region: Region) -> Result<()> {
        (**self).clear(region)
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn draw(&mut self, shape: &Shape, seed: Seed) -> Result<()> {
        (**self).draw(shape, seed)
    }

    fn clear(&mut self, region: Region) -> Result<()> {
        (**self).clear(region)
    }
}
