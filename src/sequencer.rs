//! Sequencer — the step cursor and deterministic redraw engine.
//!
//! Owns a cursor into a `Catalog` and the seed the next step will draw with.
//! Moving forward performs one more step on top of the surface. Moving back
//! clears the surface and replays the remaining prefix, handing every step
//! the same seed it saw the first time it ran, so replays are pixel-stable.
//!
//! The seed rises by exactly one per forward step. That is what lets `retreat`
//! recover the base seed as `seed - cursor`; nothing but the sequencer may
//! change it.

use anyhow::Result;
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::position::PositionPublisher;
use crate::surface::Surface;
use crate::types::{Region, Seed};

/// Side length of the area cleared before a replay, well beyond any canvas.
pub const CLEAR_EXTENT: f64 = 3000.0;

pub struct Sequencer<S, P> {
    catalog: Catalog,
    surface: S,
    publisher: P,
    cursor: usize,
    seed: Seed,
}

impl<S: Surface, P: PositionPublisher> Sequencer<S, P> {
    pub fn new(catalog: Catalog, surface: S, publisher: P, base_seed: Seed) -> Self {
        Self {
            catalog,
            surface,
            publisher,
            cursor: 0,
            seed: base_seed,
        }
    }

    /// Perform the step under the cursor. No-op at the end.
    ///
    /// Returns whether the cursor moved.
    pub fn advance(&mut self) -> Result<bool> {
        let Some(step) = self.catalog.get(self.cursor) else {
            trace!(cursor = self.cursor, "advance at end, ignored");
            return Ok(false);
        };
        step.perform(&mut self.surface, self.seed)?;
        self.cursor += 1;
        self.seed = self.seed.wrapping_add(1);
        debug!(cursor = self.cursor, seed = self.seed, "advanced");
        self.publisher.publish(self.cursor)?;
        Ok(true)
    }

    /// Drop the last applied step by clearing and replaying the rest.
    /// No-op at the start.
    ///
    /// Returns whether the cursor moved.
    pub fn retreat(&mut self) -> Result<bool> {
        if self.cursor == 0 {
            trace!("retreat at start, ignored");
            return Ok(false);
        }
        self.surface
            .clear(Region::new(0.0, 0.0, CLEAR_EXTENT, CLEAR_EXTENT))?;

        let origin = self.seed.wrapping_sub(self.cursor as Seed);
        self.cursor -= 1;
        // Cursor and seed agree before any step runs, so a failing replay
        // leaves only the surface short.
        self.seed = origin.wrapping_add(self.cursor as Seed);
        let mut seed = origin;
        for index in 0..self.cursor {
            if let Some(step) = self.catalog.get(index) {
                step.perform(&mut self.surface, seed)?;
            }
            seed = seed.wrapping_add(1);
        }
        debug!(cursor = self.cursor, seed = self.seed, "retreated");
        self.publisher.publish(self.cursor)?;
        Ok(true)
    }

    /// Advance one step at a time until the cursor reaches `target` or the
    /// end of the catalog. Returns the cursor reached.
    pub fn fast_forward(&mut self, target: usize) -> Result<usize> {
        while self.cursor < target {
            if !self.advance()? {
                break;
            }
        }
        Ok(self.cursor)
    }

    /// Fast-forward to the position the publisher was started with, if any.
    pub fn resume(&mut self) -> Result<usize> {
        match self.publisher.read_initial_position() {
            Some(target) => {
                debug!(target, "resuming");
                self.fast_forward(target)
            }
            None => Ok(self.cursor),
        }
    }
}

impl<S, P> Sequencer<S, P> {
    /// Number of steps currently applied.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of steps in the catalog.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.catalog.len()
    }

    /// Seed the next forward step will draw with.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Seed step 0 draws with.
    pub fn base_seed(&self) -> Seed {
        self.seed.wrapping_sub(self.cursor as Seed)
    }

    /// Seed step `index` draws with, whatever the navigation history.
    pub fn seed_for(&self, index: usize) -> Seed {
        self.base_seed().wrapping_add(index as Seed)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_parts(self) -> (S, P) {
        (self.surface, self.publisher)
    }
}
