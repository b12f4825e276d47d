//! Step-by-step playback of hand-drawn vector sketches.
//!
//! A [`catalog::Catalog`] of opaque steps is walked by a
//! [`sequencer::Sequencer`], which draws onto a [`surface::Surface`] and
//! reports its position to a [`position::PositionPublisher`]. Going back
//! clears the surface and replays the remaining steps with their original
//! seeds, so the sketchy strokes never jitter between visits.

pub mod canvas;
pub mod catalog;
pub mod config;
pub mod deck;
pub mod input;
pub mod menubar;
pub mod player;
pub mod position;
pub mod rough;
pub mod sequencer;
pub mod surface;
pub mod types;
