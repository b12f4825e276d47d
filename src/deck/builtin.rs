//! Built-in deck: the three areas of a git working copy.

use crate::types::{Point, RoughOptions, Shape};

use super::{Deck, DeckStep};

/// Drawing space the artwork was laid out in.
const ART_WIDTH: f64 = 1000.0;
const ART_HEIGHT: f64 = 700.0;

/// Cell canvas it is shown on.
pub const WIDTH: u16 = 100;
pub const HEIGHT: u16 = 35;

fn at(x: f64, y: f64) -> Point {
    Point::new(
        x * WIDTH as f64 / ART_WIDTH,
        y * HEIGHT as f64 / ART_HEIGHT,
    )
}

fn divider(x: f64) -> Shape {
    Shape::line(at(x, 20.0), at(x, ART_HEIGHT - 20.0), RoughOptions::with_roughness(5.0))
}

fn step(label: &str, shapes: Vec<Shape>) -> DeckStep {
    DeckStep {
        label: Some(label.to_string()),
        shapes,
    }
}

pub fn git_areas() -> Deck {
    let ww = ART_WIDTH;
    Deck {
        width: WIDTH,
        height: HEIGHT,
        steps: vec![
            step("left divider", vec![divider(ww / 3.0)]),
            step("right divider", vec![divider(ww / 3.0 * 2.0)]),
            step("workdir", vec![Shape::text("workdir", at(ww / 6.0, 40.0), 0.02)]),
            step("staging area", vec![Shape::text("staging area", at(ww / 2.0, 40.0), -0.01)]),
            step("committed", vec![Shape::text("committed", at(ww * 5.0 / 6.0, 20.0), 0.01)]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CellCanvas;
    use crate::position::MemoryPublisher;
    use crate::sequencer::Sequencer;

    #[test]
    fn builtin_deck_is_valid() {
        let deck = git_areas();
        deck.validate().unwrap();
        assert_eq!(deck.steps.len(), 5);
    }

    #[test]
    fn fully_drawn_shows_every_heading() {
        let deck = git_areas();
        let mut seq = Sequencer::new(
            deck.catalog(),
            CellCanvas::new(deck.width, deck.height),
            MemoryPublisher::new(),
            2024,
        );
        seq.fast_forward(usize::MAX).unwrap();
        let text = seq.surface().to_text();
        for heading in ["workdir", "staging area", "committed"] {
            assert!(text.contains(heading), "missing {heading}:\n{text}");
        }
    }
}
