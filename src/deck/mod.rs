//! Deck — the human-authored step content.
//!
//! A deck lists, per step, the shapes that step draws. It says nothing about
//! navigation; the sequencer consumes it through the `Catalog` it builds.

pub mod builtin;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, StepAction};
use crate::surface::Surface;
use crate::types::{Seed, Shape};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub width: u16,
    pub height: u16,
    pub steps: Vec<DeckStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl StepAction for DeckStep {
    fn perform(&self, surface: &mut dyn Surface, seed: Seed) -> Result<()> {
        for shape in &self.shapes {
            surface.draw(shape, seed)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: u16, height: u16 },
    #[error("step {step}, shape {shape}: needs at least 2 points, has {count}")]
    TooFewPoints {
        step: usize,
        shape: usize,
        count: usize,
    },
}

impl Deck {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let deck: Deck = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        deck.validate()
            .with_context(|| format!("Invalid deck {}", path.display()))?;
        Ok(deck)
    }

    pub fn validate(&self) -> Result<(), DeckError> {
        if self.width == 0 || self.height == 0 {
            return Err(DeckError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        for (step, deck_step) in self.steps.iter().enumerate() {
            for (shape, s) in deck_step.shapes.iter().enumerate() {
                if let Some(count) = s.point_count().filter(|&n| n < 2) {
                    return Err(DeckError::TooFewPoints { step, shape, count });
                }
            }
        }
        Ok(())
    }

    /// A catalog with one entry per deck step, labels included.
    pub fn catalog(&self) -> Catalog {
        self.steps
            .iter()
            .cloned()
            .fold(Catalog::builder(), |builder, step| match step.label.clone() {
                Some(label) => builder.labeled_step(label, step),
                None => builder.step(step),
            })
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recording;
    use crate::types::Point;

    const DECK_JSON: &str = r#"{
        "width": 40,
        "height": 10,
        "steps": [
            { "label": "frame", "shapes": [
                { "type": "rectangle", "origin": { "x": 1, "y": 1 }, "width": 30, "height": 6,
                  "options": { "roughness": 2, "fill": "/" } }
            ] },
            { "shapes": [
                { "type": "text", "text": "hello", "at": { "x": 16, "y": 4 }, "rotation": 0.05 },
                { "type": "line", "from": { "x": 2, "y": 8 }, "to": { "x": 30, "y": 8 } }
            ] }
        ]
    }"#;

    #[test]
    fn parses_and_builds_catalog() {
        let deck: Deck = serde_json::from_str(DECK_JSON).unwrap();
        deck.validate().unwrap();
        let catalog = deck.catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.label(0), Some("frame"));
        assert_eq!(catalog.label(1), None);

        let mut rec = Recording::new();
        catalog.get(1).unwrap().perform(&mut rec, 77).unwrap();
        assert_eq!(rec.visible_seeds(), vec![77, 77]);
    }

    #[test]
    fn options_fill_in_defaults() {
        let deck: Deck = serde_json::from_str(DECK_JSON).unwrap();
        let Shape::Rectangle { options, .. } = &deck.steps[0].shapes[0] else {
            panic!("expected a rectangle");
        };
        assert_eq!(options.roughness, 2.0);
        assert_eq!(options.fill, Some('/'));
        assert_eq!(options.bowing, 1.0);
        assert_eq!(options.hachure_gap, 3);
    }

    #[test]
    fn rejects_degenerate_decks() {
        let empty = Deck {
            width: 0,
            height: 5,
            steps: Vec::new(),
        };
        assert_eq!(
            empty.validate(),
            Err(DeckError::EmptyCanvas { width: 0, height: 5 })
        );

        let lonely = Deck {
            width: 5,
            height: 5,
            steps: vec![DeckStep {
                label: None,
                shapes: vec![Shape::Polygon {
                    points: vec![Point::new(1.0, 1.0)],
                    options: Default::default(),
                }],
            }],
        };
        assert_eq!(
            lonely.validate(),
            Err(DeckError::TooFewPoints { step: 0, shape: 0, count: 1 })
        );
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Deck::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
