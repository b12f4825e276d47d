//! Catalog — the ordered, immutable list of steps.
//!
//! Each step is opaque: the sequencer only knows it can be performed against a
//! surface with a seed. A catalog is built once and never mutated, so step
//! indices stay stable for the lifetime of the process.

use anyhow::Result;

use crate::surface::Surface;
use crate::types::Seed;

/// One unit of drawing work.
///
/// Implementations must draw deterministically for a given seed and must
/// draw every primitive with the seed they are given.
pub trait StepAction {
    fn perform(&self, surface: &mut dyn Surface, seed: Seed) -> Result<()>;
}

impl<F> StepAction for F
where
    F: Fn(&mut dyn Surface, Seed) -> Result<()>,
{
    fn perform(&self, surface: &mut dyn Surface, seed: Seed) -> Result<()> {
        self(surface, seed)
    }
}

struct Entry {
    label: Option<String>,
    action: Box<dyn StepAction>,
}

pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn empty() -> Self {
        Catalog {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn StepAction> {
        self.entries.get(index).map(|entry| entry.action.as_ref())
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.entries.get(index)?.label.as_deref()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl FromIterator<Box<dyn StepAction>> for Catalog {
    fn from_iter<I: IntoIterator<Item = Box<dyn StepAction>>>(iter: I) -> Self {
        Catalog {
            entries: iter
                .into_iter()
                .map(|action| Entry {
                    label: None,
                    action,
                })
                .collect(),
        }
    }
}

#[derive(Default)]
pub struct CatalogBuilder {
    entries: Vec<Entry>,
}

impl CatalogBuilder {
    pub fn step(mut self, action: impl StepAction + 'static) -> Self {
        self.entries.push(Entry {
            label: None,
            action: Box::new(action),
        });
        self
    }

    pub fn labeled_step(mut self, label: impl Into<String>, action: impl StepAction + 'static) -> Self {
        self.entries.push(Entry {
            label: Some(label.into()),
            action: Box::new(action),
        });
        self
    }

    pub fn build(self) -> Catalog {
        Catalog {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recording;
    use crate::types::{Point, Shape};

    #[test]
    fn builder_keeps_order_and_labels() {
        let catalog = Catalog::builder()
            .labeled_step("first", |s: &mut dyn Surface, seed: Seed| {
                s.draw(&Shape::text("a", Point::new(0.0, 0.0), 0.0), seed)
            })
            .step(|s: &mut dyn Surface, seed: Seed| {
                s.draw(&Shape::text("b", Point::new(0.0, 0.0), 0.0), seed)
            })
            .build();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.label(0), Some("first"));
        assert_eq!(catalog.label(1), None);
        assert!(catalog.get(2).is_none());

        let mut rec = Recording::new();
        catalog.get(1).unwrap().perform(&mut rec, 9).unwrap();
        assert_eq!(rec.visible_seeds(), vec![9]);
    }

    #[test]
    fn empty_catalog() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.get(0).is_none());
    }
}
