//! Rough — the seeded hand-drawn stroke generator.
//!
//! Turns a `Shape` into polylines that wobble like a pen stroke. All
//! randomness comes from a `SmallRng` seeded with the draw seed, so a given
//! `(shape, seed)` pair always yields the same strokes.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::types::{Point, RoughOptions, Seed, Shape};

/// A stroke is an open polyline in surface units.
pub type Stroke = Vec<Point>;

/// Upper bound on samples per curve, keeps long strokes cheap to rasterize.
const MAX_SAMPLES: usize = 256;

pub struct Sketcher {
    rng: SmallRng,
}

impl Sketcher {
    pub fn new(seed: Seed) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Outline strokes for `shape`. Text has no strokes.
    pub fn strokes(&mut self, shape: &Shape) -> Vec<Stroke> {
        match shape {
            Shape::Line { from, to, options } => self.line(*from, *to, options),
            Shape::Rectangle {
                origin,
                width,
                height,
                options,
            } => {
                let corners = rectangle_corners(*origin, *width, *height);
                self.path(&corners, true, options)
            }
            Shape::Ellipse {
                center,
                width,
                height,
                options,
            } => self.ellipse(*center, *width, *height, options),
            Shape::Polygon { points, options } => self.path(points, true, options),
            Shape::LinearPath { points, options } => self.path(points, false, options),
            Shape::Text { .. } => Vec::new(),
        }
    }

    /// A line drawn twice, the second pass with half the jitter.
    pub fn line(&mut self, from: Point, to: Point, options: &RoughOptions) -> Vec<Stroke> {
        vec![
            self.rough_segment(from, to, options, 1.0),
            self.rough_segment(from, to, options, 0.5),
        ]
    }

    fn path(&mut self, points: &[Point], close: bool, options: &RoughOptions) -> Vec<Stroke> {
        let mut strokes = Vec::new();
        for pair in points.windows(2) {
            strokes.extend(self.line(pair[0], pair[1], options));
        }
        if close && points.len() > 2 {
            strokes.extend(self.line(points[points.len() - 1], points[0], options));
        }
        strokes
    }

    fn ellipse(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        options: &RoughOptions,
    ) -> Vec<Stroke> {
        let (rx, ry) = (width.abs() / 2.0, height.abs() / 2.0);
        let samples = ellipse_samples(rx, ry);
        (0..2)
            .map(|pass| {
                let gain = if pass == 0 { 1.0 } else { 0.5 };
                let start = self.jitter(0.1, options.roughness * gain);
                let mut stroke: Stroke = (0..samples)
                    .map(|k| {
                        let theta = start + TAU * k as f64 / samples as f64;
                        let r = 1.0 + self.jitter(0.05, options.roughness * gain);
                        Point::new(
                            center.x + rx * r * theta.cos(),
                            center.y + ry * r * theta.sin(),
                        )
                    })
                    .collect();
                if let Some(&first) = stroke.first() {
                    stroke.push(first);
                }
                stroke
            })
            .collect()
    }

    fn rough_segment(&mut self, from: Point, to: Point, options: &RoughOptions, gain: f64) -> Stroke {
        let len = from.distance(to);
        let max_offset = (len / 20.0).min(0.5);
        let roughness = options.roughness * gain;

        let start = Point::new(
            from.x + self.jitter(max_offset, roughness),
            from.y + self.jitter(max_offset, roughness),
        );
        let end = Point::new(
            to.x + self.jitter(max_offset, roughness),
            to.y + self.jitter(max_offset, roughness),
        );

        // Control point: the midpoint pushed sideways along the normal.
        let bow = self.jitter(options.bowing * len / 200.0, roughness);
        let (nx, ny) = if len > 0.0 {
            (-(to.y - from.y) / len, (to.x - from.x) / len)
        } else {
            (0.0, 0.0)
        };
        let control = Point::new(
            (start.x + end.x) / 2.0 + nx * bow,
            (start.y + end.y) / 2.0 + ny * bow,
        );

        let samples = (len.ceil() as usize).clamp(1, MAX_SAMPLES);
        (0..=samples)
            .map(|k| quadratic(start, control, end, k as f64 / samples as f64))
            .collect()
    }

    /// Uniform offset in `[-range, range) * roughness`.
    fn jitter(&mut self, range: f64, roughness: f64) -> f64 {
        // Always draw, so the stream stays aligned whatever the options.
        let unit = self.rng.random::<f64>() * 2.0 - 1.0;
        if range <= 0.0 || roughness <= 0.0 {
            return 0.0;
        }
        unit * range * roughness
    }
}

/// Exact closed outline used for hachure filling, if the shape has an inside.
pub fn fill_outline(shape: &Shape) -> Option<Vec<Point>> {
    match shape {
        Shape::Rectangle {
            origin,
            width,
            height,
            ..
        } => Some(rectangle_corners(*origin, *width, *height).to_vec()),
        Shape::Ellipse {
            center,
            width,
            height,
            ..
        } => {
            let (rx, ry) = (width.abs() / 2.0, height.abs() / 2.0);
            let samples = ellipse_samples(rx, ry);
            Some(
                (0..samples)
                    .map(|k| {
                        let theta = TAU * k as f64 / samples as f64;
                        Point::new(center.x + rx * theta.cos(), center.y + ry * theta.sin())
                    })
                    .collect(),
            )
        }
        Shape::Polygon { points, .. } if points.len() > 2 => Some(points.clone()),
        _ => None,
    }
}

fn rectangle_corners(origin: Point, width: f64, height: f64) -> [Point; 4] {
    [
        origin,
        Point::new(origin.x + width, origin.y),
        Point::new(origin.x + width, origin.y + height),
        Point::new(origin.x, origin.y + height),
    ]
}

fn ellipse_samples(rx: f64, ry: f64) -> usize {
    // Ramanujan's perimeter approximation, one sample per unit of arc.
    let h = ((rx - ry) / (rx + ry).max(f64::EPSILON)).powi(2);
    let perimeter = std::f64::consts::PI * (rx + ry) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()));
    (perimeter.ceil() as usize).clamp(12, MAX_SAMPLES)
}

fn quadratic(a: Point, c: Point, b: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * a.x + 2.0 * u * t * c.x + t * t * b.x,
        u * u * a.y + 2.0 * u * t * c.y + t * t * b.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal(roughness: f64) -> Shape {
        Shape::line(
            Point::new(0.0, 0.0),
            Point::new(40.0, 20.0),
            RoughOptions::with_roughness(roughness),
        )
    }

    #[test]
    fn same_seed_same_strokes() {
        let a = Sketcher::new(42).strokes(&diagonal(3.0));
        let b = Sketcher::new(42).strokes(&diagonal(3.0));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_moves_the_stroke() {
        let a = Sketcher::new(1).strokes(&diagonal(3.0));
        let b = Sketcher::new(2).strokes(&diagonal(3.0));
        assert_ne!(a, b);
    }

    #[test]
    fn zero_roughness_is_exact() {
        let strokes = Sketcher::new(9).strokes(&diagonal(0.0));
        assert_eq!(strokes.len(), 2);
        for stroke in strokes {
            assert_eq!(stroke.first(), Some(&Point::new(0.0, 0.0)));
            assert_eq!(stroke.last(), Some(&Point::new(40.0, 20.0)));
            for p in stroke {
                assert!((p.y - p.x / 2.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn rectangle_draws_four_doubled_sides() {
        let rect = Shape::Rectangle {
            origin: Point::new(1.0, 1.0),
            width: 10.0,
            height: 4.0,
            options: RoughOptions::default(),
        };
        assert_eq!(Sketcher::new(0).strokes(&rect).len(), 8);
    }

    #[test]
    fn open_path_is_not_closed() {
        let points = vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)];
        let open = Shape::LinearPath {
            points: points.clone(),
            options: RoughOptions::default(),
        };
        let closed = Shape::Polygon {
            points,
            options: RoughOptions::default(),
        };
        assert_eq!(Sketcher::new(0).strokes(&open).len(), 4);
        assert_eq!(Sketcher::new(0).strokes(&closed).len(), 6);
    }

    #[test]
    fn ellipse_strokes_are_closed() {
        let ellipse = Shape::Ellipse {
            center: Point::new(10.0, 10.0),
            width: 12.0,
            height: 6.0,
            options: RoughOptions::default(),
        };
        for stroke in Sketcher::new(5).strokes(&ellipse) {
            assert_eq!(stroke.first(), stroke.last());
        }
    }

    #[test]
    fn text_has_no_outline() {
        let text = Shape::text("hi", Point::new(3.0, 3.0), 0.0);
        assert!(Sketcher::new(0).strokes(&text).is_empty());
        assert!(fill_outline(&text).is_none());
    }
}
