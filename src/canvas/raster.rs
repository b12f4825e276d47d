//! Cell-level rasterization helpers: line stepping, stroke glyphs and
//! scanline coverage.

use crate::types::Point;

/// Clip the segment `a`-`b` to the cell rectangle of a `width` x `height`
/// grid (Liang-Barsky). `None` when nothing of it lands on the grid or a
/// coordinate is not finite.
pub fn clip_segment(a: Point, b: Point, width: u16, height: u16) -> Option<(Point, Point)> {
    if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (min_x, min_y) = (-0.5, -0.5);
    let (max_x, max_y) = (width as f64 - 0.5, height as f64 - 0.5);
    let (dx, dy) = (b.x - a.x, b.y - a.y);

    let mut enter = 0.0_f64;
    let mut leave = 1.0_f64;
    for (p, q) in [
        (-dx, a.x - min_x),
        (dx, max_x - a.x),
        (-dy, a.y - min_y),
        (dy, max_y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            enter = enter.max(t);
        } else {
            leave = leave.min(t);
        }
        if enter > leave {
            return None;
        }
    }

    let at = |t: f64| Point::new(a.x + t * dx, a.y + t * dy);
    Some((at(enter), at(leave)))
}

/// Cells visited when stepping from `a` to `b` (both rounded to cells),
/// endpoints included. Callers clip first; the walk is as long as the segment.
pub fn segment_cells(a: Point, b: Point) -> Vec<(i64, i64)> {
    let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
    let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::new();
    loop {
        cells.push((x0, y0));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    cells
}

/// Glyph that best follows the direction `(dx, dy)`. Rows grow downward.
pub fn stroke_glyph(dx: f64, dy: f64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax == 0.0 && ay == 0.0 {
        return '·';
    }
    // tan(22.5°) and tan(67.5°) split the compass into eight sectors.
    if ay <= ax * 0.414 {
        '─'
    } else if ay >= ax * 2.414 {
        '│'
    } else if (dx > 0.0) == (dy > 0.0) {
        '╲'
    } else {
        '╱'
    }
}

/// Column spans covered by a closed `outline` on `row`, sampled at the cell
/// centre with the even-odd rule. Spans are inclusive and may be negative.
pub fn scanline_spans(outline: &[Point], row: i64) -> Vec<(i64, i64)> {
    let y = row as f64 + 0.5;
    let mut crossings: Vec<f64> = Vec::new();
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
            crossings.push(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x));
        }
    }
    crossings.sort_by(f64::total_cmp);

    crossings
        .chunks_exact(2)
        .filter_map(|pair| {
            // Cells whose centre lies strictly inside the pair.
            let first = (pair[0] - 0.5).ceil() as i64;
            let last = (pair[1] - 0.5).floor() as i64;
            (first <= last).then_some((first, last))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_segment_covers_every_column() {
        let cells = segment_cells(Point::new(2.0, 3.0), Point::new(6.0, 3.0));
        assert_eq!(cells, vec![(2, 3), (3, 3), (4, 3), (5, 3), (6, 3)]);
    }

    #[test]
    fn reversed_segment_visits_same_cells() {
        let mut forward = segment_cells(Point::new(0.0, 0.0), Point::new(5.0, 3.0));
        let mut backward = segment_cells(Point::new(5.0, 3.0), Point::new(0.0, 0.0));
        forward.sort();
        backward.sort();
        assert_eq!(forward.len(), backward.len());
        assert_eq!(forward.first(), backward.first());
        assert_eq!(forward.last(), backward.last());
    }

    #[test]
    fn clipping_keeps_inner_segments_whole() {
        let (a, b) = (Point::new(1.0, 1.0), Point::new(4.0, 2.0));
        assert_eq!(clip_segment(a, b, 10, 5), Some((a, b)));
    }

    #[test]
    fn clipping_trims_far_endpoints_to_the_grid() {
        let (a, b) = clip_segment(Point::new(0.0, 0.0), Point::new(1e18, 0.0), 10, 5).unwrap();
        assert_eq!(a, Point::new(0.0, 0.0));
        assert!((b.x - 9.5).abs() < 1e-6);
        let columns: Vec<i64> = segment_cells(a, b)
            .into_iter()
            .map(|(x, _)| x)
            .filter(|x| *x < 10)
            .collect();
        assert_eq!(columns, (0..10).collect::<Vec<_>>());

        let (a, b) = clip_segment(Point::new(-1e12, 2.0), Point::new(1e12, 2.0), 10, 5).unwrap();
        assert!(a.x >= -0.5 - 1e-6 && b.x <= 9.5 + 1e-6);
    }

    #[test]
    fn clipping_drops_segments_off_the_grid() {
        assert_eq!(clip_segment(Point::new(20.0, 0.0), Point::new(1e18, 0.0), 10, 5), None);
        assert_eq!(clip_segment(Point::new(0.0, -3.0), Point::new(9.0, -1.0), 10, 5), None);
        assert_eq!(clip_segment(Point::new(0.0, 0.0), Point::new(f64::NAN, 0.0), 10, 5), None);
        assert_eq!(clip_segment(Point::new(0.0, 0.0), Point::new(f64::INFINITY, 0.0), 10, 5), None);
    }

    #[test]
    fn glyphs_follow_direction() {
        assert_eq!(stroke_glyph(1.0, 0.0), '─');
        assert_eq!(stroke_glyph(0.0, -1.0), '│');
        assert_eq!(stroke_glyph(1.0, 1.0), '╲');
        assert_eq!(stroke_glyph(-1.0, -1.0), '╲');
        assert_eq!(stroke_glyph(1.0, -1.0), '╱');
        assert_eq!(stroke_glyph(0.0, 0.0), '·');
    }

    #[test]
    fn square_scanline() {
        let square = [
            Point::new(1.0, 1.0),
            Point::new(5.0, 1.0),
            Point::new(5.0, 5.0),
            Point::new(1.0, 5.0),
        ];
        assert_eq!(scanline_spans(&square, 2), vec![(1, 4)]);
        assert!(scanline_spans(&square, 0).is_empty());
        assert!(scanline_spans(&square, 5).is_empty());
    }
}
