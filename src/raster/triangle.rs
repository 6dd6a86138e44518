//! Triangle setup: sort by screen Y, reject degenerate input and split into
//! at most two monotone halves that share one horizontal edge.
//!
//! Naming follows the shape in screen space: a *flat-top* half has its
//! single vertex (`bottom`) at the smallest Y and its horizontal edge
//! (`left`..`right`) below it; a *flat-bottom* half has the horizontal edge
//! first and its single vertex (`top`) at the largest Y.

use crate::raster::vertex::ScreenVertex;

/// Tolerance for the "same coordinate" tests of the setup stage.
pub const EPSILON: f32 = 1e-6;

#[inline]
fn nearly_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Output of [`split_triangle`]. Invariant: `left.pos.x <= right.pos.x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SplitTriangle {
    FlatTop {
        bottom: ScreenVertex,
        left: ScreenVertex,
        right: ScreenVertex,
    },
    FlatBottom {
        left: ScreenVertex,
        right: ScreenVertex,
        top: ScreenVertex,
    },
    /// General triangle split at the middle vertex's row. `left`/`right` is
    /// the shared edge: the middle vertex and the synthetic split vertex.
    Both {
        bottom: ScreenVertex,
        left: ScreenVertex,
        right: ScreenVertex,
        top: ScreenVertex,
    },
}

/// One output row: inclusive pixel range, the vertex at the first pixel and
/// the per-pixel increment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scanline {
    pub x0: i32,
    pub x1: i32,
    pub y: usize,
    pub start: ScreenVertex,
    pub step: ScreenVertex,
}

/// Order two vertices by screen X.
#[inline]
fn by_x(a: ScreenVertex, b: ScreenVertex) -> (ScreenVertex, ScreenVertex) {
    if a.pos.x <= b.pos.x { (a, b) } else { (b, a) }
}

/// Classify and split a screen-space triangle.
///
/// Returns `None` for input that covers no rows or no columns: all three
/// vertices on one row, or all three on one column.
pub fn split_triangle(
    a: ScreenVertex,
    b: ScreenVertex,
    c: ScreenVertex,
) -> Option<SplitTriangle> {
    let mut v = [a, b, c];
    v.sort_unstable_by(|p, q| p.pos.y.total_cmp(&q.pos.y));
    let [v0, v1, v2] = v;

    let flat_y = nearly_equal(v0.pos.y, v1.pos.y) && nearly_equal(v1.pos.y, v2.pos.y);
    let flat_x = nearly_equal(v0.pos.x, v1.pos.x) && nearly_equal(v1.pos.x, v2.pos.x);
    if flat_y || flat_x {
        return None;
    }

    if nearly_equal(v0.pos.y, v1.pos.y) {
        let (left, right) = by_x(v0, v1);
        return Some(SplitTriangle::FlatBottom {
            left,
            right,
            top: v2,
        });
    }
    if nearly_equal(v1.pos.y, v2.pos.y) {
        let (left, right) = by_x(v1, v2);
        return Some(SplitTriangle::FlatTop {
            bottom: v0,
            left,
            right,
        });
    }

    let t = (v1.pos.y - v0.pos.y) / (v2.pos.y - v0.pos.y);
    let split = v0.lerp(v2, t);
    let (left, right) = by_x(split, v1);
    Some(SplitTriangle::Both {
        bottom: v0,
        left,
        right,
        top: v2,
    })
}

impl SplitTriangle {
    /// Emit every scanline of the triangle that lands on `0 .. height`.
    ///
    /// Rows are sampled at integer Y in `floor(y_start)+1 ..= floor(y_end)`
    /// for each half, so the two halves of a split triangle never share or
    /// skip a row.
    pub fn for_each_scanline(&self, width: usize, height: usize, mut emit: impl FnMut(Scanline)) {
        match *self {
            SplitTriangle::FlatTop {
                bottom,
                left,
                right,
            } => walk_half(bottom, left, bottom, right, width, height, &mut emit),
            SplitTriangle::FlatBottom { left, right, top } => {
                walk_half(left, top, right, top, width, height, &mut emit)
            }
            SplitTriangle::Both {
                bottom,
                left,
                right,
                top,
            } => {
                walk_half(bottom, left, bottom, right, width, height, &mut emit);
                walk_half(left, top, right, top, width, height, &mut emit);
            }
        }
    }
}

/// Walk the rows between two edges `l0→l1` and `r0→r1` that start on the
/// same row (`l0.y == r0.y`) and end on the same row.
fn walk_half(
    l0: ScreenVertex,
    l1: ScreenVertex,
    r0: ScreenVertex,
    r1: ScreenVertex,
    width: usize,
    height: usize,
    emit: &mut impl FnMut(Scanline),
) {
    if width == 0 || height == 0 {
        return;
    }
    let y_start = l0.pos.y;
    let y_span = l1.pos.y - y_start;
    if y_span < EPSILON {
        return;
    }

    let first = (y_start.floor() as i64 + 1).max(0);
    let last = (l1.pos.y.floor() as i64).min(height as i64 - 1);

    for y in first..=last {
        let factor = (y as f32 - y_start) / y_span;
        let left = l0.lerp(l1, factor);
        let right = r0.lerp(r1, factor);
        if let Some(scanline) = make_scanline(left, right, y as usize, width) {
            emit(scanline);
        }
    }
}

/// Clamp a row's column range to the target and advance the start vertex to
/// the first visible column.
fn make_scanline(
    left: ScreenVertex,
    right: ScreenVertex,
    y: usize,
    width: usize,
) -> Option<Scanline> {
    let span = right.pos.x - left.pos.x;
    let step = if span > EPSILON {
        (right - left) * (1.0 / span)
    } else {
        ScreenVertex::default()
    };

    let x0 = (left.pos.x.floor() as i64).max(0);
    let x1 = (right.pos.x.floor() as i64).min(width as i64 - 1);
    if x0 > x1 {
        return None;
    }

    let start = left + step * (x0 as f32 - left.pos.x);
    Some(Scanline {
        x0: x0 as i32,
        x1: x1 as i32,
        y,
        start,
        step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use glam::{Vec2, Vec3};
    use std::collections::HashMap;

    fn sv(x: f32, y: f32) -> ScreenVertex {
        ScreenVertex::new(Vec3::new(x, y, 0.5), Color::WHITE, Vec2::ZERO, Vec3::Z, 1.0)
    }

    fn coverage(st: &SplitTriangle, w: usize, h: usize) -> HashMap<(i32, usize), u32> {
        let mut hits = HashMap::new();
        st.for_each_scanline(w, h, |s| {
            for x in s.x0..=s.x1 {
                *hits.entry((x, s.y)).or_insert(0) += 1;
            }
        });
        hits
    }

    /// Direct flood of the whole triangle: for every integer row strictly
    /// below the top vertex and not past the bottom one, intersect the row
    /// with the three edges.
    fn reference_flood(p: [(f32, f32); 3], w: usize, h: usize) -> HashMap<(i32, usize), u32> {
        let mut hits = HashMap::new();
        let y_min = p.iter().map(|v| v.1).fold(f32::INFINITY, f32::min);
        let y_max = p.iter().map(|v| v.1).fold(f32::NEG_INFINITY, f32::max);
        let first = (y_min.floor() as i64 + 1).max(0);
        let last = (y_max.floor() as i64).min(h as i64 - 1);
        for y in first..=last {
            let yf = y as f32;
            let mut xs = Vec::new();
            for i in 0..3 {
                let (a, b) = (p[i], p[(i + 1) % 3]);
                let (lo, hi) = if a.1 <= b.1 { (a, b) } else { (b, a) };
                if yf >= lo.1 && yf <= hi.1 && hi.1 > lo.1 {
                    xs.push(lo.0 + (hi.0 - lo.0) * (yf - lo.1) / (hi.1 - lo.1));
                }
            }
            let xl = xs.iter().copied().fold(f32::INFINITY, f32::min);
            let xr = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let x0 = (xl.floor() as i64).max(0);
            let x1 = (xr.floor() as i64).min(w as i64 - 1);
            for x in x0..=x1 {
                hits.insert((x as i32, y as usize), 1);
            }
        }
        hits
    }

    #[test]
    fn sorts_and_classifies_flat_top() {
        let st = split_triangle(sv(6.0, 5.0), sv(1.0, 0.5), sv(2.0, 5.0)).unwrap();
        match st {
            SplitTriangle::FlatTop {
                bottom,
                left,
                right,
            } => {
                assert_eq!(bottom.pos.y, 0.5);
                assert_eq!(left.pos.x, 2.0);
                assert_eq!(right.pos.x, 6.0);
            }
            other => panic!("expected flat-top, got {other:?}"),
        }
    }

    #[test]
    fn classifies_flat_bottom() {
        let st = split_triangle(sv(4.0, 1.0), sv(3.0, 7.0), sv(0.0, 1.0)).unwrap();
        match st {
            SplitTriangle::FlatBottom { left, right, top } => {
                assert_eq!(left.pos.x, 0.0);
                assert_eq!(right.pos.x, 4.0);
                assert_eq!(top.pos.y, 7.0);
            }
            other => panic!("expected flat-bottom, got {other:?}"),
        }
    }

    #[test]
    fn general_triangle_splits_at_middle_row() {
        let st = split_triangle(sv(0.0, 0.0), sv(8.0, 4.0), sv(2.0, 8.0)).unwrap();
        match st {
            SplitTriangle::Both {
                bottom,
                left,
                right,
                top,
            } => {
                assert_eq!(bottom.pos.y, 0.0);
                assert_eq!(top.pos.y, 8.0);
                // split vertex on the long edge at y = 4 → x = 1
                assert!((left.pos.x - 1.0).abs() < 1e-5);
                assert!((left.pos.y - 4.0).abs() < 1e-5);
                assert_eq!(right.pos.x, 8.0);
                assert!(left.pos.x <= right.pos.x);
            }
            other => panic!("expected split triangle, got {other:?}"),
        }
    }

    #[test]
    fn collinear_input_is_rejected() {
        assert!(split_triangle(sv(0.0, 0.0), sv(1.0, 0.0), sv(2.0, 0.0)).is_none());
        assert!(split_triangle(sv(3.0, 0.0), sv(3.0, 5.0), sv(3.0, 9.0)).is_none());
        assert!(split_triangle(sv(1.0, 1.0), sv(1.0, 1.0), sv(1.0, 1.0)).is_none());
    }

    #[test]
    fn halves_cover_the_triangle_exactly_once() {
        let pts = [(1.3, 0.7), (14.8, 6.4), (4.1, 13.6)];
        let st = split_triangle(sv(pts[0].0, pts[0].1), sv(pts[1].0, pts[1].1), sv(pts[2].0, pts[2].1))
            .unwrap();
        assert!(matches!(st, SplitTriangle::Both { .. }));

        let got = coverage(&st, 16, 16);
        assert!(got.values().all(|&n| n == 1), "pixel emitted twice");

        let want = reference_flood(pts, 16, 16);
        let mut got_keys: Vec<_> = got.keys().copied().collect();
        let mut want_keys: Vec<_> = want.keys().copied().collect();
        got_keys.sort_unstable();
        want_keys.sort_unstable();
        assert_eq!(got_keys, want_keys);
    }

    #[test]
    fn rows_and_columns_are_clamped_to_target() {
        let st = split_triangle(sv(-20.0, -10.5), sv(40.0, 3.5), sv(5.0, 30.5)).unwrap();
        st.for_each_scanline(8, 6, |s| {
            assert!(s.y < 6);
            assert!(s.x0 >= 0 && s.x1 < 8 && s.x0 <= s.x1);
        });
    }

    #[test]
    fn clamped_start_is_advanced_to_first_column() {
        let left = ScreenVertex::new(Vec3::new(-4.0, 2.0, 0.0), Color::BLACK, Vec2::ZERO, Vec3::ZERO, 1.0);
        let right = ScreenVertex::new(Vec3::new(4.0, 2.0, 0.0), Color::WHITE, Vec2::ONE, Vec3::ZERO, 1.0);
        let s = make_scanline(left, right, 2, 16).unwrap();
        assert_eq!((s.x0, s.x1), (0, 4));
        assert!((s.start.color.r - 0.5).abs() < 1e-6);
        assert!((s.start.uv.x - 0.5).abs() < 1e-6);
    }
}
