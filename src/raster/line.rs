//! Line rasterisation: Liang–Barsky clipping against the target rectangle,
//! then either an integer error-accumulator stepper or Xiaolin Wu's
//! antialiased algorithm.
//!
//! Both draw through [`FrameTarget`], one row lock per pixel, so edges drawn
//! by different workers can safely land on the same rows. Lines are not depth
//! tested.

use glam::Vec2;

use crate::{color::Color, raster::target::FrameTarget};

/// Which line algorithm the pipeline uses for wireframe edges and scene lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineStyle {
    /// Integer stepper, hard pixel edges.
    Stepped,
    /// Coverage-weighted blending against existing pixels.
    #[default]
    Antialiased,
}

/// Segment endpoints that survived clipping, with the parametric positions
/// (in the unclipped `0..=1` range) they were cut at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClippedSegment {
    pub p0: Vec2,
    pub p1: Vec2,
    pub t0: f32,
    pub t1: f32,
}

/// Liang–Barsky clip of `p0 → p1` against `min ..= max`.
///
/// Returns `None` when the segment misses the rectangle.
pub fn clip_segment(p0: Vec2, p1: Vec2, min: Vec2, max: Vec2) -> Option<ClippedSegment> {
    let d = p1 - p0;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;

    // (p, q) per half-plane: left, right, bottom, top.
    let planes = [
        (-d.x, p0.x - min.x),
        (d.x, max.x - p0.x),
        (-d.y, p0.y - min.y),
        (d.y, max.y - p0.y),
    ];

    for (p, q) in planes {
        if p == 0.0 {
            // Parallel to this edge: either fully inside its half-plane or gone.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some(ClippedSegment {
        p0: p0 + d * t0,
        p1: p0 + d * t1,
        t0,
        t1,
    })
}

/// Clip to the target and interpolate the endpoint colours at the cut points.
fn clip_to_target(
    target: &FrameTarget<'_>,
    p0: Vec2,
    p1: Vec2,
    c0: Color,
    c1: Color,
) -> Option<(Vec2, Vec2, Color, Color)> {
    if target.width() == 0 || target.height() == 0 || (p1 - p0).length_squared() < 1e-12 {
        return None;
    }
    let max = Vec2::new(target.width() as f32 - 1.0, target.height() as f32 - 1.0);
    let seg = clip_segment(p0, p1, Vec2::ZERO, max)?;
    Some((seg.p0, seg.p1, c0.lerp(c1, seg.t0), c0.lerp(c1, seg.t1)))
}

/// Dispatch on [`LineStyle`].
pub fn draw_segment(
    target: &FrameTarget<'_>,
    style: LineStyle,
    p0: Vec2,
    p1: Vec2,
    c0: Color,
    c1: Color,
) {
    match style {
        LineStyle::Stepped => draw_line(target, p0, p1, c0, c1),
        LineStyle::Antialiased => draw_line_aa(target, p0, p1, c0, c1),
    }
}

/// Integer stepper with linear colour interpolation.
///
/// Axis-aligned and exact-diagonal lines take a direct path; everything
/// else steps the major axis by one pixel and the minor axis whenever the
/// accumulated error passes the major delta.
pub fn draw_line(target: &FrameTarget<'_>, p0: Vec2, p1: Vec2, c0: Color, c1: Color) {
    let Some((a, b, mut c0, mut c1)) = clip_to_target(target, p0, p1, c0, c1) else {
        return;
    };
    let (mut x0, mut y0) = (a.x as i32, a.y as i32);
    let (mut x1, mut y1) = (b.x as i32, b.y as i32);

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();

    if dx == 0 && dy == 0 {
        target.plot(x0, y0, (c0 + c1) * 0.5);
        return;
    }

    if dx >= dy {
        if x1 < x0 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut c0, &mut c1);
        }
        let step_y = (y1 - y0).signum();
        let dc = (c1 - c0) / dx as f32;
        let mut c = c0;
        let mut y = y0;
        // Straight and 45° lines never need the accumulator.
        if dy == 0 || dy == dx {
            for x in x0..=x1 {
                target.plot(x, y, c);
                y += if dy == 0 { 0 } else { step_y };
                c += dc;
            }
            return;
        }
        let mut err = dx / 2;
        for x in x0..=x1 {
            target.plot(x, y, c);
            err += dy;
            if err >= dx {
                err -= dx;
                y += step_y;
            }
            c += dc;
        }
    } else {
        if y1 < y0 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut c0, &mut c1);
        }
        let step_x = (x1 - x0).signum();
        let dc = (c1 - c0) / dy as f32;
        let mut c = c0;
        let mut x = x0;
        if dx == 0 {
            for y in y0..=y1 {
                target.plot(x, y, c);
                c += dc;
            }
            return;
        }
        let mut err = dy / 2;
        for y in y0..=y1 {
            target.plot(x, y, c);
            err += dx;
            if err >= dy {
                err -= dy;
                x += step_x;
            }
            c += dc;
        }
    }
}

#[inline]
fn fract(v: f32) -> f32 {
    v - v.floor()
}

/// Xiaolin Wu's antialiased line.
///
/// Each column along the major axis splits the line colour between the two
/// pixels bracketing the exact intercept, weighted by the intercept's
/// fractional part, and blends it over whatever the target already holds.
pub fn draw_line_aa(target: &FrameTarget<'_>, p0: Vec2, p1: Vec2, c0: Color, c1: Color) {
    let Some((a, b, mut c0, mut c1)) = clip_to_target(target, p0, p1, c0, c1) else {
        return;
    };
    let (mut x0, mut y0, mut x1, mut y1) = (a.x, a.y, b.x, b.y);

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
        std::mem::swap(&mut c0, &mut c1);
    }

    // Swap back to (x, y) when plotting a steep line.
    let blend = |major: i32, minor: i32, color: Color, alpha: f32| {
        if steep {
            target.blend(minor, major, color, alpha);
        } else {
            target.blend(major, minor, color, alpha);
        }
    };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx == 0.0 { 1.0 } else { dy / dx };

    // first endpoint
    let x_end = x0.round();
    let y_end = y0 + gradient * (x_end - x0);
    let x_gap = 1.0 - fract(x0 + 0.5);
    let xpxl1 = x_end as i32;
    let ypxl1 = y_end.floor() as i32;
    blend(xpxl1, ypxl1, c0, (1.0 - fract(y_end)) * x_gap);
    blend(xpxl1, ypxl1 + 1, c0, fract(y_end) * x_gap);
    let mut intery = y_end + gradient;

    // second endpoint
    let x_end = x1.round();
    let y_end = y1 + gradient * (x_end - x1);
    let x_gap = fract(x1 + 0.5);
    let xpxl2 = x_end as i32;
    let ypxl2 = y_end.floor() as i32;
    if xpxl2 != xpxl1 {
        blend(xpxl2, ypxl2, c1, (1.0 - fract(y_end)) * x_gap);
        blend(xpxl2, ypxl2 + 1, c1, fract(y_end) * x_gap);
    }

    // interior columns
    let columns = xpxl2 - xpxl1;
    if columns < 2 {
        return;
    }
    let dc = (c1 - c0) / columns as f32;
    let mut c = c0 + dc;
    for x in xpxl1 + 1..xpxl2 {
        let y = intery.floor() as i32;
        let f = fract(intery);
        blend(x, y, c, 1.0 - f);
        blend(x, y + 1, c, f);
        intery += gradient;
        c += dc;
    }
}
