//! Interpolable screen-space vertex for triangle setup and scanline walks.

use std::ops::{Add, AddAssign, Mul, Sub};

use glam::{Vec2, Vec3};

use crate::color::Color;

/// Per-primitive working vertex walked across the screen.
///
/// `pos` is in screen space (`z` = post-divide depth). `color`, `uv` and
/// `normal` are stored **pre-multiplied by `rhw`** once [`ScreenVertex::new`]
/// has run: everything here is then affine in screen space, so the setup
/// and scanline stages may add, subtract, scale and lerp whole vertices and
/// only divide `rhw` back out per pixel ([`ScreenVertex::attributes`]).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenVertex {
    pub pos: Vec3,
    pub color: Color,
    pub uv: Vec2,
    pub normal: Vec3,
    /// `1 / w`; also the depth-buffer value (larger = nearer).
    pub rhw: f32,
}

/// Perspective-correct attributes at one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attributes {
    pub color: Color,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl ScreenVertex {
    /// Build from screen position, true attributes and clip-space `w`.
    pub fn new(pos: Vec3, color: Color, uv: Vec2, normal: Vec3, w: f32) -> Self {
        let rhw = 1.0 / w;
        Self {
            pos,
            color: color * rhw,
            uv: uv * rhw,
            normal: normal * rhw,
            rhw,
        }
    }

    /// Recover true attributes by dividing out the interpolated `rhw`.
    #[inline]
    pub fn attributes(&self) -> Attributes {
        let w = 1.0 / self.rhw;
        Attributes {
            color: self.color * w,
            uv: self.uv * w,
            normal: self.normal * w,
        }
    }

    #[inline]
    pub fn lerp(self, other: ScreenVertex, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Add for ScreenVertex {
    type Output = ScreenVertex;
    #[inline]
    fn add(self, o: ScreenVertex) -> ScreenVertex {
        ScreenVertex {
            pos: self.pos + o.pos,
            color: self.color + o.color,
            uv: self.uv + o.uv,
            normal: self.normal + o.normal,
            rhw: self.rhw + o.rhw,
        }
    }
}

impl Sub for ScreenVertex {
    type Output = ScreenVertex;
    #[inline]
    fn sub(self, o: ScreenVertex) -> ScreenVertex {
        ScreenVertex {
            pos: self.pos - o.pos,
            color: self.color - o.color,
            uv: self.uv - o.uv,
            normal: self.normal - o.normal,
            rhw: self.rhw - o.rhw,
        }
    }
}

impl Mul<f32> for ScreenVertex {
    type Output = ScreenVertex;
    #[inline]
    fn mul(self, k: f32) -> ScreenVertex {
        ScreenVertex {
            pos: self.pos * k,
            color: self.color * k,
            uv: self.uv * k,
            normal: self.normal * k,
            rhw: self.rhw * k,
        }
    }
}

impl AddAssign for ScreenVertex {
    #[inline]
    fn add_assign(&mut self, o: ScreenVertex) {
        *self = *self + o;
    }
}
