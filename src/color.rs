//! Floating-point RGB colour used for every interpolation in the pipeline.
//!
//! Channels are nominally in `0.0 ..= 1.0` but are allowed to leave that
//! range while being interpolated or lit; they are clamped only when packed
//! into a frame-buffer cell.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub, SubAssign};

use crate::renderer::Rgba;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Same value in all three channels.
    #[inline]
    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Build from 8-bit channels.
    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        const S: f32 = 1.0 / 255.0;
        Self::new(r as f32 * S, g as f32 * S, b as f32 * S)
    }

    /// Unpack a `0x00RRGGBB` cell. The top byte is ignored.
    #[inline]
    pub fn from_rgb(px: Rgba) -> Self {
        Self::from_bytes((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }

    /// Pack into `0x00RRGGBB`, rounding to nearest and clamping every channel.
    #[inline]
    pub fn to_rgb(self) -> Rgba {
        let r = channel_to_byte(self.r);
        let g = channel_to_byte(self.g);
        let b = channel_to_byte(self.b);
        (r << 16) | (g << 8) | b
    }

    /// `self * (1 - t) + other * t`
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

#[inline]
fn channel_to_byte(c: f32) -> u32 {
    // NaN saturates to 0 through the `as` cast.
    (c * 255.0 + 0.5).clamp(0.0, 255.0) as u32
}

impl Add for Color {
    type Output = Color;
    #[inline]
    fn add(self, o: Color) -> Color {
        Color::new(self.r + o.r, self.g + o.g, self.b + o.b)
    }
}

impl Sub for Color {
    type Output = Color;
    #[inline]
    fn sub(self, o: Color) -> Color {
        Color::new(self.r - o.r, self.g - o.g, self.b - o.b)
    }
}

/// Channel-wise modulation.
impl Mul for Color {
    type Output = Color;
    #[inline]
    fn mul(self, o: Color) -> Color {
        Color::new(self.r * o.r, self.g * o.g, self.b * o.b)
    }
}

impl Mul<f32> for Color {
    type Output = Color;
    #[inline]
    fn mul(self, k: f32) -> Color {
        Color::new(self.r * k, self.g * k, self.b * k)
    }
}

impl Mul<Color> for f32 {
    type Output = Color;
    #[inline]
    fn mul(self, c: Color) -> Color {
        c * self
    }
}

impl Div<f32> for Color {
    type Output = Color;
    #[inline]
    fn div(self, k: f32) -> Color {
        self * (1.0 / k)
    }
}

impl AddAssign for Color {
    #[inline]
    fn add_assign(&mut self, o: Color) {
        *self = *self + o;
    }
}

impl SubAssign for Color {
    #[inline]
    fn sub_assign(&mut self, o: Color) {
        *self = *self - o;
    }
}

impl MulAssign<f32> for Color {
    #[inline]
    fn mul_assign(&mut self, k: f32) {
        *self = *self * k;
    }
}

impl MulAssign for Color {
    #[inline]
    fn mul_assign(&mut self, o: Color) {
        *self = *self * o;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pack_rounds_and_clamps() {
        assert_eq!(Color::RED.to_rgb(), 0x00_FF0000);
        assert_eq!(Color::new(0.5, 0.5, 0.5).to_rgb(), 0x00_808080);
        assert_eq!(Color::new(2.0, -1.0, f32::NAN).to_rgb(), 0x00_FF0000);
    }

    #[test]
    fn unpack_ignores_top_byte() {
        let c = Color::from_rgb(0xFF_00FF00);
        assert_eq!(c, Color::GREEN);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Color::RED;
        let b = Color::BLUE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let m = a.lerp(b, 0.5);
        assert_relative_eq!(m.r, 0.5);
        assert_relative_eq!(m.g, 0.0);
        assert_relative_eq!(m.b, 0.5);
    }
}
