//! Per-pixel shading.
//!
//! The scanline loop owns interpolation and the depth test; a [`Shader`]
//! only turns one perspective-corrected [`Fragment`] into a colour, or
//! rejects it.

pub mod presets;

use glam::{Vec2, Vec3};

use crate::{color::Color, scene::Texture};

pub use presets::{BlinnPhong, BlinnPhongTextured, Depth, Lambert, Normal, Phong};

/// Inputs handed to [`Shader::shade`] for one pixel.
#[derive(Clone, Copy, Debug)]
pub struct Fragment<'a> {
    /// `x`, `y` normalised to `[0, 1]` over the target; `z` is NDC depth.
    pub position: Vec3,
    pub color: Color,
    /// Unit length, or zero when the interpolated normal vanished.
    pub normal: Vec3,
    pub uv: Vec2,
    pub texture: Option<&'a Texture>,
}

/// Pluggable pixel colour computation.
///
/// Must be pure: called from many worker threads at once, in no particular
/// order. Returning `None` discards the pixel, leaving colour and depth as
/// they were.
pub trait Shader: Send + Sync {
    fn shade(&self, frag: &Fragment<'_>) -> Option<Color>;
}

impl<F> Shader for F
where
    F: Fn(&Fragment<'_>) -> Option<Color> + Send + Sync,
{
    fn shade(&self, frag: &Fragment<'_>) -> Option<Color> {
        self(frag)
    }
}

/// Pins a closure's signature so it can be used as a [`Shader`].
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(&Fragment<'_>) -> Option<Color> + Send + Sync,
{
    f
}
