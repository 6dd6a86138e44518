//! Per-pixel stage: depth test, perspective recovery and colour resolution
//! for one [`Scanline`].

use glam::Vec3;

use crate::{
    color::Color,
    raster::{target::FrameTarget, triangle::Scanline},
    scene::Texture,
    shader::{Fragment, Shader},
};

/// How a filled pixel gets its colour, after the render mode has been
/// reconciled with what the mesh actually has bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
    /// No fill at all (wireframe-only).
    None,
    /// Interpolated vertex colour.
    Color,
    /// Texture sample.
    Texture,
    /// Texture sample modulated by vertex colour.
    ColorTexture,
    /// Delegate to the bound [`Shader`].
    Shaded,
}

/// Everything the pixel loop needs besides the scanline itself.
#[derive(Clone, Copy)]
pub struct FillContext<'a> {
    pub mode: FillMode,
    pub texture: Option<&'a Texture>,
    pub shader: Option<&'a dyn Shader>,
    inv_width: f32,
    inv_height: f32,
}

impl<'a> FillContext<'a> {
    /// `mode` must already be resolved against `texture`/`shader`; the
    /// pixel loop treats a missing resource as "no colour".
    pub fn new(
        mode: FillMode,
        texture: Option<&'a Texture>,
        shader: Option<&'a dyn Shader>,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            mode,
            texture,
            shader,
            inv_width: 1.0 / width.max(1) as f32,
            inv_height: 1.0 / height.max(1) as f32,
        }
    }
}

/// Rasterise one row. The row lock is held for the whole pixel loop.
pub fn rasterize_scanline(target: &FrameTarget<'_>, scanline: &Scanline, ctx: &FillContext<'_>) {
    if ctx.mode == FillMode::None || scanline.y >= target.height() {
        return;
    }
    let mut row = target.lock_row(scanline.y);
    let mut cur = scanline.start;

    for x in scanline.x0..=scanline.x1 {
        let i = x as usize;
        let rhw = cur.rhw;
        if rhw >= row.depth[i] {
            let attrs = cur.attributes();
            let resolved = match ctx.mode {
                FillMode::Shaded => ctx.shader.and_then(|shader| {
                    shader.shade(&Fragment {
                        position: Vec3::new(
                            cur.pos.x * ctx.inv_width,
                            cur.pos.y * ctx.inv_height,
                            cur.pos.z,
                        ),
                        color: attrs.color,
                        normal: attrs.normal.normalize_or_zero(),
                        uv: attrs.uv,
                        texture: ctx.texture,
                    })
                }),
                FillMode::Texture => ctx.texture.map(|t| Color::from_rgb(t.sample(attrs.uv))),
                FillMode::ColorTexture => ctx
                    .texture
                    .map(|t| Color::from_rgb(t.sample(attrs.uv)) * attrs.color),
                FillMode::Color => Some(attrs.color),
                FillMode::None => None,
            };
            if let Some(color) = resolved {
                row.color[i] = color.to_rgb();
                row.depth[i] = rhw;
            }
        }
        cur += scanline.step;
    }
}
