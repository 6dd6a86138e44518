//! Rendering abstraction layer.
//!
//! *Callers never touch a pixel buffer directly.* They describe a frame as a
//! [`Scene`] and hand it to a type that implements [`Renderer`], which
//! loans the finished buffer back once per frame.
//!
//! A blanket-impl [`RendererExt`] adds `draw_frame` so call-sites stay short.

mod executor;
mod pipeline;

use bitflags::bitflags;

use crate::{raster::FillMode, scene::Scene};

pub use executor::Executor;
pub use pipeline::{Pipeline, PipelineError};

/// Pixel format of the colour buffer (0x00RRGGBB).
pub type Rgba = u32;

bitflags! {
    /// Independently combinable render modes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderMode: u8 {
        /// Triangle edges, drawn after any fill.
        const WIREFRAME = 1 << 0;
        /// Interpolated vertex colour.
        const COLOR = 1 << 1;
        /// Texture sample.
        const TEXTURE = 1 << 2;
        const COLOR_TEXTURE = Self::COLOR.bits() | Self::TEXTURE.bits();
        /// Delegate pixels to the mesh's shader.
        const SHADING = 1 << 3;
    }
}

impl RenderMode {
    /// Resolve the fill for one mesh, downgrading bits whose resource is
    /// missing: no shader drops SHADING, no texture drops TEXTURE to COLOR.
    /// SHADING alone with no shader falls back to TEXTURE, then COLOR.
    pub fn fill(self, has_texture: bool, has_shader: bool) -> FillMode {
        if self.contains(Self::SHADING) && has_shader {
            return FillMode::Shaded;
        }
        let mut mode = self.difference(Self::WIREFRAME);
        if mode.contains(Self::SHADING) {
            mode.remove(Self::SHADING);
            if mode.is_empty() {
                mode = Self::TEXTURE;
            }
        }
        if mode.contains(Self::TEXTURE) && !has_texture {
            mode.remove(Self::TEXTURE);
            mode.insert(Self::COLOR);
        }
        match (mode.contains(Self::COLOR), mode.contains(Self::TEXTURE)) {
            (true, true) => FillMode::ColorTexture,
            (false, true) => FillMode::Texture,
            (true, false) => FillMode::Color,
            (false, false) => FillMode::None,
        }
    }
}

bitflags! {
    /// Which buffers `begin_frame` is asked to clear.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const COLOR_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

/// A renderer that owns its frame buffers.
///
/// `end_frame` hands the finished colour buffer to a user-supplied closure.
/// Windowed callers forward it to their window manager; tests inspect it.
pub trait Renderer {
    /// (Re)allocate for the requested resolution and clear.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise every mesh and line of `scene` into the internal buffers.
    fn draw_scene(&mut self, scene: &Scene);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// `submit(&[Rgba], w, h)` runs exactly once per frame.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, scene: &Scene, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_scene(scene);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
