//! CPU-only triangle and line rasteriser.
//!
//! Build a [`Scene`] out of [`Mesh`]es and [`LineSegment`]s, hand it to a
//! [`Pipeline`] and read back the packed `0x00RRGGBB` colour buffer.

pub mod color;
pub mod config;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod shader;

pub use color::Color;
pub use config::PipelineConfig;
pub use raster::{FrameBuffer, LineStyle};
pub use renderer::{
    ClearFlags, Pipeline, PipelineError, RenderMode, Renderer, RendererExt, Rgba,
};
pub use scene::{LineSegment, Mesh, Primitive, Scene, Texture, TextureError, Vertex};
pub use shader::{Fragment, Shader};
