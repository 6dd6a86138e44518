// CPU-side texture storage and the sampling contract used by the fill stage
// and by texture-aware shaders. Decoding image files is the caller's job.

use crate::{color::Color, raster::FrameBuffer, renderer::Rgba};

/// Row-major `0x00RRGGBB` texels.
///
/// Meshes hold textures behind `Arc`, so one texture can be shared by many
/// meshes and frames without the pipeline owning it.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    texels: FrameBuffer<Rgba>,
}

/// Things that can go wrong when building a texture.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Width or height is zero.
    #[error("texture must be at least 1×1, got {width}×{height}")]
    ZeroSize { width: usize, height: usize },

    /// Pixel vector does not hold `width * height` texels.
    #[error("expected {expected} texels, got {got}")]
    SizeMismatch { expected: usize, got: usize },
}

impl Texture {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    pub fn new(width: usize, height: usize, pixels: Vec<Rgba>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSize { width, height });
        }
        let got = pixels.len();
        FrameBuffer::from_vec(width, height, pixels)
            .map(|texels| Self { texels })
            .ok_or(TextureError::SizeMismatch {
                expected: width * height,
                got,
            })
    }

    /// Single-colour texture.
    pub fn solid(width: usize, height: usize, color: Color) -> Result<Self, TextureError> {
        Self::new(width, height, vec![color.to_rgb(); width * height])
    }

    /// Checkerboard of `cell × cell` squares alternating `a` / `b`.
    pub fn checkerboard(
        width: usize,
        height: usize,
        cell: usize,
        a: Color,
        b: Color,
    ) -> Result<Self, TextureError> {
        let cell = cell.max(1);
        let (a, b) = (a.to_rgb(), b.to_rgb());
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| if (x / cell + y / cell) % 2 == 0 { a } else { b })
            .collect();
        Self::new(width, height, pixels)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn width(&self) -> usize {
        self.texels.width()
    }
    pub fn height(&self) -> usize {
        self.texels.height()
    }

    /// Texel at integer coordinates.
    pub fn texel(&self, x: usize, y: usize) -> Rgba {
        self.texels.get(x, y)
    }

    /// Nearest-texel lookup. Both components wrap into `[0, 1)` first, so
    /// textures tile.
    pub fn sample(&self, uv: glam::Vec2) -> Rgba {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);
        // `rem_euclid` can round up to exactly 1.0 for tiny negative input.
        let x = ((u * self.width() as f32) as usize).min(self.width() - 1);
        let y = ((v * self.height() as f32) as usize).min(self.height() - 1);
        self.texels.get(x, y)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
