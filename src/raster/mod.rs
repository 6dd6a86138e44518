//! The rasterisation core: everything between transformed vertices and
//! depth-tested pixels.

pub mod buffer;
pub mod clip;
pub mod line;
pub mod scanline;
pub mod target;
pub mod triangle;
pub mod vertex;

pub use buffer::FrameBuffer;
pub use clip::{ClipCode, Viewport, all_outside, screen_signed_area};
pub use line::{ClippedSegment, LineStyle, clip_segment, draw_line, draw_line_aa, draw_segment};
pub use scanline::{FillContext, FillMode, rasterize_scanline};
pub use target::{FrameTarget, Row};
pub use triangle::{Scanline, SplitTriangle, split_triangle};
pub use vertex::{Attributes, ScreenVertex};
