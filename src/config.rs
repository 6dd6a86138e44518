//! Construction-time settings for a [`Pipeline`](crate::Pipeline).

use crate::{
    color::Color,
    raster::LineStyle,
    renderer::{ClearFlags, RenderMode},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    pub width: usize,
    pub height: usize,
    pub clear_color: Color,
    /// Recorded for callers; both buffers are cleared every frame anyway.
    pub clear: ClearFlags,
    pub mode: RenderMode,
    pub line_style: LineStyle,
    /// `false` runs every loop on the calling thread.
    pub parallel: bool,
    /// `None` uses rayon's global pool, `Some(n)` builds a dedicated one.
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
            clear_color: Color::BLACK,
            clear: ClearFlags::COLOR_DEPTH,
            mode: RenderMode::WIREFRAME,
            line_style: LineStyle::Antialiased,
            parallel: true,
            threads: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_clear(mut self, clear: ClearFlags) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_line_style(mut self, style: LineStyle) -> Self {
        self.line_style = style;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}
