//! ---------------------------------------------------------------------------
//! Per-frame driver
//!
//! * Owns the colour and depth buffers and clears both every frame.
//! * Fills all meshes first, then draws every wireframe edge, then the scene
//!   lines, so edges always land on top of any fill.
//! * Each pass is data-parallel over primitives (or lines) through an
//!   [`Executor`]; workers only meet inside [`FrameTarget`]'s row locks.
//! ---------------------------------------------------------------------------

use glam::{Mat3, Mat4, Vec3, Vec4};
use log::{debug, trace, warn};

use crate::{
    color::Color,
    config::PipelineConfig,
    raster::{
        ClipCode, FillContext, FillMode, FrameBuffer, FrameTarget, LineStyle, ScreenVertex,
        Viewport, all_outside, draw_segment, rasterize_scanline, screen_signed_area,
        split_triangle,
    },
    renderer::{ClearFlags, Executor, RenderMode, Renderer, Rgba},
    scene::{LineSegment, Mesh, Primitive, Scene},
};

/// Vertices closer to the eye plane than this are never divided by `w`.
const W_EPSILON: f32 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("render target must be at least 1×1, got {width}×{height}")]
    ZeroSize { width: usize, height: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/*───────────────────────────────────────────────────────────────────────*/
/*                              Pipeline                                */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    color: FrameBuffer<Rgba>,
    depth: FrameBuffer<f32>,
    exec: Executor,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        check_size(config.width, config.height)?;
        let exec = match (config.parallel, config.threads) {
            (false, _) => Executor::Sequential,
            (true, None) => Executor::Global,
            (true, Some(n)) => Executor::Pool(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("raster-{i}"))
                    .build()?,
            ),
        };
        debug!(
            "pipeline {}×{} mode={:?} lines={:?} exec={exec:?} workers={}",
            config.width,
            config.height,
            config.mode,
            config.line_style,
            exec.threads()
        );
        Ok(Self {
            color: FrameBuffer::filled(config.width, config.height, config.clear_color.to_rgb()),
            depth: FrameBuffer::filled(config.width, config.height, 0.0),
            config,
            exec,
        })
    }

    /*──────────────────────── settings ────────────────────────*/

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn render_mode(&self) -> RenderMode {
        self.config.mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.config.mode = mode;
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.config.clear_color = color;
    }

    pub fn set_clear_flags(&mut self, clear: ClearFlags) {
        self.config.clear = clear;
    }

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.config.line_style = style;
    }

    /// Reallocate both buffers. Contents are reset to the clear state.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), PipelineError> {
        check_size(width, height)?;
        if (width, height) != (self.width(), self.height()) {
            debug!("resize {}×{} → {width}×{height}", self.width(), self.height());
            self.config.width = width;
            self.config.height = height;
            self.color.resize(width, height, 0);
            self.depth.resize(width, height, 0.0);
        }
        self.clear();
        Ok(())
    }

    /*──────────────────────── buffers ────────────────────────*/

    pub fn width(&self) -> usize {
        self.color.width()
    }

    pub fn height(&self) -> usize {
        self.color.height()
    }

    /// Workers the primitive and line loops run on.
    pub fn threads(&self) -> usize {
        self.exec.threads()
    }

    pub fn color_buffer(&self) -> &FrameBuffer<Rgba> {
        &self.color
    }

    /// Stored `rhw` per pixel; 0 means nothing was drawn.
    pub fn depth_buffer(&self) -> &FrameBuffer<f32> {
        &self.depth
    }

    /// Reset colour to the clear colour and depth to "infinitely far".
    ///
    /// Both buffers are always cleared, whatever [`ClearFlags`] says.
    pub fn clear(&mut self) {
        let flags = self.config.clear | ClearFlags::COLOR_DEPTH;
        if flags.contains(ClearFlags::COLOR) {
            self.color.fill(self.config.clear_color.to_rgb());
        }
        if flags.contains(ClearFlags::DEPTH) {
            self.depth.fill(0.0);
        }
    }

    /// Clear, then draw `scene` into the owned buffers.
    pub fn render(&mut self, scene: &Scene) {
        self.clear();
        self.draw(scene);
    }

    /*──────────────────────── frame ────────────────────────*/

    fn draw(&mut self, scene: &Scene) {
        let Self {
            config,
            color,
            depth,
            exec,
        } = self;
        let config: &PipelineConfig = config;
        let (width, height) = (color.width(), color.height());
        let viewport = Viewport::new(width, height);
        let target = FrameTarget::new(color, depth);
        let view_proj = scene.projection() * scene.view();

        trace!(
            "frame: {} meshes, {} lines, mode={:?}",
            scene.meshes().len(),
            scene.lines().len(),
            config.mode
        );

        let passes: Vec<MeshPass<'_>> = scene
            .meshes()
            .iter()
            .map(|(mesh, model)| {
                MeshPass::new(mesh, view_proj * *model, scene.view() * *model, viewport, config)
            })
            .collect();

        for pass in passes.iter().filter(|p| p.fill.mode != FillMode::None) {
            exec.for_each(&pass.mesh.primitives, |prim| pass.fill_primitive(&target, prim));
        }

        if config.mode.contains(RenderMode::WIREFRAME) {
            for pass in &passes {
                exec.for_each(&pass.mesh.primitives, |prim| {
                    pass.edges(&target, prim, config.line_style)
                });
            }
        }

        exec.for_each(scene.lines(), |line| {
            draw_scene_line(&target, line, view_proj, viewport, config.line_style)
        });
    }
}

fn check_size(width: usize, height: usize) -> Result<(), PipelineError> {
    if width == 0 || height == 0 {
        return Err(PipelineError::ZeroSize { width, height });
    }
    Ok(())
}

/*──────────────────────── Renderer trait impl ────────────────────────*/

impl Renderer for Pipeline {
    fn begin_frame(&mut self, width: usize, height: usize) {
        if let Err(e) = self.resize(width, height) {
            warn!("{e}; keeping {}×{}", self.width(), self.height());
            self.clear();
        }
    }

    fn draw_scene(&mut self, scene: &Scene) {
        self.draw(scene);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(self.color.as_slice(), self.width(), self.height());
    }
}

/*───────────────────────────────────────────────────────────────────────*/
/*                              Mesh pass                               */
/*───────────────────────────────────────────────────────────────────────*/

/// One mesh vertex after the clip stage.
#[derive(Clone, Copy)]
struct Projected {
    clip: Vec4,
    code: ClipCode,
    /// Only meaningful when `clip.w > W_EPSILON`.
    screen: Vec3,
}

/// Per-mesh state shared by every primitive job of a frame.
struct MeshPass<'a> {
    mesh: &'a Mesh,
    projected: Vec<Projected>,
    /// Inverse-transpose of model-view, for normals.
    normal_matrix: Mat3,
    fill: FillContext<'a>,
}

impl<'a> MeshPass<'a> {
    fn new(
        mesh: &'a Mesh,
        mvp: Mat4,
        model_view: Mat4,
        viewport: Viewport,
        config: &PipelineConfig,
    ) -> Self {
        debug_assert!(mesh.indices_in_bounds(), "primitive index out of range");

        let projected = mesh
            .vertices
            .iter()
            .map(|v| {
                let clip = mvp * v.position.extend(1.0);
                let screen = if clip.w > W_EPSILON {
                    viewport.to_screen(clip)
                } else {
                    Vec3::ZERO
                };
                Projected {
                    clip,
                    code: ClipCode::of(clip),
                    screen,
                }
            })
            .collect();

        let mv = Mat3::from_mat4(model_view);
        let normal_matrix = if mv.determinant().abs() > f32::EPSILON {
            mv.inverse().transpose()
        } else {
            mv
        };

        let (has_texture, has_shader) = (mesh.texture.is_some(), mesh.shader.is_some());
        let mode = config.mode.fill(has_texture, has_shader);
        if (config.mode.contains(RenderMode::SHADING) && !has_shader)
            || (config.mode.contains(RenderMode::TEXTURE) && !has_texture && mode != FillMode::Shaded)
        {
            debug!("{:?} downgraded to {mode:?} for {mesh:?}", config.mode);
        }

        Self {
            mesh,
            projected,
            normal_matrix,
            fill: FillContext::new(
                mode,
                mesh.texture.as_deref(),
                mesh.shader.as_deref(),
                config.width,
                config.height,
            ),
        }
    }

    #[inline]
    fn corners(&self, prim: &Primitive) -> [Projected; 3] {
        prim.indices.map(|i| self.projected[i])
    }

    /// Clip → backface cull → setup → scanlines. Only triangles with all
    /// three vertices inside the frustum are filled.
    fn fill_primitive(&self, target: &FrameTarget<'_>, prim: &Primitive) {
        let p = self.corners(prim);
        if !p.iter().all(|v| v.code.is_inside() && v.clip.w > W_EPSILON) {
            return;
        }
        let area = screen_signed_area(
            p[0].screen.truncate(),
            p[1].screen.truncate(),
            p[2].screen.truncate(),
        );
        if area <= 0.0 {
            return;
        }

        let [a, b, c] = [0, 1, 2].map(|k| {
            let v = &self.mesh.vertices[prim.indices[k]];
            let normal = self.normal_matrix * prim.face_normal.unwrap_or(v.normal);
            ScreenVertex::new(p[k].screen, v.color, v.uv, normal, p[k].clip.w)
        });
        if let Some(split) = split_triangle(a, b, c) {
            split.for_each_scanline(target.width(), target.height(), |line| {
                rasterize_scanline(target, &line, &self.fill)
            });
        }
    }

    /// Three edges in vertex colour, for any primitive not fully outside.
    fn edges(&self, target: &FrameTarget<'_>, prim: &Primitive, style: LineStyle) {
        let p = self.corners(prim);
        if all_outside(&p.map(|v| v.code)) {
            return;
        }
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            if p[i].clip.w <= W_EPSILON || p[j].clip.w <= W_EPSILON {
                continue;
            }
            let (ci, cj) = (
                self.mesh.vertices[prim.indices[i]].color,
                self.mesh.vertices[prim.indices[j]].color,
            );
            draw_segment(
                target,
                style,
                p[i].screen.truncate(),
                p[j].screen.truncate(),
                ci,
                cj,
            );
        }
    }
}

fn draw_scene_line(
    target: &FrameTarget<'_>,
    line: &LineSegment,
    view_proj: Mat4,
    viewport: Viewport,
    style: LineStyle,
) {
    let [a, b] = line.ends;
    let clip = [a, b].map(|e| view_proj * e.position.extend(1.0));
    if all_outside(&clip.map(ClipCode::of)) || clip.iter().any(|c| c.w <= W_EPSILON) {
        return;
    }
    draw_segment(
        target,
        style,
        viewport.to_screen(clip[0]).truncate(),
        viewport.to_screen(clip[1]).truncate(),
        a.color,
        b.color,
    );
}
