//! Per-frame input to the pipeline: meshes with their model matrices, world
//! lines and the camera transforms.

mod mesh;
pub mod shapes;
mod texture;

use std::sync::Arc;

use glam::{Mat4, Vec3};

pub use mesh::{LineSegment, LineVertex, Mesh, Primitive, Vertex};
pub use texture::{Texture, TextureError};

/// Scene container. Read-only while a frame renders.
///
/// Matrices follow glam's column-vector convention: a point goes through
/// `projection * view * model * p`.
#[derive(Clone, Debug)]
pub struct Scene {
    meshes: Vec<(Arc<Mesh>, Mat4)>,
    lines: Vec<LineSegment>,
    view: Mat4,
    projection: Mat4,
    /// Model matrix given to meshes added with [`Scene::add_mesh`].
    current_model: Mat4,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            lines: Vec::new(),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            current_model: Mat4::IDENTITY,
        }
    }

    /*──────────────────────── camera ────────────────────────*/

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Left-handed perspective with depth mapped to `0..=w`.
    pub fn set_perspective(&mut self, fov_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Mat4::perspective_lh(fov_degrees.to_radians(), aspect, near, far);
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /*──────────────────────── model stack ────────────────────────*/

    /// Model matrix that the next [`Scene::add_mesh`] will use.
    pub fn model(&self) -> Mat4 {
        self.current_model
    }

    /// Each helper appends a transform that applies *after* the current one.
    pub fn translate(&mut self, offset: Vec3) {
        self.current_model = Mat4::from_translation(offset) * self.current_model;
    }

    pub fn scale(&mut self, factor: Vec3) {
        self.current_model = Mat4::from_scale(factor) * self.current_model;
    }

    pub fn rotate(&mut self, axis: Vec3, degrees: f32) {
        let rot = Mat4::from_axis_angle(axis.normalize_or_zero(), degrees.to_radians());
        self.current_model = rot * self.current_model;
    }

    /*──────────────────────── contents ────────────────────────*/

    pub fn add_mesh(&mut self, mesh: Arc<Mesh>) {
        self.meshes.push((mesh, self.current_model));
    }

    pub fn add_mesh_with(&mut self, mesh: Arc<Mesh>, model: Mat4) {
        self.meshes.push((mesh, model));
    }

    pub fn add_line(&mut self, line: LineSegment) {
        self.lines.push(line);
    }

    pub fn extend_lines(&mut self, lines: impl IntoIterator<Item = LineSegment>) {
        self.lines.extend(lines);
    }

    pub fn meshes(&self) -> &[(Arc<Mesh>, Mat4)] {
        &self.meshes
    }

    pub fn lines(&self) -> &[LineSegment] {
        &self.lines
    }

    /// Drop all contents and reset every matrix to identity.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
