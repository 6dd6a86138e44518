use std::{fmt, sync::Arc};

use glam::{Vec2, Vec3};

use crate::{color::Color, scene::Texture, shader::Shader};

/// Model-space vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Color,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, color: Color, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            color,
            uv,
            normal,
        }
    }

    /// Position + colour only; zero uv and normal.
    pub fn colored(position: Vec3, color: Color) -> Self {
        Self {
            position,
            color,
            ..Self::default()
        }
    }
}

/// Three indices into the owning mesh's vertex list.
///
/// `face_normal`, when set, replaces the three vertex normals so a face can
/// be shaded flat without duplicating vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    pub indices: [usize; 3],
    pub face_normal: Option<Vec3>,
}

impl Primitive {
    pub const fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            indices: [a, b, c],
            face_normal: None,
        }
    }

    pub fn with_face_normal(mut self, normal: Vec3) -> Self {
        self.face_normal = Some(normal);
        self
    }
}

/// Triangle mesh plus the optional resources its pixels may use.
///
/// Meshes are read-only to the pipeline and are normally shared via `Arc`
/// across frames and scenes.
#[derive(Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub primitives: Vec<Primitive>,
    pub texture: Option<Arc<Texture>>,
    pub shader: Option<Arc<dyn Shader>>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, primitives: Vec<Primitive>) -> Self {
        Self {
            vertices,
            primitives,
            texture: None,
            shader: None,
        }
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_shader(mut self, shader: Arc<dyn Shader>) -> Self {
        self.shader = Some(shader);
        self
    }

    /// True when every primitive index points inside `vertices`.
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.vertices.len();
        self.primitives
            .iter()
            .all(|p| p.indices.iter().all(|&i| i < n))
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.vertices.len())
            .field("primitives", &self.primitives.len())
            .field("texture", &self.texture.is_some())
            .field("shader", &self.shader.is_some())
            .finish()
    }
}

/// Endpoint of a scene line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineVertex {
    pub position: Vec3,
    pub color: Color,
}

/// World-space line segment; colour is interpolated between the ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub ends: [LineVertex; 2],
}

impl LineSegment {
    pub fn new(a: Vec3, b: Vec3, color: Color) -> Self {
        Self::gradient(a, color, b, color)
    }

    pub fn gradient(a: Vec3, color_a: Color, b: Vec3, color_b: Color) -> Self {
        Self {
            ends: [
                LineVertex {
                    position: a,
                    color: color_a,
                },
                LineVertex {
                    position: b,
                    color: color_b,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_bounds_check() {
        let verts = vec![Vertex::default(); 3];
        let ok = Mesh::new(verts.clone(), vec![Primitive::new(0, 1, 2)]);
        let bad = Mesh::new(verts, vec![Primitive::new(0, 1, 3)]);
        assert!(ok.indices_in_bounds());
        assert!(!bad.indices_in_bounds());
    }

    #[test]
    fn face_normal_override() {
        let p = Primitive::new(0, 1, 2).with_face_normal(Vec3::Y);
        assert_eq!(p.face_normal, Some(Vec3::Y));
        assert_eq!(Primitive::new(0, 1, 2).face_normal, None);
    }
}
