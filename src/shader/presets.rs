//! Ready-made shaders: depth and normal visualisation plus the classic
//! directional-light models.

use glam::Vec3;

use super::{Fragment, Shader};
use crate::color::Color;

/// View direction rebuilt from the normalised screen position.
#[inline]
fn view_dir(pos: Vec3) -> Vec3 {
    Vec3::new(1.0 - 2.0 * pos.x, 2.0 * pos.y - 1.0, -pos.z).normalize_or_zero()
}

/// Greyscale depth: `near` maps to black, `far` to white.
#[derive(Clone, Copy, Debug)]
pub struct Depth {
    pub near: f32,
    pub far: f32,
}

impl Default for Depth {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: 1.0,
        }
    }
}

impl Shader for Depth {
    fn shade(&self, frag: &Fragment<'_>) -> Option<Color> {
        let span = self.far - self.near;
        let f = if span.abs() > f32::EPSILON {
            (frag.position.z - self.near) / span
        } else {
            0.0
        };
        Some(Color::WHITE * f)
    }
}

/// Normal as colour, with `z` flipped so surfaces facing the camera read blue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normal;

impl Shader for Normal {
    fn shade(&self, frag: &Fragment<'_>) -> Option<Color> {
        let n = frag.normal;
        Some(Color::new(n.x, n.y, -n.z))
    }
}

/// Diffuse-only directional light.
#[derive(Clone, Copy, Debug)]
pub struct Lambert {
    light_dir: Vec3,
    pub light_color: Color,
}

impl Lambert {
    pub fn new(light_dir: Vec3, light_color: Color) -> Self {
        Self {
            light_dir: light_dir.normalize_or_zero(),
            light_color,
        }
    }
}

impl Shader for Lambert {
    fn shade(&self, frag: &Fragment<'_>) -> Option<Color> {
        let diff = frag.normal.dot(self.light_dir).clamp(0.0, 1.0);
        Some(self.light_color * diff)
    }
}

/// Material terms shared by the Phong family.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub power: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::gray(0.1),
            diffuse: Color::gray(0.7),
            specular: Color::gray(0.5),
            power: 16.0,
        }
    }
}

/// Phong: specular from the reflected light vector.
#[derive(Clone, Copy, Debug)]
pub struct Phong {
    light_dir: Vec3,
    pub material: Material,
}

impl Phong {
    pub fn new(light_dir: Vec3, material: Material) -> Self {
        Self {
            light_dir: light_dir.normalize_or_zero(),
            material,
        }
    }
}

impl Shader for Phong {
    fn shade(&self, frag: &Fragment<'_>) -> Option<Color> {
        let n = frag.normal;
        let v = view_dir(frag.position);
        let diff = n.dot(self.light_dir).max(0.0);
        let reflected = (2.0 * diff * n - self.light_dir).normalize_or_zero();
        let spec = reflected.dot(v).max(0.0).powf(self.material.power);
        let m = &self.material;
        Some(m.ambient + m.diffuse * diff + m.specular * spec)
    }
}

/// Blinn-Phong: specular from the half vector.
#[derive(Clone, Copy, Debug)]
pub struct BlinnPhong {
    light_dir: Vec3,
    pub material: Material,
}

impl BlinnPhong {
    pub fn new(light_dir: Vec3, material: Material) -> Self {
        Self {
            light_dir: light_dir.normalize_or_zero(),
            material,
        }
    }

    /// Diffuse and specular factors for one fragment.
    fn terms(&self, frag: &Fragment<'_>) -> (f32, f32) {
        let n = frag.normal;
        let diff = n.dot(self.light_dir).max(0.0);
        let half = (self.light_dir + view_dir(frag.position)).normalize_or_zero();
        let spec = half.dot(n).max(0.0).powf(self.material.power);
        (diff, spec)
    }
}

impl Shader for BlinnPhong {
    fn shade(&self, frag: &Fragment<'_>) -> Option<Color> {
        let (diff, spec) = self.terms(frag);
        let m = &self.material;
        Some(m.ambient + m.diffuse * diff + m.specular * spec)
    }
}

/// Blinn-Phong with the diffuse term modulated by the bound texture.
/// Falls back to plain Blinn-Phong when the mesh has no texture.
#[derive(Clone, Copy, Debug)]
pub struct BlinnPhongTextured(pub BlinnPhong);

impl BlinnPhongTextured {
    pub fn new(light_dir: Vec3, material: Material) -> Self {
        Self(BlinnPhong::new(light_dir, material))
    }
}

impl Shader for BlinnPhongTextured {
    fn shade(&self, frag: &Fragment<'_>) -> Option<Color> {
        let (diff, spec) = self.0.terms(frag);
        let m = &self.0.material;
        let albedo = frag
            .texture
            .map_or(Color::WHITE, |t| Color::from_rgb(t.sample(frag.uv)));
        Some((m.ambient + m.diffuse * diff) * albedo + m.specular * spec)
    }
}
