//! Homogeneous clip-space classification and the screen mapping.

use bitflags::bitflags;
use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

bitflags! {
    /// One bit per frustum plane a clip-space vertex lies outside of.
    ///
    /// Depth uses the `0 ..= w` convention of left-handed projections.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ClipCode: u8 {
        const NEAR   = 0b00_0001; // z < 0
        const FAR    = 0b00_0010; // z > w
        const LEFT   = 0b00_0100; // x < -w
        const RIGHT  = 0b00_1000; // x > w
        const BOTTOM = 0b01_0000; // y < -w
        const TOP    = 0b10_0000; // y > w
    }
}

impl ClipCode {
    /// Classify a clip-space position against the six planes.
    pub fn of(v: Vec4) -> Self {
        let w = v.w;
        let mut code = ClipCode::empty();
        code.set(ClipCode::NEAR, v.z < 0.0);
        code.set(ClipCode::FAR, v.z > w);
        code.set(ClipCode::LEFT, v.x < -w);
        code.set(ClipCode::RIGHT, v.x > w);
        code.set(ClipCode::BOTTOM, v.y < -w);
        code.set(ClipCode::TOP, v.y > w);
        code
    }

    #[inline]
    pub fn is_inside(self) -> bool {
        self.is_empty()
    }
}

/// True when every vertex is outside at least one plane: the coarse reject.
/// Partially visible primitives are kept as-is, never re-triangulated.
pub fn all_outside(codes: &[ClipCode]) -> bool {
    codes.iter().all(|c| !c.is_empty())
}

/// Maps normalised device coordinates onto a `width × height` pixel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Divide by `w` and map `x ∈ [-1,1] → [0,width]`, `y ∈ [-1,1] → [height,0]`.
    /// `z` keeps the post-divide depth.
    #[inline]
    pub fn to_screen(&self, clip: Vec4) -> Vec3 {
        let ndc = clip.xyz() / clip.w;
        Vec3::new(
            (ndc.x + 1.0) * self.width * 0.5,
            (1.0 - ndc.y) * self.height * 0.5,
            ndc.z,
        )
    }
}

/// Twice the signed area of a screen-space triangle, measured as displayed
/// (Y up). Positive means counter-clockwise on screen.
#[inline]
pub fn screen_signed_area(p0: Vec2, p1: Vec2, p2: Vec2) -> f32 {
    // Screen rows grow downward, so the usual perp-dot flips sign.
    -(p1 - p0).perp_dot(p2 - p0)
}
