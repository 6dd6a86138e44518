//! Small built-in meshes for demos, benches and tests.

use glam::{Vec2, Vec3};

use super::{LineSegment, Mesh, Primitive, Vertex};
use crate::color::Color;

/// Unit right triangle in the `z = 0` plane: red at the origin, green on
/// `+x`, blue on `+y`. Counter-clockwise as seen from `-z`.
pub fn rgb_triangle() -> Mesh {
    let n = Vec3::NEG_Z;
    Mesh::new(
        vec![
            Vertex::new(Vec3::ZERO, Color::RED, Vec2::new(0.0, 1.0), n),
            Vertex::new(Vec3::X, Color::GREEN, Vec2::new(1.0, 1.0), n),
            Vertex::new(Vec3::Y, Color::BLUE, Vec2::new(0.0, 0.0), n),
        ],
        vec![Primitive::new(0, 1, 2)],
    )
}

/// Axis-aligned cube centred on the origin.
///
/// Each face owns four vertices with `[0,1]²` uvs and carries its outward
/// normal as a face-normal override, so lighting is flat per face.
pub fn cube(half: f32, color: Color) -> Mesh {
    // (outward normal, u, v) with u × v = -normal, which keeps every face
    // counter-clockwise when seen from outside in a left-handed view.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::NEG_Z, Vec3::X, Vec3::Y),
        (Vec3::Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let uvs = [
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 0.0),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut primitives = Vec::with_capacity(12);
    for (n, u, v) in FACES {
        let base = vertices.len();
        for ((su, sv), uv) in corners.into_iter().zip(uvs) {
            let p = (n + u * su + v * sv) * half;
            vertices.push(Vertex::new(p, color, uv, n));
        }
        primitives.push(Primitive::new(base, base + 1, base + 2).with_face_normal(n));
        primitives.push(Primitive::new(base, base + 2, base + 3).with_face_normal(n));
    }
    Mesh::new(vertices, primitives)
}

/// Three coloured lines from the origin: x red, y green, z blue.
pub fn axes(length: f32) -> [LineSegment; 3] {
    [
        LineSegment::new(Vec3::ZERO, Vec3::X * length, Color::RED),
        LineSegment::new(Vec3::ZERO, Vec3::Y * length, Color::GREEN),
        LineSegment::new(Vec3::ZERO, Vec3::Z * length, Color::BLUE),
    ]
}
