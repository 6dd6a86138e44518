use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3, Vec4};
use yasr_rs::{
    Color, FrameBuffer, LineStyle, Mesh, Pipeline, PipelineConfig, Primitive, RenderMode, Rgba,
    Scene, Texture, Vertex, scene::shapes, shader,
};

/*──────────────────────── helpers ────────────────────────*/

fn pipeline(size: usize, mode: RenderMode, parallel: bool) -> Pipeline {
    let mut config = PipelineConfig::default()
        .with_size(size, size)
        .with_mode(mode)
        .with_line_style(LineStyle::Stepped)
        .with_parallel(parallel);
    if parallel {
        config = config.with_threads(4);
    }
    Pipeline::new(config).unwrap()
}

fn threaded(size: usize, mode: RenderMode, threads: usize) -> Pipeline {
    let config = PipelineConfig::default()
        .with_size(size, size)
        .with_mode(mode)
        .with_line_style(LineStyle::Stepped)
        .with_parallel(true)
        .with_threads(threads);
    Pipeline::new(config).unwrap()
}

fn unit_ortho() -> Mat4 {
    Mat4::orthographic_lh(0.0, 1.0, 0.0, 1.0, -1.0, 1.0)
}

fn channels(px: Rgba) -> [i32; 3] {
    [
        ((px >> 16) & 0xFF) as i32,
        ((px >> 8) & 0xFF) as i32,
        (px & 0xFF) as i32,
    ]
}

fn assert_px_near(buf: &FrameBuffer<Rgba>, x: usize, y: usize, expected: [i32; 3]) {
    let got = channels(buf.get(x, y));
    for (g, e) in got.iter().zip(expected) {
        assert!((g - e).abs() <= 1, "pixel ({x},{y}): got {got:?}, expected {expected:?}");
    }
}

/// Single-colour triangle facing the camera at constant depth `z`.
fn flat_triangle(corners: [Vec2; 3], z: f32, color: Color) -> Mesh {
    Mesh::new(
        corners
            .iter()
            .map(|c| Vertex::colored(c.extend(z), color))
            .collect(),
        vec![Primitive::new(0, 1, 2)],
    )
}

fn perspective_scene() -> Scene {
    let mut scene = Scene::new();
    scene.set_perspective(90.0, 1.0, 0.1, 10.0);
    scene
}

/*──────────────────────── end to end ────────────────────────*/

#[test]
fn unit_triangle_colour_fill() {
    let mut scene = Scene::new();
    scene.set_projection(unit_ortho());
    scene.add_mesh(Arc::new(shapes::rgb_triangle()));

    let mut p = pipeline(8, RenderMode::COLOR, false);
    p.render(&scene);
    let fb = p.color_buffer();

    // pixel (x, y) carries r = (y-x)/8, g = x/8, b = (8-y)/8
    assert_px_near(fb, 2, 5, [0x60, 0x40, 0x60]);
    assert_px_near(fb, 0, 7, [223, 0, 32]);
    assert_px_near(fb, 6, 7, [32, 191, 32]);
    assert_eq!(fb.get(7, 2), 0);
    assert_eq!(fb.get(0, 0), 0);
    for y in 0..8 {
        for x in 0..8 {
            if x > y || y == 0 {
                assert_eq!(fb.get(x, y), 0, "({x},{y}) should be background");
            }
        }
    }
}

#[test]
fn nearer_triangle_wins_in_either_order() {
    let near = Arc::new(flat_triangle(
        [Vec2::new(-1.0, -1.0), Vec2::new(1.0, -1.0), Vec2::new(0.0, 1.0)],
        2.0,
        Color::RED,
    ));
    let far = Arc::new(flat_triangle(
        [Vec2::new(-2.0, -2.0), Vec2::new(2.0, -2.0), Vec2::new(0.0, 2.0)],
        4.0,
        Color::BLUE,
    ));

    let render = |order: [&Arc<Mesh>; 2], parallel: bool| {
        let mut scene = perspective_scene();
        for m in order {
            scene.add_mesh(m.clone());
        }
        let mut p = pipeline(16, RenderMode::COLOR, parallel);
        p.render(&scene);
        p.color_buffer().clone()
    };

    let a = render([&near, &far], false);
    let b = render([&far, &near], false);
    let c = render([&far, &near], true);
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(a.get(8, 8), 0xFF0000);
}

#[test]
fn perspective_interpolation_matches_barycentric_reference() {
    let verts = [
        Vertex::colored(Vec3::new(-1.0, -1.0, 1.5), Color::RED),
        Vertex::colored(Vec3::new(1.0, -1.0, 3.0), Color::GREEN),
        Vertex::colored(Vec3::new(0.0, 1.5, 6.0), Color::BLUE),
    ];
    let mut scene = perspective_scene();
    scene.add_mesh(Arc::new(Mesh::new(verts.to_vec(), vec![Primitive::new(0, 1, 2)])));

    const N: usize = 32;
    let mut p = pipeline(N, RenderMode::COLOR, false);
    p.render(&scene);

    let proj = scene.projection();
    let clip: Vec<Vec4> = verts.iter().map(|v| proj * v.position.extend(1.0)).collect();
    let screen: Vec<Vec2> = clip
        .iter()
        .map(|c| {
            let ndc = c.truncate() / c.w;
            Vec2::new((ndc.x + 1.0) * N as f32 * 0.5, (1.0 - ndc.y) * N as f32 * 0.5)
        })
        .collect();
    let area = |a: Vec2, b: Vec2, c: Vec2| (b - a).perp_dot(c - a);
    let total = area(screen[0], screen[1], screen[2]);

    let mut checked = 0;
    for y in 0..N {
        for x in 0..N {
            let s = Vec2::new(x as f32, y as f32);
            let bary = [
                area(s, screen[1], screen[2]) / total,
                area(screen[0], s, screen[2]) / total,
                area(screen[0], screen[1], s) / total,
            ];
            if bary.iter().any(|&b| b < 0.02) {
                continue;
            }
            let rhw: f32 = (0..3).map(|i| bary[i] / clip[i].w).sum();
            let mut expected = Color::BLACK;
            for i in 0..3 {
                expected += verts[i].color * (bary[i] / clip[i].w / rhw);
            }
            let e = channels(expected.to_rgb());
            assert_px_near(p.color_buffer(), x, y, e);
            let stored = p.depth_buffer().get(x, y);
            assert!((stored - rhw).abs() <= rhw * 1e-3, "depth at ({x},{y})");
            checked += 1;
        }
    }
    assert!(checked > 20, "only {checked} interior pixels");
}

#[test]
fn collinear_triangle_writes_nothing() {
    let mesh = Mesh::new(
        vec![
            Vertex::colored(Vec3::ZERO, Color::WHITE),
            Vertex::colored(Vec3::new(0.5, 0.0, 0.0), Color::WHITE),
            Vertex::colored(Vec3::new(1.0, 0.0, 0.0), Color::WHITE),
        ],
        vec![Primitive::new(0, 1, 2)],
    );
    let mut scene = Scene::new();
    scene.set_projection(unit_ortho());
    scene.add_mesh(Arc::new(mesh));

    let mut p = pipeline(8, RenderMode::COLOR, false);
    p.render(&scene);
    assert!(p.color_buffer().as_slice().iter().all(|&c| c == 0));
    assert!(p.depth_buffer().as_slice().iter().all(|&z| z == 0.0));
}

#[test]
fn parallel_fill_matches_sequential() {
    let mut scene = perspective_scene();
    for i in 0..64 {
        let z = 2.0 + i as f32 * 0.05;
        let dx = (i % 7) as f32 * 0.1 - 0.3;
        let tint = Color::new((i % 4) as f32 / 3.0, (i % 5) as f32 / 4.0, (i % 3) as f32 / 2.0);
        scene.add_mesh(Arc::new(flat_triangle(
            [
                Vec2::new(dx - 1.0, -0.5),
                Vec2::new(dx + 1.0, -0.3),
                Vec2::new(dx, 0.8),
            ],
            z,
            tint,
        )));
    }

    let mut seq = pipeline(64, RenderMode::COLOR, false);
    let mut par = pipeline(64, RenderMode::COLOR, true);
    seq.render(&scene);
    for _ in 0..4 {
        par.render(&scene);
        assert_eq!(seq.color_buffer(), par.color_buffer());
        assert_eq!(seq.depth_buffer(), par.depth_buffer());
    }
}

#[test]
fn parallel_fill_of_one_mesh_matches_sequential() {
    // every primitive lives in the same mesh, so the workers split one slice
    let mut vertices = Vec::new();
    let mut primitives = Vec::new();
    for i in 0..512usize {
        let z = 2.0 + i as f32 * 0.01;
        let dx = (i % 9) as f32 * 0.08 - 0.32;
        let dy = (i % 5) as f32 * 0.05 - 0.1;
        let tint = Color::new((i % 4) as f32 / 3.0, (i % 7) as f32 / 6.0, (i % 3) as f32 / 2.0);
        for corner in [
            Vec2::new(dx - 1.2, dy - 0.6),
            Vec2::new(dx + 1.2, dy - 0.4),
            Vec2::new(dx, dy + 0.9),
        ] {
            vertices.push(Vertex::colored(corner.extend(z), tint));
        }
        primitives.push(Primitive::new(3 * i, 3 * i + 1, 3 * i + 2));
    }
    let mut scene = perspective_scene();
    scene.add_mesh(Arc::new(Mesh::new(vertices, primitives)));

    let mut seq = pipeline(64, RenderMode::COLOR, false);
    seq.render(&scene);
    assert!(seq.color_buffer().as_slice().iter().filter(|&&c| c != 0).count() > 300);

    let mut par = threaded(64, RenderMode::COLOR, 8);
    assert_eq!(par.threads(), 8);
    for frame in 0..20 {
        par.render(&scene);
        assert_eq!(seq.color_buffer(), par.color_buffer(), "colour differs in frame {frame}");
        assert_eq!(seq.depth_buffer(), par.depth_buffer(), "depth differs in frame {frame}");
    }
}

#[test]
fn parallel_scene_lines_match_sequential() {
    let mut scene = Scene::new();
    scene.set_projection(unit_ortho());
    // crossing lines share many rows; one colour keeps the result order free
    scene.extend_lines((0..512).map(|i| {
        let a = i as f32 * 0.0123;
        let d = Vec3::new(a.cos(), a.sin(), 0.0) * 0.45;
        let centre = Vec3::new(0.5, 0.5, 0.0);
        yasr_rs::LineSegment::new(centre - d, centre + d, Color::WHITE)
    }));

    let mut seq = pipeline(64, RenderMode::empty(), false);
    seq.render(&scene);
    assert!(seq.color_buffer().as_slice().iter().filter(|&&c| c != 0).count() > 500);

    let mut par = threaded(64, RenderMode::empty(), 8);
    for frame in 0..20 {
        par.render(&scene);
        assert_eq!(seq.color_buffer(), par.color_buffer(), "lines differ in frame {frame}");
    }
}

#[test]
fn wireframe_draws_over_fill() {
    let mut scene = Scene::new();
    scene.set_projection(unit_ortho());
    scene.add_mesh(Arc::new(shapes::rgb_triangle()));

    let render = |mode| {
        let mut p = pipeline(32, mode, false);
        p.render(&scene);
        p.color_buffer().clone()
    };
    let fill = render(RenderMode::COLOR);
    let edges = render(RenderMode::WIREFRAME);
    let both = render(RenderMode::COLOR | RenderMode::WIREFRAME);

    let mut edge_pixels = 0;
    for i in 0..both.len() {
        if edges.get_index(i) != 0 {
            edge_pixels += 1;
            assert_eq!(both.get_index(i), edges.get_index(i));
        } else {
            assert_eq!(both.get_index(i), fill.get_index(i));
        }
    }
    assert!(edge_pixels > 0);
}

/*──────────────────────── resources ────────────────────────*/

#[test]
fn texture_mode_samples_bound_texture() {
    let tex = Arc::new(Texture::solid(4, 4, Color::new(0.0, 1.0, 1.0)).unwrap());
    let mut scene = Scene::new();
    scene.set_projection(unit_ortho());
    scene.add_mesh(Arc::new(shapes::rgb_triangle().with_texture(tex)));

    let mut p = pipeline(8, RenderMode::TEXTURE, false);
    p.render(&scene);
    assert_eq!(p.color_buffer().get(1, 6), 0x00FFFF);

    // colour modulation: red vertex weight is dropped by the cyan texel
    p.set_render_mode(RenderMode::COLOR_TEXTURE);
    p.render(&scene);
    assert_px_near(p.color_buffer(), 0, 7, [0, 0, 32]);
}

#[test]
fn shader_sees_normalised_position_and_can_discard() {
    let right_half = shader::from_fn(|f| (f.position.x >= 0.5).then_some(Color::WHITE));
    let mut scene = Scene::new();
    scene.set_projection(unit_ortho());
    scene.add_mesh(Arc::new(shapes::rgb_triangle().with_shader(Arc::new(right_half))));

    let mut p = pipeline(8, RenderMode::SHADING, false);
    p.render(&scene);
    let fb = p.color_buffer();
    assert_eq!(fb.get(5, 7), 0xFFFFFF);
    assert_eq!(fb.get(3, 7), 0);
    assert_eq!(p.depth_buffer().get(3, 7), 0.0);
}

#[test]
fn scene_lines_use_view_projection() {
    let mut scene = Scene::new();
    scene.set_projection(unit_ortho());
    scene.translate(Vec3::new(5.0, 0.0, 0.0));
    // the model matrix must not move lines
    scene.add_line(yasr_rs::LineSegment::new(
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(1.0, 0.5, 0.0),
        Color::WHITE,
    ));
    let mut p = pipeline(8, RenderMode::empty(), false);
    p.render(&scene);
    assert_eq!(p.color_buffer().get(3, 4), 0xFFFFFF);
}
