use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use clap::{Parser, ValueEnum};
use glam::{Mat4, Vec3};
use log::info;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use yasr_rs::{
    Color, LineStyle, Mesh, Pipeline, PipelineConfig, RenderMode, Renderer, Scene, Shader,
    Texture,
    scene::shapes,
    shader::{
        BlinnPhong, BlinnPhongTextured, Depth, Lambert, Normal, Phong, presets::Material,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeFlag {
    Wireframe,
    Color,
    Texture,
    Shading,
}

impl From<ModeFlag> for RenderMode {
    fn from(m: ModeFlag) -> Self {
        match m {
            ModeFlag::Wireframe => RenderMode::WIREFRAME,
            ModeFlag::Color => RenderMode::COLOR,
            ModeFlag::Texture => RenderMode::TEXTURE,
            ModeFlag::Shading => RenderMode::SHADING,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Demo {
    Triangle,
    Cube,
    Textured,
}

impl Demo {
    fn next(self) -> Self {
        match self {
            Demo::Triangle => Demo::Cube,
            Demo::Cube => Demo::Textured,
            Demo::Textured => Demo::Triangle,
        }
    }
}

/// Interactive viewer for the software rasteriser.
///
/// Arrows rotate, W/S zoom, Space cycles the demo, 1-4 toggle
/// wireframe/color/texture/shading, 5 cycles the shader, L toggles
/// antialiased lines, Esc quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = 700)]
    width: usize,

    #[arg(long, default_value_t = 500)]
    height: usize,

    /// Comma-separated render modes.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [ModeFlag::Wireframe])]
    mode: Vec<ModeFlag>,

    /// Worker threads (default: rayon's global pool).
    #[arg(long)]
    threads: Option<usize>,

    /// Run every loop on the main thread.
    #[arg(long)]
    sequential: bool,

    /// Integer line stepper instead of antialiased lines.
    #[arg(long)]
    hard_lines: bool,

    #[arg(long, value_enum, default_value_t = Demo::Cube)]
    scene: Demo,
}

fn shader_presets() -> Vec<(&'static str, Arc<dyn Shader>)> {
    let light = Vec3::new(0.5, -0.7, 1.0);
    let material = Material::default();
    let presets: [(&'static str, Arc<dyn Shader>); 6] = [
        ("blinn-phong-textured", Arc::new(BlinnPhongTextured::new(light, material))),
        ("blinn-phong", Arc::new(BlinnPhong::new(light, material))),
        ("phong", Arc::new(Phong::new(light, material))),
        ("lambert", Arc::new(Lambert::new(light, Color::WHITE))),
        ("normal", Arc::new(Normal)),
        ("depth", Arc::new(Depth { near: 0.9, far: 1.0 })),
    ];
    presets.into()
}

fn build_mesh(demo: Demo, texture: &Arc<Texture>, shader: &Arc<dyn Shader>) -> Mesh {
    let mesh = match demo {
        Demo::Triangle => shapes::rgb_triangle(),
        Demo::Cube => {
            let mut cube = shapes::cube(0.5, Color::WHITE);
            // tint each face's corners so colour mode has something to show
            let tints = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
            for (i, v) in cube.vertices.iter_mut().enumerate() {
                v.color = tints[i % 4];
            }
            cube
        }
        Demo::Textured => shapes::cube(0.5, Color::WHITE).with_texture(texture.clone()),
    };
    mesh.with_shader(shader.clone())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mode = args
        .mode
        .iter()
        .fold(RenderMode::empty(), |acc, &m| acc | RenderMode::from(m));
    let mut config = PipelineConfig::default()
        .with_size(args.width, args.height)
        .with_mode(mode)
        .with_clear_color(Color::gray(0.12))
        .with_parallel(!args.sequential);
    if let Some(n) = args.threads {
        config = config.with_threads(n);
    }
    if args.hard_lines {
        config = config.with_line_style(LineStyle::Stepped);
    }
    let mut pipeline = Pipeline::new(config)?;
    info!(
        "{}×{} on {} worker(s), mode {:?}",
        pipeline.width(),
        pipeline.height(),
        pipeline.threads(),
        pipeline.render_mode()
    );

    let texture = Arc::new(Texture::checkerboard(
        64,
        64,
        8,
        Color::WHITE,
        Color::new(0.8, 0.2, 0.2),
    )?);
    let shaders = shader_presets();
    let mut shader_idx = 0;
    let mut demo = args.scene;
    let mut mesh = Arc::new(build_mesh(demo, &texture, &shaders[shader_idx].1));

    let mut win = Window::new(
        "yasr-rs",
        args.width,
        args.height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    let (mut yaw, mut pitch, mut distance) = (30.0_f32, 20.0_f32, 3.0_f32);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* input ------------------------------------------------------------ */
        if win.is_key_down(Key::Left) {
            yaw -= 2.0;
        }
        if win.is_key_down(Key::Right) {
            yaw += 2.0;
        }
        if win.is_key_down(Key::Up) {
            pitch = (pitch + 2.0).min(89.0);
        }
        if win.is_key_down(Key::Down) {
            pitch = (pitch - 2.0).max(-89.0);
        }
        if win.is_key_down(Key::W) {
            distance = (distance - 0.05).max(1.2);
        }
        if win.is_key_down(Key::S) {
            distance += 0.05;
        }

        let toggles = [
            (Key::Key1, RenderMode::WIREFRAME),
            (Key::Key2, RenderMode::COLOR),
            (Key::Key3, RenderMode::TEXTURE),
            (Key::Key4, RenderMode::SHADING),
        ];
        for (key, bit) in toggles {
            if win.is_key_pressed(key, KeyRepeat::No) {
                let mode = pipeline.render_mode() ^ bit;
                pipeline.set_render_mode(mode);
                info!("render mode: {mode:?}");
            }
        }
        if win.is_key_pressed(Key::Key5, KeyRepeat::No) {
            shader_idx = (shader_idx + 1) % shaders.len();
            mesh = Arc::new(build_mesh(demo, &texture, &shaders[shader_idx].1));
            info!("shader: {}", shaders[shader_idx].0);
        }
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            demo = demo.next();
            mesh = Arc::new(build_mesh(demo, &texture, &shaders[shader_idx].1));
            info!("scene: {demo:?}");
        }
        if win.is_key_pressed(Key::L, KeyRepeat::No) {
            let style = match pipeline.config().line_style {
                LineStyle::Antialiased => LineStyle::Stepped,
                LineStyle::Stepped => LineStyle::Antialiased,
            };
            pipeline.set_line_style(style);
            info!("line style: {style:?}");
        }

        /* scene ------------------------------------------------------------ */
        let (w, h) = win.get_size();
        let (w, h) = (w.max(1), h.max(1));
        let mut scene = Scene::new();
        scene.set_perspective(60.0, w as f32 / h as f32, 0.1, 100.0);
        let eye = Mat4::from_rotation_y(yaw.to_radians())
            * Mat4::from_rotation_x(pitch.to_radians())
            * Vec3::new(0.0, 0.0, -distance).extend(1.0);
        scene.set_view(Mat4::look_at_lh(eye.truncate(), Vec3::ZERO, Vec3::Y));
        if demo == Demo::Triangle {
            scene.translate(Vec3::new(-0.5, -0.5, 0.0));
        }
        scene.add_mesh(mesh.clone());
        scene.extend_lines(shapes::axes(1.0));

        /* draw ------------------------------------------------------------- */
        let t0 = Instant::now();
        pipeline.begin_frame(w, h);
        pipeline.draw_scene(&scene);
        let mut presented = Ok(());
        pipeline.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            presented = win.update_with_buffer(fb, w, h);
        });
        presented?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            info!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
