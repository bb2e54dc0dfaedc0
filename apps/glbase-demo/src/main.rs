use anyhow::Result;
use clap::Parser;
use gl::types::{GLint, GLsizei};
use glbase::{Buffer, Shader, Texture, VertexArray, buffer_data};
use glbase_sdl::{FpsCounter, GlWindowContext, set_context_version, set_vsync};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const TITLE: &str = "glbase demo";

#[derive(Parser)]
#[command(name = "glbase-demo", about = "Textured quad demo for the glbase wrappers")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Vertex shader source, hot-reloaded when saved
    #[arg(long, default_value = "apps/glbase-demo/shaders/quad.vert")]
    vertex: String,

    /// Fragment shader source, hot-reloaded when saved
    #[arg(long, default_value = "apps/glbase-demo/shaders/quad.frag")]
    fragment: String,

    /// Texture image; a checkerboard is generated here if the file is missing
    #[arg(long, default_value = "apps/glbase-demo/assets/checker.png")]
    texture: String,

    /// Disable vertical sync
    #[arg(long)]
    no_vsync: bool,

    #[arg(long, default_value = "800")]
    width: u32,

    #[arg(long, default_value = "600")]
    height: u32,
}

/// Write a checkerboard PNG so the demo runs without shipped binary assets.
fn ensure_texture(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut img = image::RgbaImage::new(256, 256);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let dark = ((x / 32) + (y / 32)) % 2 == 0;
        *px = if dark {
            image::Rgba([40, 40, 48, 255])
        } else {
            image::Rgba([220, 220, 210, 255])
        };
    }
    img.save(path)?;
    tracing::info!("generated checkerboard texture at {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let video = sdl.video().map_err(anyhow::Error::msg)?;
    set_context_version(&video, 4, 6);

    let mut window = video
        .window(TITLE, cli.width, cli.height)
        .opengl()
        .position_centered()
        .resizable()
        .build()?;
    let _gl = GlWindowContext::create(&window, &video)?;
    set_vsync(&video, !cli.no_vsync)?;

    tracing::info!(
        "OpenGL {}",
        glbase::version().unwrap_or_else(|| "unknown".into())
    );

    ensure_texture(Path::new(&cli.texture))?;
    let mut texture =
        Texture::from_file(&cli.texture, gl::REPEAT as GLint, gl::REPEAT as GLint)?;
    let mut shader = Shader::new(&cli.vertex, &cli.fragment)?;

    // Quad: x, y, u, v per vertex.
    let vertices: [f32; 16] = [
        -0.5, -0.5, 0.0, 0.0, //
        0.5, -0.5, 1.0, 0.0, //
        0.5, 0.5, 1.0, 1.0, //
        -0.5, 0.5, 0.0, 1.0,
    ];
    let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];

    let vao = VertexArray::new();
    let vbo = Buffer::new(gl::ARRAY_BUFFER);
    let ebo = Buffer::new(gl::ELEMENT_ARRAY_BUFFER);

    vao.bind();
    vbo.bind();
    buffer_data(gl::ARRAY_BUFFER, &vertices, gl::STATIC_DRAW);
    ebo.bind();
    buffer_data(gl::ELEMENT_ARRAY_BUFFER, &indices, gl::STATIC_DRAW);
    let stride = (4 * size_of::<f32>()) as GLsizei;
    unsafe {
        gl::VertexAttribPointer(0, 2, gl::FLOAT, gl::FALSE, stride, std::ptr::null());
        gl::EnableVertexAttribArray(0);
        gl::VertexAttribPointer(
            1,
            2,
            gl::FLOAT,
            gl::FALSE,
            stride,
            (2 * size_of::<f32>()) as *const std::ffi::c_void,
        );
        gl::EnableVertexAttribArray(1);
    }
    vao.unbind();

    let mut fps = FpsCounter::new();
    let start = Instant::now();
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

    'running: loop {
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } => unsafe {
                    gl::Viewport(0, 0, w, h);
                },
                _ => {}
            }
        }

        if let Err(e) = shader.reload_if_modified() {
            tracing::error!("shader reload check failed: {e}");
        }

        unsafe {
            gl::ClearColor(0.1, 0.1, 0.15, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        shader.use_program();
        shader.set_float("u_time", start.elapsed().as_secs_f32());
        texture.bind(gl::TEXTURE0);
        texture.set_sampler_uniform(shader.uniform_location("u_texture"))?;

        vao.bind();
        unsafe {
            gl::DrawElements(gl::TRIANGLES, 6, gl::UNSIGNED_INT, std::ptr::null());
        }
        vao.unbind();
        texture.unbind();

        window.gl_swap_window();
        fps.update_title(&mut window, TITLE)?;
    }

    Ok(())
}
