//! Scanline Renderer: software 3D rasterizer
//!
//! Renders a spinning mesh entirely on the CPU:
//! - Backface culling and flat directional shading
//! - Scanline triangle fill with a 1/w depth buffer
//! - Perspective-correct texture mapping
//! - Wireframe and vertex overlays

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod assets;
mod config;
mod input;
mod rasterizer;
mod surface;

use app::{App, FrameLimiter};
use config::{config_path_from_args, resolve_config, ConfigSource};
use input::poll_events;
use macroquad::prelude::{draw_text, get_time, next_frame, prevent_quit, Conf, YELLOW};
use surface::ScreenSurface;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn window_conf() -> Conf {
    // Errors are reported again once logging is up
    let window = resolve_config(config_path_from_args())
        .map(|(config, _)| config.window)
        .unwrap_or_default();

    Conf {
        window_title: format!("{} v{}", window.title, VERSION),
        window_width: window.width as i32,
        window_height: window.height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn init_tracing() {
    let fmt_layer = fmt::layer().with_target(false);
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cfg!(debug_assertions) { "debug" } else { "info" }));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    info!("Starting Scanline Renderer v{}", VERSION);

    let config = match resolve_config(config_path_from_args()) {
        Ok((config, ConfigSource::File(path))) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Ok((config, ConfigSource::Defaults)) => {
            info!("No config file, using defaults");
            config
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
            return;
        }
    };

    let mut app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start renderer: {}", e);
            return;
        }
    };

    let mut surface = match ScreenSurface::new(config.window.width, config.window.height) {
        Ok(surface) => surface,
        Err(e) => {
            error!("Failed to create window surface: {}", e);
            return;
        }
    };

    // Close requests arrive as InputEvent::Quit
    prevent_quit();

    let started = get_time();
    let mut limiter = FrameLimiter::new(config.window.fps, started);

    while app.running {
        for event in poll_events() {
            app.handle_event(event);
        }
        if !app.running {
            break;
        }

        let delay = limiter.delay(get_time());
        #[cfg(not(target_arch = "wasm32"))]
        if delay > 0.0 {
            std::thread::sleep(std::time::Duration::from_secs_f64(delay));
        }
        #[cfg(target_arch = "wasm32")]
        let _ = delay;
        limiter.mark(get_time());

        let stats = app.update();
        app.render(&mut surface);

        let settings = &app.renderer.settings;
        draw_text(
            &format!(
                "{} | cull: {} | triangles: {}",
                settings.mode.label(),
                settings.cull.label(),
                stats.emitted
            ),
            10.0,
            20.0,
            20.0,
            YELLOW,
        );

        next_frame().await;
    }

    let elapsed = get_time() - started;
    let fps = if elapsed > 0.0 { app.frames as f64 / elapsed } else { 0.0 };
    info!("Rendered {} frames in {:.1}s ({:.1} fps)", app.frames, elapsed, fps);
}
