//! Application state and frame stepping
//!
//! One `App` owns the renderer context for the whole session. Each frame:
//! events -> update (spin, transform, cull, project) -> render (rasterize,
//! present, clear). A failed present stops the loop at the next iteration.

use crate::assets::{cube_mesh, default_texture, load_obj_mesh, load_texture, AssetError};
use crate::config::Config;
use crate::input::{action_for, Action, InputEvent};
use crate::rasterizer::{FrameStats, Framebuffer, FramebufferError, Renderer, Surface, Vec3};
use tracing::{error, info};

/// Anything that stops the app before the first frame
#[derive(Debug)]
pub enum StartupError {
    Framebuffer(FramebufferError),
    Asset(AssetError),
}

impl From<FramebufferError> for StartupError {
    fn from(e: FramebufferError) -> Self {
        StartupError::Framebuffer(e)
    }
}

impl From<AssetError> for StartupError {
    fn from(e: AssetError) -> Self {
        StartupError::Asset(e)
    }
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::Framebuffer(e) => write!(f, "{}", e),
            StartupError::Asset(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StartupError {}

/// Fixed-rate frame pacing. Times are seconds from any monotonic clock.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    target: f64,
    previous: f64,
}

impl FrameLimiter {
    /// `fps == 0` disables pacing
    pub fn new(fps: u32, now: f64) -> Self {
        let target = if fps == 0 { 0.0 } else { 1.0 / fps as f64 };
        Self { target, previous: now }
    }

    /// How long to wait so frames are at least one target period apart
    pub fn delay(&self, now: f64) -> f64 {
        (self.target - (now - self.previous)).max(0.0)
    }

    /// Start the next frame period
    pub fn mark(&mut self, now: f64) {
        self.previous = now;
    }
}

/// Main application state
pub struct App {
    pub renderer: Renderer,
    /// Cleared on quit or presentation failure
    pub running: bool,
    /// Rotation added to the mesh every frame
    pub spin: Vec3,
    pub frames: u64,
    pub last_stats: FrameStats,
}

impl App {
    /// Allocate buffers and load assets. Any failure here is fatal.
    pub fn new(config: &Config) -> Result<Self, StartupError> {
        let fb = Framebuffer::new(config.window.width, config.window.height)?;

        let mut mesh = match &config.scene.mesh {
            Some(path) => {
                let mesh = load_obj_mesh(path)?;
                info!(
                    "Loaded mesh '{}': {} vertices, {} faces",
                    path.display(),
                    mesh.vertices.len(),
                    mesh.faces.len()
                );
                mesh
            }
            None => {
                info!("No mesh configured, using built-in cube");
                cube_mesh()
            }
        };
        mesh.scale = config.scene.scale;
        mesh.rotation = config.scene.rotation;
        mesh.translation = config.scene.translation;

        let texture = match &config.scene.texture {
            Some(path) => {
                let texture = load_texture(path)?;
                info!("Loaded texture '{}' ({}x{})", texture.name, texture.width, texture.height);
                texture
            }
            None => default_texture(),
        };

        let renderer = Renderer::new(
            fb,
            mesh,
            Some(texture),
            config.camera.to_camera(),
            config.render.to_settings(),
        );

        Ok(Self {
            renderer,
            running: true,
            spin: config.scene.spin,
            frames: 0,
            last_stats: FrameStats::default(),
        })
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        if let Some(action) = action_for(event) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: Action) {
        let settings = &mut self.renderer.settings;
        match action {
            Action::Quit => {
                info!("Quit requested");
                self.running = false;
            }
            Action::SetRenderMode(mode) if mode != settings.mode => {
                info!("Render mode: {}", mode.label());
                settings.mode = mode;
            }
            Action::SetCull(cull) if cull != settings.cull => {
                info!("Culling: {}", cull.label());
                settings.cull = cull;
            }
            _ => {}
        }
    }

    /// Spin the mesh and rebuild the triangle list
    pub fn update(&mut self) -> FrameStats {
        self.renderer.mesh.spin(self.spin);
        self.last_stats = self.renderer.update();
        self.last_stats
    }

    /// Rasterize and present. A presentation failure is reported once and
    /// stops the loop; it is not retried.
    pub fn render<S: Surface>(&mut self, surface: &mut S) {
        match self.renderer.render(surface) {
            Ok(()) => self.frames += 1,
            Err(e) => {
                error!("Error rendering color buffer: {}", e);
                self.running = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{CullMode, PresentError, RenderMode};
    use macroquad::prelude::KeyCode;
    use std::path::PathBuf;

    struct NullSurface {
        fail: bool,
    }

    impl Surface for NullSurface {
        fn present(&mut self, _fb: &Framebuffer) -> Result<(), PresentError> {
            if self.fail {
                Err(PresentError::InvalidSize { width: 0, height: 0 })
            } else {
                Ok(())
            }
        }
    }

    fn small_config() -> Config {
        let mut config = Config::default();
        config.window.width = 120;
        config.window.height = 100;
        config
    }

    #[test]
    fn test_frame_limiter_delay() {
        let limiter = FrameLimiter::new(50, 10.0);
        assert!((limiter.delay(10.005) - 0.015).abs() < 1e-9);
        assert_eq!(limiter.delay(10.5), 0.0);
        assert_eq!(FrameLimiter::new(0, 0.0).delay(0.0), 0.0);
    }

    #[test]
    fn test_new_app_with_builtin_assets() {
        let app = App::new(&small_config()).unwrap();
        assert!(app.running);
        assert_eq!(app.renderer.mesh.faces.len(), 12);
        assert!(app.renderer.texture.is_some());
        assert_eq!(app.renderer.fb.width, 120);
    }

    #[test]
    fn test_zero_sized_window_is_fatal() {
        let mut config = small_config();
        config.window.width = 0;
        assert!(matches!(App::new(&config), Err(StartupError::Framebuffer(_))));
    }

    #[test]
    fn test_missing_mesh_is_fatal() {
        let mut config = small_config();
        config.scene.mesh = Some(PathBuf::from("does/not/exist.obj"));
        assert!(matches!(App::new(&config), Err(StartupError::Asset(_))));
    }

    #[test]
    fn test_keys_switch_modes_and_quit() {
        let mut app = App::new(&small_config()).unwrap();
        app.handle_event(InputEvent::KeyDown(KeyCode::Key3));
        assert_eq!(app.renderer.settings.mode, RenderMode::FillTriangle);
        app.handle_event(InputEvent::KeyDown(KeyCode::D));
        assert_eq!(app.renderer.settings.cull, CullMode::Disabled);
        app.handle_event(InputEvent::KeyDown(KeyCode::Escape));
        assert!(!app.running);
    }

    #[test]
    fn test_update_spins_mesh() {
        let mut app = App::new(&small_config()).unwrap();
        app.update();
        app.update();
        assert!((app.renderer.mesh.rotation.y - 0.02).abs() < 1e-6);
        assert!(app.last_stats.emitted > 0);
    }

    #[test]
    fn test_present_failure_stops_loop() {
        let mut app = App::new(&small_config()).unwrap();
        app.update();
        app.render(&mut NullSurface { fail: false });
        assert_eq!(app.frames, 1);
        assert!(app.running);

        app.render(&mut NullSurface { fail: true });
        assert_eq!(app.frames, 1);
        assert!(!app.running);
    }
}
