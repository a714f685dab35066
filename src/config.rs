//! Renderer configuration
//!
//! Uses RON (Rusty Object Notation) so the file stays hand-editable. Every
//! field has a default, so a config only needs the values it changes.

use crate::rasterizer::{Camera, Color, CullMode, RenderMode, RenderSettings, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file read when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "assets/renderer.ron";

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    /// Target frames per second for frame pacing
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scanline Renderer".to_string(),
            width: 800,
            height: 800,
            fps: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            fov_degrees: 60.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera {
            position: self.position,
            fov: self.fov_degrees.to_radians(),
            znear: self.znear,
            zfar: self.zfar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// OBJ file; the built-in cube when absent
    pub mesh: Option<PathBuf>,
    /// Image file; a checkerboard when absent
    pub texture: Option<PathBuf>,
    pub scale: Vec3,
    pub rotation: Vec3,
    pub translation: Vec3,
    /// Rotation added every frame (radians)
    pub spin: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            mesh: None,
            texture: None,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::new(0.0, 0.0, 5.0),
            spin: Vec3::new(0.0, 0.01, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    pub cull: CullMode,
    /// 0xAARRGGBB
    pub background: u32,
    /// 0xAARRGGBB
    pub grid_color: u32,
    pub grid_spacing: usize,
    pub light_direction: Vec3,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Textured,
            cull: CullMode::Backface,
            background: 0xFF000000,
            grid_color: 0xFFD3D3D3,
            grid_spacing: 10,
            light_direction: Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

impl RenderConfig {
    pub fn to_settings(&self) -> RenderSettings {
        RenderSettings {
            mode: self.mode,
            cull: self.cull,
            background: Color::from_argb(self.background),
            grid_color: Color::from_argb(self.grid_color),
            grid_spacing: self.grid_spacing,
            light_dir: self.light_direction.normalize(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub render: RenderConfig,
}

/// Where a config came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<Config, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Resolve the config for this run.
///
/// An explicit path must load. Without one, the default file is used if it
/// exists and built-in defaults otherwise.
pub fn resolve_config(explicit: Option<PathBuf>) -> Result<(Config, ConfigSource), ConfigError> {
    match explicit {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if path.exists() {
                let config = load_config(&path)?;
                Ok((config, ConfigSource::File(path)))
            } else {
                Ok((Config::default(), ConfigSource::Defaults))
            }
        }
    }
}

/// Config path from the first command-line argument, if any
pub fn config_path_from_args() -> Option<PathBuf> {
    std::env::args().nth(1).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("()").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = load_config_from_str(
            r#"(
                window: (width: 640, height: 480),
                scene: (mesh: Some("assets/drone.obj"), spin: (x: 0.0, y: 0.0, z: 0.02)),
                render: (mode: FillTriangleWire, cull: Disabled),
            )"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.fps, 60);
        assert_eq!(config.scene.mesh, Some(PathBuf::from("assets/drone.obj")));
        assert_eq!(config.scene.spin.z, 0.02);
        assert_eq!(config.scene.translation, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(config.render.mode, RenderMode::FillTriangleWire);
        assert_eq!(config.render.cull, CullMode::Disabled);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = load_config(DEFAULT_CONFIG_PATH).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(matches!(
            load_config_from_str("(window: (width: \"wide\"))"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let result = resolve_config(Some(PathBuf::from("does/not/exist.ron")));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_camera_config_converts_degrees() {
        let camera = CameraConfig::default().to_camera();
        assert!((camera.fov - std::f32::consts::PI / 3.0).abs() < 0.0001);
    }

    #[test]
    fn test_render_config_to_settings() {
        let settings = RenderConfig::default().to_settings();
        assert_eq!(settings.background, Color::BLACK);
        assert_eq!(settings.grid_color.to_argb(), 0xFFD3D3D3);
        assert_eq!(settings.mode, RenderMode::Textured);
    }
}
