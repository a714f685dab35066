//! Per-frame scene update and render pass

use super::framebuffer::Framebuffer;
use super::math::{to_screen, Mat4, Vec3, Vec4};
use super::triangle::{draw_filled_triangle, draw_textured_triangle, draw_unfilled_triangle};
use super::types::{Color, CullMode, Mesh, RenderMode, Texture, Triangle};
use super::MAX_TRIANGLES;

/// Something the finished color buffer can be shown on
pub trait Surface {
    fn present(&mut self, fb: &Framebuffer) -> Result<(), PresentError>;
}

/// Error creating or presenting to a surface
#[derive(Debug, Clone, PartialEq)]
pub enum PresentError {
    InvalidSize { width: usize, height: usize },
    SizeMismatch { surface: (usize, usize), buffer: (usize, usize) },
}

impl std::fmt::Display for PresentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresentError::InvalidSize { width, height } => {
                write!(f, "Surface size {}x{} is not supported", width, height)
            }
            PresentError::SizeMismatch { surface, buffer } => write!(
                f,
                "Color buffer is {}x{} but surface is {}x{}",
                buffer.0, buffer.1, surface.0, surface.1
            ),
        }
    }
}

impl std::error::Error for PresentError {}

/// Fixed camera: position plus projection parameters
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection(&self, width: usize, height: usize) -> Mat4 {
        let aspect = height as f32 / width as f32;
        Mat4::perspective(self.fov, aspect, self.znear, self.zfar)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            fov: std::f32::consts::PI / 3.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

/// What to draw and how
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub mode: RenderMode,
    pub cull: CullMode,
    pub background: Color,
    pub grid_color: Color,
    /// 0 disables the grid
    pub grid_spacing: usize,
    /// Direction the single directional light travels in
    pub light_dir: Vec3,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Textured,
            cull: CullMode::Backface,
            background: Color::BLACK,
            grid_color: Color::from_argb(0xFFD3D3D3),
            grid_spacing: 10,
            light_dir: Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Counters from one `update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub emitted: usize,
    pub culled: usize,
    /// Faces skipped for having a vertex nearer than `znear` (behind the near plane)
    pub behind_near: usize,
    /// Faces lost to the triangle cap
    pub dropped: usize,
}

/// Light intensity for a face normal: faces looking into the light are lit
pub fn light_intensity(normal: Vec3, light_dir: Vec3) -> f32 {
    -normal.dot(light_dir)
}

/// Renderer context: owns the buffers, the scene and the per-frame
/// triangle list for the whole session
pub struct Renderer {
    pub fb: Framebuffer,
    pub mesh: Mesh,
    pub texture: Option<Texture>,
    pub camera: Camera,
    pub settings: RenderSettings,
    projection: Mat4,
    triangles: Vec<Triangle>,
}

impl Renderer {
    pub fn new(
        fb: Framebuffer,
        mesh: Mesh,
        texture: Option<Texture>,
        camera: Camera,
        settings: RenderSettings,
    ) -> Self {
        let projection = camera.projection(fb.width, fb.height);
        let mut fb = fb;
        fb.clear_color(settings.background);
        fb.clear_depth();
        Self {
            fb,
            mesh,
            texture,
            camera,
            settings,
            projection,
            triangles: Vec::with_capacity(MAX_TRIANGLES),
        }
    }

    /// Triangles produced by the last `update`
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Transform, cull and project every face of the mesh into the
    /// triangle list. At most [`MAX_TRIANGLES`] are kept; the rest are
    /// dropped for this frame.
    pub fn update(&mut self) -> FrameStats {
        self.triangles.clear();
        let mut stats = FrameStats::default();

        let mesh = &self.mesh;
        let world = Mat4::world(mesh.scale, mesh.rotation, mesh.translation);
        let (width, height) = (self.fb.width, self.fb.height);

        for face in &mesh.faces {
            let (Some(&a), Some(&b), Some(&c)) = (
                mesh.vertices.get(face.a),
                mesh.vertices.get(face.b),
                mesh.vertices.get(face.c),
            ) else {
                continue;
            };

            let transformed = [a, b, c].map(|v| world.mul_vec4(Vec4::from_point(v)));
            let [va, vb, vc] = transformed.map(Vec4::xyz);

            // Clockwise winding, left-handed: AB x AC faces the viewer
            let ab = (vb - va).normalize();
            let ac = (vc - va).normalize();
            let normal = ab.cross(ac).normalize();

            if self.settings.cull == CullMode::Backface {
                let camera_ray = self.camera.position - va;
                if normal.dot(camera_ray) < 0.0 {
                    stats.culled += 1;
                    continue;
                }
            }

            // No clipping: faces crossing the near plane are skipped whole
            if transformed.iter().any(|v| v.z < self.camera.znear) {
                stats.behind_near += 1;
                continue;
            }

            let points = transformed.map(|v| to_screen(self.projection.project(v), width, height));
            let intensity = light_intensity(normal, self.settings.light_dir);

            let triangle = Triangle {
                points,
                texcoords: [face.a_uv, face.b_uv, face.c_uv],
                color: face.color.shade(intensity),
                avg_depth: (va.z + vb.z + vc.z) / 3.0,
            };

            if self.triangles.len() < MAX_TRIANGLES {
                self.triangles.push(triangle);
                stats.emitted += 1;
            } else {
                stats.dropped += 1;
            }
        }

        if stats.dropped > 0 {
            tracing::debug!(dropped = stats.dropped, "Triangle list full, extra faces dropped");
        }

        stats
    }

    /// Draw the grid and every triangle into the color buffer
    pub fn draw_scene(&mut self) {
        let Self { fb, texture, settings, triangles, .. } = self;
        let mode = settings.mode;

        if settings.grid_spacing > 0 {
            fb.draw_grid(settings.grid_spacing, 1, settings.grid_color, false);
        }

        for triangle in triangles.iter() {
            if mode.draws_vertices() {
                for p in &triangle.points {
                    fb.draw_rect((p.x - 2.0) as i32, (p.y - 2.0) as i32, 4, 4, Color::RED);
                }
            }

            match (mode.draws_texture(), texture.as_ref()) {
                (true, Some(tex)) => {
                    draw_textured_triangle(fb, &triangle.points, &triangle.texcoords, tex);
                }
                // Nothing to sample: fall back to flat fill
                (true, None) => draw_filled_triangle(fb, &triangle.points, triangle.color),
                (false, _) if mode.draws_fill() => {
                    draw_filled_triangle(fb, &triangle.points, triangle.color);
                }
                _ => {}
            }

            if mode.draws_wire() {
                draw_unfilled_triangle(fb, &triangle.points, Color::WHITE);
            }
        }
    }

    /// Draw the frame, present it, then clear both buffers for the next one
    pub fn render<S: Surface>(&mut self, surface: &mut S) -> Result<(), PresentError> {
        self.draw_scene();
        surface.present(&self.fb)?;
        self.fb.clear_color(self.settings.background);
        self.fb.clear_depth();
        Ok(())
    }
}
