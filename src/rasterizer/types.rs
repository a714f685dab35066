//! Core types for the rasterizer

use super::math::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Darken by a light intensity. The factor is clamped to 0.0-1.0 so no
    /// channel leaves 0-255; alpha is kept as is.
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Unpack from 0xAARRGGBB
    pub fn from_argb(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pack to 0xAARRGGBB (the color buffer format)
    pub fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Convert to [u8; 4] for presentation
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A triangle face: vertex indices into the owning mesh, one UV per corner
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub a_uv: Vec2,
    pub b_uv: Vec2,
    pub c_uv: Vec2,
    pub color: Color,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            a,
            b,
            c,
            a_uv: Vec2::default(),
            b_uv: Vec2::default(),
            c_uv: Vec2::default(),
            color: Color::WHITE,
        }
    }

    pub fn with_uvs(a: usize, b: usize, c: usize, uvs: [Vec2; 3], color: Color) -> Self {
        Self {
            a,
            b,
            c,
            a_uv: uvs[0],
            b_uv: uvs[1],
            c_uv: uvs[2],
            color,
        }
    }
}

/// Object-space geometry plus the transform applied to it every frame
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub scale: Vec3,
    pub rotation: Vec3,
    pub translation: Vec3,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            faces,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Advance the rotation by one frame's worth of spin
    pub fn spin(&mut self, step: Vec3) {
        self.rotation = self.rotation + step;
    }

    /// Index of the first face referencing a vertex that does not exist
    pub fn first_invalid_face(&self) -> Option<usize> {
        let n = self.vertices.len();
        self.faces
            .iter()
            .position(|f| f.a >= n || f.b >= n || f.c >= n)
    }
}

/// Texture (row-major grid of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Sample at UV coordinates with wrap-around, no filtering.
    /// Negative coordinates wrap with a Euclidean modulo.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }
        let tx = ((u * self.width as f32) as i64).rem_euclid(self.width as i64) as usize;
        let ty = ((v * self.height as f32) as i64).rem_euclid(self.height as i64) as usize;
        self.pixels[ty * self.width + tx]
    }
}

/// A face after transform, projection and shading, ready to rasterize
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Screen-space x, y, device z, and the camera-space depth in w
    pub points: [Vec4; 3],
    pub texcoords: [Vec2; 3],
    pub color: Color,
    /// Mean camera-space z. Informational; visibility comes from the depth buffer
    pub avg_depth: f32,
}

/// What the render pass draws for each triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    Wire,
    WireVertex,
    FillTriangle,
    FillTriangleWire,
    Textured,
    TexturedWire,
}

impl RenderMode {
    pub fn draws_wire(self) -> bool {
        !matches!(self, RenderMode::FillTriangle | RenderMode::Textured)
    }

    pub fn draws_vertices(self) -> bool {
        self == RenderMode::WireVertex
    }

    pub fn draws_fill(self) -> bool {
        matches!(self, RenderMode::FillTriangle | RenderMode::FillTriangleWire)
    }

    pub fn draws_texture(self) -> bool {
        matches!(self, RenderMode::Textured | RenderMode::TexturedWire)
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Wire => "Wireframe",
            RenderMode::WireVertex => "Wireframe + vertices",
            RenderMode::FillTriangle => "Filled",
            RenderMode::FillTriangleWire => "Filled + wireframe",
            RenderMode::Textured => "Textured",
            RenderMode::TexturedWire => "Textured + wireframe",
        }
    }
}

/// Backface culling toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CullMode {
    Disabled,
    Backface,
}

impl CullMode {
    pub fn label(self) -> &'static str {
        match self {
            CullMode::Disabled => "Off",
            CullMode::Backface => "Backface",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_clamps_and_keeps_alpha() {
        let c = Color::with_alpha(200, 100, 50, 128);
        assert_eq!(c.shade(2.0), c);
        assert_eq!(c.shade(-1.0), Color::with_alpha(0, 0, 0, 128));
        let half = c.shade(0.5);
        assert_eq!((half.r, half.g, half.b, half.a), (100, 50, 25, 128));
    }

    #[test]
    fn test_argb_packing() {
        let c = Color::from_argb(0xFFD3D3D3);
        assert_eq!(c, Color::with_alpha(0xD3, 0xD3, 0xD3, 0xFF));
        assert_eq!(c.to_argb(), 0xFFD3D3D3);
        assert_eq!(Color::RED.to_argb(), 0xFFFF0000);
    }

    #[test]
    fn test_sample_wraps_negative_coordinates() {
        let mut tex = Texture::new(4, 4);
        tex.pixels[3 * 4 + 3] = Color::RED;
        // -0.25 * 4 = -1 -> wraps to column/row 3
        assert_eq!(tex.sample(-0.25, -0.25), Color::RED);
        assert_eq!(tex.sample(1.75, 1.75), Color::RED);
        assert_eq!(tex.sample(0.0, 0.0), Color::WHITE);
    }

    #[test]
    fn test_sample_empty_texture() {
        let tex = Texture::new(0, 0);
        assert_eq!(tex.sample(0.5, 0.5), Color::BLACK);
    }

    #[test]
    fn test_first_invalid_face() {
        let mut mesh = Mesh::new(vec![Vec3::ZERO; 3], vec![Face::new(0, 1, 2)]);
        assert_eq!(mesh.first_invalid_face(), None);
        mesh.faces.push(Face::new(0, 1, 3));
        assert_eq!(mesh.first_invalid_face(), Some(1));
    }

    #[test]
    fn test_render_mode_wire_rules() {
        assert!(!RenderMode::FillTriangle.draws_wire());
        assert!(!RenderMode::Textured.draws_wire());
        assert!(RenderMode::TexturedWire.draws_wire());
        assert!(RenderMode::WireVertex.draws_vertices());
        assert!(RenderMode::FillTriangleWire.draws_fill());
    }
}
