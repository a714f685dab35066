//! Mesh and texture loading
//!
//! Meshes come from Wavefront OBJ files, textures from PNG (or any format
//! the `image` crate was built with). Both fall back to built-in assets when
//! nothing is configured.

use crate::rasterizer::{Color, Face, Mesh, Texture, Vec2, Vec3};
use std::path::Path;

/// Error type for asset loading
#[derive(Debug)]
pub enum AssetError {
    Obj(tobj::LoadError),
    Image(image::ImageError),
    FaceIndexOutOfRange { face: usize, vertices: usize },
    EmptyTexture,
}

impl From<tobj::LoadError> for AssetError {
    fn from(e: tobj::LoadError) -> Self {
        AssetError::Obj(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Image(e)
    }
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Obj(e) => write!(f, "OBJ error: {}", e),
            AssetError::Image(e) => write!(f, "Image error: {}", e),
            AssetError::FaceIndexOutOfRange { face, vertices } => write!(
                f,
                "Face {} references a vertex outside the {} loaded",
                face, vertices
            ),
            AssetError::EmptyTexture => write!(f, "Texture has no pixels"),
        }
    }
}

impl std::error::Error for AssetError {}

fn obj_load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        ..Default::default()
    }
}

/// Load a mesh from an OBJ file. All objects in the file are merged.
pub fn load_obj_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh, AssetError> {
    let (models, _materials) = tobj::load_obj(path.as_ref(), &obj_load_options())?;
    mesh_from_models(&models)
}

/// Build one mesh out of every model, offsetting indices as vertices are
/// appended. Faces are white; corners without texture coordinates get (0, 0).
fn mesh_from_models(models: &[tobj::Model]) -> Result<Mesh, AssetError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for model in models {
        let m = &model.mesh;
        let offset = vertices.len();

        vertices.extend(m.positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])));

        let has_uvs = !m.texcoords.is_empty() && m.texcoord_indices.len() == m.indices.len();
        let uv_at = |corner: usize| -> Vec2 {
            if !has_uvs {
                return Vec2::default();
            }
            let t = m.texcoord_indices[corner] as usize;
            match (m.texcoords.get(2 * t), m.texcoords.get(2 * t + 1)) {
                (Some(&u), Some(&v)) => Vec2::new(u, v),
                _ => Vec2::default(),
            }
        };

        for (i, tri) in m.indices.chunks_exact(3).enumerate() {
            let corner = i * 3;
            faces.push(Face::with_uvs(
                offset + tri[0] as usize,
                offset + tri[1] as usize,
                offset + tri[2] as usize,
                [uv_at(corner), uv_at(corner + 1), uv_at(corner + 2)],
                Color::WHITE,
            ));
        }
    }

    let mesh = Mesh::new(vertices, faces);
    if let Some(face) = mesh.first_invalid_face() {
        return Err(AssetError::FaceIndexOutOfRange { face, vertices: mesh.vertices.len() });
    }
    Ok(mesh)
}

/// Load a texture from an image file
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<Texture, AssetError> {
    let path = path.as_ref();
    let img = image::open(path)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyTexture);
    }

    let pixels: Vec<Color> = rgba
        .pixels()
        .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
        .collect();

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(Texture {
        width: width as usize,
        height: height as usize,
        pixels,
        name,
    })
}

/// Texture used when none is configured
pub fn default_texture() -> Texture {
    Texture::checkerboard(64, 64, Color::new(200, 60, 40), Color::new(240, 220, 200))
}

/// Unit cube centered on the origin, clockwise faces seen from outside
pub fn cube_mesh() -> Mesh {
    let vertices = vec![
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ];

    // Two triangles per side, sharing one UV layout
    let first = [Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
    let second = [Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
    let sides: [[usize; 4]; 6] = [
        [0, 1, 2, 3], // front
        [3, 2, 4, 5], // right
        [5, 4, 6, 7], // back
        [7, 6, 1, 0], // left
        [1, 6, 4, 2], // top
        [5, 7, 0, 3], // bottom
    ];

    let mut faces = Vec::with_capacity(12);
    for [a, b, c, d] in sides {
        faces.push(Face::with_uvs(a, b, c, first, Color::WHITE));
        faces.push(Face::with_uvs(a, c, d, second, Color::WHITE));
    }

    Mesh::new(vertices, faces)
}
