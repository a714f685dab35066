//! Vector and matrix math for the transform pipeline

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product. Operand order matters: the pipeline is left-handed,
    /// so `ab.cross(ac)` of a clockwise face points toward the viewer.
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

/// 2D Vector (screen points, texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// z component of the 3D cross product (signed parallelogram area)
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Homogeneous 4D vector. After projection `w` still holds the
/// camera-space depth, which the rasterizer needs for 1/w interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Promote a point to homogeneous coordinates (w = 1)
    pub fn from_point(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: 1.0 }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Row-major 4x4 matrix; vectors are columns (`M * v`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.m[0][0] = sx;
        m.m[1][1] = sy;
        m.m[2][2] = sz;
        m
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.m[0][3] = tx;
        m.m[1][3] = ty;
        m.m[2][3] = tz;
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.m[1][1] = c;
        m.m[1][2] = -s;
        m.m[2][1] = s;
        m.m[2][2] = c;
        m
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.m[0][0] = c;
        m.m[0][2] = s;
        m.m[2][0] = -s;
        m.m[2][2] = c;
        m
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.m[0][0] = c;
        m.m[0][1] = -s;
        m.m[1][0] = s;
        m.m[1][1] = c;
        m
    }

    /// Left-handed perspective projection.
    ///
    /// `fov` is the vertical field of view in radians and `aspect` is
    /// height / width. Depth is remapped so `znear -> 0` and `zfar -> 1`
    /// after the divide, and the input z lands in `w`.
    pub fn perspective(fov: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        let f = 1.0 / (fov / 2.0).tan();
        let mut m = Mat4 { m: [[0.0; 4]; 4] };
        m.m[0][0] = aspect * f;
        m.m[1][1] = f;
        m.m[2][2] = zfar / (zfar - znear);
        m.m[2][3] = (-zfar * znear) / (zfar - znear);
        m.m[3][2] = 1.0;
        m
    }

    /// World matrix: scale first, then rotate X -> Y -> Z, then translate
    pub fn world(scale: Vec3, rotation: Vec3, translation: Vec3) -> Self {
        let mut world = Self::identity();
        world = Self::scale(scale.x, scale.y, scale.z).mul(&world);
        world = Self::rotation_x(rotation.x).mul(&world);
        world = Self::rotation_y(rotation.y).mul(&world);
        world = Self::rotation_z(rotation.z).mul(&world);
        Self::translation(translation.x, translation.y, translation.z).mul(&world)
    }

    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                for k in 0..4 {
                    *cell += self.m[i][k] * other.m[k][j];
                }
            }
        }
        Mat4 { m: result }
    }

    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4 {
            x: m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3] * v.w,
            y: m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3] * v.w,
            z: m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3] * v.w,
            w: m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3] * v.w,
        }
    }

    /// Multiply and perspective-divide in one step. `w` is left untouched
    /// so callers can interpolate 1/w later; a zero `w` skips the divide.
    pub fn project(&self, v: Vec4) -> Vec4 {
        let mut result = self.mul_vec4(v);
        if result.w != 0.0 {
            result.x /= result.w;
            result.y /= result.w;
            result.z /= result.w;
        }
        result
    }
}

/// Map a device-space point to pixel coordinates.
/// Device y grows up while screen y grows down, hence the flip.
pub fn to_screen(p: Vec4, width: usize, height: usize) -> Vec4 {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;
    Vec4 {
        x: p.x * half_w + half_w,
        y: -p.y * half_h + half_h,
        z: p.z,
        w: p.w,
    }
}

/// Barycentric weights (alpha, beta, gamma) of `p` in triangle (a, b, c).
///
/// Returns `None` for a degenerate (zero-area) triangle.
pub fn barycentric_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<Vec3> {
    let ab = b - a;
    let bc = c - b;
    let ac = c - a;
    let ap = p - a;
    let bp = p - b;

    let area = ab.cross(ac);
    if area == 0.0 {
        return None;
    }

    let alpha = bc.cross(bp) / area;
    let beta = ap.cross(ac) / area;
    let gamma = 1.0 - alpha - beta;

    Some(Vec3::new(alpha, beta, gamma))
}
