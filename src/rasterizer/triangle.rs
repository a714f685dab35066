//! Scanline triangle rasterization
//!
//! Triangles are split at the middle vertex into a flat-bottom upper half
//! and a flat-top lower half and filled one scanline at a time. Depth and
//! texture coordinates are interpolated perspective-correctly through 1/w.

use super::framebuffer::Framebuffer;
use super::math::{barycentric_weights, Vec2, Vec3, Vec4};
use super::types::{Color, Texture};
use std::ops::RangeInclusive;

/// One triangle corner as the scanline loop sees it
#[derive(Debug, Clone, Copy)]
struct Corner {
    x: i32,
    y: i32,
    w: f32,
    u: f32,
    v: f32,
}

impl Corner {
    fn new(p: Vec4, uv: Vec2) -> Self {
        Self {
            x: p.x as i32,
            y: p.y as i32,
            w: p.w,
            u: uv.x,
            v: uv.y,
        }
    }

    fn pos(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

#[derive(Clone, Copy)]
enum Fill<'a> {
    Flat(Color),
    Textured(&'a Texture),
}

/// Outline a triangle with three lines
pub fn draw_unfilled_triangle(fb: &mut Framebuffer, points: &[Vec4; 3], color: Color) {
    let [a, b, c] = points.map(|p| (p.x as i32, p.y as i32));
    fb.draw_line(a.0, a.1, b.0, b.1, color);
    fb.draw_line(b.0, b.1, c.0, c.1, color);
    fb.draw_line(c.0, c.1, a.0, a.1, color);
}

/// Fill a triangle with a single color, depth-tested
pub fn draw_filled_triangle(fb: &mut Framebuffer, points: &[Vec4; 3], color: Color) {
    let corners = [
        Corner::new(points[0], Vec2::default()),
        Corner::new(points[1], Vec2::default()),
        Corner::new(points[2], Vec2::default()),
    ];
    rasterize(fb, corners, Fill::Flat(color));
}

/// Fill a triangle with perspective-correct texels, depth-tested
pub fn draw_textured_triangle(
    fb: &mut Framebuffer,
    points: &[Vec4; 3],
    texcoords: &[Vec2; 3],
    texture: &Texture,
) {
    let mut corners = [
        Corner::new(points[0], texcoords[0]),
        Corner::new(points[1], texcoords[1]),
        Corner::new(points[2], texcoords[2]),
    ];
    // Mesh files put v = 0 at the bottom, textures store row 0 at the top
    for c in &mut corners {
        c.v = 1.0 - c.v;
    }
    rasterize(fb, corners, Fill::Textured(texture));
}

/// Sort three corners by ascending y with pairwise swaps
fn sort_by_y(c: &mut [Corner; 3]) {
    if c[0].y > c[1].y {
        c.swap(0, 1);
    }
    if c[1].y > c[2].y {
        c.swap(1, 2);
    }
    if c[0].y > c[1].y {
        c.swap(0, 1);
    }
}

/// Interpolated (1/w, u, v) at the given barycentric weights.
/// Returns `None` when 1/w is zero or not finite.
fn interpolate(weights: Vec3, c: &[Corner; 3]) -> Option<(f32, f32, f32)> {
    let (alpha, beta, gamma) = (weights.x, weights.y, weights.z);

    let inv_w = alpha / c[0].w + beta / c[1].w + gamma / c[2].w;
    if inv_w == 0.0 || !inv_w.is_finite() {
        return None;
    }

    let u = (alpha * c[0].u / c[0].w + beta * c[1].u / c[1].w + gamma * c[2].u / c[2].w) / inv_w;
    let v = (alpha * c[0].v / c[0].w + beta * c[1].v / c[1].w + gamma * c[2].v / c[2].w) / inv_w;

    Some((inv_w, u, v))
}

fn rasterize(fb: &mut Framebuffer, mut corners: [Corner; 3], fill: Fill) {
    sort_by_y(&mut corners);
    let rows = fb.visible_rows(0, i32::MAX);
    for_each_span(&corners, rows, |y, x_start, x_end| {
        fill_span(fb, y, x_start, x_end, &corners, fill);
    });
}

/// Walk the scanlines of y-sorted corners, calling `emit(y, x_start, x_end)`
/// once per row inside `rows` with `x_start <= x_end`.
fn for_each_span(
    corners: &[Corner; 3],
    rows: RangeInclusive<i32>,
    mut emit: impl FnMut(i32, i32, i32),
) {
    let [c0, c1, c2] = corners;

    // Lines and points cover no area
    if (c1.pos() - c0.pos()).cross(c2.pos() - c0.pos()) == 0.0 {
        return;
    }

    // Span and slope math runs in f32: vertex coordinates may be saturated
    // to the i32 limits, where integer differences overflow.
    let dy = |from: &Corner, y: i32| y as f32 - from.y as f32;
    let slope = |from: &Corner, to: &Corner| (to.x as f32 - from.x as f32) / dy(from, to.y);
    let visible = |first: i32, last: i32| first.max(*rows.start())..=last.min(*rows.end());

    let mut span = |y: i32, short_from: &Corner, short_slope: f32, long_slope: f32| {
        let x_start = (short_from.x as f32 + dy(short_from, y) * short_slope) as i32;
        let x_end = (c0.x as f32 + dy(c0, y) * long_slope) as i32;
        // Which edge is left depends on the triangle's orientation
        if x_end < x_start {
            emit(y, x_end, x_start);
        } else {
            emit(y, x_start, x_end);
        }
    };

    let has_top = c1.y != c0.y;
    let has_bottom = c2.y != c1.y;
    // Finite: the zero-area check above rules out y0 == y2
    let long_slope = slope(c0, c2);

    // Upper half (flat-bottom). Row y1 belongs to the lower half when it exists.
    if has_top {
        let short_slope = slope(c0, c1);
        let last_row = if has_bottom { c1.y - 1 } else { c1.y };
        for y in visible(c0.y, last_row) {
            span(y, c1, short_slope, long_slope);
        }
    }

    // Lower half (flat-top)
    if has_bottom {
        let short_slope = slope(c1, c2);
        for y in visible(c1.y, c2.y) {
            span(y, c1, short_slope, long_slope);
        }
    }
}

fn fill_span(
    fb: &mut Framebuffer,
    y: i32,
    x_start: i32,
    x_end: i32,
    corners: &[Corner; 3],
    fill: Fill,
) {
    let (a, b, c) = (corners[0].pos(), corners[1].pos(), corners[2].pos());

    for x in fb.visible_columns(x_start, x_end) {
        let p = Vec2::new(x as f32, y as f32);
        let Some(weights) = barycentric_weights(a, b, c, p) else {
            return;
        };
        let Some((inv_w, u, v)) = interpolate(weights, corners) else {
            continue;
        };

        let color = match fill {
            Fill::Flat(color) => color,
            Fill::Textured(texture) => texture.sample(u, v),
        };

        // Nearer surfaces have larger 1/w, so flip it to keep "less is nearer"
        fb.draw_pixel_with_depth(x, y, 1.0 - inv_w, color);
    }
}
