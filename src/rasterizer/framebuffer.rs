//! Color and depth buffers for software rendering

use super::types::Color;
use std::ops::{Range, RangeInclusive};

/// Depth value a freshly cleared depth buffer holds (farthest possible)
pub const DEPTH_FAR: f32 = 1.0;

/// Error creating a framebuffer
#[derive(Debug)]
pub enum FramebufferError {
    ZeroSize { width: usize, height: usize },
    Allocation(std::collections::TryReserveError),
}

impl std::fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramebufferError::ZeroSize { width, height } => {
                write!(f, "Framebuffer size {}x{} has no pixels", width, height)
            }
            FramebufferError::Allocation(e) => write!(f, "Framebuffer allocation failed: {}", e),
        }
    }
}

impl std::error::Error for FramebufferError {}

impl From<std::collections::TryReserveError> for FramebufferError {
    fn from(e: std::collections::TryReserveError) -> Self {
        FramebufferError::Allocation(e)
    }
}

/// Packed ARGB color buffer plus a depth buffer of the same size.
///
/// The depth buffer stores `1 - 1/w` of the nearest surface written so far,
/// so smaller is nearer and [`DEPTH_FAR`] means empty.
pub struct Framebuffer {
    color: Vec<u32>,
    depth: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, FramebufferError> {
        let len = width
            .checked_mul(height)
            .filter(|&n| n > 0)
            .ok_or(FramebufferError::ZeroSize { width, height })?;

        let mut color = Vec::new();
        color.try_reserve_exact(len)?;
        color.resize(len, Color::BLACK.to_argb());

        let mut depth = Vec::new();
        depth.try_reserve_exact(len)?;
        depth.resize(len, DEPTH_FAR);

        Ok(Self { color, depth, width, height })
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Width and height as i32, saturating for buffers wider than i32::MAX
    fn extent(&self) -> (i32, i32) {
        (
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }

    /// Rows `first..=last` that fall inside the buffer
    pub fn visible_rows(&self, first: i32, last: i32) -> RangeInclusive<i32> {
        first.max(0)..=last.min(self.extent().1 - 1)
    }

    /// Columns `start..end` that fall inside the buffer
    pub fn visible_columns(&self, start: i32, end: i32) -> Range<i32> {
        start.max(0)..end.min(self.extent().0)
    }

    pub fn clear_color(&mut self, color: Color) {
        self.color.fill(color.to_argb());
    }

    pub fn clear_depth(&mut self) {
        self.depth.fill(DEPTH_FAR);
    }

    /// Write a pixel. Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.color[idx] = color.to_argb();
        }
    }

    /// Depth-tested write: stores `color` and `depth` only if `depth` is
    /// strictly less than what the depth buffer holds. Returns whether the
    /// pixel was written.
    #[inline]
    pub fn draw_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: Color) -> bool {
        match self.index(x, y) {
            Some(idx) if depth < self.depth[idx] => {
                self.color[idx] = color.to_argb();
                self.depth[idx] = depth;
                true
            }
            _ => false,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| Color::from_argb(self.color[idx]))
    }

    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth[idx])
    }

    /// Packed ARGB pixels, row-major
    pub fn color_buffer(&self) -> &[u32] {
        &self.color
    }

    /// Fill `out` with RGBA bytes (4 per pixel) for upload to the screen
    pub fn write_rgba_bytes(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.color.len() * 4);
        for &packed in &self.color {
            out.extend_from_slice(&Color::from_argb(packed).to_bytes());
        }
    }

    /// Clip a segment to the buffer (Liang-Barsky). Segments that start and
    /// end inside come back unchanged.
    fn clip_line(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
        let (w, h) = self.extent();
        let (fx, fy) = (x0 as f64, y0 as f64);
        let (dx, dy) = (x1 as f64 - fx, y1 as f64 - fy);
        let (max_x, max_y) = ((w - 1) as f64, (h - 1) as f64);

        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [(-dx, fx), (dx, max_x - fx), (-dy, fy), (dy, max_y - fy)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((
            (fx + t0 * dx).round() as i32,
            (fy + t0 * dy).round() as i32,
            (fx + t1 * dx).round() as i32,
            (fy + t1 * dy).round() as i32,
        ))
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm.
    /// The segment is clipped to the buffer first.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip_line(x0, y0, x1, y1) else {
            return;
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.draw_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fill a `width` x `height` rectangle whose top-left corner is (x, y)
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let columns = self.visible_columns(x, x.saturating_add(width));
        for py in self.visible_rows(y, y.saturating_add(height).saturating_sub(1)) {
            for px in columns.clone() {
                self.draw_pixel(px, py, color);
            }
        }
    }

    /// Overlay a grid.
    ///
    /// A connected grid draws full lines `thickness` pixels wide every
    /// `spacing` pixels. A disconnected grid with thickness 1 only draws the
    /// intersection dots; other thicknesses always draw connected lines.
    pub fn draw_grid(&mut self, spacing: usize, thickness: usize, color: Color, connected: bool) {
        if spacing == 0 {
            return;
        }
        let step = if !connected && thickness == 1 { spacing } else { 1 };
        for y in (0..self.height).step_by(step) {
            for x in (0..self.width).step_by(step) {
                if y % spacing < thickness || x % spacing < thickness {
                    self.draw_pixel(x as i32, y as i32, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Framebuffer::new(0, 10),
            Err(FramebufferError::ZeroSize { .. })
        ));
    }

    #[test]
    fn test_draw_pixel_roundtrip_in_bounds() {
        let mut fb = Framebuffer::new(8, 6).unwrap();
        for y in 0..6 {
            for x in 0..8 {
                let c = Color::with_alpha(x as u8 * 10, y as u8 * 20, 7, 200);
                fb.draw_pixel(x, y, c);
                assert_eq!(fb.pixel(x, y), Some(c));
            }
        }
    }

    #[test]
    fn test_draw_pixel_out_of_bounds_is_noop() {
        let mut fb = Framebuffer::new(8, 6).unwrap();
        fb.clear_color(Color::BLUE);
        let before = fb.color_buffer().to_vec();
        for &(x, y) in &[(-1, 0), (0, -1), (8, 0), (0, 6), (100, 100), (i32::MIN, i32::MAX)] {
            fb.draw_pixel(x, y, Color::RED);
        }
        assert_eq!(fb.color_buffer(), &before[..]);
        assert_eq!(fb.pixel(8, 0), None);
    }

    #[test]
    fn test_depth_test_is_strict() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        assert!(fb.draw_pixel_with_depth(1, 1, 0.5, Color::RED));
        assert!(!fb.draw_pixel_with_depth(1, 1, 0.5, Color::GREEN));
        assert!(!fb.draw_pixel_with_depth(1, 1, 0.7, Color::GREEN));
        assert_eq!(fb.pixel(1, 1), Some(Color::RED));
        assert!(fb.draw_pixel_with_depth(1, 1, 0.2, Color::BLUE));
        assert_eq!(fb.depth_at(1, 1), Some(0.2));
        assert!(!fb.draw_pixel_with_depth(-1, 1, 0.0, Color::BLUE));
    }

    #[test]
    fn test_clear_buffers() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.draw_pixel_with_depth(2, 2, 0.1, Color::RED);
        fb.clear_color(Color::GREEN);
        fb.clear_depth();
        assert!(fb.color_buffer().iter().all(|&c| c == Color::GREEN.to_argb()));
        assert_eq!(fb.depth_at(2, 2), Some(DEPTH_FAR));
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.draw_line(1, 1, 8, 5, Color::WHITE);
        assert_eq!(fb.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(fb.pixel(8, 5), Some(Color::WHITE));
    }

    #[test]
    fn test_line_is_clipped_to_buffer() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.draw_line(i32::MIN, 5, i32::MAX, 5, Color::WHITE);
        assert!((0..10).all(|x| fb.pixel(x, 5) == Some(Color::WHITE)));
        assert_eq!(fb.pixel(5, 4), Some(Color::BLACK));

        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.draw_line(-100, -5, 100, -5, Color::WHITE);
        fb.draw_line(-(3e10_f32 as i32), 0, -20, 9, Color::WHITE);
        assert!(fb.color_buffer().iter().all(|&c| c == Color::BLACK.to_argb()));
    }

    #[test]
    fn test_rect_at_extreme_coordinates() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        // A vertex marker for a point far off screen
        fb.draw_rect((3e10_f32 - 2.0) as i32, 0, 4, 4, Color::RED);
        fb.draw_rect(i32::MIN, i32::MIN, 4, 4, Color::RED);
        assert!(fb.color_buffer().iter().all(|&c| c == Color::BLACK.to_argb()));

        fb.draw_rect(8, 8, i32::MAX, i32::MAX, Color::RED);
        let red = fb.color_buffer().iter().filter(|&&c| c == Color::RED.to_argb()).count();
        assert_eq!(red, 4);
        assert_eq!(fb.pixel(9, 9), Some(Color::RED));
    }

    #[test]
    fn test_dotted_grid() {
        let mut fb = Framebuffer::new(25, 25).unwrap();
        fb.draw_grid(10, 1, Color::WHITE, false);
        assert_eq!(fb.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.pixel(10, 20), Some(Color::WHITE));
        assert_eq!(fb.pixel(10, 5), Some(Color::BLACK));
        assert_eq!(fb.pixel(3, 3), Some(Color::BLACK));
    }

    #[test]
    fn test_rgba_bytes() {
        let mut fb = Framebuffer::new(2, 1).unwrap();
        fb.draw_pixel(1, 0, Color::with_alpha(1, 2, 3, 4));
        let mut out = Vec::new();
        fb.write_rgba_bytes(&mut out);
        assert_eq!(out, vec![0, 0, 0, 255, 1, 2, 3, 4]);
    }
}
