//! Window presentation of the color buffer
//!
//! The color buffer is uploaded into one streaming texture every frame and
//! stretched over the whole window with nearest filtering.

use crate::rasterizer::{Framebuffer, PresentError, Surface};
use macroquad::prelude::{
    draw_texture_ex, screen_height, screen_width, vec2, DrawTextureParams, FilterMode, Image,
    Texture2D, BLACK, WHITE,
};

pub struct ScreenSurface {
    texture: Texture2D,
    image: Image,
    width: usize,
    height: usize,
}

impl ScreenSurface {
    /// Create a surface for a `width` x `height` color buffer.
    /// Both sides must be non-zero and fit a GPU texture dimension (u16).
    pub fn new(width: usize, height: usize) -> Result<Self, PresentError> {
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(PresentError::InvalidSize { width, height }),
        };

        let image = Image::gen_image_color(w, h, BLACK);
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);

        Ok(Self { texture, image, width, height })
    }
}

impl Surface for ScreenSurface {
    fn present(&mut self, fb: &Framebuffer) -> Result<(), PresentError> {
        if fb.width != self.width || fb.height != self.height {
            return Err(PresentError::SizeMismatch {
                surface: (self.width, self.height),
                buffer: (fb.width, fb.height),
            });
        }

        fb.write_rgba_bytes(&mut self.image.bytes);
        self.texture.update(&self.image);

        draw_texture_ex(
            &self.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        Ok(())
    }
}
