//! Software scanline rasterizer
//!
//! Features:
//! - Scale/rotate/translate world transform with a left-handed perspective projection
//! - Backface culling (toggleable)
//! - Flat-bottom / flat-top scanline fill
//! - Perspective-correct texture mapping through 1/w interpolation
//! - Z-buffer visibility (no painter's sort)

mod framebuffer;
mod math;
mod render;
mod triangle;
mod types;

pub use framebuffer::*;
pub use math::*;
pub use render::*;
pub use triangle::*;
pub use types::*;

/// Upper bound on triangles kept per frame
pub const MAX_TRIANGLES: usize = 10_000;
