//! Coordinate conventions shared by both texture layouts.
//!
//! Every conversion between UV space and pixel space goes through this
//! module so the drawing and viewing layouts agree on the vertical flip:
//!
//! ```text
//! pixel_x = u * width
//! pixel_y = (1 - v) * height
//! ```
//!
//! Pixels have a top-left origin; UV and NDC have a bottom-left origin.

use glam::Vec2;

/// Convert a UV coordinate to pixel coordinates on a surface of the given size.
#[inline]
pub fn uv_to_pixel(uv: Vec2, size: (u32, u32)) -> Vec2 {
    Vec2::new(uv.x * size.0 as f32, (1.0 - uv.y) * size.1 as f32)
}

/// Convert pixel coordinates back to UV. Inverse of [`uv_to_pixel`].
#[inline]
pub fn pixel_to_uv(pixel: Vec2, size: (u32, u32)) -> Vec2 {
    Vec2::new(pixel.x / size.0 as f32, 1.0 - pixel.y / size.1 as f32)
}

/// Convert normalized device coordinates (-1..1, y up) to UV (0..1, v up).
#[inline]
pub fn ndc_to_uv(ndc: Vec2) -> Vec2 {
    (ndc + Vec2::ONE) * 0.5
}

/// Convert UV (0..1) to normalized device coordinates (-1..1).
#[inline]
pub fn uv_to_ndc(uv: Vec2) -> Vec2 {
    uv * 2.0 - Vec2::ONE
}

/// Convert a pointer position in pixels to normalized device coordinates.
#[inline]
pub fn pixel_to_ndc(pixel: Vec2, size: (u32, u32)) -> Vec2 {
    uv_to_ndc(pixel_to_uv(pixel, size))
}
