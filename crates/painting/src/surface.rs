//! CPU RGBA pixel surface shared by the drawing layout and per-face patches

use glam::Vec2;

use crate::projection::uv_to_pixel;

/// An RGBA CPU surface.
/// Stores pixels as [f32; 4] (Rgba32Float compatible), row-major, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    pixels: Vec<[f32; 4]>,
}

impl PixelSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0.0, 0.0, 0.0, 0.0])
    }

    /// Create a new surface filled with a solid color
    pub fn filled(width: u32, height: u32, color: [f32; 4]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![color; pixel_count],
        }
    }

    /// Surface size as (width, height)
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the surface holds no pixels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Blend a color onto an existing pixel using alpha compositing
    /// Formula: out = src * alpha + dst * (1 - alpha)
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], opacity: f32) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let dst = self.pixels[index];

        let src_alpha = color[3] * opacity;
        let inv_src_alpha = 1.0 - src_alpha;

        self.pixels[index] = [
            color[0] * src_alpha + dst[0] * inv_src_alpha,
            color[1] * src_alpha + dst[1] * inv_src_alpha,
            color[2] * src_alpha + dst[2] * inv_src_alpha,
            src_alpha + dst[3] * inv_src_alpha,
        ];
    }

    /// Erase a pixel by reducing its alpha
    /// The erase_amount (0-1) determines how much alpha is removed
    #[inline]
    pub fn erase_pixel(&mut self, x: u32, y: u32, erase_amount: f32) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let dst = self.pixels[index];

        // Destination-out: fade color along with alpha
        let remaining = (1.0 - erase_amount).max(0.0);
        self.pixels[index] = [
            dst[0] * remaining,
            dst[1] * remaining,
            dst[2] * remaining,
            dst[3] * remaining,
        ];
    }

    /// Copy a rectangular region into a new, tightly-sized surface.
    ///
    /// The region is clamped to surface bounds.
    pub fn extract_region(&self, x: u32, y: u32, width: u32, height: u32) -> PixelSurface {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        let actual_width = x_end.saturating_sub(x);
        let actual_height = y_end.saturating_sub(y);
        if actual_width == 0 || actual_height == 0 {
            return PixelSurface::new(0, 0);
        }

        let mut pixels = Vec::with_capacity((actual_width as usize) * (actual_height as usize));
        for row in y..y_end {
            let start = (row as usize) * (self.width as usize) + x as usize;
            pixels.extend_from_slice(&self.pixels[start..start + actual_width as usize]);
        }

        PixelSurface {
            width: actual_width,
            height: actual_height,
            pixels,
        }
    }

    /// Nearest-neighbour sample at a UV coordinate, clamped to the edges.
    pub fn sample_uv(&self, uv: Vec2) -> Option<[f32; 4]> {
        if self.is_empty() {
            return None;
        }
        let pixel = uv_to_pixel(uv, self.size());
        let x = (pixel.x.floor().max(0.0) as u32).min(self.width - 1);
        let y = (pixel.y.floor().max(0.0) as u32).min(self.height - 1);
        self.get_pixel(x, y)
    }

    /// Get raw pixel data for GPU upload
    /// Returns the pixel data as a byte slice suitable for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Surface whose pixel (x, y) stores [x, y, 0, 1]
    fn coordinate_surface(width: u32, height: u32) -> PixelSurface {
        let mut surface = PixelSurface::new(width, height);
        for y in 0..height {
            for x in 0..width {
                surface.set_pixel(x, y, [x as f32, y as f32, 0.0, 1.0]);
            }
        }
        surface
    }

    #[test]
    fn test_new_surface() {
        let surface = PixelSurface::new(100, 100);
        assert_eq!(surface.size(), (100, 100));
        assert_eq!(surface.pixel_count(), 10000);
    }

    #[test]
    fn test_get_set_pixel() {
        let mut surface = PixelSurface::new(10, 10);
        let color = [1.0, 0.5, 0.25, 1.0];

        surface.set_pixel(5, 5, color);
        assert_eq!(surface.get_pixel(5, 5), Some(color));
        assert_eq!(surface.get_pixel(100, 100), None);
    }

    #[test]
    fn test_blend_pixel() {
        let mut surface = PixelSurface::filled(10, 10, [1.0, 1.0, 1.0, 1.0]);
        surface.blend_pixel(5, 5, [1.0, 0.0, 0.0, 1.0], 0.5);

        let result = surface.get_pixel(5, 5).unwrap();
        assert!((result[0] - 1.0).abs() < 0.01);
        assert!((result[1] - 0.5).abs() < 0.01);
        assert!((result[2] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_erase_pixel() {
        let mut surface = PixelSurface::filled(4, 4, [1.0, 1.0, 1.0, 1.0]);
        surface.erase_pixel(1, 1, 1.0);
        assert_eq!(surface.get_pixel(1, 1), Some([0.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_extract_region() {
        let surface = coordinate_surface(100, 100);
        let patch = surface.extract_region(20, 50, 20, 20);

        assert_eq!(patch.size(), (20, 20));
        assert_eq!(patch.get_pixel(0, 0), Some([20.0, 50.0, 0.0, 1.0]));
        assert_eq!(patch.get_pixel(19, 19), Some([39.0, 69.0, 0.0, 1.0]));
    }

    #[test]
    fn test_extract_region_clamped() {
        let surface = coordinate_surface(10, 10);
        let patch = surface.extract_region(8, 8, 5, 5);
        assert_eq!(patch.size(), (2, 2));
        assert_eq!(patch.get_pixel(1, 1), Some([9.0, 9.0, 0.0, 1.0]));
    }

    #[test]
    fn test_extract_region_outside_is_empty() {
        let surface = coordinate_surface(10, 10);
        // Starts right of the surface on a valid row
        let patch = surface.extract_region(15, 9, 2, 1);
        assert!(patch.is_empty());
        assert_eq!(patch.size(), (0, 0));

        assert!(surface.extract_region(3, 10, 2, 2).is_empty());
        assert!(surface.extract_region(10, 10, 0, 0).is_empty());
    }

    #[test]
    fn test_sample_uv() {
        let surface = coordinate_surface(10, 10);
        // v = 1 is the top row
        assert_eq!(surface.sample_uv(Vec2::new(0.0, 1.0)), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(surface.sample_uv(Vec2::new(0.55, 0.45)), Some([5.0, 5.0, 0.0, 1.0]));
        // Clamped outside
        assert_eq!(surface.sample_uv(Vec2::new(2.0, -1.0)), Some([9.0, 9.0, 0.0, 1.0]));
        assert_eq!(PixelSurface::new(0, 0).sample_uv(Vec2::ZERO), None);
    }

    #[test]
    fn test_as_bytes() {
        let surface = PixelSurface::new(2, 2);
        // 4 pixels * 4 components * 4 bytes per f32 = 64 bytes
        assert_eq!(surface.as_bytes().len(), 64);
    }
}
