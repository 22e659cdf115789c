//! Render collaborator: draws the mesh with its viewing texture into a
//! pixel surface the brush can paint over.
//!
//! Hosts with a GPU renderer implement [`ViewRenderer`] by reading back
//! their render target. [`SoftwareRenderer`] is a CPU rasterizer for
//! headless use and tests.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use surfpaint_config::SurfaceConfig;
use tracing::debug;

use crate::camera::CameraProjection;
use crate::error::PaintError;
use crate::geometry::barycentric;
use crate::mesh::PaintMesh;
use crate::projection::{ndc_to_uv, uv_to_pixel};
use crate::surface::PixelSurface;

/// Everything the render path needs to draw the viewing layout.
#[derive(Clone, Copy)]
pub struct ViewingScene<'a> {
    pub mesh: &'a PaintMesh,
    /// Viewing UVs per face corner
    pub viewing_uvs: &'a [[Vec2; 3]],
    /// Pixel source per face; `None` for faces never painted
    pub patches: &'a [Option<Arc<PixelSurface>>],
    /// Color of faces without a patch
    pub base_color: [f32; 4],
}

impl ViewingScene<'_> {
    /// Color of `face_index` at viewing UV `uv`.
    pub fn shade(&self, face_index: usize, uv: Vec2) -> [f32; 4] {
        self.patches[face_index]
            .as_ref()
            .and_then(|patch| patch.sample_uv(uv))
            .unwrap_or(self.base_color)
    }
}

/// Produces the drawing surface from the viewing layout.
pub trait ViewRenderer {
    /// Current render-target size in pixels.
    fn size(&self) -> (u32, u32);

    /// Render `scene` from `camera` and return the pixels at [`Self::size`].
    ///
    /// Fails with [`PaintError::ResourceUnavailable`] when no pixel buffer
    /// can be produced (for example a zero-sized target).
    fn render_viewing(
        &mut self,
        scene: &ViewingScene<'_>,
        camera: &dyn CameraProjection,
    ) -> Result<PixelSurface, PaintError>;
}

/// Z-buffered CPU rasterizer with back-face culling and nearest sampling.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    background: [f32; 4],
    depth: Vec<f32>,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32, background: [f32; 4]) -> Self {
        Self {
            width,
            height,
            background,
            depth: Vec::new(),
        }
    }

    /// Renderer sized and cleared as described by the surface config.
    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self::new(config.width, config.height, config.background)
    }

    /// Change the render-target size. The next render allocates to match.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

impl ViewRenderer for SoftwareRenderer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render_viewing(
        &mut self,
        scene: &ViewingScene<'_>,
        camera: &dyn CameraProjection,
    ) -> Result<PixelSurface, PaintError> {
        if self.width == 0 || self.height == 0 {
            return Err(PaintError::ResourceUnavailable(format!(
                "render target is {}x{}",
                self.width, self.height
            )));
        }

        let size = (self.width, self.height);
        let mut surface = PixelSurface::filled(self.width, self.height, self.background);
        self.depth.clear();
        self.depth.resize(surface.pixel_count(), f32::INFINITY);

        let eye = camera.eye_position();
        let positions = scene.mesh.positions();
        let mut drawn = 0usize;

        for (face_index, face) in scene.mesh.faces().iter().enumerate() {
            let corners = face.vertices.map(|v| positions[v as usize]);
            let centroid = (corners[0] + corners[1] + corners[2]) / 3.0;
            if face.normal.dot(eye - centroid) <= 0.0 {
                continue;
            }
            if !corners.iter().all(|&p| camera.is_in_front(p)) {
                continue;
            }

            let projected: [Vec3; 3] = corners.map(|p| camera.project(p));
            let screen = projected.map(|ndc| uv_to_pixel(ndc_to_uv(ndc.truncate()), size));

            let min = screen[0].min(screen[1]).min(screen[2]);
            let max = screen[0].max(screen[1]).max(screen[2]);
            let x_min = (min.x.floor().max(0.0) as u32).min(self.width);
            let y_min = (min.y.floor().max(0.0) as u32).min(self.height);
            let x_max = (max.x.ceil().max(0.0) as u32).min(self.width);
            let y_max = (max.y.ceil().max(0.0) as u32).min(self.height);

            let uvs = scene.viewing_uvs[face_index];
            for py in y_min..y_max {
                for px in x_min..x_max {
                    let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                    let Some(w) = barycentric(center, screen[0], screen[1], screen[2]) else {
                        continue;
                    };
                    if w.x < 0.0 || w.y < 0.0 || w.z < 0.0 {
                        continue;
                    }

                    let depth = w.x * projected[0].z + w.y * projected[1].z + w.z * projected[2].z;
                    let index = (py as usize) * (self.width as usize) + px as usize;
                    if depth >= self.depth[index] {
                        continue;
                    }
                    self.depth[index] = depth;

                    let uv = uvs[0] * w.x + uvs[1] * w.y + uvs[2] * w.z;
                    surface.set_pixel(px, py, scene.shade(face_index, uv));
                }
            }
            drawn += 1;
        }

        debug!(
            "SoftwareRenderer: {}x{}, {} of {} faces drawn",
            self.width,
            self.height,
            drawn,
            scene.mesh.face_count()
        );

        Ok(surface)
    }
}
