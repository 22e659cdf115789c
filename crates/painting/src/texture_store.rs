//! Drawing and viewing texture layouts and the switch between them.
//!
//! While drawing, every face maps into one screen-aligned surface through
//! UVs projected from the current camera. While viewing, every painted face
//! samples its own patch cut from a past drawing surface. Faces that were
//! never painted keep the placeholder UV and show the base color.

use std::sync::Arc;

use glam::Vec2;
use surfpaint_config::SurfaceConfig;
use tracing::debug;

use crate::camera::{CameraProjection, project_xy};
use crate::error::PaintError;
use crate::face_set::AffectedFaceSet;
use crate::mesh::PaintMesh;
use crate::projection::ndc_to_uv;
use crate::render::{ViewRenderer, ViewingScene};
use crate::surface::PixelSurface;
use crate::types::{EngineStats, TextureMode};

/// Pixel rectangle on the drawing surface, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PatchRect {
    /// Tight pixel bounds of `uvs` on a surface of `size`, at least 1x1.
    ///
    /// Returns `None` for an empty iterator or an empty surface.
    pub fn from_uvs(uvs: impl IntoIterator<Item = Vec2>, size: (u32, u32)) -> Option<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return None;
        }

        let mut uvs = uvs.into_iter();
        let first = uvs.next()?;
        let (min, max) = uvs.fold((first, first), |(min, max), uv| (min.min(uv), max.max(uv)));

        let (w, h) = (width as f32, height as f32);
        let x0 = snap(min.x * w).floor().clamp(0.0, w - 1.0) as u32;
        let y0 = snap((1.0 - max.y) * h).floor().clamp(0.0, h - 1.0) as u32;
        let x1 = (snap(max.x * w).ceil().min(w) as u32).max(x0 + 1);
        let y1 = (snap((1.0 - min.y) * h).ceil().min(h) as u32).max(y0 + 1);

        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// Lower-left corner of the rectangle in UV space.
    pub fn uv_min(&self, size: (u32, u32)) -> Vec2 {
        Vec2::new(
            self.x as f32 / size.0 as f32,
            1.0 - (self.y + self.height) as f32 / size.1 as f32,
        )
    }

    /// Remap a drawing UV into patch-local UV.
    pub fn to_local(&self, uv: Vec2, size: (u32, u32)) -> Vec2 {
        let min = self.uv_min(size);
        Vec2::new(
            (uv.x - min.x) * size.0 as f32 / self.width as f32,
            (uv.y - min.y) * size.1 as f32 / self.height as f32,
        )
    }
}

/// Round values that are within float noise of an integer.
fn snap(value: f32) -> f32 {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-3 {
        rounded
    } else {
        value
    }
}

/// Split borrow of the drawing-mode state, handed to the fill and the brush.
pub struct DrawingLayout<'a> {
    pub uvs: &'a [[Vec2; 3]],
    pub surface: &'a mut PixelSurface,
    pub affected: &'a mut AffectedFaceSet,
}

/// Owns both texture layouts and the accumulated faces awaiting reconciliation.
#[derive(Debug, Clone)]
pub struct DualTextureStore {
    mode: TextureMode,
    vertex_drawing_uvs: Vec<Vec2>,
    drawing_uvs: Vec<[Vec2; 3]>,
    viewing_uvs: Vec<[Vec2; 3]>,
    patches: Vec<Option<Arc<PixelSurface>>>,
    drawing: Option<PixelSurface>,
    /// Set when pending paint was discarded; the next switch re-renders
    drawing_stale: bool,
    affected: AffectedFaceSet,
    base_color: [f32; 4],
    stats: EngineStats,
}

impl DualTextureStore {
    pub fn new(mesh: &PaintMesh, config: &SurfaceConfig) -> Self {
        let face_count = mesh.face_count();
        let placeholder = Vec2::from(config.placeholder_uv);
        Self {
            mode: TextureMode::Viewing,
            vertex_drawing_uvs: vec![placeholder; mesh.vertex_count()],
            drawing_uvs: vec![[placeholder; 3]; face_count],
            viewing_uvs: vec![[placeholder; 3]; face_count],
            patches: vec![None; face_count],
            drawing: None,
            drawing_stale: false,
            affected: AffectedFaceSet::new(face_count),
            base_color: config.base_color,
            stats: EngineStats::default(),
        }
    }

    /// Render the viewing layout into a fresh drawing surface and project
    /// every vertex to its drawing UV.
    ///
    /// No-op returning `Ok(false)` when already drawing. On error nothing is
    /// committed and the store stays in its previous mode.
    pub fn switch_to_drawing(
        &mut self,
        mesh: &PaintMesh,
        camera: &dyn CameraProjection,
        renderer: &mut dyn ViewRenderer,
    ) -> Result<bool, PaintError> {
        if self.mode == TextureMode::Drawing && !self.drawing_stale {
            return Ok(false);
        }

        let surface = renderer.render_viewing(&self.viewing_scene(mesh), camera)?;
        if surface.is_empty() {
            return Err(PaintError::ResourceUnavailable(
                "renderer returned an empty surface".to_string(),
            ));
        }

        let vertex_uvs: Vec<Vec2> = mesh
            .positions()
            .iter()
            .map(|&p| ndc_to_uv(project_xy(camera, p)))
            .collect();
        let face_uvs: Vec<[Vec2; 3]> = mesh
            .faces()
            .iter()
            .map(|face| face.vertices.map(|v| vertex_uvs[v as usize]))
            .collect();

        // Commit UVs and pixels together
        debug!(
            "DualTextureStore: drawing mode, surface {}x{}",
            surface.width, surface.height
        );
        self.vertex_drawing_uvs = vertex_uvs;
        self.drawing_uvs = face_uvs;
        self.drawing = Some(surface);
        self.drawing_stale = false;
        self.mode = TextureMode::Drawing;
        self.stats.projection_passes += 1;

        Ok(true)
    }

    /// Cut the pixels under the pending faces into one patch and point those
    /// faces' viewing UVs at it.
    ///
    /// No-op returning `Ok(false)` when already viewing. With nothing pending
    /// only the mode changes.
    pub fn switch_to_viewing(&mut self) -> Result<bool, PaintError> {
        if self.mode == TextureMode::Viewing {
            return Ok(false);
        }
        self.mode = TextureMode::Viewing;

        if self.affected.is_empty() {
            debug!("DualTextureStore: viewing mode, nothing to reconcile");
            return Ok(true);
        }

        let drawing = self.drawing.as_ref().ok_or_else(|| {
            PaintError::ResourceUnavailable("no drawing surface to reconcile".to_string())
        })?;
        let size = drawing.size();

        let corners = self
            .affected
            .iter()
            .flat_map(|face_id| self.drawing_uvs[face_id as usize]);
        let Some(rect) = PatchRect::from_uvs(corners, size) else {
            self.affected.reset();
            return Ok(true);
        };

        let patch = Arc::new(drawing.extract_region(rect.x, rect.y, rect.width, rect.height));
        for face_id in self.affected.iter() {
            let index = face_id as usize;
            self.viewing_uvs[index] = self.drawing_uvs[index].map(|uv| rect.to_local(uv, size));
            self.patches[index] = Some(Arc::clone(&patch));
        }

        debug!(
            "DualTextureStore: reconciled {} faces into {}x{} patch at ({}, {})",
            self.affected.len(),
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
        self.stats.reconciliations += 1;
        self.stats.faces_reconciled += self.affected.len() as u64;
        self.affected.reset();

        Ok(true)
    }

    /// Drop pending faces without reconciling. The mode is left as is, and
    /// the next [`Self::switch_to_drawing`] re-renders the drawing surface.
    pub fn discard_pending(&mut self) {
        self.affected.reset();
        if self.mode == TextureMode::Drawing {
            self.drawing_stale = true;
        }
    }

    /// Drawing-mode state, or `None` while viewing.
    pub fn drawing_layout(&mut self) -> Option<DrawingLayout<'_>> {
        if self.mode != TextureMode::Drawing {
            return None;
        }
        let surface = self.drawing.as_mut()?;
        Some(DrawingLayout {
            uvs: &self.drawing_uvs,
            surface,
            affected: &mut self.affected,
        })
    }

    /// What the render path draws in viewing mode.
    pub fn viewing_scene<'a>(&'a self, mesh: &'a PaintMesh) -> ViewingScene<'a> {
        ViewingScene {
            mesh,
            viewing_uvs: &self.viewing_uvs,
            patches: &self.patches,
            base_color: self.base_color,
        }
    }

    pub fn mode(&self) -> TextureMode {
        self.mode
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Faces accumulated since the last reconciliation
    pub fn pending(&self) -> &AffectedFaceSet {
        &self.affected
    }

    pub fn vertex_drawing_uvs(&self) -> &[Vec2] {
        &self.vertex_drawing_uvs
    }

    pub fn drawing_uvs(&self) -> &[[Vec2; 3]] {
        &self.drawing_uvs
    }

    pub fn viewing_uvs(&self) -> &[[Vec2; 3]] {
        &self.viewing_uvs
    }

    /// Per-face viewing patches; `None` for faces never reconciled
    pub fn patches(&self) -> &[Option<Arc<PixelSurface>>] {
        &self.patches
    }

    /// The surface the brush paints into, if one has been rendered.
    pub fn drawing_surface(&self) -> Option<&PixelSurface> {
        self.drawing.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrthographicCamera;
    use crate::render::SoftwareRenderer;
    use crate::test_support::grid;
    use glam::Vec3;

    const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

    /// Counts render calls
    struct CountingRenderer {
        inner: SoftwareRenderer,
        calls: usize,
    }

    impl ViewRenderer for CountingRenderer {
        fn size(&self) -> (u32, u32) {
            self.inner.size()
        }

        fn render_viewing(
            &mut self,
            scene: &ViewingScene<'_>,
            camera: &dyn CameraProjection,
        ) -> Result<PixelSurface, PaintError> {
            self.calls += 1;
            self.inner.render_viewing(scene, camera)
        }
    }

    fn counting(width: u32, height: u32) -> CountingRenderer {
        CountingRenderer {
            inner: SoftwareRenderer::new(width, height, CLEAR),
            calls: 0,
        }
    }

    fn front_camera() -> OrthographicCamera {
        OrthographicCamera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0, 1.0)
    }

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
    fn test_patch_rect_from_uvs() {
        let uvs = [
            Vec2::new(0.2, 0.3),
            Vec2::new(0.4, 0.3),
            Vec2::new(0.4, 0.5),
            Vec2::new(0.2, 0.5),
        ];
        let rect = PatchRect::from_uvs(uvs, (100, 100)).unwrap();
        assert_eq!(
            rect,
            PatchRect {
                x: 20,
                y: 50,
                width: 20,
                height: 20
            }
        );

        assert!(PatchRect::from_uvs(std::iter::empty(), (100, 100)).is_none());
        assert!(PatchRect::from_uvs(uvs, (0, 100)).is_none());
    }

    #[test]
    fn test_patch_rect_is_at_least_one_pixel() {
        let rect = PatchRect::from_uvs([Vec2::new(1.0, 0.0)], (10, 10)).unwrap();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (9, 9, 1, 1));
    }

    #[test]
    fn test_reconcile_patch_bounds() {
        let mesh = grid(1);
        let mut store = DualTextureStore::new(&mesh, &SurfaceConfig::default());
        store.mode = TextureMode::Drawing;
        store.drawing = Some(coordinate_surface(100, 100));
        store.drawing_uvs = vec![
            [
                Vec2::new(0.2, 0.3),
                Vec2::new(0.4, 0.3),
                Vec2::new(0.4, 0.5),
            ],
            [
                Vec2::new(0.2, 0.3),
                Vec2::new(0.4, 0.5),
                Vec2::new(0.2, 0.5),
            ],
        ];
        store.affected.add(0).unwrap();
        store.affected.add(1).unwrap();

        assert!(store.switch_to_viewing().unwrap());
        assert_eq!(store.mode(), TextureMode::Viewing);
        assert!(store.pending().is_empty());

        let patch = store.patches()[0].clone().unwrap();
        assert_eq!(patch.size(), (20, 20));
        // Sourced from pixel rect (20, 50)-(40, 70)
        assert_eq!(patch.get_pixel(0, 0), Some([20.0, 50.0, 0.0, 1.0]));
        assert_eq!(patch.get_pixel(19, 19), Some([39.0, 69.0, 0.0, 1.0]));
        assert!(Arc::ptr_eq(&patch, store.patches()[1].as_ref().unwrap()));

        // Corners land on the patch corners
        let uvs = store.viewing_uvs()[0];
        assert!((uvs[0] - Vec2::new(0.0, 0.0)).length() < 1e-4);
        assert!((uvs[1] - Vec2::new(1.0, 0.0)).length() < 1e-4);
        assert!((uvs[2] - Vec2::new(1.0, 1.0)).length() < 1e-4);

        // The bottom-left drawing corner samples the bottom-left patch pixel
        let sample = patch.sample_uv(Vec2::new(0.01, 0.01)).unwrap();
        assert_eq!(sample, [20.0, 69.0, 0.0, 1.0]);
        assert_eq!(store.stats().reconciliations, 1);
        assert_eq!(store.stats().faces_reconciled, 2);
    }

    #[test]
    fn test_switch_to_drawing_is_idempotent() {
        let mesh = PaintMesh::cube(1.0);
        let mut store = DualTextureStore::new(&mesh, &SurfaceConfig::default());
        let mut renderer = counting(64, 64);
        let camera = front_camera();

        assert!(store.switch_to_drawing(&mesh, &camera, &mut renderer).unwrap());
        assert!(!store.switch_to_drawing(&mesh, &camera, &mut renderer).unwrap());

        assert_eq!(renderer.calls, 1);
        assert_eq!(store.stats().projection_passes, 1);
        assert_eq!(store.mode(), TextureMode::Drawing);
        assert_eq!(store.drawing_surface().unwrap().size(), (64, 64));
    }

    #[test]
    fn test_drawing_uvs_follow_camera_projection() {
        let mesh = PaintMesh::cube(1.0);
        let mut store = DualTextureStore::new(&mesh, &SurfaceConfig::default());
        store
            .switch_to_drawing(&mesh, &front_camera(), &mut counting(64, 64))
            .unwrap();

        // Vertex 0 is (-0.5, -0.5, 0.5): NDC (-0.5, -0.5) -> UV (0.25, 0.25)
        assert!((store.vertex_drawing_uvs()[0] - Vec2::new(0.25, 0.25)).length() < 1e-5);
        // Face 0 corners are vertices 0, 1, 2
        let face = store.drawing_uvs()[0];
        assert!((face[1] - Vec2::new(0.75, 0.25)).length() < 1e-5);
        assert!((face[2] - Vec2::new(0.75, 0.75)).length() < 1e-5);
    }

    #[test]
    fn test_failed_render_commits_nothing() {
        let mesh = PaintMesh::cube(1.0);
        let mut store = DualTextureStore::new(&mesh, &SurfaceConfig::default());
        let mut renderer = counting(0, 0);

        let result = store.switch_to_drawing(&mesh, &front_camera(), &mut renderer);
        assert!(matches!(result, Err(PaintError::ResourceUnavailable(_))));
        assert_eq!(store.mode(), TextureMode::Viewing);
        assert!(store.drawing_surface().is_none());
        assert_eq!(store.stats().projection_passes, 0);
        assert!(store.drawing_uvs().iter().all(|uvs| *uvs == [Vec2::splat(0.5); 3]));
    }

    #[test]
    fn test_empty_reconcile_is_pixel_noop() {
        let mesh = PaintMesh::cube(1.0);
        let mut store = DualTextureStore::new(&mesh, &SurfaceConfig::default());
        let camera = front_camera();
        let mut renderer = counting(32, 32);

        assert!(!store.switch_to_viewing().unwrap());
        store.switch_to_drawing(&mesh, &camera, &mut renderer).unwrap();
        assert!(store.switch_to_viewing().unwrap());
        assert!(!store.switch_to_viewing().unwrap());

        assert_eq!(store.stats().reconciliations, 0);
        assert!(store.patches().iter().all(Option::is_none));
    }

    #[test]
    fn test_untouched_faces_keep_viewing_layout() {
        let mesh = PaintMesh::cube(1.0);
        let mut store = DualTextureStore::new(&mesh, &SurfaceConfig::default());
        store
            .switch_to_drawing(&mesh, &front_camera(), &mut counting(64, 64))
            .unwrap();
        let DrawingLayout { affected, .. } = store.drawing_layout().unwrap();
        affected.add(0).unwrap();
        store.switch_to_viewing().unwrap();

        assert!(store.patches()[0].is_some());
        for face_id in 1..mesh.face_count() {
            assert_eq!(store.viewing_uvs()[face_id], [Vec2::splat(0.5); 3]);
            assert!(store.patches()[face_id].is_none());
        }
    }

    #[test]
    fn test_discard_pending_forces_rerender() {
        let mesh = PaintMesh::cube(1.0);
        let mut store = DualTextureStore::new(&mesh, &SurfaceConfig::default());
        let camera = front_camera();
        let mut renderer = counting(16, 16);

        store.switch_to_drawing(&mesh, &camera, &mut renderer).unwrap();
        let DrawingLayout {
            surface, affected, ..
        } = store.drawing_layout().unwrap();
        affected.add(3).unwrap();
        surface.set_pixel(0, 0, [1.0, 0.0, 0.0, 1.0]);

        store.discard_pending();
        assert!(store.pending().is_empty());
        assert_eq!(store.mode(), TextureMode::Drawing);

        assert!(store.switch_to_drawing(&mesh, &camera, &mut renderer).unwrap());
        assert_eq!(renderer.calls, 2);
        assert_eq!(store.drawing_surface().unwrap().get_pixel(0, 0), Some(CLEAR));
    }

    #[test]
    fn test_drawing_layout_only_while_drawing() {
        let mesh = PaintMesh::cube(1.0);
        let mut store = DualTextureStore::new(&mesh, &SurfaceConfig::default());
        assert!(store.drawing_layout().is_none());
    }
}
