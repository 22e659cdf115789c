//! Stroke state machine: pointer events in, flood fill and brush calls out.
//!
//! ```text
//!            begin_stroke (hit)                 end_stroke
//!   Idle ---------------------------> Painting -----------> Idle
//!    ^   begin_stroke (miss) = Idle      |  continue_stroke
//!    |                                   v
//!    +---------- cancel / error ---------+
//! ```
//!
//! A stroke switches the store to drawing mode, grows the affected set on
//! every pointer sample and reconciles it into the viewing layout at the end.
//! Any `ResourceUnavailable` aborts the stroke and discards its faces.

use glam::Vec2;
use surfpaint_config::PaintConfig;
use tracing::{debug, warn};

use crate::adjacency::FaceAdjacencyGraph;
use crate::brush::{Brush, StrokeRenderer};
use crate::camera::CameraProjection;
use crate::error::PaintError;
use crate::flood_fill::{FillContext, SurfaceFloodFill};
use crate::mesh::PaintMesh;
use crate::projection::pixel_to_ndc;
use crate::render::{ViewRenderer, ViewingScene};
use crate::texture_store::{DrawingLayout, DualTextureStore};
use crate::types::{EngineStats, ImpactCircle, StrokeOutcome, TextureMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrokeState {
    Idle,
    /// Face hit by the latest pointer sample that hit the mesh
    Painting { last_face: u32 },
}

/// Owns the mesh, its adjacency, both texture layouts and the brush, and
/// drives them from pointer events.
pub struct StrokeCoordinator<B: StrokeRenderer = Brush> {
    mesh: PaintMesh,
    graph: FaceAdjacencyGraph,
    store: DualTextureStore,
    fill: SurfaceFloodFill,
    brush: B,
    state: StrokeState,
}

impl StrokeCoordinator<Brush> {
    /// Validate `config`, build the adjacency graph and the configured brush.
    pub fn new(mesh: PaintMesh, config: &PaintConfig) -> Result<Self, PaintError> {
        config.validate()?;
        let brush = Brush::from_settings(&config.brush)?;
        Ok(Self::with_brush(mesh, config, brush))
    }
}

impl<B: StrokeRenderer> StrokeCoordinator<B> {
    /// Use a caller-supplied stroke renderer instead of the configured brush.
    pub fn with_brush(mesh: PaintMesh, config: &PaintConfig, brush: B) -> Self {
        let graph = FaceAdjacencyGraph::build_with(&mesh, config.adjacency);
        let store = DualTextureStore::new(&mesh, &config.surface);
        let fill = SurfaceFloodFill::new(mesh.face_count());
        Self {
            mesh,
            graph,
            store,
            fill,
            brush,
            state: StrokeState::Idle,
        }
    }

    /// Start a stroke at `pointer` (pixels, top-left origin, in the
    /// renderer's target).
    ///
    /// A pointer that misses the mesh returns [`StrokeOutcome::Missed`] and
    /// stays idle. A stroke already in progress is ended first.
    pub fn begin_stroke(
        &mut self,
        pointer: Vec2,
        camera: &dyn CameraProjection,
        renderer: &mut dyn ViewRenderer,
    ) -> Result<StrokeOutcome, PaintError> {
        if self.is_painting() {
            self.end_stroke()?;
        }

        let size = renderer.size();
        if size.0 == 0 || size.1 == 0 {
            return Err(self.abort(PaintError::ResourceUnavailable(format!(
                "viewport is {}x{}",
                size.0, size.1
            ))));
        }

        let ray = camera.ray(pixel_to_ndc(pointer, size));
        let Some(hit) = self.mesh.raycast(ray.origin, ray.direction) else {
            debug!(
                "StrokeCoordinator: begin at ({:.1}, {:.1}) missed the mesh",
                pointer.x, pointer.y
            );
            return Ok(StrokeOutcome::Missed);
        };

        self.fill.reset();
        self.store.discard_pending();
        if let Err(err) = self.store.switch_to_drawing(&self.mesh, camera, renderer) {
            return Err(self.abort(err));
        }

        let faces_added = match self.paint_sample(hit.face_id, pointer, camera, true) {
            Ok(added) => added,
            Err(err) => return Err(self.abort(err)),
        };
        self.state = StrokeState::Painting {
            last_face: hit.face_id,
        };

        debug!(
            "StrokeCoordinator: begin on face {} at ({:.1}, {:.1}), {} faces",
            hit.face_id, pointer.x, pointer.y, faces_added
        );
        Ok(StrokeOutcome::Started {
            face_id: hit.face_id,
            faces_added,
        })
    }

    /// Extend the active stroke to `pointer`.
    ///
    /// The fill is seeded at the face under the pointer, or at the last face
    /// hit when the pointer has left the mesh.
    pub fn continue_stroke(
        &mut self,
        pointer: Vec2,
        camera: &dyn CameraProjection,
    ) -> Result<StrokeOutcome, PaintError> {
        let StrokeState::Painting { last_face } = self.state else {
            return Ok(StrokeOutcome::Ignored);
        };

        let Some(size) = self.store.drawing_surface().map(|s| s.size()) else {
            return Err(self.abort(PaintError::ResourceUnavailable(
                "drawing surface lost during stroke".to_string(),
            )));
        };
        let ray = camera.ray(pixel_to_ndc(pointer, size));
        let seed = self
            .mesh
            .raycast(ray.origin, ray.direction)
            .map_or(last_face, |hit| hit.face_id);

        let faces_added = match self.paint_sample(seed, pointer, camera, false) {
            Ok(added) => added,
            Err(err) => return Err(self.abort(err)),
        };
        self.state = StrokeState::Painting { last_face: seed };

        if faces_added > 0 {
            debug!(
                "StrokeCoordinator: continue on face {}, {} new faces",
                seed, faces_added
            );
        }
        Ok(StrokeOutcome::Continued { faces_added })
    }

    /// Finish the stroke and reconcile its faces into the viewing layout.
    ///
    /// Returns the number of faces reconciled; 0 when no stroke was active.
    pub fn end_stroke(&mut self) -> Result<usize, PaintError> {
        if !self.is_painting() {
            return Ok(0);
        }

        if let Some(DrawingLayout { surface, .. }) = self.store.drawing_layout() {
            self.brush.end(surface);
        }
        let reconciled = self.store.pending().len();
        self.state = StrokeState::Idle;
        self.store.switch_to_viewing()?;

        debug!("StrokeCoordinator: end, {} faces reconciled", reconciled);
        Ok(reconciled)
    }

    /// Drop the active stroke without reconciling.
    ///
    /// The store is left in drawing mode; the next [`Self::view_changed`] or
    /// stroke returns it to a clean state.
    pub fn cancel_stroke(&mut self) {
        if !self.is_painting() {
            return;
        }
        if let Some(DrawingLayout { surface, .. }) = self.store.drawing_layout() {
            self.brush.end(surface);
        }
        self.store.discard_pending();
        self.fill.reset();
        self.state = StrokeState::Idle;
        debug!("StrokeCoordinator: stroke cancelled");
    }

    /// Call before the camera or viewport changes.
    ///
    /// Ends an active stroke and returns the store to viewing mode so that
    /// drawing UVs are re-projected for the new view on the next stroke.
    pub fn view_changed(&mut self) -> Result<bool, PaintError> {
        if self.is_painting() {
            self.end_stroke()?;
            return Ok(true);
        }
        self.store.switch_to_viewing()
    }

    pub fn is_painting(&self) -> bool {
        matches!(self.state, StrokeState::Painting { .. })
    }

    /// What the render path draws between strokes.
    pub fn viewing_scene(&self) -> ViewingScene<'_> {
        self.store.viewing_scene(&self.mesh)
    }

    pub fn mode(&self) -> TextureMode {
        self.store.mode()
    }

    pub fn stats(&self) -> EngineStats {
        self.store.stats()
    }

    pub fn mesh(&self) -> &PaintMesh {
        &self.mesh
    }

    pub fn graph(&self) -> &FaceAdjacencyGraph {
        &self.graph
    }

    pub fn texture_store(&self) -> &DualTextureStore {
        &self.store
    }

    pub fn brush(&self) -> &B {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut B {
        &mut self.brush
    }

    /// Flood fill from `seed` around `pointer`, then hand the sample to the brush.
    fn paint_sample(
        &mut self,
        seed: u32,
        pointer: Vec2,
        camera: &dyn CameraProjection,
        first: bool,
    ) -> Result<usize, PaintError> {
        let DrawingLayout {
            uvs,
            surface,
            affected,
        } = self.store.drawing_layout().ok_or_else(|| {
            PaintError::ResourceUnavailable("store is not in drawing mode".to_string())
        })?;

        let ctx = FillContext {
            mesh: &self.mesh,
            graph: &self.graph,
            drawing_uvs: uvs,
            surface_size: surface.size(),
            view_direction: camera.view_direction(),
        };
        let circle = ImpactCircle::new(pointer, self.brush.radius());
        let added = self.fill.fill(seed, circle, &ctx, affected)?;

        if first {
            self.brush.begin(surface, pointer);
        } else {
            self.brush.continue_to(surface, pointer);
        }
        Ok(added)
    }

    /// Reset to idle after a failure, discarding the stroke's faces.
    fn abort(&mut self, err: PaintError) -> PaintError {
        warn!("StrokeCoordinator: stroke aborted: {}", err);
        if self.is_painting() {
            if let Some(DrawingLayout { surface, .. }) = self.store.drawing_layout() {
                self.brush.end(surface);
            }
        }
        self.store.discard_pending();
        self.fill.reset();
        self.state = StrokeState::Idle;
        err
    }
}
