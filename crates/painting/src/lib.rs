//! Surfpaint - paint directly onto triangle meshes from screen space
//!
//! While a stroke is active the mesh is textured with a screen-aligned
//! drawing layout, so the brush paints into a flat pixel surface. When the
//! stroke ends, the faces it touched are cut out into per-face patches that
//! survive camera changes.
//!
//! - [`coordinator`] - Stroke state machine driving everything below
//! - [`texture_store`] - Drawing and viewing layouts, reconciliation
//! - [`flood_fill`] - Connectivity-bounded face selection per pointer sample
//! - [`adjacency`] - Face neighbor graph
//! - [`face_set`] - Reusable insertion-ordered face set
//! - [`brush`] - Stroke renderer and brush tips
//! - [`render`] - Viewing-layout renderer producing the drawing surface
//! - [`camera`] - Projection capability and two camera implementations
//! - [`mesh`] - Immutable triangle mesh and raycasting
//! - [`surface`] - CPU RGBA pixel surface

pub mod adjacency;
pub mod brush;
pub mod camera;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod face_set;
pub mod flood_fill;
pub mod geometry;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod surface;
pub mod texture_store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use adjacency::FaceAdjacencyGraph;
pub use brush::{Brush, BrushEngine, BrushTip, DabOutput, StampMask, StrokeRenderer};
pub use camera::{CameraProjection, Orbit, OrthographicCamera, PerspectiveCamera, Ray};
pub use constants::*;
pub use coordinator::StrokeCoordinator;
pub use error::PaintError;
pub use face_set::AffectedFaceSet;
pub use flood_fill::{FillContext, SurfaceFloodFill};
pub use mesh::{MeshFace, PaintMesh};
pub use render::{SoftwareRenderer, ViewRenderer, ViewingScene};
pub use surface::PixelSurface;
pub use texture_store::{DrawingLayout, DualTextureStore, PatchRect};
pub use types::*;

pub use surfpaint_config as config;
