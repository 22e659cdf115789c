//! Camera collaborator: projection, unprojection and eye position.
//!
//! Orbit/pan/zoom input handling lives in the host. The engine only needs
//! the current view-projection transform, so perspective and orthographic
//! cameras are two implementations of [`CameraProjection`].

use glam::{Mat4, Vec2, Vec3};

/// A pick ray in mesh space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Normalized direction
    pub direction: Vec3,
}

/// Capability the engine consumes from a camera.
///
/// NDC follows glam's right-handed convention: x and y in -1..1 (y up),
/// depth in 0..1 from the near to the far plane.
pub trait CameraProjection {
    /// Combined projection * view matrix
    fn view_projection(&self) -> Mat4;

    /// Camera position in mesh space
    fn eye_position(&self) -> Vec3;

    /// Project a mesh-space point to NDC `(x, y, depth)`.
    fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection().project_point3(point)
    }

    /// Map an NDC position at `depth` back to mesh space.
    fn unproject(&self, ndc: Vec2, depth: f32) -> Vec3 {
        self.view_projection()
            .inverse()
            .project_point3(ndc.extend(depth))
    }

    /// Ray from the near plane through `ndc`.
    fn ray(&self, ndc: Vec2) -> Ray {
        let near = self.unproject(ndc, 0.0);
        let far = self.unproject(ndc, 1.0);
        Ray {
            origin: near,
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Whether a mesh-space point lies in front of the camera.
    fn is_in_front(&self, point: Vec3) -> bool {
        let clip = self.view_projection() * point.extend(1.0);
        clip.w > 0.0 && (0.0..=clip.w).contains(&clip.z)
    }

    /// Unit vector from the origin toward the eye. Faces whose normals point
    /// along it are treated as front-facing.
    fn view_direction(&self) -> Vec3 {
        self.eye_position().normalize_or_zero()
    }
}

/// Orbit parameters around a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Horizontal angle (yaw) in radians
    pub yaw: f32,
    /// Vertical angle (pitch) in radians
    pub pitch: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 5.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Orbit {
    /// Calculate camera position from orbit parameters
    pub fn eye(&self) -> Vec3 {
        // Pitch is the angle from horizontal, yaw is the angle around Y
        let horizontal_distance = self.distance * self.pitch.cos();
        let y = self.distance * self.pitch.sin();
        let x = horizontal_distance * self.yaw.sin();
        let z = horizontal_distance * self.yaw.cos();

        self.target + Vec3::new(x, y, z)
    }
}

/// Pinhole camera with a vertical field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(eye: Vec3, target: Vec3, fov_y: f32, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Camera looking at an orbit's target from its eye position.
    pub fn orbiting(orbit: &Orbit, fov_y: f32, aspect: f32) -> Self {
        Self::new(orbit.eye(), orbit.target, fov_y, aspect)
    }
}

impl CameraProjection for PerspectiveCamera {
    fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
        projection * view
    }

    fn eye_position(&self) -> Vec3 {
        self.eye
    }
}

/// Parallel-projection camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Half the visible height in world units
    pub half_height: f32,
    /// Width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthographicCamera {
    pub fn new(eye: Vec3, target: Vec3, half_height: f32, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            half_height,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn orbiting(orbit: &Orbit, half_height: f32, aspect: f32) -> Self {
        Self::new(orbit.eye(), orbit.target, half_height, aspect)
    }
}

impl CameraProjection for OrthographicCamera {
    fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let half_width = self.half_height * self.aspect;
        let projection = Mat4::orthographic_rh(
            -half_width,
            half_width,
            -self.half_height,
            self.half_height,
            self.near,
            self.far,
        );
        projection * view
    }

    fn eye_position(&self) -> Vec3 {
        self.eye
    }
}

/// Project a point and return only its NDC xy.
pub fn project_xy(camera: &dyn CameraProjection, point: Vec3) -> Vec2 {
    camera.project(point).truncate()
}
