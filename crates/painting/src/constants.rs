/// Epsilon for floating point comparisons in ray and barycentric tests.
pub const EPSILON: f32 = 1e-6;

/// Minimum movement (pixels) before the brush engine considers the pointer moved.
pub const MIN_STROKE_MOVEMENT: f32 = 0.001;

/// Smallest dab spacing in pixels. Prevents runaway dab generation.
pub const MIN_DAB_SPACING: f32 = 0.01;

/// Line half-width (pixels) used by star-burst spokes.
pub const SPOKE_HALF_WIDTH: f32 = 0.75;

/// Radius of a single scatter particle as a fraction of the brush radius.
pub const SCATTER_PARTICLE_SCALE: f32 = 0.12;
