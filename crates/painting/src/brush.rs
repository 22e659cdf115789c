//! Brush collaborator: turns pointer samples into pixels on the drawing surface.
//!
//! [`BrushEngine`] interpolates pointer samples into evenly spaced dabs.
//! [`Brush`] renders each dab with one of a closed set of tips selected by
//! [`BrushKind`]. The stroke coordinator only sees the [`StrokeRenderer`]
//! capability and never inspects the pixels a brush produces.

use std::f32::consts::TAU;

use glam::Vec2;
use image::DynamicImage;
use surfpaint_config::{BlendMode, BrushKind, BrushSettings};
use tracing::debug;

use crate::constants::{
    MIN_DAB_SPACING, MIN_STROKE_MOVEMENT, SCATTER_PARTICLE_SCALE, SPOKE_HALF_WIDTH,
};
use crate::error::PaintError;
use crate::geometry::point_segment_distance;
use crate::surface::PixelSurface;

/// What the stroke coordinator needs from a brush.
///
/// Points are in drawing-surface pixel coordinates (top-left origin).
pub trait StrokeRenderer {
    /// Start a stroke at `point`.
    fn begin(&mut self, surface: &mut PixelSurface, point: Vec2);
    /// Extend the active stroke to `point`.
    fn continue_to(&mut self, surface: &mut PixelSurface, point: Vec2);
    /// Finish the active stroke.
    fn end(&mut self, surface: &mut PixelSurface);
    /// Impact radius in pixels; sizes the flood-fill circle.
    fn radius(&self) -> f32;
}

/// A single dab produced by the brush engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DabOutput {
    /// Center in surface pixel coordinates
    pub center: Vec2,
    /// Radius in pixels
    pub radius: f32,
}

/// Generates dabs along the pointer path at a fixed spacing.
#[derive(Debug, Clone)]
pub struct BrushEngine {
    radius: f32,
    /// Spacing as a fraction of the diameter
    spacing: f32,
    /// Last position (None if stroke not started)
    last_pos: Option<Vec2>,
    /// Distance travelled since the last dab
    distance_since_dab: f32,
}

impl BrushEngine {
    pub fn new(radius: f32, spacing: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            spacing,
            last_pos: None,
            distance_since_dab: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Whether a stroke is in progress
    pub fn is_active(&self) -> bool {
        self.last_pos.is_some()
    }

    /// Start a new stroke
    pub fn begin_stroke(&mut self) {
        self.last_pos = None;
        self.distance_since_dab = 0.0;
    }

    /// Process a pointer sample and return the dabs to apply.
    ///
    /// The first sample of a stroke always yields one dab. Later samples
    /// place dabs every `diameter * spacing` pixels along the segment from
    /// the previous sample, carrying leftover distance between calls.
    /// A zero radius yields no dabs.
    pub fn stroke_to(&mut self, point: Vec2) -> Vec<DabOutput> {
        let mut dabs = Vec::new();
        if self.radius <= 0.0 {
            self.last_pos = Some(point);
            return dabs;
        }

        let Some(last) = self.last_pos else {
            self.last_pos = Some(point);
            self.distance_since_dab = 0.0;
            dabs.push(DabOutput {
                center: point,
                radius: self.radius,
            });
            return dabs;
        };

        let delta = point - last;
        let distance = delta.length();
        if distance < MIN_STROKE_MOVEMENT {
            return dabs;
        }

        let spacing_distance = (self.radius * 2.0 * self.spacing).max(MIN_DAB_SPACING);

        // Offset of the first dab on this segment
        let mut along = (spacing_distance - self.distance_since_dab).max(0.0);
        let mut last_dab = None;
        while along <= distance {
            dabs.push(DabOutput {
                center: last + delta * (along / distance),
                radius: self.radius,
            });
            last_dab = Some(along);
            along += spacing_distance;
        }

        self.distance_since_dab = match last_dab {
            Some(at) => distance - at,
            None => self.distance_since_dab + distance,
        };
        self.last_pos = Some(point);

        if !dabs.is_empty() {
            debug!(
                "BrushEngine::stroke_to: {} dabs from ({:.1}, {:.1}) to ({:.1}, {:.1})",
                dabs.len(),
                last.x,
                last.y,
                point.x,
                point.y
            );
        }

        dabs
    }

    /// End the current stroke
    pub fn end_stroke(&mut self) {
        self.last_pos = None;
        self.distance_since_dab = 0.0;
    }
}

/// Grayscale coverage mask for textured stamps. White and opaque paints.
#[derive(Debug, Clone, PartialEq)]
pub struct StampMask {
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl StampMask {
    pub fn from_image(image: &DynamicImage) -> Self {
        let luma = image.to_luma_alpha8();
        let coverage = luma
            .pixels()
            .map(|p| (p.0[0] as f32 / 255.0) * (p.0[1] as f32 / 255.0))
            .collect();
        Self {
            width: luma.width(),
            height: luma.height(),
            coverage,
        }
    }

    /// Coverage at normalized mask coordinates in `[0, 1]^2`, nearest sample.
    pub fn sample(&self, uv: Vec2) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 0.0;
        }
        let x = ((uv.x * self.width as f32).floor().max(0.0) as u32).min(self.width - 1);
        let y = ((uv.y * self.height as f32).floor().max(0.0) as u32).min(self.height - 1);
        self.coverage[(y * self.width + x) as usize]
    }
}

/// Dab shape of a [`Brush`].
#[derive(Debug, Clone)]
pub enum BrushTip {
    /// Round dab with hardness falloff
    Solid,
    /// Image mask stretched over the dab's bounding square
    Stamp(StampMask),
    /// Small hard particles scattered inside the dab
    Scatter { density: u32, rng: fastrand::Rng },
    /// Thin spokes radiating from the dab center
    StarBurst { spokes: u32 },
}

/// The engine's brush: a spacing engine plus one tip and its paint settings.
#[derive(Debug, Clone)]
pub struct Brush {
    engine: BrushEngine,
    tip: BrushTip,
    color: [f32; 4],
    hardness: f32,
    opacity: f32,
    blend_mode: BlendMode,
    seed: u64,
}

impl Brush {
    /// Build the brush described by `settings`.
    ///
    /// Stamp brushes load their mask from `settings.stamp_path`.
    pub fn from_settings(settings: &BrushSettings) -> Result<Self, PaintError> {
        let tip = match settings.kind {
            BrushKind::Solid => BrushTip::Solid,
            BrushKind::Stamp => {
                let path = settings.stamp_path.as_ref().ok_or_else(|| {
                    PaintError::ResourceUnavailable("stamp brush has no stamp_path".to_string())
                })?;
                BrushTip::Stamp(StampMask::from_image(&image::open(path)?))
            }
            BrushKind::Scatter => BrushTip::Scatter {
                density: settings.scatter_density,
                rng: fastrand::Rng::with_seed(settings.seed),
            },
            BrushKind::StarBurst => BrushTip::StarBurst {
                spokes: settings.spoke_count,
            },
        };
        Ok(Self::with_tip(settings, tip))
    }

    /// Build a brush from `settings` with an explicit tip.
    pub fn with_tip(settings: &BrushSettings, tip: BrushTip) -> Self {
        Self {
            engine: BrushEngine::new(settings.radius(), settings.spacing),
            tip,
            color: settings.color,
            hardness: settings.hardness.clamp(0.0, 1.0),
            opacity: settings.opacity.clamp(0.0, 1.0),
            blend_mode: settings.blend_mode,
            seed: settings.seed,
        }
    }

    pub fn tip(&self) -> &BrushTip {
        &self.tip
    }

    fn apply_dabs(&mut self, surface: &mut PixelSurface, dabs: &[DabOutput]) {
        for dab in dabs {
            self.apply_dab(surface, *dab);
        }
    }

    fn apply_dab(&mut self, surface: &mut PixelSurface, dab: DabOutput) {
        if dab.radius <= 0.0 || self.opacity <= 0.0 {
            return;
        }
        let paint = Paint {
            color: self.color,
            opacity: self.opacity,
            blend_mode: self.blend_mode,
        };
        let hardness = self.hardness;

        match &mut self.tip {
            BrushTip::Solid => {
                paint.footprint(surface, dab.center, dab.radius, |offset| {
                    let distance = offset.length() / dab.radius;
                    if distance > 1.0 {
                        0.0
                    } else {
                        calculate_hardness_falloff(distance, hardness)
                    }
                });
            }
            BrushTip::Stamp(mask) => {
                paint.footprint(surface, dab.center, dab.radius, |offset| {
                    let uv = (offset / dab.radius + Vec2::ONE) * 0.5;
                    mask.sample(uv)
                });
            }
            BrushTip::Scatter { density, rng } => {
                let particle_radius = (dab.radius * SCATTER_PARTICLE_SCALE).max(0.5);
                for _ in 0..*density {
                    let angle = rng.f32() * TAU;
                    let reach = dab.radius * rng.f32().sqrt();
                    let center = dab.center + Vec2::from_angle(angle) * reach;
                    paint.footprint(surface, center, particle_radius, |offset| {
                        if offset.length() <= particle_radius {
                            1.0
                        } else {
                            0.0
                        }
                    });
                }
            }
            BrushTip::StarBurst { spokes } => {
                let ends: Vec<Vec2> = (0..*spokes)
                    .map(|i| Vec2::from_angle(i as f32 * TAU / *spokes as f32) * dab.radius)
                    .collect();
                paint.footprint(surface, dab.center, dab.radius, |offset| {
                    let length = offset.length();
                    if length > dab.radius {
                        return 0.0;
                    }
                    let on_spoke = ends
                        .iter()
                        .any(|&end| point_segment_distance(offset, Vec2::ZERO, end) <= SPOKE_HALF_WIDTH);
                    if on_spoke {
                        calculate_hardness_falloff(length / dab.radius, hardness)
                    } else {
                        0.0
                    }
                });
            }
        }
    }
}

impl StrokeRenderer for Brush {
    fn begin(&mut self, surface: &mut PixelSurface, point: Vec2) {
        self.engine.begin_stroke();
        if let BrushTip::Scatter { rng, .. } = &mut self.tip {
            rng.seed(self.seed);
        }
        let dabs = self.engine.stroke_to(point);
        self.apply_dabs(surface, &dabs);
    }

    fn continue_to(&mut self, surface: &mut PixelSurface, point: Vec2) {
        if !self.engine.is_active() {
            return;
        }
        let dabs = self.engine.stroke_to(point);
        self.apply_dabs(surface, &dabs);
    }

    fn end(&mut self, _surface: &mut PixelSurface) {
        self.engine.end_stroke();
    }

    fn radius(&self) -> f32 {
        self.engine.radius()
    }
}

/// Color and compositing shared by every tip.
#[derive(Debug, Clone, Copy)]
struct Paint {
    color: [f32; 4],
    opacity: f32,
    blend_mode: BlendMode,
}

impl Paint {
    /// Composite over the pixels within `radius` of `center`.
    /// `coverage` receives the pixel-center offset from `center`.
    fn footprint(
        &self,
        surface: &mut PixelSurface,
        center: Vec2,
        radius: f32,
        mut coverage: impl FnMut(Vec2) -> f32,
    ) {
        let (width, height) = surface.size();
        let x_min = ((center.x - radius).floor().max(0.0) as u32).min(width);
        let y_min = ((center.y - radius).floor().max(0.0) as u32).min(height);
        let x_max = ((center.x + radius).ceil().max(0.0) as u32).min(width);
        let y_max = ((center.y + radius).ceil().max(0.0) as u32).min(height);

        for py in y_min..y_max {
            for px in x_min..x_max {
                let offset = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center;
                let amount = coverage(offset);
                if amount <= 0.0 {
                    continue;
                }
                let effective_opacity = self.opacity * amount.min(1.0);
                match self.blend_mode {
                    BlendMode::Normal => {
                        surface.blend_pixel(px, py, self.color, effective_opacity)
                    }
                    BlendMode::Erase => surface.erase_pixel(px, py, effective_opacity),
                }
            }
        }
    }
}

/// Calculate falloff based on hardness
/// distance_normalized is 0 at center, 1 at edge
/// hardness is 0.0 (soft) to 1.0 (hard)
#[inline]
pub fn calculate_hardness_falloff(distance_normalized: f32, hardness: f32) -> f32 {
    let t = distance_normalized.clamp(0.0, 1.0);
    let soft = 1.0 - t;
    soft * (1.0 - hardness) + hardness
}
