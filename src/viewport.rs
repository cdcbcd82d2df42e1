use tracing::debug;

/// Lowest and highest pixel ratio the backing store is scaled by.
pub const MIN_PIXEL_RATIO: f32 = 1.0;
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Clamps a host pixel ratio into `[1, 2]`. Missing or nonsense ratios count as 1.
pub fn clamp_pixel_ratio(raw: f32) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        return MIN_PIXEL_RATIO;
    }
    raw.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
}

/// Logical drawing surface plus the physical backing store behind it.
///
/// Particles are simulated and drawn in logical units. Under egui the painter
/// applies `pixels_per_point` itself, so the backing size and transform scale
/// only describe the surface for hosts that allocate their own pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub backing_width: u32,
    pub backing_height: u32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, raw_pixel_ratio: f32) -> Self {
        let mut viewport = Self {
            width: 0.0,
            height: 0.0,
            pixel_ratio: MIN_PIXEL_RATIO,
            backing_width: 0,
            backing_height: 0,
        };
        viewport.resize(width, height, raw_pixel_ratio);
        viewport
    }

    /// Recomputes the backing store for a new logical size or pixel ratio.
    /// Returns `true` when anything changed.
    pub fn resize(&mut self, width: f32, height: f32, raw_pixel_ratio: f32) -> bool {
        let width = sanitize(width);
        let height = sanitize(height);
        let pixel_ratio = clamp_pixel_ratio(raw_pixel_ratio);
        let resized = Self {
            width,
            height,
            pixel_ratio,
            backing_width: (width * pixel_ratio).floor() as u32,
            backing_height: (height * pixel_ratio).floor() as u32,
        };

        if resized == *self {
            return false;
        }
        debug!(
            "Resized surface to {}x{} @{} ({}x{} backing)",
            width, height, pixel_ratio, resized.backing_width, resized.backing_height
        );
        *self = resized;
        true
    }

    /// Scale of the drawing transform from logical to backing pixels.
    pub fn transform_scale(&self) -> f32 {
        self.pixel_ratio
    }

    /// A surface with no area cannot be drawn on.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

fn sanitize(length: f32) -> f32 {
    if length.is_finite() { length.max(0.0) } else { 0.0 }
}
