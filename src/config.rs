use crate::foundation::{
    core::{Canvas, Rgba8},
    error::{CapsuleError, CapsuleResult},
};

/// Rules applied when a gesture ends and its delta is committed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GesturePolicy {
    /// Committed scale never stays below this value; smaller results snap back to it.
    pub min_scale: f64,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        Self { min_scale: 1.0 }
    }
}

/// Explicit configuration for a canvas session and its snapshot output.
///
/// Nothing in the engine reads ambient or global settings; hosts pass this value in.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Snapshot raster size. Item offsets are measured from its center.
    pub canvas: Canvas,
    /// Width every item image is fitted to before its own scale applies.
    pub base_display_width: f64,
    /// Newly added items land within `[-jitter_radius, jitter_radius]` of center on each axis.
    pub jitter_radius: f64,
    pub gesture: GesturePolicy,
    /// Snapshot background.
    pub background: Rgba8,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 400,
                height: 400,
            },
            base_display_width: 150.0,
            jitter_radius: 20.0,
            gesture: GesturePolicy::default(),
            background: Rgba8::WHITE,
        }
    }
}

impl CanvasConfig {
    pub fn validate(&self) -> CapsuleResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if !(self.base_display_width.is_finite() && self.base_display_width > 0.0) {
            return Err(CapsuleError::validation(
                "base_display_width must be finite and > 0",
            ));
        }
        if !(self.jitter_radius.is_finite() && self.jitter_radius >= 0.0) {
            return Err(CapsuleError::validation(
                "jitter_radius must be finite and >= 0",
            ));
        }
        if !(self.gesture.min_scale.is_finite() && self.gesture.min_scale > 0.0) {
            return Err(CapsuleError::validation(
                "gesture.min_scale must be finite and > 0",
            ));
        }
        Ok(())
    }
}
