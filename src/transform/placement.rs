//! Per-item placement on the canvas and the rules for changing it.

use crate::{
    config::GesturePolicy,
    foundation::core::{Affine, Point, Size, Vec2},
    foundation::error::{CapsuleError, CapsuleResult},
    foundation::math::Rng64,
};

/// Committed placement of one item: offset from canvas center, uniform scale, rotation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub offset: Vec2,
    pub scale: f64, // always > 0
    pub rotation_deg: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        scale: 1.0,
        rotation_deg: 0.0,
    };

    pub fn at_offset(offset: Vec2) -> Self {
        Self {
            offset,
            ..Self::IDENTITY
        }
    }

    /// Drag commit: adds to the offset.
    pub fn apply_translation_delta(&mut self, dx: f64, dy: f64) -> CapsuleResult<()> {
        if !(dx.is_finite() && dy.is_finite()) {
            return Err(CapsuleError::validation("translation delta must be finite"));
        }
        self.offset += Vec2::new(dx, dy);
        Ok(())
    }

    /// Pinch commit: multiplies the scale by a factor relative to gesture start.
    pub fn apply_scale_delta(&mut self, factor: f64) -> CapsuleResult<()> {
        check_scale_factor(factor)?;
        let next = self.scale * factor;
        if !(next.is_finite() && next > 0.0) {
            return Err(CapsuleError::validation(format!(
                "scale {} * {factor} leaves the representable range",
                self.scale
            )));
        }
        self.scale = next;
        Ok(())
    }

    /// Rotation commit: adds degrees.
    pub fn apply_rotation_delta(&mut self, degrees: f64) -> CapsuleResult<()> {
        if !degrees.is_finite() {
            return Err(CapsuleError::validation("rotation delta must be finite"));
        }
        self.rotation_deg += degrees;
        Ok(())
    }

    /// Gesture-end policy. Returns the pre-snap scale when the floor kicked in.
    pub fn settle(&mut self, policy: &GesturePolicy) -> Option<f64> {
        if self.scale < policy.min_scale {
            let before = self.scale;
            self.scale = policy.min_scale;
            return Some(before);
        }
        None
    }

    /// Committed transform with an in-flight gesture folded in. Display only; never persisted.
    pub fn composed_with(self, delta: &GestureDelta) -> Self {
        Self {
            offset: self.offset + delta.translation,
            scale: self.scale * delta.scale_factor,
            rotation_deg: self.rotation_deg + delta.rotation_deg,
        }
    }

    /// Matrix mapping source image pixels onto the canvas.
    ///
    /// The image is centered on its own midpoint and fitted to `base_width` (height follows
    /// the aspect ratio), then scaled, rotated and finally translated to
    /// `canvas_center + offset`.
    pub fn placement_affine(self, source: Size, base_width: f64, canvas_center: Point) -> Affine {
        let fit = if source.width > 0.0 {
            base_width / source.width
        } else {
            1.0
        };

        let t_center = Affine::translate(Vec2::new(-source.width / 2.0, -source.height / 2.0));
        let t_fit = Affine::scale(fit);
        let t_scale = Affine::scale(self.scale);
        let t_rotate = Affine::rotate(self.rotation_deg.to_radians());
        let t_translate = Affine::translate(canvas_center.to_vec2() + self.offset);

        // Canonical order:
        // T(center + offset) * R(rot) * S(scale) * S(fit) * T(-size / 2)
        t_translate * t_rotate * t_scale * t_fit * t_center
    }
}

/// Uncommitted deltas of the gestures currently in flight on one item.
///
/// Drag, pinch and rotate each own one field, so concurrently recognized gestures never
/// write the same value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureDelta {
    /// Cumulative drag translation since the drag began.
    pub translation: Vec2,
    /// Pinch factor relative to the pinch start.
    pub scale_factor: f64,
    /// Cumulative rotation since the rotate gesture began.
    pub rotation_deg: f64,
}

impl Default for GestureDelta {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale_factor: 1.0,
            rotation_deg: 0.0,
        }
    }
}

impl GestureDelta {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Random offset within `[-radius, radius]` on each axis, used for fresh placements.
pub fn jitter_offset(rng: &mut Rng64, radius: f64) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(rng.next_range(-radius, radius), rng.next_range(-radius, radius))
}

pub(crate) fn check_scale_factor(factor: f64) -> CapsuleResult<()> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(CapsuleError::validation(format!(
            "scale factor must be finite and > 0, got {factor}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/transform/placement.rs"]
mod tests;
