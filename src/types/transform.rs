//! Rotations applied while baking model geometry.

use super::Axis;
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Bake settings from a blockstate variant (whole-model rotation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeSettings {
    /// X rotation in degrees (0, 90, 180, 270).
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    pub y: i32,
}

impl BakeSettings {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this is an identity transform (no rotation).
    pub fn is_identity(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Rotation matrix around the model center.
    ///
    /// Angles are negated: Minecraft rotates clockwise, glam uses the right-hand rule.
    pub fn matrix(&self) -> Mat3 {
        let x_rot = Mat3::from_rotation_x((-self.x as f32).to_radians());
        let y_rot = Mat3::from_rotation_y((-self.y as f32).to_radians());
        y_rot * x_rot
    }

    /// Rotate a position given in normalized (-0.5 to 0.5) space.
    pub fn apply(&self, position: Vec3) -> Vec3 {
        if self.is_identity() {
            return position;
        }
        self.matrix() * position
    }
}

/// Element-level rotation from a model element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRotation {
    /// Origin point for rotation (in 0-16 Minecraft coordinates).
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees (-45 to 45, in 22.5 increments).
    pub angle: f32,
    /// Whether to rescale the element after rotation.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}

impl ElementRotation {
    pub fn normalized_origin(&self) -> Vec3 {
        Vec3::from(self.origin) / 16.0 - Vec3::splat(0.5)
    }

    /// Rescale factor that keeps a rotated element spanning its original size.
    pub fn rescale_factor(&self) -> f32 {
        if self.rescale {
            1.0 / self.angle.to_radians().cos()
        } else {
            1.0
        }
    }

    /// Rotate a normalized position around this rotation's origin.
    pub fn apply(&self, position: Vec3) -> Vec3 {
        let origin = self.normalized_origin();
        let angle = self.angle.to_radians();
        let rotation = match self.axis {
            Axis::X => Mat3::from_rotation_x(angle),
            Axis::Y => Mat3::from_rotation_y(angle),
            Axis::Z => Mat3::from_rotation_z(angle),
        };

        let rotated = rotation * (position - origin);
        let rescale = self.rescale_factor();
        let scaled = if rescale != 1.0 {
            // The rotation axis keeps its length.
            let keep = Vec3::from(self.axis.unit_vector());
            rotated * (keep + (Vec3::ONE - keep) * rescale)
        } else {
            rotated
        };

        scaled + origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_settings_leave_positions() {
        let p = Vec3::new(0.5, -0.5, 0.25);
        assert_eq!(BakeSettings::default().apply(p), p);
    }

    #[test]
    fn test_y_rotation_moves_north_to_east() {
        // North face center (z = -0.5) rotated 90 degrees clockwise ends up east (x = +0.5).
        let rotated = BakeSettings::new(0, 90).apply(Vec3::new(0.0, 0.0, -0.5));
        assert!((rotated.x - 0.5).abs() < 1e-5);
        assert!(rotated.z.abs() < 1e-5);
    }

    #[test]
    fn test_element_rotation_keeps_origin() {
        let rotation = ElementRotation {
            origin: [8.0, 8.0, 8.0],
            axis: Axis::Y,
            angle: 45.0,
            rescale: true,
        };
        let center = rotation.apply(Vec3::ZERO);
        assert!(center.length() < 1e-5);
    }
}
