//! Cursor: where the next block begins
//!
//! Headings are cardinal (90° steps about +Y). Heading 0 travels along +Z,
//! heading 1 along +X; turning left adds one step. Local vectors are rotated
//! into world space by swapping components, so cursor positions never pass
//! through trigonometry.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Yaw quaternions for the four headings (quarter turns about +Y)
const HEADING_YAW: [Quat; 4] = [
    Quat::IDENTITY,
    Quat::from_xyzw(0.0, FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2),
    Quat::from_xyzw(0.0, 1.0, 0.0, 0.0),
    Quat::from_xyzw(0.0, -FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2),
];

/// Cardinal travel direction (0..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Heading(u8);

impl Heading {
    pub const NORTH: Heading = Heading(0);

    pub fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Heading after a 90° left turn
    pub fn left(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    /// Heading after a 90° right turn
    pub fn right(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    /// Rotate a vector from block-local space into world space (exact)
    pub fn rotate(self, v: Vec3) -> Vec3 {
        match self.0 {
            0 => Vec3::new(v.x, v.y, v.z),
            1 => Vec3::new(v.z, v.y, -v.x),
            2 => Vec3::new(-v.x, v.y, -v.z),
            _ => Vec3::new(-v.z, v.y, v.x),
        }
    }

    /// Unit travel direction in world space
    pub fn forward(self) -> Vec3 {
        self.rotate(Vec3::Z)
    }

    /// Yaw as a quaternion (for orienting render/collision primitives)
    pub fn yaw(self) -> Quat {
        HEADING_YAW[self.0 as usize]
    }
}

/// Generator cursor: position, heading and current road roll
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub position: Vec3,
    pub heading: Heading,
    /// Roll of the road surface (radians, positive raises the left edge)
    pub bank: f32,
}

impl Cursor {
    pub fn new(position: Vec3, heading: Heading, bank: f32) -> Self {
        Self {
            position,
            heading,
            bank,
        }
    }

    /// World position of a point given in this cursor's local frame
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.heading.rotate(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_right_inverse() {
        for i in 0..4 {
            let h = Heading::new(i);
            assert_eq!(h.left().right(), h);
            assert_eq!(h.left().left().left().left(), h);
        }
    }

    #[test]
    fn test_rotate_matches_yaw() {
        let v = Vec3::new(3.0, 1.0, 7.0);
        for i in 0..4 {
            let h = Heading::new(i);
            let exact = h.rotate(v);
            let quat = h.yaw() * v;
            assert!((exact - quat).length() < 1e-4, "heading {i}: {exact} vs {quat}");
        }
    }

    #[test]
    fn test_left_is_plus_x_from_north() {
        assert_eq!(Heading::NORTH.forward(), Vec3::Z);
        assert_eq!(Heading::NORTH.left().forward(), Vec3::X);
        assert_eq!(Heading::NORTH.right().forward(), -Vec3::X);
    }
}
