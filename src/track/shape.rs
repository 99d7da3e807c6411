//! Render and collision primitives
//!
//! Every block is described by convex hexahedra: oriented boxes for straight
//! pieces and 8-corner prisms for curved sub-segments. Corners are ordered
//! bottom face first (0..4) then top face (4..8), matching index by index.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Classification key shared by renderer (material) and physics (friction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    Road,
    Wall,
    Turbo,
    StartRing,
    FinishRing,
    CheckpointRing,
}

impl SurfaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceKind::Road => "road",
            SurfaceKind::Wall => "wall",
            SurfaceKind::Turbo => "turbo",
            SurfaceKind::StartRing => "start-ring",
            SurfaceKind::FinishRing => "finish-ring",
            SurfaceKind::CheckpointRing => "checkpoint-ring",
        }
    }
}

/// Rigid transform (rotation then translation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        self.rotation * p + self.translation
    }

    /// `self` applied after `inner`
    pub fn compose(&self, inner: &Transform) -> Transform {
        Transform {
            translation: self.apply(inner.translation),
            rotation: self.rotation * inner.rotation,
        }
    }
}

/// Rotation about the road's travel axis for a road segment heading along
/// `yaw`: turn into the segment frame, roll about its Z, turn back.
pub fn road_roll(yaw: Quat, roll: f32) -> Quat {
    yaw * Quat::from_rotation_z(roll) * yaw.inverse()
}

/// Convex solid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Oriented box
    Box {
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
    },
    /// Hexahedron given by its corners (bottom 0..4, top 4..8)
    Prism { corners: [Vec3; 8] },
}

impl Shape {
    pub fn aligned_box(center: Vec3, half_extents: Vec3) -> Self {
        Shape::Box {
            center,
            half_extents,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn corners(&self) -> [Vec3; 8] {
        match self {
            Shape::Box {
                center,
                half_extents: h,
                rotation,
            } => {
                let local = [
                    Vec3::new(-h.x, -h.y, -h.z),
                    Vec3::new(h.x, -h.y, -h.z),
                    Vec3::new(h.x, -h.y, h.z),
                    Vec3::new(-h.x, -h.y, h.z),
                    Vec3::new(-h.x, h.y, -h.z),
                    Vec3::new(h.x, h.y, -h.z),
                    Vec3::new(h.x, h.y, h.z),
                    Vec3::new(-h.x, h.y, h.z),
                ];
                local.map(|c| *rotation * c + *center)
            }
            Shape::Prism { corners } => *corners,
        }
    }

    pub fn centroid(&self) -> Vec3 {
        match self {
            Shape::Box { center, .. } => *center,
            Shape::Prism { corners } => corners.iter().copied().sum::<Vec3>() / 8.0,
        }
    }

    /// Rotate about `pivot`
    pub fn rotated_about(&self, pivot: Vec3, rotation: Quat) -> Shape {
        let about = Transform::new(pivot, rotation).compose(&Transform::new(-pivot, Quat::IDENTITY));
        self.transformed(&about)
    }

    pub fn transformed(&self, t: &Transform) -> Shape {
        match self {
            Shape::Box {
                center,
                half_extents,
                rotation,
            } => Shape::Box {
                center: t.apply(*center),
                half_extents: *half_extents,
                rotation: t.rotation * *rotation,
            },
            Shape::Prism { corners } => Shape::Prism {
                corners: corners.map(|c| t.apply(c)),
            },
        }
    }
}

/// A shape tagged with its surface classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    pub surface: SurfaceKind,
}

impl Primitive {
    pub fn new(shape: Shape, surface: SurfaceKind) -> Self {
        Self { shape, surface }
    }

    pub fn transformed(&self, t: &Transform) -> Primitive {
        Primitive {
            shape: self.shape.transformed(t),
            surface: self.surface,
        }
    }

    pub fn rotated_about(&self, pivot: Vec3, rotation: Quat) -> Primitive {
        Primitive {
            shape: self.shape.rotated_about(pivot, rotation),
            surface: self.surface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_box_corners_span_extents() {
        let shape = Shape::aligned_box(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 3.0));
        let corners = shape.corners();
        assert_eq!(corners[0], Vec3::new(-2.0, 0.0, -3.0));
        assert_eq!(corners[6], Vec3::new(2.0, 2.0, 3.0));
        assert!((shape.centroid() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_rotated_about_keeps_pivot() {
        let pivot = Vec3::new(0.0, 0.0, 5.0);
        let shape = Shape::aligned_box(Vec3::new(1.0, 0.0, 5.0), Vec3::splat(0.5));
        let rolled = shape.rotated_about(pivot, Quat::from_rotation_z(FRAC_PI_2));
        // (1,0) about the Z axis through the pivot lands on (0,1)
        assert!((rolled.centroid() - Vec3::new(0.0, 1.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_road_roll_axis_follows_yaw() {
        let yaw = Quat::from_rotation_y(FRAC_PI_2);
        let q = road_roll(yaw, 0.3);
        // Rolling about the travel direction leaves that direction fixed
        let travel = yaw * Vec3::Z;
        assert!((q * travel - travel).length() < 1e-5);
    }

    #[test]
    fn test_compose_order() {
        let a = Transform::new(Vec3::X, Quat::IDENTITY);
        let b = Transform::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        let p = a.compose(&b).apply(Vec3::Z);
        assert!((p - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }
}
