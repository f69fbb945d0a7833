//! Read-only transform access for presentation code

use glam::{Quat, Vec3};

/// Anything with a position and rotation in 3D space that can be read
/// without a physics world.
///
/// Implemented by [`RigidBodyActor`](crate::RigidBodyActor), which caches the
/// engine transform on every synchronization.
pub trait Object {
    /// Get the current position
    fn position(&self) -> Vec3;

    /// Get the current rotation as a quaternion
    fn rotation(&self) -> Quat;

    /// Map a point from object-local space to world space
    fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position() + self.rotation() * local
    }
}
