//! Actor construction parameters: collider boxes, surface material, descriptor

use glam::Vec3;
use rapier3d::prelude::*;

use crate::convert::to_vector;
use crate::error::{Error, Result};

/// Axis-aligned collider box in actor-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    /// Half extents along X, Y and Z
    pub half_extents: Vec3,
    /// Offset of the box centre from the body origin
    pub offset: Vec3,
}

impl BoxShape {
    pub fn new(half_extents: Vec3, offset: Vec3) -> Self {
        Self {
            half_extents,
            offset,
        }
    }

    /// Box of full `size` centred on the body origin
    pub fn from_size(size: Vec3) -> Self {
        Self::new(size * 0.5, Vec3::ZERO)
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Local Y of the lowest face
    pub fn bottom(&self) -> f32 {
        self.offset.y - self.half_extents.y
    }

    /// Local Y of the highest face
    pub fn top(&self) -> f32 {
        self.offset.y + self.half_extents.y
    }

    fn is_degenerate(&self) -> bool {
        !(self.half_extents.x > 0.0 && self.half_extents.y > 0.0 && self.half_extents.z > 0.0)
    }

    pub(crate) fn collider_builder(&self) -> ColliderBuilder {
        let h = self.half_extents;
        ColliderBuilder::cuboid(h.x, h.y, h.z).translation(to_vector(self.offset))
    }
}

/// Surface response shared by all colliders of one body
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    /// Friction coefficient, usually in [0, 1]
    pub friction: f32,
    /// Restitution (bounciness) in [0, 1]
    pub restitution: f32,
}

impl Material {
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        // rapier's collider defaults
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

/// Everything needed to create a [`RigidBodyActor`](super::RigidBodyActor)
#[derive(Debug, Clone)]
pub struct ActorDesc {
    /// Tag stored on the engine body, reported to contact partners
    pub name: String,
    pub initial_position: Vec3,
    /// Total body mass, split across the boxes by volume
    pub mass: f32,
    pub shapes: Vec<BoxShape>,
    pub material: Material,
}

impl ActorDesc {
    pub fn new(name: impl Into<String>, initial_position: Vec3, mass: f32) -> Self {
        Self {
            name: name.into(),
            initial_position,
            mass,
            shapes: Vec::new(),
            material: Material::default(),
        }
    }

    pub fn with_shape(mut self, shape: BoxShape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_shapes(mut self, shapes: impl IntoIterator<Item = BoxShape>) -> Self {
        self.shapes.extend(shapes);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(Error::NonPositiveMass {
                name: self.name.clone(),
                mass: self.mass,
            });
        }
        if self.shapes.is_empty() {
            return Err(Error::NoColliderShapes {
                name: self.name.clone(),
            });
        }
        if let Some(shape) = self.shapes.iter().find(|s| s.is_degenerate()) {
            return Err(Error::DegenerateShape {
                name: self.name.clone(),
                half_extents: shape.half_extents.to_array(),
            });
        }
        Ok(())
    }
}

/// Lowest local Y over all boxes
pub fn shapes_bottom(shapes: &[BoxShape]) -> f32 {
    shapes
        .iter()
        .map(BoxShape::bottom)
        .fold(f32::INFINITY, f32::min)
}

/// Highest local Y over all boxes
pub fn shapes_top(shapes: &[BoxShape]) -> f32 {
    shapes
        .iter()
        .map(BoxShape::top)
        .fold(f32::NEG_INFINITY, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_faces_follow_offset() {
        let head = BoxShape::from_size(Vec3::new(0.25, 0.3, 0.25)).with_offset(Vec3::Y * 0.85);

        assert!((head.bottom() - 0.7).abs() < 1e-6);
        assert!((head.top() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shapes_extent_over_compound() {
        let shapes = [
            BoxShape::from_size(Vec3::new(0.4, 1.4, 0.3)),
            BoxShape::from_size(Vec3::new(0.25, 0.3, 0.25)).with_offset(Vec3::Y * 0.85),
        ];

        assert!((shapes_bottom(&shapes) + 0.7).abs() < 1e-6);
        assert!((shapes_top(&shapes) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_mass() {
        let shape = BoxShape::from_size(Vec3::ONE);

        for mass in [0.0, -1.0, f32::NAN] {
            let desc = ActorDesc::new("crate", Vec3::ZERO, mass).with_shape(shape);
            assert!(matches!(
                desc.validate(),
                Err(Error::NonPositiveMass { .. })
            ));
        }
    }

    #[test]
    fn test_validate_rejects_missing_and_flat_shapes() {
        let empty = ActorDesc::new("ghost", Vec3::ZERO, 1.0);
        assert_eq!(
            empty.validate(),
            Err(Error::NoColliderShapes {
                name: "ghost".into()
            })
        );

        let flat = ActorDesc::new("sheet", Vec3::ZERO, 1.0)
            .with_shape(BoxShape::from_size(Vec3::new(1.0, 0.0, 1.0)));
        assert!(matches!(flat.validate(), Err(Error::DegenerateShape { .. })));
    }
}
