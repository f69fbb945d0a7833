use rapier3d::prelude::*;

use super::mesh::{ColliderKind, TerrainMesh, FLAT_COLLIDER_HALF_THICKNESS};
use crate::actor::Material;
use crate::collision::TERRAIN_TAG;
use crate::convert::to_point;
use crate::error::{Error, Result};
use crate::world::PhysicsWorld;

impl TerrainMesh {
    /// Build the collider matching [`collider_kind`](Self::collider_kind)
    ///
    /// `FlatBox` gives a cuboid whose top face is at y = 0, extending down
    /// by twice [`FLAT_COLLIDER_HALF_THICKNESS`]. `Trimesh`
    /// gives a triangle mesh built from the mesh arrays as they are.
    pub fn build_collider(&self, material: Material) -> Result<Collider> {
        let builder = match self.collider_kind() {
            ColliderKind::FlatBox => ColliderBuilder::cuboid(
                self.width() * 0.5,
                FLAT_COLLIDER_HALF_THICKNESS,
                self.depth() * 0.5,
            )
            .translation(vector![0.0, -FLAT_COLLIDER_HALF_THICKNESS, 0.0]),
            ColliderKind::Trimesh => {
                let vertices = self.vertices().iter().copied().map(to_point).collect();
                ColliderBuilder::trimesh(vertices, self.indices().to_vec())
                    .map_err(|e| Error::TrimeshBuild(e.to_string()))?
            }
        };

        Ok(builder
            .friction(material.friction)
            .restitution(material.restitution)
            .build())
    }
}

/// Handles of the static terrain body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainBody {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub kind: ColliderKind,
}

/// Add `mesh` to the world as a fixed body tagged [`TERRAIN_TAG`]
pub fn spawn_terrain(
    world: &mut PhysicsWorld,
    mesh: &TerrainMesh,
    material: Material,
) -> Result<TerrainBody> {
    let collider = mesh.build_collider(material)?;
    let body = world.add_named_rigid_body(RigidBodyBuilder::fixed().build(), TERRAIN_TAG);
    let collider = world.add_collider(collider, body);

    tracing::debug!(
        kind = ?mesh.collider_kind(),
        triangles = mesh.triangle_count(),
        "spawned terrain"
    );

    Ok(TerrainBody {
        body,
        collider,
        kind: mesh.collider_kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{generate_flat, generate_sloped};

    #[test]
    fn test_flat_collider_top_at_zero() {
        let mesh = generate_flat(20.0, 10.0).unwrap();
        let collider = mesh.build_collider(Material::default()).unwrap();

        let cuboid = collider.shape().as_cuboid().expect("Expected cuboid");
        assert_eq!(cuboid.half_extents.x, 10.0);
        assert_eq!(cuboid.half_extents.z, 5.0);
        assert_eq!(cuboid.half_extents.y, FLAT_COLLIDER_HALF_THICKNESS);

        let aabb = collider.compute_aabb();
        assert!(aabb.maxs.y.abs() < 1e-6);
        assert!((aabb.mins.y + 2.0 * FLAT_COLLIDER_HALF_THICKNESS).abs() < 1e-6);
    }

    #[test]
    fn test_sloped_collider_shares_arrays() {
        let mesh = generate_sloped(10.0, 4.0, 30.0).unwrap();
        let collider = mesh.build_collider(Material::new(0.8, 0.3)).unwrap();

        let trimesh = collider.shape().as_trimesh().expect("Expected trimesh");
        assert_eq!(trimesh.indices(), mesh.indices());
        assert_eq!(trimesh.vertices().len(), mesh.vertices().len());
        assert_eq!(collider.friction(), 0.8);
    }

    #[test]
    fn test_spawned_terrain_is_tagged() {
        let mut world = PhysicsWorld::new(glam::Vec3::new(0.0, -9.8, 0.0));
        let mesh = generate_flat(100.0, 100.0).unwrap();

        let terrain = spawn_terrain(&mut world, &mesh, Material::default()).unwrap();

        assert_eq!(world.body_name(terrain.body), Some(TERRAIN_TAG));
        assert!(world.get_rigid_body(terrain.body).unwrap().is_fixed());
    }
}
