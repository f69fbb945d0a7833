//! Procedural ground geometry
//!
//! A level plane backed by a thin box collider, or a sloped wedge whose
//! triangles are used unchanged for both drawing and collision.

mod collider;
mod mesh;

pub use collider::{spawn_terrain, TerrainBody};
pub use mesh::{
    generate_flat, generate_sloped, triangle_normal, ColliderKind, TerrainMesh,
    FLAT_COLLIDER_HALF_THICKNESS,
};
