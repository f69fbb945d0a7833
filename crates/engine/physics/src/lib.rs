mod actor;
mod collision;
mod config;
mod convert;
mod error;
mod joint;
mod object;
mod terrain;
mod world;

pub use actor::{
    shapes_bottom, shapes_top, ActorDesc, ActorTransform, BoxShape, Material, Readiness,
    ReadyEvent, ReadySignal, RigidBodyActor,
};
pub use collision::{
    contact_point, contact_point_at, is_terrain_contact, ContactEvent, ContactKind,
    ContactManifoldView, ContactPartner, ContactPartnerInfo, TERRAIN_TAG,
};
pub use config::{PhysicsConfig, PlayerConfig, SnowboardConfig, TerrainConfig};
pub use error::{Error, Result};
pub use joint::{couple, stacked_position, Coupling, CouplingGate, JointSpec};
pub use object::Object;
pub use terrain::{
    generate_flat, generate_sloped, spawn_terrain, triangle_normal, ColliderKind, TerrainBody,
    TerrainMesh, FLAT_COLLIDER_HALF_THICKNESS,
};
pub use world::PhysicsWorld;

// Re-export for convenience
pub use glam;
pub use rapier3d;
