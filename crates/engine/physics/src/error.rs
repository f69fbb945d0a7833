//! Error types for the slope physics core

use thiserror::Error;

/// Result type for slope physics operations
pub type Result<T> = std::result::Result<T, Error>;

/// Construction and setup errors.
///
/// These are programmer errors: they are reported as soon as the bad input is
/// seen and are never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Actor mass must be strictly positive and finite
    #[error("actor '{name}' has non-positive mass {mass}")]
    NonPositiveMass { name: String, mass: f32 },

    /// Actor needs at least one collider box
    #[error("actor '{name}' has no collider shapes")]
    NoColliderShapes { name: String },

    /// A collider box has a non-positive half extent
    #[error("actor '{name}' has a degenerate collider box {half_extents:?}")]
    DegenerateShape { name: String, half_extents: [f32; 3] },

    /// Coupling was attempted before the actor fired its ready signal
    #[error("actor '{name}' is not ready; couple only after both ready signals fired")]
    ActorNotReady { name: String },

    /// Actor and partner are the same body
    #[error("cannot couple actor '{name}' to itself")]
    SelfCoupling { name: String },

    /// Terrain dimensions or slope angle out of range
    #[error("invalid terrain: {0}")]
    InvalidTerrain(String),

    /// Rapier refused the triangle mesh
    #[error("trimesh build failed: {0}")]
    TrimeshBuild(String),
}
