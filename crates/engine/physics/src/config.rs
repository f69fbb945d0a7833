//! Tunable simulation parameters with the game's stock values

use glam::Vec3;

use crate::actor::{ActorDesc, BoxShape, Material};

/// World-wide simulation settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsConfig {
    /// Downward acceleration magnitude (m/s²)
    pub gravity: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Linear speed cap applied to the rider every frame
    pub max_velocity: f32,
    /// Speeds below this count as resting
    pub min_velocity: f32,
    /// Fixed step length in seconds
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            friction: 0.8,
            restitution: 0.3,
            max_velocity: 50.0,
            min_velocity: 0.1,
            timestep: 1.0 / 60.0,
        }
    }
}

impl PhysicsConfig {
    pub fn gravity_vector(&self) -> Vec3 {
        Vec3::new(0.0, -self.gravity, 0.0)
    }

    pub fn material(&self) -> Material {
        Material::new(self.friction, self.restitution)
    }
}

/// Rider body: a torso box with a head box resting on top
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    pub mass: f32,
    pub initial_position: Vec3,
    /// Full torso size
    pub body: Vec3,
    /// Full head size
    pub head: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mass: 70.0,
            initial_position: Vec3::new(0.0, 5.0, 0.0),
            body: Vec3::new(0.4, 1.4, 0.3),
            head: Vec3::new(0.25, 0.3, 0.25),
        }
    }
}

impl PlayerConfig {
    pub fn shapes(&self) -> Vec<BoxShape> {
        let head_offset = (self.body.y + self.head.y) * 0.5;
        vec![
            BoxShape::from_size(self.body),
            BoxShape::from_size(self.head).with_offset(Vec3::Y * head_offset),
        ]
    }

    pub fn desc(&self, name: &str, material: Material) -> ActorDesc {
        ActorDesc::new(name, self.initial_position, self.mass)
            .with_shapes(self.shapes())
            .with_material(material)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnowboardConfig {
    /// Full board size
    pub size: Vec3,
    pub mass: f32,
}

impl Default for SnowboardConfig {
    fn default() -> Self {
        Self {
            size: Vec3::new(0.5, 0.02, 1.0),
            mass: 5.0,
        }
    }
}

impl SnowboardConfig {
    pub fn shapes(&self) -> Vec<BoxShape> {
        vec![BoxShape::from_size(self.size)]
    }

    pub fn desc(&self, name: &str, position: Vec3, material: Material) -> ActorDesc {
        ActorDesc::new(name, position, self.mass)
            .with_shapes(self.shapes())
            .with_material(material)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerrainConfig {
    pub width: f32,
    pub depth: f32,
    /// Zero selects the flat plane
    pub slope_angle_degrees: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            depth: 1000.0,
            slope_angle_degrees: 0.0,
        }
    }
}
