//! Rigid-body actor
//!
//! One dynamic body plus its box colliders, with a cached transform that is
//! refreshed from the engine once per world step.

mod readiness;
mod shape;

pub use readiness::{Readiness, ReadyEvent, ReadySignal};
pub use shape::{shapes_bottom, shapes_top, ActorDesc, BoxShape, Material};

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::convert::{from_rotation, from_vector, to_rotation, to_vector};
use crate::error::Result;
use crate::object::Object;
use crate::world::PhysicsWorld;

/// Position and orientation read from the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

/// A named dynamic body driven by the physics world
///
/// Presentation code reads [`position`](Self::position) and
/// [`rotation`](Self::rotation), which only change on [`sync`](Self::sync).
/// Velocities are read straight from the engine.
#[derive(Debug)]
pub struct RigidBodyActor {
    name: String,
    body_handle: RigidBodyHandle,
    collider_handles: Vec<ColliderHandle>,
    shapes: Vec<BoxShape>,
    mass: f32,
    material: Material,
    initial_position: Vec3,
    transform: ActorTransform,
    last_synced_step: Option<u64>,
    /// Earliest world step count at which an uncleared force was applied
    force_step: Option<u64>,
    /// Sum of forces applied since the latest step, with that step count
    fresh_force: (u64, Vec3),
    ready: ReadySignal,
}

impl RigidBodyActor {
    /// Create the engine body and its colliders
    ///
    /// The body starts at `desc.initial_position` with identity rotation and
    /// zero velocity. Each box receives a share of `desc.mass` proportional to
    /// its volume.
    ///
    /// # Errors
    /// [`Error::NonPositiveMass`](crate::Error::NonPositiveMass),
    /// [`Error::NoColliderShapes`](crate::Error::NoColliderShapes) or
    /// [`Error::DegenerateShape`](crate::Error::DegenerateShape) for bad input.
    pub fn create(world: &mut PhysicsWorld, desc: ActorDesc) -> Result<Self> {
        desc.validate()?;

        // Thin boards would otherwise pass into the ground within one step
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(desc.initial_position))
            .ccd_enabled(true)
            .build();
        let body_handle = world.add_named_rigid_body(body, desc.name.clone());

        let total_volume: f32 = desc.shapes.iter().map(BoxShape::volume).sum();
        let collider_handles = desc
            .shapes
            .iter()
            .map(|shape| {
                let collider = shape
                    .collider_builder()
                    .mass(desc.mass * shape.volume() / total_volume)
                    .friction(desc.material.friction)
                    .restitution(desc.material.restitution)
                    .active_events(ActiveEvents::COLLISION_EVENTS)
                    .build();
                world.add_collider(collider, body_handle)
            })
            .collect();

        tracing::debug!(
            name = %desc.name,
            mass = desc.mass,
            colliders = desc.shapes.len(),
            position = ?desc.initial_position,
            "created actor body"
        );

        Ok(Self {
            name: desc.name,
            body_handle,
            collider_handles,
            shapes: desc.shapes,
            mass: desc.mass,
            material: desc.material,
            initial_position: desc.initial_position,
            transform: ActorTransform {
                position: desc.initial_position,
                rotation: Quat::IDENTITY,
            },
            last_synced_step: None,
            force_step: None,
            fresh_force: (0, Vec3::ZERO),
            ready: ReadySignal::new(),
        })
    }

    /// Copy the engine transform into the cached transform
    ///
    /// Runs at most once per world step; later calls within the same step
    /// are ignored. Forces that already acted on a step are cleared here;
    /// forces applied since the latest step are kept for the next one.
    ///
    /// # Returns
    /// The ready event on the call that takes the readiness transition.
    pub fn sync(&mut self, world: &mut PhysicsWorld) -> Option<ReadyEvent> {
        let step = world.step_count();
        if self.last_synced_step == Some(step) {
            return None;
        }

        let clear_forces = self.force_step.is_some_and(|applied| applied < step);
        let body = world.get_rigid_body_mut(self.body_handle)?;
        self.last_synced_step = Some(step);

        if clear_forces {
            body.reset_forces(false);
            // Forces applied after the step but before this sync still act on the next one
            let (fresh_step, fresh) = self.fresh_force;
            if fresh_step == step && fresh != Vec3::ZERO {
                body.add_force(to_vector(fresh), false);
                self.force_step = Some(step);
            } else {
                self.force_step = None;
            }
        }
        self.transform = ActorTransform {
            position: from_vector(body.translation()),
            rotation: from_rotation(body.rotation()),
        };

        if self.ready.is_ready() {
            return None;
        }
        let event = ReadyEvent {
            name: self.name.clone(),
            body: self.body_handle,
            step,
            position: self.transform.position,
        };
        tracing::info!(name = %self.name, step, "actor ready");
        self.ready.fire(event)
    }

    /// Last synchronized position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Last synchronized orientation
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn transform(&self) -> ActorTransform {
        self.transform
    }

    /// Get the linear velocity of the rigid body, zero if it is gone
    pub fn velocity(&self, world: &PhysicsWorld) -> Vec3 {
        if let Some(body) = world.get_rigid_body(self.body_handle) {
            from_vector(body.linvel())
        } else {
            Vec3::ZERO
        }
    }

    /// Get the angular velocity of the rigid body, zero if it is gone
    pub fn angular_velocity(&self, world: &PhysicsWorld) -> Vec3 {
        if let Some(body) = world.get_rigid_body(self.body_handle) {
            from_vector(body.angvel())
        } else {
            Vec3::ZERO
        }
    }

    /// Apply a force to the rigid body
    ///
    /// The force acts during the next physics step and is cleared by the
    /// first [`sync`](Self::sync) after it, so continuous pushes must be
    /// re-applied every frame.
    ///
    /// # Arguments
    /// * `world` - The physics world
    /// * `force` - Force vector to apply
    pub fn apply_force(&mut self, world: &mut PhysicsWorld, force: Vec3) {
        let step = world.step_count();
        if let Some(body) = world.get_rigid_body_mut(self.body_handle) {
            body.add_force(to_vector(force), true);
            self.force_step.get_or_insert(step);
            if self.fresh_force.0 != step {
                self.fresh_force = (step, Vec3::ZERO);
            }
            self.fresh_force.1 += force;
        } else {
            tracing::warn!(name = %self.name, "apply_force on missing body ignored");
        }
    }

    /// Put the body back at its initial pose, at rest
    ///
    /// Pending forces are dropped and the cached transform is rewritten
    /// immediately. Calling it twice is the same as calling it once.
    pub fn reset(&mut self, world: &mut PhysicsWorld) {
        let Some(body) = world.get_rigid_body_mut(self.body_handle) else {
            tracing::warn!(name = %self.name, "reset on missing body ignored");
            return;
        };

        body.set_translation(to_vector(self.initial_position), true);
        body.set_rotation(to_rotation(Quat::IDENTITY), true);
        body.set_linvel(to_vector(Vec3::ZERO), true);
        body.set_angvel(to_vector(Vec3::ZERO), true);
        body.reset_forces(true);
        body.reset_torques(true);

        self.force_step = None;
        self.fresh_force = (0, Vec3::ZERO);
        self.transform = ActorTransform {
            position: self.initial_position,
            rotation: Quat::IDENTITY,
        };
        tracing::debug!(name = %self.name, "actor reset");
    }

    /// Cap the linear speed at `max_speed`, keeping the direction
    ///
    /// # Returns
    /// `true` if the velocity was scaled down.
    pub fn clamp_speed(&self, world: &mut PhysicsWorld, max_speed: f32) -> bool {
        let Some(body) = world.get_rigid_body_mut(self.body_handle) else {
            return false;
        };
        let velocity = from_vector(body.linvel());
        if velocity.length() <= max_speed {
            return false;
        }
        body.set_linvel(to_vector(velocity.clamp_length_max(max_speed)), true);
        true
    }

    /// Register a ready listener; see [`ReadySignal::subscribe`]
    pub fn on_ready(&mut self, listener: impl FnMut(&ReadyEvent) + 'static) {
        self.ready.subscribe(listener);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.is_ready()
    }

    pub fn readiness(&self) -> Readiness {
        self.ready.state()
    }

    /// Remove the body, its colliders and attached joints from the world
    pub fn remove(self, world: &mut PhysicsWorld) {
        world.remove_rigid_body(self.body_handle);
    }

    /// Check if this rigid body is still valid in the world
    pub fn is_valid(&self, world: &PhysicsWorld) -> bool {
        world.contains_body(self.body_handle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the body handle
    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body_handle
    }

    pub fn collider_handles(&self) -> &[ColliderHandle] {
        &self.collider_handles
    }

    pub fn shapes(&self) -> &[BoxShape] {
        &self.shapes
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    /// Local Y of the lowest collider face
    pub fn bottom(&self) -> f32 {
        shapes_bottom(&self.shapes)
    }

    /// Local Y of the highest collider face
    pub fn top(&self) -> f32 {
        shapes_top(&self.shapes)
    }
}

impl Object for RigidBodyActor {
    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }
}
