use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use glam::Vec3;
use rapier3d::prelude::*;

use crate::collision::{ContactEvent, ContactKind, ContactPartnerInfo};
use crate::convert::{from_vector, to_vector};

/// Raw engine events gathered during one step, with the manifolds of the pair
#[derive(Default)]
struct ContactEventCollector {
    events: Mutex<Vec<(CollisionEvent, Vec<ContactManifold>)>>,
}

impl ContactEventCollector {
    fn drain(&self) -> Vec<(CollisionEvent, Vec<ContactManifold>)> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }
}

impl EventHandler for ContactEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        let manifolds = contact_pair
            .map(|pair| pair.manifolds.clone())
            .unwrap_or_default();
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((event, manifolds));
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Physics simulation world
///
/// Owns every rigid body, collider and joint, steps the simulation and keeps
/// the per-body name tags used to classify contacts.
pub struct PhysicsWorld {
    pub(crate) rigid_body_set: RigidBodySet,
    pub(crate) collider_set: ColliderSet,
    pub(crate) impulse_joint_set: ImpulseJointSet,
    pub(crate) multibody_joint_set: MultibodyJointSet,
    pub(crate) integration_parameters: IntegrationParameters,
    pub(crate) physics_pipeline: PhysicsPipeline,
    pub(crate) island_manager: IslandManager,
    pub(crate) broad_phase: DefaultBroadPhase,
    pub(crate) narrow_phase: NarrowPhase,
    pub(crate) ccd_solver: CCDSolver,
    gravity: Vector<Real>,
    collector: ContactEventCollector,
    body_names: HashMap<RigidBodyHandle, String>,
    contact_events: Vec<ContactEvent>,
    step_count: u64,
}

impl PhysicsWorld {
    /// Create a new physics world with specified gravity
    ///
    /// # Arguments
    /// * `gravity` - Gravity vector (e.g., Vec3::new(0.0, -9.8, 0.0))
    pub fn new(gravity: Vec3) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            gravity: to_vector(gravity),
            collector: ContactEventCollector::default(),
            body_names: HashMap::new(),
            contact_events: Vec::new(),
            step_count: 0,
        }
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// Contact start/stop events raised during the step are queued, one per
    /// side of each pair, until [`drain_contact_events`](Self::drain_contact_events).
    ///
    /// # Arguments
    /// * `dt` - Time step in seconds (typically 1/60 = 0.016666...)
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &self.collector,
        );
        self.step_count += 1;

        for (event, manifolds) in self.collector.drain() {
            let (c1, c2, kind) = match event {
                CollisionEvent::Started(c1, c2, _) => (c1, c2, ContactKind::Started),
                CollisionEvent::Stopped(c1, c2, _) => (c1, c2, ContactKind::Stopped),
            };
            let side1 = self.partner_info(c1);
            let side2 = self.partner_info(c2);

            self.contact_events.push(ContactEvent {
                kind,
                collider: c1,
                body: side1.body,
                other: side2.clone(),
                manifolds: manifolds.clone(),
            });
            self.contact_events.push(ContactEvent {
                kind,
                collider: c2,
                body: side2.body,
                other: side1,
                manifolds,
            });
        }
    }

    fn partner_info(&self, collider: ColliderHandle) -> ContactPartnerInfo {
        let body = self.collider_set.get(collider).and_then(Collider::parent);
        let name = body.and_then(|b| self.body_names.get(&b)).cloned();
        ContactPartnerInfo {
            collider,
            body,
            name,
        }
    }

    /// Number of completed simulation steps
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Take every contact event queued since the last drain
    pub fn drain_contact_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.contact_events)
    }

    /// Add a rigid body to the world
    ///
    /// # Arguments
    /// * `body` - The rigid body to add
    ///
    /// # Returns
    /// Handle to the added rigid body
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a rigid body and tag it with `name`
    pub fn add_named_rigid_body(
        &mut self,
        body: RigidBody,
        name: impl Into<String>,
    ) -> RigidBodyHandle {
        let handle = self.rigid_body_set.insert(body);
        self.body_names.insert(handle, name.into());
        handle
    }

    pub fn body_name(&self, handle: RigidBodyHandle) -> Option<&str> {
        self.body_names.get(&handle).map(String::as_str)
    }

    /// Remove a rigid body from the world
    ///
    /// Also removes its colliders, attached joints and name tag.
    ///
    /// # Arguments
    /// * `handle` - Handle to the rigid body to remove
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.body_names.remove(&handle);
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Add a collider to the world, attached to a rigid body
    ///
    /// # Arguments
    /// * `collider` - The collider to add
    /// * `parent` - Handle to the parent rigid body
    ///
    /// # Returns
    /// Handle to the added collider
    pub fn add_collider(&mut self, collider: Collider, parent: RigidBodyHandle) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Insert an impulse joint between two bodies, waking both
    pub fn insert_joint(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joint_set.insert(body1, body2, joint, true)
    }

    pub fn get_impulse_joint(&self, handle: ImpulseJointHandle) -> Option<&ImpulseJoint> {
        self.impulse_joint_set.get(handle)
    }

    pub fn remove_joint(&mut self, handle: ImpulseJointHandle) -> Option<ImpulseJoint> {
        self.impulse_joint_set.remove(handle, true)
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joint_set.len()
    }

    /// Get the current gravity vector
    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    /// Set the gravity vector
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_vector(gravity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_creation() {
        let world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(world.gravity(), Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(world.step_count(), 0);
    }

    #[test]
    fn test_named_body_and_removal() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![0.0, 10.0, 0.0])
            .build();
        let handle = world.add_named_rigid_body(body, "player");
        assert_eq!(world.body_name(handle), Some("player"));

        world.remove_rigid_body(handle);
        assert_eq!(world.body_name(handle), None);
        assert!(!world.contains_body(handle));
    }

    #[test]
    fn test_gravity_simulation() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![0.0, 10.0, 0.0])
            .build();
        let handle = world.add_rigid_body(body);
        world.add_collider(ColliderBuilder::ball(0.5).build(), handle);

        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }

        let body_ref = world.get_rigid_body(handle).unwrap();
        assert!(body_ref.translation().y < 10.0);
        assert_eq!(world.step_count(), 60);
    }

    #[test]
    fn test_contact_events_reported_per_side() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));

        let ground = world.add_named_rigid_body(RigidBodyBuilder::fixed().build(), "terrain");
        world.add_collider(ColliderBuilder::cuboid(10.0, 0.1, 10.0).build(), ground);

        let ball = world.add_named_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(vector![0.0, 1.0, 0.0])
                .build(),
            "ball",
        );
        world.add_collider(
            ColliderBuilder::ball(0.5)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            ball,
        );

        let mut events = Vec::new();
        for _ in 0..120 {
            world.step(1.0 / 60.0);
            events.extend(world.drain_contact_events());
        }

        let ball_hit = events
            .iter()
            .find(|e| e.is_started() && e.involves(ball))
            .expect("ball should touch the ground");
        assert!(ball_hit.is_terrain_contact());

        let ground_hit = events
            .iter()
            .find(|e| e.is_started() && e.involves(ground))
            .expect("ground side is reported too");
        assert_eq!(ground_hit.other.name.as_deref(), Some("ball"));
        assert!(world.drain_contact_events().is_empty());
    }
}
