//! Fixed coupling between two ready actors

use std::cell::Cell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::actor::{shapes_bottom, shapes_top, BoxShape, RigidBodyActor};
use crate::convert::{from_point, to_isometry, to_point};
use crate::error::{Error, Result};
use crate::world::PhysicsWorld;

/// Local anchor frames of a fixed joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSpec {
    /// Anchor in the first body's local space
    pub anchor_a: Vec3,
    pub rotation_a: Quat,
    /// Anchor in the second body's local space
    pub anchor_b: Vec3,
    pub rotation_b: Quat,
    /// Whether the two bodies still collide with each other
    pub contacts_enabled: bool,
}

impl JointSpec {
    pub fn new(anchor_a: Vec3, anchor_b: Vec3) -> Self {
        Self {
            anchor_a,
            rotation_a: Quat::IDENTITY,
            anchor_b,
            rotation_b: Quat::IDENTITY,
            contacts_enabled: false,
        }
    }

    pub fn with_rotations(mut self, rotation_a: Quat, rotation_b: Quat) -> Self {
        self.rotation_a = rotation_a;
        self.rotation_b = rotation_b;
        self
    }

    /// Anchors that put `upper`'s lowest face on `lower`'s highest face
    pub fn stacked(upper: &RigidBodyActor, lower: &RigidBodyActor) -> Self {
        Self::new(Vec3::Y * upper.bottom(), Vec3::Y * lower.top())
    }
}

/// Centre of a body built from `lower_shapes` so that its highest face
/// touches the lowest face of a body at `upper_position`.
pub fn stacked_position(
    upper_position: Vec3,
    upper_shapes: &[BoxShape],
    lower_shapes: &[BoxShape],
) -> Vec3 {
    let y = upper_position.y + shapes_bottom(upper_shapes) - shapes_top(lower_shapes);
    Vec3::new(upper_position.x, y, upper_position.z)
}

/// A live fixed joint between two actor bodies
///
/// Refers to the bodies by handle and owns neither.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupling {
    pub handle: ImpulseJointHandle,
    pub body_a: RigidBodyHandle,
    pub body_b: RigidBodyHandle,
    pub spec: JointSpec,
}

impl Coupling {
    /// World-space position of both anchors, if both bodies still exist
    pub fn anchor_world_positions(&self, world: &PhysicsWorld) -> Option<(Vec3, Vec3)> {
        let a = world.get_rigid_body(self.body_a)?;
        let b = world.get_rigid_body(self.body_b)?;
        Some((
            from_point(&(a.position() * to_point(self.spec.anchor_a))),
            from_point(&(b.position() * to_point(self.spec.anchor_b))),
        ))
    }

    /// Distance between the two anchors; zero for a perfectly solved joint
    pub fn anchor_gap(&self, world: &PhysicsWorld) -> Option<f32> {
        self.anchor_world_positions(world)
            .map(|(a, b)| a.distance(b))
    }

    pub fn is_active(&self, world: &PhysicsWorld) -> bool {
        world.get_impulse_joint(self.handle).is_some()
    }
}

/// Fix `b` to `a` at the anchors of `spec`
///
/// # Errors
/// [`Error::ActorNotReady`] if either actor has not fired its ready signal,
/// [`Error::SelfCoupling`] if both are the same body.
pub fn couple(
    world: &mut PhysicsWorld,
    a: &RigidBodyActor,
    b: &RigidBodyActor,
    spec: JointSpec,
) -> Result<Coupling> {
    for actor in [a, b] {
        if !actor.is_ready() || !actor.is_valid(world) {
            return Err(Error::ActorNotReady {
                name: actor.name().to_string(),
            });
        }
    }
    if a.body_handle() == b.body_handle() {
        return Err(Error::SelfCoupling {
            name: a.name().to_string(),
        });
    }

    let joint = FixedJointBuilder::new()
        .local_frame1(to_isometry(spec.anchor_a, spec.rotation_a))
        .local_frame2(to_isometry(spec.anchor_b, spec.rotation_b))
        .contacts_enabled(spec.contacts_enabled);
    let handle = world.insert_joint(a.body_handle(), b.body_handle(), joint);

    tracing::info!(
        a = a.name(),
        b = b.name(),
        anchor_a = ?spec.anchor_a,
        anchor_b = ?spec.anchor_b,
        "actors coupled"
    );

    Ok(Coupling {
        handle,
        body_a: a.body_handle(),
        body_b: b.body_handle(),
        spec,
    })
}

/// Couples two actors exactly once, after both became ready
#[derive(Debug)]
pub struct CouplingGate {
    ready_a: Rc<Cell<bool>>,
    ready_b: Rc<Cell<bool>>,
    spec: Option<JointSpec>,
    coupling: Option<Coupling>,
}

impl CouplingGate {
    /// Gate that stacks `upper` on `lower` with [`JointSpec::stacked`]
    pub fn new(upper: &mut RigidBodyActor, lower: &mut RigidBodyActor) -> Self {
        Self::subscribe(upper, lower, None)
    }

    pub fn with_spec(a: &mut RigidBodyActor, b: &mut RigidBodyActor, spec: JointSpec) -> Self {
        Self::subscribe(a, b, Some(spec))
    }

    fn subscribe(a: &mut RigidBodyActor, b: &mut RigidBodyActor, spec: Option<JointSpec>) -> Self {
        let ready_a = Rc::new(Cell::new(false));
        let ready_b = Rc::new(Cell::new(false));

        let flag = ready_a.clone();
        a.on_ready(move |_| flag.set(true));
        let flag = ready_b.clone();
        b.on_ready(move |_| flag.set(true));

        Self {
            ready_a,
            ready_b,
            spec,
            coupling: None,
        }
    }

    /// Both ready signals have been seen
    pub fn is_open(&self) -> bool {
        self.ready_a.get() && self.ready_b.get()
    }

    pub fn coupling(&self) -> Option<&Coupling> {
        self.coupling.as_ref()
    }

    /// Couple on the first call after both actors are ready
    ///
    /// # Returns
    /// `None` while waiting, then the same coupling on every later call.
    pub fn try_couple(
        &mut self,
        world: &mut PhysicsWorld,
        a: &RigidBodyActor,
        b: &RigidBodyActor,
    ) -> Result<Option<&Coupling>> {
        if self.coupling.is_none() && self.is_open() {
            let spec = self.spec.unwrap_or_else(|| JointSpec::stacked(a, b));
            self.coupling = Some(couple(world, a, b, spec)?);
        }
        Ok(self.coupling.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorDesc;

    const DT: f32 = 1.0 / 60.0;

    fn rider_shapes() -> Vec<BoxShape> {
        vec![
            BoxShape::from_size(Vec3::new(0.4, 1.4, 0.3)),
            BoxShape::from_size(Vec3::new(0.25, 0.3, 0.25)).with_offset(Vec3::Y * 0.85),
        ]
    }

    fn board_shapes() -> Vec<BoxShape> {
        vec![BoxShape::from_size(Vec3::new(0.5, 0.02, 1.0))]
    }

    fn spawn_pair(world: &mut PhysicsWorld) -> (RigidBodyActor, RigidBodyActor) {
        let rider_pos = Vec3::new(0.0, 5.0, 0.0);
        let board_pos = stacked_position(rider_pos, &rider_shapes(), &board_shapes());

        let rider = RigidBodyActor::create(
            world,
            ActorDesc::new("player", rider_pos, 70.0).with_shapes(rider_shapes()),
        )
        .unwrap();
        let board = RigidBodyActor::create(
            world,
            ActorDesc::new("snowboard", board_pos, 5.0).with_shapes(board_shapes()),
        )
        .unwrap();
        (rider, board)
    }

    #[test]
    fn test_stacked_position_touches_faces() {
        let pos = stacked_position(Vec3::new(1.0, 5.0, 2.0), &rider_shapes(), &board_shapes());

        // rider bottom at 5 - 0.7, board half height 0.01
        assert!((pos.y - 4.29).abs() < 1e-5);
        assert_eq!(pos.x, 1.0);
        assert_eq!(pos.z, 2.0);
    }

    #[test]
    fn test_couple_before_ready_fails() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));
        let (rider, board) = spawn_pair(&mut world);

        let err = couple(&mut world, &rider, &board, JointSpec::stacked(&rider, &board)).unwrap_err();
        assert_eq!(err, Error::ActorNotReady { name: "player".into() });
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn test_couple_rejects_same_actor() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));
        let (mut rider, _) = spawn_pair(&mut world);
        rider.sync(&mut world);

        let spec = JointSpec::new(Vec3::ZERO, Vec3::ZERO);
        assert!(matches!(
            couple(&mut world, &rider, &rider, spec),
            Err(Error::SelfCoupling { .. })
        ));
    }

    #[test]
    fn test_gate_couples_exactly_once() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));
        let (mut rider, mut board) = spawn_pair(&mut world);
        let mut gate = CouplingGate::new(&mut rider, &mut board);

        assert!(gate.try_couple(&mut world, &rider, &board).unwrap().is_none());

        rider.sync(&mut world);
        assert!(!gate.is_open());
        assert!(gate.try_couple(&mut world, &rider, &board).unwrap().is_none());

        board.sync(&mut world);
        let first = *gate.try_couple(&mut world, &rider, &board).unwrap().unwrap();
        let again = *gate.try_couple(&mut world, &rider, &board).unwrap().unwrap();

        assert_eq!(first.handle, again.handle);
        assert_eq!(world.joint_count(), 1);
    }

    #[test]
    fn test_anchor_gap_stays_small_while_falling() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));
        let (mut rider, mut board) = spawn_pair(&mut world);
        rider.sync(&mut world);
        board.sync(&mut world);

        let coupling = couple(&mut world, &rider, &board, JointSpec::stacked(&rider, &board)).unwrap();
        assert!(coupling.anchor_gap(&world).unwrap() < 1e-5);

        for _ in 0..60 {
            world.step(DT);
            rider.sync(&mut world);
            board.sync(&mut world);
            assert!(coupling.anchor_gap(&world).unwrap() < 0.05);
        }
        assert!(rider.position().y < 5.0);
    }

    #[test]
    fn test_removed_joint_is_inactive() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.8, 0.0));
        let (mut rider, mut board) = spawn_pair(&mut world);
        rider.sync(&mut world);
        board.sync(&mut world);

        let coupling = couple(&mut world, &rider, &board, JointSpec::stacked(&rider, &board)).unwrap();
        assert!(coupling.is_active(&world));

        assert!(world.remove_joint(coupling.handle).is_some());
        assert!(!coupling.is_active(&world));
        assert_eq!(world.joint_count(), 0);
        assert!(world.remove_joint(coupling.handle).is_none());
    }
}
