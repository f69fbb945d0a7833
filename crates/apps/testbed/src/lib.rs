//! Headless slope testbed
//!
//! Builds the terrain, the rider and the board, couples them once both are
//! ready and advances the whole scene one fixed step per frame.

pub mod cli;
pub mod config;
pub mod session;

use glam::Vec3;
use slope_physics::{
    spawn_terrain, stacked_position, CouplingGate, PhysicsWorld, RigidBodyActor, TerrainBody,
    TerrainMesh,
};

pub use config::SimConfig;
pub use session::SessionState;

pub const PLAYER_NAME: &str = "player";
pub const SNOWBOARD_NAME: &str = "snowboard";

/// What happened during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// False while the session is paused or not playing
    pub stepped: bool,
    pub position: Vec3,
    pub velocity: Vec3,
    pub coupled: bool,
    /// Terrain contact started during this frame, if any
    pub terrain_contact: Option<Vec3>,
    pub grounded: bool,
}

/// Terrain, rider and board in one physics world
pub struct SlopeScene {
    config: SimConfig,
    world: PhysicsWorld,
    mesh: TerrainMesh,
    terrain: TerrainBody,
    rider: RigidBodyActor,
    board: RigidBodyActor,
    gate: CouplingGate,
    session: SessionState,
    /// Terrain pairs currently touching the rider or the board
    terrain_contacts: usize,
    last_terrain_contact: Option<Vec3>,
    frame: u64,
}

impl SlopeScene {
    /// Build the scene and start a session
    pub fn new(config: SimConfig) -> slope_physics::Result<Self> {
        let material = config.physics.material();
        let mut world = PhysicsWorld::new(config.physics.gravity_vector());

        let mesh = TerrainMesh::from_config(&config.terrain)?;
        let terrain = spawn_terrain(&mut world, &mesh, material)?;

        let mut player = config.player;
        let spawn = player.initial_position;
        player.initial_position.y += mesh.surface_height(spawn.x, spawn.z).unwrap_or(0.0);

        let board_position = stacked_position(
            player.initial_position,
            &player.shapes(),
            &config.snowboard.shapes(),
        );
        let mut rider = RigidBodyActor::create(&mut world, player.desc(PLAYER_NAME, material))?;
        let mut board = RigidBodyActor::create(
            &mut world,
            config
                .snowboard
                .desc(SNOWBOARD_NAME, board_position, material),
        )?;
        let gate = CouplingGate::new(&mut rider, &mut board);

        let mut session = SessionState::new();
        session.start();
        session.update_player_position(rider.position());

        tracing::info!(
            kind = ?terrain.kind,
            slope = config.terrain.slope_angle_degrees,
            spawn = ?rider.position(),
            "slope scene ready"
        );

        Ok(Self {
            config,
            world,
            mesh,
            terrain,
            rider,
            board,
            gate,
            session,
            terrain_contacts: 0,
            last_terrain_contact: None,
            frame: 0,
        })
    }

    /// Advance one fixed step unless the session is halted
    pub fn frame(&mut self) -> slope_physics::Result<FrameReport> {
        self.frame += 1;
        if !self.session.is_running() {
            return Ok(self.report(false, None));
        }

        self.world.step(self.config.physics.timestep);
        self.rider.sync(&mut self.world);
        self.board.sync(&mut self.world);
        self.gate
            .try_couple(&mut self.world, &self.rider, &self.board)?;

        let terrain_contact = self.process_contacts();
        self.rider
            .clamp_speed(&mut self.world, self.config.physics.max_velocity);

        self.session.update_player_position(self.rider.position());
        self.session
            .update_player_velocity(self.rider.velocity(&self.world));

        Ok(self.report(true, terrain_contact))
    }

    fn process_contacts(&mut self) -> Option<Vec3> {
        let mut started_at = None;
        let bodies = [self.rider.body_handle(), self.board.body_handle()];

        for event in self.world.drain_contact_events() {
            if !event.is_terrain_contact() || !bodies.iter().any(|b| event.involves(*b)) {
                continue;
            }
            if event.is_started() {
                self.terrain_contacts += 1;
                if let Some(point) = event.first_contact_point() {
                    tracing::debug!(frame = self.frame, ?point, "terrain contact");
                    started_at = Some(point);
                    self.last_terrain_contact = Some(point);
                }
            } else {
                self.terrain_contacts = self.terrain_contacts.saturating_sub(1);
            }
        }
        started_at
    }

    fn report(&self, stepped: bool, terrain_contact: Option<Vec3>) -> FrameReport {
        FrameReport {
            frame: self.frame,
            stepped,
            position: self.rider.position(),
            velocity: self.rider.velocity(&self.world),
            coupled: self.gate.coupling().is_some(),
            terrain_contact,
            grounded: self.terrain_contacts > 0,
        }
    }

    /// Put rider and board back at their spawn poses and restart the session
    pub fn reset(&mut self) {
        self.rider.reset(&mut self.world);
        self.board.reset(&mut self.world);
        self.session.reset();
        self.session.start();
        self.session.update_player_position(self.rider.position());
        self.last_terrain_contact = None;
    }

    /// Rider speed below the configured resting threshold
    pub fn is_at_rest(&self) -> bool {
        self.rider.velocity(&self.world).length() < self.config.physics.min_velocity
    }

    /// Current anchor gap of the rider/board joint, once coupled
    pub fn joint_gap(&self) -> Option<f32> {
        self.gate.coupling()?.anchor_gap(&self.world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub fn terrain(&self) -> &TerrainBody {
        &self.terrain
    }

    pub fn rider(&self) -> &RigidBodyActor {
        &self.rider
    }

    pub fn board(&self) -> &RigidBodyActor {
        &self.board
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn last_terrain_contact(&self) -> Option<Vec3> {
        self.last_terrain_contact
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}
