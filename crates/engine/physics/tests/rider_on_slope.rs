use slope_physics::glam::Vec3;
use slope_physics::{
    spawn_terrain, stacked_position, Coupling, CouplingGate, PhysicsConfig, PhysicsWorld,
    PlayerConfig, RigidBodyActor, SnowboardConfig, TerrainConfig, TerrainMesh,
};

struct Scene {
    world: PhysicsWorld,
    mesh: TerrainMesh,
    rider: RigidBodyActor,
    board: RigidBodyActor,
    gate: CouplingGate,
    physics: PhysicsConfig,
}

fn build_scene(slope_angle_degrees: f32) -> Scene {
    let physics = PhysicsConfig::default();
    let material = physics.material();
    let mut world = PhysicsWorld::new(physics.gravity_vector());

    let mesh = TerrainMesh::from_config(&TerrainConfig {
        width: 40.0,
        depth: 40.0,
        slope_angle_degrees,
    })
    .unwrap();
    spawn_terrain(&mut world, &mesh, material).unwrap();

    // Surface height at z = 0 is half the ridge height
    let player = PlayerConfig {
        initial_position: Vec3::new(0.0, mesh.top_height() * 0.5 + 2.0, 0.0),
        ..PlayerConfig::default()
    };
    let board = SnowboardConfig::default();
    let board_pos = stacked_position(player.initial_position, &player.shapes(), &board.shapes());

    let mut rider = RigidBodyActor::create(&mut world, player.desc("player", material)).unwrap();
    let mut board =
        RigidBodyActor::create(&mut world, board.desc("snowboard", board_pos, material)).unwrap();
    let gate = CouplingGate::new(&mut rider, &mut board);

    Scene {
        world,
        mesh,
        rider,
        board,
        gate,
        physics,
    }
}

impl Scene {
    fn frame(&mut self) -> Option<Coupling> {
        self.world.step(self.physics.timestep);
        self.rider.sync(&mut self.world);
        self.board.sync(&mut self.world);
        self.gate
            .try_couple(&mut self.world, &self.rider, &self.board)
            .unwrap()
            .copied()
    }
}

#[test]
fn test_rider_lands_on_slope_and_reports_terrain_contact() {
    let mut scene = build_scene(15.0);
    let board_handle = scene.board.body_handle();

    let mut terrain_point = None;
    for _ in 0..240 {
        scene.frame();
        for event in scene.world.drain_contact_events() {
            if event.is_started() && event.involves(board_handle) && event.is_terrain_contact() {
                terrain_point = terrain_point.or(event.first_contact_point());
            }
        }
    }

    let point = terrain_point.expect("board should land on the terrain");
    assert!(point.y > -0.5 && point.y < scene.mesh.top_height() + 0.5);
    assert!(scene.rider.position().y < scene.rider.initial_position().y);
}

#[test]
fn test_joint_holds_rider_on_board() {
    let mut scene = build_scene(15.0);

    let mut coupling = None;
    for _ in 0..180 {
        if let Some(c) = scene.frame() {
            coupling = Some(c);
            let gap = c.anchor_gap(&scene.world).unwrap();
            assert!(gap < 0.05, "anchor gap {} too large", gap);
        }
    }

    assert!(coupling.is_some());
    assert_eq!(scene.world.joint_count(), 1);
}

#[test]
fn test_ready_once_and_reset_is_idempotent() {
    let mut scene = build_scene(10.0);

    let mut transitions = 0;
    for _ in 0..90 {
        scene.world.step(scene.physics.timestep);
        transitions += scene.rider.sync(&mut scene.world).is_some() as u32;
        transitions += scene.board.sync(&mut scene.world).is_some() as u32;
    }
    assert_eq!(transitions, 2);

    scene.rider.reset(&mut scene.world);
    let once = (scene.rider.position(), scene.rider.velocity(&scene.world));
    scene.rider.reset(&mut scene.world);
    let twice = (scene.rider.position(), scene.rider.velocity(&scene.world));

    assert_eq!(once, twice);
    assert_eq!(once.0, scene.rider.initial_position());
    assert_eq!(once.1, Vec3::ZERO);
}

#[test]
fn test_flat_terrain_holds_rider_above_ground() {
    let mut scene = build_scene(0.0);

    for _ in 0..240 {
        scene.frame();
    }

    // ground at y = 0; upright centre sits near 0.72
    let y = scene.rider.position().y;
    assert!(y > 0.1 && y < 1.2, "rider centre at {}", y);
}

#[test]
fn test_board_lands_on_default_flat_ground() {
    let physics = PhysicsConfig::default();
    let material = physics.material();
    let mut world = PhysicsWorld::new(physics.gravity_vector());

    let mesh = TerrainMesh::from_config(&TerrainConfig::default()).unwrap();
    spawn_terrain(&mut world, &mesh, material).unwrap();

    let player = PlayerConfig::default();
    let board_config = SnowboardConfig::default();
    let board_pos = stacked_position(
        player.initial_position,
        &player.shapes(),
        &board_config.shapes(),
    );
    let mut rider = RigidBodyActor::create(&mut world, player.desc("player", material)).unwrap();
    let mut board =
        RigidBodyActor::create(&mut world, board_config.desc("snowboard", board_pos, material))
            .unwrap();
    let mut gate = CouplingGate::new(&mut rider, &mut board);

    let mut lowest = f32::MAX;
    for _ in 0..300 {
        world.step(physics.timestep);
        rider.sync(&mut world);
        board.sync(&mut world);
        gate.try_couple(&mut world, &rider, &board).unwrap();
        lowest = lowest.min(board.position().y + board.bottom());
    }

    // ground top face at y = 0
    assert!(lowest > -0.05, "board dipped to {}", lowest);
    let settled = board.position().y + board.bottom();
    assert!(settled > -0.02, "board settled at {}", settled);
    assert!(rider.position().y > settled);
}
