use slope_physics::{
    glam::Vec3, spawn_terrain, stacked_position, CouplingGate, PhysicsConfig, PhysicsWorld,
    PlayerConfig, RigidBodyActor, SnowboardConfig, TerrainConfig, TerrainMesh,
};

fn main() -> slope_physics::Result<()> {
    println!("=== Rider On A Slope ===\n");

    let physics = PhysicsConfig::default();
    let material = physics.material();
    let mut world = PhysicsWorld::new(physics.gravity_vector());
    println!("Created physics world with gravity: {:?}", world.gravity());

    let terrain_config = TerrainConfig {
        width: 40.0,
        depth: 40.0,
        slope_angle_degrees: 15.0,
    };
    let mesh = TerrainMesh::from_config(&terrain_config)?;
    spawn_terrain(&mut world, &mesh, material)?;
    println!(
        "Created {:.0}x{:.0} slope, ridge height {:.2}",
        mesh.width(),
        mesh.depth(),
        mesh.top_height()
    );

    let player = PlayerConfig {
        initial_position: Vec3::new(0.0, mesh.top_height() * 0.5 + 3.0, 0.0),
        ..PlayerConfig::default()
    };
    let board = SnowboardConfig::default();
    let board_pos = stacked_position(player.initial_position, &player.shapes(), &board.shapes());

    let mut rider = RigidBodyActor::create(&mut world, player.desc("player", material))?;
    let mut snowboard =
        RigidBodyActor::create(&mut world, board.desc("snowboard", board_pos, material))?;
    let mut gate = CouplingGate::new(&mut rider, &mut snowboard);

    let dt = physics.timestep;
    let total_time = 5.0;
    let steps = (total_time / dt) as usize;
    println!("Simulating for {} seconds ({} steps)...\n", total_time, steps);

    for i in 0..steps {
        world.step(dt);
        rider.sync(&mut world);
        snowboard.sync(&mut world);
        if let Some(coupling) = gate.try_couple(&mut world, &rider, &snowboard)? {
            if i % 60 == 0 {
                let gap = coupling.anchor_gap(&world).unwrap_or(f32::NAN);
                println!("  joint gap: {:.5}", gap);
            }
        }
        rider.clamp_speed(&mut world, physics.max_velocity);

        for event in world.drain_contact_events() {
            if event.is_started() && event.involves(snowboard.body_handle()) && event.is_terrain_contact() {
                if let Some(point) = event.first_contact_point() {
                    println!("Board touched terrain at ({:.2}, {:.2}, {:.2})", point.x, point.y, point.z);
                }
            }
        }

        if i % 30 == 0 {
            let time = i as f32 * dt;
            let pos = rider.position();
            let vel = rider.velocity(&world);
            println!(
                "Time: {:.2}s | Position: ({:.3}, {:.3}, {:.3}) | Velocity: ({:.3}, {:.3}, {:.3})",
                time, pos.x, pos.y, pos.z, vel.x, vel.y, vel.z
            );
        }
    }

    let final_pos = rider.position();
    println!("\nFinal position: ({:.3}, {:.3}, {:.3})", final_pos.x, final_pos.y, final_pos.z);

    rider.reset(&mut world);
    snowboard.reset(&mut world);
    println!("Reset rider to {:?}", rider.position());
    Ok(())
}
