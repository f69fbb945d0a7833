//! Slope Testbed
//!
//! Runs the rider/board scene headless for a fixed number of frames.
//!
//! Scene configuration can be loaded from TOML files.
//! Use `--config <path>` or set `SLOPE_CONFIG`.

use clap::Parser;
use slope_testbed::{cli::CommonArgs, SimConfig, SlopeScene};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Slope Testbed
///
/// Drops a rider coupled to a snowboard onto flat or sloped terrain.
#[derive(Parser)]
#[command(name = "slope-testbed")]
#[command(about = "Headless rider-on-slope physics run")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Override the terrain slope angle in degrees
    #[arg(long, value_name = "DEGREES")]
    slope: Option<f32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = if let Some(path) = args.common.config_path() {
        println!("Using config file: {}\n", path.display());
        SimConfig::load(path)?
    } else {
        // Try default config location
        let default_config = PathBuf::from("crates/apps/testbed/config/scene.toml");
        if default_config.exists() {
            println!("Loading default config: {:?}\n", default_config);
            SimConfig::load(&default_config)?
        } else {
            SimConfig::from_env()?
        }
    };
    if let Some(slope) = args.slope {
        config.terrain.slope_angle_degrees = slope;
        config.validate()?;
    }

    let debug = args.common.debug.is_some();
    let frames = args.common.debug.unwrap_or(args.frames);
    if debug {
        println!("Debug mode: running {} frames\n", frames);
    }

    let mut scene = SlopeScene::new(config)?;
    for _ in 0..frames {
        let report = scene.frame()?;
        if debug {
            println!(
                "frame {:>5} | pos ({:>8.3}, {:>8.3}, {:>8.3}) | vel ({:>7.3}, {:>7.3}, {:>7.3}) | coupled {} | grounded {}",
                report.frame,
                report.position.x,
                report.position.y,
                report.position.z,
                report.velocity.x,
                report.velocity.y,
                report.velocity.z,
                report.coupled,
                report.grounded,
            );
        }
        if let Some(point) = report.terrain_contact {
            tracing::info!(frame = report.frame, ?point, "terrain contact");
        }
    }

    let rider = scene.rider().position();
    println!(
        "\nFinal rider position: ({:.3}, {:.3}, {:.3})",
        rider.x, rider.y, rider.z
    );
    if let Some(gap) = scene.joint_gap() {
        println!("Joint anchor gap: {:.6}", gap);
    }
    if let Some(point) = scene.last_terrain_contact() {
        println!(
            "Last terrain contact: ({:.3}, {:.3}, {:.3})",
            point.x, point.y, point.z
        );
    }
    println!("At rest: {}", scene.is_at_rest());

    scene.session_mut().end();
    Ok(())
}
