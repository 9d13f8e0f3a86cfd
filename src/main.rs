//! Flipfall demo runner.
//!
//! Runs the locomotion core headless in a small room: a floor, a ceiling, a
//! back wall and an obstacle block. One player character is driven either by
//! a fixed input script or by seeded random input, and gravity is flipped
//! along the way with the debug toggle.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --seconds 6 --json
//! RUST_LOG=debug cargo run -- --random-input --seed 7
//! ```

use std::path::PathBuf;
use std::process;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;

use flipfall::components::boxcollider::BoxCollider;
use flipfall::components::collisionlayer::LayerMask;
use flipfall::components::pushcollider::PushCollider;
use flipfall::events::gravity::GravityDirectionChangedEvent;
use flipfall::events::input::InputAction;
use flipfall::events::locomotion::{
    JumpStartedEvent, LandedEvent, ObstacleReleasedEvent, ObstacleTouchedEvent,
    RunStateChangedEvent,
};
use flipfall::game::Simulation;
use flipfall::resources::gameconfig::GameConfig;

/// Headless platformer locomotion demo.
#[derive(Parser)]
#[command(version, about = "Runs the flipfall locomotion core in a small test room.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 6.0)]
    seconds: f32,

    /// Frame delta in seconds. Fixed ticks are run from it at the configured step.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,

    /// Print one JSON report per fixed tick to stdout.
    #[arg(long)]
    json: bool,

    /// Drive the character with random input instead of the script.
    #[arg(long)]
    random_input: bool,

    /// Seed for --random-input.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Mirror horizontal input.
    #[arg(long)]
    invert_input: bool,

    /// Write a config file with default values and exit.
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

/// (time, action, pressed)
const SCRIPT: &[(f32, InputAction, bool)] = &[
    (0.2, InputAction::MoveRight, true),
    (0.8, InputAction::Run, true),
    (1.2, InputAction::Jump, true),
    (1.3, InputAction::Jump, false),
    (2.0, InputAction::Jump, true),
    (2.6, InputAction::Jump, false),
    (3.0, InputAction::GravityToggle, true),
    (3.05, InputAction::GravityToggle, false),
    (3.4, InputAction::MoveRight, false),
    (3.4, InputAction::MoveLeft, true),
    (4.2, InputAction::Run, false),
    (4.5, InputAction::GravityToggle, true),
    (4.55, InputAction::GravityToggle, false),
    (5.0, InputAction::MoveLeft, false),
];

fn load_config(path: PathBuf) -> Result<GameConfig, String> {
    let mut config = GameConfig::with_path(path);
    if config.config_path.exists() {
        config.load_from_file()?;
    } else {
        log::warn!(
            "Config file {:?} not found, using defaults",
            config.config_path
        );
    }
    config.validate()?;
    Ok(config)
}

fn build_room(sim: &mut Simulation) {
    sim.spawn_block(Vec2::new(0.0, -0.5), Vec2::new(40.0, 1.0), LayerMask::GROUND);
    sim.spawn_block(Vec2::new(0.0, 6.5), Vec2::new(40.0, 1.0), LayerMask::GROUND);
    sim.spawn_block(Vec2::new(-10.5, 3.0), Vec2::new(1.0, 6.0), LayerMask::GROUND);
    sim.spawn_block(Vec2::new(6.0, 1.0), Vec2::new(1.0, 2.0), LayerMask::OBSTACLE);
}

fn log_events(world: &mut World) {
    world.add_observer(|t: On<JumpStartedEvent>| {
        log::info!("{:?} jump", t.event().entity);
    });
    world.add_observer(|t: On<LandedEvent>| {
        log::info!("{:?} landed", t.event().entity);
    });
    world.add_observer(|t: On<RunStateChangedEvent>| {
        log::info!("{:?} running: {}", t.event().entity, t.event().running);
    });
    world.add_observer(|t: On<ObstacleTouchedEvent>| {
        log::info!("{:?} touched {:?}", t.event().entity, t.event().obstacle);
    });
    world.add_observer(|t: On<ObstacleReleasedEvent>| {
        log::info!("{:?} released {:?}", t.event().entity, t.event().obstacle);
    });
    world.add_observer(|t: On<GravityDirectionChangedEvent>| {
        log::info!("gravity now {}", t.event().direction);
    });
    world.flush();
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Early-exit: write defaults and quit
    if let Some(path) = cli.write_default_config {
        if let Err(e) = GameConfig::with_path(&path).save_to_file() {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        println!("Default config written to {}", path.display());
        return;
    }

    if !cli.frame_dt.is_finite() || cli.frame_dt <= 0.0 {
        log::error!("--frame-dt must be positive, got {}", cli.frame_dt);
        process::exit(1);
    }

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let mut sim = match Simulation::new(&config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to build the simulation: {}", e);
            process::exit(1);
        }
    };
    log_events(sim.world_mut());
    build_room(&mut sim);

    let player = match sim.spawn_character(Vec2::new(0.0, 0.9), Vec2::new(0.8, 1.8)) {
        Ok(player) => player,
        Err(e) => {
            log::error!("Failed to spawn the player: {}", e);
            process::exit(1);
        }
    };
    sim.world_mut()
        .entity_mut(player)
        .insert(PushCollider::new(BoxCollider::centered(1.0, 1.8)));
    if let Err(e) = sim.verify() {
        log::error!("Character setup is incomplete: {}", e);
        process::exit(1);
    }

    if cli.invert_input {
        sim.set_input_inverted(true);
    }

    log::info!(
        "Running {}s at {}s per frame ({} input)",
        cli.seconds,
        cli.frame_dt,
        if cli.random_input { "random" } else { "scripted" }
    );

    let mut rng = fastrand::Rng::with_seed(cli.seed);
    let mut script = SCRIPT.iter().peekable();
    let mut time = 0.0f32;
    let mut ticks = 0u64;

    while time < cli.seconds {
        if cli.random_input {
            // about three changes per second at 60 fps
            if rng.f32() < 0.05 {
                let action = InputAction::ALL[rng.usize(..InputAction::ALL.len())];
                let active = sim.input_mut().state(action).active;
                sim.input_mut().set(action, !active);
            }
        } else {
            while let Some((_, action, pressed)) = script.next_if(|(at, _, _)| *at <= time) {
                sim.input_mut().set(*action, *pressed);
            }
        }

        let json = cli.json;
        ticks += u64::from(sim.advance_with(cli.frame_dt, |world, _| {
            if !json {
                return;
            }
            if let Some(report) = flipfall::game::TickReport::capture(world, player) {
                match serde_json::to_string(&report) {
                    Ok(line) => println!("{}", line),
                    Err(e) => log::error!("Failed to serialize tick report: {}", e),
                }
            }
        }));
        time += cli.frame_dt;
    }

    if let Some(report) = sim.report(player) {
        log::info!(
            "Done after {} ticks: position {:?}, velocity {:?}, grounded {}, gravity {}",
            ticks,
            report.position,
            report.velocity,
            report.grounded,
            report.gravity
        );
    }
}
