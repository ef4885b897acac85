//! Headless flight simulation driver
//!
//! Loads a simulation config, scatters asteroids around a station and flies
//! the player ship through the field for a fixed number of ticks, logging
//! collisions and render transforms along the way.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use mars_engine::foundation::logging;
use mars_engine::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod scenario;
use scenario::{generate_world, jittered_frame_time, SHIP, STATION};

const THRUST: f64 = 3.0;
const TURN_TORQUE: f64 = 0.02;
const REPORT_INTERVAL: u32 = 60;

fn build_cli() -> Command {
    Command::new("flight_sim")
        .about("Runs the Mars physics core headless over a seeded asteroid field")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Simulation config (.toml or .ron)"),
        )
        .arg(
            Arg::new("ticks")
                .short('n')
                .long("ticks")
                .value_name("COUNT")
                .value_parser(clap::value_parser!(u32))
                .help("Number of fixed ticks to simulate"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .value_parser(clap::value_parser!(u64))
                .help("Override the scenario seed"),
        )
        .arg(
            Arg::new("fast")
                .long("fast")
                .action(ArgAction::SetTrue)
                .help("Use fast approximate square roots for contacts"),
        )
        .arg(
            Arg::new("write-config")
                .long("write-config")
                .value_name("FILE")
                .help("Write the effective config to FILE and exit"),
        )
}

fn load_config(matches: &clap::ArgMatches) -> Result<SimulationConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => SimulationConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => SimulationConfig::default(),
    };

    if let Some(&ticks) = matches.get_one::<u32>("ticks") {
        config.ticks = ticks;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }
    if matches.get_flag("fast") {
        config.physics.precision = Precision::Fast;
    }
    config.validate().context("Invalid simulation config")?;
    Ok(config)
}

fn run(config: &SimulationConfig) {
    let physics = &config.physics;
    let mut entities = generate_world(config);
    let mut timestep = FixedTimestep::new(physics.timestep, physics.max_substeps);
    let mut frame_rng = StdRng::seed_from_u64(config.seed ^ 0x5EED);

    log::info!(
        "Simulating {} bodies for {} ticks ({:?} precision, restitution {})",
        entities.len(),
        config.ticks,
        physics.precision,
        physics.restitution
    );

    let stopwatch = Stopwatch::start_new();
    let mut ticks_run = 0;
    let mut total_collisions = 0;
    let mut station_contacts = 0;
    let mut frames = 0_u64;

    while ticks_run < config.ticks {
        let ship = &mut entities[SHIP];
        let thrust = ship.heading().scale(THRUST);
        apply_force(ship, thrust);
        apply_torque(ship, TURN_TORQUE);

        let frame_time = jittered_frame_time(&mut frame_rng, physics.timestep);
        let due = timestep.advance(frame_time).min(config.ticks - ticks_run);
        for _ in 0..due {
            let report = step(&mut entities, physics);
            ticks_run += 1;
            total_collisions += report.collisions.len();
            for event in &report.collisions {
                if event.first == STATION || event.second == STATION {
                    station_contacts += 1;
                }
                log::debug!(
                    "Tick {ticks_run}: {:?} contact {} <-> {} depth {:.3}",
                    event.kind,
                    event.first,
                    event.second,
                    event.penetration
                );
            }
            if ticks_run % REPORT_INTERVAL == 0 {
                let ship = &entities[SHIP];
                log::info!(
                    "Tick {ticks_run}: ship at ({:.2}, {:.2}) speed {:.2}, kinetic energy {:.2}",
                    ship.position.x,
                    ship.position.y,
                    ship.velocity.length(),
                    report.kinetic_energy
                );
                log::trace!("Ship model matrix: {:?}", ship.model_matrix().to_gpu_columns());
            }
        }
        frames += 1;
    }

    log::info!(
        "Finished {ticks_run} ticks over {frames} frames: {total_collisions} collisions \
         ({station_contacts} against the station) in {:.2} ms",
        stopwatch.elapsed_millis()
    );
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let config = load_config(&matches)?;
    logging::init_with_default(&config.log_level);

    if let Some(path) = matches.get_one::<String>("write-config") {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write config to {path}"))?;
        log::info!("Wrote config to {path}");
        return Ok(());
    }

    run(&config);
    Ok(())
}
