use std::env;
use std::process;

use traffic_scheduler::{Command, Preset, SchedulerError, SchedulingEngine, Strategy};

fn run() -> Result<(), SchedulerError> {
    let preset = match env::args().nth(1) {
        Some(path) => Preset::from_path(&path)?,
        None => Preset::mocked(),
    };

    let (network, collisions) = preset.build()?;
    let strategy = preset.strategy.unwrap_or(Strategy::FixedRoundRobin);
    let timing = preset.timing.unwrap_or_default();
    let mut engine = SchedulingEngine::new(network, &collisions, strategy, timing)?;

    engine.on_phase_changed(|status| {
        println!("Lights changed");
        println!("{status:#?}");
    });
    engine.on_phase_stayed(|_| {
        println!("Lights stay");
    });
    engine.on_car_added(|lane| {
        println!("Car added to {lane}");
    });

    println!("Initial state");
    println!("{:#?}", engine.status());

    for command in &preset.commands {
        match command {
            Command::AddVehicle { start_road, .. } => {
                engine.add_car(start_road.as_str())?;
            }
            Command::Step => {
                let loop_detected = engine.step()?;
                if loop_detected {
                    log::warn!("loop detected, ending simulation");
                    break;
                }
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(error) = run() {
        eprintln!("error: {error}");
        process::exit(1);
    }
}
