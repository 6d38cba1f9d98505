//! Hexcavate headless runner
//!
//! Loads settings, restores or generates the world, plays a short scripted
//! session (settle, walk, dig, build) and saves on the way out. Rendering,
//! audio and live input belong to front ends built on the library.

use glam::Vec2;

use hexcavate::consts::STEPS_PER_SECOND;
use hexcavate::session::FrameInput;
use hexcavate::sim::{Material, MoveIntent};
use hexcavate::{Session, Settings};

fn main() {
    env_logger::init();
    log::info!("Hexcavate (native) starting...");

    let settings = Settings::load(Settings::FILE_NAME);
    let mut session = match Session::start(settings) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_script(&mut session) {
        log::error!("Session aborted: {}", e);
        std::process::exit(1);
    }

    let engine = session.shutdown();
    let body = engine.body();
    println!("steps:     {}", engine.step_count());
    println!("tiles:     {}", engine.index().len());
    println!("position:  ({:.1}, {:.1})", body.pos.x, body.pos.y);
    for (material, count) in body.inventory.iter() {
        println!("{:<10} {}", format!("{}:", material.as_str()), count);
    }
}

/// One second of settling, a short walk, a dig straight down, then a block
/// placed beside the body with whatever was mined
fn run_script(session: &mut Session) -> Result<(), hexcavate::ConfigError> {
    let second = STEPS_PER_SECOND as usize;

    for _ in 0..second {
        session.frame(&FrameInput::default())?;
    }

    for _ in 0..second / 2 {
        session.frame(&FrameInput {
            movement: MoveIntent::Right,
            ..Default::default()
        })?;
    }
    for _ in 0..second / 2 {
        session.frame(&FrameInput::default())?;
    }

    let mut broken = 0;
    for _ in 0..3 * second {
        let below = session.engine().body().pos + Vec2::new(0.0, 45.0);
        let cursor = session.camera().world_to_screen(below);
        broken += session
            .frame(&FrameInput {
                mine: true,
                cursor: Some(cursor),
                ..Default::default()
            })?
            .len();
    }
    log::info!("Dug through {} tiles", broken);

    let stocked = session
        .engine()
        .body()
        .inventory
        .iter()
        .find(|(_, count)| *count > 0)
        .map(|(material, _)| material);
    if let Some(material) = stocked {
        let slot = Material::ALL
            .iter()
            .position(|m| *m == material)
            .map(|i| i as u8 + 1);
        let beside = session.engine().body().pos + Vec2::new(60.0, 0.0);
        let cursor = session.camera().world_to_screen(beside);
        session.frame(&FrameInput {
            select_slot: slot,
            cursor: Some(cursor),
            place: true,
            ..Default::default()
        })?;
    }

    Ok(())
}
