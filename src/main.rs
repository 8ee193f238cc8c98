/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use config::GameConfig;
use domain::entity::MoveDir;
use error::GameError;
use sim::event::GameEvent;
use sim::level;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadInput;
use ui::input::KeyboardInput;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Boulderbox: push stones, grab keys, mind the gravity.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Read settings from this file instead of searching for config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run headless: one tick per letter (U/D/L/R, `.` = idle tick),
    /// then print the final grid as level codes.
    #[arg(long, value_name = "MOVES")]
    replay: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref());

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &GameConfig) -> Result<(), GameError> {
    let mut world = level::load_sample(config.input.drain_order)?;

    if let Some(moves) = &cli.replay {
        replay(&mut world, moves)?;
        print!("{}", world.snapshot());
        return Ok(());
    }

    // Pad setup may log; do it before the terminal goes raw.
    let mut gp = GamepadInput::new();
    gp.load_button_config(&config.gamepad);

    let mut renderer = Renderer::new();
    renderer.init()?;

    let result = game_loop(&mut world, &mut renderer, &mut gp, config);

    if let Err(e) = renderer.cleanup() {
        log::error!("Terminal cleanup failed: {e}");
    }

    result
}

/// Fixed-timestep loop. Input is polled every frame; the world ticks once
/// per `tick_rate_ms`. A tick that overruns its budget makes the next one
/// start immediately: work is never dropped, only delayed.
fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    gp: &mut GamepadInput,
    config: &GameConfig,
) -> Result<(), GameError> {
    let mut kb = KeyboardInput::new();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let mut last_tick = Instant::now();

    log::info!(
        "starting: tick {}ms, {:?} input drain, gamepad {}",
        config.speed.tick_rate_ms,
        world.inputs.order(),
        if gp.connected { "connected" } else { "not connected" },
    );
    renderer.render(world)?;

    loop {
        kb.drain_events(&mut world.inputs)?;
        gp.update(&mut world.inputs);

        if kb.quit_requested() || gp.quit_requested() {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            let tick_start = Instant::now();
            let events = step::step(world);
            log_events(world.tick, &events);
            renderer.render(world)?;

            let spent = tick_start.elapsed();
            if spent > tick_rate {
                log::debug!("tick {} overran: {:?}", world.tick, spent);
            }
            last_tick = tick_start;
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn log_events(tick: u64, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::MoveBlocked { .. } | GameEvent::TileFell { .. } => {
                log::trace!("tick {tick}: {event:?}");
            }
            _ => log::debug!("tick {tick}: {event:?}"),
        }
    }
}

/// Headless run: each move letter is queued and followed by one tick.
fn replay(world: &mut WorldState, moves: &str) -> Result<(), GameError> {
    for (pos, ch) in moves.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        if ch != '.' {
            let dir = MoveDir::from_letter(ch).ok_or(GameError::Replay { ch, pos })?;
            world.inputs.push(dir);
        }
        let events = step::step(world);
        log_events(world.tick, &events);
    }
    Ok(())
}
