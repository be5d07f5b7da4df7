//! Snakeball headless entry point
//!
//! Runs a seeded game with the demo AI at the fixed timestep and logs what
//! happens. Usage:
//!
//! ```text
//! snakeball [--seed N] [--ticks N] [--match] [--tuning FILE] [--save FILE]
//! ```

use std::error::Error;
use std::fs;

use snakeball::Tuning;
use snakeball::consts::SIM_DT;
use snakeball::persistence::save_snapshot;
use snakeball::renderer;
use snakeball::sim::{GameEvent, GameMode, GamePhase, GameState, Scoring, TickInput, tick};

struct Options {
    seed: u64,
    ticks: u64,
    mode: GameMode,
    tuning: Option<String>,
    save: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        seed: 12345,
        ticks: 60 * 60,
        mode: GameMode::WinHole,
        tuning: None,
        save: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--seed" => {
                options.seed = value("--seed")?.parse().map_err(|e| format!("bad seed: {e}"))?;
            }
            "--ticks" => {
                options.ticks =
                    value("--ticks")?.parse().map_err(|e| format!("bad tick count: {e}"))?;
            }
            "--match" => options.mode = GameMode::Match,
            "--tuning" => options.tuning = Some(value("--tuning")?),
            "--save" => options.save = Some(value("--save")?),
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(options)
}

fn run() -> Result<(), Box<dyn Error>> {
    let options = parse_args()?;

    let tuning = match &options.tuning {
        Some(path) => Tuning::from_json(&fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    let mut state = GameState::with_tuning(options.seed, tuning, options.mode);
    let input = TickInput { idle_mode: true, ..Default::default() };

    for _ in 0..options.ticks {
        tick(&mut state, &input, SIM_DT);
        for event in &state.events {
            match event {
                GameEvent::OwnershipChanged { .. } => {
                    log::debug!("tick {}: {:?}", state.time_ticks, event)
                }
                _ => log::info!("tick {}: {:?}", state.time_ticks, event),
            }
        }
        if matches!(state.phase, GamePhase::Victory | GamePhase::GameOver) {
            break;
        }
    }

    let health = state.player_data().map_or(0.0, |p| p.health);
    let segments: Vec<usize> = state.bosses().map(|(_, b)| b.segment_count()).collect();
    let score = match &state.scoring {
        Scoring::Hole(hole) => format!("hole {} - {}", hole.player_score, hole.enemy_score),
        Scoring::Match(game) => format!(
            "match {} - {} ({})",
            game.player_score,
            game.enemy_score,
            game.clock()
        ),
    };
    let vertices = renderer::tessellate(&renderer::scene(&state)).len();

    println!(
        "{:?} after {} ticks: {}, player health {:.0}, boss segments {:?}, {} vertices",
        state.phase, state.time_ticks, score, health, segments, vertices
    );

    if let Some(path) = &options.save {
        fs::write(path, save_snapshot(&state)?)?;
        log::info!("Snapshot written to {}", path);
    }

    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    log::info!("Snakeball (headless) starting...");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the product on wasm
}
