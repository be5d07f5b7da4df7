//! Save/load persistence
//!
//! The game state is wrapped in a versioned JSON envelope. Loading rejects
//! unknown versions and states that could not have been produced by play
//! (a world whose tiles do not match its size, a boss with no segments,
//! invalid tuning).

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::state::GameState;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

pub fn save_snapshot(state: &GameState) -> Result<String, SimError> {
    let json = serde_json::to_string(&EnvelopeRef { version: SNAPSHOT_VERSION, state })?;
    log::debug!("Saved snapshot at tick {} ({} bytes)", state.time_ticks, json.len());
    Ok(json)
}

pub fn load_snapshot(json: &str) -> Result<GameState, SimError> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if envelope.version != SNAPSHOT_VERSION {
        log::warn!("Rejecting snapshot version {}", envelope.version);
        return Err(SimError::UnsupportedSnapshotVersion(envelope.version));
    }

    let mut state: GameState = serde_json::from_value(envelope.state)?;
    state.world.validate()?;
    state.tuning.validate()?;
    for enemy in &state.enemies {
        if let Some((_, boss)) = enemy.as_snake()
            && boss.segments().is_empty()
        {
            return Err(SimError::InvalidSegmentCount(0));
        }
    }
    state.normalize_order();

    log::info!("Loaded snapshot at tick {}", state.time_ticks);
    Ok(state)
}
