//! Granny: a top-down stealth game. Sneak around the house, collect the keys
//! and reach the exit without being caught by the pursuer.
//!
//! The simulation (`level`, `player`, `pursuer`, `items`, `session`) is plain
//! Rust and runs natively in tests; `web` wires it to a canvas.

pub mod items;
pub mod level;
mod level_attic;
mod level_living_room;
pub mod player;
pub mod pursuer;
pub mod scores;
pub mod session;
mod web;

pub use level::{Geometry, LevelDesc, Rect};
pub use player::{MoveInput, Player, PlayerConfig};
pub use pursuer::{DirectPath, PathPlanner, Perception, PlayerSnapshot, Pursuer, PursuerConfig, PursuerState};
pub use session::{GameSession, SessionConfig, SessionEvent, SessionStatus};
pub(crate) use web::start_granny_mode;

use level_attic::LEVEL_ATTIC;
use level_living_room::LEVEL_LIVING_ROOM;

static LEVELS: [&LevelDesc; 2] = [&LEVEL_ATTIC, &LEVEL_LIVING_ROOM];

/// All levels in play order.
pub fn levels() -> &'static [&'static LevelDesc] {
    &LEVELS
}
