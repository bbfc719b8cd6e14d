//! Granny Arcade core crate.
//!
//! Two browser games on a shared canvas/DOM layer: the Granny stealth chase
//! (`granny`) and Tetris (`tetris`). Game rules are plain Rust and testable
//! natively; the `web` submodules and [`dom`] hold the wasm glue.

use log::LevelFilter;
use wasm_bindgen::prelude::*;

mod dom;
pub mod error;
pub mod granny;
mod logging;
pub mod tetris;

pub use error::GameError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Start Granny with default tuning.
#[wasm_bindgen]
pub fn start_granny() -> Result<(), JsValue> {
    granny::start_granny_mode(granny::SessionConfig::default())?;
    Ok(())
}

/// Start Granny with a JSON `SessionConfig` override, e.g.
/// `{"pursuer": {"speed": 90}, "lives": 5}`.
#[wasm_bindgen]
pub fn start_granny_with_config(json: &str) -> Result<(), JsValue> {
    let config = granny::SessionConfig::from_json(json)?;
    granny::start_granny_mode(config)?;
    Ok(())
}

#[wasm_bindgen]
pub fn start_tetris() -> Result<(), JsValue> {
    tetris::start_tetris_mode()?;
    Ok(())
}
