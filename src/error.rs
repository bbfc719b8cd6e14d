//! Crate error type. Gameplay logic is total; only the browser glue and the
//! JSON-backed persistence / config layers can fail.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element `{0}`")]
    MissingElement(&'static str),
    #[error("canvas 2d context unavailable")]
    Canvas,
    #[error("local storage unavailable")]
    Storage,
    #[error("high score data: {0}")]
    HighScores(#[source] serde_json::Error),
    #[error("session config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
