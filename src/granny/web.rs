//! Canvas frontend: DOM overlays, keyboard/mouse input, the frame loop and
//! rendering. All game rules live in [`GameSession`].

use std::cell::RefCell;
use std::f64::consts::TAU;

use glam::DVec2;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Storage};

use super::items::{ITEM_RADIUS, ItemManager};
use super::level::LevelDesc;
use super::player::{MoveInput, Player};
use super::pursuer::{Pursuer, PursuerState};
use super::scores::{HighScore, HighScoreTable, STORAGE_KEY};
use super::session::{GameSession, SessionConfig, SessionEvent, SessionStatus};
use crate::dom;
use crate::error::GameError;

const CANVAS_ID: &str = "granny-canvas";
const CANVAS_W: u32 = 1200;
const CANVAS_H: u32 = 900;
const FLOAT_SECS: f64 = 1.0;
const FLOAT_RISE: f64 = 30.0;
const FLASH_SECS: f64 = 0.1;
/// Longer frame gaps (background tab) are clamped to this.
const MAX_DT: f64 = 0.1;

const HUD_STYLE: &str = "position:fixed; top:10px; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45;";
const STATUS_STYLE: &str = "position:fixed; top:45%; left:50%; transform:translate(-50%,-50%); font-family:'Fira Code', monospace; font-size:22px; padding:16px 24px; background:rgba(0,0,0,0.75); border:2px solid #c0392b; border-radius:10px; color:#fff; text-align:center; white-space:pre-line; z-index:50;";

struct FloatingText {
    text: String,
    position: DVec2,
    color: &'static str,
    age: f64,
}

struct GrannyState {
    session: GameSession,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    doc: Document,
    input: MoveInput,
    rng: StdRng,
    last_ts: Option<f64>,
    texts: Vec<FloatingText>,
    flash: f64,
    debug: bool,
    scores: HighScoreTable,
    storage: Option<Storage>,
}

thread_local! {
    static GRANNY_STATE: RefCell<Option<GrannyState>> = const { RefCell::new(None) };
}

pub(crate) fn start_granny_mode(config: SessionConfig) -> Result<(), GameError> {
    let (win, doc) = dom::window_document()?;
    let canvas = dom::ensure_canvas(
        &doc,
        CANVAS_ID,
        CANVAS_W,
        CANVAS_H,
        "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); max-width:96vw; max-height:92vh; border:2px solid #222; background:#111; z-index:20;",
    )?;
    let ctx = dom::context_2d(&canvas)?;

    dom::ensure_overlay(&doc, "granny-score", &format!("{HUD_STYLE} left:12px;"), "Score: 0")?;
    dom::ensure_overlay(&doc, "granny-level", &format!("{HUD_STYLE} left:150px;"), "Level: 1")?;
    dom::ensure_overlay(&doc, "granny-lives", &format!("{HUD_STYLE} left:260px;"), "Lives: 3")?;
    dom::ensure_overlay(&doc, "granny-timer", &format!("{HUD_STYLE} right:12px;"), "00:00")?;
    dom::ensure_overlay(&doc, "granny-status", STATUS_STYLE, "")?;

    let storage = win.local_storage().ok().flatten();
    if storage.is_none() {
        warn!("localStorage unavailable, high scores will not persist");
    }
    let scores = load_scores(storage.as_ref());

    let state = GrannyState {
        session: GameSession::new(config),
        canvas: canvas.clone(),
        ctx,
        doc: doc.clone(),
        input: MoveInput::default(),
        rng: StdRng::from_entropy(),
        last_ts: None,
        texts: Vec::new(),
        flash: 0.0,
        debug: false,
        scores,
        storage,
    };
    let already_running = GRANNY_STATE.with(|cell| cell.replace(Some(state)).is_some());
    if already_running {
        info!("granny restarted");
        return Ok(());
    }

    dom::on_key(&doc, "keydown", |evt| {
        with_state(|st| on_key_down(st, &evt));
    })?;
    dom::on_key(&doc, "keyup", |evt| {
        with_state(|st| {
            set_held_key(&mut st.input, &evt.key(), false);
        });
    })?;
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            with_state(|st| {
                // Canvas may be scaled by CSS; map back to world units.
                let scale = st.canvas.width() as f64 / st.canvas.client_width().max(1) as f64;
                let p = DVec2::new(evt.offset_x() as f64, evt.offset_y() as f64) * scale;
                st.input.pointer = Some(p);
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_state(|st| st.input.pointer = None);
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    dom::start_frame_loop(|ts| with_state(|st| tick(st, ts)));
    info!("granny started");
    Ok(())
}

fn with_state(f: impl FnOnce(&mut GrannyState)) {
    GRANNY_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            f(st);
        }
    });
}

fn on_key_down(st: &mut GrannyState, evt: &web_sys::KeyboardEvent) {
    let key = evt.key();
    if set_held_key(&mut st.input, &key, true) || evt.repeat() {
        return;
    }
    match key.as_str() {
        "e" | "E" => {
            if let Some(event) = st.session.interact() {
                push_event(st, event);
            }
        }
        "q" | "Q" => {
            if let Some(event) = st.session.use_item() {
                push_event(st, event);
            }
        }
        "Escape" => st.session.toggle_pause(),
        "Enter" => advance_screen(st),
        "F1" => {
            evt.prevent_default();
            st.debug = !st.debug;
        }
        _ => {}
    }
}

/// Movement keys are level-triggered. Returns true when `key` is one.
fn set_held_key(input: &mut MoveInput, key: &str, down: bool) -> bool {
    let slot = match key {
        "w" | "W" | "ArrowUp" => &mut input.up,
        "s" | "S" | "ArrowDown" => &mut input.down,
        "a" | "A" | "ArrowLeft" => &mut input.left,
        "d" | "D" | "ArrowRight" => &mut input.right,
        "Shift" => &mut input.run,
        _ => return false,
    };
    *slot = down;
    true
}

fn advance_screen(st: &mut GrannyState) {
    match st.session.status() {
        SessionStatus::Menu | SessionStatus::GameOver | SessionStatus::Won => {
            st.texts.clear();
            st.session.retry(&mut st.rng);
        }
        SessionStatus::LevelComplete { .. } => {
            st.texts.clear();
            if let Some(event) = st.session.next_level(&mut st.rng) {
                push_event(st, event);
            }
        }
        SessionStatus::Playing | SessionStatus::Paused => {}
    }
}

fn push_event(st: &mut GrannyState, event: SessionEvent) {
    match event {
        SessionEvent::FloatingText { text, position, color } => st.texts.push(FloatingText {
            text,
            position,
            color,
            age: 0.0,
        }),
        SessionEvent::Caught { .. } => st.flash = FLASH_SECS,
        SessionEvent::GameOver { score, level } => record_score(st, score, level),
        SessionEvent::Won { score } => {
            let level = st.session.level();
            record_score(st, score, level);
        }
        SessionEvent::LevelComplete { .. } => {}
    }
}

fn tick(st: &mut GrannyState, ts: f64) {
    let dt = st
        .last_ts
        .map_or(0.0, |last| ((ts - last) / 1000.0).clamp(0.0, MAX_DT));
    st.last_ts = Some(ts);

    let events = st.session.update(dt, &st.input, &mut st.rng);
    for event in events {
        push_event(st, event);
    }
    if st.session.status() != SessionStatus::Paused {
        for t in &mut st.texts {
            t.age += dt;
        }
        st.texts.retain(|t| t.age < FLOAT_SECS);
        st.flash = (st.flash - dt).max(0.0);
    }

    render(st);
    update_hud(st);
}

fn update_hud(st: &GrannyState) {
    let s = &st.session;
    dom::set_text(&st.doc, "granny-score", &format!("Score: {}", s.score()));
    dom::set_text(&st.doc, "granny-level", &format!("Level: {}", s.level()));
    dom::set_text(&st.doc, "granny-lives", &format!("Lives: {}", s.lives()));
    dom::set_text(&st.doc, "granny-timer", &s.timer_text());
    let best = st.scores.best().map(|e| e.score);
    match status_text(s.status(), s.score(), best) {
        Some(text) => {
            dom::set_text(&st.doc, "granny-status", &text);
            dom::set_visible(&st.doc, "granny-status", true);
        }
        None => dom::set_visible(&st.doc, "granny-status", false),
    }
}

/// Text of the centred status overlay; `None` hides it.
fn status_text(status: SessionStatus, score: i64, best: Option<i64>) -> Option<String> {
    let text = match status {
        SessionStatus::Playing => return None,
        SessionStatus::Menu => {
            "GRANNY\nCollect the keys and reach the exit.\nWASD move, Shift run, E hide, Q use weapon\nPress Enter to start".to_string()
        }
        SessionStatus::Paused => "Paused\nEsc to resume".to_string(),
        SessionStatus::LevelComplete {
            time_bonus,
            items_found,
            total_items,
        } => format!(
            "Level complete!\nScore: {score}\nTime bonus: {time_bonus}\nItems: {items_found}/{total_items}\nEnter for the next level"
        ),
        SessionStatus::GameOver => format!(
            "Granny caught you!\nFinal score: {score}\nBest: {}\nEnter to try again",
            best.unwrap_or(score)
        ),
        SessionStatus::Won => format!("You escaped the house!\nFinal score: {score}\nEnter to play again"),
    };
    Some(text)
}

fn load_scores(storage: Option<&Storage>) -> HighScoreTable {
    let Some(storage) = storage else {
        return HighScoreTable::default();
    };
    match storage.get_item(STORAGE_KEY) {
        Ok(Some(json)) => HighScoreTable::from_json(&json).unwrap_or_else(|err| {
            warn!("ignoring stored high scores: {err}");
            HighScoreTable::default()
        }),
        Ok(None) => HighScoreTable::default(),
        Err(err) => {
            warn!("could not read high scores: {err:?}");
            HighScoreTable::default()
        }
    }
}

fn save_scores(storage: Option<&Storage>, table: &HighScoreTable) -> Result<(), GameError> {
    let json = table.to_json()?;
    storage.ok_or(GameError::Storage)?.set_item(STORAGE_KEY, &json)?;
    Ok(())
}

fn record_score(st: &mut GrannyState, score: i64, level: u32) {
    let entry = HighScore {
        score,
        level,
        date: String::from(js_sys::Date::new_0().to_iso_string()),
        name: "Player".into(),
    };
    if let Some(rank) = st.scores.record(entry) {
        info!("high score #{} ({score})", rank + 1);
    }
    if let Err(err) = save_scores(st.storage.as_ref(), &st.scores) {
        warn!("could not save high scores: {err}");
    }
}

// --- Rendering ---------------------------------------------------------------

fn render(st: &GrannyState) {
    let ctx = &st.ctx;
    ctx.set_fill_style_str("#111");
    ctx.fill_rect(0.0, 0.0, st.canvas.width() as f64, st.canvas.height() as f64);

    if st.session.status() == SessionStatus::Menu {
        return;
    }
    draw_level(ctx, st.session.level_desc());
    draw_items(ctx, st.session.items());
    draw_pursuer(ctx, st.session.pursuer(), st.debug);
    draw_player(ctx, st.session.player());

    ctx.set_font("20px Arial");
    ctx.set_text_align("center");
    for t in &st.texts {
        let k = t.age / FLOAT_SECS;
        ctx.set_global_alpha(1.0 - k);
        ctx.set_fill_style_str(t.color);
        ctx.fill_text(&t.text, t.position.x, t.position.y - FLOAT_RISE * k).ok();
    }
    ctx.set_global_alpha(1.0);

    if st.flash > 0.0 {
        ctx.set_fill_style_str("rgba(255,0,0,0.8)");
        ctx.fill_rect(0.0, 0.0, st.canvas.width() as f64, st.canvas.height() as f64);
    }
}

fn draw_level(ctx: &CanvasRenderingContext2d, level: &LevelDesc) {
    ctx.set_fill_style_str("#333");
    for wall in level.walls {
        ctx.fill_rect(wall.x, wall.y, wall.w, wall.h);
    }

    ctx.set_font("12px Arial");
    ctx.set_text_align("left");
    for spot in level.hide_spots {
        let r = spot.rect;
        ctx.set_fill_style_str("#795548");
        ctx.fill_rect(r.x, r.y, r.w, r.h);
        ctx.set_fill_style_str("#fff");
        ctx.fill_text(spot.kind.label(), r.x + 5.0, r.y + 20.0).ok();
    }

    let exit = level.exit;
    ctx.set_fill_style_str("#27ae60");
    ctx.fill_rect(exit.x, exit.y, exit.w, exit.h);
    ctx.set_fill_style_str("#fff");
    ctx.fill_text("EXIT", exit.x + 3.0, exit.y + 30.0).ok();
}

fn draw_items(ctx: &CanvasRenderingContext2d, items: &ItemManager) {
    for item in items.items() {
        let p = item.draw_position();
        ctx.set_fill_style_str(item.kind.glow_color());
        ctx.set_global_alpha(0.3 + 0.4 * item.glow());
        circle(ctx, p, ITEM_RADIUS + 5.0);
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(item.kind.color());
        circle(ctx, p, ITEM_RADIUS * 0.6);
    }
}

fn pursuer_color(state: PursuerState) -> &'static str {
    match state {
        PursuerState::Patrolling => "#c0392b",
        PursuerState::Chasing { .. } => "#e74c3c",
        PursuerState::Searching { .. } => "#d35400",
        PursuerState::Stunned { .. } => "#7f8c8d",
    }
}

fn draw_pursuer(ctx: &CanvasRenderingContext2d, pursuer: &Pursuer, debug: bool) {
    let pos = pursuer.position();
    ctx.set_fill_style_str(pursuer_color(pursuer.state()));
    circle(ctx, pos, pursuer.size() / 2.0);

    // Eyes look toward the current target.
    let facing = pursuer.facing();
    let (fwd, side) = (DVec2::from_angle(facing), DVec2::from_angle(facing).perp());
    // Walk wobble.
    let bob = if pursuer.animation_frame() % 2 == 0 { 0.0 } else { 1.5 };
    ctx.set_fill_style_str("#111");
    circle(ctx, pos + fwd * (10.0 + bob) - side * 8.0, 5.0);
    circle(ctx, pos + fwd * (10.0 + bob) + side * 8.0, 5.0);

    if pursuer.state().is_stunned() {
        ctx.set_fill_style_str("#f1c40f");
        ctx.set_font("16px Arial");
        ctx.set_text_align("center");
        ctx.fill_text("* * *", pos.x, pos.y - pursuer.size() / 2.0 - 6.0).ok();
    }

    if debug {
        let cfg = pursuer.config();
        ctx.set_line_width(1.0);
        ctx.set_stroke_style_str("rgba(255, 0, 0, 0.3)");
        ring(ctx, pos, cfg.detection_radius);
        ctx.set_stroke_style_str("rgba(255, 165, 0, 0.3)");
        ring(ctx, pos, cfg.hearing_radius);
        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.4)");
        let mut from = pos;
        for &wp in pursuer.path() {
            dom::line(ctx, from.x, from.y, wp.x, wp.y);
            from = wp;
        }
        ctx.set_fill_style_str("#fff");
        ctx.set_font("12px monospace");
        ctx.set_text_align("center");
        ctx.fill_text(pursuer.state().name(), pos.x, pos.y + pursuer.size() / 2.0 + 14.0).ok();
    }
}

fn draw_player(ctx: &CanvasRenderingContext2d, player: &Player) {
    if player.is_hiding() {
        return;
    }
    let pos = player.position();
    ctx.set_global_alpha(if player.is_invisible() { 0.35 } else { 1.0 });
    ctx.set_fill_style_str(if player.has_speed_boost() { "#5dade2" } else { "#3498db" });
    circle(ctx, pos, player.width() / 2.0);
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(4.0);
    let tip = pos + DVec2::from_angle(player.direction()) * 20.0;
    dom::line(ctx, pos.x, pos.y, tip.x, tip.y);
    ctx.set_global_alpha(1.0);

    let (w, h) = (100.0, 10.0);
    let (x, y) = (pos.x - w / 2.0, pos.y + 30.0);
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
    ctx.fill_rect(x, y, w, h);
    ctx.set_fill_style_str(if player.is_running() { "#e67e22" } else { "#2ecc71" });
    ctx.fill_rect(x, y, w * player.stamina_fraction(), h);
}

fn circle(ctx: &CanvasRenderingContext2d, center: DVec2, radius: f64) {
    ctx.begin_path();
    ctx.arc(center.x, center.y, radius, 0.0, TAU).ok();
    ctx.fill();
}

fn ring(ctx: &CanvasRenderingContext2d, center: DVec2, radius: f64) {
    ctx.begin_path();
    ctx.arc(center.x, center.y, radius, 0.0, TAU).ok();
    ctx.stroke();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_overlay_hidden_while_playing() {
        assert_eq!(status_text(SessionStatus::Playing, 10, None), None);
    }

    #[test]
    fn level_complete_overlay_lists_bonus_and_items() {
        let text = status_text(
            SessionStatus::LevelComplete {
                time_bonus: 2500,
                items_found: 3,
                total_items: 4,
            },
            2800,
            None,
        )
        .unwrap();
        assert!(text.contains("Time bonus: 2500"));
        assert!(text.contains("Items: 3/4"));
    }

    #[test]
    fn game_over_overlay_shows_best() {
        let text = status_text(SessionStatus::GameOver, 120, Some(900)).unwrap();
        assert!(text.contains("Final score: 120"));
        assert!(text.contains("Best: 900"));
    }

    #[test]
    fn movement_keys_are_held() {
        let mut input = MoveInput::default();
        assert!(set_held_key(&mut input, "W", true));
        assert!(set_held_key(&mut input, "Shift", true));
        assert!(input.up && input.run);
        assert!(set_held_key(&mut input, "ArrowUp", false));
        assert!(!input.up);
        assert!(!set_held_key(&mut input, "e", true));
    }
}
