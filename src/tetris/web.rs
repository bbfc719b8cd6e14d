//! Canvas frontend for Tetris: board and preview canvases, HUD, keyboard.

use std::cell::RefCell;

use log::info;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::board::{COLS, ROWS};
use super::game::TetrisGame;
use super::piece::{Piece, Rotation, color};
use crate::dom;
use crate::error::GameError;

const BLOCK: f64 = 30.0;
const NEXT_BLOCK: f64 = 25.0;
const NEXT_SIZE: u32 = 120;
const EDGE: f64 = 1.0;
const BORDER: f64 = 2.0;
const LIGHT: &str = "rgba(255, 255, 255, 0.3)";
const DARK: &str = "rgba(0, 0, 0, 0.4)";

const HUD_STYLE: &str = "position:fixed; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45; left:calc(50% + 170px);";

struct TetrisState {
    game: TetrisGame,
    board_ctx: CanvasRenderingContext2d,
    board_canvas: HtmlCanvasElement,
    next_ctx: CanvasRenderingContext2d,
    next_canvas: HtmlCanvasElement,
    doc: Document,
    last_ts: Option<f64>,
}

thread_local! {
    static TETRIS_STATE: RefCell<Option<TetrisState>> = const { RefCell::new(None) };
}

pub(crate) fn start_tetris_mode() -> Result<(), GameError> {
    let (_win, doc) = dom::window_document()?;
    let board_canvas = dom::ensure_canvas(
        &doc,
        "tetris-canvas",
        (COLS as f64 * BLOCK) as u32,
        (ROWS as f64 * BLOCK) as u32,
        "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); border:2px solid #222; background:#3c3c3c; z-index:20;",
    )?;
    let next_canvas = dom::ensure_canvas(
        &doc,
        "tetris-next",
        NEXT_SIZE,
        NEXT_SIZE,
        "position:fixed; left:calc(50% + 170px); top:calc(50% - 300px); border:2px solid #222; z-index:20;",
    )?;
    let board_ctx = dom::context_2d(&board_canvas)?;
    let next_ctx = dom::context_2d(&next_canvas)?;

    dom::ensure_overlay(&doc, "tetris-score", &format!("{HUD_STYLE} top:calc(50% - 160px);"), "Score: 0")?;
    dom::ensure_overlay(&doc, "tetris-level", &format!("{HUD_STYLE} top:calc(50% - 125px);"), "Level: 1")?;
    dom::ensure_overlay(&doc, "tetris-lines", &format!("{HUD_STYLE} top:calc(50% - 90px);"), "Lines: 0")?;
    dom::ensure_overlay(
        &doc,
        "tetris-status",
        "position:fixed; top:50%; left:50%; transform:translate(-50%,-50%); font-family:'Fira Code', monospace; font-size:22px; padding:16px 24px; background:rgba(0,0,0,0.75); border-radius:10px; color:#fff; text-align:center; white-space:pre-line; z-index:50;",
        "",
    )?;

    let state = TetrisState {
        game: TetrisGame::new(),
        board_ctx,
        board_canvas,
        next_ctx,
        next_canvas,
        doc: doc.clone(),
        last_ts: None,
    };
    let already_running = TETRIS_STATE.with(|cell| cell.replace(Some(state)).is_some());
    if already_running {
        return Ok(());
    }

    dom::on_key(&doc, "keydown", |evt| {
        with_state(|st| {
            let game = &mut st.game;
            let handled = match evt.key().as_str() {
                "ArrowLeft" => {
                    game.shift(-1);
                    true
                }
                "ArrowRight" => {
                    game.shift(1);
                    true
                }
                "ArrowDown" => {
                    game.soft_drop();
                    true
                }
                "ArrowUp" => {
                    game.rotate(Rotation::Clockwise);
                    true
                }
                " " => {
                    game.hard_drop();
                    true
                }
                "Enter" if !game.is_active() => {
                    game.start();
                    info!("tetris started");
                    true
                }
                _ => false,
            };
            if handled {
                evt.prevent_default();
            }
        });
    })?;

    dom::start_frame_loop(|ts| with_state(|st| tick(st, ts)));
    Ok(())
}

fn with_state(f: impl FnOnce(&mut TetrisState)) {
    TETRIS_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            f(st);
        }
    });
}

fn tick(st: &mut TetrisState, ts: f64) {
    let dt = st.last_ts.map_or(0.0, |last| (ts - last).max(0.0));
    st.last_ts = Some(ts);
    st.game.update(dt);
    draw(st);
    update_hud(st);
}

fn update_hud(st: &TetrisState) {
    let g = &st.game;
    dom::set_text(&st.doc, "tetris-score", &format!("Score: {}", g.score()));
    dom::set_text(&st.doc, "tetris-level", &format!("Level: {}", g.level()));
    dom::set_text(&st.doc, "tetris-lines", &format!("Lines: {}", g.lines()));
    let status = if g.is_game_over() {
        Some(format!("Game over\nFinal score: {}\nEnter to restart", g.score()))
    } else if !g.is_active() {
        Some("TETRIS\nArrows move and rotate, Space drops\nPress Enter to start".to_string())
    } else {
        None
    };
    match status {
        Some(text) => {
            dom::set_text(&st.doc, "tetris-status", &text);
            dom::set_visible(&st.doc, "tetris-status", true);
        }
        None => dom::set_visible(&st.doc, "tetris-status", false),
    }
}

fn draw(st: &TetrisState) {
    let ctx = &st.board_ctx;
    ctx.set_fill_style_str("#3c3c3c");
    ctx.fill_rect(0.0, 0.0, st.board_canvas.width() as f64, st.board_canvas.height() as f64);

    for (y, row) in st.game.board().rows().iter().enumerate() {
        for (x, &c) in row.iter().enumerate() {
            if c != 0 {
                draw_block(ctx, x as f64 * BLOCK, y as f64 * BLOCK, color(c), BLOCK);
            }
        }
    }

    if st.game.is_active() {
        let piece = st.game.current();
        let (px, py) = st.game.position();
        ctx.set_global_alpha(0.25);
        draw_piece(ctx, piece, px as f64 * BLOCK, st.game.ghost_y() as f64 * BLOCK, BLOCK);
        ctx.set_global_alpha(1.0);
        draw_piece(ctx, piece, px as f64 * BLOCK, py as f64 * BLOCK, BLOCK);
    }

    let next = &st.next_ctx;
    next.set_fill_style_str("rgba(60, 60, 60, 0.8)");
    next.fill_rect(0.0, 0.0, st.next_canvas.width() as f64, st.next_canvas.height() as f64);
    let piece = st.game.next();
    let ox = (4.0 - piece.width() as f64) / 2.0 * NEXT_BLOCK + 10.0;
    let oy = (4.0 - piece.height() as f64) / 2.0 * NEXT_BLOCK + 10.0;
    draw_piece(next, piece, ox, oy, NEXT_BLOCK);
}

fn draw_piece(ctx: &CanvasRenderingContext2d, piece: &Piece, ox: f64, oy: f64, size: f64) {
    for (x, y, c) in piece.filled() {
        draw_block(ctx, ox + x as f64 * size, oy + y as f64 * size, color(c), size);
    }
}

/// Flat block with a light top/left edge, dark bottom/right edge and a 3×3
/// grid texture.
fn draw_block(ctx: &CanvasRenderingContext2d, x: f64, y: f64, fill: &str, size: f64) {
    ctx.set_fill_style_str(fill);
    ctx.fill_rect(x, y, size, size);

    ctx.set_fill_style_str(LIGHT);
    ctx.fill_rect(x, y, size, EDGE);
    ctx.fill_rect(x, y, EDGE, size);
    ctx.set_fill_style_str(DARK);
    ctx.fill_rect(x, y + size - EDGE, size, EDGE);
    ctx.fill_rect(x + size - EDGE, y, EDGE, size);

    ctx.set_stroke_style_str(DARK);
    ctx.set_line_width(0.5);
    for i in 1..3 {
        let d = size / 3.0 * i as f64;
        dom::line(ctx, x, y + d, x + size, y + d);
        dom::line(ctx, x + d, y, x + d, y + size);
    }

    ctx.set_stroke_style_str("rgba(0, 0, 0, 0.7)");
    ctx.set_line_width(BORDER);
    ctx.stroke_rect(x, y, size, size);
}
