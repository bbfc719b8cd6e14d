//! Small browser helpers shared by the game frontends: canvas and overlay
//! creation, text updates, the requestAnimationFrame loop.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window, window};

use crate::error::GameError;

pub(crate) fn window_document() -> Result<(Window, Document), GameError> {
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;
    Ok((win, doc))
}

/// Reuse the canvas with `id` or append a new one to `<body>`.
pub(crate) fn ensure_canvas(
    doc: &Document,
    id: &str,
    width: u32,
    height: u32,
    style: &str,
) -> Result<HtmlCanvasElement, GameError> {
    if let Some(el) = doc.get_element_by_id(id) {
        let canvas: HtmlCanvasElement = el.dyn_into().map_err(|_| GameError::MissingElement("canvas"))?;
        canvas.set_width(width);
        canvas.set_height(height);
        return Ok(canvas);
    }
    let canvas: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| GameError::Canvas)?;
    canvas.set_id(id);
    canvas.set_width(width);
    canvas.set_height(height);
    canvas.set_attribute("style", style)?;
    doc.body().ok_or(GameError::MissingElement("body"))?.append_child(&canvas)?;
    Ok(canvas)
}

pub(crate) fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GameError> {
    canvas
        .get_context("2d")?
        .ok_or(GameError::Canvas)?
        .dyn_into()
        .map_err(|_| GameError::Canvas)
}

/// Fixed-position text overlay, created once.
pub(crate) fn ensure_overlay(doc: &Document, id: &str, style: &str, text: &str) -> Result<(), GameError> {
    if doc.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let body = doc.body().ok_or(GameError::MissingElement("body"))?;
    let div = doc.create_element("div")?;
    div.set_id(id);
    div.set_text_content(Some(text));
    div.set_attribute("style", style)?;
    body.append_child(&div)?;
    Ok(())
}

pub(crate) fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }
}

pub(crate) fn set_visible(doc: &Document, id: &str, visible: bool) {
    if let Some(el) = doc.get_element_by_id(id) {
        if let Ok(html) = el.dyn_into::<web_sys::HtmlElement>() {
            html.style().set_property("display", if visible { "block" } else { "none" }).ok();
        }
    }
}

pub(crate) fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}

/// Document-level keyboard listener (`keydown` / `keyup`) that lives for the
/// page lifetime.
pub(crate) fn on_key(
    doc: &Document,
    event: &str,
    handler: impl FnMut(web_sys::KeyboardEvent) + 'static,
) -> Result<(), GameError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Drive `tick` from requestAnimationFrame with the frame timestamp in ms.
pub(crate) fn start_frame_loop(mut tick: impl FnMut(f64) + 'static) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        tick(ts);
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            w.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        w.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
    }
}
