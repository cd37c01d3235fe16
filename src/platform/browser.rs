//! Browser collaborators
//!
//! `requestAnimationFrame` drives the loop, a `mousemove` listener feeds the
//! pointer cell, and a 2D canvas context draws each snapshot.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, FontFace, HtmlCanvasElement, MouseEvent, Window};

use crate::driver::{FrameHandle, FrameScheduler, LoopDriver, Renderer, Snapshot};
use crate::sim::Pointer;
use crate::{Arena, SimConfig};

/// Canvas element the game draws into
pub const CANVAS_ID: &str = "cnvs";

const DISPLAY_FONT: &str = "PressStart";
const DISPLAY_FONT_SRC: &str = "url(fonts/PressStart2P-Regular.ttf)";
const FALLBACK_FONT: &str = "monospace";

const PADDLE_COLOR: &str = "#FF0000";
const BALL_COLOR: &str = "#0000FF";
const BONUS_COLOR: &str = "#FFB000";
const SCORE_COLOR: &str = "#202020";

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` / `cancelAnimationFrame`
pub struct BrowserScheduler {
    window: Window,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameScheduler for BrowserScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            log::error!("Frame requested before the callback was installed");
            return FrameHandle(0);
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => FrameHandle(id as i64),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0 as i32) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

/// Draws the snapshot with plain filled shapes
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    /// CSS font family; swapped in once the display font loads
    font: Rc<RefCell<String>>,
}

impl CanvasRenderer {
    fn circle(&self, x: f32, y: f32, radius: f32, color: &str) {
        let ctx = &self.ctx;
        ctx.begin_path();
        if let Err(e) = ctx.arc(
            x as f64,
            y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        ) {
            log::warn!("arc failed: {:?}", e);
        }
        ctx.set_fill_style_str(color);
        ctx.fill();
        ctx.close_path();
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, snapshot.arena.width as f64, snapshot.arena.height as f64);

        let paddle = snapshot.paddle;
        ctx.begin_path();
        ctx.rect(
            (paddle.pos.x - paddle.size.x / 2.0) as f64,
            (paddle.pos.y - paddle.size.y / 2.0) as f64,
            paddle.size.x as f64,
            paddle.size.y as f64,
        );
        ctx.set_fill_style_str(PADDLE_COLOR);
        ctx.fill();
        ctx.close_path();

        let ball = snapshot.ball;
        self.circle(ball.pos.x, ball.pos.y, ball.radius, BALL_COLOR);

        if let Some(bonus) = snapshot.bonus {
            self.circle(bonus.pos.x, bonus.pos.y, bonus.radius, BONUS_COLOR);
        }

        ctx.set_font(&format!("24px {}", self.font.borrow()));
        ctx.set_fill_style_str(SCORE_COLOR);
        if let Err(e) = ctx.fill_text(&format!("Score: {}", snapshot.score), 20.0, 40.0) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}

/// Load the display font in the background; failure keeps the fallback
fn load_display_font(document: &Document, font: Rc<RefCell<String>>) {
    let face = match FontFace::new_with_str(DISPLAY_FONT, DISPLAY_FONT_SRC) {
        Ok(face) => face,
        Err(e) => {
            log::warn!("Display font unavailable ({:?}), using {}", e, FALLBACK_FONT);
            return;
        }
    };
    let fonts = document.fonts();

    wasm_bindgen_futures::spawn_local(async move {
        let loaded = match face.load() {
            Ok(promise) => JsFuture::from(promise).await,
            Err(e) => Err(e),
        };
        match loaded.and_then(|_| fonts.add(&face)) {
            Ok(_) => {
                *font.borrow_mut() = format!("'{DISPLAY_FONT}', {FALLBACK_FONT}");
                log::info!("Display font loaded");
            }
            Err(e) => log::warn!("Display font failed to load ({:?}), using {}", e, FALLBACK_FONT),
        }
    });
}

/// Everything the frame callback needs
struct Game {
    driver: LoopDriver,
    scheduler: BrowserScheduler,
    pointer: Rc<Cell<Pointer>>,
    renderer: CanvasRenderer,
}

/// Size the canvas to the window, wire input, and start the loop
pub fn start(config: SimConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str("canvas element not found"))?
        .dyn_into()?;

    let width = window.inner_width()?.as_f64().unwrap_or(800.0);
    let height = window.inner_height()?.as_f64().unwrap_or(600.0);
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    let pointer = Rc::new(Cell::new(Pointer::default()));
    {
        let pointer = pointer.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            pointer.set(Pointer::new(event.page_x() as f32, event.page_y() as f32));
        });
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let font = Rc::new(RefCell::new(FALLBACK_FONT.to_string()));
    load_display_font(&document, font.clone());

    let seed = js_sys::Date::now() as u64;
    let arena = Arena::new(width as f32, height as f32);
    let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

    let game = Rc::new(RefCell::new(Game {
        driver: LoopDriver::seeded(config, arena, seed),
        scheduler: BrowserScheduler {
            window: window.clone(),
            callback: callback.clone(),
        },
        pointer,
        renderer: CanvasRenderer { ctx, font },
    }));

    {
        let game = game.clone();
        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |t_frame: f64| {
            let mut game = game.borrow_mut();
            let Game {
                driver,
                scheduler,
                pointer,
                renderer,
            } = &mut *game;
            driver.on_frame(t_frame, scheduler, &*pointer, renderer);
        }));
    }

    let t0 = window.performance().map(|p| p.now()).unwrap_or(0.0);
    let mut game = game.borrow_mut();
    let Game {
        driver, scheduler, ..
    } = &mut *game;
    driver.start(t0, scheduler);
    log::info!("Seed {seed}, canvas {width}x{height}");
    Ok(())
}
