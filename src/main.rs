//! Paddle Catch entry point
//!
//! Native builds run a headless demo session driven by the autopilot; the
//! browser build hooks the loop up to the page's canvas.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger init failed: {e}").into());
    }

    if let Err(e) = paddle_catch::platform::browser::start(paddle_catch::SimConfig::default()) {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulated display refresh interval (60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Give up after ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_SESSION_MS: f64 = 10.0 * 60.0 * 1000.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use paddle_catch::platform::headless::{ManualScheduler, RecordingRenderer};
    use paddle_catch::sim::{GameEvent, autopilot};
    use paddle_catch::{Arena, DriverPhase, LoopDriver, SimConfig};

    env_logger::init();
    log::info!("Paddle Catch (native) starting headless demo...");

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let seed = std::env::var("PADDLE_CATCH_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Seed {seed}");

    let mut driver = LoopDriver::seeded(config, Arena::new(1280.0, 720.0), seed);
    let mut scheduler = ManualScheduler::default();
    let mut renderer = RecordingRenderer::default();

    let mut t_frame = 0.0;
    driver.start(t_frame, &mut scheduler);

    let mut bounces = 0u32;
    let mut catches = 0u32;
    while driver.phase() == DriverPhase::Running && t_frame < MAX_SESSION_MS {
        t_frame += FRAME_MS;
        let pointer = autopilot::target(driver.state());
        let outcome = driver.on_frame(t_frame, &mut scheduler, &pointer, &mut renderer);
        for event in &outcome.events {
            match event {
                GameEvent::PaddleBounce { .. } => bounces += 1,
                GameEvent::BonusCaught { .. } => catches += 1,
                _ => {}
            }
        }
    }

    let state = driver.state();
    println!(
        "Session over after {:.1}s simulated: score {}, {} paddle bounces, {} bonuses caught, {} frames drawn",
        state.now() / 1000.0,
        state.score.value,
        bounces,
        catches,
        renderer.frames
    );
    match serde_json::to_string_pretty(&driver.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize final snapshot: {e}"),
    }
}
