//! Platform collaborators
//!
//! - `headless`: manual frame scheduling and a recording renderer, for the
//!   native demo runner and tests
//! - `browser`: `requestAnimationFrame`, mouse tracking and a 2D canvas
//!   renderer (wasm32 only)

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod browser;
