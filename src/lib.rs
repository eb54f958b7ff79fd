//! Gridwalk
//!
//! A player token moving across a 2D grid under keyboard control, with
//! pause/resume and a frames-per-second readout.
//!
//! The core (`game`) is platform-free: hosts feed input events into a
//! `GameSession`, call `tick` once per frame and draw through a `RenderSink`.
//!
//! # Hosts
//!
//! - `web` - browser canvases driven by `requestAnimationFrame` (wasm32)
//! - `host` - replays a scripted input file on a tokio interval and prints
//!   the board to the terminal (native)
//!
//! # Features
//!
//! - `panic_hook` - forward panics to the browser console (enabled by default, wasm32 only)

pub mod config;
pub mod error;
pub mod game;
pub mod render;
pub mod util;

#[cfg(not(target_arch = "wasm32"))]
pub mod host;

#[cfg(target_arch = "wasm32")]
pub mod web;
