//! Hardware-agnostic core of the lapwatch firmware.
//!
//! Everything that can run on the host lives here: the HD44780 bus
//! masking and driver, button debouncing, the stopwatch state machine and
//! the row formatting. The embedded binary (`src/main.rs`, feature
//! `embedded`) only adds the nRF52840 register access and the tasks.
//!
//! Usage: `cargo test` (host) or
//! `cargo run --release --no-default-features --features embedded --target thumbv7em-none-eabihf`.

#![cfg_attr(not(test), no_std)]

// ═══════════════════════════════════════════════════════════════════════════
// Display
// ═══════════════════════════════════════════════════════════════════════════

pub mod bus;
pub mod lcd;
pub mod render;

// ═══════════════════════════════════════════════════════════════════════════
// Timekeeping & input
// ═══════════════════════════════════════════════════════════════════════════

pub mod context;
pub mod debounce;
pub mod stopwatch;
pub mod tick;
pub mod time;

// ═══════════════════════════════════════════════════════════════════════════
// Support
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod error;

/// Host stand-ins for the port, delay, timers and lines. Behind the
/// default `mock` feature; firmware builds use `--no-default-features`.
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module tests
// ═══════════════════════════════════════════════════════════════════════════
