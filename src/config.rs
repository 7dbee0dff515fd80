//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and display
//! constants live here so they can be tuned in one place.

// Timekeeping

/// Period of the hardware tick (ms). One tick = one centisecond.
pub const TICK_PERIOD_MS: u64 = 10;

/// Interval between display refreshes in the foreground loop (ms).
pub const REFRESH_INTERVAL_MS: u64 = 50;

// Buttons

/// Quiet period after an edge before the pin is re-sampled (ms).
pub const DEBOUNCE_QUIET_MS: u32 = 30;

// Display (HD44780 16x2)

/// Characters per display row.
pub const LCD_COLUMNS: usize = 16;

/// Minimum time the Enable line is held high to latch a transfer (µs).
pub const ENABLE_PULSE_US: u32 = 500;

/// Settle time after each initialisation command (µs).
/// Clear-display is the slowest instruction at ~1.52 ms.
pub const SETTLE_DELAY_US: u32 = 2_000;

/// Wait after power-up before the controller accepts instructions (ms).
pub const POWER_ON_DELAY_MS: u32 = 40;

// GPIO pin assignments (nRF52840-DK defaults)
//
// Plain P0 pin numbers; the LCD lines are driven through the raw P0
// OUTSET/OUTCLR registers, the buttons through GPIOTE.
//
//   Button 1 START → P0.11
//   Button 2 STOP  → P0.12
//   Button 3 LAP   → P0.24
//   Button 4 RESET → P0.25
//   LCD D4..D7     → P0.03, P0.04, P0.28, P0.29
//   LCD RS         → P0.30
//   LCD E          → P0.31

/// LCD data lines D4..D7.
pub const LCD_D4_D7: [u8; 4] = [3, 4, 28, 29];

/// LCD Register Select line.
pub const LCD_RS: u8 = 30;

/// LCD Enable line.
pub const LCD_E: u8 = 31;

/// P0 pin of each button, indexed by interrupt line (Start, Stop, Lap, Reset).
pub const BUTTON_PINS: [u8; 4] = [11, 12, 24, 25];
