//! In-memory stand-ins for the hardware capabilities.
//!
//! Used by the unit tests and `tests/integration.rs` to exercise the
//! display, debounce and timing logic on the host. `Hd44780Model` decodes
//! enable pulses the way the controller does, so tests can read back what
//! the display would show.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::bus::{pin_bit, GpioPort, PinAssignment};
use crate::debounce::{CommandSink, InterruptLine, OneShotTimer};
use crate::lcd::Row;
use crate::stopwatch::Command;
use crate::tick::Period;

// ═══════════════════════════════════════════════════════════════════════════
// GPIO port
// ═══════════════════════════════════════════════════════════════════════════

/// 32-bit output port with write-1-to-set / write-1-to-clear access.
#[derive(Clone, Debug, Default)]
pub struct MockPort {
    level: u32,
    outputs: u32,
}

impl MockPort {
    pub const fn new() -> Self {
        Self {
            level: 0,
            outputs: 0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Pins configured as outputs (with pull-up).
    pub fn outputs(&self) -> u32 {
        self.outputs
    }

    pub fn is_high(&self, pin: u8) -> bool {
        self.level & pin_bit(pin) != 0
    }
}

impl GpioPort for MockPort {
    fn configure_outputs(&mut self, mask: u32) {
        self.outputs |= mask;
    }

    fn set_bits(&mut self, mask: u32) {
        self.level |= mask;
    }

    fn clear_bits(&mut self, mask: u32) {
        self.level &= !mask;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HD44780 controller model
// ═══════════════════════════════════════════════════════════════════════════

/// One decoded transfer as seen by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Latch {
    /// Single 8-bit-mode pulse with only D4..D7 wired (mode switch).
    Nibble(u8),
    /// Complete instruction byte (RS low).
    Command(u8),
    /// Complete character byte (RS high).
    Data(u8),
}

const DDRAM_SIZE: usize = 128;
const ROW_2_BASE: usize = 0x40;
const MAX_LATCHES: usize = 1024;

/// Port that behaves like an HD44780 hanging off the assigned pins.
///
/// Latches data on the falling edge of Enable, starts in 8-bit mode and
/// follows function-set instructions. Only the instructions the driver
/// uses are modelled.
pub struct Hd44780Model {
    port: MockPort,
    pins: PinAssignment,
    four_bit: bool,
    pending_high: Option<u8>,
    address: usize,
    ddram: [u8; DDRAM_SIZE],
    latches: Vec<Latch, MAX_LATCHES>,
    enable_pulses: usize,
}

impl Hd44780Model {
    pub fn new(pins: PinAssignment) -> Self {
        Self {
            port: MockPort::new(),
            pins,
            four_bit: false,
            pending_high: None,
            address: 0,
            ddram: [b' '; DDRAM_SIZE],
            latches: Vec::new(),
            enable_pulses: 0,
        }
    }

    pub fn port(&self) -> &MockPort {
        &self.port
    }

    pub fn four_bit_mode(&self) -> bool {
        self.four_bit
    }

    /// Every transfer seen so far, oldest first. Stops recording when full.
    pub fn latches(&self) -> &[Latch] {
        &self.latches
    }

    pub fn enable_pulses(&self) -> usize {
        self.enable_pulses
    }

    /// The 16 visible characters of `row`.
    pub fn row(&self, row: Row) -> [u8; 16] {
        let base = match row {
            Row::First => 0,
            Row::Second => ROW_2_BASE,
        };
        let mut out = [0u8; 16];
        out.copy_from_slice(&self.ddram[base..base + 16]);
        out
    }

    pub fn ddram(&self, address: usize) -> u8 {
        self.ddram[address % DDRAM_SIZE]
    }

    /// Value on the data lines the controller samples (unwired lines read 0).
    fn sample_bus(&self) -> u8 {
        self.pins
            .data_pins()
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, pin)| match pin {
                Some(p) if self.port.is_high(*p) => acc | (1 << bit),
                _ => acc,
            })
    }

    fn on_enable_falling(&mut self) {
        self.enable_pulses += 1;
        let rs = self.port.is_high(self.pins.register_select);
        let bus = self.sample_bus();

        if !self.four_bit {
            if self.pins.d0.is_none() && !rs {
                let _ = self.latches.push(Latch::Nibble(bus >> 4));
                self.execute_command(bus);
            } else {
                self.complete(rs, bus);
            }
            return;
        }

        let nibble = bus >> 4;
        match self.pending_high.take() {
            None => self.pending_high = Some(nibble),
            Some(high) => self.complete(rs, (high << 4) | nibble),
        }
    }

    fn complete(&mut self, rs: bool, byte: u8) {
        if rs {
            let _ = self.latches.push(Latch::Data(byte));
            self.ddram[self.address] = byte;
            self.address = (self.address + 1) % DDRAM_SIZE;
        } else {
            let _ = self.latches.push(Latch::Command(byte));
            self.execute_command(byte);
        }
    }

    fn execute_command(&mut self, byte: u8) {
        if byte & 0x80 != 0 {
            self.address = (byte & 0x7F) as usize;
        } else if byte & 0x20 != 0 {
            // Function set: DL bit selects the bus width.
            self.four_bit = byte & 0x10 == 0;
            self.pending_high = None;
        } else if byte == 0x01 {
            self.ddram = [b' '; DDRAM_SIZE];
            self.address = 0;
        } else if byte & 0xFE == 0x02 {
            self.address = 0;
        }
    }
}

impl GpioPort for Hd44780Model {
    fn configure_outputs(&mut self, mask: u32) {
        self.port.configure_outputs(mask);
    }

    fn set_bits(&mut self, mask: u32) {
        self.port.set_bits(mask);
    }

    fn clear_bits(&mut self, mask: u32) {
        let enable_was_high = self.port.is_high(self.pins.enable);
        self.port.clear_bits(mask);
        if enable_was_high && !self.port.is_high(self.pins.enable) {
            self.on_enable_falling();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Delay
// ═══════════════════════════════════════════════════════════════════════════

/// Delay that only accounts for the requested time.
#[derive(Clone, Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
    shortest_ns: Option<u32>,
}

impl MockDelay {
    pub const fn new() -> Self {
        Self {
            total_ns: 0,
            shortest_ns: None,
        }
    }

    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }

    /// Shortest single wait requested so far (0 if none).
    pub fn shortest_us(&self) -> u32 {
        self.shortest_ns.unwrap_or(0) / 1_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.shortest_ns = Some(self.shortest_ns.map_or(ns, |s| s.min(ns)));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Button line, one-shot timer, sink
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct MockLine {
    level_high: bool,
    interrupt_enabled: bool,
}

impl MockLine {
    /// Line resting at `level_high`, interrupt masked.
    pub const fn new(level_high: bool) -> Self {
        Self {
            level_high,
            interrupt_enabled: false,
        }
    }

    pub fn set_level(&mut self, high: bool) {
        self.level_high = high;
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.interrupt_enabled
    }
}

impl InterruptLine for MockLine {
    fn set_interrupt_enabled(&mut self, enabled: bool) {
        self.interrupt_enabled = enabled;
    }

    fn is_high(&self) -> bool {
        self.level_high
    }
}

/// One-shot timer driven by a test clock in milliseconds.
#[derive(Clone, Debug, Default)]
pub struct MockTimer {
    now_ms: u32,
    deadline_ms: Option<u32>,
    armed_ms: Option<u32>,
    arm_count: usize,
}

impl MockTimer {
    pub const fn new() -> Self {
        Self {
            now_ms: 0,
            deadline_ms: None,
            armed_ms: None,
            arm_count: 0,
        }
    }

    /// Duration passed to the last `arm_ms`.
    pub fn armed_ms(&self) -> Option<u32> {
        self.armed_ms
    }

    pub fn arm_count(&self) -> usize {
        self.arm_count
    }

    /// Test clock, in milliseconds since construction.
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    /// Move the clock forward. Returns true if the timer fired on the way.
    pub fn advance_ms(&mut self, ms: u32) -> bool {
        self.now_ms += ms;
        match self.deadline_ms {
            Some(deadline) if deadline <= self.now_ms => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

impl OneShotTimer for MockTimer {
    fn arm_ms(&mut self, ms: u32) {
        self.deadline_ms = Some(self.now_ms + ms);
        self.armed_ms = Some(ms);
        self.arm_count += 1;
    }
}

/// Sink that records every dispatched command.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    commands: Vec<Command, 64>,
}

impl RecordingSink {
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

impl CommandSink for RecordingSink {
    fn dispatch(&mut self, command: Command) {
        let _ = self.commands.push(command);
    }
}

/// Period source whose next boundary is always already due.
#[derive(Clone, Debug, Default)]
pub struct MockPeriod {
    boundaries: usize,
    resets: usize,
}

impl MockPeriod {
    pub const fn new() -> Self {
        Self {
            boundaries: 0,
            resets: 0,
        }
    }

    /// Boundaries actually delivered to a waiter.
    pub fn boundaries(&self) -> usize {
        self.boundaries
    }

    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl Period for MockPeriod {
    async fn next(&mut self) {
        self.boundaries += 1;
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}
