//! nRF52840 board glue.
//!
//! - `RawP0`: the LCD lines, driven through the P0 OUTSET / OUTCLR /
//!   PIN_CNF registers so a whole data pattern lands in one write.
//! - `ButtonLine`: a GPIOTE-backed input whose edge wait is only armed
//!   while the debouncer has the interrupt enabled.
//! - `DeadlineTimer`: one-shot quiet timer on top of `embassy-time`.
//! - `TickPeriod`: the 10 ms `Ticker` as a tick `Period`.

use core::ptr::write_volatile;

use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Instant, Ticker};

use lapwatch::bus::GpioPort;
use lapwatch::debounce::{InterruptLine, OneShotTimer, Polarity};
use lapwatch::tick::Period;

const P0_BASE: usize = 0x5000_0000;
const P0_OUTSET: usize = P0_BASE + 0x508;
const P0_OUTCLR: usize = P0_BASE + 0x50C;
const P0_PIN_CNF: usize = P0_BASE + 0x700;

/// PIN_CNF: DIR=output, INPUT=disconnect, PULL=pull-up, DRIVE=S0S1, SENSE off.
const PIN_CNF_OUTPUT_PULLUP: u32 = (1 << 0) | (1 << 1) | (3 << 2);

/// Raw register access to GPIO port P0.
pub struct RawP0 {
    _private: (),
}

impl RawP0 {
    /// # Safety
    ///
    /// The caller must make sure no other driver configures or drives the
    /// pins later passed to this port. Pins outside those masks are never
    /// touched.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl GpioPort for RawP0 {
    fn configure_outputs(&mut self, mask: u32) {
        for pin in (0..32).filter(|pin| mask & (1 << pin) != 0) {
            let cnf = (P0_PIN_CNF + 4 * pin) as *mut u32;
            // SAFETY: PIN_CNF[pin] is a valid, aligned P0 register for pin < 32,
            // and `steal` reserved these pins for us.
            unsafe { write_volatile(cnf, PIN_CNF_OUTPUT_PULLUP) };
        }
    }

    fn set_bits(&mut self, mask: u32) {
        // SAFETY: OUTSET only affects the bits written as 1.
        unsafe { write_volatile(P0_OUTSET as *mut u32, mask) };
    }

    fn clear_bits(&mut self, mask: u32) {
        // SAFETY: OUTCLR only affects the bits written as 1.
        unsafe { write_volatile(P0_OUTCLR as *mut u32, mask) };
    }
}

/// Button input with a maskable edge wait.
pub struct ButtonLine {
    input: Input<'static>,
    polarity: Polarity,
    listening: bool,
}

impl ButtonLine {
    pub fn new(pin: AnyPin, polarity: Polarity) -> Self {
        let pull = match polarity {
            Polarity::ActiveLow => Pull::Up,
            Polarity::ActiveHigh => Pull::Down,
        };
        Self {
            input: Input::new(pin, pull),
            polarity,
            listening: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Wait for the press edge (falling for active-low wiring).
    pub async fn wait_for_press_edge(&mut self) {
        match self.polarity {
            Polarity::ActiveLow => self.input.wait_for_falling_edge().await,
            Polarity::ActiveHigh => self.input.wait_for_rising_edge().await,
        }
    }
}

impl InterruptLine for ButtonLine {
    fn set_interrupt_enabled(&mut self, enabled: bool) {
        self.listening = enabled;
    }

    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}

/// One-shot timer expressed as a deadline the button task sleeps until.
#[derive(Default)]
pub struct DeadlineTimer {
    deadline: Option<Instant>,
}

impl DeadlineTimer {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Disarm and return the pending deadline, if any.
    pub fn take_deadline(&mut self) -> Option<Instant> {
        self.deadline.take()
    }
}

impl OneShotTimer for DeadlineTimer {
    fn arm_ms(&mut self, ms: u32) {
        self.deadline = Some(Instant::now() + Duration::from_millis(ms as u64));
    }
}

/// Fixed-rate tick source. Late boundaries are delivered back to back.
pub struct TickPeriod(Ticker);

impl TickPeriod {
    pub fn every_ms(ms: u64) -> Self {
        Self(Ticker::every(Duration::from_millis(ms)))
    }
}

impl Period for TickPeriod {
    async fn next(&mut self) {
        self.0.next().await
    }

    fn reset(&mut self) {
        self.0.reset()
    }
}
