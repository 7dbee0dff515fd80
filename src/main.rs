//! lapwatch - lap stopwatch firmware for the nRF52840-DK.
//!
//! Counts in 10 ms steps, takes Start / Stop / Lap / Reset from the four
//! DK buttons and shows elapsed and lap time on a 16x2 HD44780 LCD wired
//! in 4-bit mode.

#![no_std]
#![no_main]

mod board;
mod tasks;

use defmt::{info, unwrap};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_nrf::gpio::Pin;
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use lapwatch::bus::PinAssignment;
use lapwatch::config::{BUTTON_PINS, LCD_D4_D7, LCD_E, LCD_RS};
use lapwatch::context::StopwatchContext;
use lapwatch::debounce::{ButtonChannel, Polarity};

use crate::board::RawP0;
use crate::tasks::Context;

/// Shared stopwatch state, owned here and lent to every task.
static STOPWATCH: StaticCell<Context> = StaticCell::new();

/// Timekeeping executor. Pre-empts the thread-mode display loop, so enable
/// pulse busy-waits never hold back a tick or a debounce deadline.
static TIMEKEEPING: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    TIMEKEEPING.on_interrupt()
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("lapwatch starting...");

    let p = embassy_nrf::init(Default::default());
    let ctx: &'static Context =
        STOPWATCH.init(StopwatchContext::new(CriticalSectionRawMutex::new()));

    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let timekeeping = TIMEKEEPING.start(interrupt::EGU1_SWI1);

    let buttons = [
        (p.P0_11.degrade(), ButtonChannel::Start),
        (p.P0_12.degrade(), ButtonChannel::Stop),
        (p.P0_24.degrade(), ButtonChannel::Lap),
        (p.P0_25.degrade(), ButtonChannel::Reset),
    ];
    for (pin, channel) in buttons {
        info!(
            "Button {} on P0.{}",
            channel,
            BUTTON_PINS[channel.line() as usize]
        );
        unwrap!(timekeeping.spawn(tasks::button_task(pin, channel, Polarity::ActiveLow, ctx)));
    }

    unwrap!(timekeeping.spawn(tasks::tick_task(ctx)));

    // SAFETY: the LCD pins below are not handed to any embassy driver.
    let port = unsafe { RawP0::steal() };
    let pins = PinAssignment::four_bit(LCD_D4_D7, LCD_E, LCD_RS);
    tasks::display_loop(port, pins, ctx).await
}
