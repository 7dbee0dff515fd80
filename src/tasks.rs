//! Embassy tasks: 10 ms tick, one debounce task per button, display refresh.
//!
//! All tasks share one `StopwatchContext`, handed out by `main` as a
//! `&'static` reference. The tick and button tasks run on the interrupt
//! executor; `display_loop` busy-waits on enable pulses in thread mode and
//! is pre-empted by them.

use defmt::{debug, info};
use embassy_nrf::gpio::AnyPin;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Ticker, Timer};

use lapwatch::bus::PinAssignment;
use lapwatch::config::{DEBOUNCE_QUIET_MS, REFRESH_INTERVAL_MS, TICK_PERIOD_MS};
use lapwatch::context::StopwatchContext;
use lapwatch::debounce::{ButtonChannel, Debouncer, Polarity};
use lapwatch::lcd::Lcd;
use lapwatch::render;
use lapwatch::stopwatch::{Command, Transition};
use lapwatch::tick::{self, TickOutcome};

use crate::board::{ButtonLine, DeadlineTimer, RawP0, TickPeriod};

pub type Context = StopwatchContext<CriticalSectionRawMutex>;

/// Restart the tick period from zero (raised on Reset).
static TICK_RESTART: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Periodic tick - one centisecond per period while running.
#[embassy_executor::task]
pub async fn tick_task(ctx: &'static Context) {
    info!("Tick task started ({} ms)", TICK_PERIOD_MS);

    let mut period = TickPeriod::every_ms(TICK_PERIOD_MS);

    loop {
        if tick::next_tick(ctx, &mut period, &TICK_RESTART).await == TickOutcome::Restarted {
            debug!("Tick period restarted");
        }
    }
}

/// Debounce loop for one button.
///
/// Waits for the press edge only while the debouncer keeps the line's
/// interrupt enabled, then sleeps out the quiet period and lets the
/// debouncer confirm the press.
#[embassy_executor::task(pool_size = 4)]
pub async fn button_task(
    pin: AnyPin,
    channel: ButtonChannel,
    polarity: Polarity,
    ctx: &'static Context,
) {
    let mut debouncer = Debouncer::new(
        channel,
        polarity,
        DEBOUNCE_QUIET_MS,
        ButtonLine::new(pin, polarity),
        DeadlineTimer::new(),
    );
    let mut sink = ctx.sink(log_transition);

    loop {
        if debouncer.line().is_listening() {
            debouncer.line_mut().wait_for_press_edge().await;
            debouncer.on_edge();
        }

        match debouncer.timer_mut().take_deadline() {
            Some(deadline) => {
                Timer::at(deadline).await;
                if debouncer.on_quiet_elapsed(&mut sink).is_none() {
                    debug!("Button {}: bounce rejected", debouncer.channel());
                }
            }
            None => Timer::after(Duration::from_millis(DEBOUNCE_QUIET_MS as u64)).await,
        }
    }
}

fn log_transition(command: Command, transition: Transition) {
    match transition {
        Transition::Ignored => debug!("{}: ignored in current state", command),
        Transition::Restarted => {
            info!("{}: zeroed, counting", command);
            TICK_RESTART.signal(());
        }
        Transition::LapMarked(lap) => info!("{}: lap {}", command, lap),
        other => info!("{}: {}", command, other),
    }
}

/// Foreground loop: redraw both rows from a fresh snapshot.
pub async fn display_loop(port: RawP0, pins: PinAssignment, ctx: &'static Context) -> ! {
    let mut lcd = Lcd::configure(port, Delay, pins);
    info!("LCD ready ({})", lcd.width());

    let mut refresh = Ticker::every(Duration::from_millis(REFRESH_INTERVAL_MS));
    loop {
        let (top, bottom) = render::rows(&ctx.snapshot());
        lcd.write_two_lines(&top, &bottom);
        refresh.next().await;
    }
}
