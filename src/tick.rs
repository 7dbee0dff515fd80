//! Tick pacing.
//!
//! One call to [`next_tick`] waits for either the next period boundary or
//! a pending restart request. A restart wins over a boundary that is
//! already due: the period phase is reset and the zeroed stopwatch gets
//! its first centisecond one full period later.

use core::future::Future;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::context::StopwatchContext;

/// Periodic wake-up source with a resettable phase.
pub trait Period {
    /// Resolve at the next period boundary.
    fn next(&mut self) -> impl Future<Output = ()>;

    /// Start a fresh period from now.
    fn reset(&mut self);
}

/// What one pass of the tick loop did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// A period elapsed; `true` if the stopwatch advanced.
    Ticked(bool),
    /// A restart was pending; the period was reset without ticking.
    Restarted,
}

/// Wait for one tick or restart and apply it to `ctx`.
pub async fn next_tick<P, M, R>(
    ctx: &StopwatchContext<M>,
    period: &mut P,
    restart: &Signal<R, ()>,
) -> TickOutcome
where
    P: Period,
    M: RawMutex,
    R: RawMutex,
{
    // Polled in order, so a pending restart is seen before a due boundary.
    let event = select(restart.wait(), period.next()).await;
    match event {
        Either::First(()) => {
            period.reset();
            TickOutcome::Restarted
        }
        Either::Second(()) => TickOutcome::Ticked(ctx.tick()),
    }
}
