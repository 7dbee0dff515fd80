//! Shared stopwatch context.
//!
//! The tick source and the button dispatch path both mutate the same
//! stopwatch from different execution contexts, and the display loop
//! reads it. All of them go through one `StopwatchContext`, which guards
//! the state with a blocking mutex. On target that is a
//! `CriticalSectionRawMutex`; host tests use `NoopRawMutex`.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::debounce::CommandSink;
use crate::stopwatch::{Command, Snapshot, Stopwatch, Transition};

pub struct StopwatchContext<M: RawMutex> {
    inner: Mutex<M, RefCell<Stopwatch>>,
}

impl<M: RawMutex> StopwatchContext<M> {
    /// Idle, zeroed stopwatch guarded by `raw`.
    pub const fn new(raw: M) -> Self {
        Self {
            inner: Mutex::const_new(raw, RefCell::new(Stopwatch::new())),
        }
    }

    /// One 10 ms tick. Returns whether the time advanced.
    pub fn tick(&self) -> bool {
        self.inner.lock(|sw| sw.borrow_mut().tick())
    }

    pub fn apply(&self, command: Command) -> Transition {
        self.inner.lock(|sw| sw.borrow_mut().apply(command))
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock(|sw| sw.borrow().snapshot())
    }

    /// Sink that feeds debounced commands into this context and hands
    /// each resulting transition to `on_transition`.
    pub fn sink<F>(&self, on_transition: F) -> ContextSink<'_, M, F>
    where
        F: FnMut(Command, Transition),
    {
        ContextSink {
            context: self,
            on_transition,
        }
    }
}

pub struct ContextSink<'a, M: RawMutex, F> {
    context: &'a StopwatchContext<M>,
    on_transition: F,
}

impl<M, F> CommandSink for ContextSink<'_, M, F>
where
    M: RawMutex,
    F: FnMut(Command, Transition),
{
    fn dispatch(&mut self, command: Command) {
        let transition = self.context.apply(command);
        (self.on_transition)(command, transition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeValue;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn ticks_and_commands_share_one_state() {
        let ctx = StopwatchContext::new(NoopRawMutex::new());
        assert!(!ctx.tick());
        assert_eq!(ctx.apply(Command::Start), Transition::Started);
        for _ in 0..250 {
            ctx.tick();
        }
        let snap = ctx.snapshot();
        assert!(snap.running);
        assert_eq!(snap.elapsed, TimeValue::new(0, 2, 50));
    }

    #[test]
    fn sink_reports_each_transition() {
        let ctx = StopwatchContext::new(NoopRawMutex::new());
        let mut seen: heapless::Vec<(Command, Transition), 4> = heapless::Vec::new();
        {
            let mut sink = ctx.sink(|cmd, t| {
                let _ = seen.push((cmd, t));
            });
            sink.dispatch(Command::Lap);
            sink.dispatch(Command::Start);
        }
        assert_eq!(
            seen.as_slice(),
            &[
                (Command::Lap, Transition::Ignored),
                (Command::Start, Transition::Started)
            ]
        );
        assert!(ctx.snapshot().running);
    }
}
