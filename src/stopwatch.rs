//! Stopwatch state machine: Idle / Running with lap capture.
//!
//! `tick()` is driven by the 10 ms hardware tick, `apply()` by debounced
//! button commands. Commands that make no sense in the current state are
//! ignored rather than reported.

use crate::time::TimeValue;

/// Debounced button commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Start,
    Stop,
    Lap,
    Reset,
}

/// What a command actually did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Idle -> Running, counting resumes from the current value.
    Started,
    /// Running -> Idle.
    Stopped,
    /// Lap marked; carries the new lap time.
    LapMarked(TimeValue),
    /// Zeroed and Idle -> Running. The tick source must restart its period.
    Restarted,
    /// Not valid in the current state.
    Ignored,
}

/// Copy of the stopwatch fields for rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub elapsed: TimeValue,
    pub running: bool,
    pub lap_reference: TimeValue,
    pub lap_delta: TimeValue,
}

#[derive(Debug, Default)]
pub struct Stopwatch {
    elapsed: TimeValue,
    running: bool,
    lap_reference: TimeValue,
    lap_delta: TimeValue,
}

impl Stopwatch {
    /// Idle, all zero.
    pub const fn new() -> Self {
        Self {
            elapsed: TimeValue::ZERO,
            running: false,
            lap_reference: TimeValue::ZERO,
            lap_delta: TimeValue::ZERO,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> TimeValue {
        self.elapsed
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elapsed: self.elapsed,
            running: self.running,
            lap_reference: self.lap_reference,
            lap_delta: self.lap_delta,
        }
    }

    /// One 10 ms period. Returns whether the time advanced.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.elapsed.advance();
        }
        self.running
    }

    pub fn apply(&mut self, command: Command) -> Transition {
        match (command, self.running) {
            (Command::Start, false) => {
                self.running = true;
                Transition::Started
            }
            (Command::Stop, true) => {
                self.running = false;
                Transition::Stopped
            }
            (Command::Lap, true) => {
                self.lap_delta = self.elapsed.since(&self.lap_reference);
                self.lap_reference = self.elapsed;
                Transition::LapMarked(self.lap_delta)
            }
            (Command::Reset, false) => {
                self.elapsed = TimeValue::ZERO;
                self.lap_reference = TimeValue::ZERO;
                self.lap_delta = TimeValue::ZERO;
                self.running = true;
                Transition::Restarted
            }
            _ => Transition::Ignored,
        }
    }
}
