//! Edge-interrupt button debouncing.
//!
//! Four buttons (one interrupt line each):
//!   - START - begin counting
//!   - STOP  - pause counting
//!   - LAP   - mark a lap while counting
//!   - RESET - zero and restart while paused
//!
//! The first edge on a line masks that line's interrupt and arms a
//! one-shot quiet timer. When it expires the pin is sampled once: still
//! pressed means one command is dispatched. The interrupt is re-enabled
//! either way, so every physical press yields at most one command and the
//! line always ends up listening again.

use crate::error::Error;
use crate::stopwatch::Command;

/// Button identity, indexed by interrupt line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonChannel {
    Start,
    Stop,
    Lap,
    Reset,
}

impl ButtonChannel {
    pub const ALL: [ButtonChannel; 4] = [
        ButtonChannel::Start,
        ButtonChannel::Stop,
        ButtonChannel::Lap,
        ButtonChannel::Reset,
    ];

    /// Interrupt line index.
    pub fn line(self) -> u8 {
        match self {
            ButtonChannel::Start => 0,
            ButtonChannel::Stop => 1,
            ButtonChannel::Lap => 2,
            ButtonChannel::Reset => 3,
        }
    }

    pub fn command(self) -> Command {
        match self {
            ButtonChannel::Start => Command::Start,
            ButtonChannel::Stop => Command::Stop,
            ButtonChannel::Lap => Command::Lap,
            ButtonChannel::Reset => Command::Reset,
        }
    }
}

impl TryFrom<u8> for ButtonChannel {
    type Error = Error;

    fn try_from(line: u8) -> Result<Self, Self::Error> {
        ButtonChannel::ALL
            .into_iter()
            .find(|channel| channel.line() == line)
            .ok_or(Error::UnknownChannel(line))
    }
}

/// Electrical level that means "pressed".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pull-up wiring, switch to ground, falling edge on press.
    #[default]
    ActiveLow,
    /// Pull-down wiring, switch to supply, rising edge on press.
    ActiveHigh,
}

impl Polarity {
    pub fn is_pressed(self, level_high: bool) -> bool {
        match self {
            Polarity::ActiveLow => !level_high,
            Polarity::ActiveHigh => level_high,
        }
    }
}

/// Edge-interrupt capable input line.
pub trait InterruptLine {
    /// Mask or unmask edge interrupt delivery for this line.
    fn set_interrupt_enabled(&mut self, enabled: bool);

    /// Current logic level.
    fn is_high(&self) -> bool;
}

/// One-shot timer that calls back into [`Debouncer::on_quiet_elapsed`].
pub trait OneShotTimer {
    /// (Re)arm to fire once after `ms` milliseconds.
    fn arm_ms(&mut self, ms: u32);
}

/// Receiver of debounced commands.
pub trait CommandSink {
    fn dispatch(&mut self, command: Command);
}

impl<T: CommandSink + ?Sized> CommandSink for &mut T {
    fn dispatch(&mut self, command: Command) {
        (**self).dispatch(command)
    }
}

/// Debounce state for one button channel.
pub struct Debouncer<L, T> {
    channel: ButtonChannel,
    polarity: Polarity,
    quiet_ms: u32,
    line: L,
    timer: T,
    suppressed: bool,
}

impl<L, T> Debouncer<L, T>
where
    L: InterruptLine,
    T: OneShotTimer,
{
    /// Takes the line and leaves its interrupt enabled.
    pub fn new(
        channel: ButtonChannel,
        polarity: Polarity,
        quiet_ms: u32,
        line: L,
        timer: T,
    ) -> Self {
        let mut debouncer = Self {
            channel,
            polarity,
            quiet_ms,
            line,
            timer,
            suppressed: false,
        };
        debouncer.line.set_interrupt_enabled(true);
        debouncer
    }

    pub fn channel(&self) -> ButtonChannel {
        self.channel
    }

    /// True between an accepted edge and the end of its quiet period.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn line(&self) -> &L {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Raw edge interrupt on this line.
    ///
    /// Returns `false` if the edge fell inside an active quiet period.
    pub fn on_edge(&mut self) -> bool {
        if self.suppressed {
            return false;
        }
        self.suppressed = true;
        self.line.set_interrupt_enabled(false);
        self.timer.arm_ms(self.quiet_ms);
        true
    }

    /// Quiet timer expired: confirm the press and re-arm the line.
    pub fn on_quiet_elapsed<S: CommandSink>(&mut self, sink: &mut S) -> Option<Command> {
        if !self.suppressed {
            return None;
        }

        let confirmed = self.polarity.is_pressed(self.line.is_high());
        let command = if confirmed {
            let command = self.channel.command();
            sink.dispatch(command);
            Some(command)
        } else {
            None
        };

        self.suppressed = false;
        self.line.set_interrupt_enabled(true);
        command
    }
}
