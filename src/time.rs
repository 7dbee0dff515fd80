//! Minutes / seconds / centiseconds time value.
//!
//! The stopwatch covers one hour: advancing past 59:59.99 wraps the whole
//! value back to 00:00.00.

/// Centiseconds in one full period (60 minutes).
pub const PERIOD_CENTIS: u32 = 60 * 60 * 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeValue {
    pub minutes: u8,
    pub seconds: u8,
    pub centis: u8,
}

impl TimeValue {
    pub const ZERO: Self = Self {
        minutes: 0,
        seconds: 0,
        centis: 0,
    };

    pub const fn new(minutes: u8, seconds: u8, centis: u8) -> Self {
        Self {
            minutes,
            seconds,
            centis,
        }
    }

    /// Advance by one centisecond, carrying into seconds and minutes.
    pub fn advance(&mut self) {
        self.centis += 1;
        if self.centis >= 100 {
            self.centis = 0;
            self.seconds += 1;
        }
        if self.seconds >= 60 {
            self.seconds = 0;
            self.minutes += 1;
        }
        if self.minutes >= 60 {
            *self = Self::ZERO;
        }
    }

    /// Flattened value in centiseconds.
    pub fn as_centis(&self) -> u32 {
        (self.minutes as u32 * 60 + self.seconds as u32) * 100 + self.centis as u32
    }

    /// Inverse of [`as_centis`](Self::as_centis), reduced into one period.
    pub fn from_centis(centis: u32) -> Self {
        let centis = centis % PERIOD_CENTIS;
        Self {
            minutes: (centis / 6_000) as u8,
            seconds: (centis / 100 % 60) as u8,
            centis: (centis % 100) as u8,
        }
    }

    /// Duration from `earlier` to `self`, borrowing across fields.
    ///
    /// If the stopwatch wrapped in between, the result is taken modulo one
    /// period, so it is still the forward distance.
    pub fn since(&self, earlier: &TimeValue) -> TimeValue {
        let delta = (self.as_centis() + PERIOD_CENTIS - earlier.as_centis()) % PERIOD_CENTIS;
        Self::from_centis(delta)
    }
}
