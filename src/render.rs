//! Fixed-width text rows for the 16x2 display.
//!
//! Row 1: `Time  MM:SS:CC`, row 2: `Lap   MM:SS:CC`.

use core::fmt::Write;

use heapless::String;

use crate::config::LCD_COLUMNS;
use crate::stopwatch::Snapshot;
use crate::time::TimeValue;

/// One display row of text.
pub type Line = String<LCD_COLUMNS>;

/// `label` followed by `MM:SS:CC`. The label is cut so the time always fits.
pub fn time_line(label: &str, time: TimeValue) -> Line {
    let mut line = Line::new();
    for c in label.chars().take(LCD_COLUMNS - 8) {
        let _ = line.push(c);
    }
    // 8 characters; cannot overflow after the label cut above.
    let _ = write!(
        line,
        "{:02}:{:02}:{:02}",
        time.minutes, time.seconds, time.centis
    );
    line
}

/// Both rows for a stopwatch snapshot.
pub fn rows(snapshot: &Snapshot) -> (Line, Line) {
    (
        time_line("Time  ", snapshot.elapsed),
        time_line("Lap   ", snapshot.lap_delta),
    )
}
