//! HD44780 16x2 character LCD over bit-banged GPIO.
//!
//! The bus width is decided once in [`Lcd::configure`] from the pin
//! assignment and never re-evaluated. Transfers are write-only (RW tied
//! low), so every instruction is followed by a fixed delay instead of a
//! busy-flag poll.

use embedded_hal::delay::DelayNs;

use crate::bus::{self, BusWidth, GpioPort, PinAssignment};
use crate::config::{ENABLE_PULSE_US, LCD_COLUMNS, POWER_ON_DELAY_MS, SETTLE_DELAY_US};
use crate::error::Error;

/// Controller instructions used by the driver.
pub mod command {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    /// Display on, cursor off, blink off.
    pub const DISPLAY_ON_CURSOR_OFF: u8 = 0x0C;
    /// Function set leading nibble: switches an 8-bit-mode controller to 4 bits.
    pub const NIBBLE_MODE_SELECT: u8 = 0x20;
    /// 4-bit bus, 2 lines, 5x8 font.
    pub const FUNCTION_SET_4BIT: u8 = 0x28;
    /// 8-bit bus, 2 lines, 5x10 font bit set.
    pub const FUNCTION_SET_8BIT: u8 = 0x3C;
    /// Set DDRAM address to the start of row 1.
    pub const ROW_1: u8 = 0x80;
    /// Set DDRAM address to the start of row 2.
    pub const ROW_2: u8 = 0xC0;
}

/// Display row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    First,
    Second,
}

impl Row {
    /// Set-DDRAM-address instruction for the start of this row.
    pub fn select_command(self) -> u8 {
        match self {
            Row::First => command::ROW_1,
            Row::Second => command::ROW_2,
        }
    }
}

impl TryFrom<u8> for Row {
    type Error = Error;

    /// Rows are numbered from 1, as printed on the module.
    fn try_from(line: u8) -> Result<Self, Self::Error> {
        match line {
            1 => Ok(Row::First),
            2 => Ok(Row::Second),
            other => Err(Error::InvalidRow(other)),
        }
    }
}

/// Configured LCD driver.
///
/// Owns the port and delay for its lifetime; use [`Lcd::release`] to get
/// them back.
pub struct Lcd<P, D> {
    port: P,
    delay: D,
    pins: PinAssignment,
    width: BusWidth,
}

impl<P, D> Lcd<P, D>
where
    P: GpioPort,
    D: DelayNs,
{
    /// Program the LCD lines as outputs and run the power-on sequence.
    pub fn configure(port: P, delay: D, pins: PinAssignment) -> Self {
        let width = BusWidth::of(&pins);
        let mut lcd = Self {
            port,
            delay,
            pins,
            width,
        };

        let used = bus::data_lines(width, &pins) | bus::control_lines(&pins);
        lcd.port.configure_outputs(used);
        lcd.port.clear_bits(used);
        lcd.delay.delay_ms(POWER_ON_DELAY_MS);

        // The controller boots in 8-bit mode. With only D4..D7 wired, one
        // pulse carrying the leading nibble of the function set flips it
        // to 4-bit mode; the full function set can then follow as a pair.
        if width == BusWidth::FourBit {
            lcd.port.clear_bits(bus::pin_bit(pins.register_select));
            lcd.latch(command::NIBBLE_MODE_SELECT >> 4);
            lcd.delay.delay_us(SETTLE_DELAY_US);
        }

        let function_set = match width {
            BusWidth::FourBit => command::FUNCTION_SET_4BIT,
            BusWidth::EightBit => command::FUNCTION_SET_8BIT,
        };
        for instruction in [
            function_set,
            command::DISPLAY_ON_CURSOR_OFF,
            command::CLEAR_DISPLAY,
            command::RETURN_HOME,
        ] {
            lcd.write_command(instruction);
            lcd.delay.delay_us(SETTLE_DELAY_US);
        }

        lcd
    }

    pub fn width(&self) -> BusWidth {
        self.width
    }

    /// Send an instruction (RS low).
    pub fn write_command(&mut self, byte: u8) {
        self.port.clear_bits(bus::pin_bit(self.pins.register_select));
        self.write_byte(byte);
    }

    /// Send a character code (RS high).
    pub fn write_char(&mut self, byte: u8) {
        self.port.set_bits(bus::pin_bit(self.pins.register_select));
        self.write_byte(byte);
    }

    /// Overwrite one row with `text`.
    ///
    /// Exactly [`LCD_COLUMNS`] characters are always written: longer text is
    /// cut, shorter text is padded with spaces so nothing from a previous,
    /// longer string survives.
    pub fn write_line(&mut self, text: &str, row: Row) {
        self.write_command(row.select_command());

        let mut written = 0;
        for byte in text.bytes().take(LCD_COLUMNS) {
            self.write_char(byte);
            written += 1;
        }
        for _ in written..LCD_COLUMNS {
            self.write_char(b' ');
        }
    }

    pub fn write_two_lines(&mut self, first: &str, second: &str) {
        self.write_line(first, Row::First);
        self.write_line(second, Row::Second);
    }

    /// Blank both rows and home the cursor.
    pub fn clear(&mut self) {
        self.write_command(command::CLEAR_DISPLAY);
        self.delay.delay_us(SETTLE_DELAY_US);
    }

    pub fn release(self) -> (P, D) {
        (self.port, self.delay)
    }

    fn write_byte(&mut self, byte: u8) {
        match self.width {
            BusWidth::EightBit => self.latch(byte),
            BusWidth::FourBit => {
                self.latch(byte >> 4);
                self.latch(byte & 0x0F);
            }
        }
    }

    /// Put one transfer on the data lines and pulse Enable.
    fn latch(&mut self, value: u8) {
        self.port.clear_bits(bus::data_lines(self.width, &self.pins));
        self.port.set_bits(bus::mask(value, self.width, &self.pins));
        self.pulse_enable();
    }

    fn pulse_enable(&mut self) {
        let enable = bus::pin_bit(self.pins.enable);
        self.port.set_bits(enable);
        self.delay.delay_us(ENABLE_PULSE_US);
        self.port.clear_bits(enable);
    }
}
