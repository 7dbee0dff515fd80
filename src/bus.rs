//! Parallel bus masking for the HD44780 data lines.
//!
//! The LCD lines can sit on any pins of one 32-bit GPIO port, in any
//! order. Everything here translates logical data bits into the physical
//! bit pattern for that port; nothing touches hardware.

/// Pin assignment of the LCD bus (P0 pin numbers, 0..=31).
///
/// Leave all of D0..D3 unset to run the bus 4 bits wide. The pins must
/// not overlap; overlapping assignments produce undefined display output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    pub d0: Option<u8>,
    pub d1: Option<u8>,
    pub d2: Option<u8>,
    pub d3: Option<u8>,
    pub d4: u8,
    pub d5: u8,
    pub d6: u8,
    pub d7: u8,
    /// Enable (latch) line.
    pub enable: u8,
    /// Register Select: low = command, high = character data.
    pub register_select: u8,
}

impl PinAssignment {
    /// 4-bit wiring: only D4..D7 are connected.
    pub const fn four_bit(data: [u8; 4], enable: u8, register_select: u8) -> Self {
        Self {
            d0: None,
            d1: None,
            d2: None,
            d3: None,
            d4: data[0],
            d5: data[1],
            d6: data[2],
            d7: data[3],
            enable,
            register_select,
        }
    }

    /// 8-bit wiring: `data[i]` is the pin of D*i*.
    pub const fn eight_bit(data: [u8; 8], enable: u8, register_select: u8) -> Self {
        Self {
            d0: Some(data[0]),
            d1: Some(data[1]),
            d2: Some(data[2]),
            d3: Some(data[3]),
            d4: data[4],
            d5: data[5],
            d6: data[6],
            d7: data[7],
            enable,
            register_select,
        }
    }

    /// D0..D7 in bit order.
    pub fn data_pins(&self) -> [Option<u8>; 8] {
        [
            self.d0,
            self.d1,
            self.d2,
            self.d3,
            Some(self.d4),
            Some(self.d5),
            Some(self.d6),
            Some(self.d7),
        ]
    }
}

/// Number of data lines used per transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusWidth {
    FourBit,
    EightBit,
}

impl BusWidth {
    /// 4-bit iff none of D0..D3 is assigned.
    pub fn of(pins: &PinAssignment) -> Self {
        if pins.d0.is_none() && pins.d1.is_none() && pins.d2.is_none() && pins.d3.is_none() {
            BusWidth::FourBit
        } else {
            BusWidth::EightBit
        }
    }
}

/// Single-pin port bit. Pins beyond the port width contribute nothing.
pub fn pin_bit(pin: u8) -> u32 {
    1u32.checked_shl(pin as u32).unwrap_or(0)
}

/// Place the bits of `value` on the assigned data pins.
///
/// - `EightBit`: bit *i* goes to D*i*.
/// - `FourBit`: bits 0..3 go to D4..D7; the upper bits of `value` are
///   ignored. Send a byte as two calls, high nibble first.
pub fn mask(value: u8, width: BusWidth, pins: &PinAssignment) -> u32 {
    let data = pins.data_pins();
    let lines: &[Option<u8>] = match width {
        BusWidth::EightBit => &data,
        BusWidth::FourBit => &data[4..],
    };

    lines
        .iter()
        .enumerate()
        .filter(|(bit, _)| (value >> bit) & 1 == 1)
        .filter_map(|(_, pin)| *pin)
        .fold(0, |acc, pin| acc | pin_bit(pin))
}

/// Every data line in use for `width`.
pub fn data_lines(width: BusWidth, pins: &PinAssignment) -> u32 {
    match width {
        BusWidth::EightBit => mask(0xFF, width, pins),
        BusWidth::FourBit => mask(0x0F, width, pins),
    }
}

/// Enable and Register Select lines.
pub fn control_lines(pins: &PinAssignment) -> u32 {
    pin_bit(pins.enable) | pin_bit(pins.register_select)
}

/// Write-1-to-set / write-1-to-clear access to one 32-bit GPIO port.
///
/// Bits not named in a mask are left untouched, so several owners can
/// share the port as long as their pins are disjoint.
pub trait GpioPort {
    /// Make every pin in `mask` a push-pull output with the pull-up enabled.
    fn configure_outputs(&mut self, mask: u32);

    /// Drive every pin in `mask` high.
    fn set_bits(&mut self, mask: u32);

    /// Drive every pin in `mask` low.
    fn clear_bits(&mut self, mask: u32);
}

impl<T: GpioPort + ?Sized> GpioPort for &mut T {
    fn configure_outputs(&mut self, mask: u32) {
        (**self).configure_outputs(mask)
    }

    fn set_bits(&mut self, mask: u32) {
        (**self).set_bits(mask)
    }

    fn clear_bits(&mut self, mask: u32) {
        (**self).clear_bits(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deliberately scattered and out of order.
    const SCATTERED_8: PinAssignment =
        PinAssignment::eight_bit([17, 2, 30, 9, 0, 22, 5, 13], 7, 8);
    const SCATTERED_4: PinAssignment = PinAssignment::four_bit([29, 3, 28, 4], 31, 30);

    /// Read the logical value back out of a port pattern.
    fn unmask(pattern: u32, width: BusWidth, pins: &PinAssignment) -> u8 {
        let data = pins.data_pins();
        let lines: &[Option<u8>] = match width {
            BusWidth::EightBit => &data,
            BusWidth::FourBit => &data[4..],
        };
        lines.iter().enumerate().fold(0u8, |acc, (bit, pin)| match pin {
            Some(p) if pattern & pin_bit(*p) != 0 => acc | (1 << bit),
            _ => acc,
        })
    }

    #[test]
    fn width_follows_low_data_lines() {
        assert_eq!(BusWidth::of(&SCATTERED_4), BusWidth::FourBit);
        assert_eq!(BusWidth::of(&SCATTERED_8), BusWidth::EightBit);

        let mut partial = SCATTERED_4;
        partial.d2 = Some(12);
        assert_eq!(BusWidth::of(&partial), BusWidth::EightBit);
    }

    #[test]
    fn eight_bit_mask_places_every_value_exactly() {
        let used = data_lines(BusWidth::EightBit, &SCATTERED_8);
        for value in 0..=255u8 {
            let pattern = mask(value, BusWidth::EightBit, &SCATTERED_8);
            assert_eq!(pattern & !used, 0, "stray bits for {:#04x}", value);
            assert_eq!(unmask(pattern, BusWidth::EightBit, &SCATTERED_8), value);
        }
    }

    #[test]
    fn four_bit_mask_uses_only_high_data_lines() {
        let used = data_lines(BusWidth::FourBit, &SCATTERED_4);
        assert_eq!(used, pin_bit(29) | pin_bit(3) | pin_bit(28) | pin_bit(4));

        for nibble in 0..=0x0Fu8 {
            let pattern = mask(nibble, BusWidth::FourBit, &SCATTERED_4);
            assert_eq!(pattern & !used, 0);
            assert_eq!(unmask(pattern, BusWidth::FourBit, &SCATTERED_4), nibble);
        }
    }

    #[test]
    fn four_bit_mask_ignores_high_nibble_of_value() {
        assert_eq!(
            mask(0xA5, BusWidth::FourBit, &SCATTERED_4),
            mask(0x05, BusWidth::FourBit, &SCATTERED_4)
        );
    }

    #[test]
    fn single_bits_land_on_their_pins() {
        assert_eq!(mask(0x01, BusWidth::EightBit, &SCATTERED_8), pin_bit(17));
        assert_eq!(mask(0x80, BusWidth::EightBit, &SCATTERED_8), pin_bit(13));
        assert_eq!(mask(0x01, BusWidth::FourBit, &SCATTERED_4), pin_bit(29));
        assert_eq!(mask(0x08, BusWidth::FourBit, &SCATTERED_4), pin_bit(4));
    }

    #[test]
    fn out_of_range_pin_contributes_nothing() {
        assert_eq!(pin_bit(32), 0);
        let pins = PinAssignment::four_bit([1, 2, 3, 40], 5, 6);
        assert_eq!(mask(0x0F, BusWidth::FourBit, &pins), 0b1110);
    }

    #[test]
    fn control_lines_cover_enable_and_rs() {
        assert_eq!(control_lines(&SCATTERED_4), pin_bit(31) | pin_bit(30));
    }
}
