//! Integration tests for lapwatch host-testable logic.
//!
//! Each test wires the public pieces together the way the firmware does:
//! debouncers feed the shared context, the context is rendered onto the
//! modelled display.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use lapwatch::bus::{self, BusWidth, GpioPort, PinAssignment};
use lapwatch::config::DEBOUNCE_QUIET_MS;
use lapwatch::context::StopwatchContext;
use lapwatch::debounce::{ButtonChannel, Debouncer, Polarity};
use lapwatch::lcd::{Lcd, Row};
use lapwatch::mock::{Hd44780Model, MockDelay, MockLine, MockPort, MockTimer, RecordingSink};
use lapwatch::render;
use lapwatch::stopwatch::{Command, Transition};
use lapwatch::time::TimeValue;

const PINS_4: PinAssignment = PinAssignment::four_bit([3, 4, 28, 29], 31, 30);

type TestDebouncer = Debouncer<MockLine, MockTimer>;

fn button(channel: ButtonChannel) -> TestDebouncer {
    Debouncer::new(
        channel,
        Polarity::ActiveLow,
        DEBOUNCE_QUIET_MS,
        MockLine::new(true),
        MockTimer::new(),
    )
}

/// Press and hold `button` long enough to pass the quiet period, then
/// release it.
fn press(button: &mut TestDebouncer, sink: &mut RecordingSink) {
    button.line_mut().set_level(false);
    button.on_edge();
    if button.timer_mut().advance_ms(DEBOUNCE_QUIET_MS) {
        button.on_quiet_elapsed(sink);
    }
    button.line_mut().set_level(true);
}

#[test]
fn mask_reads_back_through_a_port() {
    let pins = PinAssignment::eight_bit([20, 1, 19, 2, 18, 3, 17, 4], 10, 11);
    for value in [0x00u8, 0x5A, 0xA5, 0xFF, 0x81] {
        let mut port = MockPort::new();
        port.set_bits(bus::mask(value, BusWidth::EightBit, &pins));
        let read: u8 = pins
            .data_pins()
            .iter()
            .enumerate()
            .map(|(bit, pin)| (port.is_high(pin.unwrap()) as u8) << bit)
            .sum();
        assert_eq!(read, value);
        assert_eq!(port.level() & !bus::data_lines(BusWidth::EightBit, &pins), 0);
    }
}

#[test]
fn two_edges_within_quiet_period_dispatch_one_command() {
    let mut sink = RecordingSink::new();
    let mut lap = button(ButtonChannel::Lap);

    lap.line_mut().set_level(false);
    assert!(lap.on_edge());
    assert!(!lap.timer_mut().advance_ms(12));

    // Contact bounce: high then low again, 12 ms after the first edge.
    lap.line_mut().set_level(true);
    lap.line_mut().set_level(false);
    assert!(!lap.on_edge());

    assert!(lap.timer_mut().advance_ms(DEBOUNCE_QUIET_MS - 12));
    assert_eq!(lap.timer().now_ms(), DEBOUNCE_QUIET_MS);
    lap.on_quiet_elapsed(&mut sink);

    assert_eq!(sink.commands(), &[Command::Lap]);
    assert!(lap.line().interrupt_enabled());
}

#[test]
fn separate_presses_each_dispatch() {
    let mut sink = RecordingSink::new();
    let mut start = button(ButtonChannel::Start);
    let mut stop = button(ButtonChannel::Stop);

    press(&mut start, &mut sink);
    press(&mut stop, &mut sink);
    press(&mut start, &mut sink);

    assert_eq!(
        sink.commands(),
        &[Command::Start, Command::Stop, Command::Start]
    );
}

#[test]
fn run_lap_stop_reset_session() {
    let ctx = StopwatchContext::new(NoopRawMutex::new());
    let mut sink = RecordingSink::new();
    let mut buttons = ButtonChannel::ALL.map(button);

    press(&mut buttons[ButtonChannel::Start.line() as usize], &mut sink);
    for cmd in sink.commands() {
        ctx.apply(*cmd);
    }
    for _ in 0..350 {
        ctx.tick();
    }
    assert_eq!(ctx.snapshot().elapsed, TimeValue::new(0, 3, 50));

    assert_eq!(
        ctx.apply(Command::Lap),
        Transition::LapMarked(TimeValue::new(0, 3, 50))
    );
    assert_eq!(ctx.apply(Command::Reset), Transition::Ignored);
    assert_eq!(ctx.apply(Command::Stop), Transition::Stopped);
    assert_eq!(ctx.apply(Command::Lap), Transition::Ignored);
    assert_eq!(ctx.snapshot().lap_delta, TimeValue::new(0, 3, 50));

    assert_eq!(ctx.apply(Command::Reset), Transition::Restarted);
    let snap = ctx.snapshot();
    assert!(snap.running);
    assert_eq!(snap.elapsed, TimeValue::ZERO);
    assert_eq!(snap.lap_delta, TimeValue::ZERO);
}

#[test]
fn reset_from_two_fifteen_thirty() {
    let ctx = StopwatchContext::new(NoopRawMutex::new());
    ctx.apply(Command::Start);
    for _ in 0..13_530 {
        ctx.tick();
    }
    ctx.apply(Command::Stop);
    assert_eq!(ctx.snapshot().elapsed, TimeValue::new(2, 15, 30));

    ctx.apply(Command::Reset);
    let snap = ctx.snapshot();
    assert_eq!(snap.elapsed, TimeValue::ZERO);
    assert!(snap.running);
}

#[test]
fn one_minute_of_ticks() {
    let ctx = StopwatchContext::new(NoopRawMutex::new());
    ctx.apply(Command::Start);
    for _ in 0..6_000 {
        ctx.tick();
    }
    assert_eq!(ctx.snapshot().elapsed, TimeValue::new(1, 0, 0));
}

#[test]
fn display_follows_the_session() {
    let ctx = StopwatchContext::new(NoopRawMutex::new());
    let mut lcd = Lcd::configure(Hd44780Model::new(PINS_4), MockDelay::new(), PINS_4);

    let (top, bottom) = render::rows(&ctx.snapshot());
    lcd.write_two_lines(&top, &bottom);

    ctx.apply(Command::Start);
    for _ in 0..4_321 {
        ctx.tick();
    }
    ctx.apply(Command::Lap);
    for _ in 0..100 {
        ctx.tick();
    }

    let (top, bottom) = render::rows(&ctx.snapshot());
    lcd.write_two_lines(&top, &bottom);

    let (model, _) = lcd.release();
    assert_eq!(&model.row(Row::First), b"Time  00:44:21  ");
    assert_eq!(&model.row(Row::Second), b"Lap   00:43:21  ");
}

#[test]
fn two_lines_replace_previous_contents() {
    let mut lcd = Lcd::configure(Hd44780Model::new(PINS_4), MockDelay::new(), PINS_4);
    lcd.write_two_lines("0123456789abcdef", "fedcba9876543210");
    lcd.write_two_lines("A", "B");
    let (model, _) = lcd.release();
    assert_eq!(&model.row(Row::First), b"A               ");
    assert_eq!(&model.row(Row::Second), b"B               ");
}
