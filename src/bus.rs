//! Parallel register bus driver
//!
//! The YMF262 is written one byte at a time over an 8-bit parallel bus with
//! four control lines: A0 selects between address and data mode, A1 selects
//! the register bank, /CS gates the chip and /WR latches the byte on the bus.
//! A single register write is therefore two strobed byte transfers (address,
//! then data) wrapped in the timing constraints of [`BusTimings`].
//!
//! The driver never touches hardware directly; every pin change and delay is
//! routed through the [`BusIo`] capability so the protocol can be exercised
//! against a recording fake.

use crate::timing::BusTimings;

/// Control lines of the chip interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// A0 - low selects address mode, high selects data mode
    RegisterSelect,
    /// A1 - register bank select (address bit 8)
    BankSelect,
    /// /CS - chip select, active low
    ChipSelect,
    /// /WR - write strobe, latches the data bus on its rising edge
    WriteStrobe,
    /// /IC - chip reset, active low; only wired on some boards
    Reset,
}

/// Logic level of a control line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Driven low
    Low,
    /// Driven high
    High,
}

/// Hardware capability injected into the driver
///
/// Implementations bind the abstract lines to concrete GPIO pins and supply
/// a busy-wait delay. All methods are infallible: the chip offers no
/// read-back, so a mis-toggled pin is not observable in software.
pub trait BusIo {
    /// Drive one control line to a level
    fn set_line(&mut self, line: Line, level: Level);

    /// Present a byte on the data lines D0-D7
    fn set_data(&mut self, value: u8);

    /// Busy-wait for at least `ns` nanoseconds
    fn delay_ns(&mut self, ns: u32);
}

/// Timed register-write transactions over a [`BusIo`]
///
/// `write` is blocking: it runs its fixed step sequence to completion and no
/// partial-write state is observable. There are no retries; a malformed
/// pulse silently corrupts chip state, which is a hardware-level risk this
/// layer cannot detect.
#[derive(Debug)]
pub struct RegisterBus<IO: BusIo> {
    io: IO,
    timings: BusTimings,
}

impl<IO: BusIo> RegisterBus<IO> {
    /// Create a bus driver over the given hardware binding
    pub fn new(io: IO, timings: BusTimings) -> Self {
        Self { io, timings }
    }

    /// Park every control line in its inactive state
    ///
    /// Called once before the first transaction; the chip ignores the bus
    /// while /CS and /WR are high.
    pub fn init_lines(&mut self) {
        self.io.set_line(Line::WriteStrobe, Level::High);
        self.io.set_line(Line::ChipSelect, Level::High);
        self.io.set_line(Line::RegisterSelect, Level::Low);
        self.io.set_line(Line::BankSelect, Level::Low);
        self.io.set_line(Line::Reset, Level::High);
    }

    /// Write one byte to a 9-bit register address
    ///
    /// Bit 8 of `address` selects the bank, the low 8 bits address within
    /// the bank. Returns only after both strobe pulses have completed.
    pub fn write(&mut self, address: u16, data: u8) {
        debug_assert!(address < 0x200, "register address out of range: {address:#x}");

        // Address mode, bank from address bit 8.
        self.io.set_line(Line::RegisterSelect, Level::Low);
        let bank = if address & 0x100 != 0 {
            Level::High
        } else {
            Level::Low
        };
        self.io.set_line(Line::BankSelect, bank);
        self.io.delay_ns(self.timings.address_setup());

        // Latch the in-bank address.
        self.io.set_line(Line::ChipSelect, Level::Low);
        self.io.set_data(address as u8);
        self.strobe();

        // Mode switch counts as an address change.
        self.io.set_data(data);
        self.io.set_line(Line::RegisterSelect, Level::High);
        self.io.delay_ns(self.timings.address_setup());

        // Latch the data byte.
        self.strobe();
        self.io.set_line(Line::ChipSelect, Level::High);
    }

    /// Hold the reset line active for `hold_ns`, then release it
    pub fn pulse_reset(&mut self, hold_ns: u32) {
        self.io.set_line(Line::Reset, Level::Low);
        self.io.delay_ns(hold_ns);
        self.io.set_line(Line::Reset, Level::High);
    }

    /// The timing contract in effect
    pub fn timings(&self) -> BusTimings {
        self.timings
    }

    /// Replace the timing contract
    pub fn set_timings(&mut self, timings: BusTimings) {
        self.timings = timings;
    }

    /// Access the underlying hardware binding
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Consume the bus and return the hardware binding
    pub fn into_io(self) -> IO {
        self.io
    }

    /// One low pulse on /WR with data setup before and hold after
    fn strobe(&mut self) {
        self.io.delay_ns(self.timings.data_setup());
        self.io.set_line(Line::WriteStrobe, Level::Low);
        self.io.delay_ns(self.timings.write_pulse());
        self.io.set_line(Line::WriteStrobe, Level::High);
        self.io.delay_ns(self.timings.data_hold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Everything a transaction does to the hardware, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum IoEvent {
        Line(Line, Level),
        Data(u8),
        Delay(u32),
    }

    #[derive(Default)]
    struct RecordingIo {
        events: Vec<IoEvent>,
    }

    impl BusIo for RecordingIo {
        fn set_line(&mut self, line: Line, level: Level) {
            self.events.push(IoEvent::Line(line, level));
        }
        fn set_data(&mut self, value: u8) {
            self.events.push(IoEvent::Data(value));
        }
        fn delay_ns(&mut self, ns: u32) {
            self.events.push(IoEvent::Delay(ns));
        }
    }

    fn timings() -> BusTimings {
        BusTimings::new().with_multiplier(1).unwrap()
    }

    #[test]
    fn test_write_follows_protocol_order() {
        let mut bus = RegisterBus::new(RecordingIo::default(), timings());
        bus.write(0xA0, 0x55);
        let t = bus.timings();

        let expected = vec![
            IoEvent::Line(Line::RegisterSelect, Level::Low),
            IoEvent::Line(Line::BankSelect, Level::Low),
            IoEvent::Delay(t.address_setup()),
            IoEvent::Line(Line::ChipSelect, Level::Low),
            IoEvent::Data(0xA0),
            IoEvent::Delay(t.data_setup()),
            IoEvent::Line(Line::WriteStrobe, Level::Low),
            IoEvent::Delay(t.write_pulse()),
            IoEvent::Line(Line::WriteStrobe, Level::High),
            IoEvent::Delay(t.data_hold()),
            IoEvent::Data(0x55),
            IoEvent::Line(Line::RegisterSelect, Level::High),
            IoEvent::Delay(t.address_setup()),
            IoEvent::Delay(t.data_setup()),
            IoEvent::Line(Line::WriteStrobe, Level::Low),
            IoEvent::Delay(t.write_pulse()),
            IoEvent::Line(Line::WriteStrobe, Level::High),
            IoEvent::Delay(t.data_hold()),
            IoEvent::Line(Line::ChipSelect, Level::High),
        ];
        assert_eq!(bus.into_io().events, expected);
    }

    #[test]
    fn test_bank_select_follows_address_bit_8() {
        let mut bus = RegisterBus::new(RecordingIo::default(), timings());
        bus.write(0x1A0, 0x00);
        let events = bus.into_io().events;
        assert_eq!(events[1], IoEvent::Line(Line::BankSelect, Level::High));
        // Only the low 8 bits reach the data lines.
        assert_eq!(events[4], IoEvent::Data(0xA0));
    }

    #[test]
    fn test_two_strobe_pulses_per_write() {
        let mut bus = RegisterBus::new(RecordingIo::default(), timings());
        bus.write(0x20, 0x01);
        let pulses = bus
            .into_io()
            .events
            .iter()
            .filter(|e| matches!(e, IoEvent::Line(Line::WriteStrobe, Level::Low)))
            .count();
        assert_eq!(pulses, 2);
    }

    #[test]
    fn test_delays_scale_with_multiplier() {
        let timings = BusTimings::new().with_multiplier(3).unwrap();
        let mut bus = RegisterBus::new(RecordingIo::default(), timings);
        bus.write(0x40, 0x3F);
        let events = bus.into_io().events;
        assert!(events.contains(&IoEvent::Delay(timings.write_pulse())));
        assert_eq!(timings.write_pulse(), crate::timing::WRITE_PULSE_NS * 3);
    }

    #[test]
    fn test_pulse_reset_holds_then_releases() {
        let mut bus = RegisterBus::new(RecordingIo::default(), timings());
        bus.pulse_reset(1_000);
        let events = bus.into_io().events;
        assert_eq!(
            events,
            vec![
                IoEvent::Line(Line::Reset, Level::Low),
                IoEvent::Delay(1_000),
                IoEvent::Line(Line::Reset, Level::High),
            ]
        );
    }
}
