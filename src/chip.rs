//! YMF262 driver: reset sequencing and the synthesis API
//!
//! [`Opl3`] owns the register bus and a shadow copy of every channel's and
//! operator's parameters. The chip offers no read-back, so the shadow state
//! is authoritative: every operation writes the full affected register(s)
//! from it and never merges with unknown chip-side bits.

use log::{debug, trace};

use crate::bus::{BusIo, RegisterBus};
use crate::channel::ChannelSettings;
use crate::operator::OperatorSettings;
use crate::regs::{
    channel_offset, operator_offset, CH_BASE_FEEDBACK, CH_BASE_FNUM_LOW, CH_BASE_KEYON_BLOCK,
    EXTENDED_WIPE_RANGE, NTS_KEYBOARD_SPLIT, NUM_CHANNELS, NUM_OPERATORS, OPL3_MODE_ENABLE,
    OP_BASE_AM_VIB_MULT, OP_BASE_ATTACK_DECAY, OP_BASE_KSL_LEVEL, OP_BASE_SUSTAIN_RELEASE,
    OP_BASE_WAVEFORM, PRIMARY_WIPE_RANGE, REG_CONNECTION_SELECT, REG_NOTE_SELECT, REG_OPL3_MODE,
    REG_TEST, TEST_WAVEFORM_SELECT,
};
use crate::timing::BusTimings;
use crate::{Result, Ymf262Error};

/// Default master clock (14.31818 MHz, the common 4x NTSC crystal)
pub const DEFAULT_CLOCK_HZ: u32 = 14_318_180;

/// Minimum reset pulse in chip clock cycles
const RESET_PULSE_CLOCKS: u64 = 400;

/// Safety margin applied to the computed reset pulse
const RESET_PULSE_MARGIN: u32 = 8;

/// YMF262 (OPL3) driver
///
/// `begin` must run once before any other operation; re-running it re-runs
/// the full reset sequence, which is always safe. All operations block until
/// their register writes complete and reach the chip in exactly the order
/// issued.
#[derive(Debug)]
pub struct Opl3<IO: BusIo> {
    bus: RegisterBus<IO>,
    clock_hz: u32,
    reset_line_wired: bool,
    channels: [ChannelSettings; NUM_CHANNELS],
    operators: [OperatorSettings; NUM_OPERATORS],
}

impl<IO: BusIo> Opl3<IO> {
    /// Create a driver with the default clock, default timings and no
    /// reset line
    pub fn new(io: IO) -> Self {
        Self {
            bus: RegisterBus::new(io, BusTimings::default()),
            clock_hz: DEFAULT_CLOCK_HZ,
            reset_line_wired: false,
            channels: [ChannelSettings::default(); NUM_CHANNELS],
            operators: [OperatorSettings::default(); NUM_OPERATORS],
        }
    }

    /// Create a driver for a board running at a non-standard clock
    pub fn with_clock(io: IO, clock_hz: u32) -> Result<Self> {
        if clock_hz == 0 {
            return Err(Ymf262Error::Config("chip clock must be non-zero".to_string()));
        }
        let mut chip = Self::new(io);
        chip.clock_hz = clock_hz;
        Ok(chip)
    }

    /// Declare whether the /IC reset line is wired
    ///
    /// With a reset line, `reset` pulses it; without one, every register is
    /// explicitly zeroed instead.
    pub fn reset_line_wired(mut self, wired: bool) -> Self {
        self.reset_line_wired = wired;
        self
    }

    /// Replace the bus timing contract
    pub fn set_timings(&mut self, timings: BusTimings) {
        self.bus.set_timings(timings);
    }

    /// The chip clock in Hz
    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    /// Initialize the bus lines and bring the chip to its baseline state
    ///
    /// Must be called once before any other operation and is not safe to
    /// call concurrently with one (the driver is single-threaded by
    /// design). Calling it again re-runs the full sequence.
    pub fn begin(&mut self) {
        debug!("begin: clock={}Hz reset_line={}", self.clock_hz, self.reset_line_wired);
        self.bus.init_lines();
        self.reset();
    }

    /// Reset the chip and re-establish the baseline mode bits
    ///
    /// Hardware path: hold /IC active for the chip's minimum reset pulse
    /// (400 clock cycles) with a generous margin. Software path: zero every
    /// register in both banks. Both paths end with waveform-select enable,
    /// keyboard split and OPL3 mode enable, and reset the shadow parameter
    /// state to defaults.
    pub fn reset(&mut self) {
        if self.reset_line_wired {
            self.hardware_reset();
        } else {
            self.software_wipe();
        }

        self.channels = [ChannelSettings::default(); NUM_CHANNELS];
        self.operators = [OperatorSettings::default(); NUM_OPERATORS];

        // Baseline modes. Without waveform-select only the sine is honored;
        // without OPL3 mode bank 1 ignores writes.
        self.bus.write(REG_TEST, TEST_WAVEFORM_SELECT);
        self.bus.write(REG_NOTE_SELECT, NTS_KEYBOARD_SPLIT);
        self.bus.write(REG_OPL3_MODE, OPL3_MODE_ENABLE);
        debug!("reset complete");
    }

    fn hardware_reset(&mut self) {
        let hold_ns =
            (RESET_PULSE_CLOCKS * 1_000_000_000 / self.clock_hz as u64) as u32 * RESET_PULSE_MARGIN;
        trace!("hardware reset: holding /IC for {hold_ns}ns");
        self.bus.pulse_reset(hold_ns);
    }

    fn software_wipe(&mut self) {
        trace!("software wipe: zeroing both register banks");
        for address in PRIMARY_WIPE_RANGE {
            self.bus.write(address, 0x00);
        }
        // Bank 1 only accepts writes once OPL3 mode is on.
        self.bus.write(REG_OPL3_MODE, OPL3_MODE_ENABLE);
        self.bus.write(REG_CONNECTION_SELECT, 0x00);
        self.bus.write(crate::regs::BANK1_BASE | REG_TEST, 0x00);
        for address in EXTENDED_WIPE_RANGE {
            self.bus.write(address, 0x00);
        }
    }

    /// Store an operator's parameters and write its five registers
    ///
    /// The five registers live at independent addresses and the chip does
    /// not latch them as a group, so write order is insignificant.
    ///
    /// # Panics
    /// Panics if `op >= 36`.
    pub fn update_operator(&mut self, op: usize, settings: OperatorSettings) {
        let offset = operator_offset(op);
        self.operators[op] = settings;

        let bases = [
            OP_BASE_AM_VIB_MULT,
            OP_BASE_KSL_LEVEL,
            OP_BASE_ATTACK_DECAY,
            OP_BASE_SUSTAIN_RELEASE,
            OP_BASE_WAVEFORM,
        ];
        for (base, byte) in bases.into_iter().zip(settings.register_bytes()) {
            self.bus.write(base + offset, byte);
        }
    }

    /// Set key-on and push the channel's registers
    ///
    /// Writes f-number low, then feedback/connection/outputs, then the
    /// key-on/block byte, in that order: the chip samples frequency and
    /// connection at the moment key-on rises, so both must be settled
    /// first. A cleared-to-set key-on transition retriggers the envelope
    /// from attack.
    ///
    /// # Panics
    /// Panics if `ch >= 18`.
    pub fn channel_key_on(&mut self, ch: usize) {
        self.channels[ch].key_on = true;
        self.write_channel(ch);
        trace!("key on: ch={ch}");
    }

    /// Clear key-on, touching only the key-on/block register
    ///
    /// The envelope responds to the key-on transition alone; frequency bits
    /// are rewritten unchanged and every other channel register is left as
    /// it was.
    ///
    /// # Panics
    /// Panics if `ch >= 18`.
    pub fn channel_key_off(&mut self, ch: usize) {
        let offset = channel_offset(ch);
        self.channels[ch].key_on = false;
        self.bus.write(CH_BASE_KEYON_BLOCK + offset, self.channels[ch].keyon_block_byte());
        trace!("key off: ch={ch}");
    }

    /// Push a channel's three registers from shadow state
    ///
    /// Same fixed write order as `channel_key_on`; used to flush direct
    /// edits of the channel settings without touching key-on.
    ///
    /// # Panics
    /// Panics if `ch >= 18`.
    pub fn write_channel(&mut self, ch: usize) {
        let offset = channel_offset(ch);
        let settings = self.channels[ch];
        self.bus.write(CH_BASE_FNUM_LOW + offset, settings.fnum_low_byte());
        self.bus.write(CH_BASE_FEEDBACK + offset, settings.feedback_byte());
        self.bus.write(CH_BASE_KEYON_BLOCK + offset, settings.keyon_block_byte());
    }

    /// Convert a frequency in Hz to an f-number/block pair for the channel
    ///
    /// Computes `f = frequency * 2^20 / (clock / 288)` and then halves `f`,
    /// bumping the block, until it fits in 10 bits. The pair reconstructs
    /// the input as `f_number * clock / (2^(20 - block) * 288)` within
    /// rounding tolerance. Only updates shadow state; the registers are
    /// written at the next key-on or `write_channel`.
    ///
    /// # Panics
    /// Panics if `ch >= 18`.
    pub fn set_channel_frequency(&mut self, ch: usize, frequency_hz: f32) {
        assert!(ch < NUM_CHANNELS, "channel index out of range: {ch}");
        let divisor = self.clock_hz as f64 / 288.0;
        let mut f = (frequency_hz as f64 * f64::from(1u32 << 20) / divisor).round() as u32;
        let mut block: u8 = 0;
        while f >= 1024 && block < 7 {
            f >>= 1;
            block += 1;
        }
        // Past the top of block 7 the pitch saturates.
        self.channels[ch].set_fnumber_block(f.min(0x3FF) as u16, block);
    }

    /// A channel's shadow parameters
    ///
    /// # Panics
    /// Panics if `ch >= 18`.
    pub fn channel_settings(&self, ch: usize) -> &ChannelSettings {
        &self.channels[ch]
    }

    /// Mutable access to a channel's shadow parameters
    ///
    /// Edits take effect on the chip at the next `write_channel` or key-on.
    ///
    /// # Panics
    /// Panics if `ch >= 18`.
    pub fn channel_settings_mut(&mut self, ch: usize) -> &mut ChannelSettings {
        &mut self.channels[ch]
    }

    /// An operator's shadow parameters
    ///
    /// # Panics
    /// Panics if `op >= 36`.
    pub fn operator_settings(&self, op: usize) -> &OperatorSettings {
        &self.operators[op]
    }

    /// Mutable access to an operator's shadow parameters
    ///
    /// Edits reach the chip at the next `update_operator` of the same
    /// index; `update_operator(op, *chip.operator_settings(op))` flushes
    /// them as-is.
    ///
    /// # Panics
    /// Panics if `op >= 36`.
    pub fn operator_settings_mut(&mut self, op: usize) -> &mut OperatorSettings {
        &mut self.operators[op]
    }

    /// Consume the driver and return the hardware binding
    pub fn into_io(self) -> IO {
        self.bus.into_io()
    }
}
