//! YMF262 (OPL3) FM Synthesizer Driver
//!
//! A register-level driver for the Yamaha YMF262 (OPL3) FM sound chip,
//! spoken to over a bit-banged parallel bus. The crate owns the timed
//! register-write protocol, the two-bank address mapping for the chip's
//! 36 operators and 18 channels, packed models of the per-operator and
//! per-channel synthesis parameters, and the block/f-number frequency
//! conversion needed to turn note events into audible pitches.
//!
//! # Features
//! - Bit-exact register-write protocol with setup/hold/pulse-width timing
//! - Hardware-reset and software register-wipe initialization paths
//! - Logical operator (0-35) and channel (0-17) indexing across both banks
//! - Explicit shift/mask packing of all synthesis parameter bytes
//! - Fixed-point frequency to (f-number, block) conversion
//! - Minimal note dispatcher mapping note-on/note-off events onto a channel
//!
//! # Hardware binding
//! The driver never touches pins directly. All line toggling, data-bus
//! output and nanosecond delays go through the [`BusIo`] trait, which the
//! embedding application implements for its GPIO layer. Tests implement it
//! with recording fakes.
//!
//! # Quick start
//! ```no_run
//! use ymf262::{BusIo, Line, Level, NoteDispatcher, Opl3, OperatorSettings, Waveform};
//!
//! struct Gpio; // the application's pin bindings
//! impl BusIo for Gpio {
//!     fn set_line(&mut self, _line: Line, _level: Level) { /* toggle pin */ }
//!     fn set_data(&mut self, _value: u8) { /* drive D0-D7 */ }
//!     fn delay_ns(&mut self, _ns: u32) { /* busy-wait */ }
//! }
//!
//! let mut chip = Opl3::new(Gpio);
//! chip.begin();
//!
//! // Give channel 0's carrier an audible envelope.
//! let carrier = ymf262::carrier_operator(0);
//! let op = OperatorSettings {
//!     attack_rate: 0x0A,
//!     release_rate: 0x04,
//!     waveform: Waveform::Sine,
//!     ..Default::default()
//! };
//! chip.update_operator(carrier, op);
//!
//! let mut dispatcher = NoteDispatcher::new(chip);
//! dispatcher.note_on(0, 69, 100); // A4
//! dispatcher.note_off(0, 69, 0);
//! ```

#![warn(missing_docs)]

pub mod bus;
pub mod channel;
pub mod chip;
pub mod note;
pub mod operator;
pub mod regs;
pub mod timing;

/// Error type for driver configuration
///
/// The register-write hot path has no runtime error taxonomy: the chip is
/// write-only, wiring faults are undetectable in software, and out-of-range
/// logical indices are caller bugs signalled as precondition failures. This
/// enum only covers construction-time configuration.
#[derive(thiserror::Error, Debug)]
pub enum Ymf262Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for driver configuration operations
pub type Result<T> = std::result::Result<T, Ymf262Error>;

// Public API exports
pub use bus::{BusIo, Level, Line, RegisterBus};
pub use channel::{ChannelOutputs, ChannelSettings};
pub use chip::{Opl3, DEFAULT_CLOCK_HZ};
pub use note::{note_frequency, NoteDispatcher};
pub use operator::{OperatorSettings, Waveform};
pub use regs::{carrier_operator, channel_offset, modulator_operator, operator_offset};
pub use timing::BusTimings;
